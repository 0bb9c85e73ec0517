//! Internal utility functions and helpers.
//!
//! - [`bitops`] - Population count and bit indexing helpers

pub mod bitops;

pub use bitops::{isqrt, popcount};
