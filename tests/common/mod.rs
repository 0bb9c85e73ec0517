//! Brute-force reference for integration tests.
//!
//! Primes come from a plain sieve of Eratosthenes; tuplets are matched
//! against their admissible offset forms. A tuplet counts only if every
//! member lies in `[start, stop]`.
#![allow(dead_code)]

use primecraft::TupletKind;

/// Offset forms of each kind.
pub fn forms(kind: TupletKind) -> &'static [&'static [u64]] {
    match kind {
        TupletKind::Primes => &[&[0]],
        TupletKind::Twins => &[&[0, 2]],
        TupletKind::Triplets => &[&[0, 2, 6], &[0, 4, 6]],
        TupletKind::Quadruplets => &[&[0, 2, 6, 8]],
        TupletKind::Quintuplets => &[&[0, 2, 6, 8, 12], &[0, 4, 6, 10, 12]],
        TupletKind::Sextuplets => &[&[0, 4, 6, 10, 12, 16]],
        TupletKind::Septuplets => &[&[0, 2, 6, 8, 12, 18, 20]],
    }
}

/// Primality flags for `0..=limit`.
pub fn flags(limit: u64) -> Vec<bool> {
    let limit = limit as usize;
    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    if limit >= 1 {
        is_prime[1] = false;
    }
    let mut i = 2;
    while i * i <= limit {
        if is_prime[i] {
            let mut j = i * i;
            while j <= limit {
                is_prime[j] = false;
                j += i;
            }
        }
        i += 1;
    }
    is_prime
}

/// Every record of `kind` inside `[start, stop]`, ascending by first member.
pub fn records(kind: TupletKind, start: u64, stop: u64) -> Vec<Vec<u64>> {
    let is_prime = flags(stop + 20);
    let mut found = Vec::new();
    for p in start.max(2)..=stop {
        for form in forms(kind) {
            let last = p + form[form.len() - 1];
            if last <= stop && form.iter().all(|d| is_prime[(p + d) as usize]) {
                found.push(form.iter().map(|d| p + d).collect());
            }
        }
    }
    found
}

/// Number of records of `kind` inside `[start, stop]`.
pub fn count(kind: TupletKind, start: u64, stop: u64) -> u64 {
    records(kind, start, stop).len() as u64
}

/// The print sink's text for `kind` over `[start, stop]`.
pub fn printed(kind: TupletKind, start: u64, stop: u64) -> String {
    records(kind, start, stop)
        .into_iter()
        .map(|members| {
            if kind == TupletKind::Primes {
                format!("{}\n", members[0])
            } else {
                let joined: Vec<String> = members.iter().map(u64::to_string).collect();
                format!("({})\n", joined.join(", "))
            }
        })
        .collect()
}
