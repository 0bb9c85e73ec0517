//! Output of parallel runs is identical to sequential output.

mod common;

use primecraft::core::TupletKind;
use primecraft::{PrimeCraftError, PrimeSieveBuilder};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn print_run(kind: TupletKind, start: u64, stop: u64, threads: usize) -> String {
    let out = SharedBuffer::default();
    PrimeSieveBuilder::new()
        .range(start, stop)
        .print_to(out.clone(), kind)
        .threads(threads)
        .segment_bytes(1_024)
        .build()
        .unwrap()
        .run()
        .unwrap();
    out.text()
}

#[test]
fn test_parallel_primes_are_ascending() {
    let values = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&values);
    PrimeSieveBuilder::new()
        .range(0, 2_000_000)
        .callback64(move |p| sink.lock().unwrap().push(p))
        .threads(8)
        .segment_bytes(1_024)
        .build()
        .unwrap()
        .run()
        .unwrap();

    let values = values.lock().unwrap();
    assert_eq!(values.len(), 148_933);
    assert!(values.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_parallel_print_matches_sequential() {
    for kind in [TupletKind::Primes, TupletKind::Twins, TupletKind::Quadruplets] {
        let sequential = print_run(kind, 1_000, 1_500_000, 1);
        let parallel = print_run(kind, 1_000, 1_500_000, 6);
        assert_eq!(sequential, parallel, "{kind}");
    }
}

#[test]
fn test_print_matches_reference() {
    for kind in TupletKind::ALL {
        assert_eq!(print_run(kind, 0, 20_000, 3), common::printed(kind, 0, 20_000), "{kind}");
    }
}

#[test]
fn test_context_is_passed_back() {
    let context: primecraft::sink::Context = Arc::new(String::from("run-42"));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    PrimeSieveBuilder::new()
        .range(0, 100)
        .callback32_with_context(
            move |p, ctx| {
                let tag = ctx.downcast_ref::<String>().unwrap();
                sink.lock().unwrap().push(format!("{tag}:{p}"));
            },
            context,
        )
        .build()
        .unwrap()
        .run()
        .unwrap();

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 25);
    assert_eq!(seen[0], "run-42:2");
    assert_eq!(seen[24], "run-42:97");
}

#[test]
fn test_write_failure_is_reported() {
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    let result = PrimeSieveBuilder::new()
        .range(0, 1_000_000)
        .print_to(Broken, TupletKind::Primes)
        .threads(2)
        .build()
        .unwrap()
        .run();
    assert!(matches!(result, Err(PrimeCraftError::Output { .. })));
}
