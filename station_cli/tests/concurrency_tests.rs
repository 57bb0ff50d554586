//! Concurrency tests for stalot.
//!
//! Several processes sharing one data directory must not lose or interleave
//! history lines, and the position must match the last recorded visit.

mod common;

use common::Fixture;
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_adds_all_recorded() {
    let fx = Arc::new(Fixture::new());
    fx.cmd().arg("init").assert().success();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let fx = Arc::clone(&fx);
            thread::spawn(move || {
                let name = if i % 2 == 0 { "B" } else { "C" };
                fx.cmd().arg("add").arg(name).assert().success();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let history = fx.history();
    let lines: Vec<&str> = history.lines().collect();
    assert_eq!(lines.len(), 5, "Expected 5 visits, got {}", lines.len());
    for line in &lines {
        assert!(
            line.starts_with("1, B站, ") || line.starts_with("2, C站, "),
            "Interleaved or corrupt line: {:?}",
            line
        );
    }

    let last_index = lines.last().unwrap().split(", ").next().unwrap();
    assert_eq!(fx.position().as_deref(), Some(last_index));
}

#[test]
fn test_reads_during_writes() {
    let fx = Arc::new(Fixture::new());
    fx.cmd().arg("init").assert().success();

    let writer = {
        let fx = Arc::clone(&fx);
        thread::spawn(move || {
            for _ in 0..3 {
                fx.cmd().arg("add").arg("B").assert().success();
            }
        })
    };

    for _ in 0..3 {
        fx.cmd().arg("history").assert().success();
    }

    writer.join().unwrap();
    assert_eq!(fx.history().lines().count(), 3);
}
