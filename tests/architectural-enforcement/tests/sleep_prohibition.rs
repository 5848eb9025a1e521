//! Integration Test: Blocking Sleep Prohibition
//!
//! **Policy**: The controller is single-runtime async code. Production code
//! MUST NOT block a runtime thread with `std::thread::sleep`.
//! **Allowed**: `tokio::time::sleep` for simulated latency and timers.

use architectural_enforcement::{production_dirs, scan};

#[test]
fn test_no_blocking_sleep_in_production_code() {
    let violations = scan(&production_dirs(), &["thread::sleep("]);

    if !violations.is_empty() {
        eprintln!("\n❌ Blocking sleep found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ Use tokio::time::sleep(...).await instead.");

        panic!(
            "\nFound {} blocking sleep(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

#[test]
fn test_production_dirs_exist() {
    for dir in production_dirs() {
        assert!(dir.exists(), "missing source directory {}", dir.display());
    }
}
