//! Integration Test: Panicking Unwrap Prohibition
//!
//! **Policy**: Failures are propagated with `?` or handled in place. Production
//! code MUST NOT call `unwrap()` or `expect()`; test modules may.

use architectural_enforcement::{production_dirs, scan};

#[test]
fn test_no_unwrap_in_production_code() {
    let violations = scan(&production_dirs(), &[".unwrap()", ".expect("]);

    if !violations.is_empty() {
        eprintln!("\n❌ Panicking unwraps found in production code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ Propagate with `?`, or use unwrap_or / unwrap_or_else / let-else.");

        panic!(
            "\nFound {} unwrap/expect call(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}
