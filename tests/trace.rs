#![cfg(feature = "backtrace")]

use std::io;

#[test]
fn verbose_form_lists_a_trace_per_link() {
    // read once per process, so it has to be set before the first error
    std::env::set_var("RUST_LIB_BACKTRACE", "1");

    let wrapped = lined::wrap!(Some(io::Error::other("my error")), "wrapped error");
    let twice = lined::wrap!(wrapped, "again").unwrap();
    assert!(twice.trace().is_some());

    let verbose = format!("{twice:#}");
    assert_eq!(verbose.matches("stack backtrace:").count(), 2, "{verbose}");
    assert!(verbose.contains("trace.rs"), "{verbose}");
    assert!(verbose.starts_with("0: <tests/trace.rs:11> again\n"), "{verbose}");
    assert!(verbose.ends_with("\n2: my error"), "{verbose}");

    // the short form stays a single line
    assert_eq!(twice.to_string().lines().count(), 1);
}
