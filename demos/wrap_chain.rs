use std::io;

use lined::Error;

fn main() -> Result<(), Error> {
    let base = io::Error::other("my error");
    let wrapped = lined::wrap!(Some(base), "wrapped error");
    let twice = lined::wrap!(wrapped).ok_or_else(|| lined::new!("nothing to wrap"))?;

    let short = twice.to_string();
    assert!(short.starts_with("<demos/wrap_chain.rs:8>: <demos/wrap_chain.rs:7> wrapped error"));
    assert!(short.ends_with("wrapped error: my error"));

    let verbose = format!("{twice:#}");
    assert_eq!(verbose.lines().count(), 3);
    assert!(verbose.ends_with("2: my error"));

    assert!(lined::wrap!(None::<io::Error>, "context").is_none());
    Ok(())
}
