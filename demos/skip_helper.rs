//@compile-flags: -g
use lined::Error;

#[inline(never)]
fn invalid(what: &str) -> Error {
    lined::newf_skip!(1, "invalid {what}")
}

fn main() {
    let err = invalid("port");
    assert_eq!(err.site().line(), 10);
    assert_eq!(err.to_string(), "<demos/skip_helper.rs:10> invalid port");
}
