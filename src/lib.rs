//! Errors annotated with the `<dir/file:line>` they were created or wrapped at.
//!
//! ```
//! let base = std::io::Error::other("my error");
//! let inner = lined::wrap!(Some(base), "wrapped error");
//! let outer = lined::wrap!(inner).unwrap();
//!
//! // <dir/file.rs:5>: <dir/file.rs:4> wrapped error: my error
//! assert!(outer.to_string().ends_with("wrapped error: my error"));
//! // one line per link
//! assert_eq!(format!("{outer:#}").lines().count(), 3);
//! ```
//!
//! Every entry point comes in a variant taking a skip depth, for helpers that should attribute
//! the error to their own caller instead.

pub mod compose;
mod error;
mod site;

pub use compose::{Annotation, Chain};
pub use error::*;
pub use site::*;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// New error from message parts, concatenated in their `Display` form.
#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! new {
    ($($part:expr),* $(,)?) => {
        $crate::Error::new($crate::compose::Parts(&[$(&$part as &dyn ::core::fmt::Display),*]))
    };
}

#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! new_skip {
    ($skip:expr $(, $part:expr)* $(,)?) => {
        $crate::Error::new_skip($skip, $crate::compose::Parts(&[$(&$part as &dyn ::core::fmt::Display),*]))
    };
}

/// New error from a format string.
#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! newf {
    ($($arg:tt)*) => {
        $crate::Error::new(::core::format_args!($($arg)*))
    };
}

#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! newf_skip {
    ($skip:expr, $($arg:tt)*) => {
        $crate::Error::new_skip($skip, ::core::format_args!($($arg)*))
    };
}

/// Wraps an `Option` of an error. `None` stays `None`.
#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! wrap {
    ($base:expr $(, $part:expr)* $(,)?) => {
        $crate::Error::wrap($base, $crate::compose::Parts(&[$(&$part as &dyn ::core::fmt::Display),*]))
    };
}

#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! wrap_skip {
    ($skip:expr, $base:expr $(, $part:expr)* $(,)?) => {
        $crate::Error::wrap_skip($skip, $base, $crate::compose::Parts(&[$(&$part as &dyn ::core::fmt::Display),*]))
    };
}

#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! wrapf {
    ($base:expr, $($arg:tt)*) => {
        $crate::Error::wrap($base, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! wrapf_skip {
    ($skip:expr, $base:expr, $($arg:tt)*) => {
        $crate::Error::wrap_skip($skip, $base, ::core::format_args!($($arg)*))
    };
}

#[macro_export]
#[collapse_debuginfo(yes)]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::newf!($($arg)*).into())
    };
}
