use std::{fmt::Display, panic::Location};

use crate::{compose, BoxError, Error, DEFAULT_SKIP};

/// Annotates the error of a `Result` with the caller's location. `Ok` values pass through.
pub trait Context<T> {
    fn annotate<M: Display>(self, msg: M) -> Result<T, Error>;
    fn annotate_skip<M: Display>(self, skip: usize, msg: M) -> Result<T, Error>;
    /// The message is only built when there is an error to annotate.
    fn with_annotation<M: Display>(self, f: impl FnOnce() -> M) -> Result<T, Error>;
}

impl<T, E: Into<BoxError>> Context<T> for Result<T, E> {
    #[track_caller]
    fn annotate<M: Display>(self, msg: M) -> Result<T, Error> {
        self.annotate_skip(DEFAULT_SKIP, msg)
    }

    #[track_caller]
    fn annotate_skip<M: Display>(self, skip: usize, msg: M) -> Result<T, Error> {
        match self {
            Ok(value) => Ok(value),
            Err(e) => Err(compose::attach_at(Location::caller(), skip, e, msg)),
        }
    }

    #[track_caller]
    fn with_annotation<M: Display>(self, f: impl FnOnce() -> M) -> Result<T, Error> {
        let anchor = Location::caller();
        self.map_err(|e| compose::attach_at(anchor, DEFAULT_SKIP, e, f()))
    }
}
