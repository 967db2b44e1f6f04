use std::fmt::{Debug, Display};

use crate::{compose, Annotation, CallSite, Chain, DEFAULT_SKIP};

mod context;
mod snippet;

pub use context::Context;

/// Anything that can sit below an annotation in the chain.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// An error tagged with the `<dir/file:line>` it was created or wrapped at.
///
/// * `{}` prints the annotation, followed by `: ` and the short form of the wrapped error, if any.
/// * `{:#}` prints every link of the chain on its own line, most recent first, each followed by
///   its stack trace if one was recorded.
/// * `{:?}` renders a diagnostic with the annotated source lines.
pub struct Error {
    data: Box<ErrorData>,
}

struct ErrorData {
    annotation: Annotation,
    source: Option<BoxError>,
    #[cfg(feature = "backtrace")]
    trace: Option<backtrace::Backtrace>,
}

impl Error {
    /// A new error without a cause, annotated with the caller's location.
    #[track_caller]
    pub fn new(message: impl Display) -> Self {
        compose::create(DEFAULT_SKIP, message)
    }

    /// Like [`new`](Self::new), but attributed to the frame `skip` levels above the caller.
    #[track_caller]
    pub fn new_skip(skip: usize, message: impl Display) -> Self {
        compose::create(skip, message)
    }

    /// Puts a new annotated link on top of `base`.
    ///
    /// Wrapping nothing produces nothing: a `None` base gives `None`.
    #[track_caller]
    pub fn wrap<E: Into<BoxError>>(base: Option<E>, message: impl Display) -> Option<Self> {
        compose::attach(DEFAULT_SKIP, base, message)
    }

    #[track_caller]
    pub fn wrap_skip<E: Into<BoxError>>(
        skip: usize,
        base: Option<E>,
        message: impl Display,
    ) -> Option<Self> {
        compose::attach(skip, base, message)
    }

    pub fn annotation(&self) -> &Annotation {
        &self.data.annotation
    }

    pub fn site(&self) -> &CallSite {
        self.data.annotation.site()
    }

    pub fn message(&self) -> &str {
        self.data.annotation.message()
    }

    /// The stack trace recorded when this link was created.
    ///
    /// Only captured when `RUST_LIB_BACKTRACE` is set to something other than `0`.
    #[cfg(feature = "backtrace")]
    pub fn trace(&self) -> Option<&backtrace::Backtrace> {
        self.data.trace.as_ref()
    }

    /// This error followed by all of its sources.
    pub fn chain(&self) -> Causes<'_> {
        Causes(Some(self))
    }

    /// The innermost error of the chain, `self` if nothing was wrapped.
    pub fn root_cause(&self) -> &(dyn std::error::Error + 'static) {
        let mut current: &(dyn std::error::Error + 'static) = self;
        while let Some(next) = current.source() {
            current = next;
        }
        current
    }

    /// The first error of type `T` in the chain, starting with `self`.
    pub fn downcast_ref<T: std::error::Error + 'static>(&self) -> Option<&T> {
        self.chain().find_map(|e| e.downcast_ref::<T>())
    }

    pub fn is<T: std::error::Error + 'static>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl Chain for Error {
    fn terminal(annotation: Annotation) -> Self {
        Self {
            data: Box::new(ErrorData {
                annotation,
                source: None,
                #[cfg(feature = "backtrace")]
                trace: crate::site::capture_trace(),
            }),
        }
    }

    fn attach(annotation: Annotation, base: BoxError) -> Self {
        Self {
            data: Box::new(ErrorData {
                annotation,
                source: Some(base),
                #[cfg(feature = "backtrace")]
                trace: crate::site::capture_trace(),
            }),
        }
    }
}

/// Iterator over an error chain, see [`Error::chain`].
#[derive(Clone)]
pub struct Causes<'a>(Option<&'a (dyn std::error::Error + 'static)>);

impl<'a> Iterator for Causes<'a> {
    type Item = &'a (dyn std::error::Error + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.0.take()?;
        self.0 = next.source();
        Some(next)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.data
            .source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            return self.fmt_links(f);
        }
        Display::fmt(&self.data.annotation, f)?;
        if let Some(source) = &self.data.source {
            write!(f, ": {source}")?;
        }
        Ok(())
    }
}

impl Error {
    fn fmt_links(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, link) in self.chain().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            match link.downcast_ref::<Error>() {
                // The short form of an annotated link would repeat everything below it.
                Some(annotated) => {
                    write!(f, "{i}: {}", annotated.annotation())?;
                    annotated.fmt_trace(f)?;
                }
                None => write!(f, "{i}: {link}")?,
            }
        }
        Ok(())
    }

    #[cfg(feature = "backtrace")]
    fn fmt_trace(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Some(trace) = &self.data.trace else {
            return Ok(());
        };
        write!(f, "\n   stack backtrace:")?;
        for line in format!("{trace:?}").lines() {
            write!(f, "\n      {line}")?;
        }
        Ok(())
    }

    #[cfg(not(feature = "backtrace"))]
    fn fmt_trace(&self, _f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Ok(())
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        snippet::render(self, f)
    }
}
