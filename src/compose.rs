//! Building annotations and attaching them to a cause chain.
//!
//! The functions here are generic over [`Chain`], the capability a chain representation has to
//! provide: start a fresh chain, or push a new link on top of an existing cause. [`crate::Error`]
//! is the default representation, `anyhow::Error` works as well.

use std::{
    fmt::{Debug, Display},
    panic::Location,
};

use crate::{BoxError, CallSite};

/// The `<dir/file:line> message` text attached to a link.
#[derive(Clone, PartialEq, Eq)]
pub struct Annotation {
    site: CallSite,
    message: String,
    text: String,
}

impl Annotation {
    pub fn new(site: CallSite, message: impl Display) -> Self {
        let message = message.to_string();
        // No dangling space when there is no message.
        let text = format!("<{site}> {message}").trim().to_owned();
        Self {
            site,
            message,
            text,
        }
    }

    /// Annotation for the frame `skip` levels above the caller.
    #[track_caller]
    pub fn here(skip: usize, message: impl Display) -> Self {
        Self::new(crate::resolve(skip), message)
    }

    pub fn site(&self) -> &CallSite {
        &self.site
    }

    /// The message as given, without the location tag.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl Display for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

impl Debug for Annotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Debug::fmt(&self.text, f)
    }
}

/// A cause chain that annotations can be attached to.
pub trait Chain: Sized {
    /// A chain consisting of `annotation` alone.
    fn terminal(annotation: Annotation) -> Self;

    /// `annotation` as the new top link above `base`. `base` must stay reachable as the source.
    fn attach(annotation: Annotation, base: BoxError) -> Self;
}

impl Chain for anyhow::Error {
    fn terminal(annotation: Annotation) -> Self {
        anyhow::Error::msg(annotation)
    }

    fn attach(annotation: Annotation, base: BoxError) -> Self {
        anyhow::Error::from_boxed(base).context(annotation)
    }
}

/// Creates a terminal chain annotated with the frame `skip` levels above the caller.
#[track_caller]
pub fn create<C: Chain>(skip: usize, message: impl Display) -> C {
    create_at(Location::caller(), skip, message)
}

/// Attaches an annotation above `base`. Returns `None` when there is no base.
#[track_caller]
pub fn attach<C: Chain, E: Into<BoxError>>(
    skip: usize,
    base: Option<E>,
    message: impl Display,
) -> Option<C> {
    let base = base?;
    Some(attach_at(Location::caller(), skip, base, message))
}

/// [`create`] with an explicitly captured call site.
pub fn create_at<C: Chain>(
    anchor: &'static Location<'static>,
    skip: usize,
    message: impl Display,
) -> C {
    C::terminal(Annotation::new(CallSite::locate(anchor, skip), message))
}

/// [`attach`] with an explicitly captured call site and a base that is known to exist.
pub fn attach_at<C: Chain, E: Into<BoxError>>(
    anchor: &'static Location<'static>,
    skip: usize,
    base: E,
    message: impl Display,
) -> C {
    C::attach(
        Annotation::new(CallSite::locate(anchor, skip), message),
        base.into(),
    )
}

/// Message parts rendered back to back, used by the plain (non-format) macros.
#[doc(hidden)]
pub struct Parts<'a>(pub &'a [&'a dyn Display]);

impl Display for Parts<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in self.0 {
            Display::fmt(part, f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_message_has_no_trailing_space() {
        let annotation = Annotation::new(CallSite::new("/x/pkg/file.rs", 15), "");
        assert_eq!(annotation.as_str(), "<pkg/file.rs:15>");
        assert_eq!(annotation.message(), "");
    }

    #[test]
    fn message_follows_the_tag() {
        let annotation = Annotation::new(CallSite::new("/x/pkg/file.rs", 15), "boom");
        assert_eq!(annotation.to_string(), "<pkg/file.rs:15> boom");
        assert_eq!(annotation.site().line(), 15);
    }

    #[test]
    fn here_tags_the_caller() {
        let annotation = Annotation::here(0, "here");
        assert_eq!(annotation.to_string(), format!("<src/compose.rs:{}> here", line!() - 1));
        assert_eq!(Annotation::here(usize::MAX, "lost").as_str(), "<???:0> lost");
    }

    #[test]
    fn sentinel_tag() {
        let annotation = Annotation::new(CallSite::default(), "lost");
        assert_eq!(annotation.as_str(), "<???:0> lost");
    }

    #[test]
    fn parts_concatenate() {
        let n = 3;
        let parts: [&dyn Display; 3] = [&"error: ", &"err text ", &n];
        let parts = Parts(&parts);
        assert_eq!(parts.to_string(), "error: err text 3");
        assert_eq!(Parts(&[]).to_string(), "");
    }

    #[test]
    fn anyhow_backend() {
        let err: anyhow::Error = attach(0, Some("my error"), "ctx").unwrap();
        assert_eq!(format!("{err:#}"), format!("<src/compose.rs:{}> ctx: my error", line!() - 1));
        assert!(err.downcast_ref::<Annotation>().is_some());

        let err: anyhow::Error = create(0, "");
        assert_eq!(err.to_string(), format!("<src/compose.rs:{}>", line!() - 1));
    }
}
