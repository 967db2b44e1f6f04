use std::{borrow::Cow, fmt::Display, panic::Location};

/// Skip depth used by every convenience entry point: the application call site itself.
///
/// All internal layers between the public API and [`resolve`] are `#[track_caller]`, so this
/// never has to be re-derived when a layer is added.
pub const DEFAULT_SKIP: usize = 0;

const UNKNOWN_FILE: &str = "???";

/// The source location an annotation is attributed to.
#[derive(Clone, PartialEq, Eq)]
pub struct CallSite {
    file: Cow<'static, str>,
    line: u32,
}

impl std::fmt::Debug for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

/// The sentinel site, `???:0`.
impl Default for CallSite {
    fn default() -> Self {
        Self {
            file: Cow::Borrowed(UNKNOWN_FILE),
            line: 0,
        }
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
        }
    }
}

impl CallSite {
    pub fn new(file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }

    /// The location of the (tracked) caller.
    #[track_caller]
    pub fn here() -> Self {
        Location::caller().into()
    }

    /// Resolves the frame `skip` levels above `anchor`.
    ///
    /// `anchor` is the application call site, usually obtained with
    /// [`Location::caller`]. A skip of `0` is the anchor itself and never touches the
    /// runtime stack. Anything that cannot be resolved yields the sentinel site.
    pub fn locate(anchor: &'static Location<'static>, skip: usize) -> Self {
        if skip == 0 {
            return anchor.into();
        }
        match walk(anchor, skip) {
            Some(site) => site,
            None => {
                tracing::debug!(%anchor, skip, "call site not resolvable, using sentinel");
                Self::default()
            }
        }
    }

    /// Full path as recorded by the compiler or the debug info.
    pub fn file(&self) -> &str {
        &self.file
    }

    /// 1-based line, `0` for the sentinel.
    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn is_unknown(&self) -> bool {
        self == &Self::default()
    }

    /// `dir/file` form of [`file`](Self::file).
    pub fn short_file(&self) -> String {
        shorten(&self.file)
    }
}

impl Display for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.short_file(), self.line)
    }
}

/// Resolves the call site `skip` frames above the caller of `resolve`.
///
/// ```
/// let site = lined::resolve(0);
/// assert_eq!(site.line(), line!() - 1);
/// ```
#[track_caller]
pub fn resolve(skip: usize) -> CallSite {
    CallSite::locate(Location::caller(), skip)
}

/// Reduces a path to `<last directory>/<file name>`, always with `/` separators.
///
/// A bare file name is returned as is.
pub fn shorten(path: &str) -> String {
    let path = path.replace('\\', "/");
    let (dir, file) = path.rsplit_once('/').unwrap_or(("", path.as_str()));
    match dir.trim_end_matches('/').rsplit('/').next() {
        Some(last) if !last.is_empty() => format!("{last}/{file}"),
        _ => file.to_owned(),
    }
}

#[cfg(feature = "backtrace")]
fn walk(anchor: &Location<'_>, skip: usize) -> Option<CallSite> {
    // One entry per logical frame, inlined callees included, innermost first.
    let mut frames: Vec<Option<(std::path::PathBuf, u32)>> = Vec::new();
    backtrace::trace(|frame| {
        let before = frames.len();
        backtrace::resolve_frame(frame, |symbol| {
            frames.push(
                symbol
                    .filename()
                    .zip(symbol.lineno())
                    .map(|(file, line)| (file.to_path_buf(), line)),
            );
        });
        if frames.len() == before {
            frames.push(None);
        }
        true
    });

    let in_anchor_file = |frame: &Option<(std::path::PathBuf, u32)>| {
        frame
            .as_ref()
            .is_some_and(|(file, _)| file.ends_with(anchor.file()))
    };
    let on_anchor_line = |frame: &Option<(std::path::PathBuf, u32)>| {
        in_anchor_file(frame) && frame.as_ref().is_some_and(|(_, line)| *line == anchor.line())
    };
    // Multi-line calls can be attributed to another line of the same file.
    let start = frames
        .iter()
        .position(on_anchor_line)
        .or_else(|| frames.iter().position(in_anchor_file))?;

    let (file, line) = start
        .checked_add(skip)
        .and_then(|i| frames.get(i))?
        .as_ref()?;
    Some(CallSite::new(file.to_string_lossy().into_owned(), *line))
}

/// Stack trace to keep with a new link, if `RUST_LIB_BACKTRACE` asks for one.
///
/// The variable is read once per process; unset or `0` disables capturing.
#[cfg(feature = "backtrace")]
pub(crate) fn capture_trace() -> Option<backtrace::Backtrace> {
    static ENABLED: std::sync::OnceLock<bool> = std::sync::OnceLock::new();
    let enabled = *ENABLED.get_or_init(|| {
        std::env::var_os("RUST_LIB_BACKTRACE").is_some_and(|value| value.to_str() != Some("0"))
    });
    enabled.then(backtrace::Backtrace::new)
}

#[cfg(not(feature = "backtrace"))]
fn walk(_anchor: &Location<'_>, _skip: usize) -> Option<CallSite> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shorten_keeps_last_directory() {
        assert_eq!(shorten("/a/b/c/file.go"), "c/file.go");
        assert_eq!(shorten("/home/me/src/lined/src/site.rs"), "src/site.rs");
    }

    #[test]
    fn shorten_bare_file_has_no_leading_separator() {
        assert_eq!(shorten("file.go"), "file.go");
        assert_eq!(shorten("/file.go"), "file.go");
    }

    #[test]
    fn shorten_backslashes() {
        assert_eq!(shorten(r"C:\a\b\file.go"), "b/file.go");
        assert_eq!(shorten(r"src\lib.rs"), "src/lib.rs");
    }

    #[test]
    fn sentinel() {
        let site = CallSite::default();
        assert!(site.is_unknown());
        assert_eq!(site.to_string(), "???:0");
    }

    #[test]
    fn skip_zero_is_the_caller() {
        let line = line!() + 1;
        let site = resolve(0);
        assert_eq!(site.file(), file!());
        assert_eq!(site.line(), line);
        assert_eq!(site.to_string(), format!("src/site.rs:{line}"));
    }

    #[test]
    fn unreachable_depth_is_the_sentinel() {
        assert!(resolve(100_000).is_unknown());
    }

    #[test]
    fn largest_depth_is_the_sentinel() {
        assert!(resolve(usize::MAX).is_unknown());
    }

    #[test]
    fn here_is_the_caller() {
        let line = line!() + 1;
        let site = CallSite::here();
        assert_eq!(site, CallSite::new(file!(), line));
    }
}
