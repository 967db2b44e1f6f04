use std::{collections::HashMap, ops::Range};

use annotate_snippets::{Level, Renderer, Snippet};
use bstr::ByteSlice;
use color_eyre::eyre::{eyre, Result, WrapErr};

use super::Error;

/// Writes the diagnostic for `error`, or its link listing if a source can't be shown.
pub(super) fn render(error: &Error, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match Diagnostic::collect(error) {
        Ok(diagnostic) => diagnostic.write(f),
        Err(report) => {
            tracing::debug!(error = %report, "falling back to plain chain rendering");
            write!(f, "{error:#}")
        }
    }
}

struct Diagnostic {
    title: String,
    /// (file, highlighted bytes, label) per annotated link; the first is the error itself.
    marks: Vec<(String, Range<usize>, String)>,
    files: HashMap<String, String>,
    notes: Vec<String>,
}

impl Diagnostic {
    fn collect(error: &Error) -> Result<Self> {
        let mut files = HashMap::new();
        let mut marks = Vec::new();
        let mut notes = Vec::new();
        for link in error.chain() {
            let Some(annotated) = link.downcast_ref::<Error>() else {
                notes.push(link.to_string());
                continue;
            };
            let site = annotated.site();
            if !files.contains_key(site.file()) {
                files.insert(site.file().to_owned(), load(site.file())?);
            }
            let span = line_span(&files[site.file()], site.line())
                .wrap_err_with(|| format!("locating {site}"))?;
            marks.push((
                site.file().to_owned(),
                span,
                annotated.annotation().to_string(),
            ));
        }
        Ok(Self {
            title: error.annotation().to_string(),
            marks,
            files,
            notes,
        })
    }

    fn write(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let snippets = self.marks.iter().enumerate().map(|(i, (file, span, label))| {
            let snippet = Snippet::source(&self.files[file]).origin(file).fold(true);
            if i == 0 {
                snippet.annotation(Level::Error.span(span.clone()))
            } else {
                snippet.annotation(Level::Note.span(span.clone()).label(label))
            }
        });
        let mut message = Level::Error.title(&self.title).snippets(snippets);
        for note in &self.notes {
            message = message.footer(Level::Note.title(note));
        }
        let renderer = if colored::control::SHOULD_COLORIZE.should_colorize() {
            Renderer::styled()
        } else {
            Renderer::plain()
        };
        let res = write!(f, "{}", renderer.render(message));
        res
    }
}

fn load(path: &str) -> Result<String> {
    let bytes = std::fs::read(path).wrap_err_with(|| format!("reading `{path}`"))?;
    Ok(bytes.to_str_lossy().into_owned())
}

/// Byte range of the 1-based `line`, without its terminator.
fn line_span(source: &str, line: u32) -> Result<Range<usize>> {
    let index = usize::try_from(line)?
        .checked_sub(1)
        .ok_or_else(|| eyre!("unknown line"))?;
    let mut start = 0;
    for (i, text) in source.split_inclusive('\n').enumerate() {
        if i == index {
            let len = text.trim_end_matches(['\n', '\r']).len();
            return Ok(start..start + len);
        }
        start += text.len();
    }
    Err(eyre!("line {line} is past the end of the file"))
}
