use crate::decode::{decode, encode};
use crate::error::{Error, Result};
use crate::event::{EventSink, ParseEvent};
use crate::indent::IndentTracker;
use crate::render::{ContentNewlines, TextRenderer};
use crate::resolver::{LineEvent, ShapeResolver};
use crate::sink::{LineSink, LineWriter};
use crate::source::parse_str;
use std::path::Path;
use tracing::{debug, info, trace};

/// Options for rendering a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Written between lines, never after the last one.
    pub newline: String,
    /// Encoding label of the rendered prologue.
    pub encoding_label: String,
    pub content_newlines: ContentNewlines,
    /// Start written files with a UTF-8 byte order mark.
    pub write_bom: bool,
}

impl Default for RewriteOptions {
    fn default() -> RewriteOptions {
        RewriteOptions {
            newline: "\r\n".to_string(),
            encoding_label: "utf-8".to_string(),
            content_newlines: ContentNewlines::Verbatim,
            write_bom: true,
        }
    }
}

/// Stage between shape classification and indentation where edits happen.
///
/// A transform receives every line event in document order and pushes any
/// number of line events to `out`. Blocks it emits must stay balanced.
pub trait LineTransform {
    fn apply(&mut self, line: LineEvent, out: &mut Vec<LineEvent>) -> Result<()>;
}

/// Passes every line through unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl LineTransform for Identity {
    fn apply(&mut self, line: LineEvent, out: &mut Vec<LineEvent>) -> Result<()> {
        out.push(line);
        Ok(())
    }
}

impl<F> LineTransform for F
where
    F: FnMut(LineEvent, &mut Vec<LineEvent>) -> Result<()>,
{
    fn apply(&mut self, line: LineEvent, out: &mut Vec<LineEvent>) -> Result<()> {
        self(line, out)
    }
}

/// Logs every line event before handing it to the inner transform.
#[derive(Debug, Clone, Default)]
pub struct Echo<T> {
    inner: T,
}

impl<T: LineTransform> Echo<T> {
    pub fn new(inner: T) -> Echo<T> {
        Echo { inner }
    }
}

impl<T: LineTransform> LineTransform for Echo<T> {
    fn apply(&mut self, line: LineEvent, out: &mut Vec<LineEvent>) -> Result<()> {
        info!(?line, "LOG:");
        self.inner.apply(line, out)
    }
}

/// The whole chain from parse events to rendered lines.
///
/// Feed it with [`EventSink::push`], then take the sink back with
/// [`Pipeline::finish`].
pub struct Pipeline<T: LineTransform, S: LineSink> {
    resolver: ShapeResolver,
    transform: T,
    tracker: IndentTracker,
    renderer: TextRenderer,
    sink: S,
    resolved: Vec<LineEvent>,
    transformed: Vec<LineEvent>,
    rendered: usize,
}

impl<T: LineTransform, S: LineSink> Pipeline<T, S> {
    /// Build the chain. The prologue is written to `sink` right away.
    pub fn new(options: &RewriteOptions, transform: T, mut sink: S) -> Result<Pipeline<T, S>> {
        let renderer = TextRenderer::new(options.content_newlines);
        sink.write_line(&renderer.prologue(&options.encoding_label))?;
        Ok(Pipeline {
            resolver: ShapeResolver::new(),
            transform,
            tracker: IndentTracker::new(),
            renderer,
            sink,
            resolved: Vec::new(),
            transformed: Vec::new(),
            rendered: 1,
        })
    }

    /// Return the sink once the whole document went through.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedInput`]: the document did not end.
    pub fn finish(self) -> Result<S> {
        if !self.resolver.is_finished() {
            return Err(Error::malformed("Unexpected end of input"));
        }
        debug!(lines = self.rendered, "document rendered");
        Ok(self.sink)
    }

    fn flush(&mut self) -> Result<()> {
        for line in self.resolved.drain(..) {
            self.transform.apply(line, &mut self.transformed)?;
        }
        for line in self.transformed.drain(..) {
            let indented = self.tracker.push(line)?;
            trace!(depth = indented.depth, line = ?indented.line);
            for text in self.renderer.render(&indented) {
                self.sink.write_line(&text)?;
                self.rendered += 1;
            }
        }
        Ok(())
    }
}

impl<T: LineTransform, S: LineSink> EventSink for Pipeline<T, S> {
    fn push(&mut self, event: ParseEvent) -> Result<()> {
        let at_end = matches!(event, ParseEvent::DocEnd);
        self.resolver.push(event, &mut self.resolved)?;
        self.flush()?;
        if at_end {
            self.tracker.finish()?;
        }
        Ok(())
    }
}

/// Render `text` with `transform` applied to its line events.
pub fn rewrite_str_with<T: LineTransform>(
    text: &str,
    options: &RewriteOptions,
    transform: T,
) -> Result<String> {
    let writer = LineWriter::new(Vec::with_capacity(text.len()), options.newline.as_str());
    let mut pipeline = Pipeline::new(options, transform, writer)?;
    parse_str(text, &mut pipeline)?;
    let bytes = pipeline.finish()?.into_inner();
    Ok(String::from_utf8(bytes)?)
}

/// Render `text` unchanged apart from its layout.
pub fn rewrite_str(text: &str, options: &RewriteOptions) -> Result<String> {
    rewrite_str_with(text, options, Identity)
}

/// Decode `bytes`, render them and encode the result as UTF-8.
pub fn rewrite_bytes_with<T: LineTransform>(
    bytes: &[u8],
    options: &RewriteOptions,
    transform: T,
) -> Result<Vec<u8>> {
    let text = decode(bytes)?;
    let rendered = rewrite_str_with(&text, options, transform)?;
    Ok(encode(&rendered, options.write_bom))
}

pub fn rewrite_bytes(bytes: &[u8], options: &RewriteOptions) -> Result<Vec<u8>> {
    rewrite_bytes_with(bytes, options, Identity)
}

/// Rewrite the file at `path` in place.
///
/// The file is only written after the whole document has been rendered;
/// on any error it is left untouched.
pub fn rewrite_file_with<P: AsRef<Path>, T: LineTransform>(
    path: P,
    options: &RewriteOptions,
    transform: T,
) -> Result<()> {
    let path = path.as_ref();
    let input = std::fs::read(path)?;
    let output = rewrite_bytes_with(&input, options, transform)?;
    if output == input {
        debug!(path = %path.display(), "already in canonical layout");
        return Ok(());
    }
    std::fs::write(path, &output)?;
    info!(path = %path.display(), bytes = output.len(), "rewritten");
    Ok(())
}

pub fn rewrite_file<P: AsRef<Path>>(path: P, options: &RewriteOptions) -> Result<()> {
    rewrite_file_with(path, options, Identity)
}
