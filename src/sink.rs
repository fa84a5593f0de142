use crate::error::Result;
use std::io::Write;

/// Destination of rendered lines.
///
/// Line terminators are the sink's business: they go between lines, never
/// after the last one.
///
/// A line is one rendering unit. With [`ContentNewlines::Verbatim`] the text
/// of a content element keeps its own line breaks, so such a unit may span
/// several physical lines and reaches the sink as one call.
///
/// [`ContentNewlines::Verbatim`]: crate::ContentNewlines::Verbatim
pub trait LineSink {
    fn write_line(&mut self, line: &str) -> Result<()>;
}

impl LineSink for Vec<String> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.push(line.to_string());
        Ok(())
    }
}

/// Writes lines to a [`Write`], separated by `newline`.
#[derive(Debug)]
pub struct LineWriter<W: Write> {
    inner: W,
    newline: String,
    started: bool,
}

impl<W: Write> LineWriter<W> {
    pub fn new<S: Into<String>>(inner: W, newline: S) -> LineWriter<W> {
        LineWriter {
            inner,
            newline: newline.into(),
            started: false,
        }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> LineSink for LineWriter<W> {
    fn write_line(&mut self, line: &str) -> Result<()> {
        if self.started {
            self.inner.write_all(self.newline.as_bytes())?;
        }
        self.inner.write_all(line.as_bytes())?;
        self.started = true;
        Ok(())
    }
}
