use crate::error::{Error, Result};
use crate::resolver::LineEvent;

/// A line event with its nesting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndentedLine {
    pub depth: usize,
    pub line: LineEvent,
}

/// Stamps line events with the depth of their position in the nesting.
#[derive(Debug, Default)]
pub struct IndentTracker {
    depth: usize,
}

impl IndentTracker {
    pub fn new() -> IndentTracker {
        IndentTracker { depth: 0 }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn push(&mut self, line: LineEvent) -> Result<IndentedLine> {
        let depth = match &line {
            LineEvent::Start { .. } => {
                self.depth += 1;
                self.depth - 1
            }
            LineEvent::End { name } => {
                self.depth = self
                    .depth
                    .checked_sub(1)
                    .ok_or_else(|| Error::mismatch(None, Some(name.as_str())))?;
                self.depth
            }
            LineEvent::Empty { .. } | LineEvent::Content { .. } => self.depth,
        };
        Ok(IndentedLine { depth, line })
    }

    /// Check that every block has been closed.
    pub fn finish(&self) -> Result<()> {
        if self.depth != 0 {
            return Err(Error::mismatch(None, None));
        }
        Ok(())
    }
}
