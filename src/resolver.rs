//! Classification of elements into line shapes.
//!
//! The tokenizer does not say whether an element is empty, holds only text,
//! or holds child elements. [`ShapeResolver`] finds out by holding on to each
//! start tag until the following event arrives. The event that settles the
//! question is either consumed by the decision or handed back as a leftover
//! and decided on again, so nothing is lost between siblings.

use crate::error::{Error, Result};
use crate::event::{Attributes, ParseEvent};
use tracing::trace;

/// One rendering unit of an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineEvent {
    /// Opens a block. The element has child elements.
    Start { name: String, attrs: Attributes },
    /// Element without any content, rendered self-closing.
    Empty { name: String, attrs: Attributes },
    /// Element whose only content is text, rendered on one unit.
    Content {
        name: String,
        attrs: Attributes,
        content: String,
    },
    /// Closes a block opened by [`LineEvent::Start`].
    End { name: String },
}

impl LineEvent {
    pub fn name(&self) -> &str {
        match self {
            LineEvent::Start { name, .. }
            | LineEvent::Empty { name, .. }
            | LineEvent::Content { name, .. }
            | LineEvent::End { name } => name,
        }
    }

    pub fn attrs(&self) -> Option<&Attributes> {
        match self {
            LineEvent::Start { attrs, .. }
            | LineEvent::Empty { attrs, .. }
            | LineEvent::Content { attrs, .. } => Some(attrs),
            LineEvent::End { .. } => None,
        }
    }

    pub fn attrs_mut(&mut self) -> Option<&mut Attributes> {
        match self {
            LineEvent::Start { attrs, .. }
            | LineEvent::Empty { attrs, .. }
            | LineEvent::Content { attrs, .. } => Some(attrs),
            LineEvent::End { .. } => None,
        }
    }
}

#[derive(Debug)]
enum State {
    Idle,
    /// A start tag waiting for the event that decides its shape.
    Opened { name: String, attrs: Attributes },
    /// A start tag followed by character data.
    Text {
        name: String,
        attrs: Attributes,
        content: String,
    },
}

/// XML whitespace, the only text that may sit between child elements.
pub(crate) fn is_whitespace(text: &str) -> bool {
    text.bytes()
        .all(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n'))
}

#[derive(Debug)]
pub struct ShapeResolver {
    state: State,
    /// Elements rendered as blocks that are still open.
    open: Vec<String>,
    seen_element: bool,
    finished: bool,
}

impl Default for ShapeResolver {
    fn default() -> Self {
        ShapeResolver::new()
    }
}

impl ShapeResolver {
    pub fn new() -> ShapeResolver {
        ShapeResolver {
            state: State::Idle,
            open: Vec::new(),
            seen_element: false,
            finished: false,
        }
    }

    /// Whether `DocEnd` has been seen with all elements closed.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Feed one parse event. Line events that became decidable are
    /// appended to `out`.
    pub fn push(&mut self, event: ParseEvent, out: &mut Vec<LineEvent>) -> Result<()> {
        let mut pending = Some(event);
        while let Some(event) = pending.take() {
            pending = match std::mem::replace(&mut self.state, State::Idle) {
                State::Idle => self.on_idle(event, out)?,
                State::Opened { name, attrs } => self.after_start(name, attrs, event, out)?,
                State::Text {
                    name,
                    attrs,
                    content,
                } => self.after_text(name, attrs, content, event, out)?,
            };
        }
        Ok(())
    }

    fn on_idle(
        &mut self,
        event: ParseEvent,
        out: &mut Vec<LineEvent>,
    ) -> Result<Option<ParseEvent>> {
        match event {
            ParseEvent::DocStart => {}
            ParseEvent::DocEnd => {
                if let Some(name) = self.open.last() {
                    return Err(Error::mismatch(Some(name.as_str()), None));
                }
                if !self.seen_element {
                    return Err(Error::malformed("No root element"));
                }
                self.finished = true;
            }
            ParseEvent::ElemStart { name, attrs } => {
                if self.seen_element && self.open.is_empty() {
                    return Err(Error::malformed("Multiple root elements"));
                }
                self.seen_element = true;
                self.state = State::Opened { name, attrs };
            }
            ParseEvent::ElemEnd { name } => {
                match self.open.pop() {
                    Some(open) if open == name => {}
                    open => return Err(Error::mismatch(open.as_deref(), Some(name.as_str()))),
                }
                out.push(LineEvent::End { name });
            }
            ParseEvent::Chars { content } => {
                if !is_whitespace(&content) {
                    return Err(match self.open.last() {
                        Some(parent) => Error::UnsupportedShape {
                            element: parent.clone(),
                            text: content,
                            position: None,
                        },
                        None => Error::malformed("Text outside of the root element"),
                    });
                }
                trace!("skipping formatting whitespace");
            }
        }
        Ok(None)
    }

    fn after_start(
        &mut self,
        name: String,
        attrs: Attributes,
        event: ParseEvent,
        out: &mut Vec<LineEvent>,
    ) -> Result<Option<ParseEvent>> {
        match event {
            ParseEvent::ElemEnd { name: end } => {
                if end != name {
                    return Err(Error::mismatch(Some(name.as_str()), Some(end.as_str())));
                }
                out.push(LineEvent::Empty { name, attrs });
                Ok(None)
            }
            ParseEvent::Chars { content } => {
                self.state = State::Text {
                    name,
                    attrs,
                    content,
                };
                Ok(None)
            }
            event => {
                self.open_block(name, attrs, out);
                Ok(Some(event))
            }
        }
    }

    fn after_text(
        &mut self,
        name: String,
        attrs: Attributes,
        mut content: String,
        event: ParseEvent,
        out: &mut Vec<LineEvent>,
    ) -> Result<Option<ParseEvent>> {
        match event {
            ParseEvent::Chars { content: chunk } => {
                content.push_str(&chunk);
                self.state = State::Text {
                    name,
                    attrs,
                    content,
                };
                Ok(None)
            }
            ParseEvent::ElemEnd { name: end } => {
                if end != name {
                    return Err(Error::mismatch(Some(name.as_str()), Some(end.as_str())));
                }
                out.push(LineEvent::Content {
                    name,
                    attrs,
                    content,
                });
                Ok(None)
            }
            ParseEvent::DocEnd => Err(Error::mismatch(Some(name.as_str()), None)),
            event => {
                if !is_whitespace(&content) {
                    return Err(Error::UnsupportedShape {
                        element: name,
                        text: content,
                        position: None,
                    });
                }
                self.open_block(name, attrs, out);
                Ok(Some(event))
            }
        }
    }

    fn open_block(&mut self, name: String, attrs: Attributes, out: &mut Vec<LineEvent>) {
        self.open.push(name.clone());
        out.push(LineEvent::Start { name, attrs });
    }
}
