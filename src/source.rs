use crate::error::{Error, Position, Result};
use crate::event::{Attributes, EventSink, ParseEvent};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::borrow::Cow;
use tracing::{trace, warn};

fn element_name(name: &[u8]) -> Result<String> {
    Ok(String::from_utf8(name.to_vec())?)
}

/// Replace literal tabs and line breaks in a raw attribute value with spaces,
/// the way a conforming parser reads them. `\r\n` is a single line break.
/// Runs before unescaping so that `&#10;` and friends keep their meaning.
fn normalize_attr(raw: &[u8]) -> Cow<[u8]> {
    if !raw.iter().any(|b| matches!(b, b'\t' | b'\n' | b'\r')) {
        return Cow::Borrowed(raw);
    }
    let mut normalized = Vec::with_capacity(raw.len());
    let mut bytes = raw.iter().copied().peekable();
    while let Some(b) = bytes.next() {
        match b {
            b'\r' => {
                bytes.next_if_eq(&b'\n');
                normalized.push(b' ');
            }
            b'\t' | b'\n' => normalized.push(b' '),
            b => normalized.push(b),
        }
    }
    Cow::Owned(normalized)
}

fn read_attributes(ev: &BytesStart) -> Result<Attributes> {
    let mut attrs = Attributes::new();
    for attr in ev.attributes() {
        let attr = attr?;
        let key = String::from_utf8(attr.key.to_vec())?;
        let raw = normalize_attr(&attr.value);
        let value = unescape(&raw).map_err(quick_xml::Error::EscapeError)?;
        let value = String::from_utf8(value.into_owned())?;
        attrs.push(key, value)?;
    }
    Ok(attrs)
}

/// Tokenize `text` and push its parse events into `sink`.
///
/// Character data is forwarded in its escaped form, CDATA sections
/// including their markers. Comments, processing instructions and the
/// doctype are not part of the event model and are dropped.
///
/// Errors of the tokenizer and of `sink` are annotated with the position
/// of the event that caused them.
pub fn parse_str<S: EventSink>(text: &str, sink: &mut S) -> Result<()> {
    let mut reader = Reader::from_str(text);
    reader
        .trim_text(false)
        .expand_empty_elements(true)
        .check_end_names(true);

    let mut buf = Vec::with_capacity(200);
    sink.push(ParseEvent::DocStart)?;
    loop {
        let offset = reader.buffer_position();
        let at = |err: Error| err.at(Position::locate(text, offset));
        let event = match reader.read_event(&mut buf).map_err(|e| at(Error::from(e)))? {
            Event::Start(ref ev) => Some(ParseEvent::ElemStart {
                name: element_name(ev.name()).map_err(at)?,
                attrs: read_attributes(ev).map_err(at)?,
            }),
            Event::End(ref ev) => Some(ParseEvent::ElemEnd {
                name: element_name(ev.name()).map_err(at)?,
            }),
            Event::Text(ev) => {
                if ev.escaped().is_empty() {
                    None
                } else {
                    let content = String::from_utf8(ev.escaped().to_vec());
                    Some(ParseEvent::Chars {
                        content: content.map_err(|e| at(e.into()))?,
                    })
                }
            }
            Event::CData(ev) => {
                let inner = std::str::from_utf8(&ev).map_err(|e| at(e.into()))?;
                Some(ParseEvent::Chars {
                    content: format!("<![CDATA[{}]]>", inner),
                })
            }
            Event::Decl(_) => {
                trace!("declaration replaced by the rendered prologue");
                None
            }
            Event::Comment(_) => {
                warn!(position = %Position::locate(text, offset), "dropping comment");
                None
            }
            Event::PI(_) => {
                let position = Position::locate(text, offset);
                warn!(%position, "dropping processing instruction");
                None
            }
            Event::DocType(_) => {
                warn!(position = %Position::locate(text, offset), "dropping doctype");
                None
            }
            Event::Eof => {
                sink.push(ParseEvent::DocEnd).map_err(at)?;
                return Ok(());
            }
            // Expanded into Start and End by the reader.
            Event::Empty(_) => None,
        };
        if let Some(event) = event {
            trace!(?event);
            sink.push(event).map_err(at)?;
        }
        buf.clear();
    }
}
