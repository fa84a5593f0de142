use crate::event::Attributes;
use crate::indent::IndentedLine;
use crate::resolver::LineEvent;

/// What happens to line breaks inside the text of a content element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentNewlines {
    /// Keep the text exactly as it was read. The element stays one
    /// rendered line with its line breaks inside.
    Verbatim,
    /// Split the element at every `\n` (and a preceding `\r`) into separate
    /// lines, which the sink joins with its configured terminator.
    Terminator,
}

impl Default for ContentNewlines {
    fn default() -> Self {
        ContentNewlines::Verbatim
    }
}

pub fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

pub fn tag_open(name: &str, attrs: &Attributes) -> String {
    format!("<{}{}>", name, render_attrs(attrs))
}

pub fn tag_empty(name: &str, attrs: &Attributes) -> String {
    format!("<{}{} />", name, render_attrs(attrs))
}

pub fn tag_close(name: &str) -> String {
    format!("</{}>", name)
}

fn render_attrs(attrs: &Attributes) -> String {
    let mut buf = String::new();
    for (name, value) in attrs.iter() {
        buf.push(' ');
        buf.push_str(name);
        buf.push('=');
        buf.push_str(&quote_attr(value));
    }
    buf
}

/// Escape an attribute value and wrap it in double quotes.
///
/// Whitespace other than the plain space is written as a character
/// reference, otherwise a parser would normalize it to a space.
pub fn quote_attr(value: &str) -> String {
    let mut buf = String::with_capacity(value.len() + 2);
    buf.push('"');
    for c in value.chars() {
        match c {
            '&' => buf.push_str("&amp;"),
            '<' => buf.push_str("&lt;"),
            '>' => buf.push_str("&gt;"),
            '"' => buf.push_str("&quot;"),
            '\t' => buf.push_str("&#9;"),
            '\n' => buf.push_str("&#10;"),
            '\r' => buf.push_str("&#13;"),
            c => buf.push(c),
        }
    }
    buf.push('"');
    buf
}

/// Turns indented line events into text lines.
#[derive(Debug, Clone, Default)]
pub struct TextRenderer {
    content_newlines: ContentNewlines,
}

impl TextRenderer {
    pub fn new(content_newlines: ContentNewlines) -> TextRenderer {
        TextRenderer { content_newlines }
    }

    pub fn prologue(&self, encoding_label: &str) -> String {
        format!(r#"<?xml version="1.0" encoding="{}"?>"#, encoding_label)
    }

    pub fn render(&self, indented: &IndentedLine) -> Vec<String> {
        let prefix = indent(indented.depth);
        let unit = match &indented.line {
            LineEvent::Start { name, attrs } => tag_open(name, attrs),
            LineEvent::Empty { name, attrs } => tag_empty(name, attrs),
            LineEvent::End { name } => tag_close(name),
            LineEvent::Content {
                name,
                attrs,
                content,
            } => format!("{}{}{}", tag_open(name, attrs), content, tag_close(name)),
        };
        match self.content_newlines {
            ContentNewlines::Verbatim => vec![prefix + &unit],
            ContentNewlines::Terminator => {
                let mut lines: Vec<String> = unit
                    .split('\n')
                    .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
                    .collect();
                lines[0].insert_str(0, &prefix);
                lines
            }
        }
    }
}
