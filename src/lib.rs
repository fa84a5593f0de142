//! Rewrite XML project files without disturbing their layout.
//!
//! A document is tokenized into parse events, each element is classified as
//! empty, text-only or a block with children, and the result is rendered one
//! element per line with two-space indentation. Attribute order, the text of
//! text-only elements and the self-closing form of empty elements survive the
//! round trip, so an edit made through a [`LineTransform`] only shows up as
//! the lines it touched.
//!
//! # Examples
//! ```
//! use xml_roundtrip::{rewrite_str, RewriteOptions};
//!
//! let options = RewriteOptions {
//!     newline: "\n".to_string(),
//!     ..RewriteOptions::default()
//! };
//! let xml = r#"<?xml version="1.0"?><root a="1" b="2"><child/><child2>hi</child2></root>"#;
//! assert_eq!(
//!     rewrite_str(xml, &options).unwrap(),
//!     r#"<?xml version="1.0" encoding="utf-8"?>
//! <root a="1" b="2">
//!   <child />
//!   <child2>hi</child2>
//! </root>"#
//! );
//! ```

mod decode;
mod error;
mod event;
mod indent;
mod pipeline;
mod render;
mod resolver;
mod sink;
mod source;

pub use crate::decode::{decode, encode};
pub use crate::error::{Error, Position, Result};
pub use crate::event::{Attributes, EventSink, ParseEvent};
pub use crate::indent::{IndentTracker, IndentedLine};
pub use crate::pipeline::{
    rewrite_bytes, rewrite_bytes_with, rewrite_file, rewrite_file_with, rewrite_str,
    rewrite_str_with, Echo, Identity, LineTransform, Pipeline, RewriteOptions,
};
pub use crate::render::{quote_attr, ContentNewlines, TextRenderer};
pub use crate::resolver::{LineEvent, ShapeResolver};
pub use crate::sink::{LineSink, LineWriter};
pub use crate::source::parse_str;
