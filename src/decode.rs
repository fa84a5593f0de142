use crate::error::{Error, Result};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::borrow::Cow;

/// Detect the encoding of an XML document and decode it.
///
/// A byte order mark wins. Without one, UTF-16 is recognized from the
/// `<?` of the declaration, and ASCII compatible input is decoded with the
/// encoding its declaration names (UTF-8 when there is none).
///
/// # Errors
///
/// - [`Error::CannotDecode`]: the declared encoding is unknown, or the bytes
///   are not valid in the detected encoding.
pub fn decode(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => match bytes {
            [0x00, 0x3c, 0x00, 0x3f, ..] => (UTF_16BE, bytes),
            [0x3c, 0x00, 0x3f, 0x00, ..] => (UTF_16LE, bytes),
            _ => (declared_encoding(bytes)?.unwrap_or(UTF_8), bytes),
        },
    };
    tracing::debug!(encoding = encoding.name(), "decoding input");
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(Error::CannotDecode)
}

/// Encoding named by the XML declaration at the start of `bytes`.
fn declared_encoding(bytes: &[u8]) -> Result<Option<&'static Encoding>> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::with_capacity(100);
    let label = match reader.read_event(&mut buf) {
        Ok(Event::Decl(ev)) => match ev.encoding() {
            Some(label) => label?.into_owned(),
            None => return Ok(None),
        },
        // Not a declaration: the parser will report anything malformed.
        _ => return Ok(None),
    };
    let encoding = Encoding::for_label(&label).ok_or(Error::CannotDecode)?;
    // The bytes are ASCII compatible, so a UTF-16 label cannot be right.
    if !encoding.is_ascii_compatible() {
        return Ok(None);
    }
    Ok(Some(encoding))
}

/// Encode rendered text as UTF-8, optionally with a byte order mark.
pub fn encode(text: &str, write_bom: bool) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len() + 3);
    if write_bom {
        bytes.extend_from_slice(b"\xEF\xBB\xBF");
    }
    bytes.extend_from_slice(text.as_bytes());
    bytes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utf16le(text: &str, bom: bool) -> Vec<u8> {
        let mut bytes = Vec::new();
        if bom {
            bytes.extend_from_slice(&[0xff, 0xfe]);
        }
        for unit in text.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        bytes
    }

    #[test]
    fn test_utf8() {
        assert_eq!(decode(b"<a>\xC3\xA9</a>").unwrap(), "<a>é</a>");
        assert_eq!(decode(b"\xEF\xBB\xBF<a/>").unwrap(), "<a/>");
    }

    #[test]
    fn test_utf16() {
        let text = r#"<?xml version="1.0" encoding="utf-16"?><a b="é"/>"#;
        assert_eq!(decode(&utf16le(text, true)).unwrap(), text);
        assert_eq!(decode(&utf16le(text, false)).unwrap(), text);
    }

    #[test]
    fn test_declared_encoding() {
        let bytes = b"<?xml version=\"1.0\" encoding=\"windows-1252\"?><a>\xE9</a>";
        assert_eq!(
            decode(bytes).unwrap(),
            "<?xml version=\"1.0\" encoding=\"windows-1252\"?><a>é</a>"
        );
    }

    #[test]
    fn test_cannot_decode() {
        assert!(matches!(
            decode(b"<?xml version=\"1.0\" encoding=\"no-such\"?><a/>").unwrap_err(),
            Error::CannotDecode
        ));
        assert!(matches!(
            decode(b"<a>\xFF\xFE\xFD</a>").unwrap_err(),
            Error::CannotDecode
        ));
    }

    #[test]
    fn test_encode() {
        assert_eq!(encode("<a />", true), b"\xEF\xBB\xBF<a />");
        assert_eq!(encode("<a />", false), b"<a />");
    }
}
