//! Text decoding with a Latin-1 fallback.

use encoding_rs::{UTF_8, WINDOWS_1252};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encoding a file was actually decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8,
    /// Windows-1252, the superset browsers and spreadsheets mean by Latin-1.
    Latin1,
}

impl TextEncoding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::Latin1 => "latin-1",
        }
    }
}

/// Decodes bytes as UTF-8, falling back to Latin-1.
///
/// Returns `None` only when the fallback also reports malformed input.
pub fn decode_text(bytes: &[u8]) -> Option<(String, TextEncoding)> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return Some((text.into_owned(), TextEncoding::Utf8));
    }
    let (text, had_errors) = WINDOWS_1252.decode_without_bom_handling(bytes);
    (!had_errors).then(|| (text.into_owned(), TextEncoding::Latin1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_is_preferred_and_bom_stripped() {
        let (text, encoding) = decode_text("\u{feff}Price £5".as_bytes()).expect("decode");
        assert_eq!(text, "Price £5");
        assert_eq!(encoding, TextEncoding::Utf8);
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let (text, encoding) = decode_text(b"Caf\xe9 \xa35").expect("decode");
        assert_eq!(text, "Café £5");
        assert_eq!(encoding, TextEncoding::Latin1);
    }
}
