//! Encoding trials for legacy exports, which arrive in a mix of UTF-8 and
//! single-byte Western encodings depending on which desktop tool wrote them.

use std::borrow::Cow;

use encoding_rs::{UTF_8, WINDOWS_1252};

/// Candidate text encodings, in trial order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    Utf8Bom,
    Utf8,
    Latin1,
    Windows1252,
    Iso8859_1,
}

impl TextEncoding {
    /// UTF-8 variants first, then the single-byte Western encodings.
    pub const TRIAL_ORDER: [TextEncoding; 5] = [
        TextEncoding::Utf8Bom,
        TextEncoding::Utf8,
        TextEncoding::Latin1,
        TextEncoding::Windows1252,
        TextEncoding::Iso8859_1,
    ];

    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Utf8Bom => "utf-8-sig",
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "latin1",
            TextEncoding::Windows1252 => "windows-1252",
            TextEncoding::Iso8859_1 => "iso-8859-1",
        }
    }

    /// Strict decode of the whole input; `None` if any byte sequence is
    /// invalid under this encoding.
    fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8Bom => {
                let (text, had_errors) = UTF_8.decode_with_bom_removal(bytes);
                (!had_errors).then(|| text.into_owned())
            }
            TextEncoding::Utf8 => UTF_8
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
            // encoding_rs aliases the latin1/iso-8859-1 labels to
            // windows-1252 per the WHATWG standard, so the pure Latin-1
            // byte-to-code-point mapping is spelled out by hand. Every byte
            // is valid, so these trials cannot fail.
            TextEncoding::Latin1 | TextEncoding::Iso8859_1 => {
                Some(bytes.iter().map(|&b| b as char).collect())
            }
            TextEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(Cow::into_owned),
        }
    }
}

/// Decode `bytes` under the first encoding in the trial order that accepts
/// the whole input, returning the winning encoding alongside the text.
pub fn decode_text(bytes: &[u8]) -> Option<(TextEncoding, String)> {
    TextEncoding::TRIAL_ORDER
        .iter()
        .find_map(|&enc| enc.decode(bytes).map(|text| (enc, text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bom_prefixed_utf8_wins_first_trial() {
        let bytes = b"\xef\xbb\xbfSPECIES_LU;3.2";
        let (enc, text) = decode_text(bytes).unwrap();
        assert_eq!(enc, TextEncoding::Utf8Bom);
        assert_eq!(text, "SPECIES_LU;3.2");
    }

    #[test]
    fn plain_ascii_decodes_on_the_first_trial() {
        // The BOM-aware variant accepts BOM-less input, so it always wins
        // for valid UTF-8.
        let (enc, text) = decode_text(b"1;Puma concolor").unwrap();
        assert_eq!(enc, TextEncoding::Utf8Bom);
        assert_eq!(text, "1;Puma concolor");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        // 0xE4 is 'a-umlaut' in Latin-1 but opens an incomplete multi-byte
        // sequence in UTF-8.
        let bytes = [b'B', 0xE4, b'r'];
        let (enc, text) = decode_text(&bytes).unwrap();
        assert_eq!(enc, TextEncoding::Latin1);
        assert_eq!(text, "B\u{e4}r");
    }

    #[test]
    fn arbitrary_bytes_always_decode() {
        let bytes: Vec<u8> = (0..=255).collect();
        assert!(decode_text(&bytes).is_some());
    }

    #[test]
    fn trial_order_is_stable() {
        let names: Vec<&str> = TextEncoding::TRIAL_ORDER
            .iter()
            .map(|enc| enc.name())
            .collect();
        assert_eq!(
            names,
            ["utf-8-sig", "utf-8", "latin1", "windows-1252", "iso-8859-1"]
        );
    }
}
