use std::borrow::Cow;

use encoding_rs::{Encoding, GB18030, UTF_8};
use tracing::debug;

/// Decodes raw text input. A byte-order mark wins; otherwise UTF-8 is tried
/// first and GB18030 (which covers GBK/GB2312 exports) is the fallback.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, _) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        return text;
    }

    if let Some(text) = UTF_8.decode_without_bom_handling_and_without_replacement(bytes) {
        return text;
    }

    let (text, _, had_errors) = GB18030.decode(bytes);
    debug!(had_errors, "input is not UTF-8, decoded as GB18030");
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_passes_through() {
        assert_eq!(decode_text("血糖 5.6 mmol/L".as_bytes()), "血糖 5.6 mmol/L");
    }

    #[test]
    fn utf8_bom_is_stripped() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice(b"LDL-C 3.1");
        assert_eq!(decode_text(&bytes), "LDL-C 3.1");
    }

    #[test]
    fn gbk_bytes_fall_back_to_gb18030() {
        let (encoded, _, _) = GB18030.encode("总胆固醇偏高");
        assert!(std::str::from_utf8(&encoded).is_err());
        assert_eq!(decode_text(&encoded), "总胆固醇偏高");
    }

    #[test]
    fn utf16_with_bom_is_decoded() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "HbA1c".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_text(&bytes), "HbA1c");
    }
}
