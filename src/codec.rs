//! Reversible, URL-safe encoding for path-like request parameters.
//!
//! Tokens look like `b64:<urlsafe base64, no padding>`. Decoding never fails:
//! anything that is not a valid token comes back as the trimmed input, with one
//! exception kept for older callers. A bare string that *looks* like classic
//! Base64 and decodes to printable UTF-8 is accepted in decoded form. That legacy
//! path can misfire on plain names that happen to be Base64-shaped; callers
//! depend on it, so it stays.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use tracing::trace;

/// Literal prefix marking an encoded token.
pub const TOKEN_TAG: &str = "b64:";

/// Encode `text` as a tagged URL-safe token.
pub fn encode(text: &str) -> String {
    format!("{TOKEN_TAG}{}", URL_SAFE_NO_PAD.encode(text.as_bytes()))
}

/// Decode a token (or legacy/raw value) into plain text.
pub fn decode(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if let Some(payload) = strip_tag(trimmed) {
        // A tagged value that fails to decode is discarded rather than used raw.
        return decode_url_safe(payload).unwrap_or_default();
    }

    if looks_like_legacy_base64(trimmed)
        && let Some(decoded) = decode_standard(trimmed)
        && !decoded.trim().is_empty()
    {
        trace!(token = trimmed, "decoded legacy base64 parameter");
        return decoded;
    }

    trimmed.to_string()
}

/// Decode an optional parameter; a missing value behaves like an empty one.
pub fn decode_opt(token: Option<&str>) -> String {
    token.map(decode).unwrap_or_default()
}

fn strip_tag(value: &str) -> Option<&str> {
    let head = value.get(..TOKEN_TAG.len())?;
    if head.eq_ignore_ascii_case(TOKEN_TAG) {
        Some(&value[TOKEN_TAG.len()..])
    } else {
        None
    }
}

fn decode_url_safe(payload: &str) -> Option<String> {
    // Accept both alphabets and restore the stripped padding before decoding.
    let mut normalized: String = payload
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();
    let rem = normalized.len() % 4;
    if rem != 0 {
        normalized.extend(std::iter::repeat_n('=', 4 - rem));
    }
    decode_standard(&normalized)
}

fn decode_standard(payload: &str) -> Option<String> {
    let bytes = STANDARD.decode(payload).ok()?;
    let decoded = String::from_utf8(bytes).ok()?;
    is_safe_decoded_value(&decoded).then_some(decoded)
}

/// Length >= 8, a multiple of 4, and only the classic alphabet.
fn looks_like_legacy_base64(value: &str) -> bool {
    value.len() >= 8
        && value.len() % 4 == 0
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'+' || b == b'/' || b == b'=')
}

/// Whitespace-only text is valid here; only the legacy path demands non-blank.
fn is_safe_decoded_value(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(|c| c.is_control() && !c.is_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_uses_tag_and_no_padding() {
        let token = encode("a");
        assert_eq!(token, "b64:YQ");
        assert!(!token.contains('='));
    }

    #[test]
    fn tagged_round_trip_with_unicode_and_separators() {
        for s in ["docs/reports", "Příliš žluťoučký kůň", "a b/c\\d", "?&#%+", "wwwroot/Images"] {
            assert_eq!(decode(&encode(s)), s, "round trip failed for {s:?}");
        }
    }

    #[test]
    fn tag_is_case_insensitive() {
        let token = encode("folder").replacen("b64:", "B64:", 1);
        assert_eq!(decode(&token), "folder");
    }

    #[test]
    fn invalid_tagged_payload_decodes_to_empty() {
        assert_eq!(decode("b64:!!!"), "");
        assert_eq!(decode("b64:"), "");
        // Control characters in the decoded text are refused.
        let token = format!("b64:{}", URL_SAFE_NO_PAD.encode("a\u{0007}b"));
        assert_eq!(decode(&token), "");
    }

    #[test]
    fn whitespace_only_text_survives_tagged_round_trip() {
        for s in [" ", "   ", "\t"] {
            assert_eq!(decode(&encode(s)), s);
        }
        // "    " in classic Base64 is blank and stays raw.
        assert_eq!(decode("ICAgIA=="), "ICAgIA==");
    }

    #[test]
    fn legacy_base64_is_decoded() {
        // "images/2024" in classic Base64
        assert_eq!(decode("aW1hZ2VzLzIwMjQ="), "images/2024");
    }

    #[test]
    fn raw_values_pass_through_trimmed() {
        assert_eq!(decode("  reports/q1  "), "reports/q1");
        assert_eq!(decode("short"), "short");
        // Base64-shaped but not a multiple of 4: untouched.
        assert_eq!(decode("abcdefghi"), "abcdefghi");
        assert_eq!(decode(""), "");
        assert_eq!(decode_opt(None), "");
    }

    #[test]
    fn legacy_shape_that_decodes_to_garbage_falls_through() {
        // Valid Base64 alphabet, but the bytes are not UTF-8.
        assert_eq!(decode("////////"), "////////");
    }
}
