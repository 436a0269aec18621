use webfm::codec::{TOKEN_TAG, decode, decode_opt, encode};

#[test]
fn round_trip_preserves_text() {
    let samples = [
        "docs/2024",
        "Přílohy/zpráva č.1.pdf",
        "a b/c",
        "../../etc/passwd",
        "日本語/ファイル.txt",
        "emoji 🎉 folder",
        "with+plus/and=equals",
        "x",
        " ",
        "   ",
        "",
    ];
    for s in samples {
        assert_eq!(decode(&encode(s)), s, "round trip of {s:?}");
    }
}

#[test]
fn tokens_are_tagged_and_url_safe() {
    let t = encode("Přílohy/zpráva č.1.pdf");
    assert!(t.starts_with(TOKEN_TAG));
    let payload = &t[TOKEN_TAG.len()..];
    assert!(!payload.contains(['+', '/', '=']), "{payload}");
    assert_eq!(encode("docs/2024"), "b64:ZG9jcy8yMDI0");
}

#[test]
fn tag_is_case_insensitive_and_bad_payload_decodes_empty() {
    assert_eq!(decode("B64:ZG9jcy8yMDI0"), "docs/2024");
    assert_eq!(decode("b64:***"), "");
}

#[test]
fn raw_strings_pass_through_trimmed() {
    assert_eq!(decode("  reports/q1.txt "), "reports/q1.txt");
    assert_eq!(decode("   "), "");
    assert_eq!(decode_opt(None), "");
}

#[test]
fn legacy_plain_base64_is_accepted() {
    assert_eq!(decode("aW1hZ2VzLzIwMjQ="), "images/2024");
    // Base64-shaped but undecodable to safe text stays raw.
    assert_eq!(decode("////////"), "////////");
}
