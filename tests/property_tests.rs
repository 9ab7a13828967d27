//! Property-based tests for the plist builder
//!
//! These tests use proptest to verify:
//! 1. Roundtrip property: render(value) -> parse == original
//! 2. Structural properties: dict pairing errors, data whitespace tolerance

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use proptest::prelude::*;
use xplist::{from_str, ErrorKind, Value};

/// Render a Value to plist XML (test-only; the crate itself is parse-only)
fn render_value(value: &Value, out: &mut String) {
    match value {
        Value::Boolean(true) => out.push_str("<true/>"),
        Value::Boolean(false) => out.push_str("<false/>"),
        Value::Integer(n) => {
            out.push_str(&format!("<integer>{n}</integer>"));
        }
        Value::Real(n) => {
            out.push_str(&format!("<real>{n}</real>"));
        }
        Value::String(s) => {
            out.push_str(&format!("<string>{}</string>", escape_xml(s)));
        }
        Value::Data(d) => {
            out.push_str(&format!("<data>{}</data>", BASE64_STANDARD.encode(d)));
        }
        Value::Date(_) => {
            // arbitrary trees never generate dates; see strategy below
        }
        Value::Array(arr) => {
            out.push_str("<array>");
            for item in arr {
                render_value(item, out);
            }
            out.push_str("</array>");
        }
        Value::Dictionary(dict) => {
            out.push_str("<dict>");
            for (key, item) in dict {
                out.push_str(&format!("<key>{}</key>", escape_xml(key)));
                render_value(item, out);
            }
            out.push_str("</dict>");
        }
    }
}

fn render_document(value: &Value) -> String {
    let mut out = String::from("<plist version=\"1.0\">");
    render_value(value, &mut out);
    out.push_str("</plist>");
    out
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Strategy for dictionary keys
fn arb_key() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_]{1,12}"
}

/// Strategy for string contents. Whitespace-only runs between markup are
/// dropped by the XML layer, so generated strings are either empty or carry
/// at least one non-whitespace character.
fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 _&<>./-]{0,24}"
        .prop_filter("whitespace-only strings do not survive the XML layer", |s| {
            s.is_empty() || !s.trim().is_empty()
        })
}

/// Strategy for arbitrary plist values
fn arb_plist_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::Boolean),
        any::<i64>().prop_map(Value::Integer),
        (-1e9f64..1e9f64).prop_map(Value::Real),
        arb_text().prop_map(Value::String),
        prop::collection::vec(any::<u8>(), 0..32).prop_map(Value::Data),
    ];

    leaf.prop_recursive(6, 64, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(|v| Value::Array(v.into())),
            prop::collection::hash_map(arb_key(), inner, 0..8)
                .prop_map(|m| Value::Dictionary(m.into_iter().collect())),
        ]
    })
}

proptest! {
    /// Rendering a value tree to plist XML and parsing it back returns the
    /// original tree.
    #[test]
    fn roundtrip(value in arb_plist_value()) {
        let document = render_document(&value);
        let parsed = from_str(&document);
        prop_assert!(parsed.is_ok(), "failed to parse rendered document: {document}");
        prop_assert_eq!(parsed.ok(), Some(value));
    }

    /// Array length always equals the number of rendered children.
    #[test]
    fn array_length_preserved(items in prop::collection::vec(any::<bool>().prop_map(Value::Boolean), 0..16)) {
        let value = Value::Array(items.clone().into());
        let parsed = from_str(&render_document(&value));
        prop_assert_eq!(
            parsed.ok().and_then(|v| v.as_array().map(|a| a.len())),
            Some(items.len())
        );
    }

    /// A dict whose last key has no value always fails naming that key.
    #[test]
    fn dangling_key_always_fails(key in arb_key()) {
        let document = format!(
            "<plist><dict><key>{key}</key><integer>1</integer><key>{key}2</key></dict></plist>"
        );
        let err = from_str(&document).unwrap_err();
        prop_assert_eq!(
            err.kind(),
            &ErrorKind::MissingValue { key: format!("{key}2") }
        );
    }

    /// Base64 data survives arbitrary interior whitespace: decoding the
    /// result and re-encoding reproduces the whitespace-free content.
    #[test]
    fn data_whitespace_insensitive(
        bytes in prop::collection::vec(any::<u8>(), 0..32),
        splits in prop::collection::vec(0usize..64, 0..6),
    ) {
        let mut encoded = BASE64_STANDARD.encode(&bytes);
        for split in splits {
            let at = split % (encoded.len() + 1);
            if encoded.is_char_boundary(at) {
                encoded.insert_str(at, "\n  ");
            }
        }
        let document = format!("<plist><data>{encoded}</data></plist>");
        let parsed = from_str(&document);
        let data = parsed.ok().and_then(|v| v.as_data().map(<[u8]>::to_vec));
        prop_assert_eq!(data.as_deref(), Some(bytes.as_slice()));
        prop_assert_eq!(
            data.map(|d| BASE64_STANDARD.encode(d)),
            Some(BASE64_STANDARD.encode(&bytes))
        );
    }

    /// Integer text round-trips through decimal parsing.
    #[test]
    fn integer_roundtrip(n in any::<i64>()) {
        let parsed = from_str(&format!("<plist><integer>{n}</integer></plist>"));
        prop_assert_eq!(parsed.ok(), Some(Value::Integer(n)));
    }
}
