//! Markup stripping for user-supplied text.
//!
//! Every tag and attribute is removed. The contents of elements that never
//! hold displayable text (`script`, `style`, `textarea`, `option`,
//! `noscript`) are removed along with their tags; the contents of all other
//! elements are kept. Comments are dropped. The result is trimmed.

use std::sync::LazyLock;

use regex::Regex;

static NON_TEXT_ELEMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<(script|style|textarea|option|noscript)\b[^>]*>.*?</(script|style|textarea|option|noscript)\s*>",
    )
    .expect("non-text element pattern is valid")
});

static UNCLOSED_NON_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style|textarea|option|noscript)\b[^>]*>.*$")
        .expect("unclosed non-text element pattern is valid")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?(-->|$)").expect("comment pattern is valid"));

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)</?[A-Za-z!?/][^<>"']*(?:(?:"[^"]*"|'[^']*')[^<>"']*)*>"#)
        .expect("tag pattern is valid")
});

/// Strip markup from a single string and trim it.
pub fn sanitize_text(input: &str) -> String {
    let mut text = input.to_owned();
    // Removing one element can splice a new one together (`<scr<script></script>ipt>`),
    // so repeat until nothing changes.
    loop {
        let next = strip_once(&text);
        if next == text {
            break;
        }
        text = next;
    }
    text.trim().to_owned()
}

fn strip_once(input: &str) -> String {
    let text = COMMENT_RE.replace_all(input, "");
    let text = NON_TEXT_ELEMENT_RE.replace_all(&text, "");
    let text = UNCLOSED_NON_TEXT_RE.replace_all(&text, "");
    TAG_RE.replace_all(&text, "").into_owned()
}

/// Sanitize an arbitrary JSON value.
///
/// Strings are stripped; for objects every string-valued entry is stripped
/// and other entries are left as they are; any other value is returned
/// unchanged.
pub fn sanitize_value(value: serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::String(s) => serde_json::Value::String(sanitize_text(&s)),
        serde_json::Value::Object(map) => serde_json::Value::Object(
            map.into_iter()
                .map(|(k, v)| match v {
                    serde_json::Value::String(s) => (k, serde_json::Value::String(sanitize_text(&s))),
                    other => (k, other),
                })
                .collect(),
        ),
        other => other,
    }
}
