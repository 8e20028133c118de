//! Identifier sanitizing for table and column names.
//!
//! [`slugify()`] keeps word characters, whitespace, and the punctuation
//! allow-list `/ % . ' " ( )`, drops everything else, trims the result, and
//! collapses whitespace runs into a single underscore.

use std::sync::OnceLock;

use regex::Regex;

static DISALLOWED: OnceLock<Regex> = OnceLock::new();
static WHITESPACE: OnceLock<Regex> = OnceLock::new();

fn disallowed() -> &'static Regex {
    DISALLOWED.get_or_init(|| Regex::new(r#"[^\w\s/%.'"()]+"#).expect("valid slug regex"))
}

fn whitespace() -> &'static Regex {
    WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("valid whitespace regex"))
}

pub fn slugify(text: &str) -> String {
    let kept = disallowed().replace_all(text, "");
    whitespace().replace_all(kept.trim(), "_").into_owned()
}

/// Returns true when `c` survives [`slugify()`] unchanged.
/// Whitespace is excluded since it never survives as itself.
pub fn is_allowed_char(c: char) -> bool {
    let mut buf = [0u8; 4];
    !c.is_whitespace() && !disallowed().is_match(c.encode_utf8(&mut buf))
}
