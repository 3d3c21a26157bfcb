//! Label to slug normalization.
//!
//! Every taxonomy label, calendar key and helper call goes through
//! [`slugify`], so two labels that differ only by case or punctuation land
//! on the same slug:
//!
//! - `"Web Design"` → `"web-design"`
//! - `"web design!"` → `"web-design!"` (only the fixed set below is removed)
//! - `"C++ (Advanced)"` → `"c-advanced"`
//! - `"Café Society"` → `"cafe-society"`
//!
//! ## Rules
//!
//! 1. Non-ASCII characters are transliterated (`é` → `e`, `Æ` → `AE`).
//! 2. A literal `-` counts as a separator, same as whitespace.
//! 3. The characters `& , + ( ) $ ~ % . ' " : * ? < > { }` are dropped.
//! 4. Leading and trailing separators are trimmed, inner runs collapse to one `-`.
//! 5. The result is lower-cased.
//!
//! The function is idempotent: calendar slugs are re-slugged when grouped by
//! date, and `"2024-01-15"` must come back unchanged.

/// Characters dropped from labels before separators are collapsed.
const REMOVED_CHARS: &[char] = &[
    '&', ',', '+', '(', ')', '$', '~', '%', '.', '\'', '"', ':', '*', '?', '<', '>', '{', '}',
];

const SEPARATOR: char = '-';

/// Canonicalize a label into a URL-safe slug.
///
/// Returns an empty string when nothing survives normalization (for example
/// a label made only of removed punctuation). Callers decide what an empty
/// slug means for them.
pub fn slugify(label: &str) -> String {
    let mut spaced = String::with_capacity(label.len());
    for c in label.chars() {
        push_transliterated(c, &mut spaced);
    }

    let mut slug = String::with_capacity(spaced.len());
    for word in spaced.split(|c: char| c.is_whitespace() || c == SEPARATOR) {
        if word.is_empty() {
            continue;
        }
        if !slug.is_empty() {
            slug.push(SEPARATOR);
        }
        slug.push_str(word);
    }
    slug.to_lowercase()
}

/// Append `c` (or its ASCII transliteration) to `out`, dropping removed characters.
fn push_transliterated(c: char, out: &mut String) {
    if c.is_ascii() {
        if !REMOVED_CHARS.contains(&c) {
            out.push(c);
        }
        return;
    }
    match deunicode::deunicode_char(c) {
        Some(ascii) => out.extend(ascii.chars().filter(|c| !REMOVED_CHARS.contains(c))),
        None => out.push(c),
    }
}
