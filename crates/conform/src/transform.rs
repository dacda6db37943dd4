//!
//! Built-in text transforms. Each one is a total, pure `&str -> String`
//! function; none of them consults the registry.
//!

use convert_case::{Boundary, Case, Casing};

///
/// BUILTINS
///
/// Identifier → function table installed by `Registry::with_builtins`.
///

pub const BUILTINS: &[(&str, fn(&str) -> String)] = &[
    ("!alpha", strip_alpha),
    ("!num", strip_num),
    ("alpha", alpha),
    ("camel", camel),
    ("email", email),
    ("lower", lower),
    ("ltrim", ltrim),
    ("name", name),
    ("num", num),
    ("rtrim", rtrim),
    ("slug", slug),
    ("snake", snake),
    ("title", title),
    ("trim", trim),
    ("ucfirst", ucfirst),
    ("upper", upper),
];

//
// ---------------------------------------------------------------------------
// Whitespace
// ---------------------------------------------------------------------------
//

#[must_use]
pub fn trim(s: &str) -> String {
    s.trim().to_string()
}

#[must_use]
pub fn ltrim(s: &str) -> String {
    s.trim_start().to_string()
}

#[must_use]
pub fn rtrim(s: &str) -> String {
    s.trim_end().to_string()
}

//
// ---------------------------------------------------------------------------
// Case
// ---------------------------------------------------------------------------
//

#[must_use]
pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

#[must_use]
pub fn upper(s: &str) -> String {
    s.to_uppercase()
}

/// Uppercase the first character of every whitespace-delimited word.
#[must_use]
pub fn title(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;

    for c in s.chars() {
        if word_start {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        word_start = c.is_whitespace();
    }

    out
}

/// Uppercase the first character; the rest is left as-is.
#[must_use]
pub fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Trim, uppercase the first character, lowercase the remainder.
#[must_use]
pub fn name(s: &str) -> String {
    let mut chars = s.trim().chars();

    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

#[must_use]
pub fn email(s: &str) -> String {
    s.trim().to_lowercase()
}

#[must_use]
pub fn camel(s: &str) -> String {
    s.without_boundaries(&Boundary::digits()).to_case(Case::Camel)
}

#[must_use]
pub fn snake(s: &str) -> String {
    s.without_boundaries(&Boundary::digits()).to_case(Case::Snake)
}

/// Lowercase, hyphen-joined ASCII word sequence. Anything that is not an
/// ASCII letter or digit separates words; digits stay with their run.
#[must_use]
pub fn slug(s: &str) -> String {
    let words: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();

    words
        .without_boundaries(&Boundary::digits())
        .to_case(Case::Kebab)
}

//
// ---------------------------------------------------------------------------
// Character classes
// ---------------------------------------------------------------------------
//

#[must_use]
pub fn num(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

#[must_use]
pub fn strip_num(s: &str) -> String {
    s.chars().filter(|c| !c.is_ascii_digit()).collect()
}

#[must_use]
pub fn alpha(s: &str) -> String {
    s.chars().filter(|c| c.is_alphabetic()).collect()
}

#[must_use]
pub fn strip_alpha(s: &str) -> String {
    s.chars().filter(|c| !c.is_alphabetic()).collect()
}
