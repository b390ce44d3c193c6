//! Slug generation for section and heading identifiers.

use regex::Regex;
use std::sync::OnceLock;

/// Emoji that authors put in front of section titles purely for decoration.
///
/// Stripped before deriving canonical section ids so `🚀 Quick Start` and
/// `Quick Start` map to the same id.
pub const DECORATIVE_SYMBOLS: &[char] = &[
    '🏠', '📚', '📖', '🧮', '⚙', '🛠', '💡', '⚡', '🚀', '💾', '🌐', '⚛', '🔌', '✨', '🎨', '📦',
    '🔧', '⭐', '🎯',
];

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Generate a lowercase, hyphenated slug from text.
///
/// Only ASCII word characters, whitespace and hyphens survive; whitespace runs
/// become a single hyphen, repeated hyphens collapse, and leading/trailing
/// hyphens are trimmed. Text without any ASCII word characters yields an
/// empty string.
///
/// ```
/// use markdown_docgen_engine::parsing::slugify;
///
/// assert_eq!(slugify("Getting Started!"), "getting-started");
/// assert_eq!(slugify("API  --  Client"), "api-client");
/// assert_eq!(slugify("Установка"), "");
/// ```
pub fn slugify(text: &str) -> String {
    static DISALLOWED: OnceLock<Regex> = OnceLock::new();
    static WHITESPACE: OnceLock<Regex> = OnceLock::new();
    static HYPHENS: OnceLock<Regex> = OnceLock::new();

    let disallowed =
        DISALLOWED.get_or_init(|| Regex::new(r"[^a-z0-9_\s-]").expect("Invalid slug regex"));
    let whitespace = WHITESPACE.get_or_init(|| Regex::new(r"\s+").expect("Invalid slug regex"));
    let hyphens = HYPHENS.get_or_init(|| Regex::new(r"-+").expect("Invalid slug regex"));

    let lowered = text.to_lowercase();
    let stripped = disallowed.replace_all(&lowered, "");
    let hyphenated = whitespace.replace_all(stripped.trim(), "-");
    let collapsed = hyphens.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Remove decorative emoji (and their variation selectors) from a title.
pub fn strip_decorative_symbols(title: &str) -> String {
    title
        .chars()
        .filter(|c| *c != VARIATION_SELECTOR && !DECORATIVE_SYMBOLS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Slug for a section, falling back to `section-<index>` when the title has
/// nothing slug-worthy in it.
pub fn section_slug(title: &str, index: usize) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        format!("section-{index}")
    } else {
        slug
    }
}

/// Language-independent id for the section at `index`, derived from its title.
pub fn canonical_section_id(title: &str, index: usize) -> String {
    section_slug(&strip_decorative_symbols(title), index)
}
