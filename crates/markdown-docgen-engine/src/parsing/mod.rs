//! # Markdown Parsing
//!
//! Turns markdown source into sections of typed content blocks.
//!
//! ## Pipeline
//!
//! 1. **Front matter** (`front_matter`): a leading `---` block is split off
//! 2. **Tree** (`tree`): pulldown-cmark events are folded into [`MdNode`]s
//! 3. **Sections** (`sections`): top-level nodes are grouped at level 1-2 headings
//! 4. **Classification** (`classify`): each node becomes one [`ContentBlock`],
//!    using `inline` for formatting ranges and `list` for list normalization
//!
//! Feature bullets (`features`) are scanned from the raw lines separately.
//!
//! [`ContentBlock`]: crate::models::ContentBlock

pub mod classify;
pub mod features;
pub mod front_matter;
pub mod inline;
pub mod list;
pub mod sections;
pub mod slug;
pub mod tree;

use crate::models::Section;

pub use classify::classify_block;
pub use features::extract_features;
pub use front_matter::{FrontMatter, split_front_matter};
pub use inline::extract_formatting;
pub use list::{NormalizedList, normalize_list};
pub use sections::{count_words, extract_sections, section_metadata};
pub use slug::{canonical_section_id, slugify, strip_decorative_symbols};
pub use tree::{MdNode, parse_markdown};

/// Everything derived from one markdown source file.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSource {
    pub front_matter: FrontMatter,
    pub sections: Vec<Section>,
    pub features: Vec<String>,
    /// Words in the markdown body, front matter excluded.
    pub word_count: usize,
}

/// Parse a markdown source file: front matter, sections and feature bullets.
pub fn parse_source(source: &str) -> ParsedSource {
    let (front_matter, body) = split_front_matter(source);
    let nodes = parse_markdown(body);

    ParsedSource {
        front_matter,
        sections: extract_sections(&nodes),
        features: extract_features(body),
        word_count: count_words(body),
    }
}
