//! Feature bullet extraction.
//!
//! Homepage highlights are authored as emoji-led lines, either a bold bullet
//! (`- 🚀 **Fast** - description`) or a heading (`## ⚡ Reactive`). They are
//! pulled straight from the raw lines, independent of the section tree.

use regex::Regex;
use std::sync::OnceLock;

/// Emoji that mark a line as a feature highlight.
const FEATURE_EMOJI: &str = r"(?:🎯|🚀|💾|🧮|🌐|⚛\x{FE0F}?|⚡|⚙\x{FE0F}?|🔌|✨|🎨|📦|🔧|🛠\x{FE0F}?|⭐)";

fn patterns() -> &'static [Regex; 2] {
    static PATTERNS: OnceLock<[Regex; 2]> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            Regex::new(&format!(
                r"^[\s\-]*{FEATURE_EMOJI}\s*\*\*([^*]+)\*\*\s*[-–—]\s*(.+)"
            ))
            .expect("Invalid feature bullet regex"),
            Regex::new(&format!(r"^#{{1,6}}\s*{FEATURE_EMOJI}\s*(.+)"))
                .expect("Invalid feature heading regex"),
        ]
    })
}

/// Extract feature strings from raw markdown, one per matching line.
///
/// Bullets produce `"<title>: <description>"`, headings produce the bare title.
pub fn extract_features(content: &str) -> Vec<String> {
    let mut features = Vec::new();

    for line in content.lines() {
        for pattern in patterns() {
            let Some(caps) = pattern.captures(line) else {
                continue;
            };
            let title = caps.get(1).map_or("", |m| m.as_str()).trim();
            match caps.get(2) {
                Some(description) => {
                    features.push(format!("{title}: {}", description.as_str().trim()))
                }
                None => features.push(title.to_string()),
            }
            break;
        }
    }

    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("- 🚀 **Fast** - Batched updates", "Fast: Batched updates")]
    #[case("🎯 **Modular** — Use only what you need", "Modular: Use only what you need")]
    #[case("  - ⚙️ **Configurable** – Middlewares ", "Configurable: Middlewares")]
    #[case("## ⚡ Reactive effects", "Reactive effects")]
    #[case("###✨Selectors", "Selectors")]
    fn test_feature_lines(#[case] line: &str, #[case] expected: &str) {
        assert_eq!(extract_features(line), vec![expected.to_string()]);
    }

    #[rstest]
    #[case("- **Fast** - no emoji")]
    #[case("- 💡 **Tip** - not a feature emoji")]
    #[case("## Plain heading")]
    #[case("- 🚀 **Missing separator**")]
    fn test_non_feature_lines(#[case] line: &str) {
        assert!(extract_features(line).is_empty());
    }

    #[test]
    fn test_bullet_pattern_wins_over_heading() {
        let md = "# Storage\n\n- 💾 **Universal** - One API\n## 📦 Small bundle\ntext";
        assert_eq!(
            extract_features(md),
            vec!["Universal: One API".to_string(), "Small bundle".to_string()]
        );
    }
}
