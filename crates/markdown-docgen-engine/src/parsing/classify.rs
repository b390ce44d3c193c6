//! Block classification: one markdown node in, at most one content block out.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::{
    Blockquote, CalloutKind, CodeBlock, ContentBlock, Diagram, Heading, RawMarkup, RowKind, Table,
    TableRow,
};

use super::{
    inline::extract_formatting,
    list::{NormalizedList, normalize_list},
    slug::slugify,
    tree::MdNode,
};

/// Fenced code languages rendered as diagrams instead of source code.
pub const DIAGRAM_LANGUAGES: &[&str] = &[
    "mermaid",
    "plantuml",
    "puml",
    "graphviz",
    "dot",
    "flowchart",
    "sequence",
];

/// Emoji recognized at the start of a blockquote.
///
/// Variants with a trailing variation selector come first so the longer form
/// wins when both would match.
const CALLOUT_EMOJI: &[&str] = &[
    "\u{26A0}\u{FE0F}",
    "\u{2139}\u{FE0F}",
    "\u{269B}\u{FE0F}",
    "\u{2699}\u{FE0F}",
    "\u{1F6E0}\u{FE0F}",
    "⚠",
    "ℹ",
    "⚛",
    "⚙",
    "🛠",
    "💡",
    "🚀",
    "🔎",
    "📝",
    "🎯",
    "💾",
    "🧮",
    "🌐",
    "⚡",
    "🔌",
    "✨",
    "🎨",
    "📦",
    "🔧",
    "⭐",
];

/// Classify a block-level node.
///
/// Returns `None` for node kinds that have no content block counterpart;
/// unknown markdown extensions are dropped rather than treated as errors.
pub fn classify_block(node: &MdNode) -> Option<ContentBlock> {
    match node {
        MdNode::Paragraph(children) => Some(ContentBlock::Paragraph(extract_formatting(children))),
        MdNode::Heading { depth, children } => Some(ContentBlock::Heading(heading(*depth, children))),
        MdNode::List { ordered, children } => Some(match normalize_list(*ordered, children, 0) {
            NormalizedList::Regular(items) => ContentBlock::List(items),
            NormalizedList::Tasks(items) => ContentBlock::TaskList(items),
        }),
        MdNode::Table(rows) => Some(ContentBlock::Table(table(rows))),
        MdNode::Code { lang, meta, value } => Some(code(lang.as_deref(), meta.as_deref(), value)),
        MdNode::Blockquote(children) => Some(ContentBlock::Blockquote(blockquote(children))),
        MdNode::ThematicBreak => Some(ContentBlock::Divider),
        MdNode::Break => Some(ContentBlock::LineBreak),
        MdNode::Html(content) | MdNode::InlineHtml(content) => {
            Some(ContentBlock::RawMarkup(RawMarkup {
                content: content.clone(),
            }))
        }
        MdNode::ListItem { .. }
        | MdNode::TableRow(_)
        | MdNode::TableCell(_)
        | MdNode::Text(_)
        | MdNode::InlineCode(_)
        | MdNode::Emphasis(_)
        | MdNode::Strong(_)
        | MdNode::Delete(_)
        | MdNode::Link { .. }
        | MdNode::Image { .. }
        | MdNode::Unsupported { .. } => None,
    }
}

/// Build a heading block from a heading node's children.
pub(crate) fn heading(depth: u8, children: &[MdNode]) -> Heading {
    let text = flatten(children);
    Heading {
        id: slugify(&text),
        text,
        level: depth,
    }
}

pub(crate) fn flatten(children: &[MdNode]) -> String {
    children.iter().map(MdNode::plain_text).collect()
}

fn table(rows: &[MdNode]) -> Table {
    let mut table = Table::default();

    for (index, row) in rows.iter().enumerate() {
        let MdNode::TableRow(cells) = row else {
            continue;
        };
        let cells: Vec<String> = cells
            .iter()
            .filter(|cell| matches!(cell, MdNode::TableCell(_)))
            .map(|cell| cell.plain_text().trim().to_string())
            .collect();

        if index == 0 {
            table.headers = cells.clone();
            table.rows.push(TableRow {
                cells,
                kind: RowKind::Header,
            });
        } else {
            table.rows.push(TableRow {
                cells,
                kind: RowKind::Data,
            });
        }
    }

    table
}

fn code(lang: Option<&str>, meta: Option<&str>, value: &str) -> ContentBlock {
    if let Some(lang) = lang
        && is_diagram_language(lang)
    {
        return ContentBlock::Diagram(Diagram {
            code: value.to_string(),
            title: meta.and_then(diagram_title),
        });
    }

    ContentBlock::Code(CodeBlock {
        language: lang.unwrap_or("text").to_string(),
        code: value.to_string(),
        filename: meta.and_then(code_filename),
        meta: meta.map(str::to_string),
    })
}

pub fn is_diagram_language(lang: &str) -> bool {
    DIAGRAM_LANGUAGES
        .iter()
        .any(|candidate| candidate.eq_ignore_ascii_case(lang))
}

/// Diagram title from fence meta: `title="X"`, `title: "X"` or `{title: "X"}`.
fn diagram_title(meta: &str) -> Option<String> {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            r#"title=["']([^"']+)["']"#,
            r#"title:\s*["']([^"']+)["']"#,
            r#"\{[^}]*title:\s*["']([^"']+)["'][^}]*\}"#,
        ]
        .iter()
        .map(|p| Regex::new(p).expect("Invalid diagram title regex"))
        .collect()
    });

    patterns
        .iter()
        .find_map(|re| re.captures(meta))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Filename from fence meta: `title=x`/`filename=x`, else the first token.
fn code_filename(meta: &str) -> Option<String> {
    static FILENAME: OnceLock<Regex> = OnceLock::new();
    let re = FILENAME.get_or_init(|| {
        Regex::new(r#"(?:title|filename)=["']?([^"'\s]+)["']?|^(\S+)"#)
            .expect("Invalid filename regex")
    });

    let caps = re.captures(meta)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .map(|m| m.as_str().to_string())
}

fn blockquote(children: &[MdNode]) -> Blockquote {
    let content: Vec<ContentBlock> = children.iter().filter_map(classify_block).collect();

    let emoji = content
        .iter()
        .find_map(|block| match block {
            ContentBlock::Paragraph(p) => Some(p),
            _ => None,
        })
        .and_then(|p| leading_emoji(&p.text));

    Blockquote {
        kind: emoji.and_then(callout_kind),
        emoji: emoji.map(str::to_string),
        content,
    }
}

fn leading_emoji(text: &str) -> Option<&'static str> {
    CALLOUT_EMOJI
        .iter()
        .find(|emoji| text.starts_with(**emoji))
        .copied()
}

fn callout_kind(emoji: &str) -> Option<CalloutKind> {
    match emoji.trim_end_matches('\u{FE0F}') {
        "💡" | "🚀" => Some(CalloutKind::Tip),
        "⚠" => Some(CalloutKind::Warning),
        "ℹ" | "🔎" => Some(CalloutKind::Info),
        "📝" => Some(CalloutKind::Note),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormattingRange, ListKind};
    use crate::parsing::tree::parse_markdown;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn classify(markdown: &str) -> Option<ContentBlock> {
        let nodes = parse_markdown(markdown);
        assert_eq!(nodes.len(), 1, "expected one node for {markdown:?}: {nodes:?}");
        classify_block(&nodes[0])
    }

    #[test]
    fn test_paragraph() {
        let Some(ContentBlock::Paragraph(p)) = classify("Hello **world**") else {
            panic!("Expected paragraph");
        };
        assert_eq!(p.text, "Hello world");
        assert_eq!(p.formatting.bold, vec![FormattingRange { start: 6, end: 11 }]);
    }

    #[test]
    fn test_heading_strips_markup() {
        assert_eq!(
            classify("### The `store` *API*"),
            Some(ContentBlock::Heading(Heading {
                text: "The store API".to_string(),
                level: 3,
                id: "the-store-api".to_string(),
            }))
        );
    }

    #[rstest]
    #[case("mermaid")]
    #[case("Mermaid")]
    #[case("plantuml")]
    #[case("puml")]
    #[case("graphviz")]
    #[case("dot")]
    #[case("flowchart")]
    #[case("sequence")]
    fn test_diagram_languages(#[case] lang: &str) {
        let md = format!("```{lang}\ngraph TD; A-->B\n```");
        assert_eq!(
            classify(&md),
            Some(ContentBlock::Diagram(Diagram {
                code: "graph TD; A-->B".to_string(),
                title: None,
            }))
        );
    }

    #[rstest]
    #[case(r#"title="Data flow""#, Some("Data flow"))]
    #[case(r#"title: 'Data flow'"#, Some("Data flow"))]
    #[case(r#"{theme: "dark", title: "Data flow"}"#, Some("Data flow"))]
    #[case("nothing here", None)]
    fn test_diagram_title_patterns(#[case] meta: &str, #[case] expected: Option<&str>) {
        let md = format!("```mermaid {meta}\ngraph TD; A-->B\n```");
        let Some(ContentBlock::Diagram(diagram)) = classify(&md) else {
            panic!("Expected diagram");
        };
        assert_eq!(diagram.title.as_deref(), expected);
    }

    #[test]
    fn test_code_defaults_to_text() {
        assert_eq!(
            classify("```\nplain\n```"),
            Some(ContentBlock::Code(CodeBlock {
                language: "text".to_string(),
                code: "plain".to_string(),
                filename: None,
                meta: None,
            }))
        );
    }

    #[rstest]
    #[case(r#"filename="store.ts""#, Some("store.ts"))]
    #[case("title=main.rs", Some("main.rs"))]
    #[case("src/index.ts {1,3}", Some("src/index.ts"))]
    fn test_code_filename_from_meta(#[case] meta: &str, #[case] expected: Option<&str>) {
        let md = format!("```ts {meta}\nconst a = 1\n```");
        let Some(ContentBlock::Code(code)) = classify(&md) else {
            panic!("Expected code block");
        };
        assert_eq!(code.language, "ts");
        assert_eq!(code.filename.as_deref(), expected);
        assert_eq!(code.meta.as_deref(), Some(meta));
    }

    #[test]
    fn test_table_rows_are_tagged() {
        let Some(ContentBlock::Table(table)) =
            classify("| Name | **Size** |\n|---|---|\n| core | 42KB |\n| api | 10KB |")
        else {
            panic!("Expected table");
        };
        assert_eq!(table.headers, vec!["Name", "Size"]);
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.rows[0].kind, RowKind::Header);
        assert_eq!(table.rows[1].kind, RowKind::Data);
        assert_eq!(table.rows[2].cells, vec!["api", "10KB"]);
    }

    #[rstest]
    #[case("> 💡 Use batching", Some(CalloutKind::Tip), Some("💡"))]
    #[case("> 🚀 Ship it", Some(CalloutKind::Tip), Some("🚀"))]
    #[case("> ⚠️ Breaking change", Some(CalloutKind::Warning), Some("\u{26A0}\u{FE0F}"))]
    #[case("> ℹ️ Good to know", Some(CalloutKind::Info), Some("\u{2139}\u{FE0F}"))]
    #[case("> 🔎 Details", Some(CalloutKind::Info), Some("🔎"))]
    #[case("> 📝 Remember", Some(CalloutKind::Note), Some("📝"))]
    #[case("> ✨ Shiny", None, Some("✨"))]
    #[case("> Plain quote", None, None)]
    fn test_blockquote_callouts(
        #[case] md: &str,
        #[case] kind: Option<CalloutKind>,
        #[case] emoji: Option<&str>,
    ) {
        let Some(ContentBlock::Blockquote(quote)) = classify(md) else {
            panic!("Expected blockquote");
        };
        assert_eq!(quote.kind, kind);
        assert_eq!(quote.emoji.as_deref(), emoji);
        assert_eq!(quote.content.len(), 1);
    }

    #[test]
    fn test_blockquote_only_inspects_first_paragraph() {
        let Some(ContentBlock::Blockquote(quote)) = classify("> First\n>\n> 💡 Second") else {
            panic!("Expected blockquote");
        };
        assert_eq!(quote.content.len(), 2);
        assert_eq!(quote.kind, None);
        assert_eq!(quote.emoji, None);
    }

    #[test]
    fn test_blockquote_nested_blocks() {
        let Some(ContentBlock::Blockquote(quote)) = classify("> ⚠️ Careful\n>\n> - one\n> - two")
        else {
            panic!("Expected blockquote");
        };
        assert_eq!(quote.kind, Some(CalloutKind::Warning));
        assert!(matches!(quote.content[1], ContentBlock::List(_)));
    }

    #[test]
    fn test_list_and_task_list() {
        let Some(ContentBlock::List(items)) = classify("1. one\n2. two") else {
            panic!("Expected list");
        };
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.kind == ListKind::Ordered));

        assert!(matches!(classify("- [ ] todo"), Some(ContentBlock::TaskList(_))));
    }

    #[test]
    fn test_simple_blocks() {
        assert_eq!(classify("---"), Some(ContentBlock::Divider));
        assert_eq!(
            classify("<details>hidden</details>\n"),
            Some(ContentBlock::RawMarkup(RawMarkup {
                content: "<details>hidden</details>\n".to_string(),
            }))
        );
        assert_eq!(classify_block(&MdNode::Break), Some(ContentBlock::LineBreak));
    }

    #[test]
    fn test_unsupported_nodes_are_dropped() {
        let node = MdNode::Unsupported {
            kind: "footnoteDefinition",
            children: vec![MdNode::Text("x".to_string())],
        };
        assert_eq!(classify_block(&node), None);
    }
}
