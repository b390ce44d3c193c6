//! Inline formatting extraction.
//!
//! Flattens an inline subtree into plain text and records where each styled
//! span starts and ends. Offsets count characters of the flattened text, so
//! markup never shifts them.

use crate::models::{Formatting, FormattingRange, LinkRange, Paragraph};

use super::tree::MdNode;

/// Extract plain text and formatting ranges from the children of an inline
/// container (a paragraph, usually).
///
/// Nested spans compose: `***both***` yields one bold and one italic range
/// covering the same characters. Empty spans (e.g. `[](url)`) produce no range.
pub fn extract_formatting(children: &[MdNode]) -> Paragraph {
    let mut extractor = InlineExtractor::default();
    for child in children {
        extractor.visit(child);
    }
    Paragraph {
        text: extractor.text,
        formatting: extractor.formatting,
    }
}

#[derive(Default)]
struct InlineExtractor {
    text: String,
    /// Length of `text` in characters.
    cursor: usize,
    formatting: Formatting,
}

impl InlineExtractor {
    fn visit(&mut self, node: &MdNode) {
        match node {
            MdNode::Text(value) => self.push_text(value),
            MdNode::InlineCode(value) => {
                let start = self.cursor;
                self.push_text(value);
                if let Some(range) = self.range_from(start) {
                    self.formatting.code.push(range);
                }
            }
            MdNode::Break => self.push_text("\n"),
            MdNode::Strong(children) => {
                let start = self.cursor;
                self.visit_all(children);
                if let Some(range) = self.range_from(start) {
                    self.formatting.bold.push(range);
                }
            }
            MdNode::Emphasis(children) => {
                let start = self.cursor;
                self.visit_all(children);
                if let Some(range) = self.range_from(start) {
                    self.formatting.italic.push(range);
                }
            }
            MdNode::Delete(children) => {
                let start = self.cursor;
                self.visit_all(children);
                if let Some(range) = self.range_from(start) {
                    self.formatting.strikethrough.push(range);
                }
            }
            MdNode::Link {
                url,
                title,
                children,
            } => {
                let start = self.cursor;
                self.visit_all(children);
                if let Some(range) = self.range_from(start) {
                    self.formatting.links.push(LinkRange {
                        start: range.start,
                        end: range.end,
                        url: url.clone(),
                        title: title.clone(),
                    });
                }
            }
            // Images and raw inline HTML carry no text of their own.
            MdNode::Image { .. } | MdNode::InlineHtml(_) => {}
            other => self.visit_all(other.children()),
        }
    }

    fn visit_all(&mut self, children: &[MdNode]) {
        for child in children {
            self.visit(child);
        }
    }

    fn push_text(&mut self, value: &str) {
        self.text.push_str(value);
        self.cursor += value.chars().count();
    }

    fn range_from(&self, start: usize) -> Option<FormattingRange> {
        (self.cursor > start).then_some(FormattingRange {
            start,
            end: self.cursor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::tree::parse_markdown;
    use pretty_assertions::assert_eq;

    fn paragraph(markdown: &str) -> Paragraph {
        let nodes = parse_markdown(markdown);
        match &nodes[0] {
            MdNode::Paragraph(children) => extract_formatting(children),
            other => panic!("Expected paragraph, got {other:?}"),
        }
    }

    fn assert_ranges_valid(p: &Paragraph) {
        let len = p.text.chars().count();
        let f = &p.formatting;
        let plain = f.bold.iter().chain(&f.italic).chain(&f.code).chain(&f.strikethrough);
        for r in plain {
            assert!(r.start < r.end && r.end <= len, "bad range {r:?} in {:?}", p.text);
        }
        for l in &f.links {
            assert!(l.start < l.end && l.end <= len, "bad link {l:?} in {:?}", p.text);
        }
    }

    #[test]
    fn test_bold_offsets() {
        let p = paragraph("Hello **world**");
        assert_eq!(p.text, "Hello world");
        assert_eq!(p.formatting.bold, vec![FormattingRange { start: 6, end: 11 }]);
        assert_eq!(p.slice(6, 11), "world");
        assert_ranges_valid(&p);
    }

    #[test]
    fn test_inline_code_registers_code_range() {
        let p = paragraph("Call `createStorage()` first");
        assert_eq!(p.text, "Call createStorage() first");
        assert_eq!(p.formatting.code, vec![FormattingRange { start: 5, end: 20 }]);
    }

    #[test]
    fn test_nested_spans_compose() {
        let p = paragraph("a ***both*** z");
        assert_eq!(p.text, "a both z");
        assert_eq!(p.formatting.bold, vec![FormattingRange { start: 2, end: 6 }]);
        assert_eq!(p.formatting.italic, vec![FormattingRange { start: 2, end: 6 }]);
        assert_ranges_valid(&p);
    }

    #[test]
    fn test_link_with_bold_inside() {
        let p = paragraph("See [the **docs**](https://example.com \"Docs\") now");
        assert_eq!(p.text, "See the docs now");
        assert_eq!(
            p.formatting.links,
            vec![LinkRange {
                start: 4,
                end: 12,
                url: "https://example.com".to_string(),
                title: Some("Docs".to_string()),
            }]
        );
        assert_eq!(p.formatting.bold, vec![FormattingRange { start: 8, end: 12 }]);
        assert_ranges_valid(&p);
    }

    #[test]
    fn test_strikethrough() {
        let p = paragraph("old ~~api~~ new");
        assert_eq!(p.text, "old api new");
        assert_eq!(p.formatting.strikethrough, vec![FormattingRange { start: 4, end: 7 }]);
    }

    #[test]
    fn test_offsets_count_characters_not_bytes() {
        let p = paragraph("Привет **мир**");
        assert_eq!(p.text, "Привет мир");
        assert_eq!(p.formatting.bold, vec![FormattingRange { start: 7, end: 10 }]);
        assert_eq!(p.slice(7, 10), "мир");
    }

    #[test]
    fn test_empty_link_produces_no_range() {
        let p = paragraph("x [](https://example.com) y");
        assert!(p.formatting.links.is_empty());
        assert_eq!(p.text, "x  y");
    }

    #[test]
    fn test_soft_break_kept_as_newline() {
        let p = paragraph("line one\nline *two*");
        assert_eq!(p.text, "line one\nline two");
        assert_eq!(p.formatting.italic, vec![FormattingRange { start: 14, end: 17 }]);
    }

    #[test]
    fn test_plain_paragraph_has_no_formatting() {
        let p = paragraph("just text");
        assert!(p.formatting.is_empty());
    }
}
