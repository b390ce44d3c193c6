//! Splitting a document into heading-delimited sections.

use crate::models::{ContentBlock, Heading, ListItem, Section, SectionMetadata};

use super::{
    classify::{classify_block, flatten, heading},
    slug::section_slug,
    tree::MdNode,
};

/// Headings at or above this level open a new section; deeper headings stay
/// inside the current section as content.
pub const SECTION_HEADING_MAX_LEVEL: u8 = 2;

/// Group top-level nodes into sections.
///
/// Content before the first level 1 or 2 heading has no section to live in and
/// is dropped.
pub fn extract_sections(nodes: &[MdNode]) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current: Option<SectionBuilder> = None;

    for node in nodes {
        match node {
            MdNode::Heading { depth, children } if *depth <= SECTION_HEADING_MAX_LEVEL => {
                if let Some(builder) = current.take() {
                    sections.push(builder.finish());
                }
                let title = flatten(children);
                current = Some(SectionBuilder::new(sections.len(), title, *depth));
            }
            MdNode::Heading { depth, children } => {
                if let Some(builder) = current.as_mut() {
                    builder
                        .content
                        .push(ContentBlock::Heading(heading(*depth, children)));
                }
            }
            other => {
                if let Some(builder) = current.as_mut() {
                    builder.content.extend(classify_block(other));
                } else {
                    log::debug!("Dropping content before the first section heading");
                }
            }
        }
    }

    if let Some(builder) = current {
        sections.push(builder.finish());
    }

    sections
}

/// Accumulates one section until the next section heading closes it.
struct SectionBuilder {
    id: String,
    title: String,
    level: u8,
    content: Vec<ContentBlock>,
}

impl SectionBuilder {
    fn new(index: usize, title: String, level: u8) -> Self {
        Self {
            id: section_slug(&title, index),
            title,
            level,
            content: Vec::new(),
        }
    }

    fn finish(self) -> Section {
        let metadata = section_metadata(&self.content);
        Section {
            id: self.id,
            title: self.title,
            level: self.level,
            content: self.content,
            metadata,
        }
    }
}

/// Compute aggregate metadata over a sequence of blocks.
///
/// Words, diagrams and tasks are counted recursively through lists and
/// blockquotes; words also through tables. Diagrams are not code blocks.
pub fn section_metadata(blocks: &[ContentBlock]) -> SectionMetadata {
    let mut metadata = SectionMetadata::default();

    for block in blocks {
        match block {
            ContentBlock::Paragraph(p) => metadata.word_count += count_words(&p.text),
            ContentBlock::Heading(Heading { text, .. }) => metadata.word_count += count_words(text),
            ContentBlock::Code(_) => metadata.code_blocks_count += 1,
            ContentBlock::Diagram(_) => metadata.diagrams_count += 1,
            ContentBlock::TaskList(tasks) => {
                metadata.tasks_count += tasks.len();
                metadata.word_count += tasks.iter().map(|t| count_words(&t.content)).sum::<usize>();
            }
            ContentBlock::Table(table) => {
                metadata.has_table = true;
                metadata.word_count += table
                    .rows
                    .iter()
                    .flat_map(|row| &row.cells)
                    .map(|cell| count_words(cell))
                    .sum::<usize>();
            }
            ContentBlock::Blockquote(quote) => {
                metadata.has_blockquotes = true;
                absorb(&mut metadata, section_metadata(&quote.content));
            }
            ContentBlock::List(items) => absorb_list(&mut metadata, items),
            ContentBlock::Divider | ContentBlock::LineBreak | ContentBlock::RawMarkup(_) => {}
        }
    }

    metadata.has_diagrams = metadata.diagrams_count > 0;
    metadata.has_tasks = metadata.tasks_count > 0;
    metadata
}

/// Add the recursive counters of nested content; presence flags of nested
/// tables, blockquotes and code are not carried up.
fn absorb(metadata: &mut SectionMetadata, nested: SectionMetadata) {
    metadata.word_count += nested.word_count;
    metadata.diagrams_count += nested.diagrams_count;
    metadata.tasks_count += nested.tasks_count;
}

fn absorb_list(metadata: &mut SectionMetadata, items: &[ListItem]) {
    for item in items {
        absorb(metadata, section_metadata(&item.content));
        if let Some(children) = &item.children {
            absorb_list(metadata, children);
        }
    }
}

/// Number of whitespace-separated, non-empty tokens.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FormattingRange, Paragraph};
    use crate::parsing::tree::parse_markdown;
    use pretty_assertions::assert_eq;

    fn sections(markdown: &str) -> Vec<Section> {
        extract_sections(&parse_markdown(markdown))
    }

    #[test]
    fn test_single_section_with_bold_paragraph() {
        let result = sections("# Intro\n\nHello **world**");
        assert_eq!(result.len(), 1);

        let section = &result[0];
        assert_eq!(section.id, "intro");
        assert_eq!(section.title, "Intro");
        assert_eq!(section.level, 1);

        let ContentBlock::Paragraph(Paragraph { text, formatting }) = &section.content[0] else {
            panic!("Expected paragraph");
        };
        assert_eq!(text, "Hello world");
        assert_eq!(formatting.bold, vec![FormattingRange { start: 6, end: 11 }]);
        assert_eq!(section.metadata.word_count, 2);
    }

    #[test]
    fn test_level_two_opens_section_level_three_folds() {
        let md = "# Guide\n\nIntro text\n\n## Install\n\nRun it\n\n### Details\n\nMore\n\n## Usage\n\nUse it";
        let result = sections(md);
        let ids: Vec<_> = result.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["guide", "install", "usage"]);

        let install = &result[1];
        assert_eq!(install.level, 2);
        assert_eq!(install.content.len(), 3);
        assert_eq!(
            install.content[1],
            ContentBlock::Heading(Heading {
                text: "Details".to_string(),
                level: 3,
                id: "details".to_string(),
            })
        );
        // "Run it" + "Details" + "More"
        assert_eq!(install.metadata.word_count, 4);
    }

    #[test]
    fn test_content_before_first_heading_is_dropped() {
        let result = sections("Preamble paragraph\n\n### Too deep\n\n# First\n\nBody");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].title, "First");
        assert_eq!(result[0].content.len(), 1);
    }

    #[test]
    fn test_document_without_headings_has_no_sections() {
        assert!(sections("just text\n\n- and a list").is_empty());
    }

    #[test]
    fn test_symbol_only_title_falls_back_to_index() {
        let result = sections("# Один\n\n# 🚀\n\ntext");
        assert_eq!(result[0].id, "section-0");
        assert_eq!(result[1].id, "section-1");
        assert_eq!(result[1].title, "🚀");
    }

    #[test]
    fn test_metadata_counts() {
        let md = "\
# Section

```ts
const a = 1
```

```mermaid
graph TD; A-->B
```

| Col one | Col two |
|---|---|
| a b | c |

> 💡 Quoted words here

- item **one**
  - nested child
* [x] separate list
";
        let result = sections(md);
        let metadata = result[0].metadata;
        assert_eq!(metadata.code_blocks_count, 1);
        assert_eq!(metadata.diagrams_count, 1);
        assert!(metadata.has_diagrams);
        assert_eq!(metadata.tasks_count, 1);
        assert!(metadata.has_tasks);
        assert!(metadata.has_table);
        assert!(metadata.has_blockquotes);
        // table: 2 + 2 + 2 + 1, quote: 4, list: 2 + 2, tasks: 2
        assert_eq!(metadata.word_count, 7 + 4 + 4 + 2);
    }

    #[test]
    fn test_plain_section_metadata_is_empty() {
        let result = sections("## Plain\n\nOnly words here\n\n---");
        assert_eq!(
            result[0].metadata,
            SectionMetadata {
                word_count: 3,
                ..SectionMetadata::default()
            }
        );
    }

    #[test]
    fn test_nested_diagrams_and_tasks_are_counted() {
        let md = "\
## Nested

> Quoted steps
>
> - [x] one
> - [ ] two
>
> ```mermaid
> graph TD; A-->B
> ```

- Checklist
  - [ ] three
";
        let metadata = sections(md)[0].metadata;
        assert_eq!(metadata.tasks_count, 3);
        assert!(metadata.has_tasks);
        assert_eq!(metadata.diagrams_count, 1);
        assert!(metadata.has_diagrams);
        assert_eq!(metadata.code_blocks_count, 0);
        // "Quoted steps", "one", "two", "Checklist", "three"
        assert_eq!(metadata.word_count, 6);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  one\ttwo \n three  "), 3);
    }
}
