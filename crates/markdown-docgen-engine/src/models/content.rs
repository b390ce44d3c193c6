use serde::{Deserialize, Serialize};

/// One typed unit of section content.
///
/// Serialized adjacently tagged (`{"type": "paragraph", "data": {...}}`) so the
/// generated JSON can be consumed by a discriminated union on the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum ContentBlock {
    Paragraph(Paragraph),
    Heading(Heading),
    List(Vec<ListItem>),
    TaskList(Vec<TaskItem>),
    Table(Table),
    Code(CodeBlock),
    Diagram(Diagram),
    Blockquote(Blockquote),
    Divider,
    LineBreak,
    RawMarkup(RawMarkup),
}

impl ContentBlock {
    /// The serialized tag of this block.
    pub fn block_type(&self) -> BlockType {
        match self {
            ContentBlock::Paragraph(_) => BlockType::Paragraph,
            ContentBlock::Heading(_) => BlockType::Heading,
            ContentBlock::List(_) => BlockType::List,
            ContentBlock::TaskList(_) => BlockType::TaskList,
            ContentBlock::Table(_) => BlockType::Table,
            ContentBlock::Code(_) => BlockType::Code,
            ContentBlock::Diagram(_) => BlockType::Diagram,
            ContentBlock::Blockquote(_) => BlockType::Blockquote,
            ContentBlock::Divider => BlockType::Divider,
            ContentBlock::LineBreak => BlockType::LineBreak,
            ContentBlock::RawMarkup(_) => BlockType::RawMarkup,
        }
    }
}

/// Discriminant of [`ContentBlock`], used for type-filtered lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BlockType {
    Paragraph,
    Heading,
    List,
    TaskList,
    Table,
    Code,
    Diagram,
    Blockquote,
    Divider,
    LineBreak,
    RawMarkup,
}

impl BlockType {
    pub const ALL: [BlockType; 11] = [
        BlockType::Paragraph,
        BlockType::Heading,
        BlockType::List,
        BlockType::TaskList,
        BlockType::Table,
        BlockType::Code,
        BlockType::Diagram,
        BlockType::Blockquote,
        BlockType::Divider,
        BlockType::LineBreak,
        BlockType::RawMarkup,
    ];

    /// The serialized tag, e.g. `"taskList"`.
    pub fn as_str(self) -> &'static str {
        match self {
            BlockType::Paragraph => "paragraph",
            BlockType::Heading => "heading",
            BlockType::List => "list",
            BlockType::TaskList => "taskList",
            BlockType::Table => "table",
            BlockType::Code => "code",
            BlockType::Diagram => "diagram",
            BlockType::Blockquote => "blockquote",
            BlockType::Divider => "divider",
            BlockType::LineBreak => "lineBreak",
            BlockType::RawMarkup => "rawMarkup",
        }
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown block type: {0}")]
pub struct UnknownBlockType(pub String);

impl std::str::FromStr for BlockType {
    type Err = UnknownBlockType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BlockType::ALL
            .into_iter()
            .find(|block_type| block_type.as_str() == s)
            .ok_or_else(|| UnknownBlockType(s.to_string()))
    }
}

/// A half-open `[start, end)` range of characters in a paragraph's plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattingRange {
    pub start: usize,
    pub end: usize,
}

/// A link range together with its destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkRange {
    pub start: usize,
    pub end: usize,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatting {
    pub bold: Vec<FormattingRange>,
    pub italic: Vec<FormattingRange>,
    pub code: Vec<FormattingRange>,
    pub strikethrough: Vec<FormattingRange>,
    pub links: Vec<LinkRange>,
}

impl Formatting {
    pub fn is_empty(&self) -> bool {
        self.bold.is_empty()
            && self.italic.is_empty()
            && self.code.is_empty()
            && self.strikethrough.is_empty()
            && self.links.is_empty()
    }
}

/// Plain text plus the formatting ranges that apply to it.
///
/// Offsets count characters, not bytes, so they line up with what a
/// renderer sees when it slices the string by character.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paragraph {
    pub text: String,
    pub formatting: Formatting,
}

impl Paragraph {
    /// Slice the plain text by a character range.
    pub fn slice(&self, start: usize, end: usize) -> String {
        self.text.chars().skip(start).take(end.saturating_sub(start)).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub level: u8,
    pub id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Ordered,
    Unordered,
}

/// An item of a regular (non-task) list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub content: Vec<ContentBlock>,
    pub level: usize,
    #[serde(rename = "type")]
    pub kind: ListKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<ListItem>>,
}

/// An item of a task list. Task lists are flat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub content: String,
    pub checked: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowKind {
    Header,
    Data,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRow {
    pub cells: Vec<String>,
    #[serde(rename = "type")]
    pub kind: RowKind,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<String>,
}

/// Machine-renderable diagram source (mermaid, plantuml, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagram {
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Semantic flavour of a blockquote, inferred from its leading emoji.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalloutKind {
    Tip,
    Warning,
    Info,
    Note,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blockquote {
    pub content: Vec<ContentBlock>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<CalloutKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMarkup {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_blocks_are_adjacently_tagged() {
        let block = ContentBlock::Code(CodeBlock {
            language: "ts".to_string(),
            code: "const a = 1".to_string(),
            filename: Some("a.ts".to_string()),
            meta: None,
        });
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "code",
                "data": { "language": "ts", "code": "const a = 1", "filename": "a.ts" }
            })
        );
        assert_eq!(
            serde_json::to_value(ContentBlock::LineBreak).unwrap(),
            json!({ "type": "lineBreak" })
        );
    }

    #[test]
    fn test_list_item_kind_serializes_as_type() {
        let block = ContentBlock::List(vec![ListItem {
            content: vec![],
            level: 0,
            kind: ListKind::Ordered,
            children: None,
        }]);
        assert_eq!(
            serde_json::to_value(&block).unwrap(),
            json!({
                "type": "list",
                "data": [{ "content": [], "level": 0, "type": "ordered" }]
            })
        );
    }

    #[test]
    fn test_block_type_matches_serialized_tag() {
        for block_type in BlockType::ALL {
            assert_eq!(
                serde_json::to_value(block_type).unwrap(),
                json!(block_type.as_str())
            );
            assert_eq!(block_type.as_str().parse::<BlockType>().unwrap(), block_type);
        }
        assert!("image".parse::<BlockType>().is_err());
    }

    #[test]
    fn test_paragraph_slice_by_chars() {
        let paragraph = Paragraph {
            text: "Привет world".to_string(),
            formatting: Formatting::default(),
        };
        assert_eq!(paragraph.slice(7, 12), "world");
        assert_eq!(paragraph.slice(0, 6), "Привет");
        assert!(paragraph.formatting.is_empty());
    }
}
