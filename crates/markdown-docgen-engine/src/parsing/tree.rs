//! Markdown syntax tree built from pulldown-cmark events.
//!
//! pulldown-cmark emits a flat stream of `Start`/`End` events. The classifier
//! wants a tree it can match on node by node, so [`parse_markdown`] folds the
//! stream into [`MdNode`]s with a stack of open frames.
//!
//! ## Event Flow
//!
//! ```markdown
//! - Parent
//!   - [x] Child
//! ```
//! Events:
//! 1. `Start(List(None))`
//! 2. `Start(Item)`, `Text("Parent")`
//! 3. `Start(List(None))` - nested list appears INSIDE the parent item
//! 4. `Start(Item)`, `TaskListMarker(true)`, `Text("Child")`, `End(Item)`
//! 5. `End(List)`
//! 6. `End(Item)` - parent closes AFTER its nested list
//! 7. `End(List)`
//!
//! Tight list items carry their inline content directly (no `Paragraph`
//! event); the builder wraps such runs in an implicit paragraph so every list
//! item looks the same to the classifier.

use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};

/// One node of the markdown syntax tree.
///
/// A closed set of kinds: anything the classifier does not model ends up in
/// [`MdNode::Unsupported`] with its children preserved.
#[derive(Debug, Clone, PartialEq)]
pub enum MdNode {
    Paragraph(Vec<MdNode>),
    Heading {
        depth: u8,
        children: Vec<MdNode>,
    },
    ThematicBreak,
    Blockquote(Vec<MdNode>),
    List {
        ordered: bool,
        children: Vec<MdNode>,
    },
    ListItem {
        checked: Option<bool>,
        children: Vec<MdNode>,
    },
    Code {
        lang: Option<String>,
        meta: Option<String>,
        value: String,
    },
    /// Block-level raw HTML.
    Html(String),
    /// Table rows; the first row is the header row.
    Table(Vec<MdNode>),
    TableRow(Vec<MdNode>),
    TableCell(Vec<MdNode>),
    Text(String),
    InlineCode(String),
    InlineHtml(String),
    Emphasis(Vec<MdNode>),
    Strong(Vec<MdNode>),
    Delete(Vec<MdNode>),
    Link {
        url: String,
        title: Option<String>,
        children: Vec<MdNode>,
    },
    Image {
        url: String,
        title: Option<String>,
        alt: Vec<MdNode>,
    },
    Break,
    Unsupported {
        kind: &'static str,
        children: Vec<MdNode>,
    },
}

impl MdNode {
    /// Child nodes, for kinds that have them.
    pub fn children(&self) -> &[MdNode] {
        match self {
            MdNode::Paragraph(children)
            | MdNode::Heading { children, .. }
            | MdNode::Blockquote(children)
            | MdNode::List { children, .. }
            | MdNode::ListItem { children, .. }
            | MdNode::Table(children)
            | MdNode::TableRow(children)
            | MdNode::TableCell(children)
            | MdNode::Emphasis(children)
            | MdNode::Strong(children)
            | MdNode::Delete(children)
            | MdNode::Link { children, .. }
            | MdNode::Unsupported { children, .. } => children,
            MdNode::ThematicBreak
            | MdNode::Code { .. }
            | MdNode::Html(_)
            | MdNode::Text(_)
            | MdNode::InlineCode(_)
            | MdNode::InlineHtml(_)
            | MdNode::Image { .. }
            | MdNode::Break => &[],
        }
    }

    /// Flattened text content with all inline markup stripped.
    ///
    /// Only text and inline code contribute; image alt text and raw HTML do not.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            MdNode::Text(value) | MdNode::InlineCode(value) => out.push_str(value),
            MdNode::Break => out.push('\n'),
            other => {
                for child in other.children() {
                    child.collect_text(out);
                }
            }
        }
    }

    fn is_inline(&self) -> bool {
        matches!(
            self,
            MdNode::Text(_)
                | MdNode::InlineCode(_)
                | MdNode::InlineHtml(_)
                | MdNode::Emphasis(_)
                | MdNode::Strong(_)
                | MdNode::Delete(_)
                | MdNode::Link { .. }
                | MdNode::Image { .. }
                | MdNode::Break
        )
    }
}

/// Parse markdown into its top-level nodes.
///
/// GFM tables, strikethrough and task lists are enabled.
pub fn parse_markdown(content: &str) -> Vec<MdNode> {
    let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS;
    let mut builder = TreeBuilder::default();

    for event in Parser::new_ext(content, options) {
        builder.process_event(event);
    }

    builder.finish()
}

/// An open container waiting for its `End` event.
#[derive(Debug)]
enum Frame {
    Paragraph,
    Heading(u8),
    Blockquote,
    List { ordered: bool },
    Item { checked: Option<bool> },
    Code { lang: Option<String>, meta: Option<String> },
    HtmlBlock,
    Table,
    TableHead,
    TableRow,
    TableCell,
    Emphasis,
    Strong,
    Strikethrough,
    Link { url: String, title: Option<String> },
    Image { url: String, title: Option<String> },
    Other(&'static str),
}

impl Frame {
    fn open(tag: Tag<'_>) -> Self {
        match tag {
            Tag::Paragraph => Frame::Paragraph,
            Tag::Heading { level, .. } => Frame::Heading(level as u8),
            Tag::BlockQuote(_) => Frame::Blockquote,
            Tag::CodeBlock(kind) => {
                let (lang, meta) = match kind {
                    CodeBlockKind::Fenced(info) => split_info_string(&info),
                    CodeBlockKind::Indented => (None, None),
                };
                Frame::Code { lang, meta }
            }
            Tag::HtmlBlock => Frame::HtmlBlock,
            Tag::List(first_number) => Frame::List {
                ordered: first_number.is_some(),
            },
            Tag::Item => Frame::Item { checked: None },
            Tag::Table(_) => Frame::Table,
            Tag::TableHead => Frame::TableHead,
            Tag::TableRow => Frame::TableRow,
            Tag::TableCell => Frame::TableCell,
            Tag::Emphasis => Frame::Emphasis,
            Tag::Strong => Frame::Strong,
            Tag::Strikethrough => Frame::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => Frame::Link {
                url: dest_url.to_string(),
                title: non_empty(&title),
            },
            Tag::Image {
                dest_url, title, ..
            } => Frame::Image {
                url: dest_url.to_string(),
                title: non_empty(&title),
            },
            Tag::FootnoteDefinition(_) => Frame::Other("footnoteDefinition"),
            Tag::MetadataBlock(_) => Frame::Other("metadataBlock"),
            _ => Frame::Other("unknown"),
        }
    }

    fn close(self, children: Vec<MdNode>) -> MdNode {
        match self {
            Frame::Paragraph => MdNode::Paragraph(children),
            Frame::Heading(depth) => MdNode::Heading { depth, children },
            Frame::Blockquote => MdNode::Blockquote(children),
            Frame::List { ordered } => MdNode::List { ordered, children },
            Frame::Item { checked } => MdNode::ListItem {
                checked,
                children: wrap_inline_runs(children),
            },
            Frame::Code { lang, meta } => {
                let mut value = concat_text(&children);
                if value.ends_with('\n') {
                    value.pop();
                }
                MdNode::Code { lang, meta, value }
            }
            Frame::HtmlBlock => MdNode::Html(concat_text(&children)),
            Frame::Table => MdNode::Table(children),
            Frame::TableHead | Frame::TableRow => MdNode::TableRow(children),
            Frame::TableCell => MdNode::TableCell(children),
            Frame::Emphasis => MdNode::Emphasis(children),
            Frame::Strong => MdNode::Strong(children),
            Frame::Strikethrough => MdNode::Delete(children),
            Frame::Link { url, title } => MdNode::Link {
                url,
                title,
                children,
            },
            Frame::Image { url, title } => MdNode::Image {
                url,
                title,
                alt: children,
            },
            Frame::Other(kind) => MdNode::Unsupported { kind, children },
        }
    }
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<(Frame, Vec<MdNode>)>,
    root: Vec<MdNode>,
}

impl TreeBuilder {
    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.stack.push((Frame::open(tag), Vec::new())),
            Event::End(_) => {
                if let Some((frame, children)) = self.stack.pop() {
                    let node = frame.close(children);
                    self.push(node);
                }
            }
            Event::Text(text) => self.push(MdNode::Text(text.to_string())),
            Event::Code(code) => self.push(MdNode::InlineCode(code.to_string())),
            Event::Html(html) => {
                if matches!(self.stack.last(), Some((Frame::HtmlBlock, _))) {
                    self.push(MdNode::Text(html.to_string()));
                } else {
                    self.push(MdNode::Html(html.to_string()));
                }
            }
            Event::InlineHtml(html) => self.push(MdNode::InlineHtml(html.to_string())),
            Event::SoftBreak => self.push(MdNode::Text("\n".to_string())),
            Event::HardBreak => self.push(MdNode::Break),
            Event::Rule => self.push(MdNode::ThematicBreak),
            Event::TaskListMarker(checked) => {
                // The marker sits inside the item, possibly inside its paragraph.
                if let Some((Frame::Item { checked: slot }, _)) = self
                    .stack
                    .iter_mut()
                    .rev()
                    .find(|(frame, _)| matches!(frame, Frame::Item { .. }))
                {
                    *slot = Some(checked);
                }
            }
            _ => {}
        }
    }

    /// Attach a finished node to the innermost open frame, merging adjacent text.
    fn push(&mut self, node: MdNode) {
        let siblings = match self.stack.last_mut() {
            Some((_, children)) => children,
            None => &mut self.root,
        };

        if let MdNode::Text(text) = &node
            && let Some(MdNode::Text(previous)) = siblings.last_mut()
        {
            previous.push_str(text);
            return;
        }
        siblings.push(node);
    }

    fn finish(mut self) -> Vec<MdNode> {
        // Unbalanced events should not happen, but never lose content if they do.
        while let Some((frame, children)) = self.stack.pop() {
            let node = frame.close(children);
            self.push(node);
        }
        self.root
    }
}

/// Split a fenced code info string into language tag and the rest (meta).
fn split_info_string(info: &str) -> (Option<String>, Option<String>) {
    let info = info.trim();
    if info.is_empty() {
        return (None, None);
    }
    match info.split_once(char::is_whitespace) {
        Some((lang, meta)) => {
            let meta = meta.trim();
            (
                Some(lang.to_string()),
                (!meta.is_empty()).then(|| meta.to_string()),
            )
        }
        None => (Some(info.to_string()), None),
    }
}

fn non_empty(s: &str) -> Option<String> {
    (!s.is_empty()).then(|| s.to_string())
}

fn concat_text(children: &[MdNode]) -> String {
    children
        .iter()
        .filter_map(|child| match child {
            MdNode::Text(value) => Some(value.as_str()),
            _ => None,
        })
        .collect()
}

/// Group consecutive inline nodes of a tight list item into paragraphs.
fn wrap_inline_runs(children: Vec<MdNode>) -> Vec<MdNode> {
    let mut out = Vec::with_capacity(children.len());
    let mut run: Vec<MdNode> = Vec::new();

    for child in children {
        if child.is_inline() {
            run.push(child);
        } else {
            if !run.is_empty() {
                out.push(MdNode::Paragraph(std::mem::take(&mut run)));
            }
            out.push(child);
        }
    }
    if !run.is_empty() {
        out.push(MdNode::Paragraph(run));
    }
    out
}
