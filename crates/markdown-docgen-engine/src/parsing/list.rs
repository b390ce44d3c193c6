//! List normalization.
//!
//! A list is either a task list (every item is a flat `TaskItem`) or a regular
//! list (items carry formatted content and nested children). The decision is
//! made over the whole item set first, then every item is normalized the same
//! way, so a list never mixes the two shapes.

use crate::models::{ContentBlock, ListItem, ListKind, TaskItem};

use super::{classify::classify_block, tree::MdNode};

/// The result of normalizing one list node.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedList {
    Regular(Vec<ListItem>),
    Tasks(Vec<TaskItem>),
}

/// Normalize the items of a list node at the given nesting level.
///
/// Any item with a checkbox makes the whole list a task list. Items of a task
/// list that have no checkbox of their own are treated as unchecked.
pub fn normalize_list(ordered: bool, items: &[MdNode], level: usize) -> NormalizedList {
    let is_task_list = items
        .iter()
        .any(|item| matches!(item, MdNode::ListItem { checked: Some(_), .. }));

    if is_task_list {
        NormalizedList::Tasks(items.iter().filter_map(task_item).collect())
    } else {
        let kind = if ordered {
            ListKind::Ordered
        } else {
            ListKind::Unordered
        };
        NormalizedList::Regular(
            items
                .iter()
                .filter_map(|item| list_item(item, kind, level))
                .collect(),
        )
    }
}

fn task_item(node: &MdNode) -> Option<TaskItem> {
    let MdNode::ListItem { checked, children } = node else {
        return None;
    };

    if checked.is_none() {
        log::debug!("List item without checkbox inside a task list, treating as unchecked");
    }

    // Only the first paragraph counts; nested lists under a task are not recursed into.
    let content = children
        .iter()
        .find(|child| matches!(child, MdNode::Paragraph(_)))
        .map(|child| child.plain_text().trim().to_string())
        .unwrap_or_default();

    Some(TaskItem {
        content,
        checked: checked.unwrap_or(false),
    })
}

fn list_item(node: &MdNode, kind: ListKind, level: usize) -> Option<ListItem> {
    let MdNode::ListItem { children, .. } = node else {
        return None;
    };

    let mut content = Vec::new();
    let mut nested = Vec::new();

    for child in children {
        match child {
            MdNode::Paragraph(_) => content.extend(classify_block(child)),
            MdNode::List {
                ordered,
                children: items,
            } => match normalize_list(*ordered, items, level + 1) {
                NormalizedList::Regular(items) => nested.extend(items),
                // A nested task list cannot be a child item; keep it as content.
                NormalizedList::Tasks(tasks) => content.push(ContentBlock::TaskList(tasks)),
            },
            _ => {}
        }
    }

    if content.is_empty() && nested.is_empty() {
        return None;
    }

    Some(ListItem {
        content,
        level,
        kind,
        children: (!nested.is_empty()).then_some(nested),
    })
}
