//! Read-only filtering over todo items and plan items.
//!
//! Every filter returns a new query borrowing the same items; nothing is
//! copied or mutated.

use crate::core::model::{Document, ItemStatus, PlanItem, PlanItemStatus, TodoItem};

#[derive(Debug, Clone, Default)]
pub struct TodoQuery<'a> {
    items: Vec<&'a TodoItem>,
}

impl<'a> TodoQuery<'a> {
    pub fn new(items: &'a [TodoItem]) -> Self {
        Self {
            items: items.iter().collect(),
        }
    }

    /// Empty when the document has no todo list.
    pub fn from_document(doc: &'a Document) -> Self {
        Self::new(doc.todo_items())
    }

    pub fn by_status(self, status: ItemStatus) -> Self {
        self.filter(|item| item.status == status.as_str())
    }

    /// Case-insensitive substring match on the title.
    pub fn by_title(self, substring: &str) -> Self {
        let needle = substring.to_lowercase();
        self.filter(|item| item.title.to_lowercase().contains(&needle))
    }

    /// Tags need the metadata extension, which todo items do not carry; the
    /// result is always empty.
    pub fn by_tag(self, _tag: &str) -> Self {
        Self { items: Vec::new() }
    }

    pub fn filter<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&TodoItem) -> bool,
    {
        Self {
            items: self.items.into_iter().filter(|item| predicate(item)).collect(),
        }
    }

    pub fn all(&self) -> &[&'a TodoItem] {
        &self.items
    }

    pub fn first(&self) -> Option<&'a TodoItem> {
        self.items.first().copied()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn any(&self) -> bool {
        !self.items.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct PlanItemQuery<'a> {
    items: Vec<&'a PlanItem>,
}

impl<'a> PlanItemQuery<'a> {
    pub fn new(items: &'a [PlanItem]) -> Self {
        Self {
            items: items.iter().collect(),
        }
    }

    pub fn from_document(doc: &'a Document) -> Self {
        Self::new(doc.plan_items())
    }

    pub fn by_status(self, status: PlanItemStatus) -> Self {
        self.filter(|item| item.status == status.as_str())
    }

    pub fn by_title(self, substring: &str) -> Self {
        let needle = substring.to_lowercase();
        self.filter(|item| item.title.to_lowercase().contains(&needle))
    }

    pub fn filter<P>(self, mut predicate: P) -> Self
    where
        P: FnMut(&PlanItem) -> bool,
    {
        Self {
            items: self.items.into_iter().filter(|item| predicate(item)).collect(),
        }
    }

    pub fn all(&self) -> &[&'a PlanItem] {
        &self.items
    }

    pub fn first(&self) -> Option<&'a PlanItem> {
        self.items.first().copied()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn any(&self) -> bool {
        !self.items.is_empty()
    }
}
