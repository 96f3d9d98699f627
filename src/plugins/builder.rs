//! Fluent construction of todo-list and plan documents.
//!
//! Builders only assemble structure; run the validator on the result when the
//! inputs are untrusted.

use crate::core::model::{
    Document, ItemStatus, Plan, PlanItem, PlanItemStatus, PlanStatus, PROPOSAL_NARRATIVE,
    TodoItem, TodoList,
};

#[derive(Debug, Clone)]
pub struct TodoListBuilder {
    doc: Document,
    items: Vec<TodoItem>,
}

impl TodoListBuilder {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            doc: Document::new(version),
            items: Vec::new(),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.doc.info.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.doc.info.description = description.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.doc.info.metadata.insert(key.into(), value);
        self
    }

    pub fn add_item(mut self, title: impl Into<String>, status: ItemStatus) -> Self {
        self.items.push(TodoItem::new(title, status));
        self
    }

    pub fn add_pending_item(self, title: impl Into<String>) -> Self {
        self.add_item(title, ItemStatus::Pending)
    }

    pub fn add_in_progress_item(self, title: impl Into<String>) -> Self {
        self.add_item(title, ItemStatus::InProgress)
    }

    pub fn add_completed_item(self, title: impl Into<String>) -> Self {
        self.add_item(title, ItemStatus::Completed)
    }

    pub fn build(self) -> Document {
        let mut doc = self.doc;
        doc.todo_list = Some(TodoList { items: self.items });
        doc
    }
}

#[derive(Debug, Clone)]
pub struct PlanBuilder {
    doc: Document,
    plan: Plan,
}

impl PlanBuilder {
    /// A draft plan.
    pub fn new(title: impl Into<String>, version: impl Into<String>) -> Self {
        Self::with_status_new(version, title, PlanStatus::Draft)
    }

    pub fn with_status_new(
        version: impl Into<String>,
        title: impl Into<String>,
        status: PlanStatus,
    ) -> Self {
        Self {
            doc: Document::new(version),
            plan: Plan::new(title, status),
        }
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.doc.info.author = author.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.doc.info.description = description.into();
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.doc.info.metadata.insert(key.into(), value);
        self
    }

    pub fn with_status(mut self, status: PlanStatus) -> Self {
        self.plan.status = status.as_str().to_string();
        self
    }

    pub fn with_narrative(mut self, key: impl Into<String>, content: impl Into<String>) -> Self {
        self.plan.add_narrative(key, content);
        self
    }

    /// The one narrative a valid plan must have.
    pub fn with_proposal(self, content: impl Into<String>) -> Self {
        self.with_narrative(PROPOSAL_NARRATIVE, content)
    }

    pub fn with_problem(self, content: impl Into<String>) -> Self {
        self.with_narrative("problem", content)
    }

    pub fn with_background(self, content: impl Into<String>) -> Self {
        self.with_narrative("background", content)
    }

    /// Alias for [`with_background`](Self::with_background).
    pub fn with_context(self, content: impl Into<String>) -> Self {
        self.with_background(content)
    }

    pub fn with_alternative(self, content: impl Into<String>) -> Self {
        self.with_narrative("alternative", content)
    }

    pub fn with_risk(self, content: impl Into<String>) -> Self {
        self.with_narrative("risk", content)
    }

    pub fn with_test(self, content: impl Into<String>) -> Self {
        self.with_narrative("test", content)
    }

    pub fn add_plan_item(mut self, title: impl Into<String>, status: PlanItemStatus) -> Self {
        self.plan.add_plan_item(PlanItem::new(title, status));
        self
    }

    pub fn add_pending_item(self, title: impl Into<String>) -> Self {
        self.add_plan_item(title, PlanItemStatus::Pending)
    }

    pub fn add_in_progress_item(self, title: impl Into<String>) -> Self {
        self.add_plan_item(title, PlanItemStatus::InProgress)
    }

    pub fn add_completed_item(self, title: impl Into<String>) -> Self {
        self.add_plan_item(title, PlanItemStatus::Completed)
    }

    pub fn build(self) -> Document {
        let mut doc = self.doc;
        doc.plan = Some(self.plan);
        doc
    }
}
