//! Validated document mutation.
//!
//! Each operation runs the structural mutation first, then validates the whole
//! document. A structural error (bad index, missing key or sub-structure) is
//! returned as-is and skips validation. A validation failure is reported as the
//! operation's failure, but the mutation has already been applied: there is no
//! rollback, so a failed call means "document changed and is now invalid".

use crate::core::error::VbriefError;
use crate::core::model::{
    Document, ItemStatus, Plan, PlanItem, PlanItemStatus, PlanStatus, TodoItem, TodoList,
};
use crate::core::validate::{StandardValidator, Validator};

/// Mutation front-end bound to a single document.
pub struct Updater<'a, V: Validator = StandardValidator> {
    doc: Option<&'a mut Document>,
    validator: V,
}

impl<'a> Updater<'a, StandardValidator> {
    pub fn new(doc: &'a mut Document) -> Self {
        Self::from_option(Some(doc))
    }

    pub fn from_option(doc: Option<&'a mut Document>) -> Self {
        Self {
            doc,
            validator: StandardValidator,
        }
    }

    /// An updater with no document; every operation fails with `NilDocument`.
    pub fn unbound() -> Self {
        Self::from_option(None)
    }
}

impl<'a, V: Validator> Updater<'a, V> {
    pub fn with_validator<W: Validator>(self, validator: W) -> Updater<'a, W> {
        Updater {
            doc: self.doc,
            validator,
        }
    }

    pub fn document(&self) -> Option<&Document> {
        self.doc.as_deref()
    }

    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.doc.as_deref_mut()
    }

    /// Validates the bound document without mutating it.
    pub fn validate(&self) -> Result<(), VbriefError> {
        let doc = self.doc.as_deref().ok_or(VbriefError::NilDocument)?;
        self.validator.validate(doc)
    }

    fn doc_mut(&mut self) -> Result<&mut Document, VbriefError> {
        self.doc.as_deref_mut().ok_or(VbriefError::NilDocument)
    }

    fn todo_list(&mut self) -> Result<&mut TodoList, VbriefError> {
        self.doc_mut()?
            .todo_list
            .as_mut()
            .ok_or(VbriefError::NoTodoList)
    }

    fn plan(&mut self) -> Result<&mut Plan, VbriefError> {
        self.doc_mut()?.plan.as_mut().ok_or(VbriefError::NoPlan)
    }

    fn revalidate(&self, op: &str) -> Result<(), VbriefError> {
        let result = self.validate();
        if let Err(VbriefError::ValidationFailed(errors)) = &result {
            log::debug!("{op}: applied, document now has {} violation(s)", errors.len());
        }
        result
    }

    // --- todo list ---

    /// Appends to the todo list, creating it when absent.
    pub fn add_item(&mut self, item: TodoItem) -> Result<(), VbriefError> {
        self.doc_mut()?
            .todo_list
            .get_or_insert_with(TodoList::default)
            .add_item(item);
        self.revalidate("add_item")
    }

    pub fn remove_item(&mut self, index: usize) -> Result<TodoItem, VbriefError> {
        let removed = self.todo_list()?.remove_item(index)?;
        self.revalidate("remove_item")?;
        Ok(removed)
    }

    pub fn update_item<F>(&mut self, index: usize, updates: F) -> Result<(), VbriefError>
    where
        F: FnOnce(&mut TodoItem),
    {
        self.todo_list()?.update_item(index, updates)?;
        self.revalidate("update_item")
    }

    pub fn update_item_status(
        &mut self,
        index: usize,
        status: ItemStatus,
    ) -> Result<(), VbriefError> {
        self.update_item(index, |item| item.status = status.as_str().to_string())
    }

    /// Applies `updates` to every todo item matching `predicate`.
    pub fn find_and_update<P, F>(
        &mut self,
        mut predicate: P,
        mut updates: F,
    ) -> Result<usize, VbriefError>
    where
        P: FnMut(&TodoItem) -> bool,
        F: FnMut(&mut TodoItem),
    {
        let mut matched = 0;
        for item in self.todo_list()?.items.iter_mut() {
            if predicate(item) {
                updates(item);
                matched += 1;
            }
        }
        if matched == 0 {
            return Err(VbriefError::NoMatchingItems);
        }
        self.revalidate("find_and_update")?;
        Ok(matched)
    }

    // --- plan ---

    /// Inserts or overwrites a narrative, creating the plan when absent.
    pub fn add_narrative(
        &mut self,
        key: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(), VbriefError> {
        self.doc_mut()?
            .plan
            .get_or_insert_with(Plan::default)
            .add_narrative(key, content);
        self.revalidate("add_narrative")
    }

    /// Removing a missing narrative still revalidates.
    pub fn remove_narrative(&mut self, key: &str) -> Result<(), VbriefError> {
        self.plan()?.remove_narrative(key);
        self.revalidate("remove_narrative")
    }

    pub fn update_narrative<F>(&mut self, key: &str, updates: F) -> Result<(), VbriefError>
    where
        F: FnOnce(&mut String),
    {
        self.plan()?.update_narrative(key, updates)?;
        self.revalidate("update_narrative")
    }

    /// Appends a plan item, creating the plan when absent.
    pub fn add_plan_item(&mut self, item: PlanItem) -> Result<(), VbriefError> {
        self.doc_mut()?
            .plan
            .get_or_insert_with(Plan::default)
            .add_plan_item(item);
        self.revalidate("add_plan_item")
    }

    pub fn remove_plan_item(&mut self, index: usize) -> Result<PlanItem, VbriefError> {
        let removed = self.plan()?.remove_plan_item(index)?;
        self.revalidate("remove_plan_item")?;
        Ok(removed)
    }

    pub fn update_plan_item<F>(&mut self, index: usize, updates: F) -> Result<(), VbriefError>
    where
        F: FnOnce(&mut PlanItem),
    {
        self.plan()?.update_plan_item(index, updates)?;
        self.revalidate("update_plan_item")
    }

    pub fn update_plan_item_status(
        &mut self,
        index: usize,
        status: PlanItemStatus,
    ) -> Result<(), VbriefError> {
        self.update_plan_item(index, |item| item.status = status.as_str().to_string())
    }

    pub fn update_plan_status(&mut self, status: PlanStatus) -> Result<(), VbriefError> {
        self.plan()?.status = status.as_str().to_string();
        self.revalidate("update_plan_status")
    }

    pub fn find_and_update_plan_items<P, F>(
        &mut self,
        mut predicate: P,
        mut updates: F,
    ) -> Result<usize, VbriefError>
    where
        P: FnMut(&PlanItem) -> bool,
        F: FnMut(&mut PlanItem),
    {
        let mut matched = 0;
        for item in self.plan()?.items.iter_mut() {
            if predicate(item) {
                updates(item);
                matched += 1;
            }
        }
        if matched == 0 {
            return Err(VbriefError::NoMatchingItems);
        }
        self.revalidate("find_and_update_plan_items")?;
        Ok(matched)
    }

    // --- batches ---

    /// Runs `batch` against the document and validates once at the end.
    ///
    /// An error from `batch` is returned unchanged and skips validation;
    /// whatever the batch already changed stays changed.
    pub fn transaction<F>(&mut self, batch: F) -> Result<(), VbriefError>
    where
        F: FnOnce(&mut Document) -> Result<(), VbriefError>,
    {
        batch(self.doc_mut()?)?;
        self.revalidate("transaction")
    }
}
