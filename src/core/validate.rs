//! Document validation.
//!
//! Every rule runs on every call; violations are collected in check order and
//! never short-circuit. Narratives live in a `BTreeMap`, so narrative
//! violations come out in key order.
//!
//! # Rule order
//!
//! 1. `vBRIEFInfo.version` is non-empty
//! 2. exactly one of `todoList` / `plan`
//! 3. each todo item: title, then status
//! 4. plan: title, status, `proposal` narrative, narrative content, then each
//!    plan item's title and status

use crate::core::error::VbriefError;
use crate::core::model::{
    Document, ItemStatus, Plan, PlanItem, PlanItemStatus, PlanStatus, PROPOSAL_NARRATIVE,
    TodoItem, TodoList,
};
use std::fmt;

/// A single rule violation at a dotted field path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Ordered violations from one validation pass. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[ValidationError] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }

    pub fn contains_message(&self, needle: &str) -> bool {
        self.0.iter().any(|e| e.message.contains(needle))
    }

    /// Folds a non-empty list into `VbriefError::ValidationFailed`.
    pub fn into_result(self) -> Result<(), VbriefError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(VbriefError::ValidationFailed(self))
        }
    }

    fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError::new(field, message));
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return Ok(());
        }
        f.write_str("validation failed:")?;
        for err in &self.0 {
            write!(f, "\n  - {}", err)?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Rule set used by the updater after each mutation.
pub trait Validator {
    /// Full validation, folded into a single error.
    fn validate(&self, doc: &Document) -> Result<(), VbriefError>;

    /// Core requirements only.
    fn validate_core(&self, doc: &Document) -> Result<(), VbriefError> {
        self.validate(doc)
    }

    /// Validation with optional features. No extensions exist, so any
    /// requested name fails.
    fn validate_extensions(
        &self,
        doc: &Document,
        extensions: &[&str],
    ) -> Result<(), VbriefError> {
        if !extensions.is_empty() {
            return Err(VbriefError::ExtensionsNotSupported(
                extensions.iter().map(|e| e.to_string()).collect(),
            ));
        }
        self.validate(doc)
    }
}

/// The built-in vBRIEF rule set.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardValidator;

impl Validator for StandardValidator {
    fn validate(&self, doc: &Document) -> Result<(), VbriefError> {
        ensure_valid(doc)
    }
}

/// Collects every violation in `doc`.
pub fn validate(doc: &Document) -> ValidationErrors {
    let mut errors = ValidationErrors::default();

    if doc.info.version.is_empty() {
        errors.push("vBRIEFInfo.version", "version is required");
    }

    match (&doc.todo_list, &doc.plan) {
        (None, None) => errors.push("document", "must contain either todoList or plan"),
        (Some(_), Some(_)) => errors.push("document", "cannot contain both todoList and plan"),
        _ => {}
    }

    if let Some(list) = &doc.todo_list {
        validate_todo_list(list, &mut errors);
    }
    if let Some(plan) = &doc.plan {
        validate_plan(plan, &mut errors);
    }

    log::trace!("validated document: {} violation(s)", errors.len());
    errors
}

pub fn ensure_valid(doc: &Document) -> Result<(), VbriefError> {
    validate(doc).into_result()
}

/// Same rule set as [`ensure_valid`]; kept as the "core requirements" entry point.
pub fn validate_core(doc: &Document) -> Result<(), VbriefError> {
    ensure_valid(doc)
}

pub fn validate_extensions(doc: &Document, extensions: &[&str]) -> Result<(), VbriefError> {
    StandardValidator.validate_extensions(doc, extensions)
}

fn validate_todo_list(list: &TodoList, errors: &mut ValidationErrors) {
    for (i, item) in list.items.iter().enumerate() {
        validate_todo_item(item, i, errors);
    }
}

fn validate_todo_item(item: &TodoItem, index: usize, errors: &mut ValidationErrors) {
    let prefix = format!("todoList.items[{index}]");
    if item.title.is_empty() {
        errors.push(format!("{prefix}.title"), "title is required");
    }
    if !ItemStatus::is_valid(&item.status) {
        errors.push(
            format!("{prefix}.status"),
            format!("invalid status: {}", item.status),
        );
    }
}

fn validate_plan(plan: &Plan, errors: &mut ValidationErrors) {
    if plan.title.is_empty() {
        errors.push("plan.title", "title is required");
    }
    if !PlanStatus::is_valid(&plan.status) {
        errors.push("plan.status", format!("invalid status: {}", plan.status));
    }
    if !plan.narratives.contains_key(PROPOSAL_NARRATIVE) {
        errors.push("plan.narratives", "proposal narrative is required");
    }
    for (key, content) in &plan.narratives {
        if content.is_empty() {
            errors.push(format!("plan.narratives.{key}"), "content is required");
        }
    }
    for (i, item) in plan.items.iter().enumerate() {
        validate_plan_item(item, i, errors);
    }
}

fn validate_plan_item(item: &PlanItem, index: usize, errors: &mut ValidationErrors) {
    let prefix = format!("plan.items[{index}]");
    if item.title.is_empty() {
        errors.push(format!("{prefix}.title"), "title is required");
    }
    if !PlanItemStatus::is_valid(&item.status) {
        errors.push(
            format!("{prefix}.status"),
            format!("invalid status: {}", item.status),
        );
    }
}
