//! vBRIEF document model.
//!
//! A document carries a `vBRIEFInfo` block and exactly one of a `TodoList`
//! (short-term memory) or a `Plan` (medium-term memory). Status fields stay
//! plain strings on the wire; the closed status enums below are what the
//! validator checks them against.

use crate::core::collection;
use crate::core::error::VbriefError;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Narrative key every plan must carry.
pub const PROPOSAL_NARRATIVE: &str = "proposal";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(rename = "vBRIEFInfo", default)]
    pub info: Info,
    #[serde(rename = "todoList", default, skip_serializing_if = "Option::is_none")]
    pub todo_list: Option<TodoList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
}

/// `null` decodes like an absent field; the validator, not the decoder,
/// reports what is missing.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Document-level metadata, appears once per file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub metadata: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TodoList {
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<TodoItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
}

impl TodoItem {
    pub fn new(title: impl Into<String>, status: ItemStatus) -> Self {
        Self {
            title: title.into(),
            status: status.as_str().to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub narratives: BTreeMap<String, String>,
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub items: Vec<PlanItem>,
}

impl Plan {
    pub fn new(title: impl Into<String>, status: PlanStatus) -> Self {
        Self {
            title: title.into(),
            status: status.as_str().to_string(),
            narratives: BTreeMap::new(),
            items: Vec::new(),
        }
    }
}

/// A stage of work within a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: String,
}

impl PlanItem {
    pub fn new(title: impl Into<String>, status: PlanItemStatus) -> Self {
        Self {
            title: title.into(),
            status: status.as_str().to_string(),
        }
    }
}

/// Returned when a string is not one of a status family's wire spellings.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown status: {0:?}")]
pub struct UnknownStatus(pub String);

/// Declares a closed status family with its wire spellings.
macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }

            /// Closed-set membership test against the wire spellings.
            pub fn is_valid(s: &str) -> bool {
                Self::ALL.iter().any(|status| status.as_str() == s)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownStatus;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|status| status.as_str() == s)
                    .ok_or_else(|| UnknownStatus(s.to_string()))
            }
        }
    };
}

status_enum! {
    /// Todo item status.
    ItemStatus {
        Pending => "pending",
        InProgress => "inProgress",
        Completed => "completed",
        Blocked => "blocked",
        Cancelled => "cancelled",
    }
}

status_enum! {
    PlanStatus {
        Draft => "draft",
        Proposed => "proposed",
        Approved => "approved",
        InProgress => "inProgress",
        Completed => "completed",
        Cancelled => "cancelled",
    }
}

status_enum! {
    PlanItemStatus {
        Pending => "pending",
        InProgress => "inProgress",
        Completed => "completed",
        Blocked => "blocked",
        Cancelled => "cancelled",
    }
}

// ---------------------------------------------------------------------------
// TodoList mutation
// ---------------------------------------------------------------------------

impl TodoList {
    pub fn add_item(&mut self, item: TodoItem) {
        collection::push(&mut self.items, item);
    }

    pub fn remove_item(&mut self, index: usize) -> Result<TodoItem, VbriefError> {
        collection::remove_at(&mut self.items, index)
    }

    pub fn update_item<F>(&mut self, index: usize, updates: F) -> Result<(), VbriefError>
    where
        F: FnOnce(&mut TodoItem),
    {
        collection::update_at(&mut self.items, index, updates)
    }

    pub fn find_item<P>(&self, predicate: P) -> Option<&TodoItem>
    where
        P: FnMut(&TodoItem) -> bool,
    {
        collection::find(&self.items, predicate)
    }

    pub fn find_item_mut<P>(&mut self, predicate: P) -> Option<&mut TodoItem>
    where
        P: FnMut(&TodoItem) -> bool,
    {
        collection::find_mut(&mut self.items, predicate)
    }
}

// ---------------------------------------------------------------------------
// Plan mutation
// ---------------------------------------------------------------------------

impl Plan {
    /// Inserts or overwrites the narrative stored under `key`.
    pub fn add_narrative(&mut self, key: impl Into<String>, content: impl Into<String>) {
        collection::insert_key(&mut self.narratives, key.into(), content.into());
    }

    /// Removing a missing narrative is a no-op.
    pub fn remove_narrative(&mut self, key: &str) -> Option<String> {
        collection::remove_key(&mut self.narratives, key)
    }

    pub fn update_narrative<F>(&mut self, key: &str, updates: F) -> Result<(), VbriefError>
    where
        F: FnOnce(&mut String),
    {
        collection::update_key(&mut self.narratives, key, updates)
    }

    pub fn add_plan_item(&mut self, item: PlanItem) {
        collection::push(&mut self.items, item);
    }

    pub fn remove_plan_item(&mut self, index: usize) -> Result<PlanItem, VbriefError> {
        collection::remove_at(&mut self.items, index)
    }

    pub fn update_plan_item<F>(&mut self, index: usize, updates: F) -> Result<(), VbriefError>
    where
        F: FnOnce(&mut PlanItem),
    {
        collection::update_at(&mut self.items, index, updates)
    }

    pub fn find_plan_item<P>(&self, predicate: P) -> Option<&PlanItem>
    where
        P: FnMut(&PlanItem) -> bool,
    {
        collection::find(&self.items, predicate)
    }

    pub fn find_plan_item_mut<P>(&mut self, predicate: P) -> Option<&mut PlanItem>
    where
        P: FnMut(&PlanItem) -> bool,
    {
        collection::find_mut(&mut self.items, predicate)
    }
}

// ---------------------------------------------------------------------------
// Document-level editing
// ---------------------------------------------------------------------------

impl Document {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            info: Info {
                version: version.into(),
                ..Info::default()
            },
            todo_list: None,
            plan: None,
        }
    }

    fn todo_list_mut(&mut self) -> Result<&mut TodoList, VbriefError> {
        self.todo_list.as_mut().ok_or(VbriefError::NoTodoList)
    }

    fn plan_mut(&mut self) -> Result<&mut Plan, VbriefError> {
        self.plan.as_mut().ok_or(VbriefError::NoPlan)
    }

    pub fn add_todo_item(&mut self, item: TodoItem) -> Result<(), VbriefError> {
        self.todo_list_mut()?.add_item(item);
        Ok(())
    }

    /// Replaces the item at `index` wholesale.
    pub fn update_todo_item(&mut self, index: usize, item: TodoItem) -> Result<(), VbriefError> {
        self.todo_list_mut()?
            .update_item(index, |existing| *existing = item)
    }

    pub fn update_todo_item_status(
        &mut self,
        index: usize,
        status: ItemStatus,
    ) -> Result<(), VbriefError> {
        self.todo_list_mut()?
            .update_item(index, |item| item.status = status.as_str().to_string())
    }

    pub fn remove_todo_item(&mut self, index: usize) -> Result<TodoItem, VbriefError> {
        self.todo_list_mut()?.remove_item(index)
    }

    /// Empty when the document has no todo list.
    pub fn todo_items(&self) -> &[TodoItem] {
        self.todo_list
            .as_ref()
            .map(|list| list.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn add_plan_item(&mut self, item: PlanItem) -> Result<(), VbriefError> {
        self.plan_mut()?.add_plan_item(item);
        Ok(())
    }

    pub fn update_plan_item(&mut self, index: usize, item: PlanItem) -> Result<(), VbriefError> {
        self.plan_mut()?
            .update_plan_item(index, |existing| *existing = item)
    }

    pub fn update_plan_item_status(
        &mut self,
        index: usize,
        status: PlanItemStatus,
    ) -> Result<(), VbriefError> {
        self.plan_mut()?
            .update_plan_item(index, |item| item.status = status.as_str().to_string())
    }

    pub fn remove_plan_item(&mut self, index: usize) -> Result<PlanItem, VbriefError> {
        self.plan_mut()?.remove_plan_item(index)
    }

    pub fn add_narrative(
        &mut self,
        key: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<(), VbriefError> {
        self.plan_mut()?.add_narrative(key, content);
        Ok(())
    }

    pub fn remove_narrative(&mut self, key: &str) -> Result<(), VbriefError> {
        self.plan_mut()?.remove_narrative(key);
        Ok(())
    }

    pub fn update_plan_status(&mut self, status: PlanStatus) -> Result<(), VbriefError> {
        self.plan_mut()?.status = status.as_str().to_string();
        Ok(())
    }

    pub fn plan_items(&self) -> &[PlanItem] {
        self.plan
            .as_ref()
            .map(|plan| plan.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn narratives(&self) -> Option<&BTreeMap<String, String>> {
        self.plan.as_ref().map(|plan| &plan.narratives)
    }
}
