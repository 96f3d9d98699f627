//! vBRIEF: documents for agent short- and medium-term memory.
//!
//! A vBRIEF document holds a `vBRIEFInfo` block plus exactly one of:
//!
//! - a **todo list**: a flat ordered list of items, each with a title and status
//! - a **plan**: a titled design document with named narratives (a `proposal`
//!   is mandatory) and an ordered list of plan items
//!
//! # Core Principles
//!
//! - **Validated mutation**: the [`core::update::Updater`] re-validates after
//!   every change, so a successful call never leaves a document invalid
//! - **Full reporting**: validation collects every violation, never just the first
//! - **Structural vs. data errors**: bad indices and missing keys are reported
//!   separately from rule violations
//! - **In-memory only**: no I/O beyond the `Read`/`Write` handles callers pass in
//!
//! # Examples
//!
//! ```
//! use vbrief::core::update::Updater;
//! use vbrief::core::model::{ItemStatus, TodoItem};
//! use vbrief::plugins::builder::TodoListBuilder;
//!
//! let mut doc = TodoListBuilder::new("0.2")
//!     .add_pending_item("Write parser")
//!     .build();
//!
//! let mut updater = Updater::new(&mut doc);
//! updater.add_item(TodoItem::new("Write tests", ItemStatus::Pending)).unwrap();
//! updater.update_item_status(0, ItemStatus::Completed).unwrap();
//! assert!(updater.add_item(TodoItem::new("", ItemStatus::Pending)).is_err());
//! ```
//!
//! # Crate Structure
//!
//! - [`core`]: document model, collection mutators, validator, updater, errors, config
//! - [`plugins`]: builders, JSON/TRON codecs, and queries

pub mod core;
pub mod plugins;

pub use crate::core::error::VbriefError;
pub use crate::core::model::Document;
