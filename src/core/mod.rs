//! Core document model and the validation/mutation engine.
//!
//! Everything that decides whether a document is well-formed, and every
//! mutation that has to keep it that way, lives here.

pub mod collection;
pub mod config;
pub mod error;
pub mod model;
pub mod update;
pub mod validate;
