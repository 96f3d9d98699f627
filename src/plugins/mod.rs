//! Collaborators around the core: construction, encoding, and read-only queries.

pub mod builder;
pub mod codec;
pub mod query;
pub mod tron;
