//! Infrastructure adapters for external systems.

pub mod problem_source;
pub mod sqlite;
