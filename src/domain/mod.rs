//! Domain layer for the XP ledger
//!
//! Scoring math, the user/problem/attempt models and their state
//! transitions, and the ports the core needs from the outside world.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{DomainError, DomainResult};
