//! Infrastructure layer module
//!
//! Ambient concerns that are not part of the scoring domain:
//! - Configuration management
//! - Logging infrastructure

pub mod config;
pub mod logging;
