//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - Console output in pretty or JSON form
//! - Optional rolling JSON log files
pub mod logger;

pub use logger::LoggerImpl;
