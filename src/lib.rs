//! xp-ledger - problem scoring and XP ledger
//!
//! Awards experience points for solving posted problems. Every attempt feeds
//! a decaying per-attempt weight; a problem's base score falls as more users
//! solve it. Curators can finalize a problem, which re-prices every solver's
//! award against the frozen base score, and unfinalize it again, which
//! restores the exact earlier awards.
//!
//! # Architecture
//!
//! The crate follows a hexagonal layout:
//!
//! - **Domain Layer** (`domain`): models, the decay model, errors and ports
//! - **Adapters** (`adapters`): SQLite persistence and problem sources
//! - **Service Layer** (`services`): transactional scoring operations
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```ignore
//! use xp_ledger::{initialize_database, ConfigLoader, ScoringService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let pool = initialize_database(&config.database).await?;
//!     let service = ScoringService::from_config(pool, &config)?;
//!     let result = service.record_attempt("alice", "#7", true).await?;
//!     println!("awarded {} XP", result.awarded_xp);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::problem_source::{FixedProblemSource, HttpProblemSource};
pub use adapters::sqlite::initialize_database;
pub use domain::models::{
    AttemptResult, Config, FinalizeProblemResult, LedgerEntry, Problem, ProblemStats,
    RankProgress, RankTable, ResetProblemResult, UnfinalizeProblemResult, User,
};
pub use domain::ports::ProblemSource;
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::ScoringService;
