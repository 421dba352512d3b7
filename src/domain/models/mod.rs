pub mod attempt;
pub mod config;
pub mod decay;
pub mod problem;
pub mod rank;
pub mod results;
pub mod user;

pub use attempt::{FreezeOutcome, Pricing, UserAttempt};
pub use config::{
    Config, DatabaseConfig, LogFormat, LoggingConfig, ProblemSourceConfig, ProblemSourceKind,
    RotationPolicy,
};
pub use problem::Problem;
pub use rank::{RankProgress, RankTable, RankTier};
pub use results::{
    AttemptResult, FinalizeProblemResult, ProblemStats, ResetProblemResult,
    UnfinalizeProblemResult,
};
pub use user::{LedgerEntry, User};
