pub mod attempt_tracker;
pub mod problem_finalizer;
pub mod problem_locks;
pub mod scoring_service;
pub mod user_ledger;

pub use attempt_tracker::AttemptTracker;
pub use problem_finalizer::ProblemFinalizer;
pub use problem_locks::ProblemLocks;
pub use scoring_service::ScoringService;
pub use user_ledger::UserLedger;
