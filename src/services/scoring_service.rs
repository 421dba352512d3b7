//! Facade over the scoring services.
//!
//! Callers (the CLI, or a chat front-end) talk to [`ScoringService`] only.
//! It wires the attempt tracker, the finalizer and the user ledger onto one
//! pool and one problem lock registry.

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use uuid::Uuid;

use super::attempt_tracker::AttemptTracker;
use super::problem_finalizer::ProblemFinalizer;
use super::problem_locks::ProblemLocks;
use super::user_ledger::UserLedger;
use crate::adapters::problem_source;
use crate::domain::errors::DomainResult;
use crate::domain::models::{
    AttemptResult, Config, FinalizeProblemResult, LedgerEntry, ProblemStats, RankProgress,
    RankTable, ResetProblemResult, UnfinalizeProblemResult, User,
};
use crate::domain::ports::ProblemSource;

pub struct ScoringService {
    tracker: AttemptTracker,
    finalizer: ProblemFinalizer,
    ledger: UserLedger,
}

impl ScoringService {
    pub fn new(
        pool: SqlitePool,
        source: Arc<dyn ProblemSource>,
        ranks: RankTable,
        source_timeout: Duration,
    ) -> Self {
        let locks = ProblemLocks::new();
        Self {
            tracker: AttemptTracker::new(pool.clone(), source, locks.clone(), source_timeout),
            finalizer: ProblemFinalizer::new(pool.clone(), locks),
            ledger: UserLedger::new(pool, ranks),
        }
    }

    /// Build the service from loaded configuration.
    pub fn from_config(pool: SqlitePool, config: &Config) -> DomainResult<Self> {
        let source = problem_source::from_config(&config.problem_source)?;
        Ok(Self::new(
            pool,
            source,
            config.ranks.clone(),
            Duration::from_millis(config.problem_source.timeout_ms),
        ))
    }

    pub async fn record_attempt(
        &self,
        user_external_id: &str,
        problem_number: &str,
        is_correct: bool,
    ) -> DomainResult<AttemptResult> {
        self.tracker.record_attempt(user_external_id, problem_number, is_correct).await
    }

    pub async fn get_or_create_user(&self, external_id: &str) -> DomainResult<User> {
        self.ledger.get_or_create_user(external_id).await
    }

    pub async fn find_user(&self, external_id: &str) -> DomainResult<Option<User>> {
        self.ledger.find_user(external_id).await
    }

    pub fn get_rank_and_progress(&self, xp: i64) -> RankProgress {
        self.ledger.get_rank_and_progress(xp)
    }

    pub async fn add_xp(&self, external_id: &str, amount: i64, reason: &str) -> DomainResult<i64> {
        self.ledger.add_xp(external_id, amount, reason).await
    }

    pub async fn remove_xp(&self, external_id: &str, amount: i64, reason: &str) -> DomainResult<i64> {
        self.ledger.remove_xp(external_id, amount, reason).await
    }

    /// Lenient adjustment by external id; `None` for unknown users.
    pub async fn adjust_xp(&self, external_id: &str, delta: i64, reason: &str) -> DomainResult<Option<i64>> {
        self.ledger.adjust_xp(external_id, delta, reason).await
    }

    /// Strict adjustment by internal key.
    pub async fn adjust_xp_by_key(&self, user_id: Uuid, delta: i64, reason: &str) -> DomainResult<i64> {
        self.ledger.adjust_xp_by_key(user_id, delta, reason).await
    }

    pub async fn xp_history(&self, external_id: &str, limit: u32) -> DomainResult<Vec<LedgerEntry>> {
        self.ledger.history(external_id, limit).await
    }

    pub async fn reset_problem_stats(&self, problem_number: &str) -> DomainResult<ResetProblemResult> {
        self.finalizer.reset(problem_number).await
    }

    pub async fn finalize_problem_scoring(&self, problem_number: &str) -> DomainResult<FinalizeProblemResult> {
        self.finalizer.finalize(problem_number).await
    }

    pub async fn unfinalize_problem_scoring(&self, problem_number: &str) -> DomainResult<UnfinalizeProblemResult> {
        self.finalizer.unfinalize(problem_number).await
    }

    pub async fn problem_stats(&self, problem_number: &str) -> DomainResult<ProblemStats> {
        self.finalizer.stats(problem_number).await
    }
}
