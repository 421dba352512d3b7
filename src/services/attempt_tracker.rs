//! Attempt tracking and original awards.

use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tracing::{debug, info, instrument, warn};

use super::problem_locks::ProblemLocks;
use crate::adapters::sqlite::{attempt_store, problem_store, user_store};
use crate::domain::errors::{normalize_problem_number, normalize_user_id, DomainError, DomainResult};
use crate::domain::models::decay::{award_for, dynamic_base_score, weighted_solves};
use crate::domain::models::AttemptResult;
use crate::domain::ports::ProblemSource;

/// Records submissions and prices first solves.
pub struct AttemptTracker {
    pool: SqlitePool,
    source: Arc<dyn ProblemSource>,
    locks: ProblemLocks,
    source_timeout: Duration,
}

impl AttemptTracker {
    pub fn new(
        pool: SqlitePool,
        source: Arc<dyn ProblemSource>,
        locks: ProblemLocks,
        source_timeout: Duration,
    ) -> Self {
        Self { pool, source, locks, source_timeout }
    }

    /// Record one submission of `problem_number` by `user_external_id`.
    ///
    /// Runs as a single transaction under the problem's lock. Only the
    /// user's first correct submission is awarded XP; every submission bumps
    /// the attempt counters, and the problem's base score is recomputed from
    /// all of its solvers each time.
    #[instrument(skip(self))]
    pub async fn record_attempt(
        &self,
        user_external_id: &str,
        problem_number: &str,
        is_correct: bool,
    ) -> DomainResult<AttemptResult> {
        let user_external_id = normalize_user_id(user_external_id)?;
        let number = normalize_problem_number(problem_number)?;

        let _guard = self.locks.acquire(&number).await;
        let mut tx = self.pool.begin().await?;

        let (mut problem, created) = problem_store::get_or_create(&mut tx, &number).await?;
        problem.ensure_open()?;

        if problem.needs_backfill() {
            let score = self.fetch_original_base_score(&number).await?;
            if !created {
                warn!(problem = %number, score, "backfilled original base score of legacy problem");
            }
            problem.set_original_base_score(score);
        }

        let user = user_store::get_or_create(&mut tx, &user_external_id).await?;
        let mut attempt = attempt_store::record(&mut tx, user.id, problem.id).await?;
        let first_solve = attempt.latch_solved(is_correct);
        problem.count_attempt(first_solve);

        let mut awarded_xp = 0;
        let mut user_xp = user.xp;
        if first_solve {
            // priced against the sticker price, not the live base score
            awarded_xp = award_for(problem.base_for_award(), attempt.attempts);
            attempt.awarded_xp = awarded_xp;
            attempt_store::save(&mut tx, &attempt).await?;
            user_xp = user_store::apply_delta(&mut tx, user.id, awarded_xp, &format!("solve {number}"))
                .await?
                .balance;
        }

        let weighted = weighted_solves(attempt_store::solver_attempt_counts(&mut tx, problem.id).await?);
        problem.base_score = dynamic_base_score(weighted);
        debug!(problem = %number, weighted, base_score = problem.base_score, "recomputed base score");

        problem_store::save(&mut tx, &problem).await?;
        tx.commit().await?;

        if first_solve {
            info!(
                user = %user_external_id,
                problem = %number,
                attempt = attempt.attempts,
                awarded_xp,
                "problem solved"
            );
        } else {
            info!(user = %user_external_id, problem = %number, attempt = attempt.attempts, is_correct, "attempt recorded");
        }

        Ok(AttemptResult {
            awarded_xp,
            user_xp,
            attempt_number: attempt.attempts,
            total_problem_attempts: problem.attempts,
            total_problem_solves: problem.solves,
            weighted_solves: weighted,
            original_base_score: problem.original_base_score,
            current_base_score: problem.base_score,
        })
    }

    async fn fetch_original_base_score(&self, number: &str) -> DomainResult<i64> {
        let score = tokio::time::timeout(self.source_timeout, self.source.fetch_original_base_score(number))
            .await
            .map_err(|_| {
                DomainError::ExternalSource(format!(
                    "lookup of problem {number} timed out after {}ms",
                    self.source_timeout.as_millis()
                ))
            })??;

        if score <= 0 {
            return Err(DomainError::ExternalSource(format!(
                "problem {number} has non-positive base score {score}"
            )));
        }
        Ok(score)
    }
}
