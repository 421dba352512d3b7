//! Curator actions on a problem: finalize, unfinalize and reset.
//!
//! Finalize freezes the problem's base score and re-prices every solver's
//! award against it, recording on each row what it takes to undo the
//! re-pricing. Unfinalize replays those records backwards.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, instrument};

use super::problem_locks::ProblemLocks;
use crate::adapters::sqlite::{attempt_store, problem_store, user_store};
use crate::domain::errors::{normalize_problem_number, DomainError, DomainResult};
use crate::domain::models::decay::{dynamic_base_score, weighted_solves};
use crate::domain::models::{
    FinalizeProblemResult, FreezeOutcome, Problem, ProblemStats, ResetProblemResult,
    UnfinalizeProblemResult,
};

/// Curator transitions on a problem's scoring.
pub struct ProblemFinalizer {
    pool: SqlitePool,
    locks: ProblemLocks,
}

impl ProblemFinalizer {
    pub fn new(pool: SqlitePool, locks: ProblemLocks) -> Self {
        Self { pool, locks }
    }

    #[instrument(skip(self))]
    pub async fn finalize(&self, problem_number: &str) -> DomainResult<FinalizeProblemResult> {
        let number = normalize_problem_number(problem_number)?;
        let _guard = self.locks.acquire(&number).await;
        let mut tx = self.pool.begin().await?;

        let mut problem = locked_problem(&mut tx, &number).await?;
        if problem.is_finalized {
            return Err(DomainError::AlreadyFinalized(number));
        }

        let mut rows = attempt_store::list_solved(&mut tx, problem.id).await?;
        let weighted = weighted_solves(rows.iter().map(|r| r.attempts));
        let final_base_score = dynamic_base_score(weighted);
        let reason = format!("finalize {number}");

        let mut adjusted_users = 0;
        let mut initialized_users = 0;
        for row in &mut rows {
            match row.freeze(final_base_score) {
                FreezeOutcome::Initialized => initialized_users += 1,
                FreezeOutcome::Adjusted { delta } => {
                    let change = user_store::apply_delta(&mut tx, row.user_id, delta, &reason).await?;
                    row.settle_freeze(change.applied);
                    adjusted_users += 1;
                }
                FreezeOutcome::Unchanged => {}
            }
            attempt_store::save(&mut tx, row).await?;
        }

        problem.finalize(final_base_score, Utc::now())?;
        problem_store::save(&mut tx, &problem).await?;
        tx.commit().await?;

        info!(
            problem = %number,
            final_base_score,
            weighted,
            adjusted_users,
            initialized_users,
            "problem finalized"
        );

        Ok(FinalizeProblemResult {
            problem_number: number,
            final_base_score,
            weighted_solves: weighted,
            adjusted_users,
            initialized_users,
        })
    }

    #[instrument(skip(self))]
    pub async fn unfinalize(&self, problem_number: &str) -> DomainResult<UnfinalizeProblemResult> {
        let number = normalize_problem_number(problem_number)?;
        let _guard = self.locks.acquire(&number).await;
        let mut tx = self.pool.begin().await?;

        let mut problem = locked_problem(&mut tx, &number).await?;
        if !problem.is_finalized {
            return Err(DomainError::NotFinalized(number));
        }

        let mut rows = attempt_store::list_solved(&mut tx, problem.id).await?;
        let reason = format!("unfinalize {number}");

        let mut reverted_users = 0;
        for row in &mut rows {
            let Some(inverse) = row.thaw() else {
                continue;
            };
            if inverse != 0 {
                user_store::apply_delta(&mut tx, row.user_id, inverse, &reason).await?;
                reverted_users += 1;
            }
            attempt_store::save(&mut tx, row).await?;
        }

        let weighted = weighted_solves(rows.iter().map(|r| r.attempts));
        let restored_base_score = dynamic_base_score(weighted);
        debug!(problem = %number, weighted, restored_base_score, "recomputed base score");

        problem.unfinalize(restored_base_score)?;
        problem_store::save(&mut tx, &problem).await?;
        tx.commit().await?;

        info!(problem = %number, restored_base_score, reverted_users, "problem unfinalized");

        Ok(UnfinalizeProblemResult {
            problem_number: number,
            restored_base_score,
            reverted_users,
        })
    }

    /// Wipe every attempt row of a problem and restore its sticker price.
    /// XP balances are left alone.
    #[instrument(skip(self))]
    pub async fn reset(&self, problem_number: &str) -> DomainResult<ResetProblemResult> {
        let number = normalize_problem_number(problem_number)?;
        let _guard = self.locks.acquire(&number).await;
        let mut tx = self.pool.begin().await?;

        let mut problem = locked_problem(&mut tx, &number).await?;
        let cleared_user_attempts = attempt_store::delete_for_problem(&mut tx, problem.id).await?;
        problem.reset();
        problem_store::save(&mut tx, &problem).await?;
        tx.commit().await?;

        info!(problem = %number, cleared_user_attempts, base_score = problem.base_score, "problem reset");

        Ok(ResetProblemResult {
            problem_number: number,
            cleared_user_attempts,
            original_base_score: problem.original_base_score,
            current_base_score: problem.base_score,
        })
    }

    /// Current counters and weighted solves of a problem.
    pub async fn stats(&self, problem_number: &str) -> DomainResult<ProblemStats> {
        let number = normalize_problem_number(problem_number)?;
        let mut conn = self.pool.acquire().await?;

        let problem = problem_store::get_by_number(&mut conn, &number)
            .await?
            .ok_or(DomainError::ProblemNotFound(number))?;
        let weighted = weighted_solves(attempt_store::solver_attempt_counts(&mut conn, problem.id).await?);

        Ok(ProblemStats { problem, weighted_solves: weighted })
    }
}

async fn locked_problem(conn: &mut SqliteConnection, number: &str) -> DomainResult<Problem> {
    if !problem_store::lock(conn, number).await? {
        return Err(DomainError::ProblemNotFound(number.to_string()));
    }
    problem_store::get_by_number(conn, number)
        .await?
        .ok_or_else(|| DomainError::ProblemNotFound(number.to_string()))
}
