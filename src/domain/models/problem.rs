//! Problem domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::{DomainError, DomainResult};

/// Aggregate scoring record of a posted problem.
///
/// `original_base_score` is the sticker price every original award is
/// priced against; it is captured once from the problem source and never
/// changes. `base_score` moves with every attempt until the problem is
/// finalized, after which it stays frozen until unfinalize.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: i64,
    pub number: String,
    pub original_base_score: i64,
    pub base_score: i64,
    pub attempts: i64,
    pub solves: i64,
    pub is_finalized: bool,
    pub finalized_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Problem {
    /// Rows created before original scores were tracked carry 0 here.
    pub fn needs_backfill(&self) -> bool {
        self.original_base_score <= 0
    }

    /// Record the sticker price fetched from the problem source. A row that
    /// has never been priced also takes it as its current base score.
    pub fn set_original_base_score(&mut self, score: i64) {
        if self.base_score <= 0 {
            self.base_score = score;
        }
        self.original_base_score = score;
    }

    /// Base score original awards are priced against.
    pub fn base_for_award(&self) -> i64 {
        if self.original_base_score > 0 {
            self.original_base_score
        } else {
            self.base_score
        }
    }

    /// Fail with `ProblemFinalized` once the score is frozen.
    pub fn ensure_open(&self) -> DomainResult<()> {
        if self.is_finalized {
            return Err(DomainError::ProblemFinalized(self.number.clone()));
        }
        Ok(())
    }

    /// Count one attempt, and one solve if it is the user's first.
    pub fn count_attempt(&mut self, first_solve: bool) {
        self.attempts += 1;
        if first_solve {
            self.solves += 1;
        }
    }

    /// Freeze the base score at `final_base_score`.
    pub fn finalize(&mut self, final_base_score: i64, now: DateTime<Utc>) -> DomainResult<()> {
        if self.is_finalized {
            return Err(DomainError::AlreadyFinalized(self.number.clone()));
        }
        self.base_score = final_base_score;
        self.is_finalized = true;
        self.finalized_at = Some(now);
        Ok(())
    }

    /// Reopen scoring with a recomputed base score.
    pub fn unfinalize(&mut self, restored_base_score: i64) -> DomainResult<()> {
        if !self.is_finalized {
            return Err(DomainError::NotFinalized(self.number.clone()));
        }
        self.base_score = restored_base_score;
        self.is_finalized = false;
        self.finalized_at = None;
        Ok(())
    }

    /// Clear counters and go back to the sticker price.
    pub fn reset(&mut self) {
        if self.original_base_score > 0 {
            self.base_score = self.original_base_score;
        }
        self.attempts = 0;
        self.solves = 0;
        self.is_finalized = false;
        self.finalized_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(original: i64, base: i64) -> Problem {
        let now = Utc::now();
        Problem {
            id: 1,
            number: "7".to_string(),
            original_base_score: original,
            base_score: base,
            attempts: 0,
            solves: 0,
            is_finalized: false,
            finalized_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_base_for_award_prefers_original() {
        assert_eq!(problem(100, 25).base_for_award(), 100);
        assert_eq!(problem(0, 30).base_for_award(), 30);
    }

    #[test]
    fn test_backfill_keeps_live_base_score() {
        let mut p = problem(0, 30);
        assert!(p.needs_backfill());
        p.set_original_base_score(90);
        assert_eq!(p.original_base_score, 90);
        assert_eq!(p.base_score, 30);

        let mut fresh = problem(0, 0);
        fresh.set_original_base_score(90);
        assert_eq!(fresh.base_score, 90);
    }

    #[test]
    fn test_finalize_transitions() {
        let mut p = problem(100, 25);
        p.finalize(25, Utc::now()).unwrap();
        assert!(p.is_finalized);
        assert!(matches!(p.ensure_open(), Err(DomainError::ProblemFinalized(_))));
        assert!(matches!(p.finalize(25, Utc::now()), Err(DomainError::AlreadyFinalized(_))));

        p.unfinalize(34).unwrap();
        assert!(!p.is_finalized);
        assert!(p.finalized_at.is_none());
        assert_eq!(p.base_score, 34);
        assert!(matches!(p.unfinalize(34), Err(DomainError::NotFinalized(_))));
    }

    #[test]
    fn test_count_attempt_and_reset() {
        let mut p = problem(100, 100);
        p.count_attempt(false);
        p.count_attempt(true);
        p.count_attempt(false);
        assert_eq!((p.attempts, p.solves), (3, 1));

        p.base_score = 25;
        p.reset();
        assert_eq!((p.attempts, p.solves, p.base_score), (0, 0, 100));

        let mut legacy = problem(0, 31);
        legacy.reset();
        assert_eq!(legacy.base_score, 31);
    }
}
