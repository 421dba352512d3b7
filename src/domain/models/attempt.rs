//! Per-(user, problem) attempt state.
//!
//! A row moves through two independent state machines:
//!
//! - the solve latch: `solved` flips false → true once and stays there;
//! - the pricing state: [`Pricing::Live`] while the problem scores openly,
//!   [`Pricing::Frozen`] between finalize and unfinalize, carrying exactly
//!   what is needed to undo the finalize re-pricing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::decay::award_for;

/// Pricing state of an award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Pricing {
    /// Award as priced at solve time.
    #[default]
    Live,
    /// Award re-priced by finalize. `baseline` is the award before the
    /// re-pricing and `delta` the ledger adjustment finalize applied.
    Frozen { baseline: i64, delta: i64 },
}

impl Pricing {
    /// True between finalize and unfinalize.
    pub fn is_frozen(&self) -> bool {
        matches!(self, Self::Frozen { .. })
    }
}

/// What finalize did to one solver's award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreezeOutcome {
    /// Legacy row that was never priced: award set, ledger untouched.
    Initialized,
    /// Award moved by `delta`, which must be applied to the ledger.
    Adjusted { delta: i64 },
    /// Award already matched the frozen price.
    Unchanged,
}

/// One user's attempt history on one problem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAttempt {
    pub id: i64,
    pub user_id: Uuid,
    pub problem_id: i64,
    pub attempts: u32,
    pub solved: bool,
    pub awarded_xp: i64,
    pub pricing: Pricing,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserAttempt {
    /// Apply the verdict of the attempt just counted. Returns true when this
    /// is the user's first solve of the problem.
    pub fn latch_solved(&mut self, is_correct: bool) -> bool {
        let first_solve = is_correct && !self.solved;
        self.solved = self.solved || is_correct;
        first_solve
    }

    /// Award before any finalize re-pricing.
    pub fn baseline(&self) -> i64 {
        match self.pricing {
            Pricing::Frozen { baseline, .. } => baseline,
            Pricing::Live => self.awarded_xp,
        }
    }

    /// Re-price the award against a frozen base score.
    pub fn freeze(&mut self, final_base_score: i64) -> FreezeOutcome {
        let baseline = self.baseline();
        let final_award = award_for(final_base_score, self.attempts);
        self.awarded_xp = final_award;

        if baseline == 0 {
            self.pricing = Pricing::Frozen { baseline: 0, delta: 0 };
            return FreezeOutcome::Initialized;
        }

        let delta = final_award - baseline;
        self.pricing = Pricing::Frozen { baseline, delta };
        if delta == 0 {
            FreezeOutcome::Unchanged
        } else {
            FreezeOutcome::Adjusted { delta }
        }
    }

    /// Replace the frozen delta with what the ledger actually applied, which
    /// is smaller than requested when the balance clamped at zero.
    pub fn settle_freeze(&mut self, applied: i64) {
        if let Pricing::Frozen { delta, .. } = &mut self.pricing {
            *delta = applied;
        }
    }

    /// Undo the last freeze. Returns the ledger delta that reverses it, or
    /// `None` if the award was never frozen.
    pub fn thaw(&mut self) -> Option<i64> {
        match self.pricing {
            Pricing::Frozen { baseline, delta } => {
                self.awarded_xp = baseline;
                self.pricing = Pricing::Live;
                Some(-delta)
            }
            Pricing::Live => None,
        }
    }
}
