//! Results returned by the scoring operations.

use serde::{Deserialize, Serialize};

use super::problem::Problem;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttemptResult {
    /// XP credited by this call; 0 unless it was the user's first solve.
    pub awarded_xp: i64,
    pub user_xp: i64,
    /// This user's attempt count on the problem.
    pub attempt_number: u32,
    pub total_problem_attempts: i64,
    pub total_problem_solves: i64,
    pub weighted_solves: f64,
    pub original_base_score: i64,
    pub current_base_score: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResetProblemResult {
    pub problem_number: String,
    pub cleared_user_attempts: u64,
    pub original_base_score: i64,
    pub current_base_score: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinalizeProblemResult {
    pub problem_number: String,
    pub final_base_score: i64,
    pub weighted_solves: f64,
    /// Solvers whose ledger moved.
    pub adjusted_users: u32,
    /// Legacy solvers priced for the first time without a ledger change.
    pub initialized_users: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnfinalizeProblemResult {
    pub problem_number: String,
    pub restored_base_score: i64,
    pub reverted_users: u32,
}

/// Read-only view of a problem's scoring state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProblemStats {
    pub problem: Problem,
    pub weighted_solves: f64,
}
