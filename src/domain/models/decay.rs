//! Decay model.
//!
//! Pure scoring math: how much a solve is worth given the number of attempts
//! it took, and how a problem's base score falls as more users solve it.
//! The base score curve is a fitted sum of two decaying exponentials that
//! never drops below [`MIN_BASE_SCORE`].

/// Multiplicative penalty applied per wrong attempt.
pub const DECAY: f64 = 0.8;

/// Wrong attempts beyond this count no longer reduce the weight.
pub const MAX_WRONG_ATTEMPTS: u32 = 5;

/// Floor of the dynamic base score.
pub const MIN_BASE_SCORE: i64 = 25;

const CURVE_A1: f64 = 8.90125;
const CURVE_A1_RATE: f64 = -0.027_932_3;
const CURVE_B1: f64 = 24.6239;
const CURVE_B1_RATE: f64 = -0.402_639;

/// Number of penalized wrong attempts for a solve that took `attempts` tries.
pub fn wrong_attempts(attempts: u32) -> u32 {
    attempts.saturating_sub(1).min(MAX_WRONG_ATTEMPTS)
}

/// Weight of a solve that took `attempts` tries: `0.8 ^ wrong_attempts`.
///
/// 1.0 for a first-try solve, bottoming out at `0.8^5` from the sixth
/// attempt onwards.
pub fn solve_weight(attempts: u32) -> f64 {
    DECAY.powi(wrong_attempts(attempts) as i32)
}

/// Base score for a problem with `weighted_solves` weighted solvers.
///
/// Rounds half away from zero before clamping to [`MIN_BASE_SCORE`].
pub fn dynamic_base_score(weighted_solves: f64) -> i64 {
    let w = weighted_solves.max(0.0);
    let raw = CURVE_A1 * (CURVE_A1_RATE * w).exp() + CURVE_B1 * (CURVE_B1_RATE * w).exp();
    (raw.round() as i64).max(MIN_BASE_SCORE)
}

/// Sum of solve weights over the attempt counts of every solver.
pub fn weighted_solves<I>(solver_attempts: I) -> f64
where
    I: IntoIterator<Item = u32>,
{
    solver_attempts.into_iter().map(solve_weight).sum()
}

/// XP for a solve priced against `base_score`, floored per user.
pub fn award_for(base_score: i64, attempts: u32) -> i64 {
    (base_score as f64 * solve_weight(attempts)).floor() as i64
}
