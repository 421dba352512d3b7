//! SQLite access to `user_attempts`.

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Pricing, UserAttempt};

/// Count one attempt for the pair, creating the row on the first one.
///
/// The upsert rides on the `(user_id, problem_id)` unique constraint, so two
/// writers can never create duplicate rows for a pair. The returned row
/// still carries the solve state from before this attempt.
pub async fn record(conn: &mut SqliteConnection, user_id: Uuid, problem_id: i64) -> DomainResult<UserAttempt> {
    let now = Utc::now().to_rfc3339();
    let row: AttemptRow = sqlx::query_as(
        r#"INSERT INTO user_attempts (user_id, problem_id, attempts, solved, awarded_xp,
               finalize_delta, created_at, updated_at)
           VALUES (?, ?, 1, 0, 0, 0, ?, ?)
           ON CONFLICT(user_id, problem_id)
           DO UPDATE SET attempts = attempts + 1, updated_at = excluded.updated_at
           RETURNING *"#
    )
    .bind(user_id.to_string())
    .bind(problem_id)
    .bind(&now)
    .bind(&now)
    .fetch_one(&mut *conn)
    .await?;

    row.try_into()
}

pub async fn get(conn: &mut SqliteConnection, user_id: Uuid, problem_id: i64) -> DomainResult<Option<UserAttempt>> {
    let row: Option<AttemptRow> = sqlx::query_as(
        "SELECT * FROM user_attempts WHERE user_id = ? AND problem_id = ?"
    )
    .bind(user_id.to_string())
    .bind(problem_id)
    .fetch_optional(&mut *conn)
    .await?;
    row.map(TryInto::try_into).transpose()
}

pub async fn save(conn: &mut SqliteConnection, attempt: &UserAttempt) -> DomainResult<()> {
    let (pre_finalize_awarded_xp, finalize_delta) = match attempt.pricing {
        Pricing::Live => (None, 0),
        Pricing::Frozen { baseline, delta } => (Some(baseline), delta),
    };

    let result = sqlx::query(
        r#"UPDATE user_attempts SET attempts = ?, solved = ?, awarded_xp = ?,
           pre_finalize_awarded_xp = ?, finalize_delta = ?, updated_at = ?
           WHERE id = ?"#
    )
    .bind(i64::from(attempt.attempts))
    .bind(attempt.solved)
    .bind(attempt.awarded_xp)
    .bind(pre_finalize_awarded_xp)
    .bind(finalize_delta)
    .bind(Utc::now().to_rfc3339())
    .bind(attempt.id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DomainError::DatabaseError(format!("user attempt {} not found", attempt.id)));
    }
    Ok(())
}

/// Every solved row of a problem, oldest first.
pub async fn list_solved(conn: &mut SqliteConnection, problem_id: i64) -> DomainResult<Vec<UserAttempt>> {
    let rows: Vec<AttemptRow> = sqlx::query_as(
        "SELECT * FROM user_attempts WHERE problem_id = ? AND solved = 1 ORDER BY id"
    )
    .bind(problem_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
}

/// Attempt counts of every solver of a problem.
pub async fn solver_attempt_counts(conn: &mut SqliteConnection, problem_id: i64) -> DomainResult<Vec<u32>> {
    let rows: Vec<(i64,)> = sqlx::query_as(
        "SELECT attempts FROM user_attempts WHERE problem_id = ? AND solved = 1"
    )
    .bind(problem_id)
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(|(n,)| to_attempt_count(n)).collect()
}

pub async fn delete_for_problem(conn: &mut SqliteConnection, problem_id: i64) -> DomainResult<u64> {
    let result = sqlx::query("DELETE FROM user_attempts WHERE problem_id = ?")
        .bind(problem_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected())
}

fn to_attempt_count(n: i64) -> DomainResult<u32> {
    u32::try_from(n).map_err(|_| DomainError::SerializationError(format!("Invalid attempt count: {n}")))
}

#[derive(sqlx::FromRow)]
struct AttemptRow {
    id: i64,
    user_id: String,
    problem_id: i64,
    attempts: i64,
    solved: bool,
    awarded_xp: i64,
    pre_finalize_awarded_xp: Option<i64>,
    finalize_delta: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<AttemptRow> for UserAttempt {
    type Error = DomainError;

    fn try_from(row: AttemptRow) -> Result<Self, Self::Error> {
        let pricing = match row.pre_finalize_awarded_xp {
            Some(baseline) => Pricing::Frozen { baseline, delta: row.finalize_delta },
            None => Pricing::Live,
        };

        Ok(UserAttempt {
            id: row.id,
            user_id: parse_uuid(&row.user_id)?,
            problem_id: row.problem_id,
            attempts: to_attempt_count(row.attempts)?,
            solved: row.solved,
            awarded_xp: row.awarded_xp,
            pricing,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
