//! SQLite access to `problems`.

use chrono::Utc;
use sqlx::SqliteConnection;

use super::{parse_datetime, parse_optional_datetime};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::Problem;

/// Take the database write lock on behalf of `number` before any read.
///
/// SQLite has no row locks and a deferred transaction that reads first
/// cannot always upgrade to a writer later, so problem-scoped transactions
/// open with this write. Returns false when the problem does not exist.
pub async fn lock(conn: &mut SqliteConnection, number: &str) -> DomainResult<bool> {
    let result = sqlx::query("UPDATE problems SET updated_at = ? WHERE number = ?")
        .bind(Utc::now().to_rfc3339())
        .bind(number)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn get_by_number(conn: &mut SqliteConnection, number: &str) -> DomainResult<Option<Problem>> {
    let row: Option<ProblemRow> = sqlx::query_as("SELECT * FROM problems WHERE number = ?")
        .bind(number)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(TryInto::try_into).transpose()
}

/// Fetch a problem, inserting an unpriced row if it does not exist yet.
/// The flag is true when the row was created by this call.
///
/// The insert is a write statement whether or not it conflicts, so this
/// also takes the write lock like [`lock`].
pub async fn get_or_create(conn: &mut SqliteConnection, number: &str) -> DomainResult<(Problem, bool)> {
    let now = Utc::now().to_rfc3339();
    let result = sqlx::query(
        r#"INSERT INTO problems (number, original_base_score, base_score, created_at, updated_at)
           VALUES (?, 0, 0, ?, ?)
           ON CONFLICT(number) DO NOTHING"#
    )
    .bind(number)
    .bind(&now)
    .bind(&now)
    .execute(&mut *conn)
    .await?;
    let created = result.rows_affected() == 1;

    let problem = get_by_number(conn, number)
        .await?
        .ok_or_else(|| DomainError::ProblemNotFound(number.to_string()))?;
    Ok((problem, created))
}

pub async fn save(conn: &mut SqliteConnection, problem: &Problem) -> DomainResult<()> {
    let result = sqlx::query(
        r#"UPDATE problems SET original_base_score = ?, base_score = ?, attempts = ?,
           solves = ?, is_finalized = ?, finalized_at = ?, updated_at = ?
           WHERE id = ?"#
    )
    .bind(problem.original_base_score)
    .bind(problem.base_score)
    .bind(problem.attempts)
    .bind(problem.solves)
    .bind(problem.is_finalized)
    .bind(problem.finalized_at.map(|t| t.to_rfc3339()))
    .bind(Utc::now().to_rfc3339())
    .bind(problem.id)
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DomainError::ProblemNotFound(problem.number.clone()));
    }
    Ok(())
}

#[derive(sqlx::FromRow)]
struct ProblemRow {
    id: i64,
    number: String,
    original_base_score: i64,
    base_score: i64,
    attempts: i64,
    solves: i64,
    is_finalized: bool,
    finalized_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<ProblemRow> for Problem {
    type Error = DomainError;

    fn try_from(row: ProblemRow) -> Result<Self, Self::Error> {
        Ok(Problem {
            id: row.id,
            number: row.number,
            original_base_score: row.original_base_score,
            base_score: row.base_score,
            attempts: row.attempts,
            solves: row.solves,
            is_finalized: row.is_finalized,
            finalized_at: parse_optional_datetime(row.finalized_at)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::create_migrated_test_pool;

    #[tokio::test]
    async fn test_get_or_create_reports_creation_once() {
        let pool = create_migrated_test_pool().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();

        let (problem, created) = get_or_create(&mut conn, "12").await.unwrap();
        assert!(created);
        assert!(problem.needs_backfill());

        let (again, created) = get_or_create(&mut conn, "12").await.unwrap();
        assert!(!created);
        assert_eq!(again.id, problem.id);
    }

    #[tokio::test]
    async fn test_lock_and_save() {
        let pool = create_migrated_test_pool().await.unwrap();
        let mut conn = pool.acquire().await.unwrap();
        assert!(!lock(&mut conn, "missing").await.unwrap());

        let (mut problem, _) = get_or_create(&mut conn, "13").await.unwrap();
        assert!(lock(&mut conn, "13").await.unwrap());

        problem.set_original_base_score(100);
        problem.finalize(25, Utc::now()).unwrap();
        save(&mut conn, &problem).await.unwrap();

        let stored = get_by_number(&mut conn, "13").await.unwrap().unwrap();
        assert_eq!(stored.original_base_score, 100);
        assert_eq!(stored.base_score, 25);
        assert!(stored.is_finalized);
        assert!(stored.finalized_at.is_some());
    }
}
