//! SQLite access to `users` and `xp_ledger_entries`.

use chrono::Utc;
use sqlx::SqliteConnection;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{LedgerEntry, User};

pub async fn get(conn: &mut SqliteConnection, id: Uuid) -> DomainResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE id = ?")
        .bind(id.to_string())
        .fetch_optional(&mut *conn)
        .await?;
    row.map(TryInto::try_into).transpose()
}

pub async fn find_by_external_id(conn: &mut SqliteConnection, external_id: &str) -> DomainResult<Option<User>> {
    let row: Option<UserRow> = sqlx::query_as("SELECT * FROM users WHERE external_id = ?")
        .bind(external_id)
        .fetch_optional(&mut *conn)
        .await?;
    row.map(TryInto::try_into).transpose()
}

/// Fetch a user by external id, inserting it with 0 XP on first sight.
pub async fn get_or_create(conn: &mut SqliteConnection, external_id: &str) -> DomainResult<User> {
    let candidate = User::new(external_id);
    let result = sqlx::query(
        r#"INSERT INTO users (id, external_id, xp, created_at, updated_at)
           VALUES (?, ?, 0, ?, ?)
           ON CONFLICT(external_id) DO NOTHING"#
    )
    .bind(candidate.id.to_string())
    .bind(&candidate.external_id)
    .bind(candidate.created_at.to_rfc3339())
    .bind(candidate.updated_at.to_rfc3339())
    .execute(&mut *conn)
    .await?;

    if result.rows_affected() == 1 {
        tracing::info!(user_id = %candidate.id, external_id, "created user");
        return Ok(candidate);
    }

    find_by_external_id(conn, external_id)
        .await?
        .ok_or_else(|| DomainError::DatabaseError(format!("user {external_id} vanished after upsert")))
}

/// Outcome of [`apply_delta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedDelta {
    /// Delta that reached the balance after clamping.
    pub applied: i64,
    /// Balance after the change.
    pub balance: i64,
}

impl AppliedDelta {
    fn unchanged(balance: i64) -> Self {
        Self { applied: 0, balance }
    }
}

/// Apply a signed XP delta to the user with internal key `id`.
///
/// Fails with `UserNotFound` when the user does not exist. The balance
/// clamps at zero; a delta with no effect writes nothing. Every balance
/// change is paired with a ledger entry holding the delta actually applied.
pub async fn apply_delta(
    conn: &mut SqliteConnection,
    id: Uuid,
    delta: i64,
    reason: &str,
) -> DomainResult<AppliedDelta> {
    if delta == 0 {
        let user = get(conn, id).await?.ok_or(DomainError::UserNotFound(id))?;
        return Ok(AppliedDelta::unchanged(user.xp));
    }

    // write before reading the balance, see problem_store::lock
    if !touch(conn, id).await? {
        return Err(DomainError::UserNotFound(id));
    }
    let user = get(conn, id).await?.ok_or(DomainError::UserNotFound(id))?;
    let balance = user.balance_after(delta);
    let applied = balance - user.xp;

    if applied == 0 {
        tracing::warn!(user_id = %id, delta, balance, reason, "XP delta had no effect at zero balance");
        return Ok(AppliedDelta::unchanged(user.xp));
    }
    if applied != delta {
        tracing::warn!(user_id = %id, delta, applied, reason, "XP delta clamped at zero");
    }

    let now = Utc::now().to_rfc3339();
    sqlx::query("UPDATE users SET xp = ?, updated_at = ? WHERE id = ?")
        .bind(balance)
        .bind(&now)
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;

    sqlx::query(
        r#"INSERT INTO xp_ledger_entries (user_id, delta, balance_after, reason, created_at)
           VALUES (?, ?, ?, ?, ?)"#
    )
    .bind(id.to_string())
    .bind(applied)
    .bind(balance)
    .bind(reason)
    .bind(&now)
    .execute(&mut *conn)
    .await?;

    tracing::debug!(user_id = %id, applied, balance, reason, "applied XP delta");
    Ok(AppliedDelta { applied, balance })
}

async fn touch(conn: &mut SqliteConnection, id: Uuid) -> DomainResult<bool> {
    let result = sqlx::query("UPDATE users SET updated_at = ? WHERE id = ?")
        .bind(Utc::now().to_rfc3339())
        .bind(id.to_string())
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Take the write lock for an external id. False when no such user exists.
pub async fn lock_by_external_id(conn: &mut SqliteConnection, external_id: &str) -> DomainResult<bool> {
    let result = sqlx::query("UPDATE users SET updated_at = ? WHERE external_id = ?")
        .bind(Utc::now().to_rfc3339())
        .bind(external_id)
        .execute(&mut *conn)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Most recent ledger entries for a user, newest first.
pub async fn list_entries(conn: &mut SqliteConnection, id: Uuid, limit: u32) -> DomainResult<Vec<LedgerEntry>> {
    let rows: Vec<LedgerEntryRow> = sqlx::query_as(
        "SELECT * FROM xp_ledger_entries WHERE user_id = ? ORDER BY id DESC LIMIT ?"
    )
    .bind(id.to_string())
    .bind(i64::from(limit))
    .fetch_all(&mut *conn)
    .await?;

    rows.into_iter().map(TryInto::try_into).collect()
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    external_id: String,
    xp: i64,
    created_at: String,
    updated_at: String,
}

impl TryFrom<UserRow> for User {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: parse_uuid(&row.id)?,
            external_id: row.external_id,
            xp: row.xp,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct LedgerEntryRow {
    id: i64,
    user_id: String,
    delta: i64,
    balance_after: i64,
    reason: String,
    created_at: String,
}

impl TryFrom<LedgerEntryRow> for LedgerEntry {
    type Error = DomainError;

    fn try_from(row: LedgerEntryRow) -> Result<Self, Self::Error> {
        Ok(LedgerEntry {
            id: row.id,
            user_id: parse_uuid(&row.user_id)?,
            delta: row.delta,
            balance_after: row.balance_after,
            reason: row.reason,
            created_at: parse_datetime(&row.created_at)?,
        })
    }
}
