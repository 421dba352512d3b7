//! User ledger service.
//!
//! Owns the XP balances. There are two ways to move XP:
//!
//! - by external platform id ([`UserLedger::adjust_xp`]), which silently
//!   does nothing for a user the ledger has never seen;
//! - by internal key ([`UserLedger::adjust_xp_by_key`]), which fails with
//!   `UserNotFound` instead.

use sqlx::SqlitePool;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::adapters::sqlite::user_store;
use crate::domain::errors::{normalize_user_id, DomainError, DomainResult};
use crate::domain::models::{LedgerEntry, RankProgress, RankTable, User};

#[derive(Debug, Clone)]
pub struct UserLedger {
    pool: SqlitePool,
    ranks: RankTable,
}

impl UserLedger {
    pub fn new(pool: SqlitePool, ranks: RankTable) -> Self {
        Self { pool, ranks }
    }

    pub async fn get_or_create_user(&self, external_id: &str) -> DomainResult<User> {
        let external_id = normalize_user_id(external_id)?;
        let mut conn = self.pool.acquire().await?;
        user_store::get_or_create(&mut conn, &external_id).await
    }

    pub async fn find_user(&self, external_id: &str) -> DomainResult<Option<User>> {
        let external_id = normalize_user_id(external_id)?;
        let mut conn = self.pool.acquire().await?;
        user_store::find_by_external_id(&mut conn, &external_id).await
    }

    /// Apply `delta` to a user by external id. Returns the new balance, or
    /// `None` without touching anything when the user does not exist.
    #[instrument(skip(self))]
    pub async fn adjust_xp(&self, external_id: &str, delta: i64, reason: &str) -> DomainResult<Option<i64>> {
        let external_id = normalize_user_id(external_id)?;
        if delta == 0 {
            return Ok(self.find_user(&external_id).await?.map(|u| u.xp));
        }

        let mut tx = self.pool.begin().await?;
        if !user_store::lock_by_external_id(&mut tx, &external_id).await? {
            tracing::debug!(%external_id, "skipping XP adjustment for unknown user");
            return Ok(None);
        }
        let user = user_store::find_by_external_id(&mut tx, &external_id)
            .await?
            .ok_or_else(|| DomainError::DatabaseError(format!("user {external_id} vanished under lock")))?;
        let balance = user_store::apply_delta(&mut tx, user.id, delta, reason).await?.balance;
        tx.commit().await?;

        info!(%external_id, delta, balance, reason, "adjusted XP");
        Ok(Some(balance))
    }

    /// Apply `delta` to the user with internal key `user_id`.
    #[instrument(skip(self))]
    pub async fn adjust_xp_by_key(&self, user_id: Uuid, delta: i64, reason: &str) -> DomainResult<i64> {
        let mut tx = self.pool.begin().await?;
        let balance = user_store::apply_delta(&mut tx, user_id, delta, reason).await?.balance;
        tx.commit().await?;
        Ok(balance)
    }

    /// Credit `amount` XP, creating the user if needed. Returns the new total.
    pub async fn add_xp(&self, external_id: &str, amount: i64, reason: &str) -> DomainResult<i64> {
        self.grant(external_id, positive_amount(amount)?, reason).await
    }

    /// Debit `amount` XP (clamping at zero), creating the user if needed.
    pub async fn remove_xp(&self, external_id: &str, amount: i64, reason: &str) -> DomainResult<i64> {
        self.grant(external_id, -positive_amount(amount)?, reason).await
    }

    #[instrument(skip(self))]
    async fn grant(&self, external_id: &str, delta: i64, reason: &str) -> DomainResult<i64> {
        let external_id = normalize_user_id(external_id)?;
        let reason = if reason.trim().is_empty() { "manual adjustment" } else { reason.trim() };

        let mut tx = self.pool.begin().await?;
        let user = user_store::get_or_create(&mut tx, &external_id).await?;
        let balance = user_store::apply_delta(&mut tx, user.id, delta, reason).await?.balance;
        tx.commit().await?;

        info!(%external_id, delta, balance, reason, "manual XP adjustment");
        Ok(balance)
    }

    pub fn get_rank_and_progress(&self, xp: i64) -> RankProgress {
        self.ranks.progress_for(xp)
    }

    pub fn ranks(&self) -> &RankTable {
        &self.ranks
    }

    /// Latest ledger entries of a user, newest first. Empty for unknown users.
    pub async fn history(&self, external_id: &str, limit: u32) -> DomainResult<Vec<LedgerEntry>> {
        let external_id = normalize_user_id(external_id)?;
        let mut conn = self.pool.acquire().await?;
        match user_store::find_by_external_id(&mut conn, &external_id).await? {
            Some(user) => user_store::list_entries(&mut conn, user.id, limit).await,
            None => Ok(Vec::new()),
        }
    }
}

fn positive_amount(amount: i64) -> DomainResult<i64> {
    if amount <= 0 {
        return Err(DomainError::ValidationFailed(format!("XP amount must be positive, got {amount}")));
    }
    Ok(amount)
}
