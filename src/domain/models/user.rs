//! User domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A user known to the ledger.
///
/// `external_id` is the chat platform's stable id; `id` is the internal key
/// used by the strict ledger path and by foreign keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub xp: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(external_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            external_id: external_id.into(),
            xp: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Balance after applying `delta`, clamped at zero.
    pub fn balance_after(&self, delta: i64) -> i64 {
        self.xp.saturating_add(delta).max(0)
    }
}

/// One applied XP movement, kept as an audit trail next to the balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub user_id: Uuid,
    /// Delta actually applied, after clamping at zero.
    pub delta: i64,
    pub balance_after: i64,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_balance_clamps_at_zero() {
        let mut user = User::new("u1");
        user.xp = 30;
        assert_eq!(user.balance_after(20), 50);
        assert_eq!(user.balance_after(-30), 0);
        assert_eq!(user.balance_after(-75), 0);
    }
}
