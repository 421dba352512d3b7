//! Rank thresholds and progress.

use serde::{Deserialize, Serialize};

/// A named rank reached at `min_xp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankTier {
    pub name: String,
    pub min_xp: i64,
}

impl RankTier {
    pub fn new(name: impl Into<String>, min_xp: i64) -> Self {
        Self { name: name.into(), min_xp }
    }
}

/// Where a balance sits on the rank ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankProgress {
    pub rank: String,
    /// XP still needed for the next rank; 0 at the top rank.
    pub progress_to_next: i64,
    /// Fraction of the way from the current rank to the next, in `[0, 1]`.
    pub level_progress: f64,
    /// XP at which the next rank starts; `None` at the top rank.
    pub next_milestone: Option<i64>,
}

/// Ascending rank ladder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RankTable {
    tiers: Vec<RankTier>,
}

impl Default for RankTable {
    fn default() -> Self {
        Self {
            tiers: vec![
                RankTier::new("Novice", 0),
                RankTier::new("Apprentice", 100),
                RankTier::new("Solver", 300),
                RankTier::new("Adept", 700),
                RankTier::new("Expert", 1_500),
                RankTier::new("Master", 3_000),
                RankTier::new("Grandmaster", 6_000),
            ],
        }
    }
}

impl RankTable {
    /// Build a table, checking that it starts at 0 and strictly ascends.
    pub fn new(tiers: Vec<RankTier>) -> Result<Self, String> {
        let table = Self { tiers };
        table.validate()?;
        Ok(table)
    }

    pub fn tiers(&self) -> &[RankTier] {
        &self.tiers
    }

    pub fn validate(&self) -> Result<(), String> {
        let first = self.tiers.first().ok_or("rank table cannot be empty")?;
        if first.min_xp != 0 {
            return Err(format!("first rank '{}' must start at 0 XP", first.name));
        }
        if let Some(tier) = self.tiers.iter().find(|t| t.name.trim().is_empty()) {
            return Err(format!("rank at {} XP has an empty name", tier.min_xp));
        }
        for pair in self.tiers.windows(2) {
            if pair[1].min_xp <= pair[0].min_xp {
                return Err(format!(
                    "rank '{}' ({} XP) must start above '{}' ({} XP)",
                    pair[1].name, pair[1].min_xp, pair[0].name, pair[0].min_xp
                ));
            }
        }
        Ok(())
    }

    /// Rank and progress for a balance. Negative balances count as 0.
    pub fn progress_for(&self, xp: i64) -> RankProgress {
        let xp = xp.max(0);
        let idx = self
            .tiers
            .iter()
            .rposition(|t| t.min_xp <= xp)
            .unwrap_or(0);
        let Some(current) = self.tiers.get(idx) else {
            return RankProgress {
                rank: String::new(),
                progress_to_next: 0,
                level_progress: 1.0,
                next_milestone: None,
            };
        };

        match self.tiers.get(idx + 1) {
            Some(next) => {
                let span = (next.min_xp - current.min_xp) as f64;
                RankProgress {
                    rank: current.name.clone(),
                    progress_to_next: next.min_xp - xp,
                    level_progress: ((xp - current.min_xp) as f64 / span).clamp(0.0, 1.0),
                    next_milestone: Some(next.min_xp),
                }
            }
            None => RankProgress {
                rank: current.name.clone(),
                progress_to_next: 0,
                level_progress: 1.0,
                next_milestone: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_within_rank() {
        let table = RankTable::default();
        let p = table.progress_for(200);
        assert_eq!(p.rank, "Apprentice");
        assert_eq!(p.next_milestone, Some(300));
        assert_eq!(p.progress_to_next, 100);
        assert!((p.level_progress - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_progress_on_boundary_and_top() {
        let table = RankTable::default();
        let p = table.progress_for(0);
        assert_eq!(p.rank, "Novice");
        assert!(p.level_progress.abs() < f64::EPSILON);

        let p = table.progress_for(300);
        assert_eq!(p.rank, "Solver");
        assert_eq!(p.progress_to_next, 400);

        let top = table.progress_for(10_000);
        assert_eq!(top.rank, "Grandmaster");
        assert_eq!(top.next_milestone, None);
        assert_eq!(top.progress_to_next, 0);
        assert!((top.level_progress - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validation() {
        assert!(RankTable::new(vec![]).is_err());
        assert!(RankTable::new(vec![RankTier::new("A", 10)]).is_err());
        assert!(RankTable::new(vec![RankTier::new("A", 0), RankTier::new("B", 0)]).is_err());
        assert!(RankTable::new(vec![RankTier::new("A", 0), RankTier::new(" ", 5)]).is_err());
        assert!(RankTable::new(vec![RankTier::new("A", 0), RankTier::new("B", 5)]).is_ok());
    }
}
