//! Common test utilities for integration tests
//!
//! Shared fixtures for wiring a scoring service onto a throwaway database.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use tempfile::TempDir;
use xp_ledger::adapters::sqlite::{create_migrated_test_pool, initialize_database};
use xp_ledger::domain::models::{Config, DatabaseConfig, RankTable};
use xp_ledger::{FixedProblemSource, ScoringService};

/// Create a temporary test database
///
/// Returns the path to a SQLite database file in a temporary directory.
#[allow(dead_code)]
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("test.db");
    (dir, db_path)
}

/// Problem source knowing `scores`.
pub fn fixed_source(scores: &[(&str, i64)]) -> Arc<FixedProblemSource> {
    let map: HashMap<String, i64> = scores.iter().map(|(n, s)| ((*n).to_string(), *s)).collect();
    Arc::new(FixedProblemSource::new(map))
}

/// Scoring service over an in-memory database.
#[allow(dead_code)]
pub async fn memory_service(scores: &[(&str, i64)]) -> (ScoringService, SqlitePool) {
    let pool = create_migrated_test_pool().await.expect("Failed to create test pool");
    let service = ScoringService::new(
        pool.clone(),
        fixed_source(scores),
        RankTable::default(),
        Duration::from_secs(1),
    );
    (service, pool)
}

/// Scoring service over a file database with a multi-connection pool.
#[allow(dead_code)]
pub async fn file_service(scores: &[(&str, i64)]) -> (ScoringService, SqlitePool, TempDir) {
    let (dir, db_path) = temp_db_path();
    let config = Config {
        database: DatabaseConfig {
            path: db_path.to_string_lossy().to_string(),
            max_connections: 8,
            acquire_timeout_secs: 10,
        },
        ..Config::default()
    };
    let pool = initialize_database(&config.database).await.expect("Failed to open database");
    let service = ScoringService::new(
        pool.clone(),
        fixed_source(scores),
        config.ranks.clone(),
        Duration::from_secs(1),
    );
    (service, pool, dir)
}

/// Current balance of a user, 0 if unknown.
#[allow(dead_code)]
pub async fn xp_of(service: &ScoringService, user: &str) -> i64 {
    service.find_user(user).await.expect("lookup failed").map_or(0, |u| u.xp)
}
