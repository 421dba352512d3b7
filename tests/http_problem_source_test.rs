//! HTTP problem source against a mock server.

use std::sync::Arc;
use std::time::Duration;

use mockito::Server;
use xp_ledger::adapters::sqlite::create_migrated_test_pool;
use xp_ledger::domain::models::RankTable;
use xp_ledger::{DomainError, HttpProblemSource, ProblemSource, ScoringService};

#[tokio::test]
async fn test_fetch_base_score() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/problems/7")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"base_score": 150, "title": "ignored"}"#)
        .create_async()
        .await;

    let source = HttpProblemSource::new(server.url(), Duration::from_secs(2)).unwrap();
    assert_eq!(source.fetch_original_base_score("7").await.unwrap(), 150);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_error_statuses_and_bodies() {
    let mut server = Server::new_async().await;
    let _missing = server.mock("GET", "/problems/404").with_status(404).create_async().await;
    let _garbled = server
        .mock("GET", "/problems/5")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;
    let _free = server
        .mock("GET", "/problems/6")
        .with_status(200)
        .with_body(r#"{"base_score": 0}"#)
        .create_async()
        .await;

    let source = HttpProblemSource::new(server.url(), Duration::from_secs(2)).unwrap();
    for number in ["404", "5", "6"] {
        let err = source.fetch_original_base_score(number).await.unwrap_err();
        assert!(matches!(err, DomainError::ExternalSource(_)), "problem {number}: {err}");
    }
}

#[tokio::test]
async fn test_first_attempt_pulls_score_once() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/problems/12")
        .with_status(200)
        .with_body(r#"{"base_score": 120}"#)
        .expect(1)
        .create_async()
        .await;

    let pool = create_migrated_test_pool().await.unwrap();
    let source = Arc::new(HttpProblemSource::new(server.url(), Duration::from_secs(2)).unwrap());
    let service = ScoringService::new(pool, source, RankTable::default(), Duration::from_secs(2));

    let first = service.record_attempt("alice", "#12", false).await.unwrap();
    assert_eq!(first.original_base_score, 120);
    let second = service.record_attempt("alice", "12", true).await.unwrap();
    assert_eq!(second.awarded_xp, 96);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_source_fails_attempt() {
    let pool = create_migrated_test_pool().await.unwrap();
    // nothing listens on the discard port
    let source = Arc::new(HttpProblemSource::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap());
    let service = ScoringService::new(pool, source, RankTable::default(), Duration::from_secs(1));

    let err = service.record_attempt("alice", "1", true).await.unwrap_err();
    assert!(matches!(err, DomainError::ExternalSource(_)));
    assert!(matches!(service.problem_stats("1").await, Err(DomainError::ProblemNotFound(_))));
}
