//! End-to-end scoring: attempts, finalize, unfinalize and reset through the
//! public service facade.

mod common;

use common::{memory_service, xp_of};
use xp_ledger::adapters::sqlite::{attempt_store, problem_store};
use xp_ledger::domain::models::Pricing;
use xp_ledger::DomainError;

#[tokio::test]
async fn test_two_solver_scenario_round_trip() {
    let (service, pool) = memory_service(&[("7", 100)]).await;

    let a = service.record_attempt("alice", "7", true).await.unwrap();
    assert_eq!(a.awarded_xp, 100);
    assert_eq!(a.current_base_score, 25);

    let miss = service.record_attempt("bob", "7", false).await.unwrap();
    assert_eq!(miss.awarded_xp, 0);
    let b = service.record_attempt("bob", "7", true).await.unwrap();
    assert_eq!(b.awarded_xp, 80);
    assert_eq!(b.attempt_number, 2);
    assert_eq!(b.total_problem_attempts, 3);
    assert_eq!(b.total_problem_solves, 2);
    assert!((b.weighted_solves - 1.8).abs() < 1e-9);
    assert_eq!(b.original_base_score, 100);
    assert_eq!(b.current_base_score, 25);

    let finalized = service.finalize_problem_scoring("#7").await.unwrap();
    assert_eq!(finalized.final_base_score, 25);
    assert_eq!(finalized.adjusted_users, 2);
    assert_eq!(xp_of(&service, "alice").await, 25);
    assert_eq!(xp_of(&service, "bob").await, 20);

    {
        let mut conn = pool.acquire().await.unwrap();
        let problem = problem_store::get_by_number(&mut conn, "7").await.unwrap().unwrap();
        assert!(problem.is_finalized);
        assert!(problem.finalized_at.is_some());
        let rows = attempt_store::list_solved(&mut conn, problem.id).await.unwrap();
        assert_eq!(rows[0].pricing, Pricing::Frozen { baseline: 100, delta: -75 });
        assert_eq!(rows[1].pricing, Pricing::Frozen { baseline: 80, delta: -60 });
    }

    let unfinalized = service.unfinalize_problem_scoring("7").await.unwrap();
    assert_eq!(unfinalized.reverted_users, 2);
    assert_eq!(unfinalized.restored_base_score, 25);
    assert_eq!(xp_of(&service, "alice").await, 100);
    assert_eq!(xp_of(&service, "bob").await, 80);

    let history = service.xp_history("bob", 10).await.unwrap();
    let reasons: Vec<&str> = history.iter().map(|e| e.reason.as_str()).collect();
    assert_eq!(reasons, vec!["unfinalize 7", "finalize 7", "solve 7"]);
    assert_eq!(history.iter().map(|e| e.delta).sum::<i64>(), 80);
}

#[tokio::test]
async fn test_finalize_cycle_is_neutral_after_manual_debit() {
    let (service, _pool) = memory_service(&[("7", 100)]).await;
    service.record_attempt("alice", "7", true).await.unwrap();
    assert_eq!(service.remove_xp("alice", 90, "refund").await.unwrap(), 10);

    service.finalize_problem_scoring("7").await.unwrap();
    assert_eq!(xp_of(&service, "alice").await, 0);
    service.unfinalize_problem_scoring("7").await.unwrap();
    assert_eq!(xp_of(&service, "alice").await, 10);

    let history = service.xp_history("alice", 10).await.unwrap();
    let cycle: Vec<(&str, i64)> = history.iter().take(2).map(|e| (e.reason.as_str(), e.delta)).collect();
    assert_eq!(cycle, vec![("unfinalize 7", 10), ("finalize 7", -10)]);
}

#[tokio::test]
async fn test_second_finalize_cycle_reprices_from_original_awards() {
    let (service, _pool) = memory_service(&[("9", 200)]).await;
    service.record_attempt("alice", "9", true).await.unwrap();

    service.finalize_problem_scoring("9").await.unwrap();
    service.unfinalize_problem_scoring("9").await.unwrap();

    // a new solver after unfinalize moves the base score down further
    service.record_attempt("carol", "9", true).await.unwrap();
    let second = service.finalize_problem_scoring("9").await.unwrap();
    assert_eq!(second.final_base_score, 25);
    assert_eq!(xp_of(&service, "alice").await, 25);
    assert_eq!(xp_of(&service, "carol").await, 25);

    service.unfinalize_problem_scoring("9").await.unwrap();
    assert_eq!(xp_of(&service, "alice").await, 200);
    assert_eq!(xp_of(&service, "carol").await, 200);
}

#[tokio::test]
async fn test_correct_twice_awards_once() {
    let (service, _pool) = memory_service(&[("7", 100)]).await;

    let first = service.record_attempt("alice", "7", true).await.unwrap();
    let second = service.record_attempt("alice", "7", true).await.unwrap();

    assert_eq!(first.awarded_xp, 100);
    assert_eq!(second.awarded_xp, 0);
    assert_eq!(second.total_problem_solves, first.total_problem_solves);
    assert_eq!(xp_of(&service, "alice").await, 100);
}

#[tokio::test]
async fn test_reset_clears_problem_but_not_balances() {
    let (service, _pool) = memory_service(&[("7", 100)]).await;
    service.record_attempt("alice", "7", true).await.unwrap();
    service.record_attempt("bob", "7", false).await.unwrap();
    service.record_attempt("bob", "7", true).await.unwrap();

    let reset = service.reset_problem_stats("7").await.unwrap();
    assert_eq!(reset.cleared_user_attempts, 2);
    assert_eq!(reset.current_base_score, 100);

    let stats = service.problem_stats("7").await.unwrap();
    assert_eq!(stats.problem.attempts, 0);
    assert_eq!(stats.problem.solves, 0);
    assert_eq!(stats.problem.base_score, 100);
    assert_eq!(xp_of(&service, "alice").await, 100);
    assert_eq!(xp_of(&service, "bob").await, 80);
}

#[tokio::test]
async fn test_transition_errors() {
    let (service, _pool) = memory_service(&[("7", 100)]).await;

    assert!(matches!(
        service.finalize_problem_scoring("7").await,
        Err(DomainError::ProblemNotFound(_))
    ));

    service.record_attempt("alice", "7", false).await.unwrap();
    assert!(matches!(
        service.unfinalize_problem_scoring("7").await,
        Err(DomainError::NotFinalized(_))
    ));

    let finalized = service.finalize_problem_scoring("7").await.unwrap();
    assert_eq!(finalized.adjusted_users, 0);
    assert_eq!(finalized.final_base_score, 34);
    assert!(matches!(
        service.finalize_problem_scoring("7").await,
        Err(DomainError::AlreadyFinalized(_))
    ));
    assert!(matches!(
        service.record_attempt("alice", "7", true).await,
        Err(DomainError::ProblemFinalized(_))
    ));
}

#[tokio::test]
async fn test_manual_adjustments_and_rank() {
    let (service, _pool) = memory_service(&[]).await;

    assert_eq!(service.adjust_xp("nobody", 10, "bonus").await.unwrap(), None);
    assert_eq!(service.add_xp("dana", 350, "event").await.unwrap(), 350);
    assert_eq!(service.remove_xp("dana", 50, "typo").await.unwrap(), 300);
    assert_eq!(service.adjust_xp("dana", -400, "penalty").await.unwrap(), Some(0));

    let user = service.get_or_create_user("dana").await.unwrap();
    assert_eq!(service.adjust_xp_by_key(user.id, 120, "restore").await.unwrap(), 120);

    let progress = service.get_rank_and_progress(120);
    assert_eq!(progress.rank, "Apprentice");
    assert_eq!(progress.next_milestone, Some(300));
    assert_eq!(progress.progress_to_next, 180);
}

#[tokio::test]
async fn test_invalid_identifiers_are_rejected() {
    let (service, _pool) = memory_service(&[("7", 100)]).await;

    assert!(matches!(
        service.record_attempt("", "7", true).await,
        Err(DomainError::ValidationFailed(_))
    ));
    assert!(matches!(
        service.record_attempt("alice", "#", true).await,
        Err(DomainError::ValidationFailed(_))
    ));
    assert!(matches!(
        service.record_attempt("al ice", "7", true).await,
        Err(DomainError::ValidationFailed(_))
    ));
}
