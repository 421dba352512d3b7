//! Problem source port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Where a problem's original base score comes from.
///
/// Consulted only when a problem row is first created or still carries no
/// original score. Implementations report every failure as
/// [`DomainError::ExternalSource`](crate::domain::errors::DomainError::ExternalSource)
/// and never retry; the caller bounds each call with a timeout.
#[async_trait]
pub trait ProblemSource: Send + Sync {
    /// Original base score of `problem_number`. Always positive on success.
    async fn fetch_original_base_score(&self, problem_number: &str) -> DomainResult<i64>;
}
