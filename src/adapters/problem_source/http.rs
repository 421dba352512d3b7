//! HTTP problem source.
//!
//! Reads `GET {base_url}/problems/{number}` and expects a JSON body of the
//! form `{"base_score": 100}`. Any transport error, non-success status,
//! malformed body, or non-positive score is reported as
//! [`DomainError::ExternalSource`]. No retries; the caller decides.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::ProblemSource;

#[derive(Debug, Deserialize)]
struct ProblemScoreResponse {
    base_score: i64,
}

#[derive(Debug, Clone)]
pub struct HttpProblemSource {
    http: Client,
    base_url: String,
}

impl HttpProblemSource {
    /// Create a source whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> DomainResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("xp-ledger/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::ExternalSource(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn problem_url(&self, problem_number: &str) -> String {
        format!("{}/problems/{}", self.base_url, problem_number)
    }
}

#[async_trait]
impl ProblemSource for HttpProblemSource {
    async fn fetch_original_base_score(&self, problem_number: &str) -> DomainResult<i64> {
        let url = self.problem_url(problem_number);
        tracing::debug!(%url, "fetching original base score");

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| DomainError::ExternalSource(format!("request for problem {problem_number} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DomainError::ExternalSource(format!(
                "problem source returned {status} for problem {problem_number}"
            )));
        }

        let body: ProblemScoreResponse = response.json().await.map_err(|e| {
            DomainError::ExternalSource(format!("malformed score for problem {problem_number}: {e}"))
        })?;

        if body.base_score <= 0 {
            return Err(DomainError::ExternalSource(format!(
                "problem {problem_number} has non-positive base score {}",
                body.base_score
            )));
        }
        Ok(body.base_score)
    }
}
