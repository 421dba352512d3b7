//! Problem source backed by a fixed table of scores.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::ProblemSource;

#[derive(Debug, Clone, Default)]
pub struct FixedProblemSource {
    scores: HashMap<String, i64>,
}

impl FixedProblemSource {
    pub fn new(scores: HashMap<String, i64>) -> Self {
        Self { scores }
    }

    pub fn with_score(mut self, problem_number: impl Into<String>, base_score: i64) -> Self {
        self.scores.insert(problem_number.into(), base_score);
        self
    }
}

#[async_trait]
impl ProblemSource for FixedProblemSource {
    async fn fetch_original_base_score(&self, problem_number: &str) -> DomainResult<i64> {
        match self.scores.get(problem_number) {
            Some(&score) if score > 0 => Ok(score),
            Some(&score) => Err(DomainError::ExternalSource(format!(
                "problem {problem_number} has non-positive base score {score}"
            ))),
            None => Err(DomainError::ExternalSource(format!(
                "problem {problem_number} is not listed"
            ))),
        }
    }
}
