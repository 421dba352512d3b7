//! Problem source adapters.

pub mod fixed;
pub mod http;

pub use fixed::FixedProblemSource;
pub use http::HttpProblemSource;

use std::sync::Arc;
use std::time::Duration;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ProblemSourceConfig, ProblemSourceKind};
use crate::domain::ports::ProblemSource;

/// Build the problem source selected by configuration.
pub fn from_config(config: &ProblemSourceConfig) -> DomainResult<Arc<dyn ProblemSource>> {
    match config.kind {
        ProblemSourceKind::Fixed => Ok(Arc::new(FixedProblemSource::new(config.scores.clone()))),
        ProblemSourceKind::Http => {
            let base_url = config.base_url.as_deref().ok_or_else(|| {
                DomainError::ValidationFailed("problem_source.base_url is required for the http source".to_string())
            })?;
            let source = HttpProblemSource::new(base_url, Duration::from_millis(config.timeout_ms))?;
            Ok(Arc::new(source))
        }
    }
}
