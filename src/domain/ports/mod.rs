//! Port trait definitions (Hexagonal Architecture)
//!
//! - ProblemSource: lookup of a problem's original base score

pub mod problem_source;

pub use problem_source::ProblemSource;
