//! Analyzers over a built [`AnalysisContext`](crate::context::AnalysisContext).
//!
//! All functions here are synchronous and pure over in-memory structures;
//! the only caller obligation is to finish building the context before
//! reading any derived result.

pub mod conflict;
pub mod production;
pub mod rollback;
pub mod summary;

pub use conflict::detect_conflicts;
pub use production::{classify, classify_all, enrich_behind};
pub use rollback::{evaluate_risk, plan_story};
pub use summary::summarize;
