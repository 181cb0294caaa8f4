//! relgate core library — conflict, production-state, and rollback-risk
//! engine for Salesforce release management.
//!
//! The flow is: [`ingest`] turns raw backend JSON into canonical stories,
//! [`context::AnalysisContext`] indexes them, and the [`analyze`]
//! functions derive conflict records, production classifications, and
//! rollback plans from the indexes. Everything is synchronous and rebuilt
//! wholesale per analysis payload; nothing is patched incrementally.

pub mod analyze;
pub mod config;
pub mod context;
pub mod error;
pub mod ingest;
pub mod render;
pub mod types;
