//! Output rendering for the layer above the engine — plain text tables
//! and pretty-printed JSON. No DOM, no HTML; the consuming surface decides
//! presentation.

pub mod report;

pub use report::{render_classifications, render_conflicts, render_plan, render_summary, to_json};
