// Text report rendering — the tables the release dashboard showed,
// printable on a terminal.

use std::fmt::Write as _;

use crate::types::{
    ComponentClassification, ConflictRecord, DecisionSummary, RollbackTarget, StoryRollbackPlan,
};

fn format_date(date: Option<chrono::DateTime<chrono::Utc>>) -> String {
    date.map_or_else(|| "(no date)".to_string(), |d| d.format("%Y-%m-%d").to_string())
}

/// Conflict list, one block per conflicted component.
pub fn render_conflicts(conflicts: &[ConflictRecord]) -> String {
    let mut out = String::new();
    if conflicts.is_empty() {
        let _ = writeln!(out, "No conflicts — no component is shared between stories.");
        return out;
    }

    let _ = writeln!(out, "{} conflicted component(s):", conflicts.len());
    let _ = writeln!(out);
    for record in conflicts {
        let _ = writeln!(
            out,
            "  {} [{}] — {} stories, {} day spread",
            record.key,
            record.risk,
            record.story_count(),
            record.days_behind
        );
        for party in &record.stories {
            let _ = writeln!(
                out,
                "    {} ({}) {}",
                party.story_id,
                format_date(party.commit_date),
                party.title
            );
        }
    }
    out
}

/// Production classification list with behind-production detail.
pub fn render_classifications(classifications: &[ComponentClassification]) -> String {
    let mut out = String::new();
    if classifications.is_empty() {
        let _ = writeln!(out, "No components to classify.");
        return out;
    }

    for c in classifications {
        let _ = write!(out, "  {:<14} {}", c.status.as_str(), c.key);
        if let Some(detail) = &c.behind {
            let warn = if detail.is_warning { "  ⚠" } else { "" };
            let _ = write!(
                out,
                " — {} days behind, last touched by {}{}",
                detail.days_behind, detail.primary_story_id, warn
            );
        }
        let _ = writeln!(out);
    }
    out
}

/// One story's rollback plan.
pub fn render_plan(plan: &StoryRollbackPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} — {} [{}]",
        plan.story_id, plan.title, plan.classification
    );
    let _ = writeln!(
        out,
        "  components: {} total, {} risky — recommendation: {}",
        plan.total_components, plan.risky_components, plan.recommendation
    );
    for entry in &plan.entries {
        let target = match &entry.to {
            RollbackTarget::Production { commit_date, .. } => {
                format!("roll back to production ({})", format_date(Some(*commit_date)))
            }
            RollbackTarget::PriorStory { story_id, commit_date } => {
                format!("roll back to {} ({})", story_id, format_date(*commit_date))
            }
            RollbackTarget::Unresolved => "no known prior owner".to_string(),
        };
        let owner = entry
            .owner_after
            .as_deref()
            .map_or(String::new(), |o| format!(", owner after: {o}"));
        let _ = writeln!(
            out,
            "    {} [{}] {} — {}{}",
            entry.key, entry.level, entry.reason, target, owner
        );
    }
    out
}

/// The cross-story decision summary table.
pub fn render_summary(summary: &DecisionSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} stories — full: {}, selective: {}, none: {} ({} risky components)",
        summary.plans.len(),
        summary.full,
        summary.selective,
        summary.none,
        summary.risky_components
    );
    let _ = writeln!(out);
    for plan in &summary.plans {
        let _ = writeln!(
            out,
            "  {:<12} {:<9} {:>3}/{:<3} risky  {}",
            plan.story_id,
            plan.recommendation.to_string(),
            plan.risky_components,
            plan.total_components,
            plan.title
        );
    }
    out
}

/// Machine-readable form of any report payload.
pub fn to_json<T: serde::Serialize>(value: &T) -> Result<String, crate::error::RenderError> {
    Ok(serde_json::to_string_pretty(value)?)
}
