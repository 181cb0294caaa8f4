// Rollback-risk evaluation and per-story plan synthesis.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]

use tracing::debug;

use crate::config::RelgateConfig;
use crate::context::AnalysisContext;
use crate::types::{
    ComponentEdit, ComponentUsage, Recommendation, RiskLevel, RollbackPlanEntry, RollbackRisk,
    RollbackTarget, Story, StoryRollbackPlan,
};

/// Judge how risky it is to roll back one component of one story.
///
/// Branch order is load-bearing: the shared-and-stale condition (`prod_ahead`)
/// must win over the generic shared/newer checks, because it is the one case
/// where rolling back to "the story's version" regresses every other story
/// depending on the component.
pub fn evaluate_risk(
    edit: &ComponentEdit,
    usage: &ComponentUsage,
    current_story: &str,
) -> RollbackRisk {
    let is_shared = usage.shared_beyond(current_story);
    let is_in_prod = edit.production_commit_date.is_some();
    let newer_than_prod = match (edit.commit_date, edit.production_commit_date) {
        (Some(story), Some(prod)) => story > prod,
        _ => false,
    };
    let prod_ahead = is_shared
        && match (edit.commit_date, edit.production_commit_date) {
            (Some(story), Some(prod)) => prod > story,
            _ => false,
        };

    let (level, label) = if prod_ahead {
        (
            RiskLevel::High,
            "shared component and production is newer than this change",
        )
    } else if is_shared && newer_than_prod {
        (RiskLevel::High, "shared component, newer than production")
    } else if is_shared {
        (RiskLevel::Medium, "shared component")
    } else if is_in_prod && newer_than_prod {
        (RiskLevel::Medium, "newer than production")
    } else if !usage.edits.is_empty()
        && usage.edits.iter().all(|e| e.story_id == current_story)
    {
        (RiskLevel::Low, "standalone component")
    } else {
        (RiskLevel::Low, "low risk")
    };

    RollbackRisk {
        level,
        label: label.to_string(),
        prod_ahead,
    }
}

/// Synthesize the rollback plan for one story.
///
/// Low-risk components need no action and are excluded. Risky components
/// roll back to production when a production commit exists, otherwise to
/// the most recent edit from another story; when neither exists the entry
/// is still reported with an unresolved target.
pub fn plan_story(
    story: &Story,
    context: &AnalysisContext,
    config: &RelgateConfig,
) -> StoryRollbackPlan {
    let total = story.components.len();
    let mut entries: Vec<RollbackPlanEntry> = Vec::new();

    for edit in &story.components {
        // A story not in the context still gets a self-consistent view.
        let solo;
        let usage = match context.usage_of(&edit.key) {
            Some(usage) => usage,
            None => {
                solo = ComponentUsage {
                    key: edit.key.clone(),
                    edits: vec![edit.clone()],
                    production: None,
                };
                &solo
            }
        };

        let risk = evaluate_risk(edit, usage, &story.id);
        if risk.level == RiskLevel::Low {
            continue;
        }

        let (to, owner_after) = rollback_target(edit, usage, &story.id);
        entries.push(RollbackPlanEntry {
            key: edit.key.clone(),
            level: risk.level,
            reason: risk.label,
            prod_ahead: risk.prod_ahead,
            to,
            owner_after,
        });
    }

    let risky = entries.len();
    let recommendation =
        recommend(total, risky, config.rollback.full_threshold_ratio);

    debug!(
        story = %story.id,
        total,
        risky,
        recommendation = %recommendation,
        "Rollback plan synthesized"
    );

    StoryRollbackPlan {
        story_id: story.id.clone(),
        title: story.title.clone(),
        classification: story.classification,
        total_components: total,
        risky_components: risky,
        entries,
        recommendation,
    }
}

fn rollback_target(
    edit: &ComponentEdit,
    usage: &ComponentUsage,
    current_story: &str,
) -> (RollbackTarget, Option<String>) {
    if let Some(prod_date) = edit.production_commit_date {
        let owner = edit.production_story_id.clone();
        return (
            RollbackTarget::Production {
                commit_date: prod_date,
                owner_story_id: owner.clone(),
            },
            owner,
        );
    }

    // Usage lists are newest first, so the first foreign edit is the most
    // recent one.
    if let Some(prior) = usage.edits.iter().find(|e| e.story_id != current_story) {
        return (
            RollbackTarget::PriorStory {
                story_id: prior.story_id.clone(),
                commit_date: prior.commit_date,
            },
            Some(prior.story_id.clone()),
        );
    }

    (RollbackTarget::Unresolved, None)
}

/// Story-level recommendation: `none` with zero risky components, `full`
/// when the risky share reaches the configured ratio (historically
/// `risky >= ceil(total / 2)`), otherwise `selective`.
fn recommend(total: usize, risky: usize, full_ratio: f64) -> Recommendation {
    if risky == 0 {
        Recommendation::None
    } else if risky >= (total as f64 * full_ratio).ceil() as usize {
        Recommendation::Full
    } else {
        Recommendation::Selective
    }
}
