// Conflict detection — components edited by two or more distinct stories.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::context::AnalysisContext;
use crate::types::{ComponentEdit, ConflictParty, ConflictRecord, RiskLevel};

/// Find every component edited by at least `min_stories` distinct stories.
///
/// `now` substitutes for missing commit dates in the spread calculation —
/// a deliberate approximation that keeps dateless edits from silently
/// shrinking the spread. Callers pass a fixed timestamp so one analysis
/// run is internally consistent.
///
/// Output is sorted by risk level descending, ties broken by day spread
/// descending, then component key for a stable order.
pub fn detect_conflicts(
    context: &AnalysisContext,
    min_stories: usize,
    now: DateTime<Utc>,
) -> Vec<ConflictRecord> {
    let mut records: Vec<ConflictRecord> = context
        .usages()
        .filter_map(|usage| {
            // One edit per distinct story; a story editing the same
            // component twice keeps its most recent edit.
            let mut per_story: HashMap<&str, &ComponentEdit> = HashMap::new();
            for edit in &usage.edits {
                per_story
                    .entry(edit.story_id.as_str())
                    .and_modify(|kept| {
                        if edit.commit_date > kept.commit_date {
                            *kept = edit;
                        }
                    })
                    .or_insert(edit);
            }

            if per_story.len() < min_stories {
                return None;
            }

            let days_behind = day_spread(per_story.values().copied(), now);
            let risk = risk_for(per_story.len(), days_behind);

            let mut stories: Vec<ConflictParty> = per_story
                .into_values()
                .map(|edit| ConflictParty {
                    story_id: edit.story_id.clone(),
                    title: context
                        .story(&edit.story_id)
                        .map_or_else(|| edit.story_id.clone(), |s| s.title.clone()),
                    commit_date: edit.commit_date,
                    author: edit.author.clone(),
                })
                .collect();
            stories.sort_by(|a, b| {
                b.commit_date
                    .cmp(&a.commit_date)
                    .then_with(|| a.story_id.cmp(&b.story_id))
            });

            Some(ConflictRecord {
                key: usage.key.clone(),
                stories,
                days_behind,
                risk,
            })
        })
        .collect();

    records.sort_by(|a, b| {
        b.risk
            .cmp(&a.risk)
            .then_with(|| b.days_behind.cmp(&a.days_behind))
            .then_with(|| a.key.cmp(&b.key))
    });

    debug!(conflicts = records.len(), min_stories, "Conflict detection complete");
    records
}

/// Max day spread among the chosen edits' commit dates, with `now`
/// standing in for missing dates.
fn day_spread<'a>(edits: impl Iterator<Item = &'a ComponentEdit>, now: DateTime<Utc>) -> i64 {
    let dates: Vec<DateTime<Utc>> = edits.map(|e| e.commit_date.unwrap_or(now)).collect();
    match (dates.iter().min(), dates.iter().max()) {
        (Some(earliest), Some(latest)) => (*latest - *earliest).num_days().abs(),
        _ => 0,
    }
}

/// The risk matrix, reproduced exactly from the dashboard.
fn risk_for(story_count: usize, days_behind: i64) -> RiskLevel {
    if (story_count >= 3 && days_behind >= 5) || (story_count >= 2 && days_behind >= 10) {
        RiskLevel::High
    } else if story_count >= 3 || days_behind >= 5 {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
