// Production-state classification — where a story's edit stands relative
// to the production baseline.

#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::config::RelgateConfig;
use crate::context::AnalysisContext;
use crate::types::{
    BehindDetail, ComponentClassification, ComponentEdit, ComponentKey, ProductionSnapshot,
    ProductionStatus,
};

/// Classify one edit against the production snapshot for the same key.
///
/// Rule order matters: existence first, then comparability, then equality,
/// then direction. When comparison is impossible, `AheadOfProd` is the
/// safe default rather than a failure.
pub fn classify(edit: &ComponentEdit, snapshot: &ProductionSnapshot) -> ProductionStatus {
    if !snapshot.exists {
        return ProductionStatus::New;
    }
    let (Some(story_date), Some(prod_date)) = (edit.commit_date, snapshot.commit_date) else {
        return ProductionStatus::AheadOfProd;
    };
    if story_date == prod_date {
        ProductionStatus::SameAsProd
    } else if story_date > prod_date {
        ProductionStatus::AheadOfProd
    } else {
        ProductionStatus::BehindProd
    }
}

/// Enrichment for `BehindProd` results — a separate pass over the full
/// story list, never interleaved with classification.
///
/// Finds the "primary" owning story: among all stories editing `key`, the
/// one with the most recent commit date for that component. Day count is
/// `ceil((production − story) / 1 day)`; if the primary story's own date
/// is missing the count stays 0 and no warning is raised.
pub fn enrich_behind(
    key: &ComponentKey,
    production_date: DateTime<Utc>,
    context: &AnalysisContext,
    warning_days: i64,
) -> Option<BehindDetail> {
    let (story, story_date) = context
        .stories()
        .filter_map(|story| {
            let best = story
                .components
                .iter()
                .filter(|edit| &edit.key == key)
                .map(|edit| edit.commit_date)
                .max()?;
            Some((story, best))
        })
        .max_by_key(|(_, date)| *date)?;

    let days_behind = story_date.map_or(0, |date| ceil_days(production_date - date));
    Some(BehindDetail {
        primary_story_id: story.id.clone(),
        primary_story_title: story.title.clone(),
        story_commit_date: story_date,
        days_behind,
        is_warning: days_behind > warning_days,
    })
}

/// Classify every component in the analysis against its snapshot, with
/// behind-production enrichment applied afterwards.
///
/// Each component is judged by its most recent edit. A component with no
/// snapshot entry is treated as absent from production, i.e. `NEW`.
/// Output is sorted by component key.
pub fn classify_all(
    context: &AnalysisContext,
    snapshots: &HashMap<ComponentKey, ProductionSnapshot>,
    config: &RelgateConfig,
) -> Vec<ComponentClassification> {
    let missing = |key: &ComponentKey| ProductionSnapshot {
        key: key.clone(),
        exists: false,
        commit_date: None,
        commit_sha: None,
        author: None,
        branch: None,
    };

    let mut results: Vec<ComponentClassification> = context
        .usages()
        .filter_map(|usage| {
            let edit = usage.edits.first()?;
            let snapshot = snapshots
                .get(&usage.key)
                .cloned()
                .unwrap_or_else(|| missing(&usage.key));
            let status = classify(edit, &snapshot);

            let behind = match (status, snapshot.commit_date) {
                (ProductionStatus::BehindProd, Some(prod_date)) => enrich_behind(
                    &usage.key,
                    prod_date,
                    context,
                    config.production.behind_warning_days,
                ),
                _ => None,
            };

            Some(ComponentClassification {
                key: usage.key.clone(),
                status,
                behind,
            })
        })
        .collect();

    results.sort_by(|a, b| a.key.cmp(&b.key));
    debug!(components = results.len(), "Production classification complete");
    results
}

fn ceil_days(delta: chrono::Duration) -> i64 {
    (delta.num_seconds() as f64 / 86_400.0).ceil() as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::normalize::parse_timestamp;
    use crate::types::{Classification, Story};

    fn edit(story: &str, name: &str, date: Option<&str>) -> ComponentEdit {
        ComponentEdit {
            key: ComponentKey::new("ApexClass", name),
            story_id: story.to_string(),
            commit_date: date.and_then(parse_timestamp),
            author: None,
            production_commit_date: None,
            production_story_id: None,
            production_story_title: None,
        }
    }

    fn snapshot(name: &str, exists: bool, date: Option<&str>) -> ProductionSnapshot {
        ProductionSnapshot {
            key: ComponentKey::new("ApexClass", name),
            exists,
            commit_date: date.and_then(parse_timestamp),
            commit_sha: None,
            author: None,
            branch: None,
        }
    }

    #[test]
    fn missing_from_production_is_new() {
        // exists=false wins regardless of dates.
        let e = edit("US-1", "Foo", Some("2024-01-01"));
        assert_eq!(
            classify(&e, &snapshot("Foo", false, Some("2024-05-01"))),
            ProductionStatus::New
        );
    }

    #[test]
    fn incomparable_dates_default_ahead() {
        let dated = edit("US-1", "Foo", Some("2024-01-01"));
        let dateless = edit("US-1", "Foo", None);
        assert_eq!(
            classify(&dated, &snapshot("Foo", true, None)),
            ProductionStatus::AheadOfProd
        );
        assert_eq!(
            classify(&dateless, &snapshot("Foo", true, Some("2024-01-01"))),
            ProductionStatus::AheadOfProd
        );
    }

    #[test]
    fn equal_dates_same_as_prod() {
        let e = edit("US-1", "Foo", Some("2024-01-01"));
        assert_eq!(
            classify(&e, &snapshot("Foo", true, Some("2024-01-01"))),
            ProductionStatus::SameAsProd
        );
    }

    #[test]
    fn one_day_each_direction() {
        let e = edit("US-1", "Foo", Some("2024-01-02"));
        assert_eq!(
            classify(&e, &snapshot("Foo", true, Some("2024-01-01"))),
            ProductionStatus::AheadOfProd
        );
        assert_eq!(
            classify(&e, &snapshot("Foo", true, Some("2024-01-03"))),
            ProductionStatus::BehindProd
        );
    }

    fn context(stories: Vec<(&str, Vec<ComponentEdit>)>) -> AnalysisContext {
        AnalysisContext::build(
            stories
                .into_iter()
                .map(|(id, components)| Story {
                    id: id.to_string(),
                    title: format!("Story {id}"),
                    classification: Classification::Unknown,
                    components,
                })
                .collect(),
        )
    }

    #[test]
    fn enrichment_picks_most_recent_story() {
        let ctx = context(vec![
            ("US-1", vec![edit("US-1", "Foo", Some("2024-01-01"))]),
            ("US-2", vec![edit("US-2", "Foo", Some("2024-01-05"))]),
        ]);
        let prod_date = parse_timestamp("2024-01-20").unwrap();
        let detail =
            enrich_behind(&ComponentKey::new("ApexClass", "Foo"), prod_date, &ctx, 15).unwrap();
        assert_eq!(detail.primary_story_id, "US-2");
        assert_eq!(detail.primary_story_title, "Story US-2");
        assert_eq!(detail.days_behind, 15);
        assert!(!detail.is_warning, "exactly 15 days is not a warning");
    }

    #[test]
    fn enrichment_warning_past_threshold() {
        let ctx = context(vec![("US-1", vec![edit("US-1", "Foo", Some("2024-01-01"))])]);
        let prod_date = parse_timestamp("2024-01-17").unwrap();
        let detail =
            enrich_behind(&ComponentKey::new("ApexClass", "Foo"), prod_date, &ctx, 15).unwrap();
        assert_eq!(detail.days_behind, 16);
        assert!(detail.is_warning);
    }

    #[test]
    fn enrichment_days_are_ceiled() {
        let ctx = context(vec![(
            "US-1",
            vec![edit("US-1", "Foo", Some("2024-01-01T12:00:00Z"))],
        )]);
        // Half a day behind still counts as one day.
        let prod_date = parse_timestamp("2024-01-02").unwrap();
        let detail =
            enrich_behind(&ComponentKey::new("ApexClass", "Foo"), prod_date, &ctx, 15).unwrap();
        assert_eq!(detail.days_behind, 1);
    }

    #[test]
    fn enrichment_no_matching_story() {
        let ctx = context(vec![("US-1", vec![edit("US-1", "Foo", Some("2024-01-01"))])]);
        let prod_date = parse_timestamp("2024-01-20").unwrap();
        assert!(
            enrich_behind(&ComponentKey::new("ApexClass", "Other"), prod_date, &ctx, 15).is_none()
        );
    }

    #[test]
    fn classify_all_enriches_behind_only() {
        let ctx = context(vec![
            ("US-1", vec![edit("US-1", "Behind", Some("2024-01-01"))]),
            ("US-2", vec![edit("US-2", "Ahead", Some("2024-03-01"))]),
            ("US-3", vec![edit("US-3", "Fresh", Some("2024-03-01"))]),
        ]);
        let mut snapshots = HashMap::new();
        for snap in [
            snapshot("Behind", true, Some("2024-01-31")),
            snapshot("Ahead", true, Some("2024-01-01")),
            // No snapshot entry at all for "Fresh".
        ] {
            snapshots.insert(snap.key.clone(), snap);
        }

        let results = classify_all(&ctx, &snapshots, &RelgateConfig::default());
        assert_eq!(results.len(), 3);
        // Sorted by key: Ahead, Behind, Fresh.
        assert_eq!(results[0].status, ProductionStatus::AheadOfProd);
        assert!(results[0].behind.is_none());

        assert_eq!(results[1].status, ProductionStatus::BehindProd);
        let detail = results[1].behind.as_ref().unwrap();
        assert_eq!(detail.primary_story_id, "US-1");
        assert_eq!(detail.days_behind, 30);
        assert!(detail.is_warning);

        assert_eq!(results[2].status, ProductionStatus::New);
        assert!(results[2].behind.is_none());
    }
}
