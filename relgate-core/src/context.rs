//! Analysis context — the two indexes every analyzer reads.
//!
//! Built once per analysis payload and treated as immutable afterwards.
//! A new payload means a new context; nothing is patched in place, because
//! risk and conflict verdicts depend on the complete cross-story usage
//! list being present.

use std::collections::{BTreeMap, HashMap};

use tracing::info;

use crate::types::{ComponentKey, ComponentUsage, ProductionBaseline, Story};

/// Story and component-usage indexes for one analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisContext {
    /// Story id → story. `BTreeMap` so every consumer iterates stories in
    /// id order.
    stories: BTreeMap<String, Story>,
    /// Component key → all edits of that component across all stories.
    usage: HashMap<ComponentKey, ComponentUsage>,
}

impl AnalysisContext {
    /// Build both indexes from a normalized story list.
    ///
    /// Pure function of its input: no I/O, and the same story list always
    /// produces the same context. Duplicate story ids resolve last-write-
    /// wins; duplicate edits of one component by one story are kept, and
    /// consumers reduce them as needed.
    pub fn build(stories: Vec<Story>) -> Self {
        let mut usage: HashMap<ComponentKey, ComponentUsage> = HashMap::new();
        let mut story_index: BTreeMap<String, Story> = BTreeMap::new();

        for story in stories {
            story_index.insert(story.id.clone(), story);
        }

        for story in story_index.values() {
            for edit in &story.components {
                usage
                    .entry(edit.key.clone())
                    .or_insert_with(|| ComponentUsage {
                        key: edit.key.clone(),
                        edits: Vec::new(),
                        production: None,
                    })
                    .edits
                    .push(edit.clone());
            }
        }

        for entry in usage.values_mut() {
            // Newest first; edits with no timestamp sort last.
            entry.edits.sort_by(|a, b| match (a.commit_date, b.commit_date) {
                (Some(da), Some(db)) => db.cmp(&da),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            });
            let baseline = production_baseline(entry);
            entry.production = baseline;
        }

        let context = Self {
            stories: story_index,
            usage,
        };
        info!(
            stories = context.stories.len(),
            components = context.usage.len(),
            "Analysis context built"
        );
        context
    }

    pub fn story(&self, id: &str) -> Option<&Story> {
        self.stories.get(id)
    }

    /// Stories in id order.
    pub fn stories(&self) -> impl Iterator<Item = &Story> {
        self.stories.values()
    }

    pub fn usage_of(&self, key: &ComponentKey) -> Option<&ComponentUsage> {
        self.usage.get(key)
    }

    pub fn usages(&self) -> impl Iterator<Item = &ComponentUsage> {
        self.usage.values()
    }

    pub fn story_count(&self) -> usize {
        self.stories.len()
    }

    pub fn component_count(&self) -> usize {
        self.usage.len()
    }
}

/// Most recent production linkage across a component's edits, if any edit
/// carries one.
fn production_baseline(usage: &ComponentUsage) -> Option<ProductionBaseline> {
    usage
        .edits
        .iter()
        .filter_map(|edit| {
            edit.production_commit_date.map(|date| ProductionBaseline {
                commit_date: date,
                story_id: edit.production_story_id.clone(),
                story_title: edit.production_story_title.clone(),
            })
        })
        .max_by_key(|baseline| baseline.commit_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::normalize::parse_timestamp;
    use crate::types::{Classification, ComponentEdit};

    fn edit(story: &str, kind: &str, name: &str, date: Option<&str>) -> ComponentEdit {
        ComponentEdit {
            key: ComponentKey::new(kind, name),
            story_id: story.to_string(),
            commit_date: date.and_then(parse_timestamp),
            author: None,
            production_commit_date: None,
            production_story_id: None,
            production_story_title: None,
        }
    }

    fn story(id: &str, components: Vec<ComponentEdit>) -> Story {
        Story {
            id: id.to_string(),
            title: id.to_string(),
            classification: Classification::Unknown,
            components,
        }
    }

    #[test]
    fn builds_both_indexes() {
        let context = AnalysisContext::build(vec![
            story("US-1", vec![edit("US-1", "ApexClass", "Foo", Some("2024-01-01"))]),
            story("US-2", vec![edit("US-2", "ApexClass", "Foo", Some("2024-01-10"))]),
        ]);

        assert_eq!(context.story_count(), 2);
        assert_eq!(context.component_count(), 1);
        let usage = context
            .usage_of(&ComponentKey::new("ApexClass", "Foo"))
            .unwrap();
        assert_eq!(usage.edits.len(), 2);
    }

    #[test]
    fn duplicate_story_ids_last_write_wins() {
        let context = AnalysisContext::build(vec![
            story("US-1", vec![edit("US-1", "ApexClass", "Old", None)]),
            story("US-1", vec![edit("US-1", "ApexClass", "New", None)]),
        ]);
        assert_eq!(context.story_count(), 1);
        let surviving = context.story("US-1").unwrap();
        assert_eq!(surviving.components[0].key.name, "New");
        // The replaced story's edits are not indexed.
        assert!(context.usage_of(&ComponentKey::new("ApexClass", "Old")).is_none());
    }

    #[test]
    fn usage_ordered_newest_first_missing_dates_last() {
        let context = AnalysisContext::build(vec![
            story("US-1", vec![edit("US-1", "ApexClass", "Foo", Some("2024-01-01"))]),
            story("US-2", vec![edit("US-2", "ApexClass", "Foo", None)]),
            story("US-3", vec![edit("US-3", "ApexClass", "Foo", Some("2024-02-01"))]),
        ]);
        let usage = context
            .usage_of(&ComponentKey::new("ApexClass", "Foo"))
            .unwrap();
        let order: Vec<_> = usage.edits.iter().map(|e| e.story_id.as_str()).collect();
        assert_eq!(order, ["US-3", "US-1", "US-2"]);
    }

    #[test]
    fn one_story_multiple_edits_kept() {
        let context = AnalysisContext::build(vec![story(
            "US-1",
            vec![
                edit("US-1", "ApexClass", "Foo", Some("2024-01-01")),
                edit("US-1", "ApexClass", "Foo", Some("2024-01-05")),
            ],
        )]);
        let usage = context
            .usage_of(&ComponentKey::new("ApexClass", "Foo"))
            .unwrap();
        assert_eq!(usage.edits.len(), 2, "duplicates are kept, consumers reduce");
    }

    #[test]
    fn production_baseline_most_recent_wins() {
        let mut first = edit("US-1", "ApexClass", "Foo", Some("2024-01-01"));
        first.production_commit_date = parse_timestamp("2024-01-03");
        first.production_story_id = Some("US-90".to_string());
        let mut second = edit("US-2", "ApexClass", "Foo", Some("2024-01-02"));
        second.production_commit_date = parse_timestamp("2024-01-08");
        second.production_story_id = Some("US-91".to_string());

        let context = AnalysisContext::build(vec![
            story("US-1", vec![first]),
            story("US-2", vec![second]),
        ]);
        let baseline = context
            .usage_of(&ComponentKey::new("ApexClass", "Foo"))
            .unwrap()
            .production
            .clone()
            .unwrap();
        assert_eq!(baseline.commit_date, parse_timestamp("2024-01-08").unwrap());
        assert_eq!(baseline.story_id.as_deref(), Some("US-91"));
    }

    #[test]
    fn empty_story_list() {
        let context = AnalysisContext::build(Vec::new());
        assert_eq!(context.story_count(), 0);
        assert_eq!(context.component_count(), 0);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let stories = vec![
            story("US-1", vec![edit("US-1", "ApexClass", "Foo", Some("2024-01-01"))]),
            story("US-2", vec![edit("US-2", "Flow", "Bar", None)]),
        ];
        let first = AnalysisContext::build(stories.clone());
        let second = AnalysisContext::build(stories);
        assert_eq!(first, second);
    }

    // ── Property-based idempotence ────────────────────────────────

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_story() -> impl Strategy<Value = Story> {
            (
                "US-[0-9]{1,3}",
                proptest::collection::vec(
                    ("[A-Z][a-z]{2,8}", "[A-Z][a-z]{2,8}", proptest::option::of(0i64..4000)),
                    0..5,
                ),
            )
                .prop_map(|(id, components)| {
                    let components = components
                        .into_iter()
                        .map(|(kind, name, days)| ComponentEdit {
                            key: ComponentKey::new(kind, name),
                            story_id: id.clone(),
                            commit_date: days.map(|d| {
                                chrono::DateTime::from_timestamp(d * 86_400, 0).unwrap()
                            }),
                            author: None,
                            production_commit_date: None,
                            production_story_id: None,
                            production_story_title: None,
                        })
                        .collect();
                    Story {
                        id: id.clone(),
                        title: id,
                        classification: Classification::Unknown,
                        components,
                    }
                })
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn build_idempotent(stories in proptest::collection::vec(arb_story(), 0..8)) {
                let first = AnalysisContext::build(stories.clone());
                let second = AnalysisContext::build(stories);
                prop_assert_eq!(first, second);
            }

            #[test]
            fn every_edit_of_surviving_stories_indexed(
                stories in proptest::collection::vec(arb_story(), 0..8)
            ) {
                let context = AnalysisContext::build(stories);
                let from_stories: usize =
                    context.stories().map(|s| s.components.len()).sum();
                let from_usage: usize =
                    context.usages().map(|u| u.edits.len()).sum();
                prop_assert_eq!(from_stories, from_usage);
            }
        }
    }
}
