// Decision summary — rollback plans for every story in one table.

use tracing::info;

use crate::config::RelgateConfig;
use crate::context::AnalysisContext;
use crate::types::{DecisionSummary, Recommendation};

use super::rollback;

/// Plan every story in the context, in story-id order, and aggregate the
/// recommendation counts.
///
/// Total, no partial failure mode: a story with zero components simply
/// contributes an empty `none` plan.
pub fn summarize(context: &AnalysisContext, config: &RelgateConfig) -> DecisionSummary {
    let mut summary = DecisionSummary::default();

    for story in context.stories() {
        let plan = rollback::plan_story(story, context, config);
        match plan.recommendation {
            Recommendation::Full => summary.full += 1,
            Recommendation::Selective => summary.selective += 1,
            Recommendation::None => summary.none += 1,
        }
        summary.risky_components += plan.risky_components;
        summary.plans.push(plan);
    }

    info!(
        stories = summary.plans.len(),
        full = summary.full,
        selective = summary.selective,
        none = summary.none,
        "Decision summary aggregated"
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::normalize::parse_timestamp;
    use crate::types::{Classification, ComponentEdit, ComponentKey, Story};

    fn edit(story: &str, name: &str, date: &str) -> ComponentEdit {
        ComponentEdit {
            key: ComponentKey::new("ApexClass", name),
            story_id: story.to_string(),
            commit_date: parse_timestamp(date),
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
    fn one_plan_per_story_in_id_order() {
        let context = AnalysisContext::build(vec![
            story("US-3", Vec::new()),
            story("US-1", vec![edit("US-1", "Foo", "2024-01-01")]),
            story("US-2", vec![edit("US-2", "Foo", "2024-01-05")]),
        ]);
        let summary = summarize(&context, &RelgateConfig::default());
        let order: Vec<_> = summary.plans.iter().map(|p| p.story_id.as_str()).collect();
        assert_eq!(order, ["US-1", "US-2", "US-3"]);
    }

    #[test]
    fn aggregate_counts() {
        // Foo is shared by US-1 and US-2, so both get a full rollback of
        // their single component; US-3 has nothing to do.
        let context = AnalysisContext::build(vec![
            story("US-1", vec![edit("US-1", "Foo", "2024-01-01")]),
            story("US-2", vec![edit("US-2", "Foo", "2024-01-05")]),
            story("US-3", Vec::new()),
        ]);
        let summary = summarize(&context, &RelgateConfig::default());
        assert_eq!(summary.full, 2);
        assert_eq!(summary.selective, 0);
        assert_eq!(summary.none, 1);
        assert_eq!(summary.risky_components, 2);
    }

    #[test]
    fn empty_context_is_empty_summary() {
        let summary = summarize(&AnalysisContext::build(Vec::new()), &RelgateConfig::default());
        assert!(summary.plans.is_empty());
        assert_eq!(summary.full + summary.selective + summary.none, 0);
    }
}
