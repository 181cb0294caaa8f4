//! Shared fixtures for relgate integration tests — raw payload builders
//! that exercise the ingest boundary the way the backend does, legacy
//! field spellings included.

use serde_json::{Value, json};

use relgate_core::context::AnalysisContext;
use relgate_core::ingest;

/// A component record in the current field convention.
pub fn component(kind: &str, name: &str, commit_date: &str) -> Value {
    json!({
        "type": kind,
        "name": name,
        "commit_date": commit_date,
    })
}

/// A component record in the oldest field convention the backend still
/// emits: `component_type`/`component_name`/`last_modified`.
pub fn legacy_component(kind: &str, name: &str, last_modified: &str) -> Value {
    json!({
        "component_type": kind,
        "component_name": name,
        "last_modified": last_modified,
    })
}

/// A component record identified only by a combined `Type.Name` string.
pub fn combined_component(api_name: &str, commit_date: &str) -> Value {
    json!({
        "api_name": api_name,
        "story_commit_date": commit_date,
    })
}

/// Attach a production linkage to a component record.
pub fn with_production(mut record: Value, commit_date: &str, story_id: &str) -> Value {
    record["production_commit_date"] = json!(commit_date);
    record["production_story_id"] = json!(story_id);
    record
}

pub fn story(id: &str, title: &str, classification: &str, components: Vec<Value>) -> Value {
    json!({
        "id": id,
        "title": title,
        "classification": classification,
        "components": components,
    })
}

/// A production snapshot entry for one component.
pub fn snapshot(kind: &str, name: &str, exists: bool, commit_date: Option<&str>) -> Value {
    let mut entry = json!({
        "type": kind,
        "name": name,
        "exists": exists,
    });
    if let Some(date) = commit_date {
        entry["commit_date"] = json!(date);
    }
    entry
}

/// Parse a payload of stories and build the analysis context, the way the
/// CLI does it.
pub fn build_context(stories: Vec<Value>) -> anyhow::Result<AnalysisContext> {
    let text = Value::Array(stories).to_string();
    Ok(AnalysisContext::build(ingest::parse_analysis(&text)?))
}

/// Two stories both editing `ApexClass:Foo`, nine days apart, with the
/// component absent from production.
pub fn shared_component_payload() -> Vec<Value> {
    vec![
        story(
            "US-1",
            "First story",
            "Safe",
            vec![component("ApexClass", "Foo", "2024-01-01")],
        ),
        story(
            "US-2",
            "Second story",
            "Safe",
            vec![component("ApexClass", "Foo", "2024-01-10")],
        ),
    ]
}
