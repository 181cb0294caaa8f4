//! Payload ingest — the boundary between raw backend JSON and canonical
//! types. Raw `serde_json::Value` access stops here.

pub mod normalize;

use serde_json::Value;
use tracing::debug;

use crate::error::IngestError;
use crate::types::{ComponentKey, ProductionSnapshot, Story};

/// Keys under which an object payload may carry its story array.
const STORY_LIST_FIELDS: &[&str] = &["stories", "userStories", "user_stories"];
/// Keys under which a production-state response may carry its components.
const SNAPSHOT_LIST_FIELDS: &[&str] = &["components", "results"];

/// Parse an analysis payload into normalized stories.
///
/// Accepts either a top-level story array or an object wrapping one.
/// Stories and components that fail to normalize are dropped silently
/// (counted at debug level); a payload with no story list at all is an
/// ingest error.
pub fn parse_analysis(text: &str) -> Result<Vec<Story>, IngestError> {
    let value: Value = serde_json::from_str(text)?;
    let raw_stories = find_list(&value, STORY_LIST_FIELDS).ok_or_else(|| {
        IngestError::MissingStories(
            "expected a story array or an object with a `stories` field".to_string(),
        )
    })?;

    let stories: Vec<Story> = raw_stories
        .iter()
        .filter_map(normalize::normalize_story)
        .collect();

    let dropped = raw_stories.len() - stories.len();
    if dropped > 0 {
        debug!(dropped, "Stories without a resolvable id were skipped");
    }
    Ok(stories)
}

/// Parse a "check production state" response into snapshots, keyed by
/// component. Entries without a resolvable name are dropped.
pub fn parse_production_snapshots(text: &str) -> Result<Vec<ProductionSnapshot>, IngestError> {
    let value: Value = serde_json::from_str(text)?;
    let raw = find_list(&value, SNAPSHOT_LIST_FIELDS).ok_or_else(|| {
        IngestError::MissingComponents(
            "expected a component array or an object with a `components` field".to_string(),
        )
    })?;

    Ok(raw.iter().filter_map(normalize_snapshot).collect())
}

fn find_list<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a Vec<Value>> {
    if let Value::Array(items) = value {
        return Some(items);
    }
    fields.iter().find_map(|field| value.get(*field)?.as_array())
}

fn normalize_snapshot(raw: &Value) -> Option<ProductionSnapshot> {
    // Reuse the component normalizer for name/type resolution so snapshot
    // keys line up with edit keys.
    let probe = normalize::normalize_component(raw, "")?;
    let string_field = |field: &str| {
        raw.get(field)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    };
    Some(ProductionSnapshot {
        key: probe.key,
        exists: raw.get("exists").and_then(Value::as_bool).unwrap_or(false),
        commit_date: raw
            .get("commit_date")
            .and_then(Value::as_str)
            .and_then(normalize::parse_timestamp),
        commit_sha: string_field("commit_sha"),
        author: string_field("author"),
        branch: string_field("branch"),
    })
}

/// Index snapshots by component key; later entries win on duplicates.
pub fn snapshot_index(
    snapshots: Vec<ProductionSnapshot>,
) -> std::collections::HashMap<ComponentKey, ProductionSnapshot> {
    snapshots
        .into_iter()
        .map(|snap| (snap.key.clone(), snap))
        .collect()
}
