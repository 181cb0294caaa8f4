// Record normalization — the only place legacy field spellings are known.
//
// Every accepted payload shape is mapped into the canonical types here;
// everything downstream operates on `Story` / `ComponentEdit` only. Field
// priority is an explicit, ordered list per concept, not incidental
// fallback chaining.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::types::{Classification, ComponentEdit, ComponentKey, Story};

/// Field priority for the component metadata type.
const TYPE_FIELDS: &[&str] = &["type", "component_type", "metadataType"];
/// Field priority for the component API name.
const NAME_FIELDS: &[&str] = &["name", "component_name"];
/// Combined `Type.Name` identifier, consulted only when no discrete name
/// field resolves.
const COMBINED_FIELD: &str = "api_name";
/// Field priority for the story-side commit timestamp.
const COMMIT_DATE_FIELDS: &[&str] = &["story_commit_date", "commit_date", "last_modified"];
/// Field priority for the edit author.
const AUTHOR_FIELDS: &[&str] = &["commit_by", "author"];
/// Field priority for the story identifier.
const STORY_ID_FIELDS: &[&str] = &["id", "story_id", "name"];
/// Field priority for the story display title.
const STORY_TITLE_FIELDS: &[&str] = &["title", "name"];
/// Field priority for the story classification tag.
const CLASSIFICATION_FIELDS: &[&str] = &["classification", "classification_tag", "copado_status"];

/// Parse a timestamp permissively across the formats the backend has
/// historically emitted. Unparsable input is `None`, never an error.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

/// First non-empty string among `fields`, accepting JSON numbers for id
/// fields that some payloads emit unquoted.
fn first_string(value: &Value, fields: &[&str]) -> Option<String> {
    fields.iter().find_map(|field| scalar_string(value.get(*field)?))
}

fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn first_date(value: &Value, fields: &[&str]) -> Option<DateTime<Utc>> {
    fields
        .iter()
        .find_map(|field| parse_timestamp(value.get(*field)?.as_str()?))
}

/// Normalize one raw component record into a canonical edit.
///
/// Returns `None` when no name is resolvable by any path — an unnamed
/// component is unusable for conflict or risk purposes and is dropped. A
/// missing type alone never drops a record; it becomes `UnknownType`.
pub fn normalize_component(raw: &Value, story_id: &str) -> Option<ComponentEdit> {
    let discrete_name = first_string(raw, NAME_FIELDS);
    let discrete_kind = first_string(raw, TYPE_FIELDS);

    // The combined identifier participates only when no discrete name
    // field is present.
    let (name, combined_kind) = match discrete_name {
        Some(name) => (name, None),
        None => {
            let combined = first_string(raw, &[COMBINED_FIELD])?;
            match combined.split_once('.') {
                Some((kind, rest)) if !rest.is_empty() => {
                    (rest.to_string(), Some(kind.to_string()))
                }
                _ => (combined, None),
            }
        }
    };

    let kind = discrete_kind
        .or(combined_kind)
        .unwrap_or_else(|| ComponentKey::UNKNOWN_KIND.to_string());

    Some(ComponentEdit {
        key: ComponentKey { kind, name },
        story_id: story_id.to_string(),
        commit_date: first_date(raw, COMMIT_DATE_FIELDS),
        author: first_string(raw, AUTHOR_FIELDS),
        production_commit_date: raw
            .get("production_commit_date")
            .and_then(Value::as_str)
            .and_then(parse_timestamp),
        production_story_id: first_string(raw, &["production_story_id"]),
        production_story_title: first_string(raw, &["production_story_title"]),
    })
}

/// Normalize one raw story record. Stories with no resolvable id cannot
/// be indexed and are dropped; component records that fail to normalize
/// are dropped individually without affecting the rest of the story.
pub fn normalize_story(raw: &Value) -> Option<Story> {
    let id = first_string(raw, STORY_ID_FIELDS)?;
    let title = first_string(raw, STORY_TITLE_FIELDS).unwrap_or_else(|| id.clone());
    let classification = first_string(raw, CLASSIFICATION_FIELDS)
        .map_or(Classification::Unknown, |tag| Classification::from_tag(&tag));

    let components = raw
        .get("components")
        .and_then(Value::as_array)
        .map(|records| {
            records
                .iter()
                .filter_map(|record| normalize_component(record, &id))
                .collect()
        })
        .unwrap_or_default();

    Some(Story {
        id,
        title,
        classification,
        components,
    })
}
