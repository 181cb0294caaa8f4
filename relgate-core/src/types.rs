use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ── Component identity ─────────────────────────────────────────────

/// Identity of a deployable unit: metadata type plus API name.
///
/// Two edits refer to the same component iff their keys are equal after
/// normalization (see `ingest::normalize` — combined `Type.Name`
/// identifiers are split there, never here).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentKey {
    /// Metadata type, e.g. `ApexClass` or `Flow`.
    pub kind: String,
    /// API name within that type.
    pub name: String,
}

impl ComponentKey {
    /// Sentinel type used when no type field can be resolved.
    pub const UNKNOWN_KIND: &'static str = "UnknownType";

    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

// ── Stories ────────────────────────────────────────────────────────

/// Release-management classification tag carried on a story.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Classification {
    Safe,
    SafeWithCommit,
    Blocked,
    Conflict,
    #[default]
    Unknown,
}

impl Classification {
    /// Parse the tag spellings the backend emits. Anything unrecognized
    /// is `Unknown`, never an error.
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "safe" => Self::Safe,
            "safe with commit" | "safe_with_commit" => Self::SafeWithCommit,
            "blocked" => Self::Blocked,
            "conflict" => Self::Conflict,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Safe => "Safe",
            Self::SafeWithCommit => "Safe with commit",
            Self::Blocked => "Blocked",
            Self::Conflict => "Conflict",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One user story from an analysis payload, with its normalized edits.
///
/// Immutable for the lifetime of one analysis run; a new payload replaces
/// the whole story set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub title: String,
    pub classification: Classification,
    pub components: Vec<ComponentEdit>,
}

/// A single story's edit of a single component, in canonical form.
///
/// Every edit belongs to exactly one story and one component key; records
/// whose name cannot be resolved never become edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentEdit {
    pub key: ComponentKey,
    pub story_id: String,
    /// Story-side commit timestamp; `None` when absent or unparsable.
    pub commit_date: Option<DateTime<Utc>>,
    pub author: Option<String>,
    /// Production linkage, when the backend resolved one.
    pub production_commit_date: Option<DateTime<Utc>>,
    pub production_story_id: Option<String>,
    pub production_story_title: Option<String>,
}

// ── Derived views ──────────────────────────────────────────────────

/// Production baseline fact attached to a component's usage view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionBaseline {
    pub commit_date: DateTime<Utc>,
    pub story_id: Option<String>,
    pub story_title: Option<String>,
}

/// All edits of one component across every story in the current analysis,
/// newest first. Built once per analysis, never patched incrementally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentUsage {
    pub key: ComponentKey,
    pub edits: Vec<ComponentEdit>,
    pub production: Option<ProductionBaseline>,
}

impl ComponentUsage {
    /// True when at least one edit belongs to a story other than `story_id`.
    pub fn shared_beyond(&self, story_id: &str) -> bool {
        self.edits.iter().any(|e| e.story_id != story_id)
    }
}

// ── Conflicts ──────────────────────────────────────────────────────

/// Risk level shared by the conflict detector and the rollback evaluator.
/// Ordered so that `Low < Medium < High`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One distinct story participating in a conflict, reduced to its most
/// recent edit of the conflicted component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictParty {
    pub story_id: String,
    pub title: String,
    pub commit_date: Option<DateTime<Utc>>,
    pub author: Option<String>,
}

/// A component edited by two or more distinct stories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConflictRecord {
    pub key: ComponentKey,
    pub stories: Vec<ConflictParty>,
    /// Max day spread among the distinct stories' commit dates. Missing
    /// dates are substituted with the analysis time, a documented
    /// approximation.
    pub days_behind: i64,
    pub risk: RiskLevel,
}

impl ConflictRecord {
    pub fn story_count(&self) -> usize {
        self.stories.len()
    }
}

// ── Production state ───────────────────────────────────────────────

/// Relationship of a story's edit to the production baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductionStatus {
    /// Component does not exist in production.
    New,
    /// Story edit is newer than production, or no comparison is possible.
    AheadOfProd,
    /// Production is newer than the story edit.
    BehindProd,
    /// Commit dates match exactly.
    SameAsProd,
}

impl ProductionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::AheadOfProd => "AHEAD_OF_PROD",
            Self::BehindProd => "BEHIND_PROD",
            Self::SameAsProd => "SAME_AS_PROD",
        }
    }
}

impl std::fmt::Display for ProductionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Production-side facts for one component, from the "check production
/// state" backend call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductionSnapshot {
    pub key: ComponentKey,
    pub exists: bool,
    pub commit_date: Option<DateTime<Utc>>,
    pub commit_sha: Option<String>,
    pub author: Option<String>,
    pub branch: Option<String>,
}

/// Extra detail attached to `BehindProd` classifications in a second pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehindDetail {
    /// Story with the most recent edit of this component.
    pub primary_story_id: String,
    pub primary_story_title: String,
    pub story_commit_date: Option<DateTime<Utc>>,
    /// `ceil((production date − story date) / 1 day)`.
    pub days_behind: i64,
    pub is_warning: bool,
}

/// Classifier output for one `(edit, snapshot)` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentClassification {
    pub key: ComponentKey,
    pub status: ProductionStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub behind: Option<BehindDetail>,
}

// ── Rollback ───────────────────────────────────────────────────────

/// Rollback-risk verdict for one component within one story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollbackRisk {
    pub level: RiskLevel,
    pub label: String,
    /// Production is newer than this change AND the component is shared.
    /// Rolling back to the story's version would reintroduce an older
    /// state for every other story depending on it.
    pub prod_ahead: bool,
}

/// Where a risky component should be rolled back to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum RollbackTarget {
    /// Roll back to the production baseline.
    Production {
        commit_date: DateTime<Utc>,
        owner_story_id: Option<String>,
    },
    /// Roll back to the most recent edit from another story.
    PriorStory {
        story_id: String,
        commit_date: Option<DateTime<Utc>>,
    },
    /// No production record and no other story edits this component —
    /// still reported, never dropped.
    Unresolved,
}

/// One risky component in a story's rollback plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RollbackPlanEntry {
    pub key: ComponentKey,
    pub level: RiskLevel,
    pub reason: String,
    pub prod_ahead: bool,
    pub to: RollbackTarget,
    /// Owner of record after rollback, when one is resolvable.
    pub owner_after: Option<String>,
}

/// Story-level recommendation derived from the risky-component ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recommendation {
    None,
    Selective,
    Full,
}

impl Recommendation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Selective => "selective",
            Self::Full => "full",
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-story rollback plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRollbackPlan {
    pub story_id: String,
    pub title: String,
    pub classification: Classification,
    pub total_components: usize,
    pub risky_components: usize,
    pub entries: Vec<RollbackPlanEntry>,
    pub recommendation: Recommendation,
}

/// All plans for the current analysis, plus aggregate counts.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub plans: Vec<StoryRollbackPlan>,
    pub full: usize,
    pub selective: usize,
    pub none: usize,
    pub risky_components: usize,
}

// ── Tests ──────────────────────────────────────────────────────────
