//! Process memory schema.
//!
//! `ProcessMemory` is the session-scoped accumulator built from the
//! organizational process definition template. It grows monotonically:
//! the merge algorithm adds to or overwrites fields but never deletes.
//! Document generators consume the final snapshot as read-only input.

use serde::{Deserialize, Serialize};

/// A unit or role participating in the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Actor {
    pub name: String,
    pub role: String,
    pub responsibilities: String,
}

/// An application, dashboard, or model used by the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Tool {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub specific_tasks: Vec<String>,
}

/// Data created, read, updated, or deleted by the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DataPoint {
    pub name: String,
    /// CRUD operation: "create", "read", "update", or "delete".
    pub operation: String,
    pub description: String,
}

/// One step of the main flow. Step ids are stable and descriptive
/// (e.g. "S1", "S2.1") and key the merge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FlowStep {
    pub id: String,
    pub actor: String,
    pub action: String,
    pub tools: Vec<String>,
    pub data_points: Vec<String>,
    pub duration: Option<String>,
    pub notes: String,
}

/// A named conditional branch — used for both alternate paths and
/// exception handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathBranch {
    pub name: String,
    pub condition: String,
    pub steps: Vec<String>,
}

/// A risk to process execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Risk {
    pub name: String,
    pub impact: String,
    pub likelihood: String,
    pub description: String,
}

/// A control mitigating one or more risks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ControlPoint {
    pub name: String,
    pub description: String,
    pub frequency: String,
}

/// A current constraint on the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Constraint {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub source: String,
}

/// A constraint inherited from legacy systems or decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LegacyConstraint {
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
    pub source: String,
    pub status: String,
}

/// A term definition for the process glossary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GlossaryEntry {
    pub term: String,
    pub definition: String,
}

/// The cumulative process model for one capture session.
///
/// Scalar fields hold at most one authoritative value; list fields are
/// sets under normalized equality that preserve first-seen insertion
/// order. Mutation happens exclusively through
/// [`ProcessMemory::merge`](crate::memory::schema::ProcessMemory::merge).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProcessMemory {
    pub process_name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub start_event: Option<String>,
    pub end_event: Option<String>,
    pub actors: Vec<Actor>,
    pub tools_used: Vec<Tool>,
    pub data_points: Vec<DataPoint>,
    /// Highest classification among all data points.
    pub data_classification: Option<String>,
    pub duration: Option<String>,
    pub variations: Vec<String>,
    pub harmonized: Option<String>,
    pub automated: Option<String>,
    pub ai_enabled: Option<String>,
    pub modelled: Option<String>,
    pub model_priority: Option<String>,
    pub main_flow: Vec<FlowStep>,
    pub alternate_paths: Vec<PathBranch>,
    pub exceptions: Vec<PathBranch>,
    pub risks: Vec<Risk>,
    pub control_points: Vec<ControlPoint>,
    pub control_findings: Vec<String>,
    pub recommendations: Vec<String>,
    pub guidelines: Vec<String>,
    pub constraints: Vec<Constraint>,
    pub legacy_constraints: Vec<LegacyConstraint>,
    pub pain_points: Vec<String>,
    pub glossary: Vec<GlossaryEntry>,
    pub open_questions: Vec<String>,
    pub assumptions: Vec<String>,
}

impl ProcessMemory {
    /// Returns true if no fragment has contributed anything yet.
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
