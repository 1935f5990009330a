//! Extraction fragments.
//!
//! A `Fragment` is what one extraction call taught us: the process memory
//! schema with every field optional. Missing or empty fields are no-ops
//! during merge — they never erase existing memory values.

use crate::error::{ProcapError, Result};
use crate::memory::schema::{
    Actor, Constraint, ControlPoint, DataPoint, FlowStep, GlossaryEntry, LegacyConstraint,
    PathBranch, Risk, Tool,
};
use serde::{Deserialize, Serialize};

/// Partial process model extracted from a single chunk.
///
/// Unknown keys in the collaborator's JSON are tolerated; uncoercible
/// types fail deserialization and reject the fragment wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Fragment {
    pub process_name: Option<String>,
    pub description: Option<String>,
    pub owner: Option<String>,
    pub start_event: Option<String>,
    pub end_event: Option<String>,
    pub actors: Vec<Actor>,
    pub tools_used: Vec<Tool>,
    pub data_points: Vec<DataPoint>,
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

impl Fragment {
    /// Validates collaborator JSON against the fragment schema.
    ///
    /// A shape mismatch rejects the whole fragment; the session then
    /// continues with the prior memory state unchanged.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| ProcapError::FragmentSchema {
            message: e.to_string(),
        })
    }

    /// Parses collaborator output text as a JSON fragment.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(|e| ProcapError::FragmentSchema {
                message: e.to_string(),
            })?;
        Self::from_json(value)
    }
}
