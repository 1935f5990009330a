//! Field-by-field reconciliation of fragments into process memory.
//!
//! Rules, applied deterministically and in chunk-seal order:
//! - Scalars: last-non-empty-wins. A later fragment's non-empty value
//!   overwrites the prior one; empty values are no-ops.
//! - String lists: set semantics under case/whitespace folding, keeping
//!   the first-seen casing and insertion order.
//! - Record lists: deduplicated by a normalized key; on collision the
//!   non-key sub-fields merge with the scalar rule.
//!
//! Merging never deletes: process memory is append/refine-only.

use crate::memory::fragment::Fragment;
use crate::memory::schema::{
    Actor, Constraint, ControlPoint, DataPoint, FlowStep, GlossaryEntry, LegacyConstraint,
    PathBranch, ProcessMemory, Risk, Tool,
};

/// Folds text to a comparison form: lowercase with collapsed whitespace.
pub(crate) fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Last-non-empty-wins for optional scalar fields.
fn merge_scalar(slot: &mut Option<String>, incoming: Option<String>) {
    if let Some(value) = incoming {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            *slot = Some(trimmed.to_string());
        }
    }
}

/// Last-non-empty-wins for required string sub-fields of records.
fn merge_text(slot: &mut String, incoming: String) {
    let trimmed = incoming.trim();
    if !trimmed.is_empty() {
        *slot = trimmed.to_string();
    }
}

/// Appends unseen items, comparing under normalization.
fn merge_strings(list: &mut Vec<String>, incoming: Vec<String>) {
    for item in incoming {
        let key = normalize(&item);
        if key.is_empty() {
            continue;
        }
        if !list.iter().any(|existing| normalize(existing) == key) {
            list.push(item.trim().to_string());
        }
    }
}

/// A record that merges by key into a keyed list.
trait Keyed {
    /// Normalized dedup key. Records whose key normalizes to empty carry
    /// nothing addressable and are dropped.
    fn key(&self) -> String;

    /// Merges another record with the same key into this one.
    fn absorb(&mut self, other: Self);
}

fn merge_records<T: Keyed>(list: &mut Vec<T>, incoming: Vec<T>) {
    for record in incoming {
        let key = record.key();
        if key.is_empty() {
            continue;
        }
        match list.iter_mut().find(|existing| existing.key() == key) {
            Some(existing) => existing.absorb(record),
            None => list.push(record),
        }
    }
}

impl Keyed for Actor {
    fn key(&self) -> String {
        normalize(&self.name)
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.role, other.role);
        merge_text(&mut self.responsibilities, other.responsibilities);
    }
}

impl Keyed for Tool {
    fn key(&self) -> String {
        normalize(&self.name)
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.kind, other.kind);
        merge_strings(&mut self.specific_tasks, other.specific_tasks);
    }
}

impl Keyed for DataPoint {
    fn key(&self) -> String {
        normalize(&self.name)
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.operation, other.operation);
        merge_text(&mut self.description, other.description);
    }
}

impl Keyed for FlowStep {
    // Stable step ids key the flow; a step without an id falls back to
    // its action text.
    fn key(&self) -> String {
        let id = normalize(&self.id);
        if id.is_empty() { normalize(&self.action) } else { id }
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.actor, other.actor);
        merge_text(&mut self.action, other.action);
        merge_strings(&mut self.tools, other.tools);
        merge_strings(&mut self.data_points, other.data_points);
        merge_scalar(&mut self.duration, other.duration);
        merge_text(&mut self.notes, other.notes);
    }
}

impl Keyed for PathBranch {
    fn key(&self) -> String {
        normalize(&self.name)
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.condition, other.condition);
        merge_strings(&mut self.steps, other.steps);
    }
}

impl Keyed for Risk {
    fn key(&self) -> String {
        normalize(&self.name)
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.impact, other.impact);
        merge_text(&mut self.likelihood, other.likelihood);
        merge_text(&mut self.description, other.description);
    }
}

impl Keyed for ControlPoint {
    fn key(&self) -> String {
        normalize(&self.name)
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.description, other.description);
        merge_text(&mut self.frequency, other.frequency);
    }
}

impl Keyed for Constraint {
    fn key(&self) -> String {
        normalize(&self.description)
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.kind, other.kind);
        merge_text(&mut self.source, other.source);
    }
}

impl Keyed for LegacyConstraint {
    fn key(&self) -> String {
        normalize(&self.description)
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.kind, other.kind);
        merge_text(&mut self.source, other.source);
        merge_text(&mut self.status, other.status);
    }
}

impl Keyed for GlossaryEntry {
    fn key(&self) -> String {
        normalize(&self.term)
    }

    fn absorb(&mut self, other: Self) {
        merge_text(&mut self.definition, other.definition);
    }
}

impl ProcessMemory {
    /// Folds one fragment into the memory.
    ///
    /// Applied once per completed extraction, strictly in chunk-seal
    /// order. Never fails: conflicts resolve deterministically and
    /// empty fragment fields leave memory untouched.
    pub fn merge(&mut self, fragment: Fragment) {
        merge_scalar(&mut self.process_name, fragment.process_name);
        merge_scalar(&mut self.description, fragment.description);
        merge_scalar(&mut self.owner, fragment.owner);
        merge_scalar(&mut self.start_event, fragment.start_event);
        merge_scalar(&mut self.end_event, fragment.end_event);
        merge_records(&mut self.actors, fragment.actors);
        merge_records(&mut self.tools_used, fragment.tools_used);
        merge_records(&mut self.data_points, fragment.data_points);
        merge_scalar(&mut self.data_classification, fragment.data_classification);
        merge_scalar(&mut self.duration, fragment.duration);
        merge_strings(&mut self.variations, fragment.variations);
        merge_scalar(&mut self.harmonized, fragment.harmonized);
        merge_scalar(&mut self.automated, fragment.automated);
        merge_scalar(&mut self.ai_enabled, fragment.ai_enabled);
        merge_scalar(&mut self.modelled, fragment.modelled);
        merge_scalar(&mut self.model_priority, fragment.model_priority);
        merge_records(&mut self.main_flow, fragment.main_flow);
        merge_records(&mut self.alternate_paths, fragment.alternate_paths);
        merge_records(&mut self.exceptions, fragment.exceptions);
        merge_records(&mut self.risks, fragment.risks);
        merge_records(&mut self.control_points, fragment.control_points);
        merge_strings(&mut self.control_findings, fragment.control_findings);
        merge_strings(&mut self.recommendations, fragment.recommendations);
        merge_strings(&mut self.guidelines, fragment.guidelines);
        merge_records(&mut self.constraints, fragment.constraints);
        merge_records(&mut self.legacy_constraints, fragment.legacy_constraints);
        merge_strings(&mut self.pain_points, fragment.pain_points);
        merge_records(&mut self.glossary, fragment.glossary);
        merge_strings(&mut self.open_questions, fragment.open_questions);
        merge_strings(&mut self.assumptions, fragment.assumptions);
    }
}
