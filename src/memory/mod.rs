//! The process memory: schema, extraction fragments, and the merge
//! algorithm that reconciles fragments into the growing model.

pub mod fragment;
pub mod merge;
pub mod schema;

pub use fragment::Fragment;
pub use schema::{
    Actor, Constraint, ControlPoint, DataPoint, FlowStep, GlossaryEntry, LegacyConstraint,
    PathBranch, ProcessMemory, Risk, Tool,
};
