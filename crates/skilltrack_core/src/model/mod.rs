//! Domain model for tasks, skills and weighted progress items.
//!
//! # Responsibility
//! - Define canonical record shapes persisted by the store.
//! - Define request drafts carrying the mutable subset of each record.
//! - Define read-only projections that carry derived fields.
//!
//! # Invariants
//! - Every record is identified by a stable UUID assigned on create.
//! - Relationships are id references resolved at query time.
//! - Derived fields never appear on persisted record types.

pub mod progress;
pub mod skill;
pub mod task;

/// Record family, used to label not-found and decode errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Task,
    Skill,
    ProgressItem,
}

impl RecordKind {
    /// Human-readable label used in API messages.
    pub fn label(self) -> &'static str {
        match self {
            Self::Task => "Task",
            Self::Skill => "Skill",
            Self::ProgressItem => "Progress item",
        }
    }
}
