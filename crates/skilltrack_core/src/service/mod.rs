//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Enforce cross-record rules (category vocabulary, hierarchy shape).
//! - Keep the HTTP layer decoupled from storage details.
//!
//! # Invariants
//! - Services receive their repositories at construction and hold no
//!   other state.
//! - Not-found and validation failures stay distinguishable for callers.

use crate::model::progress::InvalidWeightage;
use crate::model::skill::SkillId;
use crate::model::RecordKind;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod progress_service;
pub mod skill_service;
pub mod task_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Errors from record services.
#[derive(Debug)]
pub enum ServiceError {
    /// Progress weightage is off the allowed scale.
    InvalidWeightage(InvalidWeightage),
    /// Skill category is not an active vocabulary value.
    InvalidCategory(String),
    /// Re-parenting would make a skill its own ancestor.
    ParentCycle {
        skill_id: SkillId,
        parent_id: SkillId,
    },
    /// Target record does not exist.
    NotFound { kind: RecordKind, id: Uuid },
    /// Repository-level failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Whether the failure is caused by client input rather than the store.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidWeightage(_) | Self::InvalidCategory(_) | Self::ParentCycle { .. }
        )
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWeightage(err) => write!(f, "{err}"),
            Self::InvalidCategory(category) => write!(f, "invalid category: `{category}`"),
            Self::ParentCycle {
                skill_id,
                parent_id,
            } => write!(
                f,
                "re-parenting would create a cycle: skill {skill_id} under parent {parent_id}"
            ),
            Self::NotFound { kind, id } => write!(f, "{} not found: {id}", kind.label()),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidWeightage(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::InvalidWeightage(err),
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Repo(other),
        }
    }
}
