//! Skill record and its parent projection.
//!
//! # Invariants
//! - `parent_id` is an id reference only; it may dangle after the parent
//!   is deleted.
//! - `category` is either empty or an active `SKILL_CATEGORY` value at
//!   write time. Later vocabulary changes do not rewrite stored skills.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SkillId = Uuid;

/// Vocabulary entry type holding valid skill categories.
pub const SKILL_CATEGORY_TYPE: &str = "SKILL_CATEGORY";

/// Persisted skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    pub category: String,
    pub description: String,
    /// Unix epoch milliseconds, assigned by the store.
    pub created_at: i64,
    /// `None` for root skills.
    pub parent_id: Option<SkillId>,
}

/// Mutable skill fields accepted on create and update.
///
/// Update replaces every field, so omitting `parent_id` re-roots the skill.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillDraft {
    pub name: String,
    pub category: String,
    pub description: String,
    pub parent_id: Option<SkillId>,
}

/// Skill read model with its parent joined in.
///
/// `parent_data` is absent when the skill is a root or its parent id no
/// longer resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkillWithParent {
    #[serde(flatten)]
    pub skill: Skill,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_data: Option<Skill>,
}
