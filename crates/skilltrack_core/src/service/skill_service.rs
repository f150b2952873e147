//! Skill use-case service.
//!
//! # Responsibility
//! - Validate skill category against the controlled vocabulary.
//! - Guard re-parenting against hierarchy cycles.
//! - Provide skill create, read, update, delete and list operations.
//!
//! # Invariants
//! - Category validation runs on create and update only.
//! - A skill can never be re-parented under itself or a descendant.
//! - Parent existence is not required; dangling parents are legal.
//! - Deletion does not cascade to child skills or progress items.

use crate::model::skill::{Skill, SkillDraft, SkillId, SkillWithParent, SKILL_CATEGORY_TYPE};
use crate::model::RecordKind;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::skill_repo::SkillRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{info, warn};
use std::collections::HashSet;

/// Skill service facade.
pub struct SkillService<R: SkillRepository, C: CategoryRepository> {
    skills: R,
    categories: C,
}

impl<R: SkillRepository, C: CategoryRepository> SkillService<R, C> {
    /// Creates service from skill storage and vocabulary lookup.
    pub fn new(skills: R, categories: C) -> Self {
        Self { skills, categories }
    }

    /// Returns whether `category` may be stored on a skill.
    ///
    /// Empty means unset and is always valid. Otherwise an active
    /// `SKILL_CATEGORY` entry must match exactly.
    pub fn is_valid_category(&self, category: &str) -> ServiceResult<bool> {
        if category.is_empty() {
            return Ok(true);
        }
        Ok(self
            .categories
            .is_active_entry(SKILL_CATEGORY_TYPE, category)?)
    }

    /// Creates a root or child skill.
    pub fn create_skill(&self, draft: &SkillDraft) -> ServiceResult<Skill> {
        self.ensure_valid_category(&draft.category)?;
        let skill = self.skills.create_skill(draft)?;
        info!(
            "event=skill_create module=service status=ok skill_id={} has_parent={}",
            skill.id,
            skill.parent_id.is_some()
        );
        Ok(skill)
    }

    /// Gets one skill with its parent joined in when resolvable.
    pub fn get_skill(&self, id: SkillId) -> ServiceResult<SkillWithParent> {
        self.skills.get_skill_with_parent(id)?.ok_or(ServiceError::NotFound {
            kind: RecordKind::Skill,
            id,
        })
    }

    pub fn list_skills(&self) -> ServiceResult<Vec<Skill>> {
        Ok(self.skills.list_skills()?)
    }

    /// Replaces name, category, description and parent.
    pub fn update_skill(&self, id: SkillId, draft: &SkillDraft) -> ServiceResult<Skill> {
        self.skills.get_skill(id)?.ok_or(ServiceError::NotFound {
            kind: RecordKind::Skill,
            id,
        })?;

        self.ensure_valid_category(&draft.category)?;

        if let Some(parent_id) = draft.parent_id {
            if parent_id == id || self.would_create_cycle(id, parent_id)? {
                warn!(
                    "event=skill_reparent module=service status=rejected skill_id={id} parent_id={parent_id}"
                );
                return Err(ServiceError::ParentCycle {
                    skill_id: id,
                    parent_id,
                });
            }
        }

        Ok(self.skills.update_skill(id, draft)?)
    }

    /// Deletes one skill without touching its children or progress items.
    pub fn delete_skill(&self, id: SkillId) -> ServiceResult<()> {
        self.skills.delete_skill(id)?;
        info!("event=skill_delete module=service status=ok skill_id={id}");
        Ok(())
    }

    fn ensure_valid_category(&self, category: &str) -> ServiceResult<()> {
        if self.is_valid_category(category)? {
            return Ok(());
        }
        Err(ServiceError::InvalidCategory(category.to_string()))
    }

    /// Walks up from `candidate_parent` looking for `skill_id`.
    ///
    /// The walk ends without error at a root or a dangling reference.
    fn would_create_cycle(
        &self,
        skill_id: SkillId,
        candidate_parent: SkillId,
    ) -> ServiceResult<bool> {
        let mut visited = HashSet::new();
        let mut cursor = Some(candidate_parent);
        while let Some(current) = cursor {
            if current == skill_id {
                return Ok(true);
            }
            if !visited.insert(current) {
                return Ok(true);
            }
            cursor = match self.skills.get_skill(current)? {
                Some(skill) => skill.parent_id,
                None => None,
            };
        }
        Ok(false)
    }
}
