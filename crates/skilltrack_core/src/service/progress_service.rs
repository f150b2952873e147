//! Progress use-case service.
//!
//! # Responsibility
//! - Create, update and delete progress items.
//! - Serve the weighted per-skill view.
//!
//! # Invariants
//! - Weightage validation happens in the repository write path; its
//!   failure surfaces as `ServiceError::InvalidWeightage`.
//! - Update on a missing id is `NotFound` whatever the draft holds.
//! - A skill without items yields an empty list, never an error.

use crate::model::progress::{
    NewProgressItem, ProgressItem, ProgressItemDraft, ProgressItemId, WeightedProgressItem,
};
use crate::model::skill::SkillId;
use crate::model::RecordKind;
use crate::repo::progress_repo::ProgressRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{debug, info};

/// Progress service facade.
pub struct ProgressService<R: ProgressRepository> {
    repo: R,
}

impl<R: ProgressRepository> ProgressService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one item under its parent skill.
    ///
    /// The parent skill id is stored as given; it is not checked to exist.
    pub fn create_item(&self, item: &NewProgressItem) -> ServiceResult<ProgressItem> {
        let created = self.repo.create_item(item)?;
        info!(
            "event=progress_create module=service status=ok item_id={} skill_id={} weightage={}",
            created.id,
            created.parent_skill_id,
            created.weightage.get()
        );
        Ok(created)
    }

    pub fn get_item(&self, id: ProgressItemId) -> ServiceResult<ProgressItem> {
        self.repo.get_item(id)?.ok_or(ServiceError::NotFound {
            kind: RecordKind::ProgressItem,
            id,
        })
    }

    /// Lists a skill's items, each with its percentage of the total weight.
    pub fn items_for_skill(&self, skill_id: SkillId) -> ServiceResult<Vec<WeightedProgressItem>> {
        let items = self.repo.items_for_skill(skill_id)?;
        debug!(
            "event=progress_weighted module=service status=ok skill_id={skill_id} items={}",
            items.len()
        );
        Ok(items)
    }

    /// Replaces name, achieved, weightage and comments.
    ///
    /// A missing item is reported before the draft is validated.
    pub fn update_item(
        &self,
        id: ProgressItemId,
        draft: &ProgressItemDraft,
    ) -> ServiceResult<ProgressItem> {
        self.get_item(id)?;
        Ok(self.repo.update_item(id, draft)?)
    }

    pub fn delete_item(&self, id: ProgressItemId) -> ServiceResult<()> {
        self.repo.delete_item(id)?;
        info!("event=progress_delete module=service status=ok item_id={id}");
        Ok(())
    }
}
