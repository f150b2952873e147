//! Core domain logic for skilltrack.
//! This crate is the single source of truth for record invariants and the
//! weighted progress computation.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbPool, DbResult};
pub use logging::{default_log_level, init_logging};
pub use model::progress::{
    validate_weightage, weight_percent, InvalidWeightage, NewProgressItem, ProgressItem,
    ProgressItemDraft, ProgressItemId, Weightage, WeightedProgressItem, ALLOWED_WEIGHTAGES,
};
pub use model::skill::{Skill, SkillDraft, SkillId, SkillWithParent, SKILL_CATEGORY_TYPE};
pub use model::task::{Task, TaskDraft, TaskId};
pub use model::RecordKind;
pub use repo::category_repo::{CategoryRepository, SqliteCategoryRepository};
pub use repo::progress_repo::{ProgressRepository, SqliteProgressRepository};
pub use repo::skill_repo::{SkillRepository, SqliteSkillRepository};
pub use repo::task_repo::{SqliteTaskRepository, TaskRepository};
pub use repo::{RepoError, RepoResult};
pub use service::progress_service::ProgressService;
pub use service::skill_service::SkillService;
pub use service::task_service::TaskService;
pub use service::{ServiceError, ServiceResult};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
