//! Task use-case service.

use crate::model::task::{Task, TaskDraft, TaskId};
use crate::model::RecordKind;
use crate::repo::task_repo::TaskRepository;
use crate::service::{ServiceError, ServiceResult};
use log::info;

/// Use-case service wrapper for task CRUD operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn create_task(&self, draft: &TaskDraft) -> ServiceResult<Task> {
        let task = self.repo.create_task(draft)?;
        info!(
            "event=task_create module=service status=ok task_id={}",
            task.id
        );
        Ok(task)
    }

    /// Gets one task, mapping absence to `ServiceError::NotFound`.
    pub fn get_task(&self, id: TaskId) -> ServiceResult<Task> {
        self.repo.get_task(id)?.ok_or(ServiceError::NotFound {
            kind: RecordKind::Task,
            id,
        })
    }

    pub fn list_tasks(&self) -> ServiceResult<Vec<Task>> {
        Ok(self.repo.list_tasks()?)
    }

    /// Replaces title, description and completion flag.
    pub fn update_task(&self, id: TaskId, draft: &TaskDraft) -> ServiceResult<Task> {
        Ok(self.repo.update_task(id, draft)?)
    }

    pub fn delete_task(&self, id: TaskId) -> ServiceResult<()> {
        self.repo.delete_task(id)?;
        info!("event=task_delete module=service status=ok task_id={id}");
        Ok(())
    }
}
