use super::{deleted, Deleted};
use crate::error::{parse_id, ApiError};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use skilltrack_core::{RecordKind, SqliteTaskRepository, Task, TaskDraft, TaskService};

type Body = Result<Json<TaskDraft>, JsonRejection>;

pub(crate) async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = state
        .with_conn(|conn| TaskService::new(SqliteTaskRepository::try_new(conn)?).list_tasks())
        .await?;
    Ok(Json(tasks))
}

pub(crate) async fn create_task(
    State(state): State<AppState>,
    body: Body,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let Json(draft) = body?;
    let task = state
        .with_conn(move |conn| {
            TaskService::new(SqliteTaskRepository::try_new(conn)?).create_task(&draft)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub(crate) async fn get_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id, RecordKind::Task)?;
    let task = state
        .with_conn(move |conn| TaskService::new(SqliteTaskRepository::try_new(conn)?).get_task(id))
        .await?;
    Ok(Json(task))
}

pub(crate) async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Body,
) -> Result<Json<Task>, ApiError> {
    let id = parse_id(&raw_id, RecordKind::Task)?;
    let Json(draft) = body?;
    let task = state
        .with_conn(move |conn| {
            TaskService::new(SqliteTaskRepository::try_new(conn)?).update_task(id, &draft)
        })
        .await?;
    Ok(Json(task))
}

pub(crate) async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let id = parse_id(&raw_id, RecordKind::Task)?;
    state
        .with_conn(move |conn| {
            TaskService::new(SqliteTaskRepository::try_new(conn)?).delete_task(id)
        })
        .await?;
    Ok(deleted(RecordKind::Task))
}
