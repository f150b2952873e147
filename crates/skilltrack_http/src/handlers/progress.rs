use super::{deleted, Deleted};
use crate::error::{parse_id, ApiError};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use skilltrack_core::{
    NewProgressItem, ProgressItem, ProgressItemDraft, ProgressService, RecordKind,
    SqliteProgressRepository, WeightedProgressItem,
};

pub(crate) async fn create_item(
    State(state): State<AppState>,
    body: Result<Json<NewProgressItem>, JsonRejection>,
) -> Result<(StatusCode, Json<ProgressItem>), ApiError> {
    let Json(item) = body?;
    let created = state
        .with_conn(move |conn| {
            ProgressService::new(SqliteProgressRepository::try_new(conn)?).create_item(&item)
        })
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Weighted view of one skill's items. An unknown skill yields `[]`.
pub(crate) async fn items_for_skill(
    State(state): State<AppState>,
    Path(raw_skill_id): Path<String>,
) -> Result<Json<Vec<WeightedProgressItem>>, ApiError> {
    let skill_id = parse_id(&raw_skill_id, RecordKind::Skill)?;
    let items = state
        .with_conn(move |conn| {
            ProgressService::new(SqliteProgressRepository::try_new(conn)?)
                .items_for_skill(skill_id)
        })
        .await?;
    Ok(Json(items))
}

pub(crate) async fn update_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Result<Json<ProgressItemDraft>, JsonRejection>,
) -> Result<Json<ProgressItem>, ApiError> {
    let id = parse_id(&raw_id, RecordKind::ProgressItem)?;
    let Json(draft) = body?;
    let updated = state
        .with_conn(move |conn| {
            ProgressService::new(SqliteProgressRepository::try_new(conn)?).update_item(id, &draft)
        })
        .await?;
    Ok(Json(updated))
}

pub(crate) async fn delete_item(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let id = parse_id(&raw_id, RecordKind::ProgressItem)?;
    state
        .with_conn(move |conn| {
            ProgressService::new(SqliteProgressRepository::try_new(conn)?).delete_item(id)
        })
        .await?;
    Ok(deleted(RecordKind::ProgressItem))
}
