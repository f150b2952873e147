use super::{deleted, Deleted};
use crate::error::{parse_id, ApiError};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rusqlite::Connection;
use skilltrack_core::{
    RecordKind, ServiceResult, Skill, SkillDraft, SkillService, SkillWithParent,
    SqliteCategoryRepository, SqliteSkillRepository,
};

type Body = Result<Json<SkillDraft>, JsonRejection>;
type Service<'conn> =
    SkillService<SqliteSkillRepository<'conn>, SqliteCategoryRepository<'conn>>;

fn service(conn: &Connection) -> ServiceResult<Service<'_>> {
    Ok(SkillService::new(
        SqliteSkillRepository::try_new(conn)?,
        SqliteCategoryRepository::try_new(conn)?,
    ))
}

pub(crate) async fn list_skills(
    State(state): State<AppState>,
) -> Result<Json<Vec<Skill>>, ApiError> {
    let skills = state
        .with_conn(|conn| service(conn)?.list_skills())
        .await?;
    Ok(Json(skills))
}

pub(crate) async fn create_skill(
    State(state): State<AppState>,
    body: Body,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    let Json(draft) = body?;
    let skill = state
        .with_conn(move |conn| service(conn)?.create_skill(&draft))
        .await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

pub(crate) async fn get_skill(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<SkillWithParent>, ApiError> {
    let id = parse_id(&raw_id, RecordKind::Skill)?;
    let skill = state
        .with_conn(move |conn| service(conn)?.get_skill(id))
        .await?;
    Ok(Json(skill))
}

pub(crate) async fn update_skill(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    body: Body,
) -> Result<Json<Skill>, ApiError> {
    let id = parse_id(&raw_id, RecordKind::Skill)?;
    let Json(draft) = body?;
    let skill = state
        .with_conn(move |conn| service(conn)?.update_skill(id, &draft))
        .await?;
    Ok(Json(skill))
}

pub(crate) async fn delete_skill(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<Deleted>, ApiError> {
    let id = parse_id(&raw_id, RecordKind::Skill)?;
    state
        .with_conn(move |conn| service(conn)?.delete_skill(id))
        .await?;
    Ok(deleted(RecordKind::Skill))
}
