//! Route table.

use crate::handlers::{health, progress, skills, tasks};
use crate::middleware::{cors, log_requests};
use crate::state::AppState;
use axum::middleware::from_fn;
use axum::routing::{get, post, put};
use axum::Router;

/// Builds the full application router over `state`.
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/tasks/{id}",
            get(tasks::get_task)
                .put(tasks::update_task)
                .delete(tasks::delete_task),
        )
        .route(
            "/skills",
            get(skills::list_skills).post(skills::create_skill),
        )
        .route(
            "/skills/{id}",
            get(skills::get_skill)
                .put(skills::update_skill)
                .delete(skills::delete_skill),
        )
        .route("/progress", post(progress::create_item))
        .route(
            "/progress/skill/{skill_id}",
            get(progress::items_for_skill),
        )
        .route(
            "/progress/{id}",
            put(progress::update_item).delete(progress::delete_item),
        );

    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api)
        .layer(from_fn(cors))
        .layer(from_fn(log_requests))
        .with_state(state)
}
