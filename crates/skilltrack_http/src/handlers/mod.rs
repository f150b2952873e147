//! Route handlers, one module per record family.

pub(crate) mod health;
pub(crate) mod progress;
pub(crate) mod skills;
pub(crate) mod tasks;

use axum::Json;
use serde::Serialize;
use skilltrack_core::RecordKind;

/// Body returned by every successful delete.
#[derive(Debug, Serialize)]
pub(crate) struct Deleted {
    message: String,
}

pub(crate) fn deleted(kind: RecordKind) -> Json<Deleted> {
    Json(Deleted {
        message: format!("{} deleted", kind.label()),
    })
}
