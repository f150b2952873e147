//! Shared request state and the blocking-store bridge.

use crate::error::ApiError;
use log::error;
use rusqlite::Connection;
use skilltrack_core::{DbPool, ServiceResult};
use std::sync::Arc;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pool: Arc<DbPool>,
}

impl AppState {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Runs `op` on a pooled connection off the async executor.
    ///
    /// A panic inside `op` becomes `ApiError::Internal`.
    pub async fn with_conn<T, F>(&self, op: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> ServiceResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = Arc::clone(&self.pool);
        let joined = tokio::task::spawn_blocking(move || {
            let conn = pool.acquire();
            op(&conn)
        })
        .await;

        match joined {
            Ok(result) => result.map_err(ApiError::from),
            Err(err) => {
                error!("event=store_call module=http status=error reason=join_failed error={err}");
                Err(ApiError::Internal)
            }
        }
    }
}
