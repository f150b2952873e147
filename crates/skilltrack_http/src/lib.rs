//! HTTP JSON surface for skilltrack.
//!
//! Routes live under `/api`; `/health` sits outside it. Every store call
//! runs on the blocking pool against a pooled connection.

pub mod error;
mod handlers;
mod middleware;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
