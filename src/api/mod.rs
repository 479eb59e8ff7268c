//! HTTP API module for the Budget Engine.
//!
//! Exposes the engine over JSON: `POST /budget` computes a full report from
//! a snapshot, `POST /amortization` computes one investment schedule.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::AmortizationRequest;
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
