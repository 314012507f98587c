use crate::{dto::health::HealthResponse, state::SharedState};

/// Report whether a persistence backend is installed.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    if state.store().await.is_some() {
        HealthResponse::ok()
    } else {
        HealthResponse::degraded()
    }
}
