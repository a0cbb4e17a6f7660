use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::domain::AuthenticatedUser;
use crate::presentation::state::AppState;

use super::ApiError;

#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub username: String,
    pub minutes_remaining: f64,
}

#[tracing::instrument(skip(state))]
pub async fn balance_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<BalanceResponse>, ApiError> {
    let minutes_remaining = state.ledger.remaining(user.username()).await?;

    Ok(Json(BalanceResponse {
        username: user.username().to_string(),
        minutes_remaining,
    }))
}
