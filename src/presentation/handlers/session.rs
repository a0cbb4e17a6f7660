use axum::Json;
use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use crate::presentation::auth::{SESSION_COOKIE, session_token};
use crate::presentation::state::AppState;

use super::ApiError;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub username: String,
    pub token: String,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub logged_out: bool,
}

#[tracing::instrument(skip(state, request), fields(username = %request.username))]
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let account = state.user_repository.get_user(&request.username).await?;

    let Some(account) = account.filter(|a| a.password_matches(&request.password)) else {
        tracing::warn!("Login rejected");
        return Err(ApiError::InvalidCredentials);
    };

    let token = state.sessions.create(&account.username).await;
    tracing::info!("Session opened");

    let cookie = session_cookie(&token, state.secure_cookies, None);

    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(LoginResponse {
            username: account.username,
            token,
        }),
    ))
}

pub async fn logout_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> impl IntoResponse {
    let logged_out = match session_token(&headers) {
        Some(token) => state.sessions.revoke(&token).await,
        None => false,
    };

    let cookie = session_cookie("", state.secure_cookies, Some(0));

    (
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(LogoutResponse { logged_out }),
    )
}

fn session_cookie(token: &str, secure: bool, max_age: Option<u64>) -> String {
    let mut cookie = format!("{}={}; HttpOnly; Path=/; SameSite=Lax", SESSION_COOKIE, token);
    if let Some(age) = max_age {
        cookie.push_str(&format!("; Max-Age={}", age));
    }
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
