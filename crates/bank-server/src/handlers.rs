//! HTTP Handlers

use axum::{
    extract::{Form, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use bank_advisor::DashboardInsights;

use crate::chart;
use crate::render;
use crate::session::{cookie_value, expired_cookie, session_cookie};
use crate::state::AppState;

pub const LOGIN_FAILED: &str = "Login Failed: Invalid username or password";
pub const USER_NOT_FOUND: &str = "User data not found";
const SERVICE_UNAVAILABLE: &str = "Service temporarily unavailable";

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub store: String,
    pub store_connected: bool,
    pub provider_connected: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

/// Why the dashboard data could not be produced
enum LookupFailure {
    NotFound,
    Storage,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, error: &str, code: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
            code: code.into(),
        }),
    )
}

// ============================================================================
// Helpers
// ============================================================================

fn session_value(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(cookie_value)
}

/// Username of the logged-in session, if any
fn session_user(state: &AppState, headers: &HeaderMap) -> Option<String> {
    let value = session_value(headers)?;
    state.sessions.get(value).map(|s| s.username)
}

/// Load the account and run the insight pipeline
async fn load_insights(
    state: &AppState,
    username: &str,
) -> Result<DashboardInsights, LookupFailure> {
    match state.store.load_snapshot(username).await {
        Ok(Some(snapshot)) => Ok(state.engine.build(snapshot).await),
        Ok(None) => {
            tracing::warn!(username, "No account record for session user");
            Err(LookupFailure::NotFound)
        }
        Err(e) if e.is_data_error() => {
            tracing::warn!(username, "Unusable account record: {}", e);
            Err(LookupFailure::NotFound)
        }
        Err(e) => {
            tracing::error!(username, "Failed to load account: {}", e);
            Err(LookupFailure::Storage)
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Login form
pub async fn login_page() -> Html<String> {
    Html(render::login_page())
}

/// Check credentials and start a session
pub async fn handle_login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state.store.authenticate(&form.username, &form.password).await {
        Ok(true) => match state.sessions.create(&form.username) {
            Ok(cookie) => {
                tracing::info!(username = %form.username, "Login succeeded");
                (
                    [(header::SET_COOKIE, session_cookie(&cookie))],
                    Redirect::to("/dashboard"),
                )
                    .into_response()
            }
            Err(e) => {
                tracing::error!("Failed to create session: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, SERVICE_UNAVAILABLE).into_response()
            }
        },
        Ok(false) => {
            tracing::info!(username = %form.username, "Login rejected");
            (StatusCode::UNAUTHORIZED, LOGIN_FAILED).into_response()
        }
        Err(e) => {
            tracing::error!("Authentication failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, SERVICE_UNAVAILABLE).into_response()
        }
    }
}

/// Dashboard for the logged-in user
pub async fn dashboard(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let Some(username) = session_user(&state, &headers) else {
        return Redirect::to("/").into_response();
    };

    match load_insights(&state, &username).await {
        Ok(insights) => {
            let chart = chart::data_uri(&insights.categories);
            Html(render::dashboard_page(&insights, &chart)).into_response()
        }
        Err(LookupFailure::NotFound) => (StatusCode::NOT_FOUND, USER_NOT_FOUND).into_response(),
        Err(LookupFailure::Storage) => {
            (StatusCode::INTERNAL_SERVER_ERROR, SERVICE_UNAVAILABLE).into_response()
        }
    }
}

/// End the session and return to the login page
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if let Some(value) = session_value(&headers) {
        state.sessions.remove(value);
    }
    ([(header::SET_COOKIE, expired_cookie())], Redirect::to("/")).into_response()
}

/// JSON rendition of the dashboard
pub async fn api_insights(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardInsights>, ApiError> {
    let username = session_user(&state, &headers)
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Not logged in", "UNAUTHORIZED"))?;

    load_insights(&state, &username)
        .await
        .map(Json)
        .map_err(|failure| match failure {
            LookupFailure::NotFound => {
                api_error(StatusCode::NOT_FOUND, USER_NOT_FOUND, "USER_NOT_FOUND")
            }
            LookupFailure::Storage => api_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                SERVICE_UNAVAILABLE,
                "STORAGE_ERROR",
            ),
        })
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let store_connected = state.store.health_check().await;
    let provider_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: if store_connected { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        store: state.store.name().to_string(),
        store_connected,
        provider_connected,
    })
}
