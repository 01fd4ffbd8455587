//! Router

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::{api_insights, dashboard, handle_login, health_check, login_page, logout};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(login_page))
        .route("/login", post(handle_login))
        .route("/dashboard", get(dashboard))
        .route("/logout", get(logout))
        // API
        .route("/api/insights", get(api_insights))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
