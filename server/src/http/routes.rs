use crate::auth::{admin_middleware, auth_middleware};
use crate::config::Config;
use crate::http::auth_routes::login_handler;
use crate::http::forms_routes::{list_submissions_handler, submit_form_handler};
use crate::http::quotes_routes::{
    bulk_delete_handler, bulk_status_handler, delete_quote_handler, get_quote_handler, list_quotes_handler,
    quote_stats_handler, submit_quote_handler, update_status_handler,
};
use crate::http::{ApiError, AppState, HealthResponse};
use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Utc;
use std::time::SystemTime;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/quotes", post(submit_quote_handler))
        .route("/api/forms/submit", post(submit_form_handler));

    // Admin routes: bearer token first, then the role check
    let admin_routes = Router::new()
        .route("/api/quotes", get(list_quotes_handler))
        .route("/api/quotes/stats", get(quote_stats_handler))
        .route("/api/quotes/bulk-delete", post(bulk_delete_handler))
        .route("/api/quotes/bulk-status", patch(bulk_status_handler))
        .route(
            "/api/quotes/:id",
            get(get_quote_handler).delete(delete_quote_handler),
        )
        .route("/api/quotes/:id/status", patch(update_status_handler))
        .route("/api/forms/submissions", get(list_submissions_handler))
        .route_layer(middleware::from_fn(admin_middleware))
        .route_layer(middleware::from_fn_with_state(
            state.jwt_secret.clone(),
            auth_middleware,
        ));

    public_routes
        .merge(admin_routes)
        .fallback(not_found_handler)
        .with_state(state)
}

async fn not_found_handler() -> ApiError {
    ApiError::NotFound("Not found".to_string())
}

/// Restricts browsers to the configured frontend origins.
pub fn cors_layer(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_credentials(true)
    }
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = SystemTime::now()
        .duration_since(state.start_time)
        .unwrap_or_default()
        .as_secs();

    let response = HealthResponse {
        ok: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        timestamp: Utc::now(),
    };

    (StatusCode::OK, Json(response))
}
