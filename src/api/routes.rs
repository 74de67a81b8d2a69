//! Route configuration.

use std::time::Duration;

use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::api::AppState;
use crate::api::error::{envelope_empty_errors, handle_panic};
use crate::api::handlers;

/// Create the application router.
pub fn create_router(state: AppState, request_timeout: Duration) -> Router {
    Router::new()
        .route(
            "/api/users",
            post(handlers::create_user).get(handlers::list_users),
        )
        .route(
            "/api/users/{id}",
            get(handlers::get_user)
                .put(handlers::update_user)
                .delete(handlers::delete_user),
        )
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        // Layers run outermost-last:
        // Trace -> Content-Type -> Empty error envelope -> Timeout -> CatchPanic -> Handler
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .layer(middleware::map_response(envelope_empty_errors))
        .layer(SetResponseHeaderLayer::overriding(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
