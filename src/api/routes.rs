//! API Routes
//!
//! Configures the Axum router with all studio cache endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cleanup_handler, clear_handler, delete_handler, get_handler, health_handler,
    invalidate_pattern_handler, invalidate_strategy_handler, recurrence_describe_handler,
    recurrence_serialize_handler, set_handler, stats_handler, strategies_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT|GET|DELETE /cache/:strategy/:key` - Single entry operations
/// - `DELETE /cache/:strategy` - Invalidate a whole strategy
/// - `DELETE /cache` - Clear both tiers
/// - `POST /invalidate` - Invalidate a key pattern within a strategy
/// - `POST /cleanup` - Evict expired and stale entries
/// - `GET /strategies` - List strategy policies
/// - `GET /stats` - Cache statistics
/// - `POST /recurrence/serialize` - Encode and label a recurrence rule
/// - `POST /recurrence/describe` - Decode and label an encoded rule
/// - `GET /health` - Health check endpoint
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/cache/:strategy/:key",
            get(get_handler).put(set_handler).delete(delete_handler),
        )
        .route("/cache/:strategy", delete(invalidate_strategy_handler))
        .route("/cache", delete(clear_handler))
        .route("/invalidate", post(invalidate_pattern_handler))
        .route("/cleanup", post(cleanup_handler))
        .route("/strategies", get(strategies_handler))
        .route("/stats", get(stats_handler))
        .route("/recurrence/serialize", post(recurrence_serialize_handler))
        .route("/recurrence/describe", post(recurrence_describe_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheOptions;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::in_memory(CacheOptions::default()))
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let response = create_test_app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_set_endpoint() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/cache/stats/dashboard")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"value":{"sessions":12}}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_not_found() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .uri("/cache/stats/nothing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unknown_strategy_is_bad_request() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/cache/forever")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
