use std::sync::Arc;

use authn::{require_auth, TokenVerifier};
use axum::{middleware::from_fn_with_state, routing::get, Extension, Router};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Routes for `/moods*`, relative to the `/api` mount point. All of them
/// require a bearer token.
pub fn router(service: Arc<Service>, verifier: Arc<dyn TokenVerifier>) -> Router {
    Router::new()
        .route(
            "/moods",
            get(handlers::list_moods).post(handlers::upsert_mood),
        )
        .route("/moods/stats", get(handlers::mood_stats))
        .route_layer(from_fn_with_state(verifier, require_auth))
        .layer(Extension(service))
}
