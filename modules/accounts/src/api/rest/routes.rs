use std::sync::Arc;

use authn::{require_auth, TokenVerifier};
use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Routes for `/users/*`, relative to the `/api` mount point. Everything
/// except register and login sits behind the auth guard.
pub fn router(service: Arc<Service>, verifier: Arc<dyn TokenVerifier>) -> Router {
    let protected = Router::new()
        .route(
            "/users/profile",
            get(handlers::get_profile).put(handlers::update_profile),
        )
        .route(
            "/users/upload-profile-image",
            post(handlers::upload_profile_image),
        )
        .route(
            "/users/upload-prescription",
            post(handlers::upload_prescription),
        )
        .route(
            "/users/prescription/{id}",
            delete(handlers::delete_prescription),
        )
        .route_layer(from_fn_with_state(verifier, require_auth));

    Router::new()
        .route("/users/register", post(handlers::register))
        .route("/users/login", post(handlers::login))
        .merge(protected)
        .layer(Extension(service))
}
