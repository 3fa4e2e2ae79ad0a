use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
};

use crate::request_id::{self, MakeReqId};

/// Directory served read-only under a URL prefix.
#[derive(Debug, Clone)]
pub struct StaticMount {
    pub url_prefix: String,
    pub dir: PathBuf,
}

#[derive(Debug, Clone)]
pub struct IngressOptions {
    pub cors_origins: Vec<String>,
    pub timeout: Duration,
    pub body_limit_bytes: usize,
    pub static_files: Option<StaticMount>,
}

impl Default for IngressOptions {
    fn default() -> Self {
        Self {
            cors_origins: vec!["http://localhost:3000".to_string()],
            timeout: Duration::from_secs(30),
            body_limit_bytes: 16 * 1024 * 1024,
            static_files: None,
        }
    }
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|o| {
            o.parse::<HeaderValue>()
                .with_context(|| format!("invalid CORS origin '{o}'"))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

/// Assemble the public router: `/health`, `/openapi.json`, the module routes
/// nested under `/api`, optional static files and the global middleware stack.
pub fn build_router(
    api: Router,
    openapi: utoipa::openapi::OpenApi,
    opts: &IngressOptions,
) -> Result<Router> {
    let doc = serde_json::to_value(&openapi).context("serialize OpenAPI document")?;

    let mut router = Router::new()
        .route("/health", get(health_check))
        .route(
            "/openapi.json",
            get(move || {
                let doc = doc.clone();
                async move { Json(doc) }
            }),
        )
        .nest("/api", api);

    if let Some(mount) = &opts.static_files {
        tracing::debug!(prefix = %mount.url_prefix, dir = %mount.dir.display(), "serving static files");
        router = router.nest_service(&mount.url_prefix, ServeDir::new(&mount.dir));
    }

    // Layers are listed innermost first; at runtime a request passes
    // SetRequestId -> PropagateRequestId -> Trace -> attach_request_id -> Timeout -> CORS -> BodyLimit.
    let x_request_id = request_id::header();
    let router = router
        .layer(RequestBodyLimitLayer::new(opts.body_limit_bytes))
        .layer(DefaultBodyLimit::disable())
        .layer(cors_layer(&opts.cors_origins)?)
        .layer(TimeoutLayer::new(opts.timeout))
        .layer(from_fn(request_id::attach_request_id))
        .layer(request_id::create_trace_layer())
        .layer(PropagateRequestIdLayer::new(x_request_id.clone()))
        .layer(SetRequestIdLayer::new(x_request_id, MakeReqId));

    Ok(router)
}
