#![allow(dead_code)]

use std::sync::Arc;

use accounts::{
    api::rest::routes,
    domain::service::{Service, ServiceConfig},
    infra::{
        files::LocalDiskFileStore,
        security::Argon2Hasher,
        storage::{migrations::Migrator, SeaOrmUsersRepository},
    },
};
use authn::JwtTokens;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

pub const SECRET: &[u8] = b"accounts-test-secret";
pub const BOUNDARY: &str = "bloomwell-test-boundary";

pub struct TestApp {
    pub db: DatabaseConnection,
    pub router: Router,
    pub service: Arc<Service>,
    pub tokens: Arc<JwtTokens>,
    pub uploads: TempDir,
}

/// Fresh in-memory SQLite DB with migrations applied.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn setup_with(config: ServiceConfig) -> TestApp {
    let db = create_test_db().await;
    let uploads = tempfile::tempdir().unwrap();
    let tokens = Arc::new(JwtTokens::new(SECRET, Duration::hours(24)));

    let service = Arc::new(Service::new(
        Arc::new(SeaOrmUsersRepository::new(db.clone())),
        Arc::new(Argon2Hasher),
        Arc::new(LocalDiskFileStore::new(uploads.path())),
        tokens.clone(),
        config,
    ));
    let router = Router::new().nest("/api", routes::router(service.clone(), tokens.clone()));

    TestApp {
        db,
        router,
        service,
        tokens,
        uploads,
    }
}

pub async fn setup() -> TestApp {
    setup_with(ServiceConfig::default()).await
}

impl TestApp {
    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn json(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Value,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        self.send(req.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::get(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }

    pub async fn upload(
        &self,
        uri: &str,
        token: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> (StatusCode, Value) {
        let req = Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(multipart_body(field, file_name, content_type, bytes)))
            .unwrap();
        self.send(req).await
    }

    /// Register and return (token, user json).
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (String, Value) {
        let (status, body) = self
            .json(
                Method::POST,
                "/api/users/register",
                None,
                serde_json::json!({ "name": name, "email": email, "password": password }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"].clone(),
        )
    }
}

pub fn multipart_body(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    out.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n"
        )
        .as_bytes(),
    );
    out.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    out.extend_from_slice(bytes);
    out.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    out
}
