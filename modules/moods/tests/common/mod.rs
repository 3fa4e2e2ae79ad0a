#![allow(dead_code)]

use std::sync::Arc;

use authn::JwtTokens;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use moods::{
    api::rest::routes,
    domain::service::{Service, ServiceConfig},
    infra::storage::{migrations::Migrator, SeaOrmMoodsRepository},
};
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub const SECRET: &[u8] = b"moods-test-secret";

pub struct TestApp {
    pub db: DatabaseConnection,
    pub router: Router,
    pub service: Arc<Service>,
    pub tokens: Arc<JwtTokens>,
}

pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn setup() -> TestApp {
    let db = create_test_db().await;
    let tokens = Arc::new(JwtTokens::new(SECRET, Duration::hours(24)));
    let service = Arc::new(Service::new(
        Arc::new(SeaOrmMoodsRepository::new(db.clone())),
        ServiceConfig::default(),
    ));
    let router = Router::new().nest("/api", routes::router(service.clone(), tokens.clone()));

    TestApp {
        db,
        router,
        service,
        tokens,
    }
}

impl TestApp {
    /// A token for a fresh user id.
    pub fn new_user(&self) -> (Uuid, String) {
        let id = Uuid::new_v4();
        (id, self.tokens.issue(id).unwrap())
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let resp = self.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    pub async fn post_mood(&self, token: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/moods")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::get(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }
}
