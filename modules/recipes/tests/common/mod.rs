//! Shared fixtures: each test gets a fresh in-memory SQLite database with
//! migrations applied, a service built on the SeaORM repository, and the
//! real module router.
#![allow(dead_code)]

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use rust_decimal::Decimal;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tower::ServiceExt;

use recipes::{
    contract::model::{NewRecipe, NewUser, Recipe, User},
    domain::password::Passwords,
    domain::service::{Repositories, Service, ServiceConfig},
    infra::storage::{migrations::Migrator, SeaOrmRecipesRepository},
};

pub const PASSWORD: &str = "testpass123";

pub async fn create_test_db() -> DatabaseConnection {
    let db = modkit::db::connect(
        modkit::db::SQLITE_MEMORY_DSN,
        Path::new("."),
        &modkit::db::ConnectOpts::default(),
    )
    .await
    .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Argon2 with minimal cost keeps the suite fast.
pub fn cheap_passwords() -> Passwords {
    Passwords::new(1024, 1).expect("argon2 params")
}

pub async fn create_test_service() -> Arc<Service> {
    let db = create_test_db().await;
    let repo = Arc::new(SeaOrmRecipesRepository::new(db));
    Arc::new(Service::new(
        Repositories::from_single(repo),
        cheap_passwords(),
        ServiceConfig::default(),
    ))
}

pub struct TestApp {
    pub service: Arc<Service>,
    pub router: Router,
}

pub async fn create_test_app() -> TestApp {
    let service = create_test_service().await;
    let router = recipes::api::rest::routes::register_routes(Router::new(), service.clone())
        .expect("Failed to register routes");
    TestApp { service, router }
}

impl TestApp {
    /// Create a user directly through the service.
    pub async fn user(&self, email: &str) -> User {
        self.service
            .create_user(NewUser {
                email: email.to_string(),
                password: PASSWORD.to_string(),
                name: "Test user".to_string(),
            })
            .await
            .expect("create user")
    }

    /// A user plus the token key that authenticates it.
    pub async fn user_with_token(&self, email: &str) -> (User, String) {
        let user = self.user(email).await;
        let token = self
            .service
            .issue_token(email, PASSWORD)
            .await
            .expect("issue token");
        (user, token.key)
    }

    /// Create a recipe for `owner` with the given tag and ingredient names.
    pub async fn recipe(
        &self,
        owner: &User,
        title: &str,
        tags: &[&str],
        ingredients: &[&str],
    ) -> Recipe {
        self.service
            .create_recipe(
                owner.id,
                NewRecipe {
                    title: title.to_string(),
                    time_minutes: 22,
                    price: dec("5.50"),
                    tags: tags.iter().map(|s| s.to_string()).collect(),
                    ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
                    ..Default::default()
                },
            )
            .await
            .expect("create recipe")
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.router.clone().oneshot(req).await.unwrap()
    }

    /// Send and decode the JSON body; empty bodies decode to `Value::Null`.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let resp = self.send(method, uri, token, body).await;
        let status = resp.status();
        (status, body_json(resp).await)
    }
}

pub async fn body_json(resp: Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    }
}

pub fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

/// `name` fields of a JSON array, in order.
pub fn names(list: &Value) -> Vec<String> {
    list.as_array()
        .expect("json array")
        .iter()
        .map(|v| v["name"].as_str().unwrap().to_string())
        .collect()
}
