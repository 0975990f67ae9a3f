#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chess_core::Move;
use serde_json::Value;
use server::auth::jwt;
use server::config::Config;
use server::repo::Repository;
use server::routes;
use server::service::MatchService;
use tower::ServiceExt;

pub const SECRET: &str = "test-secret";

/// In-memory service with the given users and a shallow computer search.
pub fn service(users: &[i64]) -> MatchService {
    MatchService::new(Repository::in_memory(users.iter().copied()), 2)
}

/// Router over a fresh in-memory service.
pub fn app(users: &[i64]) -> (Router, MatchService) {
    let service = service(users);
    let config = Config {
        jwt_secret: SECRET.to_string(),
        ..Config::default()
    };
    (routes::router(service.clone(), config), service)
}

pub fn token(user_id: i64) -> String {
    jwt::create_token(user_id, SECRET, 1).unwrap()
}

pub fn mv(x: i32, y: i32, xnew: i32, ynew: i32) -> Move {
    Move { x, y, xnew, ynew, promotion: None }
}

/// Send one request through the router and decode the JSON body.
pub async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<i64>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("authorization", format!("Bearer {}", token(user)));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}
