#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use axum::{body::Body, http::Request, http::Response, Router};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tower::ServiceExt;

use diet_tracker::config::DietTrackerConfig;
use diet_tracker::domain::service::Service;
use diet_tracker::DietTracker;

/// Fresh in-memory SQLite with the schema applied. A single pooled
/// connection keeps every query on the same memory database.
pub async fn setup_db() -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await?;
    DietTracker::migrate(&db).await?;
    Ok(db)
}

pub async fn setup_tracker() -> Result<DietTracker> {
    let db = setup_db().await?;
    Ok(DietTracker::new(db, DietTrackerConfig::default()))
}

pub async fn setup_service() -> Result<Arc<Service>> {
    Ok(setup_tracker().await?.service())
}

pub async fn setup_router() -> Result<Router> {
    Ok(setup_tracker().await?.router())
}

pub async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
    router.clone().oneshot(req).await.expect("infallible router")
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    serde_json::from_slice(&bytes).expect("json body")
}

pub fn json_request(method: &str, uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut b = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(c) = cookie {
        b = b.header("cookie", c);
    }
    b.body(Body::from(body.to_string())).expect("request")
}

pub fn empty_request(method: &str, uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut b = Request::builder().method(method).uri(uri);
    if let Some(c) = cookie {
        b = b.header("cookie", c);
    }
    b.body(Body::empty()).expect("request")
}

/// Register through HTTP and return the `name=value` pair to send back.
pub async fn register(router: &Router, email: &str) -> String {
    let resp = send(
        router,
        json_request("POST", "/users", None, serde_json::json!({ "email": email })),
    )
    .await;
    assert_eq!(resp.status(), 201);
    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie on first registration");
    set_cookie
        .split(';')
        .next()
        .expect("cookie pair")
        .trim()
        .to_string()
}
