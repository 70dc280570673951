//! End-to-end HTTP behaviour through the assembled router.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{body_json, empty_request, json_request, register, send};

const PROBLEM_JSON: &str = "application/problem+json";

fn content_type(resp: &axum::http::Response<axum::body::Body>) -> &str {
    resp.headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn create(router: &axum::Router, cookie: &str, body: serde_json::Value) -> String {
    let resp = send(router, json_request("POST", "/feeds", Some(cookie), body)).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .expect("location header")
        .to_string()
}

#[tokio::test]
async fn registration_sets_long_lived_session_cookie() -> anyhow::Result<()> {
    let router = common::setup_router().await?;

    let resp = send(
        &router,
        json_request("POST", "/users", None, json!({ "email": "a@example.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let set_cookie = resp
        .headers()
        .get("set-cookie")
        .and_then(|v| v.to_str().ok())
        .expect("set-cookie");
    assert!(set_cookie.starts_with("sessionId="));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=604800"));
    assert!(set_cookie.contains("HttpOnly"));
    Ok(())
}

#[tokio::test]
async fn registration_with_valid_cookie_keeps_it() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let cookie = register(&router, "a@example.com").await;

    let resp = send(
        &router,
        json_request("POST", "/users", Some(&cookie), json!({ "email": "a@example.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().get("set-cookie").is_none());
    Ok(())
}

#[tokio::test]
async fn registration_with_unknown_cookie_issues_new_one() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let stale = format!("sessionId={}", uuid::Uuid::new_v4());

    let resp = send(
        &router,
        json_request("POST", "/users", Some(&stale), json!({ "email": "a@example.com" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert!(resp.headers().get("set-cookie").is_some());
    Ok(())
}

#[tokio::test]
async fn registration_rejects_invalid_input() -> anyhow::Result<()> {
    let router = common::setup_router().await?;

    let resp = send(
        &router,
        json_request("POST", "/users", None, json!({ "email": "not-an-email" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(content_type(&resp), PROBLEM_JSON);
    assert!(resp.headers().get("set-cookie").is_none());
    let body = body_json(resp).await;
    assert_eq!(body["code"], "USERS_INVALID_EMAIL");
    assert_eq!(body["status"], 400);

    let resp = send(&router, json_request("POST", "/users", None, json!({}))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_session() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let stale = format!("sessionId={}", uuid::Uuid::new_v4());
    let any_id = uuid::Uuid::new_v4();

    for cookie in [None, Some(stale.as_str()), Some("sessionId=garbage")] {
        for (method, uri) in [
            ("GET", "/feeds".to_string()),
            ("GET", "/users/summary".to_string()),
            ("GET", format!("/feeds/{any_id}")),
            ("DELETE", format!("/feeds/{any_id}")),
        ] {
            let resp = send(&router, empty_request(method, &uri, cookie)).await;
            assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(content_type(&resp), PROBLEM_JSON);
        }
    }

    // Session is checked before the body is parsed.
    let resp = send(&router, json_request("POST", "/feeds", None, json!({ "bogus": 1 }))).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "SESSION_REQUIRED");
    Ok(())
}

#[tokio::test]
async fn feed_lifecycle() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let cookie = register(&router, "a@example.com").await;

    let location = create(
        &router,
        &cookie,
        json!({
            "name": "Breakfast",
            "description": "oats",
            "date": "2024-01-01T08:00:00Z",
            "isOnDiet": true
        }),
    )
    .await;
    assert!(location.starts_with("/feeds/"));

    let resp = send(&router, empty_request("GET", &location, Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["feed"]["name"], "Breakfast");
    assert_eq!(body["feed"]["description"], "oats");
    assert_eq!(body["feed"]["date"], "2024-01-01T08:00:00Z");
    assert_eq!(body["feed"]["isOnDiet"], true);

    let resp = send(
        &router,
        json_request("PUT", &location, Some(&cookie), json!({ "isOnDiet": false })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let body = body_json(send(&router, empty_request("GET", &location, Some(&cookie))).await).await;
    assert_eq!(body["feed"]["isOnDiet"], false);
    assert_eq!(body["feed"]["name"], "Breakfast");
    assert_eq!(body["feed"]["description"], "oats");

    let resp = send(&router, empty_request("DELETE", &location, Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = send(&router, empty_request("DELETE", &location, Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = send(&router, empty_request("GET", &location, Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["code"], "FEEDS_NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn create_rejects_bad_payloads() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let cookie = register(&router, "a@example.com").await;

    for body in [
        json!({ "name": "Lunch", "isOnDiet": true }),
        json!({ "name": "Lunch", "date": "2024-01-01" }),
        json!({ "name": "Lunch", "date": "yesterday", "isOnDiet": true }),
        json!({ "name": "", "date": "2024-01-01", "isOnDiet": true }),
        json!({ "name": "Future", "date": 253402300800000i64, "isOnDiet": true }),
        json!({ "name": "Ancient", "date": -62167219200001i64, "isOnDiet": true }),
    ] {
        let resp = send(&router, json_request("POST", "/feeds", Some(&cookie), body.clone())).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(content_type(&resp), PROBLEM_JSON);
    }

    let list = body_json(send(&router, empty_request("GET", "/feeds", Some(&cookie))).await).await;
    assert_eq!(list["feeds"], json!([]));
    Ok(())
}

#[tokio::test]
async fn update_reports_missing_and_invalid() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let cookie = register(&router, "a@example.com").await;
    let location = create(
        &router,
        &cookie,
        json!({ "name": "Lunch", "date": "2024-01-01T12:00:00Z", "isOnDiet": true }),
    )
    .await;

    let unknown = format!("/feeds/{}", uuid::Uuid::new_v4());
    let resp = send(&router, json_request("PUT", &unknown, Some(&cookie), json!({ "name": "x" }))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // A non-UUID id names no feed, whatever the body holds.
    for body in [json!({ "name": "x" }), json!({ "date": null }), json!("not an object")] {
        let resp = send(&router, json_request("PUT", "/feeds/42", Some(&cookie), body.clone())).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{body}");
    }

    let resp = send(&router, json_request("PUT", &location, Some(&cookie), json!({ "date": null }))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = send(&router, empty_request("DELETE", "/feeds/42", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    Ok(())
}

#[tokio::test]
async fn sessions_are_isolated() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let alice = register(&router, "alice@example.com").await;
    let bob = register(&router, "bob@example.com").await;

    let location = create(
        &router,
        &alice,
        json!({ "name": "Cake", "date": "2024-01-01T15:00:00Z", "isOnDiet": false }),
    )
    .await;

    let resp = send(&router, empty_request("GET", &location, Some(&bob))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&router, json_request("PUT", &location, Some(&bob), json!({ "isOnDiet": true }))).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = send(&router, empty_request("DELETE", &location, Some(&bob))).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let list = body_json(send(&router, empty_request("GET", "/feeds", Some(&bob))).await).await;
    assert_eq!(list["feeds"], json!([]));

    let body = body_json(send(&router, empty_request("GET", &location, Some(&alice))).await).await;
    assert_eq!(body["feed"]["isOnDiet"], false);
    Ok(())
}

#[tokio::test]
async fn summary_reports_counts_by_day() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let cookie = register(&router, "a@example.com").await;

    for (name, date, on_diet) in [
        ("Breakfast", "2024-01-01T08:00:00Z", true),
        ("Lunch", "2024-01-01T12:00:00Z", true),
        ("Dinner", "2024-01-01T19:00:00Z", false),
    ] {
        create(
            &router,
            &cookie,
            json!({ "name": name, "date": date, "isOnDiet": on_diet }),
        )
        .await;
    }

    let resp = send(&router, empty_request("GET", "/users/summary", Some(&cookie))).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({
            "insideDiet": 2,
            "outsideDiet": 1,
            "total": 3,
            "dietByDay": { "2024-01-01": 2 }
        })
    );

    let list = body_json(send(&router, empty_request("GET", "/feeds", Some(&cookie))).await).await;
    let names: Vec<_> = list["feeds"]
        .as_array()
        .expect("array")
        .iter()
        .map(|f| f["name"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(names, ["Breakfast", "Lunch", "Dinner"]);
    Ok(())
}

#[tokio::test]
async fn responses_carry_request_id() -> anyhow::Result<()> {
    let router = common::setup_router().await?;

    let resp = send(&router, empty_request("GET", "/health", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().get("x-request-id").is_some());

    let mut req = empty_request("GET", "/health", None);
    req.headers_mut()
        .insert("x-request-id", "caller-chosen".parse().expect("header"));
    let resp = send(&router, req).await;
    assert_eq!(
        resp.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("caller-chosen")
    );
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let resp = send(&router, empty_request("GET", "/openapi.json", None)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = body_json(resp).await;
    assert!(doc["paths"]["/feeds/{id}"]["put"].is_object());
    Ok(())
}

#[tokio::test]
async fn renaming_a_feed_keeps_other_fields() -> anyhow::Result<()> {
    let router = common::setup_router().await?;
    let cookie = register(&router, "a@example.com").await;
    let location = create(
        &router,
        &cookie,
        json!({
            "name": "Lunch",
            "description": "rice and beans",
            "date": "2024-01-01T12:00:00Z",
            "isOnDiet": true
        }),
    )
    .await;

    let resp = send(
        &router,
        json_request("PUT", &location, Some(&cookie), json!({ "name": "Late lunch" })),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let body = body_json(send(&router, empty_request("GET", &location, Some(&cookie))).await).await;
    assert_eq!(body["feed"]["name"], "Late lunch");
    assert_eq!(body["feed"]["description"], "rice and beans");
    assert_eq!(body["feed"]["date"], "2024-01-01T12:00:00Z");
    assert_eq!(body["feed"]["isOnDiet"], true);
    Ok(())
}
