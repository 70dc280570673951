use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use utoipa::OpenApi;

use crate::api::rest::handlers;
use crate::api::rest::openapi::ApiDoc;
use crate::api::rest::session::SessionCookie;
use crate::domain::service::Service;

/// Register the REST surface on `router`. The service and cookie settings
/// are injected per-router via `Extension`.
pub fn register_routes(router: Router, service: Arc<Service>, cookie: SessionCookie) -> Router {
    router
        .route("/users", post(handlers::register_user))
        .route("/users/summary", get(handlers::get_summary))
        .route(
            "/feeds",
            post(handlers::create_feed).get(handlers::list_feeds),
        )
        .route(
            "/feeds/{id}",
            get(handlers::get_feed)
                .put(handlers::update_feed)
                .delete(handlers::delete_feed),
        )
        .layer(Extension(service))
        .layer(Extension(cookie))
}

/// Health probe and OpenAPI document; no session required.
pub fn register_meta_routes(router: Router) -> Router {
    router
        .route("/health", get(handlers::health))
        .route("/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
}
