use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path},
    http::{header, HeaderMap, HeaderValue, StatusCode, Uri},
    response::Json,
    Extension,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    CreateFeedReq, FeedDto, FeedEnvelope, FeedListDto, RegisterUserReq, SummaryDto,
    UpdateFeedReq,
};
use crate::api::rest::error::{feed_not_found, map_domain_error, map_json_rejection};
use crate::api::rest::problem::{Problem, ProblemResponse};
use crate::api::rest::session::{CurrentUser, SessionCookie};
use crate::domain::service::Service;

/// Feed ids are opaque to clients; one that is not even a UUID cannot exist.
fn parse_feed_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw).ok()
}

/// Register an anonymous user and establish the session cookie
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = RegisterUserReq,
    responses(
        (status = 201, description = "User registered; sets the session cookie when none was presented"),
        (status = 400, description = "Invalid email", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn register_user(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Extension(cookie): Extension<SessionCookie>,
    jar: CookieJar,
    payload: Result<Json<RegisterUserReq>, JsonRejection>,
) -> Result<(CookieJar, StatusCode), ProblemResponse> {
    let Json(req) = payload.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!("Registering user");

    let presented = cookie.read(&jar).map(str::to_owned);
    match svc.register(presented.as_deref(), req.email).await {
        Ok(registration) if registration.issued => {
            let jar = jar.add(cookie.issue(registration.user.id));
            Ok((jar, StatusCode::CREATED))
        }
        Ok(_) => Ok((jar, StatusCode::CREATED)),
        Err(e) => {
            error!("Failed to register user: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Diet summary of the calling session
#[utoipa::path(
    get,
    path = "/users/summary",
    tag = "users",
    responses(
        (status = 200, description = "Diet summary", body = SummaryDto),
        (status = 401, description = "Missing or unknown session", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_summary(
    uri: Uri,
    user: CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<SummaryDto>, ProblemResponse> {
    match svc.summary(user.session_id()).await {
        Ok(summary) => Ok(Json(SummaryDto::from(summary))),
        Err(e) => {
            error!("Failed to compute summary: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Record a feed
#[utoipa::path(
    post,
    path = "/feeds",
    tag = "feeds",
    request_body = CreateFeedReq,
    responses(
        (status = 201, description = "Feed created"),
        (status = 400, description = "Invalid payload", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or unknown session", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn create_feed(
    uri: Uri,
    user: CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    payload: Result<Json<CreateFeedReq>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap), ProblemResponse> {
    let Json(req) = payload.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!("Creating feed");

    match svc.create_feed(user.session_id(), req.into()).await {
        Ok(feed) => {
            let mut headers = HeaderMap::new();
            if let Ok(location) = HeaderValue::from_str(&format!("/feeds/{}", feed.id)) {
                headers.insert(header::LOCATION, location);
            }
            Ok((StatusCode::CREATED, headers))
        }
        Err(e) => {
            error!("Failed to create feed: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Update only the supplied fields of a feed
#[utoipa::path(
    put,
    path = "/feeds/{id}",
    tag = "feeds",
    params(("id" = String, Path, description = "Feed id")),
    request_body = UpdateFeedReq,
    responses(
        (status = 204, description = "Feed updated"),
        (status = 400, description = "Invalid payload", body = Problem, content_type = "application/problem+json"),
        (status = 401, description = "Missing or unknown session", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "No such feed for this session", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn update_feed(
    uri: Uri,
    user: CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
    payload: Result<Json<UpdateFeedReq>, JsonRejection>,
) -> Result<StatusCode, ProblemResponse> {
    let id = parse_feed_id(&raw_id)
        .ok_or_else(|| feed_not_found(&raw_id, uri.path()))?;
    let Json(req) = payload.map_err(|r| map_json_rejection(&r, uri.path()))?;
    info!("Updating feed {}", id);

    match svc.update_feed(user.session_id(), id, req.into()).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to update feed {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Delete a feed; deleting a missing feed is a no-op
#[utoipa::path(
    delete,
    path = "/feeds/{id}",
    tag = "feeds",
    params(("id" = String, Path, description = "Feed id")),
    responses(
        (status = 204, description = "Feed deleted, or nothing to delete"),
        (status = 401, description = "Missing or unknown session", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_feed(
    uri: Uri,
    user: CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ProblemResponse> {
    let Some(id) = parse_feed_id(&raw_id) else {
        return Ok(StatusCode::NO_CONTENT);
    };
    info!("Deleting feed {}", id);

    match svc.delete_feed(user.session_id(), id).await {
        Ok(_) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete feed {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get one feed of the calling session
#[utoipa::path(
    get,
    path = "/feeds/{id}",
    tag = "feeds",
    params(("id" = String, Path, description = "Feed id")),
    responses(
        (status = 200, description = "Feed found", body = FeedEnvelope),
        (status = 401, description = "Missing or unknown session", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "No such feed for this session", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_feed(
    uri: Uri,
    user: CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
    Path(raw_id): Path<String>,
) -> Result<Json<FeedEnvelope>, ProblemResponse> {
    let id = parse_feed_id(&raw_id)
        .ok_or_else(|| feed_not_found(&raw_id, uri.path()))?;

    match svc.get_feed(user.session_id(), id).await {
        Ok(feed) => Ok(Json(FeedEnvelope {
            feed: FeedDto::from(feed),
        })),
        Err(e) => {
            error!("Failed to get feed {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List every feed of the calling session
#[utoipa::path(
    get,
    path = "/feeds",
    tag = "feeds",
    responses(
        (status = 200, description = "Feeds of the session", body = FeedListDto),
        (status = 401, description = "Missing or unknown session", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_feeds(
    uri: Uri,
    user: CurrentUser,
    Extension(svc): Extension<Arc<Service>>,
) -> Result<Json<FeedListDto>, ProblemResponse> {
    match svc.list_feeds(user.session_id()).await {
        Ok(feeds) => Ok(Json(FeedListDto {
            feeds: feeds.into_iter().map(FeedDto::from).collect(),
        })),
        Err(e) => {
            error!("Failed to list feeds: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
