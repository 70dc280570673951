use utoipa::OpenApi;

use crate::api::rest::{dto, handlers, problem};

#[derive(OpenApi)]
#[openapi(
    info(title = "Diet Tracker API", description = "Session-scoped meal log and diet summary"),
    paths(
        handlers::register_user,
        handlers::get_summary,
        handlers::create_feed,
        handlers::update_feed,
        handlers::delete_feed,
        handlers::get_feed,
        handlers::list_feeds,
    ),
    components(schemas(
        dto::RegisterUserReq,
        dto::CreateFeedReq,
        dto::UpdateFeedReq,
        dto::FeedDto,
        dto::FeedEnvelope,
        dto::FeedListDto,
        dto::SummaryDto,
        problem::Problem,
    )),
    tags(
        (name = "users", description = "Anonymous registration and diet summary"),
        (name = "feeds", description = "Meals of the calling session"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = serde_json::to_value(ApiDoc::openapi()).expect("json");
        let paths = doc["paths"].as_object().expect("paths");

        for p in ["/users", "/users/summary", "/feeds", "/feeds/{id}"] {
            assert!(paths.contains_key(p), "missing {p}");
        }
        let item = &paths["/feeds/{id}"];
        for method in ["get", "put", "delete"] {
            assert!(item.get(method).is_some(), "missing {method} /feeds/{{id}}");
        }
        assert!(doc.pointer("/components/schemas/SummaryDto").is_some());
        assert!(doc.pointer("/components/schemas/Problem").is_some());
    }
}
