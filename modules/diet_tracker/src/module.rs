use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tower_http::{
    limit::RequestBodyLimitLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
};
use tracing::{debug, info};

use crate::api::rest::{request_id, routes, session::SessionCookie};
use crate::config::DietTrackerConfig;
use crate::contract::client::DietTrackerApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::DietTrackerLocalClient;
use crate::infra::storage::migrations::Migrator;
use crate::infra::storage::sea_orm_repo::{SeaOrmFeedsRepository, SeaOrmSessionStore};

const MAX_BODY_BYTES: usize = 1024 * 1024;

/// The diet tracker wired onto one database connection.
#[derive(Clone)]
pub struct DietTracker {
    service: Arc<Service>,
    cookie: SessionCookie,
}

impl DietTracker {
    pub fn new(db: DatabaseConnection, cfg: DietTrackerConfig) -> Self {
        debug!(
            "Loaded diet_tracker config: cookie={}, max_age_days={}",
            cfg.session_cookie_name, cfg.session_max_age_days
        );

        let sessions = SeaOrmSessionStore::new(db.clone());
        let feeds = SeaOrmFeedsRepository::new(db);
        let service_config = ServiceConfig {
            max_name_length: cfg.max_name_length,
            max_description_length: cfg.max_description_length,
            ..ServiceConfig::default()
        };
        let service = Service::new(Arc::new(sessions), Arc::new(feeds), service_config);

        Self {
            service: Arc::new(service),
            cookie: SessionCookie::new(cfg.session_cookie_name, cfg.session_max_age_days),
        }
    }

    /// Decode the `modules.diet_tracker` section; a missing section means defaults.
    pub fn config_from(section: Option<&serde_json::Value>) -> anyhow::Result<DietTrackerConfig> {
        match section {
            Some(v) => serde_json::from_value(v.clone())
                .context("invalid modules.diet_tracker configuration"),
            None => Ok(DietTrackerConfig::default()),
        }
    }

    pub async fn migrate(db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running diet_tracker database migrations");
        Migrator::up(db, None).await?;
        info!("Diet tracker database migrations completed successfully");
        Ok(())
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client over the same service the REST layer uses.
    pub fn client(&self) -> Arc<dyn DietTrackerApi> {
        Arc::new(DietTrackerLocalClient::new(self.service.clone()))
    }

    /// Full HTTP surface with request-id propagation and per-request spans.
    pub fn router(&self) -> Router {
        info!("Registering diet_tracker REST routes");
        let router = routes::register_routes(Router::new(), self.service(), self.cookie.clone());
        let router = routes::register_meta_routes(router);

        // Layers run bottom-up: the id is set before the span is opened.
        router
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(request_id::create_trace_layer())
            .layer(PropagateRequestIdLayer::new(request_id::header()))
            .layer(SetRequestIdLayer::new(
                request_id::header(),
                request_id::MakeReqId,
            ))
    }
}
