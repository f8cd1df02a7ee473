//! HTTP API Layer
//!
//! This crate provides the REST API for the lost-and-found service using
//! Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for each resource
//! - **Middleware**: Token authentication and request logging
//! - **DTOs**: Success envelope, query strings and small request bodies
//! - **Error Handling**: Every failure rendered as the same JSON envelope
//!
//! Every `/api/v1` route requires an authenticated caller; `/health` and
//! `/health/ready` are public.
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(AppState::postgres(pool, config));
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod error;
pub mod middleware;
pub mod handlers;
pub mod dto;
pub mod auth;
pub mod extract;

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, put},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_admin::{AdminService, AuditLogPort, ProfilePort, ProfileService};
use domain_claims::{ClaimPort, ClaimService};
use domain_items::{FoundItem, ItemPort, ItemService, LostItem, ShareItem};
use infra_db::{
    PostgresAuditLogAdapter, PostgresClaimAdapter, PostgresItemAdapter, PostgresProfileAdapter,
};

use crate::config::ApiConfig;
use crate::handlers::items::ItemResource;
use crate::handlers::{admin, claims, health, items, me};
use crate::middleware::{auth_middleware, request_log_middleware};

/// The storage ports the API runs on
pub struct Ports {
    pub found_items: Arc<dyn ItemPort<FoundItem>>,
    pub lost_items: Arc<dyn ItemPort<LostItem>>,
    pub share_items: Arc<dyn ItemPort<ShareItem>>,
    pub claims: Arc<dyn ClaimPort>,
    pub profiles: Arc<dyn ProfilePort>,
    pub audit: Arc<dyn AuditLogPort>,
}

impl Ports {
    /// PostgreSQL adapters sharing one pool
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            found_items: Arc::new(PostgresItemAdapter::<FoundItem>::new(pool.clone())),
            lost_items: Arc::new(PostgresItemAdapter::<LostItem>::new(pool.clone())),
            share_items: Arc::new(PostgresItemAdapter::<ShareItem>::new(pool.clone())),
            claims: Arc::new(PostgresClaimAdapter::new(pool.clone())),
            profiles: Arc::new(PostgresProfileAdapter::new(pool.clone())),
            audit: Arc::new(PostgresAuditLogAdapter::new(pool)),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ApiConfig>,
    pub found_items: ItemService<FoundItem>,
    pub lost_items: ItemService<LostItem>,
    pub share_items: ItemService<ShareItem>,
    pub claims: ClaimService,
    pub profiles: ProfileService,
    pub admin: AdminService,
}

impl AppState {
    /// Builds every service over `ports`
    pub fn new(config: ApiConfig, ports: Ports) -> Self {
        let found_items = ItemService::new(Arc::clone(&ports.found_items));
        let lost_items = ItemService::new(ports.lost_items);
        let share_items = ItemService::new(ports.share_items);
        let claims = ClaimService::new(ports.claims, ports.found_items);
        let admin = AdminService::new(
            Arc::clone(&ports.profiles),
            ports.audit,
            claims.clone(),
            found_items.clone(),
            lost_items.clone(),
            share_items.clone(),
        );

        Self {
            config: Arc::new(config),
            found_items,
            lost_items,
            share_items,
            claims,
            profiles: ProfileService::new(ports.profiles),
            admin,
        }
    }

    pub fn postgres(pool: PgPool, config: ApiConfig) -> Self {
        Self::new(config, Ports::postgres(pool))
    }
}

fn item_routes<T: ItemResource>() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list::<T>).post(items::create::<T>))
        .route(
            "/:id",
            get(items::get::<T>)
                .put(items::update::<T>)
                .delete(items::delete::<T>),
        )
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let found_routes = item_routes::<FoundItem>().route(
        "/:id/claims",
        get(claims::list_for_item).post(claims::create_claim),
    );

    let claims_routes = Router::new()
        .route("/made", get(claims::claims_made))
        .route("/received", get(claims::claims_received))
        .route("/:id", get(claims::get_claim).delete(claims::delete_claim))
        .route("/:id/status", put(claims::update_status));

    let admin_routes = Router::new()
        .route("/users", get(admin::list_users))
        .route("/users/:id/role", put(admin::set_role))
        .route("/users/:id/verification", put(admin::set_verification))
        .route("/claims", get(admin::list_claims))
        .route("/reports/:kind/:id", delete(admin::remove_report))
        .route("/audit-logs", get(admin::list_audit_logs));

    // Protected API routes
    let api_routes = Router::new()
        .route("/me", get(me::get_me).put(me::update_me))
        .nest("/found-items", found_routes)
        .nest("/lost-items", item_routes::<LostItem>())
        .nest("/share-items", item_routes::<ShareItem>())
        .nest("/claims", claims_routes)
        .nest("/admin", admin_routes)
        .route_layer(axum_middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1", api_routes)
        .layer(axum_middleware::from_fn(request_log_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
