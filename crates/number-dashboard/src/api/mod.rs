//! HTTP API for the dashboard.

mod handlers;
mod middleware;
mod types;

pub use handlers::*;
pub use middleware::{auth_middleware, logging_middleware, rate_limit_middleware, RateLimitState};
pub use types::*;

use crate::auth::DashboardAuth;
use crate::cache::SubaccountCache;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use number_transfer::{TransferConfig, TransferWorkflow};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use twilio_client::TwilioClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Root account client
    pub twilio: Arc<TwilioClient>,
    /// Transfer workflow over the same client
    pub workflow: TransferWorkflow<TwilioClient>,
    /// Subaccount listing cache
    pub subaccounts: SubaccountCache,
    /// Dashboard credentials
    pub auth: Arc<DashboardAuth>,
    /// Country used for bundle listings
    pub iso_country: String,
}

impl AppState {
    /// Create new application state.
    pub fn new(
        twilio: TwilioClient,
        workflow_config: TransferConfig,
        subaccounts: SubaccountCache,
        auth: DashboardAuth,
    ) -> Self {
        let twilio = Arc::new(twilio);
        let iso_country = workflow_config.iso_country.clone();

        Self {
            workflow: TransferWorkflow::new(twilio.clone(), workflow_config),
            twilio,
            subaccounts,
            auth: Arc::new(auth),
            iso_country,
        }
    }
}

/// Create the API router with the default rate limit.
pub fn create_router(state: AppState) -> Router {
    create_router_with_rate_limit(state, RateLimitState::new(60))
}

/// Create the API router with custom rate limiting.
///
/// Credentials are checked before the rate limit, so rejected requests do
/// not spend the API budget. `/health` reaches the provider and gets its own
/// budget with the same quota.
pub fn create_router_with_rate_limit(state: AppState, rate_limit: RateLimitState) -> Router {
    let health = Router::new()
        .route("/health", get(handlers::health))
        .route_layer(axum_middleware::from_fn_with_state(
            rate_limit.independent(),
            rate_limit_middleware,
        ));

    let protected = Router::new()
        .route("/v1/subaccounts", get(handlers::list_subaccounts))
        .route("/v1/subaccounts/refresh", post(handlers::refresh_subaccounts))
        .route("/v1/accounts/:sid/numbers", get(handlers::list_numbers))
        .route("/v1/accounts/:sid/bundles", get(handlers::list_bundles))
        .route("/v1/accounts/:sid/addresses", get(handlers::list_addresses))
        .route("/v1/transfers", post(handlers::transfer_number))
        .route_layer(axum_middleware::from_fn_with_state(
            rate_limit,
            rate_limit_middleware,
        ))
        // Outermost: runs before the rate limit
        .route_layer(axum_middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        // Static page (no auth, no rate limiting)
        .route("/", get(handlers::index))
        .merge(health)
        .merge(protected)
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
