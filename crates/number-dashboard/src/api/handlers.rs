//! HTTP request handlers.

use super::types::{
    AddressesResponse, BundleQuery, BundlesResponse, HealthResponse, NumbersResponse,
    SubaccountQuery,
};
use super::AppState;
use crate::cache::SubaccountListing;
use crate::error::DashboardError;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Json,
};
use number_transfer::{TransferOutcome, TransferRequest};
use tracing::{info, warn};
use twilio_client::BundleType;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// Health check endpoint.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider_healthy = state.twilio.health_check().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        provider_healthy,
    })
}

/// Dashboard page.
pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// List subaccounts, served from the cache when fresh.
pub async fn list_subaccounts(
    State(state): State<AppState>,
    Query(query): Query<SubaccountQuery>,
) -> Result<Json<SubaccountListing>, DashboardError> {
    let friendly_name = query.friendly_name.as_deref().filter(|name| !name.is_empty());

    if let Some(listing) = state.subaccounts.get(friendly_name).await {
        return Ok(Json(listing));
    }

    let accounts = state.twilio.list_subaccounts(friendly_name).await?;
    Ok(Json(state.subaccounts.insert(friendly_name, accounts).await))
}

/// Drop the cached listings and reload the unfiltered one.
pub async fn refresh_subaccounts(
    State(state): State<AppState>,
) -> Result<Json<SubaccountListing>, DashboardError> {
    state.subaccounts.clear().await;

    let accounts = state.twilio.list_subaccounts(None).await?;
    info!(count = accounts.len(), "Reloaded subaccounts");
    Ok(Json(state.subaccounts.insert(None, accounts).await))
}

/// Local and mobile numbers of an account.
pub async fn list_numbers(
    State(state): State<AppState>,
    Path(account_sid): Path<String>,
) -> Result<Json<NumbersResponse>, DashboardError> {
    let numbers = state.twilio.get_account_numbers(Some(&account_sid)).await?;

    Ok(Json(NumbersResponse {
        account_sid,
        numbers,
    }))
}

/// Regulatory bundles of an account.
pub async fn list_bundles(
    State(state): State<AppState>,
    Path(account_sid): Path<String>,
    Query(query): Query<BundleQuery>,
) -> Result<Json<BundlesResponse>, DashboardError> {
    let number_type = query
        .number_type
        .as_deref()
        .map(str::parse::<BundleType>)
        .transpose()
        .map_err(DashboardError::BadRequest)?;

    let bundles = state
        .twilio
        .list_regulatory_bundles(Some(&account_sid), number_type, &state.iso_country)
        .await?;

    Ok(Json(BundlesResponse {
        account_sid,
        bundles,
    }))
}

/// Addresses of an account.
pub async fn list_addresses(
    State(state): State<AppState>,
    Path(account_sid): Path<String>,
) -> Result<Json<AddressesResponse>, DashboardError> {
    let addresses = state.twilio.get_addresses(Some(&account_sid)).await?;

    Ok(Json(AddressesResponse {
        account_sid,
        addresses,
    }))
}

/// Move a number between subaccounts.
pub async fn transfer_number(
    State(state): State<AppState>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<TransferOutcome>, DashboardError> {
    for (field, value) in [
        ("source_account_sid", &request.source_account_sid),
        ("phone_number_sid", &request.phone_number_sid),
        ("target_account_sid", &request.target_account_sid),
    ] {
        if value.trim().is_empty() {
            return Err(DashboardError::BadRequest(format!("{} is required", field)));
        }
    }

    if request.source_account_sid == request.target_account_sid {
        return Err(DashboardError::BadRequest(
            "source and target accounts must differ".into(),
        ));
    }

    info!(
        source = %request.source_account_sid,
        number = %request.phone_number_sid,
        target = %request.target_account_sid,
        "Transfer requested"
    );

    let outcome = state.workflow.transfer(&request).await.map_err(|e| {
        warn!(number = %request.phone_number_sid, error = %e, "Transfer failed");
        e
    })?;

    Ok(Json(outcome))
}
