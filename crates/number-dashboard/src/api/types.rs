//! API request and response types.

use serde::{Deserialize, Serialize};
use twilio_client::{Address, PhoneNumber, RegulatoryBundle};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub provider_healthy: bool,
}

/// Query for the subaccount listing.
#[derive(Debug, Default, Deserialize)]
pub struct SubaccountQuery {
    /// Exact friendly name to filter on
    pub friendly_name: Option<String>,
}

/// Query for the bundle listing.
#[derive(Debug, Default, Deserialize)]
pub struct BundleQuery {
    /// `local`, `national`, `mobile` or `toll-free`; national and mobile when absent
    pub number_type: Option<String>,
}

/// Numbers of one account.
#[derive(Debug, Serialize)]
pub struct NumbersResponse {
    pub account_sid: String,
    pub numbers: Vec<PhoneNumber>,
}

/// Bundles of one account.
#[derive(Debug, Serialize)]
pub struct BundlesResponse {
    pub account_sid: String,
    pub bundles: Vec<RegulatoryBundle>,
}

/// Addresses of one account.
#[derive(Debug, Serialize)]
pub struct AddressesResponse {
    pub account_sid: String,
    pub addresses: Vec<Address>,
}
