//! Web dashboard for moving phone numbers between Twilio subaccounts.
//!
//! Serves a single-page UI plus a JSON API over the subaccount, number,
//! bundle and address listings and the transfer workflow.

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod error;

pub use auth::{hash_password, DashboardAuth};
pub use cache::{SubaccountCache, SubaccountListing};
pub use config::Config;
pub use error::DashboardError;
