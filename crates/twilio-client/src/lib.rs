//! Twilio REST API client for subaccount, phone-number, address and
//! regulatory-bundle management.

mod client;
mod error;
mod pagination;
mod types;

pub use client::{TwilioClient, DEFAULT_API_BASE_URL, DEFAULT_NUMBERS_BASE_URL};
pub use error::TwilioError;
pub use types::*;
