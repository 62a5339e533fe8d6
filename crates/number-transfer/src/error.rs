//! Transfer workflow errors.

use thiserror::Error;
use twilio_client::{BundleType, TwilioError};

#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("No {number_type} bundle in account {account_sid} after duplicating own bundles")]
    BundleProvisioningFailed {
        account_sid: String,
        number_type: BundleType,
    },

    /// The update call's own error, kept as returned by the provider.
    #[error("Transfer failed: {0}")]
    TransferFailed(#[source] TwilioError),

    #[error("Provider unavailable: {0}")]
    UpstreamUnavailable(#[source] TwilioError),
}

impl From<TwilioError> for TransferError {
    fn from(e: TwilioError) -> Self {
        match e {
            TwilioError::NotFound(what) => TransferError::NotFound(what),
            other => TransferError::UpstreamUnavailable(other),
        }
    }
}
