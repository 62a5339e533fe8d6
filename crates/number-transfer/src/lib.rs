//! Phone-number transfer workflow between Twilio subaccounts.

mod error;
mod locks;
mod provider;
mod workflow;

pub use error::TransferError;
pub use locks::TargetLocks;
pub use provider::NumberProvider;
pub use workflow::{
    TransferConfig, TransferOutcome, TransferRequest, TransferWorkflow, DEFAULT_RECONCILE_DELAY,
};
