//! Phone-number transfer between subaccounts.

use crate::error::TransferError;
use crate::locks::TargetLocks;
use crate::provider::NumberProvider;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};
use twilio_client::{
    AddressProfile, BundleType, NumberUpdate, PhoneNumber, TwilioError, DEFAULT_ISO_COUNTRY,
};

/// Wait before re-checking the target inventory after a failed update.
pub const DEFAULT_RECONCILE_DELAY: Duration = Duration::from_secs(2);

/// Workflow settings.
#[derive(Debug, Clone)]
pub struct TransferConfig {
    /// Delay between a failed update and the inventory re-check
    pub reconcile_delay: Duration,

    /// Country of the regulatory bundles to look up
    pub iso_country: String,

    /// Address created in target accounts that have none
    pub address_profile: AddressProfile,
}

impl Default for TransferConfig {
    fn default() -> Self {
        Self {
            reconcile_delay: DEFAULT_RECONCILE_DELAY,
            iso_country: DEFAULT_ISO_COUNTRY.into(),
            address_profile: AddressProfile::default(),
        }
    }
}

/// A request to move one number between accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferRequest {
    pub source_account_sid: String,
    pub phone_number_sid: String,
    pub target_account_sid: String,

    /// Use this address instead of resolving one in the target account
    #[serde(default)]
    pub address_sid: Option<String>,

    /// Use this bundle instead of resolving one in the target account
    #[serde(default)]
    pub bundle_sid: Option<String>,
}

impl TransferRequest {
    pub fn new(
        source_account_sid: impl Into<String>,
        phone_number_sid: impl Into<String>,
        target_account_sid: impl Into<String>,
    ) -> Self {
        Self {
            source_account_sid: source_account_sid.into(),
            phone_number_sid: phone_number_sid.into(),
            target_account_sid: target_account_sid.into(),
            address_sid: None,
            bundle_sid: None,
        }
    }

    pub fn with_address(mut self, address_sid: impl Into<String>) -> Self {
        self.address_sid = Some(address_sid.into());
        self
    }

    pub fn with_bundle(mut self, bundle_sid: impl Into<String>) -> Self {
        self.bundle_sid = Some(bundle_sid.into());
        self
    }
}

/// Result of a completed transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferOutcome {
    /// Number record as returned by the update or found in the target
    pub number: PhoneNumber,
    pub bundle_sid: String,
    pub address_sid: String,

    /// True when the update errored but the number showed up in the target
    pub reconciled: bool,
}

/// Moves numbers between subaccounts.
///
/// Before the update call the target account gets a bundle matching the
/// number's type and an address, provisioning either when missing. A failed
/// update is re-checked against the target's inventory once, after
/// `reconcile_delay`, and counted as done if the number is there.
pub struct TransferWorkflow<P> {
    provider: Arc<P>,
    config: TransferConfig,
    locks: TargetLocks,
}

impl<P> Clone for TransferWorkflow<P> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            config: self.config.clone(),
            locks: self.locks.clone(),
        }
    }
}

impl<P: NumberProvider> TransferWorkflow<P> {
    pub fn new(provider: Arc<P>, config: TransferConfig) -> Self {
        Self {
            provider,
            config,
            locks: TargetLocks::new(),
        }
    }

    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Transfer a number from the source to the target account.
    #[instrument(
        skip(self, request),
        fields(
            source = %request.source_account_sid,
            number = %request.phone_number_sid,
            target = %request.target_account_sid
        )
    )]
    pub async fn transfer(&self, request: &TransferRequest) -> Result<TransferOutcome, TransferError> {
        let (bundle_sid, address_sid) = {
            let _guard = self.locks.lock(&request.target_account_sid).await;

            let bundle_sid = match &request.bundle_sid {
                Some(sid) => sid.clone(),
                None => self.resolve_bundle(request).await?,
            };
            let address_sid = match &request.address_sid {
                Some(sid) => sid.clone(),
                None => self.resolve_address(&request.target_account_sid).await?,
            };

            (bundle_sid, address_sid)
        };

        let update = NumberUpdate {
            account_sid: request.target_account_sid.clone(),
            address_sid: Some(address_sid.clone()),
            bundle_sid: Some(bundle_sid.clone()),
        };

        match self
            .provider
            .update_number(&request.source_account_sid, &request.phone_number_sid, &update)
            .await
        {
            Ok(number) => {
                info!(
                    "Successfully transferred number {} from account {} to account {}",
                    request.phone_number_sid, request.source_account_sid, request.target_account_sid
                );
                Ok(TransferOutcome {
                    number,
                    bundle_sid,
                    address_sid,
                    reconciled: false,
                })
            }
            Err(transfer_error) => {
                warn!("Update call failed, checking target account: {}", transfer_error);
                let number = self.reconcile(request, transfer_error).await?;
                Ok(TransferOutcome {
                    number,
                    bundle_sid,
                    address_sid,
                    reconciled: true,
                })
            }
        }
    }

    /// Find a bundle in the target matching the number's type, copying the
    /// root account's bundles over once if there is none.
    async fn resolve_bundle(&self, request: &TransferRequest) -> Result<String, TransferError> {
        let target = &request.target_account_sid;

        let number_type = self
            .provider
            .number_type(&request.phone_number_sid, &request.source_account_sid)
            .await?
            .ok_or_else(|| {
                TransferError::NotFound(format!(
                    "number {} in account {}",
                    request.phone_number_sid, request.source_account_sid
                ))
            })?;
        let bundle_type = BundleType::from(number_type);

        let mut bundles = self
            .provider
            .bundles(target, bundle_type, &self.config.iso_country)
            .await?;

        if bundles.is_empty() {
            info!("No {} bundle found, duplicating own bundles from main account", bundle_type);
            self.provider.duplicate_own_bundles(target).await?;
            bundles = self
                .provider
                .bundles(target, bundle_type, &self.config.iso_country)
                .await?;
        }

        let bundle = bundles.into_iter().next().ok_or_else(|| {
            TransferError::BundleProvisioningFailed {
                account_sid: target.clone(),
                number_type: bundle_type,
            }
        })?;

        info!(bundle_sid = %bundle.sid, "Using bundle");
        Ok(bundle.sid)
    }

    /// First address of the target account, or a new one from the profile.
    async fn resolve_address(&self, target: &str) -> Result<String, TransferError> {
        let addresses = self.provider.addresses(target).await?;

        let address = match addresses.into_iter().next() {
            Some(address) => {
                info!("Address found, using it");
                address
            }
            None => {
                info!("No address found, creating one");
                self.provider
                    .create_address(target, &self.config.address_profile)
                    .await?
            }
        };

        info!(
            address_sid = %address.sid,
            friendly_name = address.friendly_name.as_deref().unwrap_or(""),
            "Using address"
        );
        Ok(address.sid)
    }

    /// Look for the number in the target after a failed update.
    ///
    /// Any failure here is logged and the update's own error is returned.
    async fn reconcile(
        &self,
        request: &TransferRequest,
        transfer_error: TwilioError,
    ) -> Result<PhoneNumber, TransferError> {
        sleep(self.config.reconcile_delay).await;

        match self.provider.account_numbers(&request.target_account_sid).await {
            Ok(numbers) => {
                if let Some(number) = numbers
                    .into_iter()
                    .find(|n| n.sid == request.phone_number_sid)
                {
                    info!(
                        "Number {} found in target account despite error. Transfer likely successful.",
                        request.phone_number_sid
                    );
                    return Ok(number);
                }
            }
            Err(verify_error) => {
                error!("Error during transfer verification: {}", verify_error);
            }
        }

        error!("Failed to transfer phone number: {}", transfer_error);
        Err(TransferError::TransferFailed(transfer_error))
    }
}
