//! Provider operations the transfer workflow depends on.

use async_trait::async_trait;
use twilio_client::{
    Address, AddressProfile, BundleType, NumberType, NumberUpdate, PhoneNumber, RegulatoryBundle,
    TwilioClient, TwilioError,
};

/// Account-scoped provider calls used by [`crate::TransferWorkflow`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NumberProvider: Send + Sync {
    /// Listing type of `number_sid` within `account_sid`, if held there.
    async fn number_type(
        &self,
        number_sid: &str,
        account_sid: &str,
    ) -> Result<Option<NumberType>, TwilioError>;

    /// All numbers currently held by an account.
    async fn account_numbers(&self, account_sid: &str) -> Result<Vec<PhoneNumber>, TwilioError>;

    /// Bundles of one type owned by an account.
    async fn bundles(
        &self,
        account_sid: &str,
        number_type: BundleType,
        iso_country: &str,
    ) -> Result<Vec<RegulatoryBundle>, TwilioError>;

    /// Copy every bundle of the root account into `target_account_sid`.
    async fn duplicate_own_bundles(
        &self,
        target_account_sid: &str,
    ) -> Result<Vec<RegulatoryBundle>, TwilioError>;

    async fn addresses(&self, account_sid: &str) -> Result<Vec<Address>, TwilioError>;

    async fn create_address(
        &self,
        account_sid: &str,
        profile: &AddressProfile,
    ) -> Result<Address, TwilioError>;

    /// Apply an ownership update to a number held by `account_sid`.
    async fn update_number(
        &self,
        account_sid: &str,
        number_sid: &str,
        update: &NumberUpdate,
    ) -> Result<PhoneNumber, TwilioError>;
}

#[async_trait]
impl NumberProvider for TwilioClient {
    async fn number_type(
        &self,
        number_sid: &str,
        account_sid: &str,
    ) -> Result<Option<NumberType>, TwilioError> {
        self.get_number_type_from_sid(number_sid, Some(account_sid))
            .await
    }

    async fn account_numbers(&self, account_sid: &str) -> Result<Vec<PhoneNumber>, TwilioError> {
        self.get_account_numbers(Some(account_sid)).await
    }

    async fn bundles(
        &self,
        account_sid: &str,
        number_type: BundleType,
        iso_country: &str,
    ) -> Result<Vec<RegulatoryBundle>, TwilioError> {
        self.list_regulatory_bundles(Some(account_sid), Some(number_type), iso_country)
            .await
    }

    async fn duplicate_own_bundles(
        &self,
        target_account_sid: &str,
    ) -> Result<Vec<RegulatoryBundle>, TwilioError> {
        self.duplicate_own_bundles_to_subaccount(target_account_sid)
            .await
    }

    async fn addresses(&self, account_sid: &str) -> Result<Vec<Address>, TwilioError> {
        self.get_addresses(Some(account_sid)).await
    }

    async fn create_address(
        &self,
        account_sid: &str,
        profile: &AddressProfile,
    ) -> Result<Address, TwilioError> {
        TwilioClient::create_address(self, account_sid, profile).await
    }

    async fn update_number(
        &self,
        account_sid: &str,
        number_sid: &str,
        update: &NumberUpdate,
    ) -> Result<PhoneNumber, TwilioError> {
        self.update_incoming_number(account_sid, number_sid, update)
            .await
    }
}
