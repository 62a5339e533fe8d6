//! Twilio REST API client.

use crate::error::TwilioError;
use crate::pagination::{AccountPage, AddressPage, BundlePage, PhoneNumberPage};
use crate::types::*;
use futures::TryStreamExt;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use urlencoding::encode;

/// Default REST API host (accounts, numbers, addresses)
pub const DEFAULT_API_BASE_URL: &str = "https://api.twilio.com";

/// Default Numbers v2 host (regulatory compliance)
pub const DEFAULT_NUMBERS_BASE_URL: &str = "https://numbers.twilio.com";

const API_VERSION: &str = "2010-04-01";

/// Twilio REST API client bound to one account's credentials.
///
/// The auth token is stored using `SecretString` to prevent accidental
/// exposure in logs or debug output.
#[derive(Clone)]
pub struct TwilioClient {
    client: Client,
    api_base_url: String,
    numbers_base_url: String,
    account_sid: String,
    auth_token: SecretString,
}

impl TwilioClient {
    /// Create a new client for the given account.
    pub fn new(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, TwilioError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base_url: DEFAULT_API_BASE_URL.into(),
            numbers_base_url: DEFAULT_NUMBERS_BASE_URL.into(),
            account_sid: account_sid.into(),
            auth_token: SecretString::new(auth_token.into()),
        })
    }

    /// Point the client at other hosts (regional edges, test servers).
    pub fn with_base_urls(
        mut self,
        api_base_url: impl Into<String>,
        numbers_base_url: impl Into<String>,
    ) -> Self {
        self.api_base_url = trim_base(api_base_url.into());
        self.numbers_base_url = trim_base(numbers_base_url.into());
        self
    }

    /// Client scoped to a subaccount, sharing this client's connection pool.
    pub fn for_subaccount(&self, account_sid: impl Into<String>, auth_token: SecretString) -> Self {
        Self {
            client: self.client.clone(),
            api_base_url: self.api_base_url.clone(),
            numbers_base_url: self.numbers_base_url.clone(),
            account_sid: account_sid.into(),
            auth_token,
        }
    }

    /// SID of the account whose credentials this client uses.
    pub fn account_sid(&self) -> &str {
        &self.account_sid
    }

    /// Check that the credentials resolve to an account.
    pub async fn health_check(&self) -> bool {
        self.fetch_account(&self.account_sid).await.is_ok()
    }

    /// List subaccounts, optionally filtered by friendly name.
    #[instrument(skip(self))]
    pub async fn list_subaccounts(
        &self,
        friendly_name: Option<&str>,
    ) -> Result<Vec<Account>, TwilioError> {
        let mut url = format!("{}/{}/Accounts.json", self.api_base_url, API_VERSION);
        if let Some(name) = friendly_name {
            url = format!("{}?FriendlyName={}", url, encode(name));
        }

        let accounts: Vec<Account> = self.paginate::<AccountPage, _>(url).try_collect().await?;
        debug!("Listed {} accounts", accounts.len());
        Ok(accounts)
    }

    /// Fetch a single account.
    #[instrument(skip(self))]
    pub async fn fetch_account(&self, account_sid: &str) -> Result<Account, TwilioError> {
        let url = format!(
            "{}/{}/Accounts/{}.json",
            self.api_base_url,
            API_VERSION,
            encode(account_sid)
        );
        self.get_json(&url).await
    }

    /// Get the auth token of a subaccount.
    #[instrument(skip(self))]
    pub async fn get_subaccount_auth_token(
        &self,
        account_sid: &str,
    ) -> Result<SecretString, TwilioError> {
        self.fetch_account(account_sid)
            .await?
            .auth_token
            .ok_or_else(|| TwilioError::NotFound(format!("auth token for account {}", account_sid)))
    }

    /// Get every local and mobile number of an account, tagged by listing.
    ///
    /// `None` lists the client's own account. Local numbers come first.
    #[instrument(skip(self))]
    pub async fn get_account_numbers(
        &self,
        account_sid: Option<&str>,
    ) -> Result<Vec<PhoneNumber>, TwilioError> {
        let account_sid = account_sid.unwrap_or(&self.account_sid);

        let (local, mobile) = futures::try_join!(
            self.list_numbers(account_sid, NumberType::Local),
            self.list_numbers(account_sid, NumberType::Mobile),
        )?;

        let mut numbers = local;
        numbers.extend(mobile);
        debug!("Found {} numbers in {}", numbers.len(), account_sid);
        Ok(numbers)
    }

    async fn list_numbers(
        &self,
        account_sid: &str,
        number_type: NumberType,
    ) -> Result<Vec<PhoneNumber>, TwilioError> {
        let url = format!(
            "{}/{}/Accounts/{}/IncomingPhoneNumbers/{}.json",
            self.api_base_url,
            API_VERSION,
            encode(account_sid),
            number_type.listing_segment()
        );

        self.paginate::<PhoneNumberPage, PhoneNumber>(url)
            .map_ok(|number| number.tagged(number_type))
            .try_collect()
            .await
    }

    /// Look up the listing type of a number by SID.
    #[instrument(skip(self))]
    pub async fn get_number_type_from_sid(
        &self,
        number_sid: &str,
        account_sid: Option<&str>,
    ) -> Result<Option<NumberType>, TwilioError> {
        let numbers = self.get_account_numbers(account_sid).await?;
        Ok(numbers
            .into_iter()
            .find(|n| n.sid == number_sid)
            .and_then(|n| n.number_type))
    }

    /// Get the addresses of an account (`None` for the client's own).
    #[instrument(skip(self))]
    pub async fn get_addresses(&self, account_sid: Option<&str>) -> Result<Vec<Address>, TwilioError> {
        let url = self.addresses_url(account_sid.unwrap_or(&self.account_sid));
        self.paginate::<AddressPage, _>(url).try_collect().await
    }

    /// Create an address in an account.
    #[instrument(skip(self, profile), fields(customer_name = %profile.customer_name))]
    pub async fn create_address(
        &self,
        account_sid: &str,
        profile: &AddressProfile,
    ) -> Result<Address, TwilioError> {
        let url = self.addresses_url(account_sid);
        let address: Address = self.post_form(&url, &profile.form()).await?;
        info!(address_sid = %address.sid, account_sid = %account_sid, "Created address");
        Ok(address)
    }

    /// List regulatory bundles.
    ///
    /// With `account_sid`, the subaccount's own credentials are used, since
    /// bundles are only listable by their owner. Without `number_type`,
    /// `national` then `mobile` bundles are listed. Every record is tagged
    /// with the type it was requested as.
    #[instrument(skip(self))]
    pub async fn list_regulatory_bundles(
        &self,
        account_sid: Option<&str>,
        number_type: Option<BundleType>,
        iso_country: &str,
    ) -> Result<Vec<RegulatoryBundle>, TwilioError> {
        let scoped;
        let client = match account_sid {
            Some(sid) => {
                let auth_token = self.get_subaccount_auth_token(sid).await?;
                scoped = self.for_subaccount(sid, auth_token);
                &scoped
            }
            None => self,
        };

        let types = match number_type {
            Some(t) => vec![t],
            None => vec![BundleType::National, BundleType::Mobile],
        };

        let mut bundles = Vec::new();
        for bundle_type in types {
            let url = format!(
                "{}/v2/RegulatoryCompliance/Bundles?NumberType={}&IsoCountry={}",
                client.numbers_base_url,
                bundle_type.as_str(),
                encode(iso_country)
            );
            let listed: Vec<RegulatoryBundle> = client
                .paginate::<BundlePage, RegulatoryBundle>(url)
                .map_ok(|bundle| bundle.tagged(bundle_type))
                .try_collect()
                .await?;
            bundles.extend(listed);
        }

        debug!("Found {} bundles", bundles.len());
        Ok(bundles)
    }

    /// Every bundle owned by the client's own account, untagged.
    async fn list_own_bundles(&self) -> Result<Vec<RegulatoryBundle>, TwilioError> {
        let url = format!("{}/v2/RegulatoryCompliance/Bundles", self.numbers_base_url);
        self.paginate::<BundlePage, _>(url).try_collect().await
    }

    /// SID of the first bundle in the own listing owned by `account_sid`.
    #[instrument(skip(self))]
    pub async fn get_bundle_sid(&self, account_sid: &str) -> Result<Option<String>, TwilioError> {
        Ok(self
            .list_own_bundles()
            .await?
            .into_iter()
            .find(|b| b.account_sid == account_sid)
            .map(|b| b.sid))
    }

    /// Clone a regulatory bundle into another account.
    #[instrument(skip(self))]
    pub async fn duplicate_bundle(
        &self,
        bundle_sid: &str,
        target_account_sid: &str,
        friendly_name: Option<&str>,
    ) -> Result<RegulatoryBundle, TwilioError> {
        let url = format!(
            "{}/v2/RegulatoryCompliance/Bundles/{}/Clones",
            self.numbers_base_url,
            encode(bundle_sid)
        );

        let mut form = vec![("TargetAccountSid", target_account_sid)];
        if let Some(name) = friendly_name {
            form.push(("FriendlyName", name));
        }

        let clone: RegulatoryBundle = self.post_form(&url, &form).await?;
        info!(
            source_bundle = %bundle_sid,
            new_bundle = %clone.sid,
            target_account_sid = %target_account_sid,
            "Duplicated bundle"
        );
        Ok(clone)
    }

    /// Clone every bundle of the own account into a subaccount.
    ///
    /// Clones run one after another. Returns the source bundles that were
    /// cloned, not the clones.
    #[instrument(skip(self))]
    pub async fn duplicate_own_bundles_to_subaccount(
        &self,
        target_account_sid: &str,
    ) -> Result<Vec<RegulatoryBundle>, TwilioError> {
        let bundles = self.list_own_bundles().await?;
        info!(
            "Duplicating {} bundles into {}",
            bundles.len(),
            target_account_sid
        );

        for bundle in &bundles {
            self.duplicate_bundle(&bundle.sid, target_account_sid, bundle.friendly_name.as_deref())
                .await?;
        }

        Ok(bundles)
    }

    /// Update an incoming number held by `account_sid`.
    ///
    /// Setting `update.account_sid` to another account moves the number.
    #[instrument(skip(self, update), fields(target = %update.account_sid))]
    pub async fn update_incoming_number(
        &self,
        account_sid: &str,
        number_sid: &str,
        update: &NumberUpdate,
    ) -> Result<PhoneNumber, TwilioError> {
        let url = format!(
            "{}/{}/Accounts/{}/IncomingPhoneNumbers/{}.json",
            self.api_base_url,
            API_VERSION,
            encode(account_sid),
            encode(number_sid)
        );
        self.post_form(&url, &update.form()).await
    }

    fn addresses_url(&self, account_sid: &str) -> String {
        format!(
            "{}/{}/Accounts/{}/Addresses.json",
            self.api_base_url,
            API_VERSION,
            encode(account_sid)
        )
    }

    /// Turn a next-page link into an absolute URL.
    ///
    /// 2010-04-01 pages return a path, Numbers v2 pages a full URL.
    pub(crate) fn resolve_link(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else {
            format!("{}{}", self.api_base_url, link)
        }
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, TwilioError> {
        let response = self
            .client
            .get(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await?;

        self.handle_response(response).await
    }

    async fn post_form<T: DeserializeOwned>(
        &self,
        url: &str,
        form: &[(&str, &str)],
    ) -> Result<T, TwilioError> {
        let response = self
            .client
            .post(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(form)
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle HTTP response, converting errors appropriately.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, TwilioError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            debug!("Response body: {}", truncate(&body, 200));
            serde_json::from_str(&body).map_err(TwilioError::from)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract error information from failed response.
    async fn extract_error(&self, response: reqwest::Response) -> TwilioError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let parsed: Option<ApiErrorBody> = serde_json::from_str(&body).ok();
        let code = parsed.as_ref().and_then(|b| b.code);
        let message = parsed
            .and_then(|b| b.message)
            .unwrap_or_else(|| if body.is_empty() { status.to_string() } else { body });

        match status {
            StatusCode::NOT_FOUND => TwilioError::NotFound(message),
            StatusCode::UNAUTHORIZED => {
                warn!("Authentication failed");
                TwilioError::Unauthorized
            }
            _ => {
                warn!(status = %status, code = ?code, "API request failed: {}", message);
                TwilioError::Api {
                    status: status.as_u16(),
                    code,
                    message,
                }
            }
        }
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn truncate(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
