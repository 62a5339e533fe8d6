//! Page envelopes and page-following streams.

use crate::client::TwilioClient;
use crate::error::TwilioError;
use crate::types::*;
use futures::Stream;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

/// A single page of a list response.
pub(crate) trait Page<T>: DeserializeOwned {
    /// Split into the page items and the link to the next page, if any.
    fn into_parts(self) -> (Vec<T>, Option<String>);
}

#[derive(Debug, Deserialize)]
pub(crate) struct AccountPage {
    #[serde(default)]
    accounts: Vec<Account>,
    next_page_uri: Option<String>,
}

impl Page<Account> for AccountPage {
    fn into_parts(self) -> (Vec<Account>, Option<String>) {
        (self.accounts, self.next_page_uri)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PhoneNumberPage {
    #[serde(default)]
    incoming_phone_numbers: Vec<PhoneNumber>,
    next_page_uri: Option<String>,
}

impl Page<PhoneNumber> for PhoneNumberPage {
    fn into_parts(self) -> (Vec<PhoneNumber>, Option<String>) {
        (self.incoming_phone_numbers, self.next_page_uri)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AddressPage {
    #[serde(default)]
    addresses: Vec<Address>,
    next_page_uri: Option<String>,
}

impl Page<Address> for AddressPage {
    fn into_parts(self) -> (Vec<Address>, Option<String>) {
        (self.addresses, self.next_page_uri)
    }
}

/// Numbers v2 pages carry the link inside `meta`.
#[derive(Debug, Deserialize)]
pub(crate) struct BundlePage {
    #[serde(default)]
    results: Vec<RegulatoryBundle>,
    #[serde(default)]
    meta: Option<PageMeta>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PageMeta {
    next_page_url: Option<String>,
}

impl Page<RegulatoryBundle> for BundlePage {
    fn into_parts(self) -> (Vec<RegulatoryBundle>, Option<String>) {
        (self.results, self.meta.and_then(|m| m.next_page_url))
    }
}

impl TwilioClient {
    /// Stream every item of a list resource, following next-page links.
    pub(crate) fn paginate<P, T>(
        &self,
        first_url: String,
    ) -> impl Stream<Item = Result<T, TwilioError>> + '_
    where
        P: Page<T> + 'static,
        T: 'static,
    {
        async_stream::try_stream! {
            let mut next = Some(first_url);
            let mut pages = 0usize;

            while let Some(url) = next.take() {
                let page: P = self.get_json(&url).await?;
                let (items, next_link) = page.into_parts();
                pages += 1;
                debug!(page = pages, items = items.len(), "Fetched list page");

                next = next_link
                    .filter(|link| !link.is_empty())
                    .map(|link| self.resolve_link(&link));

                for item in items {
                    yield item;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_page_parts() {
        let json = r#"{
            "accounts": [{"sid": "AC1", "friendly_name": "One", "status": "active"}],
            "next_page_uri": "/2010-04-01/Accounts.json?Page=1&PageToken=PAAC1"
        }"#;

        let page: AccountPage = serde_json::from_str(json).unwrap();
        let (items, next) = page.into_parts();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].sid, "AC1");
        assert_eq!(
            next.as_deref(),
            Some("/2010-04-01/Accounts.json?Page=1&PageToken=PAAC1")
        );
    }

    #[test]
    fn test_bundle_page_without_meta() {
        let json = r#"{"results": [{"sid": "BU1", "account_sid": "AC1"}]}"#;

        let page: BundlePage = serde_json::from_str(json).unwrap();
        let (items, next) = page.into_parts();
        assert_eq!(items.len(), 1);
        assert!(next.is_none());
    }

    #[test]
    fn test_phone_number_page_last_page() {
        let json = r#"{"incoming_phone_numbers": [], "next_page_uri": null}"#;

        let page: PhoneNumberPage = serde_json::from_str(json).unwrap();
        let (items, next) = page.into_parts();
        assert!(items.is_empty());
        assert!(next.is_none());
    }
}
