//! Twilio API types.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Country used for regulatory bundle lookups when none is given.
pub const DEFAULT_ISO_COUNTRY: &str = "FR";

/// Which incoming-number listing a number was returned by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NumberType {
    Local,
    Mobile,
}

impl NumberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NumberType::Local => "local",
            NumberType::Mobile => "mobile",
        }
    }

    /// Path segment of the incoming-number listing for this type.
    pub(crate) fn listing_segment(&self) -> &'static str {
        match self {
            NumberType::Local => "Local",
            NumberType::Mobile => "Mobile",
        }
    }
}

impl fmt::Display for NumberType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number type a regulatory bundle is issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Local,
    National,
    Mobile,
    TollFree,
}

impl BundleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            BundleType::Local => "local",
            BundleType::National => "national",
            BundleType::Mobile => "mobile",
            BundleType::TollFree => "toll-free",
        }
    }
}

impl fmt::Display for BundleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<NumberType> for BundleType {
    fn from(number_type: NumberType) -> Self {
        match number_type {
            NumberType::Local => BundleType::Local,
            NumberType::Mobile => BundleType::Mobile,
        }
    }
}

impl std::str::FromStr for BundleType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(BundleType::Local),
            "national" => Ok(BundleType::National),
            "mobile" => Ok(BundleType::Mobile),
            "toll-free" => Ok(BundleType::TollFree),
            other => Err(format!("Unknown bundle number type: {}", other)),
        }
    }
}

/// Account or subaccount.
///
/// The auth token is kept as a secret and never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub sid: String,

    #[serde(default)]
    pub friendly_name: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    /// Parent account SID (equal to `sid` for a root account)
    #[serde(default)]
    pub owner_account_sid: Option<String>,

    #[serde(default, skip_serializing)]
    pub auth_token: Option<SecretString>,
}

/// Incoming phone number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhoneNumber {
    pub sid: String,

    pub account_sid: String,

    pub phone_number: String,

    #[serde(default)]
    pub friendly_name: Option<String>,

    #[serde(default)]
    pub address_sid: Option<String>,

    #[serde(default)]
    pub bundle_sid: Option<String>,

    /// Set from the listing that returned the record, never from the payload
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub number_type: Option<NumberType>,
}

impl PhoneNumber {
    pub(crate) fn tagged(mut self, number_type: NumberType) -> Self {
        self.number_type = Some(number_type);
        self
    }
}

/// Regulatory compliance bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryBundle {
    /// Bundle SID (`bundle_sid` in clone responses)
    #[serde(alias = "bundle_sid")]
    pub sid: String,

    pub account_sid: String,

    #[serde(default)]
    pub friendly_name: Option<String>,

    #[serde(default)]
    pub status: Option<String>,

    /// Type the bundle was requested as; the payload's own value is ignored
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub number_type: Option<BundleType>,
}

impl RegulatoryBundle {
    pub(crate) fn tagged(mut self, number_type: BundleType) -> Self {
        self.number_type = Some(number_type);
        self
    }
}

/// Postal address record.
///
/// The provider sends `null` for postal fields it has no value for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub sid: String,

    pub account_sid: String,

    #[serde(default)]
    pub customer_name: Option<String>,

    #[serde(default)]
    pub friendly_name: Option<String>,

    #[serde(default)]
    pub street: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub region: Option<String>,

    #[serde(default)]
    pub postal_code: Option<String>,

    #[serde(default)]
    pub iso_country: Option<String>,
}

/// Postal fields used when an address has to be created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddressProfile {
    pub customer_name: String,
    pub friendly_name: String,
    pub street: String,
    pub city: String,
    pub region: String,
    pub postal_code: String,
    pub iso_country: String,
}

impl Default for AddressProfile {
    fn default() -> Self {
        Self {
            customer_name: "PrestigeWebb".into(),
            friendly_name: "PrestigeWebb".into(),
            street: "22 rue du pont aux choux".into(),
            city: "Paris".into(),
            region: "Paris".into(),
            postal_code: "75003".into(),
            iso_country: DEFAULT_ISO_COUNTRY.into(),
        }
    }
}

impl AddressProfile {
    pub(crate) fn form(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("CustomerName", self.customer_name.as_str()),
            ("FriendlyName", self.friendly_name.as_str()),
            ("Street", self.street.as_str()),
            ("City", self.city.as_str()),
            ("Region", self.region.as_str()),
            ("PostalCode", self.postal_code.as_str()),
            ("IsoCountry", self.iso_country.as_str()),
        ]
    }
}

/// Ownership update for an incoming phone number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberUpdate {
    /// New owning account
    pub account_sid: String,
    pub address_sid: Option<String>,
    pub bundle_sid: Option<String>,
}

impl NumberUpdate {
    pub(crate) fn form(&self) -> Vec<(&'static str, &str)> {
        let mut form = vec![("AccountSid", self.account_sid.as_str())];
        if let Some(address_sid) = &self.address_sid {
            form.push(("AddressSid", address_sid.as_str()));
        }
        if let Some(bundle_sid) = &self.bundle_sid {
            form.push(("BundleSid", bundle_sid.as_str()));
        }
        form
    }
}

/// Error body returned by the API on failure.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: Option<u32>,
    pub message: Option<String>,
}
