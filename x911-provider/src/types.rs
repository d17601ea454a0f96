use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

// ============ Actions ============

/// Remote operation identifiers of the 911 API family.
///
/// Serialized as the wire id (e.g. `"get_locations"`, `"validate911"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
    #[serde(rename = "add911_alert")]
    Add911Alert,
    #[serde(rename = "add_location")]
    AddLocation,
    #[serde(rename = "audit911")]
    Audit911,
    #[serde(rename = "get_locations")]
    GetLocations,
    #[serde(rename = "get_provisioning_history")]
    GetProvisioningHistory,
    #[serde(rename = "insert911")]
    Insert911,
    #[serde(rename = "provision_location")]
    ProvisionLocation,
    #[serde(rename = "query911")]
    Query911,
    #[serde(rename = "query911_alert")]
    Query911Alert,
    #[serde(rename = "remove911")]
    Remove911,
    #[serde(rename = "remove911_alert")]
    Remove911Alert,
    #[serde(rename = "remove_location")]
    RemoveLocation,
    #[serde(rename = "update911")]
    Update911,
    #[serde(rename = "validate911")]
    Validate911,
}

/// Wire keys of the seven address/caller fields, in request order.
pub(crate) const ADDRESS_PARAMS: [&str; 7] = [
    "address1",
    "address2",
    "city",
    "state",
    "zip",
    "plus_four",
    "caller_name",
];

const DID_AND_ADDRESS_PARAMS: [&str; 8] = [
    "did",
    "address1",
    "address2",
    "city",
    "state",
    "zip",
    "plus_four",
    "caller_name",
];

impl Action {
    /// Every action the 911 API family declares.
    pub const ALL: [Self; 14] = [
        Self::Add911Alert,
        Self::AddLocation,
        Self::Audit911,
        Self::GetLocations,
        Self::GetProvisioningHistory,
        Self::Insert911,
        Self::ProvisionLocation,
        Self::Query911,
        Self::Query911Alert,
        Self::Remove911,
        Self::Remove911Alert,
        Self::RemoveLocation,
        Self::Update911,
        Self::Validate911,
    ];

    /// Wire id sent to the account executor.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add911Alert => "add911_alert",
            Self::AddLocation => "add_location",
            Self::Audit911 => "audit911",
            Self::GetLocations => "get_locations",
            Self::GetProvisioningHistory => "get_provisioning_history",
            Self::Insert911 => "insert911",
            Self::ProvisionLocation => "provision_location",
            Self::Query911 => "query911",
            Self::Query911Alert => "query911_alert",
            Self::Remove911 => "remove911",
            Self::Remove911Alert => "remove911_alert",
            Self::RemoveLocation => "remove_location",
            Self::Update911 => "update911",
            Self::Validate911 => "validate911",
        }
    }

    /// Exact argument key set the action requires; no optional keys exist.
    pub fn required_params(self) -> &'static [&'static str] {
        match self {
            Self::Audit911 => &[],
            Self::GetLocations
            | Self::Query911
            | Self::GetProvisioningHistory
            | Self::Remove911 => &["did"],
            Self::Query911Alert => &["tn"],
            Self::Add911Alert | Self::Remove911Alert => &["tn", "email"],
            Self::ProvisionLocation => &["did", "location_id"],
            Self::RemoveLocation => &["location_id", "did"],
            Self::Validate911 => &ADDRESS_PARAMS,
            Self::AddLocation | Self::Update911 | Self::Insert911 => &DID_AND_ADDRESS_PARAMS,
        }
    }

    /// Whether this client can send the action at all.
    ///
    /// `remove911_alert` is declared by the remote API but deliberately left out.
    pub fn is_implemented(self) -> bool {
        !matches!(self, Self::Remove911Alert)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("unknown 911 action: {s}"))
    }
}

// ============ Environment ============

/// Back-office environment the account executor talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Test environment. Offers none of the 911 actions.
    Sandbox,
    /// Live environment.
    #[default]
    Production,
}

impl Environment {
    /// Action ids the environment declares for the 911 family.
    pub fn supported_actions(self) -> &'static [Action] {
        match self {
            Self::Sandbox => &[],
            Self::Production => &Action::ALL,
        }
    }

    /// Whether `action` may be sent in this environment.
    pub fn supports(self, action: Action) -> bool {
        self.supported_actions().contains(&action)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sandbox" => Ok(Self::Sandbox),
            "production" => Ok(Self::Production),
            other => Err(format!("unknown environment: {other}")),
        }
    }
}

/// Response parser the executor should apply to the raw SOAP result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponseKind {
    /// The 911 result shape (`dids_911`, `vi_locations`, `statuses`, response code).
    X911,
}

impl ResponseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X911 => "X911Response",
        }
    }
}

// ============ Request Types ============

/// Argument mapping sent to the executor: parameter name → text value.
pub type Arguments = BTreeMap<String, String>;

/// Raw, executor-produced response payload.
pub type ResponsePayload = serde_json::Map<String, serde_json::Value>;

/// Street address and caller name registered for emergency dispatch.
///
/// Shared by `validate911`, `add_location`, `update911` and `insert911`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address911 {
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub plus_four: String,
    pub caller_name: String,
}

impl Address911 {
    /// Field values paired with their wire keys, in request order.
    pub(crate) fn fields(&self) -> [(&'static str, &str); 7] {
        [
            (ADDRESS_PARAMS[0], &self.address1),
            (ADDRESS_PARAMS[1], &self.address2),
            (ADDRESS_PARAMS[2], &self.city),
            (ADDRESS_PARAMS[3], &self.state),
            (ADDRESS_PARAMS[4], &self.zip),
            (ADDRESS_PARAMS[5], &self.plus_four),
            (ADDRESS_PARAMS[6], &self.caller_name),
        ]
    }
}

// ============ Response Types ============

/// Ordered list wrapper the executor produces for repeated result elements.
///
/// Decodes from either `{"collection": [...]}` or a bare array. An empty
/// string, which SOAP encoders emit for an empty element, decodes as an
/// empty collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Collection<T> {
    collection: Vec<T>,
}

impl<T> Collection<T> {
    pub fn new(collection: Vec<T>) -> Self {
        Self { collection }
    }

    /// Records in the order the remote API returned them.
    pub fn collection(&self) -> &[T] {
        &self.collection
    }

    pub fn into_inner(self) -> Vec<T> {
        self.collection
    }

    pub fn len(&self) -> usize {
        self.collection.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collection.is_empty()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Collection<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Bare(Vec<T>),
            Wrapped {
                #[serde(default = "Vec::new")]
                collection: Vec<T>,
            },
            Blank(String),
        }

        match Repr::<T>::deserialize(deserializer)? {
            Repr::Bare(collection) | Repr::Wrapped { collection } => Ok(Self { collection }),
            Repr::Blank(s) if s.trim().is_empty() => Ok(Self::new(Vec::new())),
            Repr::Blank(s) => Err(Error::custom(format!("expected a collection, got '{s}'"))),
        }
    }
}

/// 911 registration attached to a DID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Did911 {
    #[serde(deserialize_with = "deserialize_text")]
    pub did: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub caller_name: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub address1: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub address2: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub city: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub state: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub zip: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub plus_four: String,
    #[serde(deserialize_with = "deserialize_opt_text", skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    #[serde(deserialize_with = "deserialize_opt_text", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Geocoding state of a location held by the upstream 911 provider.
///
/// Serialized as the upstream upper-case label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationStatus {
    Geocoded,
    Provisioned,
    Invalid,
    /// Any state this crate does not name, kept verbatim.
    Other(String),
}

impl Default for LocationStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl LocationStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Geocoded => "GEOCODED",
            Self::Provisioned => "PROVISIONED",
            Self::Invalid => "INVALID",
            Self::Other(raw) => raw,
        }
    }
}

impl From<&str> for LocationStatus {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "GEOCODED" => Self::Geocoded,
            "PROVISIONED" => Self::Provisioned,
            "INVALID" => Self::Invalid,
            _ => Self::Other(s.to_string()),
        }
    }
}

impl Serialize for LocationStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for LocationStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(deserialize_opt_text(deserializer)?
            .map_or_else(Self::default, |raw| Self::from(raw.as_str())))
    }
}

/// Address record held by the upstream 911 provider for a DID.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViLocation {
    #[serde(deserialize_with = "deserialize_text")]
    pub location_id: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub address1: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub address2: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub city: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub state: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub zip: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub plus_four: String,
    #[serde(deserialize_with = "deserialize_text")]
    pub caller_name: String,
    pub status: LocationStatus,
    #[serde(with = "crate::utils::datetime", skip_serializing_if = "Option::is_none")]
    pub activated_at: Option<DateTime<Utc>>,
    #[serde(with = "crate::utils::datetime", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl ViLocation {
    /// Only geocoded locations can be provisioned upstream.
    pub fn is_provisionable(&self) -> bool {
        self.status == LocationStatus::Geocoded
    }

    /// Invalid locations are rejected by `remove_location` upstream.
    pub fn is_removable(&self) -> bool {
        self.status != LocationStatus::Invalid
    }
}

/// One entry of a DID's 911 status or provisioning history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Status911 {
    #[serde(deserialize_with = "deserialize_opt_text", skip_serializing_if = "Option::is_none")]
    pub did: Option<String>,
    #[serde(deserialize_with = "deserialize_code", skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_text", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(with = "crate::utils::datetime", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Typed 911 response, decoded once from the executor's payload.
///
/// Every field is optional; absent keys stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct X911Response {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dids_911: Option<Collection<Did911>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vi_locations: Option<Collection<ViLocation>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<Collection<Status911>>,
    #[serde(deserialize_with = "deserialize_code", skip_serializing_if = "Option::is_none")]
    pub response_code: Option<i64>,
    #[serde(deserialize_with = "deserialize_opt_text", skip_serializing_if = "Option::is_none")]
    pub response_message: Option<String>,
}

impl X911Response {
    /// Decode a raw payload. Unknown keys are ignored.
    pub fn from_payload(payload: &ResponsePayload) -> serde_json::Result<Self> {
        Self::deserialize(payload)
    }
}

/// Outcome of a `validate911` call, keyed by the response code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    /// Code 100.
    Registered,
    /// Code 101.
    NotRegistered,
}

impl ValidationStatus {
    /// Map a response code; codes other than 100/101 have no defined meaning.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            100 => Some(Self::Registered),
            101 => Some(Self::NotRegistered),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Registered => 100,
            Self::NotRegistered => 101,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Registered => "The 911 address is valid and registered.",
            Self::NotRegistered => "The 911 address is not registered.",
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Registered
    }
}

/// Response codes arrive as numbers or numeric strings depending on the executor.
fn deserialize_code<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawCode {
        Int(i64),
        Text(String),
    }

    match Option::<RawCode>::deserialize(deserializer)? {
        Some(RawCode::Int(code)) => Ok(Some(code)),
        Some(RawCode::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(RawCode::Text(s)) => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| Error::custom(format!("Invalid response code '{s}': {e}"))),
        None => Ok(None),
    }
}

/// Text fields arrive as `null` or as bare numbers from some executors.
fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(deserialize_opt_text(deserializer)?.unwrap_or_default())
}

fn deserialize_opt_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Value>::deserialize(deserializer)? {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(serde_json::Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(Error::custom(format!("expected text, got {other}"))),
    }
}
