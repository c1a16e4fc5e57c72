// Dashboard API wire types
//
// Field names follow the service's camelCase JSON. Known attributes are
// typed; anything else rides along in an ordered `extra` map so nothing the
// service returns is lost when a record is displayed.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Port attributes the Dashboard accepts on
/// `PUT /devices/{serial}/switch/ports/{portId}`.
///
/// Anything else the service echoes back on a port (link negotiation
/// capabilities, schedule details, module info, ...) is read-only and must
/// not be sent.
pub const WRITABLE_PORT_ATTRIBUTES: &[&str] = &[
    "name",
    "tags",
    "enabled",
    "poeEnabled",
    "type",
    "vlan",
    "voiceVlan",
    "allowedVlans",
    "isolationEnabled",
    "rstpEnabled",
    "stpGuard",
    "linkNegotiation",
    "portScheduleId",
    "udld",
    "accessPolicyType",
    "accessPolicyNumber",
    "macAllowList",
    "stickyMacAllowList",
    "stickyMacAllowListLimit",
    "stormControlEnabled",
    "adaptivePolicyGroupId",
    "peerSgtCapable",
    "flexibleStackingEnabled",
    "daiTrusted",
    "profile",
];

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A device record from `GET /devices/{serial}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub serial: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lan_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firmware: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floor_plan_id: Option<String>,
    /// Every other attribute the service returned, in response order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Body of `PUT /devices/{serial}`. Unset attributes are left untouched
/// by the service, so `None` fields are never serialized.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeviceUpdate {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// One entry of `GET /devices/{serial}/switch/ports`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwitchPort {
    pub port_id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl SwitchPort {
    /// Look up a single attribute by its wire name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name).filter(|v| !v.is_null())
    }

    /// The subset of attributes that may be written back to a port,
    /// with null values dropped.
    pub fn writable_attributes(&self) -> Map<String, Value> {
        self.attributes
            .iter()
            .filter(|(k, v)| !v.is_null() && WRITABLE_PORT_ATTRIBUTES.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}

/// An organization from `GET /organizations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Response of `POST /organizations/{orgId}/switch/devices/clone`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloneResult {
    #[serde(default)]
    pub source_serial: String,
    #[serde(default)]
    pub target_serials: Vec<String>,
}
