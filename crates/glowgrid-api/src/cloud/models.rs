//! Wire types for the cloud API.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

/// Registration state of a device in the cloud.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceState {
    New,
    Configured,
    Banned,
    /// Wire value this client version does not recognize.
    #[serde(untagged)]
    Unknown(String),
}

/// The account behind the token, from `GET /api/v2/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "id")]
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub apps_count: i64,
    pub private_apps_count: i64,
    pub private_device_count: i64,
}

/// A device registered to the account, including the API key needed to
/// talk to it locally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloudDevice {
    #[serde(rename = "id")]
    pub device_id: i64,
    pub name: String,
    pub serial_number: String,
    /// Local API key; pass it to
    /// [`DeviceClient`](crate::DeviceClient) as the Basic-auth password.
    pub api_key: String,
    #[serde(rename = "ipv4_internal")]
    pub ip: Ipv4Addr,
    pub mac: String,
    #[serde(rename = "wifi_ssid")]
    pub ssid: String,
    pub state: DeviceState,
    /// ISO 8601 date-time.
    pub created_at: String,
    /// ISO 8601 date-time.
    pub updated_at: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn cloud_device_decodes_wire_names() {
        let device: CloudDevice = serde_json::from_value(json!({
            "id": 7,
            "name": "Kitchen display",
            "serial_number": "SA110405124500W00BS9",
            "api_key": "0123456789abcdef",
            "ipv4_internal": "192.168.1.21",
            "mac": "AA:BB:CC:DD:EE:FF",
            "wifi_ssid": "attic",
            "state": "configured",
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-03-05T12:30:00Z",
        }))
        .expect("decode");

        assert_eq!(device.device_id, 7);
        assert_eq!(device.ip, Ipv4Addr::new(192, 168, 1, 21));
        assert_eq!(device.ssid, "attic");
        assert_eq!(device.state, DeviceState::Configured);
    }

    #[test]
    fn unknown_device_state_degrades_to_sentinel() {
        let state: DeviceState = serde_json::from_value(json!("quarantined")).expect("decode");
        assert_eq!(state, DeviceState::Unknown("quarantined".to_owned()));
    }
}
