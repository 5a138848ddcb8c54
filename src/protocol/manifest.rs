//! Pairing manifest and payload.
//!
//! The manifest declares the app identity and the permission set the client
//! asks for. It never changes; the only per-connection values are merged in
//! by [`PairingPayload`] when the `register` frame is built.

// ============================================================================
// Imports
// ============================================================================

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

// ============================================================================
// Manifest
// ============================================================================

/// Static capability descriptor sent once during pairing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Manifest format version.
    pub manifest_version: u32,
    /// Client app version.
    pub app_version: &'static str,
    /// Signed identity block.
    pub signed: SignedManifest,
    /// Permissions granted to the session.
    pub permissions: &'static [&'static str],
    /// Signatures over the signed block.
    pub signatures: &'static [Signature],
}

/// Signed portion of the manifest.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedManifest {
    /// Creation date, `YYYYMMDD`.
    pub created: &'static str,
    /// App identifier.
    pub app_id: &'static str,
    /// Vendor identifier.
    pub vendor_id: &'static str,
    /// App name for the default locale.
    pub localized_app_names: LocalizedName,
    /// Vendor name for the default locale.
    pub localized_vendor_names: LocalizedName,
    /// Signed permissions.
    pub permissions: &'static [&'static str],
    /// Manifest serial.
    pub serial: &'static str,
}

/// Manifest signature entry.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Signature {
    /// Signature format version.
    pub signature_version: u32,
    /// Signature blob.
    pub signature: &'static str,
}

/// A name keyed by the default (empty) locale: `{"": "name"}`.
#[derive(Debug)]
pub struct LocalizedName(pub &'static str);

impl Serialize for LocalizedName {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("", self.0)?;
        map.end()
    }
}

/// The manifest this client pairs with.
pub static MANIFEST: Manifest = Manifest {
    manifest_version: 1,
    app_version: "1.1",
    signed: SignedManifest {
        created: "20140509",
        app_id: "com.lge.test",
        vendor_id: "com.lge",
        localized_app_names: LocalizedName("LG Remote App"),
        localized_vendor_names: LocalizedName("LG Electronics"),
        permissions: &[
            "TEST_SECURE",
            "CONTROL_INPUT_TEXT",
            "CONTROL_MOUSE_and_KEYBOARD",
            "READ_INSTALLED_APPS",
            "READ_LGE_SDX",
            "READ_NOTIFICATIONS",
            "SEARCH",
            "WRITE_SETTINGS",
            "WRITE_NOTIFICATION_ALERT",
            "CONTROL_POWER",
            "READ_CURRENT_CHANNEL",
            "READ_RUNNING_APPS",
            "READ_UPDATE_INFO",
            "UPDATE_FROM_REMOTE_APP",
            "READ_LGE_TV_INPUT_EVENTS",
            "READ_TV_CURRENT_TIME",
        ],
        serial: "2f930e2d2cfe083771f68e4fe7bb07",
    },
    permissions: &[
        "LAUNCH",
        "LAUNCH_WEBAPP",
        "APP_TO_APP",
        "CLOSE",
        "TEST_OPEN",
        "TEST_PROTECTED",
        "CONTROL_AUDIO",
        "CONTROL_DISPLAY",
        "CONTROL_INPUT_JOYSTICK",
        "CONTROL_INPUT_MEDIA_RECORDING",
        "CONTROL_INPUT_MEDIA_PLAYBACK",
        "CONTROL_INPUT_TV",
        "CONTROL_POWER",
        "READ_APP_STATUS",
        "READ_CURRENT_CHANNEL",
        "READ_INPUT_DEVICE_LIST",
        "READ_NETWORK_STATE",
        "READ_RUNNING_APPS",
        "READ_TV_CHANNEL_LIST",
        "WRITE_NOTIFICATION_TOAST",
        "READ_POWER_STATE",
        "READ_COUNTRY_INFO",
    ],
    signatures: &[Signature {
        signature_version: 1,
        signature: "eyJhbGdvcml0aG0iOiJSU0EtU0hBMjU2Iiwia2V5SWQiOiJ0ZXN0LXNpZ25pbmctY2VydCIsInNpZ25hdHVyZVZlcnNpb24iOjF9.hrVRgjCwXVvE2OOSpDZ58hR+59aFNwYDyjQgKk3auukd7pcegmE2CzPCa0bJ0ZsRAcKkCTJrWo5iDzNhMBWRyaMOv5zWSrthlf7G128qvIlpMT0YNY+n/FaOHE73uLrS/g7swl3/qH/BGFG2Hu4RlL48eb3lLKqTt2xKHdCs6Cd4RMfJPYnzgvI4BNrFUKsjkcu+WD4OO2A27Pq1n50cMchmcaXadJhGrOqH5YmHdOCj5NSHzJYrsW0HPlpuAx/ECMeIZYDh6RMqaFM2DXzdKX9NmmyqzJ3o/0lkk/N97gfVRLW5hA29yeAwaCViZNCP8iC9aO0q9fQojoa7NQnAtw==",
    }],
};

// ============================================================================
// Pairing Type
// ============================================================================

/// Confirmation method: an on-screen accept/decline prompt.
///
/// `PIN` pairing would need the client to answer with `pairing/setPin`,
/// which this client does not do.
pub const PAIRING_TYPE: &str = "PROMPT";

// ============================================================================
// PairingPayload
// ============================================================================

/// Payload of the `register` frame.
///
/// Borrows the static [`MANIFEST`] and merges in the client key.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PairingPayload<'a> {
    /// Ask for a new prompt even when the key is known.
    pub force_pairing: bool,
    /// Confirmation method, always [`PAIRING_TYPE`].
    pub pairing_type: &'static str,
    /// Stored client key, empty when pairing for the first time.
    #[serde(rename = "client-key")]
    pub client_key: &'a str,
    /// Capability descriptor.
    pub manifest: &'static Manifest,
}

impl<'a> PairingPayload<'a> {
    /// Creates a prompt-style payload for the given key.
    #[inline]
    #[must_use]
    pub fn new(client_key: Option<&'a str>) -> Self {
        Self {
            force_pairing: false,
            pairing_type: PAIRING_TYPE,
            client_key: client_key.unwrap_or_default(),
            manifest: &MANIFEST,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_payload_without_key() {
        let value = serde_json::to_value(PairingPayload::new(None)).expect("serialize");

        assert_eq!(value["client-key"], json!(""));
        assert_eq!(value["forcePairing"], json!(false));
        assert_eq!(value["pairingType"], json!("PROMPT"));
    }

    #[test]
    fn test_payload_with_key() {
        let value = serde_json::to_value(PairingPayload::new(Some("abc123"))).expect("serialize");
        assert_eq!(value["client-key"], json!("abc123"));
    }

    #[test]
    fn test_manifest_shape() {
        let value = serde_json::to_value(&MANIFEST).expect("serialize");

        assert_eq!(value["manifestVersion"], json!(1));
        assert_eq!(value["signed"]["appId"], json!("com.lge.test"));
        assert_eq!(value["signed"]["localizedAppNames"], json!({"": "LG Remote App"}));
        assert_eq!(value["signatures"][0]["signatureVersion"], json!(1));

        let permissions = value["permissions"].as_array().expect("array");
        assert!(permissions.contains(&json!("CONTROL_AUDIO")));
        assert!(permissions.contains(&json!("CONTROL_POWER")));
    }
}
