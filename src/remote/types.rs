//! Typed request results.

use serde::Deserialize;
use serde_json::Value;

// ============================================================================
// Volume
// ============================================================================

/// Audio state returned by `audio/getVolume`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Volume {
    /// Volume level.
    pub level: u32,
    /// Whether audio is muted.
    pub muted: bool,
}

impl Volume {
    /// Reads the volume from a reply payload.
    ///
    /// Newer firmware nests the values under `volumeStatus` and reports
    /// mute as `muteStatus`; both layouts are accepted.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let status = payload.get("volumeStatus").unwrap_or(payload);
        let level = status.get("volume").and_then(Value::as_u64)?;
        let muted = status
            .get("muted")
            .or_else(|| status.get("muteStatus"))
            .and_then(Value::as_bool)
            .unwrap_or(false);

        Some(Self {
            level: u32::try_from(level).ok()?,
            muted,
        })
    }
}

// ============================================================================
// InputDevice
// ============================================================================

/// External input from `tv/getExternalInputList`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDevice {
    /// Input id, e.g. `HDMI_1`.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub label: String,
    /// Whether a device is plugged in.
    #[serde(default)]
    pub connected: bool,
    /// App that shows the input.
    #[serde(default)]
    pub app_id: Option<String>,
    /// Icon URL.
    #[serde(default)]
    pub icon: Option<String>,
}

// ============================================================================
// LaunchPoint
// ============================================================================

/// Launcher entry from `com.webos.applicationManager/listLaunchPoints`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchPoint {
    /// App id passed to [`Remote::launch_app`](crate::Remote::launch_app).
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub title: String,
    /// Launch point id.
    #[serde(default)]
    pub launch_point_id: Option<String>,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_flat_volume() {
        let payload = json!({"returnValue": true, "scenario": "mastervolume_tv_speaker", "volume": 9, "muted": false});
        assert_eq!(
            Volume::from_payload(&payload),
            Some(Volume {
                level: 9,
                muted: false
            })
        );
    }

    #[test]
    fn test_nested_volume() {
        let payload = json!({"returnValue": true, "volumeStatus": {"volume": 12, "muteStatus": true}});
        assert_eq!(
            Volume::from_payload(&payload),
            Some(Volume {
                level: 12,
                muted: true
            })
        );
    }

    #[test]
    fn test_volume_missing() {
        assert_eq!(Volume::from_payload(&json!({"returnValue": true})), None);
    }

    #[test]
    fn test_input_device() {
        let device: InputDevice = serde_json::from_value(json!({
            "id": "HDMI_1",
            "label": "HDMI1",
            "port": 1,
            "connected": true,
            "appId": "com.webos.app.hdmi1",
            "icon": "http://tv/hdmi.png"
        }))
        .expect("device");

        assert_eq!(device.id, "HDMI_1");
        assert_eq!(device.app_id.as_deref(), Some("com.webos.app.hdmi1"));
        assert!(device.connected);
    }

    #[test]
    fn test_launch_point_defaults() {
        let point: LaunchPoint = serde_json::from_value(json!({"id": "netflix"})).expect("point");
        assert_eq!(point.id, "netflix");
        assert_eq!(point.title, "");
        assert_eq!(point.launch_point_id, None);
    }
}
