//! Named TV commands.
//!
//! Thin wrappers over [`Remote::request`] for common services. They hold no
//! state; anything missing here can be sent with `request` directly.

use serde_json::{Value, from_value, json};
use tracing::debug;

use crate::error::Result;
use crate::session::Reply;

use super::Remote;
use super::types::{InputDevice, LaunchPoint, Volume};

// ============================================================================
// Remote - Audio
// ============================================================================

impl Remote {
    /// Raises the volume one step.
    pub async fn volume_up(&self) -> Result<Reply> {
        self.request("audio/volumeUp", json!({})).await
    }

    /// Lowers the volume one step.
    pub async fn volume_down(&self) -> Result<Reply> {
        self.request("audio/volumeDown", json!({})).await
    }

    /// Reads the current volume.
    ///
    /// Returns `None` if the TV declines or the reply has no volume.
    pub async fn get_volume(&self) -> Result<Option<Volume>> {
        let reply = self.request("audio/getVolume", json!({})).await?;
        let volume = reply.into_success().as_ref().and_then(Volume::from_payload);

        debug!(?volume, "Got volume");
        Ok(volume)
    }

    /// Sets the volume level.
    pub async fn set_volume(&self, level: u32) -> Result<Reply> {
        self.request("audio/setVolume", json!({ "volume": level })).await
    }

    /// Mutes or unmutes audio.
    pub async fn set_mute(&self, mute: bool) -> Result<Reply> {
        self.request("audio/setMute", json!({ "mute": mute })).await
    }
}

// ============================================================================
// Remote - Text Input
// ============================================================================

impl Remote {
    /// Types text into the focused field.
    pub async fn insert_text(&self, text: &str) -> Result<Reply> {
        debug!(text_len = text.len(), "Inserting text");
        self.request(
            "com.webos.service.ime/insertText",
            json!({ "text": text, "replace": 0 }),
        )
        .await
    }

    /// Deletes characters before the cursor.
    pub async fn delete_characters(&self, count: u32) -> Result<Reply> {
        self.request(
            "com.webos.service.ime/deleteCharacters",
            json!({ "count": count }),
        )
        .await
    }

    /// Submits the focused field.
    pub async fn send_enter(&self) -> Result<Reply> {
        self.request("com.webos.service.ime/sendEnterKey", json!({})).await
    }
}

// ============================================================================
// Remote - System
// ============================================================================

impl Remote {
    /// Turns the TV off.
    ///
    /// The TV usually drops the connection right after.
    pub async fn power_off(&self) -> Result<Reply> {
        debug!("Powering off");
        self.request("system/turnOff", json!({})).await
    }

    /// Shows a notification on screen.
    pub async fn show_toast(&self, message: &str) -> Result<Reply> {
        self.request(
            "system.notifications/createToast",
            json!({ "message": message }),
        )
        .await
    }
}

// ============================================================================
// Remote - Inputs & Apps
// ============================================================================

impl Remote {
    /// Lists external inputs.
    ///
    /// Returns an empty list if the TV declines.
    pub async fn list_inputs(&self) -> Result<Vec<InputDevice>> {
        let reply = self.request("tv/getExternalInputList", json!({})).await?;
        let devices = list_field(reply, "devices")?;

        debug!(count = devices.len(), "Got inputs");
        Ok(devices)
    }

    /// Switches to an external input by id.
    pub async fn switch_input(&self, input_id: &str) -> Result<Reply> {
        debug!(%input_id, "Switching input");
        self.request("tv/switchInput", json!({ "inputId": input_id }))
            .await
    }

    /// Lists launcher entries.
    ///
    /// Returns an empty list if the TV declines.
    pub async fn list_apps(&self) -> Result<Vec<LaunchPoint>> {
        let reply = self
            .request("com.webos.applicationManager/listLaunchPoints", json!({}))
            .await?;
        let apps = list_field(reply, "launchPoints")?;

        debug!(count = apps.len(), "Got launch points");
        Ok(apps)
    }

    /// Launches an app by id.
    pub async fn launch_app(&self, app_id: &str) -> Result<Reply> {
        debug!(%app_id, "Launching app");
        self.request("system.launcher/launch", json!({ "id": app_id }))
            .await
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Deserializes the array under `field` of a successful reply.
fn list_field<T>(reply: Reply, field: &str) -> Result<Vec<T>>
where
    T: serde::de::DeserializeOwned,
{
    let Some(mut payload) = reply.into_success() else {
        return Ok(Vec::new());
    };

    match payload.get_mut(field).map(Value::take) {
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(items) => Ok(from_value(items)?),
    }
}
