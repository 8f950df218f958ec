// Device state endpoints: snapshot plus the audio/display/bluetooth/wifi
// get/set pairs.
//
// Setters PUT a partial body (only set fields) and unwrap the
// `{"success":{"data":…}}` ack. When the ack carries no state, or the
// update had nothing to send, the current state is fetched instead so
// every setter returns the device's present configuration.

use crate::device::DeviceClient;
use crate::device::models::{
    Audio, AudioUpdate, Bluetooth, BluetoothUpdate, Device, Display, DisplayUpdate, UpdateAck,
    Wifi, WifiUpdate,
};
use crate::error::Error;

impl DeviceClient {
    /// Fetch the full device state snapshot.
    pub async fn get_device(&self) -> Result<Device, Error> {
        self.transport().get("api/v2/device").await
    }

    /// Current audio state.
    pub async fn get_audio(&self) -> Result<Audio, Error> {
        self.transport().get("api/v2/device/audio").await
    }

    /// Apply an audio update and return the resulting state.
    ///
    /// A value outside the device's volume limit is rejected device-side
    /// with [`Error::BadRequest`].
    pub async fn set_audio(&self, update: &AudioUpdate) -> Result<Audio, Error> {
        if update.is_empty() {
            return self.get_audio().await;
        }
        let ack: Option<UpdateAck<Audio>> = self
            .transport()
            .put_optional("api/v2/device/audio", update)
            .await?;
        match unwrap_ack(ack) {
            Some(audio) => Ok(audio),
            None => self.get_audio().await,
        }
    }

    /// Current display state.
    pub async fn get_display(&self) -> Result<Display, Error> {
        self.transport().get("api/v2/device/display").await
    }

    /// Apply a display update (brightness and/or brightness mode) and
    /// return the resulting state.
    pub async fn set_display(&self, update: &DisplayUpdate) -> Result<Display, Error> {
        if update.is_empty() {
            return self.get_display().await;
        }
        let ack: Option<UpdateAck<Display>> = self
            .transport()
            .put_optional("api/v2/device/display", update)
            .await?;
        match unwrap_ack(ack) {
            Some(display) => Ok(display),
            None => self.get_display().await,
        }
    }

    /// Current Bluetooth state.
    pub async fn get_bluetooth(&self) -> Result<Bluetooth, Error> {
        self.transport().get("api/v2/device/bluetooth").await
    }

    /// Apply a Bluetooth update (radio on/off, advertised name) and
    /// return the resulting state.
    pub async fn set_bluetooth(&self, update: &BluetoothUpdate) -> Result<Bluetooth, Error> {
        if update.is_empty() {
            return self.get_bluetooth().await;
        }
        let ack: Option<UpdateAck<Bluetooth>> = self
            .transport()
            .put_optional("api/v2/device/bluetooth", update)
            .await?;
        match unwrap_ack(ack) {
            Some(bluetooth) => Ok(bluetooth),
            None => self.get_bluetooth().await,
        }
    }

    /// Current Wi-Fi state.
    pub async fn get_wifi(&self) -> Result<Wifi, Error> {
        self.transport().get("api/v2/device/wifi").await
    }

    /// Apply a Wi-Fi update and return the resulting state.
    pub async fn set_wifi(&self, update: &WifiUpdate) -> Result<Wifi, Error> {
        if update.is_empty() {
            return self.get_wifi().await;
        }
        let ack: Option<UpdateAck<Wifi>> = self
            .transport()
            .put_optional("api/v2/device/wifi", update)
            .await?;
        match unwrap_ack(ack) {
            Some(wifi) => Ok(wifi),
            None => self.get_wifi().await,
        }
    }
}

/// Pull the echoed state out of a setter ack, if the firmware sent one.
fn unwrap_ack<T>(ack: Option<UpdateAck<T>>) -> Option<T> {
    ack.and_then(|a| a.success).and_then(|s| s.data)
}
