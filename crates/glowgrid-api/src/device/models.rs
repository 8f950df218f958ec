//! Wire types for the device API.
//!
//! Everything the device sends or accepts under `/api/v2/device`. Field
//! names match the wire JSON; where firmware revisions disagree on a key
//! (`essid` vs `ssid`, `strength` vs `rssi`), serde aliases accept every
//! observed spelling. Enums the firmware may grow over time carry a
//! trailing `Unknown(String)` catch-all so a single new wire value never
//! invalidates a whole state snapshot.

use std::collections::HashMap;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ── Shared pieces ────────────────────────────────────────────────────

/// Closed integer interval, e.g. the allowed volume span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    /// Whether `value` lies within the interval (inclusive).
    pub fn contains(&self, value: i64) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

// ── Device state ─────────────────────────────────────────────────────

/// Operating mode of the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceMode {
    Auto,
    Kiosk,
    Manual,
    Schedule,
    /// Wire value this client version does not recognize.
    #[serde(untagged)]
    Unknown(String),
}

/// How the display picks its brightness.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrightnessMode {
    Auto,
    Manual,
    #[serde(untagged)]
    Unknown(String),
}

/// Panel technology reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayType {
    Color,
    Grayscale,
    Mixed,
    Monochrome,
    #[serde(untagged)]
    Unknown(String),
}

/// How the device obtained its IP configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WifiMode {
    Dhcp,
    Static,
    #[serde(untagged)]
    Unknown(String),
}

/// Audio state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audio {
    pub volume: i64,
    #[serde(default)]
    pub volume_range: Option<Range>,
    #[serde(default)]
    pub volume_limit: Option<Range>,
    /// Absent on models without a speaker.
    #[serde(default)]
    pub available: Option<bool>,
}

/// Bluetooth state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct Bluetooth {
    pub active: bool,
    #[serde(alias = "mac")]
    pub address: String,
    pub available: bool,
    pub discoverable: bool,
    pub name: String,
    pub pairable: bool,
}

/// Screensaver sub-state of the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Screensaver {
    pub enabled: bool,
}

/// Display state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Display {
    pub brightness: i64,
    pub brightness_mode: BrightnessMode,
    #[serde(default)]
    pub brightness_range: Option<Range>,
    #[serde(default)]
    pub brightness_limit: Option<Range>,
    #[serde(default, rename = "type")]
    pub display_type: Option<DisplayType>,
    pub width: i64,
    pub height: i64,
    /// Tri-state: wire `null` means the panel state is unknown, not off.
    #[serde(default)]
    pub on: Option<bool>,
    #[serde(default)]
    pub screensaver: Option<Screensaver>,
}

/// Wi-Fi state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wifi {
    pub active: bool,
    pub available: bool,
    #[serde(default)]
    pub encryption: Option<String>,
    #[serde(alias = "ipv4")]
    pub ip: Ipv4Addr,
    #[serde(alias = "address")]
    pub mac: String,
    pub mode: WifiMode,
    #[serde(default)]
    pub netmask: Option<String>,
    /// Signal strength; absent when the device does not report it.
    #[serde(default, alias = "strength", alias = "signal_strength")]
    pub rssi: Option<i64>,
    #[serde(alias = "essid")]
    pub ssid: String,
}

/// A firmware update the device has staged but not installed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirmwareUpdate {
    pub version: String,
}

/// Full device state snapshot from `GET /api/v2/device`.
///
/// A fresh value per fetch; there is no identity or caching across
/// requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    #[serde(rename = "id")]
    pub device_id: String,
    pub name: String,
    pub serial_number: String,
    pub model: String,
    pub os_version: String,
    pub mode: DeviceMode,
    pub audio: Audio,
    pub bluetooth: Bluetooth,
    pub display: Display,
    pub wifi: Wifi,
    /// Present when a firmware update is pending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<FirmwareUpdate>,
}

// ── Notifications ────────────────────────────────────────────────────

/// Icon shown on a frame: either a numeric icon id from the vendor
/// gallery or a named icon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Icon {
    Id(i64),
    Name(String),
}

impl From<i64> for Icon {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for Icon {
    fn from(name: &str) -> Self {
        Self::Name(name.to_owned())
    }
}

/// Progress data for a goal frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalData {
    pub start: i64,
    pub current: i64,
    pub end: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Override for the progress bar color, e.g. `#00ff00`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Override for the bar background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
}

/// Icon plus scrolling text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    pub text: String,
}

/// Progress toward a goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(rename = "goalData", alias = "data")]
    pub data: GoalData,
}

/// Bar chart of y-values; x is the implicit index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartFrame {
    #[serde(rename = "chartData", alias = "data")]
    pub data: Vec<i64>,
}

/// Alarm page, e.g. the time the alarm will fire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<Icon>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Alarm time shown on the frame, e.g. `07:30`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Now-playing page fed by the Spotify app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotifyFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
}

/// One page of a notification. The device cycles through a
/// notification's frames in order.
///
/// Closed union discriminated by the wire field `type`; decoding a
/// discriminator this client does not know yields a decode error with
/// [`DecodeKind::UnknownVariant`](crate::DecodeKind::UnknownVariant)
/// rather than a panic, so callers can skip or propagate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Frame {
    Simple(SimpleFrame),
    Goal(GoalFrame),
    Chart(ChartFrame),
    Alarm(AlarmFrame),
    Spotify(SpotifyFrame),
}

/// Sound families the device knows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCategory {
    Notifications,
    Alarms,
    #[serde(untagged)]
    Unknown(String),
}

/// Built-in alarm tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlarmSound {
    Alarm1,
    Alarm2,
    Alarm3,
    Alarm4,
    Alarm5,
    Alarm6,
    Alarm7,
    Alarm8,
    Alarm9,
    Alarm10,
    Alarm11,
    Alarm12,
    Alarm13,
}

/// Built-in notification tones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSound {
    Bicycle,
    Car,
    Cash,
    Cat,
    Dog,
    Dog2,
    Energy,
    #[serde(rename = "knock-knock")]
    KnockKnock,
    LetterEmail,
    Lose1,
    Lose2,
    Negative1,
    Negative2,
    Negative3,
    Negative4,
    Negative5,
    Notification,
    Notification2,
    Notification3,
    Notification4,
    OpenDoor,
    Positive1,
    Positive2,
    Positive3,
    Positive4,
    Positive5,
    Positive6,
    Statistic,
    Thunder,
    Water1,
    Water2,
    Win,
    Win2,
    Wind,
    WindShort,
}

/// A tone id from either family.
///
/// The two inner sets stay closed so the family can be told apart; a
/// tone id newer than this client lands in `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SoundId {
    Alarm(AlarmSound),
    Notification(NotificationSound),
    Unknown(String),
}

/// Sound played when a notification is shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<SoundCategory>,
    pub id: SoundId,
    #[serde(default = "default_repeat")]
    pub repeat: i64,
}

impl Sound {
    /// Build a sound with the category inferred from the tone family.
    pub fn new(id: SoundId) -> Self {
        let category = match &id {
            SoundId::Alarm(_) => Some(SoundCategory::Alarms),
            SoundId::Notification(_) => Some(SoundCategory::Notifications),
            SoundId::Unknown(_) => None,
        };
        Self {
            category,
            id,
            repeat: 1,
        }
    }
}

fn default_repeat() -> i64 {
    1
}

fn default_cycles() -> i64 {
    1
}

/// Frames plus presentation settings for one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationModel {
    /// How many times the frame sequence is shown. Default 1.
    #[serde(default = "default_cycles")]
    pub cycles: i64,
    pub frames: Vec<Frame>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<Sound>,
}

impl NotificationModel {
    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            cycles: 1,
            frames,
            sound: None,
        }
    }
}

/// Urgency class of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPriority {
    Info,
    Warning,
    Critical,
    #[serde(untagged)]
    Unknown(String),
}

/// Indicator icon shown next to the notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationIconType {
    None,
    Info,
    Alert,
    #[serde(untagged)]
    Unknown(String),
}

/// Origin of a queued notification, as reported by the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Internal,
    External,
    #[serde(untagged)]
    Unknown(String),
}

/// A notification, both as a command payload and as an entry of the
/// device's queue.
///
/// Fields the device assigns (`notification_id`, `created`,
/// `expiration_date`) are never emitted when posting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    /// Server-assigned queue id.
    #[serde(default, rename = "id", skip_serializing)]
    pub notification_id: Option<i64>,
    /// Creation timestamp assigned by the device (ISO 8601).
    #[serde(default, skip_serializing)]
    pub created: Option<String>,
    /// Expiry timestamp assigned by the device (ISO 8601).
    #[serde(default, skip_serializing)]
    pub expiration_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_type: Option<NotificationIconType>,
    /// Display lifetime in milliseconds. The device default depends on
    /// the media type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifetime: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<NotificationPriority>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub notification_type: Option<NotificationType>,
    pub model: NotificationModel,
}

impl Notification {
    /// A notification with the given content and device defaults for
    /// everything else.
    pub fn new(model: NotificationModel) -> Self {
        Self {
            notification_id: None,
            created: None,
            expiration_date: None,
            icon_type: None,
            lifetime: None,
            priority: None,
            notification_type: None,
            model,
        }
    }
}

// ── Apps & widgets ───────────────────────────────────────────────────

/// One widget instance of an installed app.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Widget {
    pub package: String,
    pub index: i64,
    #[serde(default)]
    pub visible: Option<bool>,
    /// App-defined settings; shape is opaque to this client.
    #[serde(default)]
    pub settings: Option<HashMap<String, Value>>,
}

/// An app installed on the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct App {
    pub package: String,
    pub title: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub widgets: HashMap<String, Widget>,
    /// Declared actions with their parameter schemas, kept opaque.
    #[serde(default)]
    pub actions: HashMap<String, Value>,
}

/// An action invocation for `POST /api/v2/device/apps/{package}/actions`.
///
/// `params` values must be JSON primitives (string, number, bool, null);
/// the client rejects nested structures before sending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppAction {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<serde_json::Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activate: Option<bool>,
}

impl AppAction {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: None,
            activate: None,
        }
    }
}

// ── Partial-update payloads ──────────────────────────────────────────

/// Partial update for `PUT /api/v2/device/audio`. Only set fields are
/// sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AudioUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<i64>,
}

/// Partial update for `PUT /api/v2/device/display`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DisplayUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness_mode: Option<BrightnessMode>,
}

/// Partial update for `PUT /api/v2/device/bluetooth`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BluetoothUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Partial update for `PUT /api/v2/device/wifi`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WifiUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<WifiMode>,
}

impl AudioUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.volume.is_none()
    }
}

impl DisplayUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.brightness.is_none() && self.brightness_mode.is_none()
    }
}

impl BluetoothUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.active.is_none() && self.name.is_none()
    }
}

impl WifiUpdate {
    pub(crate) fn is_empty(&self) -> bool {
        self.mode.is_none()
    }
}

// ── Response envelopes ───────────────────────────────────────────────

/// `{"success": {"data": …}}` ack returned by the setter endpoints.
/// Firmware occasionally acks without echoing state, hence the nesting
/// of options.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub(crate) struct UpdateAck<T> {
    #[serde(default)]
    pub success: Option<AckData<T>>,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub(crate) struct AckData<T> {
    #[serde(default)]
    pub data: Option<T>,
}

/// `{"success": {"id": …}}` ack returned when posting a notification.
#[derive(Debug, Deserialize)]
pub(crate) struct NotifyAck {
    pub success: NotifyAckId,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NotifyAckId {
    pub id: i64,
}

// ── Tests ────────────────────────────────────────────────────────────
