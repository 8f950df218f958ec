// Device API client modules
//
// Hand-written client for a Glowgrid device's local HTTP API under
// `/api/v2/device`. Endpoint groups (state, notifications, apps) are
// implemented as inherent methods in sibling files so `client.rs` stays
// focused on construction and lifecycle.

pub mod apps;
pub mod client;
pub mod models;
pub mod notifications;
pub mod state;

pub use client::{DEFAULT_HTTP_PORT, DEFAULT_HTTPS_PORT, DeviceClient};
