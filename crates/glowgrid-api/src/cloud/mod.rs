// Cloud API client modules
//
// Client for the vendor cloud, which knows every device registered to an
// account and hands out their local API keys. Bearer-token auth, public
// TLS; shares the transport (and its retry policy) with the device
// client.

pub mod client;
pub mod models;

pub use client::{CloudClient, DEFAULT_CLOUD_URL};
