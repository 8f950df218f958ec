// glowgrid-api: Async Rust client for Glowgrid smart displays (device + cloud)

pub mod cloud;
pub mod device;
pub mod error;
pub mod transport;

pub use cloud::CloudClient;
pub use device::DeviceClient;
pub use error::{DecodeKind, Error};
pub use transport::{RetryPolicy, TlsMode, TransportConfig};
