// Cloud API HTTP client.

use secrecy::SecretString;

use crate::cloud::models::{CloudDevice, User};
use crate::error::Error;
use crate::transport::{Auth, TlsMode, Transport, TransportConfig, normalize_base_url};

/// Production cloud endpoint.
pub const DEFAULT_CLOUD_URL: &str = "https://cloud.glowgrid.io/";

/// Async client for the vendor cloud.
pub struct CloudClient {
    transport: Transport,
}

impl CloudClient {
    /// Connect to the production cloud with a personal access token.
    ///
    /// Unlike the device, the cloud presents a publicly trusted
    /// certificate, so the system trust store is used.
    pub fn new(token: impl Into<String>) -> Result<Self, Error> {
        let config = TransportConfig {
            tls: TlsMode::System,
            ..TransportConfig::default()
        };
        Self::with_base_url(DEFAULT_CLOUD_URL, token, &config)
    }

    /// Connect to an explicit endpoint with explicit transport settings.
    pub fn with_base_url(
        base_url: &str,
        token: impl Into<String>,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;
        let auth = Auth::Bearer {
            token: SecretString::from(token.into()),
        };
        Ok(Self {
            transport: Transport::new(base_url, auth, config)?,
        })
    }

    /// The account behind the token.
    pub async fn get_user(&self) -> Result<User, Error> {
        self.transport.get("api/v2/me").await
    }

    /// Every device registered to the account.
    pub async fn list_devices(&self) -> Result<Vec<CloudDevice>, Error> {
        self.transport.get("api/v2/users/me/devices").await
    }

    /// One registered device, including its local API key.
    pub async fn get_device(&self, device_id: i64) -> Result<CloudDevice, Error> {
        self.transport
            .get(&format!("api/v2/users/me/devices/{device_id}"))
            .await
    }

    /// Shut the client down: subsequent calls fail fast with
    /// [`Error::Closed`].
    pub fn close(&self) {
        self.transport.close();
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }
}
