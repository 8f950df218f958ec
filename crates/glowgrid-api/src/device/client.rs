// Device API HTTP client: construction and lifecycle.

use secrecy::SecretString;

use crate::error::Error;
use crate::transport::{Auth, Transport, TransportConfig, normalize_base_url};

/// Default port of the device's plain-HTTP listener.
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Default port of the device's TLS listener. The certificate is
/// self-signed, so this listener is normally paired with
/// [`TlsMode::DangerAcceptInvalid`](crate::TlsMode::DangerAcceptInvalid).
pub const DEFAULT_HTTPS_PORT: u16 = 4343;

/// Fixed username for HTTP Basic auth; the password is the per-device
/// API key.
const BASIC_AUTH_USER: &str = "dev";

/// Async client for one Glowgrid device on the local network.
///
/// Thin verbs over the shared transport: every method issues one or more
/// HTTP calls and returns the decoded result; retry policy, timeouts,
/// and error classification all live in the transport. The client holds
/// no state besides the connection pool, so it is safe to share across
/// tasks and issue calls concurrently.
pub struct DeviceClient {
    transport: Transport,
}

impl DeviceClient {
    /// Connect to a device by host or IP using defaults: plain HTTP on
    /// port [`DEFAULT_HTTP_PORT`], default timeout and retry policy.
    pub fn from_host(host: &str, api_key: impl Into<String>) -> Result<Self, Error> {
        Self::new(
            &format!("http://{host}:{DEFAULT_HTTP_PORT}/"),
            api_key,
            &TransportConfig::default(),
        )
    }

    /// Connect to an explicit base URL (scheme, host, port), e.g.
    /// `https://192.168.1.21:4343` for the TLS listener.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        config: &TransportConfig,
    ) -> Result<Self, Error> {
        let base_url = normalize_base_url(base_url)?;
        let auth = Auth::Basic {
            username: BASIC_AUTH_USER,
            key: SecretString::from(api_key.into()),
        };
        Ok(Self {
            transport: Transport::new(base_url, auth, config)?,
        })
    }

    /// Shut the client down: subsequent calls fail fast with
    /// [`Error::Closed`]. Pooled connections are released when the
    /// client is dropped.
    pub fn close(&self) {
        self.transport.close();
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_closed()
    }

    pub(crate) fn transport(&self) -> &Transport {
        &self.transport
    }
}
