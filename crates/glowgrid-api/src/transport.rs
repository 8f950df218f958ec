// Shared transport layer for the device and cloud clients.
//
// Owns the reqwest::Client construction (TLS, timeout), request building
// (URL join, auth, JSON bodies), the bounded retry loop with exponential
// backoff, and status classification into the crate error taxonomy. Both
// clients go through this module so retry policy lives in exactly one place.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::{Method, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;

/// TLS verification mode.
#[derive(Debug, Clone)]
pub enum TlsMode {
    /// Use the system certificate store.
    System,
    /// Use a custom CA certificate from the given PEM file.
    CustomCa(PathBuf),
    /// Accept any certificate (devices ship self-signed certs).
    DangerAcceptInvalid,
}

/// Retry behavior for transient failures.
///
/// Connection errors, timeouts, and the statuses in
/// [`retry_statuses`](Self::retry_statuses) are retried with exponential
/// backoff until [`max_attempts`](Self::max_attempts) is reached; the last
/// failure is then surfaced as [`Error::Connection`]. Everything else is
/// fatal on the first occurrence.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first. Default: 3.
    pub max_attempts: u32,

    /// Delay before the first retry. Default: 250ms.
    pub initial_delay: Duration,

    /// Upper bound on backoff delay. Default: 10s.
    pub max_delay: Duration,

    /// Status codes treated as transient. Default: 500, 502, 503, 504.
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(10),
            retry_statuses: vec![500, 502, 503, 504],
        }
    }
}

impl RetryPolicy {
    /// Whether `status` should be retried rather than surfaced.
    pub fn retries_status(&self, status: u16) -> bool {
        self.retry_statuses.contains(&status)
    }

    /// Backoff delay after the given failed attempt (1-based).
    ///
    /// `delay = min(initial * 2^(attempt-1), max) * jitter`
    ///
    /// Jitter is +-20%, seeded deterministically from the attempt number.
    /// Below the cap each delay is strictly longer than the previous one
    /// (doubling outruns the jitter band).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let base = self.initial_delay.as_secs_f64() * f64::from(2_u32.saturating_pow(exponent));
        let capped = base.min(self.max_delay.as_secs_f64());

        let jitter = 1.0 + 0.2 * ((f64::from(attempt) * 5.7).sin());
        Duration::from_secs_f64((capped * jitter).max(0.0))
    }
}

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub tls: TlsMode,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            tls: TlsMode::DangerAcceptInvalid,
            timeout: Duration::from_secs(8),
            retry: RetryPolicy::default(),
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("glowgrid-api/", env!("CARGO_PKG_VERSION")));

        match &self.tls {
            TlsMode::System => {}
            TlsMode::CustomCa(path) => {
                let cert_pem = std::fs::read(path)
                    .map_err(|e| Error::Tls(format!("failed to read CA cert: {e}")))?;
                let cert = reqwest::Certificate::from_pem(&cert_pem)
                    .map_err(|e| Error::Tls(format!("invalid CA cert: {e}")))?;
                builder = builder.add_root_certificate(cert);
            }
            TlsMode::DangerAcceptInvalid => {
                builder = builder.danger_accept_invalid_certs(true);
            }
        }

        builder
            .build()
            .map_err(|e| Error::Tls(format!("failed to build HTTP client: {e}")))
    }
}

// ── Authentication ───────────────────────────────────────────────────

/// Credentials attached to every request.
pub(crate) enum Auth {
    /// HTTP Basic with a fixed username and the per-device API key.
    Basic {
        username: &'static str,
        key: SecretString,
    },
    /// Bearer token (cloud API).
    Bearer { token: SecretString },
}

// ── Transport ────────────────────────────────────────────────────────

/// One HTTP session against a single base URL.
///
/// The connection pool inside `reqwest::Client` is opened lazily on first
/// use and shared by concurrent in-flight calls. [`close`](Self::close)
/// makes subsequent calls fail fast with [`Error::Closed`]; the pooled
/// connections themselves are released when the owning client is dropped.
pub(crate) struct Transport {
    http: reqwest::Client,
    base_url: Url,
    auth: Auth,
    retry: RetryPolicy,
    closed: AtomicBool,
}

impl Transport {
    pub(crate) fn new(base_url: Url, auth: Auth, config: &TransportConfig) -> Result<Self, Error> {
        let http = config.build_client()?;
        Ok(Self {
            http,
            base_url,
            auth,
            retry: config.retry.clone(),
            closed: AtomicBool::new(false),
        })
    }

    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    pub(crate) fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Join a relative path (e.g. `api/v2/device`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── Verb shorthands ──────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, Error> {
        self.send_json::<T, ()>(Method::GET, path, None).await
    }

    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, Error> {
        self.send_optional::<T, ()>(Method::GET, path, None).await
    }

    pub(crate) async fn put_optional<T, B>(&self, path: &str, body: &B) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.send_optional(Method::PUT, path, Some(body)).await
    }

    pub(crate) async fn put_unit(&self, path: &str) -> Result<(), Error> {
        self.send_empty::<()>(Method::PUT, path, None).await
    }

    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        self.send_json(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn post_unit<B>(&self, path: &str, body: &B) -> Result<(), Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.send_empty(Method::POST, path, Some(body)).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        self.send_empty::<()>(Method::DELETE, path, None).await
    }

    // ── Typed entry points ───────────────────────────────────────────

    /// Send and decode a JSON response body into `T`.
    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let raw = self.send_raw(method, path, body).await?;
        serde_json::from_str(&raw).map_err(|e| Error::decode(&e, raw))
    }

    /// Like [`send_json`](Self::send_json), but an empty, `null`, or `{}`
    /// body decodes to `None` instead of a shape error. The device answers
    /// `{}` where it has nothing to report.
    pub(crate) async fn send_optional<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let raw = self.send_raw(method, path, body).await?;
        if matches!(raw.trim(), "" | "null" | "{}") {
            return Ok(None);
        }
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::decode(&e, raw))
    }

    /// Send a command whose response body carries no information.
    /// Success is the 2xx status; the body is not decoded.
    pub(crate) async fn send_empty<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        self.send_raw(method, path, body).await.map(|_| ())
    }

    // ── Retry loop ───────────────────────────────────────────────────

    /// Send a request, retrying transient failures with backoff.
    ///
    /// Cancellation is cooperative: dropping the returned future aborts
    /// promptly, including mid-backoff. A cancelled or retried mutating
    /// call may still have reached the device; the protocol gives no
    /// idempotency guarantee.
    async fn send_raw<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, Error>
    where
        B: Serialize + Sync + ?Sized,
    {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        let url = self.url(path)?;

        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            debug!(%method, %url, attempt, "sending request");

            match self.attempt(method.clone(), url.clone(), body).await {
                Ok(raw) => return Ok(raw),
                Err(err) if err.is_transient() && attempt < self.retry.max_attempts => {
                    let delay = self.retry.backoff(attempt);
                    warn!(
                        error = %err,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        "transient failure, backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    debug!(error = %err, attempt, "request failed");
                    return Err(err);
                }
            }
        }
    }

    /// One BUILD -> SEND -> classify cycle.
    async fn attempt<B>(&self, method: Method, url: Url, body: Option<&B>) -> Result<String, Error>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self
            .http
            .request(method, url)
            .header(reqwest::header::ACCEPT, "application/json");

        request = match &self.auth {
            Auth::Basic { username, key } => {
                request.basic_auth(username, Some(key.expose_secret()))
            }
            Auth::Bearer { token } => request.bearer_auth(token.expose_secret()),
        };

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| Error::Connection {
            message: e.to_string(),
        })?;

        let status = response.status();
        if status.is_success() {
            return response.text().await.map_err(|e| Error::Connection {
                message: e.to_string(),
            });
        }

        let raw = response.text().await.unwrap_or_default();
        Err(self.classify(status, &raw))
    }

    /// Map a non-2xx status onto the error taxonomy.
    fn classify(&self, status: StatusCode, body: &str) -> Error {
        let message = error_message(status, body);
        match status.as_u16() {
            401 | 403 => Error::Authentication { message },
            404 => Error::NotFound { message },
            s if self.retry.retries_status(s) => Error::Connection {
                message: format!("server returned HTTP {s}: {message}"),
            },
            s if (400..500).contains(&s) => Error::BadRequest { status: s, message },
            s => Error::Device { status: s, message },
        }
    }
}

/// Parse a base URL and make sure its path ends with `/` so relative
/// joins append instead of replacing the last segment.
pub(crate) fn normalize_base_url(raw: &str) -> Result<Url, Error> {
    let mut url = Url::parse(raw)?;
    if !url.path().ends_with('/') {
        url.set_path(&format!("{}/", url.path()));
    }
    Ok(url)
}

// ── Error body mining ────────────────────────────────────────────────

#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    errors: Vec<ErrorEntry>,
}

#[derive(serde::Deserialize)]
struct ErrorEntry {
    #[serde(default)]
    message: Option<String>,
}

/// Extract a message from the `{"errors":[{"message": …}]}` body shape,
/// falling back to the raw body, then the status line.
fn error_message(status: StatusCode, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.errors.into_iter().find_map(|e| e.message) {
            return message;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status.to_string()
    } else {
        trimmed.to_owned()
    }
}

// ── Tests ────────────────────────────────────────────────────────────
