use thiserror::Error;

/// What went wrong while decoding a response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeKind {
    /// The body did not match the expected shape.
    Shape,
    /// A notification frame carried a discriminator this client
    /// version does not recognize.
    UnknownVariant,
}

/// Top-level error type for the `glowgrid-api` crate.
///
/// Covers every failure mode across both API surfaces (device and cloud).
/// The clients classify and raise; they never catch or reinterpret, so
/// callers can rely on the variant to decide between retrying
/// ([`Connection`](Self::Connection)) and fixing code or configuration
/// (everything else).
#[derive(Debug, Error)]
pub enum Error {
    // ── Transport ───────────────────────────────────────────────────
    /// Network-level failure: connection refused, DNS failure, request
    /// timeout, or a transient server status that survived every retry.
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// 401/403 from the server -- the API key or token was rejected.
    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    /// 404 -- the requested resource does not exist (for example,
    /// dismissing a notification that was already dismissed).
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Any other 4xx: malformed command, out-of-range value.
    #[error("Bad request (HTTP {status}): {message}")]
    BadRequest { status: u16, message: String },

    /// A 5xx the retry policy does not consider transient.
    #[error("Device error (HTTP {status}): {message}")]
    Device { status: u16, message: String },

    // ── Data ────────────────────────────────────────────────────────
    /// A 2xx response whose body does not match the expected shape,
    /// with the raw body for debugging. Never retried -- a retry cannot
    /// fix malformed content.
    #[error("Decode error: {message}")]
    Decode {
        kind: DecodeKind,
        message: String,
        body: String,
    },

    /// A command payload was rejected before sending (empty frame list,
    /// non-primitive action parameters).
    #[error("Invalid request: {0}")]
    InvalidRequest(&'static str),

    // ── Lifecycle / construction ────────────────────────────────────
    /// Call attempted after [`close`](crate::DeviceClient::close).
    #[error("Client is closed")]
    Closed,

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction failure.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// Returns `true` if this is a transient failure worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if re-authenticating (a new API key or token)
    /// might resolve this error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Build a [`Decode`](Self::Decode) error from a serde failure.
    ///
    /// serde reports an unrecognized internally-tagged discriminator as
    /// an "unknown variant" error; the only internally-tagged type on
    /// the wire is the notification frame union, so that phrasing is
    /// promoted to [`DecodeKind::UnknownVariant`].
    pub(crate) fn decode(err: &serde_json::Error, body: String) -> Self {
        let message = err.to_string();
        let kind = if message.starts_with("unknown variant") {
            DecodeKind::UnknownVariant
        } else {
            DecodeKind::Shape
        };
        Self::Decode {
            kind,
            message,
            body,
        }
    }
}
