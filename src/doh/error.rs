use thiserror::Error;

/// Input rejected before any network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid DNS record type.")]
    EmptyRecordType,
    #[error("Unknown dnsRecordType.")]
    UnknownRecordType { value: String },
    #[error("Invalid domain.")]
    EmptyDomain,
    #[error("Invalid email address.")]
    EmptyEmail,
}

impl InputError {
    pub(crate) fn unknown_record_type(value: impl Into<String>) -> Self {
        Self::UnknownRecordType {
            value: value.into(),
        }
    }
}

/// Failure raised by a [`DohTransport`](super::DohTransport) implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("host {host} is not on the allow-list")]
    HostNotAllowed { host: String },
    #[error("invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("HTTP client initialization failed: {source}")]
    ClientInit {
        #[source]
        source: reqwest::Error,
    },
    #[error("request failed: {source}")]
    Request {
        #[source]
        source: reqwest::Error,
    },
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    pub(crate) fn host_not_allowed(host: impl Into<String>) -> Self {
        Self::HostNotAllowed { host: host.into() }
    }

    pub(crate) fn invalid_url(url: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            source,
        }
    }

    pub(crate) fn client_init(source: reqwest::Error) -> Self {
        Self::ClientInit { source }
    }

    pub(crate) fn request(source: reqwest::Error) -> Self {
        Self::Request { source }
    }
}

/// Typed outcome of a failed lookup. Rendered to the caller as a plain string
/// by [`resolve`](super::resolve).
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("transport failure: {source}")]
    Transport {
        #[source]
        source: TransportError,
    },
    #[error("unexpected HTTP status {status}")]
    HttpStatus { status: u16 },
    #[error("malformed DoH body: {source}")]
    Body {
        #[source]
        source: serde_json::Error,
    },
    #[error("upstream status {code}")]
    Status { code: i64 },
}

impl LookupError {
    pub(crate) fn transport(source: TransportError) -> Self {
        Self::Transport { source }
    }

    pub(crate) fn body(source: serde_json::Error) -> Self {
        Self::Body { source }
    }

    /// True for every failure that is reported as "Could not fetch result!".
    pub fn is_fetch_failure(&self) -> bool {
        !matches!(self, Self::Status { .. })
    }
}
