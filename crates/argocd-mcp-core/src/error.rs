use thiserror::Error;

/// Canonical protocol-level error codes reported in tool error payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolErrorCode {
    InvalidInput,
    ApplicationNotFound,
    UpstreamUnreachable,
    UpstreamStatus,
    InvalidUpstreamPayload,
    InternalError,
}

impl ProtocolErrorCode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::ApplicationNotFound => "application_not_found",
            Self::UpstreamUnreachable => "upstream_unreachable",
            Self::UpstreamStatus => "upstream_status",
            Self::InvalidUpstreamPayload => "invalid_upstream_payload",
            Self::InternalError => "internal_error",
        }
    }
}

impl std::fmt::Display for ProtocolErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required value: {field}")]
    MissingValue { field: String },

    #[error("invalid config value: {field}: {reason}")]
    InvalidValue { field: String, reason: String },
}

impl ConfigError {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingValue {
            field: field.into(),
        }
    }

    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to get a response out of Argo CD at all.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request to Argo CD failed: {0}")]
    Request(String),

    #[error("failed to read HTTP response body: {0}")]
    Body(String),

    #[error("request to Argo CD was cancelled")]
    Cancelled,

    #[error("request to Argo CD exceeded its deadline")]
    DeadlineExceeded,
}

impl TransportError {
    /// Use with `.map_err(TransportError::request)`.
    pub fn request<E: std::fmt::Display>(e: E) -> Self {
        Self::Request(e.to_string())
    }

    pub fn body<E: std::fmt::Display>(e: E) -> Self {
        Self::Body(e.to_string())
    }
}

#[derive(Error, Debug)]
pub enum QueryError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("unexpected Argo CD status {status}: {body}")]
    UpstreamStatus { status: u16, body: String },

    #[error("failed to unmarshal application list: {0}")]
    Parse(String),

    #[error("no application found with name {name}")]
    NotFound { name: String },

    #[error("invalid input: {0}")]
    Validation(String),
}

impl QueryError {
    pub fn upstream_status(status: u16, body: impl Into<String>) -> Self {
        Self::UpstreamStatus {
            status,
            body: body.into(),
        }
    }

    pub fn parse<E: std::fmt::Display>(e: E) -> Self {
        Self::Parse(e.to_string())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn code(&self) -> ProtocolErrorCode {
        match self {
            Self::Transport(_) => ProtocolErrorCode::UpstreamUnreachable,
            Self::UpstreamStatus { .. } => ProtocolErrorCode::UpstreamStatus,
            Self::Parse(_) => ProtocolErrorCode::InvalidUpstreamPayload,
            Self::NotFound { .. } => ProtocolErrorCode::ApplicationNotFound,
            Self::Validation(_) => ProtocolErrorCode::InvalidInput,
        }
    }
}
