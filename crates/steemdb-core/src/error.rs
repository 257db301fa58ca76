use thiserror::Error;

/// A local, pre-flight rejection of call arguments. Raised before any
/// remote call is issued and never worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    // ── Presence ─────────────────────────────────────────────────────────────
    #[error("{field} must not be empty")]
    Empty { field: &'static str },

    #[error("{field} requires {missing} to be set as well")]
    UnpairedCursor {
        field: &'static str,
        missing: &'static str,
    },

    // ── Numeric range ────────────────────────────────────────────────────────
    #[error("{field} exceeds maximum of {max}, got {got}")]
    AboveMaximum {
        field: &'static str,
        max: u64,
        got: u64,
    },

    #[error("{field} must be at least {min}, got {got}")]
    BelowMinimum {
        field: &'static str,
        min: u64,
        got: u64,
    },

    // ── Format ───────────────────────────────────────────────────────────────
    #[error("{field} must be {len} hex characters: {reason}")]
    InvalidHex {
        field: &'static str,
        len: usize,
        reason: String,
    },

    #[error("{field} could not be encoded: {reason}")]
    Unencodable { field: &'static str, reason: String },

    // ── Operations ───────────────────────────────────────────────────────────
    #[error("operation id {id} is outside the filterable range 0..=63")]
    OperationIdOutOfRange { id: u32 },

    #[error("unknown operation name: {name}")]
    UnknownOperation { name: String },

    #[error("unknown discussion sort key: {key}")]
    UnknownSortKey { key: String },
}

impl ValidationError {
    /// Name of the argument that failed validation.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Empty { field }
            | Self::UnpairedCursor { field, .. }
            | Self::AboveMaximum { field, .. }
            | Self::BelowMinimum { field, .. }
            | Self::InvalidHex { field, .. }
            | Self::Unencodable { field, .. } => field,
            Self::OperationIdOutOfRange { .. } | Self::UnknownOperation { .. } => {
                "operation_bitmask"
            }
            Self::UnknownSortKey { .. } => "sort_key",
        }
    }
}

/// Every failure a database API call can surface.
///
/// Validation failures are local; `Transport` and `Remote` come from the
/// transport capability unchanged; `NotFound` is reserved for lookups that
/// expect the target to exist.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid argument: {0}")]
    Validation(#[from] ValidationError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("remote error {code}: {message}")]
    Remote {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected response from {method}: {reason}")]
    UnexpectedResponse { method: String, reason: String },
}

impl ClientError {
    pub fn remote(code: i64, message: impl Into<String>) -> Self {
        Self::Remote {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// True only for failures where repeating the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
