use thiserror::Error;

/// Errors raised by the analytics operations.
///
/// Every variant belongs to one [`ErrorKind`], which is what the calling
/// layer uses to decide between a client error, a "no data" answer and a
/// server fault.
#[derive(Debug, Error)]
pub enum AnalyticsError {
    #[error("unknown dataset: {0}")]
    UnknownDataset(String),

    #[error("missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error("request exceeds resource bounds: {0}")]
    ResourceLimit(String),

    #[error("no data: {0}")]
    NoData(String),

    #[error("not enough data: need at least {required} documents, got {actual}")]
    NotEnoughData { required: usize, actual: usize },

    #[error("post not found: {0}")]
    PostNotFound(String),

    #[error("vector dimension mismatch: {left} != {right}")]
    DimensionMismatch { left: usize, right: usize },

    #[error("computation failed: {0}")]
    Computation(String),

    #[error("document store error: {0}")]
    Store(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Coarse error classification surfaced at the operation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// unknown dataset, missing parameter, oversized request
    InvalidInput,
    /// empty corpus, too few documents, unknown target id
    InsufficientData,
    /// vectors built from different vocabularies
    DimensionMismatch,
    /// numeric or collaborator failure
    ComputationFault,
}

impl AnalyticsError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalyticsError::UnknownDataset(_)
            | AnalyticsError::MissingParameter(_)
            | AnalyticsError::InvalidParameter { .. }
            | AnalyticsError::ResourceLimit(_) => ErrorKind::InvalidInput,
            AnalyticsError::NoData(_)
            | AnalyticsError::NotEnoughData { .. }
            | AnalyticsError::PostNotFound(_) => ErrorKind::InsufficientData,
            AnalyticsError::DimensionMismatch { .. } => ErrorKind::DimensionMismatch,
            AnalyticsError::Computation(_)
            | AnalyticsError::Store(_)
            | AnalyticsError::Io(_)
            | AnalyticsError::Serde(_) => ErrorKind::ComputationFault,
        }
    }

    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        AnalyticsError::InvalidParameter { name, reason: reason.into() }
    }
}

impl serde::Serialize for AnalyticsError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T, E = AnalyticsError> = std::result::Result<T, E>;
