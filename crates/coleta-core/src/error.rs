use std::fmt;
use std::path::PathBuf;

use crate::db::StoreOpenError;
use crate::source::SourceError;

/// Machine-readable error codes for scripted callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    StoreUnavailable,
    SnapshotInvalid,
    RequisitionNotFound,
    InvalidDate,
    SchemaMismatch,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::StoreUnavailable => "E2001",
            Self::SnapshotInvalid => "E2002",
            Self::RequisitionNotFound => "E3001",
            Self::InvalidDate => "E3002",
            Self::SchemaMismatch => "E2003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Project not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::StoreUnavailable => "Collection event store unavailable",
            Self::SnapshotInvalid => "Event snapshot could not be read",
            Self::RequisitionNotFound => "Requisition not found",
            Self::InvalidDate => "Invalid calendar date",
            Self::SchemaMismatch => "Event store schema version not supported",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `coleta init` to initialize this directory."),
            Self::ConfigParseError => Some("Fix syntax in .coleta/config.toml and retry."),
            Self::StoreUnavailable => {
                Some("Check the [store] path in .coleta/config.toml and file permissions.")
            }
            Self::SnapshotInvalid => {
                Some("Export the snapshot again as a JSON array of collection events.")
            }
            Self::RequisitionNotFound => Some("Run `coleta history` to list requisition ids."),
            Self::InvalidDate => Some("Use the YYYY-MM-DD format, e.g. 2024-06-01."),
            Self::SchemaMismatch => Some(
                "Run `coleta init --force` to migrate an older store, or upgrade coleta.",
            ),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Errors surfaced to operators by the coleta tools.
#[derive(Debug, thiserror::Error)]
pub enum ColetaError {
    #[error("no coleta project found at {}", .0.display())]
    NotInitialized(PathBuf),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreOpenError),

    #[error("requisition {0} not found")]
    RequisitionNotFound(i64),

    #[error("invalid date '{0}'")]
    InvalidDate(String),
}

impl ColetaError {
    /// The machine-readable code for this error.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::NotInitialized(_) => ErrorCode::NotInitialized,
            Self::Source(SourceError::Io { .. } | SourceError::Snapshot { .. }) => {
                ErrorCode::SnapshotInvalid
            }
            Self::Source(_)
            | Self::Store(StoreOpenError::Missing { .. } | StoreOpenError::Unreadable { .. }) => {
                ErrorCode::StoreUnavailable
            }
            Self::Store(StoreOpenError::SchemaMismatch { .. }) => ErrorCode::SchemaMismatch,
            Self::RequisitionNotFound(_) => ErrorCode::RequisitionNotFound,
            Self::InvalidDate(_) => ErrorCode::InvalidDate,
        }
    }

    /// Remediation text for the error, falling back to the code summary.
    #[must_use]
    pub fn suggestion(&self) -> String {
        let code = self.error_code();
        code.hint().unwrap_or(code.message()).to_string()
    }
}
