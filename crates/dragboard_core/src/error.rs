//! Board store error types.
//!
//! Only structural inserts and board/config loading can fail. Drag-time
//! operations degrade to no-ops instead of returning errors.

use crate::config::ConfigError;
use crate::model::{ColumnId, RowId};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Result type used by fallible board store operations.
pub type BoardResult<T> = Result<T, BoardError>;

/// Errors from board store construction and structural mutation.
#[derive(Debug)]
pub enum BoardError {
    /// Target column does not exist.
    ColumnNotFound(ColumnId),
    /// A column with this id is already on the board.
    DuplicateColumn(ColumnId),
    /// A row with this id is already on the board.
    DuplicateRow(RowId),
    /// Board configuration failed validation.
    InvalidConfig(ConfigError),
    /// Board payload is not valid JSON for the requested payload types.
    Json(serde_json::Error),
}

impl Display for BoardError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ColumnNotFound(id) => write!(f, "column not found: {id}"),
            Self::DuplicateColumn(id) => write!(f, "column already exists: {id}"),
            Self::DuplicateRow(id) => write!(f, "row already exists: {id}"),
            Self::InvalidConfig(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid board payload: {err}"),
        }
    }
}

impl Error for BoardError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidConfig(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::ColumnNotFound(_) | Self::DuplicateColumn(_) | Self::DuplicateRow(_) => None,
        }
    }
}

impl From<ConfigError> for BoardError {
    fn from(value: ConfigError) -> Self {
        Self::InvalidConfig(value)
    }
}

impl From<serde_json::Error> for BoardError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}
