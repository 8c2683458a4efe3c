use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum QueryError {
    #[error("{param} must be a non-negative integer, got '{value}'")]
    InvalidNumber { param: &'static str, value: String },

    #[error("Cannot sort by '{field}'; allowed: {allowed}")]
    UnknownSortField { field: String, allowed: String },

    #[error("sort_order must be 'asc' or 'desc', got '{0}'")]
    InvalidSortOrder(String),

    #[error("{param} must be 'true' or 'false', got '{value}'")]
    InvalidBoolean { param: String, value: String },
}
