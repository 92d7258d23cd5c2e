use thiserror::Error;

/// Failures of page registry mutations. Queries never fail, they fall back to
/// empty results instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PageError {
    #[error("page not found: {0}")]
    NotFound(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("duplicate page id: {0}")]
    DuplicateId(String),
}

pub type PageResult<T> = Result<T, PageError>;
