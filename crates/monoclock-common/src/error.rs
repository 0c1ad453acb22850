use thiserror::Error;

/// Clock error types covering source selection and input validation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ClockError {
    /// No usable time source was found at initialization.
    ///
    /// This reflects a static capability of the host, not a transient
    /// condition; there is no retry path.
    #[error("no usable time source available: {0}")]
    Unavailable(String),

    /// A caller-supplied value is outside the defined input domain.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for clock operations.
pub type ClockResult<T> = Result<T, ClockError>;
