use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, InputError>;

/// Error kinds surfaced by the input layer.
///
/// The layer performs no retries and no recovery. Every failure from the
/// underlying storage is mapped onto one of these kinds and surfaced to the
/// caller verbatim; decorators forward errors without translating them.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("file not found: {location}")]
    NotFound { location: String },

    #[error("access denied: {location}")]
    AccessDenied { location: String },

    /// Fewer bytes were available than a full-range read requested.
    /// Callers never receive a silent partial fill.
    #[error("unexpected end of file reading {requested} bytes at position {position} of {location}")]
    ShortRead {
        location: String,
        position: u64,
        requested: usize,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Any other backend failure, including transient ones.
    #[error("storage unavailable: {0}")]
    Unavailable(#[source] io::Error),
}

impl InputError {
    /// Maps a raw I/O error onto the input error model for the given location.
    ///
    /// `UnexpectedEof` is not handled here since a short read needs the
    /// position and requested length for its message; read paths map it
    /// explicitly.
    pub(crate) fn io(location: &str, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => InputError::NotFound {
                location: location.to_string(),
            },
            io::ErrorKind::PermissionDenied => InputError::AccessDenied {
                location: location.to_string(),
            },
            _ => InputError::Unavailable(err),
        }
    }
}
