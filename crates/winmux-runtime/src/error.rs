#![forbid(unsafe_code)]

//! Window construction errors.

use std::error::Error;
use std::io;

/// Why a window could not be opened.
///
/// This is the only error the runtime reports. Once a window is open,
/// failures end the affected environment instead of surfacing as errors.
#[derive(Debug)]
pub enum OpenError {
    /// The native surface could not be created.
    Backend(Box<dyn Error + Send + Sync>),
    /// A loop thread could not be started.
    Spawn(io::Error),
}

impl OpenError {
    pub(crate) fn backend(err: impl Error + Send + Sync + 'static) -> Self {
        Self::Backend(Box::new(err))
    }
}

impl core::fmt::Display for OpenError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Backend(err) => write!(f, "failed to open surface: {err}"),
            Self::Spawn(err) => write!(f, "failed to start window thread: {err}"),
        }
    }
}

impl Error for OpenError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Backend(err) => Some(err.as_ref()),
            Self::Spawn(err) => Some(err),
        }
    }
}

impl From<io::Error> for OpenError {
    fn from(err: io::Error) -> Self {
        Self::Spawn(err)
    }
}
