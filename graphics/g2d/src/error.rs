use thiserror::Error;

use crate::device::DeviceCall;
use crate::format::SurfaceFormat;
use crate::protocol::Version;

/// Errors reported by the G2D encoder and its device context.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unsupported protocol version {found} (expected major {expected})")]
    VersionMismatch { expected: u32, found: Version },

    #[error("unsupported pixel format {0}")]
    UnsupportedFormat(SurfaceFormat),

    #[error("{call} failed: {err}")]
    Device { call: DeviceCall, err: syscall::Error },
}

impl Error {
    /// Errno of a failed device call.
    pub fn errno(&self) -> Option<i32> {
        match self {
            Error::Device { err, .. } => Some(err.errno),
            _ => None,
        }
    }
}

pub type Result<T> = core::result::Result<T, Error>;
