use thiserror::Error;

use crate::config::SystemType;
use crate::validate::StateGroup;

/// Errors reported by the acceleration driver.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    G2d(#[from] g2d::Error),

    #[error("graphics system '{0}' is not supported")]
    UnsupportedSystem(SystemType),

    #[error("{0:?} state is not validated")]
    NotValidated(StateGroup),

    #[error("blit requested without a source surface")]
    MissingSource,
}

pub type Result<T> = core::result::Result<T, Error>;
