//! G2D acceleration driver
//!
//! Host side of the G2D engine: capability checks, lazy validation of the
//! hardware state derived from the host's rendering state, and the fill/blit
//! entry points built on the [`g2d`] command encoder.
//!
//! # Usage
//!
//! ```ignore
//! let config = AccelConfig::from_env();
//! if !g2d_accel::probe(config.accelerator) {
//!     return;
//! }
//!
//! let driver = AccelDriver::open(&config, device)?;
//! if driver.check_state(&mut state, AccelMask::FILL_RECTANGLE) {
//!     driver.set_state(&mut state, AccelMask::FILL_RECTANGLE)?;
//!     driver.fill_rectangle(&Rectangle::new(0, 0, 64, 32))?;
//!     driver.engine_sync()?;
//! }
//! ```

pub mod check;
pub mod config;
pub mod driver;
pub mod error;
pub mod state;
pub mod validate;

pub use check::check_state;
pub use config::{AccelConfig, BufferBackend, SystemType};
pub use driver::AccelDriver;
pub use error::{Error, Result};
pub use state::{
    AccelMask, BlittingFlags, CardState, Color, DrawingFlags, Rectangle, Region,
    StateModification, Surface,
};
pub use validate::{ClipRect, Derived, StateGroup, ValidationCache};

use log::debug;

/// Accelerator id reported by G2D capable framebuffers.
pub const FB_ACCEL_ID_G2D: u32 = 0x3220;

pub const DRIVER_NAME: &str = "Nexell/G2D";
pub const DRIVER_VENDOR: &str = "Nexell";
pub const DRIVER_URL: &str = "nexell.co.kr";
pub const DRIVER_LICENSE: &str = "LGPL";
pub const DEVICE_NAME: &str = "nxp3220";

/// Required alignment of a surface's byte offset.
pub const SURFACE_BYTE_OFFSET_ALIGN: u32 = 4;
/// Required alignment of a surface's pitch, in pixels.
pub const SURFACE_PIXEL_PITCH_ALIGN: u32 = 4;

/// Whether this driver handles `accelerator`.
pub fn probe(accelerator: u32) -> bool {
    debug!("G2D: probe accelerator {:#x}", accelerator);
    accelerator == FB_ACCEL_ID_G2D
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverInfo {
    pub name: &'static str,
    pub vendor: &'static str,
    pub url: &'static str,
    pub license: &'static str,
    /// Encoder protocol version.
    pub version: g2d::Version,
}

pub fn driver_info() -> DriverInfo {
    DriverInfo {
        name: DRIVER_NAME,
        vendor: DRIVER_VENDOR,
        url: DRIVER_URL,
        license: DRIVER_LICENSE,
        version: g2d::Version::encoder(),
    }
}

/// Card-wide capability flags; the engine has none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CardFlags(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub flags: CardFlags,
    pub accel: AccelMask,
    pub drawing: DrawingFlags,
    pub blitting: BlittingFlags,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub surface_byteoffset_alignment: u32,
    pub surface_pixelpitch_alignment: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub name: &'static str,
    pub vendor: &'static str,
    pub caps: Capabilities,
    pub limits: Limits,
}

pub fn device_info() -> DeviceInfo {
    DeviceInfo {
        name: DEVICE_NAME,
        vendor: DRIVER_VENDOR,
        caps: Capabilities {
            flags: CardFlags::default(),
            accel: check::SUPPORTED_DRAWING_FUNCTIONS | check::SUPPORTED_BLITTING_FUNCTIONS,
            drawing: check::SUPPORTED_DRAWING_FLAGS,
            blitting: check::SUPPORTED_BLITTING_FLAGS,
        },
        limits: Limits {
            surface_byteoffset_alignment: SURFACE_BYTE_OFFSET_ALIGN,
            surface_pixelpitch_alignment: SURFACE_PIXEL_PITCH_ALIGN,
        },
    }
}
