//! G2D command encoder
//!
//! This crate turns rectangle fills and blended rectangle copies into the
//! register command buffer consumed by the G2D 2D engine, and submits it
//! through a synchronous device interface.
//!
//! # Architecture
//!
//! ```text
//!  DrawRequest ──► assembler ──► encoder ──► G2dCmd ──► G2dContext ──► G2dDevice
//!      ▲              │             │                     (copy + RUN)   GET_VER
//!      │              │             └─ protocol (slots, fields,          DMA_EXEC
//!  ImageObject        │                revisions)                        DMA_SYNC
//!      ▲              └─ blend (function/equation codes)
//!      │
//!  format (surface format -> color format, order, bytes per pixel)
//! ```
//!
//! The protocol revision is chosen once, from the version the device reports
//! at open, and fixes the buffer type codes and dither rules used from then on.
//!
//! # Usage
//!
//! ```ignore
//! use g2d::{G2dContext, SimulatedDevice, DrawRequest, ImageObject, BufferHandle};
//!
//! let mut ctx = G2dContext::open(SimulatedDevice::default())?;
//! let entry = g2d::format::lookup(SurfaceFormat::Argb).unwrap();
//! let dst = ImageObject::new(BufferHandle::Gem(handle), pitch, entry).at(x, y);
//! ctx.fill(&DrawRequest { width: 64, height: 32, dst, fill_color, ..Default::default() })?;
//! ctx.sync()?;
//! ```

pub mod assembler;
pub mod bits;
pub mod blend;
pub mod context;
pub mod device;
pub mod encoder;
pub mod error;
pub mod format;
pub mod image;
pub mod protocol;

// Re-exports
pub use assembler::Operation;
pub use blend::{BlendEquation, BlendFunction, RopMode, SurfaceBlendFunction};
pub use context::G2dContext;
pub use device::{DeviceCall, G2dDevice, SimulatedDevice};
pub use encoder::Encoder;
pub use error::{Error, Result};
pub use format::{PixelFormat, PixelFormatEntry, PixelOrder, SurfaceFormat};
pub use image::{argb, rgba, DrawRequest, ImageObject, BLEND_COLOR_OPAQUE_WHITE};
pub use protocol::{
    BufferHandle, BufferObject, G2dCmd, ProtocolLayout, Slot, SlotMask, Version,
    G2D_VERSION_MAJOR, G2D_VERSION_MINOR, SLOT_COUNT,
};
