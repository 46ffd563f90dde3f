//! Image descriptors
//!
//! An [`ImageObject`] describes one side of an operation in hardware terms.
//! A [`DrawRequest`] pairs the two sides with the rectangle size and colors
//! for a single encode-and-submit cycle.

use crate::blend::BlendFunction;
use crate::format::{PixelFormat, PixelFormatEntry, PixelOrder};
use crate::protocol::BufferHandle;

/// Hardware description of a source or destination surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageObject {
    pub handle: BufferHandle,
    /// Byte offset of the first pixel within the buffer.
    pub offset: u32,
    /// Row stride in bytes.
    pub pitch: u32,
    pub order: PixelOrder,
    pub format: PixelFormat,
    pub bytes_per_pixel: u32,
    pub blend_func: BlendFunction,
}

impl ImageObject {
    /// Describe a buffer whose pixels use the format table entry `entry`.
    pub fn new(handle: BufferHandle, pitch: u32, entry: &PixelFormatEntry) -> Self {
        Self {
            handle,
            offset: 0,
            pitch,
            order: entry.order,
            format: entry.format,
            bytes_per_pixel: entry.bytes_per_pixel,
            blend_func: BlendFunction::Zero,
        }
    }

    /// Byte offset of pixel `(x, y)`.
    pub fn offset_of(&self, x: u32, y: u32) -> u32 {
        x.wrapping_mul(self.bytes_per_pixel)
            .wrapping_add(y.wrapping_mul(self.pitch))
    }

    /// Point the descriptor at pixel `(x, y)`.
    pub fn at(mut self, x: u32, y: u32) -> Self {
        self.offset = self.offset_of(x, y);
        self
    }

    pub fn with_blend(mut self, blend_func: BlendFunction) -> Self {
        self.blend_func = blend_func;
        self
    }

    /// Bytes covered by one row of a `width` pixel wide rectangle.
    pub fn row_bytes(&self, width: u32) -> u32 {
        width.wrapping_mul(self.bytes_per_pixel)
    }
}

/// Parameters of one fill or blit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrawRequest {
    pub width: u32,
    pub height: u32,
    pub src: ImageObject,
    pub dst: ImageObject,
    /// Solid fill color, ARGB8888.
    pub fill_color: u32,
    /// Constant blend color, RGBA8888.
    pub blend_color: u32,
    /// Passed through to the device untouched.
    pub flags: u32,
}

/// Opaque white as a blend constant.
pub const BLEND_COLOR_OPAQUE_WHITE: u32 = rgba(0xff, 0xff, 0xff, 0xff);

/// Pack a color as ARGB8888.
pub const fn argb(a: u8, r: u8, g: u8, b: u8) -> u32 {
    ((a as u32) << 24) | ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Pack a color as RGBA8888.
pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> u32 {
    ((r as u32) << 24) | ((g as u32) << 16) | ((b as u32) << 8) | a as u32
}
