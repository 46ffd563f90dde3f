//! Surface pixel formats
//!
//! Maps the host's surface formats onto the G2D color format, channel order
//! and bytes per pixel. Lookup fails closed: a format missing from
//! [`PIXEL_FORMATS`] is never encoded.

use core::fmt;

/// Host surface pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SurfaceFormat {
    Unknown,

    // RGB
    Rgb16,
    Rgb555,
    Bgr555,
    Argb1555,
    Rgba5551,
    Rgb444,
    Argb4444,
    Rgba4444,
    Rgb24,
    Rgb32,
    Argb,
    Abgr,
    Rgb332,
    Argb2554,
    Argb6666,
    Rgb18,
    A8,
    Lut8,

    // YUV
    Yuy2,
    Uyvy,
    I420,
    Yv12,
    Nv12,
    Nv21,
    Nv16,
    Ayuv,
    Yuv444p,
}

impl SurfaceFormat {
    /// YUV and planar formats; the engine has no color-space conversion.
    pub fn is_yuv(&self) -> bool {
        matches!(
            self,
            SurfaceFormat::Yuy2
                | SurfaceFormat::Uyvy
                | SurfaceFormat::I420
                | SurfaceFormat::Yv12
                | SurfaceFormat::Nv12
                | SurfaceFormat::Nv21
                | SurfaceFormat::Nv16
                | SurfaceFormat::Ayuv
                | SurfaceFormat::Yuv444p
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            SurfaceFormat::Unknown => "UNKNOWN",
            SurfaceFormat::Rgb16 => "RGB16",
            SurfaceFormat::Rgb555 => "RGB555",
            SurfaceFormat::Bgr555 => "BGR555",
            SurfaceFormat::Argb1555 => "ARGB1555",
            SurfaceFormat::Rgba5551 => "RGBA5551",
            SurfaceFormat::Rgb444 => "RGB444",
            SurfaceFormat::Argb4444 => "ARGB4444",
            SurfaceFormat::Rgba4444 => "RGBA4444",
            SurfaceFormat::Rgb24 => "RGB24",
            SurfaceFormat::Rgb32 => "RGB32",
            SurfaceFormat::Argb => "ARGB",
            SurfaceFormat::Abgr => "ABGR",
            SurfaceFormat::Rgb332 => "RGB332",
            SurfaceFormat::Argb2554 => "ARGB2554",
            SurfaceFormat::Argb6666 => "ARGB6666",
            SurfaceFormat::Rgb18 => "RGB18",
            SurfaceFormat::A8 => "A8",
            SurfaceFormat::Lut8 => "LUT8",
            SurfaceFormat::Yuy2 => "YUY2",
            SurfaceFormat::Uyvy => "UYVY",
            SurfaceFormat::I420 => "I420",
            SurfaceFormat::Yv12 => "YV12",
            SurfaceFormat::Nv12 => "NV12",
            SurfaceFormat::Nv21 => "NV21",
            SurfaceFormat::Nv16 => "NV16",
            SurfaceFormat::Ayuv => "AYUV",
            SurfaceFormat::Yuv444p => "YUV444P",
        }
    }
}

impl fmt::Display for SurfaceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// G2D color format code (4-bit COLOR_FMT field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum PixelFormat {
    #[default]
    Rgb565 = 0,
    Xrgb1555 = 1,
    Argb1555 = 2,
    Xrgb4444 = 3,
    Argb4444 = 4,
    Rgb888 = 8,
    Xrgb8888 = 12,
    Argb8888 = 13,
}

/// G2D channel order code (2-bit COLOR_ORDER field).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum PixelOrder {
    #[default]
    Argb = 0,
    Rgba = 1,
    Abgr = 2,
    Bgra = 3,
}

/// One row of the format table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatEntry {
    pub surface: SurfaceFormat,
    pub format: PixelFormat,
    pub order: PixelOrder,
    pub bytes_per_pixel: u32,
}

const fn entry(
    surface: SurfaceFormat,
    format: PixelFormat,
    bytes_per_pixel: u32,
    order: PixelOrder,
) -> PixelFormatEntry {
    PixelFormatEntry {
        surface,
        format,
        order,
        bytes_per_pixel,
    }
}

/// Surface formats the engine reads and writes.
pub static PIXEL_FORMATS: [PixelFormatEntry; 12] = [
    entry(SurfaceFormat::Rgb16, PixelFormat::Rgb565, 2, PixelOrder::Argb),
    entry(SurfaceFormat::Rgb555, PixelFormat::Xrgb1555, 2, PixelOrder::Argb),
    entry(SurfaceFormat::Bgr555, PixelFormat::Xrgb1555, 2, PixelOrder::Abgr),
    entry(SurfaceFormat::Argb1555, PixelFormat::Argb1555, 2, PixelOrder::Argb),
    entry(SurfaceFormat::Rgba5551, PixelFormat::Argb1555, 2, PixelOrder::Rgba),
    entry(SurfaceFormat::Rgb444, PixelFormat::Xrgb4444, 2, PixelOrder::Argb),
    entry(SurfaceFormat::Argb4444, PixelFormat::Argb4444, 2, PixelOrder::Argb),
    entry(SurfaceFormat::Rgba4444, PixelFormat::Argb4444, 2, PixelOrder::Rgba),
    entry(SurfaceFormat::Rgb24, PixelFormat::Rgb888, 3, PixelOrder::Argb),
    entry(SurfaceFormat::Rgb32, PixelFormat::Xrgb8888, 4, PixelOrder::Argb),
    entry(SurfaceFormat::Argb, PixelFormat::Argb8888, 4, PixelOrder::Argb),
    entry(SurfaceFormat::Abgr, PixelFormat::Argb8888, 4, PixelOrder::Abgr),
];

/// Find the hardware description of `format`.
pub fn lookup(format: SurfaceFormat) -> Option<&'static PixelFormatEntry> {
    PIXEL_FORMATS.iter().find(|entry| entry.surface == format)
}

/// Whether the engine can read or write surfaces of `format`.
pub fn is_supported(format: SurfaceFormat) -> bool {
    lookup(format).is_some()
}
