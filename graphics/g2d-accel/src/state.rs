//! Host rendering state
//!
//! The host keeps one [`CardState`] per rendering context and tells the
//! driver which parts of it changed through [`StateModification`] flags.

use bitflags::bitflags;

use g2d::{argb, SurfaceBlendFunction, SurfaceFormat};

/// A surface as the host describes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surface {
    pub format: SurfaceFormat,
    /// Row stride in bytes.
    pub pitch: u32,
    /// Kernel buffer object handle, valid on DRM/KMS.
    pub gem_handle: u32,
    /// Physical address, valid on framebuffer systems.
    pub phys: u32,
}

impl Surface {
    pub fn new(format: SurfaceFormat, pitch: u32) -> Self {
        Self {
            format,
            pitch,
            gem_handle: 0,
            phys: 0,
        }
    }

    pub fn with_gem(mut self, handle: u32) -> Self {
        self.gem_handle = handle;
        self
    }

    pub fn with_phys(mut self, phys: u32) -> Self {
        self.phys = phys;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub const fn to_argb(&self) -> u32 {
        argb(self.a, self.r, self.g, self.b)
    }
}

/// Inclusive region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl Region {
    pub const fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rectangle {
    pub const fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
}

bitflags! {
    /// Parts of [`CardState`] changed since the last `set_state`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct StateModification: u32 {
        const DESTINATION = 1 << 0;
        const SOURCE = 1 << 1;
        const COLOR = 1 << 2;
        const CLIP = 1 << 3;
        const SRC_BLEND = 1 << 4;
        const DST_BLEND = 1 << 5;
        const DRAWING_FLAGS = 1 << 6;
        const BLITTING_FLAGS = 1 << 7;
        const ALL = Self::DESTINATION.bits()
            | Self::SOURCE.bits()
            | Self::COLOR.bits()
            | Self::CLIP.bits()
            | Self::SRC_BLEND.bits()
            | Self::DST_BLEND.bits()
            | Self::DRAWING_FLAGS.bits()
            | Self::BLITTING_FLAGS.bits();
    }
}

bitflags! {
    /// Acceleration functions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct AccelMask: u32 {
        const FILL_RECTANGLE = 1 << 0;
        const DRAW_RECTANGLE = 1 << 1;
        const DRAW_LINE = 1 << 2;
        const FILL_TRIANGLE = 1 << 3;
        const BLIT = 1 << 16;
        const STRETCH_BLIT = 1 << 17;
        const TEXTURE_TRIANGLES = 1 << 18;

        const DRAWING = Self::FILL_RECTANGLE.bits()
            | Self::DRAW_RECTANGLE.bits()
            | Self::DRAW_LINE.bits()
            | Self::FILL_TRIANGLE.bits();
        const BLITTING = Self::BLIT.bits()
            | Self::STRETCH_BLIT.bits()
            | Self::TEXTURE_TRIANGLES.bits();
    }
}

impl AccelMask {
    pub fn is_drawing(&self) -> bool {
        self.intersects(AccelMask::DRAWING)
    }

    pub fn is_blitting(&self) -> bool {
        self.intersects(AccelMask::BLITTING)
    }
}

bitflags! {
    /// Effects requested for drawing functions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct DrawingFlags: u32 {
        const BLEND = 1 << 0;
        const DST_COLORKEY = 1 << 1;
        const SRC_PREMULTIPLY = 1 << 2;
        const DST_PREMULTIPLY = 1 << 3;
        const DEMULTIPLY = 1 << 4;
        const XOR = 1 << 5;
    }
}

impl DrawingFlags {
    /// No effects.
    pub const NOFX: DrawingFlags = DrawingFlags::empty();
}

bitflags! {
    /// Effects requested for blitting functions.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlittingFlags: u32 {
        const BLEND_ALPHACHANNEL = 1 << 0;
        const BLEND_COLORALPHA = 1 << 1;
        const COLORIZE = 1 << 2;
        const SRC_COLORKEY = 1 << 3;
        const DST_COLORKEY = 1 << 4;
        const SRC_PREMULTIPLY = 1 << 5;
        const DST_PREMULTIPLY = 1 << 6;
        const DEMULTIPLY = 1 << 7;
        const XOR = 1 << 8;
        const ROTATE180 = 1 << 12;
    }
}

impl BlittingFlags {
    /// No effects.
    pub const NOFX: BlittingFlags = BlittingFlags::empty();
}

/// Hardware independent rendering state.
#[derive(Debug, Clone)]
pub struct CardState {
    pub destination: Surface,
    pub source: Option<Surface>,
    pub color: Color,
    pub clip: Region,
    pub src_blend: SurfaceBlendFunction,
    pub dst_blend: SurfaceBlendFunction,
    pub drawing_flags: DrawingFlags,
    pub blitting_flags: BlittingFlags,
    /// Changes the driver has not seen yet.
    pub modified: StateModification,
    /// Functions the driver accelerates for this state.
    pub accel: AccelMask,
    /// Functions the hardware state has been programmed for.
    pub set: AccelMask,
}

impl CardState {
    /// New state with everything marked modified.
    pub fn new(destination: Surface) -> Self {
        Self {
            destination,
            source: None,
            color: Color::default(),
            clip: Region::default(),
            src_blend: SurfaceBlendFunction::SrcAlpha,
            dst_blend: SurfaceBlendFunction::InvSrcAlpha,
            drawing_flags: DrawingFlags::NOFX,
            blitting_flags: BlittingFlags::NOFX,
            modified: StateModification::ALL,
            accel: AccelMask::empty(),
            set: AccelMask::empty(),
        }
    }

    pub fn set_destination(&mut self, surface: Surface) {
        self.destination = surface;
        self.modified |= StateModification::DESTINATION;
    }

    pub fn set_source(&mut self, surface: Option<Surface>) {
        self.source = surface;
        self.modified |= StateModification::SOURCE;
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
        self.modified |= StateModification::COLOR;
    }

    pub fn set_clip(&mut self, clip: Region) {
        self.clip = clip;
        self.modified |= StateModification::CLIP;
    }

    pub fn set_blend(&mut self, src: SurfaceBlendFunction, dst: SurfaceBlendFunction) {
        if src != self.src_blend {
            self.modified |= StateModification::SRC_BLEND;
        }
        if dst != self.dst_blend {
            self.modified |= StateModification::DST_BLEND;
        }
        self.src_blend = src;
        self.dst_blend = dst;
    }

    pub fn set_drawing_flags(&mut self, flags: DrawingFlags) {
        self.drawing_flags = flags;
        self.modified |= StateModification::DRAWING_FLAGS;
    }

    pub fn set_blitting_flags(&mut self, flags: BlittingFlags) {
        self.blitting_flags = flags;
        self.modified |= StateModification::BLITTING_FLAGS;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_to_argb() {
        assert_eq!(Color::new(0xff, 0x00, 0xff, 0x00).to_argb(), 0xff00_ff00);
        assert_eq!(Color::new(0x80, 0x11, 0x22, 0x33).to_argb(), 0x8011_2233);
    }

    #[test]
    fn test_setters_mark_modified() {
        let mut state = CardState::new(Surface::new(SurfaceFormat::Argb, 1024));
        state.modified = StateModification::empty();

        state.set_color(Color::new(1, 2, 3, 4));
        state.set_clip(Region::new(0, 0, 9, 9));
        assert_eq!(
            state.modified,
            StateModification::COLOR | StateModification::CLIP
        );

        state.modified = StateModification::empty();
        state.set_blend(SurfaceBlendFunction::SrcAlpha, SurfaceBlendFunction::One);
        assert_eq!(state.modified, StateModification::DST_BLEND);
    }

    #[test]
    fn test_accel_families() {
        assert!(AccelMask::FILL_RECTANGLE.is_drawing());
        assert!(!AccelMask::FILL_RECTANGLE.is_blitting());
        assert!(AccelMask::STRETCH_BLIT.is_blitting());
        assert!(DrawingFlags::NOFX.is_empty());
    }
}
