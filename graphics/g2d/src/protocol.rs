//! G2D command buffer protocol
//!
//! The device consumes one [`G2dCmd`] per operation: a buffer object per side,
//! a fixed array of 32-bit command slots, a mask of the slots written in this
//! cycle and an opaque flags word. Everything is little-endian `u32`.
//!
//! ```text
//! offset  size  field
//! 0x00    12    src   { buf_type, handle, offset }
//! 0x0c    12    dst   { buf_type, handle, offset }
//! 0x18    44    cmd[SLOT_COUNT]
//! 0x44     4    cmd_mask
//! 0x48     4    flags
//! ```
//!
//! Two revisions of the encoding exist for major version 1. They share the
//! slot layout but disagree on buffer type codes and on when destination
//! dithering is switched on, so each one is a separate [`ProtocolLayout`].

use core::fmt;

use bitflags::bitflags;
use bytemuck::{Pod, Zeroable};

use crate::bits::{flag, Field};

/// Protocol major version spoken by this encoder.
pub const G2D_VERSION_MAJOR: u32 = 1;
/// Protocol minor version spoken by this encoder.
pub const G2D_VERSION_MINOR: u32 = 0;

/// Number of command slots.
pub const SLOT_COUNT: usize = 11;

/// Command slots in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum Slot {
    SrcCtrl = 0,
    SrcStride = 1,
    SrcBlkSize = 2,
    DstCtrl = 3,
    DstStride = 4,
    DstBlkSize = 5,
    Size = 6,
    BlendEquatAlpha = 7,
    BlendColor = 8,
    SolidColor = 9,
    Run = 10,
}

impl Slot {
    pub const ALL: [Slot; SLOT_COUNT] = [
        Slot::SrcCtrl,
        Slot::SrcStride,
        Slot::SrcBlkSize,
        Slot::DstCtrl,
        Slot::DstStride,
        Slot::DstBlkSize,
        Slot::Size,
        Slot::BlendEquatAlpha,
        Slot::BlendColor,
        Slot::SolidColor,
        Slot::Run,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn bit(self) -> SlotMask {
        SlotMask::from_bits_truncate(1 << self as u32)
    }
}

bitflags! {
    /// Slots written during the current cycle.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SlotMask: u32 {
        const SRC_CTRL = 1 << 0;
        const SRC_STRIDE = 1 << 1;
        const SRC_BLKSIZE = 1 << 2;
        const DST_CTRL = 1 << 3;
        const DST_STRIDE = 1 << 4;
        const DST_BLKSIZE = 1 << 5;
        const SIZE = 1 << 6;
        const BLEND_EQUAT_ALPHA = 1 << 7;
        const BLEND_COLOR = 1 << 8;
        const SOLID_COLOR = 1 << 9;
        const RUN = 1 << 10;
    }
}

/// Buffer reference for one side of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct BufferObject {
    pub buf_type: u32,
    pub handle: u32,
    pub offset: u32,
}

/// Command buffer handed to the device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct G2dCmd {
    pub src: BufferObject,
    pub dst: BufferObject,
    cmd: [u32; SLOT_COUNT],
    cmd_mask: u32,
    pub flags: u32,
}

impl G2dCmd {
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every slot, the mask, the flags and both buffer objects.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// OR `bits` into `slot` and mark it written.
    pub fn set(&mut self, slot: Slot, bits: u32) {
        self.cmd[slot.index()] |= bits;
        self.cmd_mask |= slot.bit().bits();
    }

    /// Current word of `slot`.
    pub fn word(&self, slot: Slot) -> u32 {
        self.cmd[slot.index()]
    }

    /// Read one field back out of `slot`.
    pub fn field(&self, slot: Slot, field: Field) -> u32 {
        field.unpack(self.word(slot))
    }

    pub fn is_written(&self, slot: Slot) -> bool {
        self.mask().contains(slot.bit())
    }

    pub fn mask(&self) -> SlotMask {
        SlotMask::from_bits_truncate(self.cmd_mask)
    }

    pub fn words(&self) -> &[u32; SLOT_COUNT] {
        &self.cmd
    }

    /// Wire representation.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

/// Bit positions of every field the encoder writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldLayout {
    // SrcCtrl only
    pub discard: Field,
    pub src_cpu_enb: Field,
    pub solid_enb: Field,
    pub force_alpha_enb: Field,
    pub force_alpha: Field,
    // SrcCtrl and DstCtrl
    pub read_enb: Field,
    pub color_order: Field,
    pub color_fmt: Field,
    // DstCtrl only
    pub dither_x: Field,
    pub dither_y: Field,
    pub dither_enb: Field,
    // Size
    pub height: Field,
    pub width: Field,
    // BlendEquatAlpha
    pub write_mask: Field,
    pub rop_enb: Field,
    pub rop_mode: Field,
    pub blend_enb: Field,
    pub blend_src_rgb: Field,
    pub blend_dst_rgb: Field,
    pub blend_src_alpha: Field,
    pub blend_dst_alpha: Field,
    pub equat_rgb: Field,
    pub equat_alpha: Field,
    // Whole words: strides, block sizes, blend color, solid color, run
    pub word: Field,
}

impl FieldLayout {
    /// Every field with the slot it lives in.
    pub fn fields(&self) -> [(&'static str, Slot, Field); 26] {
        [
            ("DISCARD", Slot::SrcCtrl, self.discard),
            ("SRC_CPU_ENB", Slot::SrcCtrl, self.src_cpu_enb),
            ("SOLID_ENB", Slot::SrcCtrl, self.solid_enb),
            ("SRC_FORCE_ALPHA_ENB", Slot::SrcCtrl, self.force_alpha_enb),
            ("SRC_FORCE_ALPHA", Slot::SrcCtrl, self.force_alpha),
            ("SRC_RD_ENB", Slot::SrcCtrl, self.read_enb),
            ("SRC_COLOR_ORDER", Slot::SrcCtrl, self.color_order),
            ("SRC_COLOR_FMT", Slot::SrcCtrl, self.color_fmt),
            ("DST_RD_ENB", Slot::DstCtrl, self.read_enb),
            ("DST_COLOR_ORDER", Slot::DstCtrl, self.color_order),
            ("DST_COLOR_FMT", Slot::DstCtrl, self.color_fmt),
            ("DITHER_X_OFFSET", Slot::DstCtrl, self.dither_x),
            ("DITHER_Y_OFFSET", Slot::DstCtrl, self.dither_y),
            ("DITHER_ENB", Slot::DstCtrl, self.dither_enb),
            ("HEIGHT", Slot::Size, self.height),
            ("WIDTH", Slot::Size, self.width),
            ("WRITE_MASK", Slot::BlendEquatAlpha, self.write_mask),
            ("ROP_ENB", Slot::BlendEquatAlpha, self.rop_enb),
            ("BLEND_ROP_MODE", Slot::BlendEquatAlpha, self.rop_mode),
            ("BLEND_ENB", Slot::BlendEquatAlpha, self.blend_enb),
            ("BLEND_SRC_RGB", Slot::BlendEquatAlpha, self.blend_src_rgb),
            ("BLEND_DST_RGB", Slot::BlendEquatAlpha, self.blend_dst_rgb),
            ("BLEND_SRC_ALPHA", Slot::BlendEquatAlpha, self.blend_src_alpha),
            ("BLEND_DST_ALPHA", Slot::BlendEquatAlpha, self.blend_dst_alpha),
            ("BLEND_EQUAT_RGB", Slot::BlendEquatAlpha, self.equat_rgb),
            ("BLEND_EQUAT_ALPHA", Slot::BlendEquatAlpha, self.equat_alpha),
        ]
    }
}

/// Field layout shared by every major-1 revision.
pub const FIELDS_V1: FieldLayout = FieldLayout {
    discard: flag(18),
    src_cpu_enb: flag(7),
    solid_enb: flag(17),
    force_alpha_enb: flag(16),
    force_alpha: Field::new(8, 8),
    read_enb: flag(6),
    color_order: Field::new(2, 4),
    color_fmt: Field::new(4, 0),
    dither_x: Field::new(2, 10),
    dither_y: Field::new(2, 8),
    dither_enb: flag(7),
    height: Field::new(12, 16),
    width: Field::new(12, 0),
    write_mask: Field::new(4, 28),
    rop_enb: flag(27),
    rop_mode: Field::new(4, 23),
    blend_enb: flag(22),
    blend_src_rgb: Field::new(4, 18),
    blend_dst_rgb: Field::new(4, 14),
    blend_src_alpha: Field::new(4, 10),
    blend_dst_alpha: Field::new(4, 6),
    equat_rgb: Field::new(3, 3),
    equat_alpha: Field::new(3, 0),
    word: Field::new(32, 0),
};

/// Where a side's pixels live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferHandle {
    /// No buffer; the side is not read.
    None,
    /// Kernel buffer object handle.
    Gem(u32),
    /// Physical address of the buffer.
    Physical(u32),
}

impl BufferHandle {
    pub fn raw(&self) -> u32 {
        match *self {
            BufferHandle::None => 0,
            BufferHandle::Gem(value) | BufferHandle::Physical(value) => value,
        }
    }
}

impl Default for BufferHandle {
    fn default() -> Self {
        BufferHandle::None
    }
}

/// `buf_type` codes for each buffer backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandleTypes {
    pub none: u32,
    pub gem: u32,
    pub physical: u32,
}

impl HandleTypes {
    pub fn encode(&self, handle: BufferHandle) -> u32 {
        match handle {
            BufferHandle::None => self.none,
            BufferHandle::Gem(_) => self.gem,
            BufferHandle::Physical(_) => self.physical,
        }
    }
}

/// When destination dithering is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DitherRule {
    /// Dither destinations storing fewer than `n` bytes per pixel.
    BytesPerPixelBelow(u32),
    /// Compare the bytes-per-pixel value itself against a bit depth.
    /// Every table format passes, so dithering is always on.
    DepthValueBelow(u32),
}

impl DitherRule {
    pub fn enabled(&self, bytes_per_pixel: u32) -> bool {
        match *self {
            DitherRule::BytesPerPixelBelow(limit) | DitherRule::DepthValueBelow(limit) => {
                bytes_per_pixel < limit
            }
        }
    }
}

/// Negotiated protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Pod, Zeroable)]
#[repr(C)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Version implemented by this encoder.
    pub const fn encoder() -> Self {
        Self::new(G2D_VERSION_MAJOR, G2D_VERSION_MINOR)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Everything that differs between encoding revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProtocolLayout {
    pub revision: Version,
    pub fields: FieldLayout,
    pub handle_types: HandleTypes,
    pub fill_dither: DitherRule,
    pub blit_dither: DitherRule,
}

/// Revision 1.0; an absent buffer is a zeroed descriptor, which shares
/// `buf_type` 0 with GEM.
pub static LAYOUT_V1_0: ProtocolLayout = ProtocolLayout {
    revision: Version::new(1, 0),
    fields: FIELDS_V1,
    handle_types: HandleTypes {
        none: 0,
        gem: 0,
        physical: 1,
    },
    fill_dither: DitherRule::DepthValueBelow(24),
    blit_dither: DitherRule::BytesPerPixelBelow(3),
};

/// Revision 1.1; `buf_type` 0 is reserved for "no buffer".
pub static LAYOUT_V1_1: ProtocolLayout = ProtocolLayout {
    revision: Version::new(1, 1),
    fields: FIELDS_V1,
    handle_types: HandleTypes {
        none: 0,
        gem: 1,
        physical: 2,
    },
    fill_dither: DitherRule::DepthValueBelow(24),
    blit_dither: DitherRule::DepthValueBelow(24),
};

impl ProtocolLayout {
    /// Pick the layout for a device version. Only the major version must
    /// match; minors past the newest known revision use that revision.
    pub fn for_version(version: Version) -> Option<&'static ProtocolLayout> {
        if version.major != G2D_VERSION_MAJOR {
            return None;
        }

        match version.minor {
            0 => Some(&LAYOUT_V1_0),
            _ => Some(&LAYOUT_V1_1),
        }
    }
}
