//! Operation assembly
//!
//! A fill or blit is a fixed sequence of encoder calls. Later calls OR more
//! bits into slots that earlier calls already touched, so the order below is
//! part of the contract. Assembly never sets the run slot; that happens on a
//! copy at submission.

use core::fmt;

use crate::blend::{BlendEquation, RopMode};
use crate::encoder::Encoder;
use crate::image::DrawRequest;
use crate::protocol::{G2dCmd, ProtocolLayout};

/// All four channels writable.
pub const WRITE_MASK_ALL: u32 = 0xf;

/// Operations the engine can assemble.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Fill,
    Blit,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Fill => write!(f, "fill"),
            Operation::Blit => write!(f, "blit"),
        }
    }
}

/// Assemble `op` for `req` into `cmd`, replacing whatever it held.
pub fn assemble(op: Operation, cmd: &mut G2dCmd, layout: &'static ProtocolLayout, req: &DrawRequest) {
    match op {
        Operation::Fill => fill(cmd, layout, req),
        Operation::Blit => blit(cmd, layout, req),
    }
}

/// Solid fill of the destination rectangle with `req.fill_color`.
pub fn fill(cmd: &mut G2dCmd, layout: &'static ProtocolLayout, req: &DrawRequest) {
    let dst = &req.dst;
    let dither = layout.fill_dither.enabled(dst.bytes_per_pixel);

    Encoder::new(cmd, layout)
        .initialize(req)
        .blend_write_mask(WRITE_MASK_ALL)
        .blend_rop_mode(RopMode::Clear, false)
        // Must stay off while the solid color path is active
        .blend_color(req.blend_color, false)
        .image_size(req.width, req.height)
        .solid_color(req.fill_color, true)
        // Nothing is read, but the source format has to be valid
        .src_format(dst.order, dst.format)
        .src_read_enable(false)
        .dst_image(req.width, dst)
        .dst_dither(0, 0, dither)
        .dst_read_enable(false);
}

/// Copy the source rectangle onto the destination, blending with the
/// functions carried by each side.
pub fn blit(cmd: &mut G2dCmd, layout: &'static ProtocolLayout, req: &DrawRequest) {
    let src = &req.src;
    let dst = &req.dst;
    let dither = layout.blit_dither.enabled(dst.bytes_per_pixel);

    Encoder::new(cmd, layout)
        .initialize(req)
        .blend_write_mask(WRITE_MASK_ALL)
        .blend_rop_mode(RopMode::Clear, false)
        .blend_alpha(
            src.blend_func,
            dst.blend_func,
            src.blend_func,
            dst.blend_func,
            BlendEquation::Add,
            BlendEquation::Add,
        )
        .blend_color(req.blend_color, true)
        .image_size(req.width, req.height)
        // Must stay off for a copy
        .solid_color(req.fill_color, false)
        .src_image(req.width, src)
        .src_alpha(0, false)
        .src_read_enable(true)
        .dst_image(req.width, dst)
        .dst_dither(0, 0, dither)
        .dst_read_enable(true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blend::BlendFunction;
    use crate::format::{lookup, SurfaceFormat};
    use crate::image::{argb, ImageObject, BLEND_COLOR_OPAQUE_WHITE};
    use crate::protocol::{BufferHandle, Slot, SlotMask, FIELDS_V1, LAYOUT_V1_0, LAYOUT_V1_1};

    fn request(src: SurfaceFormat, dst: SurfaceFormat) -> DrawRequest {
        let src = ImageObject::new(BufferHandle::Gem(1), 1024, lookup(src).unwrap())
            .with_blend(BlendFunction::SrcAlpha);
        let dst = ImageObject::new(BufferHandle::Gem(2), 2048, lookup(dst).unwrap())
            .with_blend(BlendFunction::OneMinusSrcAlpha);
        DrawRequest {
            width: 64,
            height: 32,
            src,
            dst,
            fill_color: argb(0xff, 0x00, 0xff, 0x00),
            blend_color: BLEND_COLOR_OPAQUE_WHITE,
            flags: 0,
        }
    }

    #[test]
    fn test_fill_slots() {
        let req = request(SurfaceFormat::Argb, SurfaceFormat::Argb);
        let mut cmd = G2dCmd::new();
        fill(&mut cmd, &LAYOUT_V1_0, &req);

        let f = &FIELDS_V1;
        assert_eq!(cmd.field(Slot::Size, f.width), 63);
        assert_eq!(cmd.field(Slot::Size, f.height), 31);
        assert_eq!(cmd.word(Slot::SolidColor), 0xff00_ff00);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.solid_enb), 1);
        assert_eq!(cmd.field(Slot::BlendEquatAlpha, f.blend_enb), 0);
        assert_eq!(cmd.field(Slot::BlendEquatAlpha, f.write_mask), 0xf);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.read_enb), 0);
        assert_eq!(cmd.field(Slot::DstCtrl, f.read_enb), 0);
        assert_eq!(cmd.word(Slot::DstStride), 2048);
        assert_eq!(cmd.word(Slot::DstBlkSize), 256);
        assert!(!cmd.is_written(Slot::Run));
        assert!(!cmd.is_written(Slot::SrcStride));
        assert!(!cmd.is_written(Slot::SrcBlkSize));
    }

    #[test]
    fn test_fill_mirrors_destination_format_into_source() {
        let req = request(SurfaceFormat::Rgb16, SurfaceFormat::Abgr);
        let mut cmd = G2dCmd::new();
        fill(&mut cmd, &LAYOUT_V1_0, &req);

        let f = &FIELDS_V1;
        assert_eq!(cmd.field(Slot::SrcCtrl, f.color_fmt), 13);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.color_order), 2);
    }

    #[test]
    fn test_blit_slots() {
        let req = request(SurfaceFormat::Rgb16, SurfaceFormat::Rgb16);
        let mut cmd = G2dCmd::new();
        blit(&mut cmd, &LAYOUT_V1_0, &req);

        let f = &FIELDS_V1;
        assert_eq!(cmd.field(Slot::SrcCtrl, f.solid_enb), 0);
        assert!(cmd.is_written(Slot::SolidColor));
        assert_eq!(cmd.field(Slot::BlendEquatAlpha, f.blend_enb), 1);
        assert_eq!(cmd.word(Slot::BlendColor), 0xffff_ffff);
        assert_eq!(cmd.field(Slot::BlendEquatAlpha, f.blend_src_rgb), 6);
        assert_eq!(cmd.field(Slot::BlendEquatAlpha, f.blend_dst_rgb), 7);
        assert_eq!(cmd.field(Slot::BlendEquatAlpha, f.blend_src_alpha), 6);
        assert_eq!(cmd.field(Slot::BlendEquatAlpha, f.blend_dst_alpha), 7);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.read_enb), 1);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.force_alpha_enb), 0);
        assert_eq!(cmd.field(Slot::DstCtrl, f.read_enb), 1);
        assert_eq!(cmd.word(Slot::SrcStride), 1024);
        assert_eq!(cmd.word(Slot::SrcBlkSize), 128);
        assert_eq!(cmd.field(Slot::DstCtrl, f.dither_enb), 1);
    }

    #[test]
    fn test_blit_dither_differs_between_revisions() {
        let req = request(SurfaceFormat::Argb, SurfaceFormat::Argb);
        let mut cmd = G2dCmd::new();

        blit(&mut cmd, &LAYOUT_V1_0, &req);
        assert_eq!(cmd.field(Slot::DstCtrl, FIELDS_V1.dither_enb), 0);

        blit(&mut cmd, &LAYOUT_V1_1, &req);
        assert_eq!(cmd.field(Slot::DstCtrl, FIELDS_V1.dither_enb), 1);
    }

    #[test]
    fn test_reassembly_replaces_previous_operation() {
        let req = request(SurfaceFormat::Argb, SurfaceFormat::Argb);
        let mut cmd = G2dCmd::new();
        blit(&mut cmd, &LAYOUT_V1_0, &req);
        fill(&mut cmd, &LAYOUT_V1_0, &req);

        let mut fresh = G2dCmd::new();
        assemble(Operation::Fill, &mut fresh, &LAYOUT_V1_0, &req);
        assert_eq!(cmd, fresh);
        assert!(!cmd.mask().contains(SlotMask::SRC_STRIDE));
    }
}
