//! Command encoder
//!
//! Each operation ORs its fields into one or more slots of the command buffer
//! and marks those slots written. Nothing is ever cleared except by
//! [`Encoder::initialize`], so operations within one cycle accumulate.
//! Values are truncated to their field width.

use crate::blend::{BlendEquation, BlendFunction, RopMode};
use crate::format::{PixelFormat, PixelOrder};
use crate::image::{DrawRequest, ImageObject};
use crate::protocol::{BufferObject, FieldLayout, G2dCmd, ProtocolLayout, Slot};

/// Writes one operation into a command buffer using a protocol revision.
pub struct Encoder<'a> {
    cmd: &'a mut G2dCmd,
    layout: &'static ProtocolLayout,
}

impl<'a> Encoder<'a> {
    pub fn new(cmd: &'a mut G2dCmd, layout: &'static ProtocolLayout) -> Self {
        Self { cmd, layout }
    }

    fn fields(&self) -> &'static FieldLayout {
        &self.layout.fields
    }

    fn buffer_object(&self, img: &ImageObject) -> BufferObject {
        BufferObject {
            buf_type: self.layout.handle_types.encode(img.handle),
            handle: img.handle.raw(),
            offset: img.offset,
        }
    }

    /// Start a new cycle: zero the buffer, copy both buffer objects and the
    /// flags, and program the source control defaults.
    pub fn initialize(&mut self, req: &DrawRequest) -> &mut Self {
        let f = self.fields();

        self.cmd.clear();
        self.cmd.flags = req.flags;
        self.cmd.src = self.buffer_object(&req.src);
        self.cmd.dst = self.buffer_object(&req.dst);

        // Test-only discard off, source from memory rather than the CPU FIFO
        self.cmd
            .set(Slot::SrcCtrl, f.discard.pack(0) | f.src_cpu_enb.pack(0));
        self
    }

    pub fn blend_write_mask(&mut self, mask: u32) -> &mut Self {
        let f = self.fields();
        self.cmd.set(Slot::BlendEquatAlpha, f.write_mask.pack(mask));
        self
    }

    pub fn blend_rop_mode(&mut self, rop: RopMode, enable: bool) -> &mut Self {
        let f = self.fields();
        self.cmd.set(
            Slot::BlendEquatAlpha,
            f.rop_enb.pack(enable as u32) | f.rop_mode.pack(rop as u32),
        );
        self
    }

    pub fn blend_alpha(
        &mut self,
        src_rgb: BlendFunction,
        dst_rgb: BlendFunction,
        src_alpha: BlendFunction,
        dst_alpha: BlendFunction,
        equat_rgb: BlendEquation,
        equat_alpha: BlendEquation,
    ) -> &mut Self {
        let f = self.fields();
        self.cmd.set(
            Slot::BlendEquatAlpha,
            f.blend_src_rgb.pack(src_rgb as u32)
                | f.blend_dst_rgb.pack(dst_rgb as u32)
                | f.blend_src_alpha.pack(src_alpha as u32)
                | f.blend_dst_alpha.pack(dst_alpha as u32)
                | f.equat_rgb.pack(equat_rgb as u32)
                | f.equat_alpha.pack(equat_alpha as u32),
        );
        self
    }

    /// Constant blend color (RGBA8888) and the blend enable bit.
    pub fn blend_color(&mut self, rgba: u32, enable: bool) -> &mut Self {
        let f = self.fields();
        self.cmd.set(Slot::BlendColor, f.word.pack(rgba));
        self.cmd
            .set(Slot::BlendEquatAlpha, f.blend_enb.pack(enable as u32));
        self
    }

    /// Rectangle size; the hardware takes `width - 1` and `height - 1`.
    pub fn image_size(&mut self, width: u32, height: u32) -> &mut Self {
        let f = self.fields();
        self.cmd.set(
            Slot::Size,
            f.height.pack(height.wrapping_sub(1)) | f.width.pack(width.wrapping_sub(1)),
        );
        self
    }

    pub fn src_read_enable(&mut self, enable: bool) -> &mut Self {
        let f = self.fields();
        self.cmd.set(Slot::SrcCtrl, f.read_enb.pack(enable as u32));
        self
    }

    /// Replace the source alpha with `alpha` when `enable` is set.
    pub fn src_alpha(&mut self, alpha: u32, enable: bool) -> &mut Self {
        let f = self.fields();
        self.cmd.set(
            Slot::SrcCtrl,
            f.force_alpha_enb.pack(enable as u32) | f.force_alpha.pack(alpha),
        );
        self
    }

    /// Source color order and format only.
    pub fn src_format(&mut self, order: PixelOrder, format: PixelFormat) -> &mut Self {
        let f = self.fields();
        self.cmd.set(
            Slot::SrcCtrl,
            f.color_order.pack(order as u32) | f.color_fmt.pack(format as u32),
        );
        self
    }

    /// Source stride, row block size and color format.
    pub fn src_image(&mut self, width: u32, img: &ImageObject) -> &mut Self {
        let f = self.fields();
        self.cmd.set(Slot::SrcStride, f.word.pack(img.pitch));
        self.cmd.set(Slot::SrcBlkSize, f.word.pack(img.row_bytes(width)));
        self.src_format(img.order, img.format)
    }

    pub fn dst_read_enable(&mut self, enable: bool) -> &mut Self {
        let f = self.fields();
        self.cmd.set(Slot::DstCtrl, f.read_enb.pack(enable as u32));
        self
    }

    pub fn dst_dither(&mut self, x_offset: u32, y_offset: u32, enable: bool) -> &mut Self {
        let f = self.fields();
        self.cmd.set(
            Slot::DstCtrl,
            f.dither_x.pack(x_offset) | f.dither_y.pack(y_offset) | f.dither_enb.pack(enable as u32),
        );
        self
    }

    /// Destination stride, row block size and color format.
    pub fn dst_image(&mut self, width: u32, img: &ImageObject) -> &mut Self {
        let f = self.fields();
        self.cmd.set(Slot::DstStride, f.word.pack(img.pitch));
        self.cmd.set(Slot::DstBlkSize, f.word.pack(img.row_bytes(width)));
        self.cmd.set(
            Slot::DstCtrl,
            f.color_order.pack(img.order as u32) | f.color_fmt.pack(img.format as u32),
        );
        self
    }

    /// Solid color (ARGB8888) and the solid enable bit.
    pub fn solid_color(&mut self, color: u32, enable: bool) -> &mut Self {
        let f = self.fields();
        self.cmd.set(Slot::SrcCtrl, f.solid_enb.pack(enable as u32));
        self.cmd.set(Slot::SolidColor, f.word.pack(color));
        self
    }

    /// Kick the engine.
    pub fn run(&mut self) -> &mut Self {
        let f = self.fields();
        self.cmd.set(Slot::Run, f.word.pack(1));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{lookup, SurfaceFormat};
    use crate::protocol::{BufferHandle, SlotMask, FIELDS_V1, LAYOUT_V1_0, LAYOUT_V1_1};

    fn image(format: SurfaceFormat, handle: BufferHandle) -> ImageObject {
        ImageObject::new(handle, 256, lookup(format).unwrap())
    }

    #[test]
    fn test_initialize_resets_and_copies_buffers() {
        let mut cmd = G2dCmd::new();
        cmd.set(Slot::SolidColor, 0xdead_beef);

        let req = DrawRequest {
            src: image(SurfaceFormat::Argb, BufferHandle::Gem(4)).at(1, 0),
            dst: image(SurfaceFormat::Argb, BufferHandle::Gem(9)).at(0, 1),
            flags: 0x5a,
            ..Default::default()
        };
        Encoder::new(&mut cmd, &LAYOUT_V1_0).initialize(&req);

        assert_eq!(cmd.word(Slot::SolidColor), 0);
        assert_eq!(cmd.mask(), SlotMask::SRC_CTRL);
        assert_eq!(cmd.word(Slot::SrcCtrl), 0);
        assert_eq!(cmd.flags, 0x5a);
        assert_eq!(cmd.src.handle, 4);
        assert_eq!(cmd.src.offset, 4);
        assert_eq!(cmd.dst.handle, 9);
        assert_eq!(cmd.dst.offset, 256);
        assert_eq!(cmd.dst.buf_type, 0);
    }

    #[test]
    fn test_initialize_uses_revision_handle_types() {
        let req = DrawRequest {
            src: image(SurfaceFormat::Rgb16, BufferHandle::Physical(0x4000_0000)),
            dst: image(SurfaceFormat::Rgb16, BufferHandle::Physical(0x4800_0000)),
            ..Default::default()
        };

        let mut cmd = G2dCmd::new();
        Encoder::new(&mut cmd, &LAYOUT_V1_0).initialize(&req);
        assert_eq!(cmd.src.buf_type, 1);

        Encoder::new(&mut cmd, &LAYOUT_V1_1).initialize(&req);
        assert_eq!(cmd.src.buf_type, 2);
        assert_eq!(cmd.dst.handle, 0x4800_0000);
    }

    #[test]
    fn test_blend_slot_accumulates() {
        let mut cmd = G2dCmd::new();
        Encoder::new(&mut cmd, &LAYOUT_V1_0)
            .blend_write_mask(0xf)
            .blend_rop_mode(RopMode::Copy, true)
            .blend_alpha(
                BlendFunction::SrcAlpha,
                BlendFunction::OneMinusSrcAlpha,
                BlendFunction::One,
                BlendFunction::Zero,
                BlendEquation::Add,
                BlendEquation::Max,
            )
            .blend_color(0x1122_3344, true);

        let word = cmd.word(Slot::BlendEquatAlpha);
        let f = &FIELDS_V1;
        assert_eq!(f.write_mask.unpack(word), 0xf);
        assert_eq!(f.rop_enb.unpack(word), 1);
        assert_eq!(f.rop_mode.unpack(word), RopMode::Copy as u32);
        assert_eq!(f.blend_enb.unpack(word), 1);
        assert_eq!(f.blend_src_rgb.unpack(word), 6);
        assert_eq!(f.blend_dst_rgb.unpack(word), 7);
        assert_eq!(f.blend_src_alpha.unpack(word), 1);
        assert_eq!(f.blend_dst_alpha.unpack(word), 0);
        assert_eq!(f.equat_rgb.unpack(word), 0);
        assert_eq!(f.equat_alpha.unpack(word), 4);
        assert_eq!(cmd.word(Slot::BlendColor), 0x1122_3344);
        assert_eq!(cmd.mask(), SlotMask::BLEND_EQUAT_ALPHA | SlotMask::BLEND_COLOR);
    }

    #[test]
    fn test_image_size_packing() {
        let mut cmd = G2dCmd::new();
        Encoder::new(&mut cmd, &LAYOUT_V1_0).image_size(64, 32);
        assert_eq!(cmd.word(Slot::Size), (31 << 16) | 63);
    }

    #[test]
    fn test_image_size_truncates() {
        let mut cmd = G2dCmd::new();
        // 4097 - 1 = 0x1000 does not fit in 12 bits
        Encoder::new(&mut cmd, &LAYOUT_V1_0).image_size(4097, 1);
        assert_eq!(cmd.word(Slot::Size), 0);

        let mut cmd = G2dCmd::new();
        Encoder::new(&mut cmd, &LAYOUT_V1_0).image_size(0, 0);
        assert_eq!(cmd.word(Slot::Size), 0x0fff_0fff);
    }

    #[test]
    fn test_src_image_and_alpha() {
        let img = image(SurfaceFormat::Rgba4444, BufferHandle::Gem(1));
        let mut cmd = G2dCmd::new();
        Encoder::new(&mut cmd, &LAYOUT_V1_0)
            .src_image(100, &img)
            .src_alpha(0x80, true)
            .src_read_enable(true);

        let f = &FIELDS_V1;
        assert_eq!(cmd.word(Slot::SrcStride), 256);
        assert_eq!(cmd.word(Slot::SrcBlkSize), 200);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.color_order), 1);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.color_fmt), 4);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.force_alpha_enb), 1);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.force_alpha), 0x80);
        assert_eq!(cmd.field(Slot::SrcCtrl, f.read_enb), 1);
    }

    #[test]
    fn test_dst_image_and_dither() {
        let img = image(SurfaceFormat::Abgr, BufferHandle::Gem(1));
        let mut cmd = G2dCmd::new();
        Encoder::new(&mut cmd, &LAYOUT_V1_0)
            .dst_image(10, &img)
            .dst_dither(3, 2, true)
            .dst_read_enable(false);

        let f = &FIELDS_V1;
        assert_eq!(cmd.word(Slot::DstStride), 256);
        assert_eq!(cmd.word(Slot::DstBlkSize), 40);
        assert_eq!(cmd.field(Slot::DstCtrl, f.color_order), 2);
        assert_eq!(cmd.field(Slot::DstCtrl, f.color_fmt), 13);
        assert_eq!(cmd.field(Slot::DstCtrl, f.dither_x), 3);
        assert_eq!(cmd.field(Slot::DstCtrl, f.dither_y), 2);
        assert_eq!(cmd.field(Slot::DstCtrl, f.dither_enb), 1);
        assert_eq!(cmd.field(Slot::DstCtrl, f.read_enb), 0);
        assert!(cmd.is_written(Slot::DstCtrl));
        assert!(!cmd.is_written(Slot::SrcCtrl));
    }

    #[test]
    fn test_solid_color_and_run() {
        let mut cmd = G2dCmd::new();
        Encoder::new(&mut cmd, &LAYOUT_V1_0)
            .solid_color(0xff00_ff00, true)
            .run();

        assert_eq!(cmd.field(Slot::SrcCtrl, FIELDS_V1.solid_enb), 1);
        assert_eq!(cmd.word(Slot::SolidColor), 0xff00_ff00);
        assert_eq!(cmd.word(Slot::Run), 1);
    }
}
