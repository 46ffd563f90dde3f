//! Capability check
//!
//! Decides per request whether the engine can do the work or the host must
//! fall back to software. Formats are checked against the same table the
//! encoder uses, so anything accepted here can be derived later.

use log::debug;

use g2d::format;
use g2d::SurfaceFormat;

use crate::state::{AccelMask, BlittingFlags, CardState, DrawingFlags};

/// Drawing functions the engine accelerates.
pub const SUPPORTED_DRAWING_FUNCTIONS: AccelMask = AccelMask::FILL_RECTANGLE;
/// Drawing flags the engine honours.
pub const SUPPORTED_DRAWING_FLAGS: DrawingFlags = DrawingFlags::NOFX;
/// Blitting functions the engine accelerates.
pub const SUPPORTED_BLITTING_FUNCTIONS: AccelMask = AccelMask::BLIT;
/// Blitting flags the engine honours.
pub const SUPPORTED_BLITTING_FLAGS: BlittingFlags = BlittingFlags::NOFX;

fn format_usable(surface: SurfaceFormat) -> bool {
    !surface.is_yuv() && format::is_supported(surface)
}

/// Mark the functions in `accel` the engine can perform for `state` by
/// OR-ing them into `state.accel`. Returns whether all of `accel` is
/// accelerated.
pub fn check_state(state: &mut CardState, accel: AccelMask) -> bool {
    let dst_format = state.destination.format;
    let src_format = if accel.is_blitting() {
        match state.source {
            Some(source) => Some(source.format),
            None => {
                debug!("G2D: {:?} without source, SW", accel);
                return false;
            }
        }
    } else {
        None
    };

    debug!(
        "G2D: check {:?} drawing {:?} blitting {:?}: {} -> {}",
        accel,
        state.drawing_flags,
        state.blitting_flags,
        src_format.map(|f| f.name()).unwrap_or("None"),
        dst_format
    );

    if let Some(src) = src_format {
        if !format_usable(src) {
            debug!("G2D: source {} unsupported, SW", src);
            return false;
        }
    }

    if !format_usable(dst_format) {
        debug!("G2D: destination {} unsupported, SW", dst_format);
        return false;
    }

    if SUPPORTED_DRAWING_FUNCTIONS.contains(accel)
        && SUPPORTED_DRAWING_FLAGS.contains(state.drawing_flags)
    {
        state.accel |= SUPPORTED_DRAWING_FUNCTIONS;
    }

    // No format conversion on blit
    if SUPPORTED_BLITTING_FUNCTIONS.contains(accel)
        && SUPPORTED_BLITTING_FLAGS.contains(state.blitting_flags)
        && src_format == Some(dst_format)
    {
        state.accel |= SUPPORTED_BLITTING_FUNCTIONS;
    }

    let accelerated = !accel.is_empty() && state.accel.contains(accel);
    debug!(
        "G2D: {:?} (state {:?}) {}",
        accel,
        state.accel,
        if accelerated { "G2D" } else { "SW" }
    );
    accelerated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Surface;

    fn state(dst: SurfaceFormat, src: Option<SurfaceFormat>) -> CardState {
        let mut state = CardState::new(Surface::new(dst, 1024));
        state.source = src.map(|f| Surface::new(f, 1024));
        state
    }

    #[test]
    fn test_fill_supported_destination() {
        let mut s = state(SurfaceFormat::Rgb16, None);
        assert!(check_state(&mut s, AccelMask::FILL_RECTANGLE));
        assert_eq!(s.accel, AccelMask::FILL_RECTANGLE);
    }

    #[test]
    fn test_fill_ignores_source_format() {
        let mut s = state(SurfaceFormat::Argb, Some(SurfaceFormat::Nv12));
        assert!(check_state(&mut s, AccelMask::FILL_RECTANGLE));
    }

    #[test]
    fn test_fill_rejects_yuv_and_unknown_destination() {
        let mut s = state(SurfaceFormat::Yuy2, None);
        assert!(!check_state(&mut s, AccelMask::FILL_RECTANGLE));
        assert!(s.accel.is_empty());

        let mut s = state(SurfaceFormat::Lut8, None);
        assert!(!check_state(&mut s, AccelMask::FILL_RECTANGLE));
    }

    #[test]
    fn test_fill_rejects_effects() {
        let mut s = state(SurfaceFormat::Argb, None);
        s.drawing_flags = DrawingFlags::BLEND;
        assert!(!check_state(&mut s, AccelMask::FILL_RECTANGLE));
    }

    #[test]
    fn test_blit_requires_matching_formats() {
        let mut s = state(SurfaceFormat::Argb, Some(SurfaceFormat::Argb));
        assert!(check_state(&mut s, AccelMask::BLIT));
        assert!(s.accel.contains(AccelMask::BLIT));

        let mut s = state(SurfaceFormat::Argb, Some(SurfaceFormat::Abgr));
        assert!(!check_state(&mut s, AccelMask::BLIT));
        assert!(!s.accel.contains(AccelMask::BLIT));
    }

    #[test]
    fn test_blit_rejects_yuv_source_and_effects() {
        let mut s = state(SurfaceFormat::Argb, Some(SurfaceFormat::I420));
        assert!(!check_state(&mut s, AccelMask::BLIT));

        let mut s = state(SurfaceFormat::Argb, Some(SurfaceFormat::Argb));
        s.blitting_flags = BlittingFlags::BLEND_ALPHACHANNEL;
        assert!(!check_state(&mut s, AccelMask::BLIT));
    }

    #[test]
    fn test_unsupported_functions() {
        let mut s = state(SurfaceFormat::Argb, Some(SurfaceFormat::Argb));
        assert!(!check_state(&mut s, AccelMask::STRETCH_BLIT));
        assert!(!check_state(&mut s, AccelMask::DRAW_LINE));
        assert!(s.accel.is_empty());
    }
}
