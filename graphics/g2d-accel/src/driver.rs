//! Acceleration driver
//!
//! [`AccelDriver`] is what the host talks to: it checks whether a request can
//! be accelerated, brings the hardware state up to date for a function, and
//! issues fills and blits through the G2D context.

use log::{debug, error, info};
use spin::Mutex;

use g2d::{DrawRequest, G2dContext, G2dDevice, ImageObject, Version, BLEND_COLOR_OPAQUE_WHITE};

use crate::check;
use crate::config::{AccelConfig, BufferBackend, SystemType};
use crate::state::{AccelMask, CardState, Rectangle, StateModification};
use crate::validate::{StateGroup, ValidationCache};
use crate::{Error, Result, DRIVER_NAME};

/// Groups `set_state` must validate for `accel`, destination excluded.
fn required_groups(accel: AccelMask) -> Option<&'static [StateGroup]> {
    if accel == AccelMask::FILL_RECTANGLE {
        Some(&[StateGroup::Color, StateGroup::Blend])
    } else if accel == AccelMask::BLIT {
        Some(&[
            StateGroup::Source,
            StateGroup::Color,
            StateGroup::Blend,
            StateGroup::Clip,
        ])
    } else {
        None
    }
}

struct Inner<D: G2dDevice> {
    ctx: G2dContext<D>,
    cache: ValidationCache,
}

/// G2D acceleration driver
pub struct AccelDriver<D: G2dDevice> {
    system: SystemType,
    inner: Mutex<Inner<D>>,
}

impl<D: G2dDevice> AccelDriver<D> {
    /// Open the driver on `device`.
    pub fn open(config: &AccelConfig, device: D) -> Result<Self> {
        debug!("G2D: open on {}", config.system);

        let backend = match config.system.backend() {
            Some(backend) => backend,
            None => {
                error!("G2D: not supported on {}", config.system);
                return Err(Error::UnsupportedSystem(config.system));
            }
        };

        let ctx = G2dContext::open(device)?;
        info!(
            "{}: encoder {} device {}, {:?} buffers",
            DRIVER_NAME,
            Version::encoder(),
            ctx.version(),
            backend
        );

        Ok(Self {
            system: config.system,
            inner: Mutex::new(Inner {
                ctx,
                cache: ValidationCache::new(backend),
            }),
        })
    }

    pub fn system(&self) -> SystemType {
        self.system
    }

    pub fn backend(&self) -> BufferBackend {
        self.inner.lock().cache.backend()
    }

    /// Version negotiated at open.
    pub fn version(&self) -> Version {
        self.inner.lock().ctx.version()
    }

    /// See [`check::check_state`].
    pub fn check_state(&self, state: &mut CardState, accel: AccelMask) -> bool {
        check::check_state(state, accel)
    }

    /// Program the hardware state for `accel`.
    ///
    /// Groups touched by `state.modified` are invalidated, then every group
    /// `accel` needs is validated. On success `accel` is recorded in
    /// `state.set`. Modification flags are cleared either way.
    pub fn set_state(&self, state: &mut CardState, accel: AccelMask) -> Result<()> {
        let mut inner = self.inner.lock();
        let cache = &mut inner.cache;
        let modified = state.modified;

        debug!(
            "G2D: set {:?} (accel {:?}) modified {:?}",
            accel, state.accel, modified
        );

        if modified == StateModification::ALL {
            cache.invalidate_all();
        } else if !modified.is_empty() {
            if modified.contains(StateModification::DESTINATION) {
                cache.invalidate(StateGroup::Destination);
            }
            if modified.contains(StateModification::SOURCE) && state.source.is_some() {
                cache.invalidate(StateGroup::Source);
            }
            if modified.contains(StateModification::COLOR) {
                cache.invalidate(StateGroup::Color);
            }
            if modified.intersects(
                StateModification::SRC_BLEND
                    | StateModification::DST_BLEND
                    | StateModification::DRAWING_FLAGS
                    | StateModification::BLITTING_FLAGS,
            ) {
                cache.invalidate(StateGroup::Blend);
            }
            if modified.contains(StateModification::CLIP) {
                cache.invalidate(StateGroup::Clip);
            }
        }

        let result = Self::validate(cache, state, accel);
        state.modified = StateModification::empty();
        result
    }

    fn validate(cache: &mut ValidationCache, state: &mut CardState, accel: AccelMask) -> Result<()> {
        // A cached source may describe a surface the host has since dropped
        if accel == AccelMask::BLIT && state.source.is_none() {
            error!("G2D: {:?} without source", accel);
            state.set.remove(accel);
            return Err(Error::MissingSource);
        }

        cache.get_or_derive(StateGroup::Destination, state)?;

        let groups = match required_groups(accel) {
            Some(groups) => groups,
            None => {
                error!("G2D: unexpected drawing/blitting function {:?}", accel);
                return Ok(());
            }
        };

        debug!("G2D: -> {:?}", accel);
        for group in groups {
            cache.get_or_derive(*group, state)?;
        }

        state.set |= accel;
        Ok(())
    }

    /// Fill `rect` of the destination with the current color.
    pub fn fill_rectangle(&self, rect: &Rectangle) -> Result<usize> {
        let mut inner = self.inner.lock();
        let Inner { ctx, cache } = &mut *inner;

        let dst = cache.destination()?.at(rect.x, rect.y);
        let color = cache.color()?;
        // Fill never reads the source; without one the descriptor says so
        let src = match cache.source() {
            Ok(src) => src,
            Err(Error::NotValidated(StateGroup::Source)) => ImageObject::default(),
            Err(err) => return Err(err),
        };

        debug!(
            "G2D: fill color:{:#x}, L:{} T:{} W:{} H:{}, {}bpp, {}pitch",
            color.to_argb(),
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            dst.bytes_per_pixel * 8,
            dst.pitch
        );

        let req = DrawRequest {
            width: rect.w,
            height: rect.h,
            src,
            dst,
            fill_color: color.to_argb(),
            blend_color: BLEND_COLOR_OPAQUE_WHITE,
            flags: 0,
        };
        Ok(ctx.fill(&req)?)
    }

    /// Blend `rect` of the source onto the destination at `(dx, dy)`.
    pub fn blit(&self, rect: &Rectangle, dx: u32, dy: u32) -> Result<usize> {
        let mut inner = self.inner.lock();
        let Inner { ctx, cache } = &mut *inner;

        let (src_blend, dst_blend) = cache.blend()?;
        let src: ImageObject = cache.source()?.at(rect.x, rect.y).with_blend(src_blend);
        let dst = cache.destination()?.at(dx, dy).with_blend(dst_blend);
        let color = cache.color()?;

        debug!(
            "G2D: blit X:{} Y:{}, L:{} T:{} W:{} H:{}",
            dx, dy, rect.x, rect.y, rect.w, rect.h
        );

        let req = DrawRequest {
            width: rect.w,
            height: rect.h,
            src,
            dst,
            fill_color: color.to_argb(),
            blend_color: BLEND_COLOR_OPAQUE_WHITE,
            flags: 0,
        };
        Ok(ctx.blit(&req)?)
    }

    /// Wait until the engine is idle.
    pub fn engine_sync(&self) -> Result<usize> {
        debug!("G2D: sync");
        Ok(self.inner.lock().ctx.sync()?)
    }

    /// How many times `group` has been derived since open.
    pub fn derivations(&self, group: StateGroup) -> usize {
        self.inner.lock().cache.derivations(group)
    }

    pub fn is_valid(&self, group: StateGroup) -> bool {
        self.inner.lock().cache.is_valid(group)
    }

    /// Run `f` with the device.
    pub fn with_device<R>(&self, f: impl FnOnce(&mut D) -> R) -> R {
        f(self.inner.lock().ctx.device_mut())
    }

    /// Close the driver and hand the device back.
    pub fn close(self) -> D {
        debug!("G2D: close");
        self.inner.into_inner().ctx.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{Color, Surface};
    use g2d::{SimulatedDevice, Slot, SurfaceFormat};

    fn driver() -> AccelDriver<SimulatedDevice> {
        AccelDriver::open(&AccelConfig::default(), SimulatedDevice::default()).unwrap()
    }

    #[test]
    fn test_open_rejects_devmem() {
        let config = AccelConfig {
            system: SystemType::DevMem,
            ..Default::default()
        };
        let err = AccelDriver::open(&config, SimulatedDevice::default()).err().unwrap();
        assert!(matches!(err, Error::UnsupportedSystem(SystemType::DevMem)));
    }

    #[test]
    fn test_draw_before_validation() {
        let drv = driver();
        let err = drv.fill_rectangle(&Rectangle::new(0, 0, 4, 4)).unwrap_err();
        assert!(matches!(err, Error::NotValidated(StateGroup::Destination)));
    }

    #[test]
    fn test_fill_uses_current_color() {
        let drv = driver();
        let mut state = CardState::new(Surface::new(SurfaceFormat::Argb, 4096).with_gem(7));
        state.color = Color::new(0xff, 0x10, 0x20, 0x30);

        drv.set_state(&mut state, AccelMask::FILL_RECTANGLE).unwrap();
        assert!(state.modified.is_empty());
        assert!(state.set.contains(AccelMask::FILL_RECTANGLE));

        drv.fill_rectangle(&Rectangle::new(2, 3, 10, 10)).unwrap();
        let cmd = drv.with_device(|dev| dev.executed()[0]);
        assert_eq!(cmd.word(Slot::SolidColor), 0xff10_2030);
        assert_eq!(cmd.dst.handle, 7);
        assert_eq!(cmd.dst.offset, 2 * 4 + 3 * 4096);
    }

    #[test]
    fn test_unexpected_function_sets_nothing() {
        let drv = driver();
        let mut state = CardState::new(Surface::new(SurfaceFormat::Argb, 4096));
        drv.set_state(&mut state, AccelMask::DRAW_LINE).unwrap();
        assert!(state.set.is_empty());
        assert!(drv.is_valid(StateGroup::Destination));
        assert!(!drv.is_valid(StateGroup::Color));
    }
}
