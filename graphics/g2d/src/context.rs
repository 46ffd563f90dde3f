//! Device context
//!
//! A [`G2dContext`] owns the device, the negotiated protocol layout and the
//! command buffer that operations are assembled into. Every operation takes
//! `&mut self`, so a context has exactly one writer at a time.

use log::{error, info, trace};

use crate::assembler::{self, Operation};
use crate::device::{DeviceCall, G2dDevice};
use crate::image::DrawRequest;
use crate::protocol::{G2dCmd, ProtocolLayout, Slot, Version, G2D_VERSION_MAJOR};
use crate::{Error, Result};

/// An open G2D device.
pub struct G2dContext<D: G2dDevice> {
    device: D,
    version: Version,
    layout: &'static ProtocolLayout,
    cmd: G2dCmd,
}

impl<D: G2dDevice> G2dContext<D> {
    /// Query the device version and pick the matching protocol layout.
    ///
    /// Fails if the device speaks another major version. A different minor
    /// version is only reported.
    pub fn open(mut device: D) -> Result<Self> {
        let encoder = Version::encoder();

        let version = device.get_version().map_err(|err| {
            error!("G2D: {} failed: {}", DeviceCall::GetVersion, err);
            Error::Device {
                call: DeviceCall::GetVersion,
                err,
            }
        })?;

        let layout = match ProtocolLayout::for_version(version) {
            Some(layout) => layout,
            None => {
                error!(
                    "G2D: unsupported version, encoder {} device {}",
                    encoder, version
                );
                return Err(Error::VersionMismatch {
                    expected: G2D_VERSION_MAJOR,
                    found: version,
                });
            }
        };

        if version.minor != encoder.minor {
            info!(
                "G2D: encoder {} device {}, using revision {}",
                encoder, version, layout.revision
            );
        } else {
            info!("G2D: version {}", version);
        }

        Ok(Self {
            device,
            version,
            layout,
            cmd: G2dCmd::new(),
        })
    }

    /// Version reported by the device at open.
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn layout(&self) -> &'static ProtocolLayout {
        self.layout
    }

    /// Buffer assembled by the last operation.
    pub fn command(&self) -> &G2dCmd {
        &self.cmd
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Fill `req.dst` with `req.fill_color`.
    pub fn fill(&mut self, req: &DrawRequest) -> Result<usize> {
        self.run(Operation::Fill, req)
    }

    /// Blend `req.src` onto `req.dst`.
    pub fn blit(&mut self, req: &DrawRequest) -> Result<usize> {
        self.run(Operation::Blit, req)
    }

    pub fn run(&mut self, op: Operation, req: &DrawRequest) -> Result<usize> {
        assembler::assemble(op, &mut self.cmd, self.layout, req);
        self.submit()
    }

    /// Wait for the engine to go idle.
    ///
    /// The current buffer is handed to the device as is.
    pub fn sync(&mut self) -> Result<usize> {
        self.device.sync(&self.cmd).map_err(|err| {
            error!("G2D: {} failed: {}", DeviceCall::Sync, err);
            Error::Device {
                call: DeviceCall::Sync,
                err,
            }
        })
    }

    /// Release the context and return the device.
    pub fn close(self) -> D {
        self.device
    }

    // The device sees a copy with the run slot set; the assembled buffer is
    // left as it was.
    fn submit(&mut self) -> Result<usize> {
        let mut arg = self.cmd;
        arg.set(Slot::Run, 1);

        if log::log_enabled!(log::Level::Trace) {
            for slot in Slot::ALL {
                if arg.is_written(slot) {
                    trace!("G2D: {:?} = {:#010x}", slot, arg.word(slot));
                }
            }
        }

        self.device.exec(&arg).map_err(|err| {
            error!("G2D: {} failed: {}", DeviceCall::Exec, err);
            Error::Device {
                call: DeviceCall::Exec,
                err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::SimulatedDevice;
    use crate::format::{lookup, SurfaceFormat};
    use crate::image::ImageObject;
    use crate::protocol::{BufferHandle, LAYOUT_V1_0, LAYOUT_V1_1};

    fn request() -> DrawRequest {
        let dst = ImageObject::new(
            BufferHandle::Gem(5),
            256,
            lookup(SurfaceFormat::Rgb16).unwrap(),
        );
        DrawRequest {
            width: 8,
            height: 8,
            dst,
            src: dst,
            fill_color: 0xff12_3456,
            ..Default::default()
        }
    }

    #[test]
    fn test_open_selects_layout() {
        let ctx = G2dContext::open(SimulatedDevice::new(Version::new(1, 0))).unwrap();
        assert_eq!(ctx.version(), Version::new(1, 0));
        assert_eq!(ctx.layout(), &LAYOUT_V1_0);

        let ctx = G2dContext::open(SimulatedDevice::new(Version::new(1, 3))).unwrap();
        assert_eq!(ctx.layout(), &LAYOUT_V1_1);
    }

    #[test]
    fn test_submit_sets_run_on_copy_only() {
        let mut ctx = G2dContext::open(SimulatedDevice::default()).unwrap();
        ctx.fill(&request()).unwrap();

        assert!(!ctx.command().is_written(Slot::Run));
        let sent = ctx.device().executed()[0];
        assert_eq!(sent.word(Slot::Run), 1);
        assert!(sent.is_written(Slot::Run));
    }

    #[test]
    fn test_sync_sends_current_buffer() {
        let mut ctx = G2dContext::open(SimulatedDevice::default()).unwrap();
        ctx.fill(&request()).unwrap();
        ctx.sync().unwrap();

        let dev = ctx.close();
        assert_eq!(dev.synced().len(), 1);
        assert_eq!(dev.synced()[0].word(Slot::SolidColor), 0xff12_3456);
        assert_eq!(dev.synced()[0].word(Slot::Run), 0);
    }
}
