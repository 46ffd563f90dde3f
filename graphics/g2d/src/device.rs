//! Device transport
//!
//! The engine is driven through three synchronous calls. [`G2dDevice`] is the
//! seam between the encoder and whatever carries those calls to the kernel;
//! [`SimulatedDevice`] answers them in memory.

use core::fmt;

use syscall::error::{Error, Result, EIO};

use crate::protocol::{G2dCmd, Version};

/// Synchronous calls understood by the G2D device.
pub trait G2dDevice {
    /// Protocol version implemented by the device.
    fn get_version(&mut self) -> Result<Version>;

    /// Execute a command buffer. Returns the device status.
    fn exec(&mut self, cmd: &G2dCmd) -> Result<usize>;

    /// Block until the engine has finished everything submitted so far.
    fn sync(&mut self, cmd: &G2dCmd) -> Result<usize>;
}

impl<D: G2dDevice + ?Sized> G2dDevice for &mut D {
    fn get_version(&mut self) -> Result<Version> {
        (**self).get_version()
    }

    fn exec(&mut self, cmd: &G2dCmd) -> Result<usize> {
        (**self).exec(cmd)
    }

    fn sync(&mut self, cmd: &G2dCmd) -> Result<usize> {
        (**self).sync(cmd)
    }
}

/// Name of a device call, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceCall {
    GetVersion,
    Exec,
    Sync,
}

impl DeviceCall {
    pub fn name(&self) -> &'static str {
        match self {
            DeviceCall::GetVersion => "GET_VER",
            DeviceCall::Exec => "DMA_EXEC",
            DeviceCall::Sync => "DMA_SYNC",
        }
    }
}

impl fmt::Display for DeviceCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// In-memory device.
///
/// Reports a fixed version, keeps every buffer it is handed and can be told
/// to fail a call with a given errno.
#[derive(Debug)]
pub struct SimulatedDevice {
    version: Version,
    failures: Vec<(DeviceCall, i32)>,
    executed: Vec<G2dCmd>,
    synced: Vec<G2dCmd>,
    version_queries: usize,
}

impl SimulatedDevice {
    pub fn new(version: Version) -> Self {
        Self {
            version,
            failures: Vec::new(),
            executed: Vec::new(),
            synced: Vec::new(),
            version_queries: 0,
        }
    }

    /// Fail every later `call` with `errno` until [`Self::clear_failures`].
    pub fn fail(&mut self, call: DeviceCall, errno: i32) {
        self.failures.retain(|(c, _)| *c != call);
        self.failures.push((call, errno));
    }

    /// Fail every later `call` with `EIO`.
    pub fn fail_io(&mut self, call: DeviceCall) {
        self.fail(call, EIO);
    }

    pub fn clear_failures(&mut self) {
        self.failures.clear();
    }

    /// Buffers passed to `exec`, oldest first.
    pub fn executed(&self) -> &[G2dCmd] {
        &self.executed
    }

    /// Buffers passed to `sync`, oldest first.
    pub fn synced(&self) -> &[G2dCmd] {
        &self.synced
    }

    pub fn version_queries(&self) -> usize {
        self.version_queries
    }

    fn check(&self, call: DeviceCall) -> Result<()> {
        match self.failures.iter().find(|(c, _)| *c == call) {
            Some((_, errno)) => Err(Error::new(*errno)),
            None => Ok(()),
        }
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new(Version::encoder())
    }
}

impl G2dDevice for SimulatedDevice {
    fn get_version(&mut self) -> Result<Version> {
        self.version_queries += 1;
        self.check(DeviceCall::GetVersion)?;
        Ok(self.version)
    }

    fn exec(&mut self, cmd: &G2dCmd) -> Result<usize> {
        self.check(DeviceCall::Exec)?;
        self.executed.push(*cmd);
        Ok(0)
    }

    fn sync(&mut self, cmd: &G2dCmd) -> Result<usize> {
        self.check(DeviceCall::Sync)?;
        self.synced.push(*cmd);
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use syscall::error::EBUSY;

    #[test]
    fn test_call_names() {
        assert_eq!(DeviceCall::GetVersion.to_string(), "GET_VER");
        assert_eq!(DeviceCall::Exec.to_string(), "DMA_EXEC");
        assert_eq!(DeviceCall::Sync.to_string(), "DMA_SYNC");
    }

    #[test]
    fn test_records_buffers() {
        let mut dev = SimulatedDevice::default();
        let mut cmd = G2dCmd::new();
        cmd.flags = 3;
        assert_eq!(dev.exec(&cmd).unwrap(), 0);
        assert_eq!(dev.sync(&cmd).unwrap(), 0);
        assert_eq!(dev.executed().len(), 1);
        assert_eq!(dev.synced()[0].flags, 3);
        assert_eq!(dev.get_version().unwrap(), Version::new(1, 0));
        assert_eq!(dev.version_queries(), 1);
    }

    #[test]
    fn test_failure_injection() {
        let mut dev = SimulatedDevice::default();
        dev.fail(DeviceCall::Exec, EBUSY);
        let err = dev.exec(&G2dCmd::new()).unwrap_err();
        assert_eq!(err.errno, EBUSY);
        assert!(dev.executed().is_empty());
        assert!(dev.sync(&G2dCmd::new()).is_ok());

        dev.clear_failures();
        assert!(dev.exec(&G2dCmd::new()).is_ok());
    }
}
