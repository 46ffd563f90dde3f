//! Driver configuration

use core::convert::Infallible;
use core::fmt;
use core::str::FromStr;

use log::warn;

use crate::FB_ACCEL_ID_G2D;

/// Graphics system the host is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemType {
    /// DRM/KMS; surfaces are kernel buffer objects.
    DrmKms,
    /// Framebuffer device; surfaces are addressed physically.
    FbDev,
    /// Raw memory mapping, not supported by the engine.
    DevMem,
    Other,
}

/// How surfaces are handed to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferBackend {
    Gem,
    Physical,
}

impl SystemType {
    /// Buffer backend for this system, if the engine can be used at all.
    pub fn backend(&self) -> Option<BufferBackend> {
        match self {
            SystemType::DrmKms => Some(BufferBackend::Gem),
            SystemType::FbDev => Some(BufferBackend::Physical),
            SystemType::DevMem | SystemType::Other => None,
        }
    }
}

impl FromStr for SystemType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_lowercase().as_str() {
            "drmkms" => SystemType::DrmKms,
            "fbdev" => SystemType::FbDev,
            "devmem" => SystemType::DevMem,
            _ => SystemType::Other,
        })
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SystemType::DrmKms => write!(f, "drmkms"),
            SystemType::FbDev => write!(f, "fbdev"),
            SystemType::DevMem => write!(f, "devmem"),
            SystemType::Other => write!(f, "other"),
        }
    }
}

/// Acceleration driver configuration
#[derive(Debug, Clone)]
pub struct AccelConfig {
    /// Host graphics system
    pub system: SystemType,
    /// Accelerator id the driver binds to
    pub accelerator: u32,
}

impl Default for AccelConfig {
    fn default() -> Self {
        Self {
            system: SystemType::DrmKms,
            accelerator: FB_ACCEL_ID_G2D,
        }
    }
}

impl AccelConfig {
    /// Read `G2D_SYSTEM` and `G2D_ACCELERATOR` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup. Unset keys keep
    /// their defaults; unparsable values are reported and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(val) = lookup("G2D_SYSTEM") {
            let Ok(system) = val.parse::<SystemType>();
            config.system = system;
        }

        if let Some(val) = lookup("G2D_ACCELERATOR") {
            match parse_u32(&val) {
                Some(n) => config.accelerator = n,
                None => warn!("G2D: ignoring invalid G2D_ACCELERATOR '{}'", val),
            }
        }

        config
    }
}

/// Decimal or `0x` prefixed hexadecimal.
fn parse_u32(s: &str) -> Option<u32> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AccelConfig::from_lookup(|_| None);
        assert_eq!(config.system, SystemType::DrmKms);
        assert_eq!(config.accelerator, 0x3220);
    }

    #[test]
    fn test_system_parsing() {
        assert_eq!("drmkms".parse::<SystemType>().unwrap(), SystemType::DrmKms);
        assert_eq!("FBDev".parse::<SystemType>().unwrap(), SystemType::FbDev);
        assert_eq!("devmem".parse::<SystemType>().unwrap(), SystemType::DevMem);
        assert_eq!("x11".parse::<SystemType>().unwrap(), SystemType::Other);
        assert_eq!(SystemType::FbDev.to_string(), "fbdev");
    }

    #[test]
    fn test_backend_per_system() {
        assert_eq!(SystemType::DrmKms.backend(), Some(BufferBackend::Gem));
        assert_eq!(SystemType::FbDev.backend(), Some(BufferBackend::Physical));
        assert_eq!(SystemType::DevMem.backend(), None);
        assert_eq!(SystemType::Other.backend(), None);
    }

    #[test]
    fn test_from_lookup() {
        let config = AccelConfig::from_lookup(lookup_from(&[
            ("G2D_SYSTEM", "fbdev"),
            ("G2D_ACCELERATOR", "0x3221"),
        ]));
        assert_eq!(config.system, SystemType::FbDev);
        assert_eq!(config.accelerator, 0x3221);

        let config = AccelConfig::from_lookup(lookup_from(&[("G2D_ACCELERATOR", "12832")]));
        assert_eq!(config.accelerator, 0x3220);

        let config = AccelConfig::from_lookup(lookup_from(&[("G2D_ACCELERATOR", "fast")]));
        assert_eq!(config.accelerator, FB_ACCEL_ID_G2D);
    }

    #[test]
    fn test_from_lookup_unknown_system() {
        let config = AccelConfig::from_lookup(lookup_from(&[("G2D_SYSTEM", "x11")]));
        assert_eq!(config.system, SystemType::Other);
        assert_eq!(config.system.backend(), None);
    }
}
