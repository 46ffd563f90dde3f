//! Register bitfields
//!
//! Every command slot is a 32-bit word assembled from fixed-width fields.
//! Values wider than their field are truncated to the field width; the
//! hardware never sees the overflow.

/// A `width`-bit field starting at bit `shift` of a command word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub width: u32,
    pub shift: u32,
}

impl Field {
    pub const fn new(width: u32, shift: u32) -> Self {
        assert!(width > 0 && width + shift <= 32, "field does not fit a 32-bit word");
        Self { width, shift }
    }

    /// Unshifted mask covering `width` bits.
    pub const fn mask(self) -> u32 {
        if self.width >= 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        }
    }

    /// Truncate `value` to the field width and move it into place.
    pub const fn pack(self, value: u32) -> u32 {
        (value & self.mask()) << self.shift
    }

    /// Extract the field from a full command word.
    pub const fn unpack(self, word: u32) -> u32 {
        (word >> self.shift) & self.mask()
    }

    /// Merge `value` into `word`, keeping any bits already set.
    pub const fn merge(self, word: u32, value: u32) -> u32 {
        word | self.pack(value)
    }
}

/// Single-bit field helper for flags.
pub const fn flag(shift: u32) -> Field {
    Field::new(1, shift)
}
