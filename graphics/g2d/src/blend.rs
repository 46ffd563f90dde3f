//! Blend functions, equations and raster operations
//!
//! The host describes blending with its own function enumeration; the engine
//! has a 4-bit blend function code per factor and a 3-bit equation code.

/// Host surface blend function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum SurfaceBlendFunction {
    Unknown = 0,
    Zero = 1,
    One = 2,
    SrcColor = 3,
    InvSrcColor = 4,
    SrcAlpha = 5,
    InvSrcAlpha = 6,
    DestAlpha = 7,
    InvDestAlpha = 8,
    DestColor = 9,
    InvDestColor = 10,
    SrcAlphaSat = 11,
    ConstColor = 12,
    InvConstColor = 13,
    ConstAlpha = 14,
    InvConstAlpha = 15,
}

impl SurfaceBlendFunction {
    /// Every function with a hardware counterpart.
    pub const SUPPORTED: [SurfaceBlendFunction; 15] = [
        SurfaceBlendFunction::Zero,
        SurfaceBlendFunction::One,
        SurfaceBlendFunction::SrcColor,
        SurfaceBlendFunction::InvSrcColor,
        SurfaceBlendFunction::SrcAlpha,
        SurfaceBlendFunction::InvSrcAlpha,
        SurfaceBlendFunction::DestAlpha,
        SurfaceBlendFunction::InvDestAlpha,
        SurfaceBlendFunction::DestColor,
        SurfaceBlendFunction::InvDestColor,
        SurfaceBlendFunction::SrcAlphaSat,
        SurfaceBlendFunction::ConstColor,
        SurfaceBlendFunction::InvConstColor,
        SurfaceBlendFunction::ConstAlpha,
        SurfaceBlendFunction::InvConstAlpha,
    ];

    pub fn from_raw(raw: u32) -> Option<Self> {
        if raw == SurfaceBlendFunction::Unknown as u32 {
            return Some(SurfaceBlendFunction::Unknown);
        }
        Self::SUPPORTED.iter().copied().find(|func| *func as u32 == raw)
    }
}

/// G2D blend factor code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum BlendFunction {
    #[default]
    Zero = 0,
    One = 1,
    SrcColor = 2,
    OneMinusSrcColor = 3,
    DstColor = 4,
    OneMinusDstColor = 5,
    SrcAlpha = 6,
    OneMinusSrcAlpha = 7,
    DstAlpha = 8,
    OneMinusDstAlpha = 9,
    ConstantColor = 10,
    OneMinusConstantColor = 11,
    ConstantAlpha = 12,
    OneMinusConstantAlpha = 13,
    SrcAlphaSaturate = 14,
}

/// G2D blend equation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum BlendEquation {
    #[default]
    Add = 0,
    Sub = 1,
    ReverseSub = 2,
    Min = 3,
    Max = 4,
    Darken = 5,
    Lighten = 6,
    Multiply = 7,
}

/// G2D raster operation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u32)]
pub enum RopMode {
    #[default]
    Clear = 0,
    Nor = 1,
    AndInverted = 2,
    CopyInverted = 3,
    AndReverse = 4,
    Noop = 5,
    Xor = 6,
    Nand = 7,
    And = 8,
    Equiv = 9,
    Invert = 10,
    OrInverted = 11,
    Copy = 12,
    OrReverse = 13,
    Or = 14,
    Set = 15,
}

/// Translate a host blend function into the hardware code.
///
/// `Unknown` has no hardware meaning; it is reported and encoded as `Zero`.
pub fn translate(func: SurfaceBlendFunction) -> BlendFunction {
    match func {
        SurfaceBlendFunction::Zero => BlendFunction::Zero,
        SurfaceBlendFunction::One => BlendFunction::One,
        SurfaceBlendFunction::SrcColor => BlendFunction::SrcColor,
        SurfaceBlendFunction::InvSrcColor => BlendFunction::OneMinusSrcColor,
        SurfaceBlendFunction::SrcAlpha => BlendFunction::SrcAlpha,
        SurfaceBlendFunction::InvSrcAlpha => BlendFunction::OneMinusSrcAlpha,
        SurfaceBlendFunction::DestColor => BlendFunction::DstColor,
        SurfaceBlendFunction::InvDestColor => BlendFunction::OneMinusDstColor,
        SurfaceBlendFunction::DestAlpha => BlendFunction::DstAlpha,
        SurfaceBlendFunction::InvDestAlpha => BlendFunction::OneMinusDstAlpha,
        SurfaceBlendFunction::SrcAlphaSat => BlendFunction::SrcAlphaSaturate,
        SurfaceBlendFunction::ConstColor => BlendFunction::ConstantColor,
        SurfaceBlendFunction::InvConstColor => BlendFunction::OneMinusConstantColor,
        SurfaceBlendFunction::ConstAlpha => BlendFunction::ConstantAlpha,
        SurfaceBlendFunction::InvConstAlpha => BlendFunction::OneMinusConstantAlpha,
        SurfaceBlendFunction::Unknown => {
            log::error!("unexpected blend function {:?}, using Zero", func);
            BlendFunction::Zero
        }
    }
}

/// Translate a raw host value; values outside the enumeration become `Zero`.
pub fn translate_raw(raw: u32) -> BlendFunction {
    match SurfaceBlendFunction::from_raw(raw) {
        Some(func) => translate(func),
        None => {
            log::error!("unexpected blend function {}, using Zero", raw);
            BlendFunction::Zero
        }
    }
}
