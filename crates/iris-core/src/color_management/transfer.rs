//! sRGB encoding of captured screen pixels.
//!
//! Screen content arrives display-encoded. The CVD models want linear light,
//! so the pipeline decodes before simulating and encodes the result again.

use crate::color::Color;

/// Encoded value below which the curve is linear.
const DECODE_KNEE: f32 = 0.04045;
/// Linear value below which the curve is linear.
const ENCODE_KNEE: f32 = 0.003_130_8;
const LINEAR_SLOPE: f32 = 12.92;
const GAMMA: f32 = 2.4;
const OFFSET: f32 = 0.055;

/// sRGB-encoded value to linear light (IEC 61966-2-1).
///
/// Negative input decodes to 0 so that out-of-gamut matrix results
/// never reach `powf` as NaN.
pub fn srgb_decode(v: f32) -> f32 {
    if v <= DECODE_KNEE {
        v.max(0.0) / LINEAR_SLOPE
    } else {
        ((v + OFFSET) / (1.0 + OFFSET)).powf(GAMMA)
    }
}

/// Linear light to sRGB encoding. Negative input encodes to 0.
pub fn srgb_encode(v: f32) -> f32 {
    if v <= ENCODE_KNEE {
        v.max(0.0) * LINEAR_SLOPE
    } else {
        (1.0 + OFFSET) * v.powf(1.0 / GAMMA) - OFFSET
    }
}

pub fn decode_color(color: Color) -> Color {
    color.map(srgb_decode)
}

pub fn encode_color(color: Color) -> Color {
    color.map(srgb_encode)
}
