//! Normalized RGB color value used throughout the pipeline.

use std::fmt;
use std::ops::Index;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Rec. 709 luminance weights.
pub const LUMA_REC709: [f32; 3] = [0.2126, 0.7152, 0.0722];

/// One of the three color channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    Red,
    Green,
    Blue,
}

impl Channel {
    /// All channels in `R, G, B` order.
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];

    /// Position of this channel in an `[R, G, B]` triplet.
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
        }
    }

    /// Human-readable label, also used as the key prefix in presets.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// An RGB color with components nominally in `[0, 1]`.
///
/// Alpha is not carried: the pipeline's internal math always assumes an
/// opaque color, and frame alpha is passed through untouched.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Pod, Zeroable)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// A gray with all three components equal to `v`.
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub const fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn from_vec3(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }

    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Build a color from 8-bit channel values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Quantize to 8-bit channel values, clamping out-of-range components.
    pub fn to_rgb8(self) -> [u8; 3] {
        self.to_array().map(quantize_u8)
    }

    /// Apply `f` to every component.
    pub fn map(self, f: impl Fn(f32) -> f32) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }

    /// Component-wise linear interpolation: `t = 0` yields `self`, `t = 1` yields `other`.
    ///
    /// Written as `a + (b - a) * t` so that `a.lerp(a, t) == a` bit-for-bit.
    pub fn lerp(self, other: Color, t: f32) -> Self {
        let a = self.to_vec3();
        Self::from_vec3(a + (other.to_vec3() - a) * t)
    }

    /// Clamp every component to `[0, 1]`.
    pub fn saturate(self) -> Self {
        Self::from_vec3(self.to_vec3().clamp(Vec3::ZERO, Vec3::ONE))
    }

    /// Rec. 709 relative luminance.
    pub fn luminance(self) -> f32 {
        self.to_vec3().dot(Vec3::from_array(LUMA_REC709))
    }

    pub fn max_component(self) -> f32 {
        self.r.max(self.g).max(self.b)
    }

    /// Euclidean distance between two colors in RGB.
    pub fn distance(self, other: Color) -> f32 {
        self.to_vec3().distance(other.to_vec3())
    }

    /// Parse `#RRGGBB` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.trim().strip_prefix('#').unwrap_or(hex.trim());
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let byte = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::from_rgb8(byte(0)?, byte(2)?, byte(4)?))
    }

    /// Format as uppercase `#RRGGBB`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02X}{g:02X}{b:02X}")
    }
}

impl Index<Channel> for Color {
    type Output = f32;

    fn index(&self, channel: Channel) -> &f32 {
        match channel {
            Channel::Red => &self.r,
            Channel::Green => &self.g,
            Channel::Blue => &self.b,
        }
    }
}

impl From<[f32; 3]> for Color {
    fn from(rgb: [f32; 3]) -> Self {
        Self::from_array(rgb)
    }
}

impl From<Color> for [f32; 3] {
    fn from(color: Color) -> Self {
        color.to_array()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.r, self.g, self.b)
    }
}

/// Map a normalized value to its nearest 8-bit code.
pub(crate) fn quantize_u8(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Hermite smoothstep between `edge0` and `edge1`.
///
/// Returns a step function at `edge0` when the edges coincide.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if (edge1 - edge0).abs() < f32::EPSILON {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = ((x - edge0) / (edge1 - edge0)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
