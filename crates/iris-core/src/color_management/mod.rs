//! Color management: color space conversions and transfer functions.

pub mod color_space;
pub mod transfer;

pub use color_space::{
    ColorMatrix, Hsl, Lab, Lms, hsl_to_rgb, lab_to_rgb, lms_to_rgb, rgb_to_hsl, rgb_to_lab,
    rgb_to_lms,
};
pub use transfer::{decode_color, encode_color, srgb_decode, srgb_encode};
