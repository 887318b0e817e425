//! Frame buffer handed to and returned from the pipeline.

use image::{DynamicImage, Rgba, RgbaImage};

use crate::color::{Color, quantize_u8};
use crate::error::FrameError;

/// One RGBA pixel, components in `[0, 1]`.
pub type Pixel = [f32; 4];

/// A captured frame. Always stored as RGBA f32, display-encoded.
///
/// Alpha is carried but never read or written by the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Row-major pixel data. Length = width × height.
    pub pixels: Vec<Pixel>,
}

fn pixel_count(width: u32, height: u32) -> Result<usize, FrameError> {
    (width as usize)
        .checked_mul(height as usize)
        .ok_or(FrameError::TooLarge { width, height })
}

impl Frame {
    /// A frame filled with one opaque color.
    pub fn filled(width: u32, height: u32, color: Color) -> Result<Self, FrameError> {
        let len = pixel_count(width, height)?;
        Ok(Self {
            width,
            height,
            pixels: vec![[color.r, color.g, color.b, 1.0]; len],
        })
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Pixel>) -> Result<Self, FrameError> {
        let expected = pixel_count(width, height)?;
        if pixels.len() != expected {
            return Err(FrameError::LengthMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from tightly packed RGBA8 bytes, as delivered by screen capture.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, FrameError> {
        let expected = pixel_count(width, height)?
            .checked_mul(4)
            .ok_or(FrameError::TooLarge { width, height })?;
        if bytes.len() != expected {
            return Err(FrameError::LengthMismatch {
                width,
                height,
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|p| {
                [
                    p[0] as f32 / 255.0,
                    p[1] as f32 / 255.0,
                    p[2] as f32 / 255.0,
                    p[3] as f32 / 255.0,
                ]
            })
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Quantize to tightly packed RGBA8 bytes.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|p| p.map(quantize_u8))
            .collect()
    }

    pub fn from_rgba_image(img: &RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        let pixels = img
            .pixels()
            .map(|p| p.0.map(|v| v as f32 / 255.0))
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Convert any decoded image. Values are kept display-encoded.
    pub fn from_dynamic(img: &DynamicImage) -> Self {
        let rgba = img.to_rgba32f();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| [p.0[0], p.0[1], p.0[2], p.0[3]])
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn to_rgba_image(&self) -> RgbaImage {
        let width = self.width.max(1) as usize;
        RgbaImage::from_fn(self.width, self.height, |x, y| {
            let p = self.pixels[y as usize * width + x as usize];
            Rgba(p.map(quantize_u8))
        })
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// RGB of the pixel at `(x, y)`.
    pub fn color_at(&self, x: u32, y: u32) -> Option<Color> {
        self.pixel(x, y).map(|[r, g, b, _]| Color::new(r, g, b))
    }

    /// Raw float bytes, for handing to a GPU upload or compositor.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}
