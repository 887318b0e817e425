//! Screen partitioning: which zone(s) cover a pixel, and with what weight.
//!
//! Splits and quadrants are hard-edged. Circle and rectangle geometries are
//! centered on the cursor and blend the inner (0) and outer (1) zones across
//! a smoothstep band of relative width `edge_softness`:
//!
//! ```text
//! circle:    inner = 1 − smoothstep(r(1−s), r(1+s), |p − cursor|)
//! rectangle: inner = 1 − smoothstep(1−s, 1+s, max(|dx|/(w/2), |dy|/(h/2)))
//! ```
//!
//! Weights always sum to one.

use serde::{Deserialize, Serialize};

use crate::color::{Color, smoothstep};
use crate::transform::params::{SplitGeometry, ZoneId};

/// A position in pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Center of the pixel at integer coordinates `(x, y)`.
    pub fn pixel_center(x: u32, y: u32) -> Self {
        Self::new(x as f32 + 0.5, y as f32 + 0.5)
    }

    pub fn distance(self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Screen dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Point {
        Point::new(self.width as f32 * 0.5, self.height as f32 * 0.5)
    }
}

/// One pixel to evaluate. Built per pixel, never retained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRequest {
    pub position: Point,
    pub original: Color,
    pub screen: ScreenSize,
}

/// Up to two `(zone, weight)` pairs; no allocation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneCoverage {
    entries: [(ZoneId, f32); 2],
    len: u8,
}

impl ZoneCoverage {
    /// Full coverage by one zone.
    pub const fn single(zone: ZoneId) -> Self {
        Self {
            entries: [(zone, 1.0), (0, 0.0)],
            len: 1,
        }
    }

    /// Inner/outer blend. Collapses to a single zone at the ends of the band.
    pub fn blend(inner: ZoneId, outer: ZoneId, inner_weight: f32) -> Self {
        if inner_weight >= 1.0 {
            Self::single(inner)
        } else if inner_weight <= 0.0 {
            Self::single(outer)
        } else {
            Self {
                entries: [(inner, inner_weight), (outer, 1.0 - inner_weight)],
                len: 2,
            }
        }
    }

    pub fn as_slice(&self) -> &[(ZoneId, f32)] {
        &self.entries[..self.len as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = (ZoneId, f32)> + '_ {
        self.as_slice().iter().copied()
    }

    pub fn len(&self) -> usize {
        self.len as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Weight of `zone`, 0 if it does not cover the pixel.
    pub fn weight_of(&self, zone: ZoneId) -> f32 {
        self.iter()
            .filter(|(z, _)| *z == zone)
            .map(|(_, w)| w)
            .sum()
    }

    pub fn total_weight(&self) -> f32 {
        self.iter().map(|(_, w)| w).sum()
    }
}

/// Resolves pixel positions for one frame: geometry, screen and cursor fixed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneResolver {
    geometry: SplitGeometry,
    screen: ScreenSize,
    cursor: Point,
}

impl ZoneResolver {
    pub fn new(geometry: SplitGeometry, screen: ScreenSize, cursor: Point) -> Self {
        Self {
            geometry,
            screen,
            cursor,
        }
    }

    pub fn resolve(&self, p: Point) -> ZoneCoverage {
        resolve(p, self.screen, self.geometry, self.cursor)
    }
}

/// Zone coverage of `p` on a `screen`-sized frame split by `geometry`.
///
/// `cursor` is only read by the circle and rectangle geometries.
pub fn resolve(p: Point, screen: ScreenSize, geometry: SplitGeometry, cursor: Point) -> ZoneCoverage {
    let w = screen.width as f32;
    let h = screen.height as f32;
    match geometry {
        SplitGeometry::Fullscreen => ZoneCoverage::single(0),
        SplitGeometry::SplitVertical { position } => {
            ZoneCoverage::single(if p.x < position * w { 0 } else { 1 })
        }
        SplitGeometry::SplitHorizontal { position } => {
            ZoneCoverage::single(if p.y < position * h { 0 } else { 1 })
        }
        SplitGeometry::Quadrants => {
            let right = usize::from(p.x >= w * 0.5);
            let bottom = usize::from(p.y >= h * 0.5);
            ZoneCoverage::single(2 * bottom + right)
        }
        SplitGeometry::Circle {
            radius,
            edge_softness,
        } => {
            let d = p.distance(cursor);
            let inner = 1.0
                - smoothstep(
                    radius * (1.0 - edge_softness),
                    radius * (1.0 + edge_softness),
                    d,
                );
            ZoneCoverage::blend(0, 1, inner)
        }
        SplitGeometry::Rectangle {
            width,
            height,
            edge_softness,
        } => {
            let half_w = (width * 0.5).max(f32::MIN_POSITIVE);
            let half_h = (height * 0.5).max(f32::MIN_POSITIVE);
            let sd = ((p.x - cursor.x).abs() / half_w).max((p.y - cursor.y).abs() / half_h);
            let inner = 1.0 - smoothstep(1.0 - edge_softness, 1.0 + edge_softness, sd);
            ZoneCoverage::blend(0, 1, inner)
        }
    }
}
