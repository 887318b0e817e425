//! Frame-level driver: owns the live snapshot and renders frames with it.
//!
//! Configuration changes compile a new [`PipelineSnapshot`] off to the side
//! and publish it with a single pointer swap. A frame clones the `Arc` once
//! at the start and renders entirely from it, so it never observes a
//! half-applied configuration.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;

use crate::color::Color;
use crate::correction::GradientCache;
use crate::error::ConfigWarning;
use crate::image::{Frame, Pixel};
use crate::transform::evaluate::evaluate_pixel;
use crate::transform::params::PipelineConfig;
use crate::transform::snapshot::PipelineSnapshot;
use crate::zones::{PixelRequest, Point, ScreenSize, ZoneResolver};

/// Frames with at least this many pixels are rendered on the rayon pool.
pub const PARALLEL_THRESHOLD: usize = 16_384;

#[derive(Debug)]
pub struct Engine {
    current: RwLock<Arc<PipelineSnapshot>>,
    cache: GradientCache,
    warnings: RwLock<Vec<ConfigWarning>>,
    // Serializes compile + publish so versions are handed out in order.
    update_lock: Mutex<()>,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine publishing the identity snapshot at version 0.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(PipelineSnapshot::identity())),
            cache: GradientCache::new(),
            warnings: RwLock::new(Vec::new()),
            update_lock: Mutex::new(()),
        }
    }

    /// An engine with `config` already published.
    pub fn with_config(config: &PipelineConfig) -> (Self, Vec<ConfigWarning>) {
        let engine = Self::new();
        let warnings = engine.update(config);
        (engine, warnings)
    }

    /// Compile and publish `config`. Returns the configuration warnings,
    /// which are also kept for [`Engine::warnings`].
    pub fn update(&self, config: &PipelineConfig) -> Vec<ConfigWarning> {
        let _guard = self.update_lock.lock();
        let (snapshot, warnings) = PipelineSnapshot::compile(config, &self.cache);
        let version = self.version() + 1;
        let snapshot = Arc::new(snapshot.with_version(version));

        *self.current.write() = snapshot;
        *self.warnings.write() = warnings.clone();

        let evicted = self.cache.evict_unreferenced();
        tracing::debug!(
            version,
            geometry = self.snapshot().geometry().label(),
            warnings = warnings.len(),
            evicted,
            "published pipeline snapshot"
        );
        warnings
    }

    /// The snapshot frames should currently render with.
    pub fn snapshot(&self) -> Arc<PipelineSnapshot> {
        Arc::clone(&self.current.read())
    }

    /// Number of configurations published so far: the version of the
    /// current snapshot.
    pub fn version(&self) -> u64 {
        self.current.read().version()
    }

    /// Warnings from the most recent [`Engine::update`].
    pub fn warnings(&self) -> Vec<ConfigWarning> {
        self.warnings.read().clone()
    }

    pub fn cache(&self) -> &GradientCache {
        &self.cache
    }

    /// Render `frame` into a new frame of the same size.
    pub fn render(&self, frame: &Frame, cursor: Point) -> Frame {
        let mut out = frame.clone();
        self.render_in_place(&mut out, cursor);
        out
    }

    pub fn render_in_place(&self, frame: &mut Frame, cursor: Point) {
        let snapshot = self.snapshot();
        render_frame(&snapshot, frame, cursor);
    }

    /// Evaluate a single pixel with the current snapshot.
    pub fn evaluate(&self, request: &PixelRequest, cursor: Point) -> Color {
        let snapshot = self.snapshot();
        let resolver = snapshot.resolver(request.screen, cursor);
        evaluate_pixel(&snapshot, &resolver.resolve(request.position), request.original)
    }
}

/// Render `frame` in place with `snapshot`, in parallel above
/// [`PARALLEL_THRESHOLD`] pixels.
pub fn render_frame(snapshot: &PipelineSnapshot, frame: &mut Frame, cursor: Point) {
    let parallel = frame.len() >= PARALLEL_THRESHOLD;
    render_frame_with(snapshot, frame, cursor, parallel);
}

/// Render with an explicit choice of parallel or sequential rows.
pub fn render_frame_with(
    snapshot: &PipelineSnapshot,
    frame: &mut Frame,
    cursor: Point,
    parallel: bool,
) {
    if snapshot.is_identity() || frame.is_empty() {
        return;
    }
    let width = frame.width as usize;
    let resolver = snapshot.resolver(ScreenSize::new(frame.width, frame.height), cursor);
    let render = |(y, row): (usize, &mut [Pixel])| render_row(snapshot, &resolver, y as u32, row);

    if parallel {
        frame.pixels.par_chunks_mut(width).enumerate().for_each(render);
    } else {
        frame.pixels.chunks_mut(width).enumerate().for_each(render);
    }
}

fn render_row(snapshot: &PipelineSnapshot, resolver: &ZoneResolver, y: u32, row: &mut [Pixel]) {
    for (x, pixel) in row.iter_mut().enumerate() {
        let coverage = resolver.resolve(Point::pixel_center(x as u32, y));
        let original = Color::new(pixel[0], pixel[1], pixel[2]);
        let out = evaluate_pixel(snapshot, &coverage, original);
        pixel[0] = out.r;
        pixel[1] = out.g;
        pixel[2] = out.b;
    }
}
