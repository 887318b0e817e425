//! Shared cache of built gradient tables.
//!
//! Keys are the exact bit patterns of the inputs that shape a table, so an
//! unchanged LUT is served the same `Arc` across configuration edits. Tables
//! are immutable; a frame holding an old `Arc` keeps reading it safely after
//! the cache has moved on.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::transform::params::{ChannelLut, GradientType};

use super::gradient::GradientTable;

/// Identity of a gradient table: start/end color bits, white protection
/// bits and interpolation space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GradientKey {
    start: [u32; 3],
    end: [u32; 3],
    white_protection: u32,
    gradient: GradientType,
}

impl GradientKey {
    pub fn new(lut: &ChannelLut, gradient: GradientType) -> Self {
        Self {
            start: lut.start_color.to_array().map(f32::to_bits),
            end: lut.end_color.to_array().map(f32::to_bits),
            white_protection: lut.white_protection.to_bits(),
            gradient,
        }
    }
}

#[derive(Debug, Default)]
pub struct GradientCache {
    tables: Mutex<HashMap<GradientKey, Arc<GradientTable>>>,
}

impl GradientCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached table for `lut`, building it on a miss.
    pub fn get_or_build(&self, lut: &ChannelLut, gradient: GradientType) -> Arc<GradientTable> {
        let key = GradientKey::new(lut, gradient);
        let mut tables = self.tables.lock();
        if let Some(table) = tables.get(&key) {
            tracing::debug!(?gradient, "gradient table served from cache");
            return Arc::clone(table);
        }
        let table = Arc::new(GradientTable::build(lut, gradient));
        tracing::debug!(
            ?gradient,
            start = %lut.start_color,
            end = %lut.end_color,
            white_protection = lut.white_protection,
            "built gradient table"
        );
        tables.insert(key, Arc::clone(&table));
        table
    }

    /// Drop tables no snapshot references any more. Returns how many were
    /// evicted.
    pub fn evict_unreferenced(&self) -> usize {
        let mut tables = self.tables.lock();
        let before = tables.len();
        tables.retain(|_, table| Arc::strong_count(table) > 1);
        let evicted = before - tables.len();
        if evicted > 0 {
            tracing::debug!(evicted, remaining = tables.len(), "evicted gradient tables");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.tables.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.lock().is_empty()
    }
}
