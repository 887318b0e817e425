//! Pixel pipeline: configuration types, validation, compiled snapshots and
//! per-pixel evaluation.

pub mod evaluate;
pub mod params;
pub mod snapshot;
pub mod validate;
