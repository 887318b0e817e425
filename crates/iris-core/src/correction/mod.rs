//! LUT-based correction: gradient tables, their cache, and the per-pixel
//! corrector.

pub mod cache;
pub mod corrector;
pub mod gradient;

pub use cache::GradientCache;
pub use corrector::{ChannelStage, LutCorrector};
pub use gradient::{GradientTable, TABLE_SIZE};
