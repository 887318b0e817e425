//! Sample the channel tables for a pixel and blend the result in.
//!
//! Each enabled channel `c` contributes independently:
//!
//! ```text
//! sample = table[c][round(original[c] × 255)]
//! w      = activation weight of c under the application mode
//! out_c  = blend(original, sample, w, strength[c])
//! result = saturate(original + Σ (out_c − original))
//! ```

use std::sync::Arc;

use crate::color::{Channel, Color};
use crate::transform::params::{ApplicationMode, BlendMode};

use super::gradient::GradientTable;

/// Floor for the divisions in `Proportional` and `Additive`.
const BLEND_EPSILON: f32 = 1e-6;

/// An enabled channel: its strength plus the built table.
#[derive(Debug, Clone)]
pub struct ChannelStage {
    pub strength: f32,
    pub table: Arc<GradientTable>,
}

/// Activation weight of `channel` for `original`.
pub fn activation_weight(original: Color, channel: Channel, mode: ApplicationMode) -> f32 {
    let v = original[channel];
    match mode {
        ApplicationMode::Full => v,
        ApplicationMode::Dominant => {
            if v >= original.max_component() {
                v
            } else {
                0.0
            }
        }
        ApplicationMode::Threshold { threshold } => {
            if v >= threshold {
                v
            } else {
                0.0
            }
        }
    }
}

/// One channel's output color before the channel deltas are combined.
///
/// Unclamped except for `Additive`, which clamps after the luminance match.
pub fn blend_channel(
    original: Color,
    sample: Color,
    channel: Channel,
    weight: f32,
    strength: f32,
    blend: BlendMode,
) -> Color {
    match blend {
        BlendMode::ChannelWeighted => original.lerp(sample, weight * strength),
        BlendMode::Direct => {
            if weight > 0.0 {
                original.lerp(sample, strength)
            } else {
                original
            }
        }
        BlendMode::Proportional => {
            let dominance = original[channel] / original.max_component().max(BLEND_EPSILON);
            original.lerp(sample, weight * dominance * strength)
        }
        BlendMode::Additive => {
            let out = original.lerp(sample, weight * strength);
            let target = original.luminance();
            let current = out.luminance();
            if current > BLEND_EPSILON {
                out.map(|v| v * target / current).saturate()
            } else {
                out.saturate()
            }
        }
        BlendMode::Screen => {
            let k = weight * strength;
            Color::new(
                1.0 - (1.0 - original.r) * (1.0 - sample.r * k),
                1.0 - (1.0 - original.g) * (1.0 - sample.g * k),
                1.0 - (1.0 - original.b) * (1.0 - sample.b * k),
            )
        }
    }
}

/// The three channel stages of one correction zone.
#[derive(Debug, Clone, Default)]
pub struct LutCorrector {
    channels: [Option<ChannelStage>; 3],
    application_mode: ApplicationMode,
    blend_mode: BlendMode,
}

impl LutCorrector {
    pub fn new(
        channels: [Option<ChannelStage>; 3],
        application_mode: ApplicationMode,
        blend_mode: BlendMode,
    ) -> Self {
        Self {
            channels,
            application_mode,
            blend_mode,
        }
    }

    /// Whether no channel is enabled.
    pub fn is_identity(&self) -> bool {
        self.channels.iter().all(Option::is_none)
    }

    pub fn stage(&self, channel: Channel) -> Option<&ChannelStage> {
        self.channels[channel.index()].as_ref()
    }

    /// Correct `original` with every channel's strength multiplied by
    /// `strength_scale` (the guided weight, or 1.0).
    pub fn correct(&self, original: Color, strength_scale: f32) -> Color {
        if self.is_identity() {
            return original;
        }
        let mut delta = Color::BLACK;
        for channel in Channel::ALL {
            let Some(stage) = self.stage(channel) else {
                continue;
            };
            let weight = activation_weight(original, channel, self.application_mode);
            if weight <= 0.0 {
                continue;
            }
            let sample = stage.table.sample(original[channel]);
            let out = blend_channel(
                original,
                sample,
                channel,
                weight,
                stage.strength * strength_scale,
                self.blend_mode,
            );
            delta = Color::from_vec3(delta.to_vec3() + out.to_vec3() - original.to_vec3());
        }
        Color::from_vec3(original.to_vec3() + delta.to_vec3()).saturate()
    }
}
