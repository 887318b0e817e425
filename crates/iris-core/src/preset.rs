//! Persisted correction presets.
//!
//! The on-disk form is a flat JSON object with PascalCase keys and
//! `#RRGGBB` colors:
//!
//! ```json
//! { "Name": "Deutan", "RedEnabled": true, "RedStrength": 0.8,
//!   "RedStartColor": "#000000", "RedEndColor": "#FF00FF",
//!   "RedWhiteProtection": 0.8, ...,
//!   "DefaultIntensity": 1.0, "RecommendedGradientType": "HSL",
//!   "RecommendedApplicationMode": "Dominant", "RecommendedThreshold": 0.5 }
//! ```
//!
//! Reading and writing files is left to the caller; this module only
//! converts between text, [`Preset`] and [`CorrectionConfig`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Channel, Color};
use crate::error::{ConfigWarning, PresetError};
use crate::transform::params::{
    ApplicationMode, ChannelLut, CorrectionConfig, DEFAULT_THRESHOLD, GradientType,
};
use crate::transform::validate::Validator;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct Preset {
    pub name: String,
    pub description: String,

    pub red_enabled: bool,
    pub red_strength: f32,
    pub red_start_color: String,
    pub red_end_color: String,
    pub red_white_protection: f32,

    pub green_enabled: bool,
    pub green_strength: f32,
    pub green_start_color: String,
    pub green_end_color: String,
    pub green_white_protection: f32,

    pub blue_enabled: bool,
    pub blue_strength: f32,
    pub blue_start_color: String,
    pub blue_end_color: String,
    pub blue_white_protection: f32,

    pub default_intensity: f32,
    pub recommended_gradient_type: String,
    pub recommended_application_mode: String,
    pub recommended_threshold: f32,
}

impl Default for Preset {
    fn default() -> Self {
        let mut preset = Self {
            name: "Untitled".into(),
            description: String::new(),
            red_enabled: false,
            red_strength: 0.0,
            red_start_color: String::new(),
            red_end_color: String::new(),
            red_white_protection: 0.0,
            green_enabled: false,
            green_strength: 0.0,
            green_start_color: String::new(),
            green_end_color: String::new(),
            green_white_protection: 0.0,
            blue_enabled: false,
            blue_strength: 0.0,
            blue_start_color: String::new(),
            blue_end_color: String::new(),
            blue_white_protection: 0.0,
            default_intensity: 1.0,
            recommended_gradient_type: GradientType::default().label().into(),
            recommended_application_mode: ApplicationMode::default().label().into(),
            recommended_threshold: DEFAULT_THRESHOLD,
        };
        for channel in Channel::ALL {
            preset.set_channel(channel, &ChannelLut::default());
        }
        preset
    }
}

/// Borrowed view of one channel's preset fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetChannel<'a> {
    pub enabled: bool,
    pub strength: f32,
    pub start_color: &'a str,
    pub end_color: &'a str,
    pub white_protection: f32,
}

impl Preset {
    pub fn from_json(text: &str) -> Result<Self, PresetError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json(&self) -> Result<String, PresetError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn channel(&self, channel: Channel) -> PresetChannel<'_> {
        match channel {
            Channel::Red => PresetChannel {
                enabled: self.red_enabled,
                strength: self.red_strength,
                start_color: &self.red_start_color,
                end_color: &self.red_end_color,
                white_protection: self.red_white_protection,
            },
            Channel::Green => PresetChannel {
                enabled: self.green_enabled,
                strength: self.green_strength,
                start_color: &self.green_start_color,
                end_color: &self.green_end_color,
                white_protection: self.green_white_protection,
            },
            Channel::Blue => PresetChannel {
                enabled: self.blue_enabled,
                strength: self.blue_strength,
                start_color: &self.blue_start_color,
                end_color: &self.blue_end_color,
                white_protection: self.blue_white_protection,
            },
        }
    }

    fn set_channel(&mut self, channel: Channel, lut: &ChannelLut) {
        let (enabled, strength, start, end, protection) = match channel {
            Channel::Red => (
                &mut self.red_enabled,
                &mut self.red_strength,
                &mut self.red_start_color,
                &mut self.red_end_color,
                &mut self.red_white_protection,
            ),
            Channel::Green => (
                &mut self.green_enabled,
                &mut self.green_strength,
                &mut self.green_start_color,
                &mut self.green_end_color,
                &mut self.green_white_protection,
            ),
            Channel::Blue => (
                &mut self.blue_enabled,
                &mut self.blue_strength,
                &mut self.blue_start_color,
                &mut self.blue_end_color,
                &mut self.blue_white_protection,
            ),
        };
        *enabled = lut.enabled;
        *strength = lut.strength;
        *start = lut.start_color.to_hex();
        *end = lut.end_color.to_hex();
        *protection = lut.white_protection;
    }

    /// Convert to an in-memory correction config.
    ///
    /// A malformed color disables its channel; unknown gradient or
    /// application mode names fall back to the defaults; numbers are
    /// clamped. Each substitution is reported.
    pub fn to_correction(&self) -> (CorrectionConfig, Vec<ConfigWarning>) {
        let mut validator = Validator::new();
        let mut config = CorrectionConfig::default();

        for channel in Channel::ALL {
            let fields = self.channel(channel);
            let start = parse_color(&mut validator, channel, "StartColor", fields.start_color);
            let end = parse_color(&mut validator, channel, "EndColor", fields.end_color);
            let lut = config.channel_mut(channel);
            lut.strength = fields.strength;
            lut.white_protection = fields.white_protection;
            match (start, end) {
                (Some(start), Some(end)) => {
                    lut.enabled = fields.enabled;
                    lut.start_color = start;
                    lut.end_color = end;
                }
                _ => lut.enabled = false,
            }
        }

        config.gradient_type = self
            .recommended_gradient_type
            .parse()
            .unwrap_or_else(|_| {
                validator.push(ConfigWarning::UnknownVariant {
                    field: "RecommendedGradientType",
                    value: self.recommended_gradient_type.clone(),
                    fallback: GradientType::default().label(),
                });
                GradientType::default()
            });

        let mode = parse_application_mode(
            &self.recommended_application_mode,
            self.recommended_threshold,
        );
        config.application_mode = mode.unwrap_or_else(|| {
            validator.push(ConfigWarning::UnknownVariant {
                field: "RecommendedApplicationMode",
                value: self.recommended_application_mode.clone(),
                fallback: ApplicationMode::default().label(),
            });
            ApplicationMode::default()
        });

        config.intensity = self.default_intensity;
        config.description = self.description.clone();
        config.recommended_threshold = self.recommended_threshold;
        validator.correction(&self.name, &mut config);
        (config, validator.finish())
    }

    /// Persisted form of `config` under `name`.
    ///
    /// Colors are quantized to 8 bits; blend mode and simulation settings
    /// have no persisted field and are dropped.
    pub fn from_correction(name: impl Into<String>, config: &CorrectionConfig) -> Self {
        let mut preset = Self {
            name: name.into(),
            description: config.description.clone(),
            default_intensity: config.intensity,
            recommended_gradient_type: config.gradient_type.label().into(),
            recommended_application_mode: config.application_mode.label().into(),
            recommended_threshold: match config.application_mode {
                ApplicationMode::Threshold { threshold } => threshold,
                _ => config.recommended_threshold,
            },
            ..Self::default()
        };
        for channel in Channel::ALL {
            preset.set_channel(channel, config.channel(channel));
        }
        preset
    }
}

fn parse_color(
    validator: &mut Validator,
    channel: Channel,
    field: &'static str,
    value: &str,
) -> Option<Color> {
    let color = Color::from_hex(value);
    if color.is_none() {
        validator.push(ConfigWarning::MalformedColor {
            channel,
            field,
            value: value.to_string(),
        });
    }
    color
}

fn parse_application_mode(name: &str, threshold: f32) -> Option<ApplicationMode> {
    match name.trim().to_ascii_lowercase().as_str() {
        "full" => Some(ApplicationMode::Full),
        "dominant" => Some(ApplicationMode::Dominant),
        "threshold" => Some(ApplicationMode::Threshold { threshold }),
        _ => None,
    }
}

/// Presets shipped with the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuiltinPreset {
    Protan,
    Deutan,
    Tritan,
}

impl BuiltinPreset {
    pub const ALL: [BuiltinPreset; 3] = [Self::Protan, Self::Deutan, Self::Tritan];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Protan => "protan",
            Self::Deutan => "deutan",
            Self::Tritan => "tritan",
        }
    }
}

impl fmt::Display for BuiltinPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for BuiltinPreset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown built-in preset: {s}"))
    }
}

fn channel(strength: f32, start: &str, end: &str, white_protection: f32) -> ChannelLut {
    ChannelLut {
        enabled: true,
        strength,
        start_color: Color::from_hex(start).unwrap_or(Color::BLACK),
        end_color: Color::from_hex(end).unwrap_or(Color::WHITE),
        white_protection,
    }
}

/// The built-in preset `kind`.
///
/// Red-weak observers get reds pushed toward magenta and greens toward
/// cyan; the tritan preset pushes blues toward cyan and yellows toward red.
pub fn builtin(kind: BuiltinPreset) -> Preset {
    let mut config = CorrectionConfig::default();
    config.description = match kind {
        BuiltinPreset::Protan => {
            config.channels[0] = channel(0.8, "#000000", "#C000FF", 0.8);
            config.channels[1] = channel(0.6, "#000000", "#00E0FF", 0.8);
            config.gradient_type = GradientType::PerceptualLab;
            config.application_mode = ApplicationMode::Dominant;
            "Shifts reds toward magenta and greens toward cyan for protanopia/protanomaly.".into()
        }
        BuiltinPreset::Deutan => {
            config.channels[0] = channel(0.7, "#000000", "#FF00FF", 0.8);
            config.channels[1] = channel(0.9, "#000000", "#00FFFF", 0.8);
            config.gradient_type = GradientType::Hsl;
            config.application_mode = ApplicationMode::Dominant;
            "Shifts reds toward magenta and greens toward cyan for deuteranopia/deuteranomaly.".into()
        }
        BuiltinPreset::Tritan => {
            config.channels[1] = channel(0.6, "#000000", "#FF4000", 0.8);
            config.channels[2] = channel(0.8, "#000000", "#00FFFF", 0.8);
            config.gradient_type = GradientType::LinearRgb;
            config.application_mode = ApplicationMode::Threshold { threshold: 0.4 };
            "Shifts blues toward cyan and yellows toward red for tritanopia/tritanomaly.".into()
        }
    };
    let name = match kind {
        BuiltinPreset::Protan => "Protan",
        BuiltinPreset::Deutan => "Deutan",
        BuiltinPreset::Tritan => "Tritan",
    };
    Preset::from_correction(name, &config)
}
