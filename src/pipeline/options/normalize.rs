//! Loose option bag normalization.
//!
//! The historical call surface accepted an arbitrary key/value bag. This
//! module reproduces that contract over `serde_json::Value`: recognized keys
//! are picked up field by field, a value of the wrong type leaves the default
//! in place rather than erroring, and unknown keys are ignored. The only hard
//! failure is a bag that is not an object at all.

use serde_json::Value;
use tracing::debug;

use crate::pipeline::common::error::{ConvertError, Result};
use crate::pipeline::options::types::ConversionOptions;

fn bool_opt(map: &serde_json::Map<String, Value>, key: &str) -> Option<bool> {
    match map.get(key) {
        Some(Value::Bool(b)) => Some(*b),
        Some(other) => {
            debug!(key, value_type = json_type_name(other), "ignoring wrong-typed option");
            None
        }
        None => None,
    }
}

fn num_opt(map: &serde_json::Map<String, Value>, key: &str) -> Option<f64> {
    match map.get(key) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(other) => {
            debug!(key, value_type = json_type_name(other), "ignoring wrong-typed option");
            None
        }
        None => None,
    }
}

fn string_opt(map: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    match map.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::String(_)) | None => None,
        Some(other) => {
            debug!(key, value_type = json_type_name(other), "ignoring wrong-typed option");
            None
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl ConversionOptions {
    /// Builds a fully-defaulted [`ConversionOptions`] from a loose option
    /// bag. `None` or JSON `null` yields the defaults.
    ///
    /// Silently ignoring wrong-typed values (rather than rejecting them) is
    /// part of the observed contract and is preserved as-is.
    pub fn from_json(bag: Option<&Value>) -> Result<Self> {
        let mut opts = Self::default();
        let Some(bag) = bag else {
            return Ok(opts);
        };
        if bag.is_null() {
            return Ok(opts);
        }
        let map = bag.as_object().ok_or(ConvertError::OptionsNotAnObject)?;

        opts.lens_correction = bool_opt(map, "lensCorrection");
        opts.exposure = num_opt(map, "exposure");
        opts.boost = num_opt(map, "boost");
        opts.boost_shadow = num_opt(map, "boostShadow");
        opts.baseline_exposure = num_opt(map, "baselineExposure");
        opts.neutral_temperature = num_opt(map, "neutralTemperature");
        opts.neutral_tint = num_opt(map, "neutralTint");
        opts.disable_gamut_map = bool_opt(map, "disableGamutMap");
        opts.allow_draft_mode = bool_opt(map, "allowDraftMode");
        opts.ignore_orientation = bool_opt(map, "ignoreOrientation");
        opts.color_noise_reduction = num_opt(map, "colorNoiseReduction");
        opts.luminance_noise_reduction = num_opt(map, "luminanceNoiseReduction");
        opts.contrast = num_opt(map, "contrast");
        opts.sharpness = num_opt(map, "sharpness");
        opts.noise_reduction = num_opt(map, "noiseReduction");
        opts.local_tone_map = num_opt(map, "localToneMapAmount");
        opts.scale_factor = num_opt(map, "scaleFactor");
        opts.preserve_exif = bool_opt(map, "preserveExifData");
        opts.extract_metadata = bool_opt(map, "extractMetadata");
        opts.input_format = string_opt(map, "inputFormat");
        opts.quality = num_opt(map, "quality");
        opts.embed_thumbnail = bool_opt(map, "embedThumbnail");
        opts.optimize_color_for_sharing = bool_opt(map, "optimizeColorForSharing");

        Ok(opts)
    }
}
