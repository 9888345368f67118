//! Engine parameter mapping.

use crate::pipeline::options::ConversionOptions;

/// The render engine's native parameter set, derived from
/// [`ConversionOptions`] by one fixed mapping.
///
/// Unset options stay `None` here: an engine must apply its own default for
/// an absent parameter, and the adapter never invents a sentinel value to
/// fill the gap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderParams {
    pub lens_correction: Option<bool>,
    pub exposure: Option<f64>,
    pub boost: Option<f64>,
    pub boost_shadow: Option<f64>,
    pub baseline_exposure: Option<f64>,
    pub neutral_temperature: Option<f64>,
    pub neutral_tint: Option<f64>,
    pub disable_gamut_map: Option<bool>,
    pub allow_draft_mode: Option<bool>,
    pub ignore_orientation: Option<bool>,
    pub color_noise_reduction: Option<f64>,
    pub luminance_noise_reduction: Option<f64>,
    pub contrast: Option<f64>,
    pub sharpness: Option<f64>,
    pub noise_reduction: Option<f64>,
    pub local_tone_map: Option<f64>,
    pub scale_factor: Option<f64>,
    /// Whether the engine should read source metadata alongside the render.
    /// Reading metadata has a real per-field cost, so it is opt-in.
    pub want_metadata: bool,
}

impl RenderParams {
    pub fn from_options(options: &ConversionOptions) -> Self {
        Self {
            lens_correction: options.lens_correction,
            exposure: options.exposure,
            boost: options.boost,
            boost_shadow: options.boost_shadow,
            baseline_exposure: options.baseline_exposure,
            neutral_temperature: options.neutral_temperature,
            neutral_tint: options.neutral_tint,
            disable_gamut_map: options.disable_gamut_map,
            allow_draft_mode: options.allow_draft_mode,
            ignore_orientation: options.ignore_orientation,
            color_noise_reduction: options.color_noise_reduction,
            luminance_noise_reduction: options.luminance_noise_reduction,
            contrast: options.contrast,
            sharpness: options.sharpness,
            noise_reduction: options.noise_reduction,
            local_tone_map: options.local_tone_map,
            scale_factor: options.scale_factor,
            want_metadata: options.wants_source_metadata(),
        }
    }
}
