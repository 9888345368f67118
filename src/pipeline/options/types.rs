//! Typed conversion options.

/// Rendering and encoding knobs for one conversion.
///
/// Every field is optional: `None` means "let the render engine use its own
/// default", which is deliberately distinct from an explicit zero. The
/// adapter never forwards an unset field to the engine.
///
/// `quality`, `embed_thumbnail` and `optimize_color_for_sharing` are encoder
/// refinements; which of them apply depends on the output format (see
/// `EncoderParams`), and supplying one for a format that does not take it is
/// not an error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversionOptions {
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
    /// Carry source EXIF into the encoded output. Defaults to on.
    pub preserve_exif: Option<bool>,
    /// Populate `OutputImage::metadata`. Defaults to off.
    pub extract_metadata: Option<bool>,
    /// Format hint for buffer inputs (file extension without the dot).
    /// Required when the engine cannot infer the format from bytes alone.
    pub input_format: Option<String>,
    pub quality: Option<f64>,
    pub embed_thumbnail: Option<bool>,
    pub optimize_color_for_sharing: Option<bool>,
}

impl ConversionOptions {
    pub fn preserve_exif(&self) -> bool {
        self.preserve_exif.unwrap_or(true)
    }

    pub fn extract_metadata(&self) -> bool {
        self.extract_metadata.unwrap_or(false)
    }

    /// True when the render engine should read source metadata at all.
    pub fn wants_source_metadata(&self) -> bool {
        self.preserve_exif() || self.extract_metadata()
    }
}
