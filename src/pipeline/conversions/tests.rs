#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::pipeline::common::error::{ConvertError, Result};
    use crate::pipeline::conversions::{OutputImage, RawConverter};
    use crate::pipeline::encode::{ContainerEncoder, EncoderParams};
    use crate::pipeline::metadata::{MetadataValue, SourceMetadata, keys};
    use crate::pipeline::options::{ConversionOptions, OutputFormat};
    use crate::pipeline::render::{
        RenderEngine, RenderOutput, RenderParams, RenderSource, RenderedImage,
    };
    use crate::pipeline::source::ConversionInput;

    #[derive(Clone)]
    struct MockEngine {
        fail_with: Option<fn() -> ConvertError>,
        width: u32,
        height: u32,
        staging: bool,
        infers_format: bool,
        metadata: Option<SourceMetadata>,
        renders: Arc<AtomicUsize>,
        saw_staged_file: Arc<AtomicUsize>,
    }

    impl MockEngine {
        fn ok(width: u32, height: u32) -> Self {
            Self {
                fail_with: None,
                width,
                height,
                staging: false,
                infers_format: true,
                metadata: None,
                renders: Arc::new(AtomicUsize::new(0)),
                saw_staged_file: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl RenderEngine for MockEngine {
        fn requires_file_staging(&self) -> bool {
            self.staging
        }

        fn infers_format_from_bytes(&self) -> bool {
            self.infers_format
        }

        fn render(&self, source: RenderSource<'_>, params: &RenderParams) -> Result<RenderOutput> {
            self.renders.fetch_add(1, Ordering::SeqCst);
            if let RenderSource::File(path) = source {
                assert!(path.exists(), "staged file should exist during render");
                self.saw_staged_file.fetch_add(1, Ordering::SeqCst);
            }
            if let Some(make_err) = self.fail_with {
                return Err(make_err());
            }
            let pixels = vec![0x40u8; (self.width * self.height * 4) as usize];
            let image = RenderedImage::from_rgba8(self.width, self.height, pixels)
                .ok_or(ConvertError::NoOutputImage)?;
            let metadata = if params.want_metadata {
                self.metadata.clone()
            } else {
                None
            };
            Ok(RenderOutput { image, metadata })
        }
    }

    #[derive(Clone)]
    struct MockEncoder {
        fail: bool,
        encodes: Arc<AtomicUsize>,
        metadata_seen: Arc<AtomicUsize>,
    }

    impl MockEncoder {
        fn ok() -> Self {
            Self {
                fail: false,
                encodes: Arc::new(AtomicUsize::new(0)),
                metadata_seen: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    impl ContainerEncoder for MockEncoder {
        fn encode(
            &self,
            image: &RenderedImage,
            _params: &EncoderParams,
            metadata: Option<&SourceMetadata>,
        ) -> Result<Vec<u8>> {
            self.encodes.fetch_add(1, Ordering::SeqCst);
            if metadata.is_some() {
                self.metadata_seen.fetch_add(1, Ordering::SeqCst);
            }
            if self.fail {
                return Err(ConvertError::DestinationFinalize);
            }
            Ok(vec![0u8; (image.width() * image.height()) as usize])
        }
    }

    fn source_metadata() -> SourceMetadata {
        let mut meta = SourceMetadata::default();
        meta.tiff
            .insert(keys::MAKE.into(), MetadataValue::Text("SONY".into()));
        meta.tiff
            .insert(keys::MODEL.into(), MetadataValue::Text("ILCE-7M3".into()));
        meta
    }

    #[test]
    fn successful_conversion_returns_encoded_bytes() {
        let engine = MockEngine::ok(10, 5);
        let encoder = MockEncoder::ok();
        let converter = RawConverter::with_custom(engine.clone(), encoder.clone());

        let out: OutputImage = converter
            .convert(
                ConversionInput::Buffer(b"fake raw"),
                OutputFormat::Jpeg,
                &ConversionOptions::default(),
            )
            .unwrap();

        assert_eq!(out.buffer.len(), 50);
        assert_eq!(out.metadata, None);
        assert_eq!(engine.renders.load(Ordering::SeqCst), 1);
        assert_eq!(encoder.encodes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_buffer_fails_before_the_engine_runs() {
        let engine = MockEngine::ok(4, 4);
        let converter = RawConverter::with_custom(engine.clone(), MockEncoder::ok());
        let err = converter
            .convert(
                ConversionInput::Buffer(&[]),
                OutputFormat::Jpeg,
                &ConversionOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "Input buffer is empty");
        assert_eq!(engine.renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn empty_path_fails_before_the_engine_runs() {
        let engine = MockEngine::ok(4, 4);
        let converter = RawConverter::with_custom(engine.clone(), MockEncoder::ok());
        let err = converter
            .convert(
                ConversionInput::Path(Path::new("")),
                OutputFormat::Png,
                &ConversionOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "File path cannot be empty");
        assert_eq!(engine.renders.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn buffer_without_hint_is_rejected_when_engine_cannot_infer() {
        let engine = MockEngine {
            infers_format: false,
            ..MockEngine::ok(4, 4)
        };
        let converter = RawConverter::with_custom(engine, MockEncoder::ok());

        let err = converter
            .convert(
                ConversionInput::Buffer(b"opaque"),
                OutputFormat::Jpeg,
                &ConversionOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "inputFormat is required when input is a Buffer");

        // with the hint the same call goes through
        let engine = MockEngine {
            infers_format: false,
            ..MockEngine::ok(4, 4)
        };
        let converter = RawConverter::with_custom(engine, MockEncoder::ok());
        let opts = ConversionOptions {
            input_format: Some("arw".into()),
            ..Default::default()
        };
        assert!(
            converter
                .convert(ConversionInput::Buffer(b"opaque"), OutputFormat::Jpeg, &opts)
                .is_ok()
        );
    }

    #[test]
    fn staging_engine_gets_a_real_file_on_disk() {
        let engine = MockEngine {
            staging: true,
            ..MockEngine::ok(4, 4)
        };
        let converter = RawConverter::with_custom(engine.clone(), MockEncoder::ok());
        converter
            .convert(
                ConversionInput::Buffer(b"needs staging"),
                OutputFormat::Tiff,
                &ConversionOptions::default(),
            )
            .unwrap();
        assert_eq!(engine.saw_staged_file.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn zero_extent_render_is_the_empty_extent_error() {
        let engine = MockEngine::ok(0, 0);
        let encoder = MockEncoder::ok();
        let converter = RawConverter::with_custom(engine, encoder.clone());
        let err = converter
            .convert(
                ConversionInput::Buffer(b"degenerate"),
                OutputFormat::Jpeg,
                &ConversionOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "Output image has empty extent");
        assert_eq!(encoder.encodes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn engine_failures_propagate_verbatim() {
        let engine = MockEngine {
            fail_with: Some(|| ConvertError::RenderFilterCreation),
            ..MockEngine::ok(4, 4)
        };
        let converter = RawConverter::with_custom(engine, MockEncoder::ok());
        let err = converter
            .convert(
                ConversionInput::Buffer(b"bad"),
                OutputFormat::Jpeg,
                &ConversionOptions::default(),
            )
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to create render filter from image data"
        );
    }

    #[test]
    fn encoder_failures_propagate_verbatim() {
        let encoder = MockEncoder {
            fail: true,
            ..MockEncoder::ok()
        };
        let converter = RawConverter::with_custom(MockEngine::ok(4, 4), encoder);
        let err = converter
            .convert(
                ConversionInput::Buffer(b"raw"),
                OutputFormat::Png,
                &ConversionOptions::default(),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to finalize image destination");
    }

    #[test]
    fn metadata_is_extracted_only_on_request() {
        let engine = MockEngine {
            metadata: Some(source_metadata()),
            ..MockEngine::ok(6, 4)
        };
        let converter = RawConverter::with_custom(engine, MockEncoder::ok());

        let out = converter
            .convert(
                ConversionInput::Buffer(b"raw"),
                OutputFormat::Jpeg,
                &ConversionOptions::default(),
            )
            .unwrap();
        assert_eq!(out.metadata, None);

        let engine = MockEngine {
            metadata: Some(source_metadata()),
            ..MockEngine::ok(6, 4)
        };
        let converter = RawConverter::with_custom(engine, MockEncoder::ok());
        let opts = ConversionOptions {
            extract_metadata: Some(true),
            ..Default::default()
        };
        let out = converter
            .convert(ConversionInput::Buffer(b"raw"), OutputFormat::Jpeg, &opts)
            .unwrap();
        let meta = out.metadata.expect("metadata requested");
        assert_eq!(meta.width, 6);
        assert_eq!(meta.height, 4);
        assert_eq!(meta.camera_make.as_deref(), Some("SONY"));
        assert_eq!(meta.camera_model.as_deref(), Some("ILCE-7M3"));
    }

    #[test]
    fn preserve_exif_controls_what_the_encoder_sees() {
        let engine = MockEngine {
            metadata: Some(source_metadata()),
            ..MockEngine::ok(4, 4)
        };
        let encoder = MockEncoder::ok();
        let converter = RawConverter::with_custom(engine, encoder.clone());

        converter
            .convert(
                ConversionInput::Buffer(b"raw"),
                OutputFormat::Jpeg,
                &ConversionOptions::default(),
            )
            .unwrap();
        assert_eq!(encoder.metadata_seen.load(Ordering::SeqCst), 1);

        let engine = MockEngine {
            metadata: Some(source_metadata()),
            ..MockEngine::ok(4, 4)
        };
        let encoder = MockEncoder::ok();
        let converter = RawConverter::with_custom(engine, encoder.clone());
        let opts = ConversionOptions {
            preserve_exif: Some(false),
            ..Default::default()
        };
        converter
            .convert(ConversionInput::Buffer(b"raw"), OutputFormat::Jpeg, &opts)
            .unwrap();
        assert_eq!(encoder.metadata_seen.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rgb_output_is_raw_pixels_not_encoder_output() {
        let encoder = MockEncoder::ok();
        let converter = RawConverter::with_custom(MockEngine::ok(3, 2), encoder.clone());
        let out = converter
            .convert(
                ConversionInput::Buffer(b"raw"),
                OutputFormat::Rgb,
                &ConversionOptions::default(),
            )
            .unwrap();
        assert_eq!(out.buffer.len(), 3 * 2 * 3);
        assert_eq!(encoder.encodes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn string_entry_point_parses_format_and_bag() {
        let converter = RawConverter::with_custom(MockEngine::ok(2, 2), MockEncoder::ok());
        let out = converter
            .convert_raw(ConversionInput::Buffer(b"raw"), " JPG ", None)
            .unwrap();
        assert!(!out.buffer.is_empty());

        let err = converter
            .convert_raw(ConversionInput::Buffer(b"raw"), "bmp", None)
            .unwrap_err();
        assert!(err.to_string().starts_with("Unsupported output format: bmp"));

        let err = converter
            .convert_raw(
                ConversionInput::Buffer(b"raw"),
                "jpeg",
                Some(&serde_json::json!("not an object")),
            )
            .unwrap_err();
        assert_eq!(err.to_string(), "Options must be an object");
    }
}
