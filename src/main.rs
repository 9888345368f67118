use std::path::Path;

use rawbridge::logger;
use rawbridge::pipeline::{ConversionInput, RawConverter};

use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logger::init();

    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "input.arw".to_string());
    let format = args.next().unwrap_or_else(|| "jpeg".to_string());
    let output = args.next().unwrap_or_else(|| "output.jpg".to_string());

    info!("Starting rawbridge...");
    info!("Input: {input}");
    info!("Output format: {format}");

    let converter = RawConverter::new();
    let options = serde_json::json!({ "extractMetadata": true });

    match converter.convert_raw(
        ConversionInput::Path(Path::new(&input)),
        &format,
        Some(&options),
    ) {
        Ok(image) => {
            if let Some(meta) = &image.metadata {
                if let (Some(make), Some(model)) = (&meta.camera_make, &meta.camera_model) {
                    info!("Camera: {make} {model}");
                }
                info!("Dimensions: {}x{}", meta.width, meta.height);
            }
            std::fs::write(&output, &image.buffer)?;
            info!("Conversion successful! Wrote {} bytes to {output}", image.buffer.len());
        }
        Err(e) => error!("Conversion failed: {e}"),
    }

    Ok(())
}
