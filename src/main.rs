use base64::Engine as _;
use base64::engine::general_purpose;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crackscan::{Config, CrackAnalyzer};

#[derive(Parser)]
#[command(name = "crackscan")]
#[command(about = "Detect and measure surface cracks in images")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// JSON config file; unspecified fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Minimum contour area to count as a crack region
    #[arg(long, value_name = "AREA")]
    min_crack_area: Option<f64>,

    /// Output format of the annotated image (png, jpg, bmp)
    #[arg(long, value_name = "FORMAT")]
    output_format: Option<String>,

    /// Also compute the adaptive threshold branch (debug-only output)
    #[arg(long)]
    adaptive_threshold: bool,

    /// Write the annotated image to this file
    #[arg(long, value_name = "FILE")]
    annotated_out: Option<PathBuf>,

    /// Save per-stage debug images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Pretty-print the JSON result
    #[arg(long)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str::<Config>(&raw)
                .map_err(|e| anyhow::anyhow!("invalid config file {}: {}", path.display(), e))?
        }
        None => Config::default(),
    };
    if let Some(min_crack_area) = args.min_crack_area {
        config.min_crack_area = min_crack_area;
    }
    if let Some(output_format) = args.output_format {
        config.output_format = output_format;
    }
    if args.adaptive_threshold {
        config.adaptive_threshold = true;
    }

    let bytes = std::fs::read(&args.image_path)?;

    let mut analyzer = CrackAnalyzer::new(config);
    if let Some(debug_dir) = args.debug_out {
        analyzer = analyzer.with_debug(debug_dir)?;
    }

    let result = analyzer.analyze(&bytes)?;

    if let Some(path) = &args.annotated_out {
        let annotated = general_purpose::STANDARD.decode(&result.processed_image_base64)?;
        std::fs::write(path, annotated)?;
    }

    let json = if args.pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{}", json);

    Ok(())
}
