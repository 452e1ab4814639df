use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use watermark_overlay::{
    default_output_path, fetch, save_image, Position, ProcessResult, WatermarkEngine,
    WatermarkSpec,
};

#[derive(Parser)]
#[command(
    name = "watermark-overlay",
    about = "Overlay text and logo watermarks onto images",
    version,
    after_help = "Simple usage: watermark-overlay photo.jpg --text \"(c) me\"\n\n\
                  Pass a directory as input (with -o <dir>) to watermark every\n\
                  supported image in it. Use --url to fetch the base image over HTTP."
)]
struct Cli {
    /// Input image file or directory
    input: Option<String>,

    /// Download the base image from a URL instead of reading a file
    #[arg(short, long, conflicts_with = "input")]
    url: Option<String>,

    /// Logo image file to overlay
    #[arg(short, long)]
    logo: Option<String>,

    /// Text label to overlay
    #[arg(short, long)]
    text: Option<String>,

    /// Watermark anchor: top-left, top-right, bottom-left, bottom-right, center
    #[arg(short, long, default_value = "bottom-right")]
    position: String,

    /// Watermark opacity (0.0-1.0)
    #[arg(long, default_value = "0.5")]
    opacity: f32,

    /// Logo resize factor / text size multiplier
    #[arg(short, long, default_value = "1.0")]
    scale: f32,

    /// Output file or directory (default: {name}_watermarked.{ext})
    #[arg(short, long)]
    output: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    if !(0.0..=1.0).contains(&cli.opacity) {
        eprintln!("Error: Opacity must be between 0.0 and 1.0");
        process::exit(1);
    }

    if cli.scale <= 0.0 || cli.scale.is_nan() {
        eprintln!("Error: Scale must be greater than 0");
        process::exit(1);
    }

    let has_text = cli.text.as_deref().is_some_and(|t| !t.is_empty());
    if !has_text && cli.logo.is_none() {
        eprintln!("Error: Nothing to overlay; supply --text and/or --logo");
        process::exit(1);
    }

    let engine = match WatermarkEngine::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("Fatal: Failed to initialize engine: {e}");
            process::exit(1);
        }
    };

    let logo = cli.logo.as_deref().map(|path| match image::open(path) {
        Ok(img) => img.to_rgb8(),
        Err(e) => {
            eprintln!("Error: Failed to load logo {path}: {e}");
            process::exit(1);
        }
    });

    let spec = WatermarkSpec {
        text: cli.text,
        logo,
        position: Position::from_name(&cli.position),
        opacity: cli.opacity,
        scale: cli.scale,
    };

    let results = if let Some(url) = &cli.url {
        let output_path = match &cli.output {
            Some(o) => PathBuf::from(o),
            None => PathBuf::from("watermarked.png"),
        };
        vec![process_url(&engine, url, &output_path, &spec)]
    } else if let Some(input) = &cli.input {
        let input_path = Path::new(input);
        if !input_path.exists() {
            eprintln!("Error: Input path does not exist: {input}");
            process::exit(1);
        }

        if input_path.is_dir() {
            let output_dir = if let Some(o) = &cli.output {
                PathBuf::from(o)
            } else {
                eprintln!("Error: Output directory is required for batch processing");
                eprintln!("Usage: watermark-overlay <input_dir> -o <output_dir> [--text|--logo]");
                process::exit(1);
            };
            engine.process_directory(input_path, &output_dir, &spec)
        } else {
            let output_path = match &cli.output {
                Some(o) => PathBuf::from(o),
                None => default_output_path(input_path),
            };
            vec![engine.process_file(input_path, &output_path, &spec)]
        }
    } else {
        eprintln!("Error: {}", watermark_overlay::Error::MissingImage);
        process::exit(1);
    };

    let mut success_count = 0u32;
    let mut fail_count = 0u32;

    for r in &results {
        print_result(r);
        if r.success {
            success_count += 1;
        } else {
            fail_count += 1;
        }
    }

    if results.len() > 1 {
        eprintln!();
        eprint!("[Summary] Processed: {success_count}");
        if fail_count > 0 {
            eprint!(", Failed: {fail_count}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    if fail_count > 0 {
        process::exit(1);
    }
}

fn process_url(
    engine: &WatermarkEngine,
    url: &str,
    output: &Path,
    spec: &WatermarkSpec,
) -> ProcessResult {
    let mut result = ProcessResult {
        path: PathBuf::from(url),
        success: false,
        message: String::new(),
    };

    let base = match fetch::download_image(url) {
        Ok(img) => img,
        Err(e) => {
            result.message = format!("Failed to download: {e}");
            return result;
        }
    };

    let composed = match engine.apply(&base, spec) {
        Ok(img) => img,
        Err(e) => {
            result.message = format!("Failed to watermark: {e}");
            return result;
        }
    };

    match save_image(&composed, output) {
        Ok(()) => {
            result.success = true;
            result.message = format!("Watermark applied -> {}", output.display());
        }
        Err(e) => {
            result.message = format!("Failed to save: {e}");
        }
    }

    result
}

fn print_result(result: &ProcessResult) {
    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        eprintln!("[OK] {filename}: {}", result.message);
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }
}
