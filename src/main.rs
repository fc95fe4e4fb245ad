use clap::Parser;
use image::ImageReader;
use std::path::PathBuf;

use moldetect::detection::steps::*;
use moldetect::{
    ClassifierConfig, DetectionPipeline, DoubleBondConfig, Pipeline, RingFinderConfig,
};

#[derive(Parser)]
#[command(name = "moldetect")]
#[command(about = "Detect chemical structure diagrams (rings, double bonds, letter labels) in images")]
struct Cli {
    /// Path to input image file
    #[arg(value_name = "IMAGE")]
    image_path: PathBuf,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Save per-step debug images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// Stop after ring detection (skips the bond/letter stages)
    #[arg(long)]
    rings_only: bool,

    /// Erode the image with an NxN kernel before detection
    #[arg(long, value_name = "N")]
    enhance_kernel: Option<u32>,

    /// Print the detection report as JSON (runs the detection chain directly,
    /// without per-step debug output)
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();

    if args.verbose {
        println!("Loading image: {:?}", args.image_path);
    }

    let img = ImageReader::open(&args.image_path)?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image: {}", e))?;

    if args.verbose {
        println!("Image loaded: {}x{}\n", img.width(), img.height());
    }

    if args.json {
        let mut detector = DetectionPipeline::new().with_verbose(args.verbose);
        if let Some(n) = args.enhance_kernel {
            detector = detector.with_enhance_kernel((n, n));
        }
        let report = detector.detect(&img)?;
        println!("{}", serde_json::to_string_pretty(&report.summary())?);
        return Ok(());
    }

    // Build pipeline
    let mut pipeline_builder = Pipeline::new().with_verbose(args.verbose);

    if let Some(n) = args.enhance_kernel {
        pipeline_builder = pipeline_builder.add_step(Box::new(EnhanceStep {
            kernel_size: (n, n),
        }));
    }

    pipeline_builder = pipeline_builder
        .add_step(Box::new(ForegroundIsolationStep {
            config: RingFinderConfig::default(),
        }))
        .add_step(Box::new(RingDetectionStep {
            config: RingFinderConfig::default(),
        }));

    if !args.rings_only {
        pipeline_builder = pipeline_builder
            .add_step(Box::new(DoubleBondMaskStep {
                config: DoubleBondConfig::default(),
            }))
            .add_step(Box::new(ClassifyStep {
                config: ClassifierConfig::default(),
            }));
    }

    if let Some(debug_dir) = args.debug_out {
        pipeline_builder = pipeline_builder.with_debug(debug_dir)?;
    }

    if args.verbose {
        println!("Running pipeline...\n");
    }
    let results = pipeline_builder.run(img)?;

    // Print results
    let ring_count = results
        .iter()
        .find_map(|item| item.get_int("ring_count"))
        .unwrap_or(0);

    if args.rings_only {
        println!("\n=== Ring Detection Results ===");
        println!("Total rings detected: {}", ring_count);
    } else {
        let letters = results
            .iter()
            .find_map(|item| item.get_int("letter_count"))
            .unwrap_or(0);
        let double_bonds = results
            .iter()
            .find_map(|item| item.get_int("double_bond_count"))
            .unwrap_or(0);

        println!("\n=== Structure Detection Results ===");
        println!("Rings detected:        {}", ring_count);
        println!("Letters detected:      {}", letters);
        println!("Double bonds detected: {}", double_bonds);
    }

    Ok(())
}
