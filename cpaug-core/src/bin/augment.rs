use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use glam::Vec2;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use snafu::ResultExt;
use tracing::{error, info, warn};

use cpaug_core::analysis::bbox::OverlapPolicy;
use cpaug_core::annotation::{location_map, read_annotation_file};
use cpaug_core::augment::pipeline::{AugmentConfig, augment_image};
use cpaug_core::augment::visual::draw_overlay;
use cpaug_core::error::*;

#[derive(Parser)]
#[command(name = "augment")]
#[command(about = "Copy-paste augmentation for YOLO object-detection datasets")]
struct Args {
    #[arg(help = "Directory with source images")]
    image_dir: PathBuf,

    #[arg(help = "Directory with YOLO annotation .txt files")]
    label_dir: PathBuf,

    #[arg(help = "Output directory for augmented images")]
    out_image_dir: PathBuf,

    #[arg(help = "Output directory for augmented annotations")]
    out_label_dir: PathBuf,

    #[arg(
        long,
        help = "Reject placements with a true rectangle-intersection test instead of the legacy corner comparison"
    )]
    strict_overlap: bool,

    #[arg(long, help = "Also save an overlay image with all boxes outlined")]
    draw: bool,

    #[arg(long, help = "RNG seed for reproducible placement")]
    seed: Option<u64>,

    #[arg(long, help = "Write a JSON run report to this path")]
    report: Option<PathBuf>,
}

/// Per-image entry of the JSON run report.
#[derive(Serialize)]
struct ImageReport {
    image: String,
    pasted: usize,
    skipped: usize,
    scale: f32,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    fs::create_dir_all(&args.out_image_dir)?;
    fs::create_dir_all(&args.out_label_dir)?;

    let pairs = discover_pairs(&args.image_dir, &args.label_dir)?;
    info!("Found {} image/annotation pairs", pairs.len());

    let config = AugmentConfig {
        policy: if args.strict_overlap {
            OverlapPolicy::Strict
        } else {
            OverlapPolicy::Legacy
        },
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut reports = Vec::new();
    let mut failed = 0usize;
    for (image_path, label_path) in &pairs {
        // One bad pair never takes the batch down
        match process_pair(image_path, label_path, &args, &config, &mut rng) {
            Ok(report) => reports.push(report),
            Err(err) => {
                failed += 1;
                error!("augmentation failed for `{}`: {}", image_path.display(), err);
            }
        }
    }

    if let Some(report_path) = &args.report {
        let json = serde_json::to_string_pretty(&reports)?;
        fs::write(report_path, json)?;
        info!("Run report written to {}", report_path.display());
    }

    println!("\n=== Copy-Paste Augmentation Summary ===");
    println!("Pairs processed: {}", reports.len());
    println!("Pairs failed:    {}", failed);
    println!(
        "Boxes pasted:    {}",
        reports.iter().map(|report| report.pasted).sum::<usize>()
    );
    println!(
        "Boxes skipped:   {}",
        reports.iter().map(|report| report.skipped).sum::<usize>()
    );

    Ok(())
}

/// Pairs every image in `image_dir` with the annotation file of the
/// same stem in `label_dir`. Images without an annotation are skipped
/// with a warning.
fn discover_pairs(
    image_dir: &Path,
    label_dir: &Path,
) -> Result<Vec<(PathBuf, PathBuf)>, Box<dyn Error>> {
    let mut pairs = Vec::new();

    for entry in fs::read_dir(image_dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            continue;
        };
        if !matches!(ext.to_ascii_lowercase().as_str(), "jpg" | "jpeg" | "png") {
            continue;
        }
        let Some(stem) = path.file_stem() else {
            continue;
        };

        let label_path = label_dir.join(stem).with_extension("txt");
        if label_path.exists() {
            pairs.push((path, label_path));
        } else {
            warn!("no annotation for `{}`, skipping", path.display());
        }
    }

    // Deterministic processing order regardless of directory iteration
    pairs.sort();
    Ok(pairs)
}

fn process_pair(
    image_path: &Path,
    label_path: &Path,
    args: &Args,
    config: &AugmentConfig,
    rng: &mut StdRng,
) -> Result<ImageReport, CpaugError> {
    let image_display = image_path.display().to_string();
    let source = image::open(image_path)
        .context(ImageReadSnafu {
            path: &image_display,
        })?
        .to_rgb8();
    let (raw, records) = read_annotation_file(label_path)?;

    let result = augment_image(&source, &raw, &records, config, rng)?;
    info!(
        "`{}`: pasted {}, skipped {} (scale {:.3})",
        image_display,
        result.pasted.len(),
        result.skipped,
        result.scale
    );

    let stem = image_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("image");
    let ext = image_path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("png");

    let out_image_path = args.out_image_dir.join(format!("{}.{}", stem, ext));
    result.image.save(&out_image_path).context(ImageWriteSnafu {
        path: out_image_path.display().to_string(),
    })?;

    let out_label_path = args.out_label_dir.join(format!("{}.txt", stem));
    fs::write(&out_label_path, &result.annotation).context(IoWriteSnafu {
        path: out_label_path.display().to_string(),
    })?;

    if args.draw {
        let (width, height) = source.dimensions();
        let map = location_map(&records, Vec2::new(width as f32, height as f32));
        let overlay = draw_overlay(&result.image, &map, &result.pasted);
        let overlay_path = args.out_image_dir.join(format!("{}_boxes.{}", stem, ext));
        overlay.save(&overlay_path).context(ImageWriteSnafu {
            path: overlay_path.display().to_string(),
        })?;
    }

    Ok(ImageReport {
        image: image_display,
        pasted: result.pasted.len(),
        skipped: result.skipped,
        scale: result.scale,
    })
}
