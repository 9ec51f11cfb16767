use argh::FromArgs;
use std::path::PathBuf;

use opencv::{core::Mat, imgcodecs, prelude::*};
use stitch_features::{
    opencv::{construct, registry, OpenCvDetector},
    DetectorParams, FeatureBackend,
};

/// Compute keypoint features of images with one of the available detectors.
#[derive(FromArgs)]
struct Args {
    /// list the available detectors and exit
    #[argh(switch)]
    list: bool,

    /// detector to use, defaults to the first available one
    #[argh(option, short = 'd')]
    detector: Option<String>,

    /// json file with the detector parameters
    #[argh(option, short = 'c')]
    config: Option<PathBuf>,

    /// images to process
    #[argh(positional)]
    images: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.list {
        for kind in registry().identifiers() {
            if *kind == registry().default_kind() {
                println!("{kind} (default)");
            } else {
                println!("{kind}");
            }
        }
        return Ok(());
    }

    let mut detector = build_detector(&args)?;
    log::info!("using feature detector {}", detector.kind());

    let images = args
        .images
        .iter()
        .map(read_image)
        .collect::<Result<Vec<_>, _>>()?;

    let features = detector.detect_batch(&images)?;
    for (path, features) in args.images.iter().zip(&features) {
        let summary = registry().backend().summarize(features);
        println!(
            "{}: {} keypoints, descriptors {}x{}",
            path.display(),
            summary.keypoints,
            summary.descriptor_rows,
            summary.descriptor_cols
        );
    }

    Ok(())
}

fn build_detector(args: &Args) -> Result<OpenCvDetector, Box<dyn std::error::Error>> {
    let Some(config) = &args.config else {
        return Ok(construct(args.detector.as_deref())?);
    };

    let params = DetectorParams::from_json_file(config)?;
    if let Some(name) = &args.detector {
        if name.parse::<stitch_features::DetectorKind>()? != params.kind() {
            return Err(format!(
                "--detector {name} does not match the {} parameters in {}",
                params.kind(),
                config.display()
            )
            .into());
        }
    }

    Ok(registry().construct_with(params)?)
}

fn read_image(path: &PathBuf) -> Result<Mat, Box<dyn std::error::Error>> {
    let path_str = path
        .to_str()
        .ok_or_else(|| format!("Invalid image path: {}", path.display()))?;
    let img = imgcodecs::imread(path_str, imgcodecs::IMREAD_COLOR)?;
    if img.empty() {
        return Err(format!("Failed to read image: {}", path.display()).into());
    }
    Ok(img)
}
