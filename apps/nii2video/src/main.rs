//! 将成对的 nifti 扫描/标注导出为逐层的 jpg 图像和 npy 掩码序列.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use ct_reel::config::{DEFAULT_IMAGE_FOLDER, DEFAULT_LABEL_FOLDER, DEFAULT_OUTPUT_FOLDER};
use ct_reel::consts::DEFAULT_THRESHOLD;
use ct_reel::Config;
use log::LevelFilter;
use simple_logger::SimpleLogger;

/// Export paired NIfTI volumes as per-slice image/mask sequences.
#[derive(Parser, Debug)]
#[command(name = "nii2video")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the image folder.
    #[arg(long = "image_folder", default_value = DEFAULT_IMAGE_FOLDER, value_name = "DIR")]
    image_folder: PathBuf,

    /// Path to the label folder.
    #[arg(long = "label_folder", default_value = DEFAULT_LABEL_FOLDER, value_name = "DIR")]
    label_folder: PathBuf,

    /// Path to the output folder. `_<threshold>` is appended to it.
    #[arg(long = "output_folder", default_value = DEFAULT_OUTPUT_FOLDER, value_name = "DIR")]
    output_folder: PathBuf,

    /// Threshold for the number of positive pixels in a slice.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD, allow_negative_numbers = true, value_name = "INT")]
    threshold: i64,

    /// Random seed for the slice padding used when the threshold is 0.
    #[arg(long, value_name = "INT")]
    seed: Option<u64>,

    /// Also export the last qualifying slice.
    #[arg(long = "inclusive_upper")]
    inclusive_upper: bool,

    /// Also write a black/white `.png` preview of every mask.
    #[arg(long = "label_preview")]
    label_preview: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for Config {
    fn from(a: Args) -> Self {
        Self {
            image_folder: a.image_folder,
            label_folder: a.label_folder,
            output_folder: a.output_folder,
            threshold: a.threshold,
            seed: a.seed,
            inclusive_upper: a.inclusive_upper,
            label_preview: a.label_preview,
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = SimpleLogger::new().with_level(level).env().init() {
        eprintln!("failed to initialize logger: {e}");
    }

    match ct_reel::export::run(&args.into()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
