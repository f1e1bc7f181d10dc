use std::path::PathBuf;

use extract_frames::{Batch, FrameSize, NpzStore};
use indicatif::ProgressBar;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "extract-frames",
    about = "Extracting GPI camera frames from turbulence snapshots"
)]
struct Opt {
    /// First snapshot index of the batch (inclusive)
    start: i32,
    /// Last snapshot index of the batch (inclusive)
    end: i32,
    /// Path to the snapshot file repository
    #[structopt(long, default_value = ".")]
    path: PathBuf,
    /// Snapshot filename stem
    #[structopt(long, default_value = "beta")]
    stem: String,
    /// Snapshot filename extension
    #[structopt(long, default_value = "npz")]
    ext: String,
    /// Frame size in pixels, ROWSxCOLS
    #[structopt(short, long, default_value = "80x64")]
    frame: FrameSize,
    /// Output directory root
    #[structopt(short, long, default_value = ".")]
    out: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let opt = Opt::from_args();

    let batch = Batch::default()
        .snapshot_dir(&opt.path)
        .stem(opt.stem)
        .extension(opt.ext)
        .frame_size(opt.frame)
        .output_dir(&opt.out);

    let pb = ProgressBar::new((opt.end - opt.start + 1).max(0) as u64);
    let summary = batch.run_with(&NpzStore, opt.start, opt.end, |_| pb.inc(1))?;
    pb.finish_and_clear();

    println!(
        "Extracted {} frames from {} snapshots on a {}x{} mesh",
        opt.frame,
        summary.files,
        summary.real_dims.0,
        summary.real_dims.1
    );
    Ok(())
}
