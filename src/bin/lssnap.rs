//! Lists the snapshot archives of a repository
//!
//! With a range, reports the indices whose archive is missing instead.

use std::path::PathBuf;

use extract_frames::snapshot_path;
use glob::glob;
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(name = "lssnap")]
struct Opt {
    /// Path to the snapshot file repository
    #[structopt(long, default_value = ".")]
    path: PathBuf,
    /// Snapshot filename stem
    #[structopt(long, default_value = "beta")]
    stem: String,
    /// Snapshot filename extension
    #[structopt(long, default_value = "npz")]
    ext: String,
    /// First snapshot index to check (inclusive)
    #[structopt(short, long, requires = "end")]
    start: Option<i32>,
    /// Last snapshot index to check (inclusive)
    #[structopt(short, long, requires = "start")]
    end: Option<i32>,
}

fn main() -> anyhow::Result<()> {
    let opt = Opt::from_args();

    if let (Some(start), Some(end)) = (opt.start, opt.end) {
        let missing: Vec<_> = (start..=end)
            .map(|index| snapshot_path(&opt.path, &opt.stem, &opt.ext, index))
            .filter(|path| !path.is_file())
            .collect();
        for path in &missing {
            println!("{}", path.display());
        }
        println!("{} of {} missing", missing.len(), (end - start + 1).max(0));
        return Ok(());
    }

    let pattern = opt.path.join(format!("{}.*.{}", opt.stem, opt.ext));
    let mut files: Vec<_> = glob(&pattern.to_string_lossy())?
        .filter_map(|entry| entry.ok())
        .collect();
    files.sort();
    for file in &files {
        println!("{}", file.display());
    }
    println!("{} snapshots", files.len());
    Ok(())
}
