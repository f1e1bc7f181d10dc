//! Batch extraction pipeline
//!
//! Walks an inclusive range of snapshot indices, pulls the vorticity and
//! velocity fields out of every snapshot, crops each one to the GPI frame
//! and writes the frames out as text grids. The whole batch shares the mesh
//! dimensions measured on the first snapshot; any failure aborts the run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    frame::{self, FrameSize},
    grid::{self, GridError},
    snapshot::{snapshot_path, SnapshotError, SnapshotStore},
};

/// The fields pulled out of every snapshot and their output directories
const FIELDS: [(&str, &str); 3] = [
    ("vorticity", "vort"),
    ("velocityX", "vx"),
    ("velocityY", "vy"),
];

#[derive(thiserror::Error, Debug)]
pub enum BatchError {
    #[error("Invalid snapshot range {f_start}..={f_end}")]
    InvalidRange { f_start: i32, f_end: i32 },
    #[error("Snapshot {path:?} does not exist")]
    MissingSnapshot { path: PathBuf },
    #[error("Snapshot #{index}: field `{name}` has {got} samples, expected {expected}")]
    DimensionMismatch {
        index: i32,
        name: String,
        expected: usize,
        got: usize,
    },
    #[error("Failed to create the output directory {path:?}")]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to read from the snapshot store")]
    Snapshot(#[from] SnapshotError),
    #[error("Failed to write a frame grid")]
    Grid(#[from] GridError),
}
type Result<T> = std::result::Result<T, BatchError>;

/// What a completed batch processed
#[derive(Debug)]
pub struct BatchSummary {
    /// Number of snapshots extracted
    pub files: usize,
    /// Real-space mesh dimensions `(nx, ny)` shared by the whole batch
    pub real_dims: (usize, usize),
    /// Spectral-space mesh dimensions `(nkx, nky)`, reported but not used
    /// by the extraction itself
    pub spectral_dims: (usize, usize),
}

/// Batch extraction configuration
pub struct Batch {
    snapshot_dir: PathBuf,
    stem: String,
    extension: String,
    frame: FrameSize,
    output_dir: PathBuf,
}
impl Default for Batch {
    fn default() -> Self {
        Self {
            snapshot_dir: PathBuf::from("."),
            stem: String::from("beta"),
            extension: String::from("npz"),
            frame: FrameSize::default(),
            output_dir: PathBuf::from("."),
        }
    }
}
impl Batch {
    pub fn snapshot_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        Self {
            snapshot_dir: dir.as_ref().to_path_buf(),
            ..self
        }
    }
    pub fn stem<S: Into<String>>(self, stem: S) -> Self {
        Self {
            stem: stem.into(),
            ..self
        }
    }
    pub fn extension<S: Into<String>>(self, extension: S) -> Self {
        Self {
            extension: extension.into(),
            ..self
        }
    }
    pub fn frame_size(self, frame: FrameSize) -> Self {
        Self { frame, ..self }
    }
    pub fn output_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        Self {
            output_dir: dir.as_ref().to_path_buf(),
            ..self
        }
    }

    /// Extracts every snapshot in `f_start..=f_end`
    pub fn run<S: SnapshotStore>(&self, store: &S, f_start: i32, f_end: i32) -> Result<BatchSummary> {
        self.run_with(store, f_start, f_end, |_| {})
    }

    /// Same as [`run`](Batch::run), calling `on_snapshot` with each index as
    /// it completes
    pub fn run_with<S, F>(
        &self,
        store: &S,
        f_start: i32,
        f_end: i32,
        mut on_snapshot: F,
    ) -> Result<BatchSummary>
    where
        S: SnapshotStore,
        F: FnMut(i32),
    {
        if f_end < f_start {
            return Err(BatchError::InvalidRange { f_start, f_end });
        }

        for (_, dir) in FIELDS {
            let path = self.output_dir.join(dir);
            fs::create_dir_all(&path).map_err(|source| BatchError::OutputDir { path, source })?;
        }

        // the first snapshot pins the mesh dimensions for the whole batch
        let first = self.resolve(f_start);
        if !store.exists(&first) {
            return Err(BatchError::MissingSnapshot { path: first });
        }
        let real_dims = store.real_dims(&first)?;
        let spectral_dims = store.spectral_dims(&first)?;
        log::debug!(
            "real-space mesh {}x{}, spectral mesh {}x{}",
            real_dims.0,
            real_dims.1,
            spectral_dims.0,
            spectral_dims.1
        );
        let start = frame::center_offset(real_dims.0, real_dims.1);

        self.extract(store, &first, f_start, real_dims, start)?;
        on_snapshot(f_start);
        for f_num in (f_start + 1)..=f_end {
            let path = self.resolve(f_num);
            if !store.exists(&path) {
                return Err(BatchError::MissingSnapshot { path });
            }
            self.extract(store, &path, f_num, real_dims, start)?;
            on_snapshot(f_num);
        }

        Ok(BatchSummary {
            files: (f_end - f_start + 1) as usize,
            real_dims,
            spectral_dims,
        })
    }

    fn resolve(&self, f_num: i32) -> PathBuf {
        snapshot_path(&self.snapshot_dir, &self.stem, &self.extension, f_num)
    }

    /// Crops and writes the three fields of one snapshot
    fn extract<S: SnapshotStore>(
        &self,
        store: &S,
        path: &Path,
        f_num: i32,
        (nx, ny): (usize, usize),
        start: (usize, usize),
    ) -> Result<()> {
        log::info!("Extracting {:?}...", path);
        let rows = frame::window_extent(nx, self.frame.rows, start.0);
        let cols = frame::window_extent(ny, self.frame.cols, start.1);
        for (name, dir) in FIELDS {
            let field = store.field(path, name)?;
            if field.len() != nx * ny {
                return Err(BatchError::DimensionMismatch {
                    index: f_num,
                    name: name.to_string(),
                    expected: nx * ny,
                    got: field.len(),
                });
            }
            let window = frame::crop(&field, nx, ny, self.frame, start);
            let out = self
                .output_dir
                .join(dir)
                .join(format!("{}.{:04}.txt", dir, f_num));
            grid::write_grid_to_path(&out, rows, cols, &window)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::snapshot::SnapshotError;

    const NX: usize = 100;
    const NY: usize = 80;

    /// In-memory snapshot store with identical fields at every index
    struct MemStore {
        snapshots: HashMap<PathBuf, HashMap<String, Vec<f32>>>,
        real_dims: (usize, usize),
        spectral_dims: (usize, usize),
    }
    impl SnapshotStore for MemStore {
        fn exists(&self, path: &Path) -> bool {
            self.snapshots.contains_key(path)
        }
        fn real_dims(&self, _path: &Path) -> std::result::Result<(usize, usize), SnapshotError> {
            Ok(self.real_dims)
        }
        fn spectral_dims(&self, _path: &Path) -> std::result::Result<(usize, usize), SnapshotError> {
            Ok(self.spectral_dims)
        }
        fn field(&self, path: &Path, name: &str) -> std::result::Result<Vec<f32>, SnapshotError> {
            self.snapshots
                .get(path)
                .and_then(|fields| fields.get(name))
                .cloned()
                .ok_or_else(|| SnapshotError::FieldNotFound {
                    name: name.to_string(),
                    path: path.to_path_buf(),
                })
        }
    }

    /// `value(r, c) = r * NY + c`
    fn pattern() -> Vec<f32> {
        (0..NX * NY).map(|k| k as f32).collect()
    }

    fn fields_of(payload: Vec<f32>) -> HashMap<String, Vec<f32>> {
        FIELDS
            .iter()
            .map(|&(name, _)| (name.to_string(), payload.clone()))
            .collect()
    }

    fn store_with(dir: &Path, indices: &[i32]) -> MemStore {
        let mut snapshots = HashMap::new();
        for &index in indices {
            snapshots.insert(snapshot_path(dir, "beta", "npz", index), fields_of(pattern()));
        }
        MemStore {
            snapshots,
            real_dims: (NX, NY),
            spectral_dims: (NX, NY / 2 + 1),
        }
    }

    fn read_grid(path: &Path) -> Vec<Vec<f32>> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| {
                line.split_whitespace()
                    .map(|token| token.parse().unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn end_to_end() {
        let out = tempfile::tempdir().unwrap();
        let snapshots = Path::new("/snapshots");
        let store = store_with(snapshots, &[1000, 1001, 1002]);
        let batch = Batch::default()
            .snapshot_dir(snapshots)
            .output_dir(out.path());

        let summary = batch.run(&store, 1000, 1002).unwrap();
        assert_eq!(summary.files, 3);
        assert_eq!(summary.real_dims, (NX, NY));
        assert_eq!(summary.spectral_dims, (NX, NY / 2 + 1));

        // the default 80x64 window anchored at (50, 40) overruns the
        // 100x80 mesh: 50 rows and 40 columns survive
        let grid = read_grid(&out.path().join("vort/vort.1000.txt"));
        assert_eq!(grid.len(), 50);
        assert!(grid.iter().all(|row| row.len() == 40));
        assert_eq!(grid[0][0], (50 * NY + 40) as f32);

        for (_, dir) in FIELDS {
            for index in 1000..=1002 {
                let path = out.path().join(dir).join(format!("{}.{}.txt", dir, index));
                assert!(path.is_file(), "{:?} is missing", path);
            }
        }
    }

    #[test]
    fn frame_within_bounds() {
        let out = tempfile::tempdir().unwrap();
        let snapshots = Path::new("/snapshots");
        let store = store_with(snapshots, &[7]);
        let batch = Batch::default()
            .snapshot_dir(snapshots)
            .output_dir(out.path())
            .frame_size(FrameSize { rows: 10, cols: 8 });

        batch.run(&store, 7, 7).unwrap();

        let grid = read_grid(&out.path().join("vx/vx.0007.txt"));
        assert_eq!(grid.len(), 10);
        assert!(grid.iter().all(|row| row.len() == 8));
        assert_eq!(grid[0][0], (50 * NY + 40) as f32);
        assert_eq!(grid[1][0], (51 * NY + 40) as f32);
        assert_eq!(grid[0][7], (50 * NY + 47) as f32);
    }

    #[test]
    fn rejects_inverted_range() {
        let out = tempfile::tempdir().unwrap();
        let store = store_with(Path::new("/snapshots"), &[]);
        let batch = Batch::default().output_dir(out.path());

        let err = batch.run(&store, 10, 9).unwrap_err();
        assert!(matches!(err, BatchError::InvalidRange { .. }));
        // rejected before any I/O
        assert!(!out.path().join("vort").exists());
    }

    #[test]
    fn aborts_on_missing_snapshot() {
        let out = tempfile::tempdir().unwrap();
        let snapshots = Path::new("/snapshots");
        let store = store_with(snapshots, &[1000, 1002]);
        let batch = Batch::default()
            .snapshot_dir(snapshots)
            .output_dir(out.path());

        let err = batch.run(&store, 1000, 1002).unwrap_err();
        match err {
            BatchError::MissingSnapshot { path } => {
                assert_eq!(path, snapshot_path(snapshots, "beta", "npz", 1001))
            }
            other => panic!("unexpected error: {:?}", other),
        }
        // index 1000 was already written and stays, nothing later appears
        assert!(out.path().join("vort/vort.1000.txt").is_file());
        assert!(!out.path().join("vort/vort.1001.txt").exists());
        assert!(!out.path().join("vort/vort.1002.txt").exists());
    }

    #[test]
    fn detects_dimension_mismatch() {
        let out = tempfile::tempdir().unwrap();
        let snapshots = Path::new("/snapshots");
        let mut store = store_with(snapshots, &[1000]);
        // a later snapshot from a different mesh
        store.snapshots.insert(
            snapshot_path(snapshots, "beta", "npz", 1001),
            fields_of(vec![0f32; 50 * 40]),
        );
        let batch = Batch::default()
            .snapshot_dir(snapshots)
            .output_dir(out.path());

        let err = batch.run(&store, 1000, 1001).unwrap_err();
        match err {
            BatchError::DimensionMismatch { index, expected, got, .. } => {
                assert_eq!(index, 1001);
                assert_eq!(expected, NX * NY);
                assert_eq!(got, 50 * 40);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn output_directories_are_idempotent() {
        let out = tempfile::tempdir().unwrap();
        let snapshots = Path::new("/snapshots");
        let store = store_with(snapshots, &[1, 2]);
        let batch = Batch::default()
            .snapshot_dir(snapshots)
            .output_dir(out.path());

        batch.run(&store, 1, 1).unwrap();
        // second run over pre-existing directories
        batch.run(&store, 2, 2).unwrap();
        assert!(out.path().join("vy/vy.0002.txt").is_file());
    }

    #[test]
    fn reports_every_index_in_order() {
        let out = tempfile::tempdir().unwrap();
        let snapshots = Path::new("/snapshots");
        let store = store_with(snapshots, &[5, 6, 7]);
        let batch = Batch::default()
            .snapshot_dir(snapshots)
            .output_dir(out.path());

        let mut seen = vec![];
        batch.run_with(&store, 5, 7, |f_num| seen.push(f_num)).unwrap();
        assert_eq!(seen, vec![5, 6, 7]);
    }
}
