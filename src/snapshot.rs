//! Snapshot archive access
//!
//! A simulation run leaves one snapshot archive per time index, each holding
//! the named 2D fields and the two mesh definitions. The [`SnapshotStore`]
//! trait keeps the archive format behind a seam; [`NpzStore`] reads the
//! NumPy `.npz` flavor of the archives.

use std::{
    io,
    path::{Path, PathBuf},
};

use npyz::npz::NpzArchive;

#[derive(thiserror::Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read the snapshot archive")]
    Io(#[from] io::Error),
    #[error("Array `{name}` is missing from {path:?}")]
    FieldNotFound { name: String, path: PathBuf },
    #[error("Mesh `{name}` in {path:?} is not two-dimensional")]
    NotTwoDimensional { name: String, path: PathBuf },
}
type Result<T> = std::result::Result<T, SnapshotError>;

/// One snapshot archive opened by path
pub trait SnapshotStore {
    /// Tells whether the snapshot resource is present
    fn exists(&self, path: &Path) -> bool;
    /// Real-space mesh dimensions `(nx, ny)`
    fn real_dims(&self, path: &Path) -> Result<(usize, usize)>;
    /// Spectral-space mesh dimensions `(nkx, nky)`
    fn spectral_dims(&self, path: &Path) -> Result<(usize, usize)>;
    /// A named field as a flat row-major array
    fn field(&self, path: &Path, name: &str) -> Result<Vec<f32>>;
}

/// Resolves the conventional snapshot filename, e.g. `beta.1734.npz`
pub fn snapshot_path(dir: &Path, stem: &str, ext: &str, index: i32) -> PathBuf {
    dir.join(format!("{}.{:04}.{}", stem, index, ext))
}

/// Snapshot archives stored as NumPy `.npz` files
///
/// Mesh dimensions are taken from the shapes of the `spacemesh` and `kmesh`
/// arrays, fields from same-named f32 arrays. Every query opens the archive
/// afresh and drops it on return.
#[derive(Debug, Default, Clone, Copy)]
pub struct NpzStore;

impl NpzStore {
    const REAL_MESH: &'static str = "spacemesh";
    const SPECTRAL_MESH: &'static str = "kmesh";

    fn mesh_dims(&self, path: &Path, name: &str) -> Result<(usize, usize)> {
        let mut npz = NpzArchive::open(path)?;
        let npy = npz
            .by_name(name)?
            .ok_or_else(|| SnapshotError::FieldNotFound {
                name: name.to_string(),
                path: path.to_path_buf(),
            })?;
        match npy.shape() {
            &[nx, ny] => Ok((nx as usize, ny as usize)),
            _ => Err(SnapshotError::NotTwoDimensional {
                name: name.to_string(),
                path: path.to_path_buf(),
            }),
        }
    }
}
impl SnapshotStore for NpzStore {
    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
    fn real_dims(&self, path: &Path) -> Result<(usize, usize)> {
        self.mesh_dims(path, Self::REAL_MESH)
    }
    fn spectral_dims(&self, path: &Path) -> Result<(usize, usize)> {
        self.mesh_dims(path, Self::SPECTRAL_MESH)
    }
    fn field(&self, path: &Path, name: &str) -> Result<Vec<f32>> {
        let mut npz = NpzArchive::open(path)?;
        let npy = npz
            .by_name(name)?
            .ok_or_else(|| SnapshotError::FieldNotFound {
                name: name.to_string(),
                path: path.to_path_buf(),
            })?;
        Ok(npy.into_vec::<f32>()?)
    }
}
