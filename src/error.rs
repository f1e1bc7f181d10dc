use crate::{batch::BatchError, grid::GridError, snapshot::SnapshotError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `batch` module")]
    Batch(#[from] BatchError),
    #[error("Error in the `snapshot` module")]
    Snapshot(#[from] SnapshotError),
    #[error("Error in the `grid` module")]
    Grid(#[from] GridError),
}
