//! Extraction of GPI camera frames from turbulence simulation snapshots
//!
//! A simulation run drops one snapshot archive per time index, each holding
//! the vorticity and velocity fields on the full mesh. This crate crops the
//! pixel window a gas-puff-imaging camera would see out of every field of a
//! range of snapshots and writes the windows out as plain-text grids for the
//! downstream imaging tool.

pub mod batch;
pub mod error;
pub mod frame;
pub mod grid;
pub mod snapshot;

pub use batch::{Batch, BatchError, BatchSummary};
pub use error::Error;
pub use frame::{center_offset, crop, window_extent, FrameSize};
pub use grid::{write_grid, write_grid_to_path, GridError};
pub use snapshot::{snapshot_path, NpzStore, SnapshotError, SnapshotStore};
