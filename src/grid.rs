//! Text grid serialization
//!
//! The downstream imaging tool ingests one frame per file: rows separated by
//! newlines, columns by a single space, no header.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum GridError {
    #[error("Failed to write the grid file {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
type Result<T> = std::result::Result<T, GridError>;

/// Writes a flat row-major field as a `rows`x`cols` text grid
pub fn write_grid<W: Write>(w: &mut W, rows: usize, cols: usize, field: &[f32]) -> std::io::Result<()> {
    for r in 0..rows {
        for c in 0..cols {
            if c > 0 {
                write!(w, " ")?;
            }
            write!(w, "{}", field[r * cols + c])?;
        }
        writeln!(w)?;
    }
    Ok(())
}

/// Writes a text grid to `path`, creating or truncating the destination
pub fn write_grid_to_path<P: AsRef<Path>>(path: P, rows: usize, cols: usize, field: &[f32]) -> Result<()> {
    let path = path.as_ref();
    let io = |source| GridError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut w = BufWriter::new(File::create(path).map_err(io)?);
    write_grid(&mut w, rows, cols, field).map_err(io)?;
    w.flush().map_err(io)
}
