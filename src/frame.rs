//! GPI frame extraction
//!
//! Crops a fixed-size pixel window out of a full simulation field, anchored
//! at the geometric center of the field.

use std::{fmt, str::FromStr};

/// Frame pixel dimensions
///
/// Rows come first to follow the row-major layout of the snapshot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    pub rows: usize,
    pub cols: usize,
}
impl Default for FrameSize {
    /// The GPI camera sensor size: 80x64 pixels
    fn default() -> Self {
        Self { rows: 80, cols: 64 }
    }
}
impl FrameSize {
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}
impl FromStr for FrameSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (rows, cols) = s
            .split_once('x')
            .ok_or_else(|| format!("expected ROWSxCOLS, got `{}`", s))?;
        let parse = |value: &str| {
            value
                .parse::<usize>()
                .map_err(|e| format!("invalid frame dimension `{}`: {}", value, e))
        };
        Ok(Self {
            rows: parse(rows)?,
            cols: parse(cols)?,
        })
    }
}

/// Returns the window anchor: the geometric center of a `nx`x`ny` field
///
/// The window starts at the center, it is not centered around the window
/// itself.
pub fn center_offset(nx: usize, ny: usize) -> (usize, usize) {
    (nx / 2, ny / 2)
}

/// Number of window rows (or columns) that land inside the source extent
pub fn window_extent(extent: usize, window: usize, start: usize) -> usize {
    extent.saturating_sub(start).min(window)
}

/// Extracts the frame window from a flat row-major `nx`x`ny` field
///
/// Source row `r` is kept iff `start.0 <= r < start.0 + frame.rows` and,
/// within a kept row, column `c` iff `start.1 <= c < start.1 + frame.cols`.
/// The result is a new tightly-packed row-major buffer; when the window
/// overruns the field the output silently shrinks to the rows and columns
/// that exist ([`window_extent`] gives the resulting shape).
pub fn crop(field: &[f32], nx: usize, ny: usize, frame: FrameSize, start: (usize, usize)) -> Vec<f32> {
    let mut window = Vec::with_capacity(frame.len());
    for r in 0..nx {
        if r >= start.0 && r < start.0 + frame.rows {
            for c in 0..ny {
                if c >= start.1 && c < start.1 + frame.cols {
                    window.push(field[r * ny + c]);
                }
            }
        }
    }
    window
}
