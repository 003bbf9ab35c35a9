//! Grid placement for rendered timelines
//!
//! Renderers lay the timeline out row by row on a fixed-width grid of square
//! cells. Position `n` goes to column `n % columns` of row `n / columns`.

use serde::Serialize;

use crate::{ChromalineError, Result};

pub const DEFAULT_COLUMNS: usize = 3;
pub const DEFAULT_CELL_SIZE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GridLayout {
    columns: usize,
    /// Edge length of one cell, in pixels
    scale: u32,
}

/// Pixel rectangle of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rect {
    pub x: u64,
    pub y: u64,
    pub width: u32,
    pub height: u32,
}

impl GridLayout {
    pub fn new(columns: usize, scale: u32) -> Result<Self> {
        if columns == 0 {
            return Err(ChromalineError::ConfigError(
                "Grid needs at least one column".to_string(),
            ));
        }
        if scale == 0 {
            return Err(ChromalineError::ConfigError(
                "Grid cell size must be positive".to_string(),
            ));
        }
        Ok(Self { columns, scale })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    /// `(column, row)` of a timeline position
    pub fn cell(&self, position: usize) -> (usize, usize) {
        (position % self.columns, position / self.columns)
    }

    pub fn rect(&self, position: usize) -> Rect {
        let (column, row) = self.cell(position);
        Rect {
            x: column as u64 * self.scale as u64,
            y: row as u64 * self.scale as u64,
            width: self.scale,
            height: self.scale,
        }
    }

    /// Rows needed to show every position up to and including `last_position`
    pub fn rows_for(&self, last_position: usize) -> usize {
        last_position / self.columns + 1
    }

    /// Canvas size in pixels for `rows` rows
    pub fn dimensions(&self, rows: usize) -> (u64, u64) {
        (
            self.columns as u64 * self.scale as u64,
            rows as u64 * self.scale as u64,
        )
    }
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            scale: DEFAULT_CELL_SIZE,
        }
    }
}
