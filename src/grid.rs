use heapless::Vec;

use crate::registers::CELL_COUNT;

/// One frame of raw samples in compacted row-major order.
///
/// Rows are active TX lines and columns are active RX lines, both in
/// ascending physical order. Disabled lines take no slot, so a row or
/// column index is not a physical line index once any line is disabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
    samples: Vec<u16, CELL_COUNT>,
}

impl Grid {
    /// Zero-filled grid. Returns `None` if it would not fit the full
    /// physical matrix.
    pub(crate) fn new(rows: usize, cols: usize) -> Option<Self> {
        let mut samples = Vec::new();
        samples.resize(rows.checked_mul(cols)?, 0).ok()?;
        Some(Self {
            rows,
            cols,
            samples,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[u16] {
        &self.samples
    }

    pub fn get(&self, row: usize, col: usize) -> Option<u16> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.samples.get(row * self.cols + col).copied()
    }

    pub fn row(&self, row: usize) -> Option<&[u16]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.samples.get(start..start + self.cols)
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[u16]> + '_ {
        // chunks(0) panics
        self.samples.chunks(self.cols.max(1)).take(self.rows)
    }

    pub(crate) fn row_mut(&mut self, row: usize) -> Option<&mut [u16]> {
        if row >= self.rows {
            return None;
        }
        let start = row * self.cols;
        self.samples.get_mut(start..start + self.cols)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Grid {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(
            f,
            "Grid {{ rows: {}, cols: {}, samples: {} }}",
            self.rows,
            self.cols,
            self.as_slice()
        )
    }
}
