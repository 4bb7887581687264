use crate::error::{Error, Result};
use crate::scalar::Scalar;

/// A fixed-capacity `rows x cols` numeric buffer, stored column-major so
/// that a full column is a contiguous, unit-stride slice.
///
/// Values are always appended in row-major order — `push_back` fills row 0
/// across every column before moving to row 1 — which is why the cursor is
/// tracked as `(next_row, next_col)` rather than a single linear index.
pub struct ChunkBuffer<T> {
    max_rows: usize,
    cols: usize,
    data: Vec<T>,
    next_row: usize,
    next_col: usize,
}

impl<T: Scalar> ChunkBuffer<T> {
    pub fn new(max_rows: usize, cols: usize) -> Self {
        ChunkBuffer {
            max_rows,
            cols,
            data: vec![T::zero(); max_rows * cols],
            next_row: 0,
            next_col: 0,
        }
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        col * self.max_rows + row
    }

    /// Append one value at the cursor, advancing it in row-major order.
    pub fn push_back(&mut self, value: T) -> Result<()> {
        if self.full() {
            return Err(Error::Logic(
                "push_back on a full ChunkBuffer".to_string(),
            ));
        }
        let idx = self.index(self.next_row, self.next_col);
        self.data[idx] = value;
        self.next_col += 1;
        if self.next_col == self.cols {
            self.next_col = 0;
            self.next_row += 1;
        }
        Ok(())
    }

    pub fn at(&self, row: usize, col: usize) -> Result<T> {
        if row >= self.max_rows || col >= self.cols {
            return Err(Error::Logic(format!(
                "out of range read at ({row},{col}) of a {}x{} chunk",
                self.max_rows, self.cols
            )));
        }
        Ok(self.data[self.index(row, col)])
    }

    /// Contiguous, unit-stride view of one column. This is the hot-path
    /// accessor the accumulator's single-column and column-pair folds use.
    pub fn column(&self, c: usize) -> &[T] {
        let start = c * self.max_rows;
        &self.data[start..start + self.max_rows]
    }

    /// Strided view of one row (stride = `column_offset`). Not on the hot
    /// path; provided for completeness and for tests that fill and re-read
    /// a chunk row by row.
    pub fn row(&self, r: usize) -> impl Iterator<Item = T> + '_ {
        (0..self.cols).map(move |c| self.data[self.index(r, c)])
    }

    pub fn rows(&self) -> usize {
        self.next_row
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Pointer-arithmetic stride between adjacent rows of the same column.
    pub fn row_offset(&self) -> usize {
        1
    }

    /// Pointer-arithmetic stride between adjacent columns of the same row.
    pub fn column_offset(&self) -> usize {
        self.max_rows
    }

    pub fn empty(&self) -> bool {
        self.next_row == 0 && self.next_col == 0
    }

    pub fn full(&self) -> bool {
        self.next_row == self.max_rows
    }

    pub fn clear(&mut self) {
        self.next_row = 0;
        self.next_col = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_chunk_is_not_full() {
        let c: ChunkBuffer<f64> = ChunkBuffer::new(10, 20);
        assert!(c.empty());
        assert!(!c.full());
    }

    #[test]
    fn append_fills_row_major_reads_back_column_major() {
        let rows = 2;
        let cols = 3;
        let mut c: ChunkBuffer<f64> = ChunkBuffer::new(rows, cols);
        let values: Vec<f64> = (0..rows * cols).map(|v| v as f64).collect();
        for &v in &values {
            c.push_back(v).unwrap();
        }
        assert!(c.full());
        for r in 0..rows {
            for col in 0..cols {
                assert_eq!(c.at(r, col).unwrap(), values[r * cols + col]);
            }
        }
        // Column 0 is contiguous: rows 0 and 1 of column 0 are values[0] and values[cols].
        assert_eq!(c.column(0), &[values[0], values[cols]]);
    }

    #[test]
    fn push_back_beyond_capacity_is_logic_error() {
        let mut c: ChunkBuffer<f64> = ChunkBuffer::new(1, 1);
        c.push_back(1.0).unwrap();
        assert!(c.full());
        assert!(c.push_back(2.0).is_err());
    }

    #[test]
    fn out_of_range_read_is_logic_error() {
        let c: ChunkBuffer<f64> = ChunkBuffer::new(2, 2);
        assert!(c.at(2, 0).is_err());
        assert!(c.at(0, 2).is_err());
    }

    #[test]
    fn row_view_matches_row_major_values() {
        let rows = 3;
        let cols = 4;
        let mut c: ChunkBuffer<f64> = ChunkBuffer::new(rows, cols);
        for v in 0..rows * cols {
            c.push_back(v as f64).unwrap();
        }
        let row1: Vec<f64> = c.row(1).collect();
        assert_eq!(row1, vec![4.0, 5.0, 6.0, 7.0]);
    }
}
