use std::sync::Arc;

use log::trace;

use crate::hub::QueueHub;
use crate::pcc::PartialTable;
use crate::scalar::Scalar;

/// Folds chunks pulled from the hub's chunk queue into per-column sums,
/// sums-of-squares, and per-pair sums-of-products — the single-pass,
/// sums-of-squares formulation chosen for throughput over a numerically
/// nicer two-pass algorithm.
pub struct PccAccumulator<T: Scalar> {
    cols: usize,
    hub: Arc<QueueHub<T>>,
    sum: Vec<T>,
    sum_sq: Vec<T>,
    cross: Vec<T>,
    rows_seen: u64,
}

impl<T: Scalar> PccAccumulator<T> {
    pub fn new(cols: usize, hub: Arc<QueueHub<T>>) -> Self {
        PccAccumulator {
            cols,
            hub,
            sum: vec![T::zero(); cols],
            sum_sq: vec![T::zero(); cols],
            cross: vec![T::zero(); cols * cols.saturating_sub(1) / 2],
            rows_seen: 0,
        }
    }

    fn fold(&mut self, chunk: crate::chunk::ChunkBuffer<T>) {
        let r = chunk.rows();
        for c in 0..self.cols {
            let col = chunk.column(c);
            let mut s = T::zero();
            let mut sq = T::zero();
            for &v in &col[..r] {
                s = s + v;
                sq = sq + v * v;
            }
            self.sum[c] = self.sum[c] + s;
            self.sum_sq[c] = self.sum_sq[c] + sq;
        }
        for i in 0..self.cols.saturating_sub(1) {
            let col_i = chunk.column(i);
            for j in (i + 1)..self.cols {
                let col_j = chunk.column(j);
                let mut acc = T::zero();
                for k in 0..r {
                    acc = acc + col_i[k] * col_j[k];
                }
                let idx = crate::pcc::pair_index(self.cols, i, j);
                self.cross[idx] = self.cross[idx] + acc;
            }
        }
        self.rows_seen += r as u64;
    }

    /// Poll one chunk and fold it in; `false` if the chunk queue was
    /// empty.
    pub fn analyze(&mut self) -> bool {
        match self.hub.chunks.poll() {
            Some(chunk) => {
                let rows = chunk.rows();
                self.fold(chunk);
                trace!("consumed and folded a chunk of {rows} rows");
                true
            }
            None => false,
        }
    }

    pub fn analyze_many(&mut self) {
        while self.analyze() {}
    }

    /// Assemble the `C*(C-1)/2` `PccPartial` records this accumulator has
    /// folded so far, consuming it.
    pub fn into_partial_table(self) -> PartialTable<T> {
        let mut table = PartialTable::new(self.cols);
        for i in 0..self.cols.saturating_sub(1) {
            for j in (i + 1)..self.cols {
                let idx = crate::pcc::pair_index(self.cols, i, j);
                let entry = table.entry_mut(i, j);
                entry.sum_1 = self.sum[i];
                entry.sum_2 = self.sum[j];
                entry.sum_1_sq = self.sum_sq[i];
                entry.sum_2_sq = self.sum_sq[j];
                entry.sum_prod = self.cross[idx];
                entry.count = self.rows_seen;
            }
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::ChunkBuffer;

    fn push_chunk(hub: &QueueHub<f64>, rows: &[[f64; 2]]) {
        let mut chunk: ChunkBuffer<f64> = ChunkBuffer::new(rows.len(), 2);
        for row in rows {
            for &v in row {
                chunk.push_back(v).unwrap();
            }
        }
        hub.chunks.offer(chunk).ok().unwrap();
    }

    #[test]
    fn perfect_positive_correlation() {
        let hub = Arc::new(QueueHub::with_capacities(1, Some(3), 10, 10));
        push_chunk(&hub, &[[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]]);
        let mut acc: PccAccumulator<f64> = PccAccumulator::new(2, hub);
        acc.analyze_many();
        let table = acc.into_partial_table();
        let pcc = table.get(0, 1).finalize();
        assert!((pcc - 1.0).abs() < 1e-9);
    }

    #[test]
    fn perfect_negative_correlation() {
        let hub = Arc::new(QueueHub::with_capacities(1, Some(3), 10, 10));
        push_chunk(&hub, &[[1.0, 2.0], [2.0, 1.0], [3.0, 0.0]]);
        let mut acc: PccAccumulator<f64> = PccAccumulator::new(2, hub);
        acc.analyze_many();
        let table = acc.into_partial_table();
        let pcc = table.get(0, 1).finalize();
        assert!((pcc - (-1.0)).abs() < 1e-9);
    }

    #[test]
    fn zero_variance_column_yields_nan() {
        let hub = Arc::new(QueueHub::with_capacities(1, Some(4), 10, 10));
        push_chunk(&hub, &[[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]]);
        let mut acc: PccAccumulator<f64> = PccAccumulator::new(2, hub);
        acc.analyze_many();
        let table = acc.into_partial_table();
        assert!(table.get(0, 1).finalize().is_nan());
    }

    #[test]
    fn three_columns_every_pair_perfectly_correlated() {
        let hub = Arc::new(QueueHub::with_capacities(1, Some(4), 10, 10));
        let mut chunk: ChunkBuffer<f64> = ChunkBuffer::new(4, 3);
        for row in [[1.0, 2.0, 3.0], [2.0, 4.0, 6.0], [3.0, 6.0, 9.0], [4.0, 8.0, 12.0]] {
            for v in row {
                chunk.push_back(v).unwrap();
            }
        }
        hub.chunks.offer(chunk).ok().unwrap();
        let mut acc: PccAccumulator<f64> = PccAccumulator::new(3, hub);
        acc.analyze_many();
        let table = acc.into_partial_table();
        for (i, j) in [(0, 1), (0, 2), (1, 2)] {
            assert!((table.get(i, j).finalize() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn chunk_partition_is_commutative_with_whole_dataset() {
        let whole_hub = Arc::new(QueueHub::with_capacities(1, Some(6), 10, 10));
        push_chunk(
            &whole_hub,
            &[[1.0, 6.0], [2.0, 1.0], [3.0, 4.0], [4.0, 2.0], [5.0, 9.0], [6.0, -1.0]],
        );
        let mut whole_acc: PccAccumulator<f64> = PccAccumulator::new(2, whole_hub);
        whole_acc.analyze_many();
        let whole = whole_acc.into_partial_table();

        let split_hub = Arc::new(QueueHub::with_capacities(1, Some(2), 10, 10));
        push_chunk(&split_hub, &[[1.0, 6.0], [2.0, 1.0]]);
        push_chunk(&split_hub, &[[3.0, 4.0], [4.0, 2.0]]);
        push_chunk(&split_hub, &[[5.0, 9.0], [6.0, -1.0]]);
        let mut split_acc: PccAccumulator<f64> = PccAccumulator::new(2, split_hub);
        split_acc.analyze_many();
        let split = split_acc.into_partial_table();

        assert!((whole.get(0, 1).finalize() - split.get(0, 1).finalize()).abs() < 1e-9);
    }
}
