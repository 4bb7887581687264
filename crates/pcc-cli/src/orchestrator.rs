use std::path::Path;
use std::sync::Arc;
use std::thread;

use log::{debug, info};
use pcc_core::{PartialTable, QueueHub, Worker};

use crate::error::{Error, Result};
use crate::reader::{Reader, RowOutcome};
use crate::types::Scalar;

/// One row `(c1, c2, value)` of the finalized correlation matrix, in
/// lexicographic pair order.
pub struct PairResult {
    pub col_a: usize,
    pub col_b: usize,
    pub value: Scalar,
}

/// Default total worker count: `max(1, hardware_parallelism - 1) + 1` —
/// one of those workers is co-located with the reader on the calling
/// thread, so it costs nothing extra; the rest get their own threads.
fn default_worker_count() -> usize {
    let hw = num_cpus::get();
    hw.saturating_sub(1).max(1) + 1
}

fn sum_tables(tables: Vec<PartialTable<Scalar>>, cols: usize) -> PartialTable<Scalar> {
    let mut iter = tables.into_iter();
    let mut acc = iter.next().unwrap_or_else(|| PartialTable::new(cols));
    for t in iter {
        acc.add_assign(&t);
    }
    acc
}

/// Build the hub and worker pool, drain the input file on the calling
/// thread (interleaved with the main worker's own iterations under
/// back-pressure), join the spawned threads, and sum every worker's
/// partial table into a single finalized correlation matrix.
pub fn run(
    input: &Path,
    workers: Option<usize>,
    rows_per_chunk: Option<usize>,
    yield_on_stall: bool,
) -> Result<Vec<PairResult>> {
    let mut reader = Reader::open(input)?;
    let cols = reader.column_count();

    let worker_count = workers.unwrap_or_else(default_worker_count);
    if worker_count == 0 {
        return Err(Error::Argument(
            "--workers 0 leaves nothing to drain the row queue".to_string(),
        ));
    }
    info!(
        "{}: {} columns, {} workers, {} rows/chunk",
        input.display(),
        cols,
        worker_count,
        rows_per_chunk.unwrap_or(pcc_core::DEFAULT_ROWS_PER_CHUNK),
    );

    let hub: Arc<QueueHub<Scalar>> = Arc::new(QueueHub::new(worker_count, rows_per_chunk));

    let spawned_count = worker_count.saturating_sub(1);
    let handles: Vec<_> = (0..spawned_count)
        .map(|i| {
            let worker: Worker<Scalar> = Worker::new(cols, hub.clone(), yield_on_stall);
            thread::Builder::new()
                .name(format!("pcc-worker-{i}"))
                .spawn(move || worker.run_and_collect())
                .expect("failed to spawn worker thread")
        })
        .collect();

    // Unconditional: one worker always runs co-located with the reader on
    // this thread, regardless of how many extra threads were spawned.
    let mut main_worker: Worker<Scalar> = Worker::new(cols, hub.clone(), yield_on_stall);

    loop {
        match reader.consume_many(&hub.rows)? {
            RowOutcome::QueueFull => {
                debug!("row queue full, running the main-thread worker one step");
                main_worker.perform_iteration()?;
            }
            RowOutcome::EndOfInput => break,
            RowOutcome::Offered => unreachable!("consume_many only stops on QueueFull or EndOfInput"),
        }
    }
    hub.set_end_of_input();
    main_worker.run_until_done()?;

    let mut tables = Vec::with_capacity(worker_count);
    tables.push(main_worker.into_partial_table());
    for handle in handles {
        tables.push(handle.join().expect("worker thread panicked")?);
    }
    info!("all {worker_count} workers finished, combining partial tables");

    let table = sum_tables(tables, cols);
    let values = table.finalize();
    let mut results = Vec::with_capacity(values.len());
    let mut idx = 0;
    for i in 0..cols.saturating_sub(1) {
        for j in (i + 1)..cols {
            results.push(PairResult {
                col_a: i,
                col_b: j,
                value: values[idx],
            });
            idx += 1;
        }
    }
    Ok(results)
}
