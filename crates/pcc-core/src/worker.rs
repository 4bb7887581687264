use std::sync::Arc;

use rand::Rng;

use crate::accumulator::PccAccumulator;
use crate::error::Result;
use crate::hub::QueueHub;
use crate::parser::NumericParser;
use crate::pcc::PartialTable;
use crate::scalar::Scalar;

/// Small constant the per-worker parse/compute repetition counts are split
/// from. Only its size matters — large enough that a worker does useful
/// work per phase switch, small enough that it still alternates often.
const PHASE_SPLIT_TOTAL: u32 = 6;

/// Composes one `NumericParser` and one `PccAccumulator` over a shared
/// hub, alternating between the parse and compute phases until both are
/// definitively exhausted.
pub struct Worker<T: Scalar> {
    hub: Arc<QueueHub<T>>,
    parser: NumericParser<T>,
    accumulator: PccAccumulator<T>,
    parse_guard: bool,
    compute_guard: bool,
    parse_repetitions: u32,
    compute_repetitions: u32,
    yield_when_stalled: bool,
}

impl<T: Scalar> Worker<T> {
    pub fn new(cols: usize, hub: Arc<QueueHub<T>>, yield_when_stalled: bool) -> Self {
        // Randomize the parse/compute ratio per worker so they don't all
        // pound the same end of the same queue in lockstep.
        let parse_repetitions = rand::thread_rng().gen_range(1..=PHASE_SPLIT_TOTAL);
        let compute_repetitions = 1 + PHASE_SPLIT_TOTAL - parse_repetitions;
        Worker {
            parser: NumericParser::new(cols, hub.clone()),
            accumulator: PccAccumulator::new(cols, hub.clone()),
            hub,
            parse_guard: false,
            compute_guard: false,
            parse_repetitions,
            compute_repetitions,
            yield_when_stalled,
        }
    }

    /// One parse attempt, aware of end-of-input. Returns `false` when the
    /// worker made no progress this call (row queue empty, or an offer
    /// needs retrying).
    fn parse_step(&mut self) -> Result<bool> {
        if self.hub.is_end_of_input() {
            if self.parser.parse_chunk()? {
                return Ok(true);
            }
            if self.parser.hold_filled() {
                // A previously pending chunk failed to offer again;
                // nothing more to do this call, retry on the next one.
                return Ok(false);
            }
            // No pending chunk: flush whatever partial chunk remains.
            self.parser.store_partial_chunk();
            if !self.parser.hold_filled() {
                self.hub.mark_parser_finished();
                self.parse_guard = true;
            }
            Ok(false)
        } else {
            self.parser.parse_chunk()
        }
    }

    /// One compute attempt, aware of all-parsers-finished.
    fn compute_step(&mut self) -> bool {
        let made_progress = self.accumulator.analyze();
        if !made_progress && self.hub.all_parsers_finished() {
            self.hub.mark_accumulator_finished();
            self.compute_guard = true;
        }
        made_progress
    }

    /// Run a randomized burst of parse steps then a burst of compute
    /// steps. Returns `false` once both phases are guarded off — the
    /// worker has nothing left to do, ever.
    pub fn perform_iteration(&mut self) -> Result<bool> {
        let mut progressed = false;

        if !self.parse_guard {
            for _ in 0..self.parse_repetitions {
                if self.parse_guard {
                    break;
                }
                match self.parse_step() {
                    Ok(true) => progressed = true,
                    Ok(false) => break,
                    Err(e) => return Err(e),
                }
            }
        }

        if !self.compute_guard {
            for _ in 0..self.compute_repetitions {
                if self.compute_guard {
                    break;
                }
                if self.compute_step() {
                    progressed = true;
                } else {
                    break;
                }
            }
        }

        if self.yield_when_stalled && !progressed {
            std::thread::yield_now();
        }

        Ok(!(self.parse_guard && self.compute_guard))
    }

    /// Drive `perform_iteration` to completion.
    pub fn run_until_done(&mut self) -> Result<()> {
        while self.perform_iteration()? {}
        Ok(())
    }

    pub fn into_partial_table(self) -> PartialTable<T> {
        self.accumulator.into_partial_table()
    }

    /// Run to completion and hand back this worker's partial table, for
    /// use as the closure body of a spawned thread.
    pub fn run_and_collect(mut self) -> Result<PartialTable<T>> {
        self.run_until_done()?;
        Ok(self.into_partial_table())
    }
}
