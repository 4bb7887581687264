//! Chunked, lock-free producer/consumer pipeline for streaming pairwise
//! Pearson correlation over tabular numeric input too large to hold in
//! memory at once.
//!
//! This crate is the pipeline only: `ChunkBuffer`, `BoundedQueue`,
//! `QueueHub`, `NumericParser`, `PccAccumulator`, and `Worker`. CSV
//! tokenization, file I/O, and CLI argument parsing live in `pcc-cli`.

mod accumulator;
mod chunk;
mod error;
mod hub;
mod parser;
mod pcc;
mod queue;
mod scalar;
mod worker;

pub use accumulator::PccAccumulator;
pub use chunk::ChunkBuffer;
pub use error::{Error, Result};
pub use hub::{QueueHub, DEFAULT_CHUNK_CAPACITY, DEFAULT_ROWS_PER_CHUNK, DEFAULT_ROW_CAPACITY};
pub use parser::NumericParser;
pub use pcc::{pair_index, PartialTable, PccPartial};
pub use queue::BoundedQueue;
pub use scalar::Scalar;
pub use worker::Worker;
