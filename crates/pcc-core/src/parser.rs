use std::sync::Arc;

use log::{debug, trace};

use crate::chunk::ChunkBuffer;
use crate::error::{Error, Result};
use crate::hub::QueueHub;
use crate::scalar::Scalar;

/// Continuously pulls raw string rows off the hub's row queue, converts
/// each cell to `T`, and packs them into `ChunkBuffer`s it offers onto the
/// chunk queue.
pub struct NumericParser<T: Scalar> {
    cols: usize,
    rows_per_chunk: usize,
    hub: Arc<QueueHub<T>>,
    current: Option<ChunkBuffer<T>>,
    chunk_pending: bool,
}

impl<T: Scalar> NumericParser<T> {
    pub fn new(cols: usize, hub: Arc<QueueHub<T>>) -> Self {
        let rows_per_chunk = hub.rows_per_chunk();
        NumericParser {
            cols,
            rows_per_chunk,
            hub,
            current: None,
            chunk_pending: false,
        }
    }

    pub fn set_rows_per_chunk(&mut self, rows_per_chunk: usize) -> Result<()> {
        if self.current.is_some() {
            return Err(Error::Logic(
                "cannot change chunk size (rows) after parsing has started".to_string(),
            ));
        }
        self.rows_per_chunk = rows_per_chunk;
        Ok(())
    }

    fn convert_cell(cell: &str) -> Result<T> {
        lexical::parse(cell.as_bytes())
            .map_err(|_| Error::Format(format!("cannot parse {cell:?} as a number")))
    }

    /// Advance one step toward producing one chunk: a chunk held pending
    /// from a previous failed offer is retried first; otherwise rows are
    /// pulled and appended until a chunk fills or the row queue runs dry.
    pub fn parse_chunk(&mut self) -> Result<bool> {
        if self.chunk_pending {
            let chunk = self
                .current
                .take()
                .expect("chunk_pending implies a chunk is held");
            return match self.hub.chunks.offer(chunk) {
                Ok(()) => {
                    self.chunk_pending = false;
                    debug!("retried offer of pending chunk succeeded");
                    Ok(true)
                }
                Err(chunk) => {
                    self.current = Some(chunk);
                    Ok(false)
                }
            };
        }

        loop {
            let row = match self.hub.rows.poll() {
                Some(row) => row,
                None => return Ok(false),
            };
            trace!("consumed one row ({} fields)", row.len());
            if row.len() != self.cols {
                return Err(Error::Format(format!(
                    "row has {} fields, expected {}",
                    row.len(),
                    self.cols
                )));
            }
            if self.current.is_none() {
                self.current = Some(ChunkBuffer::new(self.rows_per_chunk, self.cols));
            }
            {
                let chunk = self.current.as_mut().expect("just populated above");
                for cell in &row {
                    chunk.push_back(Self::convert_cell(cell)?)?;
                }
            }
            if self.current.as_ref().expect("populated above").full() {
                let chunk = self.current.take().expect("checked full above");
                let rows = chunk.rows();
                return match self.hub.chunks.offer(chunk) {
                    Ok(()) => {
                        debug!("produced a full chunk of {rows} rows");
                        Ok(true)
                    }
                    Err(chunk) => {
                        self.current = Some(chunk);
                        self.chunk_pending = true;
                        Ok(false)
                    }
                };
            }
        }
    }

    pub fn parse_many(&mut self) -> Result<()> {
        while self.parse_chunk()? {}
        Ok(())
    }

    /// If a non-empty partial chunk is held, mark it pending and attempt
    /// one offer. Returns `true` when there was nothing to store or the
    /// offer succeeded, `false` if the offer needs to be retried.
    pub fn store_partial_chunk(&mut self) -> bool {
        match &self.current {
            None => true,
            Some(chunk) if chunk.empty() => true,
            Some(_) => {
                let chunk = self.current.take().expect("checked Some above");
                let rows = chunk.rows();
                match self.hub.chunks.offer(chunk) {
                    Ok(()) => {
                        debug!("flushed a trailing partial chunk of {rows} rows");
                        true
                    }
                    Err(chunk) => {
                        self.current = Some(chunk);
                        self.chunk_pending = true;
                        false
                    }
                }
            }
        }
    }

    pub fn hold(&self) -> bool {
        self.current.is_some()
    }

    pub fn hold_filled(&self) -> bool {
        self.chunk_pending
    }
}
