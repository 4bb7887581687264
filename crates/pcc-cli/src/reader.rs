use std::fs::File;
use std::path::Path;

use crate::error::{Error, Result};

/// Outcome of attempting to pull and forward one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// A row was read and successfully offered to the row queue.
    Offered,
    /// A row was read but the row queue was full; the caller should back
    /// off and retry rather than lose the row.
    QueueFull,
    /// The underlying CSV reader has no more records.
    EndOfInput,
}

/// Wraps a CSV reader over a file, exposing column count and row-by-row
/// pulls in terms a caller can drive from a retry loop instead of an
/// exception.
pub struct Reader {
    inner: csv::Reader<File>,
    cols: usize,
    pending: Option<Vec<String>>,
}

impl Reader {
    /// Open `path` and read its header row to determine column count.
    /// The header's field values are discarded; only their count matters
    /// — this reader is for all-numeric tabular data.
    pub fn open(path: &Path) -> Result<Self> {
        let mut inner = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
        let cols = inner.headers()?.len();
        if cols == 0 {
            return Err(Error::Argument(format!(
                "{}: header row has no columns",
                path.display()
            )));
        }
        Ok(Reader {
            inner,
            cols,
            pending: None,
        })
    }

    pub fn column_count(&self) -> usize {
        self.cols
    }

    fn next_row(&mut self) -> Result<Option<Vec<String>>> {
        let mut record = csv::StringRecord::new();
        if !self.inner.read_record(&mut record)? {
            return Ok(None);
        }
        Ok(Some(record.iter().map(str::to_string).collect()))
    }

    /// Try to read one row (if none is already held pending from a prior
    /// `QueueFull`) and offer it onto `queue`.
    pub fn consume_row(&mut self, queue: &pcc_core::BoundedQueue<Vec<String>>) -> Result<RowOutcome> {
        if self.pending.is_none() {
            match self.next_row()? {
                Some(row) => self.pending = Some(row),
                None => return Ok(RowOutcome::EndOfInput),
            }
        }
        let row = self.pending.take().expect("checked above");
        match queue.offer(row) {
            Ok(()) => Ok(RowOutcome::Offered),
            Err(row) => {
                self.pending = Some(row);
                Ok(RowOutcome::QueueFull)
            }
        }
    }

    /// Repeatedly consume rows until the queue backs up or input runs
    /// out, returning the outcome that stopped the loop.
    pub fn consume_many(&mut self, queue: &pcc_core::BoundedQueue<Vec<String>>) -> Result<RowOutcome> {
        loop {
            match self.consume_row(queue)? {
                RowOutcome::Offered => continue,
                other => return Ok(other),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn csv_file(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{contents}").unwrap();
        f
    }

    #[test]
    fn reads_header_for_column_count() {
        let f = csv_file("a,b,c\n1,2,3\n");
        let reader = Reader::open(f.path()).unwrap();
        assert_eq!(reader.column_count(), 3);
    }

    #[test]
    fn consumes_rows_in_order_then_signals_end_of_input() {
        let f = csv_file("a,b\n1,2\n3,4\n");
        let mut reader = Reader::open(f.path()).unwrap();
        let queue = pcc_core::BoundedQueue::new(10);
        assert_eq!(reader.consume_many(&queue).unwrap(), RowOutcome::EndOfInput);
        assert_eq!(queue.poll().unwrap(), vec!["1", "2"]);
        assert_eq!(queue.poll().unwrap(), vec!["3", "4"]);
    }

    #[test]
    fn queue_full_retries_same_row_without_losing_it() {
        let f = csv_file("a,b\n1,2\n3,4\n");
        let mut reader = Reader::open(f.path()).unwrap();
        let queue = pcc_core::BoundedQueue::new(1);
        assert_eq!(reader.consume_row(&queue).unwrap(), RowOutcome::Offered);
        assert_eq!(reader.consume_row(&queue).unwrap(), RowOutcome::QueueFull);
        // Drain the queue, then the same pending row goes through.
        assert_eq!(queue.poll().unwrap(), vec!["1", "2"]);
        assert_eq!(reader.consume_row(&queue).unwrap(), RowOutcome::Offered);
        assert_eq!(queue.poll().unwrap(), vec!["3", "4"]);
    }

    #[test]
    fn empty_header_is_an_argument_error() {
        let f = csv_file("\n");
        assert!(Reader::open(f.path()).is_err());
    }
}
