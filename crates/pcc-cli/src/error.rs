use thiserror::Error;

/// Errors the binary can terminate the process with. Wraps `pcc_core`'s
/// pipeline errors and adds the two failure kinds that belong to the
/// boundary this crate owns: bad CLI input and I/O.
#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Argument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Pipeline(#[from] pcc_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Process exit code for this error: argument errors get a distinct
    /// code from every other runtime failure, so a caller can tell a bad
    /// invocation apart from a failure that occurred while running.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Argument(_) => 2,
            _ => 1,
        }
    }
}
