use thiserror::Error;

/// Errors raised by the pipeline itself.
///
/// Argument parsing and I/O errors live in `pcc-cli`; this crate only knows
/// about contract violations inside the chunked pipeline (`Logic`) and
/// malformed numeric input it is handed (`Format`).
#[derive(Error, Debug)]
pub enum Error {
    #[error("format error: {0}")]
    Format(String),

    #[error("logic error: {0}")]
    Logic(String),
}

pub type Result<T> = std::result::Result<T, Error>;
