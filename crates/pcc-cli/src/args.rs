use std::path::PathBuf;

use clap::Parser;

/// Compute the pairwise Pearson Correlation Coefficient matrix of a large
/// CSV file, streaming the input through a chunked worker pool instead of
/// loading it into memory.
#[derive(Parser, Debug)]
#[command(name = "pcc", author, version, about, long_about = None)]
pub struct Args {
    /// Worker thread count (default: hardware_parallelism - 1).
    #[arg(long, value_name = "N", value_parser = parse_strict_unsigned)]
    pub workers: Option<usize>,

    /// Rows per chunk (default: 100).
    #[arg(long, value_name = "N", value_parser = parse_strict_unsigned)]
    pub rows: Option<usize>,

    /// Increase log verbosity; repeatable (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Yield the scheduler when a worker iteration makes no progress in
    /// either phase.
    #[arg(long)]
    pub yield_on_stall: bool,

    /// Path to the input CSV file.
    pub input: PathBuf,
}

/// `--workers`/`--rows` must be base-10 unsigned integers with no leading
/// zeros and no sign (a plain `str::parse::<usize>` would silently accept
/// `"007"`).
fn parse_strict_unsigned(s: &str) -> Result<usize, String> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("'{s}' is not a base-10 unsigned integer"));
    }
    if s.len() > 1 && s.starts_with('0') {
        return Err(format!("'{s}' has a leading zero, which is rejected"));
    }
    s.parse::<usize>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_unsigned() {
        assert_eq!(parse_strict_unsigned("100"), Ok(100));
        assert_eq!(parse_strict_unsigned("0"), Ok(0));
    }

    #[test]
    fn rejects_leading_zero() {
        assert!(parse_strict_unsigned("007").is_err());
    }

    #[test]
    fn rejects_sign() {
        assert!(parse_strict_unsigned("-1").is_err());
        assert!(parse_strict_unsigned("+1").is_err());
    }

    #[test]
    fn rejects_non_digits() {
        assert!(parse_strict_unsigned("1.5").is_err());
        assert!(parse_strict_unsigned("abc").is_err());
        assert!(parse_strict_unsigned("").is_err());
    }
}
