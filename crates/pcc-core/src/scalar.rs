use num_traits::Float;

/// Floating point type the pipeline computes in, generic so a caller can
/// pick precision at build time.
pub trait Scalar:
    Float + Send + Sync + Default + std::fmt::Display + lexical::FromLexical + 'static
{
    /// Lossless-enough conversion from a row/element count into `Self`.
    fn from_count(n: u64) -> Self;
}

impl Scalar for f32 {
    fn from_count(n: u64) -> Self {
        n as f32
    }
}

impl Scalar for f64 {
    fn from_count(n: u64) -> Self {
        n as f64
    }
}
