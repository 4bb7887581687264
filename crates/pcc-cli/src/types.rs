//! The scalar precision is chosen once, at build time, via the `f32`
//! Cargo feature.

#[cfg(feature = "f32")]
pub type Scalar = f32;

#[cfg(not(feature = "f32"))]
pub type Scalar = f64;
