//! Error types for `brewlog-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("bean name must not be empty")]
  EmptyName,

  #[error("brew method must not be empty")]
  EmptyBrewMethod,

  #[error("rating {0} is outside the 0-5 scale")]
  RatingOutOfRange(f64),

  #[error("{field} must be a non-negative number, got {value}")]
  NegativeValue { field: &'static str, value: f64 },

  #[error("unknown roast level: {0:?}")]
  UnknownRoastLevel(String),

  #[error("image encoding error: {0}")]
  Image(#[from] image::ImageError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
