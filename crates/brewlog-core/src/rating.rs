//! Ratings on the journal's 0–5 scale.
//!
//! Older journal files store `0` for "no rating entered", so the scale's zero
//! point doubles as "unrated". Here that case is `Option::<Rating>::None`
//! and a [`Rating`] is always a real score.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Top of the rating scale.
pub const MAX_RATING: f64 = 5.0;

/// A score in `(0, 5]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl Rating {
  /// Validate a score. Zero is rejected; use [`Rating::from_score`] for input
  /// that may mean "unrated".
  pub fn new(value: f64) -> Result<Self> {
    if value.is_finite() && value > 0.0 && value <= MAX_RATING {
      Ok(Self(value))
    } else {
      Err(Error::RatingOutOfRange(value))
    }
  }

  /// Interpret raw widget input on the full `[0, 5]` scale, mapping `0` to
  /// unrated.
  pub fn from_score(value: f64) -> Result<Option<Self>> {
    if value == 0.0 {
      Ok(None)
    } else {
      Self::new(value).map(Some)
    }
  }

  pub fn value(self) -> f64 { self.0 }
}

impl TryFrom<f64> for Rating {
  type Error = Error;

  fn try_from(value: f64) -> Result<Self> { Self::new(value) }
}

impl From<Rating> for f64 {
  fn from(r: Rating) -> f64 { r.0 }
}

impl fmt::Display for Rating {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:.1}", self.0)
  }
}
