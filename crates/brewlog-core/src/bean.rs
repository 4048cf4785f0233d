//! Coffee beans: the catalogued products sessions are brewed from.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result, png::PngImage, rating::Rating};

// ─── Roast level ─────────────────────────────────────────────────────────────

/// How dark a bean is roasted. Persisted as the exact variant name.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum RoastLevel {
  Light,
  #[default]
  Medium,
  Dark,
}

impl RoastLevel {
  pub const ALL: [RoastLevel; 3] = [Self::Light, Self::Medium, Self::Dark];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Light => "Light",
      Self::Medium => "Medium",
      Self::Dark => "Dark",
    }
  }
}

impl FromStr for RoastLevel {
  type Err = Error;

  /// Accepts the persisted spelling case-insensitively.
  fn from_str(s: &str) -> Result<Self> {
    Self::ALL
      .into_iter()
      .find(|level| level.as_str().eq_ignore_ascii_case(s.trim()))
      .ok_or_else(|| Error::UnknownRoastLevel(s.to_owned()))
  }
}

impl fmt::Display for RoastLevel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

// ─── Records ─────────────────────────────────────────────────────────────────

/// A catalogued coffee bean as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoffeeBean {
  pub id:                i64,
  pub name:              String,
  pub roaster:           Option<String>,
  pub roast_level:       RoastLevel,
  pub origin:            Option<String>,
  pub processing_method: Option<String>,
  pub tasting_notes:     Option<String>,
  pub rating:            Option<Rating>,
  pub price:             f64,
  pub purchase_date:     Option<String>,
  #[serde(skip)]
  pub image:             Option<PngImage>,
  pub created_at:        DateTime<Utc>,
}

/// Insert payload for a new bean. Omitted fields keep the defaults set by
/// [`NewCoffeeBean::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewCoffeeBean {
  pub name:              String,
  pub roaster:           Option<String>,
  pub roast_level:       RoastLevel,
  pub origin:            Option<String>,
  pub processing_method: Option<String>,
  pub tasting_notes:     Option<String>,
  pub rating:            Option<Rating>,
  pub price:             f64,
  pub purchase_date:     Option<String>,
  pub image:             Option<PngImage>,
}

impl NewCoffeeBean {
  /// Start a payload with every optional field at its default.
  pub fn new(name: impl Into<String>) -> Result<Self> {
    let name = name.into();
    check_name(&name)?;
    Ok(Self {
      name,
      roaster: None,
      roast_level: RoastLevel::default(),
      origin: None,
      processing_method: None,
      tasting_notes: None,
      rating: None,
      price: 0.0,
      purchase_date: None,
      image: None,
    })
  }

  /// Re-check fields that may have been set directly.
  pub fn validate(&self) -> Result<()> {
    check_name(&self.name)?;
    check_non_negative("price", self.price)
  }
}

/// A partial update. `None` leaves a column untouched; for nullable columns
/// `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoffeeBeanPatch {
  pub name:              Option<String>,
  pub roaster:           Option<Option<String>>,
  pub roast_level:       Option<RoastLevel>,
  pub origin:            Option<Option<String>>,
  pub processing_method: Option<Option<String>>,
  pub tasting_notes:     Option<Option<String>>,
  pub rating:            Option<Option<Rating>>,
  pub price:             Option<f64>,
  pub purchase_date:     Option<Option<String>>,
  pub image:             Option<Option<PngImage>>,
}

impl CoffeeBeanPatch {
  /// True when no column would be written.
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn validate(&self) -> Result<()> {
    if let Some(name) = &self.name {
      check_name(name)?;
    }
    if let Some(price) = self.price {
      check_non_negative("price", price)?;
    }
    Ok(())
  }
}

// ─── Validation helpers ──────────────────────────────────────────────────────

fn check_name(name: &str) -> Result<()> {
  if name.trim().is_empty() { Err(Error::EmptyName) } else { Ok(()) }
}

pub(crate) fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
  if value.is_finite() && value >= 0.0 {
    Ok(())
  } else {
    Err(Error::NegativeValue { field, value })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn roast_level_parses_persisted_spelling() {
    assert_eq!("Light".parse::<RoastLevel>().unwrap(), RoastLevel::Light);
    assert_eq!("dark".parse::<RoastLevel>().unwrap(), RoastLevel::Dark);
    assert!(matches!(
      "Cinnamon".parse::<RoastLevel>(),
      Err(Error::UnknownRoastLevel(s)) if s == "Cinnamon"
    ));
  }

  #[test]
  fn roast_level_defaults_to_medium() {
    assert_eq!(RoastLevel::default(), RoastLevel::Medium);
    assert_eq!(RoastLevel::Medium.to_string(), "Medium");
  }

  #[test]
  fn new_bean_has_documented_defaults() {
    let bean = NewCoffeeBean::new("Yirgacheffe").unwrap();
    assert_eq!(bean.roast_level, RoastLevel::Medium);
    assert_eq!(bean.price, 0.0);
    assert!(bean.rating.is_none());
    assert!(bean.roaster.is_none());
    assert!(bean.image.is_none());
  }

  #[test]
  fn blank_name_is_rejected() {
    assert!(matches!(NewCoffeeBean::new("   "), Err(Error::EmptyName)));

    let mut bean = NewCoffeeBean::new("ok").unwrap();
    bean.name.clear();
    assert!(matches!(bean.validate(), Err(Error::EmptyName)));
  }

  #[test]
  fn negative_price_is_rejected() {
    let bean = NewCoffeeBean { price: -1.0, ..NewCoffeeBean::new("Kenya AA").unwrap() };
    assert!(matches!(bean.validate(), Err(Error::NegativeValue { field: "price", .. })));

    let patch = CoffeeBeanPatch { price: Some(f64::INFINITY), ..Default::default() };
    assert!(patch.validate().is_err());
  }

  #[test]
  fn patch_emptiness() {
    assert!(CoffeeBeanPatch::default().is_empty());
    let clear_roaster = CoffeeBeanPatch { roaster: Some(None), ..Default::default() };
    assert!(!clear_roaster.is_empty());
  }

  #[test]
  fn bean_serializes_without_image_bytes() {
    let bean = CoffeeBean {
      id:                7,
      name:              "Huila".into(),
      roaster:           None,
      roast_level:       RoastLevel::Dark,
      origin:            Some("Colombia".into()),
      processing_method: None,
      tasting_notes:     None,
      rating:            Some(Rating::new(4.0).unwrap()),
      price:             12.5,
      purchase_date:     None,
      image:             Some(PngImage::from_stored(vec![1, 2, 3])),
      created_at:        Utc::now(),
    };
    let json = serde_json::to_value(&bean).unwrap();
    assert_eq!(json["roast_level"], "Dark");
    assert_eq!(json["rating"], 4.0);
    assert!(json.get("image").is_none());
  }
}
