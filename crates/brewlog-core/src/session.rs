//! Brewing sessions: one logged brew of one bean.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{Error, Result, bean::check_non_negative, rating::Rating};

/// A brewing session as read back from the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrewingSession {
  pub id:              i64,
  pub coffee_bean_id:  i64,
  pub brew_method:     String,
  pub grind_size:      Option<String>,
  pub water_temp_c:    Option<i64>,
  pub brew_time_sec:   Option<i64>,
  pub coffee_weight_g: Option<f64>,
  pub water_weight_g:  Option<f64>,
  pub rating:          Option<Rating>,
  pub notes:           Option<String>,
  pub created_at:      DateTime<Utc>,
}

impl BrewingSession {
  /// Water-to-coffee brew ratio, when both weights are known.
  pub fn brew_ratio(&self) -> Option<f64> {
    match (self.coffee_weight_g, self.water_weight_g) {
      (Some(coffee), Some(water)) if coffee > 0.0 => Some(water / coffee),
      _ => None,
    }
  }
}

/// A session joined with the name of the bean it was brewed from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BrewingSessionWithBean {
  #[serde(flatten)]
  pub session:     BrewingSession,
  pub coffee_name: String,
}

/// Insert payload for a new session.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBrewingSession {
  pub coffee_bean_id:  i64,
  pub brew_method:     String,
  pub grind_size:      Option<String>,
  pub water_temp_c:    Option<i64>,
  pub brew_time_sec:   Option<i64>,
  pub coffee_weight_g: Option<f64>,
  pub water_weight_g:  Option<f64>,
  pub rating:          Option<Rating>,
  pub notes:           Option<String>,
}

impl NewBrewingSession {
  pub fn new(coffee_bean_id: i64, brew_method: impl Into<String>) -> Result<Self> {
    let brew_method = brew_method.into();
    check_brew_method(&brew_method)?;
    Ok(Self {
      coffee_bean_id,
      brew_method,
      grind_size: None,
      water_temp_c: None,
      brew_time_sec: None,
      coffee_weight_g: None,
      water_weight_g: None,
      rating: None,
      notes: None,
    })
  }

  pub fn validate(&self) -> Result<()> {
    check_brew_method(&self.brew_method)?;
    check_measurements(
      self.water_temp_c,
      self.brew_time_sec,
      self.coffee_weight_g,
      self.water_weight_g,
    )
  }
}

/// A partial update; see [`crate::bean::CoffeeBeanPatch`] for the `Option`
/// conventions.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrewingSessionPatch {
  pub coffee_bean_id:  Option<i64>,
  pub brew_method:     Option<String>,
  pub grind_size:      Option<Option<String>>,
  pub water_temp_c:    Option<Option<i64>>,
  pub brew_time_sec:   Option<Option<i64>>,
  pub coffee_weight_g: Option<Option<f64>>,
  pub water_weight_g:  Option<Option<f64>>,
  pub rating:          Option<Option<Rating>>,
  pub notes:           Option<Option<String>>,
}

impl BrewingSessionPatch {
  pub fn is_empty(&self) -> bool { *self == Self::default() }

  pub fn validate(&self) -> Result<()> {
    if let Some(method) = &self.brew_method {
      check_brew_method(method)?;
    }
    check_measurements(
      self.water_temp_c.flatten(),
      self.brew_time_sec.flatten(),
      self.coffee_weight_g.flatten(),
      self.water_weight_g.flatten(),
    )
  }
}

fn check_brew_method(method: &str) -> Result<()> {
  if method.trim().is_empty() { Err(Error::EmptyBrewMethod) } else { Ok(()) }
}

fn check_measurements(
  water_temp_c:    Option<i64>,
  brew_time_sec:   Option<i64>,
  coffee_weight_g: Option<f64>,
  water_weight_g:  Option<f64>,
) -> Result<()> {
  if let Some(t) = water_temp_c {
    check_non_negative("water temperature", t as f64)?;
  }
  if let Some(t) = brew_time_sec {
    check_non_negative("brew time", t as f64)?;
  }
  if let Some(w) = coffee_weight_g {
    check_non_negative("coffee weight", w)?;
  }
  if let Some(w) = water_weight_g {
    check_non_negative("water weight", w)?;
  }
  Ok(())
}
