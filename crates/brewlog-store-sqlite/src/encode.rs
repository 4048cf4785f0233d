//! Encoding and decoding helpers between domain types and the column values
//! stored in SQLite.
//!
//! Timestamps are written as RFC 3339 UTC strings with microsecond precision.
//! Rows from older journal files carry SQLite's `datetime('now')` format and
//! empty strings for absent text; both are accepted when reading.

use brewlog_core::{
  bean::{CoffeeBean, RoastLevel},
  png::PngImage,
  rating::Rating,
  session::{BrewingSession, BrewingSessionWithBean},
};
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

use crate::{Error, Result};

/// The format SQLite's `datetime('now')` produces.
const LEGACY_DT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339_opts(SecondsFormat::Micros, true) }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(s, LEGACY_DT_FORMAT)
    .map(|naive| naive.and_utc())
    .map_err(|e| Error::Decode(format!("bad timestamp {s:?}: {e}")))
}

// ─── Text ────────────────────────────────────────────────────────────────────

/// Absent text is `NULL`; blank strings are treated as absent.
pub fn encode_text(s: Option<String>) -> Option<String> {
  s.filter(|s| !s.trim().is_empty())
}

pub fn decode_text(s: Option<String>) -> Option<String> { encode_text(s) }

// ─── Rating ──────────────────────────────────────────────────────────────────

pub fn encode_rating(r: Option<Rating>) -> Option<f64> { r.map(Rating::value) }

/// `NULL` and the legacy `0` both mean unrated.
pub fn decode_rating(v: Option<f64>) -> Result<Option<Rating>> {
  match v {
    None => Ok(None),
    Some(v) => Rating::from_score(v).map_err(|e| Error::Decode(e.to_string())),
  }
}

// ─── RoastLevel ──────────────────────────────────────────────────────────────

pub fn decode_roast_level(s: Option<String>) -> Result<RoastLevel> {
  match s {
    None => Ok(RoastLevel::default()),
    Some(s) => s.parse().map_err(|e: brewlog_core::Error| Error::Decode(e.to_string())),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `coffee_beans` row.
pub struct RawBean {
  pub id:                i64,
  pub name:              String,
  pub roaster:           Option<String>,
  pub roast_level:       Option<String>,
  pub origin:            Option<String>,
  pub processing_method: Option<String>,
  pub tasting_notes:     Option<String>,
  pub rating:            Option<f64>,
  pub price:             Option<f64>,
  pub purchase_date:     Option<String>,
  pub image:             Option<Vec<u8>>,
  pub created_at:        String,
}

impl RawBean {
  /// Read a row selected with [`crate::schema::BEAN_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                row.get(0)?,
      name:              row.get(1)?,
      roaster:           row.get(2)?,
      roast_level:       row.get(3)?,
      origin:            row.get(4)?,
      processing_method: row.get(5)?,
      tasting_notes:     row.get(6)?,
      rating:            row.get(7)?,
      price:             row.get(8)?,
      purchase_date:     row.get(9)?,
      image:             row.get(10)?,
      created_at:        row.get(11)?,
    })
  }

  pub fn into_bean(self) -> Result<CoffeeBean> {
    Ok(CoffeeBean {
      id:                self.id,
      name:              self.name,
      roaster:           decode_text(self.roaster),
      roast_level:       decode_roast_level(self.roast_level)?,
      origin:            decode_text(self.origin),
      processing_method: decode_text(self.processing_method),
      tasting_notes:     decode_text(self.tasting_notes),
      rating:            decode_rating(self.rating)?,
      price:             self.price.unwrap_or(0.0),
      purchase_date:     decode_text(self.purchase_date),
      image:             self.image.filter(|b| !b.is_empty()).map(PngImage::from_stored),
      created_at:        decode_dt(&self.created_at)?,
    })
  }
}

/// Raw values read from a `brewing_sessions` row joined with its bean.
pub struct RawSession {
  pub id:             i64,
  pub coffee_bean_id: i64,
  pub brew_method:    String,
  pub grind_size:     Option<String>,
  pub water_temp:     Option<i64>,
  pub brew_time:      Option<i64>,
  pub coffee_weight:  Option<f64>,
  pub water_weight:   Option<f64>,
  pub rating:         Option<f64>,
  pub notes:          Option<String>,
  pub created_at:     String,
  pub coffee_name:    String,
}

impl RawSession {
  /// Read a row selected with [`crate::schema::SESSION_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:             row.get(0)?,
      coffee_bean_id: row.get(1)?,
      brew_method:    row.get(2)?,
      grind_size:     row.get(3)?,
      water_temp:     row.get(4)?,
      brew_time:      row.get(5)?,
      coffee_weight:  row.get(6)?,
      water_weight:   row.get(7)?,
      rating:         row.get(8)?,
      notes:          row.get(9)?,
      created_at:     row.get(10)?,
      coffee_name:    row.get(11)?,
    })
  }

  pub fn into_session(self) -> Result<BrewingSessionWithBean> {
    let session = BrewingSession {
      id:              self.id,
      coffee_bean_id:  self.coffee_bean_id,
      brew_method:     self.brew_method,
      grind_size:      decode_text(self.grind_size),
      water_temp_c:    self.water_temp,
      brew_time_sec:   self.brew_time,
      coffee_weight_g: self.coffee_weight,
      water_weight_g:  self.water_weight,
      rating:          decode_rating(self.rating)?,
      notes:           decode_text(self.notes),
      created_at:      decode_dt(&self.created_at)?,
    };
    Ok(BrewingSessionWithBean { session, coffee_name: self.coffee_name })
  }
}
