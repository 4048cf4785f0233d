//! Turning typed patches into a single parameterised `UPDATE`.
//!
//! Column names are `&'static str` literals chosen here, one per patch field;
//! nothing the caller supplies ends up in the SQL text.

use brewlog_core::{bean::CoffeeBeanPatch, session::BrewingSessionPatch};
use rusqlite::types::Value;

use crate::encode::{encode_rating, encode_text};

/// The `SET` list of an `UPDATE`, in column order.
#[derive(Debug, Default)]
pub struct Assignments {
  columns: Vec<&'static str>,
  values:  Vec<Value>,
}

impl Assignments {
  fn set(&mut self, column: &'static str, value: impl Into<Value>) {
    self.columns.push(column);
    self.values.push(value.into());
  }

  /// Render `UPDATE {table} SET a = ?1, b = ?2 WHERE id = ?3` and its
  /// parameters, with the row id bound last.
  pub fn into_update(self, table: &'static str, id: i64) -> (String, Vec<Value>) {
    let set_list = self
      .columns
      .iter()
      .enumerate()
      .map(|(i, col)| format!("{col} = ?{}", i + 1))
      .collect::<Vec<_>>()
      .join(", ");
    let sql = format!("UPDATE {table} SET {set_list} WHERE id = ?{}", self.columns.len() + 1);

    let mut values = self.values;
    values.push(Value::Integer(id));
    (sql, values)
  }
}

impl From<CoffeeBeanPatch> for Assignments {
  fn from(p: CoffeeBeanPatch) -> Self {
    let mut a = Self::default();
    if let Some(v) = p.name {
      a.set("name", v);
    }
    if let Some(v) = p.roaster {
      a.set("roaster", encode_text(v));
    }
    if let Some(v) = p.roast_level {
      a.set("roast_level", v.as_str().to_owned());
    }
    if let Some(v) = p.origin {
      a.set("origin", encode_text(v));
    }
    if let Some(v) = p.processing_method {
      a.set("processing_method", encode_text(v));
    }
    if let Some(v) = p.tasting_notes {
      a.set("tasting_notes", encode_text(v));
    }
    if let Some(v) = p.rating {
      a.set("rating", encode_rating(v));
    }
    if let Some(v) = p.price {
      a.set("price", v);
    }
    if let Some(v) = p.purchase_date {
      a.set("purchase_date", encode_text(v));
    }
    if let Some(v) = p.image {
      a.set("image", v.map(|png| png.into_bytes()));
    }
    a
  }
}

impl From<BrewingSessionPatch> for Assignments {
  fn from(p: BrewingSessionPatch) -> Self {
    let mut a = Self::default();
    if let Some(v) = p.coffee_bean_id {
      a.set("coffee_bean_id", v);
    }
    if let Some(v) = p.brew_method {
      a.set("brew_method", v);
    }
    if let Some(v) = p.grind_size {
      a.set("grind_size", encode_text(v));
    }
    if let Some(v) = p.water_temp_c {
      a.set("water_temp", v);
    }
    if let Some(v) = p.brew_time_sec {
      a.set("brew_time", v);
    }
    if let Some(v) = p.coffee_weight_g {
      a.set("coffee_weight", v);
    }
    if let Some(v) = p.water_weight_g {
      a.set("water_weight", v);
    }
    if let Some(v) = p.rating {
      a.set("rating", encode_rating(v));
    }
    if let Some(v) = p.notes {
      a.set("notes", encode_text(v));
    }
    a
  }
}

#[cfg(test)]
mod tests {
  use brewlog_core::{bean::RoastLevel, rating::Rating};

  use super::*;

  #[test]
  fn empty_patch_has_no_assignments() {
    assert!(Assignments::from(CoffeeBeanPatch::default()).columns.is_empty());
    assert!(Assignments::from(BrewingSessionPatch::default()).columns.is_empty());
  }

  #[test]
  fn only_touched_columns_are_set() {
    let patch = CoffeeBeanPatch {
      roast_level: Some(RoastLevel::Dark),
      rating: Some(Some(Rating::new(3.5).unwrap())),
      ..Default::default()
    };
    let (sql, values) = Assignments::from(patch).into_update("coffee_beans", 42);
    assert_eq!(sql, "UPDATE coffee_beans SET roast_level = ?1, rating = ?2 WHERE id = ?3");
    assert_eq!(
      values,
      vec![Value::Text("Dark".into()), Value::Real(3.5), Value::Integer(42)]
    );
  }

  #[test]
  fn clearing_writes_null() {
    let patch = BrewingSessionPatch {
      notes: Some(None),
      water_temp_c: Some(None),
      ..Default::default()
    };
    let (sql, values) = Assignments::from(patch).into_update("brewing_sessions", 1);
    assert_eq!(sql, "UPDATE brewing_sessions SET water_temp = ?1, notes = ?2 WHERE id = ?3");
    assert_eq!(values, vec![Value::Null, Value::Null, Value::Integer(1)]);
  }
}
