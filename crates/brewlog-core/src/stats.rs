//! Aggregate statistics over the whole journal.

use std::fmt;

use serde::Serialize;

use crate::bean::RoastLevel;

/// How many brew methods [`Statistics::top_brew_methods`] keeps.
pub const TOP_BREW_METHODS: usize = 5;

/// A single aggregate snapshot of the store.
///
/// Every average skips zero and missing values (a zero rating means
/// "unrated", a zero price "not entered"); an average over nothing is `0.0`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Statistics {
  pub total_beans:         u64,
  pub total_sessions:      u64,
  pub beans_with_image:    u64,
  pub avg_bean_rating:     f64,
  pub avg_session_rating:  f64,
  pub avg_price:           f64,
  /// One entry per roast level, in [`RoastLevel::ALL`] order.
  pub roast_levels:        Vec<(RoastLevel, u64)>,
  /// Most used brew methods, most frequent first.
  pub top_brew_methods:    Vec<(String, u64)>,
  pub avg_brew_time_sec:   f64,
  pub avg_coffee_weight_g: f64,
  pub avg_water_weight_g:  f64,
}

impl Statistics {
  /// Share of beans with an attached image, in percent.
  pub fn image_percentage(&self) -> f64 {
    if self.total_beans == 0 {
      0.0
    } else {
      self.beans_with_image as f64 * 100.0 / self.total_beans as f64
    }
  }
}

impl fmt::Display for Statistics {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(f, "Beans:            {}", self.total_beans)?;
    writeln!(f, "Sessions:         {}", self.total_sessions)?;
    writeln!(
      f,
      "With images:      {} ({:.1}%)",
      self.beans_with_image,
      self.image_percentage()
    )?;
    writeln!(f, "Avg bean rating:  {:.1}", self.avg_bean_rating)?;
    writeln!(f, "Avg brew rating:  {:.1}", self.avg_session_rating)?;
    writeln!(f, "Avg price:        {:.0}", self.avg_price)?;
    writeln!(f)?;
    writeln!(f, "Roast levels:")?;
    for (level, count) in &self.roast_levels {
      writeln!(f, "  • {level}: {count}")?;
    }
    writeln!(f)?;
    writeln!(f, "Top brew methods:")?;
    for (method, count) in &self.top_brew_methods {
      writeln!(f, "  • {method}: {count}")?;
    }
    writeln!(f)?;
    writeln!(f, "Avg brew time:    {:.1} s", self.avg_brew_time_sec)?;
    write!(
      f,
      "Avg dose:         {:.1} g coffee | {:.1} g water",
      self.avg_coffee_weight_g, self.avg_water_weight_g
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn image_percentage_of_empty_store_is_zero() {
    assert_eq!(Statistics::default().image_percentage(), 0.0);
  }

  #[test]
  fn display_rounds_like_the_journal() {
    let stats = Statistics {
      total_beans: 4,
      beans_with_image: 1,
      avg_bean_rating: 4.46,
      avg_price: 649.6,
      roast_levels: vec![(RoastLevel::Light, 2), (RoastLevel::Medium, 1), (RoastLevel::Dark, 1)],
      top_brew_methods: vec![("Pourover".into(), 3)],
      ..Default::default()
    };
    let text = stats.to_string();
    assert!(text.contains("With images:      1 (25.0%)"));
    assert!(text.contains("Avg bean rating:  4.5"));
    assert!(text.contains("Avg price:        650"));
    assert!(text.contains("  • Light: 2"));
    assert!(text.contains("  • Pourover: 3"));
  }
}
