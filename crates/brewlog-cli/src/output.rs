//! Plain-text rendering of beans and sessions.

use brewlog_core::{
  bean::CoffeeBean,
  rating::Rating,
  session::BrewingSessionWithBean,
};
use serde::Serialize;

fn dash(s: Option<&str>) -> &str { s.unwrap_or("-") }

fn rating(r: Option<Rating>) -> String { r.map_or_else(|| "-".to_owned(), |r| r.to_string()) }

fn number<T: ToString>(v: Option<T>) -> String {
  v.map_or_else(|| "-".to_owned(), |v| v.to_string())
}

/// Pretty-print `value` as JSON.
pub fn json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
  Ok(serde_json::to_string_pretty(value)?)
}

/// One line per bean: id, name, roaster, roast, origin, rating.
pub fn bean_table(beans: &[CoffeeBean]) -> String {
  let mut out = format!(
    "{:>4}  {:<24} {:<18} {:<7} {:<14} {:>6}\n",
    "ID", "NAME", "ROASTER", "ROAST", "ORIGIN", "RATING"
  );
  for b in beans {
    out.push_str(&format!(
      "{:>4}  {:<24} {:<18} {:<7} {:<14} {:>6}\n",
      b.id,
      b.name,
      dash(b.roaster.as_deref()),
      b.roast_level,
      dash(b.origin.as_deref()),
      rating(b.rating),
    ));
  }
  out
}

pub fn bean_detail(b: &CoffeeBean) -> String {
  let image = b
    .image
    .as_ref()
    .map_or_else(|| "none".to_owned(), |png| format!("{} bytes PNG", png.len()));
  [
    format!("#{} {}", b.id, b.name),
    format!("  Roaster:     {}", dash(b.roaster.as_deref())),
    format!("  Roast level: {}", b.roast_level),
    format!("  Origin:      {}", dash(b.origin.as_deref())),
    format!("  Processing:  {}", dash(b.processing_method.as_deref())),
    format!("  Notes:       {}", dash(b.tasting_notes.as_deref())),
    format!("  Rating:      {}", rating(b.rating)),
    format!("  Price:       {:.2}", b.price),
    format!("  Purchased:   {}", dash(b.purchase_date.as_deref())),
    format!("  Image:       {image}"),
    format!("  Added:       {}", b.created_at.format("%Y-%m-%d %H:%M")),
  ]
  .join("\n")
}

/// One line per session: id, bean, method, temperature, time, rating.
pub fn session_table(sessions: &[BrewingSessionWithBean]) -> String {
  let mut out = format!(
    "{:>4}  {:<24} {:<14} {:>6} {:>6} {:>6}\n",
    "ID", "COFFEE", "METHOD", "TEMP", "TIME", "RATING"
  );
  for s in sessions {
    out.push_str(&format!(
      "{:>4}  {:<24} {:<14} {:>6} {:>6} {:>6}\n",
      s.session.id,
      s.coffee_name,
      s.session.brew_method,
      number(s.session.water_temp_c),
      number(s.session.brew_time_sec),
      rating(s.session.rating),
    ));
  }
  out
}

pub fn session_detail(s: &BrewingSessionWithBean) -> String {
  let session = &s.session;
  let mut lines = vec![
    format!("#{} {} ({})", session.id, session.brew_method, s.coffee_name),
    format!("  Grind:       {}", dash(session.grind_size.as_deref())),
    format!("  Water temp:  {} °C", number(session.water_temp_c)),
    format!("  Brew time:   {} s", number(session.brew_time_sec)),
    format!("  Coffee:      {} g", number(session.coffee_weight_g)),
    format!("  Water:       {} g", number(session.water_weight_g)),
  ];
  if let Some(ratio) = session.brew_ratio() {
    lines.push(format!("  Ratio:       1:{ratio:.1}"));
  }
  lines.push(format!("  Rating:      {}", rating(session.rating)));
  lines.push(format!("  Notes:       {}", dash(session.notes.as_deref())));
  lines.push(format!("  Brewed:      {}", session.created_at.format("%Y-%m-%d %H:%M")));
  lines.join("\n")
}
