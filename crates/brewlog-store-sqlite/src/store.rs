//! [`SqliteStore`]: the SQLite implementation of [`CoffeeStore`].

use std::path::{Path, PathBuf};

use brewlog_core::{
  bean::{CoffeeBean, CoffeeBeanPatch, NewCoffeeBean, RoastLevel},
  session::{BrewingSessionPatch, BrewingSessionWithBean, NewBrewingSession},
  stats::{Statistics, TOP_BREW_METHODS},
  store::CoffeeStore,
};
use chrono::Utc;
use rusqlite::{
  OptionalExtension as _,
  functions::FunctionFlags,
  types::{Value, ValueRef},
};

use crate::{
  Error, Result,
  encode::{RawBean, RawSession, encode_dt, encode_rating, encode_text},
  patch::Assignments,
  schema::{
    BEAN_COLUMNS, BEAN_ORDER, FOLD_FN, SCHEMA, SESSION_COLUMNS, SESSION_FROM, SESSION_ORDER,
  },
};

/// Directory under the platform data dir that holds the journal.
const APP_DIR: &str = "brewlog";
/// File name of the journal database.
const DB_FILE: &str = "coffee_journal.db";

/// The per-user default location of the journal file, e.g.
/// `~/.local/share/brewlog/coffee_journal.db` on Linux.
pub fn default_db_path() -> Result<PathBuf> {
  dirs::data_dir()
    .map(|dir| dir.join(APP_DIR).join(DB_FILE))
    .ok_or(Error::NoDataDir)
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A coffee journal backed by a single SQLite file.
///
/// Not `Clone`: [`SqliteStore::import_from`] consumes the store so no other
/// handle to the data file survives the swap.
pub struct SqliteStore {
  pub(crate) conn: tokio_rusqlite::Connection,
  pub(crate) path: Option<PathBuf>,
}

impl SqliteStore {
  /// Open (or create) a store at `path`, creating missing parent
  /// directories, and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
      tokio::fs::create_dir_all(dir).await?;
    }
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn, path: Some(path) };
    store.init().await?;
    tracing::debug!(path = ?store.path, "opened coffee journal");
    Ok(store)
  }

  /// Open the journal at [`default_db_path`].
  pub async fn open_default() -> Result<Self> { Self::open(default_db_path()?).await }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, path: None };
    store.init().await?;
    Ok(store)
  }

  /// The backing file, or `None` for an in-memory store.
  pub fn path(&self) -> Option<&Path> { self.path.as_deref() }

  /// Close the connection, surfacing any error SQLite reports on close.
  pub async fn close(self) -> Result<()> {
    self.conn.close().await?;
    Ok(())
  }

  async fn init(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        register_fold(conn)?;
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Prepare every read statement once, so a file with incompatible tables
  /// is rejected up front.
  pub(crate) async fn probe(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.prepare(&format!("SELECT {BEAN_COLUMNS} FROM coffee_beans LIMIT 0"))?;
        conn.prepare(&format!("SELECT {SESSION_COLUMNS} FROM {SESSION_FROM} LIMIT 0"))?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn select_beans(&self, filter: &'static str, params: Vec<Value>) -> Result<Vec<CoffeeBean>> {
    let raws: Vec<RawBean> = self
      .conn
      .call(move |conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {BEAN_COLUMNS} FROM coffee_beans {filter} {BEAN_ORDER}"))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawBean::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawBean::into_bean).collect()
  }

  async fn select_sessions(
    &self,
    filter: &'static str,
    params: Vec<Value>,
  ) -> Result<Vec<BrewingSessionWithBean>> {
    let raws: Vec<RawSession> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SESSION_COLUMNS} FROM {SESSION_FROM} {filter} {SESSION_ORDER}"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), RawSession::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSession::into_session).collect()
  }

  /// Run a single `UPDATE` built from `assignments`; reports whether a row
  /// matched. Callers skip empty patches.
  async fn apply(&self, table: &'static str, id: i64, assignments: Assignments) -> Result<bool> {
    let (sql, params) = assignments.into_update(table, id);
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(&sql, rusqlite::params_from_iter(params))?))
      .await?;
    Ok(changed > 0)
  }

  async fn delete_row(&self, table: &'static str, id: i64) -> Result<bool> {
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(&format!("DELETE FROM {table} WHERE id = ?1"), [id])?)
      })
      .await?;
    Ok(removed > 0)
  }
}

/// Install the Unicode-aware lower-casing function used by search. SQLite's
/// own `lower()` and `LIKE` only fold ASCII.
fn register_fold(conn: &rusqlite::Connection) -> rusqlite::Result<()> {
  conn.create_scalar_function(
    FOLD_FN,
    1,
    FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
    |ctx| {
      let folded = match ctx.get_raw(0) {
        ValueRef::Text(t) => Some(String::from_utf8_lossy(t).to_lowercase()),
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(r) => Some(r.to_string()),
        ValueRef::Null | ValueRef::Blob(_) => None,
      };
      Ok(folded)
    },
  )
}

fn avg_or_zero(conn: &rusqlite::Connection, sql: &str) -> rusqlite::Result<f64> {
  let avg: Option<f64> = conn.query_row(sql, [], |r| r.get(0))?;
  Ok(avg.unwrap_or(0.0))
}

fn count(conn: &rusqlite::Connection, sql: &str) -> rusqlite::Result<u64> {
  let n: i64 = conn.query_row(sql, [], |r| r.get(0))?;
  Ok(n.max(0) as u64)
}

// ─── CoffeeStore impl ────────────────────────────────────────────────────────

impl CoffeeStore for SqliteStore {
  type Error = Error;

  // ── Beans ─────────────────────────────────────────────────────────────────

  async fn add_coffee_bean(&self, bean: NewCoffeeBean) -> Result<i64> {
    bean.validate()?;

    let name              = bean.name;
    let roaster           = encode_text(bean.roaster);
    let roast_level       = bean.roast_level.as_str();
    let origin            = encode_text(bean.origin);
    let processing_method = encode_text(bean.processing_method);
    let tasting_notes     = encode_text(bean.tasting_notes);
    let rating            = encode_rating(bean.rating);
    let price             = bean.price;
    let purchase_date     = encode_text(bean.purchase_date);
    let image             = bean.image.map(|png| png.into_bytes());
    let created_at        = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO coffee_beans (
             name, roaster, roast_level, origin, processing_method,
             tasting_notes, rating, price, purchase_date, image, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
          rusqlite::params![
            name,
            roaster,
            roast_level,
            origin,
            processing_method,
            tasting_notes,
            rating,
            price,
            purchase_date,
            image,
            created_at,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::from)
      .inspect_err(|e| tracing::warn!("failed to add coffee bean: {e}"))?;

    tracing::debug!(id, "added coffee bean");
    Ok(id)
  }

  async fn get_all_coffee_beans(&self) -> Result<Vec<CoffeeBean>> {
    self.select_beans("", Vec::new()).await
  }

  async fn get_coffee_bean(&self, id: i64) -> Result<Option<CoffeeBean>> {
    let raw: Option<RawBean> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {BEAN_COLUMNS} FROM coffee_beans WHERE id = ?1"),
            [id],
            RawBean::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawBean::into_bean).transpose()
  }

  async fn update_coffee_bean(&self, id: i64, patch: CoffeeBeanPatch) -> Result<bool> {
    patch.validate()?;
    if patch.is_empty() {
      return Ok(true);
    }
    let updated = self
      .apply("coffee_beans", id, patch.into())
      .await
      .inspect_err(|e| tracing::warn!(id, "failed to update coffee bean: {e}"))?;
    tracing::debug!(id, updated, "updated coffee bean");
    Ok(updated)
  }

  async fn delete_coffee_bean(&self, id: i64) -> Result<bool> {
    let removed = self
      .delete_row("coffee_beans", id)
      .await
      .inspect_err(|e| tracing::warn!(id, "failed to delete coffee bean: {e}"))?;
    tracing::debug!(id, removed, "deleted coffee bean");
    Ok(removed)
  }

  async fn search_coffee_beans(&self, query: &str) -> Result<Vec<CoffeeBean>> {
    if query.is_empty() {
      return self.get_all_coffee_beans().await;
    }
    let needle = Value::Text(query.to_lowercase());
    self
      .select_beans(
        "WHERE instr(brewlog_fold(name), ?1) > 0
            OR instr(brewlog_fold(roaster), ?1) > 0
            OR instr(brewlog_fold(origin), ?1) > 0
            OR instr(brewlog_fold(tasting_notes), ?1) > 0",
        vec![needle],
      )
      .await
  }

  async fn count_coffee_beans_with_image(&self) -> Result<u64> {
    let n = self
      .conn
      .call(|conn| Ok(count(conn, "SELECT COUNT(*) FROM coffee_beans WHERE image IS NOT NULL")?))
      .await?;
    Ok(n)
  }

  // ── Sessions ──────────────────────────────────────────────────────────────

  async fn add_brewing_session(&self, session: NewBrewingSession) -> Result<i64> {
    session.validate()?;

    let coffee_bean_id = session.coffee_bean_id;
    let brew_method    = session.brew_method;
    let grind_size     = encode_text(session.grind_size);
    let water_temp     = session.water_temp_c;
    let brew_time      = session.brew_time_sec;
    let coffee_weight  = session.coffee_weight_g;
    let water_weight   = session.water_weight_g;
    let rating         = encode_rating(session.rating);
    let notes          = encode_text(session.notes);
    let created_at     = encode_dt(Utc::now());

    let id = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO brewing_sessions (
             coffee_bean_id, brew_method, grind_size, water_temp, brew_time,
             coffee_weight, water_weight, rating, notes, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            coffee_bean_id,
            brew_method,
            grind_size,
            water_temp,
            brew_time,
            coffee_weight,
            water_weight,
            rating,
            notes,
            created_at,
          ],
        )?;
        Ok(conn.last_insert_rowid())
      })
      .await
      .map_err(Error::from)
      .inspect_err(|e| tracing::warn!(coffee_bean_id, "failed to add brewing session: {e}"))?;

    tracing::debug!(id, coffee_bean_id, "added brewing session");
    Ok(id)
  }

  async fn get_all_brewing_sessions(&self) -> Result<Vec<BrewingSessionWithBean>> {
    self.select_sessions("", Vec::new()).await
  }

  async fn get_brewing_session(&self, id: i64) -> Result<Option<BrewingSessionWithBean>> {
    let mut found = self.select_sessions("WHERE bs.id = ?1", vec![Value::Integer(id)]).await?;
    Ok(found.pop())
  }

  async fn get_sessions_for_bean(&self, bean_id: i64) -> Result<Vec<BrewingSessionWithBean>> {
    self
      .select_sessions("WHERE bs.coffee_bean_id = ?1", vec![Value::Integer(bean_id)])
      .await
  }

  async fn update_brewing_session(&self, id: i64, patch: BrewingSessionPatch) -> Result<bool> {
    patch.validate()?;
    if patch.is_empty() {
      return Ok(true);
    }
    let updated = self
      .apply("brewing_sessions", id, patch.into())
      .await
      .inspect_err(|e| tracing::warn!(id, "failed to update brewing session: {e}"))?;
    tracing::debug!(id, updated, "updated brewing session");
    Ok(updated)
  }

  async fn delete_brewing_session(&self, id: i64) -> Result<bool> {
    let removed = self
      .delete_row("brewing_sessions", id)
      .await
      .inspect_err(|e| tracing::warn!(id, "failed to delete brewing session: {e}"))?;
    tracing::debug!(id, removed, "deleted brewing session");
    Ok(removed)
  }

  async fn search_brewing_sessions(&self, query: &str) -> Result<Vec<BrewingSessionWithBean>> {
    if query.is_empty() {
      return self.get_all_brewing_sessions().await;
    }
    let needle = Value::Text(query.to_lowercase());
    self
      .select_sessions(
        "WHERE instr(brewlog_fold(cb.name), ?1) > 0
            OR instr(brewlog_fold(bs.brew_method), ?1) > 0
            OR instr(brewlog_fold(bs.notes), ?1) > 0",
        vec![needle],
      )
      .await
  }

  // ── Aggregates ────────────────────────────────────────────────────────────

  async fn get_detailed_statistics(&self) -> Result<Statistics> {
    let stats = self
      .conn
      .call(|conn| {
        // One read transaction so every figure comes from the same snapshot.
        let tx = conn.transaction()?;

        let mut stats = Statistics {
          total_beans:         count(&tx, "SELECT COUNT(*) FROM coffee_beans")?,
          total_sessions:      count(&tx, "SELECT COUNT(*) FROM brewing_sessions")?,
          beans_with_image:    count(&tx, "SELECT COUNT(image) FROM coffee_beans")?,
          avg_bean_rating:     avg_or_zero(&tx, "SELECT AVG(rating) FROM coffee_beans WHERE rating > 0")?,
          avg_session_rating:  avg_or_zero(&tx, "SELECT AVG(rating) FROM brewing_sessions WHERE rating > 0")?,
          avg_price:           avg_or_zero(&tx, "SELECT AVG(price) FROM coffee_beans WHERE price > 0")?,
          roast_levels:        Vec::new(),
          top_brew_methods:    Vec::new(),
          avg_brew_time_sec:   avg_or_zero(&tx, "SELECT AVG(brew_time) FROM brewing_sessions WHERE brew_time > 0")?,
          avg_coffee_weight_g: avg_or_zero(&tx, "SELECT AVG(coffee_weight) FROM brewing_sessions WHERE coffee_weight > 0")?,
          avg_water_weight_g:  avg_or_zero(&tx, "SELECT AVG(water_weight) FROM brewing_sessions WHERE water_weight > 0")?,
        };

        let per_level: Vec<(Option<String>, i64)> = tx
          .prepare("SELECT roast_level, COUNT(*) FROM coffee_beans GROUP BY roast_level")?
          .query_map([], |r| Ok((r.get(0)?, r.get(1)?)))?
          .collect::<rusqlite::Result<_>>()?;
        stats.roast_levels = RoastLevel::ALL
          .into_iter()
          .map(|level| {
            let n = per_level
              .iter()
              .filter(|(stored, _)| {
                stored.as_deref().unwrap_or(RoastLevel::default().as_str()) == level.as_str()
              })
              .map(|(_, n)| *n)
              .sum::<i64>();
            (level, n.max(0) as u64)
          })
          .collect();

        stats.top_brew_methods = tx
          .prepare(
            "SELECT brew_method, COUNT(*) AS uses FROM brewing_sessions
             GROUP BY brew_method ORDER BY uses DESC, brew_method ASC LIMIT ?1",
          )?
          .query_map([TOP_BREW_METHODS as i64], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, i64>(1)?.max(0) as u64))
          })?
          .collect::<rusqlite::Result<_>>()?;

        tx.commit()?;
        Ok(stats)
      })
      .await?;

    Ok(stats)
  }
}
