//! SQL schema for the brewlog SQLite store.
//!
//! Executed on every open. Table and column names match journal files
//! written by earlier versions, so existing files open with their rows
//! intact.

/// Full schema DDL; idempotent thanks to `CREATE ... IF NOT EXISTS`.
///
/// `foreign_keys` is a per-connection setting and is re-enabled here on every
/// open; without it the cascade from beans to sessions does not fire.
pub const SCHEMA: &str = "
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT: ids of deleted beans are never handed out again.
CREATE TABLE IF NOT EXISTS coffee_beans (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    name              TEXT NOT NULL,
    roaster           TEXT,
    roast_level       TEXT CHECK (roast_level IN ('Light', 'Medium', 'Dark')) DEFAULT 'Medium',
    origin            TEXT,
    processing_method TEXT,
    tasting_notes     TEXT,
    rating            REAL DEFAULT 0 CHECK (rating BETWEEN 0 AND 5),
    price             REAL DEFAULT 0 CHECK (price >= 0),
    purchase_date     TEXT,
    image             BLOB,             -- PNG bytes or NULL
    created_at        TEXT DEFAULT (datetime('now'))
);

CREATE TABLE IF NOT EXISTS brewing_sessions (
    id             INTEGER PRIMARY KEY AUTOINCREMENT,
    coffee_bean_id INTEGER NOT NULL,
    brew_method    TEXT NOT NULL,
    grind_size     TEXT,
    water_temp     INTEGER,           -- degrees Celsius
    brew_time      INTEGER,           -- seconds
    coffee_weight  REAL,              -- grams
    water_weight   REAL,              -- grams
    rating         REAL CHECK (rating BETWEEN 0 AND 5),
    notes          TEXT,
    created_at     TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (coffee_bean_id) REFERENCES coffee_beans(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS coffee_beans_created_idx     ON coffee_beans(created_at);
CREATE INDEX IF NOT EXISTS brewing_sessions_bean_idx    ON brewing_sessions(coffee_bean_id);
CREATE INDEX IF NOT EXISTS brewing_sessions_created_idx ON brewing_sessions(created_at);

PRAGMA user_version = 1;
";

/// Column list shared by every bean `SELECT`; order matches
/// [`crate::encode::RawBean::from_row`].
pub const BEAN_COLUMNS: &str = "id, name, roaster, roast_level, origin, processing_method,
  tasting_notes, rating, price, purchase_date, image, created_at";

/// Session columns joined with the owning bean's name; order matches
/// [`crate::encode::RawSession::from_row`]. Pair with [`SESSION_FROM`].
pub const SESSION_COLUMNS: &str = "bs.id, bs.coffee_bean_id, bs.brew_method, bs.grind_size,
  bs.water_temp, bs.brew_time, bs.coffee_weight, bs.water_weight, bs.rating,
  bs.notes, bs.created_at, cb.name";

pub const SESSION_FROM: &str =
  "brewing_sessions bs JOIN coffee_beans cb ON cb.id = bs.coffee_bean_id";

/// Newest first; `id` breaks ties between rows created in the same instant.
///
/// `created_at` holds both RFC 3339 text and the legacy `datetime('now')`
/// form, which do not sort correctly against each other as strings, so rows
/// are compared by instant.
pub const BEAN_ORDER: &str = "ORDER BY julianday(created_at) DESC, id DESC";
pub const SESSION_ORDER: &str = "ORDER BY julianday(bs.created_at) DESC, bs.id DESC";

/// Name of the case-folding SQL function registered on every connection.
pub const FOLD_FN: &str = "brewlog_fold";
