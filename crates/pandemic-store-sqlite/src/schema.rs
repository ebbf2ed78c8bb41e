//! SQL schema for the pandemic SQLite store.
//!
//! Executed once at connection startup.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Names compare case-insensitively: `peru` and `Peru` are one country.
CREATE TABLE IF NOT EXISTS Countries (
    id_country  INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL UNIQUE COLLATE NOCASE,
    continent   TEXT,
    population  INTEGER
);

-- (id_country, date) is the logical key but is not declared UNIQUE:
-- the snapshot loader appends without deduplicating.
CREATE TABLE IF NOT EXISTS PandemicData (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    date              TEXT NOT NULL,   -- YYYY-MM-DD
    id_country        INTEGER NOT NULL
                      REFERENCES Countries(id_country) ON DELETE CASCADE,
    Deaths            INTEGER,
    Recovered         INTEGER,
    total_cases       INTEGER,
    total_deaths      INTEGER,
    total_recovered   INTEGER,
    total_tests       INTEGER,
    new_cases         INTEGER,
    new_deaths        INTEGER,
    New_recovered     INTEGER,
    active_cases      INTEGER,
    serious_critical  INTEGER,
    TrueConfirmed     INTEGER,
    Active            INTEGER
);

CREATE INDEX IF NOT EXISTS pandemic_data_country_date_idx
    ON PandemicData(id_country, date);

PRAGMA user_version = 2;
";
