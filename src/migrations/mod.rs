//! Schema management (spec.md §6 "Persistence layout").
//!
//! Grounded on `migrations::run_migrations`/`migrations::runner` in the
//! teacher, which apply a fixed SQL string against the pool on startup;
//! this crate keeps that shape but replaces the schema with the tables
//! spec.md §6 names.

use crate::error::Result;
use sqlx::SqlitePool;

pub mod runner;

/// Every statement below is `IF NOT EXISTS`, so `run_migrations` is
/// idempotent and safe to call on every startup (mirrors the teacher's
/// own migration runner, which has no separate up/down bookkeeping
/// table for this single-schema crate).
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS family (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    epithet TEXT NOT NULL,
    qualifier TEXT NOT NULL DEFAULT '',
    cites TEXT,
    author TEXT,
    UNIQUE (epithet, qualifier)
);

CREATE TABLE IF NOT EXISTS family_note (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    family_id INTEGER NOT NULL REFERENCES family(id) ON DELETE CASCADE,
    category TEXT,
    note TEXT NOT NULL,
    date TEXT,
    user TEXT
);

CREATE TABLE IF NOT EXISTS family_picture (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    family_id INTEGER NOT NULL REFERENCES family(id) ON DELETE CASCADE,
    path TEXT NOT NULL,
    category TEXT
);

CREATE TABLE IF NOT EXISTS family_synonym (
    accepted_id INTEGER NOT NULL REFERENCES family(id) ON DELETE CASCADE,
    synonym_id INTEGER NOT NULL UNIQUE REFERENCES family(id) ON DELETE CASCADE,
    CHECK (accepted_id != synonym_id)
);

CREATE TABLE IF NOT EXISTS genus (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    family_id INTEGER NOT NULL REFERENCES family(id),
    epithet TEXT NOT NULL,
    hybrid TEXT NOT NULL DEFAULT '',
    qualifier TEXT NOT NULL DEFAULT '',
    author TEXT,
    cites TEXT,
    suprageneric TEXT,
    UNIQUE (epithet, author, qualifier, family_id)
);

CREATE TABLE IF NOT EXISTS genus_note (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    genus_id INTEGER NOT NULL REFERENCES genus(id) ON DELETE CASCADE,
    category TEXT,
    note TEXT NOT NULL,
    date TEXT,
    user TEXT
);

CREATE TABLE IF NOT EXISTS genus_picture (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    genus_id INTEGER NOT NULL REFERENCES genus(id) ON DELETE CASCADE,
    path TEXT NOT NULL,
    category TEXT
);

CREATE TABLE IF NOT EXISTS genus_synonym (
    accepted_id INTEGER NOT NULL REFERENCES genus(id) ON DELETE CASCADE,
    synonym_id INTEGER NOT NULL UNIQUE REFERENCES genus(id) ON DELETE CASCADE,
    CHECK (accepted_id != synonym_id)
);

CREATE TABLE IF NOT EXISTS habit (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS color (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS species (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    genus_id INTEGER NOT NULL REFERENCES genus(id),
    hybrid TEXT NOT NULL DEFAULT '',
    epithet TEXT NOT NULL,
    author TEXT,
    sp_qual TEXT,
    infrasp1_rank TEXT, infrasp1_epithet TEXT, infrasp1_author TEXT,
    infrasp2_rank TEXT, infrasp2_epithet TEXT, infrasp2_author TEXT,
    infrasp3_rank TEXT, infrasp3_epithet TEXT, infrasp3_author TEXT,
    infrasp4_rank TEXT, infrasp4_epithet TEXT, infrasp4_author TEXT,
    grex TEXT,
    cv_group TEXT,
    cultivar_epithet TEXT,
    pbr_name INTEGER NOT NULL DEFAULT 0,
    trade_name TEXT,
    trademark_symbol TEXT NOT NULL DEFAULT '',
    cites TEXT,
    red_list TEXT,
    label_distribution TEXT,
    habit_id INTEGER REFERENCES habit(id),
    flower_color_id INTEGER REFERENCES color(id),
    full_name TEXT NOT NULL DEFAULT '',
    full_sci_name TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS species_note (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    species_id INTEGER NOT NULL REFERENCES species(id) ON DELETE CASCADE,
    category TEXT,
    note TEXT NOT NULL,
    date TEXT,
    user TEXT
);

CREATE TABLE IF NOT EXISTS species_picture (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    species_id INTEGER NOT NULL REFERENCES species(id) ON DELETE CASCADE,
    path TEXT NOT NULL,
    category TEXT
);

CREATE TABLE IF NOT EXISTS species_synonym (
    accepted_id INTEGER NOT NULL REFERENCES species(id) ON DELETE CASCADE,
    synonym_id INTEGER NOT NULL UNIQUE REFERENCES species(id) ON DELETE CASCADE,
    CHECK (accepted_id != synonym_id)
);

CREATE TABLE IF NOT EXISTS vernacular_name (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    species_id INTEGER NOT NULL REFERENCES species(id) ON DELETE CASCADE,
    name TEXT NOT NULL,
    language TEXT
);

CREATE TABLE IF NOT EXISTS default_vernacular_name (
    species_id INTEGER PRIMARY KEY REFERENCES species(id) ON DELETE CASCADE,
    vernacular_name_id INTEGER NOT NULL REFERENCES vernacular_name(id) ON DELETE CASCADE
);

CREATE TABLE IF NOT EXISTS geography (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    parent_id INTEGER REFERENCES geography(id),
    code TEXT,
    geojson TEXT,
    approx_area REAL
);

CREATE TABLE IF NOT EXISTS species_distribution (
    species_id INTEGER NOT NULL REFERENCES species(id) ON DELETE CASCADE,
    geography_id INTEGER NOT NULL REFERENCES geography(id) ON DELETE CASCADE,
    PRIMARY KEY (species_id, geography_id)
);

-- Owned by the collections side of the application; core only reads
-- these tables (see src/types/external.rs) but needs them present
-- locally to enforce the species deletion invariant and to back the
-- `acc`/`plant` query domains and the `active`/`is_active` hybrid
-- (spec.md §4.2, §6).
CREATE TABLE IF NOT EXISTS accession (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    species_id INTEGER NOT NULL REFERENCES species(id),
    code TEXT NOT NULL,
    date_recvd TEXT
);

CREATE TABLE IF NOT EXISTS plant (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    accession_id INTEGER NOT NULL REFERENCES accession(id),
    quantity INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT NOT NULL,
    row_id INTEGER NOT NULL,
    operation TEXT NOT NULL,
    field TEXT,
    old_value TEXT,
    new_value TEXT,
    timestamp TEXT NOT NULL,
    user TEXT
);
"#;

/// Apply `SCHEMA` against `pool`. Idempotent: safe to call on every
/// startup.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}
