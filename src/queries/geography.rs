//! `geography` table CRUD, with lazy-loaded `geojson` (spec.md §6
//! "lazy-load facility for the geography geojson column" — the column
//! can be large, so listing geographies should not pull it, only
//! `get_with_geometry` does).

use crate::error::{BotanicError, Result};
use crate::graph::recompute_area;
use crate::types::geography::{Geography, GeographyId, SpeciesDistribution};
use sqlx::{Row, SqlitePool};

fn row_to_geography(row: &sqlx::sqlite::SqliteRow, geojson: Option<serde_json::Value>) -> Geography {
    Geography {
        id: row.get("id"),
        name: row.get("name"),
        parent_id: row.get("parent_id"),
        code: row.get("code"),
        geojson,
        approx_area: row.get("approx_area"),
    }
}

/// List every geography without pulling `geojson` (cheap; used for tree
/// navigation and the domain registry's `geo` column).
pub async fn list(pool: &SqlitePool) -> Result<Vec<Geography>> {
    let rows = sqlx::query("SELECT id, name, parent_id, code, approx_area FROM geography")
        .fetch_all(pool)
        .await?;
    Ok(rows.into_iter().map(|row| row_to_geography(&row, None)).collect())
}

/// Load a single geography without its geometry.
pub async fn get(pool: &SqlitePool, id: GeographyId) -> Result<Geography> {
    let row = sqlx::query("SELECT id, name, parent_id, code, approx_area FROM geography WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| BotanicError::validation(format!("no geography with id {id}")))?;
    Ok(row_to_geography(&row, None))
}

/// Load a geography including its (possibly large) `geojson` geometry.
pub async fn get_with_geometry(pool: &SqlitePool, id: GeographyId) -> Result<Geography> {
    let row = sqlx::query(
        "SELECT id, name, parent_id, code, geojson, approx_area FROM geography WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| BotanicError::validation(format!("no geography with id {id}")))?;
    let geojson: Option<String> = row.get("geojson");
    let geojson = geojson.map(|g| serde_json::from_str(&g)).transpose()?;
    Ok(row_to_geography(&row, geojson))
}

pub async fn insert(pool: &SqlitePool, name: &str, parent_id: Option<GeographyId>) -> Result<Geography> {
    let geo = Geography::create(name, parent_id)?;
    let result = sqlx::query("INSERT INTO geography (name, parent_id) VALUES (?, ?)")
        .bind(&geo.name)
        .bind(geo.parent_id)
        .execute(pool)
        .await?;
    Ok(Geography { id: result.last_insert_rowid(), ..geo })
}

/// Set (or clear) a geography's geometry and recompute its cached
/// `approx_area` (mirrors the `before_insert`/`before_update` listener
/// in the original `Geography` model).
pub async fn set_geometry(
    pool: &SqlitePool,
    id: GeographyId,
    geojson: Option<serde_json::Value>,
) -> Result<Geography> {
    let mut geo = get_with_geometry(pool, id).await?;
    geo.geojson = geojson;
    recompute_area(&mut geo);

    sqlx::query("UPDATE geography SET geojson = ?, approx_area = ? WHERE id = ?")
        .bind(geo.geojson.as_ref().map(|g| g.to_string()))
        .bind(geo.approx_area)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(geo)
}

pub async fn distributions(pool: &SqlitePool) -> Result<Vec<SpeciesDistribution>> {
    let rows = sqlx::query("SELECT species_id, geography_id FROM species_distribution")
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| SpeciesDistribution {
            species_id: row.get("species_id"),
            geography_id: row.get("geography_id"),
        })
        .collect())
}

pub async fn add_distribution(pool: &SqlitePool, edge: SpeciesDistribution) -> Result<()> {
    sqlx::query(
        "INSERT OR IGNORE INTO species_distribution (species_id, geography_id) VALUES (?, ?)",
    )
    .bind(edge.species_id)
    .bind(edge.geography_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// Delete a geography, refusing if it still has children (invariant 6
/// analogue — a geography tree node can't be orphaned from under its
/// subtree).
pub async fn delete(pool: &SqlitePool, id: GeographyId) -> Result<()> {
    let child_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM geography WHERE parent_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if child_count > 0 {
        return Err(BotanicError::in_use(format!(
            "geography {id} still has {child_count} child geographies"
        )));
    }
    sqlx::query("DELETE FROM geography WHERE id = ?").bind(id).execute(pool).await?;
    Ok(())
}
