//! `genus` table CRUD.

use crate::error::{BotanicError, Result};
use crate::types::enums::{Cites, Hybrid, Qualifier};
use crate::types::genus::{Genus, GenusFields, GenusId};
use sqlx::{Row, SqlitePool};

fn row_to_genus(row: &sqlx::sqlite::SqliteRow) -> Result<Genus> {
    let hybrid: String = row.get("hybrid");
    let qualifier: String = row.get("qualifier");
    let cites: Option<String> = row.get("cites");
    Ok(Genus {
        id: row.get("id"),
        family_id: row.get("family_id"),
        epithet: row.get("epithet"),
        hybrid: Hybrid::parse(&hybrid)?,
        qualifier: Qualifier::parse(&qualifier)?,
        author: row.get("author"),
        cites: cites.map(|c| Cites::parse(&c)).transpose()?,
        suprageneric: row.get("suprageneric"),
        notes: Vec::new(),
    })
}

pub async fn insert(pool: &SqlitePool, fields: GenusFields) -> Result<Genus> {
    let genus = Genus::create(fields)?;
    let result = sqlx::query(
        "INSERT INTO genus (family_id, epithet, hybrid, qualifier, author, cites, suprageneric) \
         VALUES (?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(genus.family_id)
    .bind(&genus.epithet)
    .bind(genus.hybrid.as_str())
    .bind(genus.qualifier.as_str())
    .bind(&genus.author)
    .bind(genus.cites.map(|c| c.as_str().to_string()))
    .bind(&genus.suprageneric)
    .execute(pool)
    .await?;

    Ok(Genus { id: result.last_insert_rowid(), ..genus })
}

pub async fn get(pool: &SqlitePool, id: GenusId) -> Result<Genus> {
    let row = sqlx::query(
        "SELECT id, family_id, epithet, hybrid, qualifier, author, cites, suprageneric \
         FROM genus WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| BotanicError::validation(format!("no genus with id {id}")))?;
    row_to_genus(&row)
}

pub async fn update(pool: &SqlitePool, id: GenusId, patch: GenusFields) -> Result<Genus> {
    let existing = get(pool, id).await?;
    let updated = existing.update(patch)?;
    sqlx::query(
        "UPDATE genus SET family_id = ?, epithet = ?, hybrid = ?, qualifier = ?, author = ?, \
         cites = ?, suprageneric = ? WHERE id = ?",
    )
    .bind(updated.family_id)
    .bind(&updated.epithet)
    .bind(updated.hybrid.as_str())
    .bind(updated.qualifier.as_str())
    .bind(&updated.author)
    .bind(updated.cites.map(|c| c.as_str().to_string()))
    .bind(&updated.suprageneric)
    .bind(id)
    .execute(pool)
    .await?;
    Ok(updated)
}

/// Delete a genus, refusing if it still owns species (invariant 6).
pub async fn delete(pool: &SqlitePool, id: GenusId) -> Result<()> {
    let species_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM species WHERE genus_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if species_count > 0 {
        return Err(BotanicError::in_use(format!(
            "genus {id} still has {species_count} species"
        )));
    }
    sqlx::query("DELETE FROM genus WHERE id = ?").bind(id).execute(pool).await?;
    Ok(())
}
