//! `family` table CRUD (spec.md §6 "Entity CRUD with the validation
//! rules of §4.2").

use crate::error::{BotanicError, Result};
use crate::types::enums::{Cites, Qualifier};
use crate::types::family::{Family, FamilyFields, FamilyId};
use crate::types::note::Note;
use sqlx::{Row, SqlitePool};

async fn load_notes(pool: &SqlitePool, family_id: FamilyId) -> Result<Vec<Note>> {
    let rows = sqlx::query("SELECT id, category, note, date, user FROM family_note WHERE family_id = ?")
        .bind(family_id)
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|row| Note {
            id: row.get("id"),
            category: row.get("category"),
            note: row.get("note"),
            date: row.get("date"),
            user: row.get("user"),
        })
        .collect())
}

fn row_to_family(row: &sqlx::sqlite::SqliteRow) -> Result<Family> {
    let qualifier: String = row.get("qualifier");
    let cites: Option<String> = row.get("cites");
    Ok(Family {
        id: row.get("id"),
        epithet: row.get("epithet"),
        qualifier: Qualifier::parse(&qualifier)?,
        cites: cites.map(|c| Cites::parse(&c)).transpose()?,
        author: row.get("author"),
        notes: Vec::new(),
    })
}

pub async fn insert(pool: &SqlitePool, fields: FamilyFields) -> Result<Family> {
    let family = Family::create(fields)?;
    let result = sqlx::query(
        "INSERT INTO family (epithet, qualifier, cites, author) VALUES (?, ?, ?, ?)",
    )
    .bind(&family.epithet)
    .bind(family.qualifier.as_str())
    .bind(family.cites.map(|c| c.as_str().to_string()))
    .bind(&family.author)
    .execute(pool)
    .await?;

    Ok(Family { id: result.last_insert_rowid(), ..family })
}

pub async fn get(pool: &SqlitePool, id: FamilyId) -> Result<Family> {
    let row = sqlx::query("SELECT id, epithet, qualifier, cites, author FROM family WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| BotanicError::validation(format!("no family with id {id}")))?;
    let mut family = row_to_family(&row)?;
    family.notes = load_notes(pool, id).await?;
    Ok(family)
}

pub async fn update(pool: &SqlitePool, id: FamilyId, patch: FamilyFields) -> Result<Family> {
    let existing = get(pool, id).await?;
    let updated = existing.update(patch)?;
    sqlx::query("UPDATE family SET epithet = ?, qualifier = ?, cites = ?, author = ? WHERE id = ?")
        .bind(&updated.epithet)
        .bind(updated.qualifier.as_str())
        .bind(updated.cites.map(|c| c.as_str().to_string()))
        .bind(&updated.author)
        .bind(id)
        .execute(pool)
        .await?;
    Ok(updated)
}

/// Delete a family, refusing if it still owns genera (invariant 6).
pub async fn delete(pool: &SqlitePool, id: FamilyId) -> Result<()> {
    let genus_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM genus WHERE family_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    if genus_count > 0 {
        return Err(BotanicError::in_use(format!(
            "family {id} still has {genus_count} genera"
        )));
    }
    sqlx::query("DELETE FROM family WHERE id = ?").bind(id).execute(pool).await?;
    Ok(())
}
