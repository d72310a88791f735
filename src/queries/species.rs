//! `species` table CRUD.

use crate::error::{BotanicError, Result};
use crate::history::recompute_before_commit;
use crate::types::enums::{Cites, Hybrid, InfraspRank, RedList, SpeciesQualifier, TrademarkSymbol};
use crate::types::species::{InfraspSlot, Species, SpeciesFields, SpeciesId};
use sqlx::{Row, SqlitePool};

fn slot(rank: Option<String>, epithet: Option<String>, author: Option<String>) -> Result<InfraspSlot> {
    Ok(InfraspSlot {
        rank: rank.map(|r| InfraspRank::parse(&r)).transpose()?.unwrap_or_default(),
        epithet: epithet.unwrap_or_default(),
        author,
    })
}

async fn genus_epithet(pool: &SqlitePool, genus_id: i64) -> Result<String> {
    sqlx::query_scalar("SELECT epithet FROM genus WHERE id = ?")
        .bind(genus_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| BotanicError::validation(format!("no genus with id {genus_id}")))
}

fn row_to_species(row: &sqlx::sqlite::SqliteRow, genus_epithet: String) -> Result<Species> {
    let hybrid: String = row.get("hybrid");
    let sp_qual: Option<String> = row.get("sp_qual");
    let trademark_symbol: String = row.get("trademark_symbol");
    let cites: Option<String> = row.get("cites");
    let red_list: Option<String> = row.get("red_list");

    Ok(Species {
        id: row.get("id"),
        genus_id: row.get("genus_id"),
        genus_epithet,
        hybrid: Hybrid::parse(&hybrid)?,
        epithet: row.get("epithet"),
        author: row.get("author"),
        sp_qual: sp_qual.map(|s| SpeciesQualifier::parse(&s)).transpose()?,
        infrasp1: slot(row.get("infrasp1_rank"), row.get("infrasp1_epithet"), row.get("infrasp1_author"))?,
        infrasp2: slot(row.get("infrasp2_rank"), row.get("infrasp2_epithet"), row.get("infrasp2_author"))?,
        infrasp3: slot(row.get("infrasp3_rank"), row.get("infrasp3_epithet"), row.get("infrasp3_author"))?,
        infrasp4: slot(row.get("infrasp4_rank"), row.get("infrasp4_epithet"), row.get("infrasp4_author"))?,
        grex: row.get("grex"),
        cv_group: row.get("cv_group"),
        cultivar_epithet: row.get("cultivar_epithet"),
        pbr_name: row.get::<i64, _>("pbr_name") != 0,
        trade_name: row.get("trade_name"),
        trademark_symbol: TrademarkSymbol::parse(&trademark_symbol)?,
        cites: cites.map(|c| Cites::parse(&c)).transpose()?,
        red_list: red_list.map(|r| RedList::parse(&r)).transpose()?,
        label_distribution: row.get("label_distribution"),
        habit_id: row.get("habit_id"),
        flower_color_id: row.get("flower_color_id"),
        notes: Vec::new(),
        pictures: Vec::new(),
        full_name: row.get("full_name"),
        full_sci_name: row.get("full_sci_name"),
    })
}

pub async fn insert(pool: &SqlitePool, mut fields: SpeciesFields) -> Result<Species> {
    fields.genus_epithet = genus_epithet(pool, fields.genus_id).await?;
    let mut species = Species::create(fields)?;
    recompute_before_commit(&mut species);

    let result = sqlx::query(
        "INSERT INTO species (
            genus_id, hybrid, epithet, author, sp_qual,
            infrasp1_rank, infrasp1_epithet, infrasp1_author,
            infrasp2_rank, infrasp2_epithet, infrasp2_author,
            infrasp3_rank, infrasp3_epithet, infrasp3_author,
            infrasp4_rank, infrasp4_epithet, infrasp4_author,
            grex, cv_group, cultivar_epithet, pbr_name, trade_name, trademark_symbol,
            cites, red_list, label_distribution, habit_id, flower_color_id, full_name, full_sci_name
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(species.genus_id)
    .bind(species.hybrid.as_str())
    .bind(&species.epithet)
    .bind(&species.author)
    .bind(species.sp_qual.map(|q| q.as_str().to_string()))
    .bind(optional_rank(&species.infrasp1))
    .bind(optional_epithet(&species.infrasp1))
    .bind(species.infrasp1.author.clone())
    .bind(optional_rank(&species.infrasp2))
    .bind(optional_epithet(&species.infrasp2))
    .bind(species.infrasp2.author.clone())
    .bind(optional_rank(&species.infrasp3))
    .bind(optional_epithet(&species.infrasp3))
    .bind(species.infrasp3.author.clone())
    .bind(optional_rank(&species.infrasp4))
    .bind(optional_epithet(&species.infrasp4))
    .bind(species.infrasp4.author.clone())
    .bind(&species.grex)
    .bind(&species.cv_group)
    .bind(&species.cultivar_epithet)
    .bind(species.pbr_name as i64)
    .bind(&species.trade_name)
    .bind(species.trademark_symbol.as_str())
    .bind(species.cites.map(|c| c.as_str().to_string()))
    .bind(species.red_list.map(|r| r.as_str().to_string()))
    .bind(&species.label_distribution)
    .bind(species.habit_id)
    .bind(species.flower_color_id)
    .bind(&species.full_name)
    .bind(&species.full_sci_name)
    .execute(pool)
    .await?;

    Ok(Species { id: result.last_insert_rowid(), ..species })
}

fn optional_rank(slot: &InfraspSlot) -> Option<String> {
    if slot.epithet.is_empty() {
        None
    } else {
        Some(slot.rank.as_str().to_string())
    }
}

fn optional_epithet(slot: &InfraspSlot) -> Option<String> {
    if slot.epithet.is_empty() {
        None
    } else {
        Some(slot.epithet.clone())
    }
}

pub async fn get(pool: &SqlitePool, id: SpeciesId) -> Result<Species> {
    let row = sqlx::query(
        "SELECT id, genus_id, hybrid, epithet, author, sp_qual,
                infrasp1_rank, infrasp1_epithet, infrasp1_author,
                infrasp2_rank, infrasp2_epithet, infrasp2_author,
                infrasp3_rank, infrasp3_epithet, infrasp3_author,
                infrasp4_rank, infrasp4_epithet, infrasp4_author,
                grex, cv_group, cultivar_epithet, pbr_name, trade_name, trademark_symbol,
                cites, red_list, label_distribution, habit_id, flower_color_id, full_name, full_sci_name
         FROM species WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| BotanicError::validation(format!("no species with id {id}")))?;

    let genus_id: i64 = row.get("genus_id");
    let epithet = genus_epithet(pool, genus_id).await?;
    row_to_species(&row, epithet)
}

pub async fn update(pool: &SqlitePool, id: SpeciesId, mut patch: SpeciesFields) -> Result<Species> {
    let existing = get(pool, id).await?;
    patch.genus_epithet = genus_epithet(pool, patch.genus_id).await?;
    let mut updated = existing.update(patch)?;
    recompute_before_commit(&mut updated);

    sqlx::query(
        "UPDATE species SET genus_id = ?, hybrid = ?, epithet = ?, author = ?, sp_qual = ?,
            infrasp1_rank = ?, infrasp1_epithet = ?, infrasp1_author = ?,
            infrasp2_rank = ?, infrasp2_epithet = ?, infrasp2_author = ?,
            infrasp3_rank = ?, infrasp3_epithet = ?, infrasp3_author = ?,
            infrasp4_rank = ?, infrasp4_epithet = ?, infrasp4_author = ?,
            grex = ?, cv_group = ?, cultivar_epithet = ?, pbr_name = ?, trade_name = ?,
            trademark_symbol = ?, cites = ?, red_list = ?, label_distribution = ?,
            habit_id = ?, flower_color_id = ?, full_name = ?, full_sci_name = ?
         WHERE id = ?",
    )
    .bind(updated.genus_id)
    .bind(updated.hybrid.as_str())
    .bind(&updated.epithet)
    .bind(&updated.author)
    .bind(updated.sp_qual.map(|q| q.as_str().to_string()))
    .bind(optional_rank(&updated.infrasp1))
    .bind(optional_epithet(&updated.infrasp1))
    .bind(updated.infrasp1.author.clone())
    .bind(optional_rank(&updated.infrasp2))
    .bind(optional_epithet(&updated.infrasp2))
    .bind(updated.infrasp2.author.clone())
    .bind(optional_rank(&updated.infrasp3))
    .bind(optional_epithet(&updated.infrasp3))
    .bind(updated.infrasp3.author.clone())
    .bind(optional_rank(&updated.infrasp4))
    .bind(optional_epithet(&updated.infrasp4))
    .bind(updated.infrasp4.author.clone())
    .bind(&updated.grex)
    .bind(&updated.cv_group)
    .bind(&updated.cultivar_epithet)
    .bind(updated.pbr_name as i64)
    .bind(&updated.trade_name)
    .bind(updated.trademark_symbol.as_str())
    .bind(updated.cites.map(|c| c.as_str().to_string()))
    .bind(updated.red_list.map(|r| r.as_str().to_string()))
    .bind(&updated.label_distribution)
    .bind(updated.habit_id)
    .bind(updated.flower_color_id)
    .bind(&updated.full_name)
    .bind(&updated.full_sci_name)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(updated)
}

/// Delete a species, refusing if it still owns accessions (invariant 6).
pub async fn delete(pool: &SqlitePool, id: SpeciesId) -> Result<()> {
    let accession_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM accession WHERE species_id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap_or(0);
    if accession_count > 0 {
        return Err(BotanicError::in_use(format!(
            "species {id} still has {accession_count} accessions"
        )));
    }
    sqlx::query("DELETE FROM species WHERE id = ?").bind(id).execute(pool).await?;
    Ok(())
}
