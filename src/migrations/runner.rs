use crate::error::Result;
use sqlx::SqlitePool;

/// Schema version this crate's `SCHEMA` string implements. Bumped
/// whenever a table or column is added or changed.
pub const SCHEMA_VERSION: &str = "1.0.0";

pub async fn check_schema_version(pool: &SqlitePool) -> Result<String> {
    sqlx::query_scalar::<_, i64>("SELECT 1 FROM family LIMIT 0")
        .fetch_optional(pool)
        .await?;
    Ok(SCHEMA_VERSION.to_string())
}
