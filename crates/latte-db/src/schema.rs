//! Idempotent schema bootstrap
//!
//! The three tables are independent; there are no foreign keys between them.
//! `CREATE TABLE IF NOT EXISTS` leaves an older table untouched, so the keys
//! the upserts rely on are checked after the DDL runs.

use latte_core::traits::RepoResult;
use latte_core::DomainError;
use sqlx::{PgConnection, PgPool};
use tracing::{error, info, instrument};

use crate::repositories::map_db_error;

/// DDL applied at startup, in order
pub const SCHEMA: &[&str] = &[
    r"
    CREATE TABLE IF NOT EXISTS riot_accounts (
        user_id     BIGINT PRIMARY KEY,
        guild_id    BIGINT,
        extras      BYTEA NOT NULL CHECK (octet_length(extras) <= 4096),
        date_signed TIMESTAMP NOT NULL,
        locale      VARCHAR(100) NOT NULL
    )
    ",
    r"
    CREATE INDEX IF NOT EXISTS idx_riot_accounts_guild_id ON riot_accounts (guild_id)
    ",
    r"
    CREATE TABLE IF NOT EXISTS blacklist (
        snowflake  BIGINT PRIMARY KEY,
        reason     TEXT,
        date_added TIMESTAMP NOT NULL
    )
    ",
    r"
    CREATE TABLE IF NOT EXISTS command_stats (
        name VARCHAR(100) NOT NULL,
        type VARCHAR(32) NOT NULL,
        uses BIGINT NOT NULL DEFAULT 0 CHECK (uses >= 0),
        PRIMARY KEY (name, type)
    )
    ",
];

/// Unique key each table must carry, columns sorted by name
pub const UNIQUE_KEYS: &[(&str, &[&str])] = &[
    ("riot_accounts", &["user_id"]),
    ("blacklist", &["snowflake"]),
    ("command_stats", &["name", "type"]),
];

/// Fail if a table lacks the unique key its `ON CONFLICT` clause targets
///
/// # Errors
/// Returns `DomainError::DatabaseError` naming the first table without it
#[instrument(skip(conn))]
pub async fn verify_unique_keys(conn: &mut PgConnection) -> RepoResult<()> {
    for (table, columns) in UNIQUE_KEYS {
        let present = sqlx::query_scalar::<_, bool>(
            r"
            SELECT EXISTS (
                SELECT 1
                FROM pg_index i
                WHERE i.indrelid = to_regclass($1::text)
                  AND i.indisunique
                  AND i.indpred IS NULL
                  AND (
                      SELECT array_agg(a.attname::text ORDER BY a.attname::text)
                      FROM pg_attribute a
                      WHERE a.attrelid = i.indrelid AND a.attnum = ANY(i.indkey)
                  ) = $2::text[]
            )
            ",
        )
        .bind(*table)
        .bind(*columns)
        .fetch_one(&mut *conn)
        .await
        .map_err(map_db_error)?;

        if !present {
            let key = columns.join(", ");
            error!(table, key = %key, "table is missing its unique key");
            return Err(DomainError::DatabaseError(format!(
                "table {table} has no unique key on ({key}); it was created by an older schema and must be migrated"
            )));
        }
    }
    Ok(())
}

/// Create tables and indexes that do not exist yet, then check their keys
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> RepoResult<()> {
    let mut tx = pool.begin().await.map_err(map_db_error)?;

    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
    }
    verify_unique_keys(&mut *tx).await?;

    tx.commit().await.map_err(map_db_error)?;

    info!(statements = SCHEMA.len(), "schema ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent_ddl() {
        for statement in SCHEMA {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "statement must be safe to re-run: {statement}"
            );
        }
    }

    #[test]
    fn test_user_id_is_primary_key() {
        assert!(SCHEMA[0].contains("user_id     BIGINT PRIMARY KEY"));
    }

    #[test]
    fn test_unique_keys_match_ddl() {
        for (table, columns) in UNIQUE_KEYS {
            let ddl = SCHEMA
                .iter()
                .find(|s| s.contains(&format!("CREATE TABLE IF NOT EXISTS {table} ")))
                .expect("table has DDL");
            for column in *columns {
                assert!(ddl.contains(column), "{table} DDL lacks {column}");
            }
            assert!(ddl.contains("PRIMARY KEY"), "{table} DDL lacks a primary key");

            let mut sorted = columns.to_vec();
            sorted.sort_unstable();
            assert_eq!(sorted, *columns, "{table} key columns must be sorted");
        }
    }
}
