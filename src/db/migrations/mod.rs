//! Versioned schema migrations for the relational machine store

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::collections::{BTreeMap, HashSet};

pub mod manager;

pub use manager::{MigrationManager, MigrationStatus};

/// A single migration with up and down SQL
#[derive(Debug, Clone)]
pub struct Migration {
    pub version: i64,
    pub name: String,
    pub up_sql: String,
    pub down_sql: String,
}

/// A migration recorded in `schema_migrations`
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AppliedMigration {
    pub version: i64,
    pub name: String,
    pub applied_at: String,
    pub checksum: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// All migrations shipped with the binary, keyed by version
pub fn load_migrations() -> Result<BTreeMap<i64, Migration>> {
    let mut migrations = BTreeMap::new();

    migrations.insert(1, Migration {
        version: 1,
        name: "machines".to_string(),
        up_sql: include_str!("files/001_machines/up.sql").to_string(),
        down_sql: include_str!("files/001_machines/down.sql").to_string(),
    });

    migrations.insert(2, Migration {
        version: 2,
        name: "indexes".to_string(),
        up_sql: include_str!("files/002_indexes/up.sql").to_string(),
        down_sql: include_str!("files/002_indexes/down.sql").to_string(),
    });

    Ok(migrations)
}

pub async fn init_migration_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            checksum TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .context("Failed to create schema_migrations table")?;

    Ok(())
}

pub async fn get_applied_migrations(pool: &SqlitePool) -> Result<Vec<AppliedMigration>> {
    let migrations = sqlx::query_as::<_, AppliedMigration>(
        "SELECT version, name, applied_at, checksum FROM schema_migrations ORDER BY version",
    )
    .fetch_all(pool)
    .await
    .context("Failed to get applied migrations")?;

    Ok(migrations)
}

/// Checksum of migration SQL, stable within a build
///
/// Line endings are normalized to LF first, so a CRLF checkout hashes the same.
pub fn calculate_checksum(sql: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let normalized = sql.replace("\r\n", "\n").replace('\r', "\n");

    let mut hasher = DefaultHasher::new();
    normalized.hash(&mut hasher);
    format!("{:x}", hasher.finish())
}

/// Fail when an applied migration was edited or removed afterwards
pub async fn validate_migrations(pool: &SqlitePool) -> Result<()> {
    let available = load_migrations()?;
    let applied = get_applied_migrations(pool).await?;

    for applied_migration in applied {
        let Some(available_migration) = available.get(&applied_migration.version) else {
            anyhow::bail!(
                "Applied migration {} '{}' not found in available migrations",
                applied_migration.version,
                applied_migration.name
            );
        };

        let expected_checksum = calculate_checksum(&available_migration.up_sql);
        if applied_migration.checksum != expected_checksum {
            anyhow::bail!(
                "Migration {} checksum mismatch! Applied: {}, Expected: {}",
                applied_migration.version,
                applied_migration.checksum,
                expected_checksum
            );
        }
    }

    Ok(())
}

/// Available migrations not yet applied, in version order
pub async fn get_pending_migrations(pool: &SqlitePool) -> Result<Vec<Migration>> {
    let available = load_migrations()?;
    let applied_versions: HashSet<i64> = get_applied_migrations(pool)
        .await?
        .into_iter()
        .map(|m| m.version)
        .collect();

    Ok(available
        .into_values()
        .filter(|migration| !applied_versions.contains(&migration.version))
        .collect())
}

/// Highest applied migration, if any
pub async fn get_current_version(pool: &SqlitePool) -> Result<Option<i64>> {
    let version: Option<i64> = sqlx::query_scalar("SELECT MAX(version) FROM schema_migrations")
        .fetch_one(pool)
        .await
        .context("Failed to get current schema version")?;

    Ok(version.filter(|v| *v > 0))
}
