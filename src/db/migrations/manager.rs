//! Runs migrations up and down

use anyhow::{Context, Result};
use log::{debug, info, warn};
use sqlx::SqlitePool;

use super::{
    AppliedMigration, Direction, Migration, calculate_checksum, get_applied_migrations,
    get_current_version, get_pending_migrations, init_migration_table, load_migrations,
    validate_migrations,
};

pub struct MigrationManager<'a> {
    pool: &'a SqlitePool,
}

impl<'a> MigrationManager<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn init(&self) -> Result<()> {
        debug!("Initializing migration system");
        init_migration_table(self.pool).await
    }

    /// Run all pending migrations
    pub async fn migrate_up(&self) -> Result<()> {
        self.init().await?;
        validate_migrations(self.pool).await?;

        let pending = get_pending_migrations(self.pool).await?;
        if pending.is_empty() {
            debug!("No pending migrations");
            return Ok(());
        }

        info!("Running {} pending migrations", pending.len());
        for migration in pending {
            self.apply_migration(&migration, Direction::Up).await?;
        }

        Ok(())
    }

    /// Roll back to `target_version`, or all the way down if `None`
    pub async fn migrate_down(&self, target_version: Option<i64>) -> Result<()> {
        self.init().await?;
        validate_migrations(self.pool).await?;

        let target = target_version.unwrap_or(0);
        let current = get_current_version(self.pool).await?.unwrap_or(0);
        if target >= current {
            info!("Already at or below target version {}", target);
            return Ok(());
        }

        let available = load_migrations()?;
        let mut to_rollback = Vec::new();
        for applied in get_applied_migrations(self.pool).await?.into_iter().rev() {
            if applied.version <= target {
                continue;
            }
            match available.get(&applied.version) {
                Some(migration) => to_rollback.push(migration.clone()),
                None => anyhow::bail!(
                    "Cannot rollback migration {} - migration not found",
                    applied.version
                ),
            }
        }

        info!("Rolling back {} migrations to version {}", to_rollback.len(), target);
        for migration in to_rollback {
            self.apply_migration(&migration, Direction::Down).await?;
        }

        Ok(())
    }

    async fn apply_migration(&self, migration: &Migration, direction: Direction) -> Result<()> {
        let sql = match direction {
            Direction::Up => &migration.up_sql,
            Direction::Down => &migration.down_sql,
        };

        if sql.trim().is_empty() {
            warn!(
                "Migration {} has empty {} SQL, skipping",
                migration.version,
                direction.label()
            );
            return Ok(());
        }

        info!(
            "Migration {} '{}' ({})",
            migration.version,
            migration.name,
            direction.label()
        );
        debug!("Executing SQL:\n{}", sql);

        let mut tx = self
            .pool
            .begin()
            .await
            .context("Failed to start migration transaction")?;

        sqlx::query(sql)
            .execute(&mut *tx)
            .await
            .with_context(|| {
                format!(
                    "Failed to execute migration {} {} SQL",
                    migration.version,
                    direction.label()
                )
            })?;

        match direction {
            Direction::Up => {
                sqlx::query(
                    "INSERT INTO schema_migrations (version, name, checksum) VALUES (?, ?, ?)",
                )
                .bind(migration.version)
                .bind(&migration.name)
                .bind(calculate_checksum(&migration.up_sql))
                .execute(&mut *tx)
                .await
                .context("Failed to record migration")?;
            }
            Direction::Down => {
                sqlx::query("DELETE FROM schema_migrations WHERE version = ?")
                    .bind(migration.version)
                    .execute(&mut *tx)
                    .await
                    .context("Failed to remove migration record")?;
            }
        }

        tx.commit()
            .await
            .context("Failed to commit migration transaction")?;

        Ok(())
    }

    pub async fn status(&self) -> Result<MigrationStatus> {
        self.init().await?;

        Ok(MigrationStatus {
            current_version: get_current_version(self.pool).await?,
            total_available: load_migrations()?.len(),
            applied_migrations: get_applied_migrations(self.pool).await?,
            pending_migrations: get_pending_migrations(self.pool).await?,
        })
    }
}

#[derive(Debug)]
pub struct MigrationStatus {
    pub current_version: Option<i64>,
    pub total_available: usize,
    pub applied_migrations: Vec<AppliedMigration>,
    pub pending_migrations: Vec<Migration>,
}

impl MigrationStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.pending_migrations.is_empty()
    }
}
