//! Relational machine store on SQLite

use super::MachineRepo;
use crate::contracts::Machine;
use crate::maybe::{Maybe, lift};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

const SELECT_MACHINE: &str = r#"
    SELECT id, machine_name, manufacturing_year, serial_number, fabric_serial_number,
           internal_series_name, manufacturer_name, place_of_manufacturing
    FROM machines
"#;

const INSERT_MACHINE: &str = r#"
    INSERT INTO machines (
        id, machine_name, manufacturing_year, serial_number, fabric_serial_number,
        internal_series_name, manufacturer_name, place_of_manufacturing
    )
    VALUES (?, ?, ?, ?, ?, ?, ?, ?)
"#;

const UPSERT_CONFLICT: &str = r#"
    ON CONFLICT(id) DO UPDATE SET
        machine_name = excluded.machine_name,
        manufacturing_year = excluded.manufacturing_year,
        serial_number = excluded.serial_number,
        fabric_serial_number = excluded.fabric_serial_number,
        internal_series_name = excluded.internal_series_name,
        manufacturer_name = excluded.manufacturer_name,
        place_of_manufacturing = excluded.place_of_manufacturing,
        updated_at = CURRENT_TIMESTAMP
"#;

pub struct SqliteMachineRepo {
    pool: SqlitePool,
}

impl SqliteMachineRepo {
    /// Wrap an already migrated pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Migrate `pool` and wrap it
    pub async fn migrated(pool: SqlitePool) -> Result<Self> {
        crate::db::run_migrations(&pool).await?;
        Ok(Self::new(pool))
    }

    async fn write(&self, sql: &str, machine: &Machine) -> sqlx::Result<()> {
        sqlx::query(sql)
            .bind(&machine.id)
            .bind(&machine.machine_name)
            .bind(machine.manufacturing_year)
            .bind(&machine.serial_number)
            .bind(&machine.fabric_serial_number)
            .bind(&machine.internal_series_name)
            .bind(&machine.manufacturer_name)
            .bind(&machine.place_of_manufacturing)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

#[async_trait]
impl MachineRepo for SqliteMachineRepo {
    async fn add_machine(&self, machine: Machine) -> Result<Machine> {
        match self.write(INSERT_MACHINE, &machine).await {
            Ok(()) => {}
            Err(sqlx::Error::Database(err)) if err.is_unique_violation() => {
                anyhow::bail!("Machine '{}' already exists", machine.id);
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to add machine '{}'", machine.id));
            }
        }

        log::info!("Saved machine: {}", machine.id);
        Ok(machine)
    }

    async fn update_machine(&self, machine: Machine) -> Result<Machine> {
        self.write(&format!("{INSERT_MACHINE} {UPSERT_CONFLICT}"), &machine)
            .await
            .with_context(|| format!("Failed to save machine '{}'", machine.id))?;

        log::info!("Updated machine: {}", machine.id);
        Ok(machine)
    }

    async fn get_machine(&self, id: Uuid) -> Result<Maybe<Machine>> {
        let sql = format!("{SELECT_MACHINE} WHERE id = ?");
        let row: Option<Machine> = sqlx::query_as::<_, Machine>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to get machine '{}'", id))?;

        Ok(lift(row))
    }

    async fn get_machines(&self) -> Result<Vec<Machine>> {
        sqlx::query_as::<_, Machine>(&format!("{SELECT_MACHINE} ORDER BY machine_name, id"))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list machines")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::connect_memory;
    use chrono::{TimeZone, Utc};

    fn machine(id: &str, name: &str) -> Machine {
        Machine {
            id: id.to_string(),
            machine_name: name.to_string(),
            manufacturing_year: Utc.with_ymd_and_hms(2029, 1, 20, 0, 0, 0).unwrap(),
            serial_number: "01234".to_string(),
            fabric_serial_number: Some("1234ab".to_string()),
            internal_series_name: None,
            manufacturer_name: "Microsoft".to_string(),
            place_of_manufacturing: Some("Redmond".to_string()),
        }
    }

    async fn repo() -> SqliteMachineRepo {
        SqliteMachineRepo::migrated(connect_memory().await.unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let repo = repo().await;
        let id = Uuid::new_v4();
        repo.add_machine(machine(&id.to_string(), "A machine")).await.unwrap();

        let found = repo.get_machine(id).await.unwrap();
        assert_eq!(found.map(|m| m.machine_name), Maybe::Present("A machine".to_string()));
    }

    #[tokio::test]
    async fn test_get_missing_is_absent() {
        let repo = repo().await;
        assert!(repo.get_machine(Uuid::new_v4()).await.unwrap().is_absent());
        assert!(repo.get_machines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ids_match_case_insensitively() {
        let repo = repo().await;
        let id = "0BF5B011-909B-4CD5-B700-4EB1FFC7D436";
        repo.add_machine(machine(id, "Upper")).await.unwrap();

        let parsed = Uuid::parse_str(id).unwrap();
        assert!(repo.get_machine(parsed).await.unwrap().is_present());
    }

    #[tokio::test]
    async fn test_duplicate_add_fails() {
        let repo = repo().await;
        let id = Uuid::new_v4().to_string();
        repo.add_machine(machine(&id, "First")).await.unwrap();
        assert!(repo.add_machine(machine(&id, "Second")).await.is_err());
    }

    #[tokio::test]
    async fn test_update_replaces_row() {
        let repo = repo().await;
        let id = Uuid::new_v4();
        repo.add_machine(machine(&id.to_string(), "Old")).await.unwrap();

        let mut changed = machine(&id.to_string(), "New");
        changed.place_of_manufacturing = None;
        repo.update_machine(changed.clone()).await.unwrap();

        let stored = repo.get_machine(id).await.unwrap().reduce_with(|| panic!("missing"));
        assert_eq!(stored, changed);
        assert_eq!(repo.get_machines().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_with_same_id_keep_first_writer() {
        let repo = repo().await;
        let id = Uuid::new_v4();

        let (first, second) = tokio::join!(
            repo.add_machine(machine(&id.to_string(), "First")),
            repo.add_machine(machine(&id.to_string(), "Second")),
        );
        assert_eq!(first.is_ok() as u8 + second.is_ok() as u8, 1);

        let winner = if first.is_ok() { "First" } else { "Second" };
        let stored = repo.get_machine(id).await.unwrap().reduce_with(|| panic!("missing"));
        assert_eq!(stored.machine_name, winner);
    }

    #[tokio::test]
    async fn test_duplicate_add_reports_existing_id() {
        let repo = repo().await;
        let id = "0BF5B011-909B-4CD5-B700-4EB1FFC7D436";
        repo.add_machine(machine(id, "First")).await.unwrap();

        let err = repo
            .add_machine(machine(&id.to_lowercase(), "Second"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));
    }
}
