//! Document machine store
//!
//! Machines are kept as JSON documents in a [`DocumentContainer`], keyed by
//! their lowercased id. A container may be backed by a single JSON file that
//! is rewritten after every write.

use super::MachineRepo;
use crate::contracts::Machine;
use crate::maybe::{Maybe, lift};
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A keyed collection of JSON documents
pub struct DocumentContainer {
    documents: RwLock<BTreeMap<String, Value>>,
    path: Option<PathBuf>,
}

impl DocumentContainer {
    pub fn in_memory() -> Self {
        Self {
            documents: RwLock::new(BTreeMap::new()),
            path: None,
        }
    }

    /// Open a file-backed container, starting empty when the file is missing
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        let documents = if tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check document file: {}", path.display()))?
        {
            let content = tokio::fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read document file: {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse document file: {}", path.display()))?
        } else {
            info!("Document file doesn't exist, starting empty: {}", path.display());
            BTreeMap::new()
        };

        Ok(Self {
            documents: RwLock::new(documents),
            path: Some(path),
        })
    }

    fn key(id: &str) -> String {
        id.to_lowercase()
    }

    /// Insert a new document; fails if the id is taken
    pub async fn create_item<T: Serialize>(&self, id: &str, item: &T) -> Result<()> {
        let mut documents = self.documents.write().await;
        let key = Self::key(id);
        if documents.contains_key(&key) {
            anyhow::bail!("Document '{}' already exists", id);
        }

        let value = serde_json::to_value(item).context("Failed to serialize document")?;
        self.commit(&mut documents, key, value).await
    }

    /// Insert or replace a document
    pub async fn upsert_item<T: Serialize>(&self, id: &str, item: &T) -> Result<()> {
        let mut documents = self.documents.write().await;
        let value = serde_json::to_value(item).context("Failed to serialize document")?;
        self.commit(&mut documents, Self::key(id), value).await
    }

    /// Store `value` under `key` and flush; a failed flush leaves the map as it was
    async fn commit(
        &self,
        documents: &mut BTreeMap<String, Value>,
        key: String,
        value: Value,
    ) -> Result<()> {
        let previous = documents.insert(key.clone(), value);

        if let Err(err) = self.flush(documents).await {
            match previous {
                Some(old) => documents.insert(key, old),
                None => documents.remove(&key),
            };
            return Err(err);
        }

        Ok(())
    }

    pub async fn read_item<T: DeserializeOwned>(&self, id: &str) -> Result<Maybe<T>> {
        let documents = self.documents.read().await;
        let found = documents
            .get(&Self::key(id))
            .map(|value| serde_json::from_value(value.clone()))
            .transpose()
            .with_context(|| format!("Failed to deserialize document '{}'", id))?;

        Ok(lift(found))
    }

    pub async fn read_all<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        let documents = self.documents.read().await;
        documents
            .values()
            .map(|value| {
                serde_json::from_value(value.clone()).context("Failed to deserialize document")
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    async fn flush(&self, documents: &BTreeMap<String, Value>) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create document directory: {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(documents).context("Failed to serialize documents")?;

        // Replace atomically via a sibling temp file
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("Failed to write document file: {}", tmp.display()))?;
        tokio::fs::rename(&tmp, path)
            .await
            .with_context(|| format!("Failed to replace document file: {}", path.display()))?;

        debug!("Flushed {} documents to {}", documents.len(), path.display());
        Ok(())
    }
}

pub struct DocumentMachineRepo {
    container: DocumentContainer,
}

impl DocumentMachineRepo {
    pub fn new(container: DocumentContainer) -> Self {
        Self { container }
    }

    pub fn in_memory() -> Self {
        Self::new(DocumentContainer::in_memory())
    }

    pub fn container(&self) -> &DocumentContainer {
        &self.container
    }
}

#[async_trait]
impl MachineRepo for DocumentMachineRepo {
    async fn add_machine(&self, mut machine: Machine) -> Result<Machine> {
        if machine.id.trim().is_empty() {
            machine.id = Uuid::new_v4().to_string();
        }

        self.container.create_item(&machine.id, &machine).await?;
        info!("Created machine document: {}", machine.id);
        Ok(machine)
    }

    async fn update_machine(&self, machine: Machine) -> Result<Machine> {
        self.container.upsert_item(&machine.id, &machine).await?;
        info!("Upserted machine document: {}", machine.id);
        Ok(machine)
    }

    async fn get_machine(&self, id: Uuid) -> Result<Maybe<Machine>> {
        self.container.read_item(&id.to_string()).await
    }

    async fn get_machines(&self) -> Result<Vec<Machine>> {
        let mut machines: Vec<Machine> = self.container.read_all().await?;
        machines.sort_by_cached_key(|m| (m.machine_name.clone(), m.id.to_lowercase()));
        Ok(machines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn machine(id: &str) -> Machine {
        Machine {
            id: id.to_string(),
            machine_name: "Another machine".to_string(),
            manufacturing_year: Utc.with_ymd_and_hms(2029, 1, 21, 0, 0, 0).unwrap(),
            serial_number: "567890".to_string(),
            fabric_serial_number: Some("5678".to_string()),
            internal_series_name: Some("internal5678".to_string()),
            manufacturer_name: "Microsoft".to_string(),
            place_of_manufacturing: None,
        }
    }

    #[tokio::test]
    async fn test_add_assigns_id_when_blank() {
        let repo = DocumentMachineRepo::in_memory();
        let stored = repo.add_machine(machine("")).await.unwrap();

        let id = Uuid::parse_str(&stored.id).unwrap();
        assert_eq!(repo.get_machine(id).await.unwrap(), Maybe::Present(stored));
    }

    #[tokio::test]
    async fn test_lookup_is_case_insensitive() {
        let repo = DocumentMachineRepo::in_memory();
        let id = "5AEF4BE9-793B-4ED5-90BD-94B3E478C2A0";
        repo.add_machine(machine(id)).await.unwrap();

        let found = repo.get_machine(Uuid::parse_str(id).unwrap()).await.unwrap();
        assert!(found.is_present());
        assert!(repo.add_machine(machine(&id.to_lowercase())).await.is_err());
    }

    #[tokio::test]
    async fn test_missing_document_is_absent() {
        let repo = DocumentMachineRepo::in_memory();
        assert!(repo.get_machine(Uuid::new_v4()).await.unwrap().is_absent());
        assert!(repo.get_machines().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_container_survives_reopen() {
        let path = temp_documents_path();

        let id = Uuid::new_v4();
        {
            let repo = DocumentMachineRepo::new(DocumentContainer::open(&path).await.unwrap());
            repo.add_machine(machine(&id.to_string())).await.unwrap();
        }

        let reopened = DocumentMachineRepo::new(DocumentContainer::open(&path).await.unwrap());
        assert_eq!(reopened.container().len().await, 1);
        assert!(reopened.get_machine(id).await.unwrap().is_present());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    fn temp_documents_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("machine-api-test-{}", Uuid::new_v4()))
            .join("machines.json")
    }

    #[tokio::test]
    async fn test_failed_create_leaves_no_document() {
        let path = temp_documents_path();
        let container = DocumentContainer::open(&path).await.unwrap();

        // A directory at the target path makes the final rename fail
        std::fs::create_dir_all(&path).unwrap();
        assert!(container.create_item("abc", &machine("abc")).await.is_err());

        let found: Maybe<Machine> = container.read_item("abc").await.unwrap();
        assert!(found.is_absent());
        assert_eq!(container.len().await, 0);

        std::fs::remove_dir_all(&path).unwrap();
        container.create_item("abc", &machine("abc")).await.unwrap();
        assert_eq!(container.len().await, 1);

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_failed_upsert_restores_previous_document() {
        let path = temp_documents_path();
        let container = DocumentContainer::open(&path).await.unwrap();
        container.create_item("abc", &machine("abc")).await.unwrap();

        std::fs::remove_file(&path).unwrap();
        std::fs::create_dir_all(&path).unwrap();

        let mut changed = machine("abc");
        changed.machine_name = "Changed".to_string();
        assert!(container.upsert_item("abc", &changed).await.is_err());

        let stored: Machine = container
            .read_item("abc")
            .await
            .unwrap()
            .reduce_with(|| panic!("missing"));
        assert_eq!(stored.machine_name, "Another machine");

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[tokio::test]
    async fn test_list_is_ordered_by_name_then_id() {
        let repo = DocumentMachineRepo::in_memory();
        for (id, name) in [("c", "Beta"), ("b", "Alpha"), ("A", "Beta")] {
            let mut m = machine(id);
            m.machine_name = name.to_string();
            repo.add_machine(m).await.unwrap();
        }

        let order: Vec<String> = repo
            .get_machines()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(order, vec!["b", "A", "c"]);
    }
}
