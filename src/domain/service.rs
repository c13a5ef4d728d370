//! Machine service
//!
//! The service sits between the HTTP gate and a [`MachineRepo`]. Lookups
//! that find nothing come back as [`Maybe::Absent`], never as errors; errors
//! are reserved for storage failures.

use crate::contracts::{CreateMachineCommand, Machine, UpdateMachineCommand};
use crate::maybe::{Maybe, lift};
use crate::provider::MachineRepo;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait MachineService: Send + Sync {
    /// Store a new machine under a freshly generated id
    async fn add_machine(&self, create: CreateMachineCommand) -> Result<Machine>;

    /// Patch an existing machine; absent when no machine has `update.id`
    async fn update_machine(&self, update: UpdateMachineCommand) -> Result<Maybe<Machine>>;

    async fn get_machine(&self, id: Uuid) -> Result<Maybe<Machine>>;

    async fn get_machines(&self) -> Result<Vec<Machine>>;
}

pub struct DefaultMachineService {
    repo: Arc<dyn MachineRepo>,
}

impl DefaultMachineService {
    pub fn new(repo: Arc<dyn MachineRepo>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl MachineService for DefaultMachineService {
    async fn add_machine(&self, create: CreateMachineCommand) -> Result<Machine> {
        let machine = Machine::from_create(Uuid::new_v4().to_string(), create);
        log::debug!("Adding machine {} ({})", machine.id, machine.machine_name);
        self.repo.add_machine(machine).await
    }

    async fn update_machine(&self, update: UpdateMachineCommand) -> Result<Maybe<Machine>> {
        let Maybe::Present(id) = lift(Uuid::parse_str(&update.id).ok()) else {
            log::warn!("Ignoring update for malformed machine id '{}'", update.id);
            return Ok(Maybe::Absent);
        };

        let existing = self
            .repo
            .get_machine(id)
            .await?
            .if_absent_do(|| log::info!("No machine to update with id {}", id));

        existing
            .map(|mut machine| {
                machine.patch(&update);
                machine
            })
            .map_async(|machine| self.repo.update_machine(machine))
            .await
            .transpose()
    }

    async fn get_machine(&self, id: Uuid) -> Result<Maybe<Machine>> {
        log::debug!("Looking up machine {}", id);
        self.repo.get_machine(id).await
    }

    async fn get_machines(&self) -> Result<Vec<Machine>> {
        let machines = self.repo.get_machines().await?;
        log::debug!("Listing {} machines", machines.len());
        Ok(machines)
    }
}
