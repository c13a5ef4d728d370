//! Wire contracts for the machine API
//!
//! All payloads use camelCase JSON keys.

use crate::maybe::Maybe;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub machine_name: String,
    pub manufacturing_year: DateTime<Utc>,
    pub serial_number: String,
    #[serde(default)]
    pub fabric_serial_number: Option<String>,
    #[serde(default)]
    pub internal_series_name: Option<String>,
    pub manufacturer_name: String,
    #[serde(default)]
    pub place_of_manufacturing: Option<String>,
}

/// Data needed to create a machine; the id is assigned on creation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMachineCommand {
    pub machine_name: String,
    pub manufacturing_year: DateTime<Utc>,
    pub serial_number: String,
    #[serde(default)]
    pub fabric_serial_number: Option<String>,
    #[serde(default)]
    pub internal_series_name: Option<String>,
    pub manufacturer_name: String,
    #[serde(default)]
    pub place_of_manufacturing: Option<String>,
}

/// Partial update of an existing machine; absent fields are left untouched
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMachineCommand {
    pub id: String,
    #[serde(default)]
    pub machine_name: Maybe<String>,
    #[serde(default)]
    pub manufacturing_year: Maybe<DateTime<Utc>>,
    #[serde(default)]
    pub serial_number: Maybe<String>,
    #[serde(default)]
    pub fabric_serial_number: Maybe<String>,
    #[serde(default)]
    pub internal_series_name: Maybe<String>,
    #[serde(default)]
    pub manufacturer_name: Maybe<String>,
    #[serde(default)]
    pub place_of_manufacturing: Maybe<String>,
}

impl UpdateMachineCommand {
    /// An update that changes nothing on machine `id`
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }
}

/// Payload served by the secondary data source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SomeData {
    pub my_property: String,
}
