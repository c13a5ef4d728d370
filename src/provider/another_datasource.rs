//! HTTP-backed secondary data source

use super::AnotherDatasource;
use crate::contracts::SomeData;
use crate::tech::HttpClientBase;
use anyhow::{Context, Result};
use async_trait::async_trait;

const SOME_DATA_ENDPOINT: &str = "myendpoint";

/// Fetches [`SomeData`] from another service and maps it into our contract
pub struct AnotherDatasourceHttpClient {
    http: HttpClientBase,
}

impl AnotherDatasourceHttpClient {
    pub fn new(http: HttpClientBase) -> Self {
        Self { http }
    }

    pub fn from_base_url(base_url: &str) -> Result<Self> {
        Ok(Self::new(HttpClientBase::new(base_url)?))
    }
}

#[async_trait]
impl AnotherDatasource for AnotherDatasourceHttpClient {
    async fn get_some_data(&self) -> Result<SomeData> {
        let my_property: String = self
            .http
            .get_json(SOME_DATA_ENDPOINT)
            .await
            .context("Failed to fetch data from another datasource")?;

        Ok(SomeData { my_property })
    }
}
