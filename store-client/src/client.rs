//! Shared handle to the remote table store.
//!
//! # Design
//! `StoreClient` is built once per process and cloned into whoever needs it;
//! clones share the endpoint and the connection pool through an `Arc`. Nothing
//! about it can be changed after construction. `Table` binds the client to one
//! table name and exposes the five primitives as async methods that compose
//! `build_*` → `Transport::execute` → `parse_rows`.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::instrument;

use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::rest::{parse_rows, Endpoint, Filter};
use crate::transport::Transport;

#[derive(Debug, Clone)]
pub struct StoreClient {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    endpoint: Endpoint,
    transport: Transport,
}

impl StoreClient {
    /// Validate the configuration and open the connection pool.
    ///
    /// Fails with `StoreError::Config` when the URL or key is blank.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let endpoint = Endpoint::new(config)?;
        let transport = Transport::new(config.timeout_secs.map(Duration::from_secs))?;
        tracing::info!(rest_url = endpoint.rest_url(), "store client initialized");
        Ok(Self {
            inner: Arc::new(Inner { endpoint, transport }),
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.inner.endpoint
    }

    pub fn from_table(&self, name: impl Into<String>) -> Table {
        Table {
            client: self.clone(),
            name: name.into(),
        }
    }
}

/// Typed operations against one remote table.
#[derive(Debug, Clone)]
pub struct Table {
    client: StoreClient,
    name: String,
}

impl Table {
    pub fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip_all, fields(table = %self.name))]
    pub async fn get_all<T: DeserializeOwned>(&self) -> Result<Vec<T>, StoreError> {
        let request = self.endpoint().build_select(&self.name, None);
        parse_rows(self.transport().execute(request).await?)
    }

    #[instrument(skip_all, fields(table = %self.name, filter = ?filter))]
    pub async fn get_filtered<T: DeserializeOwned>(
        &self,
        filter: &Filter,
    ) -> Result<Vec<T>, StoreError> {
        let request = self.endpoint().build_select(&self.name, Some(filter));
        parse_rows(self.transport().execute(request).await?)
    }

    /// Insert one row and return the rows the store reports as created.
    #[instrument(skip_all, fields(table = %self.name))]
    pub async fn insert<R, T>(&self, row: &R) -> Result<Vec<T>, StoreError>
    where
        R: Serialize,
        T: DeserializeOwned,
    {
        let request = self.endpoint().build_insert(&self.name, row)?;
        parse_rows(self.transport().execute(request).await?)
    }

    /// Apply `changes` to every row matching `filter`; returns the updated rows.
    #[instrument(skip_all, fields(table = %self.name, filter = ?filter))]
    pub async fn update<R, T>(&self, filter: &Filter, changes: &R) -> Result<Vec<T>, StoreError>
    where
        R: Serialize,
        T: DeserializeOwned,
    {
        let request = self.endpoint().build_update(&self.name, filter, changes)?;
        parse_rows(self.transport().execute(request).await?)
    }

    /// Delete every row matching `filter`; returns the removed rows.
    #[instrument(skip_all, fields(table = %self.name, filter = ?filter))]
    pub async fn delete<T: DeserializeOwned>(&self, filter: &Filter) -> Result<Vec<T>, StoreError> {
        let request = self.endpoint().build_delete(&self.name, filter);
        parse_rows(self.transport().execute(request).await?)
    }

    fn endpoint(&self) -> &Endpoint {
        &self.client.inner.endpoint
    }

    fn transport(&self) -> &Transport {
        &self.client.inner.transport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_blank_url() {
        let err = StoreClient::new(&StoreConfig::new("", "key")).unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
    }

    #[test]
    fn clones_share_the_same_connection() {
        let client = StoreClient::new(&StoreConfig::new("http://localhost:54321", "key")).unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(&client.inner, &clone.inner));
    }

    #[test]
    fn from_table_binds_name() {
        let client = StoreClient::new(&StoreConfig::new("http://localhost:54321", "key")).unwrap();
        let table = client.from_table("todos");
        assert_eq!(table.name(), "todos");
        assert!(Arc::ptr_eq(&table.client.inner, &client.inner));
    }
}
