//! In-memory store used for dry runs and tests.

use crate::store::{ContainerStore, StoreError};
use async_trait::async_trait;
use loader_core::{Batch, ContainerSchema, Row};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// A call received by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    ContainerExists(String),
    CreateContainer(String),
    DropContainer(String),
    /// Row count per container, in container name order
    WriteBatch(Vec<(String, usize)>),
    Close,
}

/// Where a [`MemoryStore`] should fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Exists,
    Create,
    Drop,
    /// The n-th `write_batch` call, counting from 1
    Write(usize),
    Close,
}

/// A container held by a [`MemoryStore`].
#[derive(Debug, Clone, PartialEq)]
pub struct StoredContainer {
    pub schema: ContainerSchema,
    pub rows: Vec<Row>,
}

#[derive(Debug, Default)]
struct State {
    containers: BTreeMap<String, StoredContainer>,
    calls: Vec<StoreCall>,
    writes: usize,
    closes: usize,
}

fn injected(fail_point: Option<FailPoint>, point: FailPoint) -> Result<(), StoreError> {
    if fail_point == Some(point) {
        return Err(StoreError::Rejected {
            status: 500,
            message: format!("injected failure at {point:?}"),
        });
    }
    Ok(())
}

/// A store that keeps containers in memory and records every call.
///
/// Clones share containers and the call log, so a test can keep one handle
/// while the pipeline consumes another.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
    fail_point: Option<FailPoint>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `Rejected { status: 500 }` at the given point.
    pub fn failing_on(mut self, point: FailPoint) -> Self {
        self.fail_point = Some(point);
        self
    }

    fn check(&self, state: &State, point: FailPoint) -> Result<(), StoreError> {
        if state.closes > 0 {
            return Err(StoreError::Closed);
        }
        injected(self.fail_point, point)
    }

    /// Seed a container, e.g. a stale one left by a previous run.
    pub async fn insert_container(
        &self,
        name: impl Into<String>,
        schema: ContainerSchema,
        rows: Vec<Row>,
    ) {
        let mut state = self.state.lock().await;
        state
            .containers
            .insert(name.into(), StoredContainer { schema, rows });
    }

    /// Every call received so far.
    pub async fn calls(&self) -> Vec<StoreCall> {
        self.state.lock().await.calls.clone()
    }

    /// Row counts of every `write_batch` call, in call order.
    pub async fn write_batch_sizes(&self) -> Vec<usize> {
        self.state
            .lock()
            .await
            .calls
            .iter()
            .filter_map(|call| match call {
                StoreCall::WriteBatch(entries) => Some(entries.iter().map(|(_, n)| n).sum()),
                _ => None,
            })
            .collect()
    }

    /// Number of `close` calls.
    pub async fn close_count(&self) -> usize {
        self.state.lock().await.closes
    }

    /// Snapshot of a container.
    pub async fn container(&self, name: &str) -> Option<StoredContainer> {
        self.state.lock().await.containers.get(name).cloned()
    }
}

#[async_trait]
impl ContainerStore for MemoryStore {
    async fn container_exists(&mut self, name: &str) -> Result<bool, StoreError> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::ContainerExists(name.to_string()));
        self.check(&state, FailPoint::Exists)?;
        Ok(state.containers.contains_key(name))
    }

    async fn create_container(
        &mut self,
        name: &str,
        schema: &ContainerSchema,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::CreateContainer(name.to_string()));
        self.check(&state, FailPoint::Create)?;
        if state.containers.contains_key(name) {
            return Err(StoreError::Rejected {
                status: 409,
                message: format!("container '{name}' already exists"),
            });
        }
        state.containers.insert(
            name.to_string(),
            StoredContainer {
                schema: schema.clone(),
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    async fn drop_container(&mut self, name: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::DropContainer(name.to_string()));
        self.check(&state, FailPoint::Drop)?;
        state.containers.remove(name);
        Ok(())
    }

    async fn write_batch(&mut self, batch: Batch) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::WriteBatch(
            batch
                .iter()
                .map(|(name, rows)| (name.to_string(), rows.len()))
                .collect(),
        ));
        state.writes += 1;
        let write_number = state.writes;
        self.check(&state, FailPoint::Write(write_number))?;

        if batch.is_empty() {
            return Ok(());
        }

        // Validate every entry before applying any, so the call stays atomic.
        for (name, rows) in batch.iter() {
            let Some(container) = state.containers.get(name) else {
                return Err(StoreError::Rejected {
                    status: 404,
                    message: format!("container '{name}' not found"),
                });
            };
            let width = container.schema.width();
            if rows.iter().any(|row| row.len() != width) {
                return Err(StoreError::Rejected {
                    status: 400,
                    message: format!("row width does not match container '{name}'"),
                });
            }
        }

        for (name, rows) in batch {
            if let Some(container) = state.containers.get_mut(&name) {
                container.rows.extend(rows);
            }
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        let mut state = self.state.lock().await;
        state.calls.push(StoreCall::Close);
        state.closes += 1;
        injected(self.fail_point, FailPoint::Close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loader_core::{Template, Value};

    #[tokio::test]
    async fn test_write_appends_rows() {
        let mut store = MemoryStore::new();
        let schema = Template::MultipleTimeColumns.schema();
        store.create_container("c", &schema).await.unwrap();

        let ts = chrono::Utc::now();
        let row = Row::new(vec![
            Value::Timestamp(ts),
            Value::Timestamp(ts),
            Value::String("test-401".to_string()),
            Value::Integer(-3),
        ]);
        store
            .write_batch(Batch::single("c", vec![row.clone(), row]))
            .await
            .unwrap();

        assert_eq!(store.container("c").await.unwrap().rows.len(), 2);
        assert_eq!(store.write_batch_sizes().await, vec![2]);
    }

    #[tokio::test]
    async fn test_empty_batch_is_noop() {
        let mut store = MemoryStore::new();
        store
            .write_batch(Batch::single("missing", Vec::new()))
            .await
            .unwrap();
        assert_eq!(store.write_batch_sizes().await, vec![0]);
    }

    #[tokio::test]
    async fn test_write_to_missing_container_rejected() {
        let mut store = MemoryStore::new();
        let result = store
            .write_batch(Batch::single("missing", vec![Row::new(vec![Value::Bool(true)])]))
            .await;
        assert!(matches!(result, Err(StoreError::Rejected { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_calls_after_close_fail() {
        let mut store = MemoryStore::new();
        store.close().await.unwrap();

        assert!(matches!(
            store.container_exists("c").await,
            Err(StoreError::Closed)
        ));
        assert_eq!(store.close_count().await, 1);
    }

    #[tokio::test]
    async fn test_injected_write_failure() {
        let mut store = MemoryStore::new().failing_on(FailPoint::Write(2));
        store
            .write_batch(Batch::single("c", Vec::new()))
            .await
            .unwrap();
        let second = store.write_batch(Batch::single("c", Vec::new())).await;
        assert!(matches!(second, Err(StoreError::Rejected { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let mut handle = store.clone();
        handle
            .create_container("c", &Template::MultipleType.schema())
            .await
            .unwrap();
        assert!(store.container("c").await.is_some());
    }
}
