//! Container provisioning.

use crate::error::PopulateError;
use crate::store::{ContainerStore, StoreError};
use loader_core::ContainerSchema;
use tracing::{debug, info};

/// What [`ContainerProvisioner::ensure`] had to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionOutcome {
    /// The container did not exist and was created.
    Created,
    /// A previous container was dropped and created again.
    Recreated,
}

/// Puts a container into a known, empty state before any write.
///
/// An existing container is always dropped, never appended to, so running
/// twice with the same name ends in the same state. Drop and create are not
/// atomic: a crash between them leaves the container absent, which the next
/// `ensure` handles like any other missing container.
pub struct ContainerProvisioner<'a, S: ?Sized> {
    store: &'a mut S,
}

impl<'a, S: ContainerStore + ?Sized> ContainerProvisioner<'a, S> {
    /// Create a provisioner over an open store.
    pub fn new(store: &'a mut S) -> Self {
        Self { store }
    }

    /// Create `name` with `schema`, dropping any container of that name first.
    pub async fn ensure(
        &mut self,
        name: &str,
        schema: &ContainerSchema,
    ) -> Result<ProvisionOutcome, PopulateError> {
        self.try_ensure(name, schema)
            .await
            .map_err(|source| PopulateError::ProvisionFailure {
                container: name.to_string(),
                source,
            })
    }

    async fn try_ensure(
        &mut self,
        name: &str,
        schema: &ContainerSchema,
    ) -> Result<ProvisionOutcome, StoreError> {
        let exists = self.store.container_exists(name).await?;
        debug!("Container '{}' exists: {}", name, exists);

        let outcome = if exists {
            info!("Dropping container: {}", name);
            self.store.drop_container(name).await?;
            ProvisionOutcome::Recreated
        } else {
            ProvisionOutcome::Created
        };

        info!(
            "Creating {} container '{}' ({} columns)",
            schema.kind,
            name,
            schema.width()
        );
        self.store.create_container(name, schema).await?;

        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{FailPoint, MemoryStore, StoreCall};
    use loader_core::{Row, Template, Value};

    #[tokio::test]
    async fn test_creates_missing_container() {
        let mut store = MemoryStore::new();
        let schema = Template::OneThousandRows.schema();

        let outcome = ContainerProvisioner::new(&mut store)
            .ensure("one_thousand_rows", &schema)
            .await
            .unwrap();

        assert_eq!(outcome, ProvisionOutcome::Created);
        assert_eq!(
            store.calls().await,
            vec![
                StoreCall::ContainerExists("one_thousand_rows".to_string()),
                StoreCall::CreateContainer("one_thousand_rows".to_string()),
            ]
        );
        let stored = store.container("one_thousand_rows").await.unwrap();
        assert_eq!(stored.schema, schema);
        assert!(stored.rows.is_empty());
    }

    #[tokio::test]
    async fn test_recreates_existing_container() {
        let mut store = MemoryStore::new();
        let stale = Template::MultipleTimeColumns.schema();
        store
            .insert_container("target", stale, vec![Row::new(vec![Value::Integer(1)])])
            .await;

        let schema = Template::MultipleType.schema();
        let outcome = ContainerProvisioner::new(&mut store)
            .ensure("target", &schema)
            .await
            .unwrap();

        assert_eq!(outcome, ProvisionOutcome::Recreated);
        assert_eq!(
            store.calls().await,
            vec![
                StoreCall::ContainerExists("target".to_string()),
                StoreCall::DropContainer("target".to_string()),
                StoreCall::CreateContainer("target".to_string()),
            ]
        );
        let stored = store.container("target").await.unwrap();
        assert_eq!(stored.schema, schema);
        assert!(stored.rows.is_empty());
    }

    #[tokio::test]
    async fn test_ensure_twice_leaves_fresh_container() {
        let mut store = MemoryStore::new();
        let schema = Template::MultipleType.schema();

        let mut provisioner = ContainerProvisioner::new(&mut store);
        assert_eq!(
            provisioner.ensure("c", &schema).await.unwrap(),
            ProvisionOutcome::Created
        );
        assert_eq!(
            provisioner.ensure("c", &schema).await.unwrap(),
            ProvisionOutcome::Recreated
        );

        let stored = store.container("c").await.unwrap();
        assert_eq!(stored.schema, schema);
        assert!(stored.rows.is_empty());
    }

    #[tokio::test]
    async fn test_store_error_is_provision_failure() {
        let mut store = MemoryStore::new().failing_on(FailPoint::Create);
        let schema = Template::MultipleType.schema();

        let err = ContainerProvisioner::new(&mut store)
            .ensure("c", &schema)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), "ProvisionFailure");
        assert!(matches!(
            err,
            PopulateError::ProvisionFailure { ref container, .. } if container == "c"
        ));
    }
}
