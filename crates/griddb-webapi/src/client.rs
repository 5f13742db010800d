//! `ContainerStore` over the GridDB Web API.

use crate::config::{mask_password, WebApiConfig};
use crate::encode::{rows_body, ContainerInfo};
use async_trait::async_trait;
use loader_core::{Batch, ContainerSchema};
use loader_populate::{ContainerStore, StoreError};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, info};

fn transport_error(e: reqwest::Error) -> StoreError {
    StoreError::Connection(e.to_string())
}

/// Turn a non-2xx response into `StoreError::Rejected` carrying the body.
async fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = if body.trim().is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.trim().to_string()
    };

    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

/// An authenticated session against one GridDB database.
///
/// The Web API writes rows one container per request, so a batch can only be
/// written atomically when it targets a single container. `write_batch`
/// rejects batches with rows for more than one container before sending
/// anything.
pub struct GridDbClient {
    http: Client,
    config: WebApiConfig,
    closed: bool,
}

impl GridDbClient {
    /// Build the HTTP client and verify the connection with
    /// `GET /checkConnection`.
    pub async fn connect(config: WebApiConfig) -> Result<Self, StoreError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport_error)?;

        let client = Self {
            http,
            config,
            closed: false,
        };

        let url = client.config.endpoint(&["checkConnection"])?;
        debug!("Checking connection at {}", mask_password(url.as_str()));
        let response = client
            .authorized(client.http.get(url))
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await.map_err(|e| {
            StoreError::Connection(format!("GridDB connection check failed: {e}"))
        })?;

        info!("Connected to GridDB at {}", client.config.describe());
        Ok(client)
    }

    /// The settings this client was built with.
    pub fn config(&self) -> &WebApiConfig {
        &self.config
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.config.user, Some(&self.config.password))
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed {
            return Err(StoreError::Closed);
        }
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, StoreError> {
        self.ensure_open()?;
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(transport_error)?;
        check_status(response).await
    }
}

#[async_trait]
impl ContainerStore for GridDbClient {
    async fn container_exists(&mut self, name: &str) -> Result<bool, StoreError> {
        self.ensure_open()?;
        let url = self.config.endpoint(&["containers", name, "info"])?;
        let response = self
            .authorized(self.http.get(url))
            .send()
            .await
            .map_err(transport_error)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(false);
        }
        check_status(response).await?;
        Ok(true)
    }

    async fn create_container(
        &mut self,
        name: &str,
        schema: &ContainerSchema,
    ) -> Result<(), StoreError> {
        let url = self.config.endpoint(&["containers"])?;
        let body = ContainerInfo::from_schema(name, schema);
        self.send(self.http.post(url).json(&body)).await?;
        debug!("Created container '{}'", name);
        Ok(())
    }

    async fn drop_container(&mut self, name: &str) -> Result<(), StoreError> {
        let url = self.config.endpoint(&["containers"])?;
        self.send(self.http.delete(url).json(&[name])).await?;
        debug!("Dropped container '{}'", name);
        Ok(())
    }

    async fn write_batch(&mut self, batch: Batch) -> Result<(), StoreError> {
        self.ensure_open()?;
        let targets: Vec<&str> = batch
            .iter()
            .filter(|(_, rows)| !rows.is_empty())
            .map(|(name, _)| name)
            .collect();
        if targets.len() > 1 {
            return Err(StoreError::Encoding(format!(
                "batch spans {} containers ({}); the Web API writes one container per request",
                targets.len(),
                targets.join(", ")
            )));
        }

        for (name, rows) in batch.iter() {
            if rows.is_empty() {
                continue;
            }
            let url = self.config.endpoint(&["containers", name, "rows"])?;
            let body = rows_body(rows)?;
            self.send(self.http.put(url).json(&body)).await?;
            debug!("Put {} rows into '{}'", rows.len(), name);
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), StoreError> {
        self.ensure_open()?;
        self.closed = true;
        debug!("Closed GridDB session for database '{}'", self.config.database);
        Ok(())
    }
}
