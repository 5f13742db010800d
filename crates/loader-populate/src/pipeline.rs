//! The load pipeline: provision, generate, buffer, write, release.

use crate::args::CommonPopulateArgs;
use crate::buffer::{BatchBuffer, DEFAULT_BATCH_CAPACITY};
use crate::error::PopulateError;
use crate::provision::ContainerProvisioner;
use crate::store::ContainerStore;
use chrono::{DateTime, TimeDelta, Utc};
use loader_core::{Batch, ContainerSchema, SchemaError, SchemaRegistry};
use loader_generator::{RowGenerator, DEFAULT_DECREASE_UNIT_MS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Metrics from a populate operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopulateMetrics {
    /// Number of rows written.
    pub rows_written: u64,
    /// Number of batch writes issued, including an empty trailing one.
    pub batch_count: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating data.
    pub generation_duration: Duration,
    /// Time spent writing data.
    pub write_duration: Duration,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// A fully resolved run: which container, which schema, how many rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PopulateRequest {
    pub container: String,
    pub schema: ContainerSchema,
    pub row_count: u64,
}

impl PopulateRequest {
    /// Resolve a template id against the registry.
    ///
    /// `container` and `row_count` default to the template's sample values.
    /// Nothing touches a store here, so an unknown template fails before any
    /// connection is opened.
    pub fn resolve(
        registry: &SchemaRegistry,
        template_id: &str,
        container: Option<&str>,
        row_count: Option<u64>,
    ) -> Result<Self, SchemaError> {
        let template = registry.get(template_id)?;
        template.schema.validate()?;

        Ok(Self {
            container: container
                .map(str::to_string)
                .unwrap_or_else(|| template.container_name.clone()),
            schema: template.schema.clone(),
            row_count: row_count.unwrap_or(template.row_count),
        })
    }
}

/// Populates one container through a [`ContainerStore`].
///
/// The pipeline owns the store for the duration of a run and closes it
/// exactly once when [`run`](Self::run) returns, whether the run succeeded
/// or not.
///
/// # Example
///
/// ```ignore
/// let metrics = LoadPipeline::new(store)
///     .with_batch_capacity(NonZeroUsize::new(500).unwrap())
///     .with_seed(42)
///     .run("one_thousand_rows", &schema, 1000)
///     .await?;
/// ```
pub struct LoadPipeline<S: ContainerStore> {
    store: S,
    batch_capacity: NonZeroUsize,
    generator: RowGenerator,
    rng: StdRng,
}

impl<S: ContainerStore> LoadPipeline<S> {
    /// Create a pipeline over an open store, with timestamps anchored at the
    /// current time and a fresh random seed.
    pub fn new(store: S) -> Self {
        Self {
            store,
            batch_capacity: DEFAULT_BATCH_CAPACITY,
            generator: RowGenerator::starting_now(),
            rng: StdRng::from_os_rng(),
        }
    }

    /// Set the maximum number of rows per batch write.
    pub fn with_batch_capacity(mut self, batch_capacity: NonZeroUsize) -> Self {
        self.batch_capacity = batch_capacity;
        self
    }

    /// Seed the random source for reproducible values.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Anchor the timestamp of cursor 0.
    pub fn with_base_time(mut self, base_time: DateTime<Utc>) -> Self {
        let unit = self.generator.decrease_unit();
        self.generator = RowGenerator::new(base_time).with_decrease_unit(unit);
        self
    }

    /// Set the step between consecutive rows' timestamps.
    pub fn with_decrease_unit(mut self, unit: TimeDelta) -> Self {
        self.generator = self.generator.with_decrease_unit(unit);
        self
    }

    /// Apply the batching, seeding and timestamp options from the command line.
    pub fn with_common_args(self, args: &CommonPopulateArgs) -> Self {
        let unit = TimeDelta::try_milliseconds(args.decrease_unit_ms)
            .unwrap_or_else(|| TimeDelta::milliseconds(DEFAULT_DECREASE_UNIT_MS));
        let pipeline = self
            .with_batch_capacity(args.batch_size)
            .with_decrease_unit(unit);
        match args.seed {
            Some(seed) => pipeline.with_seed(seed),
            None => pipeline,
        }
    }

    /// Run a resolved request.
    pub async fn run_request(
        self,
        request: &PopulateRequest,
    ) -> Result<PopulateMetrics, PopulateError> {
        self.run(&request.container, &request.schema, request.row_count)
            .await
    }

    /// Provision `container`, write `row_count` generated rows in batches,
    /// then close the store.
    pub async fn run(
        mut self,
        container: &str,
        schema: &ContainerSchema,
        row_count: u64,
    ) -> Result<PopulateMetrics, PopulateError> {
        let result = self.load(container, schema, row_count).await;
        let closed = self.store.close().await;

        match (result, closed) {
            (Ok(metrics), Ok(())) => Ok(metrics),
            (Ok(_), Err(e)) => Err(PopulateError::ConnectionFailure(e)),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!("Failed to close store after error: {}", close_err);
                Err(e)
            }
        }
    }

    async fn load(
        &mut self,
        container: &str,
        schema: &ContainerSchema,
        row_count: u64,
    ) -> Result<PopulateMetrics, PopulateError> {
        let start_time = Instant::now();
        let mut metrics = PopulateMetrics::default();

        schema.validate()?;
        ContainerProvisioner::new(&mut self.store)
            .ensure(container, schema)
            .await?;

        info!(
            "Populating container '{}' with {} rows (batch size: {})",
            container, row_count, self.batch_capacity
        );

        let mut buffer = BatchBuffer::new(self.batch_capacity);

        for cursor in 0..row_count {
            let gen_start = Instant::now();
            let row = self.generator.next(schema, cursor, &mut self.rng)?;
            metrics.generation_duration += gen_start.elapsed();

            buffer.push(row)?;
            if buffer.is_full() {
                self.flush(container, &mut buffer, &mut metrics).await?;
            }
        }

        // Always flush once more; when row_count is a multiple of the batch
        // capacity this is an empty write.
        self.flush(container, &mut buffer, &mut metrics).await?;

        metrics.total_duration = start_time.elapsed();

        info!(
            "Population complete: {} rows in {} batches, {:?} ({:.2} rows/sec)",
            metrics.rows_written,
            metrics.batch_count,
            metrics.total_duration,
            metrics.rows_per_second()
        );

        Ok(metrics)
    }

    async fn flush(
        &mut self,
        container: &str,
        buffer: &mut BatchBuffer,
        metrics: &mut PopulateMetrics,
    ) -> Result<(), PopulateError> {
        let rows = buffer.drain();
        let count = rows.len() as u64;
        let batch_number = metrics.batch_count + 1;

        let write_start = Instant::now();
        self.store
            .write_batch(Batch::single(container, rows))
            .await
            .map_err(|source| PopulateError::WriteFailure {
                container: container.to_string(),
                batch: batch_number,
                source,
            })?;
        metrics.write_duration += write_start.elapsed();

        metrics.rows_written += count;
        metrics.batch_count = batch_number;

        debug!(
            "Batch {} complete: {} rows written, {} total",
            batch_number, count, metrics.rows_written
        );
        Ok(())
    }
}
