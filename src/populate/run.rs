//! Populate command runners.

use anyhow::Context;
use griddb_webapi::GridDbClient;
use loader_core::{SchemaRegistry, Template};
use loader_populate::{
    CommonPopulateArgs, ContainerStore, LoadPipeline, MemoryStore, PopulateError,
    PopulateMetrics, PopulateRequest,
};
use std::fmt::Write;
use std::path::Path;

use super::{PopulateArgs, SampleArgs};
use crate::config::ConnectionArgs;

/// Built-in templates plus any loaded from `templates_file`.
pub fn load_registry(templates_file: Option<&Path>) -> anyhow::Result<SchemaRegistry> {
    let mut registry = SchemaRegistry::builtin();
    if let Some(path) = templates_file {
        let count = registry
            .load_file(path)
            .map_err(PopulateError::from)
            .with_context(|| format!("Failed to load templates from {path:?}"))?;
        tracing::info!("Loaded {} templates from {:?}", count, path);
    }
    Ok(registry)
}

async fn open_store(
    connection: &ConnectionArgs,
    dry_run: bool,
) -> anyhow::Result<Box<dyn ContainerStore>> {
    if dry_run {
        tracing::info!("[DRY-RUN] Using an in-memory store; GridDB will not be contacted");
        return Ok(Box::new(MemoryStore::new()));
    }

    let config = connection.resolve()?;
    tracing::info!("Connecting to GridDB at {}", config.describe());
    let client = GridDbClient::connect(config)
        .await
        .map_err(PopulateError::ConnectionFailure)
        .context("Failed to connect to GridDB")?;
    Ok(Box::new(client))
}

/// Run one resolved request against an already opened store.
pub async fn populate_with_store<S: ContainerStore>(
    store: S,
    request: &PopulateRequest,
    common: &CommonPopulateArgs,
) -> anyhow::Result<PopulateMetrics> {
    let metrics = LoadPipeline::new(store)
        .with_common_args(common)
        .run_request(request)
        .await
        .with_context(|| format!("Failed to populate container '{}'", request.container))?;
    Ok(metrics)
}

fn report(request: &PopulateRequest, metrics: &PopulateMetrics, dry_run: bool) {
    let prefix = if dry_run { "[DRY-RUN] " } else { "" };
    tracing::info!(
        "{}Container '{}': {} rows in {} batches ({:.2} rows/sec, generation {:?}, writes {:?})",
        prefix,
        request.container,
        metrics.rows_written,
        metrics.batch_count,
        metrics.rows_per_second(),
        metrics.generation_duration,
        metrics.write_duration
    );
}

/// Run the `populate` command.
pub async fn run_populate(args: PopulateArgs) -> anyhow::Result<PopulateMetrics> {
    // Resolve before connecting so a bad template never opens a connection.
    let registry = load_registry(args.templates_file.as_deref())?;
    let request = PopulateRequest::resolve(
        &registry,
        &args.template,
        args.container.as_deref(),
        args.row_count,
    )
    .map_err(PopulateError::from)
    .with_context(|| format!("Failed to resolve template '{}'", args.template))?;

    tracing::info!(
        "Populating '{}' from template '{}' with {} rows (batch size: {}, seed: {:?})",
        request.container,
        args.template,
        request.row_count,
        args.common.batch_size,
        args.common.seed
    );

    let store = open_store(&args.connection, args.common.dry_run).await?;
    let metrics = populate_with_store(store, &request, &args.common).await?;
    report(&request, &metrics, args.common.dry_run);
    Ok(metrics)
}

/// Run the `sample` command: every built-in template in order, stopping at
/// the first failure.
pub async fn run_sample(args: SampleArgs) -> anyhow::Result<Vec<(Template, PopulateMetrics)>> {
    let registry = SchemaRegistry::builtin();
    let mut results = Vec::with_capacity(Template::ALL.len());

    for template in Template::ALL {
        let request = PopulateRequest::resolve(&registry, template.id(), None, None)
            .map_err(PopulateError::from)?;

        tracing::info!(
            "Sample run '{}': {} rows into '{}'",
            template,
            request.row_count,
            request.container
        );

        let store = open_store(&args.connection, args.common.dry_run).await?;
        let metrics = populate_with_store(store, &request, &args.common)
            .await
            .with_context(|| format!("Sample run '{template}' failed"))?;
        report(&request, &metrics, args.common.dry_run);
        results.push((template, metrics));
    }

    tracing::info!("All {} sample runs complete", results.len());
    Ok(results)
}

/// Human-readable listing of every template and its columns.
pub fn describe_templates(registry: &SchemaRegistry) -> String {
    let mut out = String::new();
    for definition in registry.templates() {
        let _ = writeln!(
            out,
            "{} -> {} ({}, {} rows)",
            definition.id, definition.container_name, definition.schema.kind, definition.row_count
        );
        for column in &definition.schema.columns {
            let key = if column.is_key { " [row key]" } else { "" };
            let _ = writeln!(
                out,
                "  {}: {} {}{}",
                column.position, column.name, column.column_type, key
            );
        }
    }
    out
}
