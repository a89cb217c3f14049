//! Migrate command implementation
//!
//! Drives a full migration run: category sync, then products (with
//! variations), then orders, saving run state between phases so an
//! interrupted run can resume where it stopped.

use crate::adapters::bigcommerce::BigCommerceClient;
use crate::adapters::traits::{DestinationClient, SourceClient};
use crate::adapters::woocommerce::WooCommerceClient;
use crate::config::{load_config, CaravanConfig};
use crate::core::migrate::{
    progress_channel, CustomerTask, MigrationRunner, MigrationState, MigrationTask, OrderTask,
    ProductTask, ProgressEvent, RunContext, RunReport, RunnerConfig,
};
use crate::domain::{CategoryMap, EntityType, Result, SourceVariation};
use clap::Args;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Skip the product phase (categories are still synced)
    #[arg(long)]
    pub skip_products: bool,

    /// Skip the customer phase
    #[arg(long)]
    pub skip_customers: bool,

    /// Skip the order phase
    #[arg(long)]
    pub skip_orders: bool,

    /// Override the state file path
    #[arg(long)]
    pub state: Option<String>,
}

impl MigrateArgs {
    /// Execute the migrate command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting migrate command");

        let config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let state_path = self
            .state
            .clone()
            .unwrap_or_else(|| config.migration.state_path.clone());
        let mut state = match MigrationState::load(Path::new(&state_path)) {
            Ok(state) => state,
            Err(e) => {
                eprintln!("Failed to load state file {state_path}: {e}");
                return Ok(2);
            }
        };

        if !self.yes {
            println!("Migration Configuration:");
            println!("  Source: {}", config.woocommerce.base_url);
            println!("  Destination store: {}", config.bigcommerce.store_hash);
            println!("  State file: {state_path}");
            println!(
                "  Previously migrated: {} product(s), {} customer(s), {} order(s)",
                state.products.len(),
                state.customers.len(),
                state.orders.len()
            );
            println!();
            print!("Proceed with migration? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Migration cancelled.");
                return Ok(0);
            }
        }

        let source = match WooCommerceClient::new(config.woocommerce.clone()) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                eprintln!("Failed to initialize WooCommerce client: {e}");
                return Ok(4);
            }
        };
        let destination: Arc<dyn DestinationClient> =
            match BigCommerceClient::new(config.bigcommerce.clone()) {
                Ok(client) => Arc::new(client),
                Err(e) => {
                    eprintln!("Failed to initialize BigCommerce client: {e}");
                    return Ok(4);
                }
            };

        println!("🚀 Starting migration...");
        println!();

        // Categories first: products reference them by destination id
        let category_map = match sync_categories(
            source.as_ref(),
            destination.as_ref(),
            &config,
            &mut state,
        )
        .await
        {
            Ok(map) => map,
            Err(e) => {
                tracing::error!(error = %e, "Category sync failed");
                eprintln!("Category sync failed: {e}");
                return Ok(4);
            }
        };
        save_state(&state, &state_path);

        let runner_config = RunnerConfig {
            per_page: config.migration.per_page,
            max_pages: config.migration.max_pages,
            request_delay: Duration::from_millis(config.migration.request_delay_ms),
        };
        let source_client: Arc<dyn SourceClient> = source.clone();
        let runner = MigrationRunner::new(source_client, destination.clone(), runner_config);

        let mut total_failed = 0usize;

        if !self.skip_products {
            let variations =
                match prefetch_variations(source.as_ref(), &config).await {
                    Ok(variations) => variations,
                    Err(e) => {
                        eprintln!("Failed to fetch product variations: {e}");
                        return Ok(4);
                    }
                };

            let task = ProductTask::new(category_map.clone(), variations);
            let report = match run_phase(&runner, &task, &state, EntityType::Product).await {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("Product migration aborted: {e}");
                    save_state(&state, &state_path);
                    return Ok(4);
                }
            };
            total_failed += report.stats.failed;
            state.products.merge(&report.id_map);
            save_state(&state, &state_path);
        }

        if !self.skip_customers {
            let report = match run_phase(&runner, &CustomerTask, &state, EntityType::Customer).await
            {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("Customer migration aborted: {e}");
                    save_state(&state, &state_path);
                    return Ok(4);
                }
            };
            total_failed += report.stats.failed;
            state.customers.merge(&report.id_map);
            save_state(&state, &state_path);
        }

        if !self.skip_orders {
            let task = OrderTask::new(state.products.clone(), state.customers.clone());
            let report = match run_phase(&runner, &task, &state, EntityType::Order).await {
                Ok(report) => report,
                Err(e) => {
                    eprintln!("Order migration aborted: {e}");
                    save_state(&state, &state_path);
                    return Ok(4);
                }
            };
            total_failed += report.stats.failed;
            state.orders.merge(&report.id_map);
            save_state(&state, &state_path);
        }

        println!();
        println!("📊 Migration Summary:");
        println!("  Products mapped: {}", state.products.len());
        println!("  Customers mapped: {}", state.customers.len());
        println!("  Orders mapped: {}", state.orders.len());
        println!("  State file: {state_path}");

        if total_failed > 0 {
            println!("  ⚠️  {total_failed} item(s) failed; re-run to retry them");
            return Ok(1);
        }
        Ok(0)
    }
}

/// Runs one entity phase through the runner with progress rendering
async fn run_phase(
    runner: &MigrationRunner,
    task: &dyn MigrationTask,
    state: &MigrationState,
    entity: EntityType,
) -> Result<RunReport> {
    let ctx = RunContext {
        already_migrated: state.migrated_set(entity),
        id_map: state.map_for(entity).clone(),
    };

    let (progress_tx, progress_rx) = progress_channel();
    let renderer = spawn_progress_renderer(progress_rx);

    let result = runner.run(task, ctx, progress_tx).await;
    let _ = renderer.await;
    result
}

/// Renders progress events to the console as they arrive
fn spawn_progress_renderer(
    mut progress: mpsc::Receiver<ProgressEvent>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = progress.recv().await {
            match event {
                ProgressEvent::Started { entity, total } => {
                    println!("▶  Migrating {total} {entity} item(s)");
                }
                ProgressEvent::Progress {
                    entity,
                    source_id,
                    stats,
                } => {
                    println!(
                        "   [{}/{}] {entity} {source_id}",
                        stats.processed(),
                        stats.total
                    );
                }
                ProgressEvent::Completed { entity, stats, .. } => {
                    println!("✅ {entity}: {}", stats.summary());
                    for warning in &stats.warnings {
                        println!("   ⚠️  {warning}");
                    }
                }
                ProgressEvent::Failed { entity, message } => {
                    println!("❌ {entity}: {message}");
                }
            }
        }
    })
}

/// Ensures every source category exists on the destination and returns
/// the name → destination id lookup the product transformer needs
async fn sync_categories(
    source: &dyn SourceClient,
    destination: &dyn DestinationClient,
    config: &CaravanConfig,
    state: &mut MigrationState,
) -> Result<CategoryMap> {
    let mut map = CategoryMap::new();

    // Existing destination categories, keyed by name
    for page in 1..=config.migration.max_pages {
        let batch = destination
            .list(EntityType::Category, &[], page, 250)
            .await?;
        if batch.items.is_empty() {
            break;
        }
        for item in &batch.items {
            if let (Some(name), Some(id)) = (
                item.get("name").and_then(Value::as_str),
                item.get("id").and_then(Value::as_u64),
            ) {
                map.insert(name, id);
            }
        }
    }

    // Create any source category not present yet
    let mut created = 0usize;
    for page in 1..=config.migration.max_pages {
        let batch = source
            .fetch_page(EntityType::Category, page, config.migration.per_page, &[])
            .await?;
        if batch.is_empty() {
            break;
        }
        for item in &batch {
            let Some(name) = item.get("name").and_then(Value::as_str) else {
                continue;
            };
            let source_id = item.get("id").and_then(Value::as_u64).unwrap_or(0);

            let destination_id = match map.get(name) {
                Some(id) => id,
                None => {
                    let created_record = destination
                        .create(EntityType::Category, &json!({"name": name}))
                        .await?;
                    let id = crate::adapters::traits::record_id(&created_record)
                        .ok_or_else(|| {
                            crate::domain::CaravanError::Migration(format!(
                                "Created category '{name}' has no id"
                            ))
                        })?;
                    map.insert(name, id);
                    created += 1;
                    id
                }
            };
            if source_id > 0 {
                state.categories.insert(source_id, destination_id);
            }
        }
    }

    println!("✅ categories: {} known, {created} created", map.len());
    Ok(map)
}

/// Fetches the variation lists of every variable product up front; the
/// product transformer is pure and cannot fetch them itself
async fn prefetch_variations(
    source: &WooCommerceClient,
    config: &CaravanConfig,
) -> Result<HashMap<u64, Vec<SourceVariation>>> {
    let mut variations = HashMap::new();

    for page in 1..=config.migration.max_pages {
        let batch = source
            .fetch_page(EntityType::Product, page, config.migration.per_page, &[])
            .await?;
        if batch.is_empty() {
            break;
        }
        for item in &batch {
            let is_variable = item.get("type").and_then(Value::as_str) == Some("variable");
            let Some(id) = item.get("id").and_then(Value::as_u64) else {
                continue;
            };
            if is_variable {
                variations.insert(id, source.fetch_all_variations(id).await?);
            }
        }
    }

    tracing::info!(
        products = variations.len(),
        "Prefetched variation lists for variable products"
    );
    Ok(variations)
}

/// Persists state, logging rather than failing the run on error
fn save_state(state: &MigrationState, path: &str) {
    if let Err(e) = state.save(Path::new(path)) {
        tracing::error!(error = %e, path, "Failed to save state file");
        eprintln!("⚠️  Failed to save state file {path}: {e}");
    }
}
