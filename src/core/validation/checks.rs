//! Reconciliation check battery
//!
//! Read-only checks run after a migration: entity count comparisons,
//! a sampled price agreement check, and a sampled primary-image
//! reachability probe. Each check degrades independently; a transport
//! failure inside one check fails that check, never the whole battery.

use crate::adapters::traits::{DestinationClient, SourceClient};
use crate::core::transform::parse_amount;
use crate::core::validation::report::{CheckResult, CheckStatus, ValidationReport};
use crate::domain::{EntityType, Result};
use async_trait::async_trait;
use futures::future::join_all;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Maximum absolute difference treated as price agreement
pub const PRICE_TOLERANCE: f64 = 0.01;

/// Page size used when a destination offers no aggregate count
const COUNT_PAGE_SIZE: u32 = 250;

/// Safety cap on pages walked while counting exhaustively
const COUNT_MAX_PAGES: u32 = 500;

/// Checks whether a URL resolves to a live resource
///
/// Seam for the image reachability check; the HTTP implementation is
/// replaced with a canned one in tests.
#[async_trait]
pub trait UrlProber: Send + Sync {
    async fn exists(&self, url: &str) -> bool;
}

/// Probes URLs with bounded-timeout HTTP HEAD requests
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::domain::CaravanError::Validation(format!(
                "Failed to build probe client: {e}"
            )))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl UrlProber for HttpProber {
    async fn exists(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(url, error = %e, "Image probe failed");
                false
            }
        }
    }
}

/// Validator tuning knobs
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// How many destination products to sample for the price and image
    /// checks
    pub sample_size: u32,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self { sample_size: 10 }
    }
}

/// Runs the post-migration reconciliation battery
pub struct Validator {
    source: Arc<dyn SourceClient>,
    destination: Arc<dyn DestinationClient>,
    prober: Arc<dyn UrlProber>,
    config: ValidatorConfig,
}

impl Validator {
    pub fn new(
        source: Arc<dyn SourceClient>,
        destination: Arc<dyn DestinationClient>,
        prober: Arc<dyn UrlProber>,
        config: ValidatorConfig,
    ) -> Self {
        Self {
            source,
            destination,
            prober,
            config,
        }
    }

    /// Runs every check and returns the assembled report
    pub async fn run(&self) -> ValidationReport {
        let started = Instant::now();
        let mut report = ValidationReport::new();

        for entity in [EntityType::Product, EntityType::Category, EntityType::Customer] {
            report.add(self.count_check(entity).await);
        }
        report.add(self.price_check().await);
        report.add(self.image_check().await);

        report.set_duration(started.elapsed().as_millis() as u64);
        tracing::info!(status = ?report.aggregate_status(), "Validation completed");
        report
    }

    /// Compares source and destination counts for one entity type
    async fn count_check(&self, entity: EntityType) -> CheckResult {
        let name = format!("{entity} counts");
        match self.compare_counts(entity).await {
            Ok(result) => result,
            Err(e) => CheckResult::new(name, CheckStatus::Fail, format!("Count check failed: {e}")),
        }
    }

    async fn compare_counts(&self, entity: EntityType) -> Result<CheckResult> {
        let name = format!("{entity} counts");
        let source_count = self.source.count(entity).await?;
        let destination_count = match self.destination.count(entity).await? {
            Some(count) => count,
            None => self.count_by_pagination(entity).await?,
        };

        let result = if destination_count == source_count {
            CheckResult::new(
                name,
                CheckStatus::Pass,
                format!("source={source_count} destination={destination_count}"),
            )
        } else if destination_count > 0 && destination_count < source_count {
            let percent = (destination_count as f64 / source_count as f64) * 100.0;
            CheckResult::new(
                name,
                CheckStatus::Warning,
                format!(
                    "source={source_count} destination={destination_count} ({percent:.1}% migrated)"
                ),
            )
        } else {
            CheckResult::new(
                name,
                CheckStatus::Fail,
                format!("source={source_count} destination={destination_count}"),
            )
        };
        Ok(result)
    }

    /// Fallback count by walking destination pages to exhaustion
    async fn count_by_pagination(&self, entity: EntityType) -> Result<u64> {
        let mut total: u64 = 0;
        for page in 1..=COUNT_MAX_PAGES {
            let batch = self
                .destination
                .list(entity, &[], page, COUNT_PAGE_SIZE)
                .await?;
            if batch.items.is_empty() {
                break;
            }
            total += batch.items.len() as u64;
            if page == COUNT_MAX_PAGES {
                tracing::warn!(entity = %entity, "Page cap reached while counting destination items");
            }
        }
        Ok(total)
    }

    /// Samples destination products and compares prices against the
    /// same-SKU source product
    async fn price_check(&self) -> CheckResult {
        match self.compare_prices().await {
            Ok(result) => result,
            Err(e) => CheckResult::new(
                "sampled prices",
                CheckStatus::Fail,
                format!("Price check failed: {e}"),
            ),
        }
    }

    async fn compare_prices(&self) -> Result<CheckResult> {
        let page = self
            .destination
            .list(EntityType::Product, &[], 1, self.config.sample_size)
            .await?;

        let mut compared = 0u32;
        let mut mismatched: Vec<String> = Vec::new();

        for item in &page.items {
            let Some(sku) = item.get("sku").and_then(Value::as_str).filter(|s| !s.is_empty())
            else {
                continue;
            };
            let Some(destination_price) = item.get("price").and_then(Value::as_f64) else {
                continue;
            };

            let filters = [("sku".to_string(), sku.to_string())];
            let matches = self
                .source
                .fetch_page(EntityType::Product, 1, 1, &filters)
                .await?;
            let Some(source_item) = matches.first() else {
                continue;
            };
            let Some(source_price) = price_of(source_item) else {
                continue;
            };

            compared += 1;
            if (destination_price - source_price).abs() > PRICE_TOLERANCE {
                mismatched.push(format!(
                    "{sku}: source={source_price:.2} destination={destination_price:.2}"
                ));
            }
        }

        let result = if compared == 0 {
            CheckResult::new(
                "sampled prices",
                CheckStatus::Skipped,
                "No comparable product pairs found",
            )
        } else if mismatched.is_empty() {
            CheckResult::new(
                "sampled prices",
                CheckStatus::Pass,
                format!("{compared} product(s) agree within {PRICE_TOLERANCE}"),
            )
        } else {
            CheckResult::new(
                "sampled prices",
                CheckStatus::Fail,
                format!("{} of {compared} mismatched: {}", mismatched.len(), mismatched.join(", ")),
            )
        };
        Ok(result)
    }

    /// Samples destination products and probes their primary image URLs
    async fn image_check(&self) -> CheckResult {
        match self.probe_images().await {
            Ok(result) => result,
            Err(e) => CheckResult::new(
                "sampled images",
                CheckStatus::Fail,
                format!("Image check failed: {e}"),
            ),
        }
    }

    async fn probe_images(&self) -> Result<CheckResult> {
        let page = self
            .destination
            .list(EntityType::Product, &[], 1, self.config.sample_size)
            .await?;

        let urls: Vec<String> = page
            .items
            .iter()
            .filter_map(primary_image_url)
            .collect();

        if urls.is_empty() {
            return Ok(CheckResult::new(
                "sampled images",
                CheckStatus::Warning,
                "No product images found to sample",
            ));
        }

        // Probes are independent read-only HEAD requests
        let probes = urls.iter().map(|url| self.prober.exists(url));
        let reachable = join_all(probes).await.into_iter().filter(|ok| *ok).count() as u32;

        let total = urls.len() as u32;
        let result = if reachable == total {
            CheckResult::new(
                "sampled images",
                CheckStatus::Pass,
                format!("{total} image(s) reachable"),
            )
        } else if reachable > 0 {
            CheckResult::new(
                "sampled images",
                CheckStatus::Warning,
                format!("{reachable} of {total} image(s) reachable"),
            )
        } else {
            CheckResult::new(
                "sampled images",
                CheckStatus::Fail,
                format!("0 of {total} image(s) reachable"),
            )
        };
        Ok(result)
    }
}

/// Source product price: the effective `price` string, parsed
fn price_of(item: &Value) -> Option<f64> {
    match item.get("price") {
        Some(Value::String(raw)) if !raw.trim().is_empty() => Some(parse_amount(raw)),
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    }
}

/// Primary image URL of a destination product: the thumbnail when one
/// is flagged, otherwise the first image
fn primary_image_url(item: &Value) -> Option<String> {
    let images = item.get("images").and_then(Value::as_array)?;
    let primary = images
        .iter()
        .find(|img| img.get("is_thumbnail").and_then(Value::as_bool) == Some(true))
        .or_else(|| images.first())?;
    primary
        .get("image_url")
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::traits::ListPage;
    use crate::domain::CaravanError;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct FakeSource {
        counts: HashMap<EntityType, u64>,
        products_by_sku: HashMap<String, Value>,
    }

    #[async_trait]
    impl SourceClient for FakeSource {
        async fn fetch_page(
            &self,
            _entity: EntityType,
            page: u32,
            _per_page: u32,
            filters: &crate::adapters::traits::Filters,
        ) -> crate::domain::Result<Vec<Value>> {
            if page > 1 {
                return Ok(Vec::new());
            }
            if let Some((_, sku)) = filters.iter().find(|(k, _)| k == "sku") {
                return Ok(self
                    .products_by_sku
                    .get(sku)
                    .cloned()
                    .into_iter()
                    .collect());
            }
            Ok(self.products_by_sku.values().cloned().collect())
        }

        async fn count(&self, entity: EntityType) -> crate::domain::Result<u64> {
            self.counts
                .get(&entity)
                .copied()
                .ok_or_else(|| CaravanError::Validation("no count".into()))
        }
    }

    struct FakeDestination {
        counts: HashMap<EntityType, Option<u64>>,
        products: Vec<Value>,
    }

    #[async_trait]
    impl DestinationClient for FakeDestination {
        async fn create(
            &self,
            _entity: EntityType,
            _payload: &Value,
        ) -> crate::domain::Result<Value> {
            unreachable!("validation never writes")
        }

        async fn list(
            &self,
            _entity: EntityType,
            _filters: &crate::adapters::traits::Filters,
            page: u32,
            _limit: u32,
        ) -> crate::domain::Result<ListPage> {
            let items = if page == 1 {
                self.products.clone()
            } else {
                Vec::new()
            };
            Ok(ListPage { items, total: None })
        }

        async fn count(&self, entity: EntityType) -> crate::domain::Result<Option<u64>> {
            Ok(self.counts.get(&entity).copied().flatten())
        }
    }

    struct CannedProber {
        reachable: Vec<String>,
        probed: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl UrlProber for CannedProber {
        async fn exists(&self, url: &str) -> bool {
            self.probed.lock().unwrap().push(url.to_string());
            self.reachable.iter().any(|u| u == url)
        }
    }

    fn validator(source: FakeSource, destination: FakeDestination, prober: CannedProber) -> Validator {
        Validator::new(
            Arc::new(source),
            Arc::new(destination),
            Arc::new(prober),
            ValidatorConfig::default(),
        )
    }

    fn all_counts(n: u64) -> HashMap<EntityType, u64> {
        [EntityType::Product, EntityType::Category, EntityType::Customer]
            .into_iter()
            .map(|e| (e, n))
            .collect()
    }

    fn dest_counts(n: Option<u64>) -> HashMap<EntityType, Option<u64>> {
        [EntityType::Product, EntityType::Category, EntityType::Customer]
            .into_iter()
            .map(|e| (e, n))
            .collect()
    }

    #[tokio::test]
    async fn test_equal_counts_pass() {
        let v = validator(
            FakeSource {
                counts: all_counts(5),
                products_by_sku: HashMap::new(),
            },
            FakeDestination {
                counts: dest_counts(Some(5)),
                products: Vec::new(),
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.count_check(EntityType::Product).await;
        assert_eq!(check.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn test_partial_counts_warn_with_percentage() {
        let v = validator(
            FakeSource {
                counts: all_counts(10),
                products_by_sku: HashMap::new(),
            },
            FakeDestination {
                counts: dest_counts(Some(4)),
                products: Vec::new(),
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.count_check(EntityType::Product).await;
        assert_eq!(check.status, CheckStatus::Warning);
        assert!(check.detail.contains("40.0%"));
    }

    #[tokio::test]
    async fn test_zero_destination_count_fails() {
        let v = validator(
            FakeSource {
                counts: all_counts(10),
                products_by_sku: HashMap::new(),
            },
            FakeDestination {
                counts: dest_counts(Some(0)),
                products: Vec::new(),
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.count_check(EntityType::Product).await;
        assert_eq!(check.status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn test_missing_aggregate_count_falls_back_to_pagination() {
        let v = validator(
            FakeSource {
                counts: all_counts(2),
                products_by_sku: HashMap::new(),
            },
            FakeDestination {
                counts: dest_counts(None),
                products: vec![json!({"id": 1}), json!({"id": 2})],
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.count_check(EntityType::Product).await;
        assert_eq!(check.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn test_price_check_passes_within_tolerance() {
        let v = validator(
            FakeSource {
                counts: all_counts(1),
                products_by_sku: [("WDG-1".to_string(), json!({"id": 1, "sku": "WDG-1", "price": "19.99"}))]
                    .into_iter()
                    .collect(),
            },
            FakeDestination {
                counts: dest_counts(Some(1)),
                products: vec![json!({"id": 100, "sku": "WDG-1", "price": 19.99})],
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.price_check().await;
        assert_eq!(check.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn test_price_drift_fails_and_names_the_sku() {
        let v = validator(
            FakeSource {
                counts: all_counts(1),
                products_by_sku: [("WDG-1".to_string(), json!({"id": 1, "sku": "WDG-1", "price": "19.99"}))]
                    .into_iter()
                    .collect(),
            },
            FakeDestination {
                counts: dest_counts(Some(1)),
                products: vec![json!({"id": 100, "sku": "WDG-1", "price": 24.99})],
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.price_check().await;
        assert_eq!(check.status, CheckStatus::Fail);
        assert!(check.detail.contains("WDG-1"));
    }

    #[tokio::test]
    async fn test_price_check_skipped_without_comparable_pairs() {
        let v = validator(
            FakeSource {
                counts: all_counts(0),
                products_by_sku: HashMap::new(),
            },
            FakeDestination {
                counts: dest_counts(Some(0)),
                products: vec![json!({"id": 100, "sku": "", "price": 5.0})],
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.price_check().await;
        assert_eq!(check.status, CheckStatus::Skipped);
    }

    #[tokio::test]
    async fn test_image_check_probes_the_thumbnail() {
        let url = "https://cdn.example.com/widget.jpg";
        let v = validator(
            FakeSource {
                counts: all_counts(1),
                products_by_sku: HashMap::new(),
            },
            FakeDestination {
                counts: dest_counts(Some(1)),
                products: vec![json!({
                    "id": 100,
                    "sku": "WDG-1",
                    "images": [
                        {"image_url": "https://cdn.example.com/side.jpg", "is_thumbnail": false},
                        {"image_url": url, "is_thumbnail": true}
                    ]
                })],
            },
            CannedProber {
                reachable: vec![url.to_string()],
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.image_check().await;
        assert_eq!(check.status, CheckStatus::Pass);
    }

    #[tokio::test]
    async fn test_unreachable_images_fail() {
        let v = validator(
            FakeSource {
                counts: all_counts(1),
                products_by_sku: HashMap::new(),
            },
            FakeDestination {
                counts: dest_counts(Some(1)),
                products: vec![json!({
                    "id": 100,
                    "images": [{"image_url": "https://cdn.example.com/gone.jpg", "is_thumbnail": true}]
                })],
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.image_check().await;
        assert_eq!(check.status, CheckStatus::Fail);
    }

    #[tokio::test]
    async fn test_no_images_warns() {
        let v = validator(
            FakeSource {
                counts: all_counts(1),
                products_by_sku: HashMap::new(),
            },
            FakeDestination {
                counts: dest_counts(Some(1)),
                products: vec![json!({"id": 100, "sku": "WDG-1"})],
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let check = v.image_check().await;
        assert_eq!(check.status, CheckStatus::Warning);
    }

    #[tokio::test]
    async fn test_full_battery_is_read_only_and_complete() {
        let v = validator(
            FakeSource {
                counts: all_counts(1),
                products_by_sku: HashMap::new(),
            },
            FakeDestination {
                counts: dest_counts(Some(1)),
                products: Vec::new(),
            },
            CannedProber {
                reachable: Vec::new(),
                probed: Mutex::new(Vec::new()),
            },
        );

        let report = v.run().await;
        // Three count checks plus price and image checks
        assert_eq!(report.checks.len(), 5);
    }
}
