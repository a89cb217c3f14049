//! WooCommerce REST API client
//!
//! Read-only client over the WooCommerce REST API v3. Authenticates with
//! the store's consumer key/secret via HTTP Basic auth and implements the
//! [`SourceClient`] trait the migration core consumes.

use crate::adapters::traits::{Filters, SourceClient};
use crate::config::WooCommerceConfig;
use crate::domain::{EntityType, Result, SourceVariation, WooCommerceError};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// Header WooCommerce uses to report the total collection size
const TOTAL_HEADER: &str = "X-WP-Total";

/// Page size used when exhausting a product's variation list
const VARIATIONS_PER_PAGE: u32 = 100;

/// WooCommerce REST API client
pub struct WooCommerceClient {
    base_url: String,
    client: Client,
    config: WooCommerceConfig,
}

impl WooCommerceClient {
    /// Create a new client from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: WooCommerceConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| WooCommerceError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            base_url,
            client,
            config,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/wp-json/wc/v3/{path}", self.base_url)
    }

    /// Sends a GET request and returns the raw response
    async fn get(&self, path: &str, query: &[(String, String)]) -> Result<reqwest::Response> {
        let url = self.endpoint(path);

        let response = self
            .client
            .get(&url)
            .basic_auth(
                self.config.consumer_key.expose_secret().as_ref(),
                Some(self.config.consumer_secret.expose_secret().as_ref()),
            )
            .query(query)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    WooCommerceError::Timeout(url.clone())
                } else {
                    WooCommerceError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        let err = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                WooCommerceError::AuthenticationFailed(message)
            }
            StatusCode::NOT_FOUND => WooCommerceError::NotFound(url),
            s if s.is_server_error() => WooCommerceError::ServerError {
                status: s.as_u16(),
                message,
            },
            s => WooCommerceError::ClientError {
                status: s.as_u16(),
                message,
            },
        };
        Err(err.into())
    }

    /// Fetches every variation of a product, paginating to exhaustion
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached or a page fails
    /// to parse.
    pub async fn fetch_all_variations(&self, product_id: u64) -> Result<Vec<SourceVariation>> {
        let path = format!("products/{product_id}/variations");
        let mut variations = Vec::new();

        for page in 1.. {
            let query = vec![
                ("page".to_string(), page.to_string()),
                ("per_page".to_string(), VARIATIONS_PER_PAGE.to_string()),
            ];
            let batch: Vec<SourceVariation> = self
                .get(&path, &query)
                .await?
                .json()
                .await
                .map_err(|e| WooCommerceError::InvalidResponse(e.to_string()))?;

            if batch.is_empty() {
                break;
            }
            let len = batch.len();
            variations.extend(batch);
            if len < VARIATIONS_PER_PAGE as usize {
                break;
            }
        }

        tracing::debug!(product_id, count = variations.len(), "Fetched variations");
        Ok(variations)
    }
}

#[async_trait]
impl SourceClient for WooCommerceClient {
    async fn fetch_page(
        &self,
        entity: EntityType,
        page: u32,
        per_page: u32,
        filters: &Filters,
    ) -> Result<Vec<Value>> {
        let mut query = vec![
            ("page".to_string(), page.to_string()),
            ("per_page".to_string(), per_page.to_string()),
        ];
        query.extend(filters.iter().cloned());

        let items: Vec<Value> = self
            .get(entity.source_path(), &query)
            .await?
            .json()
            .await
            .map_err(|e| WooCommerceError::InvalidResponse(e.to_string()))?;

        tracing::debug!(entity = %entity, page, count = items.len(), "Fetched source page");
        Ok(items)
    }

    async fn count(&self, entity: EntityType) -> Result<u64> {
        let query = vec![
            ("page".to_string(), "1".to_string()),
            ("per_page".to_string(), "1".to_string()),
        ];
        let response = self.get(entity.source_path(), &query).await?;

        let total = response
            .headers()
            .get(TOTAL_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| {
                WooCommerceError::InvalidResponse(format!(
                    "Missing or malformed {TOTAL_HEADER} header"
                ))
            })?;
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn test_config(base_url: &str) -> WooCommerceConfig {
        WooCommerceConfig {
            base_url: base_url.to_string(),
            consumer_key: secret_string("ck_test".to_string()),
            consumer_secret: secret_string("cs_test".to_string()),
            timeout_seconds: 5,
        }
    }

    #[tokio::test]
    async fn test_fetch_page_parses_items() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/wp-json/wc/v3/products")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("page".into(), "1".into()),
                mockito::Matcher::UrlEncoded("per_page".into(), "50".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "name": "Widget"}, {"id": 2, "name": "Gadget"}]"#)
            .create_async()
            .await;

        let client = WooCommerceClient::new(test_config(&server.url())).unwrap();
        let items = client
            .fetch_page(EntityType::Product, 1, 50, &[])
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(items.len(), 2);
        assert_eq!(items[0]["id"], 1);
    }

    #[tokio::test]
    async fn test_count_reads_total_header() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/wp-json/wc/v3/orders")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header(TOTAL_HEADER, "137")
            .with_body("[]")
            .create_async()
            .await;

        let client = WooCommerceClient::new(test_config(&server.url())).unwrap();
        assert_eq!(client.count(EntityType::Order).await.unwrap(), 137);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_to_authentication_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/wp-json/wc/v3/products")
            .match_query(mockito::Matcher::Any)
            .with_status(401)
            .with_body(r#"{"code": "woocommerce_rest_cannot_view"}"#)
            .create_async()
            .await;

        let client = WooCommerceClient::new(test_config(&server.url())).unwrap();
        let err = client
            .fetch_page(EntityType::Product, 1, 50, &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Authentication failed"));
    }

    #[tokio::test]
    async fn test_fetch_all_variations_paginates() {
        let mut server = mockito::Server::new_async().await;
        let _page1 = server
            .mock("GET", "/wp-json/wc/v3/products/7/variations")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(r#"[{"id": 71, "sku": "W-7-S", "price": "9.99", "attributes": []}]"#)
            .create_async()
            .await;

        let client = WooCommerceClient::new(test_config(&server.url())).unwrap();
        let variations = client.fetch_all_variations(7).await.unwrap();
        assert_eq!(variations.len(), 1);
        assert_eq!(variations[0].id, 71);
    }

    #[tokio::test]
    async fn test_filters_are_forwarded_as_query_params() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/wp-json/wc/v3/products")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("sku".into(), "WDG-1".into()),
                mockito::Matcher::UrlEncoded("page".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = WooCommerceClient::new(test_config(&server.url())).unwrap();
        let filters = [("sku".to_string(), "WDG-1".to_string())];
        client
            .fetch_page(EntityType::Product, 1, 1, &filters)
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
