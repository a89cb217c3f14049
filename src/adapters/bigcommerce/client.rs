//! BigCommerce REST API client
//!
//! Write/lookup client over the BigCommerce Store API. Catalog entities
//! and customers go through the v3 API (enveloped responses); orders go
//! through the v2 API (bare responses). Authenticates with the store's
//! access token and implements the [`DestinationClient`] trait.

use crate::adapters::traits::{DestinationClient, Filters, ListPage};
use crate::config::BigCommerceConfig;
use crate::domain::{BigCommerceError, EntityType, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, Method, StatusCode};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// Default BigCommerce API gateway
const DEFAULT_API_BASE: &str = "https://api.bigcommerce.com";

/// BigCommerce REST API client
pub struct BigCommerceClient {
    store_url: String,
    client: Client,
    config: BigCommerceConfig,
}

impl BigCommerceClient {
    /// Create a new client against the public BigCommerce gateway
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: BigCommerceConfig) -> Result<Self> {
        Self::with_api_base(config, DEFAULT_API_BASE)
    }

    /// Create a new client against a custom API gateway
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn with_api_base(config: BigCommerceConfig, api_base: &str) -> Result<Self> {
        let store_url = format!(
            "{}/stores/{}",
            api_base.trim_end_matches('/'),
            config.store_hash
        );

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| BigCommerceError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            store_url,
            client,
            config,
        })
    }

    /// API path for an entity type; orders live on the v2 API
    fn destination_path(entity: EntityType) -> &'static str {
        match entity {
            EntityType::Category => "v3/catalog/categories",
            EntityType::Product => "v3/catalog/products",
            EntityType::Customer => "v3/customers",
            EntityType::Order => "v2/orders",
        }
    }

    /// Whether responses for this entity arrive in the v3 `data` envelope
    fn enveloped(entity: EntityType) -> bool {
        entity != EntityType::Order
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: Option<&Value>,
    ) -> Result<reqwest::Response> {
        let url = format!("{}/{path}", self.store_url);

        let mut request = self
            .client
            .request(method, &url)
            .header("X-Auth-Token", self.config.access_token.expose_secret().as_ref())
            .header("Accept", "application/json")
            .query(query);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                BigCommerceError::Timeout(url.clone())
            } else {
                BigCommerceError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let retry_after = response
            .headers()
            .get("X-Rate-Limit-Time-Reset-Ms")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let message = response.text().await.unwrap_or_default();

        let err = match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                BigCommerceError::AuthenticationFailed(message)
            }
            StatusCode::TOO_MANY_REQUESTS => BigCommerceError::RateLimited(
                retry_after.unwrap_or_else(|| "unknown".to_string()),
            ),
            s if s.is_server_error() => BigCommerceError::ServerError {
                status: s.as_u16(),
                message,
            },
            _ => BigCommerceError::QueryFailed(format!("{status}: {message}")),
        };
        Err(err.into())
    }

    /// Parses a list response body, unwrapping the v3 envelope when present
    fn parse_list(entity: EntityType, body: Value) -> Result<ListPage> {
        if Self::enveloped(entity) {
            let total = body
                .pointer("/meta/pagination/total")
                .and_then(Value::as_u64);
            let items = match body.get("data") {
                Some(Value::Array(items)) => items.clone(),
                _ => {
                    return Err(BigCommerceError::DeserializationFailed(
                        "Missing data array in response".to_string(),
                    )
                    .into())
                }
            };
            Ok(ListPage { items, total })
        } else {
            match body {
                Value::Array(items) => Ok(ListPage { items, total: None }),
                Value::Null => Ok(ListPage::default()),
                other => Err(BigCommerceError::DeserializationFailed(format!(
                    "Expected array response, got {other}"
                ))
                .into()),
            }
        }
    }
}

#[async_trait]
impl DestinationClient for BigCommerceClient {
    async fn create(&self, entity: EntityType, payload: &Value) -> Result<Value> {
        let path = Self::destination_path(entity);
        let response = self
            .request(Method::POST, path, &[], Some(payload))
            .await
            .map_err(|e| {
                crate::domain::CaravanError::BigCommerce(BigCommerceError::CreateFailed {
                    entity: entity.to_string(),
                    message: e.to_string(),
                })
            })?;

        let body: Value = response
            .json()
            .await
            .map_err(|e| BigCommerceError::DeserializationFailed(e.to_string()))?;

        let created = if Self::enveloped(entity) {
            body.get("data").cloned().ok_or_else(|| {
                BigCommerceError::DeserializationFailed(
                    "Missing data object in create response".to_string(),
                )
            })?
        } else {
            body
        };

        tracing::debug!(entity = %entity, "Created destination record");
        Ok(created)
    }

    async fn list(
        &self,
        entity: EntityType,
        filters: &Filters,
        page: u32,
        limit: u32,
    ) -> Result<ListPage> {
        let mut query = vec![
            ("page".to_string(), page.to_string()),
            ("limit".to_string(), limit.to_string()),
        ];
        for (key, value) in filters {
            // The v3 customers API filters email through `email:in`
            let key = if entity == EntityType::Customer && key == "email" {
                "email:in".to_string()
            } else {
                key.clone()
            };
            query.push((key, value.clone()));
        }

        let response = self
            .request(Method::GET, Self::destination_path(entity), &query, None)
            .await?;

        // The v2 orders API answers an empty collection with 204 No Content
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(ListPage::default());
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| BigCommerceError::DeserializationFailed(e.to_string()))?;
        Self::parse_list(entity, body)
    }

    async fn count(&self, entity: EntityType) -> Result<Option<u64>> {
        if Self::enveloped(entity) {
            let page = self.list(entity, &[], 1, 1).await?;
            return Ok(page.total);
        }

        // v2 orders expose a dedicated count endpoint
        let response = self
            .request(Method::GET, "v2/orders/count", &[], None)
            .await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| BigCommerceError::DeserializationFailed(e.to_string()))?;
        Ok(body.get("count").and_then(Value::as_u64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;
    use serde_json::json;

    fn test_client(server_url: &str) -> BigCommerceClient {
        let config = BigCommerceConfig {
            store_hash: "abc123".to_string(),
            access_token: secret_string("token-xyz".to_string()),
            timeout_seconds: 5,
        };
        BigCommerceClient::with_api_base(config, server_url).unwrap()
    }

    #[tokio::test]
    async fn test_create_product_unwraps_envelope() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/stores/abc123/v3/catalog/products")
            .match_header("X-Auth-Token", "token-xyz")
            .with_status(200)
            .with_body(r#"{"data": {"id": 901, "sku": "wc-1"}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let created = client
            .create(EntityType::Product, &json!({"name": "Widget"}))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(created["id"], 901);
    }

    #[tokio::test]
    async fn test_create_order_returns_bare_object() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/stores/abc123/v2/orders")
            .with_status(201)
            .with_body(r#"{"id": 55, "external_id": "wc-order-9"}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let created = client
            .create(EntityType::Order, &json!({"status_id": 1}))
            .await
            .unwrap();
        assert_eq!(created["id"], 55);
    }

    #[tokio::test]
    async fn test_list_reads_pagination_total() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stores/abc123/v3/catalog/products")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("sku".into(), "WDG-1".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"data": [{"id": 901, "sku": "WDG-1"}], "meta": {"pagination": {"total": 42}}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let filters = [("sku".to_string(), "WDG-1".to_string())];
        let page = client
            .list(EntityType::Product, &filters, 1, 1)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, Some(42));
    }

    #[tokio::test]
    async fn test_customer_email_filter_uses_email_in() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stores/abc123/v3/customers")
            .match_query(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("email:in".into(), "ada@example.com".into()),
                mockito::Matcher::UrlEncoded("limit".into(), "1".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"data": [{"id": 12, "email": "ada@example.com"}], "meta": {"pagination": {"total": 1}}}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let filters = [("email".to_string(), "ada@example.com".to_string())];
        let page = client
            .list(EntityType::Customer, &filters, 1, 1)
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0]["id"], 12);
    }

    #[tokio::test]
    async fn test_empty_order_list_is_no_content() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stores/abc123/v2/orders")
            .match_query(mockito::Matcher::Any)
            .with_status(204)
            .create_async()
            .await;

        let client = test_client(&server.url());
        let page = client.list(EntityType::Order, &[], 1, 1).await.unwrap();
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_order_count_endpoint() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stores/abc123/v2/orders/count")
            .with_status(200)
            .with_body(r#"{"count": 17}"#)
            .create_async()
            .await;

        let client = test_client(&server.url());
        assert_eq!(client.count(EntityType::Order).await.unwrap(), Some(17));
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_rate_limited_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/stores/abc123/v3/catalog/products")
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_header("X-Rate-Limit-Time-Reset-Ms", "30000")
            .create_async()
            .await;

        let client = test_client(&server.url());
        let err = client.list(EntityType::Product, &[], 1, 1).await.unwrap_err();
        assert!(err.to_string().contains("Rate limit"));
        assert!(err.to_string().contains("30000"));
    }
}
