//! Batched peer metadata enrichment.
//!
//! The tracker hands each debounce window's worth of newly-found peers to a
//! [`MetadataResolver`] as a single batch. Resolver failures stay inside the
//! resolver: they are logged and never fed back into tracking state.

use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use reqwest::Client;

use crate::error::CoreError;
use crate::types::PeerSnapshot;

/// Consumer of batched enrichment requests.
///
/// Called at most once per debounce window. The returned future is spawned by
/// the tracker, so a slow resolver never stalls peer tracking.
pub trait MetadataResolver: Send + Sync {
    fn resolve_batch(&self, peers: Vec<PeerSnapshot>) -> BoxFuture<'static, ()>;
}

/// No-op resolver for when enrichment isn't needed.
pub struct NoopResolver;

impl MetadataResolver for NoopResolver {
    fn resolve_batch(&self, _peers: Vec<PeerSnapshot>) -> BoxFuture<'static, ()> {
        async {}.boxed()
    }
}

/// Resolver that POSTs each batch as JSON to a metadata service.
pub struct HttpResolver {
    client: Client,
    endpoint: String,
}

impl HttpResolver {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CoreError::Other(format!("HTTP client error: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl MetadataResolver for HttpResolver {
    fn resolve_batch(&self, peers: Vec<PeerSnapshot>) -> BoxFuture<'static, ()> {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        async move {
            let count = peers.len();
            let body = serde_json::json!({ "peers": peers });

            match client.post(&endpoint).json(&body).send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(count, "metadata batch resolved");
                }
                Ok(response) => {
                    tracing::warn!(count, status = %response.status(), "metadata service rejected batch");
                }
                Err(e) => {
                    tracing::warn!(count, error = %e, "metadata batch request failed");
                }
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_resolver_completes() {
        NoopResolver.resolve_batch(Vec::new()).await;
    }

    #[test]
    fn test_http_resolver_builds() {
        let resolver = HttpResolver::new("http://localhost:9/resolve");
        assert!(resolver.is_ok());
    }

    #[tokio::test]
    async fn test_http_resolver_swallows_failures() {
        // Port 9 (discard) refuses connections; the future must still resolve.
        let resolver = HttpResolver::new("http://127.0.0.1:9/resolve").unwrap();
        resolver.resolve_batch(Vec::new()).await;
    }
}
