//! etcd store configuration.

use std::time::Duration;

use rebootlock_core::client::SemaphoreClient;
use rebootlock_core::error::{SemaphoreResult, StoreError, StoreResult};
use reqwest::Url;
use tracing::instrument;

use crate::store::EtcdStore;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Builder for [`EtcdStore`].
pub struct EtcdStoreBuilder {
    endpoints: Vec<String>,
    namespace: Option<String>,
    timeout: Duration,
    client: Option<reqwest::Client>,
}

impl EtcdStoreBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            endpoints: vec![],
            namespace: None,
            timeout: DEFAULT_TIMEOUT,
            client: None,
        }
    }

    /// Adds an etcd endpoint, e.g. `http://127.0.0.1:2379`.
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoints.push(url.into());
        self
    }

    /// Adds multiple etcd endpoints. They are tried in the given order.
    pub fn endpoints(mut self, urls: &[impl AsRef<str>]) -> Self {
        for url in urls {
            self.endpoints.push(url.as_ref().to_string());
        }
        self
    }

    /// Prepends `namespace` to every key the store touches.
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Sets the per-request timeout.
    ///
    /// Ignored when an explicit client is supplied with [`client`](Self::client).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Uses an existing HTTP client.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the store. No connection is made until the first request.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if no endpoints were given or an endpoint is
    /// not an absolute `http`/`https` URL.
    pub fn build(self) -> StoreResult<EtcdStore> {
        if self.endpoints.is_empty() {
            return Err(StoreError::InvalidConfig(
                "no etcd endpoints provided".to_string(),
            ));
        }

        let endpoints = self
            .endpoints
            .iter()
            .map(|raw| parse_endpoint(raw))
            .collect::<StoreResult<Vec<_>>>()?;

        let http = match self.client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .timeout(self.timeout)
                .build()
                .map_err(|e| {
                    StoreError::InvalidConfig(format!("failed to build HTTP client: {e}"))
                })?,
        };

        let namespace = self
            .namespace
            .map(|ns| ns.trim_matches('/').to_string())
            .filter(|ns| !ns.is_empty());

        Ok(EtcdStore::from_parts(endpoints, namespace, http))
    }
}

impl Default for EtcdStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_endpoint(raw: &str) -> StoreResult<Url> {
    let url = Url::parse(raw)
        .map_err(|e| StoreError::InvalidConfig(format!("invalid etcd endpoint {raw:?}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(StoreError::InvalidConfig(format!(
            "etcd endpoint must be an http(s) URL: {raw:?}"
        )));
    }

    Ok(url)
}

/// Connects to etcd and makes sure the semaphore record exists.
///
/// `max_holders` only matters if this call ends up creating the record.
#[instrument(skip(endpoints), fields(backend = "etcd"))]
pub async fn connect(
    endpoints: &[impl AsRef<str>],
    max_holders: u32,
) -> SemaphoreResult<SemaphoreClient<EtcdStore>> {
    let store = EtcdStore::builder().endpoints(endpoints).build()?;
    let client = SemaphoreClient::builder()
        .store(store)
        .max_holders(max_holders)
        .build()?;

    client.initialize().await?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_requires_endpoint() {
        let err = EtcdStoreBuilder::new().build().unwrap_err();
        assert!(matches!(err, StoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_build_rejects_bad_endpoints() {
        for raw in ["localhost:2379", "not a url", "unix:/var/run/etcd.sock", "mailto:ops@example.com"] {
            let err = EtcdStore::builder().endpoint(raw).build().unwrap_err();
            assert!(matches!(err, StoreError::InvalidConfig(_)), "{raw} should be rejected");
        }
    }

    #[test]
    fn test_build_keeps_endpoint_order() {
        let store = EtcdStore::builder()
            .endpoint("http://10.0.0.2:2379")
            .endpoints(&["http://10.0.0.1:2379", "https://10.0.0.3:2379"])
            .build()
            .unwrap();
        let hosts: Vec<_> = store
            .endpoints()
            .iter()
            .map(|u| u.host_str().unwrap_or_default().to_string())
            .collect();
        assert_eq!(hosts, vec!["10.0.0.2", "10.0.0.1", "10.0.0.3"]);
    }

    #[test]
    fn test_namespace_is_normalized() {
        let store = EtcdStore::builder()
            .endpoint("http://127.0.0.1:2379")
            .namespace("/tenant-a/")
            .build()
            .unwrap();
        assert_eq!(store.namespace(), Some("tenant-a"));

        let store = EtcdStore::builder()
            .endpoint("http://127.0.0.1:2379")
            .namespace("/")
            .build()
            .unwrap();
        assert_eq!(store.namespace(), None);
    }

    #[tokio::test]
    async fn test_connect_rejects_zero_capacity_before_io() {
        let Err(err) = connect(&["http://127.0.0.1:9"], 0).await else {
            panic!("zero capacity should be rejected");
        };
        assert!(matches!(
            err,
            rebootlock_core::error::SemaphoreError::InvalidInput(_)
        ));
    }
}
