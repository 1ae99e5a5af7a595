//! etcd-backed coordination store.

use rebootlock_core::error::{StoreError, StoreResult};
use rebootlock_core::traits::{CoordinationStore, StoredValue};
use rebootlock_core::version::Version;
use reqwest::{RequestBuilder, StatusCode, Url};
use tracing::{Span, debug, field, instrument, warn};

use crate::errors::{EtcdError, to_store_error};
use crate::provider::EtcdStoreBuilder;
use crate::response::{KeysResponse, Node};

/// A [`CoordinationStore`] backed by the etcd v2 keys API.
///
/// Endpoints are tried in order. The next endpoint is only tried when the
/// connection to the current one could not be established; once a request
/// has been sent, its failure is returned as-is because a write may already
/// have been applied.
#[derive(Debug, Clone)]
pub struct EtcdStore {
    /// Cluster members, validated at build time.
    endpoints: Vec<Url>,
    /// Optional root prepended to every key.
    namespace: Option<String>,
    /// Shared HTTP client (carries the request timeout).
    http: reqwest::Client,
}

impl EtcdStore {
    /// Returns a new builder for configuring the store.
    pub fn builder() -> EtcdStoreBuilder {
        EtcdStoreBuilder::new()
    }

    pub(crate) fn from_parts(
        endpoints: Vec<Url>,
        namespace: Option<String>,
        http: reqwest::Client,
    ) -> Self {
        Self {
            endpoints,
            namespace,
            http,
        }
    }

    /// Returns the configured endpoints.
    pub fn endpoints(&self) -> &[Url] {
        &self.endpoints
    }

    /// Returns the key namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Builds the `/v2/keys/...` URL for `key` on `endpoint`.
    fn key_url(&self, endpoint: &Url, key: &str) -> StoreResult<Url> {
        let mut url = endpoint.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                StoreError::InvalidConfig(format!("endpoint cannot be a base URL: {endpoint}"))
            })?;
            segments.pop_if_empty().push("v2").push("keys");

            let parts = self
                .namespace
                .iter()
                .flat_map(|ns| ns.split('/'))
                .chain(key.split('/'))
                .filter(|part| !part.is_empty());
            for part in parts {
                segments.push(part);
            }
        }
        Ok(url)
    }

    /// Sends a request for `key`, failing over between endpoints only on
    /// connection errors. Returns the status and raw body.
    async fn send<F>(&self, key: &str, build: F) -> StoreResult<(StatusCode, String)>
    where
        F: Fn(Url) -> RequestBuilder + Send + Sync,
    {
        let mut last_error = None;

        for endpoint in &self.endpoints {
            let url = self.key_url(endpoint, key)?;

            match build(url).send().await {
                Ok(response) => {
                    let status = response.status();
                    let body = response
                        .text()
                        .await
                        .map_err(|e| StoreError::Transport(Box::new(e)))?;
                    return Ok((status, body));
                }
                Err(e) if e.is_connect() => {
                    warn!(endpoint = %endpoint, error = %e, "etcd endpoint unreachable, trying next");
                    last_error = Some(e);
                }
                Err(e) => return Err(StoreError::Transport(Box::new(e))),
            }
        }

        match last_error {
            Some(e) => Err(StoreError::Transport(Box::new(e))),
            None => Err(StoreError::InvalidConfig("no etcd endpoints configured".to_string())),
        }
    }
}

/// Parses a successful keys response.
fn parse_node(status: StatusCode, body: &str) -> StoreResult<Node> {
    serde_json::from_str::<KeysResponse>(body)
        .map(|response| response.node)
        .map_err(|_| {
            StoreError::Backend(Box::new(EtcdError::UnexpectedResponse {
                status: status.as_u16(),
                body: body.to_string(),
            }))
        })
}

impl CoordinationStore for EtcdStore {
    #[instrument(skip(self, payload), fields(key = %key, backend = "etcd", version = field::Empty))]
    async fn create_if_absent(&self, key: &str, payload: &str) -> StoreResult<Version> {
        let (status, body) = self
            .send(key, |url| {
                self.http
                    .put(url)
                    .query(&[("prevExist", "false")])
                    .form(&[("value", payload)])
            })
            .await?;

        if !status.is_success() {
            return Err(to_store_error(status, &body, key, None));
        }

        let version = Version::new(parse_node(status, &body)?.modified_index);
        Span::current().record("version", version.get());
        debug!(%version, "created key");
        Ok(version)
    }

    #[instrument(skip(self), fields(key = %key, backend = "etcd", version = field::Empty))]
    async fn read(&self, key: &str) -> StoreResult<StoredValue> {
        let (status, body) = self
            .send(key, |url| self.http.get(url).query(&[("quorum", "true")]))
            .await?;

        if !status.is_success() {
            return Err(to_store_error(status, &body, key, None));
        }

        let node = parse_node(status, &body)?;
        let version = Version::new(node.modified_index);
        Span::current().record("version", version.get());

        match node.value {
            Some(payload) if !node.dir => Ok(StoredValue { payload, version }),
            _ => Err(StoreError::Backend(Box::new(EtcdError::NotAValue(node.key)))),
        }
    }

    #[instrument(
        skip(self, payload),
        fields(key = %key, backend = "etcd", expected = expected.get(), version = field::Empty)
    )]
    async fn conditional_replace(
        &self,
        key: &str,
        payload: &str,
        expected: Version,
    ) -> StoreResult<Version> {
        let prev_index = expected.get().to_string();
        let (status, body) = self
            .send(key, |url| {
                self.http
                    .put(url)
                    .query(&[("prevIndex", prev_index.as_str())])
                    .form(&[("value", payload)])
            })
            .await?;

        if !status.is_success() {
            return Err(to_store_error(status, &body, key, Some(expected)));
        }

        let version = Version::new(parse_node(status, &body)?.modified_index);
        Span::current().record("version", version.get());
        debug!(%expected, %version, "replaced key");
        Ok(version)
    }
}
