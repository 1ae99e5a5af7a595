//! Semaphore coordination client.

use tracing::{Span, debug, field, instrument, warn};

use crate::config::SemaphoreConfig;
use crate::error::{SemaphoreError, SemaphoreResult, StoreError};
use crate::key::SEMAPHORE_KEY;
use crate::record::Semaphore;
use crate::traits::CoordinationStore;
use crate::version::Version;

/// Builder for [`SemaphoreClient`].
pub struct SemaphoreClientBuilder<S> {
    store: Option<S>,
    config: SemaphoreConfig,
}

impl<S: CoordinationStore> SemaphoreClientBuilder<S> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            store: None,
            config: SemaphoreConfig::default(),
        }
    }

    /// Sets the coordination store the client talks to.
    pub fn store(mut self, store: S) -> Self {
        self.store = Some(store);
        self
    }

    /// Sets the capacity used when the record is first created.
    pub fn max_holders(mut self, max_holders: u32) -> Self {
        self.config.max_holders = max_holders;
        self
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, config: SemaphoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if no store was given or the capacity is zero.
    pub fn build(self) -> SemaphoreResult<SemaphoreClient<S>> {
        let store = self
            .store
            .ok_or_else(|| SemaphoreError::InvalidInput("store not specified".to_string()))?;

        if self.config.max_holders == 0 {
            return Err(SemaphoreError::InvalidInput(
                "max_holders must be at least 1".to_string(),
            ));
        }

        Ok(SemaphoreClient::with_config(store, self.config))
    }
}

impl<S: CoordinationStore> Default for SemaphoreClientBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads and conditionally rewrites the shared semaphore record.
///
/// The client holds no state besides its store and configuration. Each
/// update cycle is `fetch` → modify → `commit_update`; when the commit fails
/// with [`SemaphoreError::Conflict`] the caller fetches again and recomputes.
///
/// # Example
///
/// ```rust,ignore
/// let client = SemaphoreClient::builder().store(store).max_holders(3).build()?;
/// client.initialize().await?;
///
/// loop {
///     let mut sem = client.fetch().await?;
///     sem.holders.push("node-A".to_string());
///     match client.commit_update(&sem).await {
///         Ok(_) => break,
///         Err(e) if e.is_conflict() => continue,
///         Err(e) => return Err(e),
///     }
/// }
/// ```
pub struct SemaphoreClient<S> {
    store: S,
    config: SemaphoreConfig,
}

impl<S: CoordinationStore> SemaphoreClient<S> {
    /// Returns a new builder for configuring the client.
    pub fn builder() -> SemaphoreClientBuilder<S> {
        SemaphoreClientBuilder::new()
    }

    /// Creates a client with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, SemaphoreConfig::default())
    }

    /// Creates a client with an explicit configuration.
    pub fn with_config(store: S, config: SemaphoreConfig) -> Self {
        Self { store, config }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &SemaphoreConfig {
        &self.config
    }

    /// Returns the key the semaphore record lives at.
    pub fn key(&self) -> &'static str {
        SEMAPHORE_KEY
    }

    /// Creates the semaphore record unless it already exists.
    ///
    /// Safe to call on every startup and from many nodes at once. Returns
    /// `true` if this call created the record and `false` if it was already
    /// there; both are success.
    #[instrument(
        skip(self),
        fields(
            semaphore.key = SEMAPHORE_KEY,
            max_holders = self.config.max_holders,
            created = field::Empty,
            already_exists = field::Empty,
        )
    )]
    pub async fn initialize(&self) -> SemaphoreResult<bool> {
        let payload = Semaphore::new(self.config.max_holders).to_payload()?;

        match self.store.create_if_absent(SEMAPHORE_KEY, &payload).await {
            Ok(version) => {
                Span::current().record("created", true);
                Span::current().record("already_exists", false);
                debug!(%version, "created semaphore record");
                Ok(true)
            }
            Err(StoreError::AlreadyExists { .. }) => {
                Span::current().record("created", false);
                Span::current().record("already_exists", true);
                debug!("semaphore record already exists");
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reads the current record and tags it with its version.
    ///
    /// # Errors
    ///
    /// * `NotInitialized` - the record does not exist; call `initialize` first
    /// * `Decode` - the stored payload is not a valid record
    /// * `Store` - the store could not be reached or failed
    #[instrument(skip(self), fields(semaphore.key = SEMAPHORE_KEY, version = field::Empty))]
    pub async fn fetch(&self) -> SemaphoreResult<Semaphore> {
        let stored = self.store.read(SEMAPHORE_KEY).await?;
        Span::current().record("version", stored.version.get());

        Semaphore::from_payload(&stored.payload, stored.version)
    }

    /// Writes `semaphore` back if the record is still at the version it
    /// was fetched at. Returns the new version.
    ///
    /// Never retries. On `Conflict` the stored record is untouched and the
    /// caller must fetch again.
    ///
    /// # Errors
    ///
    /// * `InvalidInput` - the record carries no version (it was never
    ///   fetched); rejected before any store I/O
    /// * `Conflict` - someone else wrote the record first
    /// * `Encode` - the record could not be serialized
    /// * `Store` - the store could not be reached or failed; the write may
    ///   or may not have happened
    #[instrument(
        skip(self, semaphore),
        fields(
            semaphore.key = SEMAPHORE_KEY,
            version = field::Empty,
            new_version = field::Empty,
            conflict = field::Empty,
        )
    )]
    pub async fn commit_update(&self, semaphore: &Semaphore) -> SemaphoreResult<Version> {
        let expected = semaphore.version().ok_or_else(|| {
            SemaphoreError::InvalidInput(
                "semaphore has no version; fetch it before committing".to_string(),
            )
        })?;
        Span::current().record("version", expected.get());

        let payload = semaphore.to_payload()?;

        match self
            .store
            .conditional_replace(SEMAPHORE_KEY, &payload, expected)
            .await
        {
            Ok(version) => {
                Span::current().record("conflict", false);
                Span::current().record("new_version", version.get());
                debug!(%version, holders = semaphore.holders.len(), "committed semaphore update");
                Ok(version)
            }
            Err(e) => {
                let err = SemaphoreError::from(e);
                if err.is_conflict() {
                    Span::current().record("conflict", true);
                    warn!(%expected, "semaphore changed since fetch");
                }
                Err(err)
            }
        }
    }
}
