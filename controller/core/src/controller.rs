//! Application Controller - Boot Sequencing and Shared State
//!
//! The controller owns the key-value store and the `initialized` flag, and
//! composes every other component. Construction returns immediately; the boot
//! sequence runs on a spawned task:
//!
//! ```text
//! new() ──spawn──► load resources ──► store loadTime
//!                        │
//!                        ▼
//!              ready gate: enhance UI + attach form
//!                        │
//!                        ▼
//!              ready gate: start scroll reveal
//!                        │
//!                        ▼
//!              log performance metrics ──► initialized = true
//! ```
//!
//! # Design Philosophy
//!
//! The host owns the controller. There is no global instance: whoever builds
//! the page builds the controller and keeps it alive. Everything the host may
//! or may not provide (visibility observation, performance timing, the remote
//! endpoint, the resource loader) is injected through [`HostEnvironment`].
//!
//! Store access never depends on boot progress; `get_data`/`set_data` work
//! right after construction.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tokio::task::JoinHandle;

use crate::backend::TextProcessor;
use crate::capabilities::Capabilities;
use crate::config::ControllerConfig;
use crate::dom::PageHandle;
use crate::enhancer::UiEnhancer;
use crate::error::ControllerError;
use crate::metrics::PerformanceMetrics;
use crate::observer::ScrollVisibilityObserver;
use crate::ready::continuation;
use crate::resources::{ResourceLoader, SimulatedResourceLoader, LOAD_TIME_KEY};
use crate::store::DataStore;
use crate::text_client::TextProcessingClient;

/// Marker field added by [`ApplicationController::process_data`]
pub const PROCESSED_KEY: &str = "processed";

// ============================================================================
// State
// ============================================================================

/// State shared between the controller and its boot task
#[derive(Debug, Default)]
pub struct ApplicationState {
    initialized: AtomicBool,
    store: RwLock<DataStore>,
}

impl ApplicationState {
    /// Whether boot has completed
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::SeqCst);
    }
}

/// Everything the host provides
#[derive(Clone)]
pub struct HostEnvironment {
    /// The page being enhanced
    pub page: PageHandle,
    /// Optional host capabilities
    pub capabilities: Capabilities,
    /// Remote text-processing backend
    pub processor: Arc<dyn TextProcessor>,
    /// Boot resource loader; `None` uses the simulated loader
    pub loader: Option<Arc<dyn ResourceLoader>>,
}

impl HostEnvironment {
    /// Host with no optional capabilities and the simulated loader
    pub fn new(page: PageHandle, processor: Arc<dyn TextProcessor>) -> Self {
        Self {
            page,
            capabilities: Capabilities::none(),
            processor,
            loader: None,
        }
    }

    /// Set the host capabilities
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Set the resource loader
    #[must_use]
    pub fn with_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.loader = Some(loader);
        self
    }
}

/// Input and output of [`ApplicationController::process_data`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataPayload {
    /// A sequence of records
    Many(Vec<Map<String, Value>>),
    /// A single record
    One(Map<String, Value>),
}

impl DataPayload {
    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Many(records) => records.len(),
            Self::One(_) => 1,
        }
    }

    /// True for an empty sequence
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ============================================================================
// Controller
// ============================================================================

/// The application controller
pub struct ApplicationController {
    state: Arc<ApplicationState>,
    page: PageHandle,
    config: ControllerConfig,
    boot: Option<JoinHandle<Result<(), ControllerError>>>,
}

impl ApplicationController {
    /// Create the controller and spawn its boot task
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn new(host: HostEnvironment, config: ControllerConfig) -> Self {
        let state = Arc::new(ApplicationState::default());
        let page = host.page.clone();

        tracing::debug!(
            backend = host.processor.name(),
            visibility = host.capabilities.visibility.name(),
            "Spawning boot task"
        );
        let boot = tokio::spawn(Self::init(Arc::clone(&state), host, config.clone()));

        Self {
            state,
            page,
            config,
            boot: Some(boot),
        }
    }

    /// The boot sequence
    async fn init(
        state: Arc<ApplicationState>,
        host: HostEnvironment,
        config: ControllerConfig,
    ) -> Result<(), ControllerError> {
        let loader = host.loader.unwrap_or_else(|| {
            Arc::new(SimulatedResourceLoader::new(
                config.timing.resource_load_delay(),
            ))
        });
        let loaded = match loader.load().await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!(error = %e, "Boot aborted");
                return Err(e);
            }
        };
        state.store.write().set(LOAD_TIME_KEY, loaded.load_time_ms);
        tracing::debug!(load_time_ms = loaded.load_time_ms, "Resources loaded");

        let enhancer = UiEnhancer::new(config.selectors.clone(), &config.timing);
        let client = TextProcessingClient::new(host.processor, config.selectors.clone());
        host.page.when_ready(continuation(move |page| {
            enhancer.enhance(page);
            client.attach(page);
        }));

        let observer = ScrollVisibilityObserver::new(config.reveal, config.selectors);
        let provider = Arc::clone(&host.capabilities.visibility);
        host.page.when_ready(continuation(move |page| {
            observer.start(page, provider.as_ref());
        }));

        PerformanceMetrics::log(host.capabilities.performance.as_ref());

        state.mark_initialized();
        tracing::info!("Application initialized");
        Ok(())
    }

    /// Wait for the boot task
    ///
    /// Only the first call observes the boot result; later calls succeed if
    /// boot succeeded.
    ///
    /// # Errors
    ///
    /// Returns the boot error, [`ControllerError::BootTask`] if the task
    /// panicked, or [`ControllerError::BootAlreadyAwaited`] when a previous
    /// call already consumed a failed result.
    pub async fn wait_for_boot(&mut self) -> Result<(), ControllerError> {
        match self.boot.take() {
            Some(handle) => handle.await?,
            None if self.is_initialized() => Ok(()),
            None => Err(ControllerError::BootAlreadyAwaited),
        }
    }

    /// Whether boot has completed
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.state.is_initialized()
    }

    /// Read a store value
    #[must_use]
    pub fn get_data(&self, key: &str) -> Option<Value> {
        self.state.store.read().get(key)
    }

    /// Write a store value; returns `self` for chaining
    pub fn set_data(&self, key: impl Into<String>, value: impl Into<Value>) -> &Self {
        self.state.store.write().set(key, value);
        self
    }

    /// Copy of every store entry
    #[must_use]
    pub fn store_snapshot(&self) -> Map<String, Value> {
        self.state.store.read().snapshot()
    }

    /// Mark records as processed after a simulated delay
    ///
    /// Returns shallow copies with `processed: true`; the input is untouched.
    pub async fn process_data(&self, data: &DataPayload) -> DataPayload {
        tokio::time::sleep(self.config.timing.process_data_delay()).await;
        let processed = match data {
            DataPayload::Many(records) => {
                DataPayload::Many(records.iter().map(mark_processed).collect())
            }
            DataPayload::One(record) => DataPayload::One(mark_processed(record)),
        };
        tracing::debug!(records = processed.len(), "Data processed");
        processed
    }

    /// The page this controller enhances
    #[must_use]
    pub fn page(&self) -> &PageHandle {
        &self.page
    }

    /// Effective configuration
    #[must_use]
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }
}

impl std::fmt::Debug for ApplicationController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApplicationController")
            .field("initialized", &self.is_initialized())
            .field("boot_pending", &self.boot.is_some())
            .finish_non_exhaustive()
    }
}

fn mark_processed(record: &Map<String, Value>) -> Map<String, Value> {
    let mut copy = record.clone();
    copy.insert(PROCESSED_KEY.to_string(), Value::Bool(true));
    copy
}
