//! Page Controller Core - Headless Page Enhancement
//!
//! This crate drives the client-side behavior of a static showcase page
//! without depending on any particular rendering host. The page is an
//! injected document model; everything the host may or may not support
//! (visibility observation, performance timing) is an injected capability.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │                              Host                                 │
//! │   page markup ─► PageHandle      Capabilities      TextProcessor  │
//! │   ready signal ─┐    │               │                   │        │
//! └─────────────────┼────┼───────────────┼───────────────────┼────────┘
//!                   │    │               │                   │
//! ┌─────────────────┼────┼───────────────┼───────────────────┼────────┐
//! │                 ▼    ▼               ▼                   ▼        │
//! │  ┌────────────────────────────────────────────────────────────┐  │
//! │  │                  ApplicationController                      │  │
//! │  │   DataStore   initialized   boot task   ready gate          │  │
//! │  └──────┬───────────────┬────────────────────┬────────────────┘  │
//! │         │               │                    │                    │
//! │  ┌──────┴──────┐ ┌──────┴────────┐ ┌─────────┴──────────┐        │
//! │  │ UiEnhancer  │ │ ScrollVisib-  │ │ TextProcessing-    │        │
//! │  │  (hover,    │ │ ilityObserver │ │ Client (form ⇄     │        │
//! │  │   click)    │ │  (reveal)     │ │  remote endpoint)  │        │
//! │  └──────┬──────┘ └───────────────┘ └────────────────────┘        │
//! │         ▼                                                         │
//! │  NotificationPresenter (toasts)             PAGE CONTROLLER CORE  │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`ApplicationController`]: owns the store, runs the boot sequence
//! - [`PageHandle`]: shared handle to the document model
//! - [`Capabilities`]: optional host features
//! - [`TextProcessor`]: remote text-processing backend
//! - [`ControllerConfig`]: timing, selectors, endpoint
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use page_controller_core::{
//!     ApplicationController, HostEnvironment, HttpTextProcessor, PageHandle, load_config,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = load_config()?;
//!     let processor = Arc::new(HttpTextProcessor::new(&config.endpoint)?);
//!     let page = PageHandle::default();
//!
//!     let mut controller =
//!         ApplicationController::new(HostEnvironment::new(page.clone(), processor), config);
//!     page.signal_ready();
//!     controller.wait_for_boot().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: remote text-processing endpoint
//! - [`capabilities`]: visibility and performance abstractions
//! - [`config`]: configuration loading (defaults, TOML, environment)
//! - [`controller`]: boot sequencing and shared state
//! - [`dom`]: document model, events dispatch, ready signal
//! - [`enhancer`]: hover and click behavior
//! - [`notifications`]: transient toast messages
//! - [`observer`]: scroll reveal
//! - [`text_client`]: the text-processing form

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod capabilities;
pub mod config;
pub mod controller;
pub mod dom;
pub mod enhancer;
pub mod error;
pub mod events;
pub mod metrics;
pub mod notifications;
pub mod observer;
pub mod ready;
pub mod resources;
pub mod store;
pub mod text_client;
pub mod topics;

// Re-exports for convenience
pub use backend::{
    EndpointStatus, HttpTextProcessor, ProcessRequest, ProcessedText, ProcessingError,
    TextProcessor,
};
pub use capabilities::{
    Capabilities, InMemoryViewport, IntersectionEntry, NoPerformance, NoVisibility,
    PerformanceProbe, ProcessPerformance, VisibilityObserver, VisibilityProvider,
};
pub use config::{
    load_config, load_config_from_path, ConfigError, ConfigSource, ControllerConfig,
    EndpointConfig, RevealConfig, SelectorConfig, TimingConfig,
};
pub use controller::{ApplicationController, ApplicationState, DataPayload, HostEnvironment};
pub use dom::{Element, NodeId, Page, PageHandle, ReadyState};
pub use enhancer::{EnhanceSummary, UiEnhancer};
pub use error::ControllerError;
pub use events::{listener, EventKind, Listener};
pub use metrics::PerformanceMetrics;
pub use notifications::NotificationPresenter;
pub use observer::ScrollVisibilityObserver;
pub use ready::{continuation, Continuation, ReadyGate};
pub use resources::{BootResult, ResourceLoader, SimulatedResourceLoader};
pub use store::DataStore;
pub use text_client::{
    FormElements, Submission, SubmissionOutcome, SubmissionState, TextProcessingClient,
};
