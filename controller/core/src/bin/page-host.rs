//! Page Host
//!
//! Minimal host process for the page controller. Builds the showcase page in
//! memory, wires the controller to the configured text-processing endpoint,
//! delivers the ready signal and waits for boot.
//!
//! # Usage
//!
//! ```bash
//! # Default endpoint (http://localhost:5000)
//! page-host
//!
//! # Custom endpoint, verbose logging
//! PAGE_ENDPOINT_URL=http://10.0.0.5:5000 RUST_LOG=debug page-host
//! ```
//!
//! # Environment Variables
//!
//! - `PAGE_ENDPOINT_URL`: base URL of the text-processing service
//! - `PAGE_REQUEST_TIMEOUT_SECS`: request timeout
//! - `PAGE_RESOURCE_DELAY_MS`: simulated resource-load latency
//! - `PAGE_PROCESS_DELAY_MS`: simulated `process_data` latency
//! - `PAGE_NOTIFICATION_DISPLAY_MS`: toast display time
//! - `RUST_LOG`: log level (trace, debug, info, warn, error)
//!
//! # Files
//!
//! - Config: `$XDG_CONFIG_HOME/page-controller/controller.toml` (optional)

use std::sync::Arc;

use tracing::{info, warn};

use page_controller_core::{
    load_config, ApplicationController, Capabilities, Element, HostEnvironment,
    HttpTextProcessor, InMemoryViewport, Page, PageHandle, ProcessPerformance, ReadyState,
    SelectorConfig, TextProcessor,
};

const TOPICS: &[&str] = &["Python", "JavaScript", "R", "HTML5/CSS3"];
const FEATURES: &[&str] = &["Data Processing", "Visualization", "Responsive Layout"];

/// Build the showcase page, still loading
fn build_page(selectors: &SelectorConfig) -> Page {
    let mut page = Page::new(ReadyState::Loading);
    let body = page.body();

    let grid = page.append(body, Element::new("section").with_id("technologies"));
    for topic in TOPICS {
        let card = page.append(
            grid,
            Element::new("div").with_class(selectors.tech_card_class.as_str()),
        );
        page.append(
            card,
            Element::new(selectors.heading_tag.as_str()).with_text(*topic),
        );
    }

    let features = page.append(body, Element::new("section").with_id("features"));
    for feature in FEATURES {
        page.append(
            features,
            Element::new("div")
                .with_class(selectors.feature_class.as_str())
                .with_text(*feature),
        );
    }

    let form = page.append(body, Element::new("section").with_id("nlp-demo"));
    page.append(
        form,
        Element::new("textarea").with_id(selectors.input_id.as_str()),
    );
    page.append(
        form,
        Element::new("button")
            .with_id(selectors.trigger_id.as_str())
            .with_text("Process"),
    );
    page.append(form, Element::new("pre").with_id(selectors.output_id.as_str()));

    page
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("page_host=info".parse()?)
                .add_directive("page_controller_core=info".parse()?),
        )
        .with_target(true)
        .init();

    info!("Starting page host");

    let config = load_config()?;
    info!(
        source = ?config.source,
        endpoint = %config.endpoint.base_url,
        "Configuration loaded"
    );

    let processor = Arc::new(HttpTextProcessor::new(&config.endpoint)?);
    if processor.health_check().await {
        info!(url = processor.process_url(), "Text-processing endpoint reachable");
    } else {
        warn!(
            url = processor.process_url(),
            "Text-processing endpoint not reachable, form submissions will fail"
        );
    }

    let page = PageHandle::new(build_page(&config.selectors));
    let viewport = InMemoryViewport::new();
    let capabilities = Capabilities::none()
        .with_visibility(Arc::new(viewport.clone()))
        .with_performance(Arc::new(ProcessPerformance::new()));
    let host = HostEnvironment::new(page.clone(), processor).with_capabilities(capabilities);

    let mut controller = ApplicationController::new(host, config);

    let deferred = page.signal_ready();
    info!(deferred, "Document ready");

    controller.wait_for_boot().await?;

    // Everything on the demo page is on screen
    let tracked = page.with(|p| {
        let selectors = &controller.config().selectors;
        let mut nodes = p.query_by_class(&selectors.feature_class);
        nodes.extend(p.query_by_class(&selectors.tech_card_class));
        nodes
    });
    let visible: Vec<_> = tracked.iter().map(|node| (*node, 1.0)).collect();
    let delivered = viewport.report(&visible);
    info!(tracked = tracked.len(), delivered, "Viewport reported");

    info!(
        store = %serde_json::Value::Object(controller.store_snapshot()),
        "Boot complete"
    );
    Ok(())
}
