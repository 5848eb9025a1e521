//! Text-Processing Form Client
//!
//! Drives the input / trigger / output triple. Each trigger is one
//! submission:
//!
//! ```text
//! Idle → Validating ─(empty)→ Idle
//!            │
//!            └→ Requesting → Succeeded | Failed → Idle
//! ```
//!
//! Submissions are independent and never cancelled. Every submission gets a
//! ticket; only the most recent ticket may write to the output region, so a
//! slow earlier response cannot overwrite a newer one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use crate::backend::{ProcessedText, ProcessingError, TextProcessor};
use crate::config::SelectorConfig;
use crate::dom::{NodeId, PageHandle};
use crate::events::{listener, EventKind};

/// Shown when the input is empty or whitespace
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to process.";
/// Shown while a request is in flight
pub const PROCESSING_MESSAGE: &str = "Processing...";
/// Shown when a request fails for any reason
pub const ERROR_MESSAGE: &str = "Error processing text. Please try again.";

/// Where the client is in the submission cycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionState {
    /// Nothing happening
    #[default]
    Idle,
    /// Checking the input
    Validating,
    /// Waiting for the endpoint
    Requesting,
    /// Response rendered
    Succeeded,
    /// Error message rendered
    Failed,
}

/// How a submission ended
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Input was empty; no request made
    Rejected,
    /// Response rendered
    Succeeded(ProcessedText),
    /// Error message rendered; the diagnostic cause is attached
    Failed(String),
    /// A newer submission owns the output region; nothing rendered
    Superseded,
}

/// Handle to a submission
#[derive(Debug)]
pub enum Submission {
    /// Finished synchronously (empty input)
    Rejected,
    /// Could not be started; error message already rendered
    Failed(String),
    /// Request in flight
    Pending(JoinHandle<SubmissionOutcome>),
}

impl Submission {
    /// Wait for the outcome
    pub async fn outcome(self) -> SubmissionOutcome {
        match self {
            Self::Rejected => SubmissionOutcome::Rejected,
            Self::Failed(cause) => SubmissionOutcome::Failed(cause),
            Self::Pending(handle) => handle.await.unwrap_or_else(|e| {
                SubmissionOutcome::Failed(format!("submission task did not complete: {e}"))
            }),
        }
    }
}

/// Resolved form elements
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FormElements {
    /// Text input
    pub input: NodeId,
    /// Trigger control
    pub trigger: NodeId,
    /// Output region
    pub output: NodeId,
}

/// The form client
#[derive(Clone)]
pub struct TextProcessingClient {
    processor: Arc<dyn TextProcessor>,
    selectors: SelectorConfig,
    latest_ticket: Arc<AtomicU64>,
    state: Arc<Mutex<SubmissionState>>,
}

impl TextProcessingClient {
    /// Client for the given backend
    pub fn new(processor: Arc<dyn TextProcessor>, selectors: SelectorConfig) -> Self {
        Self {
            processor,
            selectors,
            latest_ticket: Arc::new(AtomicU64::new(0)),
            state: Arc::new(Mutex::new(SubmissionState::Idle)),
        }
    }

    /// Current state of the most recent submission
    #[must_use]
    pub fn state(&self) -> SubmissionState {
        *self.state.lock()
    }

    /// Find the form triple; `None` if any part is missing
    #[must_use]
    pub fn locate(&self, page: &PageHandle) -> Option<FormElements> {
        page.with(|p| {
            Some(FormElements {
                input: p.get_element_by_id(&self.selectors.input_id)?,
                trigger: p.get_element_by_id(&self.selectors.trigger_id)?,
                output: p.get_element_by_id(&self.selectors.output_id)?,
            })
        })
    }

    /// Wire the trigger's click listener
    ///
    /// Returns the form elements, or `None` (feature disabled) if the page
    /// lacks any of them.
    pub fn attach(&self, page: &PageHandle) -> Option<FormElements> {
        let form = self.locate(page)?;
        let client = self.clone();
        page.add_event_listener(
            form.trigger,
            EventKind::Click,
            listener(move |page, _| {
                client.submit(page, form);
            }),
        );
        tracing::debug!(trigger = %form.trigger, "Text-processing form attached");
        Some(form)
    }

    /// Run one submission
    ///
    /// Validation and the placeholder happen synchronously; the request runs
    /// on a spawned task.
    pub fn submit(&self, page: &PageHandle, form: FormElements) -> Submission {
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;
        self.transition(ticket, SubmissionState::Validating);

        let text = page.with(|p| p.value(form.input).to_string());
        if text.trim().is_empty() {
            page.with(|p| p.set_text(form.output, EMPTY_INPUT_MESSAGE));
            self.transition(ticket, SubmissionState::Idle);
            return Submission::Rejected;
        }

        page.with(|p| p.set_text(form.output, PROCESSING_MESSAGE));
        self.transition(ticket, SubmissionState::Requesting);

        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!(error = %e, "Error processing text");
                page.with(|p| p.set_text(form.output, ERROR_MESSAGE));
                self.transition(ticket, SubmissionState::Idle);
                return Submission::Failed(e.to_string());
            }
        };

        let client = self.clone();
        let page = page.clone();
        Submission::Pending(runtime.spawn(async move {
            // The backend runs on its own task so a panic still ends the
            // submission through `finish`
            let processor = Arc::clone(&client.processor);
            let request = tokio::spawn(async move { processor.process(&text).await });
            let result = request
                .await
                .unwrap_or_else(|e| Err(ProcessingError::Aborted(e.to_string())));
            client.finish(ticket, &page, form, result)
        }))
    }

    fn finish(
        &self,
        ticket: u64,
        page: &PageHandle,
        form: FormElements,
        result: Result<ProcessedText, ProcessingError>,
    ) -> SubmissionOutcome {
        if let Err(ref err) = result {
            tracing::error!(
                backend = self.processor.name(),
                error = %err,
                "Error processing text"
            );
        }
        let rendered = match result {
            Ok(ref processed) => processed.render(),
            Err(_) => ERROR_MESSAGE.to_string(),
        };

        // Ticket check and write happen under the page lock, so a newer
        // submission's placeholder is never overwritten
        let written = page.with(|p| {
            if !self.is_current(ticket) {
                return false;
            }
            p.set_text(form.output, rendered);
            true
        });
        if !written {
            if result.is_ok() {
                tracing::debug!(ticket, "Dropping response of superseded submission");
            }
            return SubmissionOutcome::Superseded;
        }

        let outcome = match result {
            Ok(processed) => {
                self.transition(ticket, SubmissionState::Succeeded);
                SubmissionOutcome::Succeeded(processed)
            }
            Err(err) => {
                self.transition(ticket, SubmissionState::Failed);
                SubmissionOutcome::Failed(err.to_string())
            }
        };
        self.transition(ticket, SubmissionState::Idle);
        outcome
    }

    fn is_current(&self, ticket: u64) -> bool {
        self.latest_ticket.load(Ordering::SeqCst) == ticket
    }

    /// Record a state change made on behalf of `ticket`
    fn transition(&self, ticket: u64, next: SubmissionState) {
        let mut state = self.state.lock();
        if !self.is_current(ticket) {
            return;
        }
        tracing::trace!(ticket, from = ?*state, to = ?next, "Submission state");
        *state = next;
    }
}

impl std::fmt::Debug for TextProcessingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextProcessingClient")
            .field("backend", &self.processor.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{EndpointStatus, ProcessingError};
    use crate::dom::{Element, Page};
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Scripted backend: uppercases, fails, or stalls
    struct ScriptedProcessor {
        calls: AtomicUsize,
        fail: bool,
        delay: Duration,
    }

    impl ScriptedProcessor {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
                delay: Duration::ZERO,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: true,
                delay: Duration::ZERO,
            })
        }

        fn slow(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
                delay,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl TextProcessor for ScriptedProcessor {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn process(&self, text: &str) -> Result<ProcessedText, ProcessingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if self.fail {
                Err(ProcessingError::Network("connection refused".to_string()))
            } else {
                Ok(ProcessedText::new(text, text.to_uppercase()))
            }
        }

        async fn status(&self) -> Result<EndpointStatus, ProcessingError> {
            Err(ProcessingError::Network("not implemented".to_string()))
        }
    }

    /// Backend whose call panics
    struct PanickingProcessor;

    #[async_trait]
    impl TextProcessor for PanickingProcessor {
        fn name(&self) -> &str {
            "panicking"
        }

        async fn process(&self, _text: &str) -> Result<ProcessedText, ProcessingError> {
            panic!("backend exploded");
        }

        async fn status(&self) -> Result<EndpointStatus, ProcessingError> {
            Err(ProcessingError::Network("not implemented".to_string()))
        }
    }

    /// Counts error-level events
    struct ErrorCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for ErrorCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::ERROR {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_errors() -> (Arc<AtomicUsize>, tracing::subscriber::DefaultGuard) {
        let counter = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(ErrorCounter(Arc::clone(&counter)));
        (counter, tracing::subscriber::set_default(subscriber))
    }

    fn form_page(input: &str) -> (PageHandle, FormElements) {
        let mut page = Page::default();
        let body = page.body();
        let form = page.append(body, Element::new("form"));
        let input_node = page.append(
            form,
            Element::new("textarea").with_id("nlp-input").with_value(input),
        );
        let trigger = page.append(form, Element::new("button").with_id("process-button"));
        let output = page.append(body, Element::new("pre").with_id("nlp-output"));
        (
            PageHandle::new(page),
            FormElements {
                input: input_node,
                trigger,
                output,
            },
        )
    }

    fn output_text(page: &PageHandle, form: FormElements) -> String {
        page.with(|p| p.text(form.output).to_string())
    }

    #[test]
    fn test_missing_element_disables_feature() {
        for missing in ["nlp-input", "process-button", "nlp-output"] {
            let mut page = Page::default();
            let body = page.body();
            for id in ["nlp-input", "process-button", "nlp-output"] {
                if id != missing {
                    page.append(body, Element::new("div").with_id(id));
                }
            }
            let page = PageHandle::new(page);
            let client = TextProcessingClient::new(ScriptedProcessor::ok(), SelectorConfig::default());
            assert!(client.attach(&page).is_none(), "{missing} absent should disable");
        }
    }

    #[tokio::test]
    async fn test_whitespace_input_never_calls_backend() {
        for input in ["", "   ", "\n\t "] {
            let (page, form) = form_page(input);
            let processor = ScriptedProcessor::ok();
            let client = TextProcessingClient::new(processor.clone(), SelectorConfig::default());

            let outcome = client.submit(&page, form).outcome().await;
            assert_eq!(outcome, SubmissionOutcome::Rejected);
            assert_eq!(output_text(&page, form), EMPTY_INPUT_MESSAGE);
            assert_eq!(processor.calls(), 0);
            assert_eq!(client.state(), SubmissionState::Idle);
        }
    }

    #[tokio::test]
    async fn test_success_renders_two_lines_without_error_log() {
        let (errors, _guard) = count_errors();
        let (page, form) = form_page("hi");
        let processor = ScriptedProcessor::ok();
        let client = TextProcessingClient::new(processor.clone(), SelectorConfig::default());

        let outcome = client.submit(&page, form).outcome().await;
        assert_eq!(outcome, SubmissionOutcome::Succeeded(ProcessedText::new("hi", "HI")));
        assert_eq!(output_text(&page, form), "Original: hi\nProcessed: HI");
        assert_eq!(processor.calls(), 1);
        assert_eq!(errors.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failure_renders_fixed_message_and_logs_once() {
        let (errors, _guard) = count_errors();
        let (page, form) = form_page("hello");
        let client = TextProcessingClient::new(ScriptedProcessor::failing(), SelectorConfig::default());

        let outcome = client.submit(&page, form).outcome().await;
        assert!(matches!(outcome, SubmissionOutcome::Failed(ref cause) if cause.contains("connection refused")));
        assert_eq!(output_text(&page, form), ERROR_MESSAGE);
        assert_eq!(errors.load(Ordering::SeqCst), 1);
        assert_eq!(client.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_placeholder_while_requesting() {
        let (page, form) = form_page("slow");
        let client = TextProcessingClient::new(
            ScriptedProcessor::slow(Duration::from_millis(500)),
            SelectorConfig::default(),
        );

        let submission = client.submit(&page, form);
        assert_eq!(output_text(&page, form), PROCESSING_MESSAGE);
        assert_eq!(client.state(), SubmissionState::Requesting);

        submission.outcome().await;
        assert_eq!(output_text(&page, form), "Original: slow\nProcessed: SLOW");
        assert_eq!(client.state(), SubmissionState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_listener_submits() {
        let (page, form) = form_page("clicked");
        let processor = ScriptedProcessor::ok();
        let client = TextProcessingClient::new(processor.clone(), SelectorConfig::default());
        assert_eq!(client.attach(&page), Some(form));

        assert_eq!(page.dispatch(form.trigger, EventKind::Click), 1);
        assert_eq!(output_text(&page, form), PROCESSING_MESSAGE);

        // Let the spawned request run
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(processor.calls(), 1);
        assert_eq!(output_text(&page, form), "Original: clicked\nProcessed: CLICKED");
    }

    #[tokio::test(start_paused = true)]
    async fn test_latest_submission_wins() {
        let (page, form) = form_page("first");
        let processor = ScriptedProcessor::slow(Duration::from_millis(200));
        let client = TextProcessingClient::new(processor.clone(), SelectorConfig::default());

        let first = client.submit(&page, form);
        tokio::time::sleep(Duration::from_millis(50)).await;
        page.with(|p| p.set_value(form.input, "second"));
        let second = client.submit(&page, form);

        assert_eq!(first.outcome().await, SubmissionOutcome::Superseded);
        // The earlier response did not overwrite the placeholder
        assert_eq!(output_text(&page, form), PROCESSING_MESSAGE);

        assert!(matches!(second.outcome().await, SubmissionOutcome::Succeeded(_)));
        assert_eq!(output_text(&page, form), "Original: second\nProcessed: SECOND");
        assert_eq!(processor.calls(), 2);
    }

    #[tokio::test]
    async fn test_panicking_backend_renders_error_and_returns_to_idle() {
        let (errors, _guard) = count_errors();
        let (page, form) = form_page("hello");
        let client = TextProcessingClient::new(Arc::new(PanickingProcessor), SelectorConfig::default());

        let outcome = client.submit(&page, form).outcome().await;
        assert!(matches!(outcome, SubmissionOutcome::Failed(ref cause) if cause.contains("did not complete")));
        assert_eq!(output_text(&page, form), ERROR_MESSAGE);
        assert_eq!(client.state(), SubmissionState::Idle);
        assert_eq!(errors.load(Ordering::SeqCst), 1);

        // The form keeps working afterwards
        let outcome = client.submit(&page, form).outcome().await;
        assert!(matches!(outcome, SubmissionOutcome::Failed(_)));
        assert_eq!(errors.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stale_ticket_never_writes_output_or_state() {
        let (page, form) = form_page("first");
        let client = TextProcessingClient::new(ScriptedProcessor::ok(), SelectorConfig::default());

        // Ticket 1 is issued, then ticket 2 takes over the output region
        client.latest_ticket.store(2, Ordering::SeqCst);
        page.with(|p| p.set_text(form.output, PROCESSING_MESSAGE));
        client.transition(2, SubmissionState::Requesting);

        let outcome = client.finish(1, &page, form, Ok(ProcessedText::new("first", "FIRST")));
        assert_eq!(outcome, SubmissionOutcome::Superseded);
        let outcome = client.finish(
            1,
            &page,
            form,
            Err(ProcessingError::Network("late failure".to_string())),
        );
        assert_eq!(outcome, SubmissionOutcome::Superseded);

        assert_eq!(output_text(&page, form), PROCESSING_MESSAGE);
        assert_eq!(client.state(), SubmissionState::Requesting);
    }

    #[test]
    fn test_without_runtime_fails_fast() {
        let (page, form) = form_page("text");
        let processor = ScriptedProcessor::ok();
        let client = TextProcessingClient::new(processor.clone(), SelectorConfig::default());

        let submission = client.submit(&page, form);
        assert!(matches!(submission, Submission::Failed(_)));
        assert_eq!(output_text(&page, form), ERROR_MESSAGE);
        assert_eq!(processor.calls(), 0);
    }
}
