//! Simulation driver implementing the Driver trait.
//!
//! `SimDriver` provides the same interface a real host does, but for
//! deterministic testing. It implements [`Driver`] so the same
//! [`parley_app::Runtime`] orchestration code runs in both production and
//! simulation.

use std::collections::VecDeque;

use parley_app::{App, AppEvent, ChatMessage, Driver};

use crate::invariants::{ClientSnapshot, InvariantRegistry, SystemSnapshot};

/// Error type for simulation driver.
#[derive(Debug, Clone)]
pub struct SimDriverError(pub String);

impl std::fmt::Display for SimDriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SimDriverError: {}", self.0)
    }
}

impl std::error::Error for SimDriverError {}

/// Simulation driver for deterministic testing.
///
/// Events are scripted up front or injected between runtime steps. When the
/// script runs dry, [`Driver::next_event`] returns `None` and the runtime
/// ends the session.
#[derive(Default)]
pub struct SimDriver {
    pending: VecDeque<AppEvent>,
    outgoing: Vec<String>,
    fail_sends: bool,
    renders: usize,
    scrolls: usize,
    stopped: bool,
    invariants: Option<InvariantRegistry>,
    last_log: Vec<ChatMessage>,
}

impl SimDriver {
    /// Create a new simulation driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a driver pre-loaded with events.
    pub fn scripted(events: impl IntoIterator<Item = AppEvent>) -> Self {
        Self { pending: events.into_iter().collect(), ..Self::default() }
    }

    /// Enable invariant checking after every render and scroll.
    #[must_use]
    pub fn with_invariants(mut self, registry: InvariantRegistry) -> Self {
        self.invariants = Some(registry);
        self
    }

    /// Make every send fail, as a transport that is not ready would.
    pub fn set_fail_sends(&mut self, fail: bool) {
        self.fail_sends = fail;
    }

    /// Inject an event for processing.
    pub fn inject_event(&mut self, event: AppEvent) {
        self.pending.push_back(event);
    }

    /// Inject a raw payload from the server.
    pub fn inject_payload(&mut self, payload: impl Into<String>) {
        self.pending.push_back(AppEvent::PayloadReceived(payload.into()));
    }

    /// Take all captured outgoing payloads.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }

    /// Check if there are pending events to process.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Number of renders requested so far.
    pub fn renders(&self) -> usize {
        self.renders
    }

    /// Number of scroll-to-latest requests so far.
    pub fn scrolls(&self) -> usize {
        self.scrolls
    }

    /// Whether the runtime has stopped the driver.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    fn check_invariants(&mut self, app: &App, context: &str) {
        if let Some(ref registry) = self.invariants {
            let client =
                ClientSnapshot::from_app(0, app).with_previous(std::mem::take(&mut self.last_log));
            self.last_log.clone_from(&client.messages);
            registry.assert_all(&SystemSnapshot::single(client), context);
        }
    }
}

impl Driver for SimDriver {
    type Error = SimDriverError;

    async fn next_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        Ok(self.pending.pop_front())
    }

    async fn send(&mut self, payload: String) -> Result<(), Self::Error> {
        if self.fail_sends {
            return Err(SimDriverError("transport not ready".to_owned()));
        }
        self.outgoing.push(payload);
        Ok(())
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        self.renders += 1;
        self.check_invariants(app, "after render");
        Ok(())
    }

    fn scroll_to_latest(&mut self, app: &App) -> Result<(), Self::Error> {
        self.scrolls += 1;
        self.check_invariants(app, "after scroll");
        Ok(())
    }

    fn stop(&mut self) {
        self.stopped = true;
        self.pending.clear();
    }
}
