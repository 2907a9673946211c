//! Optional forwarding of debug events to an external collector.
//!
//! Events go through a bounded queue drained by a background task, so a slow
//! or unreachable collector never blocks the emitting code. Events that do not
//! fit in the queue are dropped.

use reqwest::Client;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::{DebugEvent, ToggleState};

pub const EVENT_PATH: &str = "/debug-log";
pub const TOGGLE_PATH: &str = "/debug-toggle";

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Process-wide debug switches, constructed once at startup and shared.
#[derive(Debug, Default)]
pub struct DebugToggles {
    page: AtomicBool,
    log_everything: AtomicBool,
}

impl DebugToggles {
    pub fn new(state: ToggleState) -> Self {
        Self {
            page: AtomicBool::new(state.debug_log_enabled),
            log_everything: AtomicBool::new(state.log_everything_enabled),
        }
    }

    pub fn snapshot(&self) -> ToggleState {
        ToggleState {
            debug_log_enabled: self.page.load(Ordering::Relaxed),
            log_everything_enabled: self.log_everything.load(Ordering::Relaxed),
        }
    }

    pub fn set(&self, state: ToggleState) {
        self.page.store(state.debug_log_enabled, Ordering::Relaxed);
        self.log_everything
            .store(state.log_everything_enabled, Ordering::Relaxed);
    }

    pub fn is_forwarding(&self) -> bool {
        self.snapshot().forwards()
    }
}

#[derive(Debug)]
enum TelemetryMessage {
    Event(DebugEvent),
    Toggles(ToggleState),
}

#[derive(Clone)]
pub struct TelemetrySink {
    tx: mpsc::Sender<TelemetryMessage>,
    toggles: Arc<DebugToggles>,
    source: String,
}

impl TelemetrySink {
    /// Starts the drain task. With no collector configured every message is
    /// discarded by the task.
    pub fn spawn(
        collector_url: Option<String>,
        capacity: usize,
        toggles: Arc<DebugToggles>,
        source: impl Into<String>,
    ) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let collector = collector_url.map(|url| url.trim_end_matches('/').to_string());
        let handle = tokio::spawn(drain(rx, collector));

        (
            Self {
                tx,
                toggles,
                source: source.into(),
            },
            handle,
        )
    }

    pub fn toggles(&self) -> &Arc<DebugToggles> {
        &self.toggles
    }

    /// Queues an event if either toggle is on; otherwise does nothing.
    pub fn emit(&self, message: &str, data: Value) {
        if !self.toggles.is_forwarding() {
            return;
        }
        let event = DebugEvent::new(message, data, self.source.clone());
        if let Err(e) = self.tx.try_send(TelemetryMessage::Event(event)) {
            debug!("Dropped debug event '{}': {}", message, e);
        }
    }

    /// Sends the current toggle state to the collector, whatever it is.
    pub fn publish_toggles(&self) {
        let state = self.toggles.snapshot();
        if let Err(e) = self.tx.try_send(TelemetryMessage::Toggles(state)) {
            debug!("Dropped toggle update: {}", e);
        }
    }
}

async fn drain(mut rx: mpsc::Receiver<TelemetryMessage>, collector: Option<String>) {
    let client = match Client::builder().timeout(DELIVERY_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            debug!("Telemetry client unavailable, discarding events: {}", e);
            while rx.recv().await.is_some() {}
            return;
        }
    };

    while let Some(message) = rx.recv().await {
        let Some(base) = collector.as_deref() else {
            continue;
        };

        let request = match &message {
            TelemetryMessage::Event(event) => client.post(format!("{}{}", base, EVENT_PATH)).json(event),
            TelemetryMessage::Toggles(state) => {
                client.post(format!("{}{}", base, TOGGLE_PATH)).json(state)
            }
        };

        match request.send().await {
            Ok(response) if !response.status().is_success() => {
                debug!("Collector rejected {:?} with status {}", message, response.status())
            }
            Ok(_) => {}
            Err(e) => debug!("Collector unreachable: {}", e),
        }
    }
}
