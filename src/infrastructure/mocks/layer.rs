//! Tracing layer that records events for assertions.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::Context;
use tracing_subscriber::Layer;

/// One recorded event.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct CapturedEvent {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: BTreeMap<String, String>,
}

/// Layer that stores every event it sees.
///
/// Clones share storage, so keep a clone outside the subscriber to inspect
/// what was logged.
#[derive(Clone, Default)]
pub struct MockCaptureLayer {
    captured: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl MockCaptureLayer {
    /// Create an empty capture layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured events, oldest first.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.captured
            .lock()
            .expect("MockCaptureLayer mutex poisoned")
            .clone()
    }

    /// Events whose message equals `message`.
    pub fn with_message(&self, message: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }

    /// Number of captured events.
    pub fn count(&self) -> usize {
        self.captured
            .lock()
            .expect("MockCaptureLayer mutex poisoned")
            .len()
    }

    /// Drop everything captured so far.
    pub fn clear(&self) {
        self.captured
            .lock()
            .expect("MockCaptureLayer mutex poisoned")
            .clear();
    }
}

impl<S> Layer<S> for MockCaptureLayer
where
    S: Subscriber,
{
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = CaptureVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        self.captured
            .lock()
            .expect("MockCaptureLayer mutex poisoned")
            .push(CapturedEvent {
                level: *metadata.level(),
                target: metadata.target().to_string(),
                message: visitor.message,
                fields: visitor.fields,
            });
    }
}

#[derive(Default)]
struct CaptureVisitor {
    message: String,
    fields: BTreeMap<String, String>,
}

impl Visit for CaptureVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields
                .insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.fields
                .insert(field.name().to_string(), format!("{:?}", value));
        }
    }
}
