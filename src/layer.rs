use crate::record::LogRecord;
use crate::transport::MultiLineConsole;
use chrono::Utc;
use serde_json::Value;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns events into [`LogRecord`]s and
/// hands them to a [`MultiLineConsole`].
///
/// Level names are the lower-cased `tracing` levels (`"error"`, `"warn"`,
/// ...), so stderr level sets are written in that form. The `message` field
/// becomes the record message; every other field is appended as
/// `" key=value"`.
pub struct MultiLineConsoleLayer {
    transport: Arc<MultiLineConsole>,
    /// Total events seen by the layer.
    pub total_events: Arc<AtomicU64>,
    /// Events whose formatting failed.
    pub failed_events: Arc<AtomicU64>,
}

impl MultiLineConsoleLayer {
    pub fn new(transport: Arc<MultiLineConsole>) -> Self {
        Self {
            transport,
            total_events: Arc::new(AtomicU64::new(0)),
            failed_events: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn transport(&self) -> &Arc<MultiLineConsole> {
        &self.transport
    }
}

impl<S> Layer<S> for MultiLineConsoleLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_event(&self, event: &Event, _ctx: Context<'_, S>) {
        self.total_events.fetch_add(1, Ordering::Relaxed);

        let mut message: Option<String> = None;
        let mut splat = Vec::new();
        let mut visitor = FieldVisitor {
            message: &mut message,
            splat: &mut splat,
        };
        event.record(&mut visitor);

        let meta = event.metadata();
        let record = LogRecord {
            timestamp: Utc::now(),
            level: meta.level().as_str().to_ascii_lowercase(),
            target: Some(meta.target().to_string()),
            message: message.map(Value::String),
            splat,
            serialized: None,
        };

        if let Err(e) = self.transport.submit(record, |_, _| {}) {
            self.failed_events.fetch_add(1, Ordering::Relaxed);
            eprintln!("{}: dropping log event: {}", self.transport.name(), e);
        }
    }
}

pub struct FieldVisitor<'a> {
    pub message: &'a mut Option<String>,
    pub splat: &'a mut Vec<Value>,
}

impl FieldVisitor<'_> {
    fn push(&mut self, field: &Field, value: String) {
        self.splat.push(Value::String(format!(" {}={}", field.name(), value)));
    }
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.push(field, value.to_string());
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        // `info!("..")` hands its message over as `fmt::Arguments`.
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.push(field, format!("{:?}", value));
        }
    }
}
