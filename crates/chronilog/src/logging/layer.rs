//! tracing subscriber integration.
//!
//! [`ChronilogLayer`] turns tracing events into Chronilog records; the event
//! target picks the logger, event fields become extras.

use std::fmt;
use std::sync::Arc;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

use super::registry::LoggerRegistry;
use crate::format::LogRecord;
use crate::level::Level;

/// A tracing layer that writes events through a [`LoggerRegistry`].
#[derive(Debug, Clone)]
pub struct ChronilogLayer {
    registry: Arc<LoggerRegistry>,
}

impl ChronilogLayer {
    #[must_use]
    pub fn new(registry: Arc<LoggerRegistry>) -> Self {
        Self { registry }
    }
}

#[derive(Default)]
struct FieldCollector {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl FieldCollector {
    fn record_value(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            if self.message.is_none() {
                self.message = Some(value);
            }
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldCollector {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_value(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_value(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.record_value(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.record_value(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.record_value(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.record_value(field, value.to_string());
    }
}

impl<S> Layer<S> for ChronilogLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        let level = Level::from(*metadata.level());
        if !self.registry.would_log(metadata.target(), level) {
            return;
        }
        // Cached per target; targets come from call sites, so the set is
        // bounded.
        let Ok(logger) = self.registry.get_logger(metadata.target()) else {
            return;
        };

        let mut collector = FieldCollector::default();
        event.record(&mut collector);

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<&str> = scope.from_root().map(|span| span.name()).collect();
            if !spans.is_empty() {
                collector.fields.push(("span".to_string(), spans.join("::")));
            }
        }

        let message = collector
            .message
            .unwrap_or_else(|| metadata.name().to_string());
        logger.emit(LogRecord::new(level, metadata.target(), message).with_fields(collector.fields));
    }
}
