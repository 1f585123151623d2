#![forbid(unsafe_code)]

//! Tracing integration tests.
//!
//! Spans enabled:
//!   cargo test -p cellfit-text --features tracing --test tracing_tests
//!
//! Zero-overhead verification (no feature):
//!   cargo test -p cellfit-text --test tracing_tests -- zero_overhead

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use cellfit_text::{constrain_text, truncate_text, wrap_text};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Test Infrastructure
// ============================================================================

/// A captured span with its fields and parent span name.
#[derive(Debug, Clone)]
#[allow(dead_code)]
struct CapturedSpan {
    name: String,
    fields: HashMap<String, String>,
    parent_name: Option<String>,
}

/// A tracing layer that records new spans and counts events.
struct SpanCapture {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<String>>>,
}

/// Handle to read what was captured.
struct CaptureHandle {
    spans: Arc<Mutex<Vec<CapturedSpan>>>,
    events: Arc<Mutex<Vec<String>>>,
}

impl CaptureHandle {
    fn spans(&self) -> Vec<CapturedSpan> {
        self.spans.lock().unwrap().clone()
    }

    #[allow(dead_code)]
    fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);

        let parent_name = ctx
            .current_span()
            .id()
            .and_then(|id| ctx.span(id))
            .map(|span_ref| span_ref.name().to_string());

        self.spans.lock().unwrap().push(CapturedSpan {
            name: attrs.metadata().name().to_string(),
            fields: visitor.0.into_iter().collect(),
            parent_name,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let message = visitor
            .0
            .into_iter()
            .find(|(name, _)| name == "message")
            .map(|(_, value)| value)
            .unwrap_or_default();
        self.events.lock().unwrap().push(message);
    }
}

fn with_captured_spans<F>(f: F) -> CaptureHandle
where
    F: FnOnce(),
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = SpanCapture {
        spans: spans.clone(),
        events: events.clone(),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    CaptureHandle { spans, events }
}

// ============================================================================
// Tests
// ============================================================================

#[test]
#[cfg(feature = "tracing")]
fn reflow_entry_points_open_spans() {
    let handle = with_captured_spans(|| {
        let _ = wrap_text("hello world", 5);
        let _ = truncate_text("hello world", 5, "...");
    });

    let spans = handle.spans();
    let wrap = spans
        .iter()
        .find(|s| s.name == "wrap_text")
        .expect("wrap_text span");
    assert_eq!(wrap.fields.get("width").map(String::as_str), Some("5"));
    assert!(spans.iter().any(|s| s.name == "truncate_text"));
}

#[test]
#[cfg(feature = "tracing")]
fn constrain_nests_wrap_span() {
    let handle = with_captured_spans(|| {
        let _ = constrain_text("one two three four five", 6, 1);
    });

    let spans = handle.spans();
    let wrap = spans
        .iter()
        .find(|s| s.name == "wrap_text")
        .expect("wrap_text span");
    assert_eq!(wrap.parent_name.as_deref(), Some("constrain_text"));
}

#[test]
#[cfg(feature = "tracing")]
fn truncated_constrain_emits_event() {
    let handle = with_captured_spans(|| {
        let _ = constrain_text("a\nb\nc", 10, 1);
    });

    assert!(
        handle.events().iter().any(|m| m.contains("max_lines")),
        "expected a trace event for dropped lines, got {:?}",
        handle.events()
    );
}

#[test]
#[cfg(not(feature = "tracing"))]
fn zero_overhead_without_feature() {
    let handle = with_captured_spans(|| {
        let _ = wrap_text("hello world", 5);
        let _ = constrain_text("a\nb\nc", 10, 1);
    });
    assert!(handle.spans().is_empty());
}
