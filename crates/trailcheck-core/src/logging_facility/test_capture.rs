//! In-memory event capture for logging assertions in tests.
//!
//! The capture layer records every event at every level, so tests can
//! observe operation boundaries and the engine's `mismatch` debug events.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::{Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;
use trailcheck_core_types::schema;

/// One recorded event; every field value is kept in its text form.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// `component` field, the emitting module path
    pub fn component(&self) -> Option<&str> {
        self.field(schema::FIELD_COMPONENT)
    }

    fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

#[derive(Default)]
struct Fields(HashMap<String, String>);

// Integers and `%`/`?` values all arrive through `record_debug`.
impl Visit for Fields {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{value:?}"));
    }
}

type Buffer = Arc<Mutex<Vec<CapturedEvent>>>;

/// Layer appending every event to a shared buffer
pub struct TestCaptureLayer {
    events: Buffer,
}

impl TestCaptureLayer {
    pub fn new() -> (Self, TestCapture) {
        let events = Buffer::default();
        (
            Self {
                events: events.clone(),
            },
            TestCapture { events },
        )
    }
}

impl<S> Layer<S> for TestCaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = Fields::default();
        event.record(&mut fields);
        let fields = fields.0;

        let captured = CapturedEvent {
            level: *event.metadata().level(),
            op: fields.get(schema::FIELD_OP).cloned(),
            event: fields.get(schema::FIELD_EVENT).cloned(),
            fields,
        };
        if let Ok(mut events) = self.events.lock() {
            events.push(captured);
        }
    }
}

/// Read side of the capture buffer.
#[derive(Clone)]
pub struct TestCapture {
    events: Buffer,
}

impl TestCapture {
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events with the given `event` name, in emission order
    pub fn events_named(&self, event: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event.as_deref() == Some(event))
            .collect()
    }

    /// Trails of every `mismatch` event, in emission order
    pub fn mismatch_trails(&self) -> Vec<String> {
        self.events_named(schema::EVENT_MISMATCH)
            .iter()
            .filter_map(|e| e.field(schema::FIELD_TRAIL).map(str::to_string))
            .collect()
    }

    /// Error codes of every failed `op`
    pub fn error_codes(&self, op: &str) -> Vec<String> {
        self.events()
            .iter()
            .filter(|e| e.is(op, schema::EVENT_END_ERROR))
            .filter_map(|e| e.field(schema::FIELD_ERR_CODE).map(str::to_string))
            .collect()
    }

    /// # Panics
    ///
    /// Panics when no event matches `op` and `event`.
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "no {op}/{event} event among {} captured",
            events.len()
        );
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber, once per process,
/// and return a handle to the shared buffer.
///
/// ```
/// use trailcheck_core::logging_facility::test_capture::init_test_capture;
/// use trailcheck_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("equal");
/// capture.assert_event_exists("equal", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let (layer, capture) = TestCaptureLayer::new();
            // Another global subscriber leaves the buffer empty.
            if let Err(err) = tracing_subscriber::registry().with(layer).try_init() {
                tracing::debug!(error = %err, "capture layer not installed");
            }
            capture
        })
        .clone()
}
