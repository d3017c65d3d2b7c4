//! Common test utilities for formrelay-dispatch integration tests.
//!
//! Provides scripted connectors, failing queues, a log capture layer and
//! helpers for wiring a coordinator with in-memory collaborators.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use formrelay_connector::{
    BlueprintConfig, Connector, ConnectorConfig, ConnectorDescriptor, ConnectorError,
    ConnectorRegistry, FieldSpec, ProcessOutcome, Submission,
};
use formrelay_dispatch::{
    ConnectorTask, DispatchCoordinator, DispatchConfig, DispatchError, InMemoryBlueprints,
    InMemorySubmissionStore, TaskQueue,
};
use tokio::time::Instant;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

pub const FORM: &str = "contact";

pub fn submission(id: &str) -> Submission {
    Submission::new(id, FORM).with_field("email", "a@b.com")
}

/// Blueprint config enabling the `stub` connector.
pub fn stub_blueprint(async_processing: bool) -> BlueprintConfig {
    BlueprintConfig::new()
        .with("async_processing", async_processing)
        .with("stub_enabled", true)
        .with("stub_target", "crm")
}

// ---------------------------------------------------------------------------
// ScriptedConnector - returns scripted outcomes and records calls
// ---------------------------------------------------------------------------

type Script = Box<dyn Fn(u32) -> ProcessOutcome + Send + Sync>;

/// A connector whose outcome is a function of the call number (1-based).
pub struct ScriptedConnector {
    descriptor: ConnectorDescriptor,
    calls: AtomicU32,
    call_times: Mutex<Vec<Instant>>,
    configs: Mutex<Vec<ConnectorConfig>>,
    script: Script,
}

impl ScriptedConnector {
    pub fn new(
        handle: &str,
        script: impl Fn(u32) -> ProcessOutcome + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ConnectorDescriptor::new(handle, handle.to_uppercase())
                .field(FieldSpec::text("target", "Target").validate("required")),
            calls: AtomicU32::new(0),
            call_times: Mutex::new(Vec::new()),
            configs: Mutex::new(Vec::new()),
            script: Box::new(script),
        })
    }

    /// Always delivers.
    pub fn delivering(handle: &str) -> Arc<Self> {
        Self::new(handle, |_| ProcessOutcome::Delivered {
            status: 200,
            latency_ms: 1,
        })
    }

    /// Always times out.
    pub fn timing_out(handle: &str) -> Arc<Self> {
        Self::new(handle, |_| {
            ProcessOutcome::Failed(ConnectorError::Timeout { timeout_secs: 10 })
        })
    }

    /// Fails with HTTP 500 `n` times, then delivers.
    pub fn failing_times(handle: &str, n: u32) -> Arc<Self> {
        Self::new(handle, move |call| {
            if call <= n {
                ProcessOutcome::Failed(ConnectorError::HttpStatus { status: 500 })
            } else {
                ProcessOutcome::Delivered {
                    status: 200,
                    latency_ms: 1,
                }
            }
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn call_times(&self) -> Vec<Instant> {
        self.call_times.lock().unwrap().clone()
    }

    pub fn configs(&self) -> Vec<ConnectorConfig> {
        self.configs.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for ScriptedConnector {
    fn descriptor(&self) -> &ConnectorDescriptor {
        &self.descriptor
    }

    async fn process(&self, _submission: &Submission, config: &ConnectorConfig) -> ProcessOutcome {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        self.call_times.lock().unwrap().push(Instant::now());
        self.configs.lock().unwrap().push(config.clone());
        (self.script)(call)
    }
}

/// A connector that holds its worker slot for `delay`, then delivers.
pub struct SlowConnector {
    descriptor: ConnectorDescriptor,
    delay: Duration,
    calls: AtomicU32,
}

impl SlowConnector {
    pub fn new(handle: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ConnectorDescriptor::new(handle, "Slow"),
            delay,
            calls: AtomicU32::new(0),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for SlowConnector {
    fn descriptor(&self) -> &ConnectorDescriptor {
        &self.descriptor
    }

    async fn process(&self, _submission: &Submission, _config: &ConnectorConfig) -> ProcessOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        ProcessOutcome::Delivered {
            status: 200,
            latency_ms: self.delay.as_millis() as u64,
        }
    }
}

/// A connector that panics when processing.
pub struct PanickingConnector {
    descriptor: ConnectorDescriptor,
}

impl PanickingConnector {
    pub fn new(handle: &str) -> Arc<Self> {
        Arc::new(Self {
            descriptor: ConnectorDescriptor::new(handle, "Panicking"),
        })
    }
}

#[async_trait]
impl Connector for PanickingConnector {
    fn descriptor(&self) -> &ConnectorDescriptor {
        &self.descriptor
    }

    async fn process(&self, _submission: &Submission, _config: &ConnectorConfig) -> ProcessOutcome {
        panic!("connector exploded");
    }
}

// ---------------------------------------------------------------------------
// Queues
// ---------------------------------------------------------------------------

/// A queue that records tasks without running them.
#[derive(Default)]
pub struct RecordingQueue {
    tasks: Mutex<Vec<ConnectorTask>>,
}

impl RecordingQueue {
    pub fn tasks(&self) -> Vec<ConnectorTask> {
        self.tasks.lock().unwrap().clone()
    }
}

#[async_trait]
impl TaskQueue for RecordingQueue {
    async fn enqueue(&self, task: ConnectorTask) -> Result<(), DispatchError> {
        self.tasks.lock().unwrap().push(task);
        Ok(())
    }
}

/// A queue that refuses every task.
pub struct RejectingQueue;

#[async_trait]
impl TaskQueue for RejectingQueue {
    async fn enqueue(&self, _task: ConnectorTask) -> Result<(), DispatchError> {
        Err(DispatchError::Queue {
            message: "broker unavailable".to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// Wiring
// ---------------------------------------------------------------------------

/// Coordinator over in-memory blueprints holding one `stub` field.
pub async fn coordinator_with(
    registry: ConnectorRegistry,
    blueprint: BlueprintConfig,
    queue: Arc<dyn TaskQueue>,
) -> DispatchCoordinator {
    let blueprints = InMemoryBlueprints::new();
    blueprints.add_field(FORM, "connectors", blueprint).await;
    DispatchCoordinator::new(
        Arc::new(registry),
        Arc::new(blueprints),
        queue,
        DispatchConfig::default(),
    )
}

pub async fn store_with(submissions: &[Submission]) -> Arc<InMemorySubmissionStore> {
    let store = InMemorySubmissionStore::new();
    for submission in submissions {
        store.insert(submission.clone()).await;
    }
    Arc::new(store)
}

// ---------------------------------------------------------------------------
// LogCapture - records formrelay log events
// ---------------------------------------------------------------------------

/// A log event emitted under a `formrelay*` target.
#[derive(Debug, Clone)]
pub struct CapturedLog {
    pub level: Level,
    pub target: String,
    pub message: String,
    pub fields: HashMap<String, String>,
}

impl CapturedLog {
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// A tracing layer that records events for assertions.
#[derive(Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedLog>>>,
}

impl LogCapture {
    /// Install as the thread's default subscriber until the guard drops.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let capture = Self::default();
        let subscriber = tracing_subscriber::registry().with(capture.clone());
        let guard = tracing::subscriber::set_default(subscriber);
        (capture, guard)
    }

    pub fn events(&self) -> Vec<CapturedLog> {
        self.events.lock().unwrap().clone()
    }

    pub fn with_message(&self, message: &str) -> Vec<CapturedLog> {
        self.events()
            .into_iter()
            .filter(|e| e.message == message)
            .collect()
    }

    pub fn count_at(&self, level: Level) -> usize {
        self.events().iter().filter(|e| e.level == level).count()
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: HashMap<String, String>,
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        if field.name() == "message" {
            self.message = rendered;
        } else {
            self.fields.insert(field.name().to_string(), rendered);
        }
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !metadata.target().starts_with("formrelay") {
            return;
        }

        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        self.events.lock().unwrap().push(CapturedLog {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}
