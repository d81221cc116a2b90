use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct ChatMetrics {
    sends_total: AtomicU64,
    send_failures_total: AtomicU64,
    abandoned_sends_total: AtomicU64,
    urgent_replies_total: AtomicU64,
    emergency_replies_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub sends_total: u64,
    pub send_failures_total: u64,
    pub abandoned_sends_total: u64,
    pub urgent_replies_total: u64,
    pub emergency_replies_total: u64,
    pub avg_latency_millis: f64,
}

impl ChatMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_send(&self) {
        self.sends_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_failure(&self) {
        self.send_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    /// A send whose future was dropped before the reply arrived. Also counted
    /// as a failure.
    pub fn inc_abandoned(&self) {
        self.abandoned_sends_total.fetch_add(1, Ordering::Relaxed);
        self.send_failures_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_urgent_reply(&self) {
        self.urgent_replies_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_emergency_reply(&self) {
        self.emergency_replies_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let sends = self.sends_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            sends_total: sends,
            send_failures_total: self.send_failures_total.load(Ordering::Relaxed),
            abandoned_sends_total: self.abandoned_sends_total.load(Ordering::Relaxed),
            urgent_replies_total: self.urgent_replies_total.load(Ordering::Relaxed),
            emergency_replies_total: self.emergency_replies_total.load(Ordering::Relaxed),
            avg_latency_millis: if sends == 0 {
                0.0
            } else {
                latency as f64 / sends as f64
            },
        }
    }
}

/// Installs the global JSON subscriber once. `RUST_LOG` overrides the
/// default level, which is `debug` when `debug` is set and `info` otherwise.
pub fn init_tracing(service_name: &str, debug: bool) {
    TRACING_INIT.get_or_init(|| {
        let level = if debug { "debug" } else { "info" };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{service_name}={level},clinic_session={level},clinic_transport={level}"
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
