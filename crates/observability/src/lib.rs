use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    utterances_total: AtomicU64,
    unknown_total: AtomicU64,
    searches_total: AtomicU64,
    empty_results_total: AtomicU64,
    total_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub utterances_total: u64,
    pub unknown_total: u64,
    pub searches_total: u64,
    pub empty_results_total: u64,
    pub avg_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_utterance(&self) {
        self.utterances_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_unknown(&self) {
        self.unknown_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_search(&self) {
        self.searches_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_empty_results(&self) {
        self.empty_results_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_latency(&self, duration: Duration) {
        self.total_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let utterances = self.utterances_total.load(Ordering::Relaxed);
        let latency = self.total_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            utterances_total: utterances,
            unknown_total: self.unknown_total.load(Ordering::Relaxed),
            searches_total: self.searches_total.load(Ordering::Relaxed),
            empty_results_total: self.empty_results_total.load(Ordering::Relaxed),
            avg_latency_millis: if utterances == 0 {
                0.0
            } else {
                latency as f64 / utterances as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,wayfare_assistant=info,wayfare_search=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .init();
    });
}
