//! Prometheus metrics for search traffic.
//!
//! Every search call records its kind (`filter` or `text`), its outcome
//! (`ok` or the error code) and its latency. Metrics live in a dedicated
//! registry so embedding applications can expose or ignore them.
//!
//! # Example
//! ```no_run
//! use filter_search::metrics::{init_metrics, gather_metrics};
//!
//! init_metrics().expect("metrics registration");
//! println!("{}", gather_metrics());
//! ```

use lazy_static::lazy_static;
use prometheus::{CounterVec, HistogramOpts, HistogramVec, Opts, Registry};

lazy_static! {
    /// Registry holding all search metrics
    pub static ref PROMETHEUS_REGISTRY: Registry = Registry::new();

    /// Total number of search calls
    ///
    /// Labels: kind, outcome
    pub static ref SEARCH_REQUESTS_TOTAL: CounterVec = CounterVec::new(
        Opts::new("requests_total", "Total number of search requests")
            .namespace("filter_search"),
        &["kind", "outcome"]
    ).expect("Failed to create SEARCH_REQUESTS_TOTAL metric");

    /// Search call duration in seconds, compile through normalization
    ///
    /// Labels: kind
    pub static ref SEARCH_DURATION_SECONDS: HistogramVec = HistogramVec::new(
        HistogramOpts::new("duration_seconds", "Search request duration in seconds")
            .namespace("filter_search")
            .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
        &["kind"]
    ).expect("Failed to create SEARCH_DURATION_SECONDS metric");

    /// Hits returned per page
    ///
    /// Labels: kind
    pub static ref SEARCH_HITS_RETURNED: HistogramVec = HistogramVec::new(
        HistogramOpts::new("hits_returned", "Number of hits returned per search page")
            .namespace("filter_search")
            .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0]),
        &["kind"]
    ).expect("Failed to create SEARCH_HITS_RETURNED metric");
}

/// Register all metrics. Calling it more than once is harmless.
pub fn init_metrics() -> Result<(), prometheus::Error> {
    register(Box::new(SEARCH_REQUESTS_TOTAL.clone()))?;
    register(Box::new(SEARCH_DURATION_SECONDS.clone()))?;
    register(Box::new(SEARCH_HITS_RETURNED.clone()))?;
    Ok(())
}

fn register(collector: Box<dyn prometheus::core::Collector>) -> Result<(), prometheus::Error> {
    match PROMETHEUS_REGISTRY.register(collector) {
        Ok(()) | Err(prometheus::Error::AlreadyReg) => Ok(()),
        Err(e) => Err(e),
    }
}

/// Record one finished search call
pub fn record_search(kind: &str, outcome: &str, duration_secs: f64, hits: usize) {
    SEARCH_REQUESTS_TOTAL
        .with_label_values(&[kind, outcome])
        .inc();
    SEARCH_DURATION_SECONDS
        .with_label_values(&[kind])
        .observe(duration_secs);
    if outcome == "ok" {
        SEARCH_HITS_RETURNED
            .with_label_values(&[kind])
            .observe(hits as f64);
    }
}

/// Export metrics in Prometheus text format
pub fn gather_metrics() -> String {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let metric_families = PROMETHEUS_REGISTRY.gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::from("# Error encoding metrics\n");
    }

    String::from_utf8(buffer).unwrap_or_else(|e| {
        tracing::error!("Failed to convert metrics to string: {}", e);
        String::from("# Error converting metrics\n")
    })
}
