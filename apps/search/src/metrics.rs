//! Prometheus metrics for product searches

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    /// Product searches by backend and outcome
    pub static ref SEARCHES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "storefront_searches_total",
        "Total number of product searches",
        &["backend", "status"]
    )
    .expect("Failed to register SEARCHES_TOTAL");

    /// End-to-end search duration including facets
    pub static ref SEARCH_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "storefront_search_duration_seconds",
        "Product search duration in seconds",
        &["backend"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0]
    )
    .expect("Failed to register SEARCH_DURATION_SECONDS");

    /// Facets by name and whether a result was produced
    pub static ref FACETS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "storefront_facets_total",
        "Facet computations by facet name and outcome",
        &["backend", "facet", "outcome"]
    )
    .expect("Failed to register FACETS_TOTAL");

    /// Criteria parts no registered handler claimed
    pub static ref SKIPPED_PARTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "storefront_skipped_criteria_parts_total",
        "Conditions, facets and sortings without a supporting handler",
        &["backend", "part", "kind"]
    )
    .expect("Failed to register SKIPPED_PARTS_TOTAL");
}

pub fn record_search(backend: &str, status: &str, seconds: f64) {
    SEARCHES_TOTAL.with_label_values(&[backend, status]).inc();
    SEARCH_DURATION_SECONDS
        .with_label_values(&[backend])
        .observe(seconds);
}

pub fn record_facet(backend: &str, facet: &str, generated: bool) {
    let outcome = if generated { "generated" } else { "omitted" };
    FACETS_TOTAL
        .with_label_values(&[backend, facet, outcome])
        .inc();
}

pub fn record_skipped(backend: &str, part: &str, kind: &str) {
    SKIPPED_PARTS_TOTAL
        .with_label_values(&[backend, part, kind])
        .inc();
}

/// Render all registered metrics in the text exposition format
pub fn gather() -> String {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::warn!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_facets_show_up_in_exposition() {
        record_facet("dbal", "manufacturer", false);
        let text = gather();
        assert!(text.contains("storefront_facets_total"));
        assert!(text.contains("outcome=\"omitted\""));
    }
}
