use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static FEATURES_CREATED_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "feature_vote_features_created_total",
        "Total features submitted"
    )
    .expect("register features_created_total")
});

pub static VOTES_CAST_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "feature_vote_votes_cast_total",
        "Total votes recorded"
    )
    .expect("register votes_cast_total")
});

pub static VOTES_REJECTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feature_vote_votes_rejected_total",
        "Vote attempts rejected, by reason",
        &["reason"]
    )
    .expect("register votes_rejected_total")
});

pub static STORE_ERRORS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "feature_vote_store_errors_total",
        "Requests failed by the persistence layer",
        &["kind"]
    )
    .expect("register store_errors_total")
});

/// Touch every metric so it shows up in the exposition before its first event.
pub fn init_metrics() {
    Lazy::force(&FEATURES_CREATED_TOTAL);
    Lazy::force(&VOTES_CAST_TOTAL);
    for reason in ["not_found", "duplicate"] {
        VOTES_REJECTED_TOTAL.with_label_values(&[reason]);
    }
    for kind in ["unavailable", "internal"] {
        STORE_ERRORS_TOTAL.with_label_values(&[kind]);
    }
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
