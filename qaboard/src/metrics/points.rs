//! Points ledger metrics for Prometheus.

use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntCounterVec, register_int_counter, register_int_counter_vec};

/// Counter for tips that committed
static TIPS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("qaboard_tips_total", "Total tips transferred between users")
        .expect("Failed to register qaboard_tips_total metric")
});

/// Points moved by tips and spent on questions
static POINTS_MOVED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "qaboard_points_moved_total",
        "Total points moved by the ledger, by reason",
        &["reason"]
    )
    .expect("Failed to register qaboard_points_moved_total metric")
});

/// Counter for questions posted
static QUESTIONS_POSTED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("qaboard_questions_posted_total", "Total questions posted")
        .expect("Failed to register qaboard_questions_posted_total metric")
});

/// Counter for tips that were rejected or rolled back
static TIP_ERRORS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("qaboard_tip_errors_total", "Total tips that failed or were rejected")
        .expect("Failed to register qaboard_tip_errors_total metric")
});

/// Record a committed tip of `amount` points
pub fn record_tip(amount: i32) {
    TIPS_TOTAL.inc();
    POINTS_MOVED.with_label_values(&["tip"]).inc_by(amount.max(0) as u64);
}

/// Record a tip that did not happen
pub fn record_tip_error() {
    TIP_ERRORS.inc();
}

/// Record a question and the points its author paid for it
pub fn record_question(cost: i32) {
    QUESTIONS_POSTED.inc();
    POINTS_MOVED.with_label_values(&["question"]).inc_by(cost.max(0) as u64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tip_counts_points() {
        let tips_before = TIPS_TOTAL.get();
        let points_before = POINTS_MOVED.with_label_values(&["tip"]).get();

        record_tip(5);

        assert!(TIPS_TOTAL.get() > tips_before);
        assert!(POINTS_MOVED.with_label_values(&["tip"]).get() >= points_before + 5);
    }

    #[test]
    fn test_metrics_show_up_in_render() {
        record_question(10);
        let rendered = crate::metrics::render(String::new());
        assert!(rendered.contains("qaboard_questions_posted_total"));
        assert!(rendered.contains("qaboard_points_moved_total"));
    }
}
