use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::StrategyError;

/// Counters for the scorer, safe for concurrent access.
#[derive(Debug, Default)]
pub struct ScoreMetrics {
    /// Total score invocations.
    pub scores_total: AtomicU64,
    /// Nodes unknown to the cluster view.
    pub unknown_node_total: AtomicU64,
    /// Nodes that cannot host the pod.
    pub inaccessible_total: AtomicU64,
    /// Scores answered by the remote scorer.
    pub remote_success_total: AtomicU64,
    /// Remote attempts that fell back to local scoring.
    pub remote_fallback_total: AtomicU64,
    /// Fallbacks caused by a timeout.
    pub remote_timeout_total: AtomicU64,
    /// Fallbacks caused by caller cancellation.
    pub remote_cancelled_total: AtomicU64,
}

impl ScoreMetrics {
    pub fn inc(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fallback(&self, err: &StrategyError) {
        Self::inc(&self.remote_fallback_total);
        match err.kind() {
            "timeout" => Self::inc(&self.remote_timeout_total),
            "cancelled" => Self::inc(&self.remote_cancelled_total),
            _ => {}
        }
    }

    /// Prometheus text exposition format.
    pub fn render(&self) -> String {
        let rows: [(&str, &str, &str, &AtomicU64); 7] = [
            ("rlsched_scores_total", "counter", "Score invocations.", &self.scores_total),
            ("rlsched_unknown_node_total", "counter", "Nodes unknown to the cluster view.", &self.unknown_node_total),
            ("rlsched_inaccessible_total", "counter", "Nodes unable to host the pod.", &self.inaccessible_total),
            ("rlsched_remote_success_total", "counter", "Scores answered by the remote scorer.", &self.remote_success_total),
            ("rlsched_remote_fallback_total", "counter", "Remote attempts that fell back to local scoring.", &self.remote_fallback_total),
            ("rlsched_remote_timeout_total", "counter", "Remote attempts that timed out.", &self.remote_timeout_total),
            ("rlsched_remote_cancelled_total", "counter", "Remote attempts cancelled by the caller.", &self.remote_cancelled_total),
        ];

        let mut body = String::new();
        for (name, kind, help, value) in rows {
            body.push_str(&format!(
                "# HELP {name} {help}\n# TYPE {name} {kind}\n{name} {}\n",
                value.load(Ordering::Relaxed)
            ));
        }
        body
    }
}
