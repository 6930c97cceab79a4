//! The RL-aware node score plugin.
//!
//! For every (pod, node) pair the plugin resolves node and pod resources,
//! drops unscoreable nodes to [`MIN_NODE_SCORE`], computes remaining-capacity
//! ratios and asks its strategy chain for a fraction that is scaled to
//! `[MIN_NODE_SCORE, MAX_NODE_SCORE]`. Scoring never fails at call time.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use rlsched_common::Pod;

use crate::cluster::ClusterView;
use crate::config::ScoringConfig;
use crate::context::ScoreContext;
use crate::error::ConfigError;
use crate::metrics::ScoreMetrics;
use crate::ratio::{clamp_unit, compute_ratios};
use crate::strategy::{LocalStrategy, RemoteStrategy, ScoreInput, ScoreStrategy, WithFallback};

pub const PLUGIN_NAME: &str = "RLSchedulerScore";
pub const MIN_NODE_SCORE: i64 = 0;
pub const MAX_NODE_SCORE: i64 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreStatus {
    Success,
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreResult {
    pub score: i64,
    pub status: ScoreStatus,
}

impl ScoreResult {
    pub fn success(score: i64) -> Self {
        Self {
            score: score.clamp(MIN_NODE_SCORE, MAX_NODE_SCORE),
            status: ScoreStatus::Success,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ScoreStatus::Success
    }
}

/// A node score plugin as the scheduling framework sees it.
#[async_trait]
pub trait ScorePlugin: Send + Sync {
    fn name(&self) -> &str;

    async fn score(&self, ctx: &ScoreContext, pod: &Pod, node_name: &str) -> ScoreResult;

    fn score_metrics(&self) -> Option<&ScoreMetrics> {
        None
    }
}

/// Scale a `[0, 1]` fraction to the node score range, truncating.
pub fn scale_to_node_score(fraction: f64) -> i64 {
    let scaled = (clamp_unit(fraction) * MAX_NODE_SCORE as f64) as i64;
    scaled.clamp(MIN_NODE_SCORE, MAX_NODE_SCORE)
}

pub struct RlSchedulerScore {
    config: ScoringConfig,
    view: Arc<dyn ClusterView>,
    local: LocalStrategy,
    strategy: Box<dyn ScoreStrategy>,
    metrics: Arc<ScoreMetrics>,
}

impl std::fmt::Debug for RlSchedulerScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RlSchedulerScore")
            .field("config", &self.config)
            .field("strategy", &self.strategy.name())
            .finish()
    }
}

impl RlSchedulerScore {
    pub fn new(config: ScoringConfig, view: Arc<dyn ClusterView>) -> Result<Self, ConfigError> {
        let metrics = Arc::new(ScoreMetrics::default());
        let local = LocalStrategy::new(config.cpu_weight(), config.gpu_weight());

        let strategy: Box<dyn ScoreStrategy> = match config.remote_endpoint() {
            Some(endpoint) => {
                let remote = RemoteStrategy::new(endpoint, config.remote_timeout(), metrics.clone())?;
                Box::new(WithFallback::new(remote, local, metrics.clone()))
            }
            None => Box::new(local),
        };

        tracing::info!(
            cpu_weight = config.cpu_weight(),
            gpu_weight = config.gpu_weight(),
            remote_endpoint = config.remote_endpoint().unwrap_or(""),
            remote_timeout_ms = config.remote_timeout().map(|t| t.as_millis() as u64).unwrap_or(0),
            strategy = strategy.name(),
            "score plugin initialized"
        );

        Ok(Self {
            config,
            view,
            local,
            strategy,
            metrics,
        })
    }

    /// Build from an opaque options payload.
    pub fn from_json(
        options: Option<&serde_json::Value>,
        view: Arc<dyn ClusterView>,
    ) -> Result<Self, ConfigError> {
        Self::new(ScoringConfig::from_json(options)?, view)
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn metrics(&self) -> &ScoreMetrics {
        &self.metrics
    }
}

#[async_trait]
impl ScorePlugin for RlSchedulerScore {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn score_metrics(&self) -> Option<&ScoreMetrics> {
        Some(&self.metrics)
    }

    async fn score(&self, ctx: &ScoreContext, pod: &Pod, node_name: &str) -> ScoreResult {
        ScoreMetrics::inc(&self.metrics.scores_total);

        let Some(node) = self.view.node_resources(node_name) else {
            ScoreMetrics::inc(&self.metrics.unknown_node_total);
            debug!(cycle_id = %ctx.cycle_id, node = node_name, "node unknown to cluster view");
            return ScoreResult::success(MIN_NODE_SCORE);
        };

        let request = self.view.pod_resources(pod);
        if !self.view.is_accessible(&node, &request) {
            ScoreMetrics::inc(&self.metrics.inaccessible_total);
            debug!(cycle_id = %ctx.cycle_id, pod = %pod.name, node = node_name, "node cannot host pod");
            return ScoreResult::success(MIN_NODE_SCORE);
        }

        let ratios = compute_ratios(&node, &request);
        let input = ScoreInput {
            pod_name: &pod.name,
            node_name,
            ratios,
        };

        let fraction = match self.strategy.score(ctx, &input).await {
            Ok(f) => f,
            Err(e) => {
                warn!(cycle_id = %ctx.cycle_id, node = node_name, error = %e, "score strategy failed, using local weights");
                self.local.compose(ratios)
            }
        };

        let score = scale_to_node_score(fraction);
        debug!(
            cycle_id = %ctx.cycle_id,
            pod = %pod.name,
            node = node_name,
            cpu_ratio = ratios.cpu,
            gpu_ratio = ratios.gpu,
            score,
            "scored node"
        );
        ScoreResult::success(score)
    }
}
