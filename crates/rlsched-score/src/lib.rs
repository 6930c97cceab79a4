//! RL-aware node scoring for a placement scheduler.
//!
//! Nodes are ranked by the CPU and GPU headroom a pod would leave behind.
//! Headroom ratios are combined with configurable weights, or handed to an
//! external RL scorer with transparent fallback to the weighted sum.

pub mod cluster;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod plugin;
pub mod ratio;
pub mod registry;
pub mod strategy;

pub use cluster::{ClusterSnapshot, ClusterView, MemoryClusterView};
pub use config::{ScoringArgs, ScoringConfig};
pub use context::ScoreContext;
pub use error::{ConfigError, StrategyError};
pub use metrics::ScoreMetrics;
pub use plugin::{
    scale_to_node_score, RlSchedulerScore, ScorePlugin, ScoreResult, ScoreStatus, MAX_NODE_SCORE,
    MIN_NODE_SCORE, PLUGIN_NAME,
};
pub use ratio::{compute_ratios, Ratios};
pub use registry::Registry;
pub use strategy::{
    LocalStrategy, RemoteScoreRequest, RemoteScoreResponse, RemoteStrategy, ScoreInput,
    ScoreStrategy, WithFallback,
};
