//! Scorer options and their normalized, immutable form.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const DEFAULT_WEIGHT: f64 = 0.5;

/// Options as supplied by the host scheduler configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScoringArgs {
    /// Weight of the remaining CPU ratio.
    pub cpu_weight: f64,

    /// Weight of the remaining GPU ratio.
    pub gpu_weight: f64,

    /// Remote RL scorer URL; empty disables remote scoring.
    #[serde(rename = "rlEndpoint", alias = "remoteEndpoint")]
    pub rl_endpoint: String,

    /// Per-call timeout for the remote scorer; `<= 0` means none beyond the caller's.
    #[serde(rename = "rlTimeoutMs", alias = "remoteTimeoutMs")]
    pub rl_timeout_ms: i64,
}

impl Default for ScoringArgs {
    fn default() -> Self {
        Self {
            cpu_weight: DEFAULT_WEIGHT,
            gpu_weight: DEFAULT_WEIGHT,
            rl_endpoint: String::new(),
            rl_timeout_ms: 0,
        }
    }
}

/// Normalized scoring configuration. `cpu_weight + gpu_weight == 1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringConfig {
    cpu_weight: f64,
    gpu_weight: f64,
    remote_endpoint: Option<String>,
    remote_timeout: Option<Duration>,
}

impl ScoringConfig {
    pub fn from_args(args: ScoringArgs) -> Self {
        let cpu = non_negative(args.cpu_weight);
        let gpu = non_negative(args.gpu_weight);
        // Scale by the larger weight first so two huge weights cannot sum to inf.
        let max = cpu.max(gpu);
        let (cpu_weight, gpu_weight) = if max > 0.0 {
            let (cpu, gpu) = (cpu / max, gpu / max);
            let sum = cpu + gpu;
            (cpu / sum, gpu / sum)
        } else {
            (DEFAULT_WEIGHT, DEFAULT_WEIGHT)
        };

        let endpoint = args.rl_endpoint.trim();
        Self {
            cpu_weight,
            gpu_weight,
            remote_endpoint: (!endpoint.is_empty()).then(|| endpoint.to_string()),
            remote_timeout: u64::try_from(args.rl_timeout_ms)
                .ok()
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
        }
    }

    /// Decode an opaque options payload. `None` means all defaults.
    pub fn from_json(value: Option<&serde_json::Value>) -> Result<Self, ConfigError> {
        let args = match value {
            Some(v) if !v.is_null() => ScoringArgs::deserialize(v)?,
            _ => ScoringArgs::default(),
        };
        Ok(Self::from_args(args))
    }

    pub fn cpu_weight(&self) -> f64 {
        self.cpu_weight
    }

    pub fn gpu_weight(&self) -> f64 {
        self.gpu_weight
    }

    pub fn remote_endpoint(&self) -> Option<&str> {
        self.remote_endpoint.as_deref()
    }

    pub fn remote_timeout(&self) -> Option<Duration> {
        self.remote_timeout
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::from_args(ScoringArgs::default())
    }
}

fn non_negative(w: f64) -> f64 {
    if w.is_finite() && w > 0.0 {
        w
    } else {
        0.0
    }
}
