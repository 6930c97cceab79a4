use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::ScoreContext;
use crate::error::{ConfigError, StrategyError};
use crate::metrics::ScoreMetrics;
use crate::ratio::{clamp_unit, Ratios};

/// What a strategy sees for one (pod, node) pair.
#[derive(Debug, Clone, Copy)]
pub struct ScoreInput<'a> {
    pub pod_name: &'a str,
    pub node_name: &'a str,
    pub ratios: Ratios,
}

/// Trait for pluggable node scoring policies.
/// A strategy turns ratios into a desirability fraction in `[0, 1]`.
#[async_trait]
pub trait ScoreStrategy: Send + Sync {
    async fn score(&self, ctx: &ScoreContext, input: &ScoreInput<'_>) -> Result<f64, StrategyError>;

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

// ---------------------------------------------------------------------------
// Local — weighted sum of the ratios
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
pub struct LocalStrategy {
    cpu_weight: f64,
    gpu_weight: f64,
}

impl LocalStrategy {
    pub fn new(cpu_weight: f64, gpu_weight: f64) -> Self {
        Self {
            cpu_weight,
            gpu_weight,
        }
    }

    pub fn compose(&self, ratios: Ratios) -> f64 {
        clamp_unit(ratios.cpu * self.cpu_weight + ratios.gpu * self.gpu_weight)
    }
}

#[async_trait]
impl ScoreStrategy for LocalStrategy {
    async fn score(&self, _ctx: &ScoreContext, input: &ScoreInput<'_>) -> Result<f64, StrategyError> {
        Ok(self.compose(input.ratios))
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

// ---------------------------------------------------------------------------
// Remote — one POST to an external RL scorer per call
// ---------------------------------------------------------------------------

/// Body sent to the remote scorer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteScoreRequest {
    pub pod: String,
    pub node: String,
    pub cpu_ratio: f64,
    pub gpu_ratio: f64,
}

/// Expected remote answer; other fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RemoteScoreResponse {
    pub score: f64,
}

pub struct RemoteStrategy {
    client: reqwest::Client,
    endpoint: String,
    timeout: Option<Duration>,
    metrics: Arc<ScoreMetrics>,
}

impl RemoteStrategy {
    pub fn new(
        endpoint: &str,
        timeout: Option<Duration>,
        metrics: Arc<ScoreMetrics>,
    ) -> Result<Self, ConfigError> {
        if let Err(e) = reqwest::Url::parse(endpoint) {
            // Every call will fail and fall back to local scoring.
            tracing::warn!(endpoint, error = %e, "remote scorer endpoint is not a valid URL");
        }
        let client = reqwest::Client::builder()
            .build()
            .map_err(ConfigError::Client)?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            timeout,
            metrics,
        })
    }

    async fn call(&self, body: &RemoteScoreRequest) -> Result<f64, StrategyError> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await
            .map_err(StrategyError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(StrategyError::Status(status));
        }

        let answer: RemoteScoreResponse = resp.json().await.map_err(StrategyError::Decode)?;
        if !answer.score.is_finite() {
            return Err(StrategyError::InvalidScore);
        }
        Ok(clamp_unit(answer.score))
    }
}

#[async_trait]
impl ScoreStrategy for RemoteStrategy {
    async fn score(&self, ctx: &ScoreContext, input: &ScoreInput<'_>) -> Result<f64, StrategyError> {
        let body = RemoteScoreRequest {
            pod: input.pod_name.to_string(),
            node: input.node_name.to_string(),
            cpu_ratio: input.ratios.cpu,
            gpu_ratio: input.ratios.gpu,
        };

        let bounded = async {
            match ctx.effective_deadline(self.timeout) {
                Some(deadline) => match tokio::time::timeout_at(deadline, self.call(&body)).await {
                    Ok(res) => res,
                    Err(_) => Err(StrategyError::Timeout),
                },
                None => self.call(&body).await,
            }
        };

        let res = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => Err(StrategyError::Cancelled),
            res = bounded => res,
        };
        if res.is_ok() {
            ScoreMetrics::inc(&self.metrics.remote_success_total);
        }
        res
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

// ---------------------------------------------------------------------------
// WithFallback — run `primary`, fall back to `fallback` on any error
// ---------------------------------------------------------------------------

pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
    metrics: Arc<ScoreMetrics>,
}

impl<P, F> WithFallback<P, F> {
    pub fn new(primary: P, fallback: F, metrics: Arc<ScoreMetrics>) -> Self {
        Self {
            primary,
            fallback,
            metrics,
        }
    }
}

#[async_trait]
impl<P: ScoreStrategy, F: ScoreStrategy> ScoreStrategy for WithFallback<P, F> {
    async fn score(&self, ctx: &ScoreContext, input: &ScoreInput<'_>) -> Result<f64, StrategyError> {
        match self.primary.score(ctx, input).await {
            Ok(fraction) => Ok(fraction),
            Err(e) => {
                self.metrics.record_fallback(&e);
                tracing::debug!(
                    cycle_id = %ctx.cycle_id,
                    pod = input.pod_name,
                    node = input.node_name,
                    primary = self.primary.name(),
                    fallback = self.fallback.name(),
                    kind = e.kind(),
                    error = %e,
                    "score strategy failed, falling back"
                );
                self.fallback.score(ctx, input).await
            }
        }
    }

    fn name(&self) -> &'static str {
        "with_fallback"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    use axum::{http::StatusCode, routing::post, Json, Router};
    use tokio_util::sync::CancellationToken;

    const INPUT: ScoreInput<'static> = ScoreInput {
        pod_name: "p1",
        node_name: "n1",
        ratios: Ratios { cpu: 0.3, gpu: 1.0 },
    };

    async fn serve(app: Router) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        addr
    }

    fn remote(addr: SocketAddr, timeout: Option<Duration>) -> (RemoteStrategy, Arc<ScoreMetrics>) {
        let metrics = Arc::new(ScoreMetrics::default());
        let strategy =
            RemoteStrategy::new(&format!("http://{addr}/score"), timeout, metrics.clone()).unwrap();
        (strategy, metrics)
    }

    /// A port with nothing listening on it.
    async fn closed_addr() -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        addr
    }

    #[tokio::test]
    async fn local_weighted_sum() {
        let local = LocalStrategy::new(0.5, 0.5);
        let s = local.score(&ScoreContext::new(), &INPUT).await.unwrap();
        assert!((s - 0.65).abs() < 1e-12);
        assert_eq!(local.name(), "local");
    }

    #[tokio::test]
    async fn remote_sends_wire_body_and_returns_score() {
        let app = Router::new().route(
            "/score",
            post(|Json(req): Json<RemoteScoreRequest>| async move {
                assert_eq!(req.pod, "p1");
                assert_eq!(req.node, "n1");
                assert_eq!(req.cpu_ratio, 0.3);
                assert_eq!(req.gpu_ratio, 1.0);
                Json(serde_json::json!({ "score": 0.42, "policy": "ppo" }))
            }),
        );
        let (strategy, metrics) = remote(serve(app).await, Some(Duration::from_secs(5)));

        let s = strategy.score(&ScoreContext::new(), &INPUT).await.unwrap();
        assert!((s - 0.42).abs() < 1e-12);
        assert_eq!(metrics.remote_success_total.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn remote_clamps_out_of_range() {
        let app = Router::new().route("/score", post(|| async { Json(serde_json::json!({ "score": 1.5 })) }));
        let (strategy, _) = remote(serve(app).await, None);
        assert_eq!(strategy.score(&ScoreContext::new(), &INPUT).await.unwrap(), 1.0);

        let app = Router::new().route("/score", post(|| async { Json(serde_json::json!({ "score": -3.0 })) }));
        let (strategy, _) = remote(serve(app).await, None);
        assert_eq!(strategy.score(&ScoreContext::new(), &INPUT).await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn remote_non_2xx_is_an_error() {
        let app = Router::new().route(
            "/score",
            post(|| async { (StatusCode::SERVICE_UNAVAILABLE, Json(serde_json::json!({ "score": 0.9 }))) }),
        );
        let (strategy, _) = remote(serve(app).await, None);
        let err = strategy.score(&ScoreContext::new(), &INPUT).await.unwrap_err();
        assert!(matches!(err, StrategyError::Status(s) if s == StatusCode::SERVICE_UNAVAILABLE));
    }

    #[tokio::test]
    async fn remote_missing_score_is_an_error() {
        let app = Router::new().route("/score", post(|| async { Json(serde_json::json!({ "value": 0.9 })) }));
        let (strategy, _) = remote(serve(app).await, None);
        let err = strategy.score(&ScoreContext::new(), &INPUT).await.unwrap_err();
        assert!(matches!(err, StrategyError::Decode(_)));

        let app = Router::new().route("/score", post(|| async { "not json" }));
        let (strategy, _) = remote(serve(app).await, None);
        let err = strategy.score(&ScoreContext::new(), &INPUT).await.unwrap_err();
        assert!(matches!(err, StrategyError::Decode(_)));
    }

    #[tokio::test]
    async fn remote_connection_refused_is_an_error() {
        let (strategy, _) = remote(closed_addr().await, Some(Duration::from_secs(2)));
        let err = strategy.score(&ScoreContext::new(), &INPUT).await.unwrap_err();
        assert!(matches!(err, StrategyError::Transport(_)));
    }

    #[tokio::test]
    async fn remote_times_out() {
        let app = Router::new().route(
            "/score",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({ "score": 0.9 }))
            }),
        );
        let (strategy, _) = remote(serve(app).await, Some(Duration::from_millis(50)));
        let err = strategy.score(&ScoreContext::new(), &INPUT).await.unwrap_err();
        assert!(matches!(err, StrategyError::Timeout));
    }

    #[tokio::test]
    async fn remote_respects_ambient_deadline() {
        let app = Router::new().route(
            "/score",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({ "score": 0.9 }))
            }),
        );
        let (strategy, _) = remote(serve(app).await, None);
        let ctx = ScoreContext::new().with_timeout(Duration::from_millis(50));
        let err = strategy.score(&ctx, &INPUT).await.unwrap_err();
        assert!(matches!(err, StrategyError::Timeout));
    }

    #[tokio::test]
    async fn remote_aborts_on_cancellation() {
        let app = Router::new().route(
            "/score",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Json(serde_json::json!({ "score": 0.9 }))
            }),
        );
        let (strategy, _) = remote(serve(app).await, None);
        let token = CancellationToken::new();
        let ctx = ScoreContext::with_cancel(token.clone());
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            token.cancel();
        });
        let err = strategy.score(&ctx, &INPUT).await.unwrap_err();
        assert!(matches!(err, StrategyError::Cancelled));
    }

    #[tokio::test]
    async fn malformed_endpoint_fails_per_call() {
        let metrics = Arc::new(ScoreMetrics::default());
        let strategy = RemoteStrategy::new("not a url", None, metrics).unwrap();
        let err = strategy.score(&ScoreContext::new(), &INPUT).await.unwrap_err();
        assert!(matches!(err, StrategyError::Transport(_)));
    }

    #[tokio::test]
    async fn fallback_is_transparent() {
        let metrics = Arc::new(ScoreMetrics::default());
        let (primary, _) = remote(closed_addr().await, Some(Duration::from_secs(2)));
        let local = LocalStrategy::new(0.5, 0.5);
        let chained = WithFallback::new(primary, local, metrics.clone());

        let ctx = ScoreContext::new();
        let got = chained.score(&ctx, &INPUT).await.unwrap();
        let want = local.score(&ctx, &INPUT).await.unwrap();
        assert_eq!(got, want);
        assert_eq!(metrics.remote_fallback_total.load(std::sync::atomic::Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn fallback_not_used_on_success() {
        let metrics = Arc::new(ScoreMetrics::default());
        let app = Router::new().route("/score", post(|| async { Json(serde_json::json!({ "score": 0.1 })) }));
        let (primary, _) = remote(serve(app).await, None);
        let chained = WithFallback::new(primary, LocalStrategy::new(0.5, 0.5), metrics.clone());

        let got = chained.score(&ScoreContext::new(), &INPUT).await.unwrap();
        assert!((got - 0.1).abs() < 1e-12);
        assert_eq!(metrics.remote_fallback_total.load(std::sync::atomic::Ordering::Relaxed), 0);
    }
}
