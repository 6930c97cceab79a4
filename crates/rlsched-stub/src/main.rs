use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use clap::Parser;

use rlsched_score::{
    LocalStrategy, Ratios, RemoteScoreRequest, RemoteScoreResponse, ScoringArgs, ScoringConfig,
};

#[derive(Parser)]
#[command(name = "rlsched-stub", about = "Stand-in remote scorer speaking the RL scoring protocol")]
struct Args {
    /// Bind address for the HTTP server
    #[arg(long, env = "RLSCHED_STUB_ADDR", default_value = "127.0.0.1:18090")]
    listen_addr: String,

    #[arg(long, default_value_t = 0.5)]
    cpu_weight: f64,

    #[arg(long, default_value_t = 0.5)]
    gpu_weight: f64,

    /// Artificial delay before answering, to exercise caller timeouts
    #[arg(long, default_value_t = 0)]
    delay_ms: u64,
}

#[derive(Clone)]
struct StubState {
    policy: LocalStrategy,
    delay: Duration,
}

async fn score(State(st): State<Arc<StubState>>, Json(req): Json<RemoteScoreRequest>) -> Json<RemoteScoreResponse> {
    if !st.delay.is_zero() {
        tokio::time::sleep(st.delay).await;
    }
    let score = st.policy.compose(Ratios {
        cpu: req.cpu_ratio,
        gpu: req.gpu_ratio,
    });
    tracing::debug!(pod = %req.pod, node = %req.node, score, "scored");
    Json(RemoteScoreResponse { score })
}

async fn healthz() -> &'static str {
    "ok"
}

fn app(state: StubState) -> Router {
    Router::new()
        .route("/score", post(score))
        .route("/healthz", get(healthz))
        .with_state(Arc::new(state))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _otel_guard = rlsched_common::telemetry::init_tracing("rlsched-stub", "info", None, None);
    let args = Args::parse();

    let weights = ScoringConfig::from_args(ScoringArgs {
        cpu_weight: args.cpu_weight,
        gpu_weight: args.gpu_weight,
        ..ScoringArgs::default()
    });
    let (cpu_weight, gpu_weight) = (weights.cpu_weight(), weights.gpu_weight());
    let state = StubState {
        policy: LocalStrategy::new(cpu_weight, gpu_weight),
        delay: Duration::from_millis(args.delay_ms),
    };

    let listener = tokio::net::TcpListener::bind(&args.listen_addr).await?;
    tracing::info!(listen_addr = %args.listen_addr, cpu_weight, gpu_weight, delay_ms = args.delay_ms, "rlsched-stub listening");
    axum::serve(listener, app(state)).await?;
    Ok(())
}
