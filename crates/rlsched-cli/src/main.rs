mod args;
mod config;
mod output;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use futures_util::future::join_all;

use rlsched_common::Pod;
use rlsched_score::{
    ClusterSnapshot, MemoryClusterView, Registry, ScoreContext, ScorePlugin, PLUGIN_NAME,
};

use crate::args::{Args, Command, InputArgs, ScoringFlags};
use crate::config::{build_options, read_json};
use crate::output::{print_ranking, print_single, sort_ranking, RankedNode};

struct Loaded {
    view: Arc<MemoryClusterView>,
    pod: Pod,
    plugin: Arc<dyn ScorePlugin>,
    ctx: ScoreContext,
}

fn load(input: &InputArgs, flags: &ScoringFlags) -> Result<Loaded> {
    let snapshot: ClusterSnapshot = load_json(&input.cluster)?;
    let pod: Pod = load_json(&input.pod)?;
    let view = Arc::new(MemoryClusterView::from_snapshot(snapshot));
    tracing::info!(nodes = view.len(), pod = %pod.name, "loaded cluster snapshot");

    let options = build_options(flags)?;
    let plugin = Registry::with_defaults()
        .build(PLUGIN_NAME, Some(&options), view.clone())
        .context("failed to construct score plugin")?;

    let mut ctx = ScoreContext::new();
    if let Some(ms) = input.deadline_ms {
        ctx = ctx.with_timeout(Duration::from_millis(ms));
    }

    Ok(Loaded {
        view,
        pod,
        plugin,
        ctx,
    })
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let value = read_json(path)?;
    serde_json::from_value(value).with_context(|| format!("unexpected shape in {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let _otel_guard = rlsched_common::telemetry::init_tracing(
        "rlsched",
        "warn",
        args.otlp_endpoint.as_deref(),
        args.otlp_token.as_deref(),
    );

    run(args.command).await
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Rank {
            input,
            scoring,
            metrics,
        } => {
            let loaded = load(&input, &scoring)?;
            let names = loaded.view.node_names();
            let scores = join_all(
                names
                    .iter()
                    .map(|name| loaded.plugin.score(&loaded.ctx, &loaded.pod, name)),
            )
            .await;

            let mut rows: Vec<RankedNode> = names
                .into_iter()
                .zip(scores)
                .map(|(node_name, result)| RankedNode { node_name, result })
                .collect();
            sort_ranking(&mut rows);
            print_ranking(&loaded.pod.name, &rows);

            if metrics {
                if let Some(m) = loaded.plugin.score_metrics() {
                    print!("{}", m.render());
                }
            }
        }
        Command::Score {
            input,
            scoring,
            node,
        } => {
            let loaded = load(&input, &scoring)?;
            let result = loaded.plugin.score(&loaded.ctx, &loaded.pod, &node).await;
            print_single(&loaded.pod.name, &node, &result);
        }
    }
    Ok(())
}
