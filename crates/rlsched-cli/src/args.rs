use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "rlsched")]
#[command(about = "Score cluster nodes for a pod with the RL-aware scorer", long_about = None)]
pub struct Args {
    /// OTLP endpoint for exporting traces.
    #[arg(long, env = "RLSCHED_OTLP_ENDPOINT")]
    pub otlp_endpoint: Option<String>,

    /// Bearer token for the OTLP endpoint.
    #[arg(long, env = "RLSCHED_OTLP_TOKEN")]
    pub otlp_token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Rank every node of a cluster snapshot for a pod
    Rank {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        scoring: ScoringFlags,

        /// Print scorer metrics after the ranking
        #[arg(long)]
        metrics: bool,
    },
    /// Score a single node for a pod
    Score {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        scoring: ScoringFlags,

        /// Node to score
        #[arg(long)]
        node: String,
    },
}

#[derive(Debug, ClapArgs)]
pub struct InputArgs {
    /// Cluster snapshot (JSON, `{"nodes": [...]}`)
    #[arg(long)]
    pub cluster: PathBuf,

    /// Pod descriptor (JSON)
    #[arg(long)]
    pub pod: PathBuf,

    /// Overall deadline for one scoring pass, in milliseconds
    #[arg(long)]
    pub deadline_ms: Option<u64>,
}

#[derive(Debug, ClapArgs)]
pub struct ScoringFlags {
    /// Scorer options file (JSON: cpuWeight, gpuWeight, rlEndpoint, rlTimeoutMs)
    #[arg(long, env = "RLSCHED_CONFIG")]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub cpu_weight: Option<f64>,

    #[arg(long)]
    pub gpu_weight: Option<f64>,

    /// Remote RL scorer URL
    #[arg(long, env = "RLSCHED_RL_ENDPOINT")]
    pub rl_endpoint: Option<String>,

    /// Remote RL scorer timeout in milliseconds
    #[arg(long)]
    pub rl_timeout_ms: Option<u64>,
}
