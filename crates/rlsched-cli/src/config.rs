use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::{json, Map, Value};

use crate::args::ScoringFlags;

/// Build the scorer options payload: file contents overlaid with flags.
pub fn build_options(flags: &ScoringFlags) -> Result<Value> {
    let base = match flags.config.as_deref() {
        Some(path) => read_json(path)?,
        None => Value::Object(Map::new()),
    };
    overlay_flags(base, flags)
}

pub fn read_json(path: &Path) -> Result<Value> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("failed to parse {}", path.display()))
}

fn overlay_flags(base: Value, flags: &ScoringFlags) -> Result<Value> {
    let Value::Object(mut options) = base else {
        bail!("scorer options must be a JSON object");
    };
    if let Some(w) = flags.cpu_weight {
        options.insert("cpuWeight".to_string(), json!(w));
    }
    if let Some(w) = flags.gpu_weight {
        options.insert("gpuWeight".to_string(), json!(w));
    }
    if let Some(endpoint) = &flags.rl_endpoint {
        options.insert("rlEndpoint".to_string(), json!(endpoint));
    }
    if let Some(ms) = flags.rl_timeout_ms {
        options.insert("rlTimeoutMs".to_string(), json!(ms));
    }
    Ok(Value::Object(options))
}
