use serde::{Deserialize, Serialize};

/// Milli-units per whole CPU core or per whole GPU.
pub const MILLI: i64 = 1000;

/// Remaining and total resources of a single node, as seen by the scorer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeResourceSnapshot {
    pub node_name: String,
    pub milli_cpu_capacity: i64,
    pub milli_cpu_left: i64,

    /// Remaining milli-GPU per physical GPU, indexed by GPU slot.
    #[serde(default)]
    pub milli_gpu_left_list: Vec<i64>,

    #[serde(default)]
    pub gpu_count: i64,

    #[serde(default)]
    pub gpu_type: Option<String>,
}

impl NodeResourceSnapshot {
    pub fn total_milli_gpu_left(&self) -> i64 {
        self.milli_gpu_left_list
            .iter()
            .fold(0i64, |acc, v| acc.saturating_add(*v))
    }

    pub fn total_milli_gpu_capacity(&self) -> i64 {
        self.gpu_count.saturating_mul(MILLI)
    }
}

/// Resources requested by a pod.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PodResourceRequest {
    pub milli_cpu: i64,

    /// Requested milli-GPU on each of `gpu_count` GPUs.
    #[serde(default)]
    pub milli_gpu: i64,

    #[serde(default)]
    pub gpu_count: i64,

    #[serde(default)]
    pub gpu_type: Option<String>,
}

impl PodResourceRequest {
    pub fn total_milli_gpu(&self) -> i64 {
        self.milli_gpu.saturating_mul(self.gpu_count)
    }

    pub fn wants_gpu(&self) -> bool {
        self.gpu_count > 0
    }
}

/// Whether `node` can host `pod` at all.
///
/// CPU must fit, and a GPU pod needs `gpu_count` distinct GPUs that each
/// have at least `milli_gpu` left. A pod that names a GPU model only fits
/// nodes of that model.
pub fn is_node_accessible_to_pod(node: &NodeResourceSnapshot, pod: &PodResourceRequest) -> bool {
    if node.milli_cpu_left < pod.milli_cpu {
        return false;
    }
    if !pod.wants_gpu() {
        return true;
    }

    if let Some(wanted) = pod.gpu_type.as_deref() {
        if node.gpu_type.as_deref() != Some(wanted) {
            return false;
        }
    }

    let fitting = node
        .milli_gpu_left_list
        .iter()
        .filter(|left| **left >= pod.milli_gpu)
        .count();
    fitting as i64 >= pod.gpu_count
}
