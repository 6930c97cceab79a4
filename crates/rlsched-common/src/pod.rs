use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::resource::{PodResourceRequest, MILLI};

/// Milli-GPU requested on each GPU (shared GPU pods use values below 1000).
pub const GPU_MILLI_ANNOTATION: &str = "alibabacloud.com/gpu-milli";
/// Number of GPUs requested.
pub const GPU_COUNT_ANNOTATION: &str = "alibabacloud.com/gpu-count";
/// Optional GPU card model the pod is pinned to.
pub const GPU_CARD_MODEL_ANNOTATION: &str = "alibabacloud.com/gpu-card-model";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContainerRequests {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub milli_cpu: i64,
}

/// The workload descriptor handed to the scorer.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pod {
    pub name: String,

    #[serde(default = "default_namespace")]
    pub namespace: String,

    #[serde(default)]
    pub annotations: BTreeMap<String, String>,

    #[serde(default)]
    pub containers: Vec<ContainerRequests>,
}

fn default_namespace() -> String {
    "default".to_string()
}

impl Pod {
    /// Derive the resource demand of this pod.
    ///
    /// CPU is the sum of container requests. GPU demand comes from the
    /// gpu-share annotations; a GPU count without a gpu-milli value asks for
    /// whole GPUs.
    pub fn resource_request(&self) -> PodResourceRequest {
        let milli_cpu = self
            .containers
            .iter()
            .fold(0i64, |acc, c| acc.saturating_add(c.milli_cpu.max(0)));

        let gpu_count = self.annotation_i64(GPU_COUNT_ANNOTATION).unwrap_or(0).max(0);
        let mut milli_gpu = self.annotation_i64(GPU_MILLI_ANNOTATION).unwrap_or(0).max(0);
        if gpu_count > 0 && milli_gpu == 0 {
            milli_gpu = MILLI;
        }

        let gpu_type = self
            .annotations
            .get(GPU_CARD_MODEL_ANNOTATION)
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        PodResourceRequest {
            milli_cpu,
            milli_gpu,
            gpu_count,
            gpu_type,
        }
    }

    fn annotation_i64(&self, key: &str) -> Option<i64> {
        let raw = self.annotations.get(key)?;
        match raw.trim().parse::<i64>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(pod = %self.name, key, value = %raw, error = %e, "ignoring unparseable annotation");
                None
            }
        }
    }
}
