use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use rlsched_common::{is_node_accessible_to_pod, NodeResourceSnapshot, Pod, PodResourceRequest};

/// Read access to cluster state, supplied by the host scheduler.
pub trait ClusterView: Send + Sync {
    /// Remaining resources of a node, or `None` if the node is unknown.
    fn node_resources(&self, node_name: &str) -> Option<NodeResourceSnapshot>;

    /// Resource demand of a pod.
    fn pod_resources(&self, pod: &Pod) -> PodResourceRequest {
        pod.resource_request()
    }

    /// Whether the node can host the pod at all.
    fn is_accessible(&self, node: &NodeResourceSnapshot, pod: &PodResourceRequest) -> bool {
        is_node_accessible_to_pod(node, pod)
    }
}

/// Serialized form of a set of node snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClusterSnapshot {
    #[serde(default)]
    pub nodes: Vec<NodeResourceSnapshot>,
}

/// In-memory cluster view keyed by node name.
#[derive(Debug, Default)]
pub struct MemoryClusterView {
    nodes: DashMap<String, NodeResourceSnapshot>,
}

impl MemoryClusterView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: ClusterSnapshot) -> Self {
        let view = Self::new();
        for node in snapshot.nodes {
            view.upsert_node(node);
        }
        view
    }

    pub fn upsert_node(&self, node: NodeResourceSnapshot) {
        self.nodes.insert(node.node_name.clone(), node);
    }

    pub fn remove_node(&self, node_name: &str) -> Option<NodeResourceSnapshot> {
        self.nodes.remove(node_name).map(|(_, v)| v)
    }

    /// Node names, sorted.
    pub fn node_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.nodes.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ClusterView for MemoryClusterView {
    fn node_resources(&self, node_name: &str) -> Option<NodeResourceSnapshot> {
        self.nodes.get(node_name).map(|n| n.value().clone())
    }
}
