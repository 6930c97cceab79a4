pub mod pod;
pub mod resource;

pub use pod::{ContainerRequests, Pod};
pub use resource::{is_node_accessible_to_pod, NodeResourceSnapshot, PodResourceRequest, MILLI};

pub mod telemetry;
