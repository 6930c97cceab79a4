//! Remaining-capacity ratios of a node after placing a pod.

use rlsched_common::{NodeResourceSnapshot, PodResourceRequest};

/// CPU and GPU headroom left on a node after the pod lands, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ratios {
    pub cpu: f64,
    pub gpu: f64,
}

/// Compute the post-allocation headroom of `node` for `pod`.
///
/// The caller must already have checked that the node can host the pod.
pub fn compute_ratios(node: &NodeResourceSnapshot, pod: &PodResourceRequest) -> Ratios {
    Ratios {
        cpu: cpu_ratio(node, pod),
        gpu: gpu_ratio(node, pod),
    }
}

fn cpu_ratio(node: &NodeResourceSnapshot, pod: &PodResourceRequest) -> f64 {
    if node.milli_cpu_capacity <= 0 {
        return 0.0;
    }
    let left = node.milli_cpu_left as f64 - pod.milli_cpu as f64;
    clamp_unit(left / node.milli_cpu_capacity as f64)
}

fn gpu_ratio(node: &NodeResourceSnapshot, pod: &PodResourceRequest) -> f64 {
    // GPU-indifferent pair.
    if pod.gpu_count <= 0 && node.gpu_count <= 0 {
        return 1.0;
    }
    let total = node.total_milli_gpu_capacity();
    if total <= 0 {
        return 0.0;
    }
    let left = node.total_milli_gpu_left() as f64 - pod.total_milli_gpu() as f64;
    clamp_unit(left / total as f64)
}

/// Clamp to `[0, 1]`, mapping NaN to 0.
pub(crate) fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(cap: i64, left: i64, gpus: Vec<i64>) -> NodeResourceSnapshot {
        NodeResourceSnapshot {
            node_name: "n".to_string(),
            milli_cpu_capacity: cap,
            milli_cpu_left: left,
            gpu_count: gpus.len() as i64,
            milli_gpu_left_list: gpus,
            gpu_type: None,
        }
    }

    fn pod(cpu: i64, milli_gpu: i64, gpu_count: i64) -> PodResourceRequest {
        PodResourceRequest {
            milli_cpu: cpu,
            milli_gpu,
            gpu_count,
            gpu_type: None,
        }
    }

    #[test]
    fn cpu_headroom_after_allocation() {
        let r = compute_ratios(&node(1000, 500, vec![]), &pod(200, 0, 0));
        assert!((r.cpu - 0.3).abs() < 1e-12);
    }

    #[test]
    fn zero_cpu_capacity_scores_zero() {
        let r = compute_ratios(&node(0, 500, vec![]), &pod(0, 0, 0));
        assert_eq!(r.cpu, 0.0);
        let r = compute_ratios(&node(-10, 500, vec![]), &pod(0, 0, 0));
        assert_eq!(r.cpu, 0.0);
    }

    #[test]
    fn no_gpu_anywhere_is_indifferent() {
        for (cap, left, cpu) in [(1000, 500, 200), (0, 0, 0), (4000, -100, 9000)] {
            let r = compute_ratios(&node(cap, left, vec![]), &pod(cpu, 0, 0));
            assert_eq!(r.gpu, 1.0);
        }
    }

    #[test]
    fn gpu_pod_on_gpu_less_node_is_exactly_zero() {
        let r = compute_ratios(&node(1000, 1000, vec![]), &pod(100, 500, 1));
        assert_eq!(r.gpu, 0.0);
    }

    #[test]
    fn shared_gpu_headroom() {
        // 2 GPUs, 1500 milli left in total, pod takes 500.
        let r = compute_ratios(&node(1000, 1000, vec![1000, 500]), &pod(0, 500, 1));
        assert!((r.gpu - 0.5).abs() < 1e-12);
    }

    #[test]
    fn cpu_only_pod_on_gpu_node_measures_idle_gpus() {
        let r = compute_ratios(&node(1000, 1000, vec![1000, 0]), &pod(0, 0, 0));
        assert!((r.gpu - 0.5).abs() < 1e-12);
    }

    #[test]
    fn ratios_stay_in_unit_interval() {
        let cases = [
            (node(1000, -5000, vec![-300, -300]), pod(10_000, 1000, 4)),
            (node(1, i64::MAX / 2, vec![i64::MAX / 4]), pod(0, 0, 0)),
            (node(i64::MAX, i64::MIN / 2, vec![0; 8]), pod(i64::MAX / 2, 1000, 8)),
            (node(1000, 1000, vec![1000]), pod(-5000, -1000, 1)),
            (node(1000, 1000, vec![i64::MAX / 2 + 1, i64::MAX / 2 + 1]), pod(0, 1000, 1)),
            (node(1000, 1000, vec![i64::MIN, -1]), pod(0, 1000, 1)),
        ];
        for (n, p) in cases {
            let r = compute_ratios(&n, &p);
            assert!((0.0..=1.0).contains(&r.cpu), "cpu {} out of range", r.cpu);
            assert!((0.0..=1.0).contains(&r.gpu), "gpu {} out of range", r.gpu);
        }
    }

    #[test]
    fn overflowing_gpu_headroom_is_full() {
        let r = compute_ratios(
            &node(1000, 1000, vec![i64::MAX / 2 + 1, i64::MAX / 2 + 1]),
            &pod(0, 1000, 1),
        );
        assert_eq!(r.gpu, 1.0);
    }

    #[test]
    fn clamp_unit_handles_nan() {
        assert_eq!(clamp_unit(f64::NAN), 0.0);
        assert_eq!(clamp_unit(f64::INFINITY), 1.0);
        assert_eq!(clamp_unit(f64::NEG_INFINITY), 0.0);
    }
}
