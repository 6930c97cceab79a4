use rlsched_score::{ScoreResult, ScoreStatus};

pub struct RankedNode {
    pub node_name: String,
    pub result: ScoreResult,
}

/// Order by score descending, ties by node name.
pub fn sort_ranking(rows: &mut [RankedNode]) {
    rows.sort_by(|a, b| {
        b.result
            .score
            .cmp(&a.result.score)
            .then_with(|| a.node_name.cmp(&b.node_name))
    });
}

pub fn print_ranking(pod_name: &str, rows: &[RankedNode]) {
    println!("\n=== Node ranking for pod '{}' ===\n", pod_name);
    if rows.is_empty() {
        println!("  (No nodes in cluster snapshot)");
        println!();
        return;
    }
    println!("  {:<6} {:<30} {:>6} {:<10}", "Rank", "Node", "Score", "Status");
    println!("  {:-<56}", "");
    for (i, row) in rows.iter().enumerate() {
        println!(
            "  {:<6} {:<30} {:>6} {:<10}",
            i + 1,
            row.node_name,
            row.result.score,
            status_str(&row.result.status)
        );
    }
    println!();
}

pub fn print_single(pod_name: &str, node_name: &str, result: &ScoreResult) {
    println!(
        "pod={} node={} score={} status={}",
        pod_name,
        node_name,
        result.score,
        status_str(&result.status)
    );
}

fn status_str(status: &ScoreStatus) -> String {
    match status {
        ScoreStatus::Success => "ok".to_string(),
        ScoreStatus::Failure(reason) => format!("failed: {reason}"),
    }
}
