//! Fleet statistics for the run list view

use serde::Serialize;

use crate::store::{RunStatus, RunSummary};

/// Aggregate counters over a set of runs
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_runs: usize,
    pub pending: usize,
    pub running: usize,
    pub completed: usize,
    pub failed: usize,
    /// Runs whose status is not one of the known values
    pub other: usize,
    /// Completed runs as a whole percentage of all runs
    pub success_rate: u32,
    /// Runs currently executing
    pub active_now: usize,
    pub total_duration_ms: i64,
    pub average_duration_ms: Option<i64>,
    pub total_tokens: i64,
    pub total_cost: f64,
}

impl DashboardStats {
    pub fn from_summaries(runs: &[RunSummary]) -> Self {
        let mut stats = Self {
            total_runs: runs.len(),
            ..Default::default()
        };

        let mut timed_runs = 0i64;
        for run in runs {
            match &run.status {
                Some(RunStatus::Pending) | None => stats.pending += 1,
                Some(RunStatus::Running) => stats.running += 1,
                Some(RunStatus::Completed) => stats.completed += 1,
                Some(RunStatus::Failed) => stats.failed += 1,
                Some(RunStatus::Other(_)) => stats.other += 1,
            }

            if let Some(metrics) = &run.metrics {
                if let Some(duration) = metrics.duration_ms {
                    stats.total_duration_ms = stats.total_duration_ms.saturating_add(duration);
                    timed_runs += 1;
                }
                stats.total_tokens = stats
                    .total_tokens
                    .saturating_add(metrics.tokens_used.unwrap_or(0));
                stats.total_cost += metrics.cost.unwrap_or(0.0);
            }
        }

        stats.active_now = stats.running;
        stats.success_rate = percentage(stats.completed, stats.total_runs);
        stats.average_duration_ms =
            (timed_runs > 0).then(|| stats.total_duration_ms / timed_runs);

        stats
    }
}

fn percentage(part: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((part as f64 / total as f64) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::RunMetrics;

    fn summary(id: &str, status: Option<RunStatus>, duration_ms: Option<i64>) -> RunSummary {
        RunSummary {
            id: id.to_string(),
            goal_description: None,
            status,
            created_at: None,
            metrics: duration_ms.map(|d| RunMetrics {
                duration_ms: Some(d),
                tokens_used: Some(100),
                cost: Some(0.25),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn test_empty() {
        let stats = DashboardStats::from_summaries(&[]);
        assert_eq!(stats.total_runs, 0);
        assert_eq!(stats.success_rate, 0);
        assert_eq!(stats.average_duration_ms, None);
    }

    #[test]
    fn test_counts_and_rates() {
        let runs = vec![
            summary("a", Some(RunStatus::Completed), Some(1000)),
            summary("b", Some(RunStatus::Completed), Some(3000)),
            summary("c", Some(RunStatus::Failed), None),
            summary("d", Some(RunStatus::Running), None),
            summary("e", Some(RunStatus::Other("paused".into())), None),
            summary("f", None, None),
        ];

        let stats = DashboardStats::from_summaries(&runs);
        assert_eq!(stats.total_runs, 6);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.running, 1);
        assert_eq!(stats.active_now, 1);
        assert_eq!(stats.other, 1);
        assert_eq!(stats.pending, 1);
        // 2 / 6 = 33.3%
        assert_eq!(stats.success_rate, 33);
        assert_eq!(stats.total_duration_ms, 4000);
        assert_eq!(stats.average_duration_ms, Some(2000));
        assert_eq!(stats.total_tokens, 200);
        assert!((stats.total_cost - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_success_rate_rounds() {
        let runs = vec![
            summary("a", Some(RunStatus::Completed), None),
            summary("b", Some(RunStatus::Completed), None),
            summary("c", Some(RunStatus::Failed), None),
        ];
        // 66.67% rounds up
        assert_eq!(DashboardStats::from_summaries(&runs).success_rate, 67);
    }

    #[test]
    fn test_totals_saturate() {
        let mut runs = vec![
            summary("a", Some(RunStatus::Completed), Some(i64::MAX)),
            summary("b", Some(RunStatus::Completed), Some(i64::MAX)),
        ];
        for run in &mut runs {
            if let Some(metrics) = run.metrics.as_mut() {
                metrics.tokens_used = Some(i64::MAX);
            }
        }

        let stats = DashboardStats::from_summaries(&runs);
        assert_eq!(stats.total_duration_ms, i64::MAX);
        assert_eq!(stats.total_tokens, i64::MAX);
        assert_eq!(stats.average_duration_ms, Some(i64::MAX / 2));
    }
}
