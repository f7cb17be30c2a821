//! Integration tests for the run store and the `dashboard` binary
//!
//! Each test builds its own storage root in a temp directory.

use std::path::Path;
use std::process::Command;

use hive_dashboard::stats::DashboardStats;
use hive_dashboard::store::{RunStatus, RunStore};
use serde_json::json;
use tempfile::tempdir;

fn write_run(root: &Path, file: &str, value: serde_json::Value) {
    std::fs::write(root.join(file), serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

/// A run shaped like the ones the agent framework writes
fn framework_run(id: &str, created_at: &str, status: &str) -> serde_json::Value {
    json!({
        "id": id,
        "goal_id": "goal_submission_test",
        "goal_description": format!("Goal for {}", id),
        "status": status,
        "started_at": created_at,
        "completed_at": null,
        "narrative": "Successfully researched AI Agents.",
        "input_data": {"status": "checking_integrations", "target": "production"},
        "output_data": {"summary": "AI Agents are cool."},
        "metrics": {"duration_ms": 4200, "tokens_used": 512, "cost": 0.01, "total_decisions": 2},
        "decisions": [
            {
                "id": "dec_0",
                "timestamp": created_at,
                "node_id": "planner",
                "intent": "Create a research plan",
                "decision_type": "path_choice",
                "reasoning": "User asked for latest news.",
                "options": [
                    {"id": "deep_dive", "description": "Detailed academic research", "confidence": 0.3},
                    {"id": "quick_summary", "description": "Search news aggregators", "confidence": 0.9}
                ],
                "chosen_option_id": "quick_summary",
                "outcome": {"success": true, "result": {"plan": ["search_google", "summarize"]}}
            },
            {
                "id": "dec_1",
                "timestamp": created_at,
                "intent": "Scrape content from Article A",
                "decision_type": "tool_selection",
                "options": [{"id": "scrape", "description": "Jina Reader"}],
                "chosen_option_id": "scrape",
                "outcome": {"success": false, "error": "Connection timeout"}
            }
        ]
    })
}

#[test]
fn test_framework_runs_listed_and_resolved() {
    let dir = tempdir().unwrap();
    write_run(dir.path(), "run_a.json", framework_run("run_a", "2024-05-01T09:00:00.000001", "completed"));
    write_run(dir.path(), "run_b.json", framework_run("run_b", "2024-05-02T09:00:00.000001", "running"));
    write_run(dir.path(), "run_c.json", framework_run("run_c", "2024-04-30T09:00:00.000001", "failed"));

    let store = RunStore::open(dir.path());
    let runs = store.list_summaries();

    let ids: Vec<_> = runs.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["run_b", "run_a", "run_c"]);
    assert_eq!(runs[0].status, Some(RunStatus::Running));
    assert_eq!(runs[0].created_at.as_deref(), Some("2024-05-02T09:00:00.000001"));

    let record = store.get_by_id("run_a").unwrap();
    assert_eq!(record.decisions.len(), 2);
    assert_eq!(
        record.decisions[0].chosen_option().and_then(|o| o.description.as_deref()),
        Some("Search news aggregators")
    );
    assert_eq!(record.extra.get("narrative"), Some(&json!("Successfully researched AI Agents.")));

    let stats = DashboardStats::from_summaries(&runs);
    assert_eq!(stats.total_runs, 3);
    assert_eq!(stats.success_rate, 33);
    assert_eq!(stats.active_now, 1);
}

#[test]
fn test_one_malformed_among_many() {
    let dir = tempdir().unwrap();
    for i in 0..5 {
        write_run(
            dir.path(),
            &format!("run_{}.json", i),
            json!({"id": format!("run_{}", i), "created_at": format!("2024-01-0{}T00:00:00Z", i + 1)}),
        );
    }
    std::fs::write(dir.path().join("run_9.json"), "{ truncated").unwrap();

    let store = RunStore::open(dir.path());
    assert_eq!(store.list_summaries().len(), 5);
    assert!(store.get_by_id("run_9").is_none());
    assert!(store.get_by_id("run_4").is_some());
}

fn dashboard(root: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_dashboard"));
    cmd.arg("--storage-root").arg(root).env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_list_and_view() {
    let dir = tempdir().unwrap();
    write_run(dir.path(), "r1.json", json!({"id": "r1", "goal_description": "first goal", "status": "completed", "created_at": "2024-01-01T00:00:00Z"}));
    write_run(dir.path(), "r2.json", framework_run("r2", "2024-01-02T00:00:00Z", "failed"));

    let output = dashboard(dir.path())
        .args(["runs", "list"])
        .output()
        .expect("Failed to run dashboard runs list");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let first = stdout.find("Goal for r2").expect("r2 listed");
    let second = stdout.find("first goal").expect("r1 listed");
    assert!(first < second, "newest run should be listed first");

    let output = dashboard(dir.path())
        .args(["runs", "view", "r2", "--full"])
        .output()
        .expect("Failed to run dashboard runs view");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("RUN: r2"));
    assert!(stdout.contains("Create a research plan"));
    assert!(stdout.contains("Connection timeout"));
}

#[test]
fn test_cli_missing_run_fails() {
    let dir = tempdir().unwrap();

    let output = dashboard(dir.path())
        .args(["runs", "view", "nope"])
        .output()
        .expect("Failed to run dashboard runs view");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No run found"));
}

#[test]
fn test_cli_missing_storage_root_lists_nothing() {
    let dir = tempdir().unwrap();

    let output = dashboard(&dir.path().join("missing"))
        .args(["runs", "list"])
        .output()
        .expect("Failed to run dashboard runs list");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No agent runs recorded yet."));
}
