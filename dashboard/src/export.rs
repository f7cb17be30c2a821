//! Run report export
//!
//! Renders a single run as a markdown report (for reading or pasting into
//! an analysis prompt) or as machine-readable JSON.

use anyhow::Result;
use serde_json::Value;

use crate::store::RunRecord;
use crate::timeline::Timeline;

/// Report format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Markdown,
    Json,
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Markdown => write!(f, "markdown"),
            ExportFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            "json" => Ok(ExportFormat::Json),
            _ => Err(anyhow::anyhow!("Unknown export format: {}", s)),
        }
    }
}

/// Render a run in the given format
pub fn export(run: &RunRecord, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Markdown => Ok(export_markdown(run)),
        ExportFormat::Json => export_json(run),
    }
}

/// Format duration in milliseconds to a human-readable string
pub fn format_duration(ms: i64) -> String {
    if ms < 1000 {
        format!("{}ms", ms)
    } else if ms < 60000 {
        format!("{:.1}s", ms as f64 / 1000.0)
    } else {
        let minutes = ms / 60000;
        let seconds = (ms % 60000) / 1000;
        format!("{}m {}s", minutes, seconds)
    }
}

/// Export a run as markdown
pub fn export_markdown(run: &RunRecord) -> String {
    let mut md = String::new();
    let id = run.id.as_deref().unwrap_or("unknown");

    md.push_str(&format!("# Run Analysis: {}\n\n", id));

    md.push_str("## Overview\n\n");
    md.push_str(&format!(
        "- **Goal:** {}\n",
        run.goal_description.as_deref().unwrap_or("No Description")
    ));
    if let Some(status) = &run.status {
        md.push_str(&format!("- **Status:** {}\n", status));
    }
    if let Some(created) = run.created_at() {
        md.push_str(&format!("- **Created:** {}\n", created));
    }

    if let Some(metrics) = &run.metrics {
        md.push_str("\n## Metrics\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        if let Some(duration) = metrics.duration_ms {
            md.push_str(&format!("| Duration | {} |\n", format_duration(duration)));
        }
        if let Some(tokens) = metrics.tokens_used {
            md.push_str(&format!("| Tokens used | {} |\n", tokens));
        }
        if let Some(cost) = metrics.cost {
            md.push_str(&format!("| Estimated cost | ${} |\n", cost));
        }
    }

    let timeline = Timeline::from_record(run);
    if !timeline.entries.is_empty() {
        md.push_str(&format!(
            "\n## Decision Timeline\n\n{} decisions: {} succeeded, {} failed, {} recoveries\n",
            timeline.total, timeline.succeeded, timeline.failed, timeline.recoveries
        ));

        for entry in &timeline.entries {
            md.push_str(&format!(
                "\n### {}. {}\n\n",
                entry.index + 1,
                entry.intent.as_deref().unwrap_or("(no intent)")
            ));

            let status = if entry.success { "✅ Success" } else { "❌ Failed" };
            md.push_str(&format!("- **Outcome:** {}\n", status));
            if let Some(kind) = &entry.decision_type {
                md.push_str(&format!("- **Type:** {}", kind));
                if entry.is_recovery {
                    md.push_str(" (self-healing)");
                }
                md.push('\n');
            }
            if let Some(ts) = &entry.timestamp {
                md.push_str(&format!("- **Time:** {}\n", ts));
            }
            if let Some(reasoning) = &entry.reasoning {
                md.push_str(&format!("- **Reasoning:** \"{}\"\n", reasoning));
            }

            if !entry.options.is_empty() {
                md.push_str("\n| Option | Description | Chosen |\n");
                md.push_str("|--------|-------------|--------|\n");
                for opt in &entry.options {
                    md.push_str(&format!(
                        "| {} | {} | {} |\n",
                        opt.id.as_deref().unwrap_or("-"),
                        opt.description.as_deref().unwrap_or("-"),
                        if opt.chosen { "✓" } else { "" }
                    ));
                }
            }

            if let Some(output) = &entry.output {
                md.push_str("\n```json\n");
                md.push_str(&pretty(output));
                md.push_str("\n```\n");
            }
        }
    }

    for (title, payload) in [("Input", &run.input_data), ("Output", &run.output_data)] {
        if let Some(value) = payload.as_ref().filter(|v| has_content(v)) {
            md.push_str(&format!("\n## {}\n\n", title));
            md.push_str("```json\n");
            md.push_str(&pretty(value));
            md.push_str("\n```\n");
        }
    }

    md
}

/// Export a run as JSON
pub fn export_json(run: &RunRecord) -> Result<String> {
    let id = run.id.clone().unwrap_or_default();
    let export = serde_json::json!({
        "run": run,
        "summary": run.summarize(&id),
        "timeline": Timeline::from_record(run),
    });

    Ok(serde_json::to_string_pretty(&export)?)
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn has_content(value: &Value) -> bool {
    match value {
        Value::Object(map) => !map.is_empty(),
        Value::Array(arr) => !arr.is_empty(),
        Value::Null => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_run() -> RunRecord {
        serde_json::from_value(json!({
            "id": "run_42",
            "goal_description": "Summarize AI agent news",
            "status": "completed",
            "created_at": "2024-01-01T00:00:00Z",
            "metrics": {"duration_ms": 65000, "tokens_used": 1200, "cost": 0.02},
            "input_data": {"target": "production"},
            "output_data": {},
            "decisions": [{
                "intent": "Search the web",
                "decision_type": "path_choice",
                "reasoning": "Standard search engine.",
                "options": [{"id": "google", "description": "Google Search"}],
                "chosen_option_id": "google",
                "outcome": {"success": true, "result": ["Article A"]}
            }]
        }))
        .unwrap()
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(850), "850ms");
        assert_eq!(format_duration(1500), "1.5s");
        assert_eq!(format_duration(125_000), "2m 5s");
    }

    #[test]
    fn test_export_format_parse() {
        assert_eq!("md".parse::<ExportFormat>().unwrap(), ExportFormat::Markdown);
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!("yaml".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_markdown_report() {
        let md = export_markdown(&sample_run());
        assert!(md.starts_with("# Run Analysis: run_42"));
        assert!(md.contains("- **Goal:** Summarize AI agent news"));
        assert!(md.contains("| Duration | 1m 5s |"));
        assert!(md.contains("### 1. Search the web"));
        assert!(md.contains("| google | Google Search | ✓ |"));
        assert!(md.contains("## Input"));
        // Empty output payload is left out
        assert!(!md.contains("## Output"));
    }

    #[test]
    fn test_json_report() {
        let content = export_json(&sample_run()).unwrap();
        let value: Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["run"]["id"], json!("run_42"));
        assert_eq!(value["summary"]["status"], json!("completed"));
        assert_eq!(value["timeline"]["total"], json!(1));
    }
}
