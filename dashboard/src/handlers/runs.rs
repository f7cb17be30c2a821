//! Runs command handler
//!
//! List runs, view a decision timeline, summarize, and export reports.

use anyhow::Result;
use std::fmt::Write as _;

use super::CommandContext;
use crate::cli::runs_args::{ExportFormat, RunsCommands};
use crate::export::{self, format_duration};
use crate::stats::DashboardStats;
use crate::store::{RunRecord, RunStatus, RunStore, RunSummary};
use crate::timeline::Timeline;

/// Handle the `runs` command
pub async fn run_runs_command(ctx: &CommandContext, command: RunsCommands) -> Result<()> {
    let store = ctx.store();

    if !store.is_available() {
        eprintln!("Storage directory not found: {}", store.root().display());
    } else if ctx.is_verbose() {
        eprintln!("Reading runs from {}", store.root().display());
    }

    match command {
        RunsCommands::List { status } => run_list(&store, status),
        RunsCommands::View { id, full } => run_view(&store, &id, full),
        RunsCommands::Summary => run_summary(&store),
        RunsCommands::Export { id, format, output } => run_export(&store, &id, format, output),
    }
}

fn run_list(store: &RunStore, status: Option<String>) -> Result<()> {
    let mut runs = store.list_summaries();

    if let Some(status) = status {
        let wanted: RunStatus = status.parse()?;
        runs.retain(|run| run.status.as_ref() == Some(&wanted));
    }

    print!("{}", render_list(&runs)?);
    Ok(())
}

fn run_view(store: &RunStore, id: &str, full: bool) -> Result<()> {
    let run = store.find_by_prefix(id)?;
    print!("{}", render_view(&run, full)?);
    Ok(())
}

fn run_summary(store: &RunStore) -> Result<()> {
    let runs = store.list_summaries();

    if runs.is_empty() {
        println!("No agent runs recorded yet.");
        return Ok(());
    }

    let stats = DashboardStats::from_summaries(&runs);

    println!("\n{}", "═".repeat(60));
    println!("  Summary of recorded runs");
    println!("{}\n", "═".repeat(60));

    println!("Total runs:     {}", stats.total_runs);
    println!("Success rate:   {}%", stats.success_rate);
    println!("Active agents:  {}", stats.active_now);
    println!();
    println!("  Completed:    {}", stats.completed);
    println!("  Failed:       {}", stats.failed);
    println!("  Running:      {}", stats.running);
    println!("  Pending:      {}", stats.pending);
    if stats.other > 0 {
        println!("  Other:        {}", stats.other);
    }

    if let Some(avg) = stats.average_duration_ms {
        println!("\nDuration:");
        println!("  Total:        {}", format_duration(stats.total_duration_ms));
        println!("  Average:      {}", format_duration(avg));
    }
    println!("\nTokens used:    {}", stats.total_tokens);
    println!("Estimated cost: ${:.4}", stats.total_cost);

    Ok(())
}

fn run_export(
    store: &RunStore,
    id: &str,
    format: ExportFormat,
    output: Option<String>,
) -> Result<()> {
    let run = store.find_by_prefix(id)?;
    let content = export::export(&run, format.into())?;

    match output {
        Some(path) => {
            std::fs::write(&path, &content)?;
            println!("Exported to: {}", path);
        }
        None => {
            println!("{}", content);
        }
    }

    Ok(())
}

// ============================================================================
// Rendering
// ============================================================================

/// Render the run table
pub fn render_list(runs: &[RunSummary]) -> Result<String> {
    if runs.is_empty() {
        return Ok("No agent runs recorded yet.\n".to_string());
    }

    let mut out = String::new();
    writeln!(out, "Recent activity:\n")?;
    writeln!(
        out,
        "{:<12} {:<11} {:<40} {:<17} {:<10}",
        "ID", "STATUS", "GOAL", "CREATED", "DURATION"
    )?;
    writeln!(out, "{}", "─".repeat(92))?;

    for run in runs {
        let created = run
            .timestamp()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        let duration = run
            .duration_ms()
            .map(format_duration)
            .unwrap_or_else(|| "-".to_string());
        let goal = run.goal_description.as_deref().unwrap_or("No Description");

        writeln!(
            out,
            "{:<12} {:<11} {:<40} {:<17} {:<10}",
            truncate(&run.id, 8),
            run.display_status(),
            truncate(goal, 37),
            created,
            duration
        )?;
    }

    Ok(out)
}

/// Render a run header, metrics, and decision timeline
pub fn render_view(run: &RunRecord, full: bool) -> Result<String> {
    let mut out = String::new();
    let id = run.id.as_deref().unwrap_or("unknown");

    writeln!(out, "\n{}", "═".repeat(60))?;
    writeln!(out, "  RUN: {}", id)?;
    writeln!(out, "{}\n", "═".repeat(60))?;

    writeln!(
        out,
        "Goal:       {}",
        run.goal_description.as_deref().unwrap_or("No Description")
    )?;
    if let Some(status) = &run.status {
        writeln!(out, "Status:     {}", status)?;
    }
    if let Some(created) = run.created_at() {
        writeln!(out, "Created:    {}", created)?;
    }

    let metrics = run.metrics.clone().unwrap_or_default();
    writeln!(out, "\nMetrics:")?;
    writeln!(
        out,
        "  Duration: {}",
        format_duration(metrics.duration_ms.unwrap_or(0))
    )?;
    writeln!(out, "  Tokens:   {}", metrics.tokens_used.unwrap_or(0))?;
    writeln!(out, "  Cost:     ${}", metrics.cost.unwrap_or(0.0))?;

    let timeline = Timeline::from_record(run);
    writeln!(
        out,
        "\nDecision timeline ({} decisions, {} failed):",
        timeline.total, timeline.failed
    )?;
    writeln!(out, "{}", "─".repeat(60))?;

    for entry in &timeline.entries {
        let mark = if entry.success { "✓" } else { "✗" };
        let time = entry
            .timestamp
            .as_deref()
            .and_then(crate::store::parse_timestamp)
            .map(|dt| dt.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "--:--:--".to_string());

        write!(
            out,
            "[{}] {} {}",
            time,
            mark,
            entry.intent.as_deref().unwrap_or("(no intent)")
        )?;
        if entry.is_recovery {
            write!(out, "  [self-healing]")?;
        }
        writeln!(out)?;

        if let Some(reasoning) = &entry.reasoning {
            writeln!(out, "    Reasoning: \"{}\"", reasoning)?;
        }
        for opt in &entry.options {
            let marker = if opt.chosen { "→" } else { " " };
            writeln!(
                out,
                "    {} {}",
                marker,
                opt.description.as_deref().or(opt.id.as_deref()).unwrap_or("-")
            )?;
        }

        if full {
            if let Some(output) = &entry.output {
                writeln!(out, "    Output:")?;
                for line in serde_json::to_string_pretty(output)?.lines() {
                    writeln!(out, "      {}", line)?;
                }
            }
        }
    }

    if full {
        for (title, payload) in [("Initial Input", &run.input_data), ("Final Output", &run.output_data)] {
            writeln!(out, "\n--- {} ---", title)?;
            let value = payload.clone().unwrap_or_else(|| serde_json::json!({}));
            writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?;
        }
    }

    Ok(out)
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        format!("{}...", s.chars().take(max).collect::<String>())
    } else {
        s.to_string()
    }
}
