//! Decision timeline for the run detail view
//!
//! Flattens a run's decisions into display-ready entries: which option was
//! chosen, whether the step was a recovery, and what the tool returned.

use serde::Serialize;
use serde_json::Value;

use crate::store::{Decision, RunRecord};

/// An evaluated option, flagged when it was the one chosen
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineOption {
    pub id: Option<String>,
    pub description: Option<String>,
    pub confidence: Option<f64>,
    pub chosen: bool,
}

/// One decision in the timeline
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineEntry {
    pub index: usize,
    pub timestamp: Option<String>,
    pub intent: Option<String>,
    pub decision_type: Option<String>,
    pub is_recovery: bool,
    pub reasoning: Option<String>,
    pub options: Vec<TimelineOption>,
    pub success: bool,
    /// Tool output: the outcome's result, or its error when there is none
    pub output: Option<Value>,
}

impl TimelineEntry {
    fn from_decision(index: usize, decision: &Decision) -> Self {
        let chosen = decision.chosen_option_id.as_deref();
        let options = decision
            .options
            .iter()
            .map(|opt| TimelineOption {
                id: opt.id.clone(),
                description: opt.description.clone(),
                confidence: opt.confidence,
                chosen: chosen.is_some() && opt.id.as_deref() == chosen,
            })
            .collect();

        Self {
            index,
            timestamp: decision.timestamp.clone(),
            intent: decision.intent.clone(),
            decision_type: decision.decision_type.clone(),
            is_recovery: decision.is_recovery(),
            reasoning: decision.reasoning.clone(),
            options,
            success: decision.succeeded(),
            output: decision.outcome.as_ref().and_then(|o| o.output()).cloned(),
        }
    }
}

/// Decision-by-decision view of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub run_id: Option<String>,
    pub entries: Vec<TimelineEntry>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub recoveries: usize,
}

impl Timeline {
    pub fn from_record(record: &RunRecord) -> Self {
        let entries: Vec<TimelineEntry> = record
            .decisions
            .iter()
            .enumerate()
            .map(|(i, d)| TimelineEntry::from_decision(i, d))
            .collect();

        let succeeded = entries.iter().filter(|e| e.success).count();
        let recoveries = entries.iter().filter(|e| e.is_recovery).count();

        Self {
            run_id: record.id.clone(),
            total: entries.len(),
            failed: entries.len() - succeeded,
            succeeded,
            recoveries,
            entries,
        }
    }
}
