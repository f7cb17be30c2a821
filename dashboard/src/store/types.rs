//! Run record data types
//!
//! Mirrors the JSON written by the agent framework. Every field is optional:
//! the files are produced by another process and are read best-effort.
//! Keys this crate does not model are kept in `extra` maps so a record can be
//! handed back verbatim. A modelled field holding a value of the wrong type
//! reads as absent instead of failing the whole record.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// Status
// ============================================================================

/// Run status
///
/// The set is open: values this crate does not know about are preserved in
/// `Other` and presented like `Pending`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Other(String),
}

static PENDING: RunStatus = RunStatus::Pending;

impl RunStatus {
    /// The status used for presentation (unknown values fall back to pending)
    pub fn presentation(&self) -> &RunStatus {
        match self {
            RunStatus::Other(_) => &PENDING,
            known => known,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Pending => "pending",
            RunStatus::Running => "running",
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Other(s) => s,
        }
    }
}

impl From<String> for RunStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "pending" => RunStatus::Pending,
            "running" => RunStatus::Running,
            "completed" => RunStatus::Completed,
            "failed" => RunStatus::Failed,
            _ => RunStatus::Other(s),
        }
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        match status {
            RunStatus::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl std::str::FromStr for RunStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RunStatus::from(s.to_string()))
    }
}

// ============================================================================
// Records
// ============================================================================

/// Aggregated metrics reported for a run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<i64>,
    #[serde(default, deserialize_with = "lenient_int", skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<i64>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One option the agent weighed for a decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionOption {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// What happened after a decision was executed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default, deserialize_with = "truthy_flag")]
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Outcome {
    /// Tool output to show for this outcome: the result, or the error when
    /// there is no usable result.
    pub fn output(&self) -> Option<&Value> {
        match &self.result {
            Some(v) if is_truthy(v) => Some(v),
            _ => self.error.as_ref().filter(|v| !v.is_null()),
        }
    }
}

/// One timestamped reasoning/action step within a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub intent: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub decision_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub reasoning: Option<String>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub options: Vec<DecisionOption>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub chosen_option_id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub outcome: Option<Outcome>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Decision {
    pub fn is_recovery(&self) -> bool {
        self.decision_type.as_deref() == Some("recovery")
    }

    pub fn succeeded(&self) -> bool {
        self.outcome.as_ref().is_some_and(|o| o.success)
    }

    pub fn chosen_option(&self) -> Option<&DecisionOption> {
        let chosen = self.chosen_option_id.as_deref()?;
        self.options
            .iter()
            .find(|opt| opt.id.as_deref() == Some(chosen))
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.timestamp.as_deref().and_then(parse_timestamp)
    }
}

/// A persisted run, as read from `<id>.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub goal_description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<RunStatus>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub metrics: Option<RunMetrics>,
    #[serde(default)]
    pub input_data: Option<Value>,
    #[serde(default)]
    pub output_data: Option<Value>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub decisions: Vec<Decision>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RunRecord {
    /// `created_at`, falling back to the legacy `started_at`
    pub fn created_at(&self) -> Option<&str> {
        non_empty(self.created_at.as_deref()).or_else(|| non_empty(self.started_at.as_deref()))
    }

    /// Ordering timestamp; `None` when absent or unparseable
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at().and_then(parse_timestamp)
    }

    /// Project to the list view. `fallback_id` is used when the record has
    /// no `id` of its own (normally the file stem).
    pub fn summarize(&self, fallback_id: &str) -> RunSummary {
        RunSummary {
            id: non_empty(self.id.as_deref())
                .unwrap_or(fallback_id)
                .to_string(),
            goal_description: self.goal_description.clone(),
            status: self.status.clone(),
            created_at: self.created_at().map(str::to_string),
            metrics: self.metrics.clone(),
        }
    }
}

/// Summary view of a run (for listing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub id: String,
    pub goal_description: Option<String>,
    pub status: Option<RunStatus>,
    pub created_at: Option<String>,
    pub metrics: Option<RunMetrics>,
}

impl RunSummary {
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.created_at.as_deref().and_then(parse_timestamp)
    }

    pub fn duration_ms(&self) -> Option<i64> {
        self.metrics.as_ref().and_then(|m| m.duration_ms)
    }

    /// Status for presentation; a missing status reads as pending
    pub fn display_status(&self) -> &RunStatus {
        self.status
            .as_ref()
            .map(RunStatus::presentation)
            .unwrap_or(&PENDING)
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Parse a run timestamp.
///
/// Accepts RFC 3339, ISO-8601 without an offset (as written by Python's
/// `datetime.isoformat()`), and a bare `YYYY-MM-DD` date. Values without an
/// offset are read as UTC; a bare date is midnight.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

fn non_empty(s: Option<&str>) -> Option<&str> {
    s.filter(|s| !s.is_empty())
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

// Field readers. Each takes whatever JSON value is present and yields `None`
// (or an empty list) when it does not fit the field.

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Strings as-is; numbers in their JSON text form (`42` reads as `"42"`)
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Integers as-is; fractional numbers truncated toward zero
fn lenient_int<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        _ => None,
    })
}

/// Every element that reads as `T`; anything but an array is empty
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| serde_json::from_value(item).ok())
            .collect(),
        _ => Vec::new(),
    })
}

fn truthy_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.is_some_and(|v| is_truthy(&v)))
}
