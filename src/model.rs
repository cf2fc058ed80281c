use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Display format of the creation time, as a locale date-time string.
pub const TIME_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// A single task, saved as an entry of the JSON array held in the slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(
        default,
        deserialize_with = "lenient_priority",
        skip_serializing_if = "Option::is_none"
    )]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub time: String,
}

/// How urgent a task is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// The state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Done,
    Pending,
}

/// Optional attributes supplied when a task is created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub priority: Option<Priority>,
    pub category: Option<String>,
}

impl Task {
    pub fn state(&self) -> TaskState {
        if self.completed {
            TaskState::Done
        } else {
            TaskState::Pending
        }
    }
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!(
                "unknown priority '{}', expected one of: low, medium, high",
                other
            )),
        }
    }
}

/// Read a stored priority in any letter case. Values that are not a known
/// priority (an empty string, a number) read as no priority, so one odd
/// entry does not make the whole list unreadable.
fn lenient_priority<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Option<Priority>, D::Error> {
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(|s| s.parse().ok()))
}

/// Format a creation time the way it is stored in `Task::time`.
pub fn format_time(at: DateTime<Local>) -> String {
    at.format(TIME_FORMAT).to_string()
}

/// Parse a serialized collection. An empty or whitespace value is an
/// error like any other malformed input; callers decide whether to fail open.
pub fn decode_tasks(raw: &str) -> Result<Vec<Task>> {
    if raw.trim().is_empty() {
        return Err(anyhow!("Stored task list is empty."));
    }
    let tasks = serde_json::from_str(raw).context("Failed to parse stored task list.")?;
    Ok(tasks)
}

/// Serialize the full collection as a flat JSON array.
pub fn encode_tasks(tasks: &[Task]) -> Result<String> {
    serde_json::to_string(tasks).context("Failed to serialize task list.")
}
