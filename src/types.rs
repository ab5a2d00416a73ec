//! Core entity types for the PMO portfolio.
//!
//! Everything here serializes camelCase; the JSON shapes double as the
//! workspace snapshot format (see `store::persist`) and the export/import
//! payload. Date fields are `DateTime<Utc>` and travel as ISO-8601 strings,
//! decoded once at the boundary by serde.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dependencies::TaskDependency;

// =============================================================================
// Enumerations
// =============================================================================

/// The eight departments that own initiatives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "Professional Services")]
    ProfessionalServices,
    Sales,
    Marketing,
    #[serde(rename = "CE&S")]
    CeAndS,
    Finance,
    Product,
    #[serde(rename = "IT-Cybersecurity")]
    ItCybersecurity,
    #[serde(rename = "Other Exec")]
    OtherExec,
}

impl Department {
    /// All departments, in display order.
    pub const ALL: [Department; 8] = [
        Department::ProfessionalServices,
        Department::Sales,
        Department::Marketing,
        Department::CeAndS,
        Department::Finance,
        Department::Product,
        Department::ItCybersecurity,
        Department::OtherExec,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::ProfessionalServices => "Professional Services",
            Department::Sales => "Sales",
            Department::Marketing => "Marketing",
            Department::CeAndS => "CE&S",
            Department::Finance => "Finance",
            Department::Product => "Product",
            Department::ItCybersecurity => "IT-Cybersecurity",
            Department::OtherExec => "Other Exec",
        }
    }

    pub fn from_str_opt(value: &str) -> Option<Department> {
        Department::ALL.iter().copied().find(|d| d.as_str() == value)
    }
}

/// Traffic-light health for an initiative.
///
/// Wherever an initiative has tasks, the displayed status is derived from
/// them (`health::derive_status`); the stored field is a seed value only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InitiativeStatus {
    AtRisk,
    NeedsAttention,
    OnTrack,
}

impl InitiativeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitiativeStatus::AtRisk => "at-risk",
            InitiativeStatus::NeedsAttention => "needs-attention",
            InitiativeStatus::OnTrack => "on-track",
        }
    }

    /// Higher is worse. Used by department rollups to keep the worst status.
    pub fn severity(&self) -> u8 {
        match self {
            InitiativeStatus::OnTrack => 0,
            InitiativeStatus::NeedsAttention => 1,
            InitiativeStatus::AtRisk => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GoalStatus {
    OnTrack,
    AtRisk,
    Completed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::OnTrack => "on-track",
            GoalStatus::AtRisk => "at-risk",
            GoalStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// A PMO meeting covers one department or the whole portfolio.
///
/// Serialized as the department's display name, or the literal `"All"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MeetingScope {
    All,
    Department(Department),
}

impl MeetingScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingScope::All => "All",
            MeetingScope::Department(d) => d.as_str(),
        }
    }
}

impl From<MeetingScope> for String {
    fn from(scope: MeetingScope) -> String {
        scope.as_str().to_string()
    }
}

impl TryFrom<String> for MeetingScope {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "All" {
            return Ok(MeetingScope::All);
        }
        Department::from_str_opt(&value)
            .map(MeetingScope::Department)
            .ok_or_else(|| format!("Unknown meeting department: '{}'", value))
    }
}

// =============================================================================
// Entities
// =============================================================================

/// A tracked project/program owned by a department. The top-level planning
/// unit of the portfolio.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Initiative {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Display color, hex string (e.g. `#3B82F6`).
    pub color: String,
    pub department: Department,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    /// Seed/fallback status. Overridden by the derived status wherever the
    /// initiative has tasks; there is no consistency guarantee between this
    /// field and the task list.
    pub status: InitiativeStatus,
    /// Seed/fallback completion percentage, same caveat as `status`.
    pub progress: u8,
    pub owner: String,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub is_key_initiative: bool,
    /// Link to a company goal, if this initiative contributes to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    pub id: String,
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

/// A unit of work belonging to exactly one initiative.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub assignee: String,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub comments: Vec<TaskComment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Decoded dependency references. On the wire each is a prefixed string
    /// (`"after:Title"`, `"parallel:DIG-2"`); no referential integrity is
    /// enforced; see the `dependencies` module.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<TaskDependency>,
    /// One level of subtask nesting. A dangling parent id degrades to
    /// top-level display, it is not an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
}

impl Task {
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

/// A quantitative target belonging to a goal (OKR-style).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResult {
    pub id: String,
    pub goal_id: String,
    pub name: String,
    pub target_value: f64,
    pub current_value: f64,
    pub unit: String,
    pub owner: String,
    pub due_date: DateTime<Utc>,
}

/// A company-level objective, tracked either through key results or through
/// the initiatives linked to it via `Initiative::goal_id`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyGoal {
    pub id: String,
    pub name: String,
    pub description: String,
    pub target_date: DateTime<Utc>,
    pub owner: String,
    pub status: GoalStatus,
    #[serde(default)]
    pub key_results: Vec<KeyResult>,
    pub created_at: DateTime<Utc>,
}

/// Meeting-notes record for the PMO cadence. Pure storage: seven narrative
/// fields, no derived computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PmoMeeting {
    pub id: String,
    pub department: MeetingScope,
    pub date: DateTime<Utc>,
    pub attendees: String,
    pub team_status: String,
    pub items_requiring_attention: String,
    pub tasks_coming_due: String,
    pub meeting_notes: String,
    pub decisions_made: String,
    pub action_items_assigned: String,
    pub parking_lot: String,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_enums_use_kebab_case_wire_form() {
        assert_eq!(
            serde_json::to_string(&InitiativeStatus::NeedsAttention).unwrap(),
            "\"needs-attention\""
        );
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        assert_eq!(
            serde_json::from_str::<TaskPriority>("\"high\"").unwrap(),
            TaskPriority::High
        );
    }

    #[test]
    fn department_round_trips_display_names() {
        for dept in Department::ALL {
            let json = serde_json::to_string(&dept).unwrap();
            assert_eq!(json, format!("\"{}\"", dept.as_str()));
            let back: Department = serde_json::from_str(&json).unwrap();
            assert_eq!(back, dept);
        }
    }

    #[test]
    fn meeting_scope_accepts_all_and_departments() {
        let all: MeetingScope = serde_json::from_str("\"All\"").unwrap();
        assert_eq!(all, MeetingScope::All);

        let dept: MeetingScope = serde_json::from_str("\"CE&S\"").unwrap();
        assert_eq!(dept, MeetingScope::Department(Department::CeAndS));

        assert!(serde_json::from_str::<MeetingScope>("\"Engineering\"").is_err());
    }

    #[test]
    fn severity_orders_statuses_worst_last() {
        assert!(InitiativeStatus::AtRisk.severity() > InitiativeStatus::NeedsAttention.severity());
        assert!(InitiativeStatus::NeedsAttention.severity() > InitiativeStatus::OnTrack.severity());
    }
}
