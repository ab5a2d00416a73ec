//! Workspace export and import.
//!
//! CSV exports mirror the dashboard's column layout, one file per
//! collection with a date-stamped filename. The JSON snapshot is the
//! whole-workspace payload `{projects, tasks, goals, meetings}`; import
//! requires all four collections and decodes dates at the boundary, so a
//! malformed payload is rejected with a reason instead of silently
//! ignored.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::store::PmoStore;
use crate::types::{CompanyGoal, Initiative, PmoMeeting, Task};

// =============================================================================
// CSV
// =============================================================================

fn csv_escape(value: &str) -> String {
    if value.contains(['"', ',', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

fn to_csv(headers: &[&str], rows: Vec<Vec<String>>) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(headers.join(","));
    for row in rows {
        lines.push(
            row.iter()
                .map(|cell| csv_escape(cell))
                .collect::<Vec<_>>()
                .join(","),
        );
    }
    lines.join("\n")
}

fn iso(date: &DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn initiatives_csv(initiatives: &[Initiative]) -> String {
    to_csv(
        &[
            "id",
            "name",
            "department",
            "status",
            "progress",
            "owner",
            "team",
            "dueDate",
            "createdAt",
            "description",
            "isKeyInitiative",
            "goalId",
            "color",
        ],
        initiatives
            .iter()
            .map(|p| {
                vec![
                    p.id.clone(),
                    p.name.clone(),
                    p.department.as_str().to_string(),
                    p.status.as_str().to_string(),
                    p.progress.to_string(),
                    p.owner.clone(),
                    p.team.clone().unwrap_or_default(),
                    iso(&p.due_date),
                    iso(&p.created_at),
                    p.description.clone(),
                    p.is_key_initiative.to_string(),
                    p.goal_id.clone().unwrap_or_default(),
                    p.color.clone(),
                ]
            })
            .collect(),
    )
}

fn tasks_csv(tasks: &[Task]) -> String {
    to_csv(
        &[
            "id",
            "projectId",
            "parentTaskId",
            "title",
            "status",
            "priority",
            "assignee",
            "dueDate",
            "createdAt",
            "description",
            "tags",
            "dependencies",
        ],
        tasks
            .iter()
            .map(|t| {
                vec![
                    t.id.clone(),
                    t.project_id.clone(),
                    t.parent_task_id.clone().unwrap_or_default(),
                    t.title.clone(),
                    t.status.as_str().to_string(),
                    t.priority.as_str().to_string(),
                    t.assignee.clone(),
                    iso(&t.due_date),
                    iso(&t.created_at),
                    t.description.clone(),
                    t.tags.join("|"),
                    t.dependencies
                        .iter()
                        .map(|d| String::from(d.clone()))
                        .collect::<Vec<_>>()
                        .join("|"),
                ]
            })
            .collect(),
    )
}

fn goals_csv(goals: &[CompanyGoal]) -> String {
    to_csv(
        &[
            "id",
            "name",
            "owner",
            "status",
            "targetDate",
            "createdAt",
            "description",
        ],
        goals
            .iter()
            .map(|g| {
                vec![
                    g.id.clone(),
                    g.name.clone(),
                    g.owner.clone(),
                    g.status.as_str().to_string(),
                    iso(&g.target_date),
                    iso(&g.created_at),
                    g.description.clone(),
                ]
            })
            .collect(),
    )
}

fn meetings_csv(meetings: &[PmoMeeting]) -> String {
    to_csv(
        &[
            "id",
            "department",
            "date",
            "attendees",
            "teamStatus",
            "itemsRequiringAttention",
            "tasksComingDue",
            "meetingNotes",
            "decisionsMade",
            "actionItemsAssigned",
            "parkingLot",
            "createdAt",
        ],
        meetings
            .iter()
            .map(|m| {
                vec![
                    m.id.clone(),
                    m.department.as_str().to_string(),
                    iso(&m.date),
                    m.attendees.clone(),
                    m.team_status.clone(),
                    m.items_requiring_attention.clone(),
                    m.tasks_coming_due.clone(),
                    m.meeting_notes.clone(),
                    m.decisions_made.clone(),
                    m.action_items_assigned.clone(),
                    m.parking_lot.clone(),
                    iso(&m.created_at),
                ]
            })
            .collect(),
    )
}

/// One exported CSV file: suggested filename plus contents.
#[derive(Debug, Clone)]
pub struct CsvExport {
    pub filename: String,
    pub data: String,
}

/// Build the four collection CSVs, stamped with `date`.
pub fn export_csv_at(store: &PmoStore, date: NaiveDate) -> Vec<CsvExport> {
    let stamp = date.format("%Y-%m-%d");
    vec![
        CsvExport {
            filename: format!("pmo-projects-{}.csv", stamp),
            data: initiatives_csv(store.initiatives()),
        },
        CsvExport {
            filename: format!("pmo-tasks-{}.csv", stamp),
            data: tasks_csv(store.tasks()),
        },
        CsvExport {
            filename: format!("pmo-goals-{}.csv", stamp),
            data: goals_csv(store.goals()),
        },
        CsvExport {
            filename: format!("pmo-meetings-{}.csv", stamp),
            data: meetings_csv(store.meetings()),
        },
    ]
}

/// Build the four collection CSVs, stamped with today's date.
pub fn export_csv(store: &PmoStore) -> Vec<CsvExport> {
    export_csv_at(store, Utc::now().date_naive())
}

// =============================================================================
// JSON snapshot
// =============================================================================

/// The whole-workspace payload. All four collections are required on
/// import. Initiatives travel under the `projects` key, matching the
/// snapshot files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceSnapshot {
    pub projects: Vec<Initiative>,
    pub tasks: Vec<Task>,
    pub goals: Vec<CompanyGoal>,
    pub meetings: Vec<PmoMeeting>,
}

impl WorkspaceSnapshot {
    pub fn from_store(store: &PmoStore) -> Self {
        WorkspaceSnapshot {
            projects: store.initiatives().to_vec(),
            tasks: store.tasks().to_vec(),
            goals: store.goals().to_vec(),
            meetings: store.meetings().to_vec(),
        }
    }

    pub fn into_store(self) -> PmoStore {
        PmoStore::from_collections(self.projects, self.tasks, self.goals, self.meetings)
    }
}

/// Pretty-printed whole-workspace JSON.
pub fn export_json(store: &PmoStore) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(&WorkspaceSnapshot::from_store(store))?)
}

/// Parse an import payload. Missing collections, unknown enum spellings,
/// and undateable date strings all fail here; the boundary is the only
/// place dates are decoded.
pub fn parse_import(payload: &str) -> Result<WorkspaceSnapshot, StoreError> {
    serde_json::from_str(payload).map_err(|e| StoreError::InvalidImport(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_store;

    #[test]
    fn escaping_quotes_commas_and_newlines() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("line1\nline2"), "\"line1\nline2\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn csv_files_carry_headers_and_one_row_per_record() {
        let store = seed_store();
        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let exports = export_csv_at(&store, date);

        assert_eq!(exports.len(), 4);
        assert_eq!(exports[0].filename, "pmo-projects-2026-03-01.csv");

        let projects = &exports[0].data;
        let mut lines = projects.lines();
        assert!(lines.next().unwrap().starts_with("id,name,department,"));
        assert_eq!(projects.lines().count(), store.initiatives().len() + 1);

        let tasks = &exports[1].data;
        assert_eq!(tasks.lines().count(), store.tasks().len() + 1);
        // Dependency strings re-encode with their prefix.
        assert!(tasks.contains("after:Migrate database servers"));
        // Tags joined with pipes.
        assert!(tasks.contains("infrastructure|cloud"));
    }

    #[test]
    fn json_round_trip_preserves_collections_and_dates() {
        let store = seed_store();
        let json = export_json(&store).unwrap();
        let snapshot = parse_import(&json).unwrap();
        let restored = snapshot.into_store();

        assert_eq!(restored.initiatives().len(), store.initiatives().len());
        assert_eq!(restored.tasks().len(), store.tasks().len());
        assert_eq!(
            restored.initiative("1").unwrap().due_date,
            store.initiative("1").unwrap().due_date
        );
        assert_eq!(
            restored.task("2").unwrap().dependencies,
            store.task("2").unwrap().dependencies
        );
    }

    #[test]
    fn import_requires_all_four_collections() {
        let err = parse_import(r#"{"projects": [], "tasks": [], "goals": []}"#).unwrap_err();
        match err {
            StoreError::InvalidImport(msg) => assert!(msg.contains("meetings")),
            other => panic!("expected InvalidImport, got {:?}", other),
        }
    }

    #[test]
    fn import_rejects_unparseable_payloads() {
        assert!(parse_import("not json at all").is_err());
        assert!(parse_import(r#"{"projects": 5}"#).is_err());
    }
}
