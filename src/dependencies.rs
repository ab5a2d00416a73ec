//! Task dependency references, decoded once at the data boundary.
//!
//! The snapshot format encodes a dependency as `"after:<ref>"` or
//! `"parallel:<ref>"`; a missing or unrecognized prefix means `after`. The
//! reference is matched, in order, against a task id, a synthetic
//! per-initiative row key (`DIG-3`: three-letter initiative code plus
//! 1-based row index over the due-date-sorted task list), and finally a
//! task title (case-insensitive). Resolution is best-effort and display
//! only: a reference to a renamed or deleted task is dropped from the
//! result, never raised as an error.

use serde::{Deserialize, Serialize};

use crate::types::Task;
use crate::util::initiative_code;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    After,
    Parallel,
}

impl DependencyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DependencyKind::After => "after",
            DependencyKind::Parallel => "parallel",
        }
    }
}

/// A decoded dependency reference: kind plus the raw target reference
/// (task id, row key, or title, whichever the author typed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub struct TaskDependency {
    pub kind: DependencyKind,
    pub target: String,
}

impl TaskDependency {
    pub fn new(kind: DependencyKind, target: impl Into<String>) -> Self {
        TaskDependency {
            kind,
            target: target.into(),
        }
    }

    /// Decode the string form. Never fails: anything without a recognized
    /// prefix is an `after` reference to the whole trimmed string.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        for (prefix, kind) in [
            ("parallel:", DependencyKind::Parallel),
            ("after:", DependencyKind::After),
        ] {
            if trimmed.is_char_boundary(prefix.len())
                && trimmed[..prefix.len()].eq_ignore_ascii_case(prefix)
            {
                return TaskDependency::new(kind, trimmed[prefix.len()..].trim());
            }
        }
        TaskDependency::new(DependencyKind::After, trimmed)
    }
}

impl From<String> for TaskDependency {
    fn from(raw: String) -> Self {
        TaskDependency::parse(&raw)
    }
}

impl From<TaskDependency> for String {
    fn from(dep: TaskDependency) -> String {
        format!("{}:{}", dep.kind.as_str(), dep.target)
    }
}

/// A dependency edge resolved to concrete task ids, ready to draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyLink {
    pub from_task_id: String,
    pub to_task_id: String,
    pub kind: DependencyKind,
}

/// Synthetic row key for the task at `row_index` (1-based) of an
/// initiative's timeline.
pub fn row_key(initiative_name: &str, row_index: usize) -> String {
    format!("{}-{}", initiative_code(initiative_name), row_index)
}

/// Resolve every dependency of every task in one initiative to drawable
/// edges. `tasks` is the initiative's full task list; row keys are
/// assigned over the list sorted by due date, matching the timeline's row
/// order. Unresolvable references are silently dropped.
pub fn resolve_links(initiative_name: &str, tasks: &[Task]) -> Vec<DependencyLink> {
    let mut sorted: Vec<&Task> = tasks.iter().collect();
    sorted.sort_by_key(|t| t.due_date);

    let mut links = Vec::new();
    for task in &sorted {
        for dep in &task.dependencies {
            if let Some(from_id) = resolve_target(&dep.target, initiative_name, &sorted) {
                links.push(DependencyLink {
                    from_task_id: from_id,
                    to_task_id: task.id.clone(),
                    kind: dep.kind,
                });
            }
        }
    }
    links
}

/// Match a single reference against id, row key, then title.
fn resolve_target(target: &str, initiative_name: &str, sorted: &[&Task]) -> Option<String> {
    let target = target.trim();
    if target.is_empty() {
        return None;
    }

    if let Some(t) = sorted.iter().find(|t| t.id == target) {
        return Some(t.id.clone());
    }

    let key = target.to_uppercase();
    for (index, t) in sorted.iter().enumerate() {
        if row_key(initiative_name, index + 1) == key {
            return Some(t.id.clone());
        }
    }

    sorted
        .iter()
        .find(|t| t.title.eq_ignore_ascii_case(target))
        .map(|t| t.id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TaskPriority, TaskStatus};
    use chrono::{DateTime, Duration, Utc};

    fn base_date() -> DateTime<Utc> {
        "2026-04-01T00:00:00Z".parse().unwrap()
    }

    fn task(id: &str, title: &str, due_offset_days: i64, deps: Vec<TaskDependency>) -> Task {
        Task {
            id: id.to_string(),
            project_id: "p1".to_string(),
            title: title.to_string(),
            description: String::new(),
            status: TaskStatus::Todo,
            priority: TaskPriority::Medium,
            assignee: String::new(),
            due_date: base_date() + Duration::days(due_offset_days),
            created_at: base_date(),
            comments: Vec::new(),
            tags: Vec::new(),
            dependencies: deps,
            parent_task_id: None,
        }
    }

    #[test]
    fn parse_recognizes_prefixes_case_insensitively() {
        let dep = TaskDependency::parse("after:Migrate database servers");
        assert_eq!(dep.kind, DependencyKind::After);
        assert_eq!(dep.target, "Migrate database servers");

        let dep = TaskDependency::parse("PARALLEL: Instrument mobile events ");
        assert_eq!(dep.kind, DependencyKind::Parallel);
        assert_eq!(dep.target, "Instrument mobile events");
    }

    #[test]
    fn parse_defaults_to_after_without_prefix() {
        let dep = TaskDependency::parse("  Develop training materials ");
        assert_eq!(dep.kind, DependencyKind::After);
        assert_eq!(dep.target, "Develop training materials");
    }

    #[test]
    fn wire_round_trip_normalizes_to_prefixed_form() {
        let json = "\"Migrate database servers\"";
        let dep: TaskDependency = serde_json::from_str(json).unwrap();
        assert_eq!(
            serde_json::to_string(&dep).unwrap(),
            "\"after:Migrate database servers\""
        );
    }

    #[test]
    fn resolves_by_title_case_insensitively() {
        let tasks = vec![
            task("t1", "Migrate database servers", 0, Vec::new()),
            task(
                "t2",
                "Application containerization",
                5,
                vec![TaskDependency::parse("after:migrate DATABASE servers")],
            ),
        ];
        let links = resolve_links("Digital Transformation Q1", &tasks);
        assert_eq!(
            links,
            vec![DependencyLink {
                from_task_id: "t1".to_string(),
                to_task_id: "t2".to_string(),
                kind: DependencyKind::After,
            }]
        );
    }

    #[test]
    fn resolves_by_synthetic_row_key() {
        // Row keys follow due-date order: t1 is DIG-1, t2 is DIG-2.
        let tasks = vec![
            task(
                "t2",
                "Second",
                5,
                vec![TaskDependency::parse("parallel:dig-1")],
            ),
            task("t1", "First", 0, Vec::new()),
        ];
        let links = resolve_links("Digital Transformation Q1", &tasks);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].from_task_id, "t1");
        assert_eq!(links[0].kind, DependencyKind::Parallel);
    }

    #[test]
    fn resolves_by_task_id_before_key_or_title() {
        let tasks = vec![
            task("t1", "First", 0, Vec::new()),
            task("t2", "Second", 5, vec![TaskDependency::parse("after:t1")]),
        ];
        let links = resolve_links("Proj", &tasks);
        assert_eq!(links[0].from_task_id, "t1");
    }

    #[test]
    fn unresolvable_references_are_dropped_silently() {
        let tasks = vec![
            task("t1", "First", 0, Vec::new()),
            task(
                "t2",
                "Second",
                5,
                vec![
                    TaskDependency::parse("after:Renamed task"),
                    TaskDependency::parse("after:ZZZ-99"),
                    TaskDependency::parse("after:"),
                ],
            ),
        ];
        assert!(resolve_links("Proj", &tasks).is_empty());
    }
}
