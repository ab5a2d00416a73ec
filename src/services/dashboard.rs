// Dashboard service — portfolio-level read queries.
// Everything here recomputes derived health per initiative on each call;
// there is no cached or incremental state to invalidate.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::health::{calculate_progress, derive_status_at, DUE_SOON_WINDOW_DAYS};
use crate::store::PmoStore;
use crate::types::{Department, Initiative, InitiativeStatus, Task};

/// One initiative with its derived health, the unit every dashboard list
/// renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiativeHealth {
    pub id: String,
    pub name: String,
    pub department: Department,
    pub owner: String,
    pub due_date: DateTime<Utc>,
    pub is_key_initiative: bool,
    /// Derived from tasks, not the stored seed field.
    pub status: InitiativeStatus,
    /// Derived from tasks, not the stored seed field.
    pub progress: u8,
    pub task_count: usize,
    pub open_task_count: usize,
}

/// Health rollup for one department's slice of the portfolio.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentRollup {
    pub department: Department,
    pub initiative_count: usize,
    pub task_count: usize,
    /// Average derived progress across the department's initiatives.
    pub average_progress: u8,
    /// Worst derived status across the department's initiatives.
    pub worst_status: InitiativeStatus,
}

/// The whole-portfolio view the shell renders on its landing screen.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub generated_at: DateTime<Utc>,
    pub initiative_count: usize,
    pub active_initiative_count: usize,
    pub task_count: usize,
    pub overdue_count: usize,
    pub due_this_week_count: usize,
    pub completed_task_count: usize,
    pub initiatives: Vec<InitiativeHealth>,
    pub departments: Vec<DepartmentRollup>,
}

/// Derived health for one initiative at `now`.
pub fn initiative_health(
    store: &PmoStore,
    initiative: &Initiative,
    now: DateTime<Utc>,
) -> InitiativeHealth {
    let tasks = store.tasks_for_initiative(&initiative.id);
    let open = tasks.iter().filter(|t| !t.is_done()).count();
    InitiativeHealth {
        id: initiative.id.clone(),
        name: initiative.name.clone(),
        department: initiative.department,
        owner: initiative.owner.clone(),
        due_date: initiative.due_date,
        is_key_initiative: initiative.is_key_initiative,
        status: derive_status_at(&tasks, now),
        progress: calculate_progress(&tasks),
        task_count: tasks.len(),
        open_task_count: open,
    }
}

/// Incomplete tasks strictly past due, soonest first.
pub fn overdue_tasks(store: &PmoStore, now: DateTime<Utc>) -> Vec<Task> {
    let mut tasks: Vec<Task> = store
        .tasks()
        .iter()
        .filter(|t| !t.is_done() && t.due_date < now)
        .cloned()
        .collect();
    tasks.sort_by_key(|t| t.due_date);
    tasks
}

/// Incomplete tasks due between `now` and `now + 7d` inclusive, soonest
/// first. Overdue tasks are not repeated here.
pub fn tasks_due_this_week(store: &PmoStore, now: DateTime<Utc>) -> Vec<Task> {
    let cutoff = now + Duration::days(DUE_SOON_WINDOW_DAYS);
    let mut tasks: Vec<Task> = store
        .tasks()
        .iter()
        .filter(|t| !t.is_done() && t.due_date >= now && t.due_date <= cutoff)
        .cloned()
        .collect();
    tasks.sort_by_key(|t| t.due_date);
    tasks
}

pub fn completed_tasks(store: &PmoStore) -> Vec<Task> {
    store.tasks().iter().filter(|t| t.is_done()).cloned().collect()
}

/// Initiatives whose derived progress is under 100%.
pub fn active_initiatives(store: &PmoStore, now: DateTime<Utc>) -> Vec<InitiativeHealth> {
    store
        .initiatives()
        .iter()
        .map(|i| initiative_health(store, i, now))
        .filter(|h| h.progress < 100)
        .collect()
}

pub fn key_initiatives(store: &PmoStore, now: DateTime<Utc>) -> Vec<InitiativeHealth> {
    store
        .initiatives()
        .iter()
        .filter(|i| i.is_key_initiative)
        .map(|i| initiative_health(store, i, now))
        .collect()
}

/// Rollups for all eight departments, including the empty ones (the
/// overview grid always shows every department).
pub fn department_rollups(store: &PmoStore, now: DateTime<Utc>) -> Vec<DepartmentRollup> {
    Department::ALL
        .iter()
        .map(|&department| {
            let healths: Vec<InitiativeHealth> = store
                .initiatives_for_department(department)
                .into_iter()
                .map(|i| initiative_health(store, i, now))
                .collect();
            let task_count = healths.iter().map(|h| h.task_count).sum();
            let average_progress = if healths.is_empty() {
                0
            } else {
                let total: u32 = healths.iter().map(|h| h.progress as u32).sum();
                (total as f64 / healths.len() as f64).round() as u8
            };
            let worst_status = healths
                .iter()
                .map(|h| h.status)
                .max_by_key(|s| s.severity())
                .unwrap_or(InitiativeStatus::OnTrack);
            DepartmentRollup {
                department,
                initiative_count: healths.len(),
                task_count,
                average_progress,
                worst_status,
            }
        })
        .collect()
}

/// Assemble the full landing-screen snapshot at `now`.
pub fn portfolio_snapshot(store: &PmoStore, now: DateTime<Utc>) -> PortfolioSnapshot {
    let initiatives: Vec<InitiativeHealth> = store
        .initiatives()
        .iter()
        .map(|i| initiative_health(store, i, now))
        .collect();
    let active = initiatives.iter().filter(|h| h.progress < 100).count();

    PortfolioSnapshot {
        generated_at: now,
        initiative_count: initiatives.len(),
        active_initiative_count: active,
        task_count: store.tasks().len(),
        overdue_count: overdue_tasks(store, now).len(),
        due_this_week_count: tasks_due_this_week(store, now).len(),
        completed_task_count: completed_tasks(store).len(),
        initiatives,
        departments: department_rollups(store, now),
    }
}
