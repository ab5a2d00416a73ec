//! Derived initiative health: completion percentage and traffic-light status.
//!
//! Views never trust the `status`/`progress` fields stored on an initiative.
//! Wherever tasks exist, these two functions are recomputed from the task
//! list at read time: every caller re-filters the global task list and
//! calls them fresh, so a derived status can change between two reads with
//! no data mutation (the clock moved).

use chrono::{DateTime, Duration, Utc};

use crate::types::{InitiativeStatus, Task};

/// Incomplete tasks due within this many days count as "needs attention".
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Completion percentage for a set of tasks, 0–100.
///
/// An empty task list is 0% complete. Rounding is half-up to the nearest
/// integer.
pub fn calculate_progress(tasks: &[Task]) -> u8 {
    if tasks.is_empty() {
        return 0;
    }
    let done = tasks.iter().filter(|t| t.is_done()).count();
    ((done as f64 / tasks.len() as f64) * 100.0).round() as u8
}

/// Derived status against the wall clock. See [`derive_status_at`].
pub fn derive_status(tasks: &[Task]) -> InitiativeStatus {
    derive_status_at(tasks, Utc::now())
}

/// Traffic-light status for a set of tasks at a given instant.
///
/// Strict priority order:
/// 1. any incomplete task strictly past due → at-risk
/// 2. else any incomplete task due on or before `now + 7d` → needs-attention
/// 3. else → on-track
///
/// An empty task list is on-track: no tasks means no risk signal. (Whether
/// "no signal" should instead read as "no data" is an open product
/// question; this is the shipped behavior.)
pub fn derive_status_at(tasks: &[Task], now: DateTime<Utc>) -> InitiativeStatus {
    if tasks.is_empty() {
        return InitiativeStatus::OnTrack;
    }

    let due_soon_cutoff = now + Duration::days(DUE_SOON_WINDOW_DAYS);

    let has_overdue = tasks
        .iter()
        .any(|t| !t.is_done() && t.due_date < now);
    if has_overdue {
        return InitiativeStatus::AtRisk;
    }

    let has_due_soon = tasks
        .iter()
        .any(|t| !t.is_done() && t.due_date <= due_soon_cutoff);
    if has_due_soon {
        return InitiativeStatus::NeedsAttention;
    }

    InitiativeStatus::OnTrack
}
