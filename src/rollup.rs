//! Goal progress aggregation for OKR tracking.
//!
//! A goal with key results is measured by them; a goal without key results
//! falls back to the task-completion ratio of the initiatives linked to it
//! via `goalId`. Like the initiative health functions, this re-scans the
//! collections on every call.

use crate::types::{CompanyGoal, Initiative, KeyResult, Task};

/// Completion of a single key result as a percentage, clamped to [0, 100].
///
/// A zero (or negative) target counts as met: there is nothing left to do,
/// so the key result reads 100% regardless of `current_value`. The clamp
/// also floors runaway negatives, keeping the aggregate in range.
pub fn key_result_completion(kr: &KeyResult) -> f64 {
    if kr.target_value <= 0.0 {
        return 100.0;
    }
    ((kr.current_value / kr.target_value) * 100.0).clamp(0.0, 100.0)
}

/// Progress percentage for a goal, 0–100.
///
/// With key results: the rounded average of per-KR completion (each KR
/// clamped before averaging, so one overshooting KR cannot mask another).
/// Without key results: the rounded average of the task-completion
/// percentage (`health::calculate_progress` semantics) over every
/// initiative in `initiatives` whose `goal_id` matches; if nothing links
/// to the goal either, 0.
pub fn goal_progress(goal: &CompanyGoal, initiatives: &[Initiative], tasks: &[Task]) -> u8 {
    if !goal.key_results.is_empty() {
        let total: f64 = goal.key_results.iter().map(key_result_completion).sum();
        return (total / goal.key_results.len() as f64).round() as u8;
    }

    let linked: Vec<&Initiative> = initiatives
        .iter()
        .filter(|i| i.goal_id.as_deref() == Some(goal.id.as_str()))
        .collect();
    if linked.is_empty() {
        return 0;
    }

    let total: u32 = linked
        .iter()
        .map(|initiative| {
            let mut done = 0usize;
            let mut count = 0usize;
            for t in tasks.iter().filter(|t| t.project_id == initiative.id) {
                count += 1;
                if t.is_done() {
                    done += 1;
                }
            }
            // Same rounding as calculate_progress, applied per initiative
            // before averaging.
            if count == 0 {
                0
            } else {
                ((done as f64 / count as f64) * 100.0).round() as u32
            }
        })
        .sum();
    ((total as f64) / (linked.len() as f64)).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        Department, GoalStatus, InitiativeStatus, TaskPriority, TaskStatus,
    };
    use chrono::{DateTime, Utc};

    fn date(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    fn goal(id: &str, key_results: Vec<KeyResult>) -> CompanyGoal {
        CompanyGoal {
            id: id.to_string(),
            name: "Goal".to_string(),
            description: String::new(),
            target_date: date("2026-12-31T00:00:00Z"),
            owner: "Jane".to_string(),
            status: GoalStatus::OnTrack,
            key_results,
            created_at: date("2026-01-01T00:00:00Z"),
        }
    }

    fn kr(goal_id: &str, current: f64, target: f64) -> KeyResult {
        KeyResult {
            id: "kr-1".to_string(),
            goal_id: goal_id.to_string(),
            name: "KR".to_string(),
            target_value: target,
            current_value: current,
            unit: "points".to_string(),
            owner: "Jane".to_string(),
            due_date: date("2026-12-31T00:00:00Z"),
        }
    }

    fn initiative(id: &str, goal_id: Option<&str>) -> Initiative {
        Initiative {
            id: id.to_string(),
            name: "Initiative".to_string(),
            description: String::new(),
            color: "#3B82F6".to_string(),
            department: Department::Product,
            team: None,
            status: InitiativeStatus::OnTrack,
            progress: 0,
            owner: "Sam".to_string(),
            due_date: date("2026-09-01T00:00:00Z"),
            created_at: date("2026-01-01T00:00:00Z"),
            is_key_initiative: false,
            goal_id: goal_id.map(str::to_string),
        }
    }

    fn task(project_id: &str, status: TaskStatus) -> Task {
        Task {
            id: "t".to_string(),
            project_id: project_id.to_string(),
            title: "Task".to_string(),
            description: String::new(),
            status,
            priority: TaskPriority::Low,
            assignee: String::new(),
            due_date: date("2026-06-01T00:00:00Z"),
            created_at: date("2026-01-01T00:00:00Z"),
            comments: Vec::new(),
            tags: Vec::new(),
            dependencies: Vec::new(),
            parent_task_id: None,
        }
    }

    #[test]
    fn key_results_average_with_overshoot_clamped() {
        // 50/100 → 50, 200/100 → clamped 100; average 75
        let g = goal("g1", vec![kr("g1", 50.0, 100.0), kr("g1", 200.0, 100.0)]);
        assert_eq!(goal_progress(&g, &[], &[]), 75);
    }

    #[test]
    fn zero_target_key_result_counts_as_met() {
        let g = goal("g1", vec![kr("g1", 0.0, 0.0), kr("g1", 25.0, 100.0)]);
        // 100 + 25 → 62.5 → 63
        assert_eq!(goal_progress(&g, &[], &[]), 63);
    }

    #[test]
    fn negative_current_value_floors_at_zero() {
        let g = goal("g1", vec![kr("g1", -40.0, 100.0)]);
        assert_eq!(goal_progress(&g, &[], &[]), 0);
    }

    #[test]
    fn falls_back_to_linked_initiative_task_completion() {
        let g = goal("g1", Vec::new());
        let initiatives = vec![
            initiative("p1", Some("g1")),
            initiative("p2", Some("g1")),
            initiative("p3", None),
        ];
        // p1: 2 of 5 done = 40%. p2: 3 of 5 done = 60%. p3 not linked.
        let mut tasks = Vec::new();
        tasks.extend((0..2).map(|_| task("p1", TaskStatus::Done)));
        tasks.extend((0..3).map(|_| task("p1", TaskStatus::Todo)));
        tasks.extend((0..3).map(|_| task("p2", TaskStatus::Done)));
        tasks.extend((0..2).map(|_| task("p2", TaskStatus::InProgress)));
        tasks.extend((0..4).map(|_| task("p3", TaskStatus::Done)));

        assert_eq!(goal_progress(&g, &initiatives, &tasks), 50);
    }

    #[test]
    fn linked_initiative_without_tasks_counts_as_zero() {
        let g = goal("g1", Vec::new());
        let initiatives = vec![initiative("p1", Some("g1")), initiative("p2", Some("g1"))];
        let tasks = vec![task("p1", TaskStatus::Done)];
        // p1 = 100, p2 = 0 → 50
        assert_eq!(goal_progress(&g, &initiatives, &tasks), 50);
    }

    #[test]
    fn no_key_results_and_no_links_is_zero() {
        let g = goal("g1", Vec::new());
        assert_eq!(goal_progress(&g, &[initiative("p1", None)], &[]), 0);
    }
}
