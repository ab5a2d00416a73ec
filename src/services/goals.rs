// Goals service — OKR summaries joining goals to their key results and
// linked initiatives.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::rollup::{goal_progress, key_result_completion};
use crate::store::PmoStore;
use crate::types::GoalStatus;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyResultSummary {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub unit: String,
    pub target_value: f64,
    pub current_value: f64,
    /// Per-KR completion, clamped to [0, 100].
    pub completion: u8,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalSummary {
    pub id: String,
    pub name: String,
    pub owner: String,
    pub status: GoalStatus,
    pub target_date: DateTime<Utc>,
    /// Aggregate progress: key-result average, or linked-initiative task
    /// completion when the goal has no key results.
    pub progress: u8,
    pub key_results: Vec<KeyResultSummary>,
    pub linked_initiative_count: usize,
}

pub fn goal_summaries(store: &PmoStore) -> Vec<GoalSummary> {
    store
        .goals()
        .iter()
        .map(|goal| GoalSummary {
            id: goal.id.clone(),
            name: goal.name.clone(),
            owner: goal.owner.clone(),
            status: goal.status,
            target_date: goal.target_date,
            progress: goal_progress(goal, store.initiatives(), store.tasks()),
            key_results: goal
                .key_results
                .iter()
                .map(|kr| KeyResultSummary {
                    id: kr.id.clone(),
                    name: kr.name.clone(),
                    owner: kr.owner.clone(),
                    unit: kr.unit.clone(),
                    target_value: kr.target_value,
                    current_value: kr.current_value,
                    completion: key_result_completion(kr).round() as u8,
                })
                .collect(),
            linked_initiative_count: store.initiatives_for_goal(&goal.id).len(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::seed_store;

    #[test]
    fn summaries_cover_both_aggregation_paths() {
        let store = seed_store();
        let summaries = goal_summaries(&store);

        // goal-1 has key results: 42/50 → 84, 32/24 → clamped 100; avg 92.
        let goal1 = summaries.iter().find(|g| g.id == "goal-1").unwrap();
        assert_eq!(goal1.progress, 92);
        assert_eq!(goal1.key_results.len(), 2);
        assert_eq!(goal1.key_results[0].completion, 84);
        assert_eq!(goal1.key_results[1].completion, 100);
        assert_eq!(goal1.linked_initiative_count, 2);

        // goal-3 has no key results; initiative 2 is its only link, with
        // one of two tasks done → 50.
        let goal3 = summaries.iter().find(|g| g.id == "goal-3").unwrap();
        assert_eq!(goal3.progress, 50);
        assert!(goal3.key_results.is_empty());
        assert_eq!(goal3.linked_initiative_count, 1);
    }
}
