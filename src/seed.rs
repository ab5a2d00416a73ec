//! Demo portfolio used on first run and as a test fixture.
//!
//! The stored `status`/`progress` values below are seed values only; every
//! consumer recomputes health from the task list.

use chrono::{DateTime, Utc};

use crate::dependencies::TaskDependency;
use crate::store::PmoStore;
use crate::types::{
    CompanyGoal, Department, GoalStatus, Initiative, InitiativeStatus, KeyResult, MeetingScope,
    PmoMeeting, Task, TaskPriority, TaskStatus,
};

fn d(date: &str) -> DateTime<Utc> {
    format!("{}T00:00:00Z", date)
        .parse()
        .expect("valid seed date")
}

#[allow(clippy::too_many_arguments)]
fn initiative(
    id: &str,
    name: &str,
    description: &str,
    color: &str,
    department: Department,
    team: Option<&str>,
    status: InitiativeStatus,
    progress: u8,
    owner: &str,
    due: &str,
    created: &str,
    is_key_initiative: bool,
    goal_id: Option<&str>,
) -> Initiative {
    Initiative {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        color: color.to_string(),
        department,
        team: team.map(str::to_string),
        status,
        progress,
        owner: owner.to_string(),
        due_date: d(due),
        created_at: d(created),
        is_key_initiative,
        goal_id: goal_id.map(str::to_string),
    }
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    project_id: &str,
    title: &str,
    description: &str,
    status: TaskStatus,
    priority: TaskPriority,
    assignee: &str,
    due: &str,
    created: &str,
    tags: &[&str],
    dependencies: &[&str],
) -> Task {
    Task {
        id: id.to_string(),
        project_id: project_id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        status,
        priority,
        assignee: assignee.to_string(),
        due_date: d(due),
        created_at: d(created),
        comments: Vec::new(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        dependencies: dependencies.iter().map(|s| TaskDependency::parse(s)).collect(),
        parent_task_id: None,
    }
}

fn key_result(
    id: &str,
    goal_id: &str,
    name: &str,
    target: f64,
    current: f64,
    unit: &str,
    owner: &str,
    due: &str,
) -> KeyResult {
    KeyResult {
        id: id.to_string(),
        goal_id: goal_id.to_string(),
        name: name.to_string(),
        target_value: target,
        current_value: current,
        unit: unit.to_string(),
        owner: owner.to_string(),
        due_date: d(due),
    }
}

/// Build the demo portfolio.
pub fn seed_store() -> PmoStore {
    let initiatives = vec![
        initiative(
            "1",
            "Digital Transformation Q1",
            "Company-wide digital transformation focusing on cloud migration and process automation",
            "#8B5CF6",
            Department::ItCybersecurity,
            Some("Digital Transformation Team"),
            InitiativeStatus::NeedsAttention,
            45,
            "John Smith",
            "2026-05-20",
            "2026-02-10",
            true,
            None,
        ),
        initiative(
            "2",
            "Cost Optimization Program",
            "Identify and implement cost savings across all departments",
            "#10B981",
            Department::Finance,
            Some("Cost Optimization Team"),
            InitiativeStatus::OnTrack,
            72,
            "Sarah Jones",
            "2026-07-18",
            "2026-02-12",
            true,
            Some("goal-3"),
        ),
        initiative(
            "3",
            "Employee Experience Initiative",
            "Improve employee satisfaction and retention through better tools and processes",
            "#EF4444",
            Department::ProfessionalServices,
            None,
            InitiativeStatus::AtRisk,
            20,
            "David Brown",
            "2026-06-12",
            "2026-02-13",
            false,
            None,
        ),
        initiative(
            "4",
            "Customer Success Platform",
            "Implement new customer success tracking and engagement platform",
            "#10B981",
            Department::CeAndS,
            Some("Customer Success Team"),
            InitiativeStatus::OnTrack,
            55,
            "Rachel Green",
            "2026-06-25",
            "2026-02-20",
            false,
            Some("goal-1"),
        ),
        initiative(
            "5",
            "Sales Process Optimization",
            "Streamline sales workflows and improve conversion rates",
            "#3B82F6",
            Department::Sales,
            Some("Sales Excellence Team"),
            InitiativeStatus::OnTrack,
            65,
            "Mike Anderson",
            "2026-06-30",
            "2026-02-16",
            true,
            Some("goal-1"),
        ),
    ];

    let tasks = vec![
        task(
            "1",
            "1",
            "Migrate database servers",
            "Cloud Migration",
            TaskStatus::InProgress,
            TaskPriority::High,
            "Mike Chen",
            "2026-02-20",
            "2026-02-10",
            &["infrastructure", "cloud"],
            &[],
        ),
        task(
            "2",
            "1",
            "Application containerization",
            "Cloud Migration",
            TaskStatus::Todo,
            TaskPriority::High,
            "John Smith",
            "2026-02-26",
            "2026-02-12",
            &["docker", "cloud"],
            &["after:Migrate database servers"],
        ),
        task(
            "3",
            "1",
            "Develop training materials",
            "Change Management",
            TaskStatus::Todo,
            TaskPriority::High,
            "David Brown",
            "2026-03-02",
            "2026-02-13",
            &["training", "documentation"],
            &[],
        ),
        task(
            "4",
            "1",
            "Schedule training sessions",
            "Change Management",
            TaskStatus::Todo,
            TaskPriority::High,
            "David Brown",
            "2026-03-10",
            "2026-02-14",
            &["training"],
            &["after:Develop training materials"],
        ),
        task(
            "5",
            "2",
            "Negotiate consolidated contracts",
            "Vendor Consolidation",
            TaskStatus::Todo,
            TaskPriority::Medium,
            "Emma Wilson",
            "2026-04-05",
            "2026-02-15",
            &["procurement", "vendors"],
            &[],
        ),
        task(
            "6",
            "2",
            "Audit software licenses",
            "Vendor Consolidation",
            TaskStatus::Done,
            TaskPriority::Medium,
            "Sarah Jones",
            "2026-03-12",
            "2026-02-15",
            &["procurement"],
            &[],
        ),
        task(
            "7",
            "4",
            "Select platform vendor",
            "Vendor Selection",
            TaskStatus::Done,
            TaskPriority::High,
            "Rachel Green",
            "2026-03-20",
            "2026-02-21",
            &["vendor"],
            &[],
        ),
        task(
            "8",
            "4",
            "Pilot with two accounts",
            "Rollout",
            TaskStatus::InProgress,
            TaskPriority::Medium,
            "Rachel Green",
            "2026-05-15",
            "2026-02-22",
            &["pilot"],
            &["after:Select platform vendor"],
        ),
    ];

    let goals = vec![
        CompanyGoal {
            id: "goal-1".to_string(),
            name: "Increase Customer Satisfaction".to_string(),
            description: "Improve overall customer satisfaction scores across all products and services"
                .to_string(),
            target_date: d("2026-12-31"),
            owner: "Jane Executive".to_string(),
            status: GoalStatus::OnTrack,
            key_results: vec![
                key_result(
                    "kr-1",
                    "goal-1",
                    "Increase NPS score",
                    50.0,
                    42.0,
                    "points",
                    "Rachel Green",
                    "2026-12-31",
                ),
                key_result(
                    "kr-2",
                    "goal-1",
                    "Reduce support ticket resolution time",
                    24.0,
                    32.0,
                    "hours",
                    "Mike Anderson",
                    "2026-09-30",
                ),
            ],
            created_at: d("2026-01-05"),
        },
        CompanyGoal {
            id: "goal-3".to_string(),
            name: "Operational Excellence".to_string(),
            description: "Streamline operations and reduce costs by 15%".to_string(),
            target_date: d("2026-06-30"),
            owner: "Sarah Jones".to_string(),
            status: GoalStatus::OnTrack,
            key_results: Vec::new(),
            created_at: d("2026-01-05"),
        },
    ];

    let meetings = vec![PmoMeeting {
        id: "pmo-1".to_string(),
        department: MeetingScope::All,
        date: d("2026-03-02"),
        attendees: "Jane Executive, John Smith".to_string(),
        team_status: "Team is on track overall with a few risks flagged for next sprint."
            .to_string(),
        items_requiring_attention: "Vendor contract approvals pending for IT-Cybersecurity."
            .to_string(),
        tasks_coming_due: "Cloud migration training materials due next week.".to_string(),
        meeting_notes: "Reviewed portfolio health and confirmed priorities for next month."
            .to_string(),
        decisions_made: "Approved additional budget for digital transformation.".to_string(),
        action_items_assigned: "Sarah to draft budget request and share by Friday.".to_string(),
        parking_lot: "Discuss PMO tooling upgrade at next meeting.".to_string(),
        created_at: d("2026-03-02"),
    }];

    PmoStore::from_collections(initiatives, tasks, goals, meetings)
}
