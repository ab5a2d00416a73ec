//! The owning repository for the four portfolio collections.
//!
//! Reads go through borrow accessors; every mutation goes through
//! [`PmoStore::apply`] with a [`Command`], so the write path is a single
//! auditable function. Partial updates are expressed as per-entity patch
//! structs of `Option` fields, so only fields that appear there are
//! legally patchable. Creation commands carry draft structs; the store
//! mints the id and `created_at`.
//!
//! The store itself is persistence-agnostic. [`persist::Workspace`] wraps
//! it and re-serializes each touched collection after a command is applied.

pub mod persist;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::dependencies::TaskDependency;
use crate::error::StoreError;
use crate::types::{
    CompanyGoal, Department, GoalStatus, Initiative, InitiativeStatus, KeyResult, MeetingScope,
    PmoMeeting, Task, TaskComment, TaskPriority, TaskStatus,
};
use crate::util::mint_id;

// =============================================================================
// Collections
// =============================================================================

/// One of the four top-level collections. Each persists as its own
/// whole-collection snapshot under a dedicated storage key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Initiatives,
    Tasks,
    Goals,
    Meetings,
}

impl Collection {
    pub const ALL: [Collection; 4] = [
        Collection::Initiatives,
        Collection::Tasks,
        Collection::Goals,
        Collection::Meetings,
    ];

    /// Storage key naming the collection's snapshot file.
    pub fn storage_key(&self) -> &'static str {
        match self {
            Collection::Initiatives => "pmo-projects",
            Collection::Tasks => "pmo-tasks",
            Collection::Goals => "pmo-goals",
            Collection::Meetings => "pmo-meetings",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PmoStore {
    initiatives: Vec<Initiative>,
    tasks: Vec<Task>,
    goals: Vec<CompanyGoal>,
    meetings: Vec<PmoMeeting>,
}

impl PmoStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_collections(
        initiatives: Vec<Initiative>,
        tasks: Vec<Task>,
        goals: Vec<CompanyGoal>,
        meetings: Vec<PmoMeeting>,
    ) -> Self {
        PmoStore {
            initiatives,
            tasks,
            goals,
            meetings,
        }
    }

    // -------------------------------------------------------------------------
    // Read side
    // -------------------------------------------------------------------------

    pub fn initiatives(&self) -> &[Initiative] {
        &self.initiatives
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn goals(&self) -> &[CompanyGoal] {
        &self.goals
    }

    pub fn meetings(&self) -> &[PmoMeeting] {
        &self.meetings
    }

    pub fn initiative(&self, id: &str) -> Option<&Initiative> {
        self.initiatives.iter().find(|i| i.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&CompanyGoal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn meeting(&self, id: &str) -> Option<&PmoMeeting> {
        self.meetings.iter().find(|m| m.id == id)
    }

    /// The task subset every derivation consumes: all tasks belonging to
    /// one initiative. Re-filtered on every call, no caching.
    pub fn tasks_for_initiative(&self, initiative_id: &str) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|t| t.project_id == initiative_id)
            .cloned()
            .collect()
    }

    pub fn initiatives_for_department(&self, department: Department) -> Vec<&Initiative> {
        self.initiatives
            .iter()
            .filter(|i| i.department == department)
            .collect()
    }

    pub fn initiatives_for_goal(&self, goal_id: &str) -> Vec<&Initiative> {
        self.initiatives
            .iter()
            .filter(|i| i.goal_id.as_deref() == Some(goal_id))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Write side
    // -------------------------------------------------------------------------

    /// Apply one mutation command. Returns the id of the touched entity and
    /// the collections that changed (deletes can touch more than one via
    /// cascade).
    pub fn apply(&mut self, command: Command) -> Result<Applied, StoreError> {
        match command {
            Command::AddInitiative { draft } => {
                let id = mint_id("proj");
                self.initiatives.push(draft.into_initiative(id.clone()));
                Ok(Applied::one(id, Collection::Initiatives))
            }
            Command::UpdateInitiative { id, patch } => {
                let initiative = self
                    .initiatives
                    .iter_mut()
                    .find(|i| i.id == id)
                    .ok_or_else(|| StoreError::not_found("Initiative", &id))?;
                patch.apply_to(initiative);
                Ok(Applied::one(id, Collection::Initiatives))
            }
            Command::LinkInitiativeToGoal { id, goal_id } => {
                let initiative = self
                    .initiatives
                    .iter_mut()
                    .find(|i| i.id == id)
                    .ok_or_else(|| StoreError::not_found("Initiative", &id))?;
                initiative.goal_id = goal_id;
                Ok(Applied::one(id, Collection::Initiatives))
            }
            Command::DeleteInitiative { id } => {
                if !self.initiatives.iter().any(|i| i.id == id) {
                    return Err(StoreError::not_found("Initiative", &id));
                }
                self.initiatives.retain(|i| i.id != id);
                let before = self.tasks.len();
                self.tasks.retain(|t| t.project_id != id);
                let cascaded = before - self.tasks.len();
                if cascaded > 0 {
                    log::debug!("Initiative {} deleted, cascading {} tasks", id, cascaded);
                }
                Ok(Applied {
                    id,
                    touched: vec![Collection::Initiatives, Collection::Tasks],
                })
            }
            Command::AddTask { draft } => {
                let id = mint_id("task");
                self.tasks.push(draft.into_task(id.clone()));
                Ok(Applied::one(id, Collection::Tasks))
            }
            Command::UpdateTask { id, patch } => {
                let task = self
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or_else(|| StoreError::not_found("Task", &id))?;
                patch.apply_to(task);
                Ok(Applied::one(id, Collection::Tasks))
            }
            Command::AddTaskComment {
                task_id,
                author,
                text,
            } => {
                let task = self
                    .tasks
                    .iter_mut()
                    .find(|t| t.id == task_id)
                    .ok_or_else(|| StoreError::not_found("Task", &task_id))?;
                task.comments.push(TaskComment {
                    id: mint_id("cmt"),
                    text,
                    author,
                    created_at: Utc::now(),
                });
                Ok(Applied::one(task_id, Collection::Tasks))
            }
            Command::DeleteTask { id } => {
                if !self.tasks.iter().any(|t| t.id == id) {
                    return Err(StoreError::not_found("Task", &id));
                }
                // Subtasks of a deleted parent keep their dangling parent id;
                // they degrade to top-level display, same as unresolvable
                // dependency references.
                self.tasks.retain(|t| t.id != id);
                Ok(Applied::one(id, Collection::Tasks))
            }
            Command::AddGoal { draft } => {
                let id = mint_id("goal");
                self.goals.push(draft.into_goal(id.clone()));
                Ok(Applied::one(id, Collection::Goals))
            }
            Command::UpdateGoal { id, patch } => {
                let goal = self
                    .goals
                    .iter_mut()
                    .find(|g| g.id == id)
                    .ok_or_else(|| StoreError::not_found("Goal", &id))?;
                patch.apply_to(goal);
                Ok(Applied::one(id, Collection::Goals))
            }
            Command::DeleteGoal { id } => {
                if !self.goals.iter().any(|g| g.id == id) {
                    return Err(StoreError::not_found("Goal", &id));
                }
                self.goals.retain(|g| g.id != id);
                let mut unlinked = 0;
                for initiative in self
                    .initiatives
                    .iter_mut()
                    .filter(|i| i.goal_id.as_deref() == Some(id.as_str()))
                {
                    initiative.goal_id = None;
                    unlinked += 1;
                }
                if unlinked > 0 {
                    log::debug!("Goal {} deleted, unlinked {} initiatives", id, unlinked);
                    return Ok(Applied {
                        id,
                        touched: vec![Collection::Goals, Collection::Initiatives],
                    });
                }
                Ok(Applied::one(id, Collection::Goals))
            }
            Command::AddKeyResult { goal_id, draft } => {
                let goal = self
                    .goals
                    .iter_mut()
                    .find(|g| g.id == goal_id)
                    .ok_or_else(|| StoreError::not_found("Goal", &goal_id))?;
                let id = mint_id("kr");
                goal.key_results.push(draft.into_key_result(id.clone(), goal_id));
                Ok(Applied::one(id, Collection::Goals))
            }
            Command::UpdateKeyResult {
                goal_id,
                key_result_id,
                patch,
            } => {
                let goal = self
                    .goals
                    .iter_mut()
                    .find(|g| g.id == goal_id)
                    .ok_or_else(|| StoreError::not_found("Goal", &goal_id))?;
                let kr = goal
                    .key_results
                    .iter_mut()
                    .find(|kr| kr.id == key_result_id)
                    .ok_or_else(|| StoreError::not_found("Key result", &key_result_id))?;
                patch.apply_to(kr);
                Ok(Applied::one(key_result_id, Collection::Goals))
            }
            Command::DeleteKeyResult {
                goal_id,
                key_result_id,
            } => {
                let goal = self
                    .goals
                    .iter_mut()
                    .find(|g| g.id == goal_id)
                    .ok_or_else(|| StoreError::not_found("Goal", &goal_id))?;
                if !goal.key_results.iter().any(|kr| kr.id == key_result_id) {
                    return Err(StoreError::not_found("Key result", &key_result_id));
                }
                goal.key_results.retain(|kr| kr.id != key_result_id);
                Ok(Applied::one(key_result_id, Collection::Goals))
            }
            Command::AddMeeting { draft } => {
                let id = mint_id("pmo");
                // Newest meeting first, matching the meeting list's ordering.
                self.meetings.insert(0, draft.into_meeting(id.clone()));
                Ok(Applied::one(id, Collection::Meetings))
            }
            Command::UpdateMeeting { id, patch } => {
                let meeting = self
                    .meetings
                    .iter_mut()
                    .find(|m| m.id == id)
                    .ok_or_else(|| StoreError::not_found("Meeting", &id))?;
                patch.apply_to(meeting);
                Ok(Applied::one(id, Collection::Meetings))
            }
            Command::DeleteMeeting { id } => {
                if !self.meetings.iter().any(|m| m.id == id) {
                    return Err(StoreError::not_found("Meeting", &id));
                }
                self.meetings.retain(|m| m.id != id);
                Ok(Applied::one(id, Collection::Meetings))
            }
        }
    }
}

/// Outcome of a successfully applied command.
#[derive(Debug, Clone)]
pub struct Applied {
    /// Id of the entity that was created, patched, or deleted.
    pub id: String,
    /// Collections whose snapshots must be re-serialized.
    pub touched: Vec<Collection>,
}

impl Applied {
    fn one(id: String, collection: Collection) -> Self {
        Applied {
            id,
            touched: vec![collection],
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

/// The complete set of legal mutations. Serializable so a shell can log or
/// replay the write path.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Command {
    AddInitiative { draft: NewInitiative },
    UpdateInitiative { id: String, patch: InitiativePatch },
    /// Link (or with `None`, unlink) an initiative to a company goal.
    LinkInitiativeToGoal { id: String, goal_id: Option<String> },
    DeleteInitiative { id: String },
    AddTask { draft: NewTask },
    UpdateTask { id: String, patch: TaskPatch },
    AddTaskComment { task_id: String, author: String, text: String },
    DeleteTask { id: String },
    AddGoal { draft: NewGoal },
    UpdateGoal { id: String, patch: GoalPatch },
    DeleteGoal { id: String },
    AddKeyResult { goal_id: String, draft: NewKeyResult },
    UpdateKeyResult { goal_id: String, key_result_id: String, patch: KeyResultPatch },
    DeleteKeyResult { goal_id: String, key_result_id: String },
    AddMeeting { draft: NewMeeting },
    UpdateMeeting { id: String, patch: MeetingPatch },
    DeleteMeeting { id: String },
}

fn default_color() -> String {
    "#3B82F6".to_string()
}

fn default_initiative_status() -> InitiativeStatus {
    InitiativeStatus::OnTrack
}

fn default_goal_status() -> GoalStatus {
    GoalStatus::OnTrack
}

fn default_task_status() -> TaskStatus {
    TaskStatus::Todo
}

fn default_task_priority() -> TaskPriority {
    TaskPriority::Medium
}

/// Draft for a new initiative; id and `created_at` are assigned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInitiative {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_color")]
    pub color: String,
    pub department: Department,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default = "default_initiative_status")]
    pub status: InitiativeStatus,
    #[serde(default)]
    pub progress: u8,
    pub owner: String,
    pub due_date: chrono::DateTime<Utc>,
    #[serde(default)]
    pub is_key_initiative: bool,
    #[serde(default)]
    pub goal_id: Option<String>,
}

impl NewInitiative {
    fn into_initiative(self, id: String) -> Initiative {
        Initiative {
            id,
            name: self.name,
            description: self.description,
            color: self.color,
            department: self.department,
            team: self.team,
            status: self.status,
            progress: self.progress,
            owner: self.owner,
            due_date: self.due_date,
            created_at: Utc::now(),
            is_key_initiative: self.is_key_initiative,
            goal_id: self.goal_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    pub project_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_task_status")]
    pub status: TaskStatus,
    #[serde(default = "default_task_priority")]
    pub priority: TaskPriority,
    #[serde(default)]
    pub assignee: String,
    pub due_date: chrono::DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub dependencies: Vec<TaskDependency>,
    #[serde(default)]
    pub parent_task_id: Option<String>,
}

impl NewTask {
    fn into_task(self, id: String) -> Task {
        Task {
            id,
            project_id: self.project_id,
            title: self.title,
            description: self.description,
            status: self.status,
            priority: self.priority,
            assignee: self.assignee,
            due_date: self.due_date,
            created_at: Utc::now(),
            comments: Vec::new(),
            tags: self.tags,
            dependencies: self.dependencies,
            parent_task_id: self.parent_task_id,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub target_date: chrono::DateTime<Utc>,
    pub owner: String,
    #[serde(default = "default_goal_status")]
    pub status: GoalStatus,
}

impl NewGoal {
    fn into_goal(self, id: String) -> CompanyGoal {
        CompanyGoal {
            id,
            name: self.name,
            description: self.description,
            target_date: self.target_date,
            owner: self.owner,
            status: self.status,
            key_results: Vec::new(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKeyResult {
    pub name: String,
    pub target_value: f64,
    #[serde(default)]
    pub current_value: f64,
    #[serde(default)]
    pub unit: String,
    pub owner: String,
    pub due_date: chrono::DateTime<Utc>,
}

impl NewKeyResult {
    fn into_key_result(self, id: String, goal_id: String) -> KeyResult {
        KeyResult {
            id,
            goal_id,
            name: self.name,
            target_value: self.target_value,
            current_value: self.current_value,
            unit: self.unit,
            owner: self.owner,
            due_date: self.due_date,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMeeting {
    pub department: MeetingScope,
    pub date: chrono::DateTime<Utc>,
    #[serde(default)]
    pub attendees: String,
}

impl NewMeeting {
    fn into_meeting(self, id: String) -> PmoMeeting {
        PmoMeeting {
            id,
            department: self.department,
            date: self.date,
            attendees: self.attendees,
            team_status: String::new(),
            items_requiring_attention: String::new(),
            tasks_coming_due: String::new(),
            meeting_notes: String::new(),
            decisions_made: String::new(),
            action_items_assigned: String::new(),
            parking_lot: String::new(),
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Patches
// =============================================================================

/// Partial update for an initiative. Absent fields are untouched. The goal
/// link is not patchable here; use `Command::LinkInitiativeToGoal`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InitiativePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
    pub department: Option<Department>,
    /// An empty string clears the team, mirroring the edit form.
    pub team: Option<String>,
    pub status: Option<InitiativeStatus>,
    pub progress: Option<u8>,
    pub owner: Option<String>,
    pub due_date: Option<chrono::DateTime<Utc>>,
    pub is_key_initiative: Option<bool>,
}

impl InitiativePatch {
    fn apply_to(&self, initiative: &mut Initiative) {
        if let Some(v) = &self.name {
            initiative.name = v.clone();
        }
        if let Some(v) = &self.description {
            initiative.description = v.clone();
        }
        if let Some(v) = &self.color {
            initiative.color = v.clone();
        }
        if let Some(v) = self.department {
            initiative.department = v;
        }
        if let Some(v) = &self.team {
            initiative.team = if v.is_empty() { None } else { Some(v.clone()) };
        }
        if let Some(v) = self.status {
            initiative.status = v;
        }
        if let Some(v) = self.progress {
            initiative.progress = v;
        }
        if let Some(v) = &self.owner {
            initiative.owner = v.clone();
        }
        if let Some(v) = self.due_date {
            initiative.due_date = v;
        }
        if let Some(v) = self.is_key_initiative {
            initiative.is_key_initiative = v;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub assignee: Option<String>,
    pub due_date: Option<chrono::DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
    pub dependencies: Option<Vec<TaskDependency>>,
    pub parent_task_id: Option<String>,
}

impl TaskPatch {
    fn apply_to(&self, task: &mut Task) {
        if let Some(v) = &self.title {
            task.title = v.clone();
        }
        if let Some(v) = &self.description {
            task.description = v.clone();
        }
        if let Some(v) = self.status {
            task.status = v;
        }
        if let Some(v) = self.priority {
            task.priority = v;
        }
        if let Some(v) = &self.assignee {
            task.assignee = v.clone();
        }
        if let Some(v) = self.due_date {
            task.due_date = v;
        }
        if let Some(v) = &self.tags {
            task.tags = v.clone();
        }
        if let Some(v) = &self.dependencies {
            task.dependencies = v.clone();
        }
        if let Some(v) = &self.parent_task_id {
            task.parent_task_id = if v.is_empty() { None } else { Some(v.clone()) };
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GoalPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub target_date: Option<chrono::DateTime<Utc>>,
    pub owner: Option<String>,
    pub status: Option<GoalStatus>,
}

impl GoalPatch {
    fn apply_to(&self, goal: &mut CompanyGoal) {
        if let Some(v) = &self.name {
            goal.name = v.clone();
        }
        if let Some(v) = &self.description {
            goal.description = v.clone();
        }
        if let Some(v) = self.target_date {
            goal.target_date = v;
        }
        if let Some(v) = &self.owner {
            goal.owner = v.clone();
        }
        if let Some(v) = self.status {
            goal.status = v;
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyResultPatch {
    pub name: Option<String>,
    pub target_value: Option<f64>,
    pub current_value: Option<f64>,
    pub unit: Option<String>,
    pub owner: Option<String>,
    pub due_date: Option<chrono::DateTime<Utc>>,
}

impl KeyResultPatch {
    fn apply_to(&self, kr: &mut KeyResult) {
        if let Some(v) = &self.name {
            kr.name = v.clone();
        }
        if let Some(v) = self.target_value {
            kr.target_value = v;
        }
        if let Some(v) = self.current_value {
            kr.current_value = v;
        }
        if let Some(v) = &self.unit {
            kr.unit = v.clone();
        }
        if let Some(v) = &self.owner {
            kr.owner = v.clone();
        }
        if let Some(v) = self.due_date {
            kr.due_date = v;
        }
    }
}

/// Partial update for a meeting record. The consuming view autosaves a
/// patch per edited field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeetingPatch {
    pub department: Option<MeetingScope>,
    pub date: Option<chrono::DateTime<Utc>>,
    pub attendees: Option<String>,
    pub team_status: Option<String>,
    pub items_requiring_attention: Option<String>,
    pub tasks_coming_due: Option<String>,
    pub meeting_notes: Option<String>,
    pub decisions_made: Option<String>,
    pub action_items_assigned: Option<String>,
    pub parking_lot: Option<String>,
}

impl MeetingPatch {
    fn apply_to(&self, meeting: &mut PmoMeeting) {
        if let Some(v) = self.department {
            meeting.department = v;
        }
        if let Some(v) = self.date {
            meeting.date = v;
        }
        if let Some(v) = &self.attendees {
            meeting.attendees = v.clone();
        }
        if let Some(v) = &self.team_status {
            meeting.team_status = v.clone();
        }
        if let Some(v) = &self.items_requiring_attention {
            meeting.items_requiring_attention = v.clone();
        }
        if let Some(v) = &self.tasks_coming_due {
            meeting.tasks_coming_due = v.clone();
        }
        if let Some(v) = &self.meeting_notes {
            meeting.meeting_notes = v.clone();
        }
        if let Some(v) = &self.decisions_made {
            meeting.decisions_made = v.clone();
        }
        if let Some(v) = &self.action_items_assigned {
            meeting.action_items_assigned = v.clone();
        }
        if let Some(v) = &self.parking_lot {
            meeting.parking_lot = v.clone();
        }
    }
}
