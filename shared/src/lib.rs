use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod protocol;

// =========================================================
// Constants
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const BEARER_PREFIX: &str = "Bearer ";

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_ERROR: &str = "error";

// =========================================================
// Response envelope
// =========================================================

/// The wrapper the backend puts around every JSON response.
///
/// `status_code` is informational and not always present; `message` carries
/// the human-readable outcome and is what the UI shows on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }
}

// =========================================================
// Domain models
// =========================================================

/// Task workflow state. The wire values match the backend's display strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "To Do")]
    ToDo,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    /// Board column order.
    pub const ALL: [TaskStatus; 3] = [TaskStatus::ToDo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::ToDo => "To Do",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub user_id: String,
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "_id")]
    pub project_id: String,
    pub project_name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub created_by: String,
    #[serde(default)]
    pub members: Vec<String>,
    #[serde(default)]
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id")]
    pub task_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// User id of the assigned team member.
    pub assignee: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub status: TaskStatus,
    pub project_id: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =========================================================
// Request payloads
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub project_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial project update; absent fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCreate {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub assignee: String,
    pub due_date: DateTime<Utc>,
    #[serde(default)]
    pub status: TaskStatus,
}

/// Partial task update; used for status moves on the board as well as edits.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}

impl TaskUpdate {
    pub fn status_only(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

// =========================================================
// Auth payloads
// =========================================================

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Data payload of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPayload {
    pub access_token: String,
    pub token_type: String,
}

// =========================================================
// Statistics read models
// =========================================================

use std::collections::BTreeMap;

/// Counts of tasks keyed by their status display string.
pub type StatusBreakdown = BTreeMap<String, u64>;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total_users: u64,
    pub total_projects: u64,
    pub total_tasks: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserStats {
    pub projects_count: u64,
    pub assigned_tasks_count: u64,
    #[serde(default)]
    pub task_status_breakdown: StatusBreakdown,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectStats {
    pub member_count: u64,
    pub total_tasks_in_project: u64,
    #[serde(default)]
    pub task_status_breakdown: StatusBreakdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_uses_backend_wire_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let back: TaskStatus = serde_json::from_str("\"To Do\"").unwrap();
        assert_eq!(back, TaskStatus::ToDo);
    }

    #[test]
    fn envelope_tolerates_missing_fields() {
        let env: Envelope<GlobalStats> =
            serde_json::from_str(r#"{"status":"error","message":"boom"}"#).unwrap();
        assert!(!env.is_success());
        assert_eq!(env.message.as_deref(), Some("boom"));
        assert!(env.data.is_none());
        assert!(env.status_code.is_none());
    }

    #[test]
    fn project_maps_backend_id_field() {
        let json = r#"{
            "_id": "p1",
            "project_name": "Website Redesign",
            "created_by": "u1",
            "members": ["u2"],
            "created_at": "2025-01-01T00:00:00Z",
            "updated_at": "2025-01-02T00:00:00Z"
        }"#;
        let p: Project = serde_json::from_str(json).unwrap();
        assert_eq!(p.project_id, "p1");
        assert_eq!(p.members, vec!["u2".to_string()]);
        assert!(!p.is_deleted);
    }

    #[test]
    fn task_update_skips_unset_fields() {
        let body = serde_json::to_string(&TaskUpdate::status_only(TaskStatus::Done)).unwrap();
        assert_eq!(body, r#"{"status":"Done"}"#);
    }
}
