//! Endpoint descriptions shared between the client and anything that needs
//! to speak the backend's REST dialect.
//!
//! Each endpoint is a small struct implementing [`ApiEndpoint`]: the struct's
//! serialized form is the request body (path parameters are `serde(skip)`ped),
//! the associated `Response` type is what the envelope's `data` field decodes
//! into.

use crate::{
    GlobalStats, Project, ProjectCreate, ProjectStats, ProjectUpdate, Task, TaskCreate,
    TaskUpdate, User, UserCreate, UserStats,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP methods used by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method carry a JSON body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// Describes one backend endpoint: its method, path and response payload.
pub trait ApiEndpoint: Serialize {
    /// Type decoded from the envelope's `data` field.
    type Response: DeserializeOwned;
    const METHOD: HttpMethod;
    /// The URL path, with any path parameters interpolated.
    fn path(&self) -> String;
}

// =========================================================
// Auth
// =========================================================

/// `POST /register`. Login is form-encoded and handled outside this trait.
impl ApiEndpoint for UserCreate {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/register".to_string()
    }
}

/// `GET /users/me` — profile of the bearer-token owner.
#[derive(Debug, Serialize, Deserialize)]
pub struct CurrentUserRequest;

impl ApiEndpoint for CurrentUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/users/me".to_string()
    }
}

// =========================================================
// Projects
// =========================================================

/// `GET /projects/` — projects visible to the caller.
#[derive(Debug, Serialize, Deserialize)]
pub struct ListProjectsRequest;

impl ApiEndpoint for ListProjectsRequest {
    type Response = Vec<Project>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/projects/".to_string()
    }
}

impl ApiEndpoint for ProjectCreate {
    type Response = Project;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/projects/".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateProjectRequest {
    #[serde(skip)]
    pub project_id: String,
    #[serde(flatten)]
    pub update: ProjectUpdate,
}

impl ApiEndpoint for UpdateProjectRequest {
    type Response = Project;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/projects/{}", self.project_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteProjectRequest {
    #[serde(skip)]
    pub project_id: String,
}

impl ApiEndpoint for DeleteProjectRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/projects/{}", self.project_id)
    }
}

// =========================================================
// Project members
// =========================================================

/// `POST /projects/:id/members` — body is `{"user_id": ...}`, response is the
/// updated project.
#[derive(Debug, Serialize, Deserialize)]
pub struct AddMemberRequest {
    #[serde(skip)]
    pub project_id: String,
    pub user_id: String,
}

impl ApiEndpoint for AddMemberRequest {
    type Response = Project;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/projects/{}/members", self.project_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RemoveMemberRequest {
    #[serde(skip)]
    pub project_id: String,
    #[serde(skip)]
    pub user_id: String,
}

impl ApiEndpoint for RemoveMemberRequest {
    type Response = Project;
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/projects/{}/members/{}", self.project_id, self.user_id)
    }
}

// =========================================================
// Tasks
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectTasksRequest {
    #[serde(skip)]
    pub project_id: String,
}

impl ApiEndpoint for ProjectTasksRequest {
    type Response = Vec<Task>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/tasks/project/{}", self.project_id)
    }
}

/// `POST /tasks/?project_id=:id` — the project id travels as a query
/// parameter, the task fields as the body.
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(skip)]
    pub project_id: String,
    #[serde(flatten)]
    pub task: TaskCreate,
}

impl ApiEndpoint for CreateTaskRequest {
    type Response = Task;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        format!("/tasks/?project_id={}", self.project_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(skip)]
    pub task_id: String,
    #[serde(flatten)]
    pub update: TaskUpdate,
}

impl ApiEndpoint for UpdateTaskRequest {
    type Response = Task;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/tasks/{}", self.task_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTaskRequest {
    #[serde(skip)]
    pub task_id: String,
}

impl ApiEndpoint for DeleteTaskRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/tasks/{}", self.task_id)
    }
}

// =========================================================
// Statistics
// =========================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct OverviewStatsRequest;

impl ApiEndpoint for OverviewStatsRequest {
    type Response = GlobalStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/stats/overview".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MyStatsRequest;

impl ApiEndpoint for MyStatsRequest {
    type Response = UserStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/stats/user/me".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectStatsRequest {
    #[serde(skip)]
    pub project_id: String,
}

impl ApiEndpoint for ProjectStatsRequest {
    type Response = ProjectStats;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/stats/project/{}", self.project_id)
    }
}
