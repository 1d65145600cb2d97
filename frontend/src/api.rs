//! API client: typed calls to the backend REST surface.
//!
//! One generic `send` drives every endpoint through the
//! [`ApiEndpoint`] descriptions in the shared crate; the bearer token is
//! attached from the session store, envelopes are unwrapped here, and a 401
//! from any call logs the session out before the error reaches the caller.
//! The transport is an injected trait so the whole client is testable off
//! the browser.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use synergysphere_shared::protocol::{ApiEndpoint, HttpMethod};
use synergysphere_shared::{
    BEARER_PREFIX, Envelope, GlobalStats, HEADER_AUTHORIZATION, Project, ProjectCreate,
    ProjectStats, ProjectUpdate, Task, TaskCreate, TaskUpdate, TokenPayload, User, UserCreate,
    UserStats, protocol,
};

use crate::error::{ApiError, ApiErrorKind, ClientResult};
use crate::session::SessionStore;
use crate::web::{HttpClient, HttpError, LocalStorage};

/// Default backend host; a persisted override wins when present.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// LocalStorage key for pointing the client at a different backend.
pub const API_URL_STORAGE_KEY: &str = "synergysphere_api_url";

const CONTENT_TYPE: &str = "Content-Type";

/// Transport seam: given a fully built request, produce a status and body.
/// The object is `Send + Sync` so the client can live in the reactive
/// context; the returned futures stay thread-local.
#[async_trait(?Send)]
pub trait HttpTransport: Send + Sync {
    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> Result<(u16, String), ApiError>;
}

/// Browser transport over `web_sys::fetch`.
pub struct FetchTransport;

#[async_trait(?Send)]
impl HttpTransport for FetchTransport {
    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> Result<(u16, String), ApiError> {
        let mut builder = HttpClient::request(method, url);
        for (key, value) in &headers {
            builder = builder.header(key, value);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| match e {
            HttpError::NetworkError(msg) => ApiError::network(msg),
            other => ApiError::decode(other.to_string()),
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ApiError::decode(e.to_string()))?;
        Ok((status, text))
    }
}

/// Error body shapes the backend emits outside the success envelope.
/// FastAPI validation errors use `detail`; envelope errors use `message`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
}

fn extract_message(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    if let Some(message) = parsed.message {
        return Some(message);
    }
    match parsed.detail? {
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    session: SessionStore,
    transport: Arc<dyn HttpTransport>,
}

impl ApiClient {
    /// Production client: fetch transport, persisted URL override honored.
    pub fn new(session: SessionStore) -> Self {
        let base_url =
            LocalStorage::get(API_URL_STORAGE_KEY).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::with_transport(base_url, session, Arc::new(FetchTransport))
    }

    pub fn with_transport(
        base_url: String,
        session: SessionStore,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            session,
            transport,
        }
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn auth_header(&self) -> Option<(String, String)> {
        self.session.token().map(|token| {
            (
                HEADER_AUTHORIZATION.to_string(),
                format!("{}{}", BEARER_PREFIX, token),
            )
        })
    }

    /// Drive one endpoint: build, execute, decode.
    async fn send<E: ApiEndpoint>(&self, req: &E) -> ClientResult<E::Response> {
        let url = self.url(&req.path());
        let mut headers = Vec::new();
        if let Some(auth) = self.auth_header() {
            headers.push(auth);
        }

        let body = if E::METHOD.has_body() {
            headers.push((CONTENT_TYPE.to_string(), "application/json".to_string()));
            Some(serde_json::to_string(req)?)
        } else {
            None
        };

        let (status, text) = self.transport.execute(E::METHOD, &url, headers, body).await?;
        self.decode_response(status, &text)
    }

    fn decode_response<T: DeserializeOwned>(&self, status: u16, body: &str) -> ClientResult<T> {
        if status == 401 {
            // Token expiry observed by any request forces one logout; the
            // router's gate effect handles the redirect.
            self.session.logout();
            let msg = extract_message(body).unwrap_or_default();
            return Err(ApiError::unauthorized(msg));
        }

        if !(200..300).contains(&status) {
            let msg = extract_message(body).unwrap_or_default();
            return Err(ApiError::from_response(status, msg));
        }

        let envelope: Envelope<T> = serde_json::from_str(body)?;
        if !envelope.is_success() {
            return Err(ApiError::new(
                ApiErrorKind::Validation,
                envelope.message.unwrap_or_default(),
            ));
        }
        match envelope.data {
            Some(data) => Ok(data),
            // Endpoints whose payload is `()` send `data: null`.
            None => serde_json::from_value(serde_json::Value::Null)
                .map_err(|_| ApiError::decode("response envelope carried no data")),
        }
    }

    // =====================================================
    // Auth
    // =====================================================

    /// `POST /login`: the backend expects an OAuth2 form body, not JSON.
    /// Does not mutate the session; the caller stores the returned token.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<TokenPayload> {
        let body = format!(
            "username={}&password={}",
            urlencoding::encode(username),
            urlencoding::encode(password)
        );
        let headers = vec![(
            CONTENT_TYPE.to_string(),
            "application/x-www-form-urlencoded".to_string(),
        )];
        let (status, text) = self
            .transport
            .execute(HttpMethod::Post, &self.url("/login"), headers, Some(body))
            .await?;
        self.decode_response(status, &text)
    }

    pub async fn register(&self, user: &UserCreate) -> ClientResult<()> {
        self.send(user).await
    }

    pub async fn me(&self) -> ClientResult<User> {
        self.send(&protocol::CurrentUserRequest).await
    }

    // =====================================================
    // Projects
    // =====================================================

    pub async fn projects(&self) -> ClientResult<Vec<Project>> {
        self.send(&protocol::ListProjectsRequest).await
    }

    pub async fn create_project(&self, create: &ProjectCreate) -> ClientResult<Project> {
        self.send(create).await
    }

    pub async fn update_project(
        &self,
        project_id: String,
        update: ProjectUpdate,
    ) -> ClientResult<Project> {
        self.send(&protocol::UpdateProjectRequest { project_id, update })
            .await
    }

    pub async fn delete_project(&self, project_id: String) -> ClientResult<()> {
        self.send(&protocol::DeleteProjectRequest { project_id })
            .await
    }

    pub async fn add_member(&self, project_id: String, user_id: String) -> ClientResult<Project> {
        self.send(&protocol::AddMemberRequest {
            project_id,
            user_id,
        })
        .await
    }

    pub async fn remove_member(
        &self,
        project_id: String,
        user_id: String,
    ) -> ClientResult<Project> {
        self.send(&protocol::RemoveMemberRequest {
            project_id,
            user_id,
        })
        .await
    }

    // =====================================================
    // Tasks
    // =====================================================

    pub async fn project_tasks(&self, project_id: String) -> ClientResult<Vec<Task>> {
        self.send(&protocol::ProjectTasksRequest { project_id })
            .await
    }

    pub async fn create_task(&self, project_id: String, task: TaskCreate) -> ClientResult<Task> {
        self.send(&protocol::CreateTaskRequest { project_id, task })
            .await
    }

    pub async fn update_task(&self, task_id: String, update: TaskUpdate) -> ClientResult<Task> {
        self.send(&protocol::UpdateTaskRequest { task_id, update })
            .await
    }

    pub async fn delete_task(&self, task_id: String) -> ClientResult<()> {
        self.send(&protocol::DeleteTaskRequest { task_id }).await
    }

    // =====================================================
    // Statistics
    // =====================================================

    pub async fn overview_stats(&self) -> ClientResult<GlobalStats> {
        self.send(&protocol::OverviewStatsRequest).await
    }

    pub async fn my_stats(&self) -> ClientResult<UserStats> {
        self.send(&protocol::MyStatsRequest).await
    }

    pub async fn project_stats(&self, project_id: String) -> ClientResult<ProjectStats> {
        self.send(&protocol::ProjectStatsRequest { project_id })
            .await
    }
}

/// Fetches the shared client from context.
pub fn use_api() -> ApiClient {
    use leptos::prelude::use_context;
    use_context::<ApiClient>().expect("ApiClient should be provided")
}

#[cfg(test)]
mod tests;
