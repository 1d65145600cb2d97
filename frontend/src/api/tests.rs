use super::*;
use crate::session::TokenStore;
use std::sync::Mutex;

// =========================================================
// Shared mock components
// =========================================================

struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    fn new(token: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            token: Mutex::new(token.map(String::from)),
        })
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    fn save(&self, token: &str) -> bool {
        *self.token.lock().unwrap() = Some(token.to_string());
        true
    }

    fn clear(&self) -> bool {
        *self.token.lock().unwrap() = None;
        true
    }
}

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: HttpMethod,
    url: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

/// Scripted transport: pops one canned response per request and logs what
/// the client actually sent.
struct ScriptedTransport {
    responses: Mutex<Vec<Result<(u16, String), ApiError>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    fn new(responses: Vec<Result<(u16, String), ApiError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn request(&self, index: usize) -> RecordedRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait(?Send)]
impl HttpTransport for ScriptedTransport {
    async fn execute(
        &self,
        method: HttpMethod,
        url: &str,
        headers: Vec<(String, String)>,
        body: Option<String>,
    ) -> Result<(u16, String), ApiError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        });
        self.responses.lock().unwrap().remove(0)
    }
}

fn setup(
    token: Option<&str>,
    responses: Vec<Result<(u16, String), ApiError>>,
) -> (ApiClient, SessionStore, Arc<ScriptedTransport>) {
    let session = SessionStore::new(MemoryTokenStore::new(token));
    let transport = ScriptedTransport::new(responses);
    let client = ApiClient::with_transport(
        "http://api.test/".to_string(),
        session.clone(),
        transport.clone(),
    );
    (client, session, transport)
}

fn success_body(data: &str) -> String {
    format!(r#"{{"status":"success","message":"ok","data":{}}}"#, data)
}

const PROJECT_JSON: &str = r#"{
    "_id": "p1",
    "project_name": "Website Redesign",
    "created_by": "u1",
    "members": [],
    "created_at": "2025-01-01T00:00:00Z",
    "updated_at": "2025-01-01T00:00:00Z"
}"#;

// =========================================================
// Tests
// =========================================================

#[tokio::test]
async fn attaches_bearer_token_to_authenticated_calls() {
    let (client, _, transport) = setup(
        Some("tok-1"),
        vec![Ok((200, success_body(&format!("[{}]", PROJECT_JSON))))],
    );

    let projects = client.projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].project_id, "p1");

    let req = transport.request(0);
    assert_eq!(req.method, HttpMethod::Get);
    assert_eq!(req.url, "http://api.test/projects/");
    assert!(
        req.headers
            .iter()
            .any(|(k, v)| k == "Authorization" && v == "Bearer tok-1")
    );
    assert!(req.body.is_none());
}

#[tokio::test]
async fn login_sends_form_body_without_auth_header() {
    let (client, _, transport) = setup(
        None,
        vec![Ok((
            200,
            success_body(r#"{"access_token":"tok-9","token_type":"bearer"}"#),
        ))],
    );

    let payload = client.login("alice", "p w&d").await.unwrap();
    assert_eq!(payload.access_token, "tok-9");

    let req = transport.request(0);
    assert_eq!(req.url, "http://api.test/login");
    assert_eq!(req.body.as_deref(), Some("username=alice&password=p%20w%26d"));
    assert!(req.headers.iter().all(|(k, _)| k != "Authorization"));
    assert!(
        req.headers
            .iter()
            .any(|(_, v)| v == "application/x-www-form-urlencoded")
    );
}

#[tokio::test]
async fn a_401_logs_the_session_out_once() {
    let (client, session, _) = setup(
        Some("stale"),
        vec![
            Ok((401, r#"{"detail":"Could not validate credentials"}"#.into())),
            Ok((401, r#"{"detail":"Could not validate credentials"}"#.into())),
        ],
    );
    assert!(session.is_authenticated());

    let first = client.me().await.unwrap_err();
    assert!(first.is_auth());
    assert!(!session.is_authenticated());

    // A second in-flight request hitting 401 must not raise anything beyond
    // another auth error; the session transition already happened.
    let second = client.me().await.unwrap_err();
    assert!(second.is_auth());
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn validation_errors_surface_the_server_message() {
    let (client, _, _) = setup(
        Some("tok"),
        vec![Ok((400, r#"{"detail":"Project name already in use"}"#.into()))],
    );

    let err = client
        .create_project(&ProjectCreate {
            project_name: "Website Redesign".into(),
            description: None,
        })
        .await
        .unwrap_err();

    assert_eq!(err.kind, ApiErrorKind::Validation);
    assert_eq!(err.user_message(), "Project name already in use");
    assert!(!err.retryable());
}

#[tokio::test]
async fn missing_entities_map_to_not_found() {
    let (client, _, _) = setup(
        Some("tok"),
        vec![Ok((404, r#"{"detail":"Task not found or already deleted."}"#.into()))],
    );

    let err = client.delete_task("t404".into()).await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::NotFound);
}

#[tokio::test]
async fn server_failures_are_retryable() {
    let (client, _, _) = setup(Some("tok"), vec![Ok((500, String::new()))]);

    let err = client.overview_stats().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Server);
    assert!(err.retryable());
}

#[tokio::test]
async fn error_envelopes_inside_2xx_are_rejected() {
    let (client, _, _) = setup(
        Some("tok"),
        vec![Ok((
            200,
            r#"{"status":"error","message":"Only the project creator can add members."}"#.into(),
        ))],
    );

    let err = client
        .add_member("p1".into(), "u2".into())
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Validation);
    assert_eq!(
        err.user_message(),
        "Only the project creator can add members."
    );
}

#[tokio::test]
async fn unit_responses_accept_null_data() {
    let (client, _, transport) = setup(
        Some("tok"),
        vec![Ok((
            200,
            r#"{"status":"success","message":"Task deleted successfully.","data":null}"#.into(),
        ))],
    );

    client.delete_task("t1".into()).await.unwrap();
    let req = transport.request(0);
    assert_eq!(req.method, HttpMethod::Delete);
    assert_eq!(req.url, "http://api.test/tasks/t1");
    assert!(req.body.is_none());
}

#[tokio::test]
async fn task_updates_send_partial_json_bodies() {
    let task_json = r#"{
        "_id": "t1",
        "title": "Ship it",
        "assignee": "u1",
        "due_date": "2025-05-01T00:00:00Z",
        "status": "Done",
        "project_id": "p1",
        "created_by": "u1",
        "created_at": "2025-01-01T00:00:00Z",
        "updated_at": "2025-01-01T00:00:00Z"
    }"#;
    let (client, _, transport) = setup(Some("tok"), vec![Ok((200, success_body(task_json)))]);

    let task = client
        .update_task(
            "t1".into(),
            synergysphere_shared::TaskUpdate::status_only(synergysphere_shared::TaskStatus::Done),
        )
        .await
        .unwrap();
    assert_eq!(task.status, synergysphere_shared::TaskStatus::Done);

    let req = transport.request(0);
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.body.as_deref(), Some(r#"{"status":"Done"}"#));
}

#[tokio::test]
async fn network_failures_pass_through_untouched() {
    let (client, session, _) = setup(
        Some("tok"),
        vec![Err(ApiError::network("connection refused"))],
    );

    let err = client.projects().await.unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Network);
    // Network trouble is not an auth failure; the session survives.
    assert!(session.is_authenticated());
}
