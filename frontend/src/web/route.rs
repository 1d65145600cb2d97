//! Route definitions — the domain model of navigation.
//!
//! Pure logic, no DOM or `web_sys` dependency: which paths exist, which side
//! of the session gate each one lives on, and where mismatches redirect.

use std::fmt::Display;

/// All routes the application knows about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// Sign-in / sign-up page (default route).
    #[default]
    Login,
    /// Project overview (requires auth).
    Dashboard,
    /// Task board and members of one project (requires auth).
    Project(String),
    /// Combined statistics view (requires auth).
    Analytics,
    /// Application-wide totals (requires auth).
    Admin,
    /// Per-user statistics (requires auth).
    MyStats,
    /// Unknown path.
    NotFound,
}

impl AppRoute {
    /// Parse a URL path into a route.
    pub fn from_path(path: &str) -> Self {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" | "/login" => Self::Login,
            "/dashboard" => Self::Dashboard,
            "/analytics" => Self::Analytics,
            "/admin" => Self::Admin,
            "/me" => Self::MyStats,
            _ => match trimmed.strip_prefix("/projects/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Self::Project(id.to_string()),
                _ => Self::NotFound,
            },
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/".to_string(),
            Self::Dashboard => "/dashboard".to_string(),
            Self::Project(id) => format!("/projects/{}", id),
            Self::Analytics => "/analytics".to_string(),
            Self::Admin => "/admin".to_string(),
            Self::MyStats => "/me".to_string(),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// Gate predicate: everything except the login page sits behind the
    /// session gate. An anonymous visitor on an unknown path also lands on
    /// login rather than a bare not-found screen.
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// Whether an authenticated user should be moved off this route.
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login)
    }

    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

/// Gate decision: given a requested route and the session state, returns the
/// route to redirect to, or `None` when the request may proceed.
pub fn gate_redirect(target: &AppRoute, is_authenticated: bool) -> Option<AppRoute> {
    if target.requires_auth() && !is_authenticated {
        return Some(AppRoute::auth_failure_redirect());
    }
    if target.should_redirect_when_authenticated() && is_authenticated {
        return Some(AppRoute::auth_success_redirect());
    }
    None
}
