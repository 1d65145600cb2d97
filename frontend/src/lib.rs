//! SynergySphere frontend.
//!
//! Context-driven architecture:
//! - `web::route` / `web::router`: navigation domain model and engine
//! - `session`: authentication state machine
//! - `api`: typed REST client
//! - `cache` / `hooks`: query and mutation cache bridging data to views
//! - `components`: UI layer

mod api;
mod cache;
mod error;
mod hooks;
mod session;

mod components {
    pub mod admin_dashboard;
    pub mod analytics;
    pub mod dashboard;
    pub mod header;
    pub mod icons;
    pub mod login;
    pub mod project_detail;
    pub mod project_dialog;
    pub mod stats;
    pub mod task_dialog;
    pub mod toast;
    pub mod user_dashboard;
}

// Native Web API wrappers, replacing the gloo-* crates to keep the WASM
// binary small.
pub(crate) mod web;

use std::rc::Rc;
use std::sync::Arc;

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::cache::{
    LocalSpawner, QueryCache, QueryFetcher, QueryKey, QueryOptions, provide_query_cache,
};
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::analytics::AnalyticsPage;
use crate::components::dashboard::DashboardPage;
use crate::components::header::Header;
use crate::components::login::LoginPage;
use crate::components::project_detail::ProjectDetailPage;
use crate::components::toast::{ToastContext, ToastHost};
use crate::components::user_dashboard::UserDashboardPage;
use crate::session::{BrowserTokenStore, SessionStore};
use crate::web::route::AppRoute;
use crate::web::router::{Router, RouterOutlet};
use synergysphere_shared::User;

/// Wraps an authenticated page in the app chrome.
fn shell(page: AnyView) -> AnyView {
    view! {
        <div class="min-h-screen bg-base-200">
            <div class="max-w-6xl mx-auto p-4 flex flex-col gap-6">
                <Header />
                <main>{page}</main>
            </div>
        </div>
    }
    .into_any()
}

fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Dashboard => shell(view! { <DashboardPage /> }.into_any()),
        AppRoute::Project(id) => {
            shell(view! { <ProjectDetailPage project_id=id /> }.into_any())
        }
        AppRoute::Analytics => shell(view! { <AnalyticsPage /> }.into_any()),
        AppRoute::Admin => shell(view! { <AdminDashboardPage /> }.into_any()),
        AppRoute::MyStats => shell(view! { <UserDashboardPage /> }.into_any()),
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"Page not found"</p>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // Session first; everything downstream reads it.
    let session = SessionStore::new(Arc::new(BrowserTokenStore));
    provide_context(session.clone());

    let api = ApiClient::new(session.clone());
    provide_context(api.clone());

    let cache = QueryCache::new(Box::new(LocalSpawner));
    provide_query_cache(cache.clone());
    provide_context(ToastContext::new());

    let is_authenticated = session.is_authenticated_signal();

    // The signed-in profile is a cached resource like any other: fetched
    // once per authenticated session, dropped via invalidation on logout.
    // A stale persisted token fails here with a 401, which logs out and
    // lands the visitor on the login page.
    Effect::new({
        let cache = cache.clone();
        let api = api.clone();
        move |_| {
            if !is_authenticated.get() {
                cache.invalidate(&QueryKey::CurrentUser);
                return;
            }
            let api = api.clone();
            let fetcher: QueryFetcher<User> = Rc::new(move || {
                let api = api.clone();
                Box::pin(async move { api.me().await })
            });
            cache.query(QueryKey::CurrentUser, fetcher, QueryOptions::default());
        }
    });

    // Mirror the cached profile into the session for the header and pages.
    Effect::new({
        let cache = cache.clone();
        let session = session.clone();
        move |_| {
            cache.track(&QueryKey::CurrentUser);
            if !is_authenticated.get() {
                return;
            }
            if let Some(user) = cache.snapshot::<User>(&QueryKey::CurrentUser).value {
                session.set_user((*user).clone());
            }
        }
    });

    view! {
        <Router is_authenticated=is_authenticated>
            <ToastHost />
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
