//! The signed-in user's personal statistics.

use leptos::prelude::*;
use synergysphere_shared::UserStats;

use crate::api::use_api;
use crate::cache::{QueryKey, QueryOptions};
use crate::components::stats::{BreakdownBars, StatCard, StatsSection};
use crate::hooks::use_query;
use crate::session::use_session;

#[component]
pub fn UserDashboardPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();
    let user = session.user_signal();

    let mine = use_query(
        QueryKey::UserStats,
        {
            let api = api.clone();
            move || {
                let api = api.clone();
                async move { api.my_stats().await }
            }
        },
        QueryOptions::default(),
    );

    view! {
        <div class="flex flex-col gap-8">
            <div>
                <h1 class="text-2xl font-bold">"My stats"</h1>
                <p class="text-base-content/70 text-sm">
                    {move || {
                        user.get()
                            .map(|u| format!("Signed in as {}", u.username))
                            .unwrap_or_default()
                    }}
                </p>
            </div>
            <StatsSection
                title="Workload"
                state=mine
                render=|stats: UserStats| {
                    view! {
                        <div class="flex flex-col gap-4">
                            <div class="stats stats-vertical md:stats-horizontal shadow w-full">
                                <StatCard label="Projects" value=stats.projects_count />
                                <StatCard
                                    label="Assigned tasks"
                                    value=stats.assigned_tasks_count
                                />
                            </div>
                            <div class="card bg-base-100 shadow">
                                <div class="card-body">
                                    <h3 class="card-title text-base">"Tasks by status"</h3>
                                    <BreakdownBars breakdown=stats.task_status_breakdown />
                                </div>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}
