//! Platform-wide totals.

use leptos::prelude::*;
use synergysphere_shared::GlobalStats;

use crate::api::use_api;
use crate::cache::{QueryKey, QueryOptions};
use crate::components::stats::{StatCard, StatsSection};
use crate::hooks::use_query;

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let api = use_api();

    let overview = use_query(
        QueryKey::OverviewStats,
        {
            let api = api.clone();
            move || {
                let api = api.clone();
                async move { api.overview_stats().await }
            }
        },
        QueryOptions::default(),
    );

    view! {
        <div class="flex flex-col gap-8">
            <div>
                <h1 class="text-2xl font-bold">"Admin"</h1>
                <p class="text-base-content/70 text-sm">"Platform totals"</p>
            </div>
            <StatsSection
                title="Overview"
                state=overview
                render=|stats: GlobalStats| {
                    view! {
                        <div class="stats stats-vertical md:stats-horizontal shadow w-full">
                            <StatCard label="Users" value=stats.total_users hint="registered" />
                            <StatCard label="Projects" value=stats.total_projects hint="active" />
                            <StatCard label="Tasks" value=stats.total_tasks hint="across all projects" />
                        </div>
                    }
                }
            />
        </div>
    }
}
