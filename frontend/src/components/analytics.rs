//! Analytics page: platform overview next to the signed-in user's numbers.
//!
//! The two queries load independently; one failing or lagging never blocks
//! the other's section.

use leptos::prelude::*;

use crate::api::use_api;
use crate::cache::{QueryKey, QueryOptions};
use crate::components::stats::{BreakdownBars, StatCard, StatsSection};
use crate::hooks::use_query;

#[component]
pub fn AnalyticsPage() -> impl IntoView {
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
                <h1 class="text-2xl font-bold">"Analytics"</h1>
                <p class="text-base-content/70 text-sm">
                    "Platform activity and your own workload"
                </p>
            </div>

            <StatsSection
                title="Platform overview"
                state=overview
                render=|stats: synergysphere_shared::GlobalStats| {
                    view! {
                        <div class="stats stats-vertical md:stats-horizontal shadow w-full">
                            <StatCard label="Users" value=stats.total_users />
                            <StatCard label="Projects" value=stats.total_projects />
                            <StatCard label="Tasks" value=stats.total_tasks />
                        </div>
                    }
                }
            />

            <StatsSection
                title="Your workload"
                state=mine
                render=|stats: synergysphere_shared::UserStats| {
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
                                    <h3 class="card-title text-base">"By status"</h3>
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
