//! Small widgets shared by the statistics pages.

use leptos::prelude::*;
use synergysphere_shared::{StatusBreakdown, TaskStatus};

#[component]
pub fn StatCard(
    label: &'static str,
    value: u64,
    #[prop(optional, into)] hint: String,
) -> impl IntoView {
    view! {
        <div class="stat bg-base-100 rounded-box shadow">
            <div class="stat-title">{label}</div>
            <div class="stat-value text-primary">{value}</div>
            <Show when={
                let hint = hint.clone();
                move || !hint.is_empty()
            }>
                <div class="stat-desc">{hint.clone()}</div>
            </Show>
        </div>
    }
}

/// Horizontal bars for a per-status task breakdown, in board column order.
#[component]
pub fn BreakdownBars(breakdown: StatusBreakdown) -> impl IntoView {
    let total: u64 = breakdown.values().sum();

    view! {
        <div class="flex flex-col gap-2">
            {TaskStatus::ALL
                .iter()
                .map(|status| {
                    let count = breakdown.get(status.as_str()).copied().unwrap_or(0);
                    let pct = if total == 0 { 0 } else { count * 100 / total };
                    view! {
                        <div class="flex items-center gap-3">
                            <span class="w-24 text-sm text-base-content/70">
                                {status.as_str()}
                            </span>
                            <progress
                                class="progress progress-primary flex-1"
                                value=pct.to_string()
                                max="100"
                            ></progress>
                            <span class="w-8 text-right text-sm font-medium">{count}</span>
                        </div>
                    }
                })
                .collect_view()}
        </div>
    }
}

/// Uniform loading / error / ready wrapper for one stats query.
#[component]
pub fn StatsSection<T, V, IV>(
    title: &'static str,
    state: Signal<crate::cache::ResourceState<T>, LocalStorage>,
    render: V,
) -> impl IntoView
where
    T: Clone + 'static,
    V: Fn(T) -> IV + Send + 'static,
    IV: IntoView + 'static,
{
    view! {
        <section class="flex flex-col gap-3">
            <h2 class="text-lg font-semibold">{title}</h2>
            {move || {
                let s = state.get();
                if let Some(value) = s.value {
                    render((*value).clone()).into_any()
                } else if s.is_error() {
                    let message = s.error.map(|e| e.user_message()).unwrap_or_default();
                    view! {
                        <div role="alert" class="alert alert-error">
                            <span>{message}</span>
                        </div>
                    }
                    .into_any()
                } else {
                    view! { <div class="skeleton h-28"></div> }.into_any()
                }
            }}
        </section>
    }
}
