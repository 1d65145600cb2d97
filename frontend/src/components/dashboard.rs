//! Project list; the landing page after sign-in.

use leptos::prelude::*;
use synergysphere_shared::Project;

use crate::api::use_api;
use crate::cache::{QueryKey, QueryOptions, use_query_cache};
use crate::components::icons::{FolderKanban, Pencil, Plus, RefreshCw, Trash2, Users};
use crate::components::project_dialog::{ProjectDialog, ProjectDialogState};
use crate::components::toast::use_toast;
use crate::hooks::{run_mutation, use_query};
use crate::web::router::use_router;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let api = use_api();
    let cache = use_query_cache();
    let toast = use_toast();

    let projects = use_query(
        QueryKey::Projects,
        {
            let api = api.clone();
            move || {
                let api = api.clone();
                async move { api.projects().await }
            }
        },
        QueryOptions::default(),
    );

    let dialog = RwSignal::new(Option::<ProjectDialogState>::None);

    let on_delete = {
        let api = api.clone();
        move |project: Project| {
            let api = api.clone();
            run_mutation(
                &cache.get(),
                async move { api.delete_project(project.project_id).await },
                vec![QueryKey::Projects],
                move |result| match result {
                    Ok(()) => toast.success("Project deleted"),
                    Err(e) => toast.error(e.user_message()),
                },
            );
        }
    };

    let on_retry = move |_| cache.get().invalidate(&QueryKey::Projects);

    view! {
        <div class="flex flex-col gap-6">
            <div class="flex items-center justify-between">
                <div>
                    <h1 class="text-2xl font-bold">"Projects"</h1>
                    <p class="text-base-content/70 text-sm">
                        "Everything you own or collaborate on"
                    </p>
                </div>
                <button
                    class="btn btn-primary gap-2"
                    on:click=move |_| dialog.set(Some(ProjectDialogState::Create))
                >
                    <Plus class="h-4 w-4" />
                    "New project"
                </button>
            </div>

            {move || {
                let state = projects.get();
                if let Some(list) = state.value.clone() {
                    // A stale value stays on screen through refreshes and
                    // even through a failed refresh.
                    if list.is_empty() {
                        view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body items-center text-center py-16">
                                    <FolderKanban class="h-12 w-12 text-base-content/30" />
                                    <p class="text-base-content/70">
                                        "No projects yet. Create your first one to get started."
                                    </p>
                                </div>
                            </div>
                        }
                        .into_any()
                    } else {
                        let on_delete = on_delete.clone();
                        let items: Vec<Project> = list.iter().cloned().collect();
                        let each_projects = move || items.clone();
                        view! {
                            <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                                <For
                                    each=each_projects
                                    key=|p| (p.project_id.clone(), p.updated_at)
                                    children=move |project| {
                                        let on_delete = on_delete.clone();
                                        view! {
                                            <ProjectCard
                                                project=project
                                                on_edit=move |p| dialog.set(Some(ProjectDialogState::Edit(p)))
                                                on_delete=on_delete
                                            />
                                        }
                                    }
                                />
                            </div>
                        }
                        .into_any()
                    }
                } else if state.is_error() {
                    let message = state
                        .error
                        .map(|e| e.user_message())
                        .unwrap_or_default();
                    let on_retry = on_retry.clone();
                    view! {
                        <div role="alert" class="alert alert-error">
                            <span>{message}</span>
                            <button class="btn btn-sm gap-2" on:click=on_retry>
                                <RefreshCw class="h-4 w-4" />
                                "Retry"
                            </button>
                        </div>
                    }
                    .into_any()
                } else {
                    view! {
                        <div class="grid grid-cols-1 md:grid-cols-2 lg:grid-cols-3 gap-4">
                            <div class="skeleton h-36"></div>
                            <div class="skeleton h-36"></div>
                            <div class="skeleton h-36"></div>
                        </div>
                    }
                    .into_any()
                }
            }}

            <ProjectDialog state=dialog />
        </div>
    }
}

#[component]
fn ProjectCard(
    project: Project,
    on_edit: impl Fn(Project) + 'static,
    on_delete: impl Fn(Project) + 'static,
) -> impl IntoView {
    let router = use_router();
    let id = project.project_id.clone();
    let member_count = project.members.len() + 1;
    let for_edit = project.clone();
    let for_delete = project.clone();

    view! {
        <div class="card bg-base-100 shadow-xl hover:shadow-2xl transition-shadow">
            <div class="card-body">
                <h2
                    class="card-title cursor-pointer hover:text-primary"
                    on:click=move |_| router.navigate(&format!("/projects/{}", id))
                >
                    {project.project_name.clone()}
                </h2>
                <p class="text-base-content/70 text-sm line-clamp-2">
                    {project.description.clone().unwrap_or_default()}
                </p>
                <div class="card-actions justify-between items-center mt-2">
                    <span class="badge badge-ghost gap-1">
                        <Users class="h-3 w-3" />
                        {member_count}
                        " members"
                    </span>
                    <div class="flex gap-1">
                        <button
                            class="btn btn-ghost btn-sm btn-square"
                            on:click=move |_| on_edit(for_edit.clone())
                        >
                            <Pencil class="h-4 w-4" />
                        </button>
                        <button
                            class="btn btn-ghost btn-sm btn-square text-error"
                            on:click=move |_| on_delete(for_delete.clone())
                        >
                            <Trash2 class="h-4 w-4" />
                        </button>
                    </div>
                </div>
            </div>
        </div>
    }
}
