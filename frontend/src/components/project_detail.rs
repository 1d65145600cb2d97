//! Single project view: members panel, per-project stats and the task board.

use leptos::prelude::*;
use synergysphere_shared::{Project, Task, TaskStatus, TaskUpdate};

use crate::api::{ApiClient, use_api};
use crate::cache::{QueryKey, QueryOptions, ResourceState, use_query_cache};
use crate::components::icons::{ArrowLeft, MoveRight, Pencil, Plus, Trash2, Users};
use crate::components::task_dialog::{TaskDialog, TaskDialogState};
use crate::components::toast::use_toast;
use crate::hooks::{run_mutation, use_query};
use crate::web::router::use_router;

fn next_status(status: TaskStatus) -> Option<TaskStatus> {
    match status {
        TaskStatus::ToDo => Some(TaskStatus::InProgress),
        TaskStatus::InProgress => Some(TaskStatus::Done),
        TaskStatus::Done => None,
    }
}

/// What the board should show for the current tasks entry. An errored
/// refresh with a stale list still shows the board.
#[derive(Debug, Clone, PartialEq)]
enum BoardState {
    Loading,
    Failed(String),
    Empty,
    Ready,
}

fn board_state(tasks: &ResourceState<Vec<Task>>) -> BoardState {
    match &tasks.value {
        Some(list) if list.is_empty() => BoardState::Empty,
        Some(_) => BoardState::Ready,
        None if tasks.is_error() => BoardState::Failed(
            tasks
                .error
                .as_ref()
                .map(|e| e.user_message())
                .unwrap_or_default(),
        ),
        None => BoardState::Loading,
    }
}

#[component]
pub fn ProjectDetailPage(project_id: String) -> impl IntoView {
    let api = use_api();
    let router = use_router();

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

    let tasks = use_query(
        QueryKey::ProjectTasks(project_id.clone()),
        {
            let api = api.clone();
            let id = project_id.clone();
            move || {
                let api = api.clone();
                let id = id.clone();
                async move { api.project_tasks(id).await }
            }
        },
        QueryOptions::default(),
    );

    let stats = use_query(
        QueryKey::ProjectStats(project_id.clone()),
        {
            let api = api.clone();
            let id = project_id.clone();
            move || {
                let api = api.clone();
                let id = id.clone();
                async move { api.project_stats(id).await }
            }
        },
        QueryOptions::default(),
    );

    let project = {
        let id = project_id.clone();
        Signal::derive_local(move || -> Option<Project> {
            projects
                .get()
                .value
                .and_then(|list| list.iter().find(|p| p.project_id == id).cloned())
        })
    };

    // Owner first, then members, deduped.
    let assignable = Signal::derive_local(move || -> Vec<String> {
        let Some(p) = project.get() else {
            return Vec::new();
        };
        let mut ids = vec![p.created_by.clone()];
        for m in &p.members {
            if !ids.contains(m) {
                ids.push(m.clone());
            }
        }
        ids
    });

    let task_dialog = RwSignal::new(Option::<TaskDialogState>::None);

    view! {
        <div class="flex flex-col gap-6">
            <button
                class="btn btn-ghost btn-sm self-start gap-2"
                on:click=move |_| router.navigate("/dashboard")
            >
                <ArrowLeft class="h-4 w-4" />
                "All projects"
            </button>

            {
                move || {
                    let loaded = projects.get();
                    match project.get() {
                        Some(p) => {
                            let stats_view = move || {
                                stats.get().value.map(|s| {
                                    view! {
                                        <div class="flex gap-2">
                                            <span class="badge badge-ghost gap-1">
                                                <Users class="h-3 w-3" />
                                                {s.member_count}
                                                " members"
                                            </span>
                                            <span class="badge badge-ghost">
                                                {s.total_tasks_in_project}
                                                " tasks"
                                            </span>
                                        </div>
                                    }
                                })
                            };
                            view! {
                                <div class="flex flex-col gap-6">
                                    <div class="flex items-start justify-between">
                                        <div>
                                            <h1 class="text-2xl font-bold">{p.project_name.clone()}</h1>
                                            <p class="text-base-content/70 text-sm">
                                                {p.description.clone().unwrap_or_default()}
                                            </p>
                                        </div>
                                        {stats_view}
                                    </div>
                                    <MembersPanel project=p.clone() />
                                    <div class="flex items-center justify-between">
                                        <h2 class="text-lg font-semibold">"Board"</h2>
                                        <button
                                            class="btn btn-primary btn-sm gap-2"
                                            on:click=move |_| task_dialog.set(Some(TaskDialogState::Create))
                                        >
                                            <Plus class="h-4 w-4" />
                                            "New task"
                                        </button>
                                    </div>
                                    <TaskBoard project_id=p.project_id.clone() tasks=tasks dialog=task_dialog />
                                </div>
                            }
                            .into_any()
                        }
                        None if loaded.value.is_some() => view! {
                            <div class="card bg-base-100 shadow-xl">
                                <div class="card-body items-center text-center py-16">
                                    <p class="text-lg font-semibold">"Project not found"</p>
                                    <p class="text-base-content/70 text-sm">
                                        "It may have been deleted, or the link is stale."
                                    </p>
                                </div>
                            </div>
                        }
                        .into_any(),
                        None if loaded.is_error() => view! {
                            <div role="alert" class="alert alert-error">
                                <span>
                                    {loaded.error.map(|e| e.user_message()).unwrap_or_default()}
                                </span>
                            </div>
                        }
                        .into_any(),
                        None => view! { <div class="skeleton h-64"></div> }.into_any(),
                    }
                }
            }

            <TaskDialog project_id=project_id.clone() members=assignable state=task_dialog />
        </div>
    }
}

/// Owner and member list, with add / remove controls.
#[component]
fn MembersPanel(project: Project) -> impl IntoView {
    let api = use_api();
    let cache = use_query_cache();
    let toast = use_toast();

    let (new_member, set_new_member) = signal(String::new());
    let project_id = project.project_id.clone();
    let invalidates = {
        let id = project_id.clone();
        move || vec![QueryKey::Projects, QueryKey::ProjectStats(id.clone())]
    };

    let on_add = {
        let api = api.clone();
        let project_id = project_id.clone();
        let invalidates = invalidates.clone();
        move |_| {
            let user_id = new_member.get_untracked().trim().to_string();
            if user_id.is_empty() {
                return;
            }
            let api = api.clone();
            let project_id = project_id.clone();
            run_mutation(
                &cache.get(),
                async move { api.add_member(project_id, user_id).await },
                invalidates(),
                move |result| match result {
                    Ok(_) => {
                        set_new_member.set(String::new());
                        toast.success("Member added");
                    }
                    Err(e) => toast.error(e.user_message()),
                },
            );
        }
    };

    let on_remove = {
        let api = api.clone();
        let project_id = project_id.clone();
        move |user_id: String| {
            let api = api.clone();
            let project_id = project_id.clone();
            run_mutation(
                &cache.get(),
                async move { api.remove_member(project_id, user_id).await },
                invalidates(),
                move |result| match result {
                    Ok(_) => toast.success("Member removed"),
                    Err(e) => toast.error(e.user_message()),
                },
            );
        }
    };

    view! {
        <div class="card bg-base-100 shadow-xl">
            <div class="card-body">
                <h2 class="card-title text-base gap-2">
                    <Users class="h-4 w-4" />
                    "Members"
                </h2>
                <div class="flex flex-wrap items-center gap-2">
                    <span class="badge badge-primary">{project.created_by.clone()} " (owner)"</span>
                    {project
                        .members
                        .iter()
                        .map(|member| {
                            let on_remove = on_remove.clone();
                            let id = member.clone();
                            view! {
                                <span class="badge badge-ghost gap-1">
                                    {member.clone()}
                                    <button
                                        class="text-error"
                                        on:click=move |_| on_remove(id.clone())
                                    >
                                        "✕"
                                    </button>
                                </span>
                            }
                        })
                        .collect_view()}
                </div>
                <div class="join mt-2 max-w-xs">
                    <input
                        type="text"
                        class="input input-bordered input-sm join-item"
                        placeholder="User id"
                        prop:value=new_member
                        on:input=move |ev| set_new_member.set(event_target_value(&ev))
                    />
                    <button class="btn btn-sm btn-primary join-item" on:click=on_add>
                        "Add"
                    </button>
                </div>
            </div>
        </div>
    }
}

#[component]
fn TaskBoard(
    project_id: String,
    tasks: Signal<ResourceState<Vec<Task>>, LocalStorage>,
    dialog: RwSignal<Option<TaskDialogState>>,
) -> impl IntoView {
    let api = use_api();

    view! {
        {move || match board_state(&tasks.get()) {
            BoardState::Loading => view! {
                <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                    <div class="skeleton h-48"></div>
                    <div class="skeleton h-48"></div>
                    <div class="skeleton h-48"></div>
                </div>
            }
            .into_any(),
            BoardState::Failed(message) => view! {
                <div role="alert" class="alert alert-error">
                    <span>{message}</span>
                </div>
            }
            .into_any(),
            BoardState::Empty => view! {
                <div class="bg-base-200 rounded-box py-12 text-center">
                    <p class="font-semibold">"No tasks yet"</p>
                    <p class="text-base-content/70 text-sm">
                        "Create the first task to fill the board."
                    </p>
                </div>
            }
            .into_any(),
            BoardState::Ready => {
                let api = api.clone();
                let project_id = project_id.clone();
                view! {
                    <div class="grid grid-cols-1 md:grid-cols-3 gap-4">
                        {TaskStatus::ALL
                            .iter()
                            .map(|&status| {
                                let api = api.clone();
                                let project_id = project_id.clone();
                                view! {
                                    <BoardColumn
                                        status=status
                                        project_id=project_id
                                        tasks=tasks
                                        dialog=dialog
                                        api=api
                                    />
                                }
                            })
                            .collect_view()}
                    </div>
                }
                .into_any()
            }
        }}
    }
}

#[component]
fn BoardColumn(
    status: TaskStatus,
    project_id: String,
    tasks: Signal<ResourceState<Vec<Task>>, LocalStorage>,
    dialog: RwSignal<Option<TaskDialogState>>,
    api: ApiClient,
) -> impl IntoView {
    let cache = use_query_cache();
    let toast = use_toast();

    let column_tasks = Signal::derive_local(move || -> Vec<Task> {
        tasks
            .get()
            .value
            .map(|list| {
                list.iter()
                    .filter(|t| t.status == status)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    });

    let invalidates = {
        let id = project_id.clone();
        move || {
            vec![
                QueryKey::ProjectTasks(id.clone()),
                QueryKey::ProjectStats(id.clone()),
            ]
        }
    };

    let on_move = {
        let api = api.clone();
        let invalidates = invalidates.clone();
        move |task: Task| {
            let Some(target) = next_status(task.status) else {
                return;
            };
            let api = api.clone();
            run_mutation(
                &cache.get(),
                async move {
                    api.update_task(task.task_id, TaskUpdate::status_only(target))
                        .await
                },
                invalidates(),
                move |result| {
                    if let Err(e) = result {
                        toast.error(e.user_message());
                    }
                },
            );
        }
    };

    let on_delete = {
        let api = api.clone();
        move |task: Task| {
            let api = api.clone();
            run_mutation(
                &cache.get(),
                async move { api.delete_task(task.task_id).await },
                invalidates(),
                move |result| match result {
                    Ok(()) => toast.success("Task deleted"),
                    Err(e) => toast.error(e.user_message()),
                },
            );
        }
    };

    view! {
        <div class="bg-base-200 rounded-box p-3 flex flex-col gap-3 min-h-48">
            <div class="flex items-center justify-between px-1">
                <span class="font-semibold text-sm">{status.as_str()}</span>
                <span class="badge badge-sm">{move || column_tasks.get().len()}</span>
            </div>
            <For
                each=move || column_tasks.get()
                key=|t| (t.task_id.clone(), t.updated_at)
                children=move |task| {
                    let on_move = on_move.clone();
                    let on_delete = on_delete.clone();
                    let for_move = task.clone();
                    let for_edit = task.clone();
                    let for_delete = task.clone();
                    view! {
                        <div class="card bg-base-100 shadow">
                            <div class="card-body p-4 gap-2">
                                <span class="font-medium text-sm">{task.title.clone()}</span>
                                <span class="text-xs text-base-content/60">
                                    {task.assignee.clone()}
                                    " · due "
                                    {task.due_date.format("%Y-%m-%d").to_string()}
                                </span>
                                <div class="flex justify-end gap-1">
                                    <button
                                        class="btn btn-ghost btn-xs btn-square"
                                        on:click=move |_| dialog.set(Some(TaskDialogState::Edit(for_edit.clone())))
                                    >
                                        <Pencil class="h-3 w-3" />
                                    </button>
                                    <Show when=move || next_status(status).is_some()>
                                        {
                                            let on_move = on_move.clone();
                                            let task = for_move.clone();
                                            view! {
                                                <button
                                                    class="btn btn-ghost btn-xs btn-square"
                                                    on:click=move |_| on_move(task.clone())
                                                >
                                                    <MoveRight class="h-3 w-3" />
                                                </button>
                                            }
                                        }
                                    </Show>
                                    <button
                                        class="btn btn-ghost btn-xs btn-square text-error"
                                        on:click=move |_| on_delete(for_delete.clone())
                                    >
                                        <Trash2 class="h-3 w-3" />
                                    </button>
                                </div>
                            </div>
                        </div>
                    }
                }
            />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::QueryStatus;
    use crate::error::ApiError;
    use std::rc::Rc;

    fn state_of(
        status: QueryStatus,
        value: Option<Vec<Task>>,
        error: Option<ApiError>,
    ) -> ResourceState<Vec<Task>> {
        ResourceState {
            status,
            value: value.map(Rc::new),
            error,
            fetched_at: None,
        }
    }

    #[test]
    fn board_shows_skeletons_while_the_first_fetch_runs() {
        let state = state_of(QueryStatus::Loading, None, None);
        assert_eq!(board_state(&state), BoardState::Loading);
    }

    #[test]
    fn board_surfaces_a_failed_first_fetch() {
        let state = state_of(
            QueryStatus::Error,
            None,
            Some(ApiError::from_response(500, "backend down")),
        );
        assert_eq!(board_state(&state), BoardState::Failed("backend down".into()));
    }

    #[test]
    fn board_distinguishes_an_empty_project_from_loading() {
        let state = state_of(QueryStatus::Success, Some(Vec::new()), None);
        assert_eq!(board_state(&state), BoardState::Empty);
    }

    #[test]
    fn board_keeps_showing_stale_tasks_through_a_failed_refresh() {
        let task: Task = serde_json::from_str(
            r#"{
                "_id": "t1",
                "title": "Ship it",
                "assignee": "u1",
                "due_date": "2025-05-01T00:00:00Z",
                "status": "To Do",
                "project_id": "p1",
                "created_by": "u1",
                "created_at": "2025-01-01T00:00:00Z",
                "updated_at": "2025-01-01T00:00:00Z"
            }"#,
        )
        .unwrap();
        let state = state_of(
            QueryStatus::Error,
            Some(vec![task]),
            Some(ApiError::from_response(500, "backend down")),
        );
        assert_eq!(board_state(&state), BoardState::Ready);
    }

    #[test]
    fn status_progression_stops_at_done() {
        assert_eq!(next_status(TaskStatus::ToDo), Some(TaskStatus::InProgress));
        assert_eq!(next_status(TaskStatus::InProgress), Some(TaskStatus::Done));
        assert_eq!(next_status(TaskStatus::Done), None);
    }
}
