//! Create / edit task modal for one project's board.

use chrono::{DateTime, NaiveDate, Utc};
use leptos::prelude::*;
use synergysphere_shared::{Task, TaskCreate, TaskStatus, TaskUpdate};

use crate::api::use_api;
use crate::cache::{QueryKey, use_query_cache};
use crate::components::toast::use_toast;
use crate::hooks::run_mutation;

#[derive(Clone)]
pub enum TaskDialogState {
    Create,
    Edit(Task),
}

fn parse_status(value: &str) -> TaskStatus {
    TaskStatus::ALL
        .iter()
        .copied()
        .find(|s| s.as_str() == value)
        .unwrap_or(TaskStatus::ToDo)
}

/// `<input type="date">` value to a UTC midnight timestamp.
fn parse_due_date(value: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()?;
    Some(DateTime::from_naive_utc_and_offset(
        date.and_hms_opt(0, 0, 0)?,
        Utc,
    ))
}

#[component]
pub fn TaskDialog(
    project_id: String,
    /// User ids that can be assigned; owner plus members.
    members: Signal<Vec<String>, LocalStorage>,
    state: RwSignal<Option<TaskDialogState>>,
) -> impl IntoView {
    let api = use_api();
    let cache = use_query_cache();
    let toast = use_toast();

    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (assignee, set_assignee) = signal(String::new());
    let (due_date, set_due_date) = signal(String::new());
    let (status, set_status) = signal(TaskStatus::ToDo);
    let (saving, set_saving) = signal(false);

    Effect::new(move |_| match state.get() {
        Some(TaskDialogState::Edit(task)) => {
            set_title.set(task.title);
            set_description.set(task.description.unwrap_or_default());
            set_assignee.set(task.assignee);
            set_due_date.set(task.due_date.format("%Y-%m-%d").to_string());
            set_status.set(task.status);
        }
        Some(TaskDialogState::Create) => {
            set_title.set(String::new());
            set_description.set(String::new());
            set_assignee.set(members.get_untracked().first().cloned().unwrap_or_default());
            set_due_date.set(String::new());
            set_status.set(TaskStatus::ToDo);
        }
        None => {}
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

    let on_save = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(mode) = state.get_untracked() else {
            return;
        };
        if title.get_untracked().trim().is_empty() {
            toast.error("Task title is required");
            return;
        }
        let Some(due) = parse_due_date(&due_date.get_untracked()) else {
            toast.error("A due date is required");
            return;
        };
        let who = assignee.get_untracked();
        if who.is_empty() {
            toast.error("Pick an assignee");
            return;
        }

        set_saving.set(true);
        let api = api.clone();
        let desc = {
            let d = description.get_untracked();
            if d.trim().is_empty() { None } else { Some(d) }
        };
        let done = move |label: &'static str| {
            move |result: crate::error::ClientResult<Task>| {
                set_saving.set(false);
                match result {
                    Ok(_) => {
                        toast.success(label);
                        state.set(None);
                    }
                    Err(e) => toast.error(e.user_message()),
                }
            }
        };

        match mode {
            TaskDialogState::Create => {
                let create = TaskCreate {
                    title: title.get_untracked().trim().to_string(),
                    description: desc,
                    assignee: who,
                    due_date: due,
                    status: status.get_untracked(),
                };
                let project_id = project_id.clone();
                run_mutation(
                    &cache.get(),
                    async move { api.create_task(project_id, create).await },
                    invalidates(),
                    done("Task created"),
                );
            }
            TaskDialogState::Edit(task) => {
                let update = TaskUpdate {
                    title: Some(title.get_untracked().trim().to_string()),
                    description: desc,
                    assignee: Some(who),
                    due_date: Some(due),
                    status: Some(status.get_untracked()),
                };
                run_mutation(
                    &cache.get(),
                    async move { api.update_task(task.task_id, update).await },
                    invalidates(),
                    done("Task updated"),
                );
            }
        }
    };

    view! {
        <Show when=move || state.get().is_some()>
            <div class="modal modal-open">
                <div class="modal-box">
                    <h3 class="font-bold text-lg">
                        {move || match state.get() {
                            Some(TaskDialogState::Edit(_)) => "Edit task",
                            _ => "New task",
                        }}
                    </h3>
                    // The children closure re-renders on every open, so each
                    // render gets its own clone of the handler.
                    <form
                        class="py-4 flex flex-col gap-4"
                        on:submit={
                            let on_save = on_save.clone();
                            move |ev| on_save(ev)
                        }
                    >
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Title"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                placeholder="Draft the landing page"
                                prop:value=title
                                on:input=move |ev| set_title.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Description"</span>
                            </label>
                            <textarea
                                class="textarea textarea-bordered"
                                prop:value=description
                                on:input=move |ev| set_description.set(event_target_value(&ev))
                            ></textarea>
                        </div>
                        <div class="grid grid-cols-2 gap-4">
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Assignee"</span>
                                </label>
                                <select
                                    class="select select-bordered"
                                    on:change=move |ev| set_assignee.set(event_target_value(&ev))
                                    prop:value=assignee
                                >
                                    <For
                                        each=move || members.get()
                                        key=|id| id.clone()
                                        children=|id| view! { <option value=id.clone()>{id.clone()}</option> }
                                    />
                                </select>
                            </div>
                            <div class="form-control">
                                <label class="label">
                                    <span class="label-text">"Due date"</span>
                                </label>
                                <input
                                    type="date"
                                    class="input input-bordered"
                                    prop:value=due_date
                                    on:input=move |ev| set_due_date.set(event_target_value(&ev))
                                />
                            </div>
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Status"</span>
                            </label>
                            <select
                                class="select select-bordered"
                                on:change=move |ev| set_status.set(parse_status(&event_target_value(&ev)))
                                prop:value=move || status.get().as_str().to_string()
                            >
                                {TaskStatus::ALL
                                    .iter()
                                    .map(|s| view! { <option value=s.as_str()>{s.as_str()}</option> })
                                    .collect_view()}
                            </select>
                        </div>
                        <div class="modal-action">
                            <button
                                type="button"
                                class="btn btn-ghost"
                                on:click=move |_| state.set(None)
                            >
                                "Cancel"
                            </button>
                            <button class="btn btn-primary" disabled=move || saving.get()>
                                {move || if saving.get() { "Saving..." } else { "Save" }}
                            </button>
                        </div>
                    </form>
                </div>
                <div class="modal-backdrop" on:click=move |_| state.set(None)></div>
            </div>
        </Show>
    }
}
