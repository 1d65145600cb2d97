//! Create / edit project modal.

use leptos::prelude::*;
use synergysphere_shared::{Project, ProjectCreate, ProjectUpdate};

use crate::api::use_api;
use crate::cache::{QueryKey, use_query_cache};
use crate::components::toast::use_toast;
use crate::hooks::run_mutation;

/// What the dialog is doing; `None` in the owning signal means closed.
#[derive(Clone)]
pub enum ProjectDialogState {
    Create,
    Edit(Project),
}

#[component]
pub fn ProjectDialog(state: RwSignal<Option<ProjectDialogState>>) -> impl IntoView {
    let api = use_api();
    let cache = use_query_cache();
    let toast = use_toast();

    let (name, set_name) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (saving, set_saving) = signal(false);

    // Seed the form each time the dialog opens.
    Effect::new(move |_| match state.get() {
        Some(ProjectDialogState::Edit(project)) => {
            set_name.set(project.project_name);
            set_description.set(project.description.unwrap_or_default());
        }
        Some(ProjectDialogState::Create) => {
            set_name.set(String::new());
            set_description.set(String::new());
        }
        None => {}
    });

    let on_save = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        let Some(mode) = state.get_untracked() else {
            return;
        };
        if name.get_untracked().trim().is_empty() {
            toast.error("Project name is required");
            return;
        }

        set_saving.set(true);
        let api = api.clone();
        let desc = {
            let d = description.get_untracked();
            if d.trim().is_empty() { None } else { Some(d) }
        };
        let done = move |label: &'static str| {
            move |result: crate::error::ClientResult<Project>| {
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
            ProjectDialogState::Create => {
                let create = ProjectCreate {
                    project_name: name.get_untracked().trim().to_string(),
                    description: desc,
                };
                run_mutation(
                    &cache.get(),
                    async move { api.create_project(&create).await },
                    vec![QueryKey::Projects],
                    done("Project created"),
                );
            }
            ProjectDialogState::Edit(project) => {
                let update = ProjectUpdate {
                    project_name: Some(name.get_untracked().trim().to_string()),
                    description: desc,
                };
                run_mutation(
                    &cache.get(),
                    async move { api.update_project(project.project_id, update).await },
                    vec![QueryKey::Projects],
                    done("Project updated"),
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
                            Some(ProjectDialogState::Edit(_)) => "Edit project",
                            _ => "New project",
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
                                <span class="label-text">"Name"</span>
                            </label>
                            <input
                                type="text"
                                class="input input-bordered"
                                placeholder="Website redesign"
                                prop:value=name
                                on:input=move |ev| set_name.set(event_target_value(&ev))
                            />
                        </div>
                        <div class="form-control">
                            <label class="label">
                                <span class="label-text">"Description"</span>
                            </label>
                            <textarea
                                class="textarea textarea-bordered"
                                placeholder="What is this project about?"
                                prop:value=description
                                on:input=move |ev| set_description.set(event_target_value(&ev))
                            ></textarea>
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
