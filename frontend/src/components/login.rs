//! Sign-in / sign-up page, the only route outside the session gate.

use leptos::prelude::*;
use leptos::task::spawn_local;
use synergysphere_shared::UserCreate;

use crate::api::use_api;
use crate::components::icons::Orbit;
use crate::session::use_session;

#[component]
pub fn LoginPage() -> impl IntoView {
    let api = use_api();
    let session = use_session();

    let (signing_up, set_signing_up) = signal(false);
    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (submitting, set_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (notice, set_notice) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get().is_empty() || password.get().is_empty() {
            set_error_msg.set(Some("Please fill in all fields".to_string()));
            return;
        }

        set_submitting.set(true);
        set_error_msg.set(None);
        set_notice.set(None);

        let api = api.clone();
        let session = session.clone();
        spawn_local(async move {
            if signing_up.get_untracked() {
                let user = UserCreate {
                    username: username.get_untracked(),
                    email: email.get_untracked(),
                    password: password.get_untracked(),
                };
                match api.register(&user).await {
                    Ok(()) => {
                        // Back to the sign-in form; registration does not log in.
                        set_signing_up.set(false);
                        set_password.set(String::new());
                        set_notice.set(Some("Account created. Please sign in.".to_string()));
                    }
                    Err(e) => set_error_msg.set(Some(e.user_message())),
                }
            } else {
                match api
                    .login(&username.get_untracked(), &password.get_untracked())
                    .await
                {
                    Ok(payload) => {
                        // Storing the token flips the gate; the router
                        // redirects to the dashboard on its own.
                        session.login(payload.access_token);
                    }
                    Err(e) => set_error_msg.set(Some(e.user_message())),
                }
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="hero min-h-screen bg-base-200">
            <div class="hero-content flex-col w-full max-w-md">
                <div class="text-center mb-4">
                    <div class="flex flex-col items-center gap-2">
                        <div class="p-3 bg-primary/10 rounded-2xl text-primary">
                            <Orbit class="h-8 w-8" />
                        </div>
                        <h1 class="text-3xl font-bold">"SynergySphere"</h1>
                        <p class="text-base-content/70">
                            {move || if signing_up.get() {
                                "Create an account to start collaborating"
                            } else {
                                "Welcome back! Please sign in."
                            }}
                        </p>
                    </div>
                </div>

                <div class="card shrink-0 w-full shadow-2xl bg-base-100">
                    <form class="card-body" on:submit=on_submit>
                        <Show when=move || error_msg.get().is_some()>
                            <div role="alert" class="alert alert-error text-sm py-2">
                                <span>{move || error_msg.get().unwrap_or_default()}</span>
                            </div>
                        </Show>
                        <Show when=move || notice.get().is_some()>
                            <div role="alert" class="alert alert-success text-sm py-2">
                                <span>{move || notice.get().unwrap_or_default()}</span>
                            </div>
                        </Show>

                        <div class="form-control">
                            <label class="label" for="username">
                                <span class="label-text">"Username"</span>
                            </label>
                            <input
                                id="username"
                                type="text"
                                placeholder="alice"
                                on:input=move |ev| set_username.set(event_target_value(&ev))
                                prop:value=username
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <Show when=move || signing_up.get()>
                            <div class="form-control">
                                <label class="label" for="email">
                                    <span class="label-text">"Email"</span>
                                </label>
                                <input
                                    id="email"
                                    type="email"
                                    placeholder="alice@example.com"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    class="input input-bordered"
                                />
                            </div>
                        </Show>
                        <div class="form-control">
                            <label class="label" for="password">
                                <span class="label-text">"Password"</span>
                            </label>
                            <input
                                id="password"
                                type="password"
                                placeholder="••••••••"
                                on:input=move |ev| set_password.set(event_target_value(&ev))
                                prop:value=password
                                class="input input-bordered"
                                required
                            />
                        </div>
                        <div class="form-control mt-6">
                            <button class="btn btn-primary" disabled=move || submitting.get()>
                                {move || if submitting.get() {
                                    view! { <span class="loading loading-spinner"></span> "Working..." }.into_any()
                                } else if signing_up.get() {
                                    "Create account".into_any()
                                } else {
                                    "Sign in".into_any()
                                }}
                            </button>
                        </div>
                        <div class="text-center text-sm mt-2">
                            <a
                                class="link link-primary"
                                on:click=move |_| {
                                    set_error_msg.set(None);
                                    set_notice.set(None);
                                    set_signing_up.update(|v| *v = !*v);
                                }
                            >
                                {move || if signing_up.get() {
                                    "Already have an account? Sign in"
                                } else {
                                    "No account yet? Sign up"
                                }}
                            </a>
                        </div>
                    </form>
                </div>
            </div>
        </div>
    }
}
