//! Top navigation bar for the authenticated route tree.

use leptos::prelude::*;

use crate::components::icons::{LogOut, Orbit};
use crate::session::use_session;
use crate::web::router::use_router;

#[component]
pub fn Header() -> impl IntoView {
    let session = use_session();
    let router = use_router();
    let user = session.user_signal();

    let on_logout = move |_| {
        // The router's gate effect observes the transition and redirects.
        session.logout();
    };

    let nav_link = move |label: &'static str, path: &'static str| {
        view! {
            <li>
                <a on:click=move |_| router.navigate(path)>{label}</a>
            </li>
        }
    };

    view! {
        <div class="navbar bg-base-100 rounded-box shadow-xl">
            <div class="flex-1 gap-2">
                <Orbit class="text-primary h-6 w-6" />
                <a
                    class="btn btn-ghost text-xl"
                    on:click=move |_| router.navigate("/dashboard")
                >
                    "SynergySphere"
                </a>
                <ul class="menu menu-horizontal px-1 hidden md:flex">
                    {nav_link("Dashboard", "/dashboard")}
                    {nav_link("Analytics", "/analytics")}
                    {nav_link("My Stats", "/me")}
                    {nav_link("Admin", "/admin")}
                </ul>
            </div>
            <div class="flex-none gap-2">
                <Show when=move || user.get().is_some()>
                    <span class="badge badge-neutral hidden md:inline-flex">
                        {move || user.get().map(|u| u.username).unwrap_or_default()}
                    </span>
                </Show>
                <button on:click=on_logout class="btn btn-outline btn-error btn-sm gap-2">
                    <LogOut class="h-4 w-4" />
                    "Sign out"
                </button>
            </div>
        </div>
    }
}
