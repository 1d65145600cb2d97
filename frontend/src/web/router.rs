//! Router service over the History API.
//!
//! All `window.history` access lives here. Navigation runs through the gate
//! in [`super::route`]: request, validate against the session signal, then
//! update the route signal that drives rendering. A logout observed anywhere
//! flips the session signal, and the effect installed by
//! [`RouterService::setup_auth_redirect`] immediately re-evaluates the route,
//! so no authenticated view lingers.

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, gate_redirect};

fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// replaceState variant, used for redirects so the denied URL does not pile
/// up in history.
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// Signal-driven router, decoupled from the session store by taking its
/// authentication state as an injected signal.
#[derive(Clone, Copy)]
pub struct RouterService {
    current_route: ReadSignal<AppRoute>,
    set_route: WriteSignal<AppRoute>,
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(is_authenticated: Signal<bool>) -> Self {
        let initial_route = AppRoute::from_path(&current_path());
        let (current_route, set_route) = signal(initial_route);

        Self {
            current_route,
            set_route,
            is_authenticated,
        }
    }

    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// Navigate to a path, subject to the gate.
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), true);
    }

    fn navigate_to_route(&self, target: AppRoute, use_push: bool) {
        let is_auth = self.is_authenticated.get_untracked();

        let resolved = match gate_redirect(&target, is_auth) {
            Some(redirect) => {
                web_sys::console::log_1(
                    &format!("[Router] {} denied, redirecting to {}", target, redirect).into(),
                );
                redirect
            }
            None => target,
        };

        if use_push {
            push_history_state(&resolved.to_path());
        } else {
            replace_history_state(&resolved.to_path());
        }
        self.set_route.set(resolved);
    }

    /// Back/forward buttons re-run the gate too.
    fn init_popstate_listener(&self) {
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            let is_auth = is_authenticated.get_untracked();

            match gate_redirect(&target, is_auth) {
                Some(redirect) => {
                    replace_history_state(&redirect.to_path());
                    set_route.set(redirect);
                }
                None => set_route.set(target),
            }
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // Leak the closure to keep the listener alive for the app's lifetime.
        closure.forget();
    }

    /// Re-evaluate the current route whenever the session state flips.
    fn setup_auth_redirect(&self) {
        let current_route = self.current_route;
        let set_route = self.set_route;
        let is_authenticated = self.is_authenticated;

        Effect::new(move |_| {
            let is_auth = is_authenticated.get();
            let route = current_route.get_untracked();

            if let Some(redirect) = gate_redirect(&route, is_auth) {
                web_sys::console::log_1(
                    &format!(
                        "[Router] auth state changed (authenticated={}), redirecting to {}",
                        is_auth, redirect
                    )
                    .into(),
                );
                push_history_state(&redirect.to_path());
                set_route.set(redirect);
            }
        });
    }
}

fn provide_router(is_authenticated: Signal<bool>) -> RouterService {
    let router = RouterService::new(is_authenticated);

    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI components
// ============================================================================

/// Root router component; provides the routing context. The gate effect runs
/// once on mount, so a stale URL (e.g. a bookmarked project page opened while
/// anonymous) is corrected before anything renders.
#[component]
pub fn Router(
    /// Session state signal injected by the app root.
    is_authenticated: Signal<bool>,
    children: Children,
) -> impl IntoView {
    let router = provide_router(is_authenticated);

    // Apply the gate to the initial URL.
    let initial = router.current_route().get_untracked();
    router.navigate_to_route(initial, false);

    children()
}

/// Renders the view matching the current route.
#[component]
pub fn RouterOutlet(
    /// Maps the current route to its view.
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}
