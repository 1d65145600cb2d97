//! Transient notifications.
//!
//! One context-wide slot; every mutation failure and success lands here
//! instead of propagating into the render path.

use leptos::prelude::*;

#[derive(Clone, Copy)]
pub struct ToastContext {
    message: ReadSignal<Option<(String, bool)>>,
    set_message: WriteSignal<Option<(String, bool)>>,
}

impl ToastContext {
    pub fn new() -> Self {
        let (message, set_message) = signal(None);
        Self {
            message,
            set_message,
        }
    }

    pub fn success(&self, msg: impl Into<String>) {
        self.set_message.set(Some((msg.into(), false)));
    }

    pub fn error(&self, msg: impl Into<String>) {
        self.set_message.set(Some((msg.into(), true)));
    }
}

impl Default for ToastContext {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_toast() -> ToastContext {
    use_context::<ToastContext>().expect("ToastContext should be provided")
}

/// Renders the active toast; clears itself after three seconds.
#[component]
pub fn ToastHost() -> impl IntoView {
    let toast = use_toast();
    let message = toast.message;
    let set_message = toast.set_message;

    Effect::new(move |_| {
        if message.get().is_some() {
            set_timeout(
                move || set_message.set(None),
                std::time::Duration::from_secs(3),
            );
        }
    });

    // Rendered off the message itself rather than a `Show` guard: the
    // timeout clears the signal, and nothing here may assume the slot is
    // still occupied when it re-renders.
    view! {
        {move || {
            message.get().map(|(text, is_err)| {
                let class = if is_err {
                    "alert alert-error shadow-lg"
                } else {
                    "alert alert-success shadow-lg"
                };
                view! {
                    <div class="toast toast-top toast-end z-50">
                        <div class=class>
                            <span>{text}</span>
                        </div>
                    </div>
                }
            })
        }}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_latest_toast_wins_the_slot() {
        let toast = ToastContext::new();
        toast.success("saved");
        toast.error("broke");

        let current = toast.message.get_untracked();
        assert_eq!(current, Some(("broke".to_string(), true)));
    }

    #[test]
    fn an_empty_slot_renders_nothing() {
        let toast = ToastContext::new();
        assert!(toast.message.get_untracked().is_none());

        toast.success("saved");
        toast.set_message.set(None);
        assert!(toast.message.get_untracked().is_none());
    }
}
