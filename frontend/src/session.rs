//! Session state management.
//!
//! One two-state machine: Anonymous or Authenticated, decided solely by
//! whether a bearer token is held. The initial state is read synchronously
//! from persisted storage so the first render already knows which route tree
//! to show. The only mutation surface is `login` / `logout`; a 401 observed
//! by the API client calls `logout`, which is idempotent.

use leptos::prelude::*;
use std::sync::Arc;
use synergysphere_shared::User;

use crate::web::LocalStorage;

/// LocalStorage key holding the bearer token; absence means anonymous.
pub const TOKEN_STORAGE_KEY: &str = "synergysphere_token";

/// Persistence seam for the token, so session logic tests run off-browser.
/// `Send + Sync` so the store handle can live in the reactive context.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> bool;
    fn clear(&self) -> bool;
}

/// Browser-backed token store.
pub struct BrowserTokenStore;

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<String> {
        LocalStorage::get(TOKEN_STORAGE_KEY)
    }

    fn save(&self, token: &str) -> bool {
        LocalStorage::set(TOKEN_STORAGE_KEY, token)
    }

    fn clear(&self) -> bool {
        LocalStorage::delete(TOKEN_STORAGE_KEY)
    }
}

#[derive(Clone, Default)]
pub struct SessionState {
    pub token: Option<String>,
    /// Profile of the signed-in user, fetched after login.
    pub user: Option<User>,
}

/// Shared session handle; cheap to clone, provided via context.
#[derive(Clone)]
pub struct SessionStore {
    state: ReadSignal<SessionState>,
    set_state: WriteSignal<SessionState>,
    store: Arc<dyn TokenStore>,
}

impl SessionStore {
    /// Builds the store, deriving the initial state from persisted storage.
    /// No network round-trip: a present token means Authenticated until a
    /// request proves otherwise.
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        let initial = SessionState {
            token: store.load(),
            user: None,
        };
        let (state, set_state) = signal(initial);
        Self {
            state,
            set_state,
            store,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with_untracked(|s| s.token.is_some())
    }

    /// Reactive view of the gate predicate, injected into the router.
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.token.is_some()))
    }

    pub fn token(&self) -> Option<String> {
        self.state.with_untracked(|s| s.token.clone())
    }

    pub fn user_signal(&self) -> Signal<Option<User>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user.clone()))
    }

    /// Persists the token and transitions to Authenticated.
    pub fn login(&self, token: String) {
        self.store.save(&token);
        self.set_state.update(|s| {
            s.token = Some(token);
        });
    }

    /// Records the signed-in user's profile.
    pub fn set_user(&self, user: User) {
        self.set_state.update(|s| {
            s.user = Some(user);
        });
    }

    /// Clears the token and transitions to Anonymous. Idempotent: repeated
    /// calls (e.g. several in-flight requests all hitting 401) produce one
    /// observable transition and touch storage once.
    pub fn logout(&self) {
        if self.state.with_untracked(|s| s.token.is_none()) {
            return;
        }
        self.store.clear();
        self.set_state.update(|s| {
            s.token = None;
            s.user = None;
        });
    }
}

pub fn use_session() -> SessionStore {
    use_context::<SessionStore>().expect("SessionStore should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every storage operation so tests can assert on side effects.
    struct MockStore {
        token: Mutex<Option<String>>,
        log: Mutex<Vec<String>>,
    }

    impl MockStore {
        fn new(token: Option<&str>) -> Arc<Self> {
            Arc::new(Self {
                token: Mutex::new(token.map(String::from)),
                log: Mutex::new(Vec::new()),
            })
        }
    }

    impl TokenStore for MockStore {
        fn load(&self) -> Option<String> {
            self.log.lock().unwrap().push("load".into());
            self.token.lock().unwrap().clone()
        }

        fn save(&self, token: &str) -> bool {
            self.log.lock().unwrap().push(format!("save:{}", token));
            *self.token.lock().unwrap() = Some(token.to_string());
            true
        }

        fn clear(&self) -> bool {
            self.log.lock().unwrap().push("clear".into());
            *self.token.lock().unwrap() = None;
            true
        }
    }

    #[test]
    fn initial_state_comes_from_storage_synchronously() {
        let store = MockStore::new(Some("tok-1"));
        let session = SessionStore::new(store.clone());
        assert!(session.is_authenticated());
        assert_eq!(session.token().as_deref(), Some("tok-1"));

        let empty = SessionStore::new(MockStore::new(None));
        assert!(!empty.is_authenticated());
    }

    #[test]
    fn login_persists_and_flips_state() {
        let store = MockStore::new(None);
        let session = SessionStore::new(store.clone());

        session.login("tok-2".into());
        assert!(session.is_authenticated());
        assert!(store.log.lock().unwrap().contains(&"save:tok-2".to_string()));
    }

    #[test]
    fn logout_is_idempotent() {
        let store = MockStore::new(Some("tok-3"));
        let session = SessionStore::new(store.clone());

        session.logout();
        session.logout();

        assert!(!session.is_authenticated());
        let clears = store
            .log
            .lock()
            .unwrap()
            .iter()
            .filter(|op| *op == "clear")
            .count();
        assert_eq!(clears, 1);
    }

    #[test]
    fn logout_drops_the_user_profile() {
        let session = SessionStore::new(MockStore::new(Some("tok-4")));
        session.set_user(User {
            user_id: "u1".into(),
            username: "alice".into(),
            email: "alice@example.com".into(),
        });
        assert!(session.user_signal().get_untracked().is_some());

        session.logout();
        assert!(session.user_signal().get_untracked().is_none());
    }
}
