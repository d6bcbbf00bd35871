//! The authenticated user, mirrored to a key-value store.
//!
//! [`Session`] holds the user and writes every change through to its
//! [`KeyValueStore`]. In the browser the store is `localStorage`; tests use
//! [`MemoryStore`]. Components reach the session through
//! [`SessionProvider`] and [`use_session`].

use payloads::User;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use yew::prelude::*;

/// Key the user is persisted under.
pub const SESSION_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Local storage is not available")]
    Unavailable,
    #[error("Local storage rejected the operation")]
    Access,
    #[error("Could not encode the session")]
    Encode(#[from] serde_json::Error),
}

/// Persistence capability for the session.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Browser `localStorage`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorageStore;

impl LocalStorageStore {
    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .ok_or(StorageError::Unavailable)?
            .local_storage()
            .map_err(|_| StorageError::Unavailable)?
            .ok_or(StorageError::Unavailable)
    }
}

impl KeyValueStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(key)
            .map_err(|_| StorageError::Access)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|_| StorageError::Access)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        Self::storage()?
            .remove_item(key)
            .map_err(|_| StorageError::Access)
    }
}

/// In-memory store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Rc<RefCell<HashMap<String, String>>>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub user: User,
    pub token: String,
}

pub struct Session<S> {
    store: S,
    user: Option<AuthenticatedUser>,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the mirrored user from `store`.
    ///
    /// A value that no longer parses is removed and the session starts
    /// logged out.
    pub fn restore(store: S) -> Self {
        let user = match store.get(SESSION_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Discarding unreadable session: {e}");
                    if let Err(e) = store.remove(SESSION_KEY) {
                        tracing::error!("{e}");
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Could not read session: {e}");
                None
            }
        };
        Self { store, user }
    }

    /// Set the user and persist it. The in-memory session is updated even
    /// if persisting fails.
    pub fn login(&mut self, user: AuthenticatedUser) -> Result<(), StorageError> {
        let encoded = serde_json::to_string(&user)?;
        self.user = Some(user);
        self.store.set(SESSION_KEY, &encoded)
    }

    pub fn logout(&mut self) -> Result<(), StorageError> {
        self.user = None;
        self.store.remove(SESSION_KEY)
    }

    pub fn current_user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.user.as_ref().map(|u| u.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

pub enum SessionAction {
    Login(AuthenticatedUser),
    Logout,
}

/// Reducer state shared through [`SessionContext`].
pub struct SessionState<S = LocalStorageStore> {
    session: Rc<RefCell<Session<S>>>,
    user: Option<AuthenticatedUser>,
}

impl<S: KeyValueStore> SessionState<S> {
    pub fn restore(store: S) -> Self {
        let session = Session::restore(store);
        let user = session.current_user().cloned();
        Self {
            session: Rc::new(RefCell::new(session)),
            user,
        }
    }

    pub fn current_user(&self) -> Option<&AuthenticatedUser> {
        self.user.as_ref()
    }

    pub fn token(&self) -> Option<String> {
        self.user.as_ref().map(|u| u.token.clone())
    }
}

impl<S> PartialEq for SessionState<S> {
    fn eq(&self, other: &Self) -> bool {
        self.user == other.user
    }
}

impl<S: KeyValueStore> Reducible for SessionState<S> {
    type Action = SessionAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let result = {
            let mut session = self.session.borrow_mut();
            match action {
                SessionAction::Login(user) => session.login(user),
                SessionAction::Logout => session.logout(),
            }
        };
        if let Err(e) = result {
            tracing::error!("Session not persisted: {e}");
        }

        let user = self.session.borrow().current_user().cloned();
        Rc::new(Self {
            session: Rc::clone(&self.session),
            user,
        })
    }
}

pub type SessionContext = UseReducerHandle<SessionState>;

#[derive(Properties, PartialEq)]
pub struct SessionProviderProps {
    pub children: Children,
}

#[function_component]
pub fn SessionProvider(props: &SessionProviderProps) -> Html {
    let session = use_reducer(|| SessionState::restore(LocalStorageStore));

    html! {
        <ContextProvider<SessionContext> context={session}>
            {props.children.clone()}
        </ContextProvider<SessionContext>>
    }
}

#[hook]
pub fn use_session() -> SessionContext {
    use_context::<SessionContext>()
        .expect("use_session must be called below a SessionProvider")
}

#[cfg(test)]
mod tests {
    use super::*;
    use payloads::UserId;

    fn alice() -> AuthenticatedUser {
        AuthenticatedUser {
            user: User {
                id: UserId("u1".into()),
                username: "alice".into(),
                email: "alice@example.com".into(),
                role: None,
            },
            token: "token-alice".into(),
        }
    }

    #[test]
    fn starts_logged_out() {
        let session = Session::restore(MemoryStore::default());
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn login_is_mirrored_to_store() {
        let store = MemoryStore::default();
        let mut session = Session::restore(store.clone());

        session.login(alice()).unwrap();

        assert_eq!(session.current_user(), Some(&alice()));
        assert_eq!(session.token(), Some("token-alice"));
        let restored = Session::restore(store);
        assert_eq!(restored.current_user(), Some(&alice()));
    }

    #[test]
    fn logout_clears_store() {
        let store = MemoryStore::default();
        let mut session = Session::restore(store.clone());
        session.login(alice()).unwrap();

        session.logout().unwrap();

        assert!(!session.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_value_is_discarded() {
        let store = MemoryStore::default();
        store.set(SESSION_KEY, "{not json").unwrap();

        let session = Session::restore(store.clone());

        assert!(!session.is_authenticated());
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }

    #[test]
    fn reducer_tracks_user() {
        let store = MemoryStore::default();
        let state = Rc::new(SessionState::restore(store.clone()));

        let state = state.reduce(SessionAction::Login(alice()));
        assert_eq!(state.current_user(), Some(&alice()));
        assert_eq!(state.token().as_deref(), Some("token-alice"));
        assert!(store.get(SESSION_KEY).unwrap().is_some());

        let state = state.reduce(SessionAction::Logout);
        assert_eq!(state.current_user(), None);
        assert_eq!(store.get(SESSION_KEY).unwrap(), None);
    }
}
