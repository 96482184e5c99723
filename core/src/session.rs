//! The authenticated session and its durable store.
//!
//! # Design
//! `Session` is an ordinary value owned by the application shell and lent to
//! views; there is no global. It is built once at startup by rehydrating from
//! a `SessionStore` and changes only through `login`, `register` and
//! `logout`. The store holds a single JSON document `{"user": ...}`; it is a
//! continuity cache, never an authority.

use std::cell::RefCell;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SessionError;
use crate::http::Transport;
use crate::services::BookingApi;
use crate::types::{NewUser, Role, User};

/// Durable storage for the session user.
pub trait SessionStore {
    fn load(&self) -> Result<Option<User>, SessionError>;
    fn save(&self, user: &User) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Serialize, Deserialize)]
struct Stored {
    user: User,
}

fn encode(user: &User) -> Result<String, SessionError> {
    Ok(serde_json::to_string(&Stored { user: user.clone() })?)
}

fn decode(raw: &str) -> Result<User, SessionError> {
    Ok(serde_json::from_str::<Stored>(raw)?.user)
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn load(&self) -> Result<Option<User>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, user: &User) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, encode(user)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-process store holding the serialized document, like browser storage.
#[derive(Debug, Default)]
pub struct MemoryStore {
    raw: RefCell<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with an arbitrary document.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Option<User>, SessionError> {
        self.raw.borrow().as_deref().map(decode).transpose()
    }

    fn save(&self, user: &User) -> Result<(), SessionError> {
        *self.raw.borrow_mut() = Some(encode(user)?);
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        *self.raw.borrow_mut() = None;
        Ok(())
    }
}

/// The current user plus the store that outlives the process.
pub struct Session<S> {
    user: Option<User>,
    store: S,
}

impl<S: SessionStore> Session<S> {
    /// Restore the previous session, if any. An unreadable store counts as
    /// logged out.
    pub fn rehydrate(store: S) -> Self {
        let user = match store.load() {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable session");
                None
            }
        };
        Self { user, store }
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn role(&self) -> Option<Role> {
        self.user.as_ref().map(|u| u.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        match self.role() {
            Some(Role::Admin) => true,
            Some(Role::Customer | Role::ServiceProvider) | None => false,
        }
    }

    pub fn is_service_provider(&self) -> bool {
        match self.role() {
            Some(Role::ServiceProvider) => true,
            Some(Role::Customer | Role::Admin) | None => false,
        }
    }

    /// On failure returns the text to show next to the login form.
    pub fn login<T: Transport>(
        &mut self,
        api: &BookingApi<T>,
        email: &str,
        password: &str,
    ) -> Result<&User, String> {
        match api.login(email, password) {
            Ok(user) => {
                tracing::info!(user_id = user.id, role = %user.role, "logged in");
                Ok(self.establish(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                let fallback = if e.is_soft_rejection() {
                    "Invalid credentials"
                } else {
                    "Login failed"
                };
                Err(e.display_or(fallback))
            }
        }
    }

    /// A successful registration signs the new user in.
    pub fn register<T: Transport>(
        &mut self,
        api: &BookingApi<T>,
        input: &NewUser,
    ) -> Result<&User, String> {
        match api.register(input) {
            Ok(user) => {
                tracing::info!(user_id = user.id, "registered");
                Ok(self.establish(user))
            }
            Err(e) => {
                tracing::warn!(error = %e, "registration failed");
                Err(e.display_or("Registration failed"))
            }
        }
    }

    /// Local only; the backend keeps no session to end.
    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = user.id, "logged out");
        }
        if let Err(e) = self.store.clear() {
            tracing::warn!(error = %e, "could not clear stored session");
        }
    }

    fn establish(&mut self, user: User) -> &User {
        if let Err(e) = self.store.save(&user) {
            tracing::warn!(error = %e, "could not persist session");
        }
        self.user.insert(user)
    }
}
