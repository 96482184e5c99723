//! Client-visible routes and the authentication guard.

use std::fmt;

use crate::session::{Session, SessionStore};
use crate::types::AppointmentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Dashboard,
    Admin,
    NewAppointment,
    EditAppointment(AppointmentId),
    NotFound,
}

impl Route {
    /// Map a URL path onto a route. Query strings and a trailing slash are
    /// ignored; anything unrecognised is `NotFound`.
    pub fn parse(path: &str) -> Route {
        let path = path.split(|c| c == '?' || c == '#').next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["dashboard"] => Route::Dashboard,
            ["admin"] => Route::Admin,
            ["appointments", "new"] => Route::NewAppointment,
            ["appointments", "edit", id] => id
                .parse()
                .map(Route::EditAppointment)
                .unwrap_or(Route::NotFound),
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::NewAppointment => "/appointments/new".to_string(),
            Route::EditAppointment(id) => format!("/appointments/edit/{id}"),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn is_protected(&self) -> bool {
        match self {
            Route::Dashboard | Route::Admin | Route::NewAppointment | Route::EditAppointment(_) => true,
            Route::Home | Route::Login | Route::Register | Route::NotFound => false,
        }
    }

    /// The route actually shown: protected routes send anonymous users to
    /// `/login`.
    pub fn guard<S: SessionStore>(self, session: &Session<S>) -> Route {
        if self.is_protected() && !session.is_authenticated() {
            tracing::debug!(requested = %self, "redirecting to login");
            return Route::Login;
        }
        self
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
