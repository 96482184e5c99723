//! Navigation bar contents and the logout action.

use crate::routes::Route;
use crate::session::{Session, SessionStore};
use crate::types::Role;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    Link { label: &'static str, route: Route },
    Greeting(String),
    Logout,
}

impl NavItem {
    pub fn label(&self) -> String {
        match self {
            NavItem::Link { label, .. } => label.to_string(),
            NavItem::Greeting(name) => format!("Hello, {name}"),
            NavItem::Logout => "Logout".to_string(),
        }
    }
}

pub fn nav_items<S: SessionStore>(session: &Session<S>) -> Vec<NavItem> {
    let Some(user) = session.user() else {
        return vec![
            NavItem::Link { label: "Login", route: Route::Login },
            NavItem::Link { label: "Sign Up", route: Route::Register },
        ];
    };

    let mut items = vec![NavItem::Link { label: "Dashboard", route: Route::Dashboard }];
    match user.role {
        Role::Admin => items.push(NavItem::Link { label: "Admin", route: Route::Admin }),
        Role::Customer | Role::ServiceProvider => {}
    }
    items.push(NavItem::Greeting(user.name.clone()));
    items.push(NavItem::Logout);
    items
}

/// Clear the session and land on the login page.
pub fn logout<S: SessionStore>(session: &mut Session<S>) -> Route {
    session.logout();
    Route::Login
}
