//! Login and registration forms.

use super::FieldError;
use crate::http::Transport;
use crate::routes::Route;
use crate::services::BookingApi;
use crate::session::{Session, SessionStore};
use crate::types::{NewUser, Role};

fn required(value: &str, field: &'static str) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::Required(field));
    }
    Ok(())
}

fn email(value: &str) -> Result<(), FieldError> {
    required(value, "Email")?;
    if !value.contains('@') {
        return Err(FieldError::Invalid {
            field: "Email",
            reason: format!("{value} is not an email address"),
        });
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), FieldError> {
        email(&self.email)?;
        required(&self.password, "Password")
    }

    /// Sign in and go to the dashboard. Validation failures never reach the
    /// backend.
    pub fn submit<T: Transport, S: SessionStore>(
        &self,
        session: &mut Session<S>,
        api: &BookingApi<T>,
    ) -> Result<Route, String> {
        self.validate().map_err(|e| e.to_string())?;
        session.login(api, self.email.trim(), &self.password)?;
        Ok(Route::Dashboard)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: Role,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), FieldError> {
        required(&self.name, "Name")?;
        email(&self.email)?;
        required(&self.password, "Password")
    }

    pub fn to_new_user(&self) -> NewUser {
        let phone = self.phone.trim();
        NewUser {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            phone: (!phone.is_empty()).then(|| phone.to_string()),
            role: Some(self.role),
        }
    }

    pub fn submit<T: Transport, S: SessionStore>(
        &self,
        session: &mut Session<S>,
        api: &BookingApi<T>,
    ) -> Result<Route, String> {
        self.validate().map_err(|e| e.to_string())?;
        session.register(api, &self.to_new_user())?;
        Ok(Route::Dashboard)
    }
}
