//! Booking and editing form.
//!
//! The same form serves `/appointments/new` and `/appointments/edit/{id}`;
//! the presence of the route id alone selects the mode.

use chrono::{Duration, NaiveDateTime};

pub use super::FieldError;
use crate::http::Transport;
use crate::routes::Route;
use crate::services::BookingApi;
use crate::types::{Appointment, AppointmentId, AppointmentRequest, ServiceType, User, UserId};

/// Format of the date-time input: minutes precision, no seconds.
pub const INPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";
const FULL_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(AppointmentId),
}

impl FormMode {
    pub fn from_route_id(id: Option<AppointmentId>) -> Self {
        match id {
            Some(id) => FormMode::Edit(id),
            None => FormMode::Create,
        }
    }

    pub fn is_edit(self) -> bool {
        matches!(self, FormMode::Edit(_))
    }

    pub fn title(self) -> &'static str {
        match self {
            FormMode::Create => "Book New Appointment",
            FormMode::Edit(_) => "Edit Appointment",
        }
    }

    pub fn submit_label(self) -> &'static str {
        match self {
            FormMode::Create => "Book Appointment",
            FormMode::Edit(_) => "Update Appointment",
        }
    }
}

/// Raw field values as the user typed or selected them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields {
    pub service_provider_id: String,
    pub service_type: ServiceType,
    pub appointment_date_time: String,
    pub notes: String,
}

impl FormFields {
    pub fn from_appointment(apt: &Appointment) -> Self {
        Self {
            service_provider_id: apt.service_provider_id.to_string(),
            service_type: apt.service_type,
            appointment_date_time: apt.appointment_date_time.format(FULL_FORMAT).to_string(),
            notes: apt.notes.clone().unwrap_or_default(),
        }
    }

    /// The input-level constraints: required provider and date-time, and a
    /// date-time no earlier than [`min_date_time`]. `submit` does not call
    /// this; whoever collects the input does.
    pub fn check_constraints(&self, now: NaiveDateTime) -> Result<(), FieldError> {
        provider_id(&self.service_provider_id)?;
        let raw = self.appointment_date_time.trim();
        if raw.is_empty() {
            return Err(FieldError::Required("Date & Time"));
        }
        let at = normalize_date_time(raw)
            .parse::<NaiveDateTime>()
            .map_err(|e| FieldError::Invalid {
                field: "Date & Time",
                reason: e.to_string(),
            })?;
        let earliest = min_date_time(now);
        if at < earliest {
            return Err(FieldError::TooSoon {
                earliest: earliest.format(INPUT_FORMAT).to_string(),
            });
        }
        Ok(())
    }
}

/// Append `:00` to a minutes-precision value; leave anything else alone.
pub fn normalize_date_time(value: &str) -> String {
    if value.chars().count() == 16 {
        format!("{value}:00")
    } else {
        value.to_string()
    }
}

/// Earliest bookable slot: tomorrow at 09:00 local time.
pub fn min_date_time(now: NaiveDateTime) -> NaiveDateTime {
    now.date()
        .and_hms_opt(9, 0, 0)
        .map(|nine| nine + Duration::days(1))
        .unwrap_or(now + Duration::days(1))
}

fn provider_id(raw: &str) -> Result<UserId, FieldError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FieldError::Required("Service Provider"));
    }
    raw.parse().map_err(|_| FieldError::Invalid {
        field: "Service Provider",
        reason: format!("{raw} is not a provider id"),
    })
}

#[derive(Debug, Clone)]
pub struct AppointmentForm {
    mode: FormMode,
    pub fields: FormFields,
    providers: Vec<User>,
    error: Option<String>,
    submitting: bool,
}

impl AppointmentForm {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            fields: FormFields::default(),
            providers: Vec::new(),
            error: None,
            submitting: false,
        }
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn providers(&self) -> &[User] {
        &self.providers
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    /// `(id, "name - email")` entries for the provider select.
    pub fn provider_options(&self) -> Vec<(UserId, String)> {
        self.providers
            .iter()
            .map(|p| (p.id, format!("{} - {}", p.name, p.email)))
            .collect()
    }

    /// Fetch the provider list and, when editing, the appointment's current
    /// values. A provider fetch failure leaves the list empty.
    pub fn load<T: Transport>(&mut self, api: &BookingApi<T>) {
        match api.list_providers() {
            Ok(providers) => self.providers = providers,
            Err(e) => tracing::warn!(error = %e, "error fetching providers"),
        }

        if let FormMode::Edit(id) = self.mode {
            match api.get_appointment(id) {
                Ok(apt) => self.fields = FormFields::from_appointment(&apt),
                Err(e) => {
                    tracing::warn!(error = %e, appointment_id = id, "error fetching appointment");
                    self.error = Some("Failed to fetch appointment details".to_string());
                }
            }
        }
    }

    /// The payload sent on submit.
    pub fn build_request(&self, customer_id: UserId) -> Result<AppointmentRequest, FieldError> {
        Ok(AppointmentRequest {
            customer_id,
            service_provider_id: provider_id(&self.fields.service_provider_id)?,
            service_type: self.fields.service_type,
            appointment_date_time: normalize_date_time(&self.fields.appointment_date_time),
            notes: self.fields.notes.clone(),
        })
    }

    /// Create or update, then hand back where to go next. On failure the
    /// message is also kept in `error()` and the fields stay as they were.
    pub fn submit<T: Transport>(
        &mut self,
        api: &BookingApi<T>,
        customer_id: UserId,
    ) -> Result<Route, String> {
        self.error = None;
        let request = match self.build_request(customer_id) {
            Ok(request) => request,
            Err(e) => return Err(self.fail(e.to_string())),
        };

        self.submitting = true;
        let result = match self.mode {
            FormMode::Create => api.create_appointment(&request),
            FormMode::Edit(id) => api.update_appointment(id, &request),
        };
        self.submitting = false;

        match result {
            Ok(saved) => {
                tracing::info!(appointment_id = ?saved.map(|apt| apt.id), "appointment saved");
                Ok(Route::Dashboard)
            }
            Err(e) => {
                tracing::warn!(error = %e, "error saving appointment");
                let fallback = if e.is_soft_rejection() {
                    "Failed to save appointment"
                } else {
                    "An error occurred"
                };
                Err(self.fail(e.display_or(fallback)))
            }
        }
    }

    fn fail(&mut self, message: String) -> String {
        self.error = Some(message.clone());
        message
    }
}
