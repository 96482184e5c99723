//! The signed-in user's dashboard.
//!
//! # Design
//! Providers get one listing (`/provider/{id}`) that doubles as their
//! upcoming set. Customers, and admins using this view, get their full
//! listing and a separately requested upcoming set. Everything else here
//! (tab filtering, stat tiles, the expired notice) is computed from those
//! two lists without further requests.
//!
//! The expired notice only reports what the timestamps suggest. The client
//! never removes anything itself.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;

use super::Confirm;
use crate::error::ApiError;
use crate::http::Transport;
use crate::services::BookingApi;
use crate::types::{Appointment, AppointmentId, AppointmentStatus, Role, User};

pub const CANCEL_PROMPT: &str = "Are you sure you want to cancel this appointment?";
const FETCH_FAILED: &str = "Failed to fetch appointments. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Upcoming,
    All,
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Upcoming,
        Tab::All,
        Tab::Pending,
        Tab::Confirmed,
        Tab::Completed,
        Tab::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Upcoming => "upcoming",
            Tab::All => "all",
            Tab::Pending => "pending",
            Tab::Confirmed => "confirmed",
            Tab::Completed => "completed",
            Tab::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Upcoming => "Upcoming",
            Tab::All => "All",
            Tab::Pending => "Pending",
            Tab::Confirmed => "Confirmed",
            Tab::Completed => "Completed",
            Tab::Cancelled => "Cancelled",
        }
    }

    /// The status a tab filters on; `None` for `upcoming` and `all`.
    pub fn status(self) -> Option<AppointmentStatus> {
        match self {
            Tab::Upcoming | Tab::All => None,
            Tab::Pending => Some(AppointmentStatus::Pending),
            Tab::Confirmed => Some(AppointmentStatus::Confirmed),
            Tab::Completed => Some(AppointmentStatus::Completed),
            Tab::Cancelled => Some(AppointmentStatus::Cancelled),
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Tab::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| format!("unknown tab: {s}"))
    }
}

/// What a tab shows: the upcoming set as fetched, or the full list filtered
/// by exact status.
pub fn filter_by_tab<'a>(
    tab: Tab,
    all: &'a [Appointment],
    upcoming: &'a [Appointment],
) -> Vec<&'a Appointment> {
    match (tab, tab.status()) {
        (Tab::Upcoming, _) => upcoming.iter().collect(),
        (_, Some(status)) => all.iter().filter(|a| a.status == status).collect(),
        (_, None) => all.iter().collect(),
    }
}

/// PENDING appointments whose time is strictly before `now`.
pub fn expired_unconfirmed(appointments: &[Appointment], now: NaiveDateTime) -> usize {
    appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Pending && a.appointment_date_time < now)
        .count()
}

pub fn expired_notice(appointments: &[Appointment], now: NaiveDateTime) -> Option<String> {
    match expired_unconfirmed(appointments, now) {
        0 => None,
        n => Some(format!(
            "{n} expired unconfirmed appointment(s) have been auto-removed."
        )),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatTiles {
    pub total: usize,
    pub upcoming: usize,
    pub pending: usize,
    pub completed: usize,
}

/// Actions offered on an appointment card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Edit,
    Cancel,
    SetStatus(AppointmentStatus),
}

impl CardAction {
    pub fn label(self) -> &'static str {
        match self {
            CardAction::Edit => "Edit",
            CardAction::Cancel => "Cancel",
            CardAction::SetStatus(AppointmentStatus::Confirmed) => "Confirm",
            CardAction::SetStatus(AppointmentStatus::Completed) => "Mark Completed",
            CardAction::SetStatus(AppointmentStatus::Cancelled) => "Decline",
            CardAction::SetStatus(AppointmentStatus::Pending) => "Reopen",
        }
    }
}

/// Customers may edit or cancel what is still open; providers move it
/// through the workflow. Finished appointments offer nothing.
pub fn card_actions(apt: &Appointment, provider_view: bool) -> Vec<CardAction> {
    use AppointmentStatus::*;
    match (provider_view, apt.status) {
        (_, Completed | Cancelled) => Vec::new(),
        (false, Pending | Confirmed) => vec![CardAction::Edit, CardAction::Cancel],
        (true, Pending) => vec![CardAction::SetStatus(Confirmed), CardAction::SetStatus(Cancelled)],
        (true, Confirmed) => vec![CardAction::SetStatus(Completed), CardAction::SetStatus(Cancelled)],
    }
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    viewer: User,
    appointments: Vec<Appointment>,
    upcoming: Vec<Appointment>,
    tab: Tab,
    info: Option<String>,
    error: Option<String>,
}

impl Dashboard {
    pub fn new(viewer: &User) -> Self {
        Self {
            viewer: viewer.clone(),
            appointments: Vec::new(),
            upcoming: Vec::new(),
            tab: Tab::default(),
            info: None,
            error: None,
        }
    }

    pub fn viewer(&self) -> &User {
        &self.viewer
    }

    pub fn is_provider_view(&self) -> bool {
        match self.viewer.role {
            Role::ServiceProvider => true,
            Role::Customer | Role::Admin => false,
        }
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn upcoming(&self) -> &[Appointment] {
        &self.upcoming
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: Tab) {
        self.tab = tab;
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn visible(&self) -> Vec<&Appointment> {
        filter_by_tab(self.tab, &self.appointments, &self.upcoming)
    }

    pub fn stats(&self) -> StatTiles {
        let count = |status| self.appointments.iter().filter(|a| a.status == status).count();
        StatTiles {
            total: self.appointments.len(),
            upcoming: self.upcoming.len(),
            pending: count(AppointmentStatus::Pending),
            completed: count(AppointmentStatus::Completed),
        }
    }

    /// Fetch the viewer's appointments, sequentially, and recompute the
    /// expired notice. Nothing is replaced unless every fetch succeeds.
    pub fn refresh<T: Transport>(&mut self, api: &BookingApi<T>, now: NaiveDateTime) {
        self.error = None;
        match self.fetch(api) {
            Ok((all, upcoming)) => {
                self.info = expired_notice(&all, now);
                self.appointments = all;
                self.upcoming = upcoming;
            }
            Err(e) => {
                tracing::error!(error = %e, user_id = self.viewer.id, "error fetching appointments");
                self.error = Some(FETCH_FAILED.to_string());
            }
        }
    }

    fn fetch<T: Transport>(
        &self,
        api: &BookingApi<T>,
    ) -> Result<(Vec<Appointment>, Vec<Appointment>), ApiError> {
        let id = self.viewer.id;
        match self.viewer.role {
            Role::ServiceProvider => {
                let all = api.appointments_by_provider(id)?;
                Ok((all.clone(), all))
            }
            Role::Customer | Role::Admin => {
                let all = api.appointments_by_customer(id)?;
                let upcoming = api.upcoming_appointments(id)?;
                Ok((all, upcoming))
            }
        }
    }

    /// Ask first; on yes, one status transition to `CANCELLED` then one
    /// refresh. Returns whether anything was sent.
    pub fn cancel<T: Transport>(
        &mut self,
        api: &BookingApi<T>,
        id: AppointmentId,
        confirm: &mut impl Confirm,
        now: NaiveDateTime,
    ) -> Result<bool, String> {
        if !confirm.confirm(CANCEL_PROMPT) {
            return Ok(false);
        }
        match api.update_appointment_status(id, AppointmentStatus::Cancelled) {
            Ok(_) => {
                self.refresh(api, now);
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = %e, appointment_id = id, "error cancelling appointment");
                Err("Failed to cancel appointment".to_string())
            }
        }
    }

    pub fn change_status<T: Transport>(
        &mut self,
        api: &BookingApi<T>,
        id: AppointmentId,
        status: AppointmentStatus,
        now: NaiveDateTime,
    ) -> Result<(), String> {
        match api.update_appointment_status(id, status) {
            Ok(_) => {
                self.refresh(api, now);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, appointment_id = id, %status, "error updating status");
                Err(e.display_or("Failed to update appointment status"))
            }
        }
    }
}
