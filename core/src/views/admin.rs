//! Admin overview: every appointment, aggregate stats and the user list.

use chrono::NaiveDateTime;

use super::dashboard::expired_notice;
use super::Confirm;
use crate::error::ApiError;
use crate::http::Transport;
use crate::services::BookingApi;
use crate::session::{Session, SessionStore};
use crate::types::{Appointment, AppointmentId, AppointmentStats, AppointmentStatus, Role, User};

pub const ACCESS_DENIED: &str = "Access denied. Admin privileges required.";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this appointment?";

/// Which appointments the admin listing asks the backend for.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AdminFilter {
    #[default]
    All,
    Status(AppointmentStatus),
    Search(String),
}

/// Role check for `/admin`; anyone else gets the denial text.
pub fn authorize<S: SessionStore>(session: &Session<S>) -> Result<&User, &'static str> {
    match session.user() {
        Some(user) => match user.role {
            Role::Admin => Ok(user),
            Role::Customer | Role::ServiceProvider => Err(ACCESS_DENIED),
        },
        None => Err(ACCESS_DENIED),
    }
}

#[derive(Debug, Clone, Default)]
pub struct AdminDashboard {
    filter: AdminFilter,
    appointments: Vec<Appointment>,
    stats: AppointmentStats,
    users: Vec<User>,
    info: Option<String>,
    error: Option<String>,
}

impl AdminDashboard {
    pub fn new(filter: AdminFilter) -> Self {
        Self {
            filter,
            ..Self::default()
        }
    }

    pub fn filter(&self) -> &AdminFilter {
        &self.filter
    }

    pub fn set_filter(&mut self, filter: AdminFilter) {
        self.filter = filter;
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn stats(&self) -> AppointmentStats {
        self.stats
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn info(&self) -> Option<&str> {
        self.info.as_deref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    fn fetch_appointments<T: Transport>(
        &self,
        api: &BookingApi<T>,
    ) -> Result<Vec<Appointment>, ApiError> {
        match &self.filter {
            AdminFilter::All => api.list_appointments(),
            AdminFilter::Status(status) => api.appointments_by_status(*status),
            AdminFilter::Search(keyword) if keyword.trim().is_empty() => api.list_appointments(),
            AdminFilter::Search(keyword) => api.search_appointments(keyword.trim()),
        }
    }

    /// The appointment listing decides the error state. Stats and users are
    /// secondary; their failures are logged and the previous values kept.
    pub fn refresh<T: Transport>(&mut self, api: &BookingApi<T>, now: NaiveDateTime) {
        self.error = None;
        match self.fetch_appointments(api) {
            Ok(list) => {
                self.info = expired_notice(&list, now);
                self.appointments = list;
            }
            Err(e) => {
                tracing::error!(error = %e, filter = ?self.filter, "error fetching appointments");
                self.error = Some("Failed to fetch appointments. Please try again.".to_string());
                return;
            }
        }
        match api.appointment_stats() {
            Ok(stats) => self.stats = stats,
            Err(e) => tracing::warn!(error = %e, "error fetching stats"),
        }
        match api.list_users() {
            Ok(users) => self.users = users,
            Err(e) => tracing::warn!(error = %e, "error fetching users"),
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

    pub fn delete<T: Transport>(
        &mut self,
        api: &BookingApi<T>,
        id: AppointmentId,
        confirm: &mut impl Confirm,
        now: NaiveDateTime,
    ) -> Result<bool, String> {
        if !confirm.confirm(DELETE_PROMPT) {
            return Ok(false);
        }
        match api.delete_appointment(id) {
            Ok(()) => {
                self.refresh(api, now);
                Ok(true)
            }
            Err(e) => {
                tracing::error!(error = %e, appointment_id = id, "error deleting appointment");
                Err(e.display_or("Failed to delete appointment"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStore;
    use crate::testing::{api, appointment_json, user_json, ScriptedTransport};
    use chrono::NaiveDate;
    use serde_json::json;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 15).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn stats_json() -> serde_json::Value {
        json!({"total": 3, "pending": 1, "confirmed": 1, "completed": 1, "cancelled": 0})
    }

    fn script_full_refresh(transport: &ScriptedTransport) {
        transport.ok(json!([
            appointment_json(1, "PENDING", "2030-06-01T09:00:00"),
            appointment_json(2, "CONFIRMED", "2030-07-01T09:00:00"),
        ]));
        transport.ok(stats_json());
        transport.ok(json!([user_json(1, "Jane", "CUSTOMER"), user_json(9, "Root", "ADMIN")]));
    }

    #[test]
    fn only_admins_pass_the_role_check() {
        let anon = Session::rehydrate(MemoryStore::new());
        assert_eq!(authorize(&anon).unwrap_err(), ACCESS_DENIED);

        for (role, allowed) in [("CUSTOMER", false), ("SERVICE_PROVIDER", false), ("ADMIN", true)] {
            let store = MemoryStore::new();
            let user: User = serde_json::from_value(user_json(1, "U", role)).unwrap();
            store.save(&user).unwrap();
            let session = Session::rehydrate(store);
            assert_eq!(authorize(&session).is_ok(), allowed, "{role}");
        }
    }

    #[test]
    fn refresh_loads_listing_stats_and_users() {
        let transport = ScriptedTransport::new();
        script_full_refresh(&transport);
        let mut admin = AdminDashboard::new(AdminFilter::All);

        admin.refresh(&api(&transport), now());

        assert_eq!(
            transport.calls(),
            vec!["GET /v1/appointments", "GET /v1/appointments/stats", "GET /v1/users"]
        );
        assert_eq!(admin.appointments().len(), 2);
        assert_eq!(admin.stats().total, 3);
        assert_eq!(admin.users().len(), 2);
        assert_eq!(
            admin.info(),
            Some("1 expired unconfirmed appointment(s) have been auto-removed.")
        );
    }

    #[test]
    fn filters_select_the_listing_endpoint() {
        let transport = ScriptedTransport::new();
        for _ in 0..3 {
            transport.ok(json!([]));
            transport.ok(stats_json());
            transport.ok(json!([]));
        }
        let a = api(&transport);
        let mut admin = AdminDashboard::new(AdminFilter::Status(AppointmentStatus::Completed));
        admin.refresh(&a, now());
        admin.set_filter(AdminFilter::Search(" dentist ".into()));
        admin.refresh(&a, now());
        admin.set_filter(AdminFilter::Search("   ".into()));
        admin.refresh(&a, now());

        let listings: Vec<String> = transport.calls().into_iter().step_by(3).collect();
        assert_eq!(
            listings,
            vec![
                "GET /v1/appointments/status/COMPLETED",
                "GET /v1/appointments/search?keyword=dentist",
                "GET /v1/appointments",
            ]
        );
    }

    #[test]
    fn secondary_failures_do_not_set_error() {
        let transport = ScriptedTransport::new();
        transport.ok(json!([]));
        transport.fail("stats down");
        transport.rejected(500, "boom");
        let mut admin = AdminDashboard::default();
        admin.refresh(&api(&transport), now());
        assert!(admin.error().is_none());
        assert_eq!(admin.stats(), AppointmentStats::default());
    }

    #[test]
    fn listing_failure_skips_the_rest() {
        let transport = ScriptedTransport::new();
        transport.fail("down");
        let mut admin = AdminDashboard::default();
        admin.refresh(&api(&transport), now());
        assert_eq!(admin.error(), Some("Failed to fetch appointments. Please try again."));
        assert_eq!(transport.calls().len(), 1);
    }

    #[test]
    fn status_change_then_refetch() {
        let transport = ScriptedTransport::new();
        transport.ok(appointment_json(2, "COMPLETED", "2030-07-01T09:00:00"));
        script_full_refresh(&transport);
        let mut admin = AdminDashboard::default();
        admin
            .change_status(&api(&transport), 2, AppointmentStatus::Completed, now())
            .unwrap();
        assert_eq!(transport.calls()[0], "PATCH /v1/appointments/2/status?status=COMPLETED");
        assert_eq!(transport.calls().len(), 4);
    }

    #[test]
    fn status_change_succeeds_on_envelope_without_data() {
        let transport = ScriptedTransport::new();
        transport.respond(200, r#"{"success":true,"message":"Status updated successfully"}"#);
        script_full_refresh(&transport);
        let mut admin = AdminDashboard::default();

        let changed = admin.change_status(&api(&transport), 1, AppointmentStatus::Confirmed, now());

        assert_eq!(changed, Ok(()));
        assert!(admin.error().is_none());
        assert_eq!(transport.calls().len(), 4);
    }

    #[test]
    fn delete_requires_confirmation() {
        let transport = ScriptedTransport::new();
        let mut admin = AdminDashboard::default();
        let sent = admin
            .delete(&api(&transport), 4, &mut |_: &str| false, now())
            .unwrap();
        assert!(!sent);
        assert!(transport.calls().is_empty());

        transport.respond(200, r#"{"success":true,"message":"Appointment deleted successfully"}"#);
        script_full_refresh(&transport);
        let sent = admin
            .delete(&api(&transport), 4, &mut |_: &str| true, now())
            .unwrap();
        assert!(sent);
        assert_eq!(transport.calls()[0], "DELETE /v1/appointments/4");
    }

    #[test]
    fn delete_failure_message() {
        let transport = ScriptedTransport::new();
        transport.respond(404, r#"{"success":false,"message":"Appointment not found with id: 4"}"#);
        transport.fail("reset");
        let mut admin = AdminDashboard::default();
        let a = api(&transport);
        assert_eq!(
            admin.delete(&a, 4, &mut |_: &str| true, now()).unwrap_err(),
            "Appointment not found with id: 4"
        );
        assert_eq!(
            admin.delete(&a, 4, &mut |_: &str| true, now()).unwrap_err(),
            "Failed to delete appointment"
        );
    }
}
