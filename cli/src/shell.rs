//! The application shell.
//!
//! `App` owns the session and the API handle. Every command ends by
//! rendering a page: the nav bar, then the view for the route that was
//! actually shown after the login guard ran.

use std::io::{self, BufRead, Write};

use booking_core::views::admin::{self, AdminDashboard, AdminFilter};
use booking_core::views::auth::{LoginForm, RegisterForm};
use booking_core::views::dashboard::{Dashboard, Tab};
use booking_core::views::form::{AppointmentForm, FormFields, FormMode};
use booking_core::views::{nav, Confirm};
use booking_core::{
    AppointmentId, AppointmentStatus, BookingApi, Route, ServiceType, Session, SessionStore,
    Transport,
};
use chrono::{Local, NaiveDateTime};

use crate::error::CliError;
use crate::render;

pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Form values given on the command line. `None` keeps whatever the form
/// loaded.
#[derive(Debug, Clone, Default)]
pub struct FieldInput {
    pub provider: Option<String>,
    pub service: Option<ServiceType>,
    pub at: Option<String>,
    pub notes: Option<String>,
}

impl FieldInput {
    fn is_empty(&self) -> bool {
        self.provider.is_none() && self.service.is_none() && self.at.is_none() && self.notes.is_none()
    }

    fn apply(self, fields: &mut FormFields) {
        if let Some(provider) = self.provider {
            fields.service_provider_id = provider;
        }
        if let Some(service) = self.service {
            fields.service_type = service;
        }
        if let Some(at) = self.at {
            fields.appointment_date_time = at;
        }
        if let Some(notes) = self.notes {
            fields.notes = notes;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminAction {
    Delete(AppointmentId),
    SetStatus(AppointmentId, AppointmentStatus),
}

/// Reads `y`/`yes` from stdin; anything else, including EOF, is a no.
/// `assume_yes` skips the question.
pub struct StdinConfirm {
    pub assume_yes: bool,
}

impl Confirm for StdinConfirm {
    fn confirm(&mut self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{prompt} [y/N] ");
        let _ = io::stderr().flush();
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!(error = %e, "could not read confirmation");
                false
            }
        }
    }
}

pub struct App<S, T> {
    session: Session<S>,
    api: BookingApi<T>,
    clock: fn() -> NaiveDateTime,
}

impl<S: SessionStore, T: Transport> App<S, T> {
    pub fn new(session: Session<S>, api: BookingApi<T>) -> Self {
        Self {
            session,
            api,
            clock: local_now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> NaiveDateTime) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    /// Show the page at a URL path such as `/appointments/edit/3`.
    pub fn open(&mut self, path: &str, out: &mut impl Write) -> Result<(), CliError> {
        self.show(Route::parse(path), out)
    }

    pub fn show(&mut self, route: Route, out: &mut impl Write) -> Result<(), CliError> {
        if !self.enter(route, out)? {
            return Ok(());
        }
        match route {
            Route::Home => render::home(out, self.session.is_authenticated())?,
            Route::Login => render::login_prompt(out)?,
            Route::Register => render::register_prompt(out)?,
            Route::Dashboard => self.dashboard_page(Tab::default(), out)?,
            Route::Admin => self.admin_page(AdminFilter::All, None, &mut |_: &str| false, out)?,
            Route::NewAppointment => self.form_page(FormMode::Create, out)?,
            Route::EditAppointment(id) => self.form_page(FormMode::Edit(id), out)?,
            Route::NotFound => render::not_found(out)?,
        }
        Ok(())
    }

    /// Render the nav bar. Returns false when the guard redirected to the
    /// login page, which has then already been rendered.
    fn enter(&mut self, route: Route, out: &mut impl Write) -> Result<bool, CliError> {
        render::nav(out, &nav::nav_items(&self.session))?;
        let shown = route.guard(&self.session);
        if shown != route {
            render::login_prompt(out)?;
            return Ok(false);
        }
        Ok(true)
    }

    pub fn login(&mut self, email: &str, password: &str, out: &mut impl Write) -> Result<(), CliError> {
        let route = LoginForm::new(email, password)
            .submit(&mut self.session, &self.api)
            .map_err(CliError::Failed)?;
        self.show(route, out)
    }

    pub fn register(&mut self, form: &RegisterForm, out: &mut impl Write) -> Result<(), CliError> {
        let route = form
            .submit(&mut self.session, &self.api)
            .map_err(CliError::Failed)?;
        self.show(route, out)
    }

    pub fn logout(&mut self, out: &mut impl Write) -> Result<(), CliError> {
        let route = nav::logout(&mut self.session);
        self.show(route, out)
    }

    pub fn dashboard(&mut self, tab: Tab, out: &mut impl Write) -> Result<(), CliError> {
        if self.enter(Route::Dashboard, out)? {
            self.dashboard_page(tab, out)?;
        }
        Ok(())
    }

    fn dashboard_page(&self, tab: Tab, out: &mut impl Write) -> Result<(), CliError> {
        let Some(mut dash) = self.session.user().map(Dashboard::new) else {
            return Ok(render::login_prompt(out)?);
        };
        dash.refresh(&self.api, self.now());
        dash.set_tab(tab);
        render::dashboard(out, &dash)?;
        Ok(())
    }

    pub fn cancel(
        &mut self,
        id: AppointmentId,
        confirm: &mut impl Confirm,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        if !self.enter(Route::Dashboard, out)? {
            return Ok(());
        }
        let Some(mut dash) = self.session.user().map(Dashboard::new) else {
            return Ok(());
        };
        let now = self.now();
        if !dash.cancel(&self.api, id, confirm, now).map_err(CliError::Failed)? {
            dash.refresh(&self.api, now);
        }
        render::dashboard(out, &dash)?;
        Ok(())
    }

    pub fn set_status(
        &mut self,
        id: AppointmentId,
        status: AppointmentStatus,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        if !self.enter(Route::Dashboard, out)? {
            return Ok(());
        }
        let Some(mut dash) = self.session.user().map(Dashboard::new) else {
            return Ok(());
        };
        dash.change_status(&self.api, id, status, self.now())
            .map_err(CliError::Failed)?;
        render::dashboard(out, &dash)?;
        Ok(())
    }

    fn form_page(&self, mode: FormMode, out: &mut impl Write) -> Result<(), CliError> {
        let mut form = AppointmentForm::new(mode);
        form.load(&self.api);
        render::form(out, &form, self.now())?;
        Ok(())
    }

    pub fn book(&mut self, input: FieldInput, out: &mut impl Write) -> Result<(), CliError> {
        self.save(FormMode::Create, input, out)
    }

    /// With no field values this only shows the prefilled form.
    pub fn edit(&mut self, id: AppointmentId, input: FieldInput, out: &mut impl Write) -> Result<(), CliError> {
        if input.is_empty() {
            return self.show(Route::EditAppointment(id), out);
        }
        self.save(FormMode::Edit(id), input, out)
    }

    fn save(&mut self, mode: FormMode, input: FieldInput, out: &mut impl Write) -> Result<(), CliError> {
        let route = match mode {
            FormMode::Create => Route::NewAppointment,
            FormMode::Edit(id) => Route::EditAppointment(id),
        };
        let Some(customer_id) = self.session.user().map(|u| u.id) else {
            return self.show(route, out);
        };

        let mut form = AppointmentForm::new(mode);
        form.load(&self.api);
        if let Some(error) = form.error() {
            return Err(CliError::Failed(error.to_string()));
        }
        input.apply(&mut form.fields);
        form.fields.check_constraints(self.now())?;

        let next = form.submit(&self.api, customer_id).map_err(CliError::Failed)?;
        self.show(next, out)
    }

    pub fn admin(
        &mut self,
        filter: AdminFilter,
        action: Option<AdminAction>,
        confirm: &mut impl Confirm,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        if self.enter(Route::Admin, out)? {
            self.admin_page(filter, action, confirm, out)?;
        }
        Ok(())
    }

    fn admin_page(
        &self,
        filter: AdminFilter,
        action: Option<AdminAction>,
        confirm: &mut impl Confirm,
        out: &mut impl Write,
    ) -> Result<(), CliError> {
        if let Err(denied) = admin::authorize(&self.session) {
            render::access_denied(out, denied)?;
            return Ok(());
        }
        let now = self.now();
        let mut view = AdminDashboard::new(filter);
        match action {
            None => view.refresh(&self.api, now),
            Some(AdminAction::SetStatus(id, status)) => view
                .change_status(&self.api, id, status, now)
                .map_err(CliError::Failed)?,
            Some(AdminAction::Delete(id)) => {
                if !view.delete(&self.api, id, confirm, now).map_err(CliError::Failed)? {
                    view.refresh(&self.api, now);
                }
            }
        }
        render::admin(out, &view)?;
        Ok(())
    }

    pub fn providers(&self, out: &mut impl Write) -> Result<(), CliError> {
        let providers = self.api.list_providers().map_err(|e| {
            tracing::error!(error = %e, "error fetching providers");
            CliError::Failed(e.display_or("Failed to fetch service providers"))
        })?;
        render::providers(out, &providers)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use booking_core::{ApiError, BookingClient, HttpRequest, HttpResponse, MemoryStore};
    use chrono::NaiveDate;
    use serde_json::{json, Value};

    use super::*;

    /// Replays canned `(status, body)` pairs and records `"METHOD path"`.
    #[derive(Default)]
    struct Canned {
        replies: RefCell<VecDeque<(u16, String)>>,
        seen: RefCell<Vec<String>>,
    }

    impl Canned {
        fn ok(self, data: Value) -> Self {
            let body = json!({"success": true, "message": "ok", "data": data}).to_string();
            self.replies.borrow_mut().push_back((200, body));
            self
        }

        fn seen(&self) -> Vec<String> {
            self.seen.borrow().clone()
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let path = request.path.trim_start_matches("http://backend.test/api").to_string();
            self.seen.borrow_mut().push(format!("{} {path}", request.method));
            match self.replies.borrow_mut().pop_front() {
                Some((status, body)) => Ok(HttpResponse::new(status, body)),
                None => Err(ApiError::Transport(format!("no reply for {path}"))),
            }
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2030, 6, 15).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn user(id: i64, name: &str, role: &str) -> Value {
        json!({"id": id, "name": name, "email": format!("{}@example.com", name.to_lowercase()), "role": role})
    }

    fn appointment(id: i64, status: &str, at: &str) -> Value {
        json!({
            "id": id,
            "customerId": 1,
            "customerName": "Jane",
            "serviceProviderId": 2,
            "serviceProviderName": "Lee",
            "serviceType": "DENTIST",
            "appointmentDateTime": at,
            "notes": "",
            "status": status
        })
    }

    fn app(transport: &Canned, signed_in: Option<Value>) -> App<MemoryStore, &Canned> {
        let store = match signed_in {
            Some(user) => MemoryStore::with_raw(json!({ "user": user }).to_string()),
            None => MemoryStore::new(),
        };
        let api = BookingApi::new(BookingClient::new("http://backend.test/api"), transport);
        App::new(Session::rehydrate(store), api).with_clock(now)
    }

    fn run(f: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn protected_path_redirects_anonymous_user_to_login() {
        let transport = Canned::default();
        let mut app = app(&transport, None);

        let out = run(|o| app.open("/dashboard", o));
        assert!(out.contains("Login  |  Sign Up"));
        assert!(out.contains("booking login --email"));
        assert!(transport.seen().is_empty());
    }

    #[test]
    fn unknown_path_is_not_found() {
        let transport = Canned::default();
        let mut app = app(&transport, None);
        assert!(run(|o| app.open("/nope", o)).contains("404 - Page Not Found"));
    }

    #[test]
    fn login_lands_on_the_dashboard() {
        let transport = Canned::default()
            .ok(user(1, "Jane", "CUSTOMER"))
            .ok(json!([appointment(5, "PENDING", "2030-07-01T10:00:00")]))
            .ok(json!([appointment(5, "PENDING", "2030-07-01T10:00:00")]));
        let mut app = app(&transport, None);

        let out = run(|o| app.login("jane@example.com", "pw", o));
        assert!(app.session().is_authenticated());
        assert!(out.contains("Hello, Jane"));
        assert!(out.contains("My Appointments"));
        assert!(out.contains("#5"));
        assert_eq!(
            transport.seen(),
            vec![
                "POST /auth/login",
                "GET /v1/appointments/customer/1",
                "GET /v1/appointments/customer/1/upcoming",
            ]
        );
    }

    #[test]
    fn declined_cancel_sends_no_update() {
        let transport = Canned::default().ok(json!([])).ok(json!([]));
        let mut app = app(&transport, Some(user(1, "Jane", "CUSTOMER")));

        run(|o| app.cancel(5, &mut |_: &str| false, o));
        assert!(transport.seen().iter().all(|c| !c.starts_with("PATCH")));
    }

    #[test]
    fn non_admin_sees_access_denied() {
        let transport = Canned::default();
        let mut app = app(&transport, Some(user(1, "Jane", "CUSTOMER")));

        let out = run(|o| app.admin(AdminFilter::All, None, &mut |_: &str| true, o));
        assert!(out.contains(admin::ACCESS_DENIED));
        assert!(transport.seen().is_empty());
    }

    #[test]
    fn booking_too_soon_is_rejected_before_submit() {
        let transport = Canned::default().ok(json!([user(2, "Lee", "SERVICE_PROVIDER")]));
        let mut app = app(&transport, Some(user(1, "Jane", "CUSTOMER")));
        let input = FieldInput {
            provider: Some("2".into()),
            at: Some("2030-06-15T13:00".into()),
            ..FieldInput::default()
        };

        let mut buf = Vec::new();
        let err = app.book(input, &mut buf).unwrap_err();
        assert!(matches!(err, CliError::Invalid(_)));
        assert_eq!(transport.seen(), vec!["GET /v1/users/providers"]);
    }

    #[test]
    fn logout_returns_to_login() {
        let transport = Canned::default();
        let mut app = app(&transport, Some(user(1, "Jane", "CUSTOMER")));

        let out = run(|o| app.logout(o));
        assert!(!app.session().is_authenticated());
        assert!(out.contains("booking login --email"));
    }
}
