//! Scripted in-memory transport and fixtures for unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use serde_json::{json, Value};

use crate::client::BookingClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::services::BookingApi;

pub(crate) const BASE_URL: &str = "http://backend.test/api";

/// Replays queued responses in order and records every request it sees.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, body: impl Into<String>) -> &Self {
        self.responses
            .borrow_mut()
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub(crate) fn ok(&self, data: Value) -> &Self {
        self.respond(200, envelope_ok(data))
    }

    pub(crate) fn rejected(&self, status: u16, message: &str) -> &Self {
        self.respond(
            status,
            json!({"success": false, "message": message, "data": null}).to_string(),
        )
    }

    pub(crate) fn fail(&self, reason: &str) -> &Self {
        self.responses
            .borrow_mut()
            .push_back(Err(ApiError::Transport(reason.to_string())));
        self
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    /// `"METHOD path"` for each recorded request, with the base URL removed.
    pub(crate) fn calls(&self) -> Vec<String> {
        self.requests
            .borrow()
            .iter()
            .map(|r| format!("{} {}", r.method, r.path.trim_start_matches(BASE_URL)))
            .collect()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let next = self.responses.borrow_mut().pop_front();
        let described = format!("{} {}", request.method, request.path);
        self.requests.borrow_mut().push(request);
        match next {
            Some(result) => result,
            None => panic!("unscripted request: {described}"),
        }
    }
}

pub(crate) fn api(transport: &ScriptedTransport) -> BookingApi<&ScriptedTransport> {
    BookingApi::new(BookingClient::new(BASE_URL), transport)
}

pub(crate) fn envelope_ok(data: Value) -> String {
    json!({"success": true, "message": "ok", "data": data}).to_string()
}

pub(crate) fn user_json(id: i64, name: &str, role: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        "role": role,
        "active": true
    })
}

pub(crate) fn appointment_json(id: i64, status: &str, date_time: &str) -> Value {
    json!({
        "id": id,
        "customerId": 1,
        "customerName": "Jane Customer",
        "serviceProviderId": 2,
        "serviceProviderName": "Dr. Provider",
        "serviceType": "DOCTOR",
        "appointmentDateTime": date_time,
        "notes": "",
        "status": status
    })
}
