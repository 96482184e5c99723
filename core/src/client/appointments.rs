use chrono::NaiveDateTime;

use super::{query, BookingClient};
use crate::envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{
    Appointment, AppointmentId, AppointmentRequest, AppointmentStats, AppointmentStatus, UserId,
};

const ISO_SECONDS: &str = "%Y-%m-%dT%H:%M:%S";

impl BookingClient {
    pub fn build_list_appointments(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/v1/appointments")
    }

    pub fn build_get_appointment(&self, id: AppointmentId) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/v1/appointments/{id}"))
    }

    pub fn build_create_appointment(&self, input: &AppointmentRequest) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/v1/appointments", input)
    }

    pub fn build_update_appointment(
        &self,
        id: AppointmentId,
        input: &AppointmentRequest,
    ) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, &format!("/v1/appointments/{id}"), input)
    }

    pub fn build_delete_appointment(&self, id: AppointmentId) -> HttpRequest {
        self.bare(HttpMethod::Delete, &format!("/v1/appointments/{id}"))
    }

    pub fn build_appointments_by_customer(&self, customer_id: UserId) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/v1/appointments/customer/{customer_id}"))
    }

    pub fn build_upcoming_appointments(&self, customer_id: UserId) -> HttpRequest {
        self.bare(
            HttpMethod::Get,
            &format!("/v1/appointments/customer/{customer_id}/upcoming"),
        )
    }

    pub fn build_appointments_by_provider(&self, provider_id: UserId) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/v1/appointments/provider/{provider_id}"))
    }

    pub fn build_appointments_by_status(&self, status: AppointmentStatus) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/v1/appointments/status/{status}"))
    }

    pub fn build_appointments_in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> HttpRequest {
        let start = start.format(ISO_SECONDS).to_string();
        let end = end.format(ISO_SECONDS).to_string();
        self.bare(
            HttpMethod::Get,
            &format!(
                "/v1/appointments/date-range?{}&{}",
                query("start", &start),
                query("end", &end)
            ),
        )
    }

    /// The target status travels in the query string; the body is empty.
    pub fn build_update_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> HttpRequest {
        self.bare(
            HttpMethod::Patch,
            &format!("/v1/appointments/{id}/status?{}", query("status", status.as_str())),
        )
    }

    pub fn build_search_appointments(&self, keyword: &str) -> HttpRequest {
        self.bare(
            HttpMethod::Get,
            &format!("/v1/appointments/search?{}", query("keyword", keyword)),
        )
    }

    pub fn build_appointment_stats(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/v1/appointments/stats")
    }

    pub fn parse_appointment(&self, response: HttpResponse) -> Result<Appointment, ApiError> {
        envelope::decode(response)
    }

    /// Create, update and status changes succeed on `success` alone; the
    /// saved record is returned when the backend includes it.
    pub fn parse_saved_appointment(
        &self,
        response: HttpResponse,
    ) -> Result<Option<Appointment>, ApiError> {
        envelope::decode_optional(response)
    }

    /// A null `data` on a listing means "nothing to show".
    pub fn parse_appointment_list(&self, response: HttpResponse) -> Result<Vec<Appointment>, ApiError> {
        Ok(envelope::decode_optional(response)?.unwrap_or_default())
    }

    pub fn parse_appointment_deleted(&self, response: HttpResponse) -> Result<(), ApiError> {
        envelope::decode_optional::<serde_json::Value>(response).map(|_| ())
    }

    pub fn parse_stats(&self, response: HttpResponse) -> Result<AppointmentStats, ApiError> {
        envelope::decode(response)
    }
}
