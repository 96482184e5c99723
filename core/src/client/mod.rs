//! Stateless HTTP request builder and response parser for the booking API.
//!
//! # Design
//! `BookingClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method producing an
//! `HttpRequest` and a `parse_*` method consuming the `HttpResponse`. The
//! endpoint groups live in submodules mirroring the backend controllers.

mod appointments;
mod auth;
mod users;

use serde::Serialize;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};

const JSON: &str = "application/json";

/// Synchronous, stateless client for the booking API.
#[derive(Debug, Clone)]
pub struct BookingClient {
    base_url: String,
}

impl BookingClient {
    /// `base_url` includes the API prefix, e.g. `http://localhost:8080/api`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn bare(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            path: format!("{}{path}", self.base_url),
            headers: vec![("accept".to_string(), JSON.to_string())],
            body: None,
        }
    }

    fn with_json<B: Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        let mut req = self.bare(method, path);
        req.headers.push(("content-type".to_string(), JSON.to_string()));
        req.body = Some(body);
        Ok(req)
    }
}

/// `key=value` with form-urlencoding applied to the value.
fn query(key: &str, value: &str) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .append_pair(key, value)
        .finish()
}

/// Percent-encode a value as a single path segment: a space becomes `%20`
/// and `/` becomes `%2F`.
fn segment(value: &str) -> String {
    let Ok(mut url) = url::Url::parse("http://segment.invalid/") else {
        return value.to_string();
    };
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push(value);
    }
    url.path().trim_start_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use crate::types::{
        AppointmentRequest, AppointmentStatus, Credentials, NewUser, Role, ServiceType, UpdateUser,
    };
    use chrono::NaiveDate;

    fn client() -> BookingClient {
        BookingClient::new("http://localhost:8080/api")
    }

    fn body_json(req: &HttpRequest) -> serde_json::Value {
        serde_json::from_str(req.body.as_deref().unwrap()).unwrap()
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let req = BookingClient::new("http://localhost:8080/api/").build_list_appointments();
        assert_eq!(req.path, "http://localhost:8080/api/v1/appointments");
    }

    #[test]
    fn every_request_accepts_json() {
        let req = client().build_list_users();
        assert_eq!(req.header("Accept"), Some("application/json"));
        assert!(req.header("content-type").is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn build_login_posts_credentials() {
        let req = client()
            .build_login(&Credentials {
                email: "jane@example.com".into(),
                password: "secret".into(),
            })
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "http://localhost:8080/api/auth/login");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let body = body_json(&req);
        assert_eq!(body["email"], "jane@example.com");
        assert_eq!(body["password"], "secret");
    }

    #[test]
    fn register_and_admin_create_hit_different_paths() {
        let input = NewUser {
            name: "Jane".into(),
            email: "jane@example.com".into(),
            password: "pw".into(),
            phone: None,
            role: Some(Role::Customer),
        };
        let register = client().build_register(&input).unwrap();
        let create = client().build_create_user(&input).unwrap();
        assert_eq!(register.path, "http://localhost:8080/api/users");
        assert_eq!(create.path, "http://localhost:8080/api/v1/users");
        assert_eq!(body_json(&register)["role"], "CUSTOMER");
        assert!(body_json(&register).get("phone").is_none());
    }

    #[test]
    fn build_update_user_omits_unset_fields() {
        let input = UpdateUser {
            phone: Some("555-0100".into()),
            ..UpdateUser::default()
        };
        let req = client().build_update_user(4, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "http://localhost:8080/api/v1/users/4");
        let body = body_json(&req);
        assert_eq!(body["phone"], "555-0100");
        assert!(body.get("name").is_none());
    }

    #[test]
    fn user_lookup_paths() {
        let c = client();
        assert_eq!(c.build_get_user(9).path, "http://localhost:8080/api/v1/users/9");
        assert_eq!(c.build_list_providers().path, "http://localhost:8080/api/v1/users/providers");
        assert_eq!(c.build_delete_user(9).method, HttpMethod::Delete);
        assert_eq!(
            c.build_get_user_by_email("a+b@x.io").path,
            "http://localhost:8080/api/v1/users/email/a+b@x.io"
        );
    }

    #[test]
    fn email_segment_uses_path_encoding() {
        let c = client();
        assert_eq!(
            c.build_get_user_by_email("jane doe@x.io").path,
            "http://localhost:8080/api/v1/users/email/jane%20doe@x.io"
        );
        assert_eq!(
            c.build_get_user_by_email("a/b@x.io").path,
            "http://localhost:8080/api/v1/users/email/a%2Fb@x.io"
        );
    }

    #[test]
    fn search_queries_are_encoded() {
        let c = client();
        assert_eq!(
            c.build_search_users("Dr. Who").path,
            "http://localhost:8080/api/v1/users/search?name=Dr.+Who"
        );
        assert_eq!(
            c.build_search_appointments("a&b").path,
            "http://localhost:8080/api/v1/appointments/search?keyword=a%26b"
        );
    }

    #[test]
    fn filtered_listing_paths() {
        let c = client();
        assert_eq!(
            c.build_appointments_by_customer(3).path,
            "http://localhost:8080/api/v1/appointments/customer/3"
        );
        assert_eq!(
            c.build_upcoming_appointments(3).path,
            "http://localhost:8080/api/v1/appointments/customer/3/upcoming"
        );
        assert_eq!(
            c.build_appointments_by_provider(5).path,
            "http://localhost:8080/api/v1/appointments/provider/5"
        );
        assert_eq!(
            c.build_appointments_by_status(AppointmentStatus::Confirmed).path,
            "http://localhost:8080/api/v1/appointments/status/CONFIRMED"
        );
        assert_eq!(c.build_appointment_stats().path, "http://localhost:8080/api/v1/appointments/stats");
    }

    #[test]
    fn date_range_uses_iso_timestamps() {
        let start = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
        let end = NaiveDate::from_ymd_opt(2030, 1, 31).unwrap().and_hms_opt(23, 59, 0).unwrap();
        let req = client().build_appointments_in_range(start, end);
        assert_eq!(
            req.path,
            "http://localhost:8080/api/v1/appointments/date-range?start=2030-01-01T00%3A00%3A00&end=2030-01-31T23%3A59%3A00"
        );
    }

    #[test]
    fn status_transition_is_patch_with_query() {
        let req = client().build_update_appointment_status(12, AppointmentStatus::Cancelled);
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(
            req.path,
            "http://localhost:8080/api/v1/appointments/12/status?status=CANCELLED"
        );
        assert!(req.body.is_none());
    }

    #[test]
    fn create_and_update_appointment_carry_payload() {
        let input = AppointmentRequest {
            customer_id: 1,
            service_provider_id: 2,
            service_type: ServiceType::Therapist,
            appointment_date_time: "2030-05-05T14:00:00".into(),
            notes: "first visit".into(),
        };
        let create = client().build_create_appointment(&input).unwrap();
        assert_eq!(create.method, HttpMethod::Post);
        assert_eq!(create.path, "http://localhost:8080/api/v1/appointments");
        let update = client().build_update_appointment(8, &input).unwrap();
        assert_eq!(update.method, HttpMethod::Put);
        assert_eq!(update.path, "http://localhost:8080/api/v1/appointments/8");
        assert_eq!(body_json(&update)["serviceType"], "THERAPIST");
    }

    #[test]
    fn parse_appointment_list_unwraps_envelope() {
        let body = r#"{"success":true,"message":"Customer appointments retrieved","data":[
            {"id":1,"customerId":1,"serviceProviderId":2,"serviceType":"DOCTOR",
             "appointmentDateTime":"2030-01-01T10:00:00","status":"PENDING"}]}"#;
        let list = client().parse_appointment_list(HttpResponse::new(200, body)).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].status, AppointmentStatus::Pending);
    }

    #[test]
    fn parse_appointment_list_treats_null_data_as_empty() {
        let body = r#"{"success":true,"message":"Customer appointments retrieved","data":null}"#;
        let list = client().parse_appointment_list(HttpResponse::new(200, body)).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn parse_deleted_accepts_null_data() {
        let body = r#"{"success":true,"message":"Appointment deleted successfully","data":null}"#;
        assert!(client().parse_appointment_deleted(HttpResponse::new(200, body)).is_ok());
    }

    #[test]
    fn parse_saved_appointment_accepts_missing_data() {
        let body = r#"{"success":true,"message":"Status updated successfully"}"#;
        let saved = client().parse_saved_appointment(HttpResponse::new(200, body)).unwrap();
        assert!(saved.is_none());
    }

    #[test]
    fn parse_login_soft_failure() {
        let body = r#"{"success":false,"message":"Invalid email or password","data":null}"#;
        let err = client().parse_login(HttpResponse::new(200, body)).unwrap_err();
        assert!(err.is_soft_rejection());
        assert_eq!(err.message(), Some("Invalid email or password"));
    }
}
