use super::{query, segment, BookingClient};
use crate::envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{NewUser, UpdateUser, User, UserId};

impl BookingClient {
    pub fn build_list_users(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/v1/users")
    }

    pub fn build_get_user(&self, id: UserId) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/v1/users/{id}"))
    }

    pub fn build_get_user_by_email(&self, email: &str) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/v1/users/email/{}", segment(email)))
    }

    pub fn build_list_providers(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/v1/users/providers")
    }

    pub fn build_search_users(&self, name: &str) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/v1/users/search?{}", query("name", name)))
    }

    pub fn build_create_user(&self, input: &NewUser) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/v1/users", input)
    }

    pub fn build_update_user(&self, id: UserId, input: &UpdateUser) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, &format!("/v1/users/{id}"), input)
    }

    pub fn build_delete_user(&self, id: UserId) -> HttpRequest {
        self.bare(HttpMethod::Delete, &format!("/v1/users/{id}"))
    }

    pub fn parse_user(&self, response: HttpResponse) -> Result<User, ApiError> {
        envelope::decode(response)
    }

    pub fn parse_user_list(&self, response: HttpResponse) -> Result<Vec<User>, ApiError> {
        Ok(envelope::decode_optional(response)?.unwrap_or_default())
    }

    pub fn parse_user_deleted(&self, response: HttpResponse) -> Result<(), ApiError> {
        envelope::decode_optional::<serde_json::Value>(response).map(|_| ())
    }
}
