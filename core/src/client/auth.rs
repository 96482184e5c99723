use super::BookingClient;
use crate::envelope;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Credentials, NewUser, User};

impl BookingClient {
    pub fn build_login(&self, credentials: &Credentials) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/auth/login", credentials)
    }

    /// Public self-registration.
    pub fn build_register(&self, input: &NewUser) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/users", input)
    }

    /// Bad credentials come back as a 2xx envelope with `success: false`.
    pub fn parse_login(&self, response: HttpResponse) -> Result<User, ApiError> {
        envelope::decode(response)
    }

    pub fn parse_register(&self, response: HttpResponse) -> Result<User, ApiError> {
        envelope::decode(response)
    }
}
