use super::BookingApi;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{Credentials, NewUser, User};

impl<T: Transport> BookingApi<T> {
    pub fn login(&self, email: &str, password: &str) -> Result<User, ApiError> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };
        let req = self.client.build_login(&credentials)?;
        self.client.parse_login(self.send(req)?)
    }

    pub fn register(&self, input: &NewUser) -> Result<User, ApiError> {
        let req = self.client.build_register(input)?;
        self.client.parse_register(self.send(req)?)
    }
}
