use super::BookingApi;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{NewUser, UpdateUser, User, UserId};

impl<T: Transport> BookingApi<T> {
    pub fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let req = self.client.build_list_users();
        self.client.parse_user_list(self.send(req)?)
    }

    pub fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        let req = self.client.build_get_user(id);
        self.client.parse_user(self.send(req)?)
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<User, ApiError> {
        let req = self.client.build_get_user_by_email(email);
        self.client.parse_user(self.send(req)?)
    }

    pub fn list_providers(&self) -> Result<Vec<User>, ApiError> {
        let req = self.client.build_list_providers();
        self.client.parse_user_list(self.send(req)?)
    }

    pub fn search_users(&self, name: &str) -> Result<Vec<User>, ApiError> {
        let req = self.client.build_search_users(name);
        self.client.parse_user_list(self.send(req)?)
    }

    pub fn create_user(&self, input: &NewUser) -> Result<User, ApiError> {
        let req = self.client.build_create_user(input)?;
        self.client.parse_user(self.send(req)?)
    }

    pub fn update_user(&self, id: UserId, input: &UpdateUser) -> Result<User, ApiError> {
        let req = self.client.build_update_user(id, input)?;
        self.client.parse_user(self.send(req)?)
    }

    pub fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let req = self.client.build_delete_user(id);
        self.client.parse_user_deleted(self.send(req)?)
    }
}
