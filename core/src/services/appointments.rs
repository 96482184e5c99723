use chrono::NaiveDateTime;

use super::BookingApi;
use crate::error::ApiError;
use crate::http::Transport;
use crate::types::{
    Appointment, AppointmentId, AppointmentRequest, AppointmentStats, AppointmentStatus, UserId,
};

impl<T: Transport> BookingApi<T> {
    pub fn list_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        let req = self.client.build_list_appointments();
        self.client.parse_appointment_list(self.send(req)?)
    }

    pub fn get_appointment(&self, id: AppointmentId) -> Result<Appointment, ApiError> {
        let req = self.client.build_get_appointment(id);
        self.client.parse_appointment(self.send(req)?)
    }

    pub fn create_appointment(
        &self,
        input: &AppointmentRequest,
    ) -> Result<Option<Appointment>, ApiError> {
        let req = self.client.build_create_appointment(input)?;
        self.client.parse_saved_appointment(self.send(req)?)
    }

    pub fn update_appointment(
        &self,
        id: AppointmentId,
        input: &AppointmentRequest,
    ) -> Result<Option<Appointment>, ApiError> {
        let req = self.client.build_update_appointment(id, input)?;
        self.client.parse_saved_appointment(self.send(req)?)
    }

    pub fn delete_appointment(&self, id: AppointmentId) -> Result<(), ApiError> {
        let req = self.client.build_delete_appointment(id);
        self.client.parse_appointment_deleted(self.send(req)?)
    }

    pub fn appointments_by_customer(&self, customer_id: UserId) -> Result<Vec<Appointment>, ApiError> {
        let req = self.client.build_appointments_by_customer(customer_id);
        self.client.parse_appointment_list(self.send(req)?)
    }

    pub fn upcoming_appointments(&self, customer_id: UserId) -> Result<Vec<Appointment>, ApiError> {
        let req = self.client.build_upcoming_appointments(customer_id);
        self.client.parse_appointment_list(self.send(req)?)
    }

    pub fn appointments_by_provider(&self, provider_id: UserId) -> Result<Vec<Appointment>, ApiError> {
        let req = self.client.build_appointments_by_provider(provider_id);
        self.client.parse_appointment_list(self.send(req)?)
    }

    pub fn appointments_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, ApiError> {
        let req = self.client.build_appointments_by_status(status);
        self.client.parse_appointment_list(self.send(req)?)
    }

    pub fn appointments_in_range(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Appointment>, ApiError> {
        let req = self.client.build_appointments_in_range(start, end);
        self.client.parse_appointment_list(self.send(req)?)
    }

    pub fn update_appointment_status(
        &self,
        id: AppointmentId,
        status: AppointmentStatus,
    ) -> Result<Option<Appointment>, ApiError> {
        let req = self.client.build_update_appointment_status(id, status);
        self.client.parse_saved_appointment(self.send(req)?)
    }

    pub fn search_appointments(&self, keyword: &str) -> Result<Vec<Appointment>, ApiError> {
        let req = self.client.build_search_appointments(keyword);
        self.client.parse_appointment_list(self.send(req)?)
    }

    pub fn appointment_stats(&self) -> Result<AppointmentStats, ApiError> {
        let req = self.client.build_appointment_stats();
        self.client.parse_stats(self.send(req)?)
    }
}
