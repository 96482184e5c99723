//! Wire DTOs for the booking API.
//!
//! # Design
//! These mirror the backend's JSON (camelCase fields, SCREAMING_SNAKE_CASE
//! enums) but are defined independently of the mock-server crate;
//! integration tests catch schema drift. Date-times are naive local times,
//! which is what the backend stores.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub type UserId = i64;
pub type AppointmentId = i64;

/// Account role. Closed set; branch on it with an exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Customer,
    ServiceProvider,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::ServiceProvider => "SERVICE_PROVIDER",
            Role::Admin => "ADMIN",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "CUSTOMER" => Ok(Role::Customer),
            "SERVICE_PROVIDER" | "PROVIDER" => Ok(Role::ServiceProvider),
            "ADMIN" => Ok(Role::Admin),
            other => Err(format!(
                "invalid role: {other} (expected CUSTOMER, SERVICE_PROVIDER or ADMIN)"
            )),
        }
    }
}

/// A user record as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

/// Payload for `POST /users` and `POST /v1/users`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Payload for `PUT /v1/users/{id}`. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

/// Payload for `POST /auth/login`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// The kind of service an appointment is booked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceType {
    #[default]
    Doctor,
    Dentist,
    Barber,
    Salon,
    Consultant,
    Therapist,
    Lawyer,
    Mechanic,
    Other,
}

impl ServiceType {
    pub const ALL: [ServiceType; 9] = [
        ServiceType::Doctor,
        ServiceType::Dentist,
        ServiceType::Barber,
        ServiceType::Salon,
        ServiceType::Consultant,
        ServiceType::Therapist,
        ServiceType::Lawyer,
        ServiceType::Mechanic,
        ServiceType::Other,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ServiceType::Doctor => "DOCTOR",
            ServiceType::Dentist => "DENTIST",
            ServiceType::Barber => "BARBER",
            ServiceType::Salon => "SALON",
            ServiceType::Consultant => "CONSULTANT",
            ServiceType::Therapist => "THERAPIST",
            ServiceType::Lawyer => "LAWYER",
            ServiceType::Mechanic => "MECHANIC",
            ServiceType::Other => "OTHER",
        }
    }

    /// Human-readable label shown in the service select.
    pub fn label(self) -> &'static str {
        match self {
            ServiceType::Doctor => "Medical Consultation",
            ServiceType::Dentist => "Dental Check-up",
            ServiceType::Barber => "Haircut & Styling",
            ServiceType::Salon => "Beauty Services",
            ServiceType::Consultant => "Business Consultation",
            ServiceType::Therapist => "Therapy Session",
            ServiceType::Lawyer => "Legal Consultation",
            ServiceType::Mechanic => "Vehicle Service",
            ServiceType::Other => "Other Services",
        }
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ServiceType::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| format!("invalid service type: {s}"))
    }
}

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    #[default]
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub const ALL: [AppointmentStatus; 4] = [
        AppointmentStatus::Pending,
        AppointmentStatus::Confirmed,
        AppointmentStatus::Completed,
        AppointmentStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "PENDING",
            AppointmentStatus::Confirmed => "CONFIRMED",
            AppointmentStatus::Completed => "COMPLETED",
            AppointmentStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        AppointmentStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == upper)
            .ok_or_else(|| format!("invalid status: {s}"))
    }
}

/// An appointment as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: AppointmentId,
    pub customer_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    pub service_provider_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_provider_email: Option<String>,
    pub service_type: ServiceType,
    pub appointment_date_time: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: AppointmentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<NaiveDateTime>,
}

/// Payload for creating or updating an appointment.
///
/// `appointment_date_time` stays a string: the form hands it over as typed,
/// after seconds normalisation, and the backend does the parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    pub customer_id: UserId,
    pub service_provider_id: UserId,
    pub service_type: ServiceType,
    pub appointment_date_time: String,
    pub notes: String,
}

/// Aggregate counts from `GET /v1/appointments/stats`.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppointmentStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub pending: u64,
    #[serde(default)]
    pub confirmed: u64,
    #[serde(default)]
    pub completed: u64,
    #[serde(default)]
    pub cancelled: u64,
}
