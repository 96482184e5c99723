//! In-memory users and appointments with the backend's business rules.
//!
//! Every operation takes `now` from the caller so the rules that depend on
//! the clock can be tested without one.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    #[default]
    Customer,
    ServiceProvider,
    Admin,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Status::Pending => "PENDING",
            Status::Confirmed => "CONFIRMED",
            Status::Completed => "COMPLETED",
            Status::Cancelled => "CANCELLED",
        })
    }
}

impl FromStr for Status {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Status::Pending),
            "CONFIRMED" => Ok(Status::Confirmed),
            "COMPLETED" => Ok(Status::Completed),
            "CANCELLED" => Ok(Status::Cancelled),
            other => Err(StoreError::BadRequest(format!("Invalid status value: {other}"))),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
    pub active: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub phone: Option<String>,
    pub role: Option<Role>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentInput {
    pub customer_id: i64,
    pub service_provider_id: i64,
    pub service_type: String,
    pub appointment_date_time: NaiveDateTime,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Appointment as returned on the wire, with both parties resolved.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub service_provider_id: i64,
    pub service_provider_name: Option<String>,
    pub service_provider_email: Option<String>,
    pub service_type: String,
    pub appointment_date_time: NaiveDateTime,
    pub notes: Option<String>,
    pub status: Status,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Stats {
    pub total: usize,
    pub pending: usize,
    pub confirmed: usize,
    pub completed: usize,
    pub cancelled: usize,
}

#[derive(Clone, Debug)]
struct Account {
    user: User,
    password: String,
}

#[derive(Clone, Debug)]
struct Booking {
    id: i64,
    customer_id: i64,
    provider_id: i64,
    service_type: String,
    at: NaiveDateTime,
    notes: Option<String>,
    status: Status,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

#[derive(Debug, Default)]
pub struct Store {
    accounts: BTreeMap<i64, Account>,
    bookings: BTreeMap<i64, Booking>,
    next_user: i64,
    next_booking: i64,
}

fn required(value: Option<String>, field: &str) -> Result<String, StoreError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| StoreError::BadRequest(format!("{field} is required")))
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // --- users ---

    pub fn create_user(&mut self, input: UserInput, now: NaiveDateTime) -> Result<User, StoreError> {
        let name = required(input.name, "Name")?;
        let email = required(input.email, "Email")?;
        let password = required(input.password, "Password")?;
        if self.find_by_email(&email).is_some() {
            return Err(StoreError::BadRequest(format!("Email already registered: {email}")));
        }

        self.next_user += 1;
        let user = User {
            id: self.next_user,
            name,
            email,
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            role: input.role.unwrap_or_default(),
            active: true,
            created_at: now,
        };
        self.accounts.insert(user.id, Account { user: user.clone(), password });
        Ok(user)
    }

    pub fn users(&self) -> Vec<User> {
        self.accounts.values().map(|a| a.user.clone()).collect()
    }

    pub fn user(&self, id: i64) -> Result<User, StoreError> {
        self.accounts
            .get(&id)
            .map(|a| a.user.clone())
            .ok_or_else(|| StoreError::NotFound(format!("User not found with id: {id}")))
    }

    pub fn user_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.find_by_email(email)
            .map(|a| a.user.clone())
            .ok_or_else(|| StoreError::NotFound(format!("User not found with email: {email}")))
    }

    pub fn providers(&self) -> Vec<User> {
        self.accounts
            .values()
            .filter(|a| a.user.active && a.user.role == Role::ServiceProvider)
            .map(|a| a.user.clone())
            .collect()
    }

    pub fn search_users(&self, name: &str) -> Vec<User> {
        let needle = name.to_lowercase();
        self.accounts
            .values()
            .filter(|a| a.user.name.to_lowercase().contains(&needle))
            .map(|a| a.user.clone())
            .collect()
    }

    pub fn update_user(&mut self, id: i64, input: UserInput) -> Result<User, StoreError> {
        if let Some(email) = &input.email {
            let taken = self.find_by_email(email).is_some_and(|a| a.user.id != id);
            if taken {
                return Err(StoreError::BadRequest(format!("Email already in use: {email}")));
            }
        }
        let account = self
            .accounts
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("User not found".to_string()))?;
        if let Some(name) = input.name {
            account.user.name = name;
        }
        if let Some(email) = input.email {
            account.user.email = email;
        }
        if let Some(password) = input.password {
            account.password = password;
        }
        if let Some(phone) = input.phone {
            account.user.phone = Some(phone);
        }
        if let Some(role) = input.role {
            account.user.role = role;
        }
        Ok(account.user.clone())
    }

    pub fn delete_user(&mut self, id: i64) -> Result<(), StoreError> {
        self.accounts
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("User not found with id: {id}")))
    }

    /// `None` is a wrong email or password, which the login endpoint reports
    /// inside a successful response.
    pub fn authenticate(&self, email: &str, password: &str) -> Option<User> {
        self.find_by_email(email)
            .filter(|a| a.password == password)
            .map(|a| a.user.clone())
    }

    fn find_by_email(&self, email: &str) -> Option<&Account> {
        self.accounts.values().find(|a| a.user.email == email)
    }

    // --- appointments ---

    fn render(&self, b: &Booking) -> Appointment {
        let customer = self.accounts.get(&b.customer_id).map(|a| &a.user);
        let provider = self.accounts.get(&b.provider_id).map(|a| &a.user);
        Appointment {
            id: b.id,
            customer_id: b.customer_id,
            customer_name: customer.map(|u| u.name.clone()),
            customer_email: customer.map(|u| u.email.clone()),
            service_provider_id: b.provider_id,
            service_provider_name: provider.map(|u| u.name.clone()),
            service_provider_email: provider.map(|u| u.email.clone()),
            service_type: b.service_type.clone(),
            appointment_date_time: b.at,
            notes: b.notes.clone(),
            status: b.status,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }

    fn render_where(&self, keep: impl Fn(&Booking) -> bool) -> Vec<Appointment> {
        self.bookings
            .values()
            .filter(|b| keep(b))
            .map(|b| self.render(b))
            .collect()
    }

    fn booking_mut(&mut self, id: i64) -> Result<&mut Booking, StoreError> {
        self.bookings
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound("Appointment not found".to_string()))
    }

    /// Newest first, ties broken by customer id descending.
    pub fn appointments(&self) -> Vec<Appointment> {
        let mut all = self.render_where(|_| true);
        all.sort_by(|a, b| {
            b.appointment_date_time
                .cmp(&a.appointment_date_time)
                .then(b.customer_id.cmp(&a.customer_id))
        });
        all
    }

    pub fn appointment(&self, id: i64) -> Result<Appointment, StoreError> {
        self.bookings
            .get(&id)
            .map(|b| self.render(b))
            .ok_or_else(|| StoreError::NotFound(format!("Appointment not found with id: {id}")))
    }

    pub fn create_appointment(
        &mut self,
        input: AppointmentInput,
        now: NaiveDateTime,
    ) -> Result<Appointment, StoreError> {
        if !self.accounts.contains_key(&input.customer_id) {
            return Err(StoreError::NotFound("Customer not found".to_string()));
        }
        let provider = self
            .accounts
            .get(&input.service_provider_id)
            .ok_or_else(|| StoreError::NotFound("Service provider not found".to_string()))?;
        if provider.user.role != Role::ServiceProvider {
            return Err(StoreError::BadRequest(
                "Selected user is not a service provider".to_string(),
            ));
        }
        if input.appointment_date_time < now {
            return Err(StoreError::BadRequest(
                "Appointment must be scheduled for a future date".to_string(),
            ));
        }
        let from = input.appointment_date_time - Duration::hours(1);
        let to = input.appointment_date_time + Duration::hours(1);
        let conflict = self.bookings.values().any(|b| {
            b.provider_id == input.service_provider_id
                && b.status != Status::Cancelled
                && (from..=to).contains(&b.at)
        });
        if conflict {
            return Err(StoreError::BadRequest(
                "Service provider already has an appointment at this time".to_string(),
            ));
        }

        self.next_booking += 1;
        let booking = Booking {
            id: self.next_booking,
            customer_id: input.customer_id,
            provider_id: input.service_provider_id,
            service_type: input.service_type,
            at: input.appointment_date_time,
            notes: input.notes,
            status: Status::Pending,
            created_at: now,
            updated_at: now,
        };
        let rendered = self.render(&booking);
        self.bookings.insert(booking.id, booking);
        Ok(rendered)
    }

    /// Service type, date-time and notes only; the parties never change.
    pub fn update_appointment(
        &mut self,
        id: i64,
        input: AppointmentInput,
        now: NaiveDateTime,
    ) -> Result<Appointment, StoreError> {
        let booking = self.booking_mut(id)?;
        if input.appointment_date_time < now {
            return Err(StoreError::BadRequest(
                "Appointment must be scheduled for a future date".to_string(),
            ));
        }
        booking.service_type = input.service_type;
        booking.at = input.appointment_date_time;
        if input.notes.is_some() {
            booking.notes = input.notes;
        }
        booking.updated_at = now;
        let booking = booking.clone();
        Ok(self.render(&booking))
    }

    pub fn delete_appointment(&mut self, id: i64) -> Result<(), StoreError> {
        self.bookings
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| StoreError::NotFound(format!("Appointment not found with id: {id}")))
    }

    pub fn set_status(
        &mut self,
        id: i64,
        status: Status,
        now: NaiveDateTime,
    ) -> Result<Appointment, StoreError> {
        let booking = self.booking_mut(id)?;
        booking.status = status;
        booking.updated_at = now;
        let booking = booking.clone();
        Ok(self.render(&booking))
    }

    pub fn by_customer(&self, customer_id: i64) -> Result<Vec<Appointment>, StoreError> {
        if !self.accounts.contains_key(&customer_id) {
            return Err(StoreError::NotFound("Customer not found".to_string()));
        }
        Ok(self.render_where(|b| b.customer_id == customer_id))
    }

    /// Future PENDING or CONFIRMED appointments, soonest first.
    pub fn upcoming_for_customer(
        &self,
        customer_id: i64,
        now: NaiveDateTime,
    ) -> Result<Vec<Appointment>, StoreError> {
        if !self.accounts.contains_key(&customer_id) {
            return Err(StoreError::NotFound("Customer not found".to_string()));
        }
        let mut upcoming = self.render_where(|b| {
            b.customer_id == customer_id
                && b.at > now
                && matches!(b.status, Status::Pending | Status::Confirmed)
        });
        upcoming.sort_by_key(|a| a.appointment_date_time);
        Ok(upcoming)
    }

    pub fn by_provider(&self, provider_id: i64) -> Result<Vec<Appointment>, StoreError> {
        if !self.accounts.contains_key(&provider_id) {
            return Err(StoreError::NotFound("Provider not found".to_string()));
        }
        Ok(self.render_where(|b| b.provider_id == provider_id))
    }

    pub fn by_status(&self, status: Status) -> Vec<Appointment> {
        self.render_where(|b| b.status == status)
    }

    pub fn in_range(&self, start: NaiveDateTime, end: NaiveDateTime) -> Vec<Appointment> {
        self.render_where(|b| (start..=end).contains(&b.at))
    }

    /// Case-insensitive match on either party's name, the service type or
    /// the notes.
    pub fn search(&self, keyword: &str) -> Vec<Appointment> {
        let needle = keyword.to_lowercase();
        let hit = |s: Option<&str>| s.is_some_and(|s| s.to_lowercase().contains(&needle));
        self.bookings
            .values()
            .map(|b| self.render(b))
            .filter(|a| {
                hit(a.customer_name.as_deref())
                    || hit(a.service_provider_name.as_deref())
                    || hit(Some(&a.service_type))
                    || hit(a.notes.as_deref())
            })
            .collect()
    }

    pub fn stats(&self) -> Stats {
        let count = |s| self.bookings.values().filter(|b| b.status == s).count();
        Stats {
            total: self.bookings.len(),
            pending: count(Status::Pending),
            confirmed: count(Status::Confirmed),
            completed: count(Status::Completed),
            cancelled: count(Status::Cancelled),
        }
    }

    /// Drop PENDING appointments whose time has passed. Returns how many.
    pub fn purge_expired(&mut self, now: NaiveDateTime) -> usize {
        let before = self.bookings.len();
        self.bookings
            .retain(|_, b| !(b.status == Status::Pending && b.at < now));
        before - self.bookings.len()
    }
}
