//! Client core for the appointment booking service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host supplies a
//! `Transport` that performs the round-trip; `BookingApi` pairs the two so
//! views can call one method per endpoint.
//!
//! # Design
//! - `BookingClient` is stateless and holds only `base_url`. Each endpoint is
//!   split into `build_*` and `parse_*` so the I/O boundary stays explicit.
//! - The `{success, data, message}` envelope is unwrapped once in
//!   [`envelope`]; everything above it sees `Result<T, ApiError>`.
//! - `Session` is an owned value built by rehydrating a `SessionStore`.
//! - Views keep screen state and take `now` as an argument, so every
//!   time-dependent derivation is deterministic under test.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod routes;
pub mod services;
pub mod session;
pub mod types;
pub mod views;

#[cfg(test)]
pub(crate) mod testing;

pub use client::BookingClient;
pub use error::{ApiError, SessionError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use routes::Route;
pub use services::BookingApi;
pub use session::{FileStore, MemoryStore, Session, SessionStore};
pub use types::{
    Appointment, AppointmentId, AppointmentRequest, AppointmentStats, AppointmentStatus,
    Credentials, NewUser, Role, ServiceType, UpdateUser, User, UserId,
};
