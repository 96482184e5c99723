//! In-memory stand-in for the booking backend, served under `/api`.

pub mod error;
pub mod store;

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use tokio::{net::TcpListener, sync::RwLock};

pub use error::{Envelope, StoreError};
pub use store::{Appointment, Role, Stats, Status, Store, User};

use error::{created, ok, Reply};
use store::{AppointmentInput, UserInput};

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    router(Store::new())
}

pub fn router(store: Store) -> Router {
    let db: Db = Arc::new(RwLock::new(store));
    let api = Router::new()
        .route("/auth/login", post(login))
        .route("/v1/auth/login", post(login))
        .route("/users", post(create_user))
        .route("/v1/users", get(list_users).post(create_user))
        .route("/v1/users/providers", get(list_providers))
        .route("/v1/users/search", get(search_users))
        .route("/v1/users/email/{email}", get(user_by_email))
        .route("/v1/users/{id}", get(get_user).put(update_user).delete(delete_user))
        .route("/v1/appointments", get(list_appointments).post(create_appointment))
        .route("/v1/appointments/stats", get(stats))
        .route("/v1/appointments/search", get(search_appointments))
        .route("/v1/appointments/date-range", get(appointments_in_range))
        .route("/v1/appointments/status/{status}", get(appointments_by_status))
        .route("/v1/appointments/customer/{id}", get(appointments_by_customer))
        .route("/v1/appointments/customer/{id}/upcoming", get(upcoming_appointments))
        .route("/v1/appointments/provider/{id}", get(appointments_by_provider))
        .route(
            "/v1/appointments/{id}",
            get(get_appointment).put(update_appointment).delete(delete_appointment),
        )
        .route("/v1/appointments/{id}/status", patch(update_status));
    Router::new().nest("/api", api).with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

#[derive(Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Deserialize)]
pub struct KeywordQuery {
    pub keyword: String,
}

#[derive(Deserialize)]
pub struct StatusQuery {
    pub status: String,
}

#[derive(Deserialize)]
pub struct RangeQuery {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

// --- auth ---

/// Bad credentials are a successful response with `success: false`.
/// A good login also drops expired PENDING appointments.
async fn login(State(db): State<Db>, Json(input): Json<LoginInput>) -> Reply<User> {
    if input.email.is_empty() || input.password.is_empty() {
        return Err(StoreError::BadRequest("Email and password are required".to_string()));
    }
    let mut store = db.write().await;
    let Some(user) = store.authenticate(&input.email, &input.password) else {
        tracing::info!(email = %input.email, "rejected login");
        let body = Envelope::new(StatusCode::OK, false, "Invalid email or password", None);
        return Ok((StatusCode::OK, Json(body)));
    };
    let removed = store.purge_expired(now());
    tracing::info!(user_id = user.id, removed, "login");
    ok("Login successful", user)
}

// --- users ---

async fn create_user(State(db): State<Db>, Json(input): Json<UserInput>) -> Reply<User> {
    let user = {
        let mut store = db.write().await;
        store.create_user(input, now())?
    };
    tracing::info!(user_id = user.id, role = ?user.role, "user created");
    created("User created successfully", user)
}

async fn list_users(State(db): State<Db>) -> Reply<Vec<User>> {
    let store = db.read().await;
    ok("Users retrieved successfully", store.users())
}

async fn get_user(State(db): State<Db>, Path(id): Path<i64>) -> Reply<User> {
    let store = db.read().await;
    ok("User found", store.user(id)?)
}

async fn user_by_email(State(db): State<Db>, Path(email): Path<String>) -> Reply<User> {
    let store = db.read().await;
    ok("User found", store.user_by_email(&email)?)
}

async fn list_providers(State(db): State<Db>) -> Reply<Vec<User>> {
    let store = db.read().await;
    ok("Service providers retrieved", store.providers())
}

async fn search_users(State(db): State<Db>, Query(q): Query<NameQuery>) -> Reply<Vec<User>> {
    let store = db.read().await;
    ok("Search results", store.search_users(&q.name))
}

async fn update_user(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<UserInput>,
) -> Reply<User> {
    let mut store = db.write().await;
    ok("User updated successfully", store.update_user(id, input)?)
}

async fn delete_user(State(db): State<Db>, Path(id): Path<i64>) -> Reply<()> {
    db.write().await.delete_user(id)?;
    ok("User deleted successfully", ())
}

// --- appointments ---

async fn list_appointments(State(db): State<Db>) -> Reply<Vec<Appointment>> {
    let store = db.read().await;
    ok("Appointments retrieved successfully", store.appointments())
}

async fn get_appointment(State(db): State<Db>, Path(id): Path<i64>) -> Reply<Appointment> {
    let store = db.read().await;
    ok("Appointment found", store.appointment(id)?)
}

async fn create_appointment(
    State(db): State<Db>,
    Json(input): Json<AppointmentInput>,
) -> Reply<Appointment> {
    let apt = {
        let mut store = db.write().await;
        store.create_appointment(input, now())?
    };
    tracing::info!(appointment_id = apt.id, "appointment created");
    created("Appointment created successfully", apt)
}

async fn update_appointment(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<AppointmentInput>,
) -> Reply<Appointment> {
    let apt = {
        let mut store = db.write().await;
        store.update_appointment(id, input, now())?
    };
    ok("Appointment updated successfully", apt)
}

async fn delete_appointment(State(db): State<Db>, Path(id): Path<i64>) -> Reply<()> {
    db.write().await.delete_appointment(id)?;
    ok("Appointment deleted successfully", ())
}

async fn appointments_by_customer(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Reply<Vec<Appointment>> {
    let store = db.read().await;
    ok("Customer appointments retrieved", store.by_customer(id)?)
}

async fn upcoming_appointments(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Reply<Vec<Appointment>> {
    let store = db.read().await;
    let upcoming = store.upcoming_for_customer(id, now())?;
    ok("Upcoming appointments retrieved", upcoming)
}

async fn appointments_by_provider(
    State(db): State<Db>,
    Path(id): Path<i64>,
) -> Reply<Vec<Appointment>> {
    let store = db.read().await;
    ok("Provider appointments retrieved", store.by_provider(id)?)
}

async fn appointments_by_status(
    State(db): State<Db>,
    Path(status): Path<String>,
) -> Reply<Vec<Appointment>> {
    let status: Status = status.parse()?;
    let store = db.read().await;
    ok("Appointments by status retrieved", store.by_status(status))
}

async fn appointments_in_range(
    State(db): State<Db>,
    Query(range): Query<RangeQuery>,
) -> Reply<Vec<Appointment>> {
    let store = db.read().await;
    ok("Appointments in date range", store.in_range(range.start, range.end))
}

async fn update_status(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(q): Query<StatusQuery>,
) -> Reply<Appointment> {
    let status: Status = q.status.parse()?;
    let apt = {
        let mut store = db.write().await;
        store.set_status(id, status, now())?
    };
    tracing::info!(appointment_id = id, %status, "status updated");
    ok("Status updated successfully", apt)
}

async fn search_appointments(
    State(db): State<Db>,
    Query(q): Query<KeywordQuery>,
) -> Reply<Vec<Appointment>> {
    let store = db.read().await;
    ok("Search results", store.search(&q.keyword))
}

async fn stats(State(db): State<Db>) -> Reply<Stats> {
    let store = db.read().await;
    ok("Statistics retrieved", store.stats())
}
