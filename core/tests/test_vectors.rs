//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! `requests.json` pairs a client call with the exact request it must build;
//! `envelopes.json` pairs a raw response with the decoded value or error
//! kind. Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use booking_core::{
    ApiError, Appointment, AppointmentRequest, AppointmentStats, AppointmentStatus, BookingClient,
    Credentials, HttpMethod, HttpRequest, HttpResponse, NewUser, User,
};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn arg<T: DeserializeOwned>(args: &Value) -> T {
    serde_json::from_value(args.clone()).unwrap()
}

fn id(args: &Value) -> i64 {
    args["id"].as_i64().unwrap()
}

fn build(c: &BookingClient, call: &str, args: &Value) -> HttpRequest {
    match call {
        "login" => c.build_login(&arg::<Credentials>(args)).unwrap(),
        "register" => c.build_register(&arg::<NewUser>(args)).unwrap(),
        "list_providers" => c.build_list_providers(),
        "search_users" => c.build_search_users(args["name"].as_str().unwrap()),
        "create_appointment" => c.build_create_appointment(&arg::<AppointmentRequest>(args)).unwrap(),
        "upcoming_appointments" => c.build_upcoming_appointments(id(args)),
        "update_appointment_status" => {
            let status: AppointmentStatus = arg(&args["status"]);
            c.build_update_appointment_status(id(args), status)
        }
        "search_appointments" => c.build_search_appointments(args["keyword"].as_str().unwrap()),
        "delete_appointment" => c.build_delete_appointment(id(args)),
        other => panic!("unknown call: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let c = BookingClient::new(base_url);

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let expected = &case["expected_request"];
        let req = build(&c, case["call"].as_str().unwrap(), &case["args"]);

        assert_eq!(req.method, parse_method(expected["method"].as_str().unwrap()), "{name}: method");
        assert_eq!(req.path, format!("{base_url}{}", expected["path"].as_str().unwrap()), "{name}: path");

        let expected_headers: Vec<(String, String)> = expected["headers"]
            .as_array()
            .unwrap()
            .iter()
            .map(|h| {
                let arr = h.as_array().unwrap();
                (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
            })
            .collect();
        assert_eq!(req.headers, expected_headers, "{name}: headers");

        match expected.get("body") {
            Some(body) => {
                let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
                assert_eq!(&sent, body, "{name}: body");
            }
            None => assert!(req.body.is_none(), "{name}: unexpected body"),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelopes
// ---------------------------------------------------------------------------

fn error_kind(err: &ApiError) -> &'static str {
    match err {
        ApiError::Transport(_) => "transport",
        ApiError::Rejected { .. } => "rejected",
        ApiError::NotFound => "not_found",
        ApiError::Http { .. } => "http",
        ApiError::MissingData => "missing_data",
        ApiError::Deserialization(_) => "deserialization",
        ApiError::Serialization(_) => "serialization",
    }
}

fn check_error(name: &str, err: &ApiError, expected: &Value) {
    assert_eq!(error_kind(err), expected["kind"].as_str().unwrap(), "{name}: kind ({err})");
    if let Some(status) = expected.get("status").and_then(Value::as_u64) {
        let got = match err {
            ApiError::Rejected { status, .. } | ApiError::Http { status, .. } => *status as u64,
            other => panic!("{name}: {other} carries no status"),
        };
        assert_eq!(got, status, "{name}: status");
    }
    if let Some(message) = expected.get("message").and_then(Value::as_str) {
        assert_eq!(err.message(), Some(message), "{name}: message");
    }
}

fn check<T>(name: &str, result: Result<T, ApiError>, expected: &Value)
where
    T: DeserializeOwned + PartialEq + std::fmt::Debug,
{
    match (result, expected.get("ok"), expected.get("error")) {
        (Ok(value), Some(ok), None) => {
            let want: T = serde_json::from_value(ok.clone()).unwrap();
            assert_eq!(value, want, "{name}: decoded value");
        }
        (Err(err), None, Some(error)) => check_error(name, &err, error),
        (Ok(value), _, _) => panic!("{name}: expected an error, got {value:?}"),
        (Err(err), _, _) => panic!("{name}: expected success, got {err}"),
    }
}

#[test]
fn envelope_vectors() {
    let raw = include_str!("../../test-vectors/envelopes.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let c = BookingClient::new("http://localhost:8080/api");

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let sim = &case["response"];
        let response = HttpResponse::new(
            sim["status"].as_u64().unwrap() as u16,
            sim["body"].as_str().unwrap(),
        );
        let expected = &case["expected"];

        match case["parse"].as_str().unwrap() {
            "user" => check::<User>(name, c.parse_user(response), expected),
            "appointment" => check::<Appointment>(name, c.parse_appointment(response), expected),
            "appointment_list" => {
                check::<Vec<Appointment>>(name, c.parse_appointment_list(response), expected)
            }
            "stats" => check::<AppointmentStats>(name, c.parse_stats(response), expected),
            "deleted" => check::<()>(name, c.parse_appointment_deleted(response), expected),
            other => panic!("unknown parser: {other}"),
        }
    }
}
