//! Service modules: one method per backend endpoint.
//!
//! `BookingApi` pairs the stateless `BookingClient` with a host-supplied
//! `Transport`, so each call is build → execute → decode. Views talk to this
//! type, never to the transport directly.

mod appointments;
mod auth;
mod users;

use crate::client::BookingClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};

pub struct BookingApi<T> {
    client: BookingClient,
    transport: T,
}

impl<T: Transport> BookingApi<T> {
    pub fn new(client: BookingClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BookingClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        tracing::debug!(method = %request.method, path = %request.path, "sending request");
        let response = self.transport.execute(request)?;
        tracing::debug!(status = response.status, "received response");
        Ok(response)
    }
}
