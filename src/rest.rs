
//! Generic JSON REST resource layer.
//!
//! [`Resource`] wraps an HTTP client and maps the service's status ladder
//! onto [`RestResponse`] / [`NeorestError`]: a `200` with a body yields the
//! parsed JSON document, a `201` yields the `Location` of the created
//! resource, a `200`/`204` without a body yields [`Empty`](RestResponse::Empty),
//! and every other status becomes a [`Remote`](NeorestError::Remote) error
//! carrying the server's message. Connection-level failures surface as
//! [`Transport`](NeorestError::Transport) so callers can tell "the server
//! said no" from "the server never answered".

use reqwest::header::ACCEPT;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value as Json;
use tracing::debug;

use neorest_core::NeorestError;

const CONTENT_TYPE_JSON: &str = "application/json";

/// Outcome of one successful REST exchange.
#[derive(Debug)]
pub enum RestResponse {
    /// `200` with a JSON body.
    Body(Json),
    /// `201` with the `Location` of the created resource.
    Created(String),
    /// `200` or `204` without a body.
    Empty,
}

impl RestResponse {
    /// Map one wire-level exchange onto a response or error.
    ///
    /// This is the whole status ladder, independent of any HTTP client:
    /// `200` parses the body (or is [`Empty`](RestResponse::Empty) when the
    /// body is blank), `201` requires a `Location`, `204` is
    /// [`Empty`](RestResponse::Empty), and anything else is a
    /// [`Remote`](NeorestError::Remote) error carrying the server's
    /// `message` field when the error payload parses, the raw body text
    /// otherwise.
    pub fn from_wire(
        status: u16,
        location: Option<&str>,
        body: &str,
    ) -> Result<RestResponse, NeorestError> {
        match status {
            200 => {
                if body.is_empty() {
                    Ok(RestResponse::Empty)
                } else {
                    Ok(RestResponse::Body(serde_json::from_str(body)?))
                }
            }
            201 => location
                .map(|loc| RestResponse::Created(loc.to_owned()))
                .ok_or_else(|| NeorestError::malformed("201 response without a Location header")),
            204 => Ok(RestResponse::Empty),
            _ => Err(NeorestError::remote(status, error_message(body))),
        }
    }
}

/// Server error payload. Only `message` is interpreted; whatever else the
/// server includes (exception class, stacktrace) is ignored.
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    message: String,
}

/// A JSON-speaking REST client for one well-behaved hypermedia service.
///
/// Cheap to clone; the underlying HTTP client is shared and safe for
/// concurrent use. Each request is a single independent exchange — retry
/// policy, if any, belongs to the caller.
#[derive(Debug, Clone, Default)]
pub struct Resource {
    client: reqwest::Client,
}

impl Resource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a resource on an existing client (shared pools, custom
    /// timeouts).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub async fn get(&self, uri: &str) -> Result<RestResponse, NeorestError> {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: &Json) -> Result<RestResponse, NeorestError> {
        self.request(Method::POST, uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: &Json) -> Result<RestResponse, NeorestError> {
        self.request(Method::PUT, uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> Result<RestResponse, NeorestError> {
        self.request(Method::DELETE, uri, None).await
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<&Json>,
    ) -> Result<RestResponse, NeorestError> {
        let mut req = self
            .client
            .request(method.clone(), uri)
            .header(ACCEPT, CONTENT_TYPE_JSON);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(transport_error)?;
        let status = resp.status().as_u16();
        debug!(%method, uri, status, "rest exchange");

        let location = resp
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let text = resp.text().await.map_err(transport_error)?;
        RestResponse::from_wire(status, location.as_deref(), &text)
    }
}

// Prefer the structured message when the error payload parses; fall back to
// the raw body text.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorPayload>(body) {
        Ok(payload) if !payload.message.is_empty() => payload.message,
        _ => body.to_owned(),
    }
}

fn transport_error(e: reqwest::Error) -> NeorestError {
    NeorestError::Transport(e.to_string())
}
