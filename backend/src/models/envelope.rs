//! Generic response envelope.
//!
//! Wraps any serialisable payload with a timestamp, the numeric status and a
//! status message:
//!
//! ```json
//! {"timestamp": "2024-01-01T12:00:00", "status": 200, "status_message": "OK", "data": null}
//! ```

use actix_web::body::BoxBody;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, Responder};
use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Serialize, Serializer};

const DEFAULT_STATUS_MESSAGE: &str = "OK";

/// Success envelope around an optional payload.
///
/// Returned from a handler, the HTTP status matches the envelope `status`.
///
/// # Examples
/// ```
/// use actix_web::http::StatusCode;
/// use route_idioms::Envelope;
///
/// let envelope = Envelope::new("hello").with_status(StatusCode::CREATED);
/// assert_eq!(envelope.status(), StatusCode::CREATED);
/// assert_eq!(envelope.status_message(), Some("OK"));
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Envelope<T> {
    timestamp: NaiveDateTime,
    #[serde(serialize_with = "serialize_status")]
    status: StatusCode,
    status_message: Option<String>,
    data: Option<T>,
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

impl<T> Envelope<T> {
    /// Wrap `data`, stamped now with status 200.
    pub fn new(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::empty()
        }
    }

    /// Envelope without a payload.
    pub fn empty() -> Self {
        Self {
            timestamp: Utc::now().naive_utc().trunc_subsecs(0),
            status: StatusCode::OK,
            status_message: Some(DEFAULT_STATUS_MESSAGE.to_owned()),
            data: None,
        }
    }

    /// Set the status reported in the body and used for the response.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Replace the status message; `None` serialises as `null`.
    #[must_use]
    pub fn with_status_message(mut self, message: Option<impl Into<String>>) -> Self {
        self.status_message = message.map(Into::into);
        self
    }

    /// Construction time, second precision, UTC.
    pub const fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Reported status.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Reported status message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Wrapped payload.
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }
}

impl<T: Serialize> Responder for Envelope<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        let status = self.status;
        HttpResponse::build(status).json(self)
    }
}
