//! HTTP abort signals and their renderings.
//!
//! [`HttpError`] plays the role of an "abort": a status code plus the
//! standard name and description clients see. How it is rendered is left to
//! the application that catches it: a flat JSON object, a JSON object nested
//! under `error`, or the plain HTML page used when nothing else applies.
//!
//! [`AppError`] is the wider failure type for handlers that may also fail for
//! reasons unrelated to HTTP. Those failures are logged and replaced with a
//! generic 500 payload.

use std::any::type_name;
use std::borrow::Cow;

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::error;

use crate::middleware::trace::TraceId;

/// RFC 1123 date layout used for `timestamp` in nested error payloads.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Name and description for every status an application may abort with.
fn known_status(code: u16) -> Option<(&'static str, &'static str)> {
    let text = match code {
        400 => (
            "Bad Request",
            "The browser (or proxy) sent a request that this server could not understand.",
        ),
        401 => (
            "Unauthorized",
            "The server could not verify that you are authorized to access the URL requested. \
             You either supplied the wrong credentials (e.g. a bad password), or your browser \
             doesn't understand how to supply the credentials required.",
        ),
        403 => (
            "Forbidden",
            "You don't have the permission to access the requested resource. It is either \
             read-protected or not readable by the server.",
        ),
        404 => (
            "Not Found",
            "The requested URL was not found on the server. If you entered the URL manually \
             please check your spelling and try again.",
        ),
        405 => (
            "Method Not Allowed",
            "The method is not allowed for the requested URL.",
        ),
        406 => (
            "Not Acceptable",
            "The resource identified by the request is only capable of generating response \
             entities which have content characteristics not acceptable according to the \
             accept headers sent in the request.",
        ),
        408 => (
            "Request Timeout",
            "The server closed the network connection because the browser didn't finish the \
             request within the specified time.",
        ),
        409 => (
            "Conflict",
            "A conflict happened while processing the request. The resource might have been \
             modified while the request was being processed.",
        ),
        410 => (
            "Gone",
            "The requested URL is no longer available on this server and there is no \
             forwarding address. If you followed a link from a foreign page, please contact \
             the author of this page.",
        ),
        411 => (
            "Length Required",
            "A request with this method requires a valid Content-Length header.",
        ),
        412 => (
            "Precondition Failed",
            "The precondition on the request for the URL failed positive evaluation.",
        ),
        413 => (
            "Request Entity Too Large",
            "The data value transmitted exceeds the capacity limit.",
        ),
        414 => (
            "Request URI Too Large",
            "The length of the requested URL exceeds the capacity limit for this server. The \
             request cannot be processed.",
        ),
        415 => (
            "Unsupported Media Type",
            "The server does not support the media type transmitted in the request.",
        ),
        416 => (
            "Requested Range Not Satisfiable",
            "The server cannot provide the requested range.",
        ),
        417 => (
            "Expectation Failed",
            "The server could not meet the requirements of the Expect header",
        ),
        418 => ("I'm a teapot", "This server is a teapot, not a coffee machine"),
        422 => (
            "Unprocessable Entity",
            "The request was well-formed but was unable to be followed due to semantic errors.",
        ),
        423 => ("Locked", "The resource that is being accessed is locked."),
        424 => (
            "Failed Dependency",
            "The method could not be performed on the resource because the requested action \
             depended on another action and that action failed.",
        ),
        428 => (
            "Precondition Required",
            "This request is required to be conditional; try using \"If-Match\" or \
             \"If-Unmodified-Since\".",
        ),
        429 => (
            "Too Many Requests",
            "This user has exceeded an allotted request count. Try again later.",
        ),
        431 => (
            "Request Header Fields Too Large",
            "One or more header fields exceeds the maximum size.",
        ),
        451 => (
            "Unavailable For Legal Reasons",
            "Unavailable for legal reasons.",
        ),
        500 => (
            "Internal Server Error",
            "The server encountered an internal error and was unable to complete your request. \
             Either the server is overloaded or there is an error in the application.",
        ),
        501 => (
            "Not Implemented",
            "The server does not support the action requested by the browser.",
        ),
        502 => (
            "Bad Gateway",
            "The proxy server received an invalid response from an upstream server.",
        ),
        503 => (
            "Service Unavailable",
            "The server is temporarily unable to service your request due to maintenance \
             downtime or capacity problems. Please try again later.",
        ),
        504 => (
            "Gateway Timeout",
            "The connection to an upstream server timed out.",
        ),
        505 => (
            "HTTP Version Not Supported",
            "The server does not support the HTTP protocol version used in the request.",
        ),
        _ => return None,
    };
    Some(text)
}

/// Raised when aborting with a code that has no registered error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no error is registered for status code {0}")]
pub struct UnknownStatus(pub u32);

/// An HTTP error carrying its status, standard name and description.
///
/// # Examples
/// ```
/// use route_idioms::HttpError;
///
/// let err = HttpError::abort(404).expect("404 is a known error");
/// assert_eq!(err.name(), "Not Found");
/// assert!(HttpError::abort(200).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    status: StatusCode,
    name: Cow<'static, str>,
    description: Cow<'static, str>,
    details: Option<Value>,
}

impl HttpError {
    /// Build the error registered for `code`.
    ///
    /// # Errors
    /// Returns [`UnknownStatus`] when `code` is not a registered 4xx or 5xx
    /// status.
    pub fn abort(code: u32) -> Result<Self, UnknownStatus> {
        let unknown = || UnknownStatus(code);
        let short = u16::try_from(code).map_err(|_| unknown())?;
        let status = StatusCode::from_u16(short).map_err(|_| unknown())?;
        let (name, description) = known_status(short).ok_or_else(unknown)?;
        Ok(Self {
            status,
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            details: None,
        })
    }

    /// Build the error for an arbitrary status produced by the framework.
    ///
    /// Statuses without a registered description fall back to the
    /// canonical reason phrase.
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        let (name, description) = known_status(status.as_u16()).unwrap_or_else(|| {
            let reason = status.canonical_reason().unwrap_or("Unknown Error");
            (reason, reason)
        });
        Self {
            status,
            name: Cow::Borrowed(name),
            description: Cow::Borrowed(description),
            details: None,
        }
    }

    /// `400 Bad Request`.
    #[must_use]
    pub fn bad_request() -> Self {
        Self::from_status(StatusCode::BAD_REQUEST)
    }

    /// `415 Unsupported Media Type`.
    #[must_use]
    pub fn unsupported_media_type() -> Self {
        Self::from_status(StatusCode::UNSUPPORTED_MEDIA_TYPE)
    }

    /// `500 Internal Server Error`.
    #[must_use]
    pub fn internal() -> Self {
        Self::from_status(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Replace the standard description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<Cow<'static, str>>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach structured details, rendered only by the flat JSON form.
    #[must_use]
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Numeric status code.
    #[must_use]
    pub fn code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Standard name, e.g. `Not Found`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human readable description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Structured details, if any.
    #[must_use]
    pub const fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// `{"error": name, "msg": description, "code": code}` plus `details`
    /// when present.
    #[must_use]
    pub fn flat_body(&self) -> Value {
        let mut body = json!({
            "error": self.name(),
            "msg": self.description(),
            "code": self.code(),
        });
        if let (Some(details), Some(object)) = (&self.details, body.as_object_mut()) {
            object.insert("details".to_owned(), details.clone());
        }
        body
    }

    /// `{"error": {"error", "detail", "code"}, "timestamp"}`.
    #[must_use]
    pub fn nested_body(&self) -> Value {
        json!({
            "error": {
                "error": self.name(),
                "detail": self.description(),
                "code": self.code(),
            },
            "timestamp": Utc::now().format(HTTP_DATE_FORMAT).to_string(),
        })
    }

    /// The default HTML error page.
    #[must_use]
    pub fn page(&self) -> HttpResponse {
        let body = format!(
            "<!doctype html>\n<html lang=en>\n<title>{code} {name}</title>\n<h1>{name}</h1>\n<p>{description}</p>\n",
            code = self.code(),
            name = self.name(),
            description = self.description(),
        );
        HttpResponse::build(self.status)
            .content_type(ContentType::html())
            .body(body)
    }
}

impl std::fmt::Display for HttpError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.code(), self.name, self.description)
    }
}

impl std::error::Error for HttpError {}

impl ResponseError for HttpError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status).json(self.flat_body())
    }
}

/// Handler failure: either an explicit abort or an unhandled error.
#[derive(Debug, Error)]
pub enum AppError {
    /// The handler aborted with an HTTP status.
    #[error(transparent)]
    Http(#[from] HttpError),
    /// Any other failure. Logged, then reported as a generic 500.
    #[error("{kind}: {source}")]
    Unhandled {
        /// Short type name of the underlying error.
        kind: &'static str,
        /// The underlying error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl AppError {
    /// Wrap an arbitrary error, remembering its type name for the log.
    pub fn unhandled<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let full = type_name::<E>();
        let kind = full.rsplit("::").next().unwrap_or(full);
        Self::Unhandled {
            kind,
            source: Box::new(err),
        }
    }
}

impl From<UnknownStatus> for AppError {
    fn from(err: UnknownStatus) -> Self {
        Self::unhandled(err)
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Http(err) => err.status(),
            Self::Unhandled { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::Http(err) => err.error_response(),
            Self::Unhandled { kind, source } => {
                error!(
                    exception_type = *kind,
                    details = %source,
                    trace_id = ?TraceId::current(),
                    "unhandled error"
                );
                let internal = HttpError::internal();
                HttpResponse::InternalServerError().json(json!({
                    "error": internal.name(),
                    "message": internal.description(),
                    "code": internal.code(),
                }))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Tests for abort lookup and the three error renderings.

    use super::*;
    use actix_web::body::to_bytes;
    use actix_web::http::header;
    use rstest::rstest;

    async fn body_json(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body())
            .await
            .expect("reading response body succeeds");
        serde_json::from_slice(&bytes).expect("body is JSON")
    }

    #[rstest]
    #[case(400, "Bad Request")]
    #[case(401, "Unauthorized")]
    #[case(404, "Not Found")]
    #[case(418, "I'm a teapot")]
    #[case(500, "Internal Server Error")]
    fn abort_resolves_registered_codes(#[case] code: u16, #[case] name: &str) {
        let err = HttpError::abort(u32::from(code)).expect("registered code");
        assert_eq!(err.code(), code);
        assert_eq!(err.name(), name);
        assert!(!err.description().is_empty());
    }

    #[rstest]
    #[case(200)]
    #[case(302)]
    #[case(499)]
    #[case(1000)]
    #[case(99_999)]
    fn abort_rejects_unregistered_codes(#[case] code: u32) {
        assert_eq!(HttpError::abort(code), Err(UnknownStatus(code)));
    }

    #[test]
    fn from_status_falls_back_to_reason_phrase() {
        let err = HttpError::from_status(StatusCode::PAYMENT_REQUIRED);
        assert_eq!(err.name(), "Payment Required");
        assert_eq!(err.description(), "Payment Required");
    }

    #[test]
    fn flat_body_includes_details_only_when_set() {
        let plain = HttpError::bad_request().flat_body();
        assert_eq!(plain["error"], "Bad Request");
        assert_eq!(plain["code"], 400);
        assert!(plain.get("details").is_none());

        let detailed = HttpError::bad_request()
            .with_details(json!({ "location": "query" }))
            .flat_body();
        assert_eq!(detailed["details"]["location"], "query");
    }

    #[test]
    fn nested_body_wraps_error_and_stamps_date() {
        let body = HttpError::from_status(StatusCode::FORBIDDEN).nested_body();
        assert_eq!(body["error"]["error"], "Forbidden");
        assert_eq!(body["error"]["code"], 403);
        let timestamp = body["timestamp"].as_str().expect("timestamp string");
        assert!(timestamp.ends_with(" GMT"), "unexpected timestamp {timestamp}");
    }

    #[actix_web::test]
    async fn page_renders_html() {
        let response = HttpError::abort(404).expect("known").page();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        assert!(content_type.starts_with("text/html"));
        let bytes = to_bytes(response.into_body()).await.expect("body");
        let html = std::str::from_utf8(&bytes).expect("utf8");
        assert!(html.contains("<title>404 Not Found</title>"));
    }

    #[actix_web::test]
    async fn http_error_responds_with_flat_json() {
        let err = HttpError::abort(401).expect("known");
        let response = err.error_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Unauthorized");
        assert_eq!(body["code"], 401);
    }

    #[actix_web::test]
    async fn unhandled_errors_are_redacted() {
        let err = AppError::unhandled(std::io::Error::other("secret failure"));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(err.error_response()).await;
        assert_eq!(body["error"], "Internal Server Error");
        assert_eq!(body["code"], 500);
        assert!(!body.to_string().contains("secret failure"));
    }

    #[test]
    fn unhandled_records_short_type_name() {
        let err = AppError::from(UnknownStatus(299));
        match err {
            AppError::Unhandled { kind, .. } => assert_eq!(kind, "UnknownStatus"),
            AppError::Http(_) => panic!("expected an unhandled error"),
        }
    }
}
