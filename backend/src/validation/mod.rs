//! Declarative validation of path, query and body parameters.
//!
//! [`Validated`] is an extractor whose three type parameters declare the
//! model expected for the path, the query string and the JSON body. Each slot
//! is either [`Skip`] (nothing declared) or [`Schema<T>`], which deserialises
//! the section into `T`. The passes run in that order and the first failure
//! is returned to the client as a `400`. A request without a body skips the
//! body pass and its body section echoes `{}`.
//!
//! ```
//! use actix_web::web;
//! use route_idioms::validation::{Schema, Skip, Validated};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Deserialize, Serialize)]
//! struct Lookup {
//!     id: i64,
//! }
//!
//! async fn show(params: Validated<Schema<Lookup>, Skip, Skip>) -> web::Json<serde_json::Value> {
//!     web::Json(params.echo())
//! }
//! ```

mod error;

pub use error::{Location, ValidationError};

use std::collections::HashSet;
use std::ops::Deref;

use actix_web::dev::Payload;
use actix_web::http::header::{CONTENT_LENGTH, TRANSFER_ENCODING};
use actix_web::web::Bytes;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures_util::future::LocalBoxFuture;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use tracing::{debug, error};

use crate::models::HttpError;

/// One validation slot of [`Validated`].
pub trait Section: Sized {
    /// Whether a model was declared for this slot.
    const DECLARED: bool;

    /// Decode `application/x-www-form-urlencoded` pairs (path or query).
    ///
    /// # Errors
    /// Returns the decoder error when the pairs do not fit the model.
    fn from_encoded(encoded: &str) -> Result<Self, serde_urlencoded::de::Error>;

    /// Decode a parsed JSON body.
    ///
    /// # Errors
    /// Returns the decoder error when the value does not fit the model.
    fn from_json(value: Value) -> Result<Self, serde_json::Error>;

    /// JSON view of the validated section, keyed by field name.
    fn dump(&self) -> Value;
}

/// Slot without a declared model. Input is ignored and dumps as `{}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Skip;

impl Section for Skip {
    const DECLARED: bool = false;

    fn from_encoded(_encoded: &str) -> Result<Self, serde_urlencoded::de::Error> {
        Ok(Self)
    }

    fn from_json(_value: Value) -> Result<Self, serde_json::Error> {
        Ok(Self)
    }

    fn dump(&self) -> Value {
        json!({})
    }
}

/// Slot validated against the model `T`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema<T>(pub T);

impl<T> Schema<T> {
    /// Unwrap the validated model.
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Schema<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> Section for Schema<T>
where
    T: DeserializeOwned + Serialize,
{
    const DECLARED: bool = true;

    fn from_encoded(encoded: &str) -> Result<Self, serde_urlencoded::de::Error> {
        serde_urlencoded::from_str(encoded).map(Self)
    }

    fn from_json(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value).map(Self)
    }

    fn dump(&self) -> Value {
        serde_json::to_value(&self.0).unwrap_or_else(|e| {
            error!(error = %e, "failed to dump validated section");
            Value::Null
        })
    }
}

/// Path, query and body validated against their declared models.
#[derive(Debug, Clone)]
pub struct Validated<P = Skip, Q = Skip, B = Skip> {
    /// Path section.
    pub path: P,
    /// Query section.
    pub query: Q,
    /// Body section, `None` when the request carried no body.
    pub body: Option<B>,
}

impl<P: Section, Q: Section, B: Section> Validated<P, Q, B> {
    /// `{"path": …, "query": …, "body": …}` with each section dumped.
    pub fn echo(&self) -> Value {
        json!({
            "path": self.path.dump(),
            "query": self.query.dump(),
            "body": self.body.as_ref().map_or_else(|| json!({}), Section::dump),
        })
    }

    /// Split into the three sections.
    pub fn into_parts(self) -> (P, Q, Option<B>) {
        (self.path, self.query, self.body)
    }
}

impl<P, Q, B> FromRequest for Validated<P, Q, B>
where
    P: Section + 'static,
    Q: Section + 'static,
    B: Section + 'static,
{
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let req = req.clone();
        let mut payload = payload.take();
        Box::pin(async move {
            if !(P::DECLARED || Q::DECLARED || B::DECLARED) {
                debug!(path = %req.path(), "validation requested without any model");
            }
            let path = validate_path::<P>(&req)?;
            let query = validate_query::<Q>(req.query_string())?;
            let raw = if has_body(&req) {
                Bytes::from_request(&req, &mut payload).await?
            } else {
                Bytes::new()
            };
            let body = validate_body::<B>(&req, &raw)?;
            Ok(Self { path, query, body })
        })
    }
}

/// A body is signalled by a `Content-Length` or `Transfer-Encoding` header
/// (RFC 7230 §3.3).
#[must_use]
pub fn has_body(req: &HttpRequest) -> bool {
    let headers = req.headers();
    headers.contains_key(TRANSFER_ENCODING) || headers.contains_key(CONTENT_LENGTH)
}

fn reject(location: Location, message: String) -> HttpError {
    debug!(%location, %message, "request validation failed");
    ValidationError::new(location, message).into()
}

fn validate_path<P: Section>(req: &HttpRequest) -> Result<P, HttpError> {
    if !P::DECLARED {
        return P::from_encoded("").map_err(|e| reject(Location::Path, e.to_string()));
    }
    let pairs: Vec<(&str, &str)> = req.match_info().iter().collect();
    let encoded = reencode(&pairs)?;
    P::from_encoded(&encoded).map_err(|e| reject(Location::Path, e.to_string()))
}

fn validate_query<Q: Section>(query: &str) -> Result<Q, HttpError> {
    if !Q::DECLARED {
        return Q::from_encoded("").map_err(|e| reject(Location::Query, e.to_string()));
    }
    let encoded = first_values(query)?;
    Q::from_encoded(&encoded).map_err(|e| reject(Location::Query, e.to_string()))
}

/// Re-encode `query` keeping only the first value of each repeated key.
fn first_values(query: &str) -> Result<String, HttpError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_str(query).map_err(|e| reject(Location::Query, e.to_string()))?;
    let mut seen = HashSet::new();
    let unique: Vec<_> = pairs
        .into_iter()
        .filter(|(key, _)| seen.insert(key.clone()))
        .collect();
    reencode(&unique)
}

fn reencode<K: Serialize, V: Serialize>(pairs: &[(K, V)]) -> Result<String, HttpError> {
    serde_urlencoded::to_string(pairs).map_err(|e| {
        debug!(error = %e, "failed to re-encode parameters");
        HttpError::internal()
    })
}

fn validate_body<B: Section>(req: &HttpRequest, raw: &[u8]) -> Result<Option<B>, HttpError> {
    if raw.is_empty() {
        return Ok(None);
    }
    if !is_json(req.content_type()) {
        return Err(HttpError::unsupported_media_type().with_description(
            "Did not attempt to load JSON data because the request Content-Type was not \
             'application/json'.",
        ));
    }
    let value: Value = serde_json::from_slice(raw).map_err(|e| {
        HttpError::bad_request().with_description(format!("Failed to decode JSON object: {e}"))
    })?;
    if !B::DECLARED && is_truthy(&value) {
        debug!("request carried a body but no body model was declared");
        return Err(HttpError::bad_request().with_description("Bad request"));
    }
    if B::DECLARED && !value.is_object() {
        return Err(reject(Location::Body, "expected a JSON object".to_owned()));
    }
    B::from_json(value)
        .map(Some)
        .map_err(|e| reject(Location::Body, e.to_string()))
}

fn is_json(mime: &str) -> bool {
    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;
    use serde::Deserialize;
    use std::collections::HashMap;

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Pair {
        id: i64,
        msg: String,
    }

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Optional {
        x: Option<i64>,
    }

    #[rstest]
    #[case(json!(null), false)]
    #[case(json!({}), false)]
    #[case(json!([]), false)]
    #[case(json!(""), false)]
    #[case(json!(0), false)]
    #[case(json!({ "a": 1 }), true)]
    #[case(json!([1]), true)]
    #[case(json!("x"), true)]
    fn truthiness_follows_emptiness(#[case] value: Value, #[case] expected: bool) {
        assert_eq!(is_truthy(&value), expected);
    }

    #[rstest]
    #[case("application/json", true)]
    #[case("application/problem+json", true)]
    #[case("text/plain", false)]
    #[case("", false)]
    fn json_mime_detection(#[case] mime: &str, #[case] expected: bool) {
        assert_eq!(is_json(mime), expected);
    }

    #[test]
    fn has_body_checks_framing_headers() {
        let bare = TestRequest::get().to_http_request();
        assert!(!has_body(&bare));

        let sized = TestRequest::post()
            .insert_header((CONTENT_LENGTH, "0"))
            .to_http_request();
        assert!(has_body(&sized));

        let chunked = TestRequest::post()
            .insert_header((TRANSFER_ENCODING, "chunked"))
            .to_http_request();
        assert!(has_body(&chunked));
    }

    #[test]
    fn schema_coerces_encoded_numbers() {
        let parsed = Schema::<Pair>::from_encoded("id=7&msg=hi").expect("valid pairs");
        assert_eq!(parsed.0, Pair { id: 7, msg: "hi".to_owned() });
    }

    #[test]
    fn schema_rejects_uncoercible_values() {
        assert!(Schema::<Pair>::from_encoded("id=seven&msg=hi").is_err());
    }

    #[test]
    fn missing_optional_fields_dump_as_null() {
        let parsed = Schema::<Optional>::from_encoded("").expect("defaults apply");
        assert_eq!(parsed.dump(), json!({ "x": null }));
    }

    #[test]
    fn skip_ignores_input() {
        assert_eq!(Skip::from_encoded("id=seven").expect("ignored"), Skip);
        assert_eq!(Skip.dump(), json!({}));
    }

    #[test]
    fn undeclared_body_accepts_empty_object() {
        let req = TestRequest::post()
            .insert_header(("content-type", "application/json"))
            .to_http_request();
        assert!(validate_body::<Skip>(&req, b"{}").is_ok());
        let rejected = validate_body::<Skip>(&req, br#"{"a":1}"#).expect_err("unexpected body");
        assert_eq!(rejected.description(), "Bad request");
    }

    #[derive(Debug, Deserialize, Serialize, PartialEq)]
    struct Named {
        #[serde(rename(deserialize = "bodyParam"))]
        body_param: String,
    }

    fn json_request() -> HttpRequest {
        TestRequest::post()
            .insert_header(("content-type", "application/json"))
            .to_http_request()
    }

    #[test]
    fn empty_payload_skips_declared_body() {
        let body = validate_body::<Schema<Named>>(&json_request(), b"").expect("not validated");
        assert!(body.is_none());
    }

    #[rstest]
    #[case(br#"["x"]"#.as_slice())]
    #[case(b"\"x\"".as_slice())]
    #[case(b"7".as_slice())]
    fn declared_body_must_be_an_object(#[case] raw: &[u8]) {
        let err = validate_body::<Schema<Named>>(&json_request(), raw).expect_err("rejected");
        assert_eq!(err.code(), 400);
        assert_eq!(err.details().map(|d| d["location"].clone()), Some(json!("body")));
    }

    #[rstest]
    #[case("x=1&x=2", "x=1")]
    #[case("y=a&x=1&y=b", "y=a&x=1")]
    #[case("", "")]
    fn repeated_query_keys_keep_first_value(#[case] query: &str, #[case] expected: &str) {
        assert_eq!(first_values(query).expect("decodable"), expected);
    }

    #[test]
    fn unserialisable_section_dumps_null() {
        let section = Schema(HashMap::from([((1, 2), 3)]));
        assert_eq!(section.dump(), Value::Null);
    }

    #[test]
    fn absent_body_echoes_empty_object() {
        let validated = Validated::<Skip, Skip, Schema<Named>> {
            path: Skip,
            query: Skip,
            body: None,
        };
        assert_eq!(validated.echo()["body"], json!({}));
    }

    #[test]
    fn non_json_body_is_unsupported() {
        let req = TestRequest::post()
            .insert_header(("content-type", "text/plain"))
            .to_http_request();
        let err = validate_body::<Schema<Optional>>(&req, b"x=1").expect_err("rejected");
        assert_eq!(err.code(), 415);
    }
}
