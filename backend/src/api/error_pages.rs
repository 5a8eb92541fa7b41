//! Split error handling: HTML pages for views, JSON under `/api`.
//!
//! ```text
//! GET /{code}      aborts with code, rendered as an HTML page
//! GET /api/{code}  aborts with code, JSON for registered statuses
//! ```
//!
//! 404 and 405 are handled for the whole application and switch to JSON when
//! the request path starts with `/api`. 400, 401, 403, 415 and 500 are only
//! handled inside the `/api` scope. Every other status keeps the HTML page.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{App, HttpResponse, ResponseError, web};
use tracing::warn;

use crate::models::HttpError;

/// Path prefix of the JSON endpoints.
pub const API_PREFIX: &str = "/api";

/// Statuses rendered as JSON inside the `/api` scope.
pub const API_STATUSES: [StatusCode; 5] = [
    StatusCode::BAD_REQUEST,
    StatusCode::UNAUTHORIZED,
    StatusCode::FORBIDDEN,
    StatusCode::UNSUPPORTED_MEDIA_TYPE,
    StatusCode::INTERNAL_SERVER_ERROR,
];

/// Statuses handled for every path.
pub const GLOBAL_STATUSES: [StatusCode; 2] = [StatusCode::NOT_FOUND, StatusCode::METHOD_NOT_ALLOWED];

/// An abort rendered as the default HTML page unless a handler intervenes.
#[derive(Debug, Clone)]
pub struct ErrorPage(HttpError);

impl ErrorPage {
    /// Abort with `code`; unknown codes surface as a 500.
    #[must_use]
    pub fn abort(code: u32) -> Self {
        Self(HttpError::abort(code).unwrap_or_else(|err| {
            warn!(error = %err, "abort with unregistered status");
            HttpError::internal()
        }))
    }

    /// The wrapped error.
    #[must_use]
    pub const fn error(&self) -> &HttpError {
        &self.0
    }
}

impl std::fmt::Display for ErrorPage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.0, f)
    }
}

impl ResponseError for ErrorPage {
    fn status_code(&self) -> StatusCode {
        self.0.status()
    }

    fn error_response(&self) -> HttpResponse {
        self.0.page()
    }
}

async fn abort_with(code: web::Path<u32>) -> Result<HttpResponse, ErrorPage> {
    Err(ErrorPage::abort(code.into_inner()))
}

/// Recover the abort that produced `res`, or describe its status.
fn abort_of<B>(res: &ServiceResponse<B>) -> HttpError {
    res.response()
        .error()
        .and_then(|err| err.as_error::<ErrorPage>())
        .map_or_else(|| HttpError::from_status(res.status()), |page| page.error().clone())
}

fn replace<B>(
    res: ServiceResponse<B>,
    render: impl FnOnce(&HttpError) -> HttpResponse,
) -> ErrorHandlerResponse<B> {
    let error = abort_of(&res);
    let (req, _) = res.into_parts();
    let response = render(&error);
    ErrorHandlerResponse::Response(ServiceResponse::new(req, response).map_into_right_body())
}

fn render_json(error: &HttpError) -> HttpResponse {
    HttpResponse::build(error.status()).json(error.nested_body())
}

fn api_handler<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    Ok(replace(res, render_json))
}

fn global_handler<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    if res.request().path().starts_with(API_PREFIX) {
        Ok(replace(res, render_json))
    } else {
        Ok(replace(res, HttpError::page))
    }
}

fn handlers<B: 'static>(
    statuses: &[StatusCode],
    handler: fn(ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>>,
) -> ErrorHandlers<B> {
    statuses
        .iter()
        .fold(ErrorHandlers::new(), |handlers, status| handlers.handler(*status, handler))
}

/// Error page demo application.
pub fn app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let api = web::scope(API_PREFIX)
        .wrap(handlers(&API_STATUSES, api_handler))
        .service(web::resource("/{error_code}").route(web::get().to(abort_with)));

    App::new()
        .wrap(handlers(&GLOBAL_STATUSES, global_handler))
        .service(api)
        .service(web::resource("/{error_code}").route(web::get().to(abort_with)))
}
