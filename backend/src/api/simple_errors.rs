//! Flat JSON error handlers.
//!
//! ```text
//! GET /               {"message":"OK"}
//! GET /errors/{code}  {"error": name, "msg": description, "code": code}
//! GET /exception      500 {"error": "Internal Server Error", "message": …, "code": 500}
//! ```
//!
//! Errors produced by the framework itself (unknown route, wrong method) get
//! the same flat rendering. Every response carries `X-Custom-Header`.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::CONTENT_TYPE;
use actix_web::middleware::{ErrorHandlerResponse, ErrorHandlers};
use actix_web::{App, HttpResponse, web};
use serde_json::{Value, json};

use crate::middleware::custom_header;
use crate::models::{AppError, AppResult, HttpError};

async fn index() -> web::Json<Value> {
    web::Json(json!({ "message": "OK" }))
}

async fn abort_with(code: web::Path<u32>) -> AppResult<HttpResponse> {
    Err(HttpError::abort(code.into_inner())?.into())
}

async fn exception() -> AppResult<HttpResponse> {
    Err(AppError::unhandled(std::io::Error::other("AAA")))
}

fn is_json<B>(res: &ServiceResponse<B>) -> bool {
    res.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Render any error response that is not already JSON in the flat format.
fn render_flat<B>(res: ServiceResponse<B>) -> actix_web::Result<ErrorHandlerResponse<B>> {
    if is_json(&res) {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }
    let error = HttpError::from_status(res.status());
    let (req, _) = res.into_parts();
    let response = HttpResponse::build(error.status()).json(error.flat_body());
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

/// Simple error demo application.
pub fn app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(ErrorHandlers::new().default_handler(render_flat))
        .wrap(custom_header())
        .service(web::resource("/").route(web::get().to(index)))
        .service(web::resource("/errors/{code}").route(web::get().to(abort_with)))
        .service(web::resource("/exception").route(web::get().to(exception)))
}
