//! Envelope responses.
//!
//! ```text
//! GET /       {"status":"ok"}
//! GET /user   201, envelope around one user
//! GET /users  200, envelope around a list of users
//! ```

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, get, web};
use serde_json::{Value, json};

use crate::middleware::json_by_default;
use crate::models::{Envelope, UserData};

/// Plain JSON keeps working next to the envelope routes.
#[get("/")]
pub async fn index() -> web::Json<Value> {
    web::Json(json!({ "status": "ok" }))
}

/// A single user, reported as created.
#[get("/user")]
pub async fn user() -> Envelope<UserData> {
    Envelope::new(UserData::new(1, "Bob", "bob@example.com")).with_status(StatusCode::CREATED)
}

/// All known users.
#[get("/users")]
pub async fn users() -> Envelope<Vec<UserData>> {
    Envelope::new(vec![
        UserData::new(1, "John Doe", "john@example.com"),
        UserData::new(2, "Jane Doe", "jane@example.com"),
    ])
}

/// Envelope demo application; untyped responses default to JSON.
///
/// # Examples
/// ```
/// use route_idioms::api::custom_responses;
///
/// let app = custom_responses::app();
/// ```
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
        .wrap(json_by_default())
        .service(index)
        .service(user)
        .service(users)
}
