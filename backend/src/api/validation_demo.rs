//! Routes exercising every combination of validated sections.
//!
//! Each handler echoes what it received after validation:
//!
//! ```text
//! GET /qpb/1/hello?x=2  {"path":{"id":1,"msg":"hello"},"query":{"x":2,"y":null},"body":{}}
//! ```

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpRequest, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::validation::{Schema, Section, Skip, Validated, has_body};

/// Two path segments.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct PathModel {
    /// Numeric identifier segment.
    pub id: i64,
    /// Free text segment.
    pub msg: String,
}

/// A single numeric path segment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UserModel {
    /// Numeric identifier segment.
    pub id: i64,
}

/// Optional query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct QueryModel {
    /// Optional integer.
    pub x: Option<i64>,
    /// Optional text.
    pub y: Option<String>,
}

/// JSON body submitted via POST, read from `bodyParam`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BodyModel {
    /// Required text field.
    #[serde(rename(deserialize = "bodyParam"))]
    pub body_param: String,
}

type Echo = web::Json<Value>;

async fn echo<P: Section, Q: Section, B: Section>(params: Validated<P, Q, B>) -> Echo {
    web::Json(params.echo())
}

async fn debug(req: HttpRequest) -> Echo {
    web::Json(json!({ "body": has_body(&req) }))
}

/// Validation demo application.
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
        .service(web::resource("/").route(web::get().to(echo::<Skip, Skip, Skip>)))
        .service(
            web::resource("/users/{id}")
                .route(web::get().to(echo::<Schema<UserModel>, Skip, Skip>)),
        )
        .service(
            web::resource("/body").route(web::post().to(echo::<Skip, Skip, Schema<BodyModel>>)),
        )
        .service(
            web::resource("/query").route(web::get().to(echo::<Skip, Schema<QueryModel>, Skip>)),
        )
        .service(
            web::resource("/path/{id}/to/{msg}")
                .route(web::get().to(echo::<Schema<PathModel>, Skip, Skip>)),
        )
        .service(
            web::resource("/bq")
                .route(web::get().to(echo::<Skip, Schema<QueryModel>, Schema<BodyModel>>))
                .route(web::post().to(echo::<Skip, Schema<QueryModel>, Schema<BodyModel>>)),
        )
        .service(
            web::resource("/bp/{id}/{msg}")
                .route(web::get().to(echo::<Schema<PathModel>, Skip, Schema<BodyModel>>))
                .route(web::post().to(echo::<Schema<PathModel>, Skip, Schema<BodyModel>>)),
        )
        .service(
            web::resource("/qp/{id}/{msg}")
                .route(web::get().to(echo::<Schema<PathModel>, Schema<QueryModel>, Skip>)),
        )
        .service(
            web::resource("/qpb/{id}/{msg}")
                .route(
                    web::get()
                        .to(echo::<Schema<PathModel>, Schema<QueryModel>, Schema<BodyModel>>),
                )
                .route(
                    web::post()
                        .to(echo::<Schema<PathModel>, Schema<QueryModel>, Schema<BodyModel>>),
                ),
        )
        .service(
            web::resource("/debug")
                .route(web::get().to(debug))
                .route(web::post().to(debug)),
        )
}
