//! HTTP behaviour of the flat JSON error demo.

use actix_web::http::StatusCode;
use actix_web::{dev::ServiceResponse, test};
use route_idioms::api::simple_errors;
use route_idioms::middleware::headers::{CUSTOM_HEADER, CUSTOM_HEADER_VALUE};
use rstest::rstest;
use serde_json::{Value, json};

async fn call(req: test::TestRequest) -> ServiceResponse {
    let app = test::init_service(simple_errors::app()).await;
    test::call_service(&app, req.to_request())
        .await
        .map_into_boxed_body()
}

fn has_custom_header(res: &ServiceResponse) -> bool {
    res.headers()
        .get(CUSTOM_HEADER)
        .and_then(|v| v.to_str().ok())
        == Some(CUSTOM_HEADER_VALUE)
}

#[actix_web::test]
async fn index_is_ok_with_custom_header() {
    let res = call(test::TestRequest::get().uri("/")).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(has_custom_header(&res));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({ "message": "OK" }));
}

#[rstest]
#[case(400, "Bad Request")]
#[case(403, "Forbidden")]
#[case(404, "Not Found")]
#[case(418, "I'm a teapot")]
#[case(503, "Service Unavailable")]
#[actix_web::test]
async fn aborts_render_flat(#[case] code: u16, #[case] name: &str) {
    let res = call(test::TestRequest::get().uri(&format!("/errors/{code}"))).await;
    assert_eq!(res.status().as_u16(), code);
    assert!(has_custom_header(&res));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], name);
    assert_eq!(body["code"], code);
    assert!(body["msg"].is_string());
}

#[actix_web::test]
async fn exception_is_redacted_internal_error() {
    let res = call(test::TestRequest::get().uri("/exception")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(has_custom_header(&res));
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Internal Server Error");
    assert_eq!(body["code"], 500);
    assert!(body["message"].is_string());
    assert!(!body.to_string().contains("AAA"));
}

#[actix_web::test]
async fn unregistered_code_is_internal_error() {
    let res = call(test::TestRequest::get().uri("/errors/200")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["error"], "Internal Server Error");
}

#[actix_web::test]
async fn framework_errors_render_flat() {
    let missing = call(test::TestRequest::get().uri("/nowhere")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(missing).await;
    assert_eq!(body["error"], "Not Found");

    let wrong_method = call(test::TestRequest::post().uri("/")).await;
    assert_eq!(wrong_method.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = test::read_body_json(wrong_method).await;
    assert_eq!(body["code"], 405);
}

#[actix_web::test]
async fn out_of_range_code_is_internal_error() {
    let res = call(test::TestRequest::get().uri("/errors/99999")).await;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], 500);
}
