//! Response header defaults.

use actix_web::http::header::{CONTENT_TYPE, ContentType};
use actix_web::middleware::DefaultHeaders;

/// Name of the header stamped on every response by [`custom_header`].
pub const CUSTOM_HEADER: &str = "X-Custom-Header";

/// Value of [`CUSTOM_HEADER`].
pub const CUSTOM_HEADER_VALUE: &str = "Value";

/// Give responses without an explicit content type `application/json`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use route_idioms::middleware::json_by_default;
///
/// let app = App::new().wrap(json_by_default());
/// ```
#[must_use]
pub fn json_by_default() -> DefaultHeaders {
    DefaultHeaders::new().add((CONTENT_TYPE, ContentType::json()))
}

/// Stamp [`CUSTOM_HEADER`] on every response, error responses included.
#[must_use]
pub fn custom_header() -> DefaultHeaders {
    DefaultHeaders::new().add((CUSTOM_HEADER, CUSTOM_HEADER_VALUE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, test, web};

    #[actix_web::test]
    async fn untyped_bodies_become_json() {
        let app = test::init_service(App::new().wrap(json_by_default()).route(
            "/",
            web::get().to(|| async { HttpResponse::Ok().body(r#"{"raw":true}"#) }),
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(
            res.headers().get(CONTENT_TYPE).and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
    }

    #[actix_web::test]
    async fn explicit_content_type_is_kept() {
        let app = test::init_service(App::new().wrap(json_by_default()).route(
            "/",
            web::get().to(|| async {
                HttpResponse::Ok()
                    .content_type(ContentType::plaintext())
                    .body("plain")
            }),
        ))
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        let content_type = res
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/plain"));
    }

    #[actix_web::test]
    async fn custom_header_is_stamped() {
        let app = test::init_service(
            App::new()
                .wrap(custom_header())
                .route("/", web::get().to(|| async { HttpResponse::NotFound().finish() })),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(
            res.headers().get(CUSTOM_HEADER).and_then(|v| v.to_str().ok()),
            Some(CUSTOM_HEADER_VALUE)
        );
    }
}
