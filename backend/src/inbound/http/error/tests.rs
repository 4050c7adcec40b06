//! Regression coverage for this module.

use super::*;
use actix_web::body::to_bytes;
use actix_web::{App, HttpResponse, test as actix_test, web};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::too_many_requests("slow down"), StatusCode::TOO_MANY_REQUESTS)]
#[case(Error::service_unavailable("db down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] error: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&error), status);
}

struct Rendered {
    status: StatusCode,
    trace_header: Option<String>,
    body: Value,
}

async fn render(error: &Error) -> Rendered {
    let response = ResponseError::error_response(error);
    let status = response.status();
    let trace_header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    Rendered {
        status,
        trace_header,
        body: serde_json::from_slice(&bytes).expect("error body is JSON"),
    }
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(expected_trace_id: String) {
    let error = Error::internal("connection string leaked")
        .with_trace_id(expected_trace_id.clone())
        .with_details(json!({"secret": "x"}));

    let rendered = render(&error).await;

    assert_eq!(rendered.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        rendered.trace_header.as_deref(),
        Some(expected_trace_id.as_str())
    );
    assert_eq!(
        rendered.body,
        json!({
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": expected_trace_id,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn validation_details_reach_the_client(expected_trace_id: String) {
    let details = json!({"fields": {"name": ["must not be empty"]}});
    let error = Error::invalid_request("invalid deck")
        .with_trace_id(expected_trace_id)
        .with_details(details.clone());

    let rendered = render(&error).await;

    assert_eq!(rendered.status, StatusCode::BAD_REQUEST);
    assert_eq!(rendered.body["code"], "invalid_request");
    assert_eq!(rendered.body["message"], "invalid deck");
    assert_eq!(rendered.body["details"], details);
}

#[rstest]
#[actix_web::test]
async fn errors_without_trace_id_omit_the_header() {
    let rendered = render(&Error::not_found("deck 7 not found")).await;

    assert!(rendered.trace_header.is_none());
    assert!(rendered.body.get("traceId").is_none());
    assert_eq!(rendered.body["code"], "not_found");
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();

    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert_eq!(err.details(), None);
}

#[derive(Deserialize)]
struct Paging {
    #[serde(rename = "limit")]
    _limit: u32,
}

#[actix_web::test]
async fn malformed_payloads_use_the_standard_error_body() {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .route(
                "/json",
                web::post().to(|_: web::Json<Value>| async { HttpResponse::Ok().finish() }),
            )
            .route(
                "/query",
                web::get().to(|_: web::Query<Paging>| async { HttpResponse::Ok().finish() }),
            ),
    )
    .await;

    let json_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/json")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request(),
    )
    .await;
    let query_res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/query?limit=lots").to_request(),
    )
    .await;

    assert_eq!(json_res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(query_res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(json_res).await;
    assert_eq!(body["code"], "invalid_request");
}
