//! Regression coverage for this module.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use crate::domain::{Error, User, Username};
use crate::inbound::http::test_utils::{MockPorts, api_app, test_user};

fn ada() -> User {
    User::new(test_user(), Username::new("ada").expect("valid username"), false)
}

#[actix_web::test]
async fn signup_creates_an_account() {
    let mut ports = MockPorts::default();
    ports
        .signup
        .expect_register()
        .withf(|request| request.username().as_ref() == "ada")
        .times(1)
        .returning(|_| Ok(ada()));
    let app = actix_test::init_service(api_app(ports.into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(json!({"username": "ada", "password": "analytical-engine"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({"id": test_user().to_string(), "username": "ada"}));
}

#[rstest]
#[case("ada", "short", "password")]
#[case("ada", "12345678901", "password")]
#[case("ada", "password", "password")]
#[case("not valid!", "analytical-engine", "username")]
#[actix_web::test]
async fn signup_rejects_policy_violations(
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let mut ports = MockPorts::default();
    ports.signup.expect_register().never();
    let app = actix_test::init_service(api_app(ports.into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/signup")
            .set_json(json!({"username": username, "password": password}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert!(body["details"]["fields"][field].is_array());
}

#[actix_web::test]
async fn login_sets_a_session_cookie() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .withf(|credentials| credentials.username() == "ada")
        .times(1)
        .returning(|_| Ok(test_user()));
    let app = actix_test::init_service(api_app(ports.into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": " ada ", "password": "analytical-engine"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.response().cookies().any(|cookie| cookie.name() == "session"));
}

#[actix_web::test]
async fn bad_credentials_are_unauthorised() {
    let mut ports = MockPorts::default();
    ports
        .login
        .expect_authenticate()
        .times(1)
        .returning(|_| Err(Error::unauthorized("invalid credentials")));
    let app = actix_test::init_service(api_app(ports.into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": "ada", "password": "wrong"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.response().cookies().next().is_none());
}

#[rstest]
#[case("   ", "secret", "username")]
#[case("ada", "", "password")]
#[actix_web::test]
async fn blank_login_fields_are_rejected(
    #[case] username: &str,
    #[case] password: &str,
    #[case] field: &str,
) {
    let mut ports = MockPorts::default();
    ports.login.expect_authenticate().never();
    let app = actix_test::init_service(api_app(ports.into_state())).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": username, "password": password}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(res).await;
    assert!(body["details"]["fields"][field].is_array());
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let app = actix_test::init_service(api_app(MockPorts::default().into_state())).await;
    let cookie =
        crate::inbound::http::test_utils::session_cookie(&app, &test_user()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let removal = res
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("removal cookie");
    assert_eq!(removal.value(), "");
}
