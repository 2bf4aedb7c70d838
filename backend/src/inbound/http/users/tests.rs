//! Tests for users API handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::MockUserDirectory;
use crate::domain::{Error, UserId};
use crate::inbound::http::error::json_config;

const ADA_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn ada() -> User {
    User::new(
        UserId::new(ADA_ID).expect("id"),
        FirstName::new("Ada").expect("first name"),
        LastName::new("Lovelace").expect("last name"),
        EmailAddress::new("ada@example.com").expect("email"),
    )
}

fn test_app(
    directory: MockUserDirectory,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(Arc::new(directory))))
        .app_data(json_config())
        .service(web::scope("/api").configure(configure))
}

async fn send(
    directory: MockUserDirectory,
    request: actix_test::TestRequest,
) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(directory)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let value = serde_json::from_slice(&body).expect("json body");
    (status, value)
}

fn untouched() -> MockUserDirectory {
    let mut directory = MockUserDirectory::new();
    directory.expect_list_users().times(0);
    directory.expect_get_user().times(0);
    directory.expect_create_user().times(0);
    directory.expect_update_user().times(0);
    directory.expect_delete_user().times(0);
    directory
}

#[actix_web::test]
async fn list_wraps_users() {
    let mut directory = MockUserDirectory::new();
    directory.expect_list_users().return_once(|| Ok(vec![ada()]));

    let (status, body) = send(directory, actix_test::TestRequest::get().uri("/api/users")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "users": [{
            "id": ADA_ID,
            "firstname": "Ada",
            "lastname": "Lovelace",
            "email": "ada@example.com",
        }]})
    );
}

#[actix_web::test]
async fn get_wraps_single_user() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_get_user()
        .withf(|id| id.to_string() == ADA_ID)
        .return_once(|_| Ok(ada()));

    let uri = format!("/api/users/{ADA_ID}");
    let (status, body) = send(directory, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["email"], "ada@example.com");
}

#[rstest]
#[case(actix_test::TestRequest::get())]
#[case(actix_test::TestRequest::delete())]
#[actix_web::test]
async fn malformed_id_is_rejected_before_the_service(#[case] request: actix_test::TestRequest) {
    let (status, body) = send(untouched(), request.uri("/api/users/not-an-id")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Not a valid user id" }));
}

#[actix_web::test]
async fn missing_user_is_404_once() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_get_user()
        .times(1)
        .return_once(|_| Err(Error::not_found("User does not exist")));

    let uri = format!("/api/users/{ADA_ID}");
    let (status, body) = send(directory, actix_test::TestRequest::get().uri(&uri)).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "User does not exist" }));
}

#[actix_web::test]
async fn create_returns_201_with_user() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_create_user()
        .withf(|user| user.email.as_ref() == "ada@example.com" && user.firstname.as_ref() == "Ada")
        .return_once(|_| Ok(ada()));

    let request = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "firstname": " Ada ", "lastname": "Lovelace", "email": "ADA@example.com" }));
    let (status, body) = send(directory, request).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["id"], ADA_ID);
}

#[rstest]
#[case(json!({ "lastname": "Li", "email": "jo@x.com" }), "First name is required")]
#[case(json!({ "firstname": "  ", "lastname": "Li", "email": "jo@x.com" }), "First name is required")]
#[case(json!({ "firstname": "Jo", "email": "jo@x.com" }), "Last name is required")]
#[case(json!({ "firstname": "Jo", "lastname": "Li", "email": "jo.x.com" }), "Email not valid")]
#[case(json!({ "firstname": "Jo", "lastname": "Li" }), "Email not valid")]
#[case(json!({ "firstname": "J", "lastname": "Li", "email": "jo@x.com" }), "First name must be between 2 and 32 characters")]
#[case(json!({ "firstname": "Jo", "lastname": "L", "email": "jo@x.com" }), "Last name must be between 2 and 32 characters")]
#[case(json!({}), "First name is required")]
#[actix_web::test]
async fn create_reports_first_violation(#[case] payload: Value, #[case] message: &str) {
    let request = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(payload);
    let (status, body) = send(untouched(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": message }));
}

#[actix_web::test]
async fn conflict_is_409() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_create_user()
        .return_once(|_| Err(Error::conflict("User already exists")));

    let request = actix_test::TestRequest::post()
        .uri("/api/users")
        .set_json(json!({ "firstname": "Jo", "lastname": "Li", "email": "jo@x.com" }));
    let (status, body) = send(directory, request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({ "error": "User already exists" }));
}

#[actix_web::test]
async fn update_builds_patch_from_present_fields() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_update_user()
        .withf(|_, patch| {
            patch.firstname.as_ref().map(|name| name.to_string()) == Some("Jon".to_owned())
                && patch.lastname.is_none()
                && patch.email.is_none()
        })
        .return_once(|_, _| Ok(ada()));

    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/users/{ADA_ID}"))
        .set_json(json!({ "firstname": "Jon" }));
    let (status, _) = send(directory, request).await;

    assert_eq!(status, StatusCode::OK);
}

#[rstest]
#[case(json!({ "firstname": "Jon", "role": "admin" }), "Malformed request body")]
#[case(json!({ "email": "nope" }), "Email not valid")]
#[case(json!({ "lastname": "" }), "Last name is required")]
#[case(json!({ "firstname": "J" }), "First name must be between 2 and 32 characters")]
#[case(json!({ "firstname": 7 }), "Malformed request body")]
#[actix_web::test]
async fn update_rejects_bad_bodies(#[case] payload: Value, #[case] message: &str) {
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/users/{ADA_ID}"))
        .set_json(payload);
    let (status, body) = send(untouched(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": message }));
}

#[rstest]
#[case(Some("{oops"))]
#[case(None)]
#[actix_web::test]
async fn update_checks_the_id_before_the_body(#[case] payload: Option<&'static str>) {
    let mut request = actix_test::TestRequest::put().uri("/api/users/not-an-id");
    if let Some(payload) = payload {
        request = request
            .insert_header(("content-type", "application/json"))
            .set_payload(payload);
    }
    let (status, body) = send(untouched(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Not a valid user id" }));
}

#[actix_web::test]
async fn update_without_body_is_an_empty_patch() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_update_user()
        .withf(|_, patch| patch.is_empty())
        .times(1)
        .return_once(|_, _| Ok(ada()));

    let request = actix_test::TestRequest::put().uri(&format!("/api/users/{ADA_ID}"));
    let (status, body) = send(directory, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], ADA_ID);
}

#[actix_web::test]
async fn unparseable_update_body_is_malformed() {
    let request = actix_test::TestRequest::put()
        .uri(&format!("/api/users/{ADA_ID}"))
        .insert_header(("content-type", "application/json"))
        .set_payload("{oops");
    let (status, body) = send(untouched(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Malformed request body" }));
}

#[actix_web::test]
async fn non_json_body_is_malformed() {
    let request = actix_test::TestRequest::post()
        .uri("/api/users")
        .insert_header(("content-type", "application/json"))
        .set_payload("{not json");
    let (status, body) = send(untouched(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Malformed request body" }));
}

#[actix_web::test]
async fn delete_returns_removed_user() {
    let mut directory = MockUserDirectory::new();
    directory.expect_delete_user().return_once(|_| Ok(ada()));

    let request = actix_test::TestRequest::delete().uri(&format!("/api/users/{ADA_ID}"));
    let (status, body) = send(directory, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["lastname"], "Lovelace");
}

#[actix_web::test]
async fn internal_errors_are_generic() {
    let mut directory = MockUserDirectory::new();
    directory
        .expect_list_users()
        .return_once(|| Err(Error::internal("user repository query failed: relation missing")));

    let (status, body) = send(directory, actix_test::TestRequest::get().uri("/api/users")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Internal server error" }));
}
