//! Tests for todo HTTP handlers.

use super::*;
use actix_web::http::StatusCode;
use actix_web::http::header::{AUTHORIZATION, LOCATION, WWW_AUTHENTICATE};
use actix_web::{App, test as actix_test, web};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde_json::Value;

fn test_app() -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::default()))
        .service(create_todo)
        .service(list_todos)
        .service(list_todos_due)
        .service(list_todos_by_completion)
        .service(get_todo)
        .service(update_todo)
        .service(delete_todo)
}

fn basic(username: &str, password: &str) -> (actix_web::http::header::HeaderName, String) {
    let encoded = STANDARD.encode(format!("{username}:{password}"));
    (AUTHORIZATION, format!("Basic {encoded}"))
}

fn user1() -> (actix_web::http::header::HeaderName, String) {
    basic("user1", "password1")
}

fn user2() -> (actix_web::http::header::HeaderName, String) {
    basic("user2", "password2")
}

async fn create(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    >,
    auth: (actix_web::http::header::HeaderName, String),
    payload: Value,
) -> String {
    let request = actix_test::TestRequest::post()
        .uri("/todos")
        .insert_header(auth)
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(app, request).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header");
    location
        .strip_prefix("/todos/")
        .expect("location points at /todos/{id}")
        .to_owned()
}

fn sample_payload() -> Value {
    serde_json::json!({
        "title": "Water the plants",
        "description": "Front garden only",
        "dueDate": "2025-07-01"
    })
}

#[actix_web::test]
async fn create_returns_created_with_location_and_empty_body() {
    let app = actix_test::init_service(test_app()).await;

    let request = actix_test::TestRequest::post()
        .uri("/todos")
        .insert_header(user1())
        .set_json(sample_payload())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response
        .headers()
        .get(LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("location header")
        .to_owned();
    assert!(location.starts_with("/todos/"));
    let body = actix_test::read_body(response).await;
    assert!(body.is_empty());
}

#[actix_web::test]
async fn created_todo_is_retrievable_and_owned_by_the_caller() {
    let app = actix_test::init_service(test_app()).await;
    let id = create(&app, user1(), sample_payload()).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/todos/{id}"))
        .insert_header(user1())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["title"], "Water the plants");
    assert_eq!(body["description"], "Front garden only");
    assert_eq!(body["completed"], false);
    assert_eq!(body["dueDate"], "2025-07-01");
    assert_eq!(body["owner"], "user1");
    assert!(body.get("createdAt").is_some());
    assert!(body.get("updatedAt").is_some());
}

#[actix_web::test]
async fn client_supplied_owner_is_ignored() {
    let app = actix_test::init_service(test_app()).await;

    let mut payload = sample_payload();
    payload["owner"] = Value::String("user2".to_owned());
    let id = create(&app, user1(), payload).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/todos/{id}"))
        .insert_header(user1())
        .to_request();
    let body: Value = actix_test::read_body_json(actix_test::call_service(&app, request).await).await;
    assert_eq!(body["owner"], "user1");
}

#[actix_web::test]
async fn missing_credentials_are_challenged() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/todos").to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(
        response
            .headers()
            .get(WWW_AUTHENTICATE)
            .and_then(|value| value.to_str().ok()),
        Some("Basic realm=\"todos\"")
    );
}

#[actix_web::test]
async fn wrong_password_is_unauthorized() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos")
            .insert_header(basic("user1", "wrong"))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn listing_only_returns_the_callers_todos() {
    let app = actix_test::init_service(test_app()).await;
    create(&app, user1(), sample_payload()).await;
    create(
        &app,
        user2(),
        serde_json::json!({ "title": "Someone else's task" }),
    )
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos")
            .insert_header(user1())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["totalElements"], 1);
    assert_eq!(body["items"][0]["owner"], "user1");
}

#[actix_web::test]
async fn listing_sorts_and_paginates() {
    let app = actix_test::init_service(test_app()).await;
    for (title, due) in [
        ("c", "2025-03-01"),
        ("a", "2025-01-01"),
        ("b", "2025-02-01"),
    ] {
        create(
            &app,
            user1(),
            serde_json::json!({ "title": title, "dueDate": due }),
        )
        .await;
    }

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos?sort=dueDate,desc&page=0&size=2")
            .insert_header(user1())
            .to_request(),
    )
    .await;

    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["totalElements"], 3);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["page"], 0);
    assert_eq!(body["size"], 2);
    let titles: Vec<&str> = body["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| item["title"].as_str().expect("title"))
        .collect();
    assert_eq!(titles, vec!["c", "b"]);
}

#[actix_web::test]
async fn unknown_sort_field_is_rejected_with_details() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos?sort=owner,asc")
            .insert_header(user1())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["code"], "unknown_sort_field");
}

#[actix_web::test]
async fn zero_page_size_is_rejected() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos?size=0")
            .insert_header(user1())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn due_listing_is_inclusive_and_open_ended() {
    let app = actix_test::init_service(test_app()).await;
    for (title, due) in [
        ("early", "2025-01-10"),
        ("mid", "2025-02-10"),
        ("late", "2025-03-10"),
    ] {
        create(
            &app,
            user1(),
            serde_json::json!({ "title": title, "dueDate": due }),
        )
        .await;
    }
    create(&app, user1(), serde_json::json!({ "title": "undated" })).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos/due?start=2025-01-10&end=2025-02-10")
            .insert_header(user1())
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["totalElements"], 2);

    // An omitted bound widens to everything with a due date.
    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos/due?start=2025-02-01")
            .insert_header(user1())
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["totalElements"], 2);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos/due")
            .insert_header(user1())
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["totalElements"], 3);
}

#[actix_web::test]
async fn malformed_due_bound_is_rejected() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos/due?start=10-01-2025")
            .insert_header(user1())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn completion_listing_filters_by_status() {
    let app = actix_test::init_service(test_app()).await;
    create(
        &app,
        user1(),
        serde_json::json!({ "title": "done", "completed": true }),
    )
    .await;
    create(&app, user1(), serde_json::json!({ "title": "open" })).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos/completed/true")
            .insert_header(user1())
            .to_request(),
    )
    .await;
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["totalElements"], 1);
    assert_eq!(body["items"][0]["title"], "done");

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos/completed/maybe")
            .insert_header(user1())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn foreign_todos_are_indistinguishable_from_missing_ones() {
    let app = actix_test::init_service(test_app()).await;
    let id = create(&app, user1(), sample_payload()).await;

    let foreign = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/todos/{id}"))
            .insert_header(user2())
            .to_request(),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::NOT_FOUND);
    let foreign_body: Value = actix_test::read_body_json(foreign).await;

    let missing = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/todos/{}", uuid::Uuid::new_v4()))
            .insert_header(user2())
            .to_request(),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let missing_body: Value = actix_test::read_body_json(missing).await;

    assert_eq!(foreign_body["code"], missing_body["code"]);
    assert_eq!(foreign_body["message"], missing_body["message"]);
}

#[actix_web::test]
async fn malformed_identifiers_are_rejected() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos/not-a-uuid")
            .insert_header(user1())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn update_replaces_fields_and_preserves_identity() {
    let app = actix_test::init_service(test_app()).await;
    let id = create(&app, user1(), sample_payload()).await;

    let before: Value = actix_test::read_body_json(
        actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri(&format!("/todos/{id}"))
                .insert_header(user1())
                .to_request(),
        )
        .await,
    )
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/todos/{id}"))
            .insert_header(user1())
            .set_json(serde_json::json!({
                "title": "Water everything",
                "completed": true
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["title"], "Water everything");
    assert_eq!(body["description"], "");
    assert_eq!(body["completed"], true);
    assert_eq!(body["dueDate"], Value::Null);
    assert_eq!(body["owner"], "user1");
    assert_eq!(body["createdAt"], before["createdAt"]);
}

#[actix_web::test]
async fn update_on_a_foreign_todo_is_not_found() {
    let app = actix_test::init_service(test_app()).await;
    let id = create(&app, user1(), sample_payload()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::put()
            .uri(&format!("/todos/{id}"))
            .insert_header(user2())
            .set_json(serde_json::json!({ "title": "stolen" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn blank_titles_are_rejected() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/todos")
            .insert_header(user1())
            .set_json(serde_json::json!({ "title": "   " }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_due_dates_in_bodies_are_rejected() {
    let app = actix_test::init_service(test_app()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/todos")
            .insert_header(user1())
            .set_json(serde_json::json!({ "title": "t", "dueDate": "next week" }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn delete_removes_the_todo() {
    let app = actix_test::init_service(test_app()).await;
    let id = create(&app, user1(), sample_payload()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/todos/{id}"))
            .insert_header(user1())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/todos/{id}"))
            .insert_header(user1())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn storage_connection_failures_surface_as_service_unavailable() {
    use crate::domain::ports::{MockTodoRepository, TodoRepositoryError};
    use std::sync::Arc;

    let mut todos = MockTodoRepository::new();
    todos
        .expect_list_by_owner()
        .returning(|_, _, _| Err(TodoRepositoryError::connection("refused")));
    let state = HttpState {
        todos: Arc::new(todos),
        ..HttpState::default()
    };
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .service(list_todos),
    )
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/todos")
            .insert_header(user1())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "service_unavailable");
}

#[actix_web::test]
async fn storage_query_failures_are_redacted_internal_errors() {
    use crate::domain::ports::{MockTodoRepository, TodoRepositoryError};
    use std::sync::Arc;

    let mut todos = MockTodoRepository::new();
    todos
        .expect_find_by_id()
        .returning(|_| Err(TodoRepositoryError::query("syntax error near SELECT")));
    let state = HttpState {
        todos: Arc::new(todos),
        ..HttpState::default()
    };
    let app =
        actix_test::init_service(App::new().app_data(web::Data::new(state)).service(get_todo))
            .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/todos/{}", uuid::Uuid::new_v4()))
            .insert_header(user1())
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
}

#[actix_web::test]
async fn delete_on_a_foreign_todo_is_not_found_and_keeps_the_row() {
    let app = actix_test::init_service(test_app()).await;
    let id = create(&app, user1(), sample_payload()).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/todos/{id}"))
            .insert_header(user2())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/todos/{id}"))
            .insert_header(user1())
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}
