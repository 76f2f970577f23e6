// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod permit_route_tests;

use super::*;
use axum::{
    body::Body,
    http::{Request, Response, StatusCode},
};
use parking_api::Role;
use serde_json::Value;
use time::OffsetDateTime;
use tower::ServiceExt;

pub const ADMIN_ID: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin password";
pub const RESIDENT_ID: &str = "B1234567";
pub const RESIDENT_PASSWORD: &str = "resident password";

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state() -> AppState {
    let persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        tokens: Arc::new(TokenService::new("test-access", "test-refresh")),
        mailer: Arc::new(LoggingMailer::default()),
        reset_link: Arc::new(ResetLinkSettings {
            domain: String::from("https://parking.example"),
            date_format: String::from("[year]-[month]-[day]"),
        }),
        domain: Arc::from("https://parking.example"),
    }
}

/// App state with a bootstrap administrator already present.
pub async fn create_seeded_app_state() -> AppState {
    let app_state: AppState = create_test_app_state();
    let mut persistence = app_state.persistence.lock().await;
    accounts::bootstrap_admin(&mut persistence, ADMIN_ID, ADMIN_PASSWORD).unwrap();
    drop(persistence);
    app_state
}

pub fn bearer(app_state: &AppState, id: &str, role: Role) -> String {
    let token: String = app_state
        .tokens
        .issue_access(id, role, OffsetDateTime::now_utc())
        .unwrap();
    format!("Bearer {token}")
}

pub fn admin_bearer(app_state: &AppState) -> String {
    bearer(app_state, ADMIN_ID, Role::Admin)
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn send(app_state: &AppState, request: Request<Body>) -> Response<Body> {
    build_router(app_state.clone())
        .oneshot(request)
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body_bytes).unwrap()
}

/// Creates resident `B1234567` through the API and returns its bearer.
pub async fn create_resident(app_state: &AppState) -> String {
    let admin: String = admin_bearer(app_state);
    let response = send(
        app_state,
        json_request(
            "POST",
            "/api/account",
            Some(&admin),
            &serde_json::json!({
                "id": RESIDENT_ID,
                "firstName": "Jane",
                "lastName": "Doe",
                "phone": "5555555555",
                "email": "jane@example.com",
                "password": RESIDENT_PASSWORD,
            }),
        ),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    bearer(app_state, RESIDENT_ID, Role::Resident)
}

#[tokio::test]
async fn test_hello_requires_token() {
    let app_state: AppState = create_test_app_state();

    let response = send(&app_state, empty_request("GET", "/api/hello", None)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await, Value::from("unauthorized"));
}

#[tokio::test]
async fn test_hello_greets_caller() {
    let app_state: AppState = create_test_app_state();
    let auth: String = bearer(&app_state, RESIDENT_ID, Role::Resident);

    let response = send(&app_state, empty_request("GET", "/api/hello", Some(&auth))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, Value::from("hello, B1234567"));
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_refused() {
    let app_state: AppState = create_test_app_state();
    let forged: String = TokenService::new("other", "other")
        .issue_access(ADMIN_ID, Role::Admin, OffsetDateTime::now_utc())
        .unwrap();
    let auth: String = format!("Bearer {forged}");

    let response = send(&app_state, empty_request("GET", "/api/residents", Some(&auth))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_resident_cannot_list_residents() {
    let app_state: AppState = create_test_app_state();
    let auth: String = bearer(&app_state, RESIDENT_ID, Role::Resident);

    let response = send(&app_state, empty_request("GET", "/api/residents", Some(&auth))).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_resident_crud_round() {
    let app_state: AppState = create_seeded_app_state().await;
    let admin: String = admin_bearer(&app_state);
    create_resident(&app_state).await;

    let listed = send(
        &app_state,
        empty_request("GET", "/api/residents?search=jane", Some(&admin)),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let listed: Value = body_json(listed).await;
    assert_eq!(listed["metadata"]["totalAmount"], 1);
    assert_eq!(listed["records"][0]["id"], RESIDENT_ID);
    assert!(listed["records"][0].get("password").is_none());

    let updated = send(
        &app_state,
        json_request(
            "PUT",
            "/api/resident/B1234567",
            Some(&admin),
            &serde_json::json!({ "unlimDays": true }),
        ),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(body_json(updated).await["unlimDays"], true);

    let deleted = send(
        &app_state,
        empty_request("DELETE", "/api/resident/B1234567", Some(&admin)),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let missing = send(
        &app_state,
        empty_request("GET", "/api/resident/B1234567", Some(&admin)),
    )
    .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_resident_is_bad_request() {
    let app_state: AppState = create_seeded_app_state().await;
    create_resident(&app_state).await;
    let admin: String = admin_bearer(&app_state);

    let response = send(
        &app_state,
        json_request(
            "POST",
            "/api/account",
            Some(&admin),
            &serde_json::json!({
                "id": RESIDENT_ID,
                "firstName": "John",
                "lastName": "Roe",
                "phone": "5555555556",
                "email": "john@example.com",
                "password": "whatever",
            }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        Value::from("resident with ID B1234567 already exists")
    );
}

#[tokio::test]
async fn test_cars_and_visitors_are_scoped() {
    let app_state: AppState = create_seeded_app_state().await;
    let resident: String = create_resident(&app_state).await;
    let stranger: String = bearer(&app_state, "C7654321", Role::Resident);

    let created = send(
        &app_state,
        json_request(
            "POST",
            "/api/car",
            Some(&resident),
            &serde_json::json!({
                "residentID": RESIDENT_ID,
                "licensePlate": "ABC123",
                "color": "red",
                "make": "toyota",
                "model": "corolla",
            }),
        ),
    )
    .await;
    assert_eq!(created.status(), StatusCode::OK);
    let car_id: String = body_json(created).await["id"]
        .as_str()
        .unwrap()
        .to_string();

    let foreign = send(
        &app_state,
        empty_request("GET", &format!("/api/car/{car_id}"), Some(&stranger)),
    )
    .await;
    assert_eq!(foreign.status(), StatusCode::UNAUTHORIZED);

    let visitor = send(
        &app_state,
        json_request(
            "POST",
            "/api/visitor",
            Some(&resident),
            &serde_json::json!({
                "firstName": "Sam",
                "lastName": "Jones",
                "relationship": "fam/fri",
                "isForever": true,
            }),
        ),
    )
    .await;
    assert_eq!(visitor.status(), StatusCode::OK);
    assert_eq!(
        body_json(visitor).await["accessEnd"],
        "9999-12-31T00:00:00Z"
    );

    let own = send(&app_state, empty_request("GET", "/api/visitors", Some(&resident))).await;
    let theirs = send(&app_state, empty_request("GET", "/api/visitors", Some(&stranger))).await;
    assert_eq!(body_json(own).await["metadata"]["totalAmount"], 1);
    assert_eq!(body_json(theirs).await["metadata"]["totalAmount"], 0);
}

#[test]
fn test_cookie_domain_strips_scheme_and_port() {
    assert_eq!(
        session::cookie_domain("https://parking.example:8443/app"),
        "parking.example"
    );
    assert_eq!(session::cookie_domain("localhost"), "localhost");
}

#[test]
fn test_read_refresh_cookie() {
    let mut headers = axum::http::HeaderMap::new();
    headers.insert(
        axum::http::header::COOKIE,
        HeaderValue::from_static("theme=dark; refresh=abc.def.ghi"),
    );

    assert_eq!(
        session::read_refresh_cookie(&headers).as_deref(),
        Some("abc.def.ghi")
    );
    assert_eq!(
        session::read_refresh_cookie(&axum::http::HeaderMap::new()),
        None
    );
}
