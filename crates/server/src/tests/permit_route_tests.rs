// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::*;
use time::{Duration, format_description::well_known::Rfc3339};

/// RFC 3339 timestamp `days` after `base`.
fn days_after(base: OffsetDateTime, days: i64) -> String {
    (base + Duration::days(days)).format(&Rfc3339).unwrap()
}

async fn create_car(app_state: &AppState, auth: &str) -> String {
    let response = send(
        app_state,
        json_request(
            "POST",
            "/api/car",
            Some(auth),
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
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["id"].as_str().unwrap().to_string()
}

fn permit_body(car_id: &str, start: i64, end: i64) -> Value {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    serde_json::json!({
        "residentID": RESIDENT_ID,
        "carID": car_id,
        "startDate": days_after(now, start),
        "endDate": days_after(now, end),
    })
}

#[tokio::test]
async fn test_permit_lifecycle() {
    let app_state: AppState = create_seeded_app_state().await;
    let resident: String = create_resident(&app_state).await;
    let admin: String = admin_bearer(&app_state);
    let car_id: String = create_car(&app_state, &resident).await;

    let created = send(
        &app_state,
        json_request("POST", "/api/permit", Some(&resident), &permit_body(&car_id, 0, 3)),
    )
    .await;
    assert_eq!(created.status(), StatusCode::OK);
    let permit: Value = body_json(created).await;
    assert_eq!(permit["licensePlate"], "ABC123");
    assert_eq!(permit["affectsDays"], true);
    let permit_id: i64 = permit["id"].as_i64().unwrap();

    let resident_record = send(
        &app_state,
        empty_request("GET", "/api/resident/B1234567", Some(&admin)),
    )
    .await;
    assert_eq!(body_json(resident_record).await["amtParkingDaysUsed"], 3);

    let listed = send(&app_state, empty_request("GET", "/api/permits", Some(&resident))).await;
    assert_eq!(listed.status(), StatusCode::OK);
    assert_eq!(body_json(listed).await["metadata"]["totalAmount"], 1);

    let updated = send(
        &app_state,
        json_request(
            "PUT",
            &format!("/api/permit/{permit_id}"),
            Some(&admin),
            &serde_json::json!({ "color": "blue" }),
        ),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::OK);
    assert_eq!(body_json(updated).await["color"], "blue");

    let deleted = send(
        &app_state,
        empty_request("DELETE", &format!("/api/permit/{permit_id}"), Some(&admin)),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let released = send(
        &app_state,
        empty_request("GET", "/api/resident/B1234567", Some(&admin)),
    )
    .await;
    assert_eq!(body_json(released).await["amtParkingDaysUsed"], 0);
}

#[tokio::test]
async fn test_policy_violation_is_bad_request() {
    let app_state: AppState = create_seeded_app_state().await;
    let resident: String = create_resident(&app_state).await;
    let car_id: String = create_car(&app_state, &resident).await;

    let response = send(
        &app_state,
        json_request("POST", "/api/permit", Some(&resident), &permit_body(&car_id, 0, 16)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await.is_string());

    let listed = send(&app_state, empty_request("GET", "/api/permits", Some(&resident))).await;
    assert_eq!(body_json(listed).await["metadata"]["totalAmount"], 0);
}

#[tokio::test]
async fn test_resident_cannot_update_permit() {
    let app_state: AppState = create_seeded_app_state().await;
    let resident: String = create_resident(&app_state).await;

    let response = send(
        &app_state,
        json_request(
            "PUT",
            "/api/permit/1",
            Some(&resident),
            &serde_json::json!({ "color": "blue" }),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_permit_body() {
    let app_state: AppState = create_seeded_app_state().await;
    let resident: String = create_resident(&app_state).await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/permit")
        .header("content-type", "application/json")
        .header("authorization", resident)
        .body(Body::from("[1, 2"))
        .unwrap();

    let response = send(&app_state, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        Value::from("permit request malformed")
    );
}

#[tokio::test]
async fn test_unknown_permit_is_not_found() {
    let app_state: AppState = create_test_app_state();
    let admin: String = admin_bearer(&app_state);

    let response = send(&app_state, empty_request("GET", "/api/permit/999", Some(&admin))).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_permit_id_is_bad_request() {
    let app_state: AppState = create_test_app_state();
    let admin: String = admin_bearer(&app_state);

    let response = send(&app_state, empty_request("GET", "/api/permit/abc", Some(&admin))).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await, Value::from("permit ID malformed"));
}

#[tokio::test]
async fn test_unknown_status_filter_is_bad_request() {
    let app_state: AppState = create_test_app_state();
    let admin: String = admin_bearer(&app_state);

    let response = send(
        &app_state,
        empty_request("GET", "/api/permits?status=sideways", Some(&admin)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_huge_page_returns_empty_list() {
    let app_state: AppState = create_test_app_state();
    let admin: String = admin_bearer(&app_state);

    let response = send(
        &app_state,
        empty_request(
            "GET",
            "/api/permits?limit=1000&page=9223372036854775807",
            Some(&admin),
        ),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let listed: Value = body_json(response).await;
    assert_eq!(listed["records"], serde_json::json!([]));
    assert_eq!(listed["metadata"]["totalAmount"], 0);
}
