// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTTP handlers. Each decodes its input, takes the persistence lock, and
//! hands off to the matching service function in `parking_api`.

use axum::{
    Json,
    extract::{
        Path, Query, State as AxumState,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, header},
    response::{IntoResponse, Response},
};
use parking_api::{
    ApiError, CarEditRequest, CreateCarRequest, CreatePermitRequest, CreateResidentRequest,
    CreateVisitorRequest, IssuedSession, ListQuery, ListWithMetadata, LoginRequest,
    MessageResponse, PasswordChangeRequest, ResetEmailRequest, ResidentEditRequest, Session,
    accounts, cars, permits, residents, visitors,
};
use parking_domain::{Car, Permit, Resident, Visitor};
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::AppState;
use crate::error::HttpError;
use crate::session::{SessionActor, expired_refresh_cookie, read_refresh_cookie, refresh_cookie};

type JsonResult<T> = Result<Json<T>, HttpError>;

fn decode_body<T>(payload: Result<Json<T>, JsonRejection>, name: &str) -> Result<T, HttpError> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!(payload = name, error = %rejection, "Malformed request body");
        HttpError::malformed(name)
    })
}

fn decode_query(query: Result<Query<ListQuery>, QueryRejection>) -> Result<ListQuery, HttpError> {
    query.map(|Query(query)| query).map_err(|rejection| {
        debug!(error = %rejection, "Malformed query string");
        HttpError::malformed("query")
    })
}

fn decode_permit_id(path: Result<Path<i64>, PathRejection>) -> Result<i64, HttpError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        debug!(error = %rejection, "Malformed permit ID");
        HttpError::malformed("permit ID")
    })
}

/// A session response that also sets the rotated refresh cookie.
fn session_response(issued: IssuedSession, domain: &str) -> Result<Response, HttpError> {
    let cookie: HeaderValue = HeaderValue::from_str(&refresh_cookie(&issued.refresh_token, domain))
        .map_err(|e| {
            HttpError::from(ApiError::Internal {
                message: format!("Unrepresentable refresh cookie: {e}"),
            })
        })?;
    let body: Json<Session> = Json(issued.session);
    Ok(([(header::SET_COOKIE, cookie)], body).into_response())
}

// ============================================================================
// Accounts and sessions
// ============================================================================

/// Handler for POST `/login`.
pub async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Response, HttpError> {
    let request: LoginRequest = decode_body(payload, "login request")?;
    info!(account_id = %request.id, "Handling login request");

    let mut persistence = app_state.persistence.lock().await;
    let issued: IssuedSession = accounts::login(
        &mut persistence,
        &app_state.tokens,
        &request,
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    session_response(issued, &app_state.domain)
}

/// Handler for POST `/logout`. Always succeeds.
pub async fn handle_logout(AxumState(app_state): AxumState<AppState>) -> Response {
    let body: Json<MessageResponse> = Json(MessageResponse::new("Successfully logged out"));
    match HeaderValue::from_str(&expired_refresh_cookie(&app_state.domain)) {
        Ok(cookie) => ([(header::SET_COOKIE, cookie)], body).into_response(),
        Err(_) => body.into_response(),
    }
}

/// Handler for POST `/refresh-tokens`.
pub async fn handle_refresh_tokens(
    AxumState(app_state): AxumState<AppState>,
    headers: HeaderMap,
) -> Result<Response, HttpError> {
    let refresh_token: Option<String> = read_refresh_cookie(&headers);

    let mut persistence = app_state.persistence.lock().await;
    let issued: IssuedSession = accounts::refresh_session(
        &mut persistence,
        &app_state.tokens,
        refresh_token.as_deref(),
        OffsetDateTime::now_utc(),
    )?;
    drop(persistence);

    session_response(issued, &app_state.domain)
}

/// Handler for POST `/password-reset-email`.
pub async fn handle_password_reset_email(
    AxumState(app_state): AxumState<AppState>,
    payload: Result<Json<ResetEmailRequest>, JsonRejection>,
) -> JsonResult<MessageResponse> {
    let request: ResetEmailRequest = decode_body(payload, "password reset request")?;

    let mut persistence = app_state.persistence.lock().await;
    let response: MessageResponse = accounts::send_reset_email(
        &mut persistence,
        &app_state.tokens,
        app_state.mailer.as_ref(),
        &app_state.reset_link,
        &request,
        OffsetDateTime::now_utc(),
    );
    Ok(Json(response))
}

/// Handler for PUT `/account/password`.
pub async fn handle_change_password(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<PasswordChangeRequest>, JsonRejection>,
) -> JsonResult<MessageResponse> {
    let request: PasswordChangeRequest = decode_body(payload, "password change request")?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(accounts::change_password(
        &mut persistence,
        &actor,
        &request,
    )?))
}

/// Handler for GET `/hello`.
pub async fn handle_hello(SessionActor(actor): SessionActor) -> Json<String> {
    Json(format!("hello, {}", actor.id))
}

// ============================================================================
// Permits
// ============================================================================

/// Handler for GET `/permits`.
pub async fn handle_list_permits(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> JsonResult<ListWithMetadata<Permit>> {
    let query: ListQuery = decode_query(query)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(permits::list_permits(
        &mut persistence,
        &actor,
        &query,
        OffsetDateTime::now_utc(),
    )?))
}

/// Handler for GET `/permit/{id}`.
pub async fn handle_get_permit(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    path: Result<Path<i64>, PathRejection>,
) -> JsonResult<Permit> {
    let permit_id: i64 = decode_permit_id(path)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(permits::get_permit(&mut persistence, &actor, permit_id)?))
}

/// Handler for POST `/permit`.
pub async fn handle_create_permit(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<CreatePermitRequest>, JsonRejection>,
) -> JsonResult<Permit> {
    let request: CreatePermitRequest = decode_body(payload, "permit request")?;
    info!(
        actor_id = %actor.id,
        resident_id = %request.resident_id,
        "Handling create_permit request"
    );

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(permits::create_permit(
        &mut persistence,
        &actor,
        &request,
        OffsetDateTime::now_utc(),
    )?))
}

/// Handler for PUT `/permit/{id}`.
pub async fn handle_update_permit(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    path: Result<Path<i64>, PathRejection>,
    payload: Result<Json<CarEditRequest>, JsonRejection>,
) -> JsonResult<Permit> {
    let permit_id: i64 = decode_permit_id(path)?;
    let request: CarEditRequest = decode_body(payload, "permit edit")?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(permits::update_permit(
        &mut persistence,
        &actor,
        permit_id,
        request,
    )?))
}

/// Handler for DELETE `/permit/{id}`.
pub async fn handle_delete_permit(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    path: Result<Path<i64>, PathRejection>,
) -> JsonResult<MessageResponse> {
    let permit_id: i64 = decode_permit_id(path)?;
    info!(actor_id = %actor.id, permit_id, "Handling delete_permit request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(permits::delete_permit(
        &mut persistence,
        &actor,
        permit_id,
    )?))
}

// ============================================================================
// Residents
// ============================================================================

/// Handler for GET `/residents`.
pub async fn handle_list_residents(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> JsonResult<ListWithMetadata<Resident>> {
    let query: ListQuery = decode_query(query)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(residents::list_residents(
        &mut persistence,
        &actor,
        &query,
    )?))
}

/// Handler for GET `/resident/{id}`.
pub async fn handle_get_resident(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(resident_id): Path<String>,
) -> JsonResult<Resident> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(residents::get_resident(
        &mut persistence,
        &actor,
        &resident_id,
    )?))
}

/// Handler for POST `/account`, which creates a resident.
pub async fn handle_create_resident(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<CreateResidentRequest>, JsonRejection>,
) -> JsonResult<MessageResponse> {
    let request: CreateResidentRequest = decode_body(payload, "resident")?;
    info!(actor_id = %actor.id, resident_id = %request.id, "Handling create_resident request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(residents::create_resident(
        &mut persistence,
        &actor,
        request,
    )?))
}

/// Handler for PUT `/resident/{id}`.
pub async fn handle_update_resident(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(resident_id): Path<String>,
    payload: Result<Json<ResidentEditRequest>, JsonRejection>,
) -> JsonResult<Resident> {
    let request: ResidentEditRequest = decode_body(payload, "resident edit")?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(residents::update_resident(
        &mut persistence,
        &actor,
        &resident_id,
        request,
    )?))
}

/// Handler for DELETE `/resident/{id}`.
pub async fn handle_delete_resident(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(resident_id): Path<String>,
) -> JsonResult<MessageResponse> {
    info!(actor_id = %actor.id, resident_id = %resident_id, "Handling delete_resident request");

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(residents::delete_resident(
        &mut persistence,
        &actor,
        &resident_id,
    )?))
}

// ============================================================================
// Cars
// ============================================================================

/// Handler for GET `/cars`.
pub async fn handle_list_cars(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> JsonResult<ListWithMetadata<Car>> {
    let query: ListQuery = decode_query(query)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(cars::list_cars(&mut persistence, &actor, &query)?))
}

/// Handler for GET `/resident/{id}/cars`.
pub async fn handle_list_resident_cars(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(resident_id): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> JsonResult<ListWithMetadata<Car>> {
    let query: ListQuery = decode_query(query)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(cars::list_resident_cars(
        &mut persistence,
        &actor,
        &resident_id,
        &query,
    )?))
}

/// Handler for GET `/car/{id}`.
pub async fn handle_get_car(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(car_id): Path<String>,
) -> JsonResult<Car> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(cars::get_car(&mut persistence, &actor, &car_id)?))
}

/// Handler for POST `/car`.
pub async fn handle_create_car(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<CreateCarRequest>, JsonRejection>,
) -> JsonResult<Car> {
    let request: CreateCarRequest = decode_body(payload, "car")?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(cars::create_car(&mut persistence, &actor, request)?))
}

/// Handler for PUT `/car/{id}`.
pub async fn handle_update_car(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(car_id): Path<String>,
    payload: Result<Json<CarEditRequest>, JsonRejection>,
) -> JsonResult<Car> {
    let request: CarEditRequest = decode_body(payload, "car edit")?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(cars::update_car(
        &mut persistence,
        &actor,
        &car_id,
        request,
    )?))
}

/// Handler for DELETE `/car/{id}`.
pub async fn handle_delete_car(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(car_id): Path<String>,
) -> JsonResult<MessageResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(cars::delete_car(&mut persistence, &actor, &car_id)?))
}

// ============================================================================
// Visitors
// ============================================================================

/// Handler for GET `/visitors`.
pub async fn handle_list_visitors(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> JsonResult<ListWithMetadata<Visitor>> {
    let query: ListQuery = decode_query(query)?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(visitors::list_visitors(
        &mut persistence,
        &actor,
        &query,
        OffsetDateTime::now_utc(),
    )?))
}

/// Handler for POST `/visitor`.
pub async fn handle_create_visitor(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    payload: Result<Json<CreateVisitorRequest>, JsonRejection>,
) -> JsonResult<Visitor> {
    let request: CreateVisitorRequest = decode_body(payload, "visitor")?;

    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(visitors::create_visitor(
        &mut persistence,
        &actor,
        request,
        OffsetDateTime::now_utc(),
    )?))
}

/// Handler for DELETE `/visitor/{id}`.
pub async fn handle_delete_visitor(
    AxumState(app_state): AxumState<AppState>,
    SessionActor(actor): SessionActor,
    Path(visitor_id): Path<String>,
) -> JsonResult<MessageResponse> {
    let mut persistence = app_state.persistence.lock().await;
    Ok(Json(visitors::delete_visitor(
        &mut persistence,
        &actor,
        &visitor_id,
    )?))
}
