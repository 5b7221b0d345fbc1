pub mod session;

use axum::Json;
use axum::extract::Path;
use axum::middleware;
use axum::routing::{patch, post, put};
use axum::{Router, extract::State, http::StatusCode, routing::get};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::auth::{self, AuthUser};
use crate::error::AppError;
use crate::models::*;
use crate::state::AppState;

#[derive(Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Serialize)]
struct SessionStatus {
    user: Option<AuthUser>,
}

#[derive(Serialize)]
struct ModalStatus {
    active: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/login", get(login_status).post(login))
        .route("/logout", post(logout))
        .route("/courses", get(list_courses))
        .route("/courses/{id}", patch(update_course))
        .route("/events", get(list_events))
        .route("/events/base", get(list_base_events))
        .route("/events/{id}", patch(update_event).delete(delete_event))
        .route("/modal", get(active_modal).delete(clear_modal))
        .route("/modal/{name}", put(set_active_modal))
        .layer(middleware::from_fn_with_state(
            state.planner.session.clone(),
            session::require_session,
        ))
        .with_state(state)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn login_status(State(state): State<AppState>) -> Json<SessionStatus> {
    Json(SessionStatus {
        user: state.planner.session.current_user(),
    })
}

async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<SessionStatus>), AppError> {
    let user = state.identity.sign_in(&req.email, &req.password).await?;
    let cookie = auth::set_session_cookie(state.identity.as_ref(), &user).await?;
    // a new sign-in never sees the previous account's cached data
    state.planner.reset();
    state.planner.session.sign_in(user.clone());
    state.planner.session.issue_session_token(cookie.value());

    Ok((jar.add(cookie), Json(SessionStatus { user: Some(user) })))
}

async fn logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, StatusCode) {
    state.planner.reset();
    (jar.add(auth::clear_session_cookie()), StatusCode::NO_CONTENT)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<Vec<CourseView>>, AppError> {
    state.planner.courses.load().await?;
    Ok(Json(state.planner.courses.get()))
}

async fn update_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<CourseUpdate>,
) -> Result<StatusCode, AppError> {
    state.planner.courses.update_course(&id, req).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.planner.events.get())
}

async fn list_base_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.planner.base_events.get())
}

async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EventUpdate>,
) -> Result<Json<EventUpdate>, AppError> {
    let applied = state.planner.events.update_event(&id, req).await?;
    Ok(Json(applied))
}

async fn delete_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.planner.events.delete_event(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn active_modal(State(state): State<AppState>) -> Json<ModalStatus> {
    Json(ModalStatus {
        active: state.planner.modal.active_modal(),
    })
}

async fn set_active_modal(State(state): State<AppState>, Path(name): Path<String>) -> StatusCode {
    state.planner.modal.set_active_modal(name);
    StatusCode::NO_CONTENT
}

async fn clear_modal(State(state): State<AppState>) -> StatusCode {
    state.planner.modal.clear_modal();
    StatusCode::NO_CONTENT
}
