use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware,
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, AuthUser, JwtAuth, ValidatedJson, clear_session_cookie,
    errors::responses::{
        BadRequestResponse, ConflictResponse, InternalServerErrorResponse, NotFoundResponse,
        UnauthorizedResponse,
    },
    jwt_auth_middleware, session_cookie,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{OrganizerError, OrganizerResult};
use crate::models::{AuthResponse, LoginRequest, OrganizerProfile, RegisterOrganizer};
use crate::repository::OrganizerRepository;
use crate::service::OrganizerService;

pub const TAG: &str = "auth";

#[derive(OpenApi)]
#[openapi(
    paths(login, logout, me),
    components(
        schemas(LoginRequest, AuthResponse, OrganizerProfile),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            NotFoundResponse,
            InternalServerErrorResponse
        )
    ),
    tags((name = TAG, description = "Organizer sessions"))
)]
pub struct ApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(register),
    components(
        schemas(RegisterOrganizer, AuthResponse, OrganizerProfile),
        responses(BadRequestResponse, ConflictResponse, InternalServerErrorResponse)
    ),
    tags((name = "multiplicadores", description = "Organizer registration"))
)]
pub struct RegistrationApiDoc;

/// Shared state of the organizer routes.
pub struct AuthState<R: OrganizerRepository> {
    pub service: Arc<OrganizerService<R>>,
    /// Adds `Secure` to the session cookie.
    pub secure_cookies: bool,
}

impl<R: OrganizerRepository> Clone for AuthState<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            secure_cookies: self.secure_cookies,
        }
    }
}

/// Routes mounted at `/multiplicadores`.
pub fn registration_router<R: OrganizerRepository + 'static>(state: AuthState<R>) -> Router {
    Router::new()
        .route("/", post(register::<R>))
        .with_state(state)
}

/// Routes mounted at `/auth`. Only `GET /me` requires a token.
pub fn auth_router<R: OrganizerRepository + 'static>(state: AuthState<R>, auth: JwtAuth) -> Router {
    let protected = Router::new()
        .route("/me", get(me::<R>))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    Router::new()
        .route("/login", post(login::<R>))
        .route("/logout", post(logout::<R>))
        .merge(protected)
        .with_state(state)
}

fn cookie_header(value: String) -> OrganizerResult<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|e| OrganizerError::Token(e.to_string()))
}

/// Register an organizer and return a token
#[utoipa::path(
    post,
    path = "",
    tag = "multiplicadores",
    request_body = RegisterOrganizer,
    responses(
        (status = 201, description = "Organizer registered", body = AuthResponse),
        (status = 400, response = BadRequestResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn register<R: OrganizerRepository>(
    State(state): State<AuthState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<RegisterOrganizer>,
) -> OrganizerResult<impl IntoResponse> {
    let response = state.service.register(input).await?;

    AuditEvent::new(
        Some(response.organizer.id),
        "organizer.register",
        Some(format!("organizer:{}", response.organizer.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({ "municipio": response.organizer.municipality }))
    .log();

    Ok((StatusCode::CREATED, Json(response)))
}

/// Log in with cpf + senha; the token is also set as the `token` cookie
#[utoipa::path(
    post,
    path = "/login",
    tag = TAG,
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = AuthResponse),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn login<R: OrganizerRepository>(
    State(state): State<AuthState<R>>,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> OrganizerResult<impl IntoResponse> {
    let result = state.service.login(&input.cpf, &input.password).await;

    let (organizer_id, outcome) = match &result {
        Ok(response) => (Some(response.organizer.id), AuditOutcome::Success),
        Err(OrganizerError::InvalidCredentials) => (None, AuditOutcome::Denied),
        Err(_) => (None, AuditOutcome::Failure),
    };
    AuditEvent::new(organizer_id, "organizer.login", None, outcome)
        .with_request_headers(&headers)
        .log();

    let response = result?;
    let cookie = cookie_header(session_cookie(
        &response.token,
        state.service.token_ttl_secs(),
        state.secure_cookies,
    ))?;

    Ok((AppendHeaders([(header::SET_COOKIE, cookie)]), Json(response)))
}

/// Clear the session cookie
#[utoipa::path(
    post,
    path = "/logout",
    tag = TAG,
    responses((status = 204, description = "Cookie cleared"))
)]
async fn logout<R: OrganizerRepository>(
    State(state): State<AuthState<R>>,
) -> OrganizerResult<impl IntoResponse> {
    let cookie = cookie_header(clear_session_cookie(state.secure_cookies))?;
    Ok((StatusCode::NO_CONTENT, AppendHeaders([(header::SET_COOKIE, cookie)])))
}

/// Profile of the authenticated organizer
#[utoipa::path(
    get,
    path = "/me",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller profile", body = OrganizerProfile),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn me<R: OrganizerRepository>(
    State(state): State<AuthState<R>>,
    user: AuthUser,
) -> OrganizerResult<Json<OrganizerProfile>> {
    let organizer = state.service.profile(user.organizer_id).await?;
    Ok(Json(organizer.into()))
}
