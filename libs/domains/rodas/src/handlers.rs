use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use axum_helpers::{
    AuditEvent, AuditOutcome, AuthUser, JwtAuth, ValidatedJson,
    errors::responses::{
        BadRequestResponse, ConflictResponse, ForbiddenResponse, InternalServerErrorResponse,
        NotFoundResponse, UnauthorizedResponse,
    },
    jwt_auth_middleware,
};
use serde_json::json;
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{RodaError, RodaResult};
use crate::models::{
    AgeBracket, CloseRoda, CreateRoda, OrganizerSummary, ParticipantCount, Roda, RodaStatus,
    RodaWithBrackets, RodaWithOrganizer,
};
use crate::repository::RodaRepository;
use crate::service::RodaService;
use crate::stats::RodaStatistics;

pub const TAG: &str = "rodas";

#[derive(OpenApi)]
#[openapi(
    paths(
        list_rodas,
        create_roda,
        list_my_rodas,
        list_history,
        statistics,
        close_roda,
        close_roda_by_body,
    ),
    components(
        schemas(
            Roda,
            RodaStatus,
            RodaWithOrganizer,
            RodaWithBrackets,
            OrganizerSummary,
            AgeBracket,
            CreateRoda,
            CloseRoda,
            ParticipantCount,
            RodaStatistics
        ),
        responses(
            BadRequestResponse,
            UnauthorizedResponse,
            ForbiddenResponse,
            NotFoundResponse,
            ConflictResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Conversation circles: creation, closure, history and statistics")
    )
)]
pub struct ApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(list_age_brackets),
    components(schemas(AgeBracket)),
    tags((name = "faixas-etarias", description = "Age bracket reference data"))
)]
pub struct AgeBracketsApiDoc;

/// Routes mounted at `/rodas`. Everything except `GET /` requires a token.
pub fn router<R: RodaRepository + 'static>(service: Arc<RodaService<R>>, auth: JwtAuth) -> Router {
    let public = Router::new().route("/", get(list_rodas::<R>));

    let protected = Router::new()
        .route("/", post(create_roda::<R>))
        .route("/me", get(list_my_rodas::<R>))
        .route("/multiplicador", get(list_my_rodas::<R>))
        .route("/historico", get(list_history::<R>))
        .route("/estatisticas", get(statistics::<R>))
        .route("/encerrar", post(close_roda_by_body::<R>))
        .route("/{id}/encerrar", post(close_roda::<R>))
        .route_layer(middleware::from_fn_with_state(auth, jwt_auth_middleware));

    public.merge(protected).with_state(service)
}

/// Routes mounted at `/faixas-etarias`.
pub fn age_brackets_router<R: RodaRepository + 'static>(service: Arc<RodaService<R>>) -> Router {
    Router::new()
        .route("/", get(list_age_brackets::<R>))
        .with_state(service)
}

/// List active rodas for the public map, earliest first
#[utoipa::path(
    get,
    path = "",
    tag = TAG,
    responses(
        (status = 200, description = "Active rodas with their organizer", body = Vec<RodaWithOrganizer>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_rodas<R: RodaRepository>(
    State(service): State<Arc<RodaService<R>>>,
) -> RodaResult<Json<Vec<RodaWithOrganizer>>> {
    Ok(Json(service.list_active().await?))
}

/// Create a roda owned by the caller
#[utoipa::path(
    post,
    path = "",
    tag = TAG,
    request_body = CreateRoda,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Roda created", body = RodaWithOrganizer),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 404, response = NotFoundResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn create_roda<R: RodaRepository>(
    State(service): State<Arc<RodaService<R>>>,
    user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(input): ValidatedJson<CreateRoda>,
) -> RodaResult<impl IntoResponse> {
    let created = service.create_roda(user.organizer_id, input).await?;

    AuditEvent::new(
        Some(user.organizer_id),
        "roda.create",
        Some(format!("roda:{}", created.roda.id)),
        AuditOutcome::Success,
    )
    .with_request_headers(&headers)
    .with_details(json!({
        "municipio": created.roda.municipality,
        "has_coordinates": created.roda.latitude.is_some(),
    }))
    .log();

    Ok((StatusCode::CREATED, Json(created)))
}

/// List the caller's active rodas
#[utoipa::path(
    get,
    path = "/me",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's active rodas", body = Vec<Roda>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_my_rodas<R: RodaRepository>(
    State(service): State<Arc<RodaService<R>>>,
    user: AuthUser,
) -> RodaResult<Json<Vec<Roda>>> {
    Ok(Json(service.list_mine(user.organizer_id).await?))
}

/// List the caller's finalized rodas with age brackets, latest first
#[utoipa::path(
    get,
    path = "/historico",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller's finalized rodas", body = Vec<RodaWithBrackets>),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_history<R: RodaRepository>(
    State(service): State<Arc<RodaService<R>>>,
    user: AuthUser,
) -> RodaResult<Json<Vec<RodaWithBrackets>>> {
    Ok(Json(service.history(user.organizer_id).await?))
}

/// Aggregate the caller's finalized rodas by municipality and age bracket
#[utoipa::path(
    get,
    path = "/estatisticas",
    tag = TAG,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Statistics", body = RodaStatistics),
        (status = 401, response = UnauthorizedResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn statistics<R: RodaRepository>(
    State(service): State<Arc<RodaService<R>>>,
    user: AuthUser,
) -> RodaResult<Json<RodaStatistics>> {
    Ok(Json(service.statistics(user.organizer_id).await?))
}

async fn close_and_audit<R: RodaRepository>(
    service: &RodaService<R>,
    user: &AuthUser,
    headers: &HeaderMap,
    roda_id: &str,
    input: CloseRoda,
) -> RodaResult<Json<RodaWithBrackets>> {
    let brackets = input.age_bracket_ids.len();
    let result = service.close_roda(user.organizer_id, roda_id, input).await;

    let outcome = match &result {
        Ok(_) => AuditOutcome::Success,
        Err(RodaError::Forbidden(_)) => AuditOutcome::Denied,
        Err(_) => AuditOutcome::Failure,
    };
    AuditEvent::new(
        Some(user.organizer_id),
        "roda.close",
        Some(format!("roda:{roda_id}")),
        outcome,
    )
    .with_request_headers(headers)
    .with_details(json!({ "faixas_etarias": brackets }))
    .log();

    Ok(Json(result?))
}

/// Close a roda: photos, summary and age brackets, in one transaction
#[utoipa::path(
    post,
    path = "/{id}/encerrar",
    tag = TAG,
    params(("id" = String, Path, description = "Roda ID")),
    request_body = CloseRoda,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Roda finalized", body = RodaWithBrackets),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn close_roda<R: RodaRepository>(
    State(service): State<Arc<RodaService<R>>>,
    user: AuthUser,
    headers: HeaderMap,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<CloseRoda>,
) -> RodaResult<Json<RodaWithBrackets>> {
    close_and_audit(&service, &user, &headers, &id, input).await
}

/// Close a roda whose id is sent as `rodaId` in the body
#[utoipa::path(
    post,
    path = "/encerrar",
    tag = TAG,
    request_body = CloseRoda,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Roda finalized", body = RodaWithBrackets),
        (status = 400, response = BadRequestResponse),
        (status = 401, response = UnauthorizedResponse),
        (status = 403, response = ForbiddenResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn close_roda_by_body<R: RodaRepository>(
    State(service): State<Arc<RodaService<R>>>,
    user: AuthUser,
    headers: HeaderMap,
    ValidatedJson(mut input): ValidatedJson<CloseRoda>,
) -> RodaResult<Json<RodaWithBrackets>> {
    let id = input.roda_id.take().unwrap_or_default();
    close_and_audit(&service, &user, &headers, &id, input).await
}

/// List the age brackets a roda can be tagged with
#[utoipa::path(
    get,
    path = "",
    tag = "faixas-etarias",
    responses(
        (status = 200, description = "Age brackets", body = Vec<AgeBracket>),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn list_age_brackets<R: RodaRepository>(
    State(service): State<Arc<RodaService<R>>>,
) -> RodaResult<Json<Vec<AgeBracket>>> {
    Ok(Json(service.list_age_brackets().await?))
}
