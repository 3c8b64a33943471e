//! OpenAPI response descriptions shared by the domain routers.

use super::ErrorResponse;
#[allow(unused_imports)]
use serde_json::json;
use utoipa::ToResponse;

#[derive(ToResponse)]
#[response(
    description = "Bad Request - validation failed",
    content_type = "application/json",
    example = json!({
        "code": 1001,
        "error": "VALIDATION_ERROR",
        "message": "Campos obrigatórios: tema, data, hora_inicio, municipio, local, publico_alvo",
        "details": null
    })
)]
pub struct BadRequestResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Unauthorized - missing or invalid token",
    content_type = "application/json",
    example = json!({
        "code": 1006,
        "error": "UNAUTHORIZED",
        "message": "Authentication required",
        "details": null
    })
)]
pub struct UnauthorizedResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Forbidden - caller does not own the resource",
    content_type = "application/json",
    example = json!({
        "code": 1007,
        "error": "FORBIDDEN",
        "message": "Você não tem permissão para encerrar esta roda",
        "details": null
    })
)]
pub struct ForbiddenResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Conflict - duplicate or already finalized",
    content_type = "application/json",
    example = json!({
        "code": 3003,
        "error": "ALREADY_FINALIZED",
        "message": "Roda already finalized",
        "details": null
    })
)]
pub struct ConflictResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Internal Server Error",
    content_type = "application/json",
    example = json!({
        "code": 2003,
        "error": "PERSISTENCE_ERROR",
        "message": "Failed to persist data",
        "details": null
    })
)]
pub struct InternalServerErrorResponse(pub ErrorResponse);

#[derive(ToResponse)]
#[response(
    description = "Not Found",
    content_type = "application/json",
    example = json!({
        "code": 3002,
        "error": "ORGANIZER_NOT_FOUND",
        "message": "Multiplicador não encontrado",
        "details": null
    })
)]
pub struct NotFoundResponse(pub ErrorResponse);
