use super::{cookie::SESSION_COOKIE, jwt::JwtAuth, user::AuthUser};
use crate::errors::AppError;
use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

/// Bearer header first, then the session cookie.
pub fn extract_token_from_request(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| {
            headers
                .get(header::COOKIE)
                .and_then(|v| v.to_str().ok())
                .and_then(|cookies| {
                    cookies.split(';').find_map(|cookie| {
                        let (name, value) = cookie.trim().split_once('=')?;
                        (name == SESSION_COOKIE && !value.is_empty()).then(|| value.to_string())
                    })
                })
        })
}

/// Rejects the request with 401 unless it carries a valid token.
///
/// On success the decoded [`JwtClaims`](super::JwtClaims) and the
/// [`AuthUser`] are inserted into the request extensions.
pub async fn jwt_auth_middleware(
    State(auth): State<JwtAuth>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_token_from_request(&headers) else {
        tracing::debug!("No JWT found in Authorization header or cookie");
        return Err(AppError::Unauthorized("Token não fornecido".to_string()));
    };

    let claims = auth.verify_token(&token).map_err(|e| {
        tracing::debug!(error = %e, "JWT verification failed");
        AppError::Unauthorized("Token inválido ou expirado".to_string())
    })?;

    let Some(organizer_id) = claims.organizer_id() else {
        tracing::debug!(sub = %claims.sub, "JWT subject is not an organizer id");
        return Err(AppError::Unauthorized("Token inválido ou expirado".to_string()));
    };

    request.extensions_mut().insert(AuthUser {
        organizer_id,
        cpf: claims.cpf.clone(),
    });
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::JwtConfig;
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use tower::ServiceExt;
    use uuid::Uuid;

    const SECRET: &str = "rodas-de-conversa-test-secret-0123456789";

    fn app(auth: JwtAuth) -> Router {
        Router::new()
            .route("/me", get(|user: AuthUser| async move { user.organizer_id.to_string() }))
            .route_layer(axum::middleware::from_fn_with_state(auth, jwt_auth_middleware))
    }

    fn get_with(header: (header::HeaderName, String)) -> Request {
        Request::builder()
            .uri("/me")
            .header(header.0, header.1)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_extract_prefers_bearer_header() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer from-header".parse().unwrap());
        headers.insert(header::COOKIE, "token=from-cookie".parse().unwrap());
        assert_eq!(extract_token_from_request(&headers).as_deref(), Some("from-header"));
    }

    #[test]
    fn test_extract_from_cookie_among_others() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "theme=dark; token=abc.def; lang=pt".parse().unwrap());
        assert_eq!(extract_token_from_request(&headers).as_deref(), Some("abc.def"));
    }

    #[test]
    fn test_extract_ignores_similarly_named_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "access_token=abc".parse().unwrap());
        assert_eq!(extract_token_from_request(&headers), None);
    }

    #[tokio::test]
    async fn test_missing_token_is_401() {
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));
        let request = Request::builder().uri("/me").body(Body::empty()).unwrap();
        let response = app(auth).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_forged_token_is_401() {
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));
        let forged = JwtAuth::new(&JwtConfig::new("someone-elses-secret-0123456789abcdef"))
            .create_token(Uuid::now_v7(), "12345678901")
            .unwrap();

        let response = app(auth)
            .oneshot(get_with((header::AUTHORIZATION, format!("Bearer {forged}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_cookie_resolves_identity() {
        let auth = JwtAuth::new(&JwtConfig::new(SECRET));
        let id = Uuid::now_v7();
        let token = auth.create_token(id, "12345678901").unwrap();

        let response = app(auth)
            .oneshot(get_with((header::COOKIE, format!("token={token}"))))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes, id.to_string());
    }
}
