use super::shutdown::shutdown_signal;
use crate::errors::handlers::not_found;
use crate::http::{cors::cors_layer_from_env, security::security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wraps the domain routers with docs and cross-cutting layers.
///
/// - `apis` is nested under `/api`
/// - OpenAPI UIs at `/swagger-ui`, `/redoc`, `/rapidoc`, `/scalar`
/// - JSON 404 fallback, request tracing, security headers, CORS, compression
///
/// Fails when `CORS_ALLOWED_ORIGIN` is missing or invalid.
pub fn create_router<T>(apis: Router) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors_layer = cors_layer_from_env()?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve until SIGINT/SIGTERM, then run `cleanup` bounded by `shutdown_timeout`.
///
/// `cleanup` runs after in-flight requests have drained, so it is the place to
/// close the database pool.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    info!(timeout = ?shutdown_timeout, "Running shutdown cleanup");
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => warn!(timeout = ?shutdown_timeout, "Cleanup timed out, forcing shutdown"),
    }

    serve_result
}
