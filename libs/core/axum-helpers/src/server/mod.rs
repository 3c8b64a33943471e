//! Router assembly, health endpoints and graceful shutdown.
//!
//! ```ignore
//! let router = create_router::<ApiDoc>(api_routes)?
//!     .merge(health_router(app_info!()))
//!     .merge(ready_router);
//!
//! create_production_app(router, &config.server, Duration::from_secs(30), async move {
//!     db.close().await.ok();
//! })
//! .await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::shutdown_signal;
