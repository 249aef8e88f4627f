//! Health check endpoint.

use serde::Serialize;

use super::{success, ApiResult};

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// GET /api/health - Liveness check.
pub async fn health_check() -> ApiResult<HealthStatus> {
    success(HealthStatus { status: "ok" })
}
