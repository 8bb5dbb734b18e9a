use redis::aio::ConnectionManager;
use tracing::warn;

use crate::common::DatabaseError;

/// `PING` the server, used by the readiness probe.
pub async fn check_health(conn: &mut ConnectionManager) -> Result<(), DatabaseError> {
    let reply: String = redis::cmd("PING").query_async(conn).await.map_err(|e| {
        warn!(error = %e, "Redis health check failed");
        DatabaseError::HealthCheckFailed(e.to_string())
    })?;

    if reply == "PONG" {
        Ok(())
    } else {
        Err(DatabaseError::HealthCheckFailed(format!(
            "unexpected PING reply: {reply}"
        )))
    }
}
