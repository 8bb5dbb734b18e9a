use mongodb::Client;
use mongodb::bson::doc;
use tracing::warn;

use crate::common::DatabaseError;

/// Run `ping` against the admin database, used by the readiness probe.
pub async fn check_health(client: &Client) -> Result<(), DatabaseError> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
        .map_err(|e| {
            warn!(error = %e, "MongoDB health check failed");
            DatabaseError::HealthCheckFailed(e.to_string())
        })
}
