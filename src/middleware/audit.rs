use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::Caller;

/// Record a mutation. Called explicitly by handlers; failures are logged, never returned.
pub async fn log_event(
    pool: &PgPool,
    caller: &Caller,
    action: &str,
    resource_type: &str,
    resource_id: Option<Uuid>,
    details: Option<serde_json::Value>,
) {
    tracing::info!(
        action,
        resource_type,
        resource_id = ?resource_id,
        user_id = ?caller.user_id(),
        "audit"
    );

    if let Err(e) = crate::db::audit::log_event(
        pool,
        caller.user_id(),
        action,
        resource_type,
        resource_id,
        details,
    )
    .await
    {
        tracing::error!("Failed to log audit event: {e}");
    }
}
