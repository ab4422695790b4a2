//! Internal audit-trail append used by every mutating operation.
//!
//! Callers pass the transaction handle they are already inside of, so the
//! primary mutation and its audit entry commit or roll back together.

use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};

use crate::entities::activity_log::{self, ActivityAction};
use crate::errors::ServiceError;

/// Appends one immutable audit record. Fails only on storage failure, which
/// aborts (rolls back) the calling operation.
pub(crate) async fn record_activity<C>(
    conn: &C,
    user_id: i64,
    action: ActivityAction,
    payload: serde_json::Value,
) -> Result<activity_log::Model, ServiceError>
where
    C: ConnectionTrait,
{
    let entry = activity_log::ActiveModel {
        user_id: Set(user_id),
        action: Set(action.as_str().to_string()),
        payload: Set(payload),
        ..Default::default()
    };

    entry.insert(conn).await.map_err(ServiceError::db_error)
}
