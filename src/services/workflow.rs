use crate::{
    db::DbPool,
    entities::{
        activity_log::{self, ActivityAction, Entity as ActivityLog},
        monthly_sheet::Entity as MonthlySheet,
        unlock_request::{self, Entity as UnlockRequest, RequestStatus, REQUEST_TYPE_UNLOCK_SHEET},
        user,
    },
    errors::ServiceError,
    services::{audit, ensure_admin},
};
use chrono::Utc;
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, *};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Records manager unlock requests and serves the audit trail.
///
/// A request never changes sheet state and is never linked automatically to
/// the eventual `unlock`; admins review requests out of band and resolve
/// them explicitly.
#[derive(Clone)]
pub struct WorkflowService {
    db_pool: Arc<DbPool>,
}

impl WorkflowService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Files a pending unlock request for a locked-out manager. Audited as
    /// `request_unlock` in the same transaction.
    pub async fn request_unlock(
        &self,
        plant_id: i64,
        sheet_id: i64,
        actor: &user::Model,
        details: &str,
    ) -> Result<unlock_request::Model, ServiceError> {
        let db = self.db_pool.as_ref();
        let actor_id = actor.id;
        let details = details.to_string();

        let created = db
            .transaction::<_, unlock_request::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let sheet = MonthlySheet::find_by_id(sheet_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Monthly sheet {} not found", sheet_id))
                        })?;

                    if sheet.plant_id != plant_id {
                        return Err(ServiceError::NotFound(format!(
                            "Monthly sheet {} does not belong to plant {}",
                            sheet_id, plant_id
                        )));
                    }

                    let request = unlock_request::ActiveModel {
                        requester_id: Set(actor_id),
                        plant_id: Set(plant_id),
                        sheet_id: Set(sheet_id),
                        request_type: Set(REQUEST_TYPE_UNLOCK_SHEET.to_string()),
                        details: Set(details),
                        status: Set(RequestStatus::Pending.as_str().to_string()),
                        resolved_at: Set(None),
                        ..Default::default()
                    };

                    let created = request.insert(txn).await.map_err(ServiceError::db_error)?;

                    audit::record_activity(
                        txn,
                        actor_id,
                        ActivityAction::RequestUnlock,
                        json!({ "sheet": sheet_id, "request": created.id }),
                    )
                    .await?;

                    Ok(created)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            request_id = created.id,
            sheet_id,
            requester_id = actor.id,
            "Filed unlock request"
        );

        Ok(created)
    }

    /// Marks a pending request resolved. Admin-only; audited as
    /// `resolve_request`. Resolving does not unlock the sheet.
    pub async fn resolve_request(
        &self,
        request_id: i64,
        actor: &user::Model,
    ) -> Result<unlock_request::Model, ServiceError> {
        ensure_admin(actor, "resolve an unlock request")?;

        let db = self.db_pool.as_ref();
        let actor_id = actor.id;

        let updated = db
            .transaction::<_, unlock_request::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let request = UnlockRequest::find_by_id(request_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!(
                                "Unlock request {} not found",
                                request_id
                            ))
                        })?;

                    if request.status() == Some(RequestStatus::Resolved) {
                        return Err(ServiceError::ValidationError(format!(
                            "Unlock request {} is already resolved",
                            request_id
                        )));
                    }

                    let mut active_request: unlock_request::ActiveModel = request.into();
                    active_request.status = Set(RequestStatus::Resolved.as_str().to_string());
                    active_request.resolved_at = Set(Some(Utc::now()));

                    let updated = active_request
                        .update(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    audit::record_activity(
                        txn,
                        actor_id,
                        ActivityAction::ResolveRequest,
                        json!({ "request": request_id }),
                    )
                    .await?;

                    Ok(updated)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(request_id, actor_id = actor.id, "Resolved unlock request");

        Ok(updated)
    }

    /// Pending requests for admin review, oldest first.
    pub async fn pending_requests(&self) -> Result<Vec<unlock_request::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        UnlockRequest::find()
            .filter(unlock_request::Column::Status.eq(RequestStatus::Pending.as_str()))
            .order_by_asc(unlock_request::Column::CreatedAt)
            .order_by_asc(unlock_request::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Most recent audit entries, newest first, bounded by `limit`.
    pub async fn recent_logs(&self, limit: u64) -> Result<Vec<activity_log::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        ActivityLog::find()
            .order_by_desc(activity_log::Column::CreatedAt)
            .order_by_desc(activity_log::Column::Id)
            .limit(limit)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }
}
