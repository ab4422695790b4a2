use crate::{
    db::DbPool,
    entities::{
        activity_log::ActivityAction,
        monthly_sheet::{self, Entity as MonthlySheet},
        plant::Entity as Plant,
        user,
    },
    errors::ServiceError,
    services::{audit, ensure_admin},
};
use chrono::Utc;
use sea_orm::{Set, TransactionTrait, *};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

/// Creates, locks and unlocks monthly sheets and enforces mutation gating.
///
/// Sheet state machine: {OPEN, LOCKED}, initial OPEN on creation,
/// OPEN -> LOCKED (`lock`) and LOCKED -> OPEN (`unlock`), both admin-only.
/// There are no automatic transitions; month-end never locks a sheet on its
/// own.
#[derive(Clone)]
pub struct SheetLifecycleService {
    db_pool: Arc<DbPool>,
}

impl SheetLifecycleService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Returns the sheet for (plant, year, month), creating it unlocked on
    /// first access. Idempotent per period.
    pub async fn get_or_create_sheet(
        &self,
        plant_id: i64,
        year: i32,
        month: i32,
    ) -> Result<monthly_sheet::Model, ServiceError> {
        if !(1..=12).contains(&month) {
            return Err(ServiceError::ValidationError(format!(
                "month must be in 1..=12, got {}",
                month
            )));
        }

        let db = self.db_pool.as_ref();

        Plant::find_by_id(plant_id)
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::NotFound(format!("Plant {} not found", plant_id)))?;

        if let Some(sheet) = MonthlySheet::find()
            .filter(monthly_sheet::Column::PlantId.eq(plant_id))
            .filter(monthly_sheet::Column::Year.eq(year))
            .filter(monthly_sheet::Column::Month.eq(month))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        {
            return Ok(sheet);
        }

        let sheet = monthly_sheet::ActiveModel {
            plant_id: Set(plant_id),
            year: Set(year),
            month: Set(month),
            locked: Set(false),
            locked_at: Set(None),
            ..Default::default()
        };

        let created = sheet.insert(db).await.map_err(ServiceError::db_error)?;

        info!(
            sheet_id = created.id,
            plant_id, year, month, "Created monthly sheet"
        );

        Ok(created)
    }

    /// OPEN -> LOCKED. Admin-only; audited as `lock_sheet`.
    pub async fn lock(
        &self,
        sheet_id: i64,
        actor: &user::Model,
    ) -> Result<monthly_sheet::Model, ServiceError> {
        ensure_admin(actor, "lock a monthly sheet")?;

        let db = self.db_pool.as_ref();
        let actor_id = actor.id;

        let updated = db
            .transaction::<_, monthly_sheet::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let sheet = MonthlySheet::find_by_id(sheet_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Monthly sheet {} not found", sheet_id))
                        })?;

                    if sheet.locked {
                        return Err(ServiceError::AlreadyLocked(sheet_id));
                    }

                    let mut active_sheet: monthly_sheet::ActiveModel = sheet.into();
                    active_sheet.locked = Set(true);
                    active_sheet.locked_at = Set(Some(Utc::now()));

                    let updated = active_sheet
                        .update(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    audit::record_activity(
                        txn,
                        actor_id,
                        ActivityAction::LockSheet,
                        json!({ "sheet": sheet_id }),
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

        info!(sheet_id, actor_id = actor.id, "Locked monthly sheet");

        Ok(updated)
    }

    /// LOCKED -> OPEN. Admin-only; audited as `unlock_sheet`.
    pub async fn unlock(
        &self,
        sheet_id: i64,
        actor: &user::Model,
    ) -> Result<monthly_sheet::Model, ServiceError> {
        ensure_admin(actor, "unlock a monthly sheet")?;

        let db = self.db_pool.as_ref();
        let actor_id = actor.id;

        let updated = db
            .transaction::<_, monthly_sheet::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let sheet = MonthlySheet::find_by_id(sheet_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Monthly sheet {} not found", sheet_id))
                        })?;

                    if !sheet.locked {
                        return Err(ServiceError::NotLocked(sheet_id));
                    }

                    let mut active_sheet: monthly_sheet::ActiveModel = sheet.into();
                    active_sheet.locked = Set(false);
                    active_sheet.locked_at = Set(None);

                    let updated = active_sheet
                        .update(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    audit::record_activity(
                        txn,
                        actor_id,
                        ActivityAction::UnlockSheet,
                        json!({ "sheet": sheet_id }),
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

        info!(sheet_id, actor_id = actor.id, "Unlocked monthly sheet");

        Ok(updated)
    }
}
