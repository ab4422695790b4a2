use crate::{
    db::DbPool,
    entities::{
        activity_log::ActivityAction,
        monthly_sheet::{self, Entity as MonthlySheet},
        plant::{self, Entity as Plant},
        plant_assignment::{self, Entity as PlantAssignment},
        user::{self, Entity as User, UserRole},
    },
    errors::ServiceError,
    services::{audit, ensure_admin},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, *};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// A plant with its (optional) sheet for the requested period. An absent
/// sheet is a valid state, not an error.
#[derive(Debug, Clone, Serialize)]
pub struct PlantOverview {
    pub plant: plant::Model,
    pub sheet: Option<monthly_sheet::Model>,
}

/// Thin directory over plants, assignments and users.
#[derive(Clone)]
pub struct DirectoryService {
    db_pool: Arc<DbPool>,
}

impl DirectoryService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// All plants with the sheet for (year, month) left-joined.
    pub async fn plants_for_admin(
        &self,
        year: i32,
        month: i32,
    ) -> Result<Vec<PlantOverview>, ServiceError> {
        let db = self.db_pool.as_ref();

        let plants = Plant::find()
            .order_by_asc(plant::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        let mut sheets: HashMap<i64, monthly_sheet::Model> = MonthlySheet::find()
            .filter(monthly_sheet::Column::Year.eq(year))
            .filter(monthly_sheet::Column::Month.eq(month))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|s| (s.plant_id, s))
            .collect();

        Ok(plants
            .into_iter()
            .map(|plant| {
                let sheet = sheets.remove(&plant.id);
                PlantOverview { plant, sheet }
            })
            .collect())
    }

    /// Plants assigned to a manager. No assignments yields an empty vec.
    pub async fn plants_for_manager(
        &self,
        user_id: i64,
    ) -> Result<Vec<plant::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        let plant_ids: Vec<i64> = PlantAssignment::find()
            .filter(plant_assignment::Column::ManagerId.eq(user_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|a| a.plant_id)
            .collect();

        if plant_ids.is_empty() {
            return Ok(Vec::new());
        }

        Plant::find()
            .filter(plant::Column::Id.is_in(plant_ids))
            .order_by_asc(plant::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Active users, for the demo login selector.
    pub async fn list_active_users(&self) -> Result<Vec<user::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        User::find()
            .filter(user::Column::Active.eq(true))
            .order_by_asc(user::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// All users with the manager role.
    pub async fn list_managers(&self) -> Result<Vec<user::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        User::find()
            .filter(user::Column::Role.eq(UserRole::Manager.as_str()))
            .order_by_asc(user::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Fetches a sheet without creating it.
    pub async fn get_sheet(
        &self,
        plant_id: i64,
        year: i32,
        month: i32,
    ) -> Result<Option<monthly_sheet::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        MonthlySheet::find()
            .filter(monthly_sheet::Column::PlantId.eq(plant_id))
            .filter(monthly_sheet::Column::Year.eq(year))
            .filter(monthly_sheet::Column::Month.eq(month))
            .one(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Demo-only manager creation. Admin-only; no validation beyond email
    /// uniqueness. Audited as `create_manager`.
    pub async fn create_manager(
        &self,
        name: &str,
        email: &str,
        actor: &user::Model,
    ) -> Result<user::Model, ServiceError> {
        ensure_admin(actor, "create a manager")?;

        let db = self.db_pool.as_ref();
        let actor_id = actor.id;
        let name = name.to_string();
        let email = email.to_string();

        let created = db
            .transaction::<_, user::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let existing = User::find()
                        .filter(user::Column::Email.eq(email.clone()))
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    if existing.is_some() {
                        return Err(ServiceError::ValidationError(format!(
                            "email {} is already in use",
                            email
                        )));
                    }

                    let manager = user::ActiveModel {
                        name: Set(name),
                        email: Set(email),
                        role: Set(UserRole::Manager.as_str().to_string()),
                        active: Set(true),
                        ..Default::default()
                    };

                    let created = manager.insert(txn).await.map_err(ServiceError::db_error)?;

                    audit::record_activity(
                        txn,
                        actor_id,
                        ActivityAction::CreateManager,
                        json!({ "user": created.id }),
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

        info!(user_id = created.id, actor_id = actor.id, "Created manager");

        Ok(created)
    }
}
