use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, Set};
use serde::{Deserialize, Serialize};

/// Action tags recorded by every mutating operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityAction {
    LockSheet,
    UnlockSheet,
    AddTransaction,
    RequestUnlock,
    ResolveRequest,
    CreateManager,
}

impl ActivityAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityAction::LockSheet => "lock_sheet",
            ActivityAction::UnlockSheet => "unlock_sheet",
            ActivityAction::AddTransaction => "add_tx",
            ActivityAction::RequestUnlock => "request_unlock",
            ActivityAction::ResolveRequest => "resolve_request",
            ActivityAction::CreateManager => "create_manager",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lock_sheet" => Some(ActivityAction::LockSheet),
            "unlock_sheet" => Some(ActivityAction::UnlockSheet),
            "add_tx" => Some(ActivityAction::AddTransaction),
            "request_unlock" => Some(ActivityAction::RequestUnlock),
            "resolve_request" => Some(ActivityAction::ResolveRequest),
            "create_manager" => Some(ActivityAction::CreateManager),
            _ => None,
        }
    }
}

/// Append-only audit record; never mutated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: i64,
    pub action: String,
    pub payload: Json,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn action(&self) -> Option<ActivityAction> {
        ActivityAction::from_str(&self.action)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        if let ActiveValue::NotSet = active_model.created_at {
            active_model.created_at = Set(Utc::now());
        }
        Ok(active_model)
    }
}
