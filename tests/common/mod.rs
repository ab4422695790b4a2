#![allow(dead_code)]

use rrc_ops_api::{
    db::{establish_connection, run_migrations, DbPool},
    entities::{
        activity_log::{self, Entity as ActivityLog},
        plant, plant_assignment, user, UserRole,
    },
    AppServices,
};
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};
use std::sync::Arc;

/// Opens a named in-memory SQLite database (shared-cache, so all pooled
/// connections see the same data), runs migrations and wires the services.
/// Each test passes a distinct name for isolation.
pub async fn setup(db_name: &str) -> AppServices {
    let url = format!("sqlite:file:{}?mode=memory&cache=shared", db_name);
    let pool = establish_connection(&url)
        .await
        .expect("Failed to create DB pool");
    run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    AppServices::new(Arc::new(pool))
}

pub async fn create_admin(db: &DbPool, name: &str, email: &str) -> user::Model {
    create_user(db, name, email, UserRole::Admin, true).await
}

pub async fn create_manager(db: &DbPool, name: &str, email: &str) -> user::Model {
    create_user(db, name, email, UserRole::Manager, true).await
}

pub async fn create_user(
    db: &DbPool,
    name: &str,
    email: &str,
    role: UserRole,
    active: bool,
) -> user::Model {
    let user = user::ActiveModel {
        name: Set(name.to_string()),
        email: Set(email.to_string()),
        role: Set(role.as_str().to_string()),
        active: Set(active),
        ..Default::default()
    };

    user.insert(db).await.expect("Failed to create user")
}

pub async fn create_plant(db: &DbPool, name: &str, location: &str) -> plant::Model {
    let plant = plant::ActiveModel {
        name: Set(name.to_string()),
        location: Set(location.to_string()),
        ..Default::default()
    };

    plant.insert(db).await.expect("Failed to create plant")
}

pub async fn assign_plant(db: &DbPool, manager_id: i64, plant_id: i64) -> plant_assignment::Model {
    let assignment = plant_assignment::ActiveModel {
        manager_id: Set(manager_id),
        plant_id: Set(plant_id),
        ..Default::default()
    };

    assignment
        .insert(db)
        .await
        .expect("Failed to create assignment")
}

/// Number of audit entries recorded with the given action tag.
pub async fn count_logs(db: &DbPool, action: &str) -> u64 {
    ActivityLog::find()
        .filter(activity_log::Column::Action.eq(action))
        .count(db)
        .await
        .expect("Failed to count activity logs")
}
