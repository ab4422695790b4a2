//! RRC Operations Core
//!
//! Backend core for the RRC plant operations dashboard: monthly sheet
//! lifecycle and locking, an append-only transaction ledger with
//! aggregation, the manager unlock-request workflow and an immutable audit
//! trail. The presentation layer is an external collaborator that calls in
//! through [`AppServices`].
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod migrator;
pub mod services;

use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Bundle wiring every service onto one shared connection pool.
///
/// The storage handle is injected here rather than held as module-wide
/// state, so callers (and tests) control its lifetime.
#[derive(Clone)]
pub struct AppServices {
    pub db: Arc<DatabaseConnection>,
    pub sheets: services::SheetLifecycleService,
    pub ledger: services::LedgerService,
    pub workflow: services::WorkflowService,
    pub directory: services::DirectoryService,
}

impl AppServices {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self {
            sheets: services::SheetLifecycleService::new(db.clone()),
            ledger: services::LedgerService::new(db.clone()),
            workflow: services::WorkflowService::new(db.clone()),
            directory: services::DirectoryService::new(db.clone()),
            db,
        }
    }
}

pub mod prelude {
    pub use crate::db::*;
    pub use crate::entities::{ActivityAction, RequestStatus, TransactionType, UserRole};
    pub use crate::errors::*;
    pub use crate::services::*;
    pub use crate::AppServices;
}
