//! Typed records for the persisted schema, one module per table.

pub mod activity_log;
pub mod ledger_transaction;
pub mod monthly_sheet;
pub mod plant;
pub mod plant_assignment;
pub mod unlock_request;
pub mod user;

pub use activity_log::ActivityAction;
pub use ledger_transaction::TransactionType;
pub use unlock_request::RequestStatus;
pub use user::UserRole;
