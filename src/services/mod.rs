//! Service layer: the data-access contract consumed by the presentation
//! layer. Each service holds a shared connection pool; all mutating
//! operations commit their data change and audit entry in one transaction.

pub mod audit;
pub mod directory;
pub mod ledger;
pub mod sheets;
pub mod workflow;

pub use directory::{DirectoryService, PlantOverview};
pub use ledger::{LedgerService, TypeTotals};
pub use sheets::SheetLifecycleService;
pub use workflow::WorkflowService;

use crate::entities::user;
use crate::errors::ServiceError;

/// Authorization check for admin-only actions. Lives in the service layer so
/// the invariant cannot be bypassed by a different caller.
pub(crate) fn ensure_admin(actor: &user::Model, action: &str) -> Result<(), ServiceError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(ServiceError::NotAuthorized(format!(
            "user {} ({}) may not {}",
            actor.id, actor.role, action
        )))
    }
}
