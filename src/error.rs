//! Reassignment error types
//!
//! Local validation failures (duplicate manager, no-op move) are warnings
//! and never reach the directory. Everything from the directory is wrapped
//! in [`ReassignError::Directory`] and surfaced with its best message.

use directory_client::DirectoryError;
use org_hierarchy_types::NodeId;
use thiserror::Error;

use crate::reassign::ManagerType;

#[derive(Error, Debug, Clone)]
pub enum ReassignError {
    #[error("Manager '{manager_id}' is already a {manager_type} manager of '{employee_id}'")]
    AlreadyAssigned {
        employee_id: NodeId,
        manager_id: NodeId,
        manager_type: ManagerType,
    },

    #[error("Employee '{employee_id}' already belongs to department '{department_id}'")]
    AlreadyInDepartment {
        employee_id: NodeId,
        department_id: NodeId,
    },

    #[error("Manager '{manager_id}' is not a {manager_type} manager of '{employee_id}'")]
    NotAssigned {
        employee_id: NodeId,
        manager_id: NodeId,
        manager_type: ManagerType,
    },

    #[error("No reassignment is waiting for confirmation")]
    NothingPending,

    #[error("Another reassignment is still being saved")]
    CommitInFlight,

    #[error("Saving the reassignment timed out after {after_ms}ms")]
    CommitTimedOut { after_ms: u64 },

    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

pub type ReassignResult<T> = std::result::Result<T, ReassignError>;

impl ReassignError {
    /// Local validation failure rather than a server or state error
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            ReassignError::AlreadyAssigned { .. }
                | ReassignError::AlreadyInDepartment { .. }
                | ReassignError::NotAssigned { .. }
        )
    }

    /// Text for the notification toast
    pub fn user_message(&self) -> String {
        match self {
            ReassignError::Directory(err) => err.user_message(),
            other => other.to_string(),
        }
    }
}
