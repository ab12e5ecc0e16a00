//! DirectoryClient trait: the sole API boundary between the org-chart engine
//! and the REST directory service. The engine depends on this crate, never on
//! a concrete transport.

pub mod error;
pub mod http;
pub mod inmemory;

use async_trait::async_trait;
use org_hierarchy_types::{EmployeePatch, EmployeeRecord, NodeId, RawDepartment};

pub use error::DirectoryError;
pub use http::{DirectoryConfig, HttpDirectoryClient};
pub use inmemory::InMemoryDirectory;

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[async_trait]
pub trait DirectoryClient: Send + Sync {
    /// Fetch the department tree with nested sub-departments and employees.
    async fn get_hierarchy(&self) -> Result<Vec<RawDepartment>>;

    /// Fetch one employee's manager lists and department.
    async fn get_employee(&self, id: &NodeId) -> Result<EmployeeRecord>;

    /// Update manager lists and/or department. Lists are replaced wholesale,
    /// so callers send the full updated list.
    async fn patch_employee(&self, id: &NodeId, patch: EmployeePatch) -> Result<EmployeeRecord>;
}
