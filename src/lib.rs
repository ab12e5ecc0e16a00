//! Organization hierarchy engine
//!
//! The logic behind the HR console's org chart:
//!
//! - [`transform`]: raw department/employee tree → render-ready tree, with
//!   same-role siblings clustered and system-administration chains collapsed
//! - [`reassign`]: drag-and-drop "move employee under a new manager or
//!   department" state machine with an explicit confirmation step
//! - [`managers`]: read-before-write edits of manager lists, shared by the
//!   drag flow and the "edit managers" context menu
//! - [`chart`]: fetch + transform, re-run after every committed change
//!
//! Rendering, forms and the permission check live outside this crate. The
//! directory service is reached only through [`directory_client::DirectoryClient`].

pub mod chart;
pub mod config;
pub mod error;
pub mod managers;
pub mod reassign;
pub mod transform;

pub use chart::OrgChartService;
pub use config::{CategoryRules, ControllerConfig, EngineConfig, TransformOptions};
pub use error::{ReassignError, ReassignResult};
pub use managers::ManagerListEditor;
pub use reassign::{
    DragSession, DropTarget, EmployeeRef, ManagerType, PendingReassignment, ReassignOutcome,
    ReassignState, ReassignmentController, Rejection, TargetKind,
};
pub use transform::{count_employees, count_raw_employees, HierarchyTransformer};

pub use directory_client;
pub use org_hierarchy_types;
