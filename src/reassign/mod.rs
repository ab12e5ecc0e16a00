//! Drag-and-drop reassignment
//!
//! ```text
//! Idle ──start_drag──► Dragging ──hover──► TargetHover ──drop──► PendingConfirm
//!  ▲                      │                    │                    │      │
//!  └──────end_drag────────┴────────────────────┘          cancel ◄──┘      │ confirm
//!  ▲                                                                       ▼
//!  └──────────────── committed / failed / timed out ◄────────────── Committing
//! ```
//!
//! [`ReassignMachine`] holds the transitions as plain synchronous methods;
//! [`ReassignmentController`] adds the directory round-trip on confirm.

pub mod controller;
pub mod machine;

use std::fmt;

use org_hierarchy_types::{NodeId, OrgNode};
use serde::{Deserialize, Serialize};

pub use controller::ReassignmentController;
pub use machine::{ReassignMachine, Rejection};

/// Which manager list a confirmed drop appends to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ManagerType {
    /// Listed in the manager's team and approves requests
    Primary,
    /// Approves requests only
    Secondary,
}

impl fmt::Display for ManagerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ManagerType::Primary => f.write_str("primary"),
            ManagerType::Secondary => f.write_str("secondary"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetKind {
    Employee,
    Department,
}

/// The employee being dragged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRef {
    pub id: NodeId,
    pub name: String,
    pub department_id: Option<NodeId>,
}

impl EmployeeRef {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department_id: None,
        }
    }

    /// Only employee nodes can be dragged
    pub fn from_node(node: &OrgNode) -> Option<Self> {
        node.as_employee().map(|e| Self {
            id: e.id.clone(),
            name: e.name.clone(),
            department_id: e.department_id.clone(),
        })
    }
}

/// Node an employee was dropped on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropTarget {
    pub id: NodeId,
    pub name: String,
    pub kind: TargetKind,
    pub department_id: Option<NodeId>,
    pub job_position_id: Option<NodeId>,
}

impl DropTarget {
    pub fn employee(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: TargetKind::Employee,
            department_id: None,
            job_position_id: None,
        }
    }

    pub fn department(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: TargetKind::Department,
            department_id: None,
            job_position_id: None,
        }
    }

    /// Groups and the synthetic root are not drop targets
    pub fn from_node(node: &OrgNode) -> Option<Self> {
        match node {
            OrgNode::Employee(e) => Some(Self {
                id: e.id.clone(),
                name: e.name.clone(),
                kind: TargetKind::Employee,
                department_id: e.department_id.clone(),
                job_position_id: e.job_position_id.clone(),
            }),
            OrgNode::Department(d) if !d.is_synthetic => Some(Self::department(d.id.clone(), d.name.clone())),
            _ => None,
        }
    }
}

/// Pointer-gesture state; empty outside a drag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DragSession {
    pub dragged_employee: Option<EmployeeRef>,
    pub drop_target_id: Option<NodeId>,
}

impl DragSession {
    pub fn is_active(&self) -> bool {
        self.dragged_employee.is_some()
    }
}

/// Staged drop waiting for the user's decision
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReassignment {
    pub employee: EmployeeRef,
    pub target: DropTarget,
}

impl PendingReassignment {
    /// Employee targets need the primary/secondary choice before confirming
    pub fn needs_manager_type(&self) -> bool {
        self.target.kind == TargetKind::Employee
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReassignState {
    Idle,
    Dragging,
    TargetHover,
    PendingConfirm,
    Committing,
}

/// Result of a successful confirm or cancel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReassignOutcome {
    /// Write landed; the caller should re-fetch and re-transform
    HierarchyChanged { employee_id: NodeId },
    Cancelled,
}
