//! Directory API wire types
//!
//! Request/response shapes for the REST directory service. Every collection
//! and flag defaults, so a partially populated payload still parses and the
//! transformer sees empty lists instead of errors.

use serde::{Deserialize, Serialize};

use crate::NodeId;

fn default_true() -> bool {
    true
}

// ============================================================================
// HIERARCHY (GET hierarchy)
// ============================================================================

/// Department as delivered by `GET hierarchy`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDepartment {
    pub id: NodeId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: String,
    #[serde(default = "default_true")]
    pub is_chart_visible: bool,
    /// Functional roots group departments for administration only and are
    /// never drawn on the chart.
    #[serde(default)]
    pub is_functional_root: bool,
    #[serde(default, alias = "subDepartments")]
    pub children: Vec<RawDepartment>,
    #[serde(default)]
    pub employees: Vec<RawEmployee>,
}

impl RawDepartment {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            code: String::new(),
            is_chart_visible: true,
            is_functional_root: false,
            children: Vec::new(),
            employees: Vec::new(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_employees(mut self, employees: Vec<RawEmployee>) -> Self {
        self.employees = employees;
        self
    }

    pub fn with_children(mut self, children: Vec<RawDepartment>) -> Self {
        self.children = children;
        self
    }
}

/// Employee entry inside a department, optionally with direct reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEmployee {
    pub id: NodeId,
    #[serde(default, alias = "fullName")]
    pub name: String,
    #[serde(default, alias = "roleTitle", alias = "jobTitle")]
    pub title: String,
    #[serde(default)]
    pub department_id: Option<NodeId>,
    #[serde(default)]
    pub job_position_id: Option<NodeId>,
    #[serde(default)]
    pub is_online: bool,
    #[serde(default)]
    pub is_secondary_assignment: bool,
    /// Direct reports
    #[serde(default, alias = "subordinates")]
    pub children: Vec<RawEmployee>,
}

impl RawEmployee {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            title: title.into(),
            department_id: None,
            job_position_id: None,
            is_online: false,
            is_secondary_assignment: false,
            children: Vec::new(),
        }
    }

    pub fn with_reports(mut self, reports: Vec<RawEmployee>) -> Self {
        self.children = reports;
        self
    }

    pub fn in_department(mut self, department_id: impl Into<NodeId>) -> Self {
        self.department_id = Some(department_id.into());
        self
    }
}

// ============================================================================
// EMPLOYEE RECORD (GET/PATCH employee)
// ============================================================================

/// One entry of a primary or secondary manager list.
///
/// The directory reads entries with `id` and accepts writes with `managerId`;
/// both spellings deserialize here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagerAssignment {
    #[serde(rename = "managerId", alias = "id")]
    pub manager_id: NodeId,
    #[serde(default)]
    pub department_id: Option<NodeId>,
    #[serde(default)]
    pub job_position_id: Option<NodeId>,
}

impl ManagerAssignment {
    pub fn new(manager_id: impl Into<NodeId>) -> Self {
        Self {
            manager_id: manager_id.into(),
            department_id: None,
            job_position_id: None,
        }
    }
}

/// Response from `GET employee(id)` and `PATCH employee(id)`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRecord {
    #[serde(default)]
    pub id: Option<NodeId>,
    #[serde(default)]
    pub primary_managers: Vec<ManagerAssignment>,
    #[serde(default)]
    pub secondary_managers: Vec<ManagerAssignment>,
    #[serde(default)]
    pub department: Option<NodeId>,
}

/// Body of `PATCH employee(id)`; absent fields are left untouched server-side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeePatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_managers: Option<Vec<ManagerAssignment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_managers: Option<Vec<ManagerAssignment>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<NodeId>,
}

impl EmployeePatch {
    pub fn is_empty(&self) -> bool {
        self.primary_managers.is_none()
            && self.secondary_managers.is_none()
            && self.department.is_none()
    }
}

// ============================================================================
// ERROR PAYLOAD
// ============================================================================

/// Error body returned by the directory on non-2xx responses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Usually a string; validation failures may send a list or object
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ApiErrorBody {
    /// `detail` first, then `message`; blank values are skipped
    pub fn best_message(&self) -> Option<String> {
        let detail = self.detail.as_ref().and_then(|d| match d {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
        detail
            .into_iter()
            .chain(self.message.clone())
            .map(|m| m.trim().to_string())
            .find(|m| !m.is_empty())
    }
}
