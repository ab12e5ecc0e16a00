//! OrgNode - the render-ready organization tree
//!
//! Every node carries its kind as an enum variant. The kind is decided once,
//! when raw directory data is ingested, and nothing downstream inspects field
//! presence to guess it.

use serde::{Deserialize, Serialize};

use crate::NodeId;

/// Node kind tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Department,
    Employee,
    Group,
}

/// A node of the organization chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrgNode {
    Department(DepartmentNode),
    Employee(EmployeeNode),
    Group(GroupNode),
}

/// Department or synthetic root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepartmentNode {
    pub id: NodeId,
    pub name: String,
    pub code: String,
    pub is_chart_visible: bool,
    /// True only for the root the transformer adds over several top-level departments
    #[serde(default)]
    pub is_synthetic: bool,
    /// Sub-departments
    pub children: Vec<OrgNode>,
    pub employees: Vec<OrgNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeNode {
    pub id: NodeId,
    pub name: String,
    pub role_title: String,
    pub department_id: Option<NodeId>,
    pub job_position_id: Option<NodeId>,
    pub is_secondary_assignment: bool,
    pub is_online: bool,
    /// Path of the chart position holding this node: the containing
    /// department id, then each manager id above it. Empty for roots of a
    /// reporting-line chart.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub scope: String,
    /// Direct reports
    pub children: Vec<OrgNode>,
}

/// Synthetic cluster built by the transformer; never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupNode {
    pub id: NodeId,
    pub category: String,
    /// Clustered employees, in original relative order
    pub members: Vec<OrgNode>,
    /// Descendants rescued from collapsed chain members
    pub adopted_children: Vec<OrgNode>,
    /// Set for collapsed admin chains, clear for sibling clusters
    pub is_merged: bool,
}

impl EmployeeNode {
    /// Copy of this employee with its reports removed
    pub fn without_children(&self) -> EmployeeNode {
        EmployeeNode {
            children: Vec::new(),
            ..self.clone()
        }
    }

    /// `scope/id`, or the bare id at the top of a reporting-line chart.
    ///
    /// An employee listed under several departments (secondary
    /// assignments) has one position per listing.
    pub fn position(&self) -> String {
        if self.scope.is_empty() {
            self.id.to_string()
        } else {
            format!("{}/{}", self.scope, self.id)
        }
    }
}

impl OrgNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            OrgNode::Department(_) => NodeKind::Department,
            OrgNode::Employee(_) => NodeKind::Employee,
            OrgNode::Group(_) => NodeKind::Group,
        }
    }

    pub fn id(&self) -> &NodeId {
        match self {
            OrgNode::Department(d) => &d.id,
            OrgNode::Employee(e) => &e.id,
            OrgNode::Group(g) => &g.id,
        }
    }

    /// Display title: department name, employee role title, or group category
    pub fn title(&self) -> &str {
        match self {
            OrgNode::Department(d) => &d.name,
            OrgNode::Employee(e) => &e.role_title,
            OrgNode::Group(g) => &g.category,
        }
    }

    /// Ordered child sequence: sub-departments, direct reports, or adopted children
    pub fn children(&self) -> &[OrgNode] {
        match self {
            OrgNode::Department(d) => &d.children,
            OrgNode::Employee(e) => &e.children,
            OrgNode::Group(g) => &g.adopted_children,
        }
    }

    /// Department employee list; empty for every other kind
    pub fn employees(&self) -> &[OrgNode] {
        match self {
            OrgNode::Department(d) => &d.employees,
            _ => &[],
        }
    }

    /// Key unique within one transformer run.
    ///
    /// Department and employee ids come from different tables and may
    /// collide, so the kind is part of the key. The same employee can sit in
    /// several places, so employees are keyed by position rather than id.
    /// Group ids are built from member positions by the transformer.
    pub fn render_key(&self) -> String {
        match self {
            OrgNode::Department(d) => format!("dept:{}", d.id),
            OrgNode::Employee(e) => format!("emp:{}", e.position()),
            OrgNode::Group(g) => g.id.to_string(),
        }
    }

    pub fn is_department(&self) -> bool {
        matches!(self, OrgNode::Department(_))
    }

    pub fn as_employee(&self) -> Option<&EmployeeNode> {
        match self {
            OrgNode::Employee(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_group(&self) -> Option<&GroupNode> {
        match self {
            OrgNode::Group(g) => Some(g),
            _ => None,
        }
    }

    /// Employees reachable from this node, itself included, in depth-first order
    pub fn employee_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        collect_employee_ids(self, &mut out);
        out
    }
}

fn collect_employee_ids(node: &OrgNode, out: &mut Vec<NodeId>) {
    match node {
        OrgNode::Department(d) => {
            d.employees
                .iter()
                .chain(&d.children)
                .for_each(|n| collect_employee_ids(n, out));
        }
        OrgNode::Employee(e) => {
            out.push(e.id.clone());
            e.children.iter().for_each(|n| collect_employee_ids(n, out));
        }
        OrgNode::Group(g) => {
            g.members
                .iter()
                .chain(&g.adopted_children)
                .for_each(|n| collect_employee_ids(n, out));
        }
    }
}
