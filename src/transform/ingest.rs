//! Raw directory payload → tagged [`OrgNode`] tree.
//!
//! The kind tag is fixed here. Hidden departments and functional roots are
//! dropped together with their subtree before any grouping happens.

use org_hierarchy_types::{DepartmentNode, EmployeeNode, OrgNode, RawDepartment, RawEmployee};

use crate::config::TransformOptions;

/// Department is excluded from the chart, along with everything beneath it
pub fn is_hidden(dept: &RawDepartment, options: &TransformOptions) -> bool {
    !dept.is_chart_visible
        || dept.is_functional_root
        || (!dept.code.is_empty()
            && options
                .excluded_root_codes
                .iter()
                .any(|code| code.eq_ignore_ascii_case(dept.code.trim())))
}

/// Ingest top-level departments, skipping hidden ones
pub fn ingest_departments(raw: &[RawDepartment], options: &TransformOptions) -> Vec<OrgNode> {
    raw.iter()
        .filter_map(|dept| department_node(dept, options))
        .collect()
}

fn department_node(raw: &RawDepartment, options: &TransformOptions) -> Option<OrgNode> {
    if is_hidden(raw, options) {
        tracing::debug!(department = %raw.id, code = %raw.code, "skipping hidden department");
        return None;
    }
    Some(OrgNode::Department(DepartmentNode {
        id: raw.id.clone(),
        name: raw.name.clone(),
        code: raw.code.clone(),
        is_chart_visible: raw.is_chart_visible,
        is_synthetic: false,
        children: ingest_departments(&raw.children, options),
        employees: raw
            .employees
            .iter()
            .map(|e| employee_node(e, raw.id.as_str()))
            .collect(),
    }))
}

/// `scope` is the chart position above this employee: the department id for
/// department listings, empty for reporting-line roots.
pub fn employee_node(raw: &RawEmployee, scope: &str) -> OrgNode {
    let position = if scope.is_empty() {
        raw.id.to_string()
    } else {
        format!("{}/{}", scope, raw.id)
    };
    OrgNode::Employee(EmployeeNode {
        id: raw.id.clone(),
        name: raw.name.clone(),
        role_title: raw.title.clone(),
        department_id: raw.department_id.clone(),
        job_position_id: raw.job_position_id.clone(),
        is_secondary_assignment: raw.is_secondary_assignment,
        is_online: raw.is_online,
        scope: scope.to_string(),
        children: raw
            .children
            .iter()
            .map(|report| employee_node(report, &position))
            .collect(),
    })
}
