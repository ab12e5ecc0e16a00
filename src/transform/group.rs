//! Sibling clustering.
//!
//! Employees sharing a derived category become one GROUP node. Departments
//! are never grouped and always trail the employee-like nodes.

use std::collections::{BTreeMap, HashMap};

use org_hierarchy_types::{DepartmentNode, EmployeeNode, GroupNode, NodeId, OrgNode};

use crate::config::CategoryRules;

/// Cluster one sibling list.
///
/// Output order: standalone employees and pre-existing groups in their
/// original order, then new groups by category name, then departments in
/// their original order. Members keep their original relative order.
pub fn group_siblings(nodes: &[OrgNode], rules: &CategoryRules) -> Vec<OrgNode> {
    let (departments, people): (Vec<&OrgNode>, Vec<&OrgNode>) =
        nodes.iter().partition(|node| node.is_department());

    let categories: Vec<Option<String>> = people
        .iter()
        .map(|node| node.as_employee().map(|e| rules.categorize(&e.role_title)))
        .collect();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for category in categories.iter().flatten() {
        *counts.entry(category.as_str()).or_default() += 1;
    }

    let mut out = Vec::with_capacity(nodes.len());
    let mut buckets: BTreeMap<&str, Vec<OrgNode>> = BTreeMap::new();
    for (node, category) in people.iter().zip(&categories) {
        match category.as_deref() {
            Some(category) if counts.get(category).copied().unwrap_or(0) >= 2 => {
                buckets.entry(category).or_default().push((*node).clone());
            }
            _ => out.push((*node).clone()),
        }
    }

    for (category, members) in buckets {
        let id = group_id(category, &members);
        tracing::debug!(group = %id, members = members.len(), "clustered siblings");
        out.push(OrgNode::Group(GroupNode {
            id,
            category: category.to_string(),
            members,
            adopted_children: Vec::new(),
            is_merged: false,
        }));
    }

    out.extend(departments.into_iter().cloned());
    out
}

/// Members are never empty; each chart position lands in at most one
/// bucket, so the first member's position keeps group ids unique within a run.
fn group_id(category: &str, members: &[OrgNode]) -> NodeId {
    let first = members
        .first()
        .and_then(OrgNode::as_employee)
        .map(EmployeeNode::position)
        .unwrap_or_default();
    NodeId::new(format!("group:{}:{}", category, first))
}

/// Apply [`group_siblings`] to every child list of the tree, bottom-up
pub fn group_tree(node: &OrgNode, rules: &CategoryRules) -> OrgNode {
    let regroup = |nodes: &[OrgNode]| -> Vec<OrgNode> {
        let inner: Vec<OrgNode> = nodes.iter().map(|n| group_tree(n, rules)).collect();
        group_siblings(&inner, rules)
    };

    match node {
        OrgNode::Department(d) => OrgNode::Department(DepartmentNode {
            id: d.id.clone(),
            name: d.name.clone(),
            code: d.code.clone(),
            is_chart_visible: d.is_chart_visible,
            is_synthetic: d.is_synthetic,
            children: d.children.iter().map(|c| group_tree(c, rules)).collect(),
            employees: regroup(&d.employees),
        }),
        OrgNode::Employee(e) => OrgNode::Employee(EmployeeNode {
            children: regroup(&e.children),
            ..e.without_children()
        }),
        OrgNode::Group(g) => OrgNode::Group(GroupNode {
            id: g.id.clone(),
            category: g.category.clone(),
            members: g.members.iter().map(|m| group_tree(m, rules)).collect(),
            adopted_children: regroup(&g.adopted_children),
            is_merged: g.is_merged,
        }),
    }
}
