//! Admin chain collapse.
//!
//! A system-administration employee whose direct reports include other
//! system administrators is replaced by one merged GROUP. The chain members
//! lose their children; every rescued descendant hangs off the group's
//! `adopted_children` instead.

use org_hierarchy_types::{DepartmentNode, EmployeeNode, GroupNode, NodeId, OrgNode};

use crate::config::CategoryRules;

fn is_chain_employee(node: &OrgNode, rules: &CategoryRules) -> bool {
    node.as_employee()
        .is_some_and(|e| rules.is_chain_category(&rules.categorize(&e.role_title)))
}

/// Collapse admin chains anywhere under `node`, top-down
pub fn flatten_admin_chain(node: &OrgNode, rules: &CategoryRules) -> OrgNode {
    let recurse = |nodes: &[OrgNode]| -> Vec<OrgNode> {
        nodes.iter().map(|n| flatten_admin_chain(n, rules)).collect()
    };

    match node {
        OrgNode::Employee(emp) if is_chain_employee(node, rules) => {
            let (admin_children, other_children): (Vec<&OrgNode>, Vec<&OrgNode>) = emp
                .children
                .iter()
                .partition(|child| is_chain_employee(child, rules));

            if admin_children.is_empty() {
                return OrgNode::Employee(EmployeeNode {
                    children: recurse(&emp.children),
                    ..emp.without_children()
                });
            }

            let members: Vec<OrgNode> = std::iter::once(emp.without_children())
                .chain(
                    admin_children
                        .iter()
                        .filter_map(|child| child.as_employee())
                        .map(EmployeeNode::without_children),
                )
                .map(OrgNode::Employee)
                .collect();

            let adopted: Vec<OrgNode> = other_children
                .into_iter()
                .chain(admin_children.iter().flat_map(|child| child.children()))
                .cloned()
                .collect();

            tracing::debug!(
                head = %emp.id,
                members = members.len(),
                adopted = adopted.len(),
                "collapsed admin chain"
            );

            OrgNode::Group(GroupNode {
                id: NodeId::new(format!("chain:{}", emp.position())),
                category: rules.chain_category.clone(),
                members,
                adopted_children: recurse(&adopted),
                is_merged: true,
            })
        }
        OrgNode::Employee(emp) => OrgNode::Employee(EmployeeNode {
            children: recurse(&emp.children),
            ..emp.without_children()
        }),
        OrgNode::Department(d) => OrgNode::Department(DepartmentNode {
            id: d.id.clone(),
            name: d.name.clone(),
            code: d.code.clone(),
            is_chart_visible: d.is_chart_visible,
            is_synthetic: d.is_synthetic,
            children: recurse(&d.children),
            employees: recurse(&d.employees),
        }),
        OrgNode::Group(g) => OrgNode::Group(GroupNode {
            id: g.id.clone(),
            category: g.category.clone(),
            members: recurse(&g.members),
            adopted_children: recurse(&g.adopted_children),
            is_merged: g.is_merged,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::test_support::{employee, with_reports};
    use org_hierarchy_types::NodeKind;

    fn ids(nodes: &[OrgNode]) -> Vec<String> {
        nodes.iter().map(|n| n.id().to_string()).collect()
    }

    #[test]
    fn test_non_admin_root_is_untouched() {
        let rules = CategoryRules::default();
        let tree = with_reports(
            employee("1", "Genel Müdür"),
            vec![employee("2", "Developer")],
        );
        assert_eq!(flatten_admin_chain(&tree, &rules), tree);
    }

    #[test]
    fn test_admin_without_admin_reports_is_untouched() {
        let rules = CategoryRules::default();
        let tree = with_reports(
            employee("1", "Sistem Yöneticisi"),
            vec![employee("2", "Teknisyen")],
        );
        assert_eq!(flatten_admin_chain(&tree, &rules), tree);
    }

    #[test]
    fn test_chain_collapses_and_rescues_descendants() {
        let rules = CategoryRules::default();
        let tree = with_reports(
            employee("1", "Sistem Yöneticisi"),
            vec![
                employee("2", "Teknisyen"),
                with_reports(
                    employee("3", "System Admin"),
                    vec![employee("4", "Stajyer")],
                ),
            ],
        );

        let out = flatten_admin_chain(&tree, &rules);
        let group = out.as_group().expect("chain group");
        assert!(group.is_merged);
        assert_eq!(group.id.as_str(), "chain:1");
        assert_eq!(group.category, "Sistem Yönetimi");
        assert_eq!(ids(&group.members), vec!["1", "3"]);
        assert!(group.members.iter().all(|m| m.children().is_empty()));
        assert_eq!(ids(&group.adopted_children), vec!["2", "4"]);
    }

    #[test]
    fn test_nested_chain_under_adopted_children() {
        let rules = CategoryRules::default();
        // 1 → 2 (chain), 2 → 5 (plain), 5 → 6 → 7 where 6 and 7 form a second chain
        let tree = with_reports(
            employee("1", "Sistem Yöneticisi"),
            vec![with_reports(
                employee("2", "Sistem Yöneticisi"),
                vec![with_reports(
                    employee("5", "Ekip Lideri"),
                    vec![with_reports(
                        employee("6", "Sistem Uzmanı"),
                        vec![employee("7", "Sistem Yöneticisi")],
                    )],
                )],
            )],
        );

        let out = flatten_admin_chain(&tree, &rules);
        let group = out.as_group().unwrap();
        assert_eq!(ids(&group.members), vec!["1", "2"]);
        let lead = &group.adopted_children[0];
        assert_eq!(lead.kind(), NodeKind::Employee);
        let inner = lead.children()[0].as_group().unwrap();
        assert_eq!(ids(&inner.members), vec!["6", "7"]);
    }

    #[test]
    fn test_chain_found_below_department_employees() {
        let rules = CategoryRules::default();
        let tree = crate::transform::test_support::department_with(
            "d1",
            "Bilgi İşlem",
            vec![with_reports(
                employee("1", "Sistem Yöneticisi"),
                vec![employee("2", "Sistem Yöneticisi")],
            )],
        );

        let out = flatten_admin_chain(&tree, &rules);
        assert_eq!(out.employees()[0].kind(), NodeKind::Group);
        assert_eq!(out.employee_ids().len(), 2);
    }
}
