//! Tree Transformer
//!
//! Turns the directory's raw department tree into a render-ready tree:
//!
//! 1. hidden departments and functional roots are dropped ([`ingest`])
//! 2. system-administration manager chains collapse into merged groups ([`flatten`])
//! 3. same-category siblings cluster into groups ([`group`])
//! 4. several top-level departments are wrapped under one synthetic root
//!
//! Every function borrows its input and builds fresh nodes; the raw tree is
//! never mutated, and the employee count is the same before and after.

pub mod flatten;
pub mod group;
pub mod ingest;

use org_hierarchy_types::{DepartmentNode, NodeId, OrgNode, RawDepartment, RawEmployee};

use crate::config::{CategoryRules, TransformOptions};

pub use flatten::flatten_admin_chain;
pub use group::{group_siblings, group_tree};

/// Id of the synthetic root
pub const SYNTHETIC_ROOT_ID: &str = "root";

#[derive(Debug, Clone, Default)]
pub struct HierarchyTransformer {
    rules: CategoryRules,
    options: TransformOptions,
}

impl HierarchyTransformer {
    pub fn new(rules: CategoryRules, options: TransformOptions) -> Self {
        Self { rules, options }
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    pub fn categorize(&self, title: &str) -> String {
        self.rules.categorize(title)
    }

    /// Filtered, kind-tagged top-level departments, before any grouping
    pub fn ingest(&self, raw: &[RawDepartment]) -> Vec<OrgNode> {
        ingest::ingest_departments(raw, &self.options)
    }

    /// Full pipeline for the department chart. `None` when nothing is visible.
    pub fn transform(&self, raw: &[RawDepartment]) -> Option<OrgNode> {
        let roots: Vec<OrgNode> = self
            .ingest(raw)
            .iter()
            .map(|root| self.transform_node(root))
            .collect();
        tracing::debug!(roots = roots.len(), "transformed hierarchy");
        self.wrap_roots(roots)
    }

    /// Reporting-line chart: top-level employees and their reports, no departments
    pub fn transform_reporting_lines(&self, roots: &[RawEmployee]) -> Vec<OrgNode> {
        let nodes: Vec<OrgNode> = roots
            .iter()
            .map(|root| ingest::employee_node(root, ""))
            .map(|root| self.transform_node(&root))
            .collect();
        group_siblings(&nodes, &self.rules)
    }

    /// Flatten admin chains, then cluster siblings, over one subtree
    pub fn transform_node(&self, node: &OrgNode) -> OrgNode {
        let flattened = flatten_admin_chain(node, &self.rules);
        group_tree(&flattened, &self.rules)
    }

    pub fn group_siblings(&self, nodes: &[OrgNode]) -> Vec<OrgNode> {
        group_siblings(nodes, &self.rules)
    }

    pub fn flatten_admin_chain(&self, node: &OrgNode) -> OrgNode {
        flatten_admin_chain(node, &self.rules)
    }

    fn wrap_roots(&self, mut roots: Vec<OrgNode>) -> Option<OrgNode> {
        match roots.len() {
            0 => None,
            1 => roots.pop(),
            _ => Some(OrgNode::Department(DepartmentNode {
                id: NodeId::from(SYNTHETIC_ROOT_ID),
                name: self.options.root_label.clone(),
                code: String::new(),
                is_chart_visible: true,
                is_synthetic: true,
                children: roots,
                employees: Vec::new(),
            })),
        }
    }
}

/// Employees reachable from `node` through every child collection
pub fn count_employees(node: &OrgNode) -> usize {
    match node {
        OrgNode::Employee(e) => 1 + e.children.iter().map(count_employees).sum::<usize>(),
        OrgNode::Department(d) => d
            .employees
            .iter()
            .chain(&d.children)
            .map(count_employees)
            .sum(),
        OrgNode::Group(g) => g
            .members
            .iter()
            .chain(&g.adopted_children)
            .map(count_employees)
            .sum(),
    }
}

/// Employees in a raw department tree, hidden departments included
pub fn count_raw_employees(departments: &[RawDepartment]) -> usize {
    fn count_reports(employee: &RawEmployee) -> usize {
        1 + employee.children.iter().map(count_reports).sum::<usize>()
    }

    departments
        .iter()
        .map(|d| {
            d.employees.iter().map(count_reports).sum::<usize>() + count_raw_employees(&d.children)
        })
        .sum()
}


#[cfg(test)]
mod tests {
    use super::*;
    use org_hierarchy_types::NodeKind;
    use proptest::prelude::*;

    fn engineering() -> RawDepartment {
        RawDepartment::new(10, "Engineering").with_employees(vec![
            RawEmployee::new(1, "Ali", "Sistem Yöneticisi"),
            RawEmployee::new(2, "Veli", "Sistem Yöneticisi"),
            RawEmployee::new(3, "Ayşe", "Grafik Tasarımcı"),
        ])
    }

    #[test]
    fn test_engineering_scenario() {
        let transformer = HierarchyTransformer::default();
        let root = transformer.transform(&[engineering()]).unwrap();

        assert_eq!(root.kind(), NodeKind::Department);
        let employees = root.employees();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].id().as_str(), "3");
        let group = employees[1].as_group().unwrap();
        assert_eq!(group.category, "Sistem Yönetimi");
        let member_ids: Vec<&str> = group.members.iter().map(|m| m.id().as_str()).collect();
        assert_eq!(member_ids, vec!["1", "2"]);
    }

    #[test]
    fn test_multiple_roots_wrapped() {
        let transformer = HierarchyTransformer::default();
        let root = transformer
            .transform(&[engineering(), RawDepartment::new(20, "Satış")])
            .unwrap();

        match &root {
            OrgNode::Department(d) => {
                assert!(d.is_synthetic);
                assert_eq!(d.id.as_str(), SYNTHETIC_ROOT_ID);
                assert_eq!(d.name, "Organizasyon");
                assert_eq!(d.children.len(), 2);
            }
            other => panic!("expected synthetic department, got {:?}", other.kind()),
        }
    }

    #[test]
    fn test_nothing_visible_yields_none() {
        let mut hidden = engineering();
        hidden.is_chart_visible = false;
        let transformer = HierarchyTransformer::default();
        assert!(transformer.transform(&[hidden]).is_none());
        assert!(transformer.transform(&[]).is_none());
    }

    #[test]
    fn test_raw_tree_is_not_mutated() {
        let raw = vec![engineering()];
        let before = raw.clone();
        let _ = HierarchyTransformer::default().transform(&raw);
        assert_eq!(raw, before);
    }

    fn collect_render_keys(node: &OrgNode, out: &mut Vec<String>) {
        out.push(node.render_key());
        let members = node.as_group().map(|g| g.members.as_slice()).unwrap_or(&[]);
        node.employees()
            .iter()
            .chain(members)
            .chain(node.children())
            .for_each(|n| collect_render_keys(n, out));
    }

    #[test]
    fn test_secondary_assignment_keys_stay_unique() {
        let mut secondary = RawEmployee::new(5, "Deniz", "Developer");
        secondary.is_secondary_assignment = true;
        let roots = [
            RawDepartment::new(10, "Ar-Ge").with_employees(vec![
                RawEmployee::new(5, "Deniz", "Developer"),
                RawEmployee::new(6, "Emre", "Backend Developer"),
            ]),
            RawDepartment::new(20, "Platform").with_employees(vec![
                secondary,
                RawEmployee::new(7, "Selin", "Frontend Developer"),
            ]),
        ];

        let root = HierarchyTransformer::default().transform(&roots).unwrap();
        let mut keys = Vec::new();
        collect_render_keys(&root, &mut keys);

        // root, two departments, two groups, four placements
        assert_eq!(keys.len(), 9);
        let mut unique = keys.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), keys.len(), "duplicate render keys: {:?}", keys);
        assert!(keys.contains(&"emp:10/5".to_string()));
        assert!(keys.contains(&"emp:20/5".to_string()));
    }

    #[test]
    fn test_reporting_lines_flatten_then_group() {
        let transformer = HierarchyTransformer::default();
        let head = RawEmployee::new(1, "Ali", "Sistem Yöneticisi").with_reports(vec![
            RawEmployee::new(2, "Veli", "Sistem Yöneticisi").with_reports(vec![
                RawEmployee::new(4, "Can", "Teknisyen"),
                RawEmployee::new(5, "Cem", "Teknisyen"),
            ]),
            RawEmployee::new(3, "Ayşe", "Grafik Tasarımcı"),
        ]);

        let out = transformer.transform_reporting_lines(&[head]);
        assert_eq!(out.len(), 1);
        let chain = out[0].as_group().unwrap();
        assert!(chain.is_merged);
        // 3 stays alone, 4 and 5 cluster as technical staff
        assert_eq!(chain.adopted_children.len(), 2);
        assert_eq!(chain.adopted_children[0].id().as_str(), "3");
        assert_eq!(chain.adopted_children[1].title(), "Teknik Personel");
        assert_eq!(out.iter().map(count_employees).sum::<usize>(), 5);
    }

    // -- Property tests --

    const TITLES: &[&str] = &[
        "Sistem Yöneticisi",
        "System Admin",
        "Developer",
        "Backend Developer",
        "Grafik Tasarımcı",
        "Teknisyen",
        "Satış Temsilcisi",
        "Genel Müdür",
        "Stajyer",
    ];

    fn arb_employee() -> impl Strategy<Value = RawEmployee> {
        let leaf = (0..TITLES.len()).prop_map(|i| RawEmployee::new(0u64, "x", TITLES[i]));
        leaf.prop_recursive(4, 40, 4, |inner| {
            ((0..TITLES.len()), prop::collection::vec(inner, 0..4)).prop_map(|(i, reports)| {
                RawEmployee::new(0u64, "x", TITLES[i]).with_reports(reports)
            })
        })
    }

    fn arb_department() -> impl Strategy<Value = RawDepartment> {
        let leaf = prop::collection::vec(arb_employee(), 0..6)
            .prop_map(|employees| RawDepartment::new(0u64, "d").with_employees(employees));
        leaf.prop_recursive(3, 12, 3, |inner| {
            (
                prop::collection::vec(arb_employee(), 0..6),
                prop::collection::vec(inner, 0..3),
            )
                .prop_map(|(employees, children)| {
                    RawDepartment::new(0u64, "d")
                        .with_employees(employees)
                        .with_children(children)
                })
        })
    }

    /// Give every node a unique id so conservation can be checked by id
    fn renumber(departments: &mut [RawDepartment], next: &mut u64) {
        fn renumber_employee(e: &mut RawEmployee, next: &mut u64) {
            *next += 1;
            e.id = NodeId::from(*next);
            e.children.iter_mut().for_each(|c| renumber_employee(c, next));
        }
        for d in departments {
            *next += 1;
            d.id = NodeId::from(*next);
            d.employees
                .iter_mut()
                .for_each(|e| renumber_employee(e, next));
            renumber(&mut d.children, next);
        }
    }

    fn assert_no_department_in_group(node: &OrgNode) {
        if let OrgNode::Group(g) = node {
            assert!(g.members.iter().all(|m| m.kind() == NodeKind::Employee));
        }
        node.children()
            .iter()
            .chain(node.employees())
            .chain(node.as_group().map(|g| g.members.as_slice()).unwrap_or(&[]))
            .for_each(assert_no_department_in_group);
    }

    fn sorted_ids(node: &OrgNode) -> Vec<NodeId> {
        let mut ids = node.employee_ids();
        ids.sort();
        ids
    }

    proptest! {
        #[test]
        fn employee_count_is_conserved(mut roots in prop::collection::vec(arb_department(), 1..3)) {
            renumber(&mut roots, &mut 0);
            let transformer = HierarchyTransformer::default();
            let out = transformer.transform(&roots).unwrap();
            prop_assert_eq!(count_employees(&out), count_raw_employees(&roots));
        }

        #[test]
        fn leaf_employees_identical_before_and_after(mut roots in prop::collection::vec(arb_department(), 1..3)) {
            renumber(&mut roots, &mut 0);
            let transformer = HierarchyTransformer::default();
            let ingested = transformer.ingest(&roots);
            let mut before: Vec<NodeId> = ingested.iter().flat_map(OrgNode::employee_ids).collect();
            before.sort();
            let out = transformer.transform(&roots).unwrap();
            prop_assert_eq!(sorted_ids(&out), before);
        }

        #[test]
        fn groups_never_hold_departments(mut roots in prop::collection::vec(arb_department(), 1..3)) {
            renumber(&mut roots, &mut 0);
            let out = HierarchyTransformer::default().transform(&roots).unwrap();
            assert_no_department_in_group(&out);
        }

        #[test]
        fn retransform_is_stable(mut roots in prop::collection::vec(arb_department(), 1..3)) {
            renumber(&mut roots, &mut 0);
            let transformer = HierarchyTransformer::default();
            let once = transformer.transform(&roots).unwrap();
            let twice = transformer.transform_node(&once);
            prop_assert_eq!(sorted_ids(&twice), sorted_ids(&once));
            prop_assert_eq!(count_employees(&twice), count_employees(&once));
        }

        #[test]
        fn singleton_categories_stay_standalone(indices in prop::collection::vec(0..TITLES.len(), 0..12)) {
            let rules = CategoryRules::default();
            let nodes: Vec<OrgNode> = indices
                .iter()
                .enumerate()
                .map(|(n, i)| test_support::employee(&n.to_string(), TITLES[*i]))
                .collect();
            let out = group_siblings(&nodes, &rules);
            for node in &out {
                if let Some(g) = node.as_group() {
                    prop_assert!(g.members.len() >= 2);
                }
                if let Some(e) = node.as_employee() {
                    let category = rules.categorize(&e.role_title);
                    let siblings = nodes
                        .iter()
                        .filter_map(OrgNode::as_employee)
                        .filter(|s| rules.categorize(&s.role_title) == category)
                        .count();
                    prop_assert_eq!(siblings, 1);
                }
            }
            prop_assert_eq!(out.iter().map(count_employees).sum::<usize>(), nodes.len());
        }
    }
}
