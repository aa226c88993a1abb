use std::collections::{HashMap, HashSet};

use eframe::egui::Vec2;

use crate::directory::PersonRecord;

use super::{Edge, Node, NodeKind, OrgGraph, Pin, StyleTable};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterState {
    pub search: String,
    pub departments: HashSet<String>,
    pub companies: HashSet<String>,
}

impl FilterState {
    pub fn matches(&self, record: &PersonRecord) -> bool {
        self.matches_search(record) && self.matches_department(record) && self.matches_company(record)
    }

    fn matches_search(&self, record: &PersonRecord) -> bool {
        let search = self.search.trim();
        if search.is_empty() {
            return true;
        }

        let needle = search.to_lowercase();
        [
            Some(record.name.as_str()),
            record.email.as_deref(),
            record.department.as_deref(),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
    }

    fn matches_department(&self, record: &PersonRecord) -> bool {
        self.departments.is_empty()
            || record
                .department
                .as_deref()
                .is_some_and(|department| self.departments.contains(department))
    }

    fn matches_company(&self, record: &PersonRecord) -> bool {
        self.companies.is_empty()
            || record
                .company
                .as_deref()
                .is_some_and(|company| self.companies.contains(company))
    }
}

fn company_node_id(label: &str) -> String {
    format!("company-{label}")
}

fn department_node_id(label: &str) -> String {
    format!("dept-{label}")
}

fn employee_node_id(record_id: &str) -> String {
    format!("emp-{record_id}")
}

fn blank_node(id: String, label: String, kind: NodeKind, record: Option<PersonRecord>) -> Node {
    Node {
        id,
        label,
        kind,
        record,
        position: Vec2::ZERO,
        velocity: Vec2::ZERO,
        pin: Pin::Free,
        radius: 0.0,
        collide_radius: 0.0,
    }
}

/// Full rebuild: records plus filters in, complete node/edge arrays out.
/// Company and department nodes are deduplicated by label; an empty result
/// is a valid graph, not an error.
pub fn build_graph(records: &[PersonRecord], filters: &FilterState, styles: &StyleTable) -> OrgGraph {
    let passing = records
        .iter()
        .filter(|record| filters.matches(record))
        .collect::<Vec<_>>();

    let mut departments = Vec::new();
    let mut companies = Vec::new();
    let mut seen_departments = HashSet::new();
    let mut seen_companies = HashSet::new();
    for record in &passing {
        if let Some(department) = record.department.as_deref()
            && seen_departments.insert(department)
        {
            departments.push(department);
        }
        if let Some(company) = record.company.as_deref()
            && seen_companies.insert(company)
        {
            companies.push(company);
        }
    }

    let mut nodes = Vec::with_capacity(companies.len() + departments.len() + passing.len());
    let mut index_by_id = HashMap::new();

    for company in &companies {
        let id = company_node_id(company);
        index_by_id.insert(id.clone(), nodes.len());
        nodes.push(blank_node(id, (*company).to_owned(), NodeKind::Company, None));
    }
    for department in &departments {
        let id = department_node_id(department);
        index_by_id.insert(id.clone(), nodes.len());
        nodes.push(blank_node(
            id,
            (*department).to_owned(),
            NodeKind::Department,
            None,
        ));
    }
    for record in &passing {
        let id = employee_node_id(&record.id);
        index_by_id.insert(id.clone(), nodes.len());
        nodes.push(blank_node(
            id,
            record.name.clone(),
            NodeKind::Employee,
            Some((*record).clone()),
        ));
    }

    let mut edges = Vec::new();
    let mut linked_pairs = HashSet::new();
    for record in &passing {
        let Some(department) = record.department.as_deref() else {
            continue;
        };
        let Some(&employee_index) = index_by_id.get(&employee_node_id(&record.id)) else {
            continue;
        };
        let Some(&department_index) = index_by_id.get(&department_node_id(department)) else {
            continue;
        };

        edges.push(Edge {
            id: format!("link-emp-dept-{}", record.id),
            source: employee_index,
            target: department_index,
        });

        if let Some(company) = record.company.as_deref()
            && let Some(&company_index) = index_by_id.get(&company_node_id(company))
            && linked_pairs.insert((department_index, company_index))
        {
            edges.push(Edge {
                id: format!("link-dept-comp-{department}-{company}"),
                source: department_index,
                target: company_index,
            });
        }
    }

    let mut connection_counts = vec![0usize; nodes.len()];
    for edge in &edges {
        connection_counts[edge.source] += 1;
        connection_counts[edge.target] += 1;
    }

    for (index, node) in nodes.iter_mut().enumerate() {
        let connections = connection_counts[index];
        node.radius = styles.node_radius(node.kind, connections);
        node.collide_radius = styles.collide_radius(node.kind, &node.label, connections);
    }

    OrgGraph {
        nodes,
        edges,
        index_by_id,
        connection_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, name: &str, department: Option<&str>, company: Option<&str>) -> PersonRecord {
        PersonRecord {
            id: id.to_owned(),
            name: name.to_owned(),
            email: Some(format!("{}@acme.test", name.to_lowercase())),
            department: department.map(str::to_owned),
            company: company.map(str::to_owned),
        }
    }

    fn department_filter(departments: &[&str]) -> FilterState {
        FilterState {
            departments: departments.iter().map(|d| (*d).to_owned()).collect(),
            ..FilterState::default()
        }
    }

    #[test]
    fn three_employees_two_departments_one_company() {
        let records = vec![
            person("1", "Ada", Some("Platform"), Some("Acme")),
            person("2", "Grace", Some("Platform"), Some("Acme")),
            person("3", "Alan", Some("Design"), Some("Acme")),
        ];
        let graph = build_graph(&records, &FilterState::default(), &StyleTable::default());

        assert_eq!(graph.node_count(), 6);
        assert_eq!(graph.edge_count(), 5);

        let kinds = |kind: NodeKind| graph.nodes.iter().filter(|n| n.kind == kind).count();
        assert_eq!(kinds(NodeKind::Employee), 3);
        assert_eq!(kinds(NodeKind::Department), 2);
        assert_eq!(kinds(NodeKind::Company), 1);
    }

    #[test]
    fn employee_without_department_or_company_is_isolated() {
        let records = vec![person("1", "Ada", None, None)];
        let graph = build_graph(&records, &FilterState::default(), &StyleTable::default());

        assert_eq!(graph.node_count(), 1);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.nodes[0].kind, NodeKind::Employee);
        assert_eq!(graph.connections(0), 0);
    }

    #[test]
    fn node_ids_are_unique_and_edges_reference_existing_nodes() {
        let records = vec![
            person("1", "Ada", Some("Platform"), Some("Acme")),
            person("2", "Grace", Some("Platform"), Some("Initech")),
            person("3", "Alan", None, Some("Acme")),
            person("4", "Edsger", Some("Design"), None),
        ];
        let graph = build_graph(&records, &FilterState::default(), &StyleTable::default());

        let mut ids = HashSet::new();
        for node in &graph.nodes {
            assert!(ids.insert(node.id.clone()), "duplicate node id {}", node.id);
        }
        assert_eq!(graph.index_by_id.len(), graph.node_count());
        for edge in &graph.edges {
            assert!(edge.source < graph.node_count());
            assert!(edge.target < graph.node_count());
        }
        assert_eq!(graph.connection_counts.len(), graph.node_count());
    }

    #[test]
    fn node_counts_match_distinct_labels_even_without_departments() {
        // A record with a company but no department still yields a company
        // node, just no edge into it.
        let records = vec![
            person("1", "Ada", None, Some("Acme")),
            person("2", "Grace", Some("Design"), Some("Initech")),
            person("3", "Alan", Some("Design"), Some("Initech")),
        ];
        let graph = build_graph(&records, &FilterState::default(), &StyleTable::default());

        let companies = graph
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Company)
            .count();
        let departments = graph
            .nodes
            .iter()
            .filter(|n| n.kind == NodeKind::Department)
            .count();
        assert_eq!(companies, 2);
        assert_eq!(departments, 1);

        let acme = graph.index_by_id["company-Acme"];
        assert_eq!(graph.connections(acme), 0);
    }

    #[test]
    fn department_to_company_edges_are_deduplicated_per_pair() {
        let records = vec![
            person("1", "Ada", Some("Platform"), Some("Acme")),
            person("2", "Grace", Some("Platform"), Some("Acme")),
            person("3", "Alan", Some("Platform"), Some("Acme")),
        ];
        let graph = build_graph(&records, &FilterState::default(), &StyleTable::default());

        let department_company_edges = graph
            .edges
            .iter()
            .filter(|edge| graph.nodes[edge.source].kind == NodeKind::Department)
            .count();
        assert_eq!(department_company_edges, 1);
    }

    #[test]
    fn department_filter_restricts_employee_links_to_the_set() {
        let records = vec![
            person("1", "Ada", Some("Platform"), Some("Acme")),
            person("2", "Grace", Some("Design"), Some("Acme")),
            person("3", "Alan", Some("Platform"), Some("Acme")),
        ];
        let graph = build_graph(&records, &department_filter(&["Platform"]), &StyleTable::default());

        for edge in &graph.edges {
            let source = &graph.nodes[edge.source];
            let target = &graph.nodes[edge.target];
            if source.kind == NodeKind::Employee {
                assert_eq!(target.label, "Platform");
            }
        }
        assert!(!graph.index_by_id.contains_key("dept-Design"));
        assert!(!graph.index_by_id.contains_key("emp-2"));
    }

    #[test]
    fn search_matches_name_email_and_department_case_insensitively() {
        let records = vec![
            person("1", "Ada", Some("Platform"), None),
            person("2", "Grace", Some("Design"), None),
        ];

        let by_name = FilterState {
            search: "ADA".to_owned(),
            ..FilterState::default()
        };
        let graph = build_graph(&records, &by_name, &StyleTable::default());
        assert!(graph.index_by_id.contains_key("emp-1"));
        assert!(!graph.index_by_id.contains_key("emp-2"));

        let by_email = FilterState {
            search: "grace@".to_owned(),
            ..FilterState::default()
        };
        let graph = build_graph(&records, &by_email, &StyleTable::default());
        assert!(graph.index_by_id.contains_key("emp-2"));

        let by_department = FilterState {
            search: "platf".to_owned(),
            ..FilterState::default()
        };
        let graph = build_graph(&records, &by_department, &StyleTable::default());
        assert!(graph.index_by_id.contains_key("emp-1"));
        assert!(!graph.index_by_id.contains_key("emp-2"));
    }

    #[test]
    fn empty_filter_result_is_a_valid_empty_graph() {
        let records = vec![person("1", "Ada", Some("Platform"), None)];
        let filters = FilterState {
            search: "no such person".to_owned(),
            ..FilterState::default()
        };
        let graph = build_graph(&records, &filters, &StyleTable::default());

        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn radii_reflect_connection_counts() {
        let records = vec![
            person("1", "Ada", Some("Platform"), Some("Acme")),
            person("2", "Grace", Some("Platform"), Some("Acme")),
        ];
        let styles = StyleTable::default();
        let graph = build_graph(&records, &FilterState::default(), &styles);

        let department = graph.index_by_id["dept-Platform"];
        assert_eq!(graph.connections(department), 3);
        assert_eq!(
            graph.nodes[department].radius,
            styles.node_radius(NodeKind::Department, 3)
        );
        assert!(graph.nodes[department].collide_radius >= 30.0);
    }
}
