use std::collections::{HashMap, HashSet};

use eframe::egui::{Vec2, vec2};

use crate::directory::PersonRecord;

mod build;
mod layout;
mod sim;
mod style;

pub use build::{FilterState, build_graph};
pub use layout::{LayoutController, LayoutMode};
pub use sim::{ForceSimulation, SimulationConfig};
pub use style::{NodeStyle, StyleTable};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Company,
    Department,
    Employee,
}

impl NodeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Department => "Department",
            Self::Employee => "Employee",
        }
    }
}

/// Whether a node is currently held in place, overriding the solver.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Pin {
    Free,
    Pinned(Vec2),
}

impl Pin {
    pub fn is_pinned(self) -> bool {
        matches!(self, Self::Pinned(_))
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub id: String,
    pub label: String,
    pub kind: NodeKind,
    pub record: Option<PersonRecord>,
    pub position: Vec2,
    pub velocity: Vec2,
    pub pin: Pin,
    pub radius: f32,
    pub collide_radius: f32,
}

/// Edge endpoints are resolved to node indices once, at build time.
#[derive(Clone, Debug)]
pub struct Edge {
    pub id: String,
    pub source: usize,
    pub target: usize,
}

#[derive(Clone, Debug, Default)]
pub struct OrgGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub index_by_id: HashMap<String, usize>,
    pub connection_counts: Vec<usize>,
}

impl OrgGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn connections(&self, index: usize) -> usize {
        self.connection_counts.get(index).copied().unwrap_or(0)
    }

    /// The node plus every node one edge away.
    pub fn neighborhood(&self, index: usize) -> HashSet<usize> {
        let mut related = HashSet::from([index]);
        for edge in &self.edges {
            if edge.source == index {
                related.insert(edge.target);
            } else if edge.target == index {
                related.insert(edge.source);
            }
        }
        related
    }

    pub fn bounding_box(&self, indices: &HashSet<usize>) -> Option<(Vec2, Vec2)> {
        let mut bounds: Option<(Vec2, Vec2)> = None;
        for &index in indices {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };

            bounds = Some(match bounds {
                None => (node.position, node.position),
                Some((min, max)) => (
                    vec2(min.x.min(node.position.x), min.y.min(node.position.y)),
                    vec2(max.x.max(node.position.x), max.y.max(node.position.y)),
                ),
            });
        }
        bounds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::PersonRecord;

    fn person(id: &str, name: &str, department: Option<&str>, company: Option<&str>) -> PersonRecord {
        PersonRecord {
            id: id.to_owned(),
            name: name.to_owned(),
            email: None,
            department: department.map(str::to_owned),
            company: company.map(str::to_owned),
        }
    }

    #[test]
    fn neighborhood_of_department_covers_its_employees_and_company() {
        let records = vec![
            person("1", "Ada", Some("Platform"), Some("Acme")),
            person("2", "Grace", Some("Platform"), Some("Acme")),
            person("3", "Alan", Some("Platform"), Some("Acme")),
            person("4", "Edsger", Some("Design"), Some("Acme")),
            person("5", "Barbara", Some("Design"), Some("Acme")),
        ];
        let graph = build_graph(&records, &FilterState::default(), &StyleTable::default());

        let department = graph.index_by_id["dept-Platform"];
        let neighborhood = graph.neighborhood(department);

        assert_eq!(neighborhood.len(), 5);
        assert!(neighborhood.contains(&department));
        assert!(neighborhood.contains(&graph.index_by_id["company-Acme"]));
        for employee in ["emp-1", "emp-2", "emp-3"] {
            assert!(neighborhood.contains(&graph.index_by_id[employee]));
        }
        assert!(!neighborhood.contains(&graph.index_by_id["dept-Design"]));
        assert!(!neighborhood.contains(&graph.index_by_id["emp-4"]));
    }

    #[test]
    fn bounding_box_spans_the_requested_nodes() {
        let records = vec![
            person("1", "Ada", Some("Platform"), None),
            person("2", "Grace", Some("Platform"), None),
        ];
        let mut graph = build_graph(&records, &FilterState::default(), &StyleTable::default());
        graph.nodes[0].position = vec2(-40.0, 10.0);
        graph.nodes[1].position = vec2(25.0, -15.0);
        graph.nodes[2].position = vec2(5.0, 60.0);

        let all = (0..graph.node_count()).collect();
        let (min, max) = graph.bounding_box(&all).unwrap();
        assert_eq!(min, vec2(-40.0, -15.0));
        assert_eq!(max, vec2(25.0, 60.0));

        assert!(graph.bounding_box(&HashSet::new()).is_none());
    }
}
