use std::f32::consts::TAU;

use eframe::egui::{Vec2, vec2};

use super::{ForceSimulation, Node, NodeKind, OrgGraph, Pin};

pub const PIN_RELEASE_DELAY_SECS: f64 = 2.0;
const PLACEMENT_ALPHA: f32 = 0.3;

const RING_RADIUS_COMPANY: f32 = 200.0;
const RING_RADIUS_DEPARTMENT: f32 = 120.0;
const RING_RADIUS_EMPLOYEE: f32 = 60.0;

const BAND_Y_COMPANY: f32 = -200.0;
const BAND_Y_DEPARTMENT: f32 = 0.0;
const BAND_Y_EMPLOYEE: f32 = 200.0;
const BAND_SPAN: f32 = 600.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    #[default]
    Force,
    Circular,
    Hierarchical,
}

impl LayoutMode {
    pub const ALL: [Self; 3] = [Self::Force, Self::Circular, Self::Hierarchical];

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "force" => Some(Self::Force),
            "circular" | "circle" => Some(Self::Circular),
            "hierarchical" => Some(Self::Hierarchical),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Force => "Force",
            Self::Circular => "Circular",
            Self::Hierarchical => "Hierarchical",
        }
    }
}

struct PendingRelease {
    deadline: f64,
    pinned: Vec<usize>,
}

/// Placement policy plus the delayed pin release it schedules. The release
/// is owner-polled against a caller-supplied clock rather than a
/// fire-and-forget timer, so a rebuild or another switch can always cancel
/// it before it touches a stale node set.
pub struct LayoutController {
    mode: LayoutMode,
    pending_release: Option<PendingRelease>,
}

impl LayoutController {
    pub fn new(mode: LayoutMode) -> Self {
        Self {
            mode,
            pending_release: None,
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn has_pending_release(&self) -> bool {
        self.pending_release.is_some()
    }

    /// Change the placement policy. Pins scheduled by the preempted policy
    /// are released immediately so no node stays held past the switch.
    pub fn switch(
        &mut self,
        mode: LayoutMode,
        graph: &mut OrgGraph,
        sim: &mut ForceSimulation,
        now: f64,
    ) {
        self.cancel_pending(graph);
        self.mode = mode;
        self.apply(graph, sim, now);
    }

    /// Run the current policy against a (re)built node set.
    pub fn apply(&mut self, graph: &mut OrgGraph, sim: &mut ForceSimulation, now: f64) {
        match self.mode {
            LayoutMode::Force => sim.restart(1.0),
            LayoutMode::Circular => {
                let pinned = place_on_rings(graph);
                self.schedule_release(pinned, now);
                sim.restart(PLACEMENT_ALPHA);
            }
            LayoutMode::Hierarchical => {
                let pinned = place_in_bands(graph);
                self.schedule_release(pinned, now);
                sim.restart(PLACEMENT_ALPHA);
            }
        }
    }

    pub fn cancel_pending(&mut self, graph: &mut OrgGraph) {
        if let Some(pending) = self.pending_release.take() {
            release_pins(graph, &pending.pinned);
        }
    }

    /// Forget a pending release without touching node state; only valid
    /// when the node set it refers to is being discarded wholesale.
    pub fn reset(&mut self) {
        self.pending_release = None;
    }

    /// Release the scheduled pins once their deadline passes. Returns
    /// whether a release fired.
    pub fn poll(&mut self, graph: &mut OrgGraph, now: f64) -> bool {
        match &self.pending_release {
            Some(pending) if now >= pending.deadline => {}
            _ => return false,
        }

        if let Some(pending) = self.pending_release.take() {
            release_pins(graph, &pending.pinned);
            return true;
        }
        false
    }

    fn schedule_release(&mut self, pinned: Vec<usize>, now: f64) {
        self.pending_release = Some(PendingRelease {
            deadline: now + PIN_RELEASE_DELAY_SECS,
            pinned,
        });
    }
}

fn pin_node(node: &mut Node, target: Vec2) {
    node.pin = Pin::Pinned(target);
    node.position = target;
    node.velocity = Vec2::ZERO;
}

fn release_pins(graph: &mut OrgGraph, indices: &[usize]) {
    for &index in indices {
        if let Some(node) = graph.nodes.get_mut(index) {
            node.pin = Pin::Free;
        }
    }
}

fn members_of_kind(graph: &OrgGraph, kind: NodeKind) -> Vec<usize> {
    graph
        .nodes
        .iter()
        .enumerate()
        .filter(|(_, node)| node.kind == kind)
        .map(|(index, _)| index)
        .collect()
}

fn ring_radius(kind: NodeKind) -> f32 {
    match kind {
        NodeKind::Company => RING_RADIUS_COMPANY,
        NodeKind::Department => RING_RADIUS_DEPARTMENT,
        NodeKind::Employee => RING_RADIUS_EMPLOYEE,
    }
}

fn band_y(kind: NodeKind) -> f32 {
    match kind {
        NodeKind::Company => BAND_Y_COMPANY,
        NodeKind::Department => BAND_Y_DEPARTMENT,
        NodeKind::Employee => BAND_Y_EMPLOYEE,
    }
}

/// Concentric rings about the origin, companies outermost.
fn place_on_rings(graph: &mut OrgGraph) -> Vec<usize> {
    let mut pinned = Vec::with_capacity(graph.node_count());
    for kind in [NodeKind::Company, NodeKind::Department, NodeKind::Employee] {
        let members = members_of_kind(graph, kind);
        let count = members.len() as f32;
        let radius = ring_radius(kind);
        for (slot, index) in members.into_iter().enumerate() {
            let angle = (slot as f32 / count) * TAU;
            pin_node(
                &mut graph.nodes[index],
                vec2(angle.cos(), angle.sin()) * radius,
            );
            pinned.push(index);
        }
    }
    pinned
}

/// Horizontal bands: companies on top, employees at the bottom, each kind
/// spread evenly across a fixed span.
fn place_in_bands(graph: &mut OrgGraph) -> Vec<usize> {
    let mut pinned = Vec::with_capacity(graph.node_count());
    for kind in [NodeKind::Company, NodeKind::Department, NodeKind::Employee] {
        let members = members_of_kind(graph, kind);
        let count = members.len();
        let y = band_y(kind);
        for (slot, index) in members.into_iter().enumerate() {
            let x = if count <= 1 {
                0.0
            } else {
                -BAND_SPAN * 0.5 + (slot as f32) * BAND_SPAN / ((count - 1) as f32)
            };
            pin_node(&mut graph.nodes[index], vec2(x, y));
            pinned.push(index);
        }
    }
    pinned
}
