mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};

use crate::util::stable_pair;

use super::{NodeKind, OrgGraph, Pin};
use forces::{CollisionParams, accumulate_charge_for_node, accumulate_collision_pairs};
use quadtree::QuadNode;

const BARNES_HUT_THETA: f32 = 0.81;

/// Every force constant the solver uses, so tests can drive the engine with
/// alternate values.
#[derive(Clone, Copy, Debug)]
pub struct SimulationConfig {
    pub link_distance_company_department: f32,
    pub link_distance_department_employee: f32,
    pub link_distance_default: f32,
    pub link_strength: f32,
    pub charge_company: f32,
    pub charge_department: f32,
    pub charge_employee: f32,
    pub charge_softening: f32,
    pub center_strength: f32,
    pub collision_strength: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    pub max_force: f32,
    pub max_speed: f32,
    pub seed_jitter_radius: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            link_distance_company_department: 150.0,
            link_distance_department_employee: 100.0,
            link_distance_default: 120.0,
            link_strength: 0.08,
            charge_company: -1500.0,
            charge_department: -1000.0,
            charge_employee: -500.0,
            charge_softening: 400.0,
            center_strength: 0.03,
            collision_strength: 0.7,
            alpha_min: 0.001,
            alpha_decay: 0.0228,
            velocity_decay: 0.6,
            max_force: 180.0,
            max_speed: 40.0,
            seed_jitter_radius: 28.0,
        }
    }
}

impl SimulationConfig {
    pub fn charge(&self, kind: NodeKind) -> f32 {
        match kind {
            NodeKind::Company => self.charge_company,
            NodeKind::Department => self.charge_department,
            NodeKind::Employee => self.charge_employee,
        }
    }

    pub fn link_distance(&self, a: NodeKind, b: NodeKind) -> f32 {
        use NodeKind::{Company, Department, Employee};
        match (a, b) {
            (Company, Department) | (Department, Company) => self.link_distance_company_department,
            (Department, Employee) | (Employee, Department) => self.link_distance_department_employee,
            _ => self.link_distance_default,
        }
    }
}

#[derive(Default)]
struct SimScratch {
    forces: Vec<Vec2>,
    positions: Vec<Vec2>,
    charges: Vec<f32>,
    collide_radii: Vec<f32>,
}

/// Iterative force solver. Driven by the owning view's frame callback; it
/// never ticks itself. One instance lives per graph view, is restarted on
/// structural change and stopped on teardown, and a stopped engine ignores
/// further `step` calls entirely.
pub struct ForceSimulation {
    config: SimulationConfig,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    scratch: SimScratch,
}

impl ForceSimulation {
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            alpha: 1.0,
            alpha_target: 0.0,
            running: false,
            scratch: SimScratch::default(),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn restart(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
        self.running = true;
    }

    pub fn set_alpha_target(&mut self, target: f32) {
        self.alpha_target = target.clamp(0.0, 1.0);
        if self.alpha_target >= self.config.alpha_min {
            self.running = true;
        }
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.alpha_target = 0.0;
    }

    /// Deterministic jitter around the origin so a fresh node set never
    /// starts perfectly stacked.
    pub fn seed(&self, graph: &mut OrgGraph) {
        for (index, node) in graph.nodes.iter_mut().enumerate() {
            let (jx, jy) = stable_pair(&node.id);
            let mut direction = vec2(jx, jy);
            if direction.length_sq() <= 0.0001 {
                let angle = ((index as f32) * 0.618_034 + 0.11) * std::f32::consts::TAU;
                direction = vec2(angle.cos(), angle.sin());
            }
            node.position = direction * self.config.seed_jitter_radius;
            node.velocity = Vec2::ZERO;
            node.pin = Pin::Free;
        }
    }

    /// Advance one tick: accumulate link, charge, centering, and collision
    /// forces, integrate scaled by the current alpha, then decay alpha
    /// toward its target. Returns whether any node moved.
    pub fn step(&mut self, graph: &mut OrgGraph, dt: f32) -> bool {
        if !self.running {
            return false;
        }

        let node_count = graph.nodes.len();
        if node_count == 0 {
            self.running = false;
            return false;
        }

        let time_step_scale = (dt * 60.0).clamp(0.25, 3.0);
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay * time_step_scale;
        if self.alpha < self.config.alpha_min && self.alpha_target < self.config.alpha_min {
            self.running = false;
            return false;
        }

        let scratch = &mut self.scratch;
        scratch.forces.resize(node_count, Vec2::ZERO);
        scratch.forces.fill(Vec2::ZERO);
        scratch.positions.clear();
        scratch.charges.clear();
        scratch.collide_radii.clear();
        let mut max_collide_radius = 0.0_f32;
        for node in &graph.nodes {
            scratch.positions.push(node.position);
            scratch.charges.push(self.config.charge(node.kind));
            scratch.collide_radii.push(node.collide_radius);
            max_collide_radius = max_collide_radius.max(node.collide_radius);
        }

        let forces = &mut scratch.forces;
        let positions = &scratch.positions;
        let charges = &scratch.charges;
        let collide_radii = &scratch.collide_radii;

        if node_count > 1
            && let Some(quadtree) = QuadNode::build(positions, charges)
        {
            for (index, force) in forces.iter_mut().enumerate() {
                accumulate_charge_for_node(
                    &quadtree,
                    index,
                    positions,
                    charges,
                    self.config.charge_softening,
                    BARNES_HUT_THETA,
                    force,
                );
            }

            let max_collision_distance = max_collide_radius * 2.0;
            if max_collision_distance > 0.0 {
                accumulate_collision_pairs(
                    &quadtree,
                    &quadtree,
                    true,
                    positions,
                    collide_radii,
                    CollisionParams {
                        collision_strength: self.config.collision_strength,
                        max_collision_distance_sq: max_collision_distance * max_collision_distance,
                    },
                    forces,
                );
            }
        }

        for edge in &graph.edges {
            let (from, to) = (edge.source, edge.target);
            if from >= node_count || to >= node_count || from == to {
                continue;
            }

            let delta = graph.nodes[from].position - graph.nodes[to].position;
            let distance_sq = delta.length_sq();
            if distance_sq <= 0.0001 * 0.0001 {
                continue;
            }
            let distance = distance_sq.sqrt();
            let direction = delta / distance;

            let rest = self
                .config
                .link_distance(graph.nodes[from].kind, graph.nodes[to].kind);
            let correction = direction * ((distance - rest) * self.config.link_strength);
            forces[from] -= correction;
            forces[to] += correction;
        }

        for (index, force) in forces.iter_mut().enumerate() {
            *force -= graph.nodes[index].position * self.config.center_strength;
        }

        let max_force_sq = self.config.max_force * self.config.max_force;
        let max_speed_sq = self.config.max_speed * self.config.max_speed;
        let damping_factor = self.config.velocity_decay.powf(time_step_scale);
        let mut any_motion = false;

        for (index, node) in graph.nodes.iter_mut().enumerate() {
            if let Pin::Pinned(target) = node.pin {
                if node.position != target {
                    any_motion = true;
                }
                node.position = target;
                node.velocity = Vec2::ZERO;
                continue;
            }

            let mut force = forces[index];
            let force_sq = force.length_sq();
            if force_sq > max_force_sq {
                force *= self.config.max_force / force_sq.sqrt();
            }

            let mut velocity =
                (node.velocity + force * (self.alpha * time_step_scale)) * damping_factor;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= self.config.max_speed / speed_sq.sqrt();
            }

            node.velocity = velocity;
            node.position += velocity * time_step_scale;
            if velocity.length_sq() > 0.000_001 {
                any_motion = true;
            }
        }

        any_motion
    }
}
