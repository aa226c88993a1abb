use eframe::egui::{Vec2, vec2};

use super::quadtree::QuadNode;

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) collision_strength: f32,
    pub(super) max_collision_distance_sq: f32,
}

fn charge_between(point: Vec2, other: Vec2, charge: f32, softening: f32) -> Vec2 {
    let delta = point - other;
    let distance_sq = delta.length_sq();
    let distance = distance_sq.sqrt();
    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        vec2(1.0, 0.0)
    };
    // Negative charge pushes the point away from the source.
    direction * (-charge / (distance_sq + softening))
}

pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    charges: &[f32],
    softening: f32,
    theta: f32,
    force: &mut Vec2,
) {
    if node.charge.abs() <= f32::EPSILON {
        return;
    }

    let point = positions[index];

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index == index {
                continue;
            }
            *force += charge_between(point, positions[other_index], charges[other_index], softening);
        }
        return;
    }

    let delta = point - node.center_of_charge;
    let distance_sq = delta.length_sq().max(0.0001);
    let distance = distance_sq.sqrt();
    let can_approximate =
        !node.bounds.contains(point) && ((node.bounds.side_length() / distance) < theta);

    if can_approximate {
        let direction = delta / distance;
        *force += direction * (-node.charge / (distance_sq + softening));
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, charges, softening, theta, force);
    }
}

fn resolve_overlap(
    from: usize,
    to: usize,
    positions: &[Vec2],
    collide_radii: &[f32],
    collision_strength: f32,
    forces: &mut [Vec2],
) {
    let delta = positions[from] - positions[to];
    let distance_sq = delta.length_sq();
    let distance = distance_sq.sqrt();
    let direction = if distance > 0.0001 {
        delta / distance
    } else {
        let angle =
            ((from as f32) * 0.618_034 + (to as f32) * 0.414_214) * std::f32::consts::TAU;
        vec2(angle.cos(), angle.sin())
    };

    let min_distance = collide_radii[from] + collide_radii[to];
    if distance < min_distance {
        let overlap_push = (min_distance - distance) * collision_strength;
        forces[from] += direction * overlap_push;
        forces[to] -= direction * overlap_push;
    }
}

pub(super) fn accumulate_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    positions: &[Vec2],
    collide_radii: &[f32],
    params: CollisionParams,
    forces: &mut [Vec2],
) {
    if node_a.bounds.gap_sq_to(node_b.bounds) > params.max_collision_distance_sq {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for i in 0..node_a.indices.len() {
                for j in (i + 1)..node_a.indices.len() {
                    resolve_overlap(
                        node_a.indices[i],
                        node_a.indices[j],
                        positions,
                        collide_radii,
                        params.collision_strength,
                        forces,
                    );
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    resolve_overlap(
                        from,
                        to,
                        positions,
                        collide_radii,
                        params.collision_strength,
                        forces,
                    );
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            accumulate_collision_pairs(
                child_a,
                child_a,
                true,
                positions,
                collide_radii,
                params,
                forces,
            );

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                accumulate_collision_pairs(
                    child_a,
                    child_b,
                    false,
                    positions,
                    collide_radii,
                    params,
                    forces,
                );
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.side_length() >= node_b.bounds.side_length()
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            accumulate_collision_pairs(
                child,
                node_b,
                false,
                positions,
                collide_radii,
                params,
                forces,
            );
        }
    } else {
        for child in node_b.children.iter().flatten() {
            accumulate_collision_pairs(
                node_a,
                child,
                false,
                positions,
                collide_radii,
                params,
                forces,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_charges_repel() {
        let positions = vec![vec2(-5.0, 0.0), vec2(5.0, 0.0)];
        let charges = vec![-500.0, -500.0];
        let tree = QuadNode::build(&positions, &charges).unwrap();

        let mut force = Vec2::ZERO;
        accumulate_charge_for_node(&tree, 0, &positions, &charges, 400.0, 0.81, &mut force);
        // The left node is pushed further left.
        assert!(force.x < 0.0);
        assert!(force.y.abs() < 0.0001);
    }

    #[test]
    fn stronger_charges_push_harder() {
        let positions = vec![vec2(-5.0, 0.0), vec2(5.0, 0.0)];

        let weak = vec![-500.0, -500.0];
        let strong = vec![-500.0, -1500.0];
        let mut weak_force = Vec2::ZERO;
        let mut strong_force = Vec2::ZERO;

        let tree = QuadNode::build(&positions, &weak).unwrap();
        accumulate_charge_for_node(&tree, 0, &positions, &weak, 400.0, 0.81, &mut weak_force);
        let tree = QuadNode::build(&positions, &strong).unwrap();
        accumulate_charge_for_node(&tree, 0, &positions, &strong, 400.0, 0.81, &mut strong_force);

        assert!(strong_force.x < weak_force.x);
    }

    #[test]
    fn overlapping_nodes_are_pushed_apart() {
        let positions = vec![vec2(0.0, 0.0), vec2(10.0, 0.0)];
        let collide_radii = vec![30.0, 30.0];
        let charges = vec![-500.0, -500.0];
        let tree = QuadNode::build(&positions, &charges).unwrap();

        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &positions,
            &collide_radii,
            CollisionParams {
                collision_strength: 1.0,
                max_collision_distance_sq: 120.0 * 120.0,
            },
            &mut forces,
        );

        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
        assert_eq!(forces[0].x, -forces[1].x);
    }

    #[test]
    fn separated_nodes_see_no_collision_force() {
        let positions = vec![vec2(0.0, 0.0), vec2(100.0, 0.0)];
        let collide_radii = vec![30.0, 30.0];
        let charges = vec![-500.0, -500.0];
        let tree = QuadNode::build(&positions, &charges).unwrap();

        let mut forces = vec![Vec2::ZERO; 2];
        accumulate_collision_pairs(
            &tree,
            &tree,
            true,
            &positions,
            &collide_radii,
            CollisionParams {
                collision_strength: 1.0,
                max_collision_distance_sq: 120.0 * 120.0,
            },
            &mut forces,
        );

        assert_eq!(forces[0], Vec2::ZERO);
        assert_eq!(forces[1], Vec2::ZERO);
    }
}
