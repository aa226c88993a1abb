use eframe::egui::{Vec2, vec2};

const LEAF_CAPACITY: usize = 12;
const MAX_DEPTH: usize = 10;

/// Square axis-aligned region, stored as its corners.
#[derive(Clone, Copy)]
pub(super) struct QuadBounds {
    min: Vec2,
    max: Vec2,
}

impl QuadBounds {
    fn enclosing(points: &[Vec2]) -> Option<Self> {
        let first = *points.first()?;
        let mut low = first;
        let mut high = first;
        for point in &points[1..] {
            low = low.min(*point);
            high = high.max(*point);
        }

        if !(low.x.is_finite() && low.y.is_finite() && high.x.is_finite() && high.y.is_finite()) {
            return None;
        }

        // Square the region up so subdivision yields square quadrants.
        let center = (low + high) * 0.5;
        let half = ((high.x - low.x).max(high.y - low.y) * 0.5) + 1.0;
        Some(Self {
            min: center - vec2(half, half),
            max: center + vec2(half, half),
        })
    }

    pub(super) fn contains(self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    fn center(self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    pub(super) fn side_length(self) -> f32 {
        self.max.x - self.min.x
    }

    fn quadrant(self, point: Vec2) -> usize {
        let center = self.center();
        ((point.x >= center.x) as usize) | (((point.y >= center.y) as usize) << 1)
    }

    fn child(self, quadrant: usize) -> Self {
        let center = self.center();
        let min = vec2(
            if quadrant & 1 == 0 { self.min.x } else { center.x },
            if quadrant & 2 == 0 { self.min.y } else { center.y },
        );
        let half = self.side_length() * 0.5;
        Self {
            min,
            max: min + vec2(half, half),
        }
    }

    /// Squared distance between the closest points of two regions; zero when
    /// they touch or overlap.
    pub(super) fn gap_sq_to(self, other: Self) -> f32 {
        let dx = (other.min.x - self.max.x)
            .max(self.min.x - other.max.x)
            .max(0.0);
        let dy = (other.min.y - self.max.y)
            .max(self.min.y - other.max.y)
            .max(0.0);
        (dx * dx) + (dy * dy)
    }
}

/// Quadrant tree over node positions. Interior nodes aggregate the signed
/// charge of their subtree, centered at the charge-magnitude-weighted mean,
/// so distant clusters can repel as a single body.
pub(super) struct QuadNode {
    pub(super) bounds: QuadBounds,
    pub(super) center_of_charge: Vec2,
    pub(super) charge: f32,
    pub(super) indices: Vec<usize>,
    pub(super) children: [Option<Box<QuadNode>>; 4],
}

impl QuadNode {
    pub(super) fn build(positions: &[Vec2], charges: &[f32]) -> Option<Self> {
        let bounds = QuadBounds::enclosing(positions)?;
        let indices = (0..positions.len()).collect();
        Some(Self::build_node(bounds, indices, positions, charges, 0))
    }

    fn build_node(
        bounds: QuadBounds,
        indices: Vec<usize>,
        positions: &[Vec2],
        charges: &[f32],
        depth: usize,
    ) -> Self {
        let mut center_of_charge = Vec2::ZERO;
        let mut charge = 0.0;
        let mut weight = 0.0;
        for &index in &indices {
            let magnitude = charges[index].abs();
            center_of_charge += positions[index] * magnitude;
            charge += charges[index];
            weight += magnitude;
        }
        center_of_charge = if weight > 0.0 {
            center_of_charge / weight
        } else {
            bounds.center()
        };

        let mut node = Self {
            bounds,
            center_of_charge,
            charge,
            indices,
            children: std::array::from_fn(|_| None),
        };

        if depth >= MAX_DEPTH || node.indices.len() <= LEAF_CAPACITY {
            return node;
        }

        let mut buckets: [Vec<usize>; 4] = std::array::from_fn(|_| Vec::new());
        for &index in &node.indices {
            buckets[bounds.quadrant(positions[index])].push(index);
        }
        if buckets.iter().filter(|bucket| !bucket.is_empty()).count() <= 1 {
            return node;
        }

        for (quadrant, bucket) in buckets.into_iter().enumerate() {
            if bucket.is_empty() {
                continue;
            }
            node.children[quadrant] = Some(Box::new(Self::build_node(
                bounds.child(quadrant),
                bucket,
                positions,
                charges,
                depth + 1,
            )));
        }
        node.indices.clear();
        node
    }

    pub(super) fn is_leaf(&self) -> bool {
        self.children.iter().all(|child| child.is_none())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_aggregates_signed_charge() {
        let positions = vec![vec2(-10.0, 0.0), vec2(10.0, 0.0)];
        let charges = vec![-500.0, -1500.0];

        let tree = QuadNode::build(&positions, &charges).unwrap();
        assert_eq!(tree.charge, -2000.0);
        // Weighted toward the stronger charge.
        assert!(tree.center_of_charge.x > 0.0);
    }

    #[test]
    fn build_rejects_non_finite_positions() {
        let positions = vec![vec2(f32::NAN, 0.0)];
        assert!(QuadNode::build(&positions, &[-500.0]).is_none());
        assert!(QuadNode::build(&[], &[]).is_none());
    }

    #[test]
    fn deep_trees_split_into_quadrants() {
        let mut positions = Vec::new();
        let mut charges = Vec::new();
        for i in 0..40 {
            let angle = i as f32 * 0.7;
            positions.push(vec2(
                angle.cos() * (i as f32 + 1.0) * 8.0,
                angle.sin() * (i as f32 + 1.0) * 8.0,
            ));
            charges.push(-500.0);
        }

        let tree = QuadNode::build(&positions, &charges).unwrap();
        assert!(!tree.is_leaf());
        assert!(tree.indices.is_empty());

        let mut seen = 0;
        let mut stack = vec![&tree];
        while let Some(node) = stack.pop() {
            seen += node.indices.len();
            for child in node.children.iter().flatten() {
                assert!(node.bounds.side_length() > child.bounds.side_length());
                stack.push(child);
            }
        }
        assert_eq!(seen, positions.len());
    }

    #[test]
    fn bounds_gap_is_zero_for_overlapping_regions() {
        let near = QuadBounds::enclosing(&[vec2(0.0, 0.0), vec2(10.0, 10.0)]).unwrap();
        let far = QuadBounds::enclosing(&[vec2(100.0, 0.0), vec2(110.0, 10.0)]).unwrap();

        assert_eq!(near.gap_sq_to(near), 0.0);
        assert!(near.gap_sq_to(far) > 0.0);
        assert_eq!(near.gap_sq_to(far), far.gap_sq_to(near));
    }
}
