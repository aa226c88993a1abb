use eframe::egui::Color32;

use super::NodeKind;

#[derive(Clone, Copy, Debug)]
pub struct NodeStyle {
    pub base_radius: f32,
    pub fill: Color32,
    pub text_color: Color32,
    pub font_size: f32,
    pub bold: bool,
}

/// Per-kind visual encoding. Passed into the builder so derived radii can
/// be exercised with alternate constants in tests.
#[derive(Clone, Debug)]
pub struct StyleTable {
    pub company: NodeStyle,
    pub department: NodeStyle,
    pub employee: NodeStyle,
}

impl Default for StyleTable {
    fn default() -> Self {
        let text_color = Color32::from_rgb(0x1f, 0x29, 0x37);
        Self {
            company: NodeStyle {
                base_radius: 8.0,
                fill: Color32::from_rgb(0xdc, 0x26, 0x26),
                text_color,
                font_size: 14.0,
                bold: true,
            },
            department: NodeStyle {
                base_radius: 6.0,
                fill: Color32::from_rgb(0x25, 0x63, 0xeb),
                text_color,
                font_size: 12.0,
                bold: true,
            },
            employee: NodeStyle {
                base_radius: 4.0,
                fill: Color32::from_rgb(0x05, 0x96, 0x69),
                text_color,
                font_size: 10.0,
                bold: false,
            },
        }
    }
}

impl StyleTable {
    pub fn style(&self, kind: NodeKind) -> &NodeStyle {
        match kind {
            NodeKind::Company => &self.company,
            NodeKind::Department => &self.department,
            NodeKind::Employee => &self.employee,
        }
    }

    /// Radius grows with connectivity, capped at 3x the base radius.
    pub fn node_radius(&self, kind: NodeKind, connections: usize) -> f32 {
        let scale = 1.0 + (connections as f32 * 0.2).min(2.0);
        self.style(kind).base_radius * scale
    }

    pub fn label_width(&self, kind: NodeKind, label: &str) -> f32 {
        label.chars().count() as f32 * self.style(kind).font_size * 0.6
    }

    /// Minimum separation radius: leaves room for the label so the collision
    /// force keeps text legible.
    pub fn collide_radius(&self, kind: NodeKind, label: &str, connections: usize) -> f32 {
        (self.node_radius(kind, connections) + self.label_width(kind, label) + 10.0).max(30.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_radius_is_monotone_and_bounded() {
        let styles = StyleTable::default();
        for kind in [NodeKind::Company, NodeKind::Department, NodeKind::Employee] {
            let base = styles.style(kind).base_radius;
            let mut previous = 0.0_f32;
            for connections in 0..40 {
                let radius = styles.node_radius(kind, connections);
                assert!(radius >= previous, "radius shrank at {connections} connections");
                assert!(radius >= base);
                assert!(radius <= base * 3.0 + f32::EPSILON);
                previous = radius;
            }
            assert_eq!(styles.node_radius(kind, 0), base);
            assert_eq!(styles.node_radius(kind, 100), base * 3.0);
        }
    }

    #[test]
    fn collide_radius_has_a_floor_and_grows_with_labels() {
        let styles = StyleTable::default();
        assert_eq!(styles.collide_radius(NodeKind::Employee, "", 0), 30.0);

        let short = styles.collide_radius(NodeKind::Department, "IT", 2);
        let long = styles.collide_radius(NodeKind::Department, "Infrastructure Engineering", 2);
        assert!(long > short);
    }
}
