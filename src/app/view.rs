use eframe::egui::{Align2, Color32, FontId, Sense, Stroke, Ui, vec2};

use crate::graph::build_graph;

use super::ViewModel;
use super::render_utils::{
    circle_visible, draw_background, draw_label, edge_visible, fade, world_to_screen,
};

impl ViewModel {
    /// Atomic rebuild: abort in-flight interaction, stop the solver, replace
    /// the node/edge arrays, reseed, and re-run the active placement. A tick
    /// never observes a half-replaced graph.
    pub(in crate::app) fn rebuild_graph(&mut self, now: f64) {
        self.drag = None;
        self.hovered = None;
        self.sim.stop();
        self.layout.reset();
        self.graph = build_graph(&self.directory.records, &self.filters, &self.styles);
        self.sim.seed(&mut self.graph);
        self.layout.apply(&mut self.graph, &mut self.sim, now);
        self.graph_dirty = false;
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let now = ui.input(|input| input.time);
        if self.graph_dirty {
            self.rebuild_graph(now);
        }

        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);

        if self.graph.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No people match the current filters",
                FontId::proportional(14.0),
                Color32::from_gray(130),
            );
            return;
        }

        let animating_viewport = self.advance_viewport_animation(now);
        self.layout.poll(&mut self.graph, now);
        self.update_drag(rect, &response);
        self.handle_pan(&response);
        self.handle_zoom(ui, rect, &response);
        self.update_hover(ui, rect, &response);
        self.handle_click(rect, &response, now);

        let frame_delta = ui
            .input(|input| input.stable_dt)
            .clamp(1.0 / 240.0, 1.0 / 20.0);
        self.sim.step(&mut self.graph, frame_delta);
        if self.sim.is_running() || animating_viewport || self.drag.is_some() {
            ui.ctx().request_repaint();
        }

        let highlight = self.hovered.map(|index| self.graph.neighborhood(index));

        let edge_color = Color32::from_rgb(0xd1, 0xd5, 0xdb);
        for edge in &self.graph.edges {
            let (Some(source), Some(target)) = (
                self.graph.nodes.get(edge.source),
                self.graph.nodes.get(edge.target),
            ) else {
                continue;
            };

            let start = world_to_screen(rect, self.pan, self.zoom, source.position);
            let end = world_to_screen(rect, self.pan, self.zoom, target.position);
            if !edge_visible(rect, start, end, 2.0) {
                continue;
            }

            let opacity = match (&highlight, self.hovered) {
                (Some(_), Some(hovered)) if edge.source == hovered || edge.target == hovered => 0.8,
                (Some(_), _) => 0.1,
                _ => 0.6,
            };
            painter.line_segment([start, end], Stroke::new(1.0, fade(edge_color, opacity)));
        }

        let drag = self.drag;
        let selected_ring = Color32::from_rgb(245, 158, 11);
        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = world_to_screen(rect, self.pan, self.zoom, node.position);
            let is_hovered = self.hovered == Some(index);
            let in_highlight = highlight.as_ref().is_none_or(|set| set.contains(&index));
            let opacity = if in_highlight { 1.0 } else { 0.3 };

            let style = self.styles.style(node.kind);
            let radius = node.radius * self.zoom * if is_hovered { 1.5 } else { 1.0 };
            let label_width = self.styles.label_width(node.kind, &node.label) * self.zoom;
            if !circle_visible(rect, position, radius + label_width + 8.0) {
                continue;
            }

            painter.circle_filled(position, radius, fade(style.fill, opacity));
            painter.circle_stroke(
                position,
                radius,
                Stroke::new(
                    if is_hovered { 2.0 } else { 1.0 },
                    fade(Color32::WHITE, opacity),
                ),
            );

            if self
                .selected
                .as_ref()
                .is_some_and(|selection| selection.id == node.id)
            {
                painter.circle_stroke(position, radius + 4.0, Stroke::new(1.5, selected_ring));
            }

            let label_dragged = drag.is_some_and(|drag| drag.via_label && drag.index == index);
            let label_color = if label_dragged {
                Color32::from_gray(0x66)
            } else {
                style.text_color
            };
            let font_size = style.font_size * self.zoom * if is_hovered { 1.1 } else { 1.0 };
            draw_label(
                &painter,
                position + vec2((node.radius + 6.0) * self.zoom, 0.0),
                &node.label,
                font_size,
                fade(label_color, opacity),
                style.bold || is_hovered,
            );
        }

        if let Some(hovered) = self.hovered
            && let Some(node) = self.graph.nodes.get(hovered)
        {
            let status = format!(
                "{}  |  {}  |  connections {}",
                node.label,
                node.kind.label(),
                self.graph.connections(hovered)
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                status,
                FontId::proportional(13.0),
                Color32::from_gray(60),
            );
        }
    }
}
