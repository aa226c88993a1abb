use eframe::egui::{self, Pos2, Rect, Response, Ui, Vec2, pos2, vec2};

use crate::graph::Pin;

use super::render_utils::{
    FIT_MAX_ZOOM, FIT_PADDING, MAX_ZOOM, MIN_ZOOM, ease_smoothstep, fit_viewport, screen_to_world,
    world_to_screen,
};
use super::{DragState, Selection, ViewModel, ViewportAnimation};

const DRAG_ALPHA_TARGET: f32 = 0.3;

impl ViewModel {
    pub(in crate::app) fn handle_zoom(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
        self.viewport_animation = None;
    }

    pub(in crate::app) fn handle_pan(&mut self, response: &Response) {
        let background_drag =
            response.dragged_by(egui::PointerButton::Primary) && self.drag.is_none();
        if background_drag
            || response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            let delta = response.drag_delta();
            if delta != Vec2::ZERO {
                self.pan += delta;
                self.viewport_animation = None;
            }
        }
    }

    /// Node and label drags share the node's identity: either grab pins the
    /// node at the pointer and injects energy so neighbors visibly react.
    pub(in crate::app) fn update_drag(&mut self, rect: Rect, response: &Response) {
        if response.drag_started_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            self.drag = self.hit_test(rect, pointer);
            if let Some(drag) = self.drag
                && let Some(node) = self.graph.nodes.get_mut(drag.index)
            {
                node.pin = Pin::Pinned(node.position);
                self.sim.set_alpha_target(DRAG_ALPHA_TARGET);
            }
        }

        let Some(drag) = self.drag else {
            return;
        };

        if response.dragged_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
            && let Some(node) = self.graph.nodes.get_mut(drag.index)
        {
            node.pin = Pin::Pinned(screen_to_world(rect, self.pan, self.zoom, pointer));
        }

        if response.drag_stopped_by(egui::PointerButton::Primary) {
            if let Some(node) = self.graph.nodes.get_mut(drag.index) {
                node.pin = Pin::Free;
            }
            self.sim.set_alpha_target(0.0);
            self.drag = None;
        }
    }

    pub(in crate::app) fn update_hover(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if let Some(drag) = self.drag {
            self.hovered = Some(drag.index);
            return;
        }

        if !response.hovered() {
            self.hovered = None;
            return;
        }

        let pointer = ui.input(|input| input.pointer.hover_pos());
        self.hovered = pointer
            .and_then(|pointer| self.hit_test(rect, pointer))
            .map(|hit| hit.index);

        if self.hovered.is_some() {
            ui.output_mut(|output| {
                output.cursor_icon = egui::CursorIcon::PointingHand;
            });
        }
    }

    pub(in crate::app) fn handle_click(&mut self, rect: Rect, response: &Response, now: f64) {
        if response.double_clicked()
            && let Some(pointer) = response.interact_pointer_pos()
            && let Some(hit) = self.hit_test(rect, pointer)
        {
            self.zoom_to_neighborhood(rect, hit.index, now);
            return;
        }

        // Selection only; layout and simulation state stay untouched.
        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
            && let Some(hit) = self.hit_test(rect, pointer)
            && let Some(node) = self.graph.nodes.get(hit.index)
        {
            self.selected = Some(Selection::from_node(node));
        }
    }

    /// Nearest node circle under the pointer, falling back to label boxes so
    /// text grabs the same node it annotates.
    fn hit_test(&self, rect: Rect, pointer: Pos2) -> Option<DragState> {
        let mut best: Option<(usize, f32)> = None;
        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = world_to_screen(rect, self.pan, self.zoom, node.position);
            let radius = (node.radius * self.zoom).max(5.0);
            let distance = position.distance(pointer);
            if distance <= radius && best.is_none_or(|(_, nearest)| distance < nearest) {
                best = Some((index, distance));
            }
        }
        if let Some((index, _)) = best {
            return Some(DragState {
                index,
                via_label: false,
            });
        }

        for (index, node) in self.graph.nodes.iter().enumerate() {
            let position = world_to_screen(rect, self.pan, self.zoom, node.position);
            let style = self.styles.style(node.kind);
            let offset = (node.radius + 6.0) * self.zoom;
            let width = self.styles.label_width(node.kind, &node.label) * self.zoom;
            let height = (style.font_size * self.zoom).max(8.0);
            let label_rect = Rect::from_min_size(
                pos2(position.x + offset, position.y - height * 0.5),
                vec2(width, height),
            );
            if label_rect.contains(pointer) {
                return Some(DragState {
                    index,
                    via_label: true,
                });
            }
        }
        None
    }

    fn zoom_to_neighborhood(&mut self, rect: Rect, index: usize, now: f64) {
        let neighborhood = self.graph.neighborhood(index);
        let Some((min, max)) = self.graph.bounding_box(&neighborhood) else {
            return;
        };

        let (to_pan, to_zoom) = fit_viewport(min, max, rect.size(), FIT_PADDING, FIT_MAX_ZOOM);
        self.viewport_animation = Some(ViewportAnimation {
            from_pan: self.pan,
            from_zoom: self.zoom,
            to_pan,
            to_zoom,
            start_time: now,
            duration: 1.0,
        });
    }

    pub(in crate::app) fn advance_viewport_animation(&mut self, now: f64) -> bool {
        let Some(animation) = &self.viewport_animation else {
            return false;
        };

        let t = ((now - animation.start_time) / animation.duration as f64).clamp(0.0, 1.0) as f32;
        let eased = ease_smoothstep(t);
        self.pan = animation.from_pan + (animation.to_pan - animation.from_pan) * eased;
        self.zoom = animation.from_zoom + (animation.to_zoom - animation.from_zoom) * eased;

        if t >= 1.0 {
            self.viewport_animation = None;
            return false;
        }
        true
    }
}
