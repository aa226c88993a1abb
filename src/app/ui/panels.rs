use eframe::egui::{self, Align, Context, Layout, Vec2};

use crate::directory::Directory;
use crate::graph::{
    FilterState, ForceSimulation, LayoutController, LayoutMode, OrgGraph, SimulationConfig,
    StyleTable,
};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn new(directory: Directory, initial_layout: LayoutMode) -> Self {
        Self {
            directory,
            filters: FilterState::default(),
            styles: StyleTable::default(),
            graph: OrgGraph::default(),
            sim: ForceSimulation::new(SimulationConfig::default()),
            layout: LayoutController::new(initial_layout),
            selected: None,
            hovered: None,
            drag: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            viewport_animation: None,
            graph_dirty: true,
        }
    }

    /// Swap in a freshly loaded snapshot; filter selections that no longer
    /// exist are dropped before the rebuild.
    pub(in crate::app) fn replace_directory(&mut self, directory: Directory) {
        self.filters
            .departments
            .retain(|department| directory.departments.contains(department));
        self.filters
            .companies
            .retain(|company| directory.companies.contains(company));
        self.directory = directory;
        self.graph_dirty = true;
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        records_path: &str,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("org-graph");
                    ui.separator();
                    ui.label(format!("snapshot: {records_path}"));
                    ui.label(format!("people: {}", self.directory.record_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload snapshot"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(format!(
                            "nodes: {}  edges: {}",
                            self.graph.node_count(),
                            self.graph.edge_count()
                        ));
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(280.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading directory snapshot...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });
    }
}
