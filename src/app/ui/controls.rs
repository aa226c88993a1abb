use eframe::egui::{self, RichText, Ui};

use crate::graph::{LayoutMode, NodeKind};

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Graph Controls");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search (name, email, or department)");
        let search_response = ui
            .text_edit_singleline(&mut self.filters.search)
            .on_hover_text("Rebuilds the graph from the matching people.");
        if search_response.changed() {
            self.graph_dirty = true;
        }
        if !self.filters.search.is_empty() && ui.small_button("Clear search").clicked() {
            self.filters.search.clear();
            self.graph_dirty = true;
        }

        ui.separator();

        ui.label("Layout");
        let now = ui.input(|input| input.time);
        ui.horizontal(|ui| {
            for mode in LayoutMode::ALL {
                let active = self.layout.mode() == mode;
                if ui.selectable_label(active, mode.label()).clicked() && !active {
                    self.switch_layout(mode, now);
                }
            }
        });

        ui.separator();

        egui::CollapsingHeader::new("Advanced filters").show(ui, |ui| {
            ui.label("Departments");
            let mut toggled_department = None;
            ui.horizontal_wrapped(|ui| {
                for department in &self.directory.departments {
                    let active = self.filters.departments.contains(department);
                    if ui.selectable_label(active, department).clicked() {
                        toggled_department = Some(department.clone());
                    }
                }
            });
            if let Some(department) = toggled_department {
                if !self.filters.departments.remove(&department) {
                    self.filters.departments.insert(department);
                }
                self.graph_dirty = true;
            }
            if !self.filters.departments.is_empty()
                && ui.small_button("Clear department filter").clicked()
            {
                self.filters.departments.clear();
                self.graph_dirty = true;
            }

            ui.add_space(6.0);
            ui.label("Companies");
            let mut toggled_company = None;
            ui.horizontal_wrapped(|ui| {
                for company in &self.directory.companies {
                    let active = self.filters.companies.contains(company);
                    if ui.selectable_label(active, company).clicked() {
                        toggled_company = Some(company.clone());
                    }
                }
            });
            if let Some(company) = toggled_company {
                if !self.filters.companies.remove(&company) {
                    self.filters.companies.insert(company);
                }
                self.graph_dirty = true;
            }
            if !self.filters.companies.is_empty()
                && ui.small_button("Clear company filter").clicked()
            {
                self.filters.companies.clear();
                self.graph_dirty = true;
            }
        });

        ui.separator();

        for kind in [NodeKind::Company, NodeKind::Department, NodeKind::Employee] {
            let style = self.styles.style(kind);
            ui.horizontal(|ui| {
                ui.label(RichText::new("\u{25cf}").color(style.fill));
                ui.label(kind.label());
            });
        }

        ui.add_space(6.0);
        ui.small("Click: details");
        ui.small("Drag: move a node");
        ui.small("Double-click: zoom to neighborhood");
        ui.small("Wheel: zoom, background drag: pan");
    }

    pub(in crate::app) fn switch_layout(&mut self, mode: LayoutMode, now: f64) {
        self.layout
            .switch(mode, &mut self.graph, &mut self.sim, now);
    }
}
