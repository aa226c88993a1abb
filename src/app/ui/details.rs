use eframe::egui::{RichText, Ui};

use crate::graph::NodeKind;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection");
        ui.add_space(6.0);

        let Some(selection) = self.selected.clone() else {
            ui.label("Click a node in the graph to inspect it.");
            return;
        };

        ui.label(RichText::new(selection.label.as_str()).strong());
        ui.small(selection.kind.label());
        ui.add_space(6.0);

        match selection.kind {
            NodeKind::Employee => {
                if let Some(email) = &selection.email {
                    ui.label(format!("Email: {email}"));
                }
                if let Some(record) = &selection.record {
                    if let Some(department) = &record.department {
                        ui.label(format!("Department: {department}"));
                    }
                    if let Some(company) = &record.company {
                        ui.label(format!("Company: {company}"));
                    }
                    ui.small(format!("Record id: {}", record.id));
                }
            }
            NodeKind::Department | NodeKind::Company => {
                if let Some(&index) = self.graph.index_by_id.get(&selection.id) {
                    ui.label(format!(
                        "Connections in view: {}",
                        self.graph.connections(index)
                    ));
                } else {
                    ui.label("Not present in the current graph.");
                }
            }
        }

        ui.add_space(10.0);
        if ui.button("Clear selection").clicked() {
            self.selected = None;
        }
    }
}
