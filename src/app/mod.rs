use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context, Vec2};

use crate::directory::{Directory, PersonRecord, load_directory};
use crate::graph::{
    FilterState, ForceSimulation, LayoutController, LayoutMode, Node, NodeKind, OrgGraph,
    StyleTable,
};

mod interaction;
mod render_utils;
mod ui;
mod view;

pub struct OrgGraphApp {
    records_path: String,
    initial_layout: LayoutMode,
    state: AppState,
    reload_rx: Option<Receiver<Result<Directory, String>>>,
}

enum AppState {
    Loading {
        rx: Receiver<Result<Directory, String>>,
    },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    directory: Directory,
    filters: FilterState,
    styles: StyleTable,
    graph: OrgGraph,
    sim: ForceSimulation,
    layout: LayoutController,
    selected: Option<Selection>,
    hovered: Option<usize>,
    drag: Option<DragState>,
    pan: Vec2,
    zoom: f32,
    viewport_animation: Option<ViewportAnimation>,
    graph_dirty: bool,
}

#[derive(Clone, Copy)]
struct DragState {
    index: usize,
    via_label: bool,
}

struct ViewportAnimation {
    from_pan: Vec2,
    from_zoom: f32,
    to_pan: Vec2,
    to_zoom: f32,
    start_time: f64,
    duration: f32,
}

/// Snapshot handed to the details panel on click. Holds copied data, not an
/// index, so it stays valid across rebuilds.
#[derive(Clone, Debug, PartialEq)]
struct Selection {
    id: String,
    kind: NodeKind,
    label: String,
    email: Option<String>,
    record: Option<PersonRecord>,
}

impl Selection {
    fn from_node(node: &Node) -> Self {
        Self {
            id: node.id.clone(),
            kind: node.kind,
            label: node.label.clone(),
            email: node.record.as_ref().and_then(|record| record.email.clone()),
            record: node.record.clone(),
        }
    }
}

impl OrgGraphApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        records_path: String,
        initial_layout: LayoutMode,
    ) -> Self {
        let state = Self::start_load(records_path.clone());
        Self {
            records_path,
            initial_layout,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(records_path: String) -> Receiver<Result<Directory, String>> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_directory(&records_path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(records_path: String) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(records_path),
        }
    }
}

impl eframe::App for OrgGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        let mut transition = None;

        match &mut self.state {
            AppState::Loading { rx } => {
                if let Ok(result) = rx.try_recv() {
                    transition = Some(match result {
                        Ok(directory) => {
                            AppState::Ready(Box::new(ViewModel::new(directory, self.initial_layout)))
                        }
                        Err(error) => AppState::Error(error),
                    });
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading directory snapshot...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load directory snapshot");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(10.0);
                    if ui.button("Retry").clicked() {
                        transition = Some(Self::start_load(self.records_path.clone()));
                    }
                });
            }
            AppState::Ready(model) => {
                let mut reload_requested = false;
                let is_reloading = self.reload_rx.is_some();
                model.show(ctx, &self.records_path, &mut reload_requested, is_reloading);

                if reload_requested && self.reload_rx.is_none() {
                    self.reload_rx = Some(Self::spawn_load(self.records_path.clone()));
                }

                if let Some(rx) = self.reload_rx.take() {
                    match rx.try_recv() {
                        Ok(Ok(directory)) => model.replace_directory(directory),
                        Ok(Err(error)) => transition = Some(AppState::Error(error)),
                        Err(TryRecvError::Empty) => {
                            self.reload_rx = Some(rx);
                        }
                        Err(TryRecvError::Disconnected) => {
                            transition =
                                Some(AppState::Error("Background load worker disconnected".to_owned()));
                        }
                    }
                }
            }
        }

        if let Some(next_state) = transition {
            self.reload_rx = None;
            self.state = next_state;
        }
    }
}
