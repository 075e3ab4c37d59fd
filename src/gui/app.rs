//! Desktop host application
//!
//! [`FilterHostApp`] stands in for the map framework: it adds and removes the
//! compact control on demand, reports which marker routes are on the map, and
//! forwards the Escape key to the process-wide key listeners.

use super::rendering::{render_node, render_overlay_content};
use crate::control::MountPoint;
use crate::keys::Key;
use crate::session::FilterSession;
use crate::storage::KeyValueBackend;
use crate::types::RouteId;
use crate::view::Action;

pub struct FilterHostApp<B: KeyValueBackend> {
    session: FilterSession<B>,
    mount: Option<MountPoint>,
    markers_input: String,
}

impl<B: KeyValueBackend> FilterHostApp<B> {
    /// Wrap a session; the control is mounted right away
    pub fn new(mut session: FilterSession<B>) -> Self {
        let mount = Some(session.mount());
        Self {
            session,
            mount,
            markers_input: String::new(),
        }
    }

    fn render_host_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let label = if self.mount.is_some() {
                "Remove control"
            } else {
                "Add control"
            };
            if ui.button(label).clicked() {
                if self.mount.is_some() {
                    self.session.unmount();
                    self.mount = None;
                } else {
                    self.mount = Some(self.session.mount());
                }
            }

            ui.separator();
            ui.label("Markers on map:");
            ui.text_edit_singleline(&mut self.markers_input);
            if ui.button("Apply").clicked() {
                let markers: Vec<RouteId> = self
                    .markers_input
                    .split(|c: char| c.is_whitespace() || c == ',')
                    .filter_map(|raw| raw.parse::<RouteId>().ok())
                    .collect();
                self.session.set_markers(markers);
            }
        });
    }
}

impl<B: KeyValueBackend> eframe::App for FilterHostApp<B> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.session.handle_key(Key::Escape);
        }

        let mut actions = Vec::new();

        egui::TopBottomPanel::top("host_bar").show(ctx, |ui| self.render_host_bar(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            let state = self.session.state();
            ui.label(format!(
                "{} routes selected, filter {}",
                state.selection.len(),
                if state.is_active() { "active" } else { "inactive" }
            ));
            ui.separator();

            match self.mount.as_ref().and_then(|m| m.snapshot()) {
                Some(tree) => render_node(ui, &tree, &mut actions),
                None => {
                    ui.weak("(control not mounted)");
                }
            }
        });

        if let Some(tree) = self.session.overlay_tree() {
            let mut open = true;
            egui::Window::new("Filtar")
                .open(&mut open)
                .collapsible(false)
                .resizable(true)
                .anchor(egui::Align2::CENTER_BOTTOM, [0.0, -16.0])
                .show(ctx, |ui| render_overlay_content(ui, &tree, &mut actions));
            if !open {
                actions.push(Action::Close);
            }
        }

        for action in actions {
            self.session.dispatch(action);
        }
    }
}
