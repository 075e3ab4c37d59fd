//! egui painting of render trees
//!
//! Walks a [`Node`] tree and draws it with stock egui widgets. Widgets that
//! the user activated are reported as [`Action`]s; nothing here changes state.

use crate::view::{Action, Node};

/// Paint `node` and its children, collecting activated actions
pub fn render_node(ui: &mut egui::Ui, node: &Node, actions: &mut Vec<Action>) {
    match node {
        Node::Container { children, .. } => {
            if node.has_class("filter-header") || node.has_class("filter-control") {
                ui.horizontal(|ui| render_children(ui, children, actions));
            } else if node.has_class("filter-list") {
                ui.horizontal_wrapped(|ui| render_children(ui, children, actions));
            } else {
                ui.vertical(|ui| render_children(ui, children, actions));
            }
        }
        Node::Checkbox {
            label,
            checked,
            indeterminate,
            on_toggle,
            ..
        } => {
            let mut value = *checked;
            let text = route_label(node, label);
            let response = ui.add(egui::Checkbox::new(&mut value, text).indeterminate(*indeterminate));
            if response.changed() {
                actions.push(*on_toggle);
            }
        }
        Node::Button {
            label,
            title,
            disabled,
            on_click,
            ..
        } => {
            let mut response = ui.add_enabled(!*disabled, egui::Button::new(label.as_str()));
            if let Some(title) = title {
                response = response.on_hover_text(title.as_str());
            }
            if response.clicked() {
                actions.push(*on_click);
            }
        }
        Node::Text { text, .. } => {
            ui.label(text.as_str());
        }
    }
}

fn render_children(ui: &mut egui::Ui, children: &[Node], actions: &mut Vec<Action>) {
    for child in children {
        render_node(ui, child, actions);
    }
}

/// Route rows are tinted by category
fn route_label(node: &Node, label: &str) -> egui::RichText {
    let text = egui::RichText::new(label);
    if node.has_class("tram") {
        text.color(egui::Color32::from_rgb(30, 90, 200))
    } else if node.has_class("bus") {
        text.color(egui::Color32::from_rgb(20, 140, 60))
    } else {
        text
    }
}

/// Paint the overlay body without its frame chrome
///
/// The window hosting the overlay already has a close button and backdrop
/// handling, so the frame's own close button is skipped.
pub fn render_overlay_content(ui: &mut egui::Ui, tree: &Node, actions: &mut Vec<Action>) {
    let Some(content) = tree.find_by_class("overlay-content") else {
        render_node(ui, tree, actions);
        return;
    };

    for child in content.children() {
        if child.has_class("overlay-close-button") {
            continue;
        }
        render_node(ui, child, actions);
    }
}
