//! Filter overlay - full route checkbox list with category toggles
//!
//! Rendering is a pure function of the selection and the known routes.
//! Interaction goes through [`FilterOverlayView::dispatch`], which computes the
//! next selection with the selection model and hands it to a single
//! state-replacing callback.

use super::tree::{Action, Node};
use crate::selection::{self, Categories};
use crate::types::{Category, RouteId, Selection, TriState};
use tracing::trace;

/// Text shown while the route registry is unavailable
pub const PLACEHOLDER_TEXT: &str = "(...)";

/// Vertical placement of the modal content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalPosition {
    #[default]
    Middle,
    Bottom,
}

/// Wrap `content` in the modal frame
///
/// Clicking the backdrop or the close button both request [`Action::Close`].
pub fn modal_frame(content: Vec<Node>, position: VerticalPosition) -> Node {
    let content_class = match position {
        VerticalPosition::Middle => "overlay-content",
        VerticalPosition::Bottom => "overlay-content overlay-content-bottom",
    };

    let mut children = vec![Node::Button {
        class: "overlay-close-button".to_string(),
        label: "✕".to_string(),
        title: None,
        disabled: false,
        on_click: Action::Close,
    }];
    children.extend(content);

    Node::Container {
        class: "overlay".to_string(),
        on_click: Some(Action::Close),
        children: vec![Node::container(content_class, children)],
    }
}

/// Overlay over one selection snapshot
pub struct FilterOverlayView<'a> {
    selection: &'a Selection,
    routes: Option<&'a [RouteId]>,
}

impl<'a> FilterOverlayView<'a> {
    /// `routes` is `None` while the route registry is unavailable
    pub fn new(selection: &'a Selection, routes: Option<&'a [RouteId]>) -> Self {
        Self { selection, routes }
    }

    /// Build the overlay tree
    pub fn render(&self) -> Node {
        let Some(routes) = self.routes else {
            return modal_frame(
                vec![Node::text("filter-placeholder", PLACEHOLDER_TEXT)],
                VerticalPosition::Bottom,
            );
        };

        let categories = selection::categorize(routes);

        let mut header: Vec<Node> = Category::all()
            .iter()
            .map(|category| self.render_category(*category, &categories))
            .collect();
        header.push(Node::Button {
            class: "filter-reset-button".to_string(),
            label: "Reset".to_string(),
            title: None,
            disabled: self.selection.is_empty(),
            on_click: Action::Reset,
        });

        let rows = routes.iter().map(|route| self.render_route(*route)).collect();

        modal_frame(
            vec![
                Node::container("filter-header", header),
                Node::container("filter-list", rows),
            ],
            VerticalPosition::Bottom,
        )
    }

    fn render_category(&self, category: Category, categories: &Categories) -> Node {
        let state = selection::tri_state(self.selection, categories.members(category));
        Node::container(
            "filter-category",
            vec![Node::Checkbox {
                class: "filter-tri-checkbox".to_string(),
                label: category.label().to_string(),
                checked: state == TriState::Checked,
                indeterminate: state == TriState::Partial,
                on_toggle: Action::ToggleCategory(category),
            }],
        )
    }

    fn render_route(&self, route: RouteId) -> Node {
        Node::container(
            "filter-route",
            vec![Node::Checkbox {
                class: format!("filter-checkbox filter-route-id {}", Category::of(route)),
                label: route.to_string(),
                checked: self.selection.contains(&route),
                indeterminate: false,
                on_toggle: Action::ToggleRoute(route),
            }],
        )
    }

    /// Apply a selection action and report the resulting selection
    ///
    /// Returns `true` when `on_selection_change` was called. Without a route
    /// registry nothing is toggled; actions that do not touch the selection
    /// (close, show, enable switch) are ignored here.
    pub fn dispatch<F>(&self, action: Action, on_selection_change: F) -> bool
    where
        F: FnOnce(Selection),
    {
        let Some(routes) = self.routes else {
            trace!("Route registry unavailable, ignoring {:?}", action);
            return false;
        };

        let next = match action {
            Action::ToggleRoute(route) => selection::toggle_route(self.selection, route),
            Action::ToggleCategory(category) => {
                let categories = selection::categorize(routes);
                selection::toggle_category(self.selection, categories.members(category))
            }
            Action::Reset => selection::reset(self.selection),
            Action::Close | Action::ShowFilter | Action::ToggleFilter(_) => return false,
        };

        on_selection_change(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(raw: &[u32]) -> Vec<RouteId> {
        raw.iter().copied().map(RouteId).collect()
    }

    fn set(raw: &[u32]) -> Selection {
        raw.iter().copied().map(RouteId).collect()
    }

    fn category_checkbox(tree: &Node, category: Category) -> (bool, bool) {
        match tree.find_action(Action::ToggleCategory(category)) {
            Some(Node::Checkbox {
                checked,
                indeterminate,
                ..
            }) => (*checked, *indeterminate),
            other => panic!("expected category checkbox, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_category_renders_indeterminate() {
        let routes = ids(&[2, 3, 21, 205]);
        let selection = set(&[2, 21]);
        let tree = FilterOverlayView::new(&selection, Some(&routes)).render();

        assert_eq!(category_checkbox(&tree, Category::Trams), (false, true));
        assert_eq!(category_checkbox(&tree, Category::Buses), (false, false));
    }

    #[test]
    fn test_checked_category_and_rows() {
        let routes = ids(&[2, 3, 21, 205]);
        let selection = set(&[205]);
        let tree = FilterOverlayView::new(&selection, Some(&routes)).render();

        assert_eq!(category_checkbox(&tree, Category::Buses), (true, false));
        match tree.find_action(Action::ToggleRoute(RouteId(205))) {
            Some(Node::Checkbox { checked, class, .. }) => {
                assert!(*checked);
                assert!(class.ends_with("bus"));
            }
            other => panic!("unexpected node {:?}", other),
        }

        let rows = tree.find_by_class("filter-list").unwrap().children();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_reset_disabled_on_empty_selection() {
        let routes = ids(&[2, 205]);
        let empty = Selection::new();
        let tree = FilterOverlayView::new(&empty, Some(&routes)).render();
        assert!(matches!(
            tree.find_action(Action::Reset),
            Some(Node::Button { disabled: true, .. })
        ));

        let selection = set(&[2]);
        let tree = FilterOverlayView::new(&selection, Some(&routes)).render();
        assert!(matches!(
            tree.find_action(Action::Reset),
            Some(Node::Button { disabled: false, .. })
        ));
    }

    #[test]
    fn test_dispatch_category_reports_new_selection() {
        let routes = ids(&[2, 3, 21, 205]);
        let selection = set(&[2, 21]);
        let view = FilterOverlayView::new(&selection, Some(&routes));

        let mut reported = None;
        assert!(view.dispatch(Action::ToggleCategory(Category::Trams), |next| reported = Some(next)));
        assert_eq!(reported, Some(set(&[2, 3, 21])));
    }

    #[test]
    fn test_dispatch_route_and_reset() {
        let routes = ids(&[2, 205]);
        let selection = set(&[2]);
        let view = FilterOverlayView::new(&selection, Some(&routes));

        let mut reported = None;
        view.dispatch(Action::ToggleRoute(RouteId(205)), |next| reported = Some(next));
        assert_eq!(reported, Some(set(&[2, 205])));

        view.dispatch(Action::Reset, |next| reported = Some(next));
        assert_eq!(reported, Some(Selection::new()));
    }

    #[test]
    fn test_placeholder_without_registry() {
        let selection = set(&[2]);
        let view = FilterOverlayView::new(&selection, None);
        let tree = view.render();

        assert!(tree.find_by_class("filter-placeholder").is_some());
        assert!(tree.find_by_class("filter-list").is_none());

        let mut called = false;
        assert!(!view.dispatch(Action::Reset, |_| called = true));
        assert!(!called);
    }

    #[test]
    fn test_frame_closes_from_backdrop_and_button() {
        let tree = modal_frame(Vec::new(), VerticalPosition::Middle);
        assert_eq!(tree.action(), Some(Action::Close));
        assert!(tree.find_by_class("overlay-close-button").is_some());
        assert!(!tree.children()[0].has_class("overlay-content-bottom"));
    }
}
