//! Compact status control shown inside the host map
//!
//! A filter button plus, while something is selected, the global enable
//! switch. `enabled` and `any_marker_visible` are independent inputs: the
//! first drives the switch and the `active` class, the second only the
//! `no-markers` class.

use super::tree::{Action, Node};

/// Inputs of the compact control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusProps {
    pub selection_size: usize,
    pub enabled: bool,
    pub any_marker_visible: bool,
}

/// Class list of the button group
pub fn group_class(props: &StatusProps) -> String {
    let mut class = String::from("maplibregl-ctrl-group");
    if !props.any_marker_visible {
        class.push_str(" no-markers");
    }
    if props.selection_size > 0 && props.enabled {
        class.push_str(" active");
    }
    class
}

/// Build the compact control tree
pub fn render_status(props: &StatusProps) -> Node {
    let mut children = Vec::with_capacity(2);

    if props.selection_size > 0 {
        children.push(Node::Checkbox {
            class: "switch".to_string(),
            label: String::new(),
            checked: props.enabled,
            indeterminate: false,
            on_toggle: Action::ToggleFilter(!props.enabled),
        });
    }

    children.push(Node::Container {
        class: group_class(props),
        on_click: None,
        children: vec![Node::Button {
            class: "maplibregl-ctrl-icon".to_string(),
            label: "Filter".to_string(),
            title: Some("Filtar".to_string()),
            disabled: false,
            on_click: Action::ShowFilter,
        }],
    });

    Node::container("filter-control", children)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(selection_size: usize, enabled: bool, any_marker_visible: bool) -> StatusProps {
        StatusProps {
            selection_size,
            enabled,
            any_marker_visible,
        }
    }

    #[test]
    fn test_switch_hidden_without_selection() {
        let tree = render_status(&props(0, true, true));
        assert!(tree.find_by_class("switch").is_none());
        assert!(!tree.find_by_class("maplibregl-ctrl-group").unwrap().has_class("active"));
    }

    #[test]
    fn test_switch_reflects_enabled() {
        let tree = render_status(&props(3, true, true));
        match tree.find_by_class("switch") {
            Some(Node::Checkbox { checked, on_toggle, .. }) => {
                assert!(*checked);
                assert_eq!(*on_toggle, Action::ToggleFilter(false));
            }
            other => panic!("expected switch, got {:?}", other),
        }
        assert!(tree.find_by_class("active").is_some());
    }

    #[test]
    fn test_marker_flag_only_dims() {
        let dimmed = render_status(&props(3, false, false));
        let group = dimmed.find_by_class("maplibregl-ctrl-group").unwrap();
        assert!(group.has_class("no-markers"));
        assert!(!group.has_class("active"));

        // The marker flag never touches the switch
        match dimmed.find_by_class("switch") {
            Some(Node::Checkbox { checked, .. }) => assert!(!*checked),
            other => panic!("expected switch, got {:?}", other),
        }
    }

    #[test]
    fn test_show_filter_button() {
        let tree = render_status(&props(0, false, true));
        assert!(tree.find_action(Action::ShowFilter).is_some());
    }
}
