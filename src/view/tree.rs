//! Declarative render tree
//!
//! Views are pure functions returning a [`Node`]. Interactive nodes carry the
//! [`Action`] they trigger instead of a callback, so trees can be compared,
//! printed and replaced wholesale by any host.

use crate::types::{Category, RouteId};

/// User intent attached to an interactive node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Flip one route row
    ToggleRoute(RouteId),
    /// Bulk toggle a category
    ToggleCategory(Category),
    /// Clear the whole selection
    Reset,
    /// Close the overlay
    Close,
    /// Open the overlay from the compact control
    ShowFilter,
    /// Set the global enable switch to the carried value
    ToggleFilter(bool),
}

/// One element of a render tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Container {
        class: String,
        on_click: Option<Action>,
        children: Vec<Node>,
    },
    Checkbox {
        class: String,
        label: String,
        checked: bool,
        indeterminate: bool,
        on_toggle: Action,
    },
    Button {
        class: String,
        label: String,
        title: Option<String>,
        disabled: bool,
        on_click: Action,
    },
    Text {
        class: String,
        text: String,
    },
}

impl Node {
    pub fn container(class: impl Into<String>, children: Vec<Node>) -> Self {
        Node::Container {
            class: class.into(),
            on_click: None,
            children,
        }
    }

    pub fn text(class: impl Into<String>, text: impl Into<String>) -> Self {
        Node::Text {
            class: class.into(),
            text: text.into(),
        }
    }

    /// Class string of this node
    pub fn class(&self) -> &str {
        match self {
            Node::Container { class, .. }
            | Node::Checkbox { class, .. }
            | Node::Button { class, .. }
            | Node::Text { class, .. } => class,
        }
    }

    /// Whether the class string contains `name` as a whole word
    pub fn has_class(&self, name: &str) -> bool {
        self.class().split_whitespace().any(|c| c == name)
    }

    /// Direct children (empty for leaves)
    pub fn children(&self) -> &[Node] {
        match self {
            Node::Container { children, .. } => children,
            _ => &[],
        }
    }

    /// Depth-first, pre-order walk over this node and its descendants
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = vec![self];
        for child in self.children() {
            out.extend(child.walk());
        }
        out
    }

    /// First node (pre-order) carrying the class `name`
    pub fn find_by_class(&self, name: &str) -> Option<&Node> {
        self.walk().into_iter().find(|node| node.has_class(name))
    }

    /// Interactive node bound to `action`, if any
    pub fn find_action(&self, action: Action) -> Option<&Node> {
        self.walk().into_iter().find(|node| node.action() == Some(action))
    }

    /// Action this node triggers when activated
    pub fn action(&self) -> Option<Action> {
        match self {
            Node::Container { on_click, .. } => *on_click,
            Node::Checkbox { on_toggle, .. } => Some(*on_toggle),
            Node::Button { on_click, .. } => Some(*on_click),
            Node::Text { .. } => None,
        }
    }

    /// Indented plain-text dump, one node per line
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(0, &mut out);
        out
    }

    fn write_outline(&self, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let line = match self {
            Node::Container { class, .. } => format!("<{}>", class),
            Node::Checkbox {
                label,
                checked,
                indeterminate,
                ..
            } => {
                let mark = if *indeterminate {
                    "[-]"
                } else if *checked {
                    "[x]"
                } else {
                    "[ ]"
                };
                format!("{} {}", mark, label)
            }
            Node::Button { label, disabled, .. } => {
                if *disabled {
                    format!("({}) disabled", label)
                } else {
                    format!("({})", label)
                }
            }
            Node::Text { text, .. } => text.clone(),
        };
        out.push_str(&indent);
        out.push_str(&line);
        out.push('\n');
        for child in self.children() {
            child.write_outline(depth + 1, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        Node::container(
            "root outer",
            vec![
                Node::text("title", "Filter"),
                Node::Checkbox {
                    class: "filter-checkbox".to_string(),
                    label: "2".to_string(),
                    checked: true,
                    indeterminate: false,
                    on_toggle: Action::ToggleRoute(RouteId(2)),
                },
            ],
        )
    }

    #[test]
    fn test_has_class_matches_whole_words() {
        let node = sample();
        assert!(node.has_class("outer"));
        assert!(!node.has_class("out"));
    }

    #[test]
    fn test_find_action() {
        let node = sample();
        let found = node.find_action(Action::ToggleRoute(RouteId(2))).unwrap();
        assert_eq!(found.class(), "filter-checkbox");
        assert!(node.find_action(Action::Reset).is_none());
    }

    #[test]
    fn test_outline() {
        assert_eq!(sample().outline(), "<root outer>\n  Filter\n  [x] 2\n");
    }
}
