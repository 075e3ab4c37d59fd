//! Declarative views of the filter
//!
//! Every view is a pure function from a state snapshot to a [`Node`] tree.
//! Hosts paint trees and feed activated [`Action`]s back to the owner.

pub mod overlay;
pub mod status;
pub mod tree;

pub use overlay::{modal_frame, FilterOverlayView, VerticalPosition, PLACEHOLDER_TEXT};
pub use status::{render_status, StatusProps};
pub use tree::{Action, Node};
