//! Selection model - pure operations over route selections
//!
//! Every function takes a selection snapshot and returns a new one; nothing
//! here mutates its input or can fail.

use crate::types::{Category, RouteId, Selection, TriState};

/// Known routes split by category, each group in registry order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    pub trams: Vec<RouteId>,
    pub buses: Vec<RouteId>,
}

impl Categories {
    /// Members of one category
    pub fn members(&self, category: Category) -> &[RouteId] {
        match category {
            Category::Trams => &self.trams,
            Category::Buses => &self.buses,
        }
    }
}

/// Add `id` if absent, remove it if present
pub fn toggle_route(selection: &Selection, id: RouteId) -> Selection {
    let mut next = selection.clone();
    if !next.remove(&id) {
        next.insert(id);
    }
    next
}

/// Partition known routes into trams (at most two decimal digits) and buses
pub fn categorize(known: &[RouteId]) -> Categories {
    let mut categories = Categories::default();
    for &route in known {
        match Category::of(route) {
            Category::Trams => categories.trams.push(route),
            Category::Buses => categories.buses.push(route),
        }
    }
    categories
}

/// Compare the selected part of `members` against `members` itself
pub fn tri_state(selection: &Selection, members: &[RouteId]) -> TriState {
    let present = members.iter().filter(|id| selection.contains(id)).count();
    if present == 0 {
        TriState::Unchecked
    } else if present == members.len() {
        TriState::Checked
    } else {
        TriState::Partial
    }
}

/// Bulk toggle a category
///
/// A fully checked category is cleared; unchecked and partial categories are
/// both filled. Partial never goes to empty.
pub fn toggle_category(selection: &Selection, members: &[RouteId]) -> Selection {
    let mut next = selection.clone();
    if tri_state(selection, members) == TriState::Checked {
        for id in members {
            next.remove(id);
        }
    } else {
        next.extend(members.iter().copied());
    }
    next
}

/// Clear the selection
pub fn reset(_selection: &Selection) -> Selection {
    Selection::new()
}
