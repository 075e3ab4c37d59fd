//! Core filter type definitions
//!
//! Defines route identifiers, the persisted filter state, and the derived
//! category and tri-state values used by the overlay.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Identifier of one transit route (GTFS `route_id` for numeric feeds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteId(pub u32);

impl RouteId {
    /// Length of the decimal representation of the identifier
    pub fn digit_count(self) -> usize {
        self.0.to_string().len()
    }
}

impl From<u32> for RouteId {
    fn from(id: u32) -> Self {
        RouteId(id)
    }
}

impl std::str::FromStr for RouteId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u32>().map(RouteId)
    }
}

impl std::fmt::Display for RouteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Set of selected routes. Iteration order carries no meaning.
pub type Selection = BTreeSet<RouteId>;

/// Persisted filter state: the selected routes plus the global enable flag
///
/// Values are replaced, never mutated in place. `enabled` is only shown to the
/// user while the selection is non-empty but is stored as-is either way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub selection: Selection,
    pub enabled: bool,
}

impl FilterState {
    pub fn new(selection: Selection, enabled: bool) -> Self {
        Self { selection, enabled }
    }

    /// Copy of this state with a different selection
    pub fn with_selection(&self, selection: Selection) -> Self {
        Self {
            selection,
            enabled: self.enabled,
        }
    }

    /// Copy of this state with a different enable flag
    pub fn with_enabled(&self, enabled: bool) -> Self {
        Self {
            selection: self.selection.clone(),
            enabled,
        }
    }

    /// Whether the filter currently hides anything
    ///
    /// An enabled filter with an empty selection is treated as inactive.
    pub fn is_active(&self) -> bool {
        self.enabled && !self.selection.is_empty()
    }

    /// Whether a marker on `route` should be shown
    pub fn admits(&self, route: RouteId) -> bool {
        !self.is_active() || self.selection.contains(&route)
    }

    /// Filter a stream of marker routes down to the visible ones
    pub fn visible_routes<'a, I>(&'a self, routes: I) -> impl Iterator<Item = RouteId> + 'a
    where
        I: IntoIterator<Item = RouteId>,
        I::IntoIter: 'a,
    {
        routes.into_iter().filter(move |route| self.admits(*route))
    }
}

/// Fixed route categories used for bulk toggling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Identifiers with at most two decimal digits
    Trams,
    /// Everything else
    Buses,
}

impl Category {
    /// All categories in display order
    pub fn all() -> &'static [Category] {
        &[Category::Trams, Category::Buses]
    }

    /// Category a single route belongs to
    pub fn of(route: RouteId) -> Self {
        if route.digit_count() <= 2 {
            Category::Trams
        } else {
            Category::Buses
        }
    }

    /// User-facing label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Trams => "Tramvaji",
            Category::Buses => "Autobusi",
        }
    }

    /// Class attached to route rows of this category
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Trams => "tram",
            Category::Buses => "bus",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a category relative to a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriState {
    Unchecked,
    Checked,
    Partial,
}

impl std::fmt::Display for TriState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriState::Unchecked => write!(f, "unchecked"),
            TriState::Checked => write!(f, "checked"),
            TriState::Partial => write!(f, "partial"),
        }
    }
}
