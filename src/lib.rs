//! Route Filter - persistent transit-route filter control for map hosts
//!
//! A user picks a subset of transit routes to filter map markers. The
//! selection survives restarts through a string-keyed store, and the filter
//! control plugs into a host that creates, refreshes and destroys controls on
//! its own schedule.

pub mod cli;
pub mod config;
pub mod control;
pub mod gui;
pub mod keys;
pub mod logging;
pub mod paths;
pub mod registry;
pub mod selection;
pub mod session;
pub mod storage;
pub mod types;
pub mod view;

pub use control::{FilterControl, HostControl, MountPoint};
pub use session::FilterSession;
pub use types::{Category, FilterState, RouteId, Selection, TriState};
