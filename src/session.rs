//! Filter session - owner of the current filter state
//!
//! Composes the persisted state, the route list, the overlay and the compact
//! control. Every state change is written through to storage and pushed into
//! the control with the current marker-visibility flag.
//!
//! Callbacks coming from the control and from the key listener never touch the
//! session directly: they post a [`SessionCommand`] on a crossbeam channel and
//! the session applies queued commands in [`FilterSession::pump`].

use crate::control::{FilterControl, HostControl, MountPoint};
use crate::keys::{self, Key, ListenerGuard};
use crate::storage::{FilterStateCodec, KeyValueBackend, Persisted, PersistentStateStore};
use crate::types::{FilterState, RouteId, Selection};
use crate::view::{Action, FilterOverlayView, Node};
use crossbeam::channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Requests posted by callbacks for the session to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Open the overlay (filter button)
    ShowFilter,
    /// Set the enable flag (switch)
    ToggleFilter(bool),
    /// Close the overlay (cancel key)
    CloseOverlay,
}

/// Overlay currently on screen; holds the cancel-key registration
struct OpenOverlay {
    _cancel: ListenerGuard,
}

/// Current filter state plus everything derived from it
pub struct FilterSession<B: KeyValueBackend> {
    state: Persisted<FilterState, FilterStateCodec, B>,
    routes: Option<Vec<RouteId>>,
    markers: Option<Vec<RouteId>>,
    control: FilterControl,
    overlay: Option<OpenOverlay>,
    cancel_key: Key,
    commands_tx: Sender<SessionCommand>,
    commands_rx: Receiver<SessionCommand>,
}

impl<B: KeyValueBackend> FilterSession<B> {
    /// Load the stored state at `key` and build the control around it
    pub fn new(store: Arc<PersistentStateStore<B>>, key: &str, cancel_key: Key) -> Self {
        let state = Persisted::load(store, key, FilterState::default(), FilterStateCodec);
        let (commands_tx, commands_rx) = unbounded();

        let show_tx = commands_tx.clone();
        let toggle_tx = commands_tx.clone();
        let control = FilterControl::new(
            state.get().clone(),
            Arc::new(move || {
                let _ = show_tx.send(SessionCommand::ShowFilter);
            }),
            Arc::new(move |enabled| {
                let _ = toggle_tx.send(SessionCommand::ToggleFilter(enabled));
            }),
        );

        info!(
            "Filter session started ({} routes selected, enabled: {})",
            state.get().selection.len(),
            state.get().enabled
        );

        Self {
            state,
            routes: None,
            markers: None,
            control,
            overlay: None,
            cancel_key,
            commands_tx,
            commands_rx,
        }
    }

    /// Current filter state
    pub fn state(&self) -> &FilterState {
        self.state.get()
    }

    /// Known routes, `None` while the registry is unavailable
    pub fn routes(&self) -> Option<&[RouteId]> {
        self.routes.as_deref()
    }

    /// Mount the compact control and bring it up to date
    pub fn mount(&mut self) -> MountPoint {
        let mount = self.control.create();
        self.push();
        mount
    }

    /// Unmount the compact control
    pub fn unmount(&mut self) {
        self.control.destroy();
    }

    /// Whether markers on the map are shown at all under the current filter
    ///
    /// Defaults to `true` until the host reports markers.
    pub fn any_marker_visible(&self) -> bool {
        match &self.markers {
            Some(markers) => markers.iter().any(|route| self.state().admits(*route)),
            None => true,
        }
    }

    /// Install (or drop) the route list
    pub fn set_routes(&mut self, routes: Option<Vec<RouteId>>) {
        debug!(
            "Route registry {}",
            match &routes {
                Some(routes) => format!("loaded ({} routes)", routes.len()),
                None => "unavailable".to_string(),
            }
        );
        self.routes = routes;
    }

    /// Report the routes of the markers currently on the map
    pub fn set_markers(&mut self, markers: Vec<RouteId>) {
        self.markers = Some(markers);
        self.push();
    }

    /// Replace the selection; the enable flag is kept as-is
    pub fn select(&mut self, selection: Selection) {
        let next = self.state().with_selection(selection);
        self.replace(next);
    }

    /// Set the enable flag; the selection is kept as-is
    pub fn toggle_filter(&mut self, enabled: bool) {
        let next = self.state().with_enabled(enabled);
        self.replace(next);
    }

    /// Open the overlay and start listening for the cancel key
    pub fn open_overlay(&mut self) {
        if self.overlay.is_some() {
            trace!("Overlay already open");
            return;
        }

        let tx = self.commands_tx.clone();
        let cancel = keys::listen(self.cancel_key, move |_| {
            let _ = tx.send(SessionCommand::CloseOverlay);
        });
        self.overlay = Some(OpenOverlay { _cancel: cancel });
        debug!("Overlay opened");
    }

    /// Close the overlay; releases the cancel-key listener
    pub fn close_overlay(&mut self) {
        if self.overlay.take().is_some() {
            debug!("Overlay closed");
        }
    }

    pub fn is_overlay_open(&self) -> bool {
        self.overlay.is_some()
    }

    /// Overlay tree, if the overlay is open
    pub fn overlay_tree(&self) -> Option<Node> {
        self.overlay.as_ref()?;
        Some(FilterOverlayView::new(&self.state().selection, self.routes()).render())
    }

    /// Apply an action activated in either view
    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::ShowFilter | Action::ToggleFilter(_) => {
                self.control.handle(action);
            }
            Action::Close => self.close_overlay(),
            Action::ToggleRoute(_) | Action::ToggleCategory(_) | Action::Reset => {
                if self.overlay.is_none() {
                    trace!("Overlay closed, ignoring {:?}", action);
                    return;
                }
                let mut next = None;
                FilterOverlayView::new(&self.state().selection, self.routes())
                    .dispatch(action, |selection| next = Some(selection));
                if let Some(selection) = next {
                    self.select(selection);
                }
            }
        }
        self.pump();
    }

    /// Deliver a key press to the process-wide listeners, then apply results
    pub fn handle_key(&mut self, key: Key) {
        keys::dispatch(key);
        self.pump();
    }

    /// Apply every queued command
    pub fn pump(&mut self) {
        while let Ok(command) = self.commands_rx.try_recv() {
            trace!("Applying {:?}", command);
            match command {
                SessionCommand::ShowFilter => self.open_overlay(),
                SessionCommand::ToggleFilter(enabled) => self.toggle_filter(enabled),
                SessionCommand::CloseOverlay => self.close_overlay(),
            }
        }
    }

    fn replace(&mut self, next: FilterState) {
        if &next == self.state() {
            trace!("Filter state unchanged");
            return;
        }
        self.state.set(next);
        self.push();
    }

    fn push(&mut self) {
        let visible = self.any_marker_visible();
        let state = self.state.get().clone();
        self.control.update_state(&state, visible);
    }
}
