//! Filter control - bridge between an imperative map host and the views
//!
//! The host decides when the control is created, refreshed and destroyed; the
//! control only decides what is shown. It owns a single render root that is
//! either present (mounted) or absent (unmounted). Every refresh replaces the
//! whole subtree with [`render_status`] output, and every entry point checks
//! for the root first, so refreshes or teardowns that race ahead of `create`
//! or behind `destroy` are silently dropped.

use crate::types::FilterState;
use crate::view::{render_status, Action, Node, StatusProps};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, trace};

/// Class of the container handed to the host
pub const MOUNT_CLASS: &str = "maplibregl-ctrl filter-ctrl";

/// Callback for the filter button (open the overlay)
pub type ShowFilterCallback = Arc<dyn Fn() + Send + Sync>;

/// Callback for the enable switch, called with the requested value
pub type ToggleFilterCallback = Arc<dyn Fn(bool) + Send + Sync>;

static NEXT_MOUNT_ID: AtomicU64 = AtomicU64::new(1);

/// Container the host places on the map
///
/// Cheap to clone. Clones held by the host only read the content; writes go
/// through the control's render root. After `destroy` the content is empty.
#[derive(Clone)]
pub struct MountPoint {
    id: u64,
    content: Arc<RwLock<Option<Node>>>,
}

impl MountPoint {
    fn allocate() -> Self {
        Self {
            id: NEXT_MOUNT_ID.fetch_add(1, Ordering::Relaxed),
            content: Arc::new(RwLock::new(None)),
        }
    }

    /// Unique id of this container
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn class(&self) -> &'static str {
        MOUNT_CLASS
    }

    /// Currently rendered tree (`None` once released)
    pub fn snapshot(&self) -> Option<Node> {
        self.content.read().clone()
    }

    /// Whether a tree is attached
    pub fn is_attached(&self) -> bool {
        self.content.read().is_some()
    }
}

impl std::fmt::Debug for MountPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MountPoint")
            .field("id", &self.id)
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Render root bound to one mount point
struct RenderRoot {
    mount: MountPoint,
}

impl RenderRoot {
    fn new(mount: MountPoint) -> Self {
        Self { mount }
    }

    fn render(&self, tree: Node) {
        *self.mount.content.write() = Some(tree);
    }

    fn unmount(self) {
        self.mount.content.write().take();
    }
}

/// Lifecycle contract the map host drives
///
/// The host calls these at times of its own choosing; implementations never
/// call back into the host's lifecycle.
pub trait HostControl {
    /// Mount the control and return the container to place on the map
    fn create(&mut self) -> MountPoint;

    /// Release the rendered tree and the container
    fn destroy(&mut self);

    /// Whether the control is currently mounted
    fn is_mounted(&self) -> bool;
}

/// Compact filter control (button plus enable switch)
///
/// Holds no filter state of its own besides the state used for the very first
/// render; the owner pushes every later state through [`update_state`].
///
/// [`update_state`]: FilterControl::update_state
pub struct FilterControl {
    on_show_filter: ShowFilterCallback,
    on_toggle_filter: ToggleFilterCallback,
    initial_state: FilterState,
    root: Option<RenderRoot>,
}

impl FilterControl {
    pub fn new(
        initial_state: FilterState,
        on_show_filter: ShowFilterCallback,
        on_toggle_filter: ToggleFilterCallback,
    ) -> Self {
        Self {
            on_show_filter,
            on_toggle_filter,
            initial_state,
            root: None,
        }
    }

    /// Re-render with a new state and marker-visibility flag
    ///
    /// No-op while unmounted.
    pub fn update_state(&mut self, state: &FilterState, any_marker_visible: bool) {
        self.render_view(state, any_marker_visible);
    }

    /// Route an action from the compact control to the owner's callbacks
    ///
    /// Returns `true` when a callback ran. Ignored while unmounted.
    pub fn handle(&self, action: Action) -> bool {
        if self.root.is_none() {
            trace!("Filter control not mounted, ignoring {:?}", action);
            return false;
        }

        match action {
            Action::ShowFilter => {
                (self.on_show_filter)();
                true
            }
            Action::ToggleFilter(enabled) => {
                (self.on_toggle_filter)(enabled);
                true
            }
            _ => false,
        }
    }

    fn render_view(&self, state: &FilterState, any_marker_visible: bool) {
        let Some(root) = &self.root else {
            trace!("Filter control not mounted, skipping render");
            return;
        };

        let props = StatusProps {
            selection_size: state.selection.len(),
            enabled: state.enabled,
            any_marker_visible,
        };
        root.render(render_status(&props));
        trace!(
            "Filter control rendered (selected: {}, enabled: {}, markers: {})",
            props.selection_size,
            props.enabled,
            props.any_marker_visible
        );
    }
}

impl HostControl for FilterControl {
    fn create(&mut self) -> MountPoint {
        if let Some(root) = &self.root {
            debug!("Filter control already mounted (#{})", root.mount.id());
            return root.mount.clone();
        }

        let mount = MountPoint::allocate();
        self.root = Some(RenderRoot::new(mount.clone()));
        self.render_view(&self.initial_state, true);

        debug!("Filter control mounted (#{})", mount.id());
        mount
    }

    fn destroy(&mut self) {
        let Some(root) = self.root.take() else {
            trace!("Filter control not mounted, ignoring destroy");
            return;
        };

        let id = root.mount.id();
        root.unmount();
        debug!("Filter control unmounted (#{})", id);
    }

    fn is_mounted(&self) -> bool {
        self.root.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RouteId;
    use std::sync::atomic::AtomicBool;

    fn control(initial: FilterState) -> FilterControl {
        FilterControl::new(initial, Arc::new(|| {}), Arc::new(|_| {}))
    }

    fn state(ids: &[u32], enabled: bool) -> FilterState {
        FilterState::new(ids.iter().copied().map(RouteId).collect(), enabled)
    }

    #[test]
    fn test_update_before_create_is_noop() {
        let mut control = control(FilterState::default());
        control.update_state(&state(&[2], true), false);
        assert!(!control.is_mounted());

        // The early update was dropped: the first tree shows the initial state
        let mount = control.create();
        let tree = mount.snapshot().unwrap();
        assert!(tree.find_by_class("switch").is_none());
        assert!(tree.find_by_class("no-markers").is_none());
    }

    #[test]
    fn test_create_renders_initial_state() {
        let mut control = control(state(&[2, 21], true));
        let mount = control.create();

        assert_eq!(mount.class(), MOUNT_CLASS);
        let tree = mount.snapshot().unwrap();
        assert!(tree.find_by_class("switch").is_some());
        // Initial render assumes markers are visible
        assert!(!tree.find_by_class("maplibregl-ctrl-group").unwrap().has_class("no-markers"));
    }

    #[test]
    fn test_update_replaces_tree() {
        let mut control = control(state(&[2], true));
        let mount = control.create();

        control.update_state(&state(&[], false), false);
        let tree = mount.snapshot().unwrap();
        assert!(tree.find_by_class("switch").is_none());
        assert!(tree.find_by_class("no-markers").is_some());
    }

    #[test]
    fn test_destroy_then_update_then_create() {
        let mut control = control(FilterState::default());
        let first = control.create();
        control.destroy();

        assert!(!first.is_attached());
        control.update_state(&state(&[2], true), true);
        assert!(!first.is_attached());
        assert_eq!(first.snapshot(), None);

        let second = control.create();
        assert!(control.is_mounted());
        assert!(second.is_attached());
        assert_ne!(first.id(), second.id());
    }

    #[test]
    fn test_destroy_while_unmounted_is_noop() {
        let mut control = control(FilterState::default());
        control.destroy();
        control.destroy();
        assert!(!control.is_mounted());
    }

    #[test]
    fn test_create_twice_keeps_mount() {
        let mut control = control(FilterState::default());
        let first = control.create();
        control.update_state(&state(&[2], true), true);

        // A second create keeps the current tree instead of re-rendering
        let again = control.create();
        assert_eq!(first.id(), again.id());
        assert!(again.snapshot().unwrap().find_by_class("switch").is_some());
    }

    #[test]
    fn test_actions_reach_callbacks_only_when_mounted() {
        let shown = Arc::new(AtomicBool::new(false));
        let toggled = Arc::new(RwLock::new(None));

        let shown_clone = Arc::clone(&shown);
        let toggled_clone = Arc::clone(&toggled);
        let mut control = FilterControl::new(
            FilterState::default(),
            Arc::new(move || shown_clone.store(true, Ordering::SeqCst)),
            Arc::new(move |enabled| *toggled_clone.write() = Some(enabled)),
        );

        assert!(!control.handle(Action::ShowFilter));
        assert!(!shown.load(Ordering::SeqCst));

        control.create();
        assert!(control.handle(Action::ShowFilter));
        assert!(control.handle(Action::ToggleFilter(true)));
        assert!(!control.handle(Action::Reset));

        assert!(shown.load(Ordering::SeqCst));
        assert_eq!(*toggled.read(), Some(true));
    }
}
