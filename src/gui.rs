//! Desktop host - egui window playing the map framework
//!
//! Paints the compact control and the overlay from their render trees.

mod app;
mod rendering;

pub use app::FilterHostApp;

use crate::session::FilterSession;
use crate::storage::KeyValueBackend;

/// Open the host window; blocks until it is closed
pub fn run_gui<B: KeyValueBackend + 'static>(session: FilterSession<B>) -> anyhow::Result<()> {
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title("Route Filter")
            .with_inner_size([720.0, 520.0])
            .with_min_inner_size([480.0, 360.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Route Filter",
        native_options,
        Box::new(move |_cc| Ok(Box::new(FilterHostApp::new(session)))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run GUI host: {}", e))
}
