/// Controller bridging backend calls and UI state.
pub mod controller;
/// UI-facing state snapshots.
pub mod state;
/// egui renderer.
pub mod ui;
