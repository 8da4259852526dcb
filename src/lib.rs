//! Library exports for the desktop client and its integration tests.
/// Typed access to the backend HTTP API.
pub mod api;
/// Application directory helpers.
pub mod app_dirs;
/// Persisted settings.
pub mod config;
/// Crop recommendation input form.
pub mod crop_form;
/// Agricultural tool panels.
pub mod dashboard;
/// egui controller, state and renderer.
pub mod egui_app;
/// Result export to disk.
pub mod export;
/// Persisted slot carrying the last recommendation between views.
pub mod handoff;
/// Prediction history and statistics.
pub mod history;
pub(crate) mod http_client;
/// Tracing subscriber setup.
pub mod logging;
/// Request lifecycle with stale-reply detection.
pub mod request_state;
/// Result view state.
pub mod result_view;
/// Cultivation suggestions.
pub mod suggestions;
/// Language selector controller.
pub mod translation;
/// Weather strip.
pub mod weather;
/// Prediction submission and sensor import.
pub mod workflow;
