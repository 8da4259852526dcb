//! egui renderer for the application UI.
mod dashboard;
mod form;
mod history;
mod landing;
mod overlays;
mod result;
pub mod style;

use std::time::Duration;

use eframe::egui::{self, Align, ComboBox, Frame, Layout, Margin, RichText, Ui};

use crate::egui_app::controller::AppController;
use crate::egui_app::state::Page;
use crate::translation::INCLUDED_LANGUAGES;

/// Smallest window size the layout is designed for.
pub const MIN_VIEWPORT_SIZE: egui::Vec2 = egui::vec2(960.0, 640.0);

/// Renders the egui UI using the shared controller state.
pub struct EguiApp {
    controller: AppController,
    visuals_set: bool,
}

impl EguiApp {
    /// Create the app, loading persisted configuration.
    pub fn new() -> Result<Self, String> {
        let controller = AppController::load().map_err(|err| err.to_string())?;
        Ok(Self::with_controller(controller))
    }

    pub fn with_controller(controller: AppController) -> Self {
        Self {
            controller,
            visuals_set: false,
        }
    }

    fn apply_visuals(&mut self, ctx: &egui::Context) {
        if self.visuals_set {
            return;
        }
        let mut visuals = egui::Visuals::dark();
        style::apply_visuals(&mut visuals);
        ctx.set_visuals(visuals);
        self.visuals_set = true;
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let palette = style::palette();
        egui::TopBottomPanel::top("top_bar")
            .frame(Frame::new().fill(palette.bg_primary).inner_margin(Margin::same(8)))
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new("AgroDesk")
                            .strong()
                            .size(18.0)
                            .color(palette.accent_leaf),
                    );
                    ui.add_space(12.0);
                    let current = self.controller.page();
                    for page in Page::NAV {
                        if ui.selectable_label(current == page, page.label()).clicked() {
                            self.controller.navigate(page);
                        }
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        self.render_language_selector(ui);
                    });
                });
            });
    }

    /// Shown only on views that host the selector.
    fn render_language_selector(&mut self, ui: &mut Ui) {
        let Some(host) = self.controller.page().translation_host() else {
            return;
        };
        if !self.controller.translation().is_mounted_in(host) {
            return;
        }
        let mut picked = self.controller.translation().selected();
        ComboBox::from_id_salt("language_selector")
            .selected_text(self.controller.translation().selected_name())
            .show_ui(ui, |ui| {
                for (code, name) in INCLUDED_LANGUAGES {
                    ui.selectable_value(&mut picked, code, name);
                }
            });
        if picked != self.controller.translation().selected()
            && let Err(err) = self.controller.select_language(picked)
        {
            tracing::warn!(error = %err, "language selection rejected");
        }
    }

    fn render_page(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .id_salt("page_scroll")
                .auto_shrink([false, false])
                .show(ui, |ui| match self.controller.page() {
                    Page::Landing => self.render_landing(ui),
                    Page::Form => self.render_form(ui),
                    Page::Result => self.render_result(ui),
                    Page::History => self.render_history(ui),
                    Page::Dashboard => self.render_dashboard(ui),
                });
        });
    }
}

impl eframe::App for EguiApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.apply_visuals(ctx);
        self.controller.tick();
        self.render_top_bar(ctx);
        self.render_page(ctx);
        self.render_sensor_prompt(ctx);
        self.render_alert(ctx);
        self.render_toasts(ctx);
        if self.controller.is_busy() || !self.controller.ui.toasts.items.is_empty() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
    }
}

/// Framed block used by every view.
pub(crate) fn card<R>(ui: &mut Ui, add_contents: impl FnOnce(&mut Ui) -> R) -> R {
    Frame::new()
        .fill(style::palette().bg_primary)
        .stroke(style::card_stroke())
        .corner_radius(egui::CornerRadius::same(6))
        .inner_margin(Margin::same(12))
        .show(ui, add_contents)
        .inner
}

pub(crate) fn section_heading(ui: &mut Ui, text: &str) {
    ui.label(
        RichText::new(text)
            .strong()
            .size(16.0)
            .color(style::palette().accent_leaf),
    );
    ui.add_space(4.0);
}

/// Spinner or error line for a request, if it is not settled successfully.
pub(crate) fn request_status<T>(ui: &mut Ui, state: &crate::request_state::RequestState<T>) {
    if state.is_pending() {
        ui.horizontal(|ui| {
            ui.spinner();
            ui.label("Loading...");
        });
    } else if let Some(error) = state.error() {
        ui.colored_label(style::palette().danger, error);
    }
}

pub(crate) fn key_value_grid(ui: &mut Ui, id: &str, rows: &[(String, String)]) {
    egui::Grid::new(id)
        .num_columns(2)
        .striped(true)
        .spacing([16.0, 4.0])
        .show(ui, |ui| {
            for (key, value) in rows {
                ui.label(RichText::new(key).color(style::palette().text_muted));
                ui.label(value);
                ui.end_row();
            }
        });
}
