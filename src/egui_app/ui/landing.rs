use eframe::egui::{RichText, Ui};

use super::{EguiApp, card, key_value_grid, request_status, section_heading, style};
use crate::egui_app::state::Page;

impl EguiApp {
    pub(super) fn render_landing(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        ui.vertical_centered(|ui| {
            ui.add_space(24.0);
            ui.label(
                RichText::new("Smart crop recommendations")
                    .size(28.0)
                    .strong()
                    .color(palette.accent_leaf),
            );
            ui.label(
                RichText::new(
                    "Enter your soil nutrients and climate readings to find the crop that suits your field.",
                )
                .color(palette.text_muted),
            );
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                if ui.button("Get a recommendation").clicked() {
                    self.controller.navigate(Page::Form);
                }
                if ui.button("Open the dashboard").clicked() {
                    self.controller.navigate(Page::Dashboard);
                }
                if ui.button("View history").clicked() {
                    self.controller.navigate(Page::History);
                }
            });
        });
        ui.add_space(24.0);
        card(ui, |ui| {
            ui.horizontal(|ui| {
                section_heading(ui, "Weather");
                let loading = self.controller.ui.weather.is_pending();
                if ui
                    .add_enabled(!loading, eframe::egui::Button::new("Refresh"))
                    .clicked()
                {
                    self.controller.refresh_weather();
                }
            });
            let weather = &self.controller.ui.weather;
            request_status(ui, weather);
            match weather.value() {
                Some(report) if report.rows.is_empty() => {
                    ui.label("No weather data.");
                }
                Some(report) => key_value_grid(ui, "weather_rows", &report.rows),
                None if !weather.is_pending() => {
                    ui.label(RichText::new("Press Refresh to load current conditions.").italics());
                }
                None => {}
            }
        });
    }
}
