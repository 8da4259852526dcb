use eframe::egui::{self, RichText, TextEdit, Ui};

use super::{EguiApp, card, section_heading, style};
use crate::crop_form::{FormField, FormPhase};

impl EguiApp {
    pub(super) fn render_form(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let submitting = self.controller.ui.form.phase() == FormPhase::Submitting;
        let importing = self.controller.ui.form.sensor.is_pending();
        card(ui, |ui| {
            section_heading(ui, "Soil & climate readings");
            ui.label(
                RichText::new("All seven values are required. Ranges are typical, not limits.")
                    .color(palette.text_muted),
            );
            ui.add_space(8.0);
            egui::Grid::new("crop_form_grid")
                .num_columns(3)
                .spacing([12.0, 8.0])
                .show(ui, |ui| {
                    for field in FormField::ALL {
                        let invalid = self.controller.ui.form.invalid_field == Some(field);
                        let label = match field.unit() {
                            "" => field.label().to_string(),
                            unit => format!("{} ({unit})", field.label()),
                        };
                        let label = if invalid {
                            RichText::new(label).color(palette.danger)
                        } else {
                            RichText::new(label)
                        };
                        ui.label(label);
                        let value = self.controller.ui.form.fields.value_mut(field);
                        ui.add_enabled(
                            !submitting,
                            TextEdit::singleline(value).desired_width(140.0),
                        );
                        ui.label(RichText::new(field.hint()).small().color(palette.text_muted));
                        ui.end_row();
                    }
                });
            ui.add_space(12.0);
            ui.horizontal(|ui| {
                let label = if submitting {
                    "Analyzing..."
                } else {
                    "Get Recommendation"
                };
                if ui
                    .add_enabled(!submitting, egui::Button::new(label))
                    .clicked()
                {
                    self.controller.submit_form();
                }
                if submitting {
                    ui.spinner();
                }
                if ui
                    .add_enabled(!submitting && !importing, egui::Button::new("Load from ThingSpeak"))
                    .clicked()
                {
                    self.controller.open_sensor_prompt();
                }
                if ui.add_enabled(!submitting, egui::Button::new("Clear")).clicked() {
                    self.controller.clear_form();
                }
            });
        });
    }
}
