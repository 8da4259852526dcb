use eframe::egui::{self, RichText, Ui};

use super::{EguiApp, card, key_value_grid, request_status, section_heading, style};
use crate::crop_form::FormField;
use crate::export::ExportFormat;
use crate::result_view::DisplayedResult;
use crate::suggestions::{NO_SUGGESTIONS_MESSAGE, SuggestionBlock};

impl EguiApp {
    pub(super) fn render_result(&mut self, ui: &mut Ui) {
        let Some(displayed) = self.controller.ui.result.displayed().cloned() else {
            ui.spinner();
            return;
        };
        render_summary(ui, &displayed);
        ui.add_space(12.0);
        card(ui, |ui| {
            ui.horizontal(|ui| {
                section_heading(ui, "Cultivation suggestions");
                let loading = self.controller.ui.result.suggestions.is_pending();
                if ui
                    .add_enabled(!loading, egui::Button::new("Reload"))
                    .clicked()
                {
                    self.controller.reload_suggestions();
                }
            });
            let suggestions = &self.controller.ui.result.suggestions;
            request_status(ui, suggestions);
            if let Some(suggestions) = suggestions.value() {
                let blocks = suggestions.payload().render();
                if blocks.is_empty() {
                    ui.label(NO_SUGGESTIONS_MESSAGE);
                }
                for (index, block) in blocks.iter().enumerate() {
                    render_block(ui, index, block);
                }
            }
        });
        ui.add_space(12.0);
        let exporting = self.controller.ui.export.last.is_pending();
        ui.horizontal(|ui| {
            for format in [ExportFormat::Text, ExportFormat::Json] {
                let label = format!("Export {}", format.label());
                if ui
                    .add_enabled(!exporting, egui::Button::new(label))
                    .clicked()
                {
                    self.controller.export_result(format);
                }
            }
            if exporting {
                ui.spinner();
            }
            if ui.button("Export folder...").clicked() {
                self.controller.choose_export_dir();
            }
            if ui.button("Show exports").clicked() {
                self.controller.open_export_folder();
            }
            if ui.button("Try Again").clicked() {
                self.controller.retry_recommendation();
            }
        });
    }
}

fn render_summary(ui: &mut Ui, displayed: &DisplayedResult) {
    let palette = style::palette();
    let result = &displayed.result;
    card(ui, |ui| {
        ui.label(RichText::new("Recommended crop").color(palette.text_muted));
        ui.horizontal(|ui| {
            ui.label(
                RichText::new(&result.crop)
                    .size(26.0)
                    .strong()
                    .color(palette.accent_leaf),
            );
            ui.add_space(12.0);
            ui.label(
                RichText::new(format!("{:.1}% confidence", result.confidence))
                    .strong()
                    .color(style::confidence_color(displayed.tone)),
            );
        });
        ui.label(RichText::new(&displayed.image_ref).small().color(palette.text_muted));
        ui.add_space(8.0);
        for benefit in displayed.benefits {
            ui.label(format!("• {benefit}"));
        }
        ui.add_space(8.0);
        let input = result.input_data;
        let values = [
            input.n,
            input.p,
            input.k,
            input.temperature,
            input.humidity,
            input.ph,
            input.rainfall,
        ];
        let rows: Vec<(String, String)> = FormField::ALL
            .into_iter()
            .zip(values)
            .map(|(field, value)| {
                let shown = format!("{value} {}", field.unit());
                (field.label().to_string(), shown.trim_end().to_string())
            })
            .collect();
        key_value_grid(ui, "result_inputs", &rows);
    });
}

fn render_block(ui: &mut Ui, index: usize, block: &SuggestionBlock) {
    let palette = style::palette();
    match block {
        SuggestionBlock::Heading(text) => {
            ui.label(RichText::new(text).size(18.0).strong());
        }
        SuggestionBlock::Paragraph(text) | SuggestionBlock::Fallback(text) => {
            ui.label(text);
        }
        SuggestionBlock::OrderedList { title, items } => {
            ui.label(RichText::new(title).strong().color(palette.accent_wheat));
            for (position, item) in items.iter().enumerate() {
                ui.label(format!("{}. {item}", position + 1));
            }
        }
        SuggestionBlock::KeyValues { title, rows } => {
            ui.label(RichText::new(title).strong().color(palette.accent_wheat));
            key_value_grid(ui, &format!("suggestion_block_{index}"), rows);
        }
    }
    ui.add_space(6.0);
}
