use eframe::egui::{self, RichText, Ui};

use super::{EguiApp, card, section_heading, style};
use crate::history::{HISTORY_COLUMNS, TOP_CROPS, entry_stats, history_cells};
use crate::request_state::RequestPhase;

impl EguiApp {
    pub(super) fn render_history(&mut self, ui: &mut Ui) {
        let palette = style::palette();
        let history = &self.controller.ui.history;
        match history.phase() {
            RequestPhase::Pending if history.value().is_none() => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("Loading history...");
                });
                return;
            }
            RequestPhase::Failed => {
                let mut retry = false;
                card(ui, |ui| {
                    ui.colored_label(palette.danger, history.error().unwrap_or_default());
                    retry = ui.button("Retry").clicked();
                });
                if retry {
                    self.controller.reload_history();
                }
                return;
            }
            _ => {}
        }
        let Some(entries) = history.value() else {
            return;
        };
        if entries.is_empty() {
            ui.label("No predictions yet. Your recommendations will appear here.");
            return;
        }
        card(ui, |ui| {
            section_heading(ui, "Most recommended crops");
            ui.horizontal_wrapped(|ui| {
                for (crop, count) in entry_stats(entries).into_iter().take(TOP_CROPS) {
                    ui.label(
                        RichText::new(format!("{crop}: {count}"))
                            .strong()
                            .color(palette.accent_wheat),
                    );
                    ui.add_space(8.0);
                }
            });
        });
        ui.add_space(12.0);
        card(ui, |ui| {
            section_heading(ui, &format!("Past predictions ({})", entries.len()));
            egui::ScrollArea::horizontal().show(ui, |ui| {
                egui::Grid::new("history_rows")
                    .num_columns(HISTORY_COLUMNS.len())
                    .striped(true)
                    .spacing([16.0, 4.0])
                    .show(ui, |ui| {
                        for heading in HISTORY_COLUMNS {
                            ui.label(RichText::new(heading).color(palette.text_muted));
                        }
                        ui.end_row();
                        for entry in entries {
                            let [when, crop, rest @ ..] = history_cells(entry);
                            ui.label(when);
                            ui.label(RichText::new(crop).strong());
                            for value in rest {
                                ui.label(value);
                            }
                            ui.end_row();
                        }
                    });
            });
        });
    }
}
