use eframe::egui::{self, Align2, Area, Frame, Id, Margin, Modal, Order, RichText, TextEdit};

use super::{EguiApp, style};

impl EguiApp {
    pub(super) fn render_sensor_prompt(&mut self, ctx: &egui::Context) {
        let Some(prompt) = self.controller.ui.form.sensor_prompt.as_mut() else {
            return;
        };
        let mut confirm = false;
        let mut cancel = false;
        let modal = Modal::new(Id::new("sensor_prompt")).show(ctx, |ui| {
            ui.set_width(320.0);
            ui.heading("Load from ThingSpeak");
            ui.add_space(8.0);
            egui::Grid::new("sensor_prompt_grid")
                .num_columns(2)
                .show(ui, |ui| {
                    ui.label("Channel ID");
                    ui.add(TextEdit::singleline(&mut prompt.channel_id));
                    ui.end_row();
                    ui.label("Read API key");
                    ui.add(TextEdit::singleline(&mut prompt.api_key).password(true));
                    ui.end_row();
                });
            ui.add_space(8.0);
            ui.horizontal(|ui| {
                confirm = ui.button("Load").clicked();
                cancel = ui.button("Cancel").clicked();
            });
        });
        if confirm {
            self.controller.confirm_sensor_prompt();
        } else if cancel || modal.should_close() {
            self.controller.cancel_sensor_prompt();
        }
    }

    /// Blocking message; nothing else is interactive until it is dismissed.
    pub(super) fn render_alert(&mut self, ctx: &egui::Context) {
        let Some(alert) = self.controller.ui.alert.clone() else {
            return;
        };
        let mut dismiss = false;
        Modal::new(Id::new("alert")).show(ctx, |ui| {
            ui.set_width(360.0);
            ui.label(
                RichText::new(&alert.title)
                    .strong()
                    .size(16.0)
                    .color(style::palette().danger),
            );
            ui.add_space(6.0);
            ui.label(&alert.message);
            ui.add_space(8.0);
            dismiss = ui.button("OK").clicked();
        });
        if dismiss {
            self.controller.dismiss_alert();
        }
    }

    pub(super) fn render_toasts(&mut self, ctx: &egui::Context) {
        if self.controller.ui.toasts.items.is_empty() {
            return;
        }
        let palette = style::palette();
        let mut dismissed = None;
        Area::new(Id::new("toasts"))
            .anchor(Align2::RIGHT_BOTTOM, [-12.0, -12.0])
            .order(Order::Foreground)
            .show(ctx, |ui| {
                for (index, toast) in self.controller.ui.toasts.items.iter().enumerate() {
                    Frame::new()
                        .fill(palette.bg_tertiary)
                        .stroke(egui::Stroke::new(1.0, toast.accent))
                        .inner_margin(Margin::same(10))
                        .show(ui, |ui| {
                            ui.set_max_width(320.0);
                            ui.horizontal(|ui| {
                                ui.label(
                                    RichText::new(&toast.title)
                                        .strong()
                                        .color(toast.accent),
                                );
                                if ui.small_button("x").clicked() {
                                    dismissed = Some(index);
                                }
                            });
                            ui.label(&toast.text);
                        });
                    ui.add_space(6.0);
                }
            });
        if let Some(index) = dismissed {
            self.controller.dismiss_toast(index);
        }
    }
}
