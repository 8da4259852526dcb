use eframe::egui::{self, ComboBox, RichText, TextEdit, Ui, vec2};

use super::{EguiApp, card, key_value_grid, request_status, section_heading, style};
use crate::dashboard::calendar::{CropCalendar, MONTHS};
use crate::dashboard::chat::ChatRole;
use crate::dashboard::disease::DiseaseReport;
use crate::dashboard::irrigation::SoilType;
use crate::dashboard::yield_predictor::SoilQuality;
use crate::dashboard::{DashboardTab, fixed, or_na};

fn text_row(ui: &mut Ui, label: &str, value: &mut String, hint: &str) {
    ui.label(label);
    ui.add(TextEdit::singleline(value).hint_text(hint).desired_width(160.0));
    ui.end_row();
}

fn submit_button(ui: &mut Ui, loading: bool, label: &str) -> bool {
    ui.add_enabled(!loading, egui::Button::new(label)).clicked()
}

impl EguiApp {
    pub(super) fn render_dashboard(&mut self, ui: &mut Ui) {
        ui.horizontal_wrapped(|ui| {
            let active = self.controller.ui.dashboard.active;
            for tab in DashboardTab::ALL {
                if ui.selectable_label(active == tab, tab.label()).clicked() {
                    self.controller.select_tab(tab);
                }
            }
            if self.controller.ui.dashboard.is_loading() {
                ui.spinner();
            }
        });
        ui.add_space(12.0);
        card(ui, |ui| match self.controller.ui.dashboard.active {
            DashboardTab::Fertilizer => self.render_fertilizer(ui),
            DashboardTab::Yield => self.render_yield(ui),
            DashboardTab::Irrigation => self.render_irrigation(ui),
            DashboardTab::Calendar => self.render_calendar(ui),
            DashboardTab::Prices => self.render_prices(ui),
            DashboardTab::Chat => self.render_chat(ui),
            DashboardTab::Disease => self.render_disease(ui),
        });
    }

    fn render_fertilizer(&mut self, ui: &mut Ui) {
        section_heading(ui, DashboardTab::Fertilizer.label());
        let loading = self.controller.ui.dashboard.is_loading();
        let form = &mut self.controller.ui.dashboard.fertilizer.form;
        egui::Grid::new("fertilizer_form").num_columns(2).show(ui, |ui| {
            text_row(ui, "Current N (kg/ha)", &mut form.n, "e.g. 40");
            text_row(ui, "Current P (kg/ha)", &mut form.p, "e.g. 20");
            text_row(ui, "Current K (kg/ha)", &mut form.k, "e.g. 30");
            text_row(ui, "Area (hectares)", &mut form.area, "e.g. 2");
            text_row(ui, "Crop", &mut form.crop, "rice");
        });
        if submit_button(ui, loading, "Calculate") {
            self.controller.submit_fertilizer();
        }
        let plan = &self.controller.ui.dashboard.fertilizer.plan;
        request_status(ui, plan);
        let Some(plan) = plan.value() else {
            return;
        };
        ui.add_space(8.0);
        let needs = &plan.requirements_kg;
        let rows = vec![
            ("Area".to_string(), format!("{} ha", or_na(plan.area_hectares))),
            ("Urea".to_string(), format!("{} kg", fixed(needs.urea, 1))),
            ("DAP".to_string(), format!("{} kg", fixed(needs.dap, 1))),
            (
                "Muriate of potash".to_string(),
                format!("{} kg", fixed(needs.muriate_potash, 1)),
            ),
            (
                "Current N / P / K".to_string(),
                format!(
                    "{} / {} / {}",
                    or_na(plan.current_npk.n),
                    or_na(plan.current_npk.p),
                    or_na(plan.current_npk.k)
                ),
            ),
            (
                "Target N / P / K".to_string(),
                format!(
                    "{} / {} / {}",
                    or_na(plan.target_npk.n),
                    or_na(plan.target_npk.p),
                    or_na(plan.target_npk.k)
                ),
            ),
        ];
        key_value_grid(ui, "fertilizer_plan", &rows);
    }

    fn render_yield(&mut self, ui: &mut Ui) {
        section_heading(ui, DashboardTab::Yield.label());
        let loading = self.controller.ui.dashboard.is_loading();
        let form = &mut self.controller.ui.dashboard.yield_tool.form;
        egui::Grid::new("yield_form").num_columns(2).show(ui, |ui| {
            text_row(ui, "Crop", &mut form.crop, "wheat");
            text_row(ui, "Area (hectares)", &mut form.area, "e.g. 3");
            ui.label("Soil quality");
            ComboBox::from_id_salt("yield_soil_quality")
                .selected_text(form.soil_quality.label())
                .show_ui(ui, |ui| {
                    for quality in SoilQuality::ALL {
                        ui.selectable_value(&mut form.soil_quality, quality, quality.label());
                    }
                });
            ui.end_row();
            text_row(ui, "N (kg/ha)", &mut form.n, "e.g. 80");
            text_row(ui, "P (kg/ha)", &mut form.p, "e.g. 40");
            text_row(ui, "K (kg/ha)", &mut form.k, "e.g. 40");
        });
        if submit_button(ui, loading, "Predict Yield") {
            self.controller.submit_yield();
        }
        let estimate = &self.controller.ui.dashboard.yield_tool.estimate;
        request_status(ui, estimate);
        let Some(estimate) = estimate.value() else {
            return;
        };
        ui.add_space(8.0);
        let factors = estimate.factors.clone().unwrap_or_default();
        let rows = vec![
            (
                "Predicted yield".to_string(),
                format!("{} tonnes", fixed(estimate.predicted_yield_tonnes, 2)),
            ),
            (
                "Yield per hectare".to_string(),
                format!("{} t/ha", fixed(estimate.yield_per_hectare, 2)),
            ),
            ("Area".to_string(), format!("{} ha", or_na(estimate.area_hectares))),
            ("Confidence".to_string(), format!("{}%", or_na(estimate.confidence))),
            ("Soil quality".to_string(), or_na(factors.soil_quality)),
            ("NPK adjustment".to_string(), fixed(factors.npk_adjustment, 2)),
        ];
        key_value_grid(ui, "yield_estimate", &rows);
    }

    fn render_irrigation(&mut self, ui: &mut Ui) {
        section_heading(ui, DashboardTab::Irrigation.label());
        let loading = self.controller.ui.dashboard.is_loading();
        let form = &mut self.controller.ui.dashboard.irrigation.form;
        egui::Grid::new("irrigation_form").num_columns(2).show(ui, |ui| {
            text_row(ui, "Crop", &mut form.crop, "corn");
            ui.label("Soil type");
            ComboBox::from_id_salt("irrigation_soil_type")
                .selected_text(form.soil_type.label())
                .show_ui(ui, |ui| {
                    for soil in SoilType::ALL {
                        ui.selectable_value(&mut form.soil_type, soil, soil.label());
                    }
                });
            ui.end_row();
            text_row(ui, "Recent rainfall (mm)", &mut form.rainfall, "e.g. 120");
        });
        if submit_button(ui, loading, "Get Schedule") {
            self.controller.submit_irrigation();
        }
        let schedule = &self.controller.ui.dashboard.irrigation.schedule;
        request_status(ui, schedule);
        let Some(plan) = schedule.value() else {
            return;
        };
        ui.add_space(8.0);
        let base = plan.schedule.base;
        let mut rows = vec![
            (
                "Water every".to_string(),
                format!("{} days", or_na(base.frequency_days)),
            ),
            ("Amount".to_string(), format!("{} mm", or_na(base.amount_mm))),
        ];
        for (stage, watering) in &plan.schedule.stages {
            rows.push((
                stage.replace('_', " "),
                format!(
                    "every {} days, {} mm",
                    or_na(watering.frequency_days),
                    or_na(watering.amount_mm)
                ),
            ));
        }
        if let Some(adjustments) = &plan.adjustments {
            rows.push(("Soil".to_string(), or_na(adjustments.soil_type.clone())));
            rows.push((
                "Rainfall impact".to_string(),
                or_na(adjustments.rainfall_impact.clone()),
            ));
        }
        key_value_grid(ui, "irrigation_plan", &rows);
    }

    fn render_calendar(&mut self, ui: &mut Ui) {
        section_heading(ui, DashboardTab::Calendar.label());
        let loading = self.controller.ui.dashboard.is_loading();
        let tool = &mut self.controller.ui.dashboard.calendar;
        ui.horizontal(|ui| {
            ui.label("Crop");
            ui.add(
                TextEdit::singleline(&mut tool.crop)
                    .hint_text("leave empty for all crops")
                    .desired_width(200.0),
            );
        });
        let label = tool.button_label();
        if submit_button(ui, loading, &label) {
            self.controller.submit_calendar();
        }
        let calendars = &self.controller.ui.dashboard.calendar.calendars;
        request_status(ui, calendars);
        let Some(view) = calendars.value() else {
            return;
        };
        if view.calendars.is_empty() {
            ui.label(view.empty_message());
            return;
        }
        for calendar in &view.calendars {
            ui.add_space(8.0);
            render_crop_calendar(ui, calendar);
        }
    }

    fn render_prices(&mut self, ui: &mut Ui) {
        section_heading(ui, DashboardTab::Prices.label());
        let loading = self.controller.ui.dashboard.is_loading();
        if submit_button(ui, loading, "Refresh Prices") {
            self.controller.refresh_prices();
        }
        let board = &self.controller.ui.dashboard.prices.board;
        request_status(ui, board);
        let Some(board) = board.value() else {
            return;
        };
        egui::Grid::new("price_board")
            .num_columns(3)
            .striped(true)
            .spacing([24.0, 4.0])
            .show(ui, |ui| {
                for (crop, price) in &board.prices {
                    ui.label(RichText::new(crop).strong());
                    ui.label(price.price_text());
                    ui.colored_label(style::trend_color(price.trend()), price.change_text());
                    ui.end_row();
                }
            });
        if let Some(updated) = &board.last_updated {
            ui.label(
                RichText::new(format!("Last updated: {updated}"))
                    .small()
                    .color(style::palette().text_muted),
            );
        }
    }

    fn render_chat(&mut self, ui: &mut Ui) {
        section_heading(ui, DashboardTab::Chat.label());
        let palette = style::palette();
        egui::ScrollArea::vertical()
            .id_salt("chat_transcript")
            .max_height(320.0)
            .stick_to_bottom(true)
            .show(ui, |ui| {
                for message in self.controller.ui.dashboard.chat.transcript() {
                    let (who, color) = match message.role {
                        ChatRole::User => ("You", palette.accent_sky),
                        ChatRole::Assistant => ("Assistant", palette.accent_leaf),
                    };
                    ui.label(RichText::new(who).strong().color(color));
                    ui.label(&message.content);
                    ui.add_space(6.0);
                }
            });
        let loading = self.controller.ui.dashboard.is_loading();
        let mut send = false;
        ui.horizontal(|ui| {
            let width = ui.available_width() - 80.0;
            let response = ui.add(
                TextEdit::singleline(&mut self.controller.ui.dashboard.chat.draft)
                    .hint_text("Ask about crops, soil or pests")
                    .desired_width(width),
            );
            let entered =
                response.lost_focus() && ui.input(|input| input.key_pressed(egui::Key::Enter));
            send = submit_button(ui, loading, "Send") || (entered && !loading);
        });
        if send {
            self.controller.send_chat();
        }
    }

    fn render_disease(&mut self, ui: &mut Ui) {
        section_heading(ui, DashboardTab::Disease.label());
        let loading = self.controller.ui.dashboard.is_loading();
        ui.horizontal(|ui| {
            if submit_button(ui, loading, "Upload plant photo") {
                self.controller.pick_disease_image();
            }
            if ui.button("Clear").clicked() {
                self.controller.clear_disease();
            }
        });
        let tool = &self.controller.ui.dashboard.disease;
        if let Some(path) = &tool.image_path {
            ui.label(RichText::new(path.display().to_string()).small());
        }
        request_status(ui, &tool.diagnosis);
        if let Some(report) = tool.diagnosis.value() {
            render_diagnosis(ui, report);
        }
    }
}

fn render_crop_calendar(ui: &mut Ui, calendar: &CropCalendar) {
    let palette = style::palette();
    ui.label(RichText::new(&calendar.crop).strong().size(15.0));
    let rows = vec![
        ("Season".to_string(), or_na(calendar.season.clone())),
        ("Duration".to_string(), or_na(calendar.duration_days.clone())),
        ("Planting".to_string(), calendar.planting_text()),
        ("Harvesting".to_string(), calendar.harvesting_text()),
    ];
    key_value_grid(ui, &format!("calendar_{}", calendar.crop), &rows);
    ui.horizontal(|ui| {
        for (month, mark) in MONTHS.iter().zip(calendar.grid) {
            egui::Frame::new()
                .fill(style::month_fill(mark))
                .inner_margin(egui::Margin::same(4))
                .show(ui, |ui| {
                    ui.set_min_size(vec2(34.0, 18.0));
                    ui.label(RichText::new(*month).small().color(palette.bg_primary))
                        .on_hover_text(mark.label());
                });
        }
    });
}

fn render_diagnosis(ui: &mut Ui, report: &DiseaseReport) {
    let palette = style::palette();
    let title_color = if report.is_healthy() {
        palette.success
    } else {
        report
            .severity()
            .map(style::severity_color)
            .unwrap_or(palette.warning)
    };
    ui.add_space(8.0);
    ui.label(RichText::new(report.title()).strong().size(18.0).color(title_color));
    let mut rows = Vec::new();
    if let Some(confidence) = report.confidence_text() {
        rows.push(("Confidence".to_string(), confidence));
    }
    if let Some(severity) = &report.severity {
        rows.push(("Severity".to_string(), severity.clone()));
    }
    if let Some(treatment) = &report.treatment {
        rows.push(("Treatment".to_string(), treatment.clone()));
    }
    if let Some(prevention) = &report.prevention {
        rows.push(("Prevention".to_string(), prevention.clone()));
    }
    key_value_grid(ui, "diagnosis_rows", &rows);
    if !report.symptoms().is_empty() {
        ui.label(RichText::new("Symptoms").strong());
        for symptom in report.symptoms() {
            ui.label(format!("• {symptom}"));
        }
    }
    if let Some(analysis) = report.raw_analysis() {
        ui.add_space(6.0);
        ui.label(RichText::new("Analysis").strong());
        ui.label(analysis);
    }
}
