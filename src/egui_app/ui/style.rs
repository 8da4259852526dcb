use eframe::egui::{
    Color32, Stroke, Visuals,
    epaint::{CornerRadius, Shadow},
    style::WidgetVisuals,
};

use crate::dashboard::calendar::MonthMark;
use crate::dashboard::disease::Severity;
use crate::dashboard::prices::Trend;
use crate::egui_app::state::StatusTone;
use crate::result_view::ConfidenceTone;

#[derive(Clone, Copy)]
pub struct Palette {
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,
    pub panel_outline: Color32,
    pub grid_soft: Color32,
    pub text_primary: Color32,
    pub text_muted: Color32,
    pub accent_leaf: Color32,
    pub accent_sky: Color32,
    pub accent_wheat: Color32,
    pub warning: Color32,
    pub danger: Color32,
    pub success: Color32,
}

pub fn palette() -> Palette {
    Palette {
        bg_primary: Color32::from_rgb(14, 17, 14),
        bg_secondary: Color32::from_rgb(24, 29, 25),
        bg_tertiary: Color32::from_rgb(38, 45, 39),
        panel_outline: Color32::from_rgb(46, 56, 48),
        grid_soft: Color32::from_rgb(30, 36, 31),
        text_primary: Color32::from_rgb(214, 222, 210),
        text_muted: Color32::from_rgb(150, 160, 148),
        accent_leaf: Color32::from_rgb(124, 196, 112),
        accent_sky: Color32::from_rgb(140, 196, 236),
        accent_wheat: Color32::from_rgb(222, 190, 120),
        warning: Color32::from_rgb(226, 170, 84),
        danger: Color32::from_rgb(214, 98, 86),
        success: Color32::from_rgb(102, 186, 120),
    }
}

pub fn apply_visuals(visuals: &mut Visuals) {
    let palette = palette();
    visuals.window_fill = palette.bg_primary;
    visuals.panel_fill = palette.bg_secondary;
    visuals.override_text_color = Some(palette.text_primary);
    visuals.hyperlink_color = palette.accent_sky;
    visuals.extreme_bg_color = palette.bg_primary;
    visuals.faint_bg_color = palette.grid_soft;
    visuals.error_fg_color = palette.danger;
    visuals.warn_fg_color = palette.warning;
    visuals.selection.bg_fill = palette.bg_tertiary;
    visuals.selection.stroke = Stroke::new(1.0, palette.accent_leaf);
    visuals.widgets.noninteractive.bg_fill = palette.bg_secondary;
    visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, palette.text_primary);
    set_rounded(&mut visuals.widgets.inactive, palette);
    set_rounded(&mut visuals.widgets.hovered, palette);
    set_rounded(&mut visuals.widgets.active, palette);
    set_rounded(&mut visuals.widgets.open, palette);
    visuals.window_corner_radius = CornerRadius::same(6);
    visuals.menu_corner_radius = CornerRadius::same(4);
    visuals.popup_shadow = Shadow::NONE;
    visuals.button_frame = true;
}

fn set_rounded(vis: &mut WidgetVisuals, palette: Palette) {
    vis.corner_radius = CornerRadius::same(4);
    vis.bg_fill = palette.bg_tertiary;
    vis.weak_bg_fill = palette.grid_soft;
    vis.bg_stroke = Stroke::new(1.0, palette.panel_outline);
    vis.fg_stroke = Stroke::new(1.0, palette.text_primary);
}

pub fn card_stroke() -> Stroke {
    Stroke::new(1.0, palette().panel_outline)
}

pub fn tone_color(tone: StatusTone) -> Color32 {
    let palette = palette();
    match tone {
        StatusTone::Info => palette.accent_sky,
        StatusTone::Success => palette.success,
        StatusTone::Error => palette.danger,
    }
}

pub fn confidence_color(tone: ConfidenceTone) -> Color32 {
    let palette = palette();
    match tone {
        ConfidenceTone::High => palette.success,
        ConfidenceTone::Medium => palette.warning,
        ConfidenceTone::Low => palette.danger,
    }
}

pub fn severity_color(severity: Severity) -> Color32 {
    let palette = palette();
    match severity {
        Severity::High => palette.danger,
        Severity::Medium => palette.warning,
        Severity::Low => palette.success,
    }
}

pub fn trend_color(trend: Trend) -> Color32 {
    let palette = palette();
    match trend {
        Trend::Up => palette.success,
        Trend::Down => palette.danger,
        Trend::Flat => palette.text_muted,
    }
}

pub fn month_fill(mark: MonthMark) -> Color32 {
    let palette = palette();
    match mark {
        MonthMark::Idle => palette.grid_soft,
        MonthMark::Plant => palette.accent_leaf,
        MonthMark::Harvest => palette.accent_wheat,
        MonthMark::Both => palette.accent_sky,
    }
}
