use std::thread;
use std::time::{Duration, Instant};

use super::*;
use crate::api::{PredictionInput, PredictionResult};
use crate::crop_form::{FormField, FormPhase, INCOMPLETE_MESSAGE, PREDICTION_FAILED_MESSAGE};
use crate::dashboard::DashboardTab;
use crate::egui_app::state::{Page, StatusTone};
use crate::request_state::RequestPhase;
use crate::result_view::ResultPhase;

/// Nothing listens on the discard port, so every request fails fast.
const UNREACHABLE: &str = "http://127.0.0.1:9";

fn controller() -> AppController {
    AppController::new(
        ApiClient::new(UNREACHABLE),
        ResultHandoff::in_memory(),
        AppSettings::default(),
    )
}

fn wait_for_jobs(controller: &mut AppController) {
    let deadline = Instant::now() + Duration::from_secs(20);
    while controller.is_busy() && Instant::now() < deadline {
        controller.poll_background_jobs();
        thread::sleep(Duration::from_millis(10));
    }
    assert!(!controller.is_busy(), "jobs did not finish in time");
}

fn fill_form(controller: &mut AppController) {
    for (field, value) in FormField::ALL.into_iter().zip(["90", "42", "43", "20.8", "82", "6.5", "202.9"]) {
        controller.ui.form.fields.set(field, value);
    }
}

fn sample_result() -> PredictionResult {
    PredictionResult {
        crop: "rice".into(),
        confidence: 92.0,
        input_data: PredictionInput {
            n: 90.0,
            p: 42.0,
            k: 43.0,
            temperature: 20.8,
            humidity: 82.0,
            ph: 6.5,
            rainfall: 202.9,
        },
    }
}

#[test]
fn incomplete_form_is_not_sent() {
    let mut controller = controller();
    controller.navigate(Page::Form);
    controller.ui.form.fields.set(FormField::Nitrogen, "90");
    controller.submit_form();
    assert!(!controller.is_busy());
    assert_eq!(controller.ui.form.invalid_field, Some(FormField::Phosphorus));
    let toast = controller.ui.toasts.latest().unwrap();
    assert_eq!(toast.text, INCOMPLETE_MESSAGE);
    assert_eq!(toast.tone, StatusTone::Error);
    assert_eq!(controller.ui.form.fields.value(FormField::Nitrogen), "90");
}

#[test]
fn failed_prediction_keeps_form_editable() {
    let mut controller = controller();
    controller.navigate(Page::Form);
    fill_form(&mut controller);
    controller.submit_form();
    assert_eq!(controller.ui.form.phase(), FormPhase::Submitting);
    wait_for_jobs(&mut controller);
    assert_eq!(controller.ui.form.phase(), FormPhase::Editing);
    assert_eq!(controller.page(), Page::Form);
    assert_eq!(
        controller.ui.toasts.latest().map(|toast| toast.text.as_str()),
        Some(PREDICTION_FAILED_MESSAGE)
    );
    assert_eq!(controller.handoff().get().unwrap(), None);
    assert_eq!(controller.ui.form.fields.value(FormField::Rainfall), "202.9");
}

#[test]
fn result_without_handoff_redirects_to_form() {
    let mut controller = controller();
    controller.navigate(Page::Result);
    assert_eq!(controller.page(), Page::Form);
    assert!(controller.translation().is_mounted_in("form"));
    assert!(!controller.is_busy());
}

#[test]
fn leaving_result_discards_late_suggestions() {
    let mut controller = controller();
    controller.handoff().set(&sample_result()).unwrap();
    controller.navigate(Page::Result);
    assert_eq!(controller.page(), Page::Result);
    assert!(controller.ui.result.suggestions.is_pending());
    controller.navigate(Page::Landing);
    wait_for_jobs(&mut controller);
    assert_eq!(controller.ui.result.suggestions.phase(), RequestPhase::Idle);
    assert_eq!(*controller.ui.result.phase(), ResultPhase::AwaitingResult);
}

#[test]
fn suggestion_failure_is_shown_inline() {
    let mut controller = controller();
    controller.handoff().set(&sample_result()).unwrap();
    controller.navigate(Page::Result);
    wait_for_jobs(&mut controller);
    assert_eq!(controller.ui.result.suggestions.phase(), RequestPhase::Failed);
    assert!(controller.ui.toasts.items.is_empty());
    assert!(controller.ui.result.displayed().is_some());
}

#[test]
fn retry_clears_handoff_and_returns_to_form() {
    let mut controller = controller();
    controller.handoff().set(&sample_result()).unwrap();
    controller.navigate(Page::Result);
    controller.retry_recommendation();
    assert_eq!(controller.page(), Page::Form);
    assert_eq!(controller.handoff().get().unwrap(), None);
    wait_for_jobs(&mut controller);
    controller.navigate(Page::Landing);
    controller.navigate(Page::Result);
    assert_eq!(controller.page(), Page::Form);
}

#[test]
fn tool_input_errors_are_reported_without_a_request() {
    let mut controller = controller();
    controller.navigate(Page::Dashboard);
    controller.select_tab(DashboardTab::Fertilizer);
    controller.submit_fertilizer();
    assert!(!controller.is_busy());
    assert_eq!(
        controller.ui.toasts.latest().map(|toast| toast.text.as_str()),
        Some("Current N must be a number")
    );
    controller.send_chat();
    assert!(!controller.is_busy());
    assert!(controller.ui.dashboard.chat.transcript().is_empty());
}

#[test]
fn chat_failure_is_appended_and_notified() {
    let mut controller = controller();
    controller.navigate(Page::Dashboard);
    controller.ui.dashboard.chat.draft = "hello".into();
    controller.send_chat();
    assert!(controller.ui.dashboard.is_loading());
    wait_for_jobs(&mut controller);
    assert!(!controller.ui.dashboard.is_loading());
    let transcript = controller.ui.dashboard.chat.transcript();
    assert_eq!(transcript.len(), 2);
    assert!(transcript[1].content.starts_with("Error: "));
    assert_eq!(
        controller.ui.toasts.latest().map(|toast| toast.title.as_str()),
        Some("Chat Error")
    );
}

#[test]
fn selector_follows_views() {
    let mut controller = controller();
    controller.navigate(Page::Dashboard);
    assert!(controller.translation().is_mounted_in("dashboard"));
    controller.navigate(Page::Landing);
    assert_eq!(controller.translation().host(), None);
    controller.select_language("ta").unwrap();
    assert_eq!(controller.settings().language.as_deref(), Some("ta"));
    assert!(controller.select_language("xx").is_err());
}

#[test]
fn sensor_prompt_starts_without_credentials() {
    let mut controller = controller();
    controller.navigate(Page::Form);
    controller.open_sensor_prompt();
    let prompt = controller.ui.form.sensor_prompt.clone().unwrap();
    assert!(prompt.channel_id.is_empty());
    assert!(prompt.api_key.is_empty());
    controller.confirm_sensor_prompt();
    assert!(!controller.is_busy());
    assert!(controller.ui.form.sensor_prompt.is_none());
}
