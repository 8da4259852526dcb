mod support;

use agrodesk::api::ApiClient;
use agrodesk::config::AppSettings;
use agrodesk::crop_form::{FormField, FormPhase, PREDICTION_FAILED_MESSAGE};
use agrodesk::egui_app::controller::AppController;
use agrodesk::egui_app::state::{Page, StatusTone};
use agrodesk::handoff::ResultHandoff;
use agrodesk::request_state::RequestPhase;
use agrodesk::suggestions::SuggestionPayload;
use serde_json::json;
use support::stub_backend::{StubBackend, settle};

fn controller_for(stub: &StubBackend) -> AppController {
    AppController::new(
        ApiClient::new(stub.base_url()),
        ResultHandoff::in_memory(),
        AppSettings::default(),
    )
}

fn fill_form(controller: &mut AppController) {
    let values = ["90", "42", "43", "20.8", "82", "6.5", "202.9"];
    for (field, value) in FormField::ALL.into_iter().zip(values) {
        controller.ui.form.fields.set(field, value);
    }
}

#[test]
fn successful_prediction_opens_result_with_suggestions() {
    let stub = StubBackend::start();
    stub.route("POST", "/predict", 200, json!({"crop": "rice", "confidence": 91.5}));
    stub.route("POST", "/history", 200, json!({"ok": true}));
    stub.route(
        "POST",
        "/suggest",
        200,
        json!({"structured": {
            "crop": "rice",
            "reason": "Warm and wet conditions",
            "cultivation_steps": ["Puddle the field", "Transplant seedlings"]
        }}),
    );
    let mut controller = controller_for(&stub);
    controller.navigate(Page::Form);
    fill_form(&mut controller);

    controller.submit_form();
    settle(&mut controller);

    assert_eq!(controller.page(), Page::Result);
    let displayed = controller.ui.result.displayed().expect("result shown");
    assert_eq!(displayed.result.crop, "rice");
    assert_eq!(displayed.result.confidence, 91.5);
    assert_eq!(displayed.result.input_data.rainfall, 202.9);
    let stored = controller.handoff().get().unwrap().expect("handoff written");
    assert_eq!(stored.crop, "rice");

    let suggestions = &controller.ui.result.suggestions;
    assert_eq!(suggestions.phase(), RequestPhase::Succeeded);
    assert!(matches!(
        suggestions.value().map(|s| s.payload()),
        Some(SuggestionPayload::Structured(_))
    ));

    let predict = stub.wait_for("POST", "/predict");
    assert_eq!(predict.accept, "application/json");
    let predict = predict.json();
    assert_eq!(predict["N"], json!(90.0));
    assert_eq!(predict["ph"], json!(6.5));
    let suggest = stub.wait_for("POST", "/suggest").json();
    assert_eq!(suggest["prediction"], json!("rice"));
    assert_eq!(suggest["rainfall"], json!(202.9));
    let history = stub.wait_for("POST", "/history").json();
    assert_eq!(history["prediction"], json!("rice"));
    assert_eq!(history["confidence"], json!(91.5));
    assert_eq!(history["input"]["K"], json!(43.0));
}

#[test]
fn backend_error_keeps_form_and_handoff_untouched() {
    let stub = StubBackend::start();
    stub.route("POST", "/predict", 500, json!({"error": "model offline"}));
    let mut controller = controller_for(&stub);
    controller.navigate(Page::Form);
    fill_form(&mut controller);

    controller.submit_form();
    settle(&mut controller);

    assert_eq!(controller.page(), Page::Form);
    assert_eq!(controller.ui.form.phase(), FormPhase::Editing);
    assert_eq!(controller.ui.form.fields.value(FormField::Humidity), "82");
    let toast = controller.ui.toasts.latest().expect("toast");
    assert_eq!(toast.text, PREDICTION_FAILED_MESSAGE);
    assert_eq!(toast.tone, StatusTone::Error);
    assert!(controller.handoff().get().unwrap().is_none());
    assert!(stub.requests_to("POST", "/history").is_empty());
}

#[test]
fn sensor_import_fills_reported_fields_only() {
    let stub = StubBackend::start();
    stub.route(
        "GET",
        "/thingspeak/latest",
        200,
        json!({"N": 80, "temperature": 25.5, "humidity": null}),
    );
    let mut controller = controller_for(&stub);
    controller.navigate(Page::Form);
    controller.ui.form.fields.set(FormField::Humidity, "70");

    controller.open_sensor_prompt();
    let prompt = controller.ui.form.sensor_prompt.as_mut().expect("prompt open");
    prompt.channel_id = " 1234 ".into();
    prompt.api_key = "READKEY".into();
    controller.confirm_sensor_prompt();
    settle(&mut controller);

    let fields = &controller.ui.form.fields;
    assert_eq!(fields.value(FormField::Nitrogen), "80");
    assert_eq!(fields.value(FormField::Temperature), "25.5");
    assert_eq!(fields.value(FormField::Humidity), "70");
    assert_eq!(fields.value(FormField::Rainfall), "");
    assert_eq!(
        controller.ui.toasts.latest().map(|toast| toast.tone),
        Some(StatusTone::Success)
    );

    let request = stub.wait_for("GET", "/thingspeak/latest");
    assert!(request.query.contains("channelId=1234"));
    assert!(request.query.contains("apiKey=READKEY"));
    assert_eq!(controller.settings().sensor_channel_id.as_deref(), Some("1234"));

    controller.open_sensor_prompt();
    let prompt = controller.ui.form.sensor_prompt.as_ref().expect("prompt open");
    assert_eq!(prompt.channel_id, "1234");
    assert!(prompt.api_key.is_empty());
}

#[test]
fn sensor_import_accepts_numeric_strings() {
    let stub = StubBackend::start();
    stub.route(
        "GET",
        "/thingspeak/latest",
        200,
        json!({"N": "80", "temperature": "25.5", "ph": "n/a"}),
    );
    let mut controller = controller_for(&stub);
    controller.navigate(Page::Form);
    controller.ui.form.fields.set(FormField::Ph, "6.8");

    controller.open_sensor_prompt();
    let prompt = controller.ui.form.sensor_prompt.as_mut().expect("prompt open");
    prompt.channel_id = "1234".into();
    prompt.api_key = "READKEY".into();
    controller.confirm_sensor_prompt();
    settle(&mut controller);

    let fields = &controller.ui.form.fields;
    assert_eq!(fields.value(FormField::Nitrogen), "80");
    assert_eq!(fields.value(FormField::Temperature), "25.5");
    assert_eq!(fields.value(FormField::Ph), "6.8");
    assert_eq!(
        controller.ui.toasts.latest().map(|toast| toast.tone),
        Some(StatusTone::Success)
    );
}

#[test]
fn sensor_failure_reports_backend_message() {
    let stub = StubBackend::start();
    stub.route(
        "GET",
        "/thingspeak/latest",
        502,
        json!({"error": "Channel not found"}),
    );
    let mut controller = controller_for(&stub);
    controller.navigate(Page::Form);
    controller.open_sensor_prompt();
    let prompt = controller.ui.form.sensor_prompt.as_mut().expect("prompt open");
    prompt.channel_id = "1".into();
    prompt.api_key = "K".into();
    controller.confirm_sensor_prompt();
    settle(&mut controller);

    let toast = controller.ui.toasts.latest().expect("toast");
    assert_eq!(toast.title, "ThingSpeak Error");
    assert_eq!(toast.text, "Channel not found");
}

#[test]
fn history_view_lists_entries_with_configured_limit() {
    let stub = StubBackend::start();
    stub.route(
        "GET",
        "/history",
        200,
        json!({"history": [
            {
                "id": 2,
                "timestamp": "2024-05-02T08:30:00Z",
                "input": {"N": 90, "P": 42, "K": 43, "temperature": 20.8,
                          "humidity": 82, "ph": 6.5, "rainfall": 202.9},
                "prediction": "rice",
                "confidence": 92.0
            },
            {
                "id": "a1",
                "timestamp": "2024-05-01T08:30:00Z",
                "input": {"N": 20, "P": 60, "K": 20, "temperature": 24,
                          "humidity": 60, "ph": 7, "rainfall": 80},
                "prediction": "maize",
                "confidence": 71.0
            }
        ]}),
    );
    let mut controller = AppController::new(
        ApiClient::new(stub.base_url()),
        ResultHandoff::in_memory(),
        AppSettings {
            history_limit: 7,
            ..AppSettings::default()
        },
    );

    controller.navigate(Page::History);
    settle(&mut controller);

    let entries = controller.ui.history.value().expect("history loaded");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[1].prediction, "maize");
    assert_eq!(stub.wait_for("GET", "/history").query, "limit=7");
}

#[test]
fn history_view_keeps_rows_with_missing_values() {
    let stub = StubBackend::start();
    stub.route(
        "GET",
        "/history",
        200,
        json!({"history": [
            {"id": 1, "timestamp": "2024-05-02T08:30:00Z", "prediction": "rice",
             "input": {"N": 90, "ph": 6.5}},
            {"id": 2, "prediction": "maize", "confidence": 71.0, "input": null}
        ]}),
    );
    let mut controller = controller_for(&stub);

    controller.navigate(Page::History);
    settle(&mut controller);

    assert_eq!(controller.ui.history.phase(), RequestPhase::Succeeded);
    let entries = controller.ui.history.value().expect("history loaded");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].confidence, None);
    assert_eq!(entries[0].input.n, Some(90.0));
    assert_eq!(entries[0].input.rainfall, None);
    assert_eq!(entries[1].confidence, Some(71.0));
    assert_eq!(entries[1].input.ph, None);
}

#[test]
fn weather_refresh_flattens_reply() {
    let stub = StubBackend::start();
    stub.route(
        "GET",
        "/weather",
        200,
        json!({"location": "Coimbatore", "current": {"temp_c": 31}}),
    );
    let mut controller = controller_for(&stub);
    controller.refresh_weather();
    settle(&mut controller);

    let report = controller.ui.weather.value().expect("weather loaded");
    assert!(report.rows.contains(&("Location".to_string(), "Coimbatore".to_string())));
    assert_eq!(report.rows.len(), 2);
}
