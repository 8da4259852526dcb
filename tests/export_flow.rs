mod support;

use agrodesk::api::{ApiClient, PredictionInput, PredictionResult};
use agrodesk::config::{self, AppSettings};
use agrodesk::egui_app::controller::AppController;
use agrodesk::egui_app::state::{Page, StatusTone};
use agrodesk::export::ExportFormat;
use agrodesk::handoff::ResultHandoff;
use serde_json::json;
use support::agrodesk_env::AgrodeskEnvGuard;
use support::stub_backend::{StubBackend, settle};

fn maize() -> PredictionResult {
    PredictionResult {
        crop: "maize".into(),
        confidence: 78.0,
        input_data: PredictionInput {
            n: 20.0,
            p: 60.0,
            k: 20.0,
            temperature: 24.0,
            humidity: 60.0,
            ph: 7.0,
            rainfall: 80.0,
        },
    }
}

/// Controller already showing `maize` with free-text suggestions loaded.
fn result_view(stub: &StubBackend, export_dir: &std::path::Path) -> AppController {
    stub.route(
        "POST",
        "/suggest",
        200,
        json!({"suggestions": "Sow after the first rains.\n\nKeep rows 60 cm apart."}),
    );
    let handoff = ResultHandoff::in_memory();
    handoff.set(&maize()).unwrap();
    let mut controller = AppController::new(
        ApiClient::new(stub.base_url()),
        handoff,
        AppSettings {
            export_dir: Some(export_dir.to_path_buf()),
            ..AppSettings::default()
        },
    );
    controller.navigate(Page::Result);
    settle(&mut controller);
    assert!(controller.ui.result.suggestions.value().is_some());
    controller
}

#[test]
fn json_export_writes_snapshot_locally() {
    let stub = StubBackend::start();
    let dir = tempfile::tempdir().unwrap();
    let mut controller = result_view(&stub, dir.path());

    controller.export_result(ExportFormat::Json);
    settle(&mut controller);

    let path = controller.ui.export.last.value().expect("export path").clone();
    assert_eq!(path, dir.path().join("maize_recommendation.json"));
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(written["crop"], json!("maize"));
    assert_eq!(written["prediction"], json!("maize"));
    assert_eq!(written["inputData"]["P"], json!(60.0));
    assert_eq!(
        written["suggestions"],
        json!("Sow after the first rains.\n\nKeep rows 60 cm apart.")
    );
    assert!(written.get("structured").is_none());
    assert!(stub.requests_to("POST", "/export").is_empty());
    let toast = controller.ui.toasts.latest().expect("toast");
    assert_eq!(toast.tone, StatusTone::Success);
    assert!(toast.text.starts_with("JSON saved to"));
}

#[test]
fn text_export_streams_backend_report() {
    let stub = StubBackend::start();
    stub.route_text("POST", "/export", "MAIZE REPORT\nSow after the first rains.\n");
    let dir = tempfile::tempdir().unwrap();
    let mut controller = result_view(&stub, dir.path());

    controller.export_result(ExportFormat::Text);
    settle(&mut controller);

    let path = dir.path().join("maize_recommendation.txt");
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "MAIZE REPORT\nSow after the first rains.\n"
    );
    let request = stub.wait_for("POST", "/export");
    assert_eq!(request.query, "format=text");
    assert_eq!(request.accept, "text/plain");
    let body = request.json();
    assert_eq!(body["crop"], json!("maize"));
    assert_eq!(body["inputData"]["rainfall"], json!(80.0));
}

#[test]
fn failed_text_export_raises_alert_and_leaves_no_file() {
    let stub = StubBackend::start();
    stub.route("POST", "/export", 500, json!({"error": "renderer down"}));
    let dir = tempfile::tempdir().unwrap();
    let mut controller = result_view(&stub, dir.path());

    controller.export_result(ExportFormat::Text);
    settle(&mut controller);

    let alert = controller.ui.alert.clone().expect("alert raised");
    assert_eq!(alert.title, "Export failed");
    assert!(alert.message.contains("renderer down"));
    assert!(!dir.path().join("maize_recommendation.txt").exists());
    controller.dismiss_alert();
    assert!(controller.ui.alert.is_none());
}

#[test]
fn loaded_controller_persists_choices_to_config() {
    let stub = StubBackend::start();
    let home = tempfile::tempdir().unwrap();
    let _env = AgrodeskEnvGuard::set_config_home(home.path().to_path_buf());
    let path = config::config_path().unwrap();
    config::save_to_path(
        &AppSettings {
            api_base: Some(stub.base_url().to_string()),
            ..AppSettings::default()
        },
        &path,
    )
    .unwrap();

    let mut controller = AppController::load().unwrap();
    controller.navigate(Page::Form);
    controller.select_language("hi").unwrap();
    let exports = home.path().join("reports");
    controller.set_export_dir(exports.clone());

    let saved = config::load_from(&path).unwrap();
    assert_eq!(saved.language.as_deref(), Some("hi"));
    assert_eq!(saved.export_dir, Some(exports));
    assert!(controller.select_language("xx").is_err());
}
