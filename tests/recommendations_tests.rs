//! Recommendations viewer against the doubly-wrapped API payload

use ecoplot_client::{recommendations, EcoPlotError, MaintenanceAction};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

mod common;
use common::MockEcoPlotServer;

#[tokio::test]
async fn bundle_renders_all_sections() {
    let mock = MockEcoPlotServer::start_empty().await;
    mock.mount_ok(
        "/api/recommendations",
        json!({"success": true, "recommendations": {
            "success": true,
            "recommendations": {
                "estimated_monthly_savings": 42.5,
                "carbon_reduction_potential": 1234.5,
                "overall_recommendations": ["Shift flexible loads to midday"],
                "device_recommendations": {
                    "4": {"name": "Wallbox", "recommendation": "Charge after 22:00",
                          "estimated_savings": 18.0},
                },
                "schedule_optimization": ["Run the dishwasher at 23:00"],
                "energy_saving_tips": ["Lower standby drain with a switched socket"],
            },
        }}),
    )
    .await;

    let view = recommendations::load(&mock.client()).await.unwrap();

    assert_eq!(view.monthly_savings, "$42.5");
    assert_eq!(view.carbon_reduction, "1,234.5");
    assert_eq!(view.total_energy_savings, "18 kWh");
    assert!(view.overall_html.contains("midday"));
    assert!(view.device_cards_html.contains("Wallbox"));
    assert!(view.device_cards_html.contains("Save 18 kWh/month"));
    assert!(view.schedule_html.contains("23:00"));
    assert!(view.tips_html.contains("standby"));
}

#[tokio::test]
async fn inner_envelope_failure_surfaces_its_error() {
    let mock = MockEcoPlotServer::start_empty().await;
    mock.mount_ok(
        "/api/recommendations",
        json!({"success": true, "recommendations": {
            "success": false,
            "error": "recommendation engine unavailable",
        }}),
    )
    .await;

    let err = recommendations::load(&mock.client()).await.unwrap_err();
    match err {
        EcoPlotError::Api { message } => {
            assert_eq!(message, "recommendation engine unavailable");
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn maintenance_actions_post_to_their_paths() {
    let mock = MockEcoPlotServer::start_empty().await;
    Mock::given(method("POST"))
        .and(path("/admin/seed-devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true, "message": "Seeded 12 devices"
        })))
        .expect(1)
        .mount(&mock.server)
        .await;

    let message = mock
        .client()
        .run_maintenance(MaintenanceAction::SeedDevices)
        .await
        .unwrap();
    assert_eq!(message.as_deref(), Some("Seeded 12 devices"));
}

#[tokio::test]
async fn export_returns_the_raw_blob() {
    let mock = MockEcoPlotServer::start_empty().await;
    Mock::given(method("GET"))
        .and(path("/admin/export-data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("{\"devices\":[]}", "application/json"),
        )
        .mount(&mock.server)
        .await;

    let blob = mock.client().export_data().await.unwrap();
    assert_eq!(blob, b"{\"devices\":[]}");
}
