//! Admin panel load, lookup merge and filtering against a mocked API

use ecoplot_client::admin::AdminPanel;
use ecoplot_client::models::FilterState;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::json;

mod common;
use common::MockEcoPlotServer;

#[tokio::test]
async fn full_load_renders_five_rows_plus_hidden_details() {
    let mock = MockEcoPlotServer::start().await;
    let panel = AdminPanel::load(&mock.client()).await;

    assert!(panel.banners().is_empty());

    let table = panel.render_device_table();
    assert!(!table.empty_state_visible);
    assert_eq!(table.row_count, 5);
    // One hidden detail row per data row
    assert_eq!(table.body_html.matches("expandable-row").count(), 5);
    assert_eq!(table.body_html.matches("expandable-details").count(), 5);
    assert_eq!(table.body_html.matches("expandable-details show").count(), 0);
}

#[tokio::test]
async fn stats_and_filter_options_cover_the_fixture() {
    let mock = MockEcoPlotServer::start().await;
    let panel = AdminPanel::load(&mock.client()).await;

    let stats = panel.stats();
    assert_eq!(stats.device_count, 5);
    assert_eq!(stats.smart_device_count, 1);
    assert_eq!(stats.total_consumption_kw, 22.9);

    assert_eq!(panel.type_options().len(), 2);
    assert_eq!(panel.brand_options().len(), 3);
    // Only owners embedded on devices: ada and grace
    assert_eq!(panel.user_options().len(), 2);
}

#[rstest]
#[case("1", "", "", 3)] // appliances
#[case("2", "", "", 2)] // chargers, one embedded + one flat id
#[case("", "", "11", 2)] // Bosch via embedded and flat brand_id
#[case("", "1", "", 3)] // ada's devices, embedded user and flat user_id
#[case("1", "", "10", 1)] // type and brand conjunction
#[tokio::test]
async fn filters_match_on_string_coerced_ids(
    #[case] type_id: &str,
    #[case] user_id: &str,
    #[case] brand_id: &str,
    #[case] expected: usize,
) {
    let mock = MockEcoPlotServer::start().await;
    let mut panel = AdminPanel::load(&mock.client()).await;

    panel.set_filter(FilterState {
        device_type: type_id.to_string(),
        user: user_id.to_string(),
        brand: brand_id.to_string(),
    });

    assert_eq!(panel.filtered_devices().len(), expected);
}

#[tokio::test]
async fn filter_with_no_matches_shows_empty_state_before_rendering() {
    let mock = MockEcoPlotServer::start().await;
    let mut panel = AdminPanel::load(&mock.client()).await;

    panel.set_filter(FilterState {
        device_type: "99".to_string(),
        ..Default::default()
    });

    let table = panel.render_device_table();
    assert!(table.empty_state_visible);
    assert_eq!(table.body_html, "");
    assert_eq!(table.row_count, 0);
}

#[tokio::test]
async fn failed_brand_fetch_degrades_without_aborting_load() {
    let mock = MockEcoPlotServer::start_empty().await;
    mock.mount_ok(
        "/devices/api/categories",
        json!({"success": true, "device_types": [{"id": 1, "name": "Appliance"}]}),
    )
    .await;
    mock.mount_failure("/devices/api/brands/1").await;
    mock.mount_ok(
        "/admin/api/devices",
        json!({"success": true, "devices": common::devices()}),
    )
    .await;
    mock.mount_ok("/admin/api/users", json!({"success": true, "users": []}))
        .await;

    let panel = AdminPanel::load(&mock.client()).await;

    // Devices still loaded; the brand failure left a banner behind
    assert_eq!(panel.devices().len(), 5);
    assert!(panel
        .banners()
        .iter()
        .any(|b| b.contains("brands")));
    // Brands embedded in device records are still available
    assert!(panel.brand_options().iter().any(|o| o.label == "Miele"));
}

#[tokio::test]
async fn envelope_failure_surfaces_as_banner() {
    let mock = MockEcoPlotServer::start_empty().await;
    mock.mount_ok(
        "/devices/api/categories",
        json!({"success": false, "message": "not authorized"}),
    )
    .await;
    mock.mount_ok("/admin/api/devices", json!({"success": true, "devices": []}))
        .await;
    mock.mount_ok("/admin/api/users", json!({"success": true, "users": []}))
        .await;

    let panel = AdminPanel::load(&mock.client()).await;
    assert!(panel
        .banners()
        .iter()
        .any(|b| b.contains("categories")));
    let table = panel.render_device_table();
    assert!(table.empty_state_visible);
}

#[tokio::test]
async fn detail_rows_toggle_without_refetch() {
    let mock = MockEcoPlotServer::start().await;
    let mut panel = AdminPanel::load(&mock.client()).await;

    assert!(panel.toggle_details("4"));
    let table = panel.render_device_table();
    assert_eq!(table.body_html.matches("expandable-details show").count(), 1);
    // EV group fields appear for the charger's detail row
    assert!(table.body_html.contains("EV Battery Capacity"));
    assert!(table.body_html.contains("64 kWh"));

    assert!(!panel.toggle_details("4"));
}
