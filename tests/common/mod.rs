//! WireMock-based EcoPlot API mocking infrastructure
//!
//! Simulates the server's JSON envelope endpoints so component tests run
//! without a live EcoPlot instance.

#![allow(dead_code)]

use ecoplot_client::{ApiClient, ClientConfig};
use serde_json::{json, Value};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock EcoPlot server with the standard admin fixture:
/// 2 device types, 3 brands, 5 devices, 2 users.
pub struct MockEcoPlotServer {
    pub server: MockServer,
}

impl MockEcoPlotServer {
    /// Start with the default admin endpoints mounted
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let mock = Self { server };
        mock.mount_admin_defaults().await;
        mock
    }

    /// Start with no endpoints mounted
    pub async fn start_empty() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// API client pointed at this mock
    pub fn client(&self) -> ApiClient {
        let config = ClientConfig::default()
            .with_base_url(Url::parse(&self.server.uri()).expect("mock server URI is a URL"));
        ApiClient::new(&config).expect("client builds")
    }

    /// Mount categories, brands, devices and users fixtures
    pub async fn mount_admin_defaults(&self) {
        self.mount_ok(
            "/devices/api/categories",
            json!({"success": true, "device_types": device_types()}),
        )
        .await;

        self.mount_ok(
            "/devices/api/brands/1",
            json!({"success": true, "brands": [
                {"id": 10, "name": "Miele", "device_type_id": 1},
                {"id": 11, "name": "Bosch", "device_type_id": 1},
            ]}),
        )
        .await;

        self.mount_ok(
            "/devices/api/brands/2",
            json!({"success": true, "brands": [
                {"id": 20, "name": "Easee", "device_type_id": 2},
            ]}),
        )
        .await;

        self.mount_ok(
            "/admin/api/devices",
            json!({"success": true, "devices": devices()}),
        )
        .await;

        self.mount_ok(
            "/admin/api/users",
            json!({"success": true, "users": [
                {"id": 1, "username": "ada", "email": "ada@example.com", "device_count": 3},
                {"id": 2, "username": "grace", "email": "grace@example.com", "device_count": 2},
            ]}),
        )
        .await;
    }

    /// Mount a 200 JSON GET response
    pub async fn mount_ok(&self, endpoint: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a GET response for one `period=` query value
    pub async fn mount_period(&self, endpoint: &str, period: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .and(query_param("period", period))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Mount a server error for an endpoint
    pub async fn mount_failure(&self, endpoint: &str) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(500))
            .mount(&self.server)
            .await;
    }
}

/// The two fixture device types
pub fn device_types() -> Value {
    json!([
        {"id": 1, "name": "Appliance", "icon_path": "/static/icons/appliance.svg"},
        {"id": 2, "name": "EV Charger", "icon_path": null},
    ])
}

/// The five fixture devices; ids 1-5, types split 3/2, one smart device
pub fn devices() -> Value {
    json!([
        {
            "id": 1, "name": "Washing Machine", "model": "WWD 660",
            "power_consumption_watts": 800.0, "is_schedulable": true,
            "device_type": {"id": 1, "name": "Appliance"},
            "brand": {"id": 10, "name": "Miele"},
            "user": {"id": 1, "username": "ada"},
            "created_at": "2025-01-15T08:30:00",
        },
        {
            "id": 2, "name": "Dishwasher", "model": "SMV4HVX",
            "power_consumption_watts": 1200.0,
            "device_type_id": 1, "brand_id": 11, "user_id": 1,
        },
        {
            "id": 3, "name": "Tumble Dryer",
            "power_consumption_watts": 2500.0, "is_smart_device": true,
            "device_type": {"id": 1, "name": "Appliance"},
            "brand": {"id": 11, "name": "Bosch"},
            "user": {"id": 2, "username": "grace"},
        },
        {
            "id": 4, "name": "Wallbox", "model": "Home",
            "power_consumption_watts": 11000.0, "is_ev_charger": true,
            "ev_battery_capacity_kwh": 64.0, "charging_rate_kw": 11.0,
            "device_type": {"id": 2, "name": "EV Charger"},
            "brand": {"id": 20, "name": "Easee"},
            "user": {"id": 1, "username": "ada"},
        },
        {
            "id": 5, "name": "Garage Charger",
            "power_consumption_watts": 7400.0, "is_ev_charger": true,
            "device_type_id": 2, "brand_id": 20, "user_id": 2,
        },
    ])
}
