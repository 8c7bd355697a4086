//! HTTP transport for the EcoPlot server API
//!
//! Thin typed wrapper over `reqwest`. Every endpoint answers with the
//! envelope `{success: bool, ...payload}`; [`ApiClient`] unwraps it and maps
//! `success: false` to [`EcoPlotError::Api`] carrying the server message.
//! There are no retries: callers decide per call how to degrade.

use crate::config::ClientConfig;
use crate::error::{EcoPlotError, Result};
use crate::models::{
    Brand, DashboardDevice, DashboardRecommendation, DashboardSummary, Device, DeviceType,
    EnergySeries, RecommendationBundle, User,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Dashboard aggregation window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    /// 24 hourly buckets
    #[default]
    Day,
    /// 7 daily buckets, Monday first
    Week,
    /// 30 daily buckets
    Month,
}

impl Period {
    /// Query-parameter value understood by the server
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }

    /// Parse the CLI/query form
    pub fn parse(value: &str) -> Result<Self> {
        match value {
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(EcoPlotError::Validation(format!(
                "unknown period '{other}', expected day, week or month"
            ))),
        }
    }
}

/// Admin maintenance actions exposed by the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceAction {
    InitDb,
    SeedDevices,
    ClearDevices,
    ResetDb,
    CreateTestUsers,
    CreateTestDevices,
}

impl MaintenanceAction {
    /// Endpoint path under `/admin`
    pub fn path(&self) -> &'static str {
        match self {
            MaintenanceAction::InitDb => "/admin/init-db",
            MaintenanceAction::SeedDevices => "/admin/seed-devices",
            MaintenanceAction::ClearDevices => "/admin/clear-devices",
            MaintenanceAction::ResetDb => "/admin/reset-db",
            MaintenanceAction::CreateTestUsers => "/admin/create-test-users",
            MaintenanceAction::CreateTestDevices => "/admin/create-test-devices",
        }
    }
}

/// Typed client for the EcoPlot REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    /// Create a client from configuration
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.clone(),
        })
    }

    /// Base URL this client talks to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| EcoPlotError::config(format!("invalid endpoint path {path}: {e}")))
    }

    async fn get_envelope(&self, path: &str) -> Result<Value> {
        let url = self.url(path)?;
        debug!(%url, "GET");
        let value: Value = self.http.get(url).send().await?.json().await?;
        unwrap_envelope(value)
    }

    async fn get_field<T: DeserializeOwned>(&self, path: &str, field: &str) -> Result<T> {
        let envelope = self.get_envelope(path).await?;
        extract_field(envelope, field)
    }

    /// GET /devices/api/categories
    pub async fn get_categories(&self) -> Result<Vec<DeviceType>> {
        self.get_field("/devices/api/categories", "device_types")
            .await
    }

    /// GET /devices/api/brands/:typeId
    pub async fn get_brands(&self, type_id: &str) -> Result<Vec<Brand>> {
        self.get_field(&format!("/devices/api/brands/{type_id}"), "brands")
            .await
    }

    /// GET /admin/api/devices
    pub async fn get_admin_devices(&self) -> Result<Vec<Device>> {
        self.get_field("/admin/api/devices", "devices").await
    }

    /// GET /admin/api/users
    pub async fn get_admin_users(&self) -> Result<Vec<User>> {
        self.get_field("/admin/api/users", "users").await
    }

    /// GET /devices/api/:id
    pub async fn get_device(&self, id: &str) -> Result<Device> {
        self.get_field(&format!("/devices/api/{id}"), "device")
            .await
    }

    /// POST /devices/api/add
    pub async fn add_device<T: Serialize>(&self, payload: &T) -> Result<Option<String>> {
        let url = self.url("/devices/api/add")?;
        debug!(%url, "POST");
        let value: Value = self.http.post(url).json(payload).send().await?.json().await?;
        Ok(message_of(unwrap_envelope(value)?))
    }

    /// PUT /devices/api/:id
    pub async fn update_device<T: Serialize>(
        &self,
        id: &str,
        payload: &T,
    ) -> Result<Option<String>> {
        let url = self.url(&format!("/devices/api/{id}"))?;
        debug!(%url, "PUT");
        let value: Value = self.http.put(url).json(payload).send().await?.json().await?;
        Ok(message_of(unwrap_envelope(value)?))
    }

    /// DELETE /devices/api/:id
    pub async fn delete_device(&self, id: &str) -> Result<Option<String>> {
        let url = self.url(&format!("/devices/api/{id}"))?;
        debug!(%url, "DELETE");
        let value: Value = self.http.delete(url).send().await?.json().await?;
        Ok(message_of(unwrap_envelope(value)?))
    }

    /// GET /api/dashboard/summary?period=
    pub async fn get_summary(&self, period: Period) -> Result<DashboardSummary> {
        self.get_field(
            &format!("/api/dashboard/summary?period={}", period.as_str()),
            "summary",
        )
        .await
    }

    /// GET /api/dashboard/energy-usage?period=
    ///
    /// Labels, consumption and production live at the top level of the
    /// envelope rather than under a payload key.
    pub async fn get_energy_usage(&self, period: Period) -> Result<EnergySeries> {
        let envelope = self
            .get_envelope(&format!(
                "/api/dashboard/energy-usage?period={}",
                period.as_str()
            ))
            .await?;
        serde_json::from_value(envelope).map_err(EcoPlotError::from)
    }

    /// GET /api/dashboard/devices
    pub async fn get_dashboard_devices(&self) -> Result<Vec<DashboardDevice>> {
        self.get_field("/api/dashboard/devices", "devices").await
    }

    /// GET /api/dashboard/recommendations
    pub async fn get_dashboard_recommendations(&self) -> Result<Vec<DashboardRecommendation>> {
        self.get_field("/api/dashboard/recommendations", "recommendations")
            .await
    }

    /// GET /api/recommendations
    ///
    /// The payload nests a second envelope: the outer one reports transport
    /// success, the inner one whether recommendation generation succeeded.
    pub async fn get_recommendations(&self) -> Result<RecommendationBundle> {
        let envelope = self.get_envelope("/api/recommendations").await?;
        let inner = envelope
            .get("recommendations")
            .cloned()
            .ok_or_else(|| EcoPlotError::malformed("missing 'recommendations' field"))?;
        let inner = unwrap_envelope(inner)?;
        extract_field(inner, "recommendations")
    }

    /// POST one of the admin maintenance endpoints
    pub async fn run_maintenance(&self, action: MaintenanceAction) -> Result<Option<String>> {
        let url = self.url(action.path())?;
        debug!(%url, "POST maintenance");
        let value: Value = self.http.post(url).send().await?.json().await?;
        Ok(message_of(unwrap_envelope(value)?))
    }

    /// GET /admin/export-data as a raw blob
    pub async fn export_data(&self) -> Result<Vec<u8>> {
        let url = self.url("/admin/export-data")?;
        debug!(%url, "GET export");
        let response = self.http.get(url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }
}

/// Check the `success` flag, passing the envelope through on success
fn unwrap_envelope(value: Value) -> Result<Value> {
    match value.get("success").and_then(Value::as_bool) {
        Some(true) => Ok(value),
        Some(false) => Err(EcoPlotError::api(message_of(value))),
        None => Err(EcoPlotError::malformed("missing 'success' field")),
    }
}

/// Pull the optional server message out of an envelope
fn message_of(value: Value) -> Option<String> {
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// Deserialize one payload field out of an unwrapped envelope
fn extract_field<T: DeserializeOwned>(mut envelope: Value, field: &str) -> Result<T> {
    let payload = envelope
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| EcoPlotError::malformed(format!("missing '{field}' field")))?;
    serde_json::from_value(payload).map_err(EcoPlotError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unwrap_envelope_rejects_failure_with_message() {
        let err = unwrap_envelope(json!({"success": false, "message": "nope"})).unwrap_err();
        assert_eq!(err.to_string(), "API error: nope");
    }

    #[test]
    fn unwrap_envelope_rejects_missing_flag() {
        let err = unwrap_envelope(json!({"devices": []})).unwrap_err();
        assert_eq!(err.category(), "malformed-response");
    }

    #[test]
    fn extract_field_reports_missing_payload() {
        let envelope = json!({"success": true});
        let err = extract_field::<Vec<String>>(envelope, "devices").unwrap_err();
        assert!(err.to_string().contains("devices"));
    }

    #[test]
    fn period_round_trips_through_parse() {
        for period in [Period::Day, Period::Week, Period::Month] {
            assert_eq!(Period::parse(period.as_str()).unwrap(), period);
        }
        assert!(Period::parse("year").is_err());
    }
}
