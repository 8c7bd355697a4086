//! Device CRUD against the `/devices/api` resource
//!
//! Mutations are fire-and-wait: the caller reloads the page state on success,
//! there is no optimistic update. Validation is server-delegated; a
//! `success: false` envelope surfaces as [`EcoPlotError::Api`] with the
//! server message and leaves state untouched.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::Device;
use serde::{Deserialize, Serialize};
use tracing::info;

/// Outcome of a successful mutation, carrying the server's message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationOutcome {
    pub message: Option<String>,
}

/// Add/edit form payload for a device
///
/// The four flags are always serialized, even when false, mirroring the form
/// submission. The scheduling and EV groups are only serialized when their
/// flag is set, because the form hides those field groups otherwise.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_type_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub power_consumption_watts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standby_power_watts: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_usage_hours_per_day: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_flexibility: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_level: Option<i64>,
    pub is_schedulable: bool,
    pub is_ev_charger: bool,
    pub is_smart_device: bool,
    pub api_controllable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preferred_end_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_duration_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ev_battery_capacity_kwh: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub charging_rate_kw: Option<f64>,
}

impl DeviceForm {
    /// Empty form for the add modal, preselected type and brand
    pub fn for_add(device_type_id: impl Into<String>, brand_id: impl Into<String>) -> Self {
        Self {
            device_type_id: Some(device_type_id.into()),
            brand_id: Some(brand_id.into()),
            ..Self::default()
        }
    }

    /// Pre-populate the edit form from a fetched record
    ///
    /// Conditional groups follow the record's flags: fields of a disabled
    /// group are left empty even if the record still carries values.
    pub fn from_device(device: &Device) -> Self {
        let mut form = Self {
            name: device.name.clone(),
            model: device.model.clone(),
            device_type_id: device.device_type_id.as_ref().map(|id| id.as_key()),
            brand_id: device.brand_id.as_ref().map(|id| id.as_key()),
            power_consumption_watts: device.power_consumption_watts,
            standby_power_watts: device.standby_power_watts,
            average_usage_hours_per_day: device.average_usage_hours_per_day,
            usage_flexibility: device.usage_flexibility,
            priority_level: device.priority_level,
            is_schedulable: device.is_schedulable,
            is_ev_charger: device.is_ev_charger,
            is_smart_device: device.is_smart_device,
            api_controllable: device.api_controllable,
            ..Self::default()
        };

        if device.is_schedulable {
            form.preferred_start_time = device.preferred_start_time.clone();
            form.preferred_end_time = device.preferred_end_time.clone();
            form.operation_duration_minutes = device.operation_duration_minutes;
        }

        if device.is_ev_charger {
            form.ev_battery_capacity_kwh = device.ev_battery_capacity_kwh;
            form.charging_rate_kw = device.charging_rate_kw;
        }

        form
    }
}

/// CRUD operations for the device resource
#[derive(Debug, Clone)]
pub struct DeviceManager<'a> {
    client: &'a ApiClient,
}

impl<'a> DeviceManager<'a> {
    pub fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Fetch a device and pre-populate the edit form from it
    pub async fn edit_form_for(&self, device_id: &str) -> Result<(Device, DeviceForm)> {
        let device = self.client.get_device(device_id).await?;
        let form = DeviceForm::from_device(&device);
        Ok((device, form))
    }

    /// Create a device
    pub async fn add(&self, form: &DeviceForm) -> Result<MutationOutcome> {
        let message = self.client.add_device(form).await?;
        info!(name = %form.name, "device added");
        Ok(MutationOutcome { message })
    }

    /// Replace a device record in full
    pub async fn update(&self, device_id: &str, form: &DeviceForm) -> Result<MutationOutcome> {
        let message = self.client.update_device(device_id, form).await?;
        info!(device_id, "device updated");
        Ok(MutationOutcome { message })
    }

    /// Delete a device
    pub async fn delete(&self, device_id: &str) -> Result<MutationOutcome> {
        let message = self.client.delete_device(device_id).await?;
        info!(device_id, "device deleted");
        Ok(MutationOutcome { message })
    }
}
