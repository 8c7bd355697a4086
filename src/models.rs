//! Wire and view models for the EcoPlot API
//!
//! Every endpoint wraps its payload in the envelope `{success: bool, ...}`.
//! Ids arrive as either JSON numbers or strings depending on the endpoint, so
//! [`RecordId`] keeps the raw form and all comparisons go through its
//! string-coerced key.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identifier that tolerates numeric/string mismatches from JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    /// Numeric id (the usual database form)
    Int(i64),
    /// String id (query parameters, some serializers)
    Text(String),
}

impl RecordId {
    /// String-coerced form used for lookups and filter comparison
    pub fn as_key(&self) -> String {
        match self {
            RecordId::Int(n) => n.to_string(),
            RecordId::Text(s) => s.clone(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{n}"),
            RecordId::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// Device category reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceType {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub icon_path: Option<String>,
}

/// Device brand reference data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Brand {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub logo_path: Option<String>,
    #[serde(default)]
    pub device_type_id: Option<RecordId>,
}

/// Owning user as embedded in device records
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRef {
    pub id: RecordId,
    pub username: String,
}

/// Admin-facing user record with derived device count
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub device_count: u64,
}

/// A device as returned by the admin and device endpoints
///
/// Embedded `device_type`/`brand`/`user` objects are preferred over the flat
/// `*_id` fields wherever both are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: RecordId,
    pub name: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub power_consumption_watts: Option<f64>,
    #[serde(default)]
    pub standby_power_watts: Option<f64>,
    #[serde(default)]
    pub average_usage_hours_per_day: Option<f64>,
    #[serde(default)]
    pub usage_flexibility: Option<i64>,
    #[serde(default)]
    pub priority_level: Option<i64>,
    #[serde(default)]
    pub is_schedulable: bool,
    #[serde(default)]
    pub is_ev_charger: bool,
    #[serde(default)]
    pub is_smart_device: bool,
    #[serde(default)]
    pub api_controllable: bool,
    #[serde(default)]
    pub preferred_start_time: Option<String>,
    #[serde(default)]
    pub preferred_end_time: Option<String>,
    #[serde(default)]
    pub operation_duration_minutes: Option<i64>,
    #[serde(default)]
    pub ev_battery_capacity_kwh: Option<f64>,
    #[serde(default)]
    pub charging_rate_kw: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub device_type: Option<DeviceType>,
    #[serde(default)]
    pub brand: Option<Brand>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub device_type_id: Option<RecordId>,
    #[serde(default)]
    pub brand_id: Option<RecordId>,
    #[serde(default)]
    pub user_id: Option<RecordId>,
}

impl Device {
    /// Type id key, embedded object preferred, flat field fallback
    pub fn type_key(&self) -> Option<String> {
        self.device_type
            .as_ref()
            .map(|t| t.id.as_key())
            .or_else(|| self.device_type_id.as_ref().map(RecordId::as_key))
    }

    /// Brand id key, embedded object preferred, flat field fallback
    pub fn brand_key(&self) -> Option<String> {
        self.brand
            .as_ref()
            .map(|b| b.id.as_key())
            .or_else(|| self.brand_id.as_ref().map(RecordId::as_key))
    }

    /// Owner id key, embedded object preferred, flat field fallback
    pub fn user_key(&self) -> Option<String> {
        self.user
            .as_ref()
            .map(|u| u.id.as_key())
            .or_else(|| self.user_id.as_ref().map(RecordId::as_key))
    }

    /// Power draw in watts, treating a missing value as zero
    pub fn power_watts(&self) -> f64 {
        self.power_consumption_watts.unwrap_or(0.0)
    }
}

/// Active admin table filters; an empty field means "no constraint"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    pub device_type: String,
    pub user: String,
    pub brand: String,
}

impl FilterState {
    /// True when no filter field is active
    pub fn is_empty(&self) -> bool {
        self.device_type.is_empty() && self.user.is_empty() && self.brand.is_empty()
    }

    /// A device matches iff every non-empty field string-equals the device's
    /// corresponding id (embedded-preferred, flat-fallback)
    pub fn matches(&self, device: &Device) -> bool {
        let field_matches = |filter: &str, key: Option<String>| {
            filter.is_empty() || key.as_deref() == Some(filter)
        };

        field_matches(&self.device_type, device.type_key())
            && field_matches(&self.brand, device.brand_key())
            && field_matches(&self.user, device.user_key())
    }
}

/// Summary metrics for the dashboard header cards
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub energy_used: f64,
    pub energy_used_change: f64,
    pub energy_produced: f64,
    pub energy_produced_change: f64,
    pub carbon_saved: f64,
    pub carbon_saved_change: f64,
    pub cost_savings: f64,
    pub cost_savings_change: f64,
}

/// Bucketed consumption/production series from the energy-usage endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergySeries {
    pub labels: Vec<String>,
    pub consumption: Vec<f64>,
    pub production: Vec<f64>,
}

/// Flattened device record from the dashboard devices endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardDevice {
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub power_watts: f64,
    #[serde(default)]
    pub daily_usage_kwh: f64,
}

/// Short recommendation entry shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardRecommendation {
    pub content: String,
    #[serde(default)]
    pub saving: Option<String>,
}

/// Per-device entry inside a [`RecommendationBundle`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceRecommendation {
    #[serde(default)]
    pub name: Option<String>,
    /// Either a single string or an array of lines
    #[serde(default)]
    pub recommendation: Option<RecommendationText>,
    #[serde(default)]
    pub estimated_savings: Option<f64>,
}

/// Recommendation text that arrives as a string or a list of strings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecommendationText {
    One(String),
    Many(Vec<String>),
}

impl RecommendationText {
    /// Lines of text, in display order
    pub fn lines(&self) -> Vec<&str> {
        match self {
            RecommendationText::One(s) => vec![s.as_str()],
            RecommendationText::Many(v) => v.iter().map(String::as_str).collect(),
        }
    }
}

/// Precomputed recommendation payload from the server
///
/// `device_recommendations` is keyed by device id; a `BTreeMap` keeps card
/// order stable across renders.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationBundle {
    #[serde(default)]
    pub overall_recommendations: Vec<String>,
    #[serde(default)]
    pub device_recommendations: BTreeMap<String, DeviceRecommendation>,
    #[serde(default)]
    pub schedule_optimization: Vec<String>,
    #[serde(default)]
    pub energy_saving_tips: Vec<String>,
    #[serde(default)]
    pub estimated_monthly_savings: Option<f64>,
    #[serde(default)]
    pub carbon_reduction_potential: Option<f64>,
}

impl RecommendationBundle {
    /// Sum of per-device estimated savings in kWh/month
    pub fn total_energy_savings(&self) -> f64 {
        self.device_recommendations
            .values()
            .filter_map(|d| d.estimated_savings)
            .sum()
    }
}
