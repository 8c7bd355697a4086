//! Admin panel: device/user tables with multi-field filtering
//!
//! The panel owns all state for one page load: the device list, id-keyed
//! lookups for reference data, the active filter and which detail rows are
//! expanded. Loading is resilient per call: a failed fetch logs a warning and
//! records a banner while the remaining loads continue.

use crate::client::ApiClient;
use crate::error::EcoPlotError;
use crate::models::{Brand, Device, DeviceType, FilterState, User};
use crate::render::{date_of, escape};
use std::collections::{HashMap, HashSet};
use std::fmt::Write;
use tracing::{debug, warn};

/// Reference power draw for the table's power bar, in watts
const POWER_BAR_MAX_WATTS: f64 = 2000.0;

/// Derived header stats for the admin page
#[derive(Debug, Clone, PartialEq)]
pub struct AdminStats {
    /// Total number of devices
    pub device_count: usize,
    /// Sum of rated power across devices, in kilowatts
    pub total_consumption_kw: f64,
    /// Number of devices flagged as smart
    pub smart_device_count: usize,
}

/// Rendered admin device table
#[derive(Debug, Clone)]
pub struct DeviceTable {
    /// Table body HTML, empty when nothing matches
    pub body_html: String,
    /// Whether the empty-state element should be shown
    pub empty_state_visible: bool,
    /// Number of rendered device rows (detail rows not counted)
    pub row_count: usize,
}

/// Select options for one filter dropdown
#[derive(Debug, Clone, PartialEq)]
pub struct FilterOption {
    pub value: String,
    pub label: String,
}

/// Client-side state for the admin device/user tables
#[derive(Debug, Default)]
pub struct AdminPanel {
    devices: Vec<Device>,
    users: Vec<User>,
    device_types: HashMap<String, DeviceType>,
    brands: HashMap<String, Brand>,
    filter: FilterState,
    expanded: HashSet<String>,
    banners: Vec<String>,
}

impl AdminPanel {
    /// Load all admin data from the API
    ///
    /// Categories, devices and users are fetched concurrently. Brands are
    /// fetched afterwards, one request per known category, because the set of
    /// categories is only known once the category fetch completes. Reference
    /// data embedded in device records is merged in last so it takes
    /// precedence over the lookup tables.
    pub async fn load(client: &ApiClient) -> Self {
        let mut panel = Self::default();

        let (categories, devices, users) = tokio::join!(
            client.get_categories(),
            client.get_admin_devices(),
            client.get_admin_users(),
        );

        match categories {
            Ok(types) => {
                for t in types {
                    panel.device_types.insert(t.id.as_key(), t);
                }
            }
            Err(e) => panel.record_failure("Failed to load device categories", e),
        }

        match devices {
            Ok(devices) => panel.devices = devices,
            Err(e) => panel.record_failure("Failed to load devices", e),
        }

        match users {
            Ok(users) => panel.users = users,
            Err(e) => panel.record_failure("Failed to load users", e),
        }

        // One brand request per category; a single failure skips that
        // category only.
        let type_keys: Vec<String> = panel.device_types.keys().cloned().collect();
        for type_key in type_keys {
            match client.get_brands(&type_key).await {
                Ok(brands) => {
                    for b in brands {
                        panel.brands.insert(b.id.as_key(), b);
                    }
                }
                Err(e) => {
                    panel.record_failure(&format!("Failed to load brands for type {type_key}"), e)
                }
            }
        }

        panel.merge_embedded_reference_data();
        debug!(
            devices = panel.devices.len(),
            types = panel.device_types.len(),
            brands = panel.brands.len(),
            users = panel.users.len(),
            "admin data loaded"
        );
        panel
    }

    /// Build a panel from already-fetched records (used by tests and embedders)
    pub fn from_parts(devices: Vec<Device>, users: Vec<User>) -> Self {
        let mut panel = Self {
            devices,
            users,
            ..Self::default()
        };
        panel.merge_embedded_reference_data();
        panel
    }

    fn record_failure(&mut self, context: &str, error: EcoPlotError) {
        warn!(category = error.category(), "{context}: {error}");
        self.banners.push(context.to_string());
    }

    /// Types/brands embedded in device records win over the reference fetch
    fn merge_embedded_reference_data(&mut self) {
        for device in &self.devices {
            if let Some(t) = &device.device_type {
                self.device_types.insert(t.id.as_key(), t.clone());
            }
            if let Some(b) = &device.brand {
                self.brands.insert(b.id.as_key(), b.clone());
            }
        }
    }

    /// Transient error banners collected during load
    pub fn banners(&self) -> &[String] {
        &self.banners
    }

    /// All loaded devices
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// Currently active filter
    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    /// Replace the active filter
    pub fn set_filter(&mut self, filter: FilterState) {
        self.filter = filter;
    }

    /// Devices matching the active filter
    pub fn filtered_devices(&self) -> Vec<&Device> {
        self.devices
            .iter()
            .filter(|d| self.filter.matches(d))
            .collect()
    }

    /// Header stats over all loaded devices
    pub fn stats(&self) -> AdminStats {
        let total_watts: f64 = self.devices.iter().map(Device::power_watts).sum();
        AdminStats {
            device_count: self.devices.len(),
            total_consumption_kw: total_watts / 1000.0,
            smart_device_count: self.devices.iter().filter(|d| d.is_smart_device).count(),
        }
    }

    /// Toggle one device's detail row, returning the new visibility
    pub fn toggle_details(&mut self, device_id: &str) -> bool {
        if self.expanded.remove(device_id) {
            false
        } else {
            self.expanded.insert(device_id.to_string());
            true
        }
    }

    /// Options for the type filter dropdown
    pub fn type_options(&self) -> Vec<FilterOption> {
        let mut options: Vec<FilterOption> = self
            .device_types
            .values()
            .map(|t| FilterOption {
                value: t.id.as_key(),
                label: t.name.clone(),
            })
            .collect();
        options.sort_by(|a, b| a.label.cmp(&b.label));
        options
    }

    /// Options for the brand filter dropdown
    pub fn brand_options(&self) -> Vec<FilterOption> {
        let mut options: Vec<FilterOption> = self
            .brands
            .values()
            .map(|b| FilterOption {
                value: b.id.as_key(),
                label: b.name.clone(),
            })
            .collect();
        options.sort_by(|a, b| a.label.cmp(&b.label));
        options
    }

    /// Options for the user filter dropdown: unique owners seen on devices
    pub fn user_options(&self) -> Vec<FilterOption> {
        let mut seen = HashMap::new();
        for device in &self.devices {
            if let Some(user) = &device.user {
                seen.insert(user.id.as_key(), user.username.clone());
            }
        }
        let mut options: Vec<FilterOption> = seen
            .into_iter()
            .map(|(value, label)| FilterOption { value, label })
            .collect();
        options.sort_by(|a, b| a.label.cmp(&b.label));
        options
    }

    /// Render the device table for the active filter
    ///
    /// Zero matches is decided before any row rendering: the empty state is
    /// shown and the body stays empty.
    pub fn render_device_table(&self) -> DeviceTable {
        let filtered = self.filtered_devices();

        if filtered.is_empty() {
            return DeviceTable {
                body_html: String::new(),
                empty_state_visible: true,
                row_count: 0,
            };
        }

        let mut html = String::new();
        for device in &filtered {
            html.push_str(&self.device_row_html(device));
        }

        DeviceTable {
            body_html: html,
            empty_state_visible: false,
            row_count: filtered.len(),
        }
    }

    /// Render the users table body
    pub fn render_user_table(&self) -> String {
        let mut html = String::new();
        for user in &self.users {
            let _ = write!(
                html,
                "<tr data-user-id=\"{id}\">\
                 <td>{username}</td>\
                 <td>{email}</td>\
                 <td>{count}</td>\
                 <td><a class=\"admin-btn admin-btn-primary btn-sm\" href=\"/admin/user/{id}\">View Devices</a></td>\
                 </tr>\n",
                id = escape(&user.id.as_key()),
                username = escape(&user.username),
                email = escape(&user.email),
                count = user.device_count,
            );
        }
        html
    }

    /// One visible data row plus one detail row, expanded state driven by
    /// [`AdminPanel::toggle_details`]
    fn device_row_html(&self, device: &Device) -> String {
        let device_type = device
            .device_type
            .as_ref()
            .or_else(|| lookup(&self.device_types, device.device_type_id.as_ref()));
        let brand = device
            .brand
            .as_ref()
            .or_else(|| lookup(&self.brands, device.brand_id.as_ref()));

        let id_key = device.id.as_key();
        let detail_class = if self.expanded.contains(&id_key) {
            "expandable-details show"
        } else {
            "expandable-details"
        };

        let type_cell = match device_type {
            Some(t) => {
                let icon = t
                    .icon_path
                    .as_deref()
                    .map(|p| {
                        format!(
                            "<img src=\"{}\" class=\"device-type-icon\" alt=\"{}\">",
                            escape(p),
                            escape(&t.name)
                        )
                    })
                    .unwrap_or_default();
                format!("{icon}{}", escape(&t.name))
            }
            None => "N/A".to_string(),
        };

        let brand_cell = match brand {
            Some(b) => {
                let logo = b
                    .logo_path
                    .as_deref()
                    .map(|p| {
                        format!(
                            "<img src=\"{}\" class=\"brand-logo\" alt=\"{}\">",
                            escape(p),
                            escape(&b.name)
                        )
                    })
                    .unwrap_or_default();
                format!("{logo}{}", escape(&b.name))
            }
            None => "N/A".to_string(),
        };

        let created = device
            .created_at
            .as_deref()
            .map(date_of)
            .unwrap_or_else(|| "N/A".to_string());
        let owner = device
            .user
            .as_ref()
            .map(|u| escape(&u.username))
            .unwrap_or_else(|| "N/A".to_string());

        format!(
            "<tr class=\"expandable-row\" data-device-id=\"{id}\">\
             <td>{name}</td>\
             <td>{type_cell}</td>\
             <td>{brand_cell}</td>\
             <td>{model}</td>\
             <td>{watts}W{power_bar}</td>\
             <td>{badges}</td>\
             <td>{created}<br><small class=\"text-muted\">User: {owner}</small></td>\
             </tr>\n\
             <tr class=\"{detail_class}\" id=\"details-{id}\"><td colspan=\"7\">{details}</td></tr>\n",
            id = escape(&id_key),
            name = escape(&device.name),
            model = escape(device.model.as_deref().unwrap_or("N/A")),
            watts = device.power_watts(),
            power_bar = power_bar_html(device),
            badges = badges_html(device),
            details = self.device_details_html(device),
        )
    }

    /// Key/value detail block, with scheduling and EV groups only when the
    /// matching flag is set
    fn device_details_html(&self, device: &Device) -> String {
        let type_name = device
            .device_type
            .as_ref()
            .map(|t| t.name.clone())
            .or_else(|| {
                lookup(&self.device_types, device.device_type_id.as_ref()).map(|t| t.name.clone())
            })
            .unwrap_or_else(|| "N/A".to_string());
        let brand_name = device
            .brand
            .as_ref()
            .map(|b| b.name.clone())
            .or_else(|| lookup(&self.brands, device.brand_id.as_ref()).map(|b| b.name.clone()))
            .unwrap_or_else(|| "N/A".to_string());

        let mut rows: Vec<(String, String)> = vec![
            ("Device Type".into(), type_name),
            ("Brand".into(), brand_name),
            (
                "Model".into(),
                device.model.clone().unwrap_or_else(|| "N/A".into()),
            ),
            (
                "Owner".into(),
                device
                    .user
                    .as_ref()
                    .map(|u| u.username.clone())
                    .unwrap_or_else(|| "Unknown".into()),
            ),
            (
                "Power Consumption".into(),
                format!("{} watts", device.power_watts()),
            ),
            (
                "Standby Power".into(),
                format!("{} watts", device.standby_power_watts.unwrap_or(0.0)),
            ),
            (
                "Usage Hours/Day".into(),
                device
                    .average_usage_hours_per_day
                    .map(|h| format!("{h} hours"))
                    .unwrap_or_else(|| "N/A".into()),
            ),
            (
                "Usage Flexibility".into(),
                device
                    .usage_flexibility
                    .map(|f| format!("{f}/10"))
                    .unwrap_or_else(|| "N/A".into()),
            ),
            (
                "Priority Level".into(),
                device
                    .priority_level
                    .map(|p| format!("{p}/10"))
                    .unwrap_or_else(|| "N/A".into()),
            ),
        ];

        if device.is_schedulable {
            rows.push((
                "Preferred Start Time".into(),
                device
                    .preferred_start_time
                    .clone()
                    .unwrap_or_else(|| "N/A".into()),
            ));
            rows.push((
                "Preferred End Time".into(),
                device
                    .preferred_end_time
                    .clone()
                    .unwrap_or_else(|| "N/A".into()),
            ));
            rows.push((
                "Operation Duration".into(),
                device
                    .operation_duration_minutes
                    .map(|m| format!("{m} minutes"))
                    .unwrap_or_else(|| "N/A".into()),
            ));
        }

        if device.is_ev_charger {
            rows.push((
                "EV Battery Capacity".into(),
                device
                    .ev_battery_capacity_kwh
                    .map(|c| format!("{c} kWh"))
                    .unwrap_or_else(|| "N/A".into()),
            ));
            rows.push((
                "Charging Rate".into(),
                device
                    .charging_rate_kw
                    .map(|r| format!("{r} kW"))
                    .unwrap_or_else(|| "N/A".into()),
            ));
        }

        let mut html = String::from("<div class=\"device-details\">");
        for (label, value) in rows {
            let _ = write!(
                html,
                "<div class=\"detail-row\">\
                 <span class=\"detail-label\">{}:</span>\
                 <span class=\"detail-value\">{}</span>\
                 </div>",
                escape(&label),
                escape(&value)
            );
        }
        html.push_str("</div>");
        html
    }
}

fn lookup<'a, T>(
    map: &'a HashMap<String, T>,
    id: Option<&crate::models::RecordId>,
) -> Option<&'a T> {
    id.and_then(|id| map.get(&id.as_key()))
}

fn badges_html(device: &Device) -> String {
    let mut badges = String::new();
    if device.is_schedulable {
        badges.push_str("<span class=\"device-badge schedulable\">Schedulable</span>");
    }
    if device.is_ev_charger {
        badges.push_str("<span class=\"device-badge ev-charger\">EV Charger</span>");
    }
    if device.is_smart_device {
        badges.push_str("<span class=\"device-badge smart\">Smart Device</span>");
    }
    if badges.is_empty() {
        badges.push_str("<span class=\"text-muted\">&mdash;</span>");
    }
    badges
}

fn power_bar_html(device: &Device) -> String {
    let percentage = ((device.power_watts() / POWER_BAR_MAX_WATTS) * 100.0).min(100.0);
    format!(
        "<div class=\"power-bar\"><div class=\"power-fill\" style=\"width: {percentage:.0}%\"></div></div>"
    )
}
