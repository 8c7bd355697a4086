//! Dashboard controller: period-windowed charts and summary metrics
//!
//! The controller keeps a single current period and re-fetches every chart
//! plus the summary when it changes. Aggregation semantics live on the
//! server; the only client-side derivations are the per-type grouping for the
//! consumption chart and the battery series for the timeline.
//!
//! The timeline has a presentation fallback: when its fetch fails, a
//! period-shaped synthetic series is substituted so the chart never renders
//! empty. Fallback data is marked `estimated` so it can never be mistaken for
//! real measurements downstream.

use crate::client::{ApiClient, Period};
use crate::error::EcoPlotError;
use crate::models::{DashboardDevice, DashboardRecommendation, DashboardSummary, EnergySeries};
use crate::render::escape;
use rand::Rng;
use std::collections::BTreeMap;
use std::fmt::Write;
use tracing::{debug, warn};

/// How many of the user's devices the "top devices" card shows
const TOP_DEVICE_COUNT: usize = 5;

/// Consumption-vs-production bar chart data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnergyUsageChart {
    pub labels: Vec<String>,
    pub consumption: Vec<f64>,
    pub production: Vec<f64>,
}

/// Per-type doughnut chart data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceConsumptionChart {
    pub labels: Vec<String>,
    pub daily_kwh: Vec<f64>,
}

/// Grid/solar/battery timeline data
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimelineChart {
    pub labels: Vec<String>,
    pub grid: Vec<f64>,
    pub solar: Vec<f64>,
    pub battery: Vec<f64>,
    /// True when this is synthetic fallback data, not server measurements
    pub estimated: bool,
}

/// Dashboard page state for one load
#[derive(Debug, Default)]
pub struct Dashboard {
    period: Period,
    pub summary: Option<DashboardSummary>,
    pub energy_usage: Option<EnergyUsageChart>,
    pub device_consumption: Option<DeviceConsumptionChart>,
    pub timeline: Option<TimelineChart>,
    pub top_devices: Vec<DashboardDevice>,
    pub recommendations: Vec<DashboardRecommendation>,
    banners: Vec<String>,
}

impl Dashboard {
    /// Initial load with the default day period
    pub async fn load(client: &ApiClient) -> Self {
        let mut dashboard = Self::default();
        dashboard.refresh_period_data(client).await;
        dashboard.load_devices_and_recommendations(client).await;
        dashboard
    }

    /// Currently selected period
    pub fn period(&self) -> Period {
        self.period
    }

    /// Transient error banners collected during loads
    pub fn banners(&self) -> &[String] {
        &self.banners
    }

    /// Switch period and re-fetch the summary and every chart
    pub async fn set_period(&mut self, client: &ApiClient, period: Period) {
        self.period = period;
        self.refresh_period_data(client).await;
    }

    async fn refresh_period_data(&mut self, client: &ApiClient) {
        let (summary, usage, devices) = tokio::join!(
            client.get_summary(self.period),
            client.get_energy_usage(self.period),
            client.get_dashboard_devices(),
        );

        match summary {
            Ok(summary) => self.summary = Some(summary),
            Err(e) => self.record_failure("Failed to load summary metrics", e),
        }

        match usage {
            Ok(series) => {
                self.energy_usage = Some(EnergyUsageChart {
                    labels: series.labels.clone(),
                    consumption: series.consumption.clone(),
                    production: series.production.clone(),
                });
                self.timeline = Some(timeline_from_series(&series));
            }
            Err(e) => {
                self.record_failure("Failed to load energy usage", e);
                // Presentation fallback only; marked estimated.
                self.timeline = Some(synthetic_timeline(self.period, &mut rand::thread_rng()));
            }
        }

        match devices {
            Ok(devices) => {
                self.device_consumption = Some(group_by_type(&devices));
            }
            Err(e) => self.record_failure("Failed to load device consumption", e),
        }

        debug!(period = self.period.as_str(), "dashboard period data refreshed");
    }

    async fn load_devices_and_recommendations(&mut self, client: &ApiClient) {
        let (devices, recommendations) = tokio::join!(
            client.get_dashboard_devices(),
            client.get_dashboard_recommendations(),
        );

        match devices {
            Ok(mut devices) => {
                devices.truncate(TOP_DEVICE_COUNT);
                self.top_devices = devices;
            }
            Err(e) => self.record_failure("Failed to load device data", e),
        }

        match recommendations {
            Ok(recommendations) => self.recommendations = recommendations,
            Err(e) => self.record_failure("Failed to load recommendations", e),
        }
    }

    fn record_failure(&mut self, context: &str, error: EcoPlotError) {
        warn!(category = error.category(), "{context}: {error}");
        self.banners.push(context.to_string());
    }

    /// Render the top-devices card body
    pub fn render_top_devices(&self) -> String {
        if self.top_devices.is_empty() {
            return "<div class=\"text-center py-3\">\
                    <p>No devices found. Add devices to see their energy consumption.</p>\
                    </div>"
                .to_string();
        }

        let mut html = String::new();
        for device in &self.top_devices {
            let _ = write!(
                html,
                "<div class=\"device-item\">\
                 <div class=\"device-info\"><h6>{name}</h6>\
                 <p class=\"text-muted\">{brand} {kind}</p></div>\
                 <div class=\"device-usage\">\
                 <div class=\"device-power\">{watts}W</div>\
                 <div class=\"device-daily\">{daily:.2} kWh/day</div></div>\
                 </div>\n",
                name = escape(&device.name),
                brand = escape(&device.brand),
                kind = escape(&device.device_type),
                watts = device.power_watts,
                daily = device.daily_usage_kwh,
            );
        }
        html
    }

    /// Render the latest-recommendations card body
    pub fn render_recommendations(&self) -> String {
        if self.recommendations.is_empty() {
            return "<div class=\"text-center py-3\"><p>No recommendations available yet.</p></div>"
                .to_string();
        }

        let mut html = String::new();
        for rec in &self.recommendations {
            let saving = rec
                .saving
                .as_deref()
                .map(|s| {
                    format!(
                        "<div class=\"recommendation-saving\">\
                         <span class=\"badge bg-success\">{}</span></div>",
                        escape(s)
                    )
                })
                .unwrap_or_default();
            let _ = write!(
                html,
                "<div class=\"recommendation-item\">\
                 <div class=\"recommendation-content\"><p>{}</p></div>{saving}</div>\n",
                escape(&rec.content),
            );
        }
        html
    }

    /// Render the four summary cards as (value, change) HTML pairs
    pub fn render_summary_cards(&self) -> Option<SummaryCards> {
        let s = self.summary.as_ref()?;
        Some(SummaryCards {
            energy_used: format!("{:.1} kWh", s.energy_used),
            energy_used_change: change_html(s.energy_used_change),
            solar_generated: format!("{:.1} kWh", s.energy_produced),
            solar_generated_change: change_html(s.energy_produced_change),
            carbon_saved: format!("{:.1} kg", s.carbon_saved),
            carbon_saved_change: change_html(s.carbon_saved_change),
            cost_savings: format!("${:.2}", s.cost_savings),
            cost_savings_change: change_html(s.cost_savings_change),
        })
    }
}

/// Formatted summary card contents
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryCards {
    pub energy_used: String,
    pub energy_used_change: String,
    pub solar_generated: String,
    pub solar_generated_change: String,
    pub carbon_saved: String,
    pub carbon_saved_change: String,
    pub cost_savings: String,
    pub cost_savings_change: String,
}

fn change_html(change: f64) -> String {
    let direction = if change < 0.0 { "down" } else { "up" };
    format!(
        "<i class=\"fas fa-arrow-{direction}\"></i> {:.1}%",
        change.abs()
    )
}

/// Bucket labels for a period: hours, weekdays or month days
pub fn time_labels(period: Period) -> Vec<String> {
    match period {
        Period::Day => (0..24).map(|h| format!("{h}:00")).collect(),
        Period::Week => [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ]
        .iter()
        .map(|d| d.to_string())
        .collect(),
        Period::Month => (1..=30).map(|d| format!("Day {d}")).collect(),
    }
}

/// Group dashboard devices by type, summing daily kWh per type
///
/// Values are rounded to two decimals; a `BTreeMap` keeps slice order stable.
pub fn group_by_type(devices: &[DashboardDevice]) -> DeviceConsumptionChart {
    let mut by_type: BTreeMap<&str, f64> = BTreeMap::new();
    for device in devices {
        *by_type.entry(device.device_type.as_str()).or_default() += device.daily_usage_kwh;
    }

    let mut chart = DeviceConsumptionChart::default();
    for (kind, kwh) in by_type {
        chart.labels.push(kind.to_string());
        chart.daily_kwh.push((kwh * 100.0).round() / 100.0);
    }
    chart
}

/// Derive the timeline from the energy-usage series
///
/// Grid follows consumption, solar follows production, and battery is
/// estimated per bucket as `max(0, (consumption - production) * 0.5)`.
pub fn timeline_from_series(series: &EnergySeries) -> TimelineChart {
    let battery = series
        .consumption
        .iter()
        .zip(&series.production)
        .map(|(c, p)| ((c - p) * 0.5).max(0.0))
        .collect();

    TimelineChart {
        labels: series.labels.clone(),
        grid: series.consumption.clone(),
        solar: series.production.clone(),
        battery,
        estimated: false,
    }
}

/// Synthesize a period-shaped timeline when the real fetch fails
///
/// Bucket boundaries are deterministic for the period, magnitudes are random:
/// day buckets carry a midday solar peak and an 18-22h grid peak, weeks split
/// weekday/weekend, months add a weekend effect and a dampened every-fifth
/// "cloudy" day.
pub fn synthetic_timeline<R: Rng>(period: Period, rng: &mut R) -> TimelineChart {
    let labels = time_labels(period);
    let mut grid = Vec::with_capacity(labels.len());
    let mut solar = Vec::with_capacity(labels.len());
    let mut battery = Vec::with_capacity(labels.len());

    for i in 0..labels.len() {
        match period {
            Period::Day => {
                let daytime = (6..=18).contains(&i);
                let peak_solar = (10..=15).contains(&i);

                let s = if daytime {
                    if peak_solar {
                        0.8 + rng.gen::<f64>() * 0.4
                    } else {
                        0.3 + rng.gen::<f64>() * 0.3
                    }
                } else {
                    0.0
                };
                let mut g = if daytime {
                    0.3 + rng.gen::<f64>() * 0.4
                } else {
                    0.5 + rng.gen::<f64>() * 0.5
                };
                let mut b = if daytime {
                    0.1 + rng.gen::<f64>() * 0.2
                } else {
                    0.3 + rng.gen::<f64>() * 0.2
                };

                // Evening peak
                if (18..=22).contains(&i) {
                    g = 0.9 + rng.gen::<f64>() * 0.4;
                    b = 0.4 + rng.gen::<f64>() * 0.3;
                }

                grid.push(g);
                solar.push(s);
                battery.push(b);
            }
            Period::Week => {
                let weekday = i < 5;
                solar.push(4.0 + rng.gen::<f64>() * 3.0);
                grid.push(if weekday {
                    6.0 + rng.gen::<f64>() * 2.0
                } else {
                    8.0 + rng.gen::<f64>() * 3.0
                });
                battery.push(if weekday {
                    2.0 + rng.gen::<f64>()
                } else {
                    1.0 + rng.gen::<f64>() * 2.0
                });
            }
            Period::Month => {
                let weekend = i % 7 == 5 || i % 7 == 6;
                let mut s = 4.0 + rng.gen::<f64>() * 3.0;
                let mut g = if weekend {
                    8.0 + rng.gen::<f64>() * 3.0
                } else {
                    6.0 + rng.gen::<f64>() * 2.0
                };
                battery.push(if weekend {
                    1.0 + rng.gen::<f64>() * 2.0
                } else {
                    2.0 + rng.gen::<f64>()
                });

                // Every fifth day is "cloudy"
                if i % 5 == 0 {
                    s *= 0.6;
                    g *= 1.2;
                }

                grid.push(g);
                solar.push(s);
            }
        }
    }

    TimelineChart {
        labels,
        grid,
        solar,
        battery,
        estimated: true,
    }
}
