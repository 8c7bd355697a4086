//! Recommendations viewer
//!
//! Fetches the precomputed recommendation bundle and renders its fixed
//! subsections: summary metrics, the overall list, per-device cards, schedule
//! suggestions and saving tips. Every subsection falls back to a "no data"
//! placeholder when its array is empty or absent.

use crate::client::ApiClient;
use crate::error::Result;
use crate::models::RecommendationBundle;
use crate::render::{escape, format_number, list_or_placeholder};
use std::fmt::Write;
use tracing::debug;

/// Rendered recommendations page sections
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationsView {
    /// "$123.45"-style monthly savings
    pub monthly_savings: String,
    /// Carbon reduction potential, bare number
    pub carbon_reduction: String,
    /// "{n} kWh" total energy savings across device recommendations
    pub total_energy_savings: String,
    pub overall_html: String,
    pub device_cards_html: String,
    pub schedule_html: String,
    pub tips_html: String,
}

/// Fetch the bundle and render it
pub async fn load(client: &ApiClient) -> Result<RecommendationsView> {
    let bundle = client.get_recommendations().await?;
    debug!(
        overall = bundle.overall_recommendations.len(),
        devices = bundle.device_recommendations.len(),
        "recommendations loaded"
    );
    Ok(render(&bundle))
}

/// Render a bundle into page sections
pub fn render(bundle: &RecommendationBundle) -> RecommendationsView {
    RecommendationsView {
        monthly_savings: format!("${}", format_number(bundle.estimated_monthly_savings)),
        carbon_reduction: format_number(bundle.carbon_reduction_potential),
        total_energy_savings: format!(
            "{} kWh",
            format_number(Some(bundle.total_energy_savings()))
        ),
        overall_html: list_or_placeholder(
            &bundle.overall_recommendations,
            "bi bi-check-circle-fill text-success",
            "No overall recommendations available at this time.",
        ),
        device_cards_html: device_cards_html(bundle),
        schedule_html: list_or_placeholder(
            &bundle.schedule_optimization,
            "bi bi-clock text-primary",
            "No schedule optimization recommendations available.",
        ),
        tips_html: list_or_placeholder(
            &bundle.energy_saving_tips,
            "bi bi-lightbulb text-warning",
            "No energy saving tips available.",
        ),
    }
}

fn device_cards_html(bundle: &RecommendationBundle) -> String {
    if bundle.device_recommendations.is_empty() {
        return "<p class=\"text-center py-3\">No device-specific recommendations available. \
                Try adding more devices to get personalized advice.</p>"
            .to_string();
    }

    let mut html = String::new();
    for (device_id, rec) in &bundle.device_recommendations {
        let title = rec
            .name
            .clone()
            .unwrap_or_else(|| format!("Device {device_id}"));

        let body = rec
            .recommendation
            .as_ref()
            .map(|text| {
                text.lines()
                    .iter()
                    .map(|line| escape(line))
                    .collect::<Vec<_>>()
                    .join("<br>")
            })
            .unwrap_or_default();

        let savings = rec
            .estimated_savings
            .map(|kwh| {
                format!(
                    "<div class=\"savings-pill\">\
                     <i class=\"bi bi-graph-up-arrow me-1\"></i>\
                     Save {} kWh/month</div>",
                    format_number(Some(kwh))
                )
            })
            .unwrap_or_default();

        let _ = write!(
            html,
            "<div class=\"card device-card\">\
             <div class=\"card-header\">{title}</div>\
             <div class=\"card-body\"><p>{body}</p>{savings}</div>\
             </div>\n",
            title = escape(&title),
        );
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn empty_bundle_renders_placeholders_everywhere() {
        let view = render(&RecommendationBundle::default());
        assert_eq!(view.monthly_savings, "$0");
        assert_eq!(view.carbon_reduction, "0");
        assert_eq!(view.total_energy_savings, "0 kWh");
        assert!(view.overall_html.contains("No overall recommendations"));
        assert!(view.device_cards_html.contains("No device-specific"));
        assert!(view.schedule_html.contains("No schedule optimization"));
        assert!(view.tips_html.contains("No energy saving tips"));
    }

    #[test]
    fn total_savings_sums_device_entries() {
        let bundle: RecommendationBundle = serde_json::from_value(json!({
            "estimated_monthly_savings": 1250.5,
            "device_recommendations": {
                "1": {"name": "Washer", "estimated_savings": 12.5},
                "2": {"name": "Dryer", "estimated_savings": 7.5},
                "3": {"name": "Lamp"},
            }
        }))
        .unwrap();

        let view = render(&bundle);
        assert_eq!(view.monthly_savings, "$1,250.5");
        assert_eq!(view.total_energy_savings, "20 kWh");
    }

    #[test]
    fn array_recommendations_join_with_breaks() {
        let bundle: RecommendationBundle = serde_json::from_value(json!({
            "device_recommendations": {
                "9": {"recommendation": ["lower standby", "use a timer"]},
            }
        }))
        .unwrap();

        let view = render(&bundle);
        assert!(view.device_cards_html.contains("lower standby<br>use a timer"));
        assert!(view.device_cards_html.contains("Device 9"));
    }
}
