//! Profile form validation
//!
//! Pure client-side gate before submit. Each capability section (solar, EV,
//! battery storage, wind) is toggled by its checkbox; while a section is
//! active its required fields must be present and, for capacities, strictly
//! positive. Unchecking a section removes every requirement it carries.

use serde::{Deserialize, Serialize};

/// One invalid field with its inline message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Form field identifier, e.g. `solar_capacity_kw`
    pub field: String,
    /// Inline message shown next to the field
    pub message: String,
}

/// Validation outcome for one submit attempt
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<FieldError>,
}

impl ValidationReport {
    /// Whether the form may be submitted
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// First invalid field, for scroll-to behavior
    pub fn first_invalid(&self) -> Option<&str> {
        self.errors.first().map(|e| e.field.as_str())
    }
}

/// User profile form state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileForm {
    pub has_solar: bool,
    pub solar_capacity_kw: Option<f64>,

    pub has_ev: bool,
    pub ev_manufacturer: String,
    pub ev_model: String,

    pub has_battery_storage: bool,
    pub battery_capacity_kwh: Option<f64>,

    pub has_wind_turbine: bool,
    pub wind_turbine_capacity_kw: Option<f64>,
}

impl ProfileForm {
    /// Validate active sections, collecting every field error in form order
    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::default();

        if self.has_solar {
            require_positive(
                &mut report,
                "solar_capacity_kw",
                self.solar_capacity_kw,
                "Please enter a valid solar capacity",
            );
        }

        if self.has_ev {
            require_present(
                &mut report,
                "ev_manufacturer",
                &self.ev_manufacturer,
                "Please enter your EV manufacturer",
            );
            require_present(
                &mut report,
                "ev_model",
                &self.ev_model,
                "Please enter your EV model",
            );
        }

        if self.has_battery_storage {
            require_positive(
                &mut report,
                "battery_capacity_kwh",
                self.battery_capacity_kwh,
                "Please enter a valid battery capacity",
            );
        }

        if self.has_wind_turbine {
            require_positive(
                &mut report,
                "wind_turbine_capacity_kw",
                self.wind_turbine_capacity_kw,
                "Please enter a valid wind turbine capacity",
            );
        }

        report
    }

    /// Profile counts as complete once any capability is enabled; an
    /// incomplete profile shows the completion banner
    pub fn is_complete(&self) -> bool {
        self.has_solar || self.has_ev || self.has_battery_storage || self.has_wind_turbine
    }
}

fn require_positive(
    report: &mut ValidationReport,
    field: &str,
    value: Option<f64>,
    message: &str,
) {
    match value {
        Some(v) if v > 0.0 => {}
        _ => report.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        }),
    }
}

fn require_present(report: &mut ValidationReport, field: &str, value: &str, message: &str) {
    if value.trim().is_empty() {
        report.errors.push(FieldError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }
}
