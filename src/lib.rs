//! EcoPlot client in Rust
//!
//! Client-side layer of the EcoPlot energy-monitoring application: a typed
//! async client for the server's REST API plus the view components built on
//! top of it.
//!
//! # Features
//!
//! - Admin panel with id-keyed reference lookups and multi-field filtering
//! - Dashboard controller with day/week/month periods and chart fallbacks
//! - Device CRUD with modal-style form payloads
//! - Client-side profile validation
//! - Recommendations rendering with locale-style number formatting
//! - Persisted light/dark theme preference
//!
//! Components are independent: each fetches what it needs, degrades locally
//! on failure and renders HTML strings for its page region.

pub mod admin;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod devices;
pub mod error;
pub mod models;
pub mod profile;
pub mod recommendations;
pub mod render;
pub mod theme;

// Re-export main types for convenience
pub use client::{ApiClient, MaintenanceAction, Period};
pub use config::ClientConfig;
pub use error::{EcoPlotError, Result};
