//! Stock Dashboard - server-rendered front end for a stock-screening backend
//!
//! This library fetches report, recommendation, forecast and settings data
//! from the analytics backend, keeps it in per-view state and renders the
//! dashboard pages served by the embedded HTTP server.

pub mod api;
pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod normalize;
pub mod poller;
pub mod render;
pub mod state;
pub mod views;

// Re-export commonly used types
pub use client::{ApiRequest, BackendClient, HttpTransport, Method, Transport};
pub use config::AppConfig;
pub use error::{DashboardError, FetchError, ValidationError};
pub use state::{LoadOutcome, Slot};
pub use views::{ForecastView, ReportView, SettingsView, TriggerOutcome};

#[cfg(test)]
mod normalize_tests;
#[cfg(test)]
mod poller_tests;
#[cfg(test)]
mod state_tests;
