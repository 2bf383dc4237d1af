//! # Estate Console
//!
//! Command-line client for a property-management REST backend: lists estates,
//! properties, units, tenants, leases, invoices and maintenance tickets,
//! submits create requests, and renders the revenue dashboard.
//!
//! ## Modules
//!
//! - [`api`]: HTTP client for the estate backend
//! - [`dashboard`]: KPI aggregation, monthly revenue series and chart rendering
//! - [`session`]: Explicit session context (token and identity) and its store
//! - [`router`]: View selection with the session gate
//! - [`views`]: Table/JSON/CSV rendering of entity lists
//! - [`config`]: TOML configuration with environment overrides
//! - [`notify`]: One-line user notices
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use estate_console::api::ApiClient;
//! use estate_console::dashboard::{load_dashboard, render_chart, ChartLayout, SvgSurface};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::new("http://localhost:8000", None)?;
//!     let view = load_dashboard(&client).await?;
//!
//!     println!("Occupancy: {}%", view.kpis.occupancy_percent);
//!
//!     let layout = ChartLayout::compute(&view.series, 640.0);
//!     let mut surface = SvgSurface::new();
//!     render_chart(&mut surface, &layout);
//!     std::fs::write("revenue.svg", surface.finish())?;
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod dashboard;
pub mod format;
pub mod models;
pub mod notify;
pub mod router;
pub mod session;
pub mod views;

pub use api::{ApiClient, ClientError, ClientResult};
pub use config::Config;
pub use dashboard::{DashboardKpis, DashboardView, RevenueSeries};
pub use session::{Session, SessionStore, UserIdentity};
