//! Revenue Dashboard
//!
//! KPIs, the monthly revenue series and the revenue chart.
//!
//! ## Data Flow
//!
//! 1. [`load_dashboard`] fetches units, tenants and invoices concurrently
//! 2. [`DashboardView::build`] derives the KPIs, the series and the recent invoices
//! 3. [`ChartLayout::compute`] turns the series into chart geometry
//! 4. [`render_chart`] replays the geometry onto a [`DrawingSurface`]

mod aggregate;
mod chart;
mod loader;
mod series;
mod surface;

pub use aggregate::{recent_invoices, DashboardKpis, DashboardView, RECENT_INVOICE_LIMIT};
pub use chart::{render_chart, ChartLabel, ChartLayout, Segment, CHART_HEIGHT, CHART_PADDING, Y_SCALE_FLOOR};
pub use loader::{load_dashboard, DashboardSource};
pub use series::{MonthKey, RevenueSeries};
pub use surface::{DrawingSurface, LinearGradient, Paint, Point, Rgba, StrokeStyle, SvgSurface, TextStyle};
