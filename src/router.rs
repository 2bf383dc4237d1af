//! View routing
//!
//! Maps a view name to its loader, gates every view but `auth` on an active
//! session and remembers the last view shown.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

use crate::api::{ApiClient, ClientError, UnitFilter};
use crate::dashboard::{load_dashboard, render_chart, ChartLayout, DashboardView, SvgSurface};
use crate::format::NumberFormat;
use crate::session::{Session, SessionError, SessionStore};
use crate::views::{render_dashboard, render_list, LeaseSummary, OutputFormat, RenderError};

/// A screen of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum View {
    Dashboard,
    Estates,
    Properties,
    Units,
    Tenants,
    Leases,
    Billing,
    Maintenance,
    Auth,
}

impl View {
    pub const ALL: [View; 9] = [
        View::Dashboard,
        View::Estates,
        View::Properties,
        View::Units,
        View::Tenants,
        View::Leases,
        View::Billing,
        View::Maintenance,
        View::Auth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            View::Dashboard => "dashboard",
            View::Estates => "estates",
            View::Properties => "properties",
            View::Units => "units",
            View::Tenants => "tenants",
            View::Leases => "leases",
            View::Billing => "billing",
            View::Maintenance => "maintenance",
            View::Auth => "auth",
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        View::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = View::ALL.iter().map(View::as_str).collect();
                format!("Unknown view: {}. Available: {}", s, names.join(", "))
            })
    }
}

/// Filters applied by the list views
#[derive(Debug, Clone, Default)]
pub struct ViewOptions {
    pub estate_id: Option<i64>,
    pub units: UnitFilter,
    pub tenant_query: Option<String>,
    /// Billing status filter; empty means all
    pub invoice_status: Option<String>,
}

/// How views are printed
#[derive(Debug, Clone)]
pub struct RenderSettings {
    pub format: OutputFormat,
    pub numbers: NumberFormat,
    pub chart_width: f64,
    /// Where the dashboard writes its revenue chart
    pub chart_output: Option<PathBuf>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::Table,
            numbers: NumberFormat::default(),
            chart_width: 640.0,
            chart_output: None,
        }
    }
}

const AUTH_TEXT: &str = "Not logged in.\n\
    Sign in:  estate login --email <EMAIL> --password <PASSWORD>\n\
    New here: estate register --email <EMAIL> --full-name <NAME> --password <PASSWORD>\n";

/// Dispatches views for one session
pub struct Router {
    client: ApiClient,
    session: Option<Session>,
    store: SessionStore,
    settings: RenderSettings,
}

impl Router {
    /// The session, if any, is attached to the client here
    pub fn new(
        client: ApiClient,
        session: Option<Session>,
        store: SessionStore,
        settings: RenderSettings,
    ) -> Self {
        let client = match &session {
            Some(s) => client.with_session(s),
            None => client,
        };
        Self {
            client,
            session,
            store,
            settings,
        }
    }

    /// The view to show when none is named: the last one, else the dashboard
    pub fn start_view(&self) -> RouterResult<View> {
        let state = self.store.load()?;
        Ok(state
            .last_route
            .and_then(|r| r.parse().ok())
            .unwrap_or(View::Dashboard))
    }

    /// The view that will actually be shown for `requested`
    pub fn resolve(&self, requested: View) -> View {
        if self.session.is_none() {
            View::Auth
        } else {
            requested
        }
    }

    /// Load and render a view
    pub async fn show(&self, requested: View, options: &ViewOptions) -> RouterResult<String> {
        let view = self.resolve(requested);
        if view != requested {
            tracing::info!(requested = %requested, "No session, showing auth view");
        }
        if view != View::Auth {
            self.store.remember_route(view.as_str())?;
        }
        tracing::debug!(view = %view, "Loading view");

        let format = self.settings.format;
        let numbers = &self.settings.numbers;

        let output = match view {
            View::Auth => match &self.session {
                Some(session) => format!("Signed in as {}.\nSign out: estate logout\n", session.user),
                None => AUTH_TEXT.to_string(),
            },
            View::Dashboard => {
                let dashboard = load_dashboard(&self.client).await?;
                let text = render_dashboard(&dashboard, format, numbers)?;
                if let Some(path) = &self.settings.chart_output {
                    write_chart(&dashboard, self.settings.chart_width, path)?;
                }
                text
            }
            View::Estates => render_list(&self.client.list_estates().await?, format, numbers)?,
            View::Properties => render_list(
                &self.client.list_properties(options.estate_id).await?,
                format,
                numbers,
            )?,
            View::Units => render_list(&self.client.list_units(&options.units).await?, format, numbers)?,
            View::Tenants => render_list(
                &self.client.list_tenants(options.tenant_query.as_deref()).await?,
                format,
                numbers,
            )?,
            View::Leases => {
                let invoices = self.client.list_invoices(None).await?;
                render_list(&LeaseSummary::from_invoices(&invoices), format, numbers)?
            }
            View::Billing => {
                let status = options.invoice_status.as_deref().unwrap_or("");
                render_list(&self.client.list_invoices(Some(status)).await?, format, numbers)?
            }
            View::Maintenance => render_list(&self.store.load()?.tickets, format, numbers)?,
        };

        Ok(output)
    }
}

/// Render the revenue chart of `view` to an SVG file
pub fn write_chart(view: &DashboardView, width: f64, path: &std::path::Path) -> RouterResult<()> {
    let layout = ChartLayout::compute(&view.series, width);
    let mut surface = SvgSurface::new();
    render_chart(&mut surface, &layout);

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, surface.finish())?;
    tracing::info!(path = ?path, points = layout.points.len(), "Revenue chart written");
    Ok(())
}

/// Routing errors
#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Failed to write chart: {0}")]
    Chart(#[from] std::io::Error),
}

pub type RouterResult<T> = Result<T, RouterError>;
