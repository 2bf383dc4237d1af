//! Dashboard loading
//!
//! Fetches units, tenants and invoices concurrently and builds the
//! [`DashboardView`] only once all three have succeeded.

use async_trait::async_trait;

use super::aggregate::DashboardView;
use crate::api::{ApiClient, ClientResult, UnitFilter};
use crate::models::{Invoice, Tenant, Unit};

/// The three lists the dashboard is built from
#[async_trait]
pub trait DashboardSource: Send + Sync {
    async fn units(&self) -> ClientResult<Vec<Unit>>;

    async fn tenants(&self) -> ClientResult<Vec<Tenant>>;

    /// All invoices, regardless of status
    async fn invoices(&self) -> ClientResult<Vec<Invoice>>;
}

#[async_trait]
impl DashboardSource for ApiClient {
    async fn units(&self) -> ClientResult<Vec<Unit>> {
        self.list_units(&UnitFilter::default()).await
    }

    async fn tenants(&self) -> ClientResult<Vec<Tenant>> {
        self.list_tenants(None).await
    }

    async fn invoices(&self) -> ClientResult<Vec<Invoice>> {
        self.list_invoices(Some("")).await
    }
}

/// Load everything the dashboard shows.
///
/// The first failing fetch aborts the whole load; no partial view is built.
pub async fn load_dashboard<S: DashboardSource + ?Sized>(source: &S) -> ClientResult<DashboardView> {
    let (units, tenants, invoices) =
        tokio::try_join!(source.units(), source.tenants(), source.invoices())?;

    tracing::info!(
        units = units.len(),
        tenants = tenants.len(),
        invoices = invoices.len(),
        "Dashboard data loaded"
    );

    Ok(DashboardView::build(&units, &tenants, &invoices))
}
