//! Dashboard KPIs
//!
//! Pure aggregation over the three lists the dashboard fetches. Nothing here
//! touches the network or a drawing surface.

use serde::Serialize;

use super::series::RevenueSeries;
use crate::format::NumberFormat;
use crate::models::{Invoice, Tenant, Unit};

/// Number of invoices shown in the recent-activity table
pub const RECENT_INVOICE_LIMIT: usize = 8;

/// Scalar dashboard metrics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardKpis {
    /// `round(100 * occupied / total)`, 0 when there are no units
    pub occupancy_percent: u32,
    pub occupied_units: usize,
    pub total_units: usize,
    pub tenant_count: usize,
    pub pending_invoices: usize,
    /// Sum of paid invoice amounts
    pub revenue_total: f64,
}

impl DashboardKpis {
    pub fn compute(units: &[Unit], tenants: &[Tenant], invoices: &[Invoice]) -> Self {
        let total_units = units.len();
        let occupied_units = units.iter().filter(|u| u.occupied).count();

        let occupancy_percent = if total_units == 0 {
            0
        } else {
            (occupied_units as f64 / total_units as f64 * 100.0).round() as u32
        };

        Self {
            occupancy_percent,
            occupied_units,
            total_units,
            tenant_count: tenants.len(),
            pending_invoices: invoices.iter().filter(|i| i.is_pending()).count(),
            revenue_total: invoices
                .iter()
                .filter(|i| i.is_paid())
                .map(|i| i.amount)
                .sum(),
        }
    }

    /// Label/value pairs as shown on the KPI cards
    pub fn display(&self, fmt: &NumberFormat) -> Vec<(&'static str, String)> {
        vec![
            ("Occupancy", format!("{}%", self.occupancy_percent)),
            ("Tenants", fmt.count(self.tenant_count)),
            ("Pending invoices", fmt.count(self.pending_invoices)),
            ("Revenue", fmt.amount(self.revenue_total)),
        ]
    }
}

/// The `limit` most recent invoices, newest first.
///
/// Recency is the invoice id, which the backend assigns in insertion order.
/// For a list already returned in insertion order this is the last `limit`
/// entries reversed.
pub fn recent_invoices(invoices: &[Invoice], limit: usize) -> Vec<Invoice> {
    let mut ordered: Vec<&Invoice> = invoices.iter().collect();
    ordered.sort_by_key(|i| i.id);

    ordered
        .into_iter()
        .rev()
        .take(limit)
        .cloned()
        .collect()
}

/// Everything the dashboard renders, built in one step after all fetches
/// have succeeded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub kpis: DashboardKpis,
    pub series: RevenueSeries,
    pub recent: Vec<Invoice>,
}

impl DashboardView {
    pub fn build(units: &[Unit], tenants: &[Tenant], invoices: &[Invoice]) -> Self {
        Self {
            kpis: DashboardKpis::compute(units, tenants, invoices),
            series: RevenueSeries::from_invoices(invoices),
            recent: recent_invoices(invoices, RECENT_INVOICE_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn unit(id: i64, occupied: bool) -> Unit {
        Unit {
            id,
            property_id: 1,
            label: format!("Flat {}", id),
            bedrooms: 2,
            occupied,
        }
    }

    fn tenant(id: i64) -> Tenant {
        Tenant {
            id,
            full_name: format!("Tenant {}", id),
            email: format!("t{}@example.com", id),
            phone: None,
        }
    }

    fn invoice(id: i64, status: &str, amount: f64) -> Invoice {
        Invoice {
            id,
            lease_id: 1,
            due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            amount,
            status: status.to_string(),
            reference: None,
        }
    }

    #[test]
    fn test_occupancy_half() {
        let units = vec![unit(1, true), unit(2, false), unit(3, true), unit(4, false)];
        let kpis = DashboardKpis::compute(&units, &[], &[]);
        assert_eq!(kpis.occupancy_percent, 50);
        assert_eq!(kpis.occupied_units, 2);
        assert_eq!(kpis.total_units, 4);
    }

    #[test]
    fn test_occupancy_no_units() {
        let kpis = DashboardKpis::compute(&[], &[], &[]);
        assert_eq!(kpis.occupancy_percent, 0);
        assert_eq!(kpis.tenant_count, 0);
        assert_eq!(kpis.pending_invoices, 0);
        assert_eq!(kpis.revenue_total, 0.0);
    }

    #[test]
    fn test_occupancy_rounds() {
        // 1/3 -> 33, 2/3 -> 67, 1/8 -> 12.5 -> 13
        let a = vec![unit(1, true), unit(2, false), unit(3, false)];
        let b = vec![unit(1, true), unit(2, true), unit(3, false)];
        let mut c: Vec<Unit> = (1..=8).map(|i| unit(i, false)).collect();
        c[0].occupied = true;

        assert_eq!(DashboardKpis::compute(&a, &[], &[]).occupancy_percent, 33);
        assert_eq!(DashboardKpis::compute(&b, &[], &[]).occupancy_percent, 67);
        assert_eq!(DashboardKpis::compute(&c, &[], &[]).occupancy_percent, 13);
    }

    #[test]
    fn test_occupancy_never_exceeds_hundred() {
        for total in 1..=12 {
            for occupied in 0..=total {
                let units: Vec<Unit> = (0..total).map(|i| unit(i as i64, i < occupied)).collect();
                let kpis = DashboardKpis::compute(&units, &[], &[]);
                let expected = (100.0 * occupied as f64 / total as f64).round() as u32;
                assert_eq!(kpis.occupancy_percent, expected);
                assert!(kpis.occupied_units <= kpis.total_units);
            }
        }
    }

    #[test]
    fn test_pending_and_revenue() {
        let invoices = vec![
            invoice(1, "paid", 100.0),
            invoice(2, "pending", 80.0),
            invoice(3, "paid", 50.0),
            invoice(4, "overdue", 70.0),
            invoice(5, "pending", 20.0),
            invoice(6, "Paid", 999.0),
        ];
        let tenants = vec![tenant(1), tenant(2), tenant(3)];

        let kpis = DashboardKpis::compute(&[], &tenants, &invoices);
        assert_eq!(kpis.tenant_count, 3);
        assert_eq!(kpis.pending_invoices, 2);
        assert_eq!(kpis.revenue_total, 150.0);
    }

    #[test]
    fn test_display_values() {
        let kpis = DashboardKpis {
            occupancy_percent: 75,
            occupied_units: 3,
            total_units: 4,
            tenant_count: 1200,
            pending_invoices: 4,
            revenue_total: 1234567.5,
        };

        let shown = kpis.display(&NumberFormat::default());
        assert_eq!(shown[0], ("Occupancy", "75%".to_string()));
        assert_eq!(shown[1], ("Tenants", "1,200".to_string()));
        assert_eq!(shown[3], ("Revenue", "1,234,567.5".to_string()));
    }

    #[test]
    fn test_recent_invoices_newest_first() {
        let invoices: Vec<Invoice> = (1..=10).map(|id| invoice(id, "pending", 10.0)).collect();
        let recent = recent_invoices(&invoices, RECENT_INVOICE_LIMIT);

        let ids: Vec<i64> = recent.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![10, 9, 8, 7, 6, 5, 4, 3]);
    }

    #[test]
    fn test_recent_invoices_short_list() {
        let invoices = vec![invoice(1, "paid", 1.0), invoice(2, "paid", 2.0)];
        let ids: Vec<i64> = recent_invoices(&invoices, 8).iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![2, 1]);
        assert!(recent_invoices(&[], 8).is_empty());
    }

    #[test]
    fn test_view_with_empty_inputs() {
        let view = DashboardView::build(&[], &[], &[]);
        assert_eq!(view.kpis.tenant_count, 0);
        assert!(view.series.is_empty());
        assert!(view.recent.is_empty());
    }
}
