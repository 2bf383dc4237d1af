//! List and dashboard rendering
//!
//! Turns fetched entities into table, JSON or CSV text.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

use crate::dashboard::DashboardView;
use crate::format::NumberFormat;
use crate::models::{Estate, Invoice, Property, Tenant, Ticket, Unit};

/// How lists are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            other => Err(format!("Unknown output format: {}. Use table, json or csv", other)),
        }
    }
}

/// A record that can be shown as one table row
pub trait TableRow {
    const HEADERS: &'static [&'static str];

    fn cells(&self, numbers: &NumberFormat) -> Vec<String>;
}

impl TableRow for Estate {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Location"];

    fn cells(&self, _: &NumberFormat) -> Vec<String> {
        vec![self.id.to_string(), self.name.clone(), self.location.clone()]
    }
}

impl TableRow for Property {
    const HEADERS: &'static [&'static str] = &["ID", "Code", "Address", "Estate"];

    fn cells(&self, _: &NumberFormat) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone(),
            self.address.clone(),
            self.estate_id.to_string(),
        ]
    }
}

impl TableRow for Unit {
    const HEADERS: &'static [&'static str] = &["ID", "Property", "Label", "Bedrooms", "Occupied"];

    fn cells(&self, _: &NumberFormat) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.property_id.to_string(),
            self.label.clone(),
            self.bedrooms.to_string(),
            if self.occupied { "Yes" } else { "No" }.to_string(),
        ]
    }
}

impl TableRow for Tenant {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Email", "Phone"];

    fn cells(&self, _: &NumberFormat) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.full_name.clone(),
            self.email.clone(),
            self.phone.clone().unwrap_or_default(),
        ]
    }
}

impl TableRow for Invoice {
    const HEADERS: &'static [&'static str] = &["ID", "Lease", "Due", "Amount", "Status", "Ref"];

    fn cells(&self, numbers: &NumberFormat) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.lease_id.to_string(),
            self.due_date.to_string(),
            numbers.amount(self.amount),
            self.status.clone(),
            self.reference.clone().unwrap_or_else(|| "-".to_string()),
        ]
    }
}

impl TableRow for Ticket {
    const HEADERS: &'static [&'static str] = &["ID", "Unit", "Title", "Priority", "Status"];

    fn cells(&self, _: &NumberFormat) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.unit_id.to_string(),
            self.title.clone(),
            self.priority.clone(),
            self.status.clone(),
        ]
    }
}

/// Per-lease view assembled from invoices (the backend has no lease list)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaseSummary {
    pub lease_id: i64,
    pub invoice_count: usize,
    pub paid_count: usize,
    /// Due date of the first invoice returned for the lease
    pub first_due: NaiveDate,
    pub amount: f64,
}

impl LeaseSummary {
    /// Group invoices by lease, ascending lease id
    pub fn from_invoices(invoices: &[Invoice]) -> Vec<LeaseSummary> {
        let mut by_lease: BTreeMap<i64, Vec<&Invoice>> = BTreeMap::new();
        for invoice in invoices {
            by_lease.entry(invoice.lease_id).or_default().push(invoice);
        }

        by_lease
            .into_iter()
            .filter_map(|(lease_id, group)| {
                let first = group.first()?;
                Some(LeaseSummary {
                    lease_id,
                    invoice_count: group.len(),
                    paid_count: group.iter().filter(|i| i.is_paid()).count(),
                    first_due: first.due_date,
                    amount: first.amount,
                })
            })
            .collect()
    }
}

impl TableRow for LeaseSummary {
    const HEADERS: &'static [&'static str] = &["Lease", "Invoices", "Paid", "First due", "Amount"];

    fn cells(&self, numbers: &NumberFormat) -> Vec<String> {
        vec![
            self.lease_id.to_string(),
            self.invoice_count.to_string(),
            self.paid_count.to_string(),
            self.first_due.to_string(),
            numbers.amount(self.amount),
        ]
    }
}

/// Render a list in the requested format
pub fn render_list<T: TableRow + Serialize>(
    items: &[T],
    format: OutputFormat,
    numbers: &NumberFormat,
) -> RenderResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(items)?),
        OutputFormat::Csv => {
            let rows: Vec<Vec<String>> = items.iter().map(|i| i.cells(numbers)).collect();
            csv_text(T::HEADERS, &rows)
        }
        OutputFormat::Table => {
            if items.is_empty() {
                return Ok("No records.\n".to_string());
            }
            let rows: Vec<Vec<String>> = items.iter().map(|i| i.cells(numbers)).collect();
            Ok(table_text(T::HEADERS, &rows))
        }
    }
}

/// Render the dashboard: KPI cards, monthly revenue and recent invoices
pub fn render_dashboard(
    view: &DashboardView,
    format: OutputFormat,
    numbers: &NumberFormat,
) -> RenderResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(view)?),
        OutputFormat::Csv => {
            let rows: Vec<Vec<String>> = view
                .series
                .iter()
                .map(|(month, total)| vec![month.to_string(), total.to_string()])
                .collect();
            csv_text(&["month", "revenue"], &rows)
        }
        OutputFormat::Table => {
            let mut out = String::new();

            for (label, value) in view.kpis.display(numbers) {
                let _ = writeln!(out, "{:<18} {}", label, value);
            }

            out.push_str("\nRevenue by month\n");
            if view.series.is_empty() {
                out.push_str("No paid invoices yet.\n");
            } else {
                let rows: Vec<Vec<String>> = view
                    .series
                    .iter()
                    .map(|(month, total)| vec![month.to_string(), numbers.amount(total)])
                    .collect();
                out.push_str(&table_text(&["Month", "Revenue"], &rows));
            }

            out.push_str("\nRecent invoices\n");
            out.push_str(&render_list(&view.recent, OutputFormat::Table, numbers)?);
            Ok(out)
        }
    }
}

fn table_text(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if let Some(w) = widths.get_mut(i) {
                *w = (*w).max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", padded_row(headers.iter().copied(), &widths));
    let total: usize = widths.iter().sum::<usize>() + 3 * widths.len().saturating_sub(1);
    let _ = writeln!(out, "{}", "-".repeat(total));
    for row in rows {
        let _ = writeln!(out, "{}", padded_row(row.iter().map(String::as_str), &widths));
    }
    out
}

fn padded_row<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

fn csv_text(headers: &[&str], rows: &[Vec<String>]) -> RenderResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| RenderError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Rendering errors
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid UTF-8 in output: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

pub type RenderResult<T> = Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn invoice(id: i64, lease_id: i64, status: &str, amount: f64, due: &str) -> Invoice {
        Invoice {
            id,
            lease_id,
            due_date: NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap(),
            amount,
            status: status.to_string(),
            reference: None,
        }
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_table_alignment() {
        let estates = vec![
            Estate { id: 1, name: "Palm Grove".into(), location: "Lekki".into() },
            Estate { id: 12, name: "Oak".into(), location: "Ikeja".into() },
        ];

        let out = render_list(&estates, OutputFormat::Table, &NumberFormat::default()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "ID | Name       | Location");
        assert_eq!(lines[1], "-".repeat(26));
        assert_eq!(lines[2], "1  | Palm Grove | Lekki");
        assert_eq!(lines[3], "12 | Oak        | Ikeja");
    }

    #[test]
    fn test_empty_table() {
        let out = render_list::<Tenant>(&[], OutputFormat::Table, &NumberFormat::default()).unwrap();
        assert_eq!(out, "No records.\n");
    }

    #[test]
    fn test_csv_quotes_fields() {
        let tenants = vec![Tenant {
            id: 1,
            full_name: "Obi, Ada".into(),
            email: "ada@example.com".into(),
            phone: None,
        }];

        let out = render_list(&tenants, OutputFormat::Csv, &NumberFormat::default()).unwrap();
        assert_eq!(out, "ID,Name,Email,Phone\n1,\"Obi, Ada\",ada@example.com,\n");
    }

    #[test]
    fn test_invoice_cells_format_amount() {
        let cells = invoice(5, 2, "paid", 12500.0, "2024-03-01").cells(&NumberFormat::default());
        assert_eq!(cells, vec!["5", "2", "2024-03-01", "12,500", "paid", "-"]);
    }

    #[test]
    fn test_lease_summaries() {
        let invoices = vec![
            invoice(1, 7, "paid", 500.0, "2024-01-01"),
            invoice(2, 3, "pending", 900.0, "2024-02-01"),
            invoice(3, 7, "pending", 500.0, "2024-02-01"),
        ];

        let leases = LeaseSummary::from_invoices(&invoices);
        assert_eq!(leases.len(), 2);
        assert_eq!(leases[0].lease_id, 3);
        assert_eq!(leases[1].lease_id, 7);
        assert_eq!(leases[1].invoice_count, 2);
        assert_eq!(leases[1].paid_count, 1);
        assert_eq!(leases[1].first_due.to_string(), "2024-01-01");
    }

    #[test]
    fn test_dashboard_table() {
        let invoices = vec![
            invoice(1, 1, "paid", 100.0, "2024-01-15"),
            invoice(2, 1, "paid", 50.0, "2024-01-20"),
            invoice(3, 1, "pending", 200.0, "2024-02-01"),
        ];
        let view = DashboardView::build(&[], &[], &invoices);

        let out = render_dashboard(&view, OutputFormat::Table, &NumberFormat::default()).unwrap();
        assert!(out.contains("Occupancy          0%"));
        assert!(out.contains("Pending invoices   1"));
        assert!(out.contains("2024-01 | 150"));
        assert!(out.contains("Recent invoices"));

        let csv = render_dashboard(&view, OutputFormat::Csv, &NumberFormat::default()).unwrap();
        assert_eq!(csv, "month,revenue\n2024-01,150\n");
    }
}
