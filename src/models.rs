//! Backend data types
//!
//! Read models returned by the estate backend and the request payloads
//! submitted by the create commands.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Invoice status meaning "awaiting payment"
pub const STATUS_PENDING: &str = "pending";
/// Invoice status meaning "settled"
pub const STATUS_PAID: &str = "paid";

// ============ Read Models ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estate {
    pub id: i64,
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: i64,
    pub code: String,
    pub address: String,
    pub estate_id: i64,
}

/// A rentable unit inside a property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: i64,
    pub property_id: i64,
    pub label: String,
    pub bedrooms: i32,
    #[serde(default)]
    pub occupied: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tenant {
    pub id: i64,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lease {
    pub id: i64,
    pub unit_id: i64,
    pub tenant_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_amount: f64,
    pub frequency_months: i32,
    pub active: bool,
}

/// A billing record produced by the backend for a lease period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: i64,
    pub lease_id: i64,
    pub due_date: NaiveDate,
    /// Non-negative currency value
    pub amount: f64,
    pub status: String,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
}

impl Invoice {
    pub fn is_paid(&self) -> bool {
        self.status == STATUS_PAID
    }

    pub fn is_pending(&self) -> bool {
        self.status == STATUS_PENDING
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub invoice_id: i64,
    pub amount: f64,
    pub paid_at: NaiveDateTime,
    pub txn_ref: String,
}

/// Maintenance ticket raised against a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: i64,
    pub unit_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: String,
    pub status: String,
}

/// Backend health document (`GET /`)
#[derive(Debug, Clone, Deserialize)]
pub struct Health {
    pub name: String,
    pub status: String,
}

/// Response of `POST /leases/{id}/generate-invoices`
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedInvoices {
    pub created: u32,
}

// ============ Request Payloads ============

#[derive(Debug, Clone, Serialize)]
pub struct NewEstate {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewProperty {
    pub code: String,
    pub address: String,
    pub estate_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewUnit {
    pub property_id: i64,
    pub label: String,
    pub bedrooms: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTenant {
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewLease {
    pub unit_id: i64,
    pub tenant_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rent_amount: f64,
    pub frequency_months: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPayment {
    pub invoice_id: i64,
    pub amount: f64,
    pub txn_ref: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewTicket {
    pub unit_id: i64,
    pub title: String,
    pub description: String,
    pub priority: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub email: String,
    pub full_name: String,
    pub password: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}
