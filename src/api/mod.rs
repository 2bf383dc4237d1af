//! Estate Backend API
//!
//! REST client for the property-management backend.
//!
//! ## Endpoints
//!
//! - `POST /auth/register`, `POST /auth/login`
//! - `GET|POST /estates`, `/properties`, `/units`, `/tenants`
//! - `POST /leases`, `POST /leases/{id}/generate-invoices`
//! - `GET /invoices`, `POST /payments`
//! - `POST /maintenance/tickets`, `PATCH /maintenance/tickets/{id}`
//! - `GET /` (health)

mod client;
mod error;

pub use client::{ApiClient, UnitFilter};
pub use error::{ClientError, ClientResult};
