//! Estate REST API Client
//!
//! Every request carries JSON headers and, when a session is attached, the
//! bearer token. Non-2xx responses are unwrapped into [`ClientError::Http`].

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

use super::error::{ClientError, ClientResult};
use crate::models::{
    Estate, GeneratedInvoices, Health, Invoice, Lease, LoginRequest, NewEstate, NewLease,
    NewPayment, NewProperty, NewTenant, NewTicket, NewUnit, Payment, Property, RegisterRequest,
    Tenant, Ticket, TokenResponse, Unit,
};
use crate::session::Session;

/// Optional filters for `GET /units`
#[derive(Debug, Clone, Default)]
pub struct UnitFilter {
    pub property_id: Option<i64>,
    pub occupied: Option<bool>,
}

/// HTTP client for the estate backend
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Create a client for `base_url`. `timeout` of `None` keeps the
    /// transport default.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> ClientResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Attach the session whose token authorizes subsequent requests
    pub fn with_session(mut self, session: &Session) -> Self {
        self.token = Some(session.token.clone());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ============ Auth ============

    pub async fn register(&self, body: &RegisterRequest) -> ClientResult<TokenResponse> {
        self.post("/auth/register", body).await
    }

    pub async fn login(&self, body: &LoginRequest) -> ClientResult<TokenResponse> {
        self.post("/auth/login", body).await
    }

    // ============ Estates / Properties / Units ============

    pub async fn list_estates(&self) -> ClientResult<Vec<Estate>> {
        self.get("/estates").await
    }

    pub async fn create_estate(&self, body: &NewEstate) -> ClientResult<Estate> {
        self.post("/estates", body).await
    }

    pub async fn list_properties(&self, estate_id: Option<i64>) -> ClientResult<Vec<Property>> {
        let path = match estate_id {
            Some(id) => format!("/properties?estate_id={}", id),
            None => "/properties".to_string(),
        };
        self.get(&path).await
    }

    pub async fn create_property(&self, body: &NewProperty) -> ClientResult<Property> {
        self.post("/properties", body).await
    }

    pub async fn list_units(&self, filter: &UnitFilter) -> ClientResult<Vec<Unit>> {
        let mut params = Vec::new();
        if let Some(property_id) = filter.property_id {
            params.push(format!("property_id={}", property_id));
        }
        if let Some(occupied) = filter.occupied {
            params.push(format!("occupied={}", occupied));
        }

        let path = if params.is_empty() {
            "/units".to_string()
        } else {
            format!("/units?{}", params.join("&"))
        };
        self.get(&path).await
    }

    pub async fn create_unit(&self, body: &NewUnit) -> ClientResult<Unit> {
        self.post("/units", body).await
    }

    // ============ Tenants ============

    /// List tenants, optionally matching `query` against name or e-mail
    pub async fn list_tenants(&self, query: Option<&str>) -> ClientResult<Vec<Tenant>> {
        let path = match query {
            Some(q) if !q.is_empty() => format!("/tenants?q={}", urlencoding::encode(q)),
            _ => "/tenants".to_string(),
        };
        self.get(&path).await
    }

    pub async fn create_tenant(&self, body: &NewTenant) -> ClientResult<Tenant> {
        self.post("/tenants", body).await
    }

    // ============ Leases / Invoices / Payments ============

    pub async fn create_lease(&self, body: &NewLease) -> ClientResult<Lease> {
        self.post("/leases", body).await
    }

    pub async fn generate_invoices(&self, lease_id: i64) -> ClientResult<GeneratedInvoices> {
        let path = format!("/leases/{}/generate-invoices", lease_id);
        let response = self.execute(self.client.post(self.url(&path))).await?;
        decode(response).await
    }

    /// List invoices. `Some("")` sends an empty `status=` parameter, which the
    /// backend treats the same as no filter.
    pub async fn list_invoices(&self, status: Option<&str>) -> ClientResult<Vec<Invoice>> {
        let path = match status {
            Some(s) => format!("/invoices?status={}", urlencoding::encode(s)),
            None => "/invoices".to_string(),
        };
        self.get(&path).await
    }

    pub async fn record_payment(&self, body: &NewPayment) -> ClientResult<Payment> {
        self.post("/payments", body).await
    }

    /// Amount due on one invoice, looked up from the full invoice list
    pub async fn invoice_amount(&self, invoice_id: i64) -> ClientResult<f64> {
        self.list_invoices(Some(""))
            .await?
            .into_iter()
            .find(|i| i.id == invoice_id)
            .map(|i| i.amount)
            .ok_or(ClientError::InvoiceNotFound(invoice_id))
    }

    // ============ Maintenance ============

    pub async fn create_ticket(&self, body: &NewTicket) -> ClientResult<Ticket> {
        self.post("/maintenance/tickets", body).await
    }

    /// Change status and/or priority of a ticket
    pub async fn update_ticket(
        &self,
        ticket_id: i64,
        status: Option<&str>,
        priority: Option<&str>,
    ) -> ClientResult<Ticket> {
        let mut params = Vec::new();
        if let Some(status) = status {
            params.push(format!("status={}", urlencoding::encode(status)));
        }
        if let Some(priority) = priority {
            params.push(format!("priority={}", urlencoding::encode(priority)));
        }

        let mut path = format!("/maintenance/tickets/{}", ticket_id);
        if !params.is_empty() {
            path.push('?');
            path.push_str(&params.join("&"));
        }

        let response = self.execute(self.client.patch(self.url(&path))).await?;
        decode(response).await
    }

    // ============ Health ============

    pub async fn health(&self) -> ClientResult<Health> {
        self.get("/").await
    }

    // ============ Plumbing ============

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.execute(self.client.get(self.url(path))).await?;
        decode(response).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> ClientResult<T> {
        let response = self
            .execute(self.client.post(self.url(path)).json(body))
            .await?;
        decode(response).await
    }

    /// Attach headers, send, and turn non-2xx into [`ClientError::Http`]
    async fn execute(&self, request: RequestBuilder) -> ClientResult<Response> {
        let mut request = request.header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::from_transport(e, &self.base_url))?;

        let status = response.status();
        tracing::debug!(url = %response.url(), status = status.as_u16(), "Backend response");

        if status.is_success() {
            return Ok(response);
        }

        let text = response.text().await.unwrap_or_default();
        let body = if text.is_empty() {
            status.canonical_reason().unwrap_or_default().to_string()
        } else {
            text
        };

        tracing::warn!(status = status.as_u16(), body = %body, "Backend returned an error");
        Err(ClientError::Http {
            status: status.as_u16(),
            body,
        })
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    response
        .json()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::UserIdentity;
    use axum::{
        extract::{Path, Query, RawQuery},
        http::{HeaderMap, StatusCode},
        routing::{get, patch, post},
        Json, Router,
    };
    use std::collections::HashMap;

    async fn spawn_backend(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn test_session() -> Session {
        Session::new(
            "secret-token",
            UserIdentity {
                full_name: "admin".to_string(),
                role: "admin".to_string(),
            },
        )
    }

    async fn tenants(headers: HeaderMap) -> Result<Json<serde_json::Value>, StatusCode> {
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some("Bearer secret-token") => Ok(Json(serde_json::json!([
                {"id": 1, "full_name": "Ada Obi", "email": "ada@example.com", "phone": null}
            ]))),
            _ => Err(StatusCode::UNAUTHORIZED),
        }
    }

    async fn invoices(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
        let all = serde_json::json!([
            {"id": 1, "lease_id": 1, "due_date": "2024-01-15", "amount": 100.0, "status": "paid", "ref": null},
            {"id": 2, "lease_id": 1, "due_date": "2024-02-15", "amount": 100.0, "status": "pending", "ref": null}
        ]);

        match params.get("status").map(String::as_str) {
            None | Some("") => Json(all),
            Some(status) => Json(serde_json::Value::Array(
                all.as_array()
                    .unwrap()
                    .iter()
                    .filter(|i| i["status"] == status)
                    .cloned()
                    .collect(),
            )),
        }
    }

    async fn occupied_unit() -> (StatusCode, &'static str) {
        (StatusCode::BAD_REQUEST, "Unit already occupied")
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let base = spawn_backend(Router::new().route("/tenants", get(tenants))).await;

        let client = ApiClient::new(&base, None).unwrap().with_session(&test_session());
        let list = client.list_tenants(None).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].full_name, "Ada Obi");
        assert!(list[0].phone.is_none());
    }

    #[tokio::test]
    async fn test_missing_token_is_http_error() {
        let base = spawn_backend(Router::new().route("/tenants", get(tenants))).await;

        let client = ApiClient::new(&base, None).unwrap();
        let err = client.list_tenants(None).await.unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "HTTP 401: Unauthorized");
    }

    #[tokio::test]
    async fn test_empty_status_means_no_filter() {
        let base = spawn_backend(Router::new().route("/invoices", get(invoices))).await;
        let client = ApiClient::new(&base, None).unwrap();

        let all = client.list_invoices(Some("")).await.unwrap();
        assert_eq!(all.len(), 2);

        let paid = client.list_invoices(Some("paid")).await.unwrap();
        assert_eq!(paid.len(), 1);
        assert!(paid[0].is_paid());
    }

    #[tokio::test]
    async fn test_error_body_is_kept() {
        let base = spawn_backend(Router::new().route("/leases", post(occupied_unit))).await;
        let client = ApiClient::new(&base, None).unwrap();

        let body = NewLease {
            unit_id: 1,
            tenant_id: 1,
            start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            rent_amount: 1000.0,
            frequency_months: 1,
        };
        let err = client.create_lease(&body).await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 400: Unit already occupied");
    }

    #[tokio::test]
    async fn test_generate_invoices_decodes_count() {
        let app = Router::new().route(
            "/leases/:id/generate-invoices",
            post(|Path(id): Path<i64>| async move { Json(serde_json::json!({"created": id * 4})) }),
        );
        let base = spawn_backend(app).await;
        let client = ApiClient::new(&base, None).unwrap();

        let generated = client.generate_invoices(3).await.unwrap();
        assert_eq!(generated.created, 12);
    }

    async fn patch_ticket(Path(id): Path<i64>, RawQuery(query): RawQuery) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "id": id,
            "unit_id": 1,
            "title": "Leaking tap",
            "description": query.unwrap_or_else(|| "<none>".to_string()),
            "priority": "high",
            "status": "in progress"
        }))
    }

    #[tokio::test]
    async fn test_update_ticket_query_string() {
        let app = Router::new().route("/maintenance/tickets/:id", patch(patch_ticket));
        let base = spawn_backend(app).await;
        let client = ApiClient::new(&base, None).unwrap();

        let ticket = client
            .update_ticket(4, Some("in progress"), Some("high"))
            .await
            .unwrap();
        assert_eq!(ticket.id, 4);
        assert_eq!(ticket.description, "status=in%20progress&priority=high");

        let ticket = client.update_ticket(4, None, Some("low")).await.unwrap();
        assert_eq!(ticket.description, "priority=low");

        let ticket = client.update_ticket(4, None, None).await.unwrap();
        assert_eq!(ticket.description, "<none>");
    }

    async fn echo_payment(Json(body): Json<serde_json::Value>) -> Json<serde_json::Value> {
        Json(serde_json::json!({
            "id": 9,
            "invoice_id": body["invoice_id"],
            "amount": body["amount"],
            "paid_at": "2024-03-01T10:00:00",
            "txn_ref": body["txn_ref"]
        }))
    }

    #[tokio::test]
    async fn test_record_payment() {
        let base = spawn_backend(Router::new().route("/payments", post(echo_payment))).await;
        let client = ApiClient::new(&base, None).unwrap();

        let payment = client
            .record_payment(&NewPayment {
                invoice_id: 2,
                amount: 100.0,
                txn_ref: "TXN-1".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(payment.id, 9);
        assert_eq!(payment.invoice_id, 2);
        assert_eq!(payment.amount, 100.0);
        assert_eq!(payment.txn_ref, "TXN-1");
    }

    #[tokio::test]
    async fn test_invoice_amount_lookup() {
        let base = spawn_backend(Router::new().route("/invoices", get(invoices))).await;
        let client = ApiClient::new(&base, None).unwrap();

        assert_eq!(client.invoice_amount(2).await.unwrap(), 100.0);

        let err = client.invoice_amount(9).await.unwrap_err();
        assert!(matches!(err, ClientError::InvoiceNotFound(9)));
        assert_eq!(err.to_string(), "Invoice 9 not found");
    }

    #[tokio::test]
    async fn test_unknown_route_uses_reason_phrase() {
        let base = spawn_backend(Router::new()).await;
        let client = ApiClient::new(&base, None).unwrap();

        let err = client.list_estates().await.unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ApiClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }
}
