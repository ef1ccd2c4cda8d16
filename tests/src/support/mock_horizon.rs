//! # Mock Horizon
//!
//! A `wiremock` server answering the Horizon endpoints the subsystems call,
//! with canned JSON built from `LedgerAccount` fixtures. Unmatched requests
//! get wiremock's empty 404, which Horizon clients read as "not found".

use serde_json::{json, Value};
use shared_types::{Amount, Asset, LedgerAccount};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

pub struct MockHorizon {
    server: MockServer,
}

impl MockHorizon {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn url(&self) -> String {
        self.server.uri()
    }

    /// Serve `accounts` as a single page of `/accounts?asset=...`.
    pub async fn holders(&self, accounts: &[LedgerAccount]) {
        let records: Vec<Value> = accounts.iter().map(account_json).collect();
        Mock::given(method("GET"))
            .and(path("/accounts"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_json(records, None)))
            .mount(&self.server)
            .await;
    }

    /// Serve `/accounts/{id}` for `account`.
    pub async fn account(&self, account: &LedgerAccount) {
        Mock::given(method("GET"))
            .and(path(format!("/accounts/{}", account.account_id)))
            .respond_with(ResponseTemplate::new(200).set_body_json(account_json(account)))
            .mount(&self.server)
            .await;
    }

    /// Answer every `/paths/strict-send` query with `page`.
    pub async fn paths(&self, page: Value) {
        Mock::given(method("GET"))
            .and(path("/paths/strict-send"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page))
            .mount(&self.server)
            .await;
    }

    /// Answer `/paths/strict-send` queries for `source_amount` with `page`.
    pub async fn paths_for(&self, source_amount: Amount, page: Value) {
        Mock::given(method("GET"))
            .and(path("/paths/strict-send"))
            .and(query_param("source_amount", source_amount.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page))
            .mount(&self.server)
            .await;
    }

    /// Accept every submission, answering with `hash`.
    pub async fn accept_transactions(&self, hash: &str) {
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "hash": hash })))
            .mount(&self.server)
            .await;
    }

    /// Reject every submission with Horizon's result codes.
    pub async fn reject_transactions(&self, code: &str) {
        let body = json!({
            "title": "Transaction Failed",
            "status": 400,
            "extras": { "result_codes": { "transaction": code } }
        });
        Mock::given(method("POST"))
            .and(path("/transactions"))
            .respond_with(ResponseTemplate::new(400).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }

    /// The `tx` field of every form POSTed to `/transactions`.
    pub async fn submissions(&self) -> Vec<String> {
        self.requests()
            .await
            .into_iter()
            .filter(|r| r.method.as_str() == "POST" && r.url.path() == "/transactions")
            .filter_map(|r| serde_urlencoded::from_bytes::<Vec<(String, String)>>(&r.body).ok())
            .filter_map(|fields| fields.into_iter().find(|(k, _)| k == "tx").map(|(_, v)| v))
            .collect()
    }
}

// =============================================================================
// JSON BUILDERS
// =============================================================================

fn asset_fields(asset: &Asset) -> (Value, Value, Value) {
    match asset {
        Asset::Native => (json!("native"), Value::Null, Value::Null),
        Asset::Credit { code, issuer } => {
            let kind = if code.len() <= 4 {
                "credit_alphanum4"
            } else {
                "credit_alphanum12"
            };
            (json!(kind), json!(code), json!(issuer.as_str()))
        }
    }
}

/// Horizon's account record for `account`.
pub fn account_json(account: &LedgerAccount) -> Value {
    let balances: Vec<Value> = account
        .balances
        .iter()
        .map(|b| {
            let (kind, code, issuer) = asset_fields(&b.asset);
            json!({
                "balance": b.amount.to_string(),
                "asset_type": kind,
                "asset_code": code,
                "asset_issuer": issuer,
            })
        })
        .collect();

    json!({
        "id": account.account_id.as_str(),
        "account_id": account.account_id.as_str(),
        "sequence": account.sequence.to_string(),
        "balances": balances,
        "data": account.data,
    })
}

pub fn page_json(records: Vec<Value>, next: Option<&str>) -> Value {
    let mut links = json!({});
    if let Some(href) = next {
        links = json!({ "next": { "href": href } });
    }
    json!({
        "_embedded": { "records": records },
        "_links": links,
    })
}

/// A one-record `/paths/strict-send` page converting `source_amount` of
/// `source` into `destination_amount` of `destination`.
pub fn strict_send_page(
    source: &Asset,
    source_amount: Amount,
    destination: &Asset,
    destination_amount: Amount,
) -> Value {
    let (s_kind, s_code, s_issuer) = asset_fields(source);
    let (d_kind, d_code, d_issuer) = asset_fields(destination);
    let record = json!({
        "source_asset_type": s_kind,
        "source_asset_code": s_code,
        "source_asset_issuer": s_issuer,
        "source_amount": source_amount.to_string(),
        "destination_asset_type": d_kind,
        "destination_asset_code": d_code,
        "destination_asset_issuer": d_issuer,
        "destination_amount": destination_amount.to_string(),
        "path": [],
    });
    page_json(vec![record], None)
}
