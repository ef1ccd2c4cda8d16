//! Horizon REST client.
//!
//! Implements `LedgerDataProvider` and `SwapLedger`. Account enumeration
//! follows `_links.next.href` until a short or empty page and returns every
//! account once.

use crate::config::HorizonConfig;
use crate::signer::EnvelopeSigner;
use crate::types::{asset_type, AccountRecord, Page, PathRecord, Problem, SubmitResponse};
use async_trait::async_trait;
use mlm_03_token_swap::{
    build_swap_transaction, PathQuote, StrictSendOrder, StrictSendReceipt, SwapLedger,
};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use shared_types::{AccountId, Amount, Asset, LedgerAccount, LedgerDataProvider, LedgerError};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

fn transport(e: reqwest::Error) -> LedgerError {
    LedgerError::Transport(e.to_string())
}

/// Ledger access over Horizon.
pub struct HorizonClient {
    http: Client,
    config: HorizonConfig,
    signer: Option<EnvelopeSigner>,
}

impl HorizonClient {
    pub fn new(config: HorizonConfig) -> Result<Self, LedgerError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(transport)?;

        Ok(Self {
            http,
            config,
            signer: None,
        })
    }

    /// Enable submission, signing with `signer`.
    pub fn with_signer(mut self, signer: EnvelopeSigner) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn config(&self) -> &HorizonConfig {
        &self.config
    }

    fn url(&self, path: &str) -> Result<Url, LedgerError> {
        let raw = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        Url::parse(&raw).map_err(|e| LedgerError::Transport(format!("invalid url {:?}: {}", raw, e)))
    }

    /// GET and decode. `Ok(None)` on 404.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, LedgerError> {
        let response = self.http.get(url.clone()).send().await.map_err(transport)?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let problem: Problem = response.json().await.unwrap_or_default();
            return Err(LedgerError::Transport(format!(
                "{} from {}: {}",
                status,
                url.path(),
                problem.reason()
            )));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| LedgerError::Malformed(e.to_string()))
    }

    /// Sign `unsigned_xdr` and POST it. Returns the ledger's hash.
    async fn sign_and_submit(&self, unsigned_xdr: &str) -> Result<String, LedgerError> {
        let signer = self
            .signer
            .as_ref()
            .ok_or_else(|| LedgerError::Signing("no signing key configured".to_string()))?;
        let signed = signer.sign(&self.config.network_passphrase, unsigned_xdr)?;

        let response = self
            .http
            .post(self.url("transactions")?)
            .form(&[("tx", signed.envelope_xdr.as_str())])
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();

        if status.is_success() {
            let body: SubmitResponse = response
                .json()
                .await
                .map_err(|e| LedgerError::Malformed(e.to_string()))?;
            if body.hash != signed.hash {
                warn!(expected = %signed.hash, actual = %body.hash, "Horizon reported an unexpected hash");
            }
            info!(hash = %body.hash, "Transaction submitted");
            return Ok(body.hash);
        }

        let problem: Problem = response.json().await.unwrap_or_default();
        if status == StatusCode::BAD_REQUEST {
            return Err(LedgerError::Rejected(problem.reason()));
        }
        Err(LedgerError::Transport(format!(
            "{} from /transactions: {}",
            status,
            problem.reason()
        )))
    }
}

#[async_trait]
impl LedgerDataProvider for HorizonClient {
    async fn accounts_holding(&self, asset: &Asset) -> Result<Vec<LedgerAccount>, LedgerError> {
        let limit = self.config.page_limit as usize;
        let mut url = self.url("accounts")?;
        url.query_pairs_mut()
            .append_pair("asset", &asset.canonical())
            .append_pair("limit", &limit.to_string());

        let mut seen: HashSet<AccountId> = HashSet::new();
        let mut accounts = Vec::new();
        let mut pages = 0usize;
        let mut next = Some(url);

        while let Some(url) = next.take() {
            let page: Page<AccountRecord> = self
                .get_json(url)
                .await?
                .ok_or_else(|| LedgerError::Malformed("account page not found".to_string()))?;
            pages += 1;

            let count = page.embedded.records.len();
            for record in page.embedded.records {
                let account = record.into_ledger_account()?;
                if seen.insert(account.account_id.clone()) {
                    accounts.push(account);
                }
            }

            if count == 0 || count < limit {
                break;
            }
            next = page
                .links
                .next
                .map(|link| Url::parse(&link.href))
                .transpose()
                .map_err(|e| LedgerError::Malformed(format!("next link: {}", e)))?;
        }

        debug!(
            asset = %asset.canonical(),
            pages,
            accounts = accounts.len(),
            "Enumerated asset holders"
        );
        Ok(accounts)
    }

    async fn account_detail(&self, account: &AccountId) -> Result<LedgerAccount, LedgerError> {
        let url = self.url(&format!("accounts/{}", account))?;
        self.get_json::<AccountRecord>(url)
            .await?
            .ok_or_else(|| LedgerError::AccountNotFound(account.clone()))?
            .into_ledger_account()
    }

    async fn submit_transaction(&self, envelope_xdr: &str) -> Result<String, LedgerError> {
        self.sign_and_submit(envelope_xdr).await
    }
}

#[async_trait]
impl SwapLedger for HorizonClient {
    async fn strict_send_paths(
        &self,
        source: &Asset,
        source_amount: Amount,
        destination: &Asset,
    ) -> Result<Vec<PathQuote>, LedgerError> {
        let mut url = self.url("paths/strict-send")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("source_asset_type", asset_type(source));
            if let Asset::Credit { code, issuer } = source {
                query
                    .append_pair("source_asset_code", code)
                    .append_pair("source_asset_issuer", issuer.as_str());
            }
            query
                .append_pair("source_amount", &source_amount.to_string())
                .append_pair("destination_assets", &destination.canonical());
        }

        let page: Page<PathRecord> = self
            .get_json(url)
            .await?
            .ok_or_else(|| LedgerError::NoPath {
                from: source.code().to_string(),
                to: destination.code().to_string(),
            })?;

        page.embedded
            .records
            .into_iter()
            .map(PathRecord::into_quote)
            .collect()
    }

    async fn execute_strict_send(&self, order: &StrictSendOrder) -> Result<StrictSendReceipt, LedgerError> {
        let account = self.account_detail(&order.account).await?;

        let best = self
            .strict_send_paths(&order.send_asset, order.send_amount, &order.dest_asset)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| LedgerError::NoPath {
                from: order.send_asset.code().to_string(),
                to: order.dest_asset.code().to_string(),
            })?;

        let envelope = build_swap_transaction(&account, order, &best.path).to_unsigned_envelope_base64()?;
        let hash = self.sign_and_submit(&envelope).await?;

        Ok(StrictSendReceipt {
            hash,
            destination_amount: best.destination_amount,
        })
    }
}
