//! Horizon response records and their conversion into ledger types.

use mlm_03_token_swap::PathQuote;
use serde::Deserialize;
use shared_types::{AccountId, Amount, Asset, Balance, LedgerAccount, LedgerError};
use std::collections::BTreeMap;

const ASSET_TYPE_NATIVE: &str = "native";
const ASSET_TYPE_CREDIT_4: &str = "credit_alphanum4";
const ASSET_TYPE_CREDIT_12: &str = "credit_alphanum12";

/// A page of a Horizon collection.
#[derive(Debug, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "_embedded")]
    pub embedded: Embedded<T>,
    #[serde(rename = "_links", default)]
    pub links: PageLinks,
}

#[derive(Debug, Deserialize)]
pub struct Embedded<T> {
    pub records: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageLinks {
    pub next: Option<Link>,
}

#[derive(Debug, Deserialize)]
pub struct Link {
    pub href: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountRecord {
    pub account_id: String,
    pub sequence: String,
    #[serde(default)]
    pub balances: Vec<BalanceRecord>,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct BalanceRecord {
    pub balance: String,
    pub asset_type: String,
    pub asset_code: Option<String>,
    pub asset_issuer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PathRecord {
    pub source_asset_type: String,
    pub source_asset_code: Option<String>,
    pub source_asset_issuer: Option<String>,
    pub source_amount: String,
    pub destination_asset_type: String,
    pub destination_asset_code: Option<String>,
    pub destination_asset_issuer: Option<String>,
    pub destination_amount: String,
    #[serde(default)]
    pub path: Vec<PathAssetRecord>,
}

#[derive(Debug, Deserialize)]
pub struct PathAssetRecord {
    pub asset_type: String,
    pub asset_code: Option<String>,
    pub asset_issuer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SubmitResponse {
    pub hash: String,
}

/// Horizon error document (RFC 7807 problem).
#[derive(Debug, Default, Deserialize)]
pub struct Problem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub extras: Option<ProblemExtras>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProblemExtras {
    pub result_codes: Option<serde_json::Value>,
}

impl Problem {
    /// The ledger's own reason: result codes when present, else the detail.
    pub fn reason(&self) -> String {
        match self.extras.as_ref().and_then(|e| e.result_codes.as_ref()) {
            Some(codes) => codes.to_string(),
            None if !self.detail.is_empty() => self.detail.clone(),
            None => self.title.clone(),
        }
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

fn malformed(what: impl std::fmt::Display) -> LedgerError {
    LedgerError::Malformed(what.to_string())
}

fn parse_amount(raw: &str) -> Result<Amount, LedgerError> {
    Amount::parse(raw).map_err(|e| malformed(format_args!("amount {:?}: {}", raw, e)))
}

/// Asset from Horizon's split fields. `Ok(None)` for kinds that are not
/// assets (liquidity pool shares).
fn asset_from_parts(
    asset_type: &str,
    code: Option<&str>,
    issuer: Option<&str>,
) -> Result<Option<Asset>, LedgerError> {
    match asset_type {
        ASSET_TYPE_NATIVE => Ok(Some(Asset::Native)),
        ASSET_TYPE_CREDIT_4 | ASSET_TYPE_CREDIT_12 => match (code, issuer) {
            (Some(code), Some(issuer)) => Ok(Some(Asset::credit(code, issuer))),
            _ => Err(malformed(format_args!("{} without code or issuer", asset_type))),
        },
        _ => Ok(None),
    }
}

fn required_asset(
    asset_type: &str,
    code: Option<&str>,
    issuer: Option<&str>,
) -> Result<Asset, LedgerError> {
    asset_from_parts(asset_type, code, issuer)?
        .ok_or_else(|| malformed(format_args!("unexpected asset type {:?}", asset_type)))
}

/// Horizon's `asset_type` for an asset.
pub fn asset_type(asset: &Asset) -> &'static str {
    match asset {
        Asset::Native => ASSET_TYPE_NATIVE,
        Asset::Credit { code, .. } if code.len() <= 4 => ASSET_TYPE_CREDIT_4,
        Asset::Credit { .. } => ASSET_TYPE_CREDIT_12,
    }
}

impl AccountRecord {
    pub fn into_ledger_account(self) -> Result<LedgerAccount, LedgerError> {
        let sequence = self
            .sequence
            .parse::<i64>()
            .map_err(|e| malformed(format_args!("sequence {:?}: {}", self.sequence, e)))?;

        let mut balances = Vec::with_capacity(self.balances.len());
        for b in &self.balances {
            let asset = asset_from_parts(&b.asset_type, b.asset_code.as_deref(), b.asset_issuer.as_deref())?;
            if let Some(asset) = asset {
                balances.push(Balance {
                    asset,
                    amount: parse_amount(&b.balance)?,
                });
            }
        }

        Ok(LedgerAccount {
            account_id: AccountId::new(self.account_id),
            sequence,
            balances,
            data: self.data,
        })
    }
}

impl PathRecord {
    pub fn into_quote(self) -> Result<PathQuote, LedgerError> {
        let path = self
            .path
            .iter()
            .map(|p| required_asset(&p.asset_type, p.asset_code.as_deref(), p.asset_issuer.as_deref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PathQuote {
            source_asset: required_asset(
                &self.source_asset_type,
                self.source_asset_code.as_deref(),
                self.source_asset_issuer.as_deref(),
            )?,
            source_amount: parse_amount(&self.source_amount)?,
            destination_asset: required_asset(
                &self.destination_asset_type,
                self.destination_asset_code.as_deref(),
                self.destination_asset_issuer.as_deref(),
            )?,
            destination_amount: parse_amount(&self.destination_amount)?,
            path,
        })
    }
}
