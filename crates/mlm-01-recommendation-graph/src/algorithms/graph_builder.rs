//! Recommendation Graph Builder
//!
//! Resolves recommendation claims stored in account data entries into a graph
//! of recommenders and recommended accounts, detecting conflicts with
//! first-seen-wins semantics.

use crate::config::GraphConfig;
use crate::domain::entities::{RecommendationGraph, RecommendedAccount, Recommender};
use crate::domain::value_objects::{Claim, ClaimOrdering};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use shared_types::{AccountId, LedgerAccount};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Build the recommendation graph from the complete set of aggregation-token
/// holders.
///
/// Accounts appearing more than once keep their first record. Claims whose
/// value does not decode, or that reference an account outside `accounts`,
/// are skipped silently.
pub fn build_recommendation_graph(
    accounts: &[LedgerAccount],
    config: &GraphConfig,
) -> RecommendationGraph {
    let mut index: HashMap<&str, &LedgerAccount> = HashMap::with_capacity(accounts.len());
    let mut ordered: Vec<&LedgerAccount> = Vec::with_capacity(accounts.len());
    for account in accounts {
        if !index.contains_key(account.account_id.as_str()) {
            index.insert(account.account_id.as_str(), account);
            ordered.push(account);
        }
    }

    if config.ordering == ClaimOrdering::Canonical {
        ordered.sort_by(|a, b| a.account_id.cmp(&b.account_id));
    }

    let mut graph = RecommendationGraph::default();
    let mut first_claimant: HashMap<AccountId, AccountId> = HashMap::new();
    let mut conflicts: BTreeMap<AccountId, Vec<AccountId>> = BTreeMap::new();

    for candidate in ordered {
        let claims = extract_claims(candidate, &config.recommend_tag_prefix);
        if claims.is_empty() {
            continue;
        }

        let balance = candidate.credit_balance(&config.aggregation_asset);
        if balance < config.min_recommender_balance {
            debug!(
                recommender = %candidate.account_id,
                balance = %balance,
                "[mlm-01] Recommender below balance gate, claims dropped"
            );
            continue;
        }

        let mut recommended = Vec::with_capacity(claims.len());
        let mut seen: HashSet<AccountId> = HashSet::new();

        for claim in claims {
            let Some(target) = index.get(claim.target.as_str()) else {
                continue;
            };
            if !seen.insert(target.account_id.clone()) {
                continue;
            }

            match first_claimant.get(&target.account_id) {
                Some(first) => {
                    conflicts
                        .entry(target.account_id.clone())
                        .or_insert_with(|| vec![first.clone()])
                        .push(candidate.account_id.clone());
                }
                None => {
                    first_claimant.insert(target.account_id.clone(), candidate.account_id.clone());
                }
            }

            let score = target.credit_balance(&config.aggregation_asset).whole_units();
            graph.total_score += score;
            recommended.push(RecommendedAccount {
                account_id: target.account_id.clone(),
                score,
            });
        }

        graph.recommenders.push(Recommender {
            account_id: candidate.account_id.clone(),
            recommended,
        });
    }

    graph.conflicts = conflicts;
    graph
}

/// Claims of one account, in data-key order.
pub fn extract_claims(account: &LedgerAccount, prefix: &str) -> Vec<Claim> {
    account
        .data_with_prefix(prefix)
        .filter_map(|(key, value)| {
            decode_claim_target(value).map(|target| Claim {
                key: key.clone(),
                target,
            })
        })
        .collect()
}

/// Decode a base64 data value into the account id it references.
pub fn decode_claim_target(value: &str) -> Option<AccountId> {
    let bytes = BASE64.decode(value).ok()?;
    let id = String::from_utf8(bytes).ok()?;
    if id.is_empty() {
        return None;
    }
    Some(AccountId::new(id))
}
