//! # Program Fixtures
//!
//! A small recommendation program: one operating account holding 300 LABR
//! (pool 100), one recommender holding 5 MTLAP, and two recommended accounts
//! holding 10 and 20 MTLAP.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use horizon_adapter::EnvelopeSigner;
use shared_types::entities::well_known;
use shared_types::strkey::encode_seed;
use shared_types::testing::test_account_id;
use shared_types::{AccountId, Amount, LedgerAccount};

pub const RECOMMEND_TAG: &str = "RecommendToMTLA";

/// Seed of the operating account.
pub fn operator_seed() -> String {
    encode_seed(&[1u8; 32])
}

/// The account `operator_seed()` signs for.
pub fn operator() -> AccountId {
    EnvelopeSigner::from_seed(&operator_seed())
        .expect("valid seed")
        .account_id()
        .clone()
}

pub fn recommender(n: u8) -> AccountId {
    test_account_id(20 + n)
}

pub fn user(n: u8) -> AccountId {
    test_account_id(40 + n)
}

/// Data entry value endorsing `target`.
pub fn claim(target: &AccountId) -> String {
    BASE64.encode(target.as_str())
}

pub fn operator_account() -> LedgerAccount {
    LedgerAccount::new(operator())
        .with_sequence(4_200)
        .with_balance(well_known::labr(), Amount::from_units(300))
        .with_balance(well_known::eurmtl(), Amount::from_units(100))
}

/// Recommender `n` endorsing `targets`, with a LABR trustline.
pub fn recommender_account(n: u8, targets: &[AccountId]) -> LedgerAccount {
    let mut account = LedgerAccount::new(recommender(n))
        .with_balance(well_known::mtlap(), Amount::from_units(5))
        .with_balance(well_known::labr(), Amount::ZERO);
    for (i, target) in targets.iter().enumerate() {
        let key = if i == 0 {
            RECOMMEND_TAG.to_string()
        } else {
            format!("{}{}", RECOMMEND_TAG, i)
        };
        account = account.with_data(key, claim(target));
    }
    account
}

pub fn user_account(n: u8, mtlap: i64) -> LedgerAccount {
    LedgerAccount::new(user(n)).with_balance(well_known::mtlap(), Amount::from_units(mtlap))
}

/// Every MTLAP holder of the base program.
pub fn program_holders() -> Vec<LedgerAccount> {
    vec![
        recommender_account(1, &[user(1), user(2)]),
        user_account(1, 10),
        user_account(2, 20),
    ]
}
