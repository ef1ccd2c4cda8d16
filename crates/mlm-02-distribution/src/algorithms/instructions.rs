//! Transfer Instructions
//!
//! Turns the payout list into an unsigned ledger transaction: one payment per
//! payout, a day-stamped memo, no expiry.

use crate::domain::entities::DistributeRow;
use chrono::NaiveDate;
use shared_types::envelope::{Operation, TimeBounds, TransactionDraft};
use shared_types::{EnvelopeError, LedgerAccount};

/// Parameters of the payout transaction.
#[derive(Clone, Debug)]
pub struct InstructionParams<'a> {
    pub memo_prefix: &'a str,
    /// Fee per operation in stroops
    pub base_fee: u32,
    pub date: NaiveDate,
}

/// Memo text for a payout transaction: `"<prefix> YYYY-MM-DD"`.
pub fn payout_memo(prefix: &str, date: NaiveDate) -> String {
    format!("{} {}", prefix, date.format("%Y-%m-%d"))
}

/// Build the payout transaction draft for `source`.
pub fn build_payout_transaction(
    source: &LedgerAccount,
    distributes: &[DistributeRow],
    params: &InstructionParams<'_>,
) -> TransactionDraft {
    let draft = TransactionDraft::new(source.account_id.clone(), source.sequence, params.base_fee)
        .with_memo_text(payout_memo(params.memo_prefix, params.date))
        .with_time_bounds(TimeBounds::unbounded());

    distributes.iter().fold(draft, |draft, d| {
        draft.with_operation(Operation::Payment {
            destination: d.recommender.clone(),
            asset: d.asset.clone(),
            amount: d.amount,
        })
    })
}

/// Build and encode the payout transaction as an unsigned base64 envelope.
pub fn build_transfer_instructions(
    source: &LedgerAccount,
    distributes: &[DistributeRow],
    params: &InstructionParams<'_>,
) -> Result<String, EnvelopeError> {
    build_payout_transaction(source, distributes, params).to_unsigned_envelope_base64()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::entities::well_known;
    use shared_types::envelope::{unsigned_transaction, Memo};
    use shared_types::{AccountId, Amount};

    fn params() -> InstructionParams<'static> {
        InstructionParams {
            memo_prefix: "mlta mlm",
            base_fee: 1000,
            date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        }
    }

    fn payouts() -> Vec<DistributeRow> {
        vec![
            DistributeRow {
                recommender: AccountId::new(well_known::MTLAP_ISSUER),
                asset: well_known::labr(),
                amount: Amount::parse("33.3333333").unwrap(),
            },
            DistributeRow {
                recommender: AccountId::new(well_known::EURMTL_ISSUER),
                asset: well_known::labr(),
                amount: Amount::parse("66.6666666").unwrap(),
            },
        ]
    }

    fn source() -> LedgerAccount {
        LedgerAccount::new(well_known::LABR_ISSUER).with_sequence(100)
    }

    #[test]
    fn test_payout_transaction_shape() {
        let tx = build_payout_transaction(&source(), &payouts(), &params());

        assert_eq!(tx.sequence, 101);
        assert_eq!(tx.fee().unwrap(), 2000);
        assert_eq!(tx.memo, Memo::Text("mlta mlm 2024-05-01".to_string()));
        assert_eq!(tx.time_bounds, Some(TimeBounds::unbounded()));
        assert_eq!(tx.operations.len(), 2);
    }

    #[test]
    fn test_instructions_decode_back_to_body() {
        let xdr = build_transfer_instructions(&source(), &payouts(), &params()).unwrap();
        let body = unsigned_transaction(&xdr).unwrap();
        let expected = build_payout_transaction(&source(), &payouts(), &params())
            .to_transaction()
            .unwrap();
        assert_eq!(body, expected);
    }

    #[test]
    fn test_empty_payouts_cannot_be_encoded() {
        assert!(matches!(
            build_transfer_instructions(&source(), &[], &params()),
            Err(EnvelopeError::OperationCount { count: 0, .. })
        ));
    }
}
