//! Swap Transaction
//!
//! A single strict-send path payment from the operating account to itself.

use crate::domain::entities::StrictSendOrder;
use chrono::NaiveDate;
use shared_types::envelope::{Operation, TransactionDraft, MAX_MEMO_TEXT};
use shared_types::{Asset, LedgerAccount};

/// Memo of a swap transaction: `"swap <CODE>-><TARGET> YYYY-MM-DD"`.
///
/// Cut to the ledger's memo limit for long asset codes.
pub fn swap_memo(from_code: &str, to_code: &str, date: NaiveDate) -> String {
    let mut memo = format!("swap {}->{} {}", from_code, to_code, date.format("%Y-%m-%d"));
    if memo.len() > MAX_MEMO_TEXT {
        let mut cut = MAX_MEMO_TEXT;
        while !memo.is_char_boundary(cut) {
            cut -= 1;
        }
        memo.truncate(cut);
    }
    memo
}

/// Transaction draft executing `order` along `path` for `source`.
pub fn build_swap_transaction(
    source: &LedgerAccount,
    order: &StrictSendOrder,
    path: &[Asset],
) -> TransactionDraft {
    TransactionDraft::new(source.account_id.clone(), source.sequence, order.base_fee)
        .with_memo_text(order.memo.clone())
        .with_time_bounds(order.time_bounds)
        .with_operation(Operation::PathPaymentStrictSend {
            send_asset: order.send_asset.clone(),
            send_amount: order.send_amount,
            destination: order.account.clone(),
            dest_asset: order.dest_asset.clone(),
            dest_min: order.dest_min,
            path: path.to_vec(),
        })
}
