//! Algorithms module for the Token Swap subsystem
//!
//! Contains:
//! - Price and slippage arithmetic
//! - Swap transaction construction

pub mod order;
pub mod pricing;

pub use order::{build_swap_transaction, swap_memo};
pub use pricing::{effective_price, expected_output, minimum_output, SwapPlan};
