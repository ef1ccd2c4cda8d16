//! Algorithms module for the Distribution subsystem
//!
//! Contains:
//! - The incremental payout calculator
//! - Payout transaction construction

pub mod calculator;
pub mod instructions;

pub use calculator::{calculate_distribution, plan_from_rows};
pub use instructions::{build_payout_transaction, build_transfer_instructions, payout_memo, InstructionParams};
