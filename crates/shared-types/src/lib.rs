//! # Shared Types Crate
//!
//! This crate contains the ledger-facing value types used by every subsystem,
//! the `LedgerDataProvider` port, and the transaction envelope codec.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: Account identifiers, assets and amounts are
//!   defined once and shared by the graph builder, the distribution workflow
//!   and the swap engine.
//! - **Exact Arithmetic**: Every ledger amount is an integer count of
//!   10^-7 units (`Amount`); floating point never touches a payout.
//! - **Ledger Agnostic Core**: Subsystems talk to the ledger only through
//!   `LedgerDataProvider`; the Horizon client lives in `horizon-adapter`.

pub mod amount;
pub mod entities;
pub mod envelope;
pub mod errors;
pub mod ledger;
pub mod strkey;

/// Test utilities (InMemoryLedger, FixedTimeSource)
/// Requires feature: `test-utils`
#[cfg(feature = "test-utils")]
pub mod testing;

pub use amount::{Amount, STROOPS_PER_UNIT};
pub use entities::*;
pub use envelope::{Memo, Operation, TimeBounds, TransactionDraft};
pub use errors::*;
pub use ledger::{LedgerDataProvider, SystemTimeSource, TimeSource};
