//! # Ring Settlement
//!
//! Deterministic settlement engine for rings of cyclically-matched trade
//! orders: N orders where each order's buy asset is the sell asset of the
//! next order in ring order, submitted together with a miner-asserted
//! exchange rate per order.
//!
//! ## Architecture
//!
//! - **Types**: core data structures (`Order`, `OrderState`, `Ring`)
//! - **Crypto**: Keccak-256 identity digests and secp256k1 signer recovery
//! - **Ledger**: collaborator traits for balances and persistent fill history
//! - **Engine**: the four-stage settlement pipeline
//!
//! ## Design Principles
//!
//! 1. **Determinism**: all operations produce identical results for
//!    identical inputs
//! 2. **No Floating Point**: all math is integer-only; cross-rate
//!    conversions widen to u128 and floor-divide
//! 3. **Non-Overspend**: an order never exchanges more than it has
//!    authorized or than its filled/cancelled history leaves remaining
//! 4. **Whole-Ring Atomicity**: one bad order invalidates the entire ring
//!
//! ## Example
//!
//! ```no_run
//! use ring_settlement::engine::SettlementEngine;
//! use ring_settlement::ledger::{InMemoryAssetBook, InMemoryFillHistory};
//!
//! let engine = SettlementEngine::new([0x5E; 20], [0xFC; 20]);
//! let oracle = InMemoryAssetBook::new();
//! let history = InMemoryFillHistory::new();
//! // engine.submit_ring(&submission, &oracle, &history, now)?;
//! ```

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Order, OrderState, Ring, amounts
pub mod types;

/// Keccak-256 digests and secp256k1 signer recovery
pub mod crypto;

/// Collaborator interfaces: balances, allowances, fill history
pub mod ledger;

/// The settlement pipeline
pub mod engine;

/// Error taxonomy
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use engine::{RingSubmission, SettlementEngine};
pub use error::SettlementError;
pub use types::{Address, FeeSelection, Order, OrderHash, OrderState, Ring, RingSettlement, Signature};
