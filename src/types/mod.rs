//! Core data types for ring settlement
//!
//! All amounts are `u64` token base units; cross-rate conversions widen to
//! `u128` and floor-divide. [`Order`] carries SSZ serialization so its byte
//! image can serve as the deterministic order hash pre-image.
//!
//! ## Types
//!
//! - [`Order`]: the immutable, owner-signed order content
//! - [`OrderState`]: an order dressed with derived identity and settlement outputs
//! - [`Ring`]: a cyclic arena of order states under settlement
//! - [`RingSettlement`]: the outcome of one settled ring
//! - [`Signature`]: a recoverable secp256k1 (v, r, s) triple
//! - [`FeeSelection`]: pay-fee vs savings-share

mod order;
mod ring;
pub mod amount;

// Re-export all types at module level
pub use order::{
    Address, FeeSelection, Order, OrderHash, OrderState, Signature, SAVINGS_SHARE_BASE,
    ZERO_ADDRESS,
};
pub use ring::{Ring, RingSettlement};
