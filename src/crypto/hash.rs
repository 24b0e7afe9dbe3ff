//! Keccak-256 digests for order and ring identity.
//!
//! ## Digest Layout
//!
//! - **Order hash**: Keccak-256 over the settlement system's own address
//!   followed by the order's SSZ byte image. Keying the hash with the
//!   system address means the same order content signed for a different
//!   deployment produces a different digest, so signatures cannot be
//!   replayed across systems.
//! - **Ring hash**: Keccak-256 over the concatenation, in ring order, of
//!   each order signature's recovery byte, `r`, and `s`, followed by the
//!   fee recipient and the insufficient-fee policy flag byte.
//! - **Signed message hash**: the order/ring hash wrapped in the fixed
//!   `"\x19Ethereum Signed Message:\n32"` prefix before the final digest.
//!   Wallet signers apply this prefix, so recovery must match it exactly.

use sha3::{Digest, Keccak256};

use crate::error::SettlementError;
use crate::types::{Address, Order, OrderHash, Signature};

/// Fixed prefix wallet signers prepend to a 32-byte digest before signing.
const SIGNED_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n32";

/// Compute Keccak-256 of the given data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compute Keccak-256 over the concatenation of multiple slices
pub fn keccak_all(items: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for item in items {
        hasher.update(item);
    }
    hasher.finalize().into()
}

/// Content hash of an order, keyed by the settlement system's identity.
///
/// This digest keys the persistent filled/cancelled counters and is the
/// message the owner signed (after prefix wrapping). It must be bit-exact
/// and stable across releases, which the SSZ encoding guarantees.
pub fn order_hash(settlement_id: Address, order: &Order) -> Result<OrderHash, SettlementError> {
    let encoded = ssz_rs::serialize(order)
        .map_err(|_| SettlementError::SettlementInvariantViolation("order SSZ encoding failed"))?;
    Ok(keccak_all(&[&settlement_id, &encoded]))
}

/// Identity hash of a ring submission.
///
/// Covers every order signature (recovery byte, then r, then s), the fee
/// recipient, and the policy flag; the miner signs this digest.
pub fn ring_hash(
    order_signatures: &[Signature],
    fee_recipient: Address,
    throw_if_lrc_insufficient: bool,
) -> OrderHash {
    let mut hasher = Keccak256::new();
    for sig in order_signatures {
        hasher.update([sig.v]);
        hasher.update(sig.r);
        hasher.update(sig.s);
    }
    hasher.update(fee_recipient);
    hasher.update([throw_if_lrc_insufficient as u8]);
    hasher.finalize().into()
}

/// Wrap a digest in the fixed textual signing prefix.
pub fn signed_message_hash(hash: &OrderHash) -> OrderHash {
    keccak_all(&[SIGNED_MESSAGE_PREFIX, hash])
}

// ============================================================================
// Unit Tests
// ============================================================================
