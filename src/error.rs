//! Error taxonomy for ring settlement.
//!
//! Every error here aborts the entire ring atomically: one bad order
//! invalidates the whole submission, and nothing is retried internally.
//! The single tolerated degradation is a fee-asset shortfall under the
//! lenient policy flag, which caps the charge instead of failing (see
//! [`crate::engine::fees`]).

use crate::types::Address;

/// Errors produced while assembling, scaling, filling, or fee-settling a ring.
///
/// Derives `PartialEq` so tests can assert on exact failure modes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettlementError {
    /// Parallel submission arrays disagree on length.
    #[error("malformed ring input: expected {expected} entries in `{field}`, found {found}")]
    MalformedRingInput {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// Ring size outside the allowed range.
    #[error("invalid ring size {size}, allowed range is 2..={max}")]
    InvalidRingSize { size: usize, max: usize },

    /// An order references an asset the registry does not know.
    #[error("asset 0x{} is not registered", hex::encode(.0))]
    UnregisteredAsset(Address),

    /// A zero, expired, or out-of-range order field.
    #[error("invalid parameters for order {index}: {reason}")]
    InvalidOrderParameters { index: usize, reason: &'static str },

    /// Signature recovery failed to produce a signer address.
    #[error("signature does not recover to a valid signer address")]
    InvalidSignature,

    /// The recovered owner has no spendable balance of the sell asset.
    #[error(
        "owner 0x{} has no spendable balance of asset 0x{}",
        hex::encode(.owner),
        hex::encode(.asset)
    )]
    InsufficientBalance { owner: Address, asset: Address },

    /// Fee-asset shortfall under the strict enforcement policy.
    #[error(
        "owner 0x{} owes a fee of {required} but only {available} is spendable",
        hex::encode(.owner)
    )]
    InsufficientFee {
        owner: Address,
        required: u64,
        available: u64,
    },

    /// The miner supplied a fee selection byte the engine does not know.
    #[error("unknown fee selection {0}")]
    UnknownFeeSelection(u8),

    /// A cross-multiplied amount no longer fits in 64 bits.
    #[error("amount arithmetic overflowed 64 bits")]
    AmountOverflow,

    /// An internal consistency check failed. This is a programming fault in
    /// the fill pipeline, not a recoverable input error.
    #[error("settlement invariant violated: {0}")]
    SettlementInvariantViolation(&'static str),
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_includes_context() {
        let err = SettlementError::MalformedRingInput {
            field: "amounts",
            expected: 3,
            found: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("amounts"));
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_error_display_hex_addresses() {
        let err = SettlementError::UnregisteredAsset([0xAB; 20]);
        assert!(err.to_string().contains(&"ab".repeat(20)));
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(
            SettlementError::InvalidSignature,
            SettlementError::InvalidSignature
        );
        assert_ne!(
            SettlementError::AmountOverflow,
            SettlementError::InvalidSignature
        );
    }
}
