//! Order assembler: raw submission arrays to validated order states.
//!
//! ## Contract
//!
//! The submission carries N orders as parallel arrays plus N+1 signatures
//! (the extra one is the ring signature by the miner). Assembly:
//!
//! 1. checks ring size and array-length agreement,
//! 2. derives each order's buy asset from the next order's sell asset
//!    (the cyclic adjacency is therefore true by construction),
//! 3. validates per-order structural constraints,
//! 4. derives the order hash and recovers the owner from the signature,
//! 5. queries the spendable sell amount for the recovered owner.
//!
//! Any violation aborts the whole ring; there is no partial acceptance.
//! Assembly is pure construction aside from oracle reads.

use crate::crypto::{order_hash, recover_signer, ring_hash, signed_message_hash};
use crate::error::SettlementError;
use crate::ledger::BalanceOracle;
use crate::types::{
    Address, Order, OrderState, Ring, Signature, SAVINGS_SHARE_BASE, ZERO_ADDRESS,
};

/// Raw wire-format of a ring submission.
///
/// Per order i: `sell_assets[i]`, the numeric sextuple `amounts[i]` =
/// [amount_s, amount_b, rate_amount_s, expiration, nonce, lrc_fee], the
/// small-integer pair `fee_params[i]` = [savings_share_percentage,
/// fee_selection], `buy_caps[i]`, and `signatures[i]`. The trailing
/// signature is the miner's ring signature.
#[derive(Debug, Clone)]
pub struct RingSubmission {
    /// Sell asset per order; order i's buy asset is `sell_assets[(i+1) % n]`
    pub sell_assets: Vec<Address>,

    /// [amount_s, amount_b, rate_amount_s, expiration, nonce, lrc_fee]
    pub amounts: Vec<[u64; 6]>,

    /// [savings_share_percentage, fee_selection]
    pub fee_params: Vec<[u8; 2]>,

    /// Whether each order caps its buy side
    pub buy_caps: Vec<bool>,

    /// N order signatures followed by the ring signature
    pub signatures: Vec<Signature>,

    /// Where fees accrue; zero means "default to the miner"
    pub fee_recipient: Address,

    /// Strict fee policy flag
    pub throw_if_lrc_insufficient: bool,
}

/// Reconstruct and validate a [`Ring`] from a raw submission.
///
/// # Arguments
///
/// * `submission` - The raw parallel arrays
/// * `settlement_id` - This settlement system's identity, mixed into order hashes
/// * `max_ring_size` - Upper bound on ring size
/// * `oracle` - Live registry and balance/allowance figures
/// * `now` - Current timestamp for expiration checks
pub fn assemble_ring(
    submission: &RingSubmission,
    settlement_id: Address,
    max_ring_size: usize,
    oracle: &impl BalanceOracle,
    now: u64,
) -> Result<Ring, SettlementError> {
    let size = submission.sell_assets.len();
    if size < 2 || size > max_ring_size {
        return Err(SettlementError::InvalidRingSize {
            size,
            max: max_ring_size,
        });
    }

    check_len("amounts", size, submission.amounts.len())?;
    check_len("fee_params", size, submission.fee_params.len())?;
    check_len("buy_caps", size, submission.buy_caps.len())?;
    check_len("signatures", size + 1, submission.signatures.len())?;

    let mut orders = Vec::with_capacity(size);
    for i in 0..size {
        let [amount_s, amount_b, rate_amount_s, expiration, nonce, lrc_fee] =
            submission.amounts[i];
        let [savings_share_percentage, fee_selection_raw] = submission.fee_params[i];

        let sell_asset = submission.sell_assets[i];
        let buy_asset = submission.sell_assets[(i + 1) % size];

        let invalid = |reason| SettlementError::InvalidOrderParameters { index: i, reason };
        if sell_asset == ZERO_ADDRESS || buy_asset == ZERO_ADDRESS {
            return Err(invalid("asset identifier is zero"));
        }
        if sell_asset == buy_asset {
            return Err(invalid("sell and buy asset are identical"));
        }
        if amount_s == 0 {
            return Err(invalid("sell amount is zero"));
        }
        if amount_b == 0 {
            return Err(invalid("buy amount is zero"));
        }
        if rate_amount_s == 0 {
            return Err(invalid("miner rate is zero"));
        }
        if expiration <= now {
            return Err(invalid("order is expired"));
        }
        if nonce == 0 {
            return Err(invalid("nonce is zero"));
        }
        if savings_share_percentage > SAVINGS_SHARE_BASE {
            return Err(invalid("savings share percentage exceeds base"));
        }

        if !oracle.is_asset_registered(sell_asset) {
            return Err(SettlementError::UnregisteredAsset(sell_asset));
        }
        if !oracle.is_asset_registered(buy_asset) {
            return Err(SettlementError::UnregisteredAsset(buy_asset));
        }

        let order = Order::new(
            sell_asset,
            buy_asset,
            amount_s,
            amount_b,
            expiration,
            nonce,
            lrc_fee,
            submission.buy_caps[i],
            savings_share_percentage,
        );

        let hash = order_hash(settlement_id, &order)?;
        let owner = recover_signer(&signed_message_hash(&hash), &submission.signatures[i])?;

        let available_amount_s = oracle.spendable_amount(sell_asset, owner);
        if available_amount_s == 0 {
            return Err(SettlementError::InsufficientBalance {
                owner,
                asset: sell_asset,
            });
        }

        orders.push(OrderState::new(
            order,
            owner,
            hash,
            fee_selection_raw,
            rate_amount_s,
            available_amount_s,
        ));
    }

    let hash = ring_hash(
        &submission.signatures[..size],
        submission.fee_recipient,
        submission.throw_if_lrc_insufficient,
    );
    let miner = recover_signer(&signed_message_hash(&hash), &submission.signatures[size])?;
    let fee_recipient = if submission.fee_recipient == ZERO_ADDRESS {
        miner
    } else {
        submission.fee_recipient
    };

    Ok(Ring {
        orders,
        hash,
        miner,
        fee_recipient,
        throw_if_lrc_insufficient: submission.throw_if_lrc_insufficient,
    })
}

fn check_len(field: &'static str, expected: usize, found: usize) -> Result<(), SettlementError> {
    if expected != found {
        return Err(SettlementError::MalformedRingInput {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
