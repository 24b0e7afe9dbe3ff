//! Settlement engine: the four-stage pipeline and the cancellation path.
//!
//! ## Pipeline
//!
//! ```text
//! RingSubmission
//!   -> assemble_ring        (validate, recover owners, read balances)
//!   -> scale_ring_by_history (net against filled/cancelled counters)
//!   -> calculate_ring_fills  (two-pass cyclic propagation)
//!   -> settle_ring_fees      (fee liabilities and savings rebates)
//!   -> RingSettlement
//! ```
//!
//! The pipeline moves no funds and writes no counters; the surrounding
//! ledger executes transfers and calls [`SettlementEngine::apply_fills`],
//! and must keep the counter read, the computation, and the write-back
//! atomic per order hash (serializable isolation keyed by order hash, or
//! one global serialization point).

use tracing::{debug, info};

use crate::crypto::{order_hash, recover_signer, signed_message_hash};
use crate::engine::assembler::{assemble_ring, RingSubmission};
use crate::engine::fees::settle_ring_fees;
use crate::engine::fill::calculate_ring_fills;
use crate::engine::scaler::scale_ring_by_history;
use crate::error::SettlementError;
use crate::ledger::{BalanceOracle, FillHistory};
use crate::types::{Address, Order, OrderHash, Ring, RingSettlement, Signature};

/// Default upper bound on ring size.
pub const DEFAULT_MAX_RING_SIZE: usize = 8;

/// The settlement computation engine.
///
/// Stateless apart from configuration; every call works on a fresh [`Ring`]
/// and the two external stores passed in.
///
/// ## Example
///
/// ```no_run
/// use ring_settlement::engine::SettlementEngine;
///
/// let engine = SettlementEngine::new([0x5E; 20], [0xFC; 20]);
/// assert_eq!(engine.max_ring_size(), 8);
/// ```
#[derive(Debug, Clone)]
pub struct SettlementEngine {
    /// This settlement system's identity, mixed into every order hash
    settlement_id: Address,

    /// The reference fee asset
    fee_token: Address,

    /// Upper bound on ring size
    max_ring_size: usize,
}

impl SettlementEngine {
    /// Create an engine with the default ring size bound
    pub fn new(settlement_id: Address, fee_token: Address) -> Self {
        Self {
            settlement_id,
            fee_token,
            max_ring_size: DEFAULT_MAX_RING_SIZE,
        }
    }

    /// Override the maximum ring size
    pub fn with_max_ring_size(mut self, max_ring_size: usize) -> Self {
        self.max_ring_size = max_ring_size;
        self
    }

    /// The configured ring size bound
    #[inline]
    pub fn max_ring_size(&self) -> usize {
        self.max_ring_size
    }

    /// The reference fee asset
    #[inline]
    pub fn fee_token(&self) -> Address {
        self.fee_token
    }

    /// Settle a ring submission.
    ///
    /// Pure apart from oracle and history reads: no funds move, no
    /// counters change. Any error aborts the whole ring; there is no
    /// partial settlement of a subset of orders.
    ///
    /// # Arguments
    ///
    /// * `submission` - Raw parallel arrays, see [`RingSubmission`]
    /// * `oracle` - Live registry and balance/allowance figures
    /// * `history` - Persistent filled/cancelled counters
    /// * `now` - Current timestamp for expiration checks
    pub fn submit_ring(
        &self,
        submission: &RingSubmission,
        oracle: &impl BalanceOracle,
        history: &impl FillHistory,
        now: u64,
    ) -> Result<RingSettlement, SettlementError> {
        let mut ring = assemble_ring(submission, self.settlement_id, self.max_ring_size, oracle, now)?;
        debug!(
            ring = %hex::encode(ring.hash),
            size = ring.size(),
            miner = %hex::encode(ring.miner),
            "ring assembled"
        );

        scale_ring_by_history(&mut ring, history);
        calculate_ring_fills(&mut ring)?;
        verify_fill_invariants(&ring)?;
        settle_ring_fees(&mut ring, self.fee_token, oracle)?;

        info!(
            ring = %hex::encode(ring.hash),
            size = ring.size(),
            "ring settled"
        );
        Ok(RingSettlement { ring })
    }

    /// Record a partial or full cancellation of an order.
    ///
    /// `cancel_amount` is in the order's authoritative-side units (buy side
    /// for buy-capped orders, sell side otherwise) and must be strictly
    /// positive. The signature must recover; the counter increment is
    /// monotone and irreversible.
    pub fn cancel_order(
        &self,
        order: &Order,
        signature: &Signature,
        cancel_amount: u64,
        history: &mut impl FillHistory,
    ) -> Result<OrderHash, SettlementError> {
        if cancel_amount == 0 {
            return Err(SettlementError::InvalidOrderParameters {
                index: 0,
                reason: "cancel amount must be positive",
            });
        }

        let hash = order_hash(self.settlement_id, order)?;
        recover_signer(&signed_message_hash(&hash), signature)?;

        history.add_cancelled_amount(hash, cancel_amount);
        info!(
            order = %hex::encode(hash),
            amount = cancel_amount,
            "order cancelled"
        );
        Ok(hash)
    }

    /// Write the settled fills back into the persistent counters.
    ///
    /// This is the collaborator's half of a settlement: it must run
    /// atomically with the token transfers, and roll back with them if any
    /// transfer fails.
    pub fn apply_fills(&self, settlement: &RingSettlement, history: &mut impl FillHistory) {
        for i in 0..settlement.size() {
            let state = &settlement.ring.orders[i];
            history.add_filled_amount(state.hash, settlement.authoritative_fill(i));
        }
        debug!(
            ring = %hex::encode(settlement.ring.hash),
            "fill counters updated"
        );
    }
}

/// Check the post-fill invariants the rest of the pipeline relies on.
///
/// Everything here is guaranteed by the fill calculator's construction; a
/// failure is a programming fault, except the zero-fill case, which an
/// order whose history already consumed it can reach.
fn verify_fill_invariants(ring: &Ring) -> Result<(), SettlementError> {
    for state in &ring.orders {
        if state.fill_amount_s == 0 {
            return Err(SettlementError::SettlementInvariantViolation(
                "order settles to a zero fill",
            ));
        }
        if state.fill_amount_s > state.available_amount_s {
            return Err(SettlementError::SettlementInvariantViolation(
                "fill exceeds spendable amount",
            ));
        }
    }
    Ok(())
}

// ============================================================================
// Unit Tests
// ============================================================================
