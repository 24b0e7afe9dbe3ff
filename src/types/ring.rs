//! Ring type: a cyclic arena of order states under settlement.
//!
//! ## Design
//!
//! The ring is a fixed-size circular sequence: a contiguous `Vec` of
//! [`OrderState`] indexed modulo N for "next"/"previous". Neighboring
//! orders read each other's state through indices into the same arena, so
//! there are no cyclic ownership pointers anywhere.
//!
//! A `Ring` is created fresh for one settlement call, mutated in place by
//! the pipeline stages, and discarded when the call returns.

use crate::types::{Address, OrderHash, OrderState};

/// An ordered cyclic sequence of orders plus the miner's settlement choices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ring {
    /// The order arena, in ring order. Order i buys what order (i+1) % n sells.
    pub orders: Vec<OrderState>,

    /// Digest over all order signatures, the fee recipient, and the
    /// insufficient-fee policy flag
    pub hash: OrderHash,

    /// Address recovered from the ring signature
    pub miner: Address,

    /// Where fees accrue; defaults to the miner when the submission left it
    /// unset
    pub fee_recipient: Address,

    /// Strict fee policy: fail the whole ring on a fee-asset shortfall
    /// instead of capping the charge
    pub throw_if_lrc_insufficient: bool,
}

impl Ring {
    /// Number of orders in the ring
    #[inline]
    pub fn size(&self) -> usize {
        self.orders.len()
    }

    /// Index of the order after `i` in ring order
    #[inline]
    pub fn next_index(&self, i: usize) -> usize {
        (i + 1) % self.orders.len()
    }

    /// The buy-asset amount actually delivered to order `i` by its
    /// successor. Valid once the fill calculator has converged.
    #[inline]
    pub fn received_amount_b(&self, i: usize) -> u64 {
        self.orders[self.next_index(i)].fill_amount_s
    }
}

/// The outcome of one settled ring.
///
/// The pipeline computes fills and fee fields but moves no funds; the
/// surrounding ledger executes transfers and writes back the filled
/// counters (see [`crate::engine::SettlementEngine::apply_fills`]), and the
/// two must commit atomically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingSettlement {
    /// The ring with all settlement outputs populated
    pub ring: Ring,
}

impl RingSettlement {
    /// Number of orders settled
    #[inline]
    pub fn size(&self) -> usize {
        self.ring.size()
    }

    /// Sell-asset fill for order `i`
    #[inline]
    pub fn fill_amount_s(&self, i: usize) -> u64 {
        self.ring.orders[i].fill_amount_s
    }

    /// Buy-asset amount delivered to order `i`
    #[inline]
    pub fn received_amount_b(&self, i: usize) -> u64 {
        self.ring.received_amount_b(i)
    }

    /// The fill on order `i`'s authoritative side, in the units its
    /// persistent counters are kept in
    pub fn authoritative_fill(&self, i: usize) -> u64 {
        let received = self.ring.received_amount_b(i);
        self.ring.orders[i].authoritative_fill(received)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
