//! Historical scaler: net each order against its filled/cancelled past.
//!
//! Each order designates one side as authoritative (buy side when the
//! buy-cap flag is set, sell side otherwise); the persistent counters are
//! kept in that side's units. Scaling subtracts the combined history from
//! the authoritative amount with tolerant (saturating) subtraction, then
//! rescales the counterpart amount and the fee by the same factor using
//! exact integer cross-multiplication, so the declared price ratio survives
//! to within floor rounding.
//!
//! The result is each order's remaining tradeable quantity, independent of
//! the ring it currently sits in; the working fill starts at the scaled
//! sell amount. Reads the history store, never writes it.

use crate::ledger::FillHistory;
use crate::types::amount::{scaled, tolerant_sub};
use crate::types::Ring;

/// Rescale every order in the ring by its cumulative history.
pub fn scale_ring_by_history(ring: &mut Ring, history: &impl FillHistory) {
    for state in &mut ring.orders {
        let consumed = history
            .filled_amount(state.hash)
            .saturating_add(history.cancelled_amount(state.hash));

        let order = &mut state.order;
        if order.caps_buy_amount() {
            let remaining_b = tolerant_sub(order.amount_b, consumed);
            // amount_b > 0 was validated at assembly, and remaining <= original,
            // so the rescales cannot overflow or divide by zero.
            order.amount_s = scaled(order.amount_s, order.amount_b, remaining_b)
                .unwrap_or(order.amount_s);
            order.lrc_fee = scaled(order.lrc_fee, order.amount_b, remaining_b)
                .unwrap_or(order.lrc_fee);
            order.amount_b = remaining_b;
        } else {
            let remaining_s = tolerant_sub(order.amount_s, consumed);
            order.amount_b = scaled(order.amount_b, order.amount_s, remaining_s)
                .unwrap_or(order.amount_b);
            order.lrc_fee = scaled(order.lrc_fee, order.amount_s, remaining_s)
                .unwrap_or(order.lrc_fee);
            order.amount_s = remaining_s;
        }

        state.fill_amount_s = state.order.amount_s;
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
