//! Ring fill calculator: bounded min-flow around a cycle of orders.
//!
//! ## Problem
//!
//! Each order arrives with a candidate `fill_amount_s` (its remaining sell
//! amount after historical scaling). The settled fills must satisfy, for
//! every index i with successor j = (i+1) mod n:
//!
//! - `fill_amount_s[i] <= available_amount_s[i]` (never overspend),
//! - the buy amount i receives, converted through the miner-asserted rate
//!   pair `rate_amount_s[i] : rate_amount_s[j]`, equals `fill_amount_s[j]`
//!   (what the successor sells is exactly what i receives),
//! - buy-capped orders never receive more than their declared `amount_b`.
//!
//! ## Algorithm
//!
//! Two passes around the cycle. Pass 1 walks every index once: each step
//! clamps the order's own fill to its spendable amount, converts it to the
//! buy amount the successor must deliver, caps that against the successor's
//! spendable amount (and the order's own buy ceiling, if capped), and then
//! either pulls the successor's fill down to the derived amount or, when
//! the successor is already smaller, records the successor as the current
//! *bottleneck* and leaves both sides alone. A constraint discovered at the
//! bottleneck propagates forward through the remainder of pass 1 and wraps
//! around the ring start; pass 2 repeats the step for indices before the
//! bottleneck only, which is sufficient to reach the fixed point because
//! the ring is a simple cycle: once the single tightest constraint is
//! known, one more partial lap determines every other fill.
//!
//! The rate ratios telescope around the cycle (each step multiplies by
//! `rate[j] / rate[i]`), so propagating the bottleneck's value a full lap
//! reproduces it exactly up to the floor rounding of each conversion.
//!
//! No floating point anywhere: conversions widen to `u128`, multiply, and
//! floor-divide (see [`crate::types::amount::scaled`]).

use crate::error::SettlementError;
use crate::types::amount::scaled;
use crate::types::{OrderState, Ring};

/// Settle the fill amount of every order in the ring.
///
/// On return, every `fill_amount_s` is consistent with the single tightest
/// constraint in the cycle. Fails only on `AmountOverflow` (a conversion no
/// longer fits in 64 bits); re-running on an identical ring snapshot
/// produces bit-identical fills.
pub fn calculate_ring_fills(ring: &mut Ring) -> Result<(), SettlementError> {
    let size = ring.size();

    // Pass 1: discovery. The last recorded bottleneck is the binding one,
    // because every earlier constraint has already propagated forward
    // through the steps that followed it.
    let mut bottleneck = 0;
    for i in 0..size {
        if let Some(index) = propagate_step(&mut ring.orders, i)? {
            bottleneck = index;
        }
    }

    // Pass 2: propagation. Orders before the bottleneck were visited before
    // it was discovered; one partial lap re-constrains them.
    for i in 0..bottleneck {
        propagate_step(&mut ring.orders, i)?;
    }

    Ok(())
}

/// One propagation step for order i against its successor.
///
/// Returns the index that became the bottleneck, if any: i itself when its
/// own ceilings pulled its fill back after a predecessor already promised
/// it more, or the successor when it cannot deliver what i needs.
fn propagate_step(
    orders: &mut [OrderState],
    i: usize,
) -> Result<Option<usize>, SettlementError> {
    let j = (i + 1) % orders.len();

    let rate_i = orders[i].rate_amount_s;
    let rate_j = orders[j].rate_amount_s;

    let mut fill_s = orders[i].fill_amount_s.min(orders[i].available_amount_s);
    let mut fill_b =
        scaled(fill_s, rate_i, rate_j).ok_or(SettlementError::AmountOverflow)?;

    // The successor can deliver at most its spendable amount, and a
    // buy-capped order accepts at most its declared buy amount.
    let mut ceiling_b = orders[j].available_amount_s;
    if orders[i].order.caps_buy_amount() {
        ceiling_b = ceiling_b.min(orders[i].order.amount_b);
    }

    let mut bottleneck = None;
    if fill_b > ceiling_b {
        fill_b = ceiling_b;
        fill_s = scaled(fill_b, rate_j, rate_i).ok_or(SettlementError::AmountOverflow)?;
        // Our own fill shrank below what predecessors may have promised;
        // they must be re-run.
        bottleneck = Some(i);
    }
    orders[i].fill_amount_s = fill_s;

    if fill_b <= orders[j].fill_amount_s {
        orders[j].fill_amount_s = fill_b;
    } else {
        bottleneck = Some(j);
    }

    Ok(bottleneck)
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::amount::approx_eq;
    use crate::types::{Order, OrderState, Ring};

    /// Build a ring from (amount_s, amount_b, rate_amount_s, available, caps_buy)
    /// tuples, with assets chained cyclically.
    fn build_ring(specs: &[(u64, u64, u64, u64, bool)]) -> Ring {
        let n = specs.len();
        let orders = specs
            .iter()
            .enumerate()
            .map(|(i, &(amount_s, amount_b, rate, available, caps))| {
                let sell = [(i + 1) as u8; 20];
                let buy = [((i + 1) % n + 1) as u8; 20];
                let order = Order::new(sell, buy, amount_s, amount_b, u64::MAX, 1, 0, caps, 0);
                let mut hash = [0u8; 32];
                hash[0] = i as u8;
                let mut state = OrderState::new(order, [0xA0 + i as u8; 20], hash, 0, rate, available);
                state.fill_amount_s = amount_s;
                state
            })
            .collect();
        Ring {
            orders,
            hash: [0; 32],
            miner: [0xFE; 20],
            fee_recipient: [0xFE; 20],
            throw_if_lrc_insufficient: false,
        }
    }

    fn fills(ring: &Ring) -> Vec<u64> {
        ring.orders.iter().map(|o| o.fill_amount_s).collect()
    }

    /// Every adjacent pair conserves: what j sells equals what i receives,
    /// within floor-rounding tolerance.
    fn assert_conservation(ring: &Ring, tolerance: u64) {
        for i in 0..ring.size() {
            let j = ring.next_index(i);
            let derived = scaled(
                ring.orders[i].fill_amount_s,
                ring.orders[i].rate_amount_s,
                ring.orders[j].rate_amount_s,
            )
            .unwrap();
            assert!(
                approx_eq(derived, ring.orders[j].fill_amount_s, tolerance),
                "pair ({i}, {j}): derived {derived} vs fill {}",
                ring.orders[j].fill_amount_s
            );
        }
    }

    #[test]
    fn test_balanced_two_ring_fills_fully() {
        // 1:1 swap, both sides fully funded: everything fills, no bottleneck.
        let mut ring = build_ring(&[
            (100, 100, 100, 100, false),
            (100, 100, 100, 100, false),
        ]);
        calculate_ring_fills(&mut ring).unwrap();

        assert_eq!(fills(&ring), vec![100, 100]);
        assert_conservation(&ring, 0);
    }

    #[test]
    fn test_three_ring_middle_bottleneck() {
        // Order 1 has only 50 remaining; its constraint must reach everyone.
        let mut ring = build_ring(&[
            (100, 100, 100, 1_000, false),
            (50, 50, 100, 1_000, false),
            (100, 100, 100, 1_000, false),
        ]);
        calculate_ring_fills(&mut ring).unwrap();

        assert_eq!(fills(&ring), vec![50, 50, 50]);
        assert_conservation(&ring, 0);
    }

    #[test]
    fn test_spendable_balance_constrains_fill() {
        // Order 0 declares 100 but can only spend 30.
        let mut ring = build_ring(&[
            (100, 100, 100, 30, false),
            (100, 100, 100, 1_000, false),
        ]);
        calculate_ring_fills(&mut ring).unwrap();

        assert_eq!(fills(&ring), vec![30, 30]);
        assert_conservation(&ring, 0);
    }

    #[test]
    fn test_successor_balance_constrains_predecessor() {
        // Order 1 can only spend 40: order 0 cannot receive more than that.
        let mut ring = build_ring(&[
            (100, 100, 100, 1_000, false),
            (100, 100, 100, 40, false),
        ]);
        calculate_ring_fills(&mut ring).unwrap();

        assert_eq!(fills(&ring), vec![40, 40]);
        assert_conservation(&ring, 0);
    }

    #[test]
    fn test_buy_cap_limits_received_amount() {
        // Order 0 sells up to 100 but caps its buy side at 30.
        let mut ring = build_ring(&[
            (100, 30, 100, 1_000, true),
            (100, 100, 100, 1_000, false),
        ]);
        calculate_ring_fills(&mut ring).unwrap();

        assert_eq!(fills(&ring), vec![30, 30]);
        assert_eq!(ring.received_amount_b(0), 30);
        assert_conservation(&ring, 0);
    }

    #[test]
    fn test_uneven_rates_conserve_within_rounding() {
        // Miner asserts 100:110 then 110:100; the loop telescopes back.
        let mut ring = build_ring(&[
            (100, 100, 100, 1_000, false),
            (110, 100, 110, 1_000, false),
        ]);
        calculate_ring_fills(&mut ring).unwrap();

        assert_eq!(fills(&ring), vec![100, 110]);
        assert_conservation(&ring, 1);
    }

    #[test]
    fn test_late_bottleneck_rewinds_earlier_orders() {
        // The tightest order sits last: pass 2 must rewind indices 0 and 1.
        let mut ring = build_ring(&[
            (100, 100, 100, 1_000, false),
            (100, 100, 100, 1_000, false),
            (100, 100, 100, 10, false),
        ]);
        calculate_ring_fills(&mut ring).unwrap();

        assert_eq!(fills(&ring), vec![10, 10, 10]);
        assert_conservation(&ring, 0);
    }

    #[test]
    fn test_fills_never_exceed_bounds() {
        let mut ring = build_ring(&[
            (100, 80, 100, 70, false),
            (90, 100, 100, 60, true),
            (85, 100, 100, 90, false),
        ]);
        let snapshot = ring.clone();
        calculate_ring_fills(&mut ring).unwrap();

        for (settled, original) in ring.orders.iter().zip(snapshot.orders.iter()) {
            assert!(settled.fill_amount_s <= settled.available_amount_s);
            assert!(settled.fill_amount_s <= original.fill_amount_s);
        }
        assert_conservation(&ring, 1);
    }

    #[test]
    fn test_identical_snapshots_settle_identically() {
        let build = || {
            build_ring(&[
                (123_456, 100_000, 997, 100_000, false),
                (100_000, 123_456, 1_003, 99_999, true),
                (200_000, 150_000, 1_000, 150_000, false),
            ])
        };

        let mut first = build();
        let mut second = build();
        calculate_ring_fills(&mut first).unwrap();
        calculate_ring_fills(&mut second).unwrap();
        assert_eq!(first, second, "identical snapshots must settle identically");
    }

    #[test]
    fn test_settled_ring_is_fixed_point_under_exact_rates() {
        // With equal rate numerators every conversion is exact, so the
        // settled fills survive another run untouched. (Uneven rates may
        // shave a floor-rounding unit per extra lap, which is why the
        // pipeline runs the calculator exactly once.)
        let mut ring = build_ring(&[
            (100, 100, 500, 70, false),
            (100, 100, 500, 1_000, false),
            (100, 100, 500, 1_000, false),
        ]);
        calculate_ring_fills(&mut ring).unwrap();
        let settled = ring.clone();

        calculate_ring_fills(&mut ring).unwrap();
        assert_eq!(ring, settled);
    }

    #[test]
    fn test_overflow_surfaces_as_error() {
        // A rate pair that blows the conversion past u64::MAX.
        let mut ring = build_ring(&[
            (u64::MAX / 2, 100, 1, u64::MAX, false),
            (100, 100, u64::MAX, u64::MAX, false),
        ]);
        assert_eq!(
            calculate_ring_fills(&mut ring),
            Err(SettlementError::AmountOverflow)
        );
    }
}
