//! Fee settlement: per-order fee liability or savings rebate.
//!
//! ## Contract
//!
//! Runs after the fill calculator, writing only the three fee fields on
//! each order state; actual token movement belongs to the surrounding
//! ledger.
//!
//! - **PayFee** orders owe their (historically scaled) declared fee in the
//!   reference fee asset. A shortfall either fails the whole ring
//!   (`InsufficientFee`, strict policy) or caps the charge at the owner's
//!   spendable fee-asset balance (lenient policy).
//! - **SavingsShare** orders pay no fee. The miner keeps the price
//!   improvement the order received (the difference between what the
//!   order was willing to pay for the delivered buy amount at its own
//!   declared rate, and what it actually paid) and rebates a declared
//!   percentage of it, converted to fee-asset units through the order's
//!   own fee-per-sell-unit ratio. The rebate is only paid while the
//!   miner's fee budget (queried once from the fee recipient) still covers
//!   the order's declared fee, and is capped at that fee, so aggregate
//!   rebates never exceed the budget.
//!
//! A negative saving cannot arise from fills the calculator produced with
//! honest rates; it means the miner asserted a rate worse than the order's
//! declared rate, and the ring dies with an invariant violation rather
//! than extracting value from the order.

use crate::error::SettlementError;
use crate::ledger::BalanceOracle;
use crate::types::{Address, FeeSelection, Ring, SAVINGS_SHARE_BASE};

/// Compute fee liabilities and savings rebates for every order.
///
/// # Arguments
///
/// * `ring` - The ring with settled fill amounts
/// * `fee_token` - The reference fee asset
/// * `oracle` - Live balance/allowance figures
pub fn settle_ring_fees(
    ring: &mut Ring,
    fee_token: Address,
    oracle: &impl BalanceOracle,
) -> Result<(), SettlementError> {
    // The miner's rebate budget, decremented as rewards are reserved.
    let mut miner_budget = oracle.spendable_amount(fee_token, ring.fee_recipient);

    for i in 0..ring.size() {
        let received_b = ring.received_amount_b(i);
        let state = &ring.orders[i];

        match state.fee_selection() {
            None => {
                return Err(SettlementError::UnknownFeeSelection(
                    state.fee_selection_raw,
                ))
            }
            Some(FeeSelection::PayFee) => {
                let required = state.order.lrc_fee;
                let available = oracle.spendable_amount(fee_token, state.owner);
                let charged = if available < required {
                    if ring.throw_if_lrc_insufficient {
                        return Err(SettlementError::InsufficientFee {
                            owner: state.owner,
                            required,
                            available,
                        });
                    }
                    available
                } else {
                    required
                };
                ring.orders[i].lrc_fee_charged = charged;
            }
            Some(FeeSelection::SavingsShare) => {
                let saving = saving_amount_s(
                    received_b,
                    state.order.amount_s,
                    state.order.amount_b,
                    state.fill_amount_s,
                )?;

                let share = (saving as u128) * (state.order.savings_share_percentage as u128)
                    / (SAVINGS_SHARE_BASE as u128);
                // Convert the sell-asset share to fee-asset units through the
                // order's own fee-per-sell-unit ratio, then cap at the fee
                // reserved from the budget.
                let reward = if state.order.amount_s == 0 {
                    0
                } else {
                    let converted = share * (state.order.lrc_fee as u128)
                        / (state.order.amount_s as u128);
                    u64::try_from(converted)
                        .map_err(|_| SettlementError::AmountOverflow)?
                        .min(state.order.lrc_fee)
                };

                let fee_reserved = state.order.lrc_fee;
                let state = &mut ring.orders[i];
                state.fee_s = saving;
                if reward > 0 && miner_budget >= fee_reserved {
                    state.lrc_reward = reward;
                    miner_budget -= fee_reserved;
                }
            }
        }
    }

    Ok(())
}

/// Price improvement received by an order, in sell-asset units.
///
/// `received_b * amount_s / amount_b` is what the order was willing to pay
/// for the delivered buy amount at its declared rate; subtracting what it
/// actually paid leaves the miner's margin.
fn saving_amount_s(
    received_b: u64,
    amount_s: u64,
    amount_b: u64,
    fill_amount_s: u64,
) -> Result<u64, SettlementError> {
    if amount_b == 0 {
        // Only reachable for an order with a zero fill, which the pipeline
        // rejects before fees run.
        return Err(SettlementError::SettlementInvariantViolation(
            "savings computed for an empty order",
        ));
    }
    let willing_to_pay = (received_b as u128) * (amount_s as u128) / (amount_b as u128);
    let paid = fill_amount_s as u128;
    if willing_to_pay < paid {
        return Err(SettlementError::SettlementInvariantViolation(
            "order paid more than its declared rate allows",
        ));
    }
    u64::try_from(willing_to_pay - paid).map_err(|_| SettlementError::AmountOverflow)
}

// ============================================================================
// Unit Tests
// ============================================================================
