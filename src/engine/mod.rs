//! Settlement pipeline for rings of cyclically-matched orders.
//!
//! ## Design Principles
//!
//! 1. **Determinism**: identical inputs and counter states produce
//!    bit-identical fills and fees
//! 2. **Integer-Only Math**: conversions widen to u128 and floor-divide,
//!    no floating point anywhere
//! 3. **Whole-Ring Atomicity**: one bad order invalidates the entire ring,
//!    there is no partial acceptance
//! 4. **Non-Overspend**: no order ever exchanges more than its spendable
//!    balance or its history-netted remaining amount
//!
//! ## Stages
//!
//! - [`assembler`]: raw submission arrays to validated order states
//! - [`scaler`]: net each order against its filled/cancelled history
//! - [`fill`]: the two-pass cyclic fill propagation
//! - [`fees`]: fee liabilities and savings rebates
//!
//! [`SettlementEngine`] wires the stages together and owns the
//! cancellation path.

pub mod assembler;
pub mod fees;
pub mod fill;
pub mod scaler;
pub mod settle;

pub use assembler::{assemble_ring, RingSubmission};
pub use fees::settle_ring_fees;
pub use fill::calculate_ring_fills;
pub use scaler::scale_ring_by_history;
pub use settle::{SettlementEngine, DEFAULT_MAX_RING_SIZE};
