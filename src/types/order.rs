//! Order types for the ring settlement engine.
//!
//! ## SSZ Serialization
//!
//! [`Order`] derives `SimpleSerialize` from ssz_rs: its serialized byte
//! image is the canonical pre-image of the order hash, so every field the
//! owner signed is covered bit-exactly and stably. Per the SSZ spec
//! (ethereum.org), basic types encode little-endian and fixed-size
//! composites are concatenated fields.
//!
//! ## Content Addressing
//!
//! An order is identified by the Keccak-256 digest of the settlement
//! system's own address followed by the order's SSZ bytes (see
//! [`crate::crypto::order_hash`]). That hash keys the persistent
//! filled/cancelled counters and is what the owner's signature covers.

use ssz_rs::prelude::*;

/// A 20-byte account or asset identifier.
pub type Address = [u8; 20];

/// The all-zero address, used as "unset" in submissions.
pub const ZERO_ADDRESS: Address = [0u8; 20];

/// A 32-byte order or ring digest.
pub type OrderHash = [u8; 32];

/// Denominator for the savings share percentage: values range 0..=100.
pub const SAVINGS_SHARE_BASE: u8 = 100;

// ============================================================================
// FeeSelection enum
// ============================================================================

/// How the miner chose to settle an order's exchange fee.
///
/// Represented as u8 on [`OrderState`]:
/// - PayFee = 0
/// - SavingsShare = 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FeeSelection {
    /// The order pays its declared fee in the reference fee asset.
    #[default]
    PayFee,
    /// The order forgoes the fee; the miner keeps the price improvement and
    /// rebates a share of it to the order, paid in the fee asset.
    SavingsShare,
}

impl FeeSelection {
    /// Convert to u8 for storage alongside SSZ-friendly fields
    pub fn to_u8(self) -> u8 {
        match self {
            FeeSelection::PayFee => 0,
            FeeSelection::SavingsShare => 1,
        }
    }

    /// Convert from the miner-supplied raw byte.
    ///
    /// Returns `None` for unknown values; the fee calculator turns that
    /// into an `UnknownFeeSelection` failure for the whole ring.
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(FeeSelection::PayFee),
            1 => Some(FeeSelection::SavingsShare),
            _ => None,
        }
    }
}

// ============================================================================
// Signature struct
// ============================================================================

/// A recoverable secp256k1 signature triple.
///
/// `v` is the recovery id, accepted as 0/1 or the conventional 27/28.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Signature {
    /// Recovery id (0/1 or 27/28)
    pub v: u8,

    /// Signature r component (32 bytes, big-endian scalar)
    pub r: [u8; 32],

    /// Signature s component (32 bytes, big-endian scalar)
    pub s: [u8; 32],
}

// ============================================================================
// Order struct
// ============================================================================

/// The immutable, owner-signed content of a trade order.
///
/// ## Fields
///
/// All amounts are `u64` token base units. The buy asset is not part of the
/// ring submission wire format; it is derived from the next order's sell
/// asset, which makes the ring's cyclic adjacency true by construction.
///
/// ## Example
///
/// ```
/// use ring_settlement::types::Order;
///
/// // Sell 100 units of asset X for 50 units of asset Y.
/// let order = Order::new(
///     [0x11; 20],       // sell_asset
///     [0x22; 20],       // buy_asset
///     100,              // amount_s
///     50,               // amount_b
///     1_700_000_000,    // expiration
///     1,                // nonce
///     10,               // lrc_fee
///     false,            // caps buy side
///     50,               // savings share percentage
/// );
/// assert!(!order.caps_buy_amount());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, SimpleSerialize)]
pub struct Order {
    /// Asset the owner is selling
    pub sell_asset: Address,

    /// Asset the owner is buying (sell asset of the next order in the ring)
    pub buy_asset: Address,

    /// Declared sell amount in base units
    pub amount_s: u64,

    /// Declared buy amount in base units
    pub amount_b: u64,

    /// Timestamp bound; the order is dead once `now >= expiration`
    pub expiration: u64,

    /// Uniqueness nonce, must be positive
    pub nonce: u64,

    /// Declared fee denominated in the reference fee asset
    pub lrc_fee: u64,

    /// Buy-cap flag as u8 (0 = sell side authoritative, 1 = buy side capped)
    /// Stored as u8 for SSZ compatibility
    pub buy_no_more_than_amount_b_raw: u8,

    /// Fraction of the miner's price-improvement margin rebated to this
    /// order, in 0..=SAVINGS_SHARE_BASE
    pub savings_share_percentage: u8,
}

impl Order {
    /// Create a new order
    ///
    /// # Arguments
    ///
    /// * `sell_asset` - Asset being sold
    /// * `buy_asset` - Asset being bought
    /// * `amount_s` - Declared sell amount (base units)
    /// * `amount_b` - Declared buy amount (base units)
    /// * `expiration` - Timestamp bound, must be in the future at submission
    /// * `nonce` - Uniqueness nonce (> 0)
    /// * `lrc_fee` - Declared fee in the reference fee asset
    /// * `caps_buy` - Whether the buy side is the authoritative cap
    /// * `savings_share_percentage` - Rebate fraction, 0..=100
    pub fn new(
        sell_asset: Address,
        buy_asset: Address,
        amount_s: u64,
        amount_b: u64,
        expiration: u64,
        nonce: u64,
        lrc_fee: u64,
        caps_buy: bool,
        savings_share_percentage: u8,
    ) -> Self {
        Self {
            sell_asset,
            buy_asset,
            amount_s,
            amount_b,
            expiration,
            nonce,
            lrc_fee,
            buy_no_more_than_amount_b_raw: caps_buy as u8,
            savings_share_percentage,
        }
    }

    /// Whether the buy side is the authoritative cap for this order.
    ///
    /// Capped orders track their filled/cancelled history in buy-asset
    /// units; uncapped orders track it in sell-asset units.
    #[inline]
    pub fn caps_buy_amount(&self) -> bool {
        self.buy_no_more_than_amount_b_raw != 0
    }

    /// The declared amount on the authoritative side.
    #[inline]
    pub fn authoritative_amount(&self) -> u64 {
        if self.caps_buy_amount() {
            self.amount_b
        } else {
            self.amount_s
        }
    }
}

// ============================================================================
// OrderState struct
// ============================================================================

/// An [`Order`] dressed for one settlement pass.
///
/// Owned exclusively by the [`crate::types::Ring`] that contains it; created
/// fresh per settlement call and discarded at the end. The `owner` is the
/// address recovered from the order signature, not a field the submitter
/// supplies.
///
/// The amounts on the inner `order` are rewritten in place by the historical
/// scaler; the declared originals are not needed once scaling has run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderState {
    /// The (historically rescaled) order content
    pub order: Order,

    /// Signer address recovered from the order signature
    pub owner: Address,

    /// Content hash of the order, key for the persistent counters
    pub hash: OrderHash,

    /// Miner-chosen fee selection as a raw byte (0=PayFee, 1=SavingsShare).
    /// Unknown values surface as UnknownFeeSelection in the fee calculator.
    pub fee_selection_raw: u8,

    /// Miner-asserted rate numerator for this order's sell asset. Paired
    /// with the next order's value to form the asserted exchange rate.
    pub rate_amount_s: u64,

    /// Spendable sell-asset amount: min(balance, allowance) at assembly time
    pub available_amount_s: u64,

    /// Output: sell-asset amount this order actually exchanges
    pub fill_amount_s: u64,

    /// Output: fee-asset rebate credited to the order (savings share)
    pub lrc_reward: u64,

    /// Output: fee-asset amount charged to the order (pay-fee)
    pub lrc_fee_charged: u64,

    /// Output: sell-asset margin the miner collects from this order's flow
    pub fee_s: u64,
}

impl OrderState {
    /// Wrap an assembled order with its derived identity and live figures
    pub fn new(
        order: Order,
        owner: Address,
        hash: OrderHash,
        fee_selection_raw: u8,
        rate_amount_s: u64,
        available_amount_s: u64,
    ) -> Self {
        Self {
            order,
            owner,
            hash,
            fee_selection_raw,
            rate_amount_s,
            available_amount_s,
            fill_amount_s: 0,
            lrc_reward: 0,
            lrc_fee_charged: 0,
            fee_s: 0,
        }
    }

    /// Decode the miner's fee selection byte
    #[inline]
    pub fn fee_selection(&self) -> Option<FeeSelection> {
        FeeSelection::from_u8(self.fee_selection_raw)
    }

    /// The settled fill on the order's authoritative side.
    ///
    /// `received_amount_b` must be the amount delivered to this order by its
    /// successor (the successor's `fill_amount_s`).
    #[inline]
    pub fn authoritative_fill(&self, received_amount_b: u64) -> u64 {
        if self.order.caps_buy_amount() {
            received_amount_b
        } else {
            self.fill_amount_s
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
