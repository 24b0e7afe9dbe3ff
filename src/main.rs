//! Ring Settlement - Demo Entry Point
//!
//! Builds a two-order swap ring end to end: signs both orders and the ring
//! with throwaway keys, funds the owners in an in-memory asset book, and
//! runs the settlement pipeline.

use ring_settlement::crypto::{
    address_of_secret, order_hash, ring_hash, sign_digest, signed_message_hash,
};
use ring_settlement::engine::{RingSubmission, SettlementEngine};
use ring_settlement::ledger::{InMemoryAssetBook, InMemoryFillHistory};
use ring_settlement::types::amount::display_amount;
use ring_settlement::types::{Order, ZERO_ADDRESS};

const SETTLEMENT_ID: [u8; 20] = [0x5E; 20];
const FEE_TOKEN: [u8; 20] = [0xFC; 20];
const ASSET_X: [u8; 20] = [0x01; 20];
const ASSET_Y: [u8; 20] = [0x02; 20];

const ALICE: [u8; 32] = [0xA1; 32];
const BOB: [u8; 32] = [0xB1; 32];
const MINER: [u8; 32] = [0xC1; 32];

const NOW: u64 = 1_700_000_000;

fn main() -> Result<(), ring_settlement::SettlementError> {
    tracing_subscriber::fmt().with_target(false).init();

    println!("===========================================");
    println!("  Ring Settlement - Demo");
    println!("===========================================");
    println!();

    let engine = SettlementEngine::new(SETTLEMENT_ID, FEE_TOKEN);

    // Alice sells 1.0 X for 1.0 Y; Bob sells 1.0 Y for 1.0 X.
    let sell_assets = vec![ASSET_X, ASSET_Y];
    let amounts = vec![
        [100_000_000, 100_000_000, 100, NOW + 3_600, 1, 1_000_000],
        [100_000_000, 100_000_000, 100, NOW + 3_600, 2, 1_000_000],
    ];
    let fee_params = vec![[0u8, 0u8], [0u8, 0u8]];
    let buy_caps = vec![false, false];

    let mut signatures = Vec::new();
    for (i, secret) in [ALICE, BOB].iter().enumerate() {
        let [amount_s, amount_b, _, expiration, nonce, lrc_fee] = amounts[i];
        let order = Order::new(
            sell_assets[i],
            sell_assets[(i + 1) % 2],
            amount_s,
            amount_b,
            expiration,
            nonce,
            lrc_fee,
            buy_caps[i],
            fee_params[i][0],
        );
        let hash = order_hash(SETTLEMENT_ID, &order)?;
        signatures.push(sign_digest(secret, &signed_message_hash(&hash))?);
    }
    let rhash = ring_hash(&signatures, ZERO_ADDRESS, false);
    signatures.push(sign_digest(&MINER, &signed_message_hash(&rhash))?);

    let submission = RingSubmission {
        sell_assets,
        amounts,
        fee_params,
        buy_caps,
        signatures,
        fee_recipient: ZERO_ADDRESS,
        throw_if_lrc_insufficient: false,
    };

    // Fund everyone in the in-memory asset book.
    let mut oracle = InMemoryAssetBook::new();
    oracle.register_asset(ASSET_X);
    oracle.register_asset(ASSET_Y);
    oracle.fund(ASSET_X, address_of_secret(&ALICE)?, 100_000_000);
    oracle.fund(ASSET_Y, address_of_secret(&BOB)?, 100_000_000);
    oracle.fund(FEE_TOKEN, address_of_secret(&ALICE)?, 10_000_000);
    oracle.fund(FEE_TOKEN, address_of_secret(&BOB)?, 10_000_000);

    let mut history = InMemoryFillHistory::new();
    let settlement = engine.submit_ring(&submission, &oracle, &history, NOW)?;
    engine.apply_fills(&settlement, &mut history);

    println!("Ring settled:");
    println!("  Ring hash: {}", hex::encode(settlement.ring.hash));
    println!("  Miner:     {}", hex::encode(settlement.ring.miner));
    for i in 0..settlement.size() {
        let state = &settlement.ring.orders[i];
        println!();
        println!("  Order {} ({})", i, hex::encode(state.owner));
        println!("    sold:     {}", display_amount(state.fill_amount_s));
        println!("    received: {}", display_amount(settlement.received_amount_b(i)));
        println!("    fee:      {}", display_amount(state.lrc_fee_charged));
    }

    Ok(())
}
