//! Hashing and signature recovery primitives.
//!
//! The settlement pipeline consumes these through plain functions: order
//! and ring identity digests, the fixed signing prefix, and secp256k1
//! signer recovery. Everything here is deterministic and allocation-light.

mod hash;
mod signature;

pub use hash::{keccak256, keccak_all, order_hash, ring_hash, signed_message_hash};
pub use signature::{address_of, address_of_secret, recover_signer, sign_digest};
