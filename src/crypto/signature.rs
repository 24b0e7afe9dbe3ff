//! ECDSA signer recovery over secp256k1.
//!
//! An order carries a recoverable (v, r, s) signature instead of a signer
//! address: the owner is *derived* from the signature and the order digest.
//! A forged or corrupted signature therefore does not impersonate anyone;
//! it recovers to an address that owns no balance and the ring fails on
//! `InsufficientBalance` at the latest.
//!
//! The signer address is the last 20 bytes of Keccak-256 over the
//! uncompressed public key (tag byte stripped).

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};

use crate::crypto::hash::keccak256;
use crate::error::SettlementError;
use crate::types::{Address, OrderHash, Signature};

/// Recover the signer address from a digest and a signature triple.
///
/// `v` may be 0/1 or the conventional 27/28. Any malformed component maps
/// to [`SettlementError::InvalidSignature`].
pub fn recover_signer(digest: &OrderHash, signature: &Signature) -> Result<Address, SettlementError> {
    let recovery_byte = if signature.v >= 27 {
        signature.v - 27
    } else {
        signature.v
    };
    let recovery_id =
        RecoveryId::from_byte(recovery_byte).ok_or(SettlementError::InvalidSignature)?;

    let sig = EcdsaSignature::from_scalars(signature.r, signature.s)
        .map_err(|_| SettlementError::InvalidSignature)?;

    let verifying_key = VerifyingKey::recover_from_prehash(digest, &sig, recovery_id)
        .map_err(|_| SettlementError::InvalidSignature)?;

    Ok(address_of(&verifying_key))
}

/// Derive the 20-byte address of a public key.
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 uncompressed-point tag
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut address = [0u8; 20];
    address.copy_from_slice(&digest[12..]);
    address
}

/// Sign a 32-byte digest with a raw secret key, producing a recoverable
/// triple with `v` in 27/28 convention.
///
/// Used by the demo binary and the test suites to author orders; the
/// settlement pipeline itself only ever recovers.
pub fn sign_digest(secret: &[u8; 32], digest: &OrderHash) -> Result<Signature, SettlementError> {
    let key = SigningKey::from_slice(secret).map_err(|_| SettlementError::InvalidSignature)?;
    let (sig, recovery_id) = key
        .sign_prehash_recoverable(digest)
        .map_err(|_| SettlementError::InvalidSignature)?;

    let bytes = sig.to_bytes();
    let mut r = [0u8; 32];
    let mut s = [0u8; 32];
    r.copy_from_slice(&bytes[..32]);
    s.copy_from_slice(&bytes[32..]);

    Ok(Signature {
        v: 27 + recovery_id.to_byte(),
        r,
        s,
    })
}

/// Address corresponding to a raw secret key.
///
/// Test/demo helper to know the expected owner up front.
pub fn address_of_secret(secret: &[u8; 32]) -> Result<Address, SettlementError> {
    let key = SigningKey::from_slice(secret).map_err(|_| SettlementError::InvalidSignature)?;
    Ok(address_of(key.verifying_key()))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: [u8; 32] = [0x17; 32];

    #[test]
    fn test_sign_and_recover_roundtrip() {
        let digest = keccak256(b"an order digest");
        let signature = sign_digest(&SECRET, &digest).unwrap();

        let recovered = recover_signer(&digest, &signature).unwrap();
        assert_eq!(recovered, address_of_secret(&SECRET).unwrap());
    }

    #[test]
    fn test_recovery_accepts_both_v_conventions() {
        let digest = keccak256(b"another digest");
        let signature = sign_digest(&SECRET, &digest).unwrap();
        let expected = address_of_secret(&SECRET).unwrap();

        assert_eq!(recover_signer(&digest, &signature).unwrap(), expected);

        let mut raw_v = signature;
        raw_v.v -= 27;
        assert_eq!(recover_signer(&digest, &raw_v).unwrap(), expected);
    }

    #[test]
    fn test_wrong_digest_recovers_different_address() {
        let digest = keccak256(b"signed digest");
        let other = keccak256(b"some other digest");
        let signature = sign_digest(&SECRET, &digest).unwrap();

        let recovered = recover_signer(&other, &signature);
        // Either recovery fails outright or it yields a stranger's address.
        if let Ok(address) = recovered {
            assert_ne!(address, address_of_secret(&SECRET).unwrap());
        }
    }

    #[test]
    fn test_invalid_recovery_byte_rejected() {
        let digest = keccak256(b"digest");
        let mut signature = sign_digest(&SECRET, &digest).unwrap();
        signature.v = 99;
        assert_eq!(
            recover_signer(&digest, &signature),
            Err(SettlementError::InvalidSignature)
        );
    }

    #[test]
    fn test_zero_scalars_rejected() {
        let digest = keccak256(b"digest");
        let signature = Signature {
            v: 27,
            r: [0; 32],
            s: [0; 32],
        };
        assert_eq!(
            recover_signer(&digest, &signature),
            Err(SettlementError::InvalidSignature)
        );
    }

    #[test]
    fn test_distinct_secrets_distinct_addresses() {
        let a = address_of_secret(&[0x01; 32]).unwrap();
        let b = address_of_secret(&[0x02; 32]).unwrap();
        assert_ne!(a, b);
    }
}
