//! Sealing engine.
//!
//! Two AEAD constructions over one key:
//!
//! - [`SealMode::Randomized`]: AES-GCM with a random nonce. Security depends
//!   on nonce uniqueness, so a key must stay well below 2^32 seals.
//! - [`SealMode::Deterministic`]: AES-GCM-SIV with a nonce derived from the
//!   plaintext and associated data. Repeating the same input reveals only
//!   that the inputs were equal.
//!
//! The cipher is instantiated per call from the caller's key. Nothing is
//! cached and no state is shared between calls.

use aes::{Aes128, Aes192, Aes256};
use aes_gcm::AesGcm;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit, Nonce, Payload};
use aes_gcm_siv::AesGcmSiv;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::error::CryptoError;
use crate::key::SecretKey;

/// Nonce size shared by AES-GCM and AES-GCM-SIV.
pub const NONCE_SIZE: usize = 12;

type Aes128Gcm = AesGcm<Aes128, U12>;
type Aes192Gcm = AesGcm<Aes192, U12>;
type Aes256Gcm = AesGcm<Aes256, U12>;
type Aes128GcmSiv = AesGcmSiv<Aes128>;
type Aes192GcmSiv = AesGcmSiv<Aes192>;
type Aes256GcmSiv = AesGcmSiv<Aes256>;

/// Nonce discipline, chosen by payload kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SealMode {
    /// Fresh random nonce, nonce-respecting AEAD (AES-GCM).
    Randomized,
    /// Derived nonce, nonce-misuse-resistant AEAD (AES-GCM-SIV).
    Deterministic,
}

/// Output of a seal: the nonce and the ciphertext with its 16-byte tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: [u8; NONCE_SIZE],
    pub ciphertext: Vec<u8>,
}

/// Derive the deterministic-mode nonce: `SHA-256(plaintext || aad)` truncated
/// to [`NONCE_SIZE`] bytes.
pub fn derive_nonce(plaintext: &[u8], aad: &[u8]) -> [u8; NONCE_SIZE] {
    let digest = Sha256::new()
        .chain_update(plaintext)
        .chain_update(aad)
        .finalize();
    let mut nonce = [0u8; NONCE_SIZE];
    nonce.copy_from_slice(&digest[..NONCE_SIZE]);
    nonce
}

fn random_nonce() -> Result<[u8; NONCE_SIZE], CryptoError> {
    let mut nonce = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce)
        .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))?;
    Ok(nonce)
}

/// Encrypt `plaintext`, authenticating `aad` alongside it.
pub fn seal(
    key: &SecretKey,
    plaintext: &[u8],
    aad: &[u8],
    mode: SealMode,
) -> Result<Sealed, CryptoError> {
    let nonce = match mode {
        SealMode::Randomized => random_nonce()?,
        SealMode::Deterministic => derive_nonce(plaintext, aad),
    };
    let key = key.as_bytes();
    let payload = Payload {
        msg: plaintext,
        aad,
    };

    let ciphertext = match (mode, key.len()) {
        (SealMode::Randomized, 16) => encrypt_with::<Aes128Gcm>(key, &nonce, payload),
        (SealMode::Randomized, 24) => encrypt_with::<Aes192Gcm>(key, &nonce, payload),
        (SealMode::Randomized, 32) => encrypt_with::<Aes256Gcm>(key, &nonce, payload),
        (SealMode::Deterministic, 16) => encrypt_with::<Aes128GcmSiv>(key, &nonce, payload),
        (SealMode::Deterministic, 24) => encrypt_with::<Aes192GcmSiv>(key, &nonce, payload),
        (SealMode::Deterministic, 32) => encrypt_with::<Aes256GcmSiv>(key, &nonce, payload),
        (_, actual) => Err(CryptoError::InvalidKeyLength { actual }),
    }?;

    Ok(Sealed { nonce, ciphertext })
}

/// Decrypt and verify `ciphertext` against `nonce` and `aad`.
///
/// Returns the plaintext only if the tag verifies. The nonce length is
/// checked before any cryptographic work.
pub fn open(
    key: &SecretKey,
    nonce: &[u8],
    ciphertext: &[u8],
    aad: &[u8],
    mode: SealMode,
) -> Result<Vec<u8>, CryptoError> {
    if nonce.len() != NONCE_SIZE {
        return Err(CryptoError::InvalidNonceLength {
            expected: NONCE_SIZE,
            actual: nonce.len(),
        });
    }
    let key = key.as_bytes();
    let payload = Payload {
        msg: ciphertext,
        aad,
    };

    match (mode, key.len()) {
        (SealMode::Randomized, 16) => decrypt_with::<Aes128Gcm>(key, nonce, payload),
        (SealMode::Randomized, 24) => decrypt_with::<Aes192Gcm>(key, nonce, payload),
        (SealMode::Randomized, 32) => decrypt_with::<Aes256Gcm>(key, nonce, payload),
        (SealMode::Deterministic, 16) => decrypt_with::<Aes128GcmSiv>(key, nonce, payload),
        (SealMode::Deterministic, 24) => decrypt_with::<Aes192GcmSiv>(key, nonce, payload),
        (SealMode::Deterministic, 32) => decrypt_with::<Aes256GcmSiv>(key, nonce, payload),
        (_, actual) => Err(CryptoError::InvalidKeyLength { actual }),
    }
}

fn encrypt_with<C>(
    key: &[u8],
    nonce: &[u8],
    payload: Payload<'_, '_>,
) -> Result<Vec<u8>, CryptoError>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher =
        C::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength { actual: key.len() })?;
    cipher
        .encrypt(Nonce::<C>::from_slice(nonce), payload)
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

fn decrypt_with<C>(
    key: &[u8],
    nonce: &[u8],
    payload: Payload<'_, '_>,
) -> Result<Vec<u8>, CryptoError>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher =
        C::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength { actual: key.len() })?;
    cipher
        .decrypt(Nonce::<C>::from_slice(nonce), payload)
        .map_err(|_| CryptoError::AuthenticationFailed)
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::key::KEY_SIZES;

    const MODES: [SealMode; 2] = [SealMode::Randomized, SealMode::Deterministic];
    const AAD: &[u8] = &[0x08, 0x01, 0x10, 0x02];

    fn key(len: usize) -> SecretKey {
        let bytes: Vec<u8> = (0u8..).take(len).collect();
        SecretKey::from_bytes(&bytes).unwrap()
    }

    #[test]
    fn seal_open_roundtrip_all_modes_and_key_sizes() {
        for len in KEY_SIZES {
            let key = key(len);
            for mode in MODES {
                let sealed = seal(&key, b"subject 999999999", AAD, mode).unwrap();
                let opened = open(&key, &sealed.nonce, &sealed.ciphertext, AAD, mode).unwrap();
                assert_eq!(opened, b"subject 999999999", "mode {mode:?}, key {len}");
            }
        }
    }

    #[test]
    fn ciphertext_carries_16_byte_tag() {
        let sealed = seal(&key(32), b"abc", AAD, SealMode::Randomized).unwrap();
        assert_eq!(sealed.ciphertext.len(), 3 + 16);
    }

    #[test]
    fn empty_plaintext_roundtrips() {
        for mode in MODES {
            let key = key(16);
            let sealed = seal(&key, b"", b"", mode).unwrap();
            let opened = open(&key, &sealed.nonce, &sealed.ciphertext, b"", mode).unwrap();
            assert!(opened.is_empty());
        }
    }

    #[test]
    fn deterministic_mode_is_stable() {
        let key = key(32);
        let a = seal(&key, b"payload", AAD, SealMode::Deterministic).unwrap();
        let b = seal(&key, b"payload", AAD, SealMode::Deterministic).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.nonce, derive_nonce(b"payload", AAD));
    }

    #[test]
    fn deterministic_nonce_depends_on_aad() {
        assert_ne!(
            derive_nonce(b"payload", b"a"),
            derive_nonce(b"payload", b"b")
        );
    }

    #[test]
    fn derive_nonce_is_sha256_prefix() {
        let digest = Sha256::digest(b"helloworld");
        assert_eq!(derive_nonce(b"hello", b"world"), digest[..NONCE_SIZE]);
    }

    #[test]
    fn randomized_mode_uses_fresh_nonces() {
        let key = key(32);
        let mut nonces = std::collections::HashSet::new();
        for _ in 0..256 {
            let sealed = seal(&key, b"payload", AAD, SealMode::Randomized).unwrap();
            assert!(nonces.insert(sealed.nonce), "nonce collision detected");
        }
    }

    #[test]
    fn every_ciphertext_bit_flip_fails_authentication() {
        let key = key(32);
        for mode in MODES {
            let sealed = seal(&key, b"tamper me", AAD, mode).unwrap();
            for bit in 0..sealed.ciphertext.len() * 8 {
                let mut ciphertext = sealed.ciphertext.clone();
                ciphertext[bit / 8] ^= 1 << (bit % 8);
                assert_eq!(
                    open(&key, &sealed.nonce, &ciphertext, AAD, mode),
                    Err(CryptoError::AuthenticationFailed)
                );
            }
        }
    }

    #[test]
    fn every_nonce_bit_flip_fails_authentication() {
        let key = key(16);
        for mode in MODES {
            let sealed = seal(&key, b"tamper me", AAD, mode).unwrap();
            for bit in 0..NONCE_SIZE * 8 {
                let mut nonce = sealed.nonce;
                nonce[bit / 8] ^= 1 << (bit % 8);
                assert_eq!(
                    open(&key, &nonce, &sealed.ciphertext, AAD, mode),
                    Err(CryptoError::AuthenticationFailed)
                );
            }
        }
    }

    #[test]
    fn every_aad_bit_flip_fails_authentication() {
        let key = key(24);
        for mode in MODES {
            let sealed = seal(&key, b"tamper me", AAD, mode).unwrap();
            for bit in 0..AAD.len() * 8 {
                let mut aad = AAD.to_vec();
                aad[bit / 8] ^= 1 << (bit % 8);
                assert_eq!(
                    open(&key, &sealed.nonce, &sealed.ciphertext, &aad, mode),
                    Err(CryptoError::AuthenticationFailed)
                );
            }
        }
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let sealed = seal(&key(32), b"secret", AAD, SealMode::Randomized).unwrap();
        let other = SecretKey::from_bytes(&[0xEE; 32]).unwrap();
        assert_eq!(
            open(
                &other,
                &sealed.nonce,
                &sealed.ciphertext,
                AAD,
                SealMode::Randomized
            ),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn opening_with_the_other_mode_fails() {
        let key = key(32);
        let sealed = seal(&key, b"secret", AAD, SealMode::Deterministic).unwrap();
        assert_eq!(
            open(
                &key,
                &sealed.nonce,
                &sealed.ciphertext,
                AAD,
                SealMode::Randomized
            ),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn wrong_nonce_length_is_rejected() {
        let key = key(32);
        let sealed = seal(&key, b"secret", AAD, SealMode::Randomized).unwrap();
        for len in [0, 8, 11, 13, 24] {
            assert_eq!(
                open(
                    &key,
                    &vec![0u8; len],
                    &sealed.ciphertext,
                    AAD,
                    SealMode::Randomized
                ),
                Err(CryptoError::InvalidNonceLength {
                    expected: NONCE_SIZE,
                    actual: len
                })
            );
        }
    }

    #[test]
    fn truncated_ciphertext_fails_authentication() {
        let key = key(16);
        let sealed = seal(&key, b"secret", AAD, SealMode::Deterministic).unwrap();
        assert_eq!(
            open(
                &key,
                &sealed.nonce,
                &sealed.ciphertext[..10],
                AAD,
                SealMode::Deterministic
            ),
            Err(CryptoError::AuthenticationFailed)
        );
        assert_eq!(
            open(&key, &sealed.nonce, &[], AAD, SealMode::Deterministic),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn concurrent_seals_are_independent() {
        use std::sync::Arc;
        use std::thread;

        let key = Arc::new(key(32));
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let key = Arc::clone(&key);
                thread::spawn(move || {
                    let msg = [i; 32];
                    for mode in MODES {
                        let sealed = seal(&key, &msg, AAD, mode).unwrap();
                        let opened =
                            open(&key, &sealed.nonce, &sealed.ciphertext, AAD, mode).unwrap();
                        assert_eq!(opened, msg);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
    }

    proptest! {
        #[test]
        fn prop_seal_open_roundtrip(
            msg in proptest::collection::vec(any::<u8>(), 0..256),
            aad in proptest::collection::vec(any::<u8>(), 0..32),
            deterministic in any::<bool>(),
        ) {
            let mode = if deterministic { SealMode::Deterministic } else { SealMode::Randomized };
            let key = key(32);
            let sealed = seal(&key, &msg, &aad, mode).unwrap();
            let opened = open(&key, &sealed.nonce, &sealed.ciphertext, &aad, mode).unwrap();
            prop_assert_eq!(opened, msg);
        }
    }
}
