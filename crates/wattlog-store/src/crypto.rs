//! Passphrase-keyed encryption of the plaintext log.
//!
//! On-disk container layout (binding): `salt(16) || iv(16) || ciphertext`.
//! The key is derived from the passphrase and the stored salt with scrypt
//! on every call; no key material is cached or persisted. A fresh random
//! salt and IV are generated on every write, so two encryptions of the
//! same content never produce the same blob.

use aes::Aes256;
use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use rand::RngCore;
use scrypt::Params;

use crate::error::{Error, Result};

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;
/// IV length in bytes (one AES block).
pub const IV_LEN: usize = 16;

const KEY_LEN: usize = 32;
const BLOCK_LEN: usize = 16;

// scrypt work factors: N = 2^14, r = 8, p = 1. Deliberately expensive;
// the cost is paid on every read and write.
const SCRYPT_LOG_N: u8 = 14;
const SCRYPT_R: u32 = 8;
const SCRYPT_P: u32 = 1;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

fn derive_key(passphrase: &str, salt: &[u8]) -> Result<[u8; KEY_LEN]> {
    let params =
        Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, KEY_LEN).map_err(|_| Error::KeyDerivation)?;
    let mut key = [0u8; KEY_LEN];
    scrypt::scrypt(passphrase.as_bytes(), salt, &params, &mut key)
        .map_err(|_| Error::KeyDerivation)?;
    Ok(key)
}

/// Encrypt `plaintext` under a key derived from `passphrase` and a fresh
/// random salt, returning the full container blob.
pub fn encrypt(plaintext: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    let mut iv = [0u8; IV_LEN];
    let mut rng = rand::rng();
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut iv);

    let key = derive_key(passphrase, &salt)?;
    let ciphertext =
        Aes256CbcEnc::new(&key.into(), &iv.into()).encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    let mut blob = Vec::with_capacity(SALT_LEN + IV_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&iv);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt a container blob with the key re-derived from `passphrase` and
/// the stored salt.
///
/// Any structural violation (truncated container, ciphertext not a whole
/// number of blocks, padding mismatch) is [`Error::DecryptionFailed`];
/// wrong passphrase and corrupted data are not distinguished.
pub fn decrypt(blob: &[u8], passphrase: &str) -> Result<Vec<u8>> {
    if blob.len() < SALT_LEN + IV_LEN {
        return Err(Error::DecryptionFailed);
    }
    let (salt, rest) = blob.split_at(SALT_LEN);
    let (iv, ciphertext) = rest.split_at(IV_LEN);
    if ciphertext.is_empty() || !ciphertext.len().is_multiple_of(BLOCK_LEN) {
        return Err(Error::DecryptionFailed);
    }

    let key = derive_key(passphrase, salt)?;
    Aes256CbcDec::new_from_slices(&key, iv)
        .map_err(|_| Error::DecryptionFailed)?
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| Error::DecryptionFailed)
}
