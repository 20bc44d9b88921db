use crate::error::{BridgeError, Result};
use crate::utils::{
    base58_decode, base58_encode, ecdsa_p256_sha256_sign_digest, ecdsa_p256_sha256_sign_verify,
    hex_decode, new_key_pair, public_key_from_pkcs8, ripemd160_digest, sha256_digest,
};
use zeroize::{Zeroize, ZeroizeOnDrop};

const VERSION: u8 = 0x00;
pub const ADDRESS_CHECK_SUM_LEN: usize = 4;
/// version + RIPEMD-160 hash + checksum
pub const ADDRESS_PAYLOAD_LEN: usize = 1 + 20 + ADDRESS_CHECK_SUM_LEN;

/// A P-256 keypair. The private half is the PKCS#8 document handed to the
/// caller; the bridge never keeps one around after a call returns.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Account {
    pkcs8: Vec<u8>,
    #[zeroize(skip)]
    public_key: Vec<u8>,
}

impl Account {
    /// Generates a fresh keypair from the system CSPRNG.
    pub fn generate() -> Result<Account> {
        let pkcs8 = new_key_pair()?;
        Self::from_pkcs8(pkcs8)
    }

    pub fn from_pkcs8(pkcs8: Vec<u8>) -> Result<Account> {
        let public_key = public_key_from_pkcs8(&pkcs8)?;
        Ok(Account { pkcs8, public_key })
    }

    /// Decodes a hex private key as returned by `CreateAccount`.
    ///
    /// Bad hex and keys that do not parse are both reported as
    /// `InvalidParam`, since both are caller input problems.
    pub fn from_private_hex(private: &str) -> Result<Account> {
        let pkcs8 = hex_decode(private)?;
        Self::from_pkcs8(pkcs8).map_err(|e| BridgeError::InvalidParam(e.to_string()))
    }

    pub fn get_address(&self) -> String {
        address_from_public_key(self.public_key.as_slice())
    }

    pub fn get_public_key(&self) -> &[u8] {
        self.public_key.as_slice()
    }

    pub fn get_pkcs8(&self) -> &[u8] {
        self.pkcs8.as_slice()
    }

    pub fn private_hex(&self) -> String {
        hex::encode(&self.pkcs8)
    }

    pub fn sign(&self, message: &[u8]) -> Result<Vec<u8>> {
        ecdsa_p256_sha256_sign_digest(&self.pkcs8, message)
    }
}

pub fn hash_pub_key(pub_key: &[u8]) -> Vec<u8> {
    let pub_key_sha256 = sha256_digest(pub_key);
    ripemd160_digest(pub_key_sha256.as_slice())
}

fn checksum(payload: &[u8]) -> Vec<u8> {
    let first_sha = sha256_digest(payload);
    let second_sha = sha256_digest(first_sha.as_slice());
    second_sha[0..ADDRESS_CHECK_SUM_LEN].to_vec()
}

/// Derives the Base58Check address of a public key.
pub fn address_from_public_key(pub_key: &[u8]) -> String {
    convert_address(hash_pub_key(pub_key).as_slice())
}

pub fn convert_address(pub_hash_key: &[u8]) -> String {
    let mut payload: Vec<u8> = vec![];
    payload.push(VERSION);
    payload.extend(pub_hash_key);
    let checksum = checksum(payload.as_slice());
    payload.extend(checksum.as_slice());
    // version + pub_key_hash + checksum
    base58_encode(payload.as_slice())
}

pub fn validate_address(address: &str) -> bool {
    let payload = match base58_decode(address) {
        Ok(payload) => payload,
        Err(_) => return false,
    };

    if payload.len() != ADDRESS_PAYLOAD_LEN || payload[0] != VERSION {
        return false;
    }

    let split = payload.len() - ADDRESS_CHECK_SUM_LEN;
    let target_checksum = checksum(&payload[..split]);
    payload[split..].eq(target_checksum.as_slice())
}

/// Verifies a signature produced by [`Account::sign`].
pub fn verify_signature(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    ecdsa_p256_sha256_sign_verify(public_key, signature, message)
}
