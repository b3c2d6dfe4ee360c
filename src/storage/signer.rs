use base64::{Engine as _, engine::general_purpose::STANDARD};
use ed25519_dalek::{Signer, SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::path::Path;

use super::error::{Result, StorageError};

/// Multicodec prefix for an Ed25519 public key
const ED25519_PUB_MULTICODEC: [u8; 2] = [0xed, 0x01];

/// Produces proofs for capability invocations
pub trait InvocationSigner {
    /// Verification method id, e.g. `did:key:z6Mk...#z6Mk...`
    fn key_id(&self) -> &str;

    /// Signature algorithm name as used in the `authorization` header
    fn algorithm(&self) -> &str;

    fn sign(&self, message: &[u8]) -> Vec<u8>;
}

/// Ed25519 keypair identified by a `did:key`
pub struct Ed25519Signer {
    key: SigningKey,
    did: String,
    key_id: String,
}

impl Ed25519Signer {
    /// Generate a fresh random key
    ///
    /// A generated key is never a controller of an existing collection, so
    /// every PUT made with it will be rejected with 401.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::generate(&mut OsRng))
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self::from_signing_key(SigningKey::from_bytes(&seed))
    }

    /// Load a 32 byte seed from a file, either raw or base64 encoded
    pub fn from_key_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|e| StorageError::read(e, path))?;

        if let Ok(seed) = <[u8; 32]>::try_from(bytes.as_slice()) {
            return Ok(Self::from_seed(seed));
        }

        let text = std::str::from_utf8(&bytes)
            .map_err(|_| StorageError::key(path, "expected 32 raw bytes or base64 text"))?;
        let decoded = STANDARD
            .decode(text.trim())
            .map_err(|e| StorageError::key(path, format!("not valid base64: {}", e)))?;
        let seed = <[u8; 32]>::try_from(decoded.as_slice()).map_err(|_| {
            StorageError::key(
                path,
                format!("expected a 32 byte seed, got {} bytes", decoded.len()),
            )
        })?;

        Ok(Self::from_seed(seed))
    }

    fn from_signing_key(key: SigningKey) -> Self {
        let fingerprint = multibase_fingerprint(&key.verifying_key());
        let did = format!("did:key:{}", fingerprint);
        let key_id = format!("{}#{}", did, fingerprint);
        Self { key, did, key_id }
    }

    pub fn did(&self) -> &str {
        &self.did
    }

    #[cfg(test)]
    pub fn verifying_key(&self) -> VerifyingKey {
        self.key.verifying_key()
    }
}

impl InvocationSigner for Ed25519Signer {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    fn algorithm(&self) -> &str {
        "ed25519"
    }

    fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.key.sign(message).to_bytes().to_vec()
    }
}

impl std::fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ed25519Signer")
            .field("did", &self.did)
            .finish_non_exhaustive()
    }
}

/// base58btc multibase ('z') of the multicodec-prefixed public key
fn multibase_fingerprint(key: &VerifyingKey) -> String {
    let mut bytes = Vec::with_capacity(34);
    bytes.extend_from_slice(&ED25519_PUB_MULTICODEC);
    bytes.extend_from_slice(key.as_bytes());
    format!("z{}", bs58::encode(bytes).into_string())
}
