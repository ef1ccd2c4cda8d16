//! Envelope signing with the operating account's secret seed.

use ed25519_dalek::{Signer as _, SigningKey};
use shared_types::envelope::{
    decorated_signature, envelope_base64, envelope_with_signatures, signature_payload,
    transaction_hash_hex, unsigned_transaction,
};
use shared_types::strkey::{decode_seed, encode_account_id};
use shared_types::{AccountId, LedgerError};
use std::fmt;

/// Ed25519 key decoded from an `S...` seed.
pub struct EnvelopeSigner {
    key: SigningKey,
    account_id: AccountId,
}

/// A signed envelope and the hash the ledger will report for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedEnvelope {
    pub envelope_xdr: String,
    pub hash: String,
}

impl EnvelopeSigner {
    pub fn from_seed(seed: &str) -> Result<Self, LedgerError> {
        let secret = decode_seed(seed.trim())
            .map_err(|e| LedgerError::Signing(format!("invalid seed: {}", e)))?;
        let key = SigningKey::from_bytes(&secret);
        let account_id = AccountId::new(encode_account_id(&key.verifying_key().to_bytes()));
        Ok(Self { key, account_id })
    }

    /// Address of the signing account.
    pub fn account_id(&self) -> &AccountId {
        &self.account_id
    }

    /// Sign an unsigned base64 envelope for `passphrase`'s network.
    pub fn sign(&self, passphrase: &str, unsigned_xdr: &str) -> Result<SignedEnvelope, LedgerError> {
        let tx = unsigned_transaction(unsigned_xdr)?;
        let payload = signature_payload(passphrase, &tx)?;
        let signature = self.key.sign(&payload);
        let decorated = decorated_signature(&self.key.verifying_key().to_bytes(), &signature.to_bytes())?;
        let hash = transaction_hash_hex(passphrase, &tx)?;

        Ok(SignedEnvelope {
            envelope_xdr: envelope_base64(&envelope_with_signatures(tx, vec![decorated])?)?,
            hash,
        })
    }
}

impl fmt::Debug for EnvelopeSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopeSigner")
            .field("account_id", &self.account_id)
            .finish_non_exhaustive()
    }
}
