//! # Transaction Envelope Codec
//!
//! `TransactionDraft` is a small builder for the ledger transactions the
//! subsystems emit: payments and strict-send path payments, text memos,
//! optional time bounds. It lowers into `stellar-xdr` types, which own the
//! wire format of the `TransactionEnvelope` (`ENVELOPE_TYPE_TX`).
//!
//! The unsigned envelope (no signatures) is what a distribution report
//! persists. Signing happens later in the ledger adapter, which splits the
//! envelope back into its transaction body with [`unsigned_transaction`].

use crate::amount::Amount;
use crate::entities::{AccountId, Asset};
use crate::errors::EnvelopeError;
use crate::strkey;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use xdr::{Limits, ReadXdr, WriteXdr};

pub use stellar_xdr::curr as xdr;

/// Operations per transaction accepted by the ledger.
pub const MAX_OPERATIONS: usize = 100;

/// Maximum memo text length in bytes.
pub const MAX_MEMO_TEXT: usize = 28;

/// Maximum intermediate assets on a conversion path.
pub const MAX_PATH_LEN: usize = 5;

/// Signatures per envelope accepted by the ledger.
pub const MAX_SIGNATURES: usize = 20;

pub const PUBLIC_NETWORK_PASSPHRASE: &str = "Public Global Stellar Network ; September 2015";
pub const TEST_NETWORK_PASSPHRASE: &str = "Test SDF Network ; September 2015";

// =============================================================================
// TRANSACTION MODEL
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Memo {
    #[default]
    None,
    Text(String),
}

/// Validity window in unix seconds. `max_time == 0` means no expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeBounds {
    pub min_time: u64,
    pub max_time: u64,
}

impl TimeBounds {
    /// Valid forever.
    pub const fn unbounded() -> Self {
        Self {
            min_time: 0,
            max_time: 0,
        }
    }

    /// Valid until `now + seconds`.
    pub fn timeout(now_unix: u64, seconds: u64) -> Self {
        Self {
            min_time: 0,
            max_time: now_unix.saturating_add(seconds),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    Payment {
        destination: AccountId,
        asset: Asset,
        amount: Amount,
    },
    /// Send exactly `send_amount`, receive at least `dest_min`.
    PathPaymentStrictSend {
        send_asset: Asset,
        send_amount: Amount,
        destination: AccountId,
        dest_asset: Asset,
        dest_min: Amount,
        path: Vec<Asset>,
    },
}

/// A transaction before encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub source: AccountId,
    /// Sequence number of this transaction (account sequence + 1).
    pub sequence: i64,
    /// Fee per operation in stroops.
    pub base_fee: u32,
    pub time_bounds: Option<TimeBounds>,
    pub memo: Memo,
    pub operations: Vec<Operation>,
}

impl TransactionDraft {
    /// Draft for `source`, whose current ledger sequence is `account_sequence`.
    pub fn new(source: AccountId, account_sequence: i64, base_fee: u32) -> Self {
        Self {
            source,
            sequence: account_sequence.saturating_add(1),
            base_fee,
            time_bounds: None,
            memo: Memo::None,
            operations: Vec::new(),
        }
    }

    pub fn with_memo_text(mut self, text: impl Into<String>) -> Self {
        self.memo = Memo::Text(text.into());
        self
    }

    pub fn with_time_bounds(mut self, bounds: TimeBounds) -> Self {
        self.time_bounds = Some(bounds);
        self
    }

    pub fn with_operation(mut self, op: Operation) -> Self {
        self.operations.push(op);
        self
    }

    /// Total fee: base fee times operation count.
    pub fn fee(&self) -> Result<u32, EnvelopeError> {
        u32::try_from(self.operations.len())
            .ok()
            .and_then(|ops| self.base_fee.checked_mul(ops))
            .ok_or(EnvelopeError::FeeOverflow {
                base_fee: self.base_fee,
                operations: self.operations.len(),
            })
    }

    /// Lower into the ledger's `Transaction` type.
    pub fn to_transaction(&self) -> Result<xdr::Transaction, EnvelopeError> {
        let count = self.operations.len();
        if count == 0 || count > MAX_OPERATIONS {
            return Err(EnvelopeError::OperationCount {
                count,
                max: MAX_OPERATIONS,
            });
        }

        let cond = match self.time_bounds {
            None => xdr::Preconditions::None,
            Some(tb) => xdr::Preconditions::Time(xdr::TimeBounds {
                min_time: xdr::TimePoint(tb.min_time),
                max_time: xdr::TimePoint(tb.max_time),
            }),
        };

        let operations = self
            .operations
            .iter()
            .map(operation)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(xdr::Transaction {
            source_account: muxed_account(&self.source)?,
            fee: self.fee()?,
            seq_num: xdr::SequenceNumber(self.sequence),
            cond,
            memo: memo(&self.memo)?,
            operations: operations.try_into().map_err(|_| EnvelopeError::OperationCount {
                count,
                max: MAX_OPERATIONS,
            })?,
            ext: xdr::TransactionExt::V0,
        })
    }

    /// XDR of the `Transaction` body.
    pub fn to_transaction_xdr(&self) -> Result<Vec<u8>, EnvelopeError> {
        encode(&self.to_transaction()?)
    }

    pub fn to_unsigned_envelope(&self) -> Result<xdr::TransactionEnvelope, EnvelopeError> {
        envelope_with_signatures(self.to_transaction()?, Vec::new())
    }

    /// Unsigned `TransactionEnvelope` XDR.
    pub fn to_unsigned_envelope_xdr(&self) -> Result<Vec<u8>, EnvelopeError> {
        encode(&self.to_unsigned_envelope()?)
    }

    /// Unsigned envelope, base64-encoded. This is the persisted blob.
    pub fn to_unsigned_envelope_base64(&self) -> Result<String, EnvelopeError> {
        envelope_base64(&self.to_unsigned_envelope()?)
    }
}

// =============================================================================
// LOWERING
// =============================================================================

fn encode<T: WriteXdr>(value: &T) -> Result<Vec<u8>, EnvelopeError> {
    value
        .to_xdr(Limits::none())
        .map_err(|e| EnvelopeError::Encoding(e.to_string()))
}

fn ed25519_key(account: &AccountId) -> Result<xdr::Uint256, EnvelopeError> {
    strkey::decode_account_id(account.as_str())
        .map(xdr::Uint256)
        .map_err(|source| EnvelopeError::InvalidAccount {
            account: account.to_string(),
            source,
        })
}

fn account_id(account: &AccountId) -> Result<xdr::AccountId, EnvelopeError> {
    Ok(xdr::AccountId(xdr::PublicKey::PublicKeyTypeEd25519(
        ed25519_key(account)?,
    )))
}

fn muxed_account(account: &AccountId) -> Result<xdr::MuxedAccount, EnvelopeError> {
    Ok(xdr::MuxedAccount::Ed25519(ed25519_key(account)?))
}

fn memo(memo: &Memo) -> Result<xdr::Memo, EnvelopeError> {
    match memo {
        Memo::None => Ok(xdr::Memo::None),
        Memo::Text(text) => {
            let too_long = EnvelopeError::MemoTooLong {
                len: text.len(),
                max: MAX_MEMO_TEXT,
            };
            if text.len() > MAX_MEMO_TEXT {
                return Err(too_long);
            }
            let text = xdr::StringM::try_from(text.as_bytes().to_vec()).map_err(|_| too_long)?;
            Ok(xdr::Memo::Text(text))
        }
    }
}

fn asset(asset: &Asset) -> Result<xdr::Asset, EnvelopeError> {
    let Asset::Credit { code, issuer } = asset else {
        return Ok(xdr::Asset::Native);
    };

    let valid = !code.is_empty() && code.len() <= 12 && code.bytes().all(|b| b.is_ascii_alphanumeric());
    if !valid {
        return Err(EnvelopeError::InvalidAssetCode(code.clone()));
    }
    let issuer = account_id(issuer)?;

    // Codes are right-padded with zero bytes to the arm's width
    if code.len() <= 4 {
        let mut asset_code = [0u8; 4];
        asset_code[..code.len()].copy_from_slice(code.as_bytes());
        Ok(xdr::Asset::CreditAlphanum4(xdr::AlphaNum4 {
            asset_code: xdr::AssetCode4(asset_code),
            issuer,
        }))
    } else {
        let mut asset_code = [0u8; 12];
        asset_code[..code.len()].copy_from_slice(code.as_bytes());
        Ok(xdr::Asset::CreditAlphanum12(xdr::AlphaNum12 {
            asset_code: xdr::AssetCode12(asset_code),
            issuer,
        }))
    }
}

fn operation(op: &Operation) -> Result<xdr::Operation, EnvelopeError> {
    let body = match op {
        Operation::Payment {
            destination,
            asset: paid,
            amount,
        } => xdr::OperationBody::Payment(xdr::PaymentOp {
            destination: muxed_account(destination)?,
            asset: asset(paid)?,
            amount: amount.stroops(),
        }),
        Operation::PathPaymentStrictSend {
            send_asset,
            send_amount,
            destination,
            dest_asset,
            dest_min,
            path,
        } => {
            let too_long = || EnvelopeError::PathTooLong {
                len: path.len(),
                max: MAX_PATH_LEN,
            };
            if path.len() > MAX_PATH_LEN {
                return Err(too_long());
            }
            let hops = path.iter().map(asset).collect::<Result<Vec<_>, _>>()?;
            xdr::OperationBody::PathPaymentStrictSend(xdr::PathPaymentStrictSendOp {
                send_asset: asset(send_asset)?,
                send_amount: send_amount.stroops(),
                destination: muxed_account(destination)?,
                dest_asset: asset(dest_asset)?,
                dest_min: dest_min.stroops(),
                path: hops.try_into().map_err(|_| too_long())?,
            })
        }
    };

    // Operations inherit the transaction source.
    Ok(xdr::Operation {
        source_account: None,
        body,
    })
}

// =============================================================================
// SIGNING SUPPORT
// =============================================================================

/// A signature with the last four bytes of the signer's public key as hint.
pub fn decorated_signature(
    public_key: &[u8; 32],
    signature: &[u8; 64],
) -> Result<xdr::DecoratedSignature, EnvelopeError> {
    let mut hint = [0u8; 4];
    hint.copy_from_slice(&public_key[28..]);
    let signature = xdr::BytesM::try_from(signature.to_vec())
        .map_err(|e| EnvelopeError::Encoding(e.to_string()))?;
    Ok(xdr::DecoratedSignature {
        hint: xdr::SignatureHint(hint),
        signature: xdr::Signature(signature),
    })
}

/// Network id: `sha256(passphrase)`.
pub fn network_id(passphrase: &str) -> [u8; 32] {
    Sha256::digest(passphrase.as_bytes()).into()
}

/// The hash that is signed and that identifies the transaction on the ledger:
/// `sha256` of the `TransactionSignaturePayload` for the network.
pub fn signature_payload(passphrase: &str, tx: &xdr::Transaction) -> Result<[u8; 32], EnvelopeError> {
    let payload = xdr::TransactionSignaturePayload {
        network_id: xdr::Hash(network_id(passphrase)),
        tagged_transaction: xdr::TransactionSignaturePayloadTaggedTransaction::Tx(tx.clone()),
    };
    Ok(Sha256::digest(encode(&payload)?).into())
}

/// Lowercase hex transaction hash, as reported by the ledger.
pub fn transaction_hash_hex(passphrase: &str, tx: &xdr::Transaction) -> Result<String, EnvelopeError> {
    Ok(signature_payload(passphrase, tx)?
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect())
}

/// Wrap a transaction in an envelope with the given signatures.
pub fn envelope_with_signatures(
    tx: xdr::Transaction,
    signatures: Vec<xdr::DecoratedSignature>,
) -> Result<xdr::TransactionEnvelope, EnvelopeError> {
    let count = signatures.len();
    let signatures = signatures.try_into().map_err(|_| {
        EnvelopeError::Malformed(format!("{} signatures, maximum is {}", count, MAX_SIGNATURES))
    })?;
    Ok(xdr::TransactionEnvelope::Tx(xdr::TransactionV1Envelope {
        tx,
        signatures,
    }))
}

pub fn envelope_base64(envelope: &xdr::TransactionEnvelope) -> Result<String, EnvelopeError> {
    Ok(BASE64.encode(encode(envelope)?))
}

/// Decode a base64 unsigned envelope back into its transaction.
pub fn unsigned_transaction(envelope_base64: &str) -> Result<xdr::Transaction, EnvelopeError> {
    let bytes = BASE64
        .decode(envelope_base64.trim())
        .map_err(|e| EnvelopeError::Malformed(e.to_string()))?;
    let envelope = xdr::TransactionEnvelope::from_xdr(bytes, Limits::none())
        .map_err(|e| EnvelopeError::Malformed(e.to_string()))?;

    match envelope {
        xdr::TransactionEnvelope::Tx(v1) if v1.signatures.is_empty() => Ok(v1.tx),
        xdr::TransactionEnvelope::Tx(_) => Err(EnvelopeError::Malformed(
            "envelope already carries signatures".to_string(),
        )),
        other => Err(EnvelopeError::Malformed(format!(
            "unsupported envelope type {:?}",
            other.discriminant()
        ))),
    }
}
