use bitcoin::{Amount, Txid};
use thiserror::Error;

/// Ordinal transaction builder error
#[derive(Error, Debug)]
pub enum OrdError {
    #[error("insufficient funds: {required} required, {available} available")]
    InsufficientFunds { required: Amount, available: Amount },
    #[error("output of {amount} is below the dust limit of {dust_limit}")]
    DustViolation { amount: Amount, dust_limit: Amount },
    #[error("unsupported script type: {0}")]
    UnsupportedScriptType(String),
    #[error("malformed address `{address}`: {reason}")]
    MalformedAddress { address: String, reason: String },
    #[error("{field} is {len} bytes long, the maximum push is {max} bytes")]
    EncodingOverflow {
        field: &'static str,
        len: usize,
        max: usize,
    },
    #[error("invalid content type `{0}`")]
    InvalidContentType(String),
    #[error("malformed transaction id `{0}`")]
    MalformedTxid(String),
    #[error("inscription already revealed in {0}")]
    AlreadyRevealed(Txid),
    #[error("inscription parse error: {0}")]
    InscriptionParser(#[from] InscriptionParseError),
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
    #[error("bitcoin script error: {0}")]
    PushBytes(#[from] bitcoin::script::PushBytesError),
    #[error("bitcoin sighash error: {0}")]
    SigHash(#[from] bitcoin::sighash::Error),
    #[error("secp256k1 error: {0}")]
    Secp256k1(#[from] bitcoin::secp256k1::Error),
    #[error("failed to compute the taproot commitment")]
    TaprootCompute,
    #[error("bad transaction input: {0}")]
    InputNotFound(usize),
    #[error("input {0} is not spendable by the signing key")]
    InputKeyMismatch(usize),
    #[error("segwit outputs require a compressed public key")]
    UncompressedKey,
    #[error("fee computation overflowed")]
    FeeOverflow,
}

/// Errors raised while decoding an inscription envelope
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InscriptionParseError {
    #[error("unexpected end of script at byte {0}")]
    UnexpectedEnd(usize),
    #[error("unexpected opcode {opcode:#04x} at byte {offset}")]
    UnexpectedOpcode { offset: usize, opcode: u8 },
    #[error("missing `ord` protocol identifier")]
    ProtocolId,
    #[error("content type is not valid UTF-8")]
    ContentType,
    #[error("trailing bytes after the envelope at byte {0}")]
    TrailingBytes(usize),
    #[error("no inscription envelope found")]
    NotFound,
    #[error("ord parser error: {0}")]
    OrdParser(String),
}
