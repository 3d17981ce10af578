pub mod plan;
pub mod signer;
mod taproot;

use std::fmt;
use std::str::FromStr;

use bitcoin::absolute::LockTime;
use bitcoin::consensus::encode::serialize_hex;
use bitcoin::transaction::Version;
use bitcoin::{
    Amount, FeeRate, Network, OutPoint, PrivateKey, ScriptBuf, Sequence, Transaction, TxIn, TxOut,
    Txid, Witness,
};
use serde_with::{serde_as, DisplayFromStr};

pub use self::plan::{CommitPlan, RevealPlan};
pub use self::signer::Signer;
pub use self::taproot::TaprootCommitment;
use crate::utils::constants::DUST_LIMIT;
use crate::utils::fees::estimate_reveal_fee;
use crate::utils::parse_address;
use crate::wallet::PendingReveal;
use crate::{InscriptionEnvelope, OrdError, OrdResult};

/// Type of the script locking an [`UnspentOutput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptType {
    P2PKH,
    /// P2SH-wrapped P2WPKH
    P2SH,
    P2WPKH,
    P2TR,
}

impl fmt::Display for ScriptType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::P2PKH => "P2PKH",
            Self::P2SH => "P2SH",
            Self::P2WPKH => "P2WPKH",
            Self::P2TR => "P2TR",
        };
        f.write_str(name)
    }
}

impl FromStr for ScriptType {
    type Err = OrdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "P2PKH" => Ok(Self::P2PKH),
            "P2SH" | "P2SH-P2WPKH" => Ok(Self::P2SH),
            "P2WPKH" => Ok(Self::P2WPKH),
            "P2TR" => Ok(Self::P2TR),
            _ => Err(OrdError::UnsupportedScriptType(s.to_string())),
        }
    }
}

/// Unspent transaction output to be used as input of a commit transaction
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnspentOutput {
    pub txid: Txid,
    pub vout: u32,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    pub value: Amount,
    /// Address holding the output, checked against the signing key when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde_as(as = "DisplayFromStr")]
    pub script_type: ScriptType,
}

impl UnspentOutput {
    pub fn outpoint(&self) -> OutPoint {
        OutPoint {
            txid: self.txid,
            vout: self.vout,
        }
    }
}

/// A signed transaction, ready to be broadcasted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: Transaction,
    hex: String,
    txid: Txid,
}

impl SignedTransaction {
    pub(crate) fn new(tx: Transaction) -> Self {
        let hex = serialize_hex(&tx);
        let txid = tx.txid();

        Self { tx, hex, txid }
    }

    /// Consensus-encoded transaction, hex encoded
    pub fn hex(&self) -> &str {
        &self.hex
    }

    pub fn txid(&self) -> Txid {
        self.txid
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn into_transaction(self) -> Transaction {
        self.tx
    }
}

#[derive(Debug, Clone)]
/// Arguments for creating a commit transaction
pub struct CreateCommitTransactionArgs {
    /// UTXOs to fund the transaction with, selected in order
    pub inputs: Vec<UnspentOutput>,
    /// Envelope to commit to
    pub envelope: InscriptionEnvelope,
    /// Address to send the leftovers BTC of the transaction
    pub change_address: String,
    /// Current fee rate on the network
    pub fee_rate: FeeRate,
    /// Value of the commit output, [`DUST_LIMIT`] if not set.
    ///
    /// The reveal transaction pays its fee from this output, see [`crate::utils::fees::reveal_funding`].
    pub commit_output_value: Option<Amount>,
}

/// Arguments for creating a reveal transaction
#[derive(Debug, Clone)]
pub struct RevealTransactionArgs {
    /// Transaction id of the broadcasted commit transaction
    pub commit_txid: Txid,
    /// Index of the commit output
    pub commit_vout: u32,
    /// Envelope committed to by the commit transaction
    pub envelope: InscriptionEnvelope,
    /// Recipient address of the inscription
    pub recipient_address: String,
    /// Current fee rate on the network
    pub fee_rate: FeeRate,
    /// Value of the commit output
    pub input_amount: Amount,
}

/// Result of [`OrdTransactionBuilder::build_commit_transaction`].
#[derive(Debug, Clone)]
pub struct CommitTransaction {
    pub plan: CommitPlan,
    pub commitment: TaprootCommitment,
    pub envelope: InscriptionEnvelope,
    pub tx: SignedTransaction,
}

impl CommitTransaction {
    /// Reveal state for this commit, once it has been broadcasted.
    pub fn pending_reveal(&self) -> PendingReveal {
        PendingReveal::from_commit(self)
    }
}

/// Result of [`OrdTransactionBuilder::build_reveal_transaction`].
#[derive(Debug, Clone)]
pub struct RevealTransaction {
    pub plan: RevealPlan,
    pub tx: SignedTransaction,
}

/// Builder of the commit and reveal transactions of an inscription.
///
/// The network is the one of the signing key. Building never broadcasts.
#[derive(Debug, Clone)]
pub struct OrdTransactionBuilder {
    signer: Signer,
    network: Network,
}

impl OrdTransactionBuilder {
    pub fn new(private_key: PrivateKey) -> OrdResult<Self> {
        let network = private_key.network;

        Ok(Self {
            signer: Signer::new(private_key)?,
            network,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Taproot commitment of `envelope`, with the signing key as internal key.
    pub fn commitment(&self, envelope: &InscriptionEnvelope) -> OrdResult<TaprootCommitment> {
        TaprootCommitment::derive(
            self.signer.secp(),
            self.signer.x_only_public_key(),
            envelope,
            self.network,
        )
    }

    /// Creates the commit transaction.
    pub fn build_commit_transaction(
        &self,
        args: CreateCommitTransactionArgs,
    ) -> OrdResult<CommitTransaction> {
        for (index, input) in args.inputs.iter().enumerate() {
            self.check_input_owner(index, input)?;
        }
        let (change_address, _) = parse_address(&args.change_address, self.network)?;

        let commitment = self.commitment(&args.envelope)?;
        let commit_output_value = args.commit_output_value.unwrap_or(DUST_LIMIT);
        let plan = CommitPlan::select(&args.inputs, commit_output_value, args.fee_rate)?;

        let mut tx_out = vec![TxOut {
            value: plan.commit_output_value(),
            script_pubkey: commitment.script_pubkey(),
        }];
        if plan.has_change() {
            tx_out.push(TxOut {
                value: plan.change_value(),
                script_pubkey: change_address.script_pubkey(),
            });
        }

        let tx_in = plan
            .inputs()
            .iter()
            .map(|input| TxIn {
                previous_output: input.outpoint(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            })
            .collect();

        let unsigned_tx = Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: tx_in,
            output: tx_out,
        };

        let prevouts = plan
            .inputs()
            .iter()
            .map(|input| {
                Ok(TxOut {
                    value: input.value,
                    script_pubkey: self.signer.script_pubkey(input.script_type)?,
                })
            })
            .collect::<OrdResult<Vec<_>>>()?;
        let script_types = plan
            .inputs()
            .iter()
            .map(|input| input.script_type)
            .collect::<Vec<_>>();

        let tx = self
            .signer
            .sign_commit_transaction(unsigned_tx, &prevouts, &script_types)?;
        let tx = SignedTransaction::new(tx);
        debug!("commit transaction {}: {}", tx.txid(), tx.hex());

        Ok(CommitTransaction {
            plan,
            commitment,
            envelope: args.envelope,
            tx,
        })
    }

    /// Create the reveal transaction
    pub fn build_reveal_transaction(
        &self,
        args: RevealTransactionArgs,
    ) -> OrdResult<RevealTransaction> {
        let (recipient_address, _) = parse_address(&args.recipient_address, self.network)?;
        let commitment = self.commitment(&args.envelope)?;

        let fee = estimate_reveal_fee(commitment.leaf_script(), args.fee_rate)?;
        let plan = RevealPlan::new(args.commit_txid, args.commit_vout, args.input_amount, fee)?;

        let unsigned_tx = Transaction {
            version: Version::TWO,
            lock_time: LockTime::ZERO,
            input: vec![TxIn {
                previous_output: plan.commit_outpoint(),
                script_sig: ScriptBuf::new(),
                sequence: Sequence::MAX,
                witness: Witness::new(),
            }],
            output: vec![TxOut {
                value: plan.output_amount(),
                script_pubkey: recipient_address.script_pubkey(),
            }],
        };
        let prevout = TxOut {
            value: plan.input_amount(),
            script_pubkey: commitment.script_pubkey(),
        };

        let tx = self
            .signer
            .sign_reveal_transaction(unsigned_tx, &commitment, &prevout)?;
        let tx = SignedTransaction::new(tx);
        debug!("reveal transaction {}: {}", tx.txid(), tx.hex());

        Ok(RevealTransaction { plan, tx })
    }

    /// A declared input address must be the signing key's address of the input type.
    fn check_input_owner(&self, index: usize, input: &UnspentOutput) -> OrdResult<()> {
        let Some(address) = input.address.as_deref() else {
            return Ok(());
        };

        let (address, script_type) = parse_address(address, self.network)?;
        if script_type != input.script_type
            || address.script_pubkey() != self.signer.script_pubkey(input.script_type)?
        {
            return Err(OrdError::InputKeyMismatch(index));
        }

        Ok(())
    }
}
