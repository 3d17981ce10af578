use std::str::FromStr;

use bitcoin::{Amount, FeeRate, OutPoint, Txid};

use super::builder::{CommitTransaction, OrdTransactionBuilder, RevealTransaction, RevealTransactionArgs};
use crate::{InscriptionEnvelope, OrdError, OrdResult};

/// A broadcasted commit transaction waiting for its reveal.
///
/// It holds everything needed to build the reveal again, e.g. to bump its fee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingReveal {
    commit_txid: Txid,
    commit_vout: u32,
    #[serde(with = "bitcoin::amount::serde::as_sat")]
    commit_amount: Amount,
    envelope: InscriptionEnvelope,
}

impl PendingReveal {
    /// Creates the pending state from the txid returned by the broadcaster.
    pub fn new(
        commit_txid: &str,
        commit_vout: u32,
        commit_amount: Amount,
        envelope: InscriptionEnvelope,
    ) -> OrdResult<Self> {
        let commit_txid = Txid::from_str(commit_txid.trim())
            .map_err(|_| OrdError::MalformedTxid(commit_txid.to_string()))?;

        Ok(Self {
            commit_txid,
            commit_vout,
            commit_amount,
            envelope,
        })
    }

    pub(crate) fn from_commit(commit: &CommitTransaction) -> Self {
        Self {
            commit_txid: commit.tx.txid(),
            commit_vout: 0,
            commit_amount: commit.plan.commit_output_value(),
            envelope: commit.envelope.clone(),
        }
    }

    pub fn commit_outpoint(&self) -> OutPoint {
        OutPoint {
            txid: self.commit_txid,
            vout: self.commit_vout,
        }
    }

    pub fn commit_amount(&self) -> Amount {
        self.commit_amount
    }

    pub fn envelope(&self) -> &InscriptionEnvelope {
        &self.envelope
    }

    /// Builds the reveal transaction spending the commit output.
    ///
    /// Can be called any number of times, every reveal spends the same outpoint.
    pub fn build_reveal(
        &self,
        builder: &OrdTransactionBuilder,
        recipient_address: &str,
        fee_rate: FeeRate,
    ) -> OrdResult<RevealTransaction> {
        builder.build_reveal_transaction(RevealTransactionArgs {
            commit_txid: self.commit_txid,
            commit_vout: self.commit_vout,
            envelope: self.envelope.clone(),
            recipient_address: recipient_address.to_string(),
            fee_rate,
            input_amount: self.commit_amount,
        })
    }

    /// Marks the inscription as revealed by `reveal_txid`.
    pub fn into_revealed(self, reveal_txid: Txid) -> RevealedInscription {
        debug!("inscription committed in {} revealed in {reveal_txid}", self.commit_txid);

        RevealedInscription {
            commit_txid: self.commit_txid,
            reveal_txid,
            envelope: self.envelope,
        }
    }
}

/// An inscription whose reveal transaction has been broadcasted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealedInscription {
    commit_txid: Txid,
    reveal_txid: Txid,
    envelope: InscriptionEnvelope,
}

impl RevealedInscription {
    pub fn commit_txid(&self) -> Txid {
        self.commit_txid
    }

    pub fn reveal_txid(&self) -> Txid {
        self.reveal_txid
    }

    pub fn envelope(&self) -> &InscriptionEnvelope {
        &self.envelope
    }

    /// Inscription id, `<reveal txid>i0`
    pub fn inscription_id(&self) -> String {
        format!("{}i0", self.reveal_txid)
    }
}

/// Lifecycle of an inscription between the commit and the reveal broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InscriptionState {
    CommitPending(PendingReveal),
    Revealed(RevealedInscription),
}

impl InscriptionState {
    pub fn is_revealed(&self) -> bool {
        matches!(self, Self::Revealed(_))
    }

    /// Moves a pending inscription to [`InscriptionState::Revealed`].
    ///
    /// Revealing again with the same txid is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`OrdError::AlreadyRevealed`] if the inscription was revealed by another transaction.
    pub fn reveal(self, reveal_txid: Txid) -> OrdResult<Self> {
        match self {
            Self::CommitPending(pending) => Ok(Self::Revealed(pending.into_revealed(reveal_txid))),
            Self::Revealed(revealed) if revealed.reveal_txid == reveal_txid => {
                Ok(Self::Revealed(revealed))
            }
            Self::Revealed(revealed) => Err(OrdError::AlreadyRevealed(revealed.reveal_txid)),
        }
    }
}

impl From<PendingReveal> for InscriptionState {
    fn from(pending: PendingReveal) -> Self {
        Self::CommitPending(pending)
    }
}
