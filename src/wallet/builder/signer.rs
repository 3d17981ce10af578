use bitcoin::hashes::Hash as _;
use bitcoin::key::{Keypair, TapTweak as _};
use bitcoin::script::Builder as ScriptBuilder;
use bitcoin::secp256k1::{self, All, Secp256k1};
use bitcoin::sighash::{
    EcdsaSighashType, LegacySighash, Prevouts, SegwitV0Sighash, SighashCache, TapSighash,
    TapSighashType,
};
use bitcoin::{Network, PrivateKey, PublicKey, ScriptBuf, Transaction, TxOut, Witness, XOnlyPublicKey};

use super::taproot::TaprootCommitment;
use super::ScriptType;
use crate::utils::bytes_to_push_bytes;
use crate::{OrdError, OrdResult};

/// Digest to sign for a single input.
///
/// The kind of digest selects the signature scheme: legacy and segwit v0
/// digests are signed with ECDSA, taproot digests with BIP340 Schnorr.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureHash {
    Legacy(LegacySighash),
    SegwitV0(SegwitV0Sighash),
    /// Signed by the key tweaked with an empty merkle root.
    TaprootKeySpend(TapSighash),
    /// Signed by the untweaked key locking the leaf.
    TaprootScriptSpend(TapSighash),
}

/// Signature produced for a [`SignatureHash`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrdSignature {
    Schnorr(bitcoin::taproot::Signature),
    Ecdsa(bitcoin::ecdsa::Signature),
}

impl From<bitcoin::taproot::Signature> for OrdSignature {
    fn from(sig: bitcoin::taproot::Signature) -> Self {
        Self::Schnorr(sig)
    }
}

impl From<bitcoin::ecdsa::Signature> for OrdSignature {
    fn from(sig: bitcoin::ecdsa::Signature) -> Self {
        Self::Ecdsa(sig)
    }
}

impl OrdSignature {
    pub fn to_vec(&self) -> Vec<u8> {
        match self {
            Self::Schnorr(sig) => sig.to_vec(),
            Self::Ecdsa(sig) => sig.to_vec(),
        }
    }
}

/// Local signer holding a single private key, used for every input type.
#[derive(Debug, Clone)]
pub struct Signer {
    private_key: PrivateKey,
    public_key: PublicKey,
    keypair: Keypair,
    secp: Secp256k1<All>,
}

impl Signer {
    pub fn new(private_key: PrivateKey) -> OrdResult<Self> {
        if !private_key.compressed {
            return Err(OrdError::UncompressedKey);
        }

        let secp = Secp256k1::new();
        let public_key = private_key.public_key(&secp);
        let keypair = Keypair::from_secret_key(&secp, &private_key.inner);

        Ok(Self {
            private_key,
            public_key,
            keypair,
            secp,
        })
    }

    pub fn secp(&self) -> &Secp256k1<All> {
        &self.secp
    }

    pub fn network(&self) -> Network {
        self.private_key.network
    }

    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    pub fn x_only_public_key(&self) -> XOnlyPublicKey {
        self.keypair.x_only_public_key().0
    }

    /// Script pubkey of the output of type `script_type` owned by this key.
    ///
    /// P2SH outputs are P2SH-wrapped P2WPKH.
    pub fn script_pubkey(&self, script_type: ScriptType) -> OrdResult<ScriptBuf> {
        Ok(match script_type {
            ScriptType::P2PKH => ScriptBuf::new_p2pkh(&self.public_key.pubkey_hash()),
            ScriptType::P2SH => ScriptBuf::new_p2sh(&self.p2wpkh_script()?.script_hash()),
            ScriptType::P2WPKH => self.p2wpkh_script()?,
            ScriptType::P2TR => ScriptBuf::new_p2tr(&self.secp, self.x_only_public_key(), None),
        })
    }

    fn p2wpkh_script(&self) -> OrdResult<ScriptBuf> {
        let wpubkey_hash = self
            .public_key
            .wpubkey_hash()
            .ok_or(OrdError::UncompressedKey)?;

        Ok(ScriptBuf::new_p2wpkh(&wpubkey_hash))
    }

    /// Signs `hash` with the scheme required by its kind and checks the signature.
    pub fn sign(&self, hash: SignatureHash) -> OrdResult<OrdSignature> {
        let signature = match hash {
            SignatureHash::Legacy(sighash) => self.sign_ecdsa(sighash.to_byte_array())?,
            SignatureHash::SegwitV0(sighash) => self.sign_ecdsa(sighash.to_byte_array())?,
            SignatureHash::TaprootKeySpend(sighash) => {
                let tweaked = self.keypair.tap_tweak(&self.secp, None).to_inner();
                self.sign_schnorr(sighash, &tweaked)?
            }
            SignatureHash::TaprootScriptSpend(sighash) => {
                self.sign_schnorr(sighash, &self.keypair)?
            }
        };
        debug!("signature: {}", hex::encode(signature.to_vec()));

        Ok(signature)
    }

    fn sign_ecdsa(&self, digest: [u8; 32]) -> OrdResult<OrdSignature> {
        let message = secp256k1::Message::from_digest(digest);

        // sign
        let signature = self.secp.sign_ecdsa(&message, &self.private_key.inner);
        // verify
        self.secp
            .verify_ecdsa(&message, &signature, &self.public_key.inner)?;

        Ok(bitcoin::ecdsa::Signature::sighash_all(signature).into())
    }

    fn sign_schnorr(&self, sighash: TapSighash, keypair: &Keypair) -> OrdResult<OrdSignature> {
        let message = secp256k1::Message::from_digest(sighash.to_byte_array());

        // sign
        let sig = self.secp.sign_schnorr_no_aux_rand(&message, keypair);
        // verify
        self.secp
            .verify_schnorr(&sig, &message, &keypair.x_only_public_key().0)?;

        Ok(bitcoin::taproot::Signature {
            sig,
            hash_ty: TapSighashType::Default,
        }
        .into())
    }

    /// Signs every input of a commit transaction.
    ///
    /// `prevouts[i]` is the output spent by input `i` and `script_types[i]` its type.
    /// All digests are computed on the unsigned transaction before any input is filled.
    pub fn sign_commit_transaction(
        &self,
        mut transaction: Transaction,
        prevouts: &[TxOut],
        script_types: &[ScriptType],
    ) -> OrdResult<Transaction> {
        if transaction.input.len() != prevouts.len() {
            return Err(OrdError::InputNotFound(prevouts.len()));
        }
        if prevouts.len() != script_types.len() {
            return Err(OrdError::InputNotFound(script_types.len()));
        }

        let mut signed_inputs = Vec::with_capacity(prevouts.len());
        {
            let mut cache = SighashCache::new(&transaction);
            for (index, (prevout, script_type)) in prevouts.iter().zip(script_types).enumerate() {
                let hash = match script_type {
                    ScriptType::P2PKH => SignatureHash::Legacy(cache.legacy_signature_hash(
                        index,
                        &prevout.script_pubkey,
                        EcdsaSighashType::All.to_u32(),
                    )?),
                    ScriptType::P2SH => SignatureHash::SegwitV0(cache.p2wpkh_signature_hash(
                        index,
                        &self.p2wpkh_script()?,
                        prevout.value,
                        EcdsaSighashType::All,
                    )?),
                    ScriptType::P2WPKH => SignatureHash::SegwitV0(cache.p2wpkh_signature_hash(
                        index,
                        &prevout.script_pubkey,
                        prevout.value,
                        EcdsaSighashType::All,
                    )?),
                    ScriptType::P2TR => {
                        SignatureHash::TaprootKeySpend(cache.taproot_key_spend_signature_hash(
                            index,
                            &Prevouts::All(prevouts),
                            TapSighashType::Default,
                        )?)
                    }
                };

                let signature = self.sign(hash)?;
                signed_inputs.push(self.unlocking_data(*script_type, signature)?);
            }
        }

        for (index, (script_sig, witness)) in signed_inputs.into_iter().enumerate() {
            let input = transaction
                .input
                .get_mut(index)
                .ok_or(OrdError::InputNotFound(index))?;
            input.script_sig = script_sig;
            input.witness = witness;
        }

        Ok(transaction)
    }

    /// Script sig and witness spending an output of `script_type` with `signature`.
    fn unlocking_data(
        &self,
        script_type: ScriptType,
        signature: OrdSignature,
    ) -> OrdResult<(ScriptBuf, Witness)> {
        let unlocking_data = match (script_type, signature) {
            (ScriptType::P2PKH, OrdSignature::Ecdsa(signature)) => {
                let script_sig = ScriptBuilder::new()
                    .push_slice(bytes_to_push_bytes(&signature.to_vec())?)
                    .push_key(&self.public_key)
                    .into_script();
                (script_sig, Witness::new())
            }
            (ScriptType::P2SH, OrdSignature::Ecdsa(signature)) => {
                let redeem_script = self.p2wpkh_script()?;
                let script_sig = ScriptBuilder::new()
                    .push_slice(bytes_to_push_bytes(redeem_script.as_bytes())?)
                    .into_script();
                (script_sig, Witness::p2wpkh(&signature, &self.public_key.inner))
            }
            (ScriptType::P2WPKH, OrdSignature::Ecdsa(signature)) => (
                ScriptBuf::new(),
                Witness::p2wpkh(&signature, &self.public_key.inner),
            ),
            (ScriptType::P2TR, OrdSignature::Schnorr(signature)) => {
                let mut witness = Witness::new();
                witness.push(signature.to_vec());
                (ScriptBuf::new(), witness)
            }
            (script_type, _) => {
                return Err(OrdError::UnsupportedScriptType(format!(
                    "unexpected signature scheme for {script_type}"
                )))
            }
        };
        debug!("witness: {:?}", unlocking_data.1);

        Ok(unlocking_data)
    }

    /// Signs the single input of a reveal transaction through the script path of `commitment`.
    ///
    /// The witness is `[signature, leaf script, control block]`.
    pub fn sign_reveal_transaction(
        &self,
        mut transaction: Transaction,
        commitment: &TaprootCommitment,
        prevout: &TxOut,
    ) -> OrdResult<Transaction> {
        let prevouts = [prevout.clone()];
        let sighash = SighashCache::new(&transaction).taproot_script_spend_signature_hash(
            0,
            &Prevouts::All(&prevouts),
            commitment.leaf_hash(),
            TapSighashType::Default,
        )?;
        let signature = self.sign(SignatureHash::TaprootScriptSpend(sighash))?;

        let mut witness = Witness::new();
        witness.push(signature.to_vec());
        witness.push(commitment.leaf_script().as_bytes());
        witness.push(commitment.control_block().serialize());
        debug!("witness: {witness:?}");

        *transaction
            .input
            .first_mut()
            .map(|input| &mut input.witness)
            .ok_or(OrdError::InputNotFound(0))? = witness;

        Ok(transaction)
    }
}
