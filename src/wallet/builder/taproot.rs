use bitcoin::opcodes::all::OP_CHECKSIG;
use bitcoin::script::Builder as ScriptBuilder;
use bitcoin::secp256k1::{All, Secp256k1};
use bitcoin::taproot::{ControlBlock, LeafVersion, TapLeafHash, TaprootBuilder};
use bitcoin::{Address, Network, Script, ScriptBuf, XOnlyPublicKey};

use crate::{InscriptionEnvelope, OrdError, OrdResult};

/// Single-leaf taproot tree committing to an inscription envelope.
///
/// The leaf locks the envelope behind `<internal key> OP_CHECKSIG`, so only the
/// owner of the internal key can reveal it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaprootCommitment {
    internal_key: XOnlyPublicKey,
    leaf_script: ScriptBuf,
    output_key: XOnlyPublicKey,
    address: Address,
    control_block: ControlBlock,
}

impl TaprootCommitment {
    /// Derive the commitment of `envelope` for `internal_key`.
    pub fn derive(
        secp: &Secp256k1<All>,
        internal_key: XOnlyPublicKey,
        envelope: &InscriptionEnvelope,
        network: Network,
    ) -> OrdResult<Self> {
        let leaf_script = Self::build_leaf_script(internal_key, envelope);
        debug!("leaf_script: {leaf_script}");

        let taproot_spend_info = TaprootBuilder::new()
            .add_leaf(0, leaf_script.clone())
            .map_err(|_| OrdError::TaprootCompute)?
            .finalize(secp, internal_key)
            .map_err(|_| OrdError::TaprootCompute)?;

        let output_key = taproot_spend_info.output_key();
        let address = Address::p2tr_tweaked(output_key, network);
        debug!("commitment address: {address}");

        let control_block = taproot_spend_info
            .control_block(&(leaf_script.clone(), LeafVersion::TapScript))
            .ok_or(OrdError::TaprootCompute)?;

        Ok(Self {
            internal_key,
            leaf_script,
            output_key: output_key.to_inner(),
            address,
            control_block,
        })
    }

    fn build_leaf_script(internal_key: XOnlyPublicKey, envelope: &InscriptionEnvelope) -> ScriptBuf {
        let mut leaf_script = ScriptBuilder::new()
            .push_x_only_key(&internal_key)
            .push_opcode(OP_CHECKSIG)
            .into_bytes();
        leaf_script.extend_from_slice(envelope.script().as_bytes());

        ScriptBuf::from_bytes(leaf_script)
    }

    pub fn internal_key(&self) -> XOnlyPublicKey {
        self.internal_key
    }

    pub fn leaf_script(&self) -> &Script {
        &self.leaf_script
    }

    pub fn output_key(&self) -> XOnlyPublicKey {
        self.output_key
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn control_block(&self) -> &ControlBlock {
        &self.control_block
    }

    pub fn script_pubkey(&self) -> ScriptBuf {
        self.address.script_pubkey()
    }

    pub fn leaf_hash(&self) -> TapLeafHash {
        TapLeafHash::from_script(&self.leaf_script, LeafVersion::TapScript)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::test_utils::signing_key;

    fn commitment(envelope: &InscriptionEnvelope) -> TaprootCommitment {
        let secp = Secp256k1::new();
        let internal_key = signing_key().public_key(&secp).inner.x_only_public_key().0;

        TaprootCommitment::derive(&secp, internal_key, envelope, Network::Testnet).unwrap()
    }

    #[test]
    fn test_should_derive_commitment() {
        let secp = Secp256k1::new();
        let envelope = InscriptionEnvelope::new("text/plain", "Hello, Ordinals!").unwrap();
        let commitment = commitment(&envelope);

        let leaf = commitment.leaf_script().as_bytes();
        assert_eq!(leaf.len(), 71);
        assert_eq!(leaf[0], 0x20);
        assert_eq!(&leaf[1..33], &commitment.internal_key().serialize());
        assert_eq!(leaf[33], OP_CHECKSIG.to_u8());
        assert_eq!(&leaf[34..], envelope.script().as_bytes());

        assert!(commitment.control_block().verify_taproot_commitment(
            &secp,
            commitment.output_key(),
            commitment.leaf_script()
        ));
        assert_eq!(commitment.control_block().serialize().len(), 33);
        assert!(commitment.address().to_string().starts_with("tb1p"));
        assert_eq!(commitment.script_pubkey().len(), 34);
        assert_eq!(&commitment.script_pubkey().as_bytes()[2..], &commitment.output_key().serialize());
    }

    #[test]
    fn test_should_derive_same_commitment_twice() {
        let envelope = InscriptionEnvelope::new("text/plain", "Hello, Ordinals!").unwrap();

        assert_eq!(commitment(&envelope), commitment(&envelope));
    }

    #[test]
    fn test_should_commit_to_content() {
        let first = InscriptionEnvelope::new("text/plain", "first").unwrap();
        let second = InscriptionEnvelope::new("text/plain", "second").unwrap();

        assert_ne!(commitment(&first).output_key(), commitment(&second).output_key());
        assert_ne!(commitment(&first).leaf_hash(), commitment(&second).leaf_hash());
    }
}
