use std::str::FromStr;

use bitcoin::secp256k1::Secp256k1;
use bitcoin::{Address, Amount, Network, PrivateKey, Txid};
use rand::Rng as _;

use crate::wallet::{ScriptType, UnspentOutput};

// <https://mempool.space/testnet/address/tb1qzc8dhpkg5e4t6xyn4zmexxljc4nkje59dg3ark>
pub const WIF: &str = "cVkWbHmoCx6jS8AyPNQqvFr8V9r2qzDHJLaxGDQgDJfxT73w6fuU";
/// Compressed public key of [`WIF`].
pub const PUBKEY_HEX: &str = "02d1c2aebced475b0c672beb0336baa775a44141263ee82051b5e57ad0f2248240";
pub const FUNDING_TXID: &str = "791b415dc6946d864d368a0e5ec5c09ee2ad39cf298bc6e3f9aec293732cfda7";

pub fn signing_key() -> PrivateKey {
    PrivateKey::from_wif(WIF).unwrap()
}

/// Address owned by [`WIF`] for the given script type.
pub fn own_address(script_type: ScriptType) -> Address {
    let secp = Secp256k1::new();
    let public_key = signing_key().public_key(&secp);

    match script_type {
        ScriptType::P2PKH => Address::p2pkh(&public_key, Network::Testnet),
        ScriptType::P2SH => Address::p2shwpkh(&public_key, Network::Testnet).unwrap(),
        ScriptType::P2WPKH => Address::p2wpkh(&public_key, Network::Testnet).unwrap(),
        ScriptType::P2TR => {
            Address::p2tr(&secp, public_key.inner.into(), None, Network::Testnet)
        }
    }
}

pub fn utxo(vout: u32, sats: u64, script_type: ScriptType) -> UnspentOutput {
    UnspentOutput {
        txid: Txid::from_str(FUNDING_TXID).unwrap(),
        vout,
        value: Amount::from_sat(sats),
        address: None,
        script_type,
    }
}

/// Generate a random P2WPKH BTC address and its private key.
pub fn generate_btc_address(network: Network) -> (Address, PrivateKey) {
    let entropy = rand::thread_rng().gen::<[u8; 16]>();
    let mnemonic = bip39::Mnemonic::from_entropy(&entropy).unwrap();

    let seed = mnemonic.to_seed("");

    let private_key = PrivateKey::from_slice(&seed[..32], network).unwrap();
    let public_key = private_key.public_key(&Secp256k1::new());

    let address = Address::p2wpkh(&public_key, network).unwrap();

    (address, private_key)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_generate_btc_address() {
        let (address, private_key) = generate_btc_address(Network::Bitcoin);

        assert_eq!(address.script_pubkey().to_bytes().len(), 22);
        assert_eq!(private_key.network, Network::Bitcoin);
    }

    #[test]
    fn test_wif_matches_public_key() {
        let public_key = signing_key().public_key(&Secp256k1::new());

        assert_eq!(public_key.to_string(), PUBKEY_HEX);
        assert_eq!(
            own_address(ScriptType::P2WPKH).to_string(),
            "tb1qzc8dhpkg5e4t6xyn4zmexxljc4nkje59dg3ark"
        );
    }
}
