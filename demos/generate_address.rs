use argh::FromArgs;
use bitcoin::secp256k1::Secp256k1;
use bitcoin::{Address, Network};
use rand::Rng as _;

#[derive(FromArgs, Debug)]
#[argh(description = "Generate a random key and its P2WPKH and P2TR addresses")]
struct Args {
    #[argh(positional, default = "String::from(\"testnet\")")]
    /// network (bitcoin, testnet, signet, regtest)
    network: String,
}

fn main() -> anyhow::Result<()> {
    let args: Args = argh::from_env();

    let network = match args.network.to_lowercase().as_str() {
        "bitcoin" | "mainnet" | "prod" => Network::Bitcoin,
        "testnet" | "test" => Network::Testnet,
        "signet" => Network::Signet,
        "regtest" => Network::Regtest,
        other => anyhow::bail!("Invalid network: {other}"),
    };

    let entropy = rand::thread_rng().gen::<[u8; 16]>();
    let mnemonic = bip39::Mnemonic::from_entropy(&entropy)?;

    let seed = mnemonic.to_seed("");

    let private_key = bitcoin::PrivateKey::from_slice(&seed[..32], network)?;
    let secp = Secp256k1::new();
    let public_key = private_key.public_key(&secp);

    let p2wpkh = Address::p2wpkh(&public_key, network)?;
    let p2tr = Address::p2tr(&secp, public_key.inner.x_only_public_key().0, None, network);

    println!("WIF: {}", private_key.to_wif());
    println!("Mnemonic: {}", mnemonic);
    println!("P2WPKH address: {}", p2wpkh);
    println!("P2TR address: {}", p2tr);

    Ok(())
}
