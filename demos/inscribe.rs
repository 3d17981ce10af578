mod utils;

use std::path::PathBuf;

use argh::FromArgs;
use bitcoin::{Address, FeeRate, PrivateKey};
use log::{debug, info};
use ord_inscribe::utils::fees::reveal_funding;
use ord_inscribe::{
    Brc20, CreateCommitTransactionArgs, Inscription as _, InscriptionEnvelope,
    OrdTransactionBuilder, ScriptType,
};
use utils::rpc_client;

#[derive(FromArgs, Debug)]
#[argh(description = "Inscribe a file, a text or a BRC-20 operation")]
struct Args {
    #[argh(option, short = 'p')]
    /// private key (WIF), its network is used
    private_key: String,

    #[argh(option, short = 'c', default = "String::from(\"text/plain;charset=utf-8\")")]
    /// content type
    content_type: String,

    #[argh(option, short = 't')]
    /// text to inscribe
    text: Option<String>,

    #[argh(option, short = 'f')]
    /// file to inscribe
    file: Option<PathBuf>,

    #[argh(option, short = 'b')]
    /// BRC-20 operation to inscribe, as JSON
    brc20: Option<String>,

    #[argh(option, short = 'r')]
    /// recipient of the inscription; the P2TR address of the key if not set
    recipient: Option<String>,

    #[argh(option, short = 'F', default = "5")]
    /// fee rate in sat/vB
    fee_rate: u64,

    #[argh(option, short = 's', default = "String::from(\"p2wpkh\")")]
    /// script type of the inputs (p2pkh, p2sh, p2wpkh, p2tr)
    script_type: String,

    #[argh(positional)]
    /// tx inputs, as <txid>:<vout>
    inputs: Vec<String>,

    #[argh(switch, short = 'd')]
    /// dry run, don't send any transaction
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args: Args = argh::from_env();

    let private_key = PrivateKey::from_wif(&args.private_key)?;
    let network = private_key.network;
    let script_type: ScriptType = args.script_type.parse()?;
    let fee_rate = FeeRate::from_sat_per_vb(args.fee_rate)
        .ok_or_else(|| anyhow::anyhow!("invalid fee rate {}", args.fee_rate))?;

    let envelope = match (args.brc20, args.file, args.text) {
        (Some(brc20), _, _) => brc20.parse::<Brc20>()?.envelope()?,
        (None, Some(file), _) => InscriptionEnvelope::new(args.content_type, std::fs::read(file)?)?,
        (None, None, Some(text)) => InscriptionEnvelope::new(args.content_type, text)?,
        (None, None, None) => anyhow::bail!("nothing to inscribe, use --text, --file or --brc20"),
    };
    debug!("envelope: {}", envelope.script());

    let builder = OrdTransactionBuilder::new(private_key)?;
    let own_address = Address::from_script(&builder.signer().script_pubkey(script_type)?, network)?;
    let recipient = match args.recipient {
        Some(recipient) => recipient,
        None => Address::from_script(&builder.signer().script_pubkey(ScriptType::P2TR)?, network)?
            .to_string(),
    };
    info!("sender address: {own_address}, recipient: {recipient}");

    let inputs = utils::parse_inputs(args.inputs)?;
    let inputs = rpc_client::unspent_outputs(&inputs, script_type, network).await?;

    let commitment = builder.commitment(&envelope)?;
    let commit_output_value = reveal_funding(commitment.leaf_script(), fee_rate)?;
    info!(
        "commitment address: {}, reveal funding: {commit_output_value}",
        commitment.address()
    );

    debug!("getting commit transaction...");
    let commit = builder.build_commit_transaction(CreateCommitTransactionArgs {
        inputs,
        envelope,
        change_address: own_address.to_string(),
        fee_rate,
        commit_output_value: Some(commit_output_value),
    })?;
    info!("commit fee: {}", commit.plan.fee_paid());
    debug!("commit transaction: {}", commit.tx.hex());

    let commit_txid = if args.dry_run {
        commit.tx.txid()
    } else {
        info!("broadcasting Commit transaction: {}", commit.tx.txid());
        rpc_client::broadcast_transaction(&commit.tx, network).await?
    };
    info!("Commit transaction broadcasted: {}", commit_txid);

    let pending = ord_inscribe::PendingReveal::new(
        &commit_txid.to_string(),
        0,
        commit.plan.commit_output_value(),
        commit.envelope.clone(),
    )?;
    println!("{}", serde_json::to_string(&pending)?);

    debug!("getting reveal transaction...");
    let reveal = pending.build_reveal(&builder, &recipient, fee_rate)?;
    info!("reveal fee: {}", reveal.plan.fee());
    debug!("reveal transaction: {}", reveal.tx.hex());

    if args.dry_run {
        println!("{}", commit.tx.hex());
        println!("{}", reveal.tx.hex());
        return Ok(());
    }

    // wait for commit transaction to be inserted
    rpc_client::wait_for_tx(&commit_txid, network).await?;

    info!(
        "commit transaction confirmed; broadcasting reveal transaction: {}",
        reveal.tx.txid()
    );
    let reveal_txid = rpc_client::broadcast_transaction(&reveal.tx, network).await?;
    let revealed = pending.into_revealed(reveal_txid);
    info!("Reveal transaction broadcasted, inscription {}", revealed.inscription_id());

    Ok(())
}
