use std::str::FromStr;
use std::time::Duration;

use bitcoin::{Amount, Network, Txid};
use log::{debug, info};
use ord_inscribe::{ScriptType, SignedTransaction, UnspentOutput};

fn api_url(network: Network) -> String {
    let network_str = match network {
        Network::Testnet => "/testnet",
        Network::Regtest => "/regtest",
        Network::Signet => "/signet",
        _ => "",
    };

    format!("https://blockstream.info{network_str}/api")
}

pub async fn broadcast_transaction(
    transaction: &SignedTransaction,
    network: Network,
) -> anyhow::Result<Txid> {
    let url = format!("{}/tx", api_url(network));
    let tx_hex = transaction.hex().to_string();
    debug!("tx_hex ({}): {tx_hex}", tx_hex.len());

    let result = reqwest::Client::new()
        .post(&url)
        .body(tx_hex)
        .send()
        .await?;

    debug!("result: {:?}", result);

    if result.status().is_success() {
        let txid = result.text().await?;
        debug!("txid: {txid}");
        Ok(Txid::from_str(txid.trim())?)
    } else {
        Err(anyhow::anyhow!(
            "failed to broadcast transaction: {}",
            result.text().await?
        ))
    }
}

/// Looks up the value of each `(txid, vout)`, all of them locked by `script_type`.
pub async fn unspent_outputs(
    inputs: &[(Txid, u32)],
    script_type: ScriptType,
    network: Network,
) -> anyhow::Result<Vec<UnspentOutput>> {
    let mut unspent_outputs = Vec::with_capacity(inputs.len());
    for (txid, vout) in inputs {
        let tx = get_tx_by_hash(txid, network).await?;
        let output = tx
            .vout
            .get(*vout as usize)
            .ok_or_else(|| anyhow::anyhow!("invalid index {} for txid {}", vout, txid))?;

        unspent_outputs.push(UnspentOutput {
            txid: *txid,
            vout: *vout,
            value: Amount::from_sat(output.value),
            address: output.scriptpubkey_address.clone(),
            script_type,
        });
    }
    Ok(unspent_outputs)
}

pub async fn get_tx_by_hash(txid: &Txid, network: Network) -> anyhow::Result<ApiTransaction> {
    let url = format!("{}/tx/{}", api_url(network), txid);
    let tx = reqwest::get(&url).await?.error_for_status()?.json().await?;
    Ok(tx)
}

pub async fn wait_for_tx(txid: &Txid, network: Network) -> anyhow::Result<()> {
    loop {
        info!("waiting for transaction to be confirmed...");
        tokio::time::sleep(Duration::from_secs(10)).await;
        if get_tx_by_hash(txid, network).await.is_ok() {
            break;
        }
        debug!("retrying in 10 seconds...");
    }

    Ok(())
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiTransaction {
    vout: Vec<ApiVout>,
}

#[derive(Debug, serde::Deserialize)]
pub struct ApiVout {
    value: u64,
    scriptpubkey_address: Option<String>,
}
