use std::str::FromStr;

use bitcoin::Txid;

/// Parses `<txid>:<vout>` arguments
pub fn parse_inputs(inputs: Vec<String>) -> anyhow::Result<Vec<(Txid, u32)>> {
    inputs
        .into_iter()
        .map(|input| {
            let (txid, vout) = input
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("invalid input `{input}`, expected <txid>:<vout>"))?;
            Ok((Txid::from_str(txid)?, vout.parse::<u32>()?))
        })
        .collect()
}
