use std::str::FromStr;

use bitcoin::address::NetworkUnchecked;
use bitcoin::{Address, AddressType, Network};

use crate::wallet::ScriptType;
use crate::{OrdError, OrdResult};

/// Parses a funding, change or receiver address for `network` and
/// classifies it into one of the supported [`ScriptType`]s.
///
/// Segwit addresses (`bc1`, `tb1`, `bcrt1`) are told apart by their witness
/// program: a 20-byte v0 program is P2WPKH, a 32-byte v1 program is P2TR.
/// Base58 addresses starting with `1`, `m` or `n` are P2PKH, any other base58
/// address is P2SH.
pub fn parse_address(address: &str, network: Network) -> OrdResult<(Address, ScriptType)> {
    let malformed = |reason: String| OrdError::MalformedAddress {
        address: address.to_string(),
        reason,
    };

    let unchecked = Address::<NetworkUnchecked>::from_str(address.trim())
        .map_err(|err| malformed(err.to_string()))?;
    let checked = unchecked
        .require_network(network)
        .map_err(|err| malformed(err.to_string()))?;

    let script_type = match checked.address_type() {
        Some(AddressType::P2pkh) => ScriptType::P2PKH,
        Some(AddressType::P2sh) => ScriptType::P2SH,
        Some(AddressType::P2wpkh) => ScriptType::P2WPKH,
        Some(AddressType::P2tr) => ScriptType::P2TR,
        Some(other) => return Err(OrdError::UnsupportedScriptType(other.to_string())),
        None => {
            return Err(OrdError::UnsupportedScriptType(
                "unknown witness program".to_string(),
            ))
        }
    };
    debug!("parsed {script_type} address {checked}");

    Ok((checked, script_type))
}
