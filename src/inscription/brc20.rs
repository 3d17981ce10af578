use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_with::{serde_as, DisplayFromStr};

use crate::inscription::payload::JsonPayload;
use crate::utils::constants::BRC20_CONTENT_TYPE;
use crate::{Inscription, OrdError, OrdResult};

const PROTOCOL: &str = "brc-20";

/// Represents a BRC-20 operation: (Deploy, Mint, Transfer)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op")]
pub enum Brc20 {
    /// Deploy a BRC-20 token
    #[serde(rename = "deploy")]
    Deploy(Brc20Deploy),
    /// Mint BRC-20 tokens
    #[serde(rename = "mint")]
    Mint(Brc20Mint),
    /// Transfer BRC-20 tokens
    #[serde(rename = "transfer")]
    Transfer(Brc20Transfer),
}

impl Brc20 {
    /// Create a new BRC-20 deploy operation
    pub fn deploy(
        tick: impl ToString,
        max: u64,
        lim: Option<u64>,
        dec: Option<u64>,
        self_mint: Option<bool>,
    ) -> Self {
        Self::Deploy(Brc20Deploy {
            protocol: PROTOCOL.to_string(),
            tick: tick.to_string(),
            max,
            lim,
            dec,
            self_mint,
        })
    }

    /// Create a new BRC-20 mint operation
    pub fn mint(tick: impl ToString, amt: u64) -> Self {
        Self::Mint(Brc20Mint {
            protocol: PROTOCOL.to_string(),
            tick: tick.to_string(),
            amt,
        })
    }

    /// Create a new BRC-20 transfer operation
    pub fn transfer(tick: impl ToString, amt: u64) -> Self {
        Self::Transfer(Brc20Transfer {
            protocol: PROTOCOL.to_string(),
            tick: tick.to_string(),
            amt,
        })
    }

    pub fn op(&self) -> &'static str {
        match self {
            Self::Deploy(_) => "deploy",
            Self::Mint(_) => "mint",
            Self::Transfer(_) => "transfer",
        }
    }

    pub fn tick(&self) -> &str {
        match self {
            Self::Deploy(deploy) => &deploy.tick,
            Self::Mint(mint) => &mint.tick,
            Self::Transfer(transfer) => &transfer.tick,
        }
    }

    /// Fields of the operation in their inscribed order:
    /// `p`, `op`, `tick`, then `max`, `lim`, `dec`, `self_mint` or `amt`.
    pub fn payload(&self) -> JsonPayload {
        let payload = JsonPayload::new()
            .with("p", PROTOCOL)
            .with("op", self.op())
            .with("tick", self.tick());

        match self {
            Self::Deploy(deploy) => {
                let mut payload = payload.with("max", deploy.max);
                if let Some(lim) = deploy.lim {
                    payload.push("lim", lim);
                }
                if let Some(dec) = deploy.dec {
                    payload.push("dec", dec);
                }
                if let Some(self_mint) = deploy.self_mint {
                    payload.push("self_mint", self_mint);
                }
                payload
            }
            Self::Mint(Brc20Mint { amt, .. }) | Self::Transfer(Brc20Transfer { amt, .. }) => {
                payload.with("amt", amt)
            }
        }
    }

    /// Encode the operation as compact JSON
    pub fn encode(&self) -> OrdResult<String> {
        self.payload().encode()
    }

    /// Parse an inscription body as a BRC-20 operation
    pub fn parse(data: &[u8]) -> OrdResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}

impl Serialize for Brc20 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.payload().serialize(serializer)
    }
}

impl FromStr for Brc20 {
    type Err = OrdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(s).map_err(OrdError::from)
    }
}

impl Inscription for Brc20 {
    fn content_type(&self) -> String {
        BRC20_CONTENT_TYPE.to_string()
    }

    fn data(&self) -> OrdResult<Vec<u8>> {
        Ok(self.encode()?.into_bytes())
    }
}

fn brc20_protocol<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let protocol = String::deserialize(deserializer)?;
    if protocol != PROTOCOL {
        return Err(D::Error::custom(format!("unknown protocol `{protocol}`")));
    }

    Ok(protocol)
}

/// `deploy` op
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Brc20Deploy {
    /// Protocol (required): Helps other systems identify and process brc-20 events
    #[serde(rename = "p", deserialize_with = "brc20_protocol")]
    protocol: String,
    /// Ticker (required): 4 or 5 letter identifier of the brc-20
    pub tick: String,
    /// Max supply (required): Set max supply of the brc-20
    #[serde_as(as = "DisplayFromStr")]
    pub max: u64,
    /// Mint limit (optional): If letting users mint to themsleves, limit per ordinal
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub lim: Option<u64>,
    /// Decimals (optional): Set decimal precision, default to 18
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub dec: Option<u64>,
    /// Self mint: Set the ticker to be mintable only by the deployment holder
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub self_mint: Option<bool>,
}

/// `mint` op
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Brc20Mint {
    /// Protocol (required): Helps other systems identify and process brc-20 events
    #[serde(rename = "p", deserialize_with = "brc20_protocol")]
    protocol: String,
    /// Ticker (required): 4 or 5 letter identifier of the brc-20
    pub tick: String,
    /// Amount to mint (required): States the amount of the brc-20 to mint.
    /// Has to be less than "lim" of the `deploy` op if stated.
    #[serde_as(as = "DisplayFromStr")]
    pub amt: u64,
}

/// `transfer` op
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Brc20Transfer {
    /// Protocol (required): Helps other systems identify and process brc-20 events
    #[serde(rename = "p", deserialize_with = "brc20_protocol")]
    protocol: String,
    /// Ticker (required): 4 or 5 letter identifier of the brc-20
    pub tick: String,
    /// Amount to transfer (required): States the amount of the brc-20 to transfer.
    #[serde_as(as = "DisplayFromStr")]
    pub amt: u64,
}

#[cfg(test)]
mod test {

    use super::*;

    #[test]
    fn test_should_decode_deploy() {
        let deploy: Brc20 = serde_json::from_str(
            r#"
            {
                "p": "brc-20",
                "op": "deploy",
                "tick": "ordi",
                "max": "21000000",
                "lim": "1000",
                "dec": "8",
                "self_mint": "false"
              }
            "#,
        )
        .unwrap();

        assert_eq!(
            deploy,
            Brc20::deploy("ordi", 21000000, Some(1000), Some(8), Some(false))
        );

        let deploy: Brc20 = serde_json::from_str(
            r#"
            {
                "p": "brc-20",
                "op": "deploy",
                "tick": "ordi",
                "max": "21000000"
              }
            "#,
        )
        .unwrap();

        assert_eq!(deploy, Brc20::deploy("ordi", 21000000, None, None, None));
    }

    #[test]
    fn test_should_decode_mint() {
        let mint: Brc20 = serde_json::from_str(
            r#"
            {
                "p": "brc-20",
                "op": "mint",
                "tick": "ordi",
                "amt": "1000"
              }
            "#,
        )
        .unwrap();
        assert_eq!(mint, Brc20::mint("ordi", 1000));
        assert_eq!(mint.op(), "mint");
        assert_eq!(mint.tick(), "ordi");
    }

    #[test]
    fn test_should_decode_transfer() {
        let transfer: Brc20 = serde_json::from_str(
            r#"{
                "p": "brc-20",
                "op": "transfer",
                "tick": "ordi",
                "amt": "100"
              }
              "#,
        )
        .unwrap();
        assert_eq!(transfer, Brc20::transfer("ordi", 100));
    }

    #[test]
    fn test_should_reject_other_protocols() {
        assert!(Brc20::from_str(r#"{"p":"brc-21","op":"mint","tick":"ordi","amt":"1"}"#).is_err());
        assert!(Brc20::from_str(r#"{"p":"brc-20","op":"burn","tick":"ordi","amt":"1"}"#).is_err());
        assert!(Brc20::parse(b"Hello, Ordinals!").is_err());
    }

    #[test]
    fn test_should_encode_deploy_in_field_order() {
        let deploy = Brc20::deploy("test", 21_000_000, Some(1_000), None, None);

        assert_eq!(
            deploy.encode().unwrap(),
            r#"{"p":"brc-20","op":"deploy","tick":"test","max":"21000000","lim":"1000"}"#
        );

        let deploy = Brc20::deploy("ordi", 21_000_000, Some(1_000), Some(8), Some(true));
        assert_eq!(
            deploy.encode().unwrap(),
            r#"{"p":"brc-20","op":"deploy","tick":"ordi","max":"21000000","lim":"1000","dec":"8","self_mint":"true"}"#
        );
    }

    #[test]
    fn test_should_encode_mint_and_transfer() {
        assert_eq!(
            Brc20::mint("ordi", 1_000).encode().unwrap(),
            r#"{"p":"brc-20","op":"mint","tick":"ordi","amt":"1000"}"#
        );
        assert_eq!(
            serde_json::to_string(&Brc20::transfer("ordi", 100)).unwrap(),
            r#"{"p":"brc-20","op":"transfer","tick":"ordi","amt":"100"}"#
        );
    }

    #[test]
    fn test_should_encode_and_decode() {
        let op = Brc20::transfer("ordi", 100);

        let s = op.encode().unwrap();

        assert_eq!(Brc20::from_str(&s).unwrap(), op);
    }

    #[test]
    fn test_should_round_trip_deploy_envelope_byte_identically() {
        let json = r#"{"p":"brc-20","op":"deploy","tick":"test","max":"21000000","lim":"1000"}"#;
        let deploy = Brc20::from_str(json).unwrap();
        let envelope = deploy.envelope().unwrap();

        assert_eq!(envelope.content_type(), "text/plain;charset=utf-8");
        assert_eq!(envelope.content(), json.as_bytes());
        assert_eq!(Brc20::parse(envelope.content()).unwrap(), deploy);
    }
}
