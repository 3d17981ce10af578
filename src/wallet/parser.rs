use bitcoin::{Script, Transaction, TxIn};
use serde_json::Value;

use crate::utils::constants::PROTOCOL_ID;
use crate::{
    Brc20, Inscription, InscriptionEnvelope, InscriptionParseError, Nft, OrdError, OrdResult,
};

/// `OP_FALSE OP_IF OP_PUSHBYTES_3 "ord"`
const ENVELOPE_HEADER: [u8; 6] = [0x00, 0x63, 0x03, PROTOCOL_ID[0], PROTOCOL_ID[1], PROTOCOL_ID[2]];

/// Inscription found in a reveal transaction
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum OrdParser {
    Ordinal(#[serde(deserialize_with = "Nft::deserialize_unchecked")] Nft),
    Brc20(Brc20),
}

impl OrdParser {
    /// Parses all inscriptions from a given transaction and categorizes them as either `Self::Brc20` or `Self::Ordinal`.
    ///
    /// Inputs without an envelope in their tapscript are skipped.
    ///
    /// # Errors
    ///
    /// Will return an error if any envelope cannot be decoded,
    /// or if no inscription is found in the transaction.
    pub fn parse_all(tx: &Transaction) -> OrdResult<Vec<Self>> {
        let inscriptions = tx
            .input
            .iter()
            .filter_map(Self::envelope_in_input)
            .map(|envelope| Self::from_envelope(&envelope?))
            .collect::<OrdResult<Vec<_>>>()?;

        if inscriptions.is_empty() {
            return Err(InscriptionParseError::NotFound.into());
        }

        Ok(inscriptions)
    }

    /// Parses the inscription revealed by the input at `index`.
    pub fn parse_one(tx: &Transaction, index: usize) -> OrdResult<Self> {
        let input = tx.input.get(index).ok_or(OrdError::InputNotFound(index))?;
        let envelope = Self::envelope_in_input(input).ok_or(InscriptionParseError::NotFound)??;

        Self::from_envelope(&envelope)
    }

    /// Categorizes a decoded envelope: BRC-20 operations are JSON objects
    /// with `"p": "brc-20"`, an `op` and a `tick`; anything else is an ordinal.
    ///
    /// BRC-20 shaped payloads which don't fit [`Brc20`] (e.g. decimal amounts)
    /// are kept as ordinals, as are content types which are not MIME types.
    pub fn from_envelope(envelope: &InscriptionEnvelope) -> OrdResult<Self> {
        let brc20 = serde_json::from_slice::<Value>(envelope.content())
            .ok()
            .filter(|value| {
                value.get("p").and_then(Value::as_str) == Some("brc-20")
                    && value.get("op").is_some()
                    && value.get("tick").is_some()
            })
            .and_then(|value| match serde_json::from_value::<Brc20>(value) {
                Ok(brc20) => Some(brc20),
                Err(err) => {
                    debug!("unsupported BRC-20 payload, parsed as ordinal: {err}");
                    None
                }
            });

        Ok(match brc20 {
            Some(brc20) => Self::Brc20(brc20),
            None => Self::Ordinal(Nft::unchecked(
                envelope.content_type().to_string(),
                envelope.content().to_vec(),
            )),
        })
    }

    fn envelope_in_input(input: &TxIn) -> Option<OrdResult<InscriptionEnvelope>> {
        let tapscript = input.witness.tapscript()?;
        let offset = tapscript
            .as_bytes()
            .windows(ENVELOPE_HEADER.len())
            .position(|window| window == ENVELOPE_HEADER)?;
        trace!("envelope found at byte {offset} of the tapscript");

        Some(
            InscriptionEnvelope::decode(Script::from_bytes(&tapscript.as_bytes()[offset..]))
                .map_err(OrdError::from),
        )
    }
}

impl From<Brc20> for OrdParser {
    fn from(inscription: Brc20) -> Self {
        Self::Brc20(inscription)
    }
}

impl From<Nft> for OrdParser {
    fn from(inscription: Nft) -> Self {
        Self::Ordinal(inscription)
    }
}

impl TryFrom<OrdParser> for Nft {
    type Error = OrdError;

    fn try_from(parser: OrdParser) -> Result<Self, Self::Error> {
        match parser {
            OrdParser::Ordinal(nft) => Ok(nft),
            _ => Err(OrdError::InscriptionParser(
                InscriptionParseError::OrdParser(
                    "Cannot convert non-Ordinal inscription to Nft".to_string(),
                ),
            )),
        }
    }
}

impl TryFrom<OrdParser> for Brc20 {
    type Error = OrdError;

    fn try_from(parser: OrdParser) -> Result<Self, Self::Error> {
        match parser {
            OrdParser::Brc20(brc20) => Ok(brc20),
            _ => Err(OrdError::InscriptionParser(
                InscriptionParseError::OrdParser(
                    "Cannot convert non-Brc20 inscription to Brc20".to_string(),
                ),
            )),
        }
    }
}

impl Inscription for OrdParser {
    fn content_type(&self) -> String {
        match self {
            Self::Brc20(inscription) => inscription.content_type(),
            Self::Ordinal(inscription) => inscription.content_type(),
        }
    }

    fn data(&self) -> OrdResult<Vec<u8>> {
        match self {
            Self::Brc20(inscription) => inscription.data(),
            Self::Ordinal(inscription) => inscription.data(),
        }
    }
}
