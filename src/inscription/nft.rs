//! NFT

use serde::Deserialize as _;

use crate::{Inscription, OrdError, OrdResult};

/// Represents an arbitrary Ordinal inscription. We're "unofficially" referring to this as an NFT
/// (e.g., like an ERC721 token): any content (text, images, html...) tagged with its MIME type.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(try_from = "NftFields")]
pub struct Nft {
    /// MIME type of the body, such as "image/png" or "text/plain".
    content_type: String,
    /// The main body of the NFT.
    #[serde(with = "hex::serde")]
    body: Vec<u8>,
}

#[derive(Deserialize)]
struct NftFields {
    content_type: String,
    #[serde(with = "hex::serde")]
    body: Vec<u8>,
}

impl TryFrom<NftFields> for Nft {
    type Error = OrdError;

    fn try_from(fields: NftFields) -> Result<Self, Self::Error> {
        Self::new(fields.content_type, fields.body)
    }
}

impl Nft {
    /// Creates a new NFT. The content type must look like a MIME type (`type/subtype`).
    pub fn new(content_type: impl Into<String>, body: impl Into<Vec<u8>>) -> OrdResult<Self> {
        let content_type = content_type.into();
        match content_type.split_once('/') {
            Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() => {}
            _ => return Err(OrdError::InvalidContentType(content_type)),
        }

        Ok(Self::unchecked(content_type, body.into()))
    }

    /// NFT read back from the chain, whatever its content type.
    pub(crate) fn unchecked(content_type: String, body: Vec<u8>) -> Self {
        Self { content_type, body }
    }

    /// Deserializes an NFT without validating its content type.
    pub(crate) fn deserialize_unchecked<'de, D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let fields = NftFields::deserialize(deserializer)?;
        Ok(Self::unchecked(fields.content_type, fields.body))
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Body as UTF-8 text, if it is.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }
}

impl Inscription for Nft {
    fn content_type(&self) -> String {
        self.content_type.clone()
    }

    fn data(&self) -> OrdResult<Vec<u8>> {
        Ok(self.body.clone())
    }
}
